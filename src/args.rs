use std::ffi::OsString;

use clap::Parser;

use crate::item::Item;

#[derive(Debug, Parser)]
#[command(
    name = env!("CARGO_PKG_NAME"),
    disable_help_flag = true,
    disable_version_flag = true
)]
pub struct Args {
    /// candidate timestamps, e.g. 2022-01-01T00:00:00Z
    #[arg(allow_hyphen_values = true, trailing_var_arg = true)]
    timestamps: Vec<OsString>,
}

impl Args {
    pub fn parse() -> Self {
        Parser::parse()
    }

    pub fn items(&'_ self) -> impl Iterator<Item = Item<'_>> + '_ {
        self.timestamps.iter().map(|arg| Item::from(arg.as_os_str()))
    }
}
