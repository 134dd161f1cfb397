use std::{io, process};

use tracing_subscriber::EnvFilter;

mod args;
mod instant;
mod item;
mod validator;

use args::Args;

/// Largest exit status the operating system carries.
const MAX_EXIT_STATUS: i32 = 255;

fn main() {
    init_tracing();

    let code = match run(&Args::parse()) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{e}");
            1
        }
    };

    process::exit(code.min(MAX_EXIT_STATUS));
}

fn run(args: &Args) -> io::Result<i32> {
    let stdout = io::stdout();
    let stderr = io::stderr();
    validator::run(args.items(), &mut stdout.lock(), &mut stderr.lock())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}
