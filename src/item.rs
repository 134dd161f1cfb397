use std::{
    ffi::OsStr,
    fmt,
    io::{self, Write},
};

use crate::instant::{Instant, ParseErrorKind, ParseInstantError};

/// A work item
///
/// One candidate timestamp as given on the command line. Arguments that are
/// not valid UTF-8 are kept so they can be reported, but they never parse.
#[derive(Debug, Clone, Copy)]
pub enum Item<'a> {
    Text(&'a str),
    NotUnicode(&'a OsStr),
}

#[derive(Debug)]
pub enum Outcome {
    Parsed(Instant),
    Failed(ParseInstantError),
}

impl Outcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, Outcome::Failed(_))
    }
}

impl<'a> From<&'a str> for Item<'a> {
    fn from(text: &'a str) -> Self {
        Item::Text(text)
    }
}

impl<'a> From<&'a OsStr> for Item<'a> {
    fn from(arg: &'a OsStr) -> Self {
        match arg.to_str() {
            Some(text) => Item::Text(text),
            None => Item::NotUnicode(arg),
        }
    }
}

impl Item<'_> {
    pub fn parse(&self) -> Result<Instant, ParseInstantError> {
        match self {
            Item::Text(text) => text.parse(),
            Item::NotUnicode(arg) => Err(ParseInstantError::new(
                arg.to_string_lossy(),
                ParseErrorKind::NotUnicode,
            )),
        }
    }

    /// Parses the item and reports the result, successes to `out` and
    /// failures to `err`.
    pub fn process<O, E>(&self, out: &mut O, err: &mut E) -> io::Result<Outcome>
    where
        O: Write,
        E: Write,
    {
        match self.parse() {
            Ok(instant) => {
                writeln!(out, "Successfully parsed {self} as {instant}")?;
                Ok(Outcome::Parsed(instant))
            }
            Err(e) => {
                writeln!(err, "FAILURE: Exception {e} when parsing {self}")?;
                Ok(Outcome::Failed(e))
            }
        }
    }
}

impl fmt::Display for Item<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Item::Text(text) => f.write_str(text),
            Item::NotUnicode(arg) => f.write_str(&arg.to_string_lossy()),
        }
    }
}
