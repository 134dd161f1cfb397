use std::io::{self, Write};

use tracing::debug;

use crate::item::{Item, Outcome};

/// Exit code for an invocation without any timestamps.
pub const USAGE_EXIT_CODE: i32 = 1;

pub fn usage() -> String {
    format!("{} <timestamp-list>", env!("CARGO_PKG_NAME"))
}

/// Running count of parse results.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Tally {
    pub parsed: usize,
    pub failures: usize,
}

impl Tally {
    pub fn record(&mut self, outcome: &Outcome) {
        if outcome.is_failure() {
            self.failures += 1;
        } else {
            self.parsed += 1;
        }
    }

    /// `0` when every item parsed, otherwise one more than the failure count.
    pub fn exit_code(&self) -> i32 {
        if self.failures == 0 {
            return 0;
        }
        i32::try_from(self.failures)
            .unwrap_or(i32::MAX)
            .saturating_add(1)
    }
}

/// Validates every item in order and returns the exit code for the run.
///
/// Every item is attempted regardless of earlier failures. An empty input
/// prints the usage line and returns [`USAGE_EXIT_CODE`] without touching
/// `out`.
pub fn run<'a, I, O, E>(items: I, out: &mut O, err: &mut E) -> io::Result<i32>
where
    I: IntoIterator<Item = Item<'a>>,
    O: Write,
    E: Write,
{
    let mut items = items.into_iter().peekable();
    if items.peek().is_none() {
        writeln!(err, "{}", usage())?;
        err.flush()?;
        return Ok(USAGE_EXIT_CODE);
    }

    let mut tally = Tally::default();
    for item in items {
        let outcome = item.process(out, err)?;
        match &outcome {
            Outcome::Parsed(instant) => debug!(input = %item, %instant, "parsed"),
            Outcome::Failed(e) => debug!(input = %item, kind = ?e.kind(), "rejected"),
        }
        tally.record(&outcome);
    }
    out.flush()?;

    debug!(parsed = tally.parsed, failures = tally.failures, "validation finished");

    if tally.failures > 0 {
        writeln!(err, "{} timestamp failures", tally.failures)?;
    }
    err.flush()?;

    Ok(tally.exit_code())
}
