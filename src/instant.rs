use std::{fmt, iter, str::FromStr};

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, NaiveTime, Timelike, Utc};
use thiserror::Error;

/// Widest year field, sign excluded.
const MAX_YEAR_DIGITS: usize = 10;

/// Year width below which a `+` sign is not allowed and above which it is required.
const YEAR_PAD: usize = 4;

const MAX_FRACTION_DIGITS: usize = 9;

/// Widest offset accepted, in seconds.
const MAX_OFFSET_SECONDS: i32 = 18 * 3600;

/// A point on the UTC timeline
///
/// Parsed from the extended ISO-8601 instant layout,
/// `[±]YYYY-MM-DDTHH:MM:SS[.fraction]<offset>`, where the offset is `Z`,
/// `±HH:MM` or `±HH:MM:SS`. Any offset is normalized away, so two instants
/// written in different zones compare equal when they name the same moment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Instant(DateTime<Utc>);

impl FromStr for Instant {
    type Err = ParseInstantError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let fields = Scanner::new(text).fields()?;
        fields
            .resolve()
            .map(Instant)
            .map_err(|kind| ParseInstantError::new(text, kind))
    }
}

/// Canonical form: UTC with a `Z` suffix, seconds always present, and
/// fractional seconds in groups of three digits, omitted when zero. Years
/// past 9999 carry a `+`, years before 0 a `-`.
impl fmt::Display for Instant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let moment = self.0;
        match moment.year() {
            year @ 0..=9999 => write!(f, "{year:04}")?,
            year if year > 9999 => write!(f, "+{year}")?,
            year => write!(f, "{year:05}")?,
        }
        write!(
            f,
            "-{:02}-{:02}T{:02}:{:02}:{:02}",
            moment.month(),
            moment.day(),
            moment.hour(),
            moment.minute(),
            moment.second()
        )?;

        match moment.nanosecond() {
            0 => {}
            nanos if nanos % 1_000_000 == 0 => write!(f, ".{:03}", nanos / 1_000_000)?,
            nanos if nanos % 1_000 == 0 => write!(f, ".{:06}", nanos / 1_000)?,
            nanos => write!(f, ".{nanos:09}")?,
        }
        f.write_str("Z")
    }
}

/// Why a string is not an instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
    #[error("unexpected character")]
    UnexpectedCharacter,

    #[error("premature end of input")]
    TooShort,

    #[error("trailing input")]
    TrailingInput,

    #[error("year must have four digits, or a sign and more than four")]
    Year,

    #[error("date and time must be separated by 'T'")]
    Separator,

    #[error("fraction of second has more than nine digits")]
    Fraction,

    #[error("missing offset or zone designator")]
    MissingOffset,

    #[error("offset must be 'Z' or +HH:MM[:SS] no wider than 18 hours")]
    Offset,

    #[error("{0} out of range")]
    Range(&'static str),

    #[error("text is not valid UTF-8")]
    NotUnicode,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Text '{text}' could not be parsed{position}: {kind}")]
pub struct ParseInstantError {
    text: String,
    position: Position,
    kind: ParseErrorKind,
}

impl ParseInstantError {
    pub fn new(text: impl Into<String>, kind: ParseErrorKind) -> Self {
        ParseInstantError {
            text: text.into(),
            position: Position(None),
            kind,
        }
    }

    fn at(text: &str, index: usize, kind: ParseErrorKind) -> Self {
        ParseInstantError {
            text: text.into(),
            position: Position(Some(index)),
            kind,
        }
    }

    pub fn kind(&self) -> ParseErrorKind {
        self.kind
    }

    /// Byte index where scanning stopped, if the text was malformed rather
    /// than out of range.
    pub fn index(&self) -> Option<usize> {
        self.position.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Position(Option<usize>);

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(index) => write!(f, " at index {index}"),
            None => Ok(()),
        }
    }
}

/// The numeric fields of an instant as written, before any range checks.
#[derive(Debug)]
struct Fields {
    year: i32,
    month: u32,
    day: u32,
    hour: u32,
    minute: u32,
    second: u32,
    nanos: u32,
    offset: i32,
}

impl Fields {
    fn resolve(self) -> Result<DateTime<Utc>, ParseErrorKind> {
        if !(1..=12).contains(&self.month) {
            return Err(ParseErrorKind::Range("month"));
        }
        let mut date = NaiveDate::from_ymd_opt(self.year, self.month, self.day)
            .ok_or(ParseErrorKind::Range("date"))?;

        let (mut hour, mut second) = (self.hour, self.second);
        if hour == 24 && self.minute == 0 && second == 0 && self.nanos == 0 {
            // End of day is the first moment of the next one.
            hour = 0;
            date = date.succ_opt().ok_or(ParseErrorKind::Range("date"))?;
        } else if hour == 23 && self.minute == 59 && second == 60 {
            second = 59;
        }

        if hour > 23 {
            return Err(ParseErrorKind::Range("hour"));
        }
        if self.minute > 59 {
            return Err(ParseErrorKind::Range("minute"));
        }
        if second > 59 {
            return Err(ParseErrorKind::Range("second"));
        }
        let time = NaiveTime::from_hms_nano_opt(hour, self.minute, second, self.nanos)
            .ok_or(ParseErrorKind::Range("time"))?;

        let offset = FixedOffset::east_opt(self.offset).ok_or(ParseErrorKind::Offset)?;
        date.and_time(time)
            .and_local_timezone(offset)
            .single()
            .map(|moment| moment.with_timezone(&Utc))
            .ok_or(ParseErrorKind::Range("instant"))
    }
}

struct Scanner<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> Scanner<'a> {
    fn new(text: &'a str) -> Self {
        Scanner { text, pos: 0 }
    }

    fn fields(mut self) -> Result<Fields, ParseInstantError> {
        let year = self.year()?;
        self.literal(b'-')?;
        let month = self.number(2)?;
        self.literal(b'-')?;
        let day = self.number(2)?;

        match self.peek() {
            Some(b'T' | b't') => self.pos += 1,
            Some(_) => return Err(self.error(ParseErrorKind::Separator)),
            None => return Err(self.error(ParseErrorKind::TooShort)),
        }

        let hour = self.number(2)?;
        self.literal(b':')?;
        let minute = self.number(2)?;
        self.literal(b':')?;
        let second = self.number(2)?;
        let nanos = self.fraction()?;
        let offset = self.offset()?;

        if self.pos < self.text.len() {
            return Err(self.error(ParseErrorKind::TrailingInput));
        }

        Ok(Fields {
            year,
            month,
            day,
            hour,
            minute,
            second,
            nanos,
            offset,
        })
    }

    fn peek(&self) -> Option<u8> {
        self.text.as_bytes().get(self.pos).copied()
    }

    fn eat(&mut self, byte: u8) -> bool {
        let found = self.peek() == Some(byte);
        if found {
            self.pos += 1;
        }
        found
    }

    fn error(&self, kind: ParseErrorKind) -> ParseInstantError {
        ParseInstantError::at(self.text, self.pos, kind)
    }

    fn unexpected(&self) -> ParseInstantError {
        match self.peek() {
            Some(_) => self.error(ParseErrorKind::UnexpectedCharacter),
            None => self.error(ParseErrorKind::TooShort),
        }
    }

    fn literal(&mut self, byte: u8) -> Result<(), ParseInstantError> {
        if self.eat(byte) {
            Ok(())
        } else {
            Err(self.unexpected())
        }
    }

    /// Consumes up to `max` ASCII digits.
    fn digits(&mut self, max: usize) -> &'a str {
        let start = self.pos;
        while self.pos - start < max && self.peek().is_some_and(|b| b.is_ascii_digit()) {
            self.pos += 1;
        }
        &self.text[start..self.pos]
    }

    /// Exactly `width` digits.
    fn number(&mut self, width: usize) -> Result<u32, ParseInstantError> {
        let digits = self.digits(width);
        if digits.len() < width {
            return Err(self.unexpected());
        }
        Ok(digits
            .bytes()
            .fold(0, |acc, b| acc * 10 + u32::from(b - b'0')))
    }

    fn year(&mut self) -> Result<i32, ParseInstantError> {
        let start = self.pos;
        let sign = match self.peek() {
            Some(sign @ (b'+' | b'-')) => {
                self.pos += 1;
                Some(sign)
            }
            _ => None,
        };

        let digits_start = self.pos;
        let digits = self.digits(MAX_YEAR_DIGITS);
        if digits.len() < YEAR_PAD {
            return Err(self.unexpected());
        }

        let magnitude = digits
            .bytes()
            .fold(0_i64, |acc, b| acc * 10 + i64::from(b - b'0'));
        let value = match sign {
            Some(b'+') if digits.len() <= YEAR_PAD => {
                return Err(ParseInstantError::at(self.text, start, ParseErrorKind::Year));
            }
            None if digits.len() > YEAR_PAD => {
                return Err(ParseInstantError::at(
                    self.text,
                    digits_start,
                    ParseErrorKind::Year,
                ));
            }
            Some(b'-') if magnitude == 0 => {
                return Err(ParseInstantError::at(self.text, start, ParseErrorKind::Year));
            }
            Some(b'-') => -magnitude,
            _ => magnitude,
        };

        i32::try_from(value)
            .map_err(|_| ParseInstantError::new(self.text, ParseErrorKind::Range("year")))
    }

    /// Optional `.` and up to nine digits, as nanoseconds. The dot alone is
    /// accepted.
    fn fraction(&mut self) -> Result<u32, ParseInstantError> {
        if !self.eat(b'.') {
            return Ok(0);
        }
        let digits = self.digits(MAX_FRACTION_DIGITS);
        if self.peek().is_some_and(|b| b.is_ascii_digit()) {
            return Err(self.error(ParseErrorKind::Fraction));
        }
        Ok(digits
            .bytes()
            .chain(iter::repeat(b'0'))
            .take(MAX_FRACTION_DIGITS)
            .fold(0, |acc, b| acc * 10 + u32::from(b - b'0')))
    }

    /// Offset east of UTC in seconds.
    fn offset(&mut self) -> Result<i32, ParseInstantError> {
        let start = self.pos;
        let sign = match self.peek() {
            None => return Err(self.error(ParseErrorKind::MissingOffset)),
            Some(b'Z' | b'z') => {
                self.pos += 1;
                return Ok(0);
            }
            Some(sign @ (b'+' | b'-')) => sign,
            Some(_) => return Err(self.error(ParseErrorKind::Offset)),
        };
        self.pos += 1;

        let text = self.text;
        let invalid = || ParseInstantError::at(text, start, ParseErrorKind::Offset);
        let hours = self.number(2).map_err(|_| invalid())?;
        self.literal(b':').map_err(|_| invalid())?;
        let minutes = self.number(2).map_err(|_| invalid())?;
        let seconds = if self.eat(b':') {
            self.number(2).map_err(|_| invalid())?
        } else {
            0
        };

        let total = i32::try_from(hours * 3600 + minutes * 60 + seconds).unwrap_or(i32::MAX);
        if minutes > 59 || seconds > 59 || total > MAX_OFFSET_SECONDS {
            return Err(invalid());
        }

        Ok(if sign == b'-' { -total } else { total })
    }
}
