//! Reminder grammar: `dd.mm.yyyy hh:mm text`.
//!
//! Matching is exact, not permissive date parsing: zero-padded fields, dots
//! between the date parts, a colon in the time, one separating space before
//! the body. Parsing never consults the clock; a past date parses fine and is
//! the engine's problem.

use std::sync::LazyLock;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use regex::Regex;
use thiserror::Error;

/// Group 1 is the whole date-time token, groups 2-6 its fields, group 7 the
/// body verbatim.
static REMINDER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^((\d{2})\.(\d{2})\.(\d{4}) (\d{2}):(\d{2})) (.+)$")
        .expect("reminder pattern is valid")
});

/// Why an input failed to parse as a reminder.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Input does not match `dd.mm.yyyy hh:mm text`.
    #[error("input does not match \"dd.mm.yyyy hh:mm text\"")]
    Format,

    /// Structurally fine, but the fields name no real calendar moment
    /// (day 31 in a 30-day month, month 13, hour 24).
    #[error("no such date or time: {0}")]
    InvalidDate(String),
}

/// Parse a raw reminder specification into a due time and message body.
///
/// An empty or whitespace-only body is rejected: a reminder with nothing to
/// say is a user error, not a reminder.
pub fn parse_reminder(input: &str) -> Result<(NaiveDateTime, &str), ParseError> {
    let caps = REMINDER_RE.captures(input).ok_or(ParseError::Format)?;

    let field = |i: usize| caps[i].parse::<u32>().map_err(|_| ParseError::Format);
    let (day, month, year) = (field(2)?, field(3)?, field(4)?);
    let (hour, minute) = (field(5)?, field(6)?);

    let invalid = || ParseError::InvalidDate(caps[1].to_string());
    let date = NaiveDate::from_ymd_opt(year as i32, month, day).ok_or_else(invalid)?;
    let time = NaiveTime::from_hms_opt(hour, minute, 0).ok_or_else(invalid)?;

    let body = caps.get(7).map(|m| m.as_str()).unwrap_or_default();
    if body.trim().is_empty() {
        return Err(ParseError::Format);
    }

    Ok((date.and_time(time), body))
}
