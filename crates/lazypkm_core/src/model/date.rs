//! Due-date and timestamp parsing at the record boundary.
//!
//! # Invariants
//! - Due dates are strict `YYYY-MM-DD` calendar dates.
//! - A malformed due date never fails a whole record; it decodes as `None`
//!   ("unscheduled").
//! - Timestamps are written as RFC 3339 UTC and read back losslessly.

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use log::warn;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serializer};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Wire format for task due dates.
pub const DUE_DATE_FORMAT: &str = "%Y-%m-%d";

static DUE_DATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("valid due date regex"));

/// Malformed due-date input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidDateError {
    pub input: String,
}

impl Display for InvalidDateError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid due date `{}`; expected YYYY-MM-DD", self.input)
    }
}

impl Error for InvalidDateError {}

/// Parses one `YYYY-MM-DD` due date.
///
/// Both the shape and the calendar value are checked, so `2025-1-1` and
/// `2025-02-30` are rejected.
pub fn parse_due_date(input: &str) -> Result<NaiveDate, InvalidDateError> {
    let trimmed = input.trim();
    if !DUE_DATE_RE.is_match(trimmed) {
        return Err(InvalidDateError {
            input: input.to_string(),
        });
    }
    NaiveDate::parse_from_str(trimmed, DUE_DATE_FORMAT).map_err(|_| InvalidDateError {
        input: input.to_string(),
    })
}

/// Boundary policy for user-entered due dates: accept, but store `None`
/// when the text does not parse.
pub fn due_date_or_unscheduled(input: &str) -> Option<NaiveDate> {
    if input.trim().is_empty() {
        return None;
    }
    match parse_due_date(input) {
        Ok(date) => Some(date),
        Err(err) => {
            warn!("event=task_due_date_invalid module=model status=warn error={err}");
            None
        }
    }
}

/// Formats a due date in wire form.
pub fn format_due_date(date: NaiveDate) -> String {
    date.format(DUE_DATE_FORMAT).to_string()
}

/// Serde adapter for `Option<NaiveDate>` due dates.
///
/// The field stays required on decode: a missing key is an error, while
/// `null` or an unparsable string decode as `None`.
pub(crate) mod due_date_serde {
    use super::*;

    pub fn serialize<S>(value: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(date) => serializer.serialize_str(&format_due_date(*date)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.as_deref().and_then(due_date_or_unscheduled))
    }
}

/// Serde adapter for creation timestamps.
///
/// Accepts RFC 3339 and offset-less ISO 8601 (read as UTC).
pub(crate) mod timestamp_serde {
    use super::*;

    pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::AutoSi, true))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse_timestamp(&raw).map_err(serde::de::Error::custom)
    }
}

pub(crate) fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Ok(parsed.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| naive.and_utc())
        .map_err(|err| format!("invalid timestamp `{raw}`: {err}"))
}

#[cfg(test)]
mod tests {
    use super::{due_date_or_unscheduled, parse_due_date, parse_timestamp};
    use chrono::{Datelike, Timelike};

    #[test]
    fn parse_due_date_accepts_strict_form() {
        let date = parse_due_date("2025-01-31").unwrap();
        assert_eq!((date.year(), date.month(), date.day()), (2025, 1, 31));
    }

    #[test]
    fn parse_due_date_rejects_loose_shapes_and_impossible_days() {
        assert!(parse_due_date("2025-1-1").is_err());
        assert!(parse_due_date("2025-02-30").is_err());
        assert!(parse_due_date("tomorrow").is_err());
    }

    #[test]
    fn blank_or_bad_input_becomes_unscheduled() {
        assert_eq!(due_date_or_unscheduled(""), None);
        assert_eq!(due_date_or_unscheduled("next week"), None);
        assert!(due_date_or_unscheduled(" 2025-03-04 ").is_some());
    }

    #[test]
    fn parse_timestamp_reads_naive_iso_as_utc() {
        let parsed = parse_timestamp("2025-11-14T10:20:30.123456").unwrap();
        assert_eq!(parsed.hour(), 10);
        assert_eq!(parsed.nanosecond(), 123_456_000);
    }
}
