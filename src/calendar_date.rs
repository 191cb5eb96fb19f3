use crate::error::{RecurrenceError, RecurrenceResult};
use chrono::{Datelike, Local, NaiveDate, NaiveDateTime, Weekday};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

static ISO_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([0-9]{4})-([0-9]{2})-([0-9]{2})").expect("ISO date pattern is valid")
});

/// A civil date with no time of day and no timezone attached.
///
/// Day arithmetic on a `CalendarDate` is exact: there is no midnight to drift across a DST change
/// or a UTC offset, so the same inputs give the same dates on every machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CalendarDate(NaiveDate);

/// Anything a caller may hand to [`parse_date`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateInput<'a> {
    Date(CalendarDate),
    Text(&'a str),
}

impl CalendarDate {
    /// The latest date chrono can represent.
    pub const MAX: CalendarDate = CalendarDate(NaiveDate::MAX);

    pub fn from_ymd(year: i32, month: u32, day: u32) -> RecurrenceResult<Self> {
        NaiveDate::from_ymd_opt(year, month, day)
            .map(Self)
            .ok_or(RecurrenceError::InvalidDateValue { year, month, day })
    }

    /// Today's date on the local clock. Only entry points should call this.
    pub fn today() -> Self {
        Self(Local::now().date_naive())
    }

    /// Drop the time of day from a moment.
    pub fn from_datetime(moment: NaiveDateTime) -> Self {
        Self(moment.date())
    }

    pub fn as_naive(&self) -> NaiveDate {
        self.0
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    pub fn month(&self) -> u32 {
        self.0.month()
    }

    pub fn day(&self) -> u32 {
        self.0.day()
    }

    pub fn weekday(&self) -> Weekday {
        self.0.weekday()
    }

    /// Whole days from `self` to `later` (negative when `later` is earlier).
    pub fn days_until(&self, later: CalendarDate) -> i64 {
        (later.0 - self.0).num_days()
    }

    pub fn checked_add_days(&self, days: u64) -> Option<Self> {
        self.0.checked_add_days(chrono::Days::new(days)).map(Self)
    }

    pub fn to_iso_string(&self) -> String {
        self.0.format("%Y-%m-%d").to_string()
    }
}

impl From<NaiveDate> for CalendarDate {
    fn from(value: NaiveDate) -> Self {
        Self(value)
    }
}

impl From<CalendarDate> for NaiveDate {
    fn from(value: CalendarDate) -> Self {
        value.0
    }
}

impl fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl FromStr for CalendarDate {
    type Err = RecurrenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_date(s)
    }
}

impl TryFrom<String> for CalendarDate {
    type Error = RecurrenceError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        parse_date(value.as_str())
    }
}

impl From<CalendarDate> for String {
    fn from(value: CalendarDate) -> Self {
        value.to_iso_string()
    }
}

impl TryFrom<&Value> for CalendarDate {
    type Error = RecurrenceError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        let found = match value {
            Value::String(text) => return parse_date(text.as_str()),
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
        };
        Err(RecurrenceError::InvalidInputType { found })
    }
}

impl<'a> From<&'a str> for DateInput<'a> {
    fn from(value: &'a str) -> Self {
        DateInput::Text(value)
    }
}

impl<'a> From<&'a String> for DateInput<'a> {
    fn from(value: &'a String) -> Self {
        DateInput::Text(value.as_str())
    }
}

impl From<CalendarDate> for DateInput<'_> {
    fn from(value: CalendarDate) -> Self {
        DateInput::Date(value)
    }
}

impl From<NaiveDate> for DateInput<'_> {
    fn from(value: NaiveDate) -> Self {
        DateInput::Date(CalendarDate(value))
    }
}

/// Parse a date from a value that is, or contains, `YYYY-MM-DD`.
///
/// Only the first `YYYY-MM-DD` run in a string is used; anything after it (a time of day, an
/// offset) is ignored. The components are read as a civil date, never as a UTC instant.
pub fn parse_date<'a>(input: impl Into<DateInput<'a>>) -> RecurrenceResult<CalendarDate> {
    let text = match input.into() {
        DateInput::Date(date) => return Ok(date),
        DateInput::Text(text) => text,
    };

    let captures = ISO_DATE
        .captures(text)
        .ok_or_else(|| RecurrenceError::InvalidDateFormat {
            input: text.to_string(),
        })?;

    // The pattern only admits ASCII digits, so these conversions cannot fail.
    let year: i32 = captures[1].parse().unwrap_or_default();
    let month: u32 = captures[2].parse().unwrap_or_default();
    let day: u32 = captures[3].parse().unwrap_or_default();

    CalendarDate::from_ymd(year, month, day)
}
