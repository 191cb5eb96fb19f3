use thiserror::Error;

/// Failures raised while parsing dates or projecting a recurring schedule.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecurrenceError {
    #[error("expected a date string or date value, got {found}")]
    InvalidInputType { found: &'static str },

    #[error("no YYYY-MM-DD date found in '{input}'")]
    InvalidDateFormat { input: String },

    #[error("{year:04}-{month:02}-{day:02} is not a valid calendar date")]
    InvalidDateValue { year: i32, month: u32, day: u32 },

    #[error("interval must be at least one week (got {interval_weeks})")]
    InvalidInterval { interval_weeks: u32 },

    #[error("occurrence after {after} falls outside the supported date range")]
    DateOutOfRange { after: String },
}

pub type RecurrenceResult<T> = Result<T, RecurrenceError>;
