use crate::calendar_date::{CalendarDate, DateInput, parse_date};

/// Shown in place of a date that could not be parsed.
pub const INVALID_DATE: &str = "Invalid Date";

/// US-English long form, e.g. `Monday, March 11, 2024`.
pub fn format_long(date: CalendarDate) -> String {
    date.as_naive().format("%A, %B %-d, %Y").to_string()
}

/// Short form used in meeting lists, e.g. `Mon, Mar 11, 2024`.
pub fn format_short(date: CalendarDate) -> String {
    date.as_naive().format("%a, %b %-d, %Y").to_string()
}

/// Like [`format_long`] but never fails: unparseable input renders as [`INVALID_DATE`].
///
/// Display code uses this; scheduling code should parse with [`parse_date`] and handle the error.
pub fn format_long_or_fallback<'a>(input: impl Into<DateInput<'a>>) -> String {
    match parse_date(input) {
        Ok(date) => format_long(date),
        Err(_) => INVALID_DATE.to_string(),
    }
}
