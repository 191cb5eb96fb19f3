use chrono::NaiveDate;
use serde_json::json;
use ward_calendar::{
    CalendarDate, DateInput, INVALID_DATE, RecurrenceError, format_long,
    format_long_or_fallback, format_short, parse_date,
};

fn d(y: i32, m: u32, d: u32) -> CalendarDate {
    CalendarDate::from_ymd(y, m, d).unwrap()
}

#[test]
fn parses_plain_and_embedded_iso_dates() {
    assert_eq!(parse_date("2024-02-29").unwrap(), d(2024, 2, 29));
    assert_eq!(parse_date("2024-01-05T10:00:00Z").unwrap(), d(2024, 1, 5));
    assert_eq!(
        parse_date("Meeting on 2024-07-04 at noon").unwrap(),
        d(2024, 7, 4)
    );
}

#[test]
fn missing_pattern_is_a_format_error() {
    for input in ["", "not-a-date", "24-1-1", "2024/01/05", "March 11, 2024"] {
        let err = parse_date(input).unwrap_err();
        assert!(
            matches!(err, RecurrenceError::InvalidDateFormat { .. }),
            "{input:?} gave {err:?}"
        );
    }
}

#[test]
fn impossible_calendar_values_are_value_errors() {
    let cases = [
        ("2023-02-29", 2023, 2, 29),
        ("2024-13-01", 2024, 13, 1),
        ("2024-01-32", 2024, 1, 32),
        ("2024-00-10", 2024, 0, 10),
        ("2024-04-31", 2024, 4, 31),
    ];
    for (input, year, month, day) in cases {
        assert_eq!(
            parse_date(input).unwrap_err(),
            RecurrenceError::InvalidDateValue { year, month, day }
        );
    }
}

#[test]
fn date_values_pass_through_unchanged() {
    let date = d(2024, 3, 11);
    assert_eq!(parse_date(date).unwrap(), date);
    assert_eq!(parse_date(DateInput::Date(date)).unwrap(), date);
    let naive = NaiveDate::from_ymd_opt(2024, 3, 11).unwrap();
    assert_eq!(parse_date(naive).unwrap(), date);
}

#[test]
fn json_values_other_than_strings_are_type_errors() {
    let date = CalendarDate::try_from(&json!("2024-03-11")).unwrap();
    assert_eq!(date, d(2024, 3, 11));

    let cases = [
        (json!(20240311), "number"),
        (json!(null), "null"),
        (json!(true), "boolean"),
        (json!(["2024-03-11"]), "array"),
        (json!({ "date": "2024-03-11" }), "object"),
    ];
    for (value, found) in cases {
        assert_eq!(
            CalendarDate::try_from(&value).unwrap_err(),
            RecurrenceError::InvalidInputType { found }
        );
    }
}

#[test]
fn serde_uses_iso_strings() {
    let date = d(2024, 3, 11);
    assert_eq!(serde_json::to_string(&date).unwrap(), "\"2024-03-11\"");
    let back: CalendarDate = serde_json::from_str("\"2024-03-11\"").unwrap();
    assert_eq!(back, date);
    assert!(serde_json::from_str::<CalendarDate>("\"2024-02-30\"").is_err());
    assert!(serde_json::from_str::<CalendarDate>("42").is_err());
}

#[test]
fn datetime_is_normalized_to_its_date() {
    let moment = NaiveDate::from_ymd_opt(2024, 3, 11)
        .unwrap()
        .and_hms_opt(23, 59, 59)
        .unwrap();
    assert_eq!(CalendarDate::from_datetime(moment), d(2024, 3, 11));
}

#[test]
fn iso_form_round_trips_through_parse_for_a_whole_leap_year() {
    let mut date = d(2024, 1, 1);
    while date.year() == 2024 {
        let text = date.to_string();
        let parsed = parse_date(text.as_str()).unwrap();
        assert_eq!(parse_date(parsed.to_string().as_str()).unwrap(), parsed);
        assert_eq!(parsed, date);
        date = date.checked_add_days(1).unwrap();
    }
}

#[test]
fn long_format_spells_out_weekday_and_month() {
    assert_eq!(format_long(d(2024, 3, 11)), "Monday, March 11, 2024");
    assert_eq!(format_long(d(2030, 1, 1)), "Tuesday, January 1, 2030");
    assert_eq!(format_short(d(2024, 3, 5)), "Tue, Mar 5, 2024");
}

#[test]
fn fallback_format_degrades_instead_of_failing() {
    assert_eq!(format_long_or_fallback("2024-03-11"), "Monday, March 11, 2024");
    assert_eq!(format_long_or_fallback("garbage"), INVALID_DATE);
    assert_eq!(format_long_or_fallback("2024-02-30"), INVALID_DATE);
}
