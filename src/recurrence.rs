use crate::calendar_date::{CalendarDate, DateInput, parse_date};
use crate::error::{RecurrenceError, RecurrenceResult};
use serde::{Deserialize, Serialize};

/// Number of occurrences produced when the caller does not ask for a specific count.
pub const DEFAULT_OCCURRENCE_COUNT: usize = 4;

const DAYS_PER_WEEK: u64 = 7;

/// A meeting series: an anchor date repeated every `interval_weeks` weeks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScheduleSpec {
    start_date: CalendarDate,
    interval_weeks: u32,
}

/// One projected meeting date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Occurrence {
    pub date: CalendarDate,
    pub is_next: bool,
}

impl ScheduleSpec {
    pub fn new(start_date: CalendarDate, interval_weeks: u32) -> RecurrenceResult<Self> {
        if interval_weeks == 0 {
            return Err(RecurrenceError::InvalidInterval { interval_weeks });
        }
        Ok(Self {
            start_date,
            interval_weeks,
        })
    }

    /// Build a schedule from anything [`parse_date`] accepts.
    pub fn parse<'a>(
        start_date: impl Into<DateInput<'a>>,
        interval_weeks: u32,
    ) -> RecurrenceResult<Self> {
        let start_date = parse_date(start_date)?;
        Self::new(start_date, interval_weeks)
    }

    pub fn start_date(&self) -> CalendarDate {
        self.start_date
    }

    pub fn interval_weeks(&self) -> u32 {
        self.interval_weeks
    }

    pub fn interval_days(&self) -> u64 {
        u64::from(self.interval_weeks) * DAYS_PER_WEEK
    }

    /// The first occurrence falling on or after `now`.
    ///
    /// The number of skipped intervals is rounded up, so a start date an exact number of
    /// intervals before `now` lands on `now` itself.
    pub fn first_on_or_after(&self, now: CalendarDate) -> RecurrenceResult<CalendarDate> {
        if self.start_date >= now {
            return Ok(self.start_date);
        }
        let elapsed = self.start_date.days_until(now).unsigned_abs();
        let interval = self.interval_days();
        let intervals_passed = elapsed.div_ceil(interval);
        intervals_passed
            .checked_mul(interval)
            .and_then(|offset| self.start_date.checked_add_days(offset))
            .ok_or_else(|| RecurrenceError::DateOutOfRange {
                after: self.start_date.to_string(),
            })
    }

    /// How many occurrences starting at `first` fit before [`CalendarDate::MAX`].
    fn occurrences_until_max(&self, first: CalendarDate) -> u64 {
        first.days_until(CalendarDate::MAX).unsigned_abs() / self.interval_days() + 1
    }

    /// Project `count` occurrences forward from `now`.
    ///
    /// A `count` that would run past the last representable date fails with
    /// [`RecurrenceError::DateOutOfRange`] before anything is allocated.
    pub fn project(&self, count: usize, now: CalendarDate) -> RecurrenceResult<Vec<Occurrence>> {
        if count == 0 {
            return Ok(Vec::new());
        }

        let mut current = self.first_on_or_after(now)?;
        let room = self.occurrences_until_max(current);
        if u64::try_from(count).unwrap_or(u64::MAX) > room {
            let last = current
                .checked_add_days((room - 1) * self.interval_days())
                .unwrap_or(current);
            return Err(RecurrenceError::DateOutOfRange {
                after: last.to_string(),
            });
        }

        let mut occurrences = Vec::with_capacity(count);
        for index in 0..count {
            if index > 0 {
                current = current
                    .checked_add_days(self.interval_days())
                    .ok_or_else(|| RecurrenceError::DateOutOfRange {
                        after: current.to_string(),
                    })?;
            }
            occurrences.push(Occurrence {
                date: current,
                is_next: index == 0,
            });
        }
        Ok(occurrences)
    }
}

/// Project `count` occurrences of a series given as raw inputs.
///
/// This is the entry point presentation code uses with a ward's stored `start_date` and
/// `frequency_weeks`. Any parse or interval error fails the whole projection.
pub fn project<'a>(
    start_date: impl Into<DateInput<'a>>,
    interval_weeks: u32,
    count: usize,
    now: CalendarDate,
) -> RecurrenceResult<Vec<Occurrence>> {
    ScheduleSpec::parse(start_date, interval_weeks)?.project(count, now)
}

/// [`project`] with [`DEFAULT_OCCURRENCE_COUNT`] occurrences.
pub fn project_default<'a>(
    start_date: impl Into<DateInput<'a>>,
    interval_weeks: u32,
    now: CalendarDate,
) -> RecurrenceResult<Vec<Occurrence>> {
    project(start_date, interval_weeks, DEFAULT_OCCURRENCE_COUNT, now)
}
