use crate::calendar_date::CalendarDate;
use serde::{Deserialize, Serialize};

/// Source of "today" for the outer layers. The recurrence code always takes the date as an
/// argument; only a `Clock` ever consults the system time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Clock {
    #[default]
    System,
    Fixed(CalendarDate),
}

impl Clock {
    pub fn today(&self) -> CalendarDate {
        match self {
            Clock::System => CalendarDate::today(),
            Clock::Fixed(date) => *date,
        }
    }

    pub fn fixed_or_system(date: Option<CalendarDate>) -> Self {
        date.map(Clock::Fixed).unwrap_or_default()
    }
}
