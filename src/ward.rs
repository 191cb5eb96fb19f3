use crate::calendar_date::CalendarDate;
use crate::error::RecurrenceResult;
use crate::recurrence::{Occurrence, ScheduleSpec};
use crate::ward_validation::{self, WardValidationError};
use chrono::{DateTime, Utc, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_FREQUENCY_WEEKS: u32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MeetingDay {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl MeetingDay {
    pub const ALL: [MeetingDay; 7] = [
        MeetingDay::Monday,
        MeetingDay::Tuesday,
        MeetingDay::Wednesday,
        MeetingDay::Thursday,
        MeetingDay::Friday,
        MeetingDay::Saturday,
        MeetingDay::Sunday,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MeetingDay::Monday => "Monday",
            MeetingDay::Tuesday => "Tuesday",
            MeetingDay::Wednesday => "Wednesday",
            MeetingDay::Thursday => "Thursday",
            MeetingDay::Friday => "Friday",
            MeetingDay::Saturday => "Saturday",
            MeetingDay::Sunday => "Sunday",
        }
    }

    /// Case-insensitive lookup by full or three-letter name.
    pub fn from_name(value: &str) -> Option<Self> {
        let value = value.trim();
        Self::ALL.into_iter().find(|day| {
            let name = day.as_str();
            name.eq_ignore_ascii_case(value) || name[..3].eq_ignore_ascii_case(value)
        })
    }

    pub fn weekday(&self) -> Weekday {
        match self {
            MeetingDay::Monday => Weekday::Mon,
            MeetingDay::Tuesday => Weekday::Tue,
            MeetingDay::Wednesday => Weekday::Wed,
            MeetingDay::Thursday => Weekday::Thu,
            MeetingDay::Friday => Weekday::Fri,
            MeetingDay::Saturday => Weekday::Sat,
            MeetingDay::Sunday => Weekday::Sun,
        }
    }
}

impl From<Weekday> for MeetingDay {
    fn from(value: Weekday) -> Self {
        match value {
            Weekday::Mon => MeetingDay::Monday,
            Weekday::Tue => MeetingDay::Tuesday,
            Weekday::Wed => MeetingDay::Wednesday,
            Weekday::Thu => MeetingDay::Thursday,
            Weekday::Fri => MeetingDay::Friday,
            Weekday::Sat => MeetingDay::Saturday,
            Weekday::Sun => MeetingDay::Sunday,
        }
    }
}

impl fmt::Display for MeetingDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MeetingDay {
    type Err = WardValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s)
            .ok_or_else(|| WardValidationError::new(format!("unknown meeting day '{s}'")))
    }
}

/// A meeting that actually took place (or was called off) for a ward.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meeting {
    pub id: i64,
    pub meeting_date: CalendarDate,
    pub meeting_time: String,
    pub venue: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agenda: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default)]
    pub is_cancelled: bool,
}

impl Meeting {
    pub fn new(
        id: i64,
        meeting_date: CalendarDate,
        meeting_time: impl Into<String>,
        venue: impl Into<String>,
    ) -> Self {
        Self {
            id,
            meeting_date,
            meeting_time: meeting_time.into(),
            venue: venue.into(),
            agenda: None,
            notes: None,
            is_cancelled: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ward {
    pub id: String,
    pub ward_name: String,
    pub meeting_day: MeetingDay,
    pub meeting_time: String,
    pub venue: String,
    #[serde(default = "default_frequency_weeks")]
    pub frequency_weeks: u32,
    pub start_date: CalendarDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ward_admin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    /// Recorded meetings, newest first.
    #[serde(default)]
    pub meetings: Vec<Meeting>,
}

/// Partial edit of a ward's details. Absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WardUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ward_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meeting_day: Option<MeetingDay>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meeting_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub venue: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency_weeks: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<CalendarDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ward_admin: Option<String>,
}

fn default_frequency_weeks() -> u32 {
    DEFAULT_FREQUENCY_WEEKS
}

impl Ward {
    pub fn new(
        id: impl Into<String>,
        ward_name: impl Into<String>,
        meeting_day: MeetingDay,
        meeting_time: impl Into<String>,
        venue: impl Into<String>,
        start_date: CalendarDate,
    ) -> Self {
        Self {
            id: id.into(),
            ward_name: ward_name.into(),
            meeting_day,
            meeting_time: meeting_time.into(),
            venue: venue.into(),
            frequency_weeks: DEFAULT_FREQUENCY_WEEKS,
            start_date,
            ward_admin: None,
            created_at: None,
            updated_at: None,
            meetings: Vec::new(),
        }
    }

    pub fn schedule_spec(&self) -> RecurrenceResult<ScheduleSpec> {
        ScheduleSpec::new(self.start_date, self.frequency_weeks)
    }

    pub fn upcoming_meetings(
        &self,
        count: usize,
        today: CalendarDate,
    ) -> RecurrenceResult<Vec<Occurrence>> {
        self.schedule_spec()?.project(count, today)
    }

    pub fn next_meeting(&self, today: CalendarDate) -> RecurrenceResult<Option<Occurrence>> {
        Ok(self.upcoming_meetings(1, today)?.into_iter().next())
    }

    /// `Wednesdays @ 5:00 PM`
    pub fn schedule_label(&self) -> String {
        format!("{}s @ {}", self.meeting_day, self.meeting_time)
    }

    pub fn latest_meeting(&self) -> Option<&Meeting> {
        self.meetings.first()
    }

    pub fn recorded_meeting(&self, date: CalendarDate) -> Option<&Meeting> {
        self.meetings.iter().find(|m| m.meeting_date == date)
    }

    /// Apply a partial edit. The ward is left unchanged if the edited record would be invalid.
    pub fn apply_update(
        &mut self,
        update: WardUpdate,
        updated_at: DateTime<Utc>,
    ) -> Result<(), WardValidationError> {
        let mut candidate = self.clone();
        if let Some(name) = update.ward_name {
            candidate.ward_name = name;
        }
        if let Some(day) = update.meeting_day {
            candidate.meeting_day = day;
        }
        if let Some(time) = update.meeting_time {
            candidate.meeting_time = time;
        }
        if let Some(venue) = update.venue {
            candidate.venue = venue;
        }
        if let Some(weeks) = update.frequency_weeks {
            candidate.frequency_weeks = weeks;
        }
        if let Some(start) = update.start_date {
            candidate.start_date = start;
        }
        if let Some(admin) = update.ward_admin {
            candidate.ward_admin = if admin.trim().is_empty() { None } else { Some(admin) };
        }
        ward_validation::validate_ward(&candidate)?;
        candidate.updated_at = Some(updated_at);
        *self = candidate;
        Ok(())
    }

    /// Add a recorded meeting, keeping the list newest first.
    pub fn record_meeting(&mut self, meeting: Meeting) -> Result<(), WardValidationError> {
        if self.recorded_meeting(meeting.meeting_date).is_some() {
            return Err(WardValidationError::new(format!(
                "ward {} already has a meeting on {}",
                self.id, meeting.meeting_date
            )));
        }
        let position = self
            .meetings
            .iter()
            .position(|m| m.meeting_date < meeting.meeting_date)
            .unwrap_or(self.meetings.len());
        self.meetings.insert(position, meeting);
        Ok(())
    }
}
