use crate::calendar_date::CalendarDate;
use crate::seed;
use crate::ward::{Meeting, Ward, WardUpdate};
use crate::ward_validation::{self, WardValidationError};
use chrono::{NaiveDate, Utc};
use polars::prelude::PlSmallStr;
use polars::prelude::*;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RosterError {
    #[error("ward {0} not found")]
    NotFound(String),
    #[error("ward {0} already exists")]
    AlreadyExists(String),
    #[error(transparent)]
    Invalid(#[from] WardValidationError),
}

pub type RosterResult<T> = Result<T, RosterError>;

/// The set of wards the application serves, in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WardRoster {
    wards: Vec<Ward>,
}

impl WardRoster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_wards(wards: Vec<Ward>) -> RosterResult<Self> {
        ward_validation::validate_ward_collection(&wards)?;
        Ok(Self { wards })
    }

    pub fn seeded() -> Self {
        Self {
            wards: seed::default_wards(),
        }
    }

    pub fn wards(&self) -> &[Ward] {
        &self.wards
    }

    pub fn len(&self) -> usize {
        self.wards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.wards.is_empty()
    }

    pub fn get(&self, ward_id: &str) -> Option<&Ward> {
        self.wards.iter().find(|w| w.id == ward_id)
    }

    fn position(&self, ward_id: &str) -> RosterResult<usize> {
        self.wards
            .iter()
            .position(|w| w.id == ward_id)
            .ok_or_else(|| RosterError::NotFound(ward_id.to_string()))
    }

    /// Add a ward that must not exist yet.
    pub fn create(&mut self, ward: Ward) -> RosterResult<&Ward> {
        if self.get(&ward.id).is_some() {
            return Err(RosterError::AlreadyExists(ward.id));
        }
        let ward_id = ward.id.clone();
        self.upsert(ward)?;
        tracing::info!(ward_id = %ward_id, "ward created");
        let idx = self.position(&ward_id)?;
        Ok(&self.wards[idx])
    }

    /// Insert or replace a ward by id. Returns `true` when the ward is new.
    pub fn upsert(&mut self, mut ward: Ward) -> RosterResult<bool> {
        let now = Utc::now();
        let existing = self.wards.iter().position(|w| w.id == ward.id);

        let mut candidate = self.wards.clone();
        match existing {
            Some(idx) => {
                ward.created_at = ward.created_at.or(candidate[idx].created_at);
                ward.updated_at = Some(now);
                candidate[idx] = ward;
            }
            None => {
                ward.created_at.get_or_insert(now);
                ward.updated_at.get_or_insert(now);
                candidate.push(ward);
            }
        }
        ward_validation::validate_ward_collection(&candidate)?;
        self.wards = candidate;
        tracing::debug!(created = existing.is_none(), "ward upserted");
        Ok(existing.is_none())
    }

    /// Apply a partial edit. The roster is left unchanged if the edited ward is invalid or
    /// clashes with another ward.
    pub fn update(&mut self, ward_id: &str, update: WardUpdate) -> RosterResult<&Ward> {
        let idx = self.position(ward_id)?;
        let mut candidate = self.wards.clone();
        candidate[idx].apply_update(update, Utc::now())?;
        ward_validation::validate_ward_collection(&candidate)?;
        self.wards = candidate;
        tracing::info!(ward_id, "ward details updated");
        Ok(&self.wards[idx])
    }

    pub fn remove(&mut self, ward_id: &str) -> Option<Ward> {
        let idx = self.wards.iter().position(|w| w.id == ward_id)?;
        tracing::info!(ward_id, "ward removed");
        Some(self.wards.remove(idx))
    }

    pub fn record_meeting(&mut self, ward_id: &str, meeting: Meeting) -> RosterResult<()> {
        let idx = self.position(ward_id)?;
        self.wards[idx].record_meeting(meeting)?;
        tracing::info!(ward_id, "meeting recorded");
        Ok(())
    }

    /// Meeting ids are unique across the roster.
    pub fn next_meeting_id(&self) -> i64 {
        self.wards
            .iter()
            .flat_map(|w| w.meetings.iter().map(|m| m.id))
            .max()
            .unwrap_or(0)
            + 1
    }

    /// Projected meetings for every ward as a table, one row per occurrence.
    ///
    /// A ward whose schedule cannot be projected still gets a single row with a null
    /// `meeting_date`, so it stays visible to the reader.
    pub fn upcoming_table(&self, today: CalendarDate, count: usize) -> PolarsResult<DataFrame> {
        let mut ward_ids: Vec<&str> = Vec::new();
        let mut names: Vec<&str> = Vec::new();
        let mut days: Vec<&str> = Vec::new();
        let mut times: Vec<&str> = Vec::new();
        let mut venues: Vec<&str> = Vec::new();
        let mut dates: Vec<Option<i32>> = Vec::new();
        let mut next_flags: Vec<Option<bool>> = Vec::new();

        for ward in &self.wards {
            let rows: Vec<(Option<i32>, Option<bool>)> = match ward.upcoming_meetings(count, today)
            {
                Ok(occurrences) => occurrences
                    .iter()
                    .map(|o| (Some(date_to_i32(o.date)), Some(o.is_next)))
                    .collect(),
                Err(err) => {
                    tracing::warn!(ward_id = %ward.id, error = %err, "unable to project meetings");
                    vec![(None, None)]
                }
            };
            for (date, is_next) in rows {
                ward_ids.push(ward.id.as_str());
                names.push(ward.ward_name.as_str());
                days.push(ward.meeting_day.as_str());
                times.push(ward.meeting_time.as_str());
                venues.push(ward.venue.as_str());
                dates.push(date);
                next_flags.push(is_next);
            }
        }

        let columns: Vec<Column> = vec![
            Series::new(PlSmallStr::from_static("ward_id"), ward_ids).into_column(),
            Series::new(PlSmallStr::from_static("ward_name"), names).into_column(),
            Series::new(PlSmallStr::from_static("meeting_day"), days).into_column(),
            Series::new(PlSmallStr::from_static("meeting_time"), times).into_column(),
            Series::new(PlSmallStr::from_static("venue"), venues).into_column(),
            Series::new(PlSmallStr::from_static("meeting_date"), dates)
                .cast(&DataType::Date)?
                .into_column(),
            Series::new(PlSmallStr::from_static("is_next"), next_flags).into_column(),
        ];
        DataFrame::new(columns)
    }
}

fn epoch() -> NaiveDate {
    NaiveDate::from_ymd_opt(1970, 1, 1).unwrap_or_default()
}

fn date_to_i32(date: CalendarDate) -> i32 {
    (date.as_naive() - epoch()).num_days() as i32
}

/// Inverse of the Date column encoding used by [`WardRoster::upcoming_table`].
pub fn date_from_i32(days: i32) -> CalendarDate {
    CalendarDate::from(epoch() + chrono::Duration::days(days as i64))
}
