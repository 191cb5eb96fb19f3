use super::{PersistenceError, PersistenceResult};
use crate::{
    calendar_date::{CalendarDate, parse_date},
    roster::WardRoster,
    ward::{Meeting, MeetingDay, Ward},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::Path;

#[derive(Serialize)]
struct RosterSnapshot<'a> {
    wards: &'a [Ward],
}

/// Accepted shapes when reading a roster: our own snapshot, a bare list of wards, or a
/// paginated listing as returned by the ward API.
#[derive(Deserialize)]
#[serde(untagged)]
enum RosterDocument {
    Snapshot { wards: Vec<Ward> },
    Paginated { results: Vec<Ward> },
    Bare(Vec<Ward>),
}

impl RosterDocument {
    fn into_wards(self) -> Vec<Ward> {
        match self {
            RosterDocument::Snapshot { wards } => wards,
            RosterDocument::Paginated { results } => results,
            RosterDocument::Bare(wards) => wards,
        }
    }
}

pub fn save_roster_to_json<P: AsRef<Path>>(roster: &WardRoster, path: P) -> PersistenceResult<()> {
    super::validate_wards(roster.wards())?;
    let file = File::create(path.as_ref())?;
    serde_json::to_writer_pretty(
        file,
        &RosterSnapshot {
            wards: roster.wards(),
        },
    )?;
    tracing::debug!(path = %path.as_ref().display(), wards = roster.len(), "roster saved as json");
    Ok(())
}

pub fn load_roster_from_json<P: AsRef<Path>>(path: P) -> PersistenceResult<WardRoster> {
    let file = File::open(path.as_ref())?;
    let document: RosterDocument = serde_json::from_reader(file)?;
    let roster = super::roster_from_wards(document.into_wards())?;
    tracing::debug!(
        path = %path.as_ref().display(),
        wards = roster.len(),
        "roster loaded from json"
    );
    Ok(roster)
}

#[derive(Default, Serialize, Deserialize)]
struct WardCsvRecord {
    id: String,
    ward_name: String,
    meeting_day: String,
    meeting_time: String,
    venue: String,
    frequency_weeks: u32,
    start_date: String,
    #[serde(default)]
    ward_admin: String,
    #[serde(default)]
    created_at: String,
    #[serde(default)]
    updated_at: String,
    #[serde(default)]
    meetings_json: String,
}

impl TryFrom<&Ward> for WardCsvRecord {
    type Error = PersistenceError;

    fn try_from(ward: &Ward) -> PersistenceResult<Self> {
        let meetings_json = if ward.meetings.is_empty() {
            String::new()
        } else {
            serde_json::to_string(&ward.meetings)?
        };
        Ok(Self {
            id: ward.id.clone(),
            ward_name: ward.ward_name.clone(),
            meeting_day: ward.meeting_day.as_str().to_string(),
            meeting_time: ward.meeting_time.clone(),
            venue: ward.venue.clone(),
            frequency_weeks: ward.frequency_weeks,
            start_date: ward.start_date.to_string(),
            ward_admin: ward.ward_admin.clone().unwrap_or_default(),
            created_at: format_timestamp(ward.created_at),
            updated_at: format_timestamp(ward.updated_at),
            meetings_json,
        })
    }
}

impl WardCsvRecord {
    fn into_ward(self) -> PersistenceResult<Ward> {
        let meeting_day = MeetingDay::from_name(&self.meeting_day).ok_or_else(|| {
            PersistenceError::InvalidData(format!("invalid meeting_day '{}'", self.meeting_day))
        })?;
        let mut ward = Ward::new(
            self.id,
            self.ward_name,
            meeting_day,
            self.meeting_time,
            self.venue,
            parse_csv_date(&self.start_date)?,
        );
        ward.frequency_weeks = self.frequency_weeks;
        ward.ward_admin = parse_string_option(self.ward_admin);
        ward.created_at = parse_timestamp(&self.created_at)?;
        ward.updated_at = parse_timestamp(&self.updated_at)?;
        ward.meetings = if self.meetings_json.trim().is_empty() {
            Vec::new()
        } else {
            serde_json::from_str::<Vec<Meeting>>(&self.meetings_json).map_err(|err| {
                PersistenceError::InvalidData(format!("invalid meetings for {}: {err}", ward.id))
            })?
        };
        Ok(ward)
    }
}

pub fn save_roster_to_csv<P: AsRef<Path>>(roster: &WardRoster, path: P) -> PersistenceResult<()> {
    super::validate_wards(roster.wards())?;
    let file = File::create(path.as_ref())?;
    let mut writer = csv::Writer::from_writer(file);
    for ward in roster.wards() {
        writer.serialize(WardCsvRecord::try_from(ward)?)?;
    }
    writer.flush()?;
    tracing::debug!(path = %path.as_ref().display(), wards = roster.len(), "roster saved as csv");
    Ok(())
}

pub fn load_roster_from_csv<P: AsRef<Path>>(path: P) -> PersistenceResult<WardRoster> {
    let file = File::open(path.as_ref())?;
    let mut reader = csv::Reader::from_reader(file);
    let mut wards = Vec::new();
    for record in reader.deserialize::<WardCsvRecord>() {
        wards.push(record?.into_ward()?);
    }

    if wards.is_empty() {
        return Err(PersistenceError::InvalidData(
            "CSV file contained no wards".into(),
        ));
    }

    super::roster_from_wards(wards)
}

fn parse_csv_date(input: &str) -> PersistenceResult<CalendarDate> {
    parse_date(input.trim())
        .map_err(|e| PersistenceError::InvalidData(format!("invalid date '{input}': {e}")))
}

fn format_timestamp(value: Option<DateTime<Utc>>) -> String {
    value.map(|ts| ts.to_rfc3339()).unwrap_or_default()
}

fn parse_timestamp(input: &str) -> PersistenceResult<Option<DateTime<Utc>>> {
    if input.trim().is_empty() {
        return Ok(None);
    }
    DateTime::parse_from_rfc3339(input.trim())
        .map(|ts| Some(ts.with_timezone(&Utc)))
        .map_err(|e| PersistenceError::InvalidData(format!("invalid timestamp '{input}': {e}")))
}

fn parse_string_option(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}
