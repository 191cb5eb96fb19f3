use crate::ward::Ward;
use std::collections::HashSet;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct WardValidationError {
    message: String,
}

impl WardValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

pub fn validate_ward(ward: &Ward) -> Result<(), WardValidationError> {
    if ward.id.trim().is_empty() {
        return Err(WardValidationError::new("ward id must not be empty"));
    }

    let required = [
        ("ward_name", &ward.ward_name),
        ("meeting_time", &ward.meeting_time),
        ("venue", &ward.venue),
    ];
    for (field, value) in required {
        if value.trim().is_empty() {
            return Err(WardValidationError::new(format!(
                "ward {} requires a non-empty {field}",
                ward.id
            )));
        }
    }

    if ward.frequency_weeks == 0 {
        return Err(WardValidationError::new(format!(
            "ward {} has invalid frequency_weeks 0 (must be at least 1)",
            ward.id
        )));
    }

    let mut dates = HashSet::with_capacity(ward.meetings.len());
    for meeting in &ward.meetings {
        if !dates.insert(meeting.meeting_date) {
            return Err(WardValidationError::new(format!(
                "ward {} has more than one meeting on {}",
                ward.id, meeting.meeting_date
            )));
        }
    }

    Ok(())
}

pub fn validate_ward_collection(wards: &[Ward]) -> Result<(), WardValidationError> {
    let mut seen_ids = HashSet::with_capacity(wards.len());
    let mut seen_names = HashSet::with_capacity(wards.len());
    for ward in wards {
        if !seen_ids.insert(ward.id.as_str()) {
            return Err(WardValidationError::new(format!(
                "duplicate ward id {}",
                ward.id
            )));
        }
        if !seen_names.insert(ward.ward_name.trim().to_lowercase()) {
            return Err(WardValidationError::new(format!(
                "duplicate ward name '{}'",
                ward.ward_name
            )));
        }
        validate_ward(ward)?;
    }
    Ok(())
}
