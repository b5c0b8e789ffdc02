//! Raw form input and its validation into [`SessionDetails`].

use chrono::NaiveTime;

use crate::error::ValidationError;
use crate::types::SessionDetails;

/// Session fields exactly as typed by the user, before any parsing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionInput {
    pub time_of_day: String,
    pub wind_speed: String,
    pub wind_direction: String,
    pub tide: String,
    pub equipment: String,
    pub distance: String,
    pub notes: Option<String>,
}

impl SessionInput {
    /// Validate every field, rejecting anything that would poison the store.
    pub fn validate(&self) -> Result<SessionDetails, ValidationError> {
        Ok(SessionDetails {
            time_of_day: parse_time_of_day(&self.time_of_day)?,
            wind_speed: parse_number("wind speed", &self.wind_speed)?,
            wind_direction: required_text("wind direction", &self.wind_direction)?,
            tide: required_text("tide", &self.tide)?,
            equipment: required_text("equipment", &self.equipment)?,
            distance: parse_number("distance", &self.distance)?,
            notes: self.notes.clone().unwrap_or_default(),
        })
    }
}

impl From<&SessionDetails> for SessionInput {
    /// Pre-fill a form from an existing session, as an edit starts out.
    fn from(details: &SessionDetails) -> Self {
        Self {
            time_of_day: details.time_of_day.clone(),
            wind_speed: details.wind_speed.to_string(),
            wind_direction: details.wind_direction.clone(),
            tide: details.tide.clone(),
            equipment: details.equipment.clone(),
            distance: details.distance.to_string(),
            notes: Some(details.notes.clone()),
        }
    }
}

fn required_text(field: &'static str, value: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::MissingField { field });
    }
    Ok(trimmed.to_string())
}

fn parse_number(field: &'static str, value: &str) -> Result<f64, ValidationError> {
    let trimmed = required_text(field, value)?;
    trimmed
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
        .ok_or(ValidationError::InvalidNumericField {
            field,
            value: trimmed,
        })
}

// Stored zero-padded so that lexicographic order is chronological order.
fn parse_time_of_day(value: &str) -> Result<String, ValidationError> {
    let trimmed = required_text("time of day", value)?;
    match NaiveTime::parse_from_str(&trimmed, "%H:%M") {
        Ok(time) => Ok(time.format("%H:%M").to_string()),
        Err(_) => Err(ValidationError::InvalidTimeOfDay(trimmed)),
    }
}
