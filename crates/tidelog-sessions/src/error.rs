use thiserror::Error;

use crate::date_key::DateKey;

/// Errors raised by [`crate::SessionStore`] operations.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("No session at position {index} on {date} ({len} stored)")]
    IndexOutOfRange {
        date: DateKey,
        index: usize,
        len: usize,
    },

    #[error("No session with id {id} on {date}")]
    SessionNotFound { date: DateKey, id: String },

    #[error("Stored data is malformed: {0}")]
    MalformedStoreBlob(#[from] serde_json::Error),
}

/// Errors raised when user input is turned into a session.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{field} is required")]
    MissingField { field: &'static str },

    #[error("{field} must be a number, got {value:?}")]
    InvalidNumericField { field: &'static str, value: String },

    #[error("Time of day must be HH:MM, got {0:?}")]
    InvalidTimeOfDay(String),
}

/// A date string that is not a valid `YYYY-MM-DD` calendar date.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid date {input:?} (expected YYYY-MM-DD)")]
pub struct DateKeyError {
    pub input: String,
}
