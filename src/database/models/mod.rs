pub mod patient;
pub mod veterinarian;

use bson::oid::ObjectId;
use chrono::{DateTime, NaiveDate, Utc};

pub use patient::{Patient, PatientChanges, PatientCreate, PatientField, PatientFilter, PatientUpdate};
pub use veterinarian::{LoginRequest, Veterinarian, VeterinarianRegister};

/// Errors raised while turning client input into documents
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("Invalid JSON format: {0}")]
    InvalidJson(String),
    #[error("Field '{field}' must be {expected}")]
    InvalidType { field: String, expected: &'static str },
    #[error("Invalid date format for field '{field}': {value}")]
    InvalidDate { field: String, value: String },
    #[error("Fields cannot be updated: {}", .0.join(", "))]
    FieldsNotUpdatable(Vec<String>),
    #[error("No fields to update")]
    NoChanges,
}

/// Parses a store-native object id: exactly 24 hex characters.
pub fn parse_object_id(value: &str) -> Option<ObjectId> {
    if value.len() != 24 || !value.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    ObjectId::parse_str(value).ok()
}

/// Accepts RFC 3339 timestamps or plain `YYYY-MM-DD` dates (midnight UTC).
pub fn parse_date(field: &str, value: &str) -> Result<bson::DateTime, ModelError> {
    let trimmed = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(bson::DateTime::from_chrono(dt.with_timezone(&Utc)));
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| bson::DateTime::from_chrono(naive.and_utc()))
        .ok_or_else(|| ModelError::InvalidDate {
            field: field.to_string(),
            value: value.to_string(),
        })
}
