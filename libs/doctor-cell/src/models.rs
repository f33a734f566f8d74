use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;
use uuid::Uuid;

use shared_models::error::AppError;
use shared_models::records::Address;

/// Columns safe to hand back to callers. Credential lookups select the
/// password column explicitly and never through this list.
pub const DOCTOR_COLUMNS: &str = "id,name,email,image_url,specialty,degree,experience,about,fee,available,address,slots_booked,created_at,updated_at";

/// Listing column set: also leaves out the `slots_booked` bookkeeping
/// map, which is internal to the booking flow.
pub const DOCTOR_LISTING_COLUMNS: &str = "id,name,email,image_url,specialty,degree,experience,about,fee,available,address,created_at,updated_at";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Doctor {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub image_url: Option<String>,
    pub specialty: String,
    pub degree: String,
    pub experience: String,
    pub about: String,
    pub fee: f64,
    pub available: bool,
    pub address: Address,
    /// Slot-date string (`d_m_yyyy`) to already-reserved time-of-day strings.
    #[serde(default)]
    pub slots_booked: HashMap<String, Vec<String>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Doctor {
    /// The doctor minus the slot bookkeeping map: embedded into
    /// appointments at booking time and served in listing responses.
    pub fn snapshot(&self) -> serde_json::Value {
        let mut value = serde_json::json!(self);
        if let Some(obj) = value.as_object_mut() {
            obj.remove("slots_booked");
        }
        value
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DoctorCredentials {
    pub id: Uuid,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddDoctorRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub specialty: String,
    pub degree: String,
    pub experience: String,
    pub about: String,
    pub fee: f64,
    pub address: Address,
    /// Optional base64 data URL; uploaded to storage before insert.
    pub image: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateDoctorProfileRequest {
    pub fee: Option<f64>,
    pub address: Option<Address>,
    pub about: Option<String>,
    pub available: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChangeAvailabilityRequest {
    pub doctor_id: Uuid,
}

#[derive(Error, Debug)]
pub enum DoctorError {
    #[error("Doctor not found")]
    NotFound,

    #[error("Doctor is not available")]
    NotAvailable,

    #[error("Slot {slot_time} on {slot_date} is already booked")]
    SlotTaken { slot_date: String, slot_time: String },

    #[error("A doctor with this email already exists")]
    DuplicateEmail,

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("External service error: {0}")]
    ExternalService(String),
}

impl From<DoctorError> for AppError {
    fn from(err: DoctorError) -> Self {
        match err {
            DoctorError::NotFound => AppError::NotFound(err.to_string()),
            DoctorError::NotAvailable => AppError::Conflict(err.to_string()),
            DoctorError::SlotTaken { .. } => AppError::Conflict(err.to_string()),
            DoctorError::DuplicateEmail => AppError::Conflict(err.to_string()),
            DoctorError::Validation(msg) => AppError::Validation(msg),
            DoctorError::Database(msg) => AppError::Database(msg),
            DoctorError::ExternalService(msg) => AppError::ExternalService(msg),
        }
    }
}
