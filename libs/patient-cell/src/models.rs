use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use shared_models::error::AppError;
use shared_models::records::{Address, EmergencyContact};

pub const PATIENT_COLUMNS: &str =
    "id,patient_ref,name,email,image_url,phone,gender,dob,address,emergency_contact,created_at,updated_at";

/// Prefix of the sequential human-readable patient reference.
pub const PATIENT_REF_PREFIX: &str = "ASTRA-PT";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Patient {
    pub id: Uuid,
    pub patient_ref: String,
    pub name: String,
    pub email: String,
    pub image_url: Option<String>,
    pub phone: String,
    pub gender: String,
    pub dob: String,
    pub address: Address,
    pub emergency_contact: Option<EmergencyContact>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Patient {
    /// Snapshot embedded into appointments at booking time.
    pub fn snapshot(&self) -> serde_json::Value {
        serde_json::json!(self)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PatientCredentials {
    pub id: Uuid,
    pub password: String,
}

/// Internal creation request; the password arrives already hashed from
/// the registration flow.
#[derive(Debug, Clone)]
pub struct CreatePatientRecord {
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub gender: Option<String>,
    pub dob: Option<String>,
    pub address: Option<Address>,
    pub emergency_contact: Option<EmergencyContact>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AvatarUpload {
    /// Base64 data URL.
    pub image: String,
}

#[derive(Error, Debug)]
pub enum PatientError {
    #[error("Patient not found")]
    NotFound,

    #[error("An account with this email already exists")]
    DuplicateEmail,

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("External service error: {0}")]
    ExternalService(String),
}

impl From<PatientError> for AppError {
    fn from(err: PatientError) -> Self {
        match err {
            PatientError::NotFound => AppError::NotFound(err.to_string()),
            PatientError::DuplicateEmail => AppError::Conflict(err.to_string()),
            PatientError::Validation(msg) => AppError::Validation(msg),
            PatientError::Database(msg) => AppError::Database(msg),
            PatientError::ExternalService(msg) => AppError::ExternalService(msg),
        }
    }
}
