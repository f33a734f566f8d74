use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

use shared_models::error::AppError;
use shared_models::records::Address;

pub const STAFF_COLUMNS: &str = "id,staff_ref,category,name,email,phone,image_url,address,department,shift,salary,doctor_id,joined_on,created_at,updated_at";

/// Non-doctor personnel. All six categories share one table; each keeps
/// its own sequential reference series (`ASTRA-NR-1003`, `ASTRA-PH-1001`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StaffCategory {
    Administrative,
    Nurse,
    LabTechnician,
    Pharmacist,
    It,
    Support,
}

impl StaffCategory {
    pub fn ref_prefix(&self) -> &'static str {
        match self {
            StaffCategory::Administrative => "ASTRA-AD",
            StaffCategory::Nurse => "ASTRA-NR",
            StaffCategory::LabTechnician => "ASTRA-LT",
            StaffCategory::Pharmacist => "ASTRA-PH",
            StaffCategory::It => "ASTRA-IT",
            StaffCategory::Support => "ASTRA-SP",
        }
    }

    /// Wire form used in PostgREST filters, matching the serde rename.
    pub fn as_str(&self) -> &'static str {
        match self {
            StaffCategory::Administrative => "administrative",
            StaffCategory::Nurse => "nurse",
            StaffCategory::LabTechnician => "lab_technician",
            StaffCategory::Pharmacist => "pharmacist",
            StaffCategory::It => "it",
            StaffCategory::Support => "support",
        }
    }
}

impl fmt::Display for StaffCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Shift {
    Morning,
    Evening,
    Night,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaffMember {
    pub id: Uuid,
    pub staff_ref: String,
    pub category: StaffCategory,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub image_url: Option<String>,
    pub address: Address,
    pub department: String,
    pub shift: Shift,
    pub salary: f64,
    /// Nurses can be assigned to a doctor; other categories leave this
    /// unset.
    pub doctor_id: Option<Uuid>,
    pub joined_on: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AddStaffRequest {
    pub category: StaffCategory,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: Address,
    pub department: String,
    pub shift: Shift,
    pub salary: f64,
    pub doctor_id: Option<Uuid>,
    pub joined_on: String,
    /// Optional base64 data URL; uploaded to storage before insert.
    pub image: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateStaffRequest {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<Address>,
    pub department: Option<String>,
    pub shift: Option<Shift>,
    pub salary: Option<f64>,
    pub doctor_id: Option<Uuid>,
}

#[derive(Error, Debug)]
pub enum StaffError {
    #[error("Staff member not found")]
    NotFound,

    #[error("A staff member with this email already exists")]
    DuplicateEmail,

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("External service error: {0}")]
    ExternalService(String),
}

impl From<StaffError> for AppError {
    fn from(err: StaffError) -> Self {
        match err {
            StaffError::NotFound => AppError::NotFound(err.to_string()),
            StaffError::DuplicateEmail => AppError::Conflict(err.to_string()),
            StaffError::Validation(msg) => AppError::Validation(msg),
            StaffError::Database(msg) => AppError::Database(msg),
            StaffError::ExternalService(msg) => AppError::ExternalService(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_category_keeps_its_own_prefix() {
        assert_eq!(StaffCategory::Nurse.ref_prefix(), "ASTRA-NR");
        assert_eq!(StaffCategory::LabTechnician.ref_prefix(), "ASTRA-LT");
        assert_eq!(StaffCategory::It.ref_prefix(), "ASTRA-IT");
    }

    #[test]
    fn categories_round_trip_through_their_wire_form() {
        for category in [
            StaffCategory::Administrative,
            StaffCategory::Nurse,
            StaffCategory::LabTechnician,
            StaffCategory::Pharmacist,
            StaffCategory::It,
            StaffCategory::Support,
        ] {
            let wire = serde_json::to_value(category).unwrap();
            assert_eq!(wire, serde_json::json!(category.as_str()));
        }
    }
}
