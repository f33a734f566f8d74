use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;

use shared_models::error::AppError;

pub const APPOINTMENT_COLUMNS: &str = "id,user_id,doctor_id,slot_date,slot_time,user_data,doc_data,amount,booked_at,cancelled,is_completed,payment";

/// An appointment carries denormalized snapshots of both parties as they
/// were at booking time; later profile edits do not rewrite history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appointment {
    pub id: Uuid,
    pub user_id: Uuid,
    pub doctor_id: Uuid,
    /// `d_m_yyyy` date string, e.g. `20_1_2026`.
    pub slot_date: String,
    /// Time-of-day string, e.g. `10:00 am`.
    pub slot_time: String,
    pub user_data: Value,
    pub doc_data: Value,
    pub amount: f64,
    pub booked_at: DateTime<Utc>,
    pub cancelled: bool,
    pub is_completed: bool,
    pub payment: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BookAppointmentRequest {
    pub doctor_id: Uuid,
    pub slot_date: String,
    pub slot_time: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CancelAppointmentRequest {
    pub appointment_id: Uuid,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CompleteAppointmentRequest {
    pub appointment_id: Uuid,
}

/// Admin dashboard payload: collection counts plus the five most
/// recently booked appointments.
#[derive(Debug, Clone, Serialize)]
pub struct AdminDashboard {
    pub doctors: i64,
    pub patients: i64,
    pub appointments: i64,
    pub latest_appointments: Vec<Appointment>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DoctorDashboard {
    pub earnings: f64,
    pub appointments: i64,
    pub patients: i64,
    pub latest_appointments: Vec<Appointment>,
}

#[derive(Error, Debug)]
pub enum AppointmentError {
    #[error("Appointment not found")]
    NotFound,

    #[error("Appointment does not belong to the caller")]
    NotOwned,

    #[error("Appointment is already cancelled")]
    AlreadyCancelled,

    #[error("Validation error: {0}")]
    Validation(String),

    #[error(transparent)]
    Doctor(#[from] doctor_cell::models::DoctorError),

    #[error(transparent)]
    Patient(#[from] patient_cell::models::PatientError),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<AppointmentError> for AppError {
    fn from(err: AppointmentError) -> Self {
        match err {
            AppointmentError::NotFound => AppError::NotFound(err.to_string()),
            AppointmentError::NotOwned => AppError::Forbidden(err.to_string()),
            AppointmentError::AlreadyCancelled => AppError::Conflict(err.to_string()),
            AppointmentError::Validation(msg) => AppError::Validation(msg),
            AppointmentError::Doctor(inner) => inner.into(),
            AppointmentError::Patient(inner) => inner.into(),
            AppointmentError::Database(msg) => AppError::Database(msg),
        }
    }
}
