use tracing::{info, warn};

use doctor_cell::services::doctor::DoctorService;
use patient_cell::models::CreatePatientRecord;
use patient_cell::services::patient::PatientService;
use shared_config::AppConfig;
use shared_models::auth::Role;
use shared_utils::jwt::issue_token;
use shared_utils::password::{check_password_strength, hash_password, verify_password};
use shared_utils::validation::is_valid_email;

use crate::models::{AuthError, RegisterRequest};

/// Subject claim of admin tokens. The admin is a single configured
/// identity, not a database row.
pub const ADMIN_SUBJECT: &str = "admin";

pub struct AuthService<'a> {
    config: &'a AppConfig,
}

impl<'a> AuthService<'a> {
    pub fn new(config: &'a AppConfig) -> Self {
        Self { config }
    }

    /// Check credentials against the configured admin identity and issue
    /// an `atoken`.
    pub async fn admin_login(&self, email: &str, password: &str) -> Result<String, AuthError> {
        if !self.config.is_admin_configured() {
            warn!("Admin login attempted without admin credentials configured");
            return Err(AuthError::NotConfigured);
        }

        if email != self.config.admin_email || password != self.config.admin_password {
            return Err(AuthError::InvalidCredentials);
        }

        info!("Admin logged in");
        self.issue(ADMIN_SUBJECT, Role::Admin, Some(email))
    }

    /// Check credentials against the doctors table and issue a `dtoken`.
    pub async fn doctor_login(&self, email: &str, password: &str) -> Result<String, AuthError> {
        let doctor_service = DoctorService::new(self.config);
        let credentials = doctor_service
            .find_credentials(email)
            .await
            .map_err(|e| AuthError::Database(e.to_string()))?
            .ok_or(AuthError::InvalidCredentials)?;

        let verified = verify_password(password, &credentials.password)
            .map_err(|e| AuthError::Database(e.to_string()))?;
        if !verified {
            return Err(AuthError::InvalidCredentials);
        }

        info!("Doctor {} logged in", credentials.id);
        self.issue(&credentials.id.to_string(), Role::Doctor, Some(email))
    }

    /// Check credentials against the patients table and issue a `token`.
    pub async fn patient_login(&self, email: &str, password: &str) -> Result<String, AuthError> {
        let patient_service = PatientService::new(self.config);
        let credentials = patient_service
            .find_credentials(email)
            .await
            .map_err(|e| AuthError::Database(e.to_string()))?
            .ok_or(AuthError::InvalidCredentials)?;

        let verified = verify_password(password, &credentials.password)
            .map_err(|e| AuthError::Database(e.to_string()))?;
        if !verified {
            return Err(AuthError::InvalidCredentials);
        }

        info!("Patient {} logged in", credentials.id);
        self.issue(&credentials.id.to_string(), Role::Patient, Some(email))
    }

    /// Self-service registration: validate, hash, create the patient row,
    /// and log the new account straight in.
    pub async fn patient_register(&self, request: RegisterRequest) -> Result<String, AuthError> {
        if request.name.trim().is_empty() {
            return Err(AuthError::Validation("Name is required".to_string()));
        }
        if !is_valid_email(&request.email) {
            return Err(AuthError::Validation("Invalid email address".to_string()));
        }
        check_password_strength(&request.password).map_err(AuthError::Validation)?;

        let password_hash =
            hash_password(&request.password).map_err(|e| AuthError::Database(e.to_string()))?;

        let patient_service = PatientService::new(self.config);
        let patient = patient_service
            .create_patient(CreatePatientRecord {
                name: request.name,
                email: request.email,
                password_hash,
            })
            .await
            .map_err(|e| match e {
                patient_cell::models::PatientError::DuplicateEmail => AuthError::DuplicateEmail,
                other => AuthError::Database(other.to_string()),
            })?;

        self.issue(&patient.id.to_string(), Role::Patient, Some(&patient.email))
    }

    fn issue(&self, subject: &str, role: Role, email: Option<&str>) -> Result<String, AuthError> {
        issue_token(
            subject,
            role,
            email,
            &self.config.supabase_jwt_secret,
            self.config.token_ttl_hours,
        )
        .map_err(AuthError::Token)
    }
}
