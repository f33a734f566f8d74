use serde::Deserialize;
use thiserror::Error;

use shared_models::error::AppError;

#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Error, Debug)]
pub enum AuthError {
    /// Covers both unknown accounts and wrong passwords; callers must not
    /// be able to tell the two apart.
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("An account with this email already exists")]
    DuplicateEmail,

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Token error: {0}")]
    Token(String),

    #[error("Authentication is not configured")]
    NotConfigured,

    #[error("Database error: {0}")]
    Database(String),
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials => AppError::Auth(err.to_string()),
            AuthError::DuplicateEmail => AppError::Conflict(err.to_string()),
            AuthError::Validation(msg) => AppError::Validation(msg),
            AuthError::Token(msg) => AppError::Internal(msg),
            AuthError::NotConfigured => AppError::Internal(err.to_string()),
            AuthError::Database(msg) => AppError::Database(msg),
        }
    }
}
