use std::sync::Arc;

use axum::{
    extract::{Extension, State},
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_models::auth::{AuthUser, CallerToken};
use shared_models::error::AppError;

use crate::models::{AvatarUpload, UpdateProfileRequest};
use crate::services::patient::PatientService;

// ==============================================================================
// PATIENT HANDLERS (token)
// ==============================================================================

#[axum::debug_handler]
pub async fn get_profile(
    State(state): State<Arc<AppConfig>>,
    Extension(user): Extension<AuthUser>,
    Extension(token): Extension<CallerToken>,
) -> Result<Json<Value>, AppError> {
    let patient_id = parse_patient_id(&user)?;
    let patient_service = PatientService::new(&state);

    let patient = patient_service.get_profile(patient_id, &token.0).await?;

    Ok(Json(json!(patient)))
}

#[axum::debug_handler]
pub async fn update_profile(
    State(state): State<Arc<AppConfig>>,
    Extension(user): Extension<AuthUser>,
    Extension(token): Extension<CallerToken>,
    Json(request): Json<UpdateProfileRequest>,
) -> Result<Json<Value>, AppError> {
    let patient_id = parse_patient_id(&user)?;
    let patient_service = PatientService::new(&state);

    let patient = patient_service
        .update_profile(patient_id, request, &token.0)
        .await?;

    Ok(Json(json!(patient)))
}

#[axum::debug_handler]
pub async fn upload_avatar(
    State(state): State<Arc<AppConfig>>,
    Extension(user): Extension<AuthUser>,
    Extension(token): Extension<CallerToken>,
    Json(request): Json<AvatarUpload>,
) -> Result<Json<Value>, AppError> {
    let patient_id = parse_patient_id(&user)?;
    let patient_service = PatientService::new(&state);

    let image_url = patient_service
        .upload_avatar(patient_id, &request.image, &token.0)
        .await?;

    Ok(Json(json!({ "image_url": image_url })))
}

fn parse_patient_id(user: &AuthUser) -> Result<Uuid, AppError> {
    Uuid::parse_str(&user.id).map_err(|_| AppError::BadRequest("Invalid patient ID".to_string()))
}
