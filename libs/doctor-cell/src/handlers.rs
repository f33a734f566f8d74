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

use crate::models::{
    AddDoctorRequest, ChangeAvailabilityRequest, Doctor, UpdateDoctorProfileRequest,
};
use crate::services::doctor::DoctorService;

// ==============================================================================
// PUBLIC HANDLERS
// ==============================================================================

/// Doctor list for the patient portal; no credentials required. The
/// rows go out as snapshots, so the slot bookkeeping map stays private.
#[axum::debug_handler]
pub async fn list_doctors_public(
    State(state): State<Arc<AppConfig>>,
) -> Result<Json<Value>, AppError> {
    let doctor_service = DoctorService::new(&state);

    let doctors = doctor_service.list_doctors(None).await?;

    Ok(Json(json!({
        "doctors": doctors.iter().map(Doctor::snapshot).collect::<Vec<_>>(),
        "total": doctors.len()
    })))
}

// ==============================================================================
// ADMIN HANDLERS (aToken)
// ==============================================================================

#[axum::debug_handler]
pub async fn add_doctor(
    State(state): State<Arc<AppConfig>>,
    Extension(token): Extension<CallerToken>,
    Json(request): Json<AddDoctorRequest>,
) -> Result<Json<Value>, AppError> {
    let doctor_service = DoctorService::new(&state);

    let doctor = doctor_service.add_doctor(request, &token.0).await?;

    Ok(Json(json!(doctor)))
}

#[axum::debug_handler]
pub async fn all_doctors(
    State(state): State<Arc<AppConfig>>,
    Extension(token): Extension<CallerToken>,
) -> Result<Json<Value>, AppError> {
    let doctor_service = DoctorService::new(&state);

    let doctors = doctor_service.list_doctors(Some(&token.0)).await?;

    Ok(Json(json!({
        "doctors": doctors.iter().map(Doctor::snapshot).collect::<Vec<_>>(),
        "total": doctors.len()
    })))
}

#[axum::debug_handler]
pub async fn admin_change_availability(
    State(state): State<Arc<AppConfig>>,
    Extension(token): Extension<CallerToken>,
    Json(request): Json<ChangeAvailabilityRequest>,
) -> Result<Json<Value>, AppError> {
    let doctor_service = DoctorService::new(&state);

    let available = doctor_service
        .change_availability(request.doctor_id, &token.0)
        .await?;

    Ok(Json(json!({ "doctor_id": request.doctor_id, "available": available })))
}

// ==============================================================================
// DOCTOR HANDLERS (dToken)
// ==============================================================================

#[axum::debug_handler]
pub async fn doctor_change_availability(
    State(state): State<Arc<AppConfig>>,
    Extension(user): Extension<AuthUser>,
    Extension(token): Extension<CallerToken>,
) -> Result<Json<Value>, AppError> {
    let doctor_id = parse_doctor_id(&user)?;
    let doctor_service = DoctorService::new(&state);

    let available = doctor_service
        .change_availability(doctor_id, &token.0)
        .await?;

    Ok(Json(json!({ "doctor_id": doctor_id, "available": available })))
}

#[axum::debug_handler]
pub async fn doctor_profile(
    State(state): State<Arc<AppConfig>>,
    Extension(user): Extension<AuthUser>,
    Extension(token): Extension<CallerToken>,
) -> Result<Json<Value>, AppError> {
    let doctor_id = parse_doctor_id(&user)?;
    let doctor_service = DoctorService::new(&state);

    let doctor = doctor_service.get_doctor(doctor_id, Some(&token.0)).await?;

    Ok(Json(json!(doctor)))
}

#[axum::debug_handler]
pub async fn update_doctor_profile(
    State(state): State<Arc<AppConfig>>,
    Extension(user): Extension<AuthUser>,
    Extension(token): Extension<CallerToken>,
    Json(request): Json<UpdateDoctorProfileRequest>,
) -> Result<Json<Value>, AppError> {
    let doctor_id = parse_doctor_id(&user)?;
    let doctor_service = DoctorService::new(&state);

    let doctor = doctor_service
        .update_profile(doctor_id, request, &token.0)
        .await?;

    Ok(Json(json!(doctor)))
}

fn parse_doctor_id(user: &AuthUser) -> Result<Uuid, AppError> {
    Uuid::parse_str(&user.id).map_err(|_| AppError::BadRequest("Invalid doctor ID".to_string()))
}
