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
    BookAppointmentRequest, CancelAppointmentRequest, CompleteAppointmentRequest,
};
use crate::services::booking::BookingService;
use crate::services::dashboard::DashboardService;

// ==============================================================================
// PATIENT HANDLERS (token)
// ==============================================================================

#[axum::debug_handler]
pub async fn book_appointment(
    State(state): State<Arc<AppConfig>>,
    Extension(user): Extension<AuthUser>,
    Extension(token): Extension<CallerToken>,
    Json(request): Json<BookAppointmentRequest>,
) -> Result<Json<Value>, AppError> {
    let user_id = parse_caller_id(&user)?;
    let booking_service = BookingService::new(&state);

    let appointment = booking_service.book(user_id, request, &token.0).await?;

    Ok(Json(json!(appointment)))
}

#[axum::debug_handler]
pub async fn list_user_appointments(
    State(state): State<Arc<AppConfig>>,
    Extension(user): Extension<AuthUser>,
    Extension(token): Extension<CallerToken>,
) -> Result<Json<Value>, AppError> {
    let user_id = parse_caller_id(&user)?;
    let booking_service = BookingService::new(&state);

    let appointments = booking_service.user_appointments(user_id, &token.0).await?;

    Ok(Json(json!({
        "appointments": appointments,
        "total": appointments.len()
    })))
}

#[axum::debug_handler]
pub async fn cancel_appointment(
    State(state): State<Arc<AppConfig>>,
    Extension(user): Extension<AuthUser>,
    Extension(token): Extension<CallerToken>,
    Json(request): Json<CancelAppointmentRequest>,
) -> Result<Json<Value>, AppError> {
    let user_id = parse_caller_id(&user)?;
    let booking_service = BookingService::new(&state);

    let appointment = booking_service
        .cancel(user_id, request.appointment_id, &token.0)
        .await?;

    Ok(Json(json!(appointment)))
}

// ==============================================================================
// ADMIN HANDLERS (aToken)
// ==============================================================================

#[axum::debug_handler]
pub async fn list_all_appointments(
    State(state): State<Arc<AppConfig>>,
    Extension(token): Extension<CallerToken>,
) -> Result<Json<Value>, AppError> {
    let booking_service = BookingService::new(&state);

    let appointments = booking_service.all_appointments(&token.0).await?;

    Ok(Json(json!({
        "appointments": appointments,
        "total": appointments.len()
    })))
}

#[axum::debug_handler]
pub async fn admin_cancel_appointment(
    State(state): State<Arc<AppConfig>>,
    Extension(token): Extension<CallerToken>,
    Json(request): Json<CancelAppointmentRequest>,
) -> Result<Json<Value>, AppError> {
    let booking_service = BookingService::new(&state);

    let appointment = booking_service
        .admin_cancel(request.appointment_id, &token.0)
        .await?;

    Ok(Json(json!(appointment)))
}

#[axum::debug_handler]
pub async fn admin_dashboard(
    State(state): State<Arc<AppConfig>>,
    Extension(token): Extension<CallerToken>,
) -> Result<Json<Value>, AppError> {
    let dashboard_service = DashboardService::new(&state);

    let dashboard = dashboard_service.admin_dashboard(&token.0).await?;

    Ok(Json(json!(dashboard)))
}

// ==============================================================================
// DOCTOR HANDLERS (dToken)
// ==============================================================================

#[axum::debug_handler]
pub async fn list_doctor_appointments(
    State(state): State<Arc<AppConfig>>,
    Extension(user): Extension<AuthUser>,
    Extension(token): Extension<CallerToken>,
) -> Result<Json<Value>, AppError> {
    let doctor_id = parse_caller_id(&user)?;
    let booking_service = BookingService::new(&state);

    let appointments = booking_service
        .doctor_appointments(doctor_id, &token.0)
        .await?;

    Ok(Json(json!({
        "appointments": appointments,
        "total": appointments.len()
    })))
}

#[axum::debug_handler]
pub async fn doctor_cancel_appointment(
    State(state): State<Arc<AppConfig>>,
    Extension(user): Extension<AuthUser>,
    Extension(token): Extension<CallerToken>,
    Json(request): Json<CancelAppointmentRequest>,
) -> Result<Json<Value>, AppError> {
    let doctor_id = parse_caller_id(&user)?;
    let booking_service = BookingService::new(&state);

    let appointment = booking_service
        .doctor_cancel(doctor_id, request.appointment_id, &token.0)
        .await?;

    Ok(Json(json!(appointment)))
}

#[axum::debug_handler]
pub async fn complete_appointment(
    State(state): State<Arc<AppConfig>>,
    Extension(user): Extension<AuthUser>,
    Extension(token): Extension<CallerToken>,
    Json(request): Json<CompleteAppointmentRequest>,
) -> Result<Json<Value>, AppError> {
    let doctor_id = parse_caller_id(&user)?;
    let booking_service = BookingService::new(&state);

    let appointment = booking_service
        .complete(doctor_id, request.appointment_id, &token.0)
        .await?;

    Ok(Json(json!(appointment)))
}

#[axum::debug_handler]
pub async fn doctor_dashboard(
    State(state): State<Arc<AppConfig>>,
    Extension(user): Extension<AuthUser>,
    Extension(token): Extension<CallerToken>,
) -> Result<Json<Value>, AppError> {
    let doctor_id = parse_caller_id(&user)?;
    let dashboard_service = DashboardService::new(&state);

    let dashboard = dashboard_service
        .doctor_dashboard(doctor_id, &token.0)
        .await?;

    Ok(Json(json!(dashboard)))
}

fn parse_caller_id(user: &AuthUser) -> Result<Uuid, AppError> {
    Uuid::parse_str(&user.id).map_err(|_| AppError::BadRequest("Invalid caller ID".to_string()))
}
