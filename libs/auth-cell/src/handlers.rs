use std::sync::Arc;

use axum::{
    extract::State,
    http::HeaderMap,
    Json,
};
use serde_json::{json, Value};

use shared_config::AppConfig;
use shared_models::auth::{LoginRequest, LoginResponse, Role, TokenResponse};
use shared_models::error::AppError;
use shared_utils::jwt::validate_token;

use crate::models::RegisterRequest;
use crate::services::auth::AuthService;

#[axum::debug_handler]
pub async fn admin_login(
    State(state): State<Arc<AppConfig>>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let token = AuthService::new(&state)
        .admin_login(&request.email, &request.password)
        .await?;

    Ok(Json(LoginResponse { token }))
}

#[axum::debug_handler]
pub async fn doctor_login(
    State(state): State<Arc<AppConfig>>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let token = AuthService::new(&state)
        .doctor_login(&request.email, &request.password)
        .await?;

    Ok(Json(LoginResponse { token }))
}

#[axum::debug_handler]
pub async fn user_login(
    State(state): State<Arc<AppConfig>>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let token = AuthService::new(&state)
        .patient_login(&request.email, &request.password)
        .await?;

    Ok(Json(LoginResponse { token }))
}

#[axum::debug_handler]
pub async fn user_register(
    State(state): State<Arc<AppConfig>>,
    Json(request): Json<RegisterRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let token = AuthService::new(&state).patient_register(request).await?;

    Ok(Json(LoginResponse { token }))
}

/// Validate whichever role header the caller sent and describe the
/// token back to them. Checks `atoken`, then `dtoken`, then `token`.
#[axum::debug_handler]
pub async fn validate(
    State(state): State<Arc<AppConfig>>,
    headers: HeaderMap,
) -> Result<Json<Value>, AppError> {
    let token = [Role::Admin, Role::Doctor, Role::Patient]
        .iter()
        .find_map(|role| headers.get(role.header_name()))
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| AppError::Auth("No token provided".to_string()))?;

    let user = validate_token(token, &state.supabase_jwt_secret)
        .map_err(AppError::Auth)?;

    Ok(Json(json!(TokenResponse {
        valid: true,
        user_id: user.id,
        email: user.email,
        role: Some(user.role),
    })))
}
