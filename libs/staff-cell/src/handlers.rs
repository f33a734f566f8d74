use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_models::auth::CallerToken;
use shared_models::error::AppError;

use crate::models::{AddStaffRequest, StaffCategory, UpdateStaffRequest};
use crate::services::staff::StaffService;

#[derive(Debug, Deserialize)]
pub struct ListStaffQuery {
    pub category: Option<StaffCategory>,
}

#[axum::debug_handler]
pub async fn add_staff(
    State(state): State<Arc<AppConfig>>,
    Extension(token): Extension<CallerToken>,
    Json(request): Json<AddStaffRequest>,
) -> Result<Json<Value>, AppError> {
    let staff_service = StaffService::new(&state);

    let staff = staff_service.add_staff(request, &token.0).await?;

    Ok(Json(json!(staff)))
}

#[axum::debug_handler]
pub async fn list_staff(
    State(state): State<Arc<AppConfig>>,
    Extension(token): Extension<CallerToken>,
    Query(query): Query<ListStaffQuery>,
) -> Result<Json<Value>, AppError> {
    let staff_service = StaffService::new(&state);

    let staff = staff_service.list_staff(query.category, &token.0).await?;

    Ok(Json(json!({
        "staff": staff,
        "total": staff.len()
    })))
}

#[axum::debug_handler]
pub async fn get_staff(
    State(state): State<Arc<AppConfig>>,
    Extension(token): Extension<CallerToken>,
    Path(staff_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let staff_service = StaffService::new(&state);

    let staff = staff_service.get_staff(staff_id, &token.0).await?;

    Ok(Json(json!(staff)))
}

#[axum::debug_handler]
pub async fn update_staff(
    State(state): State<Arc<AppConfig>>,
    Extension(token): Extension<CallerToken>,
    Path(staff_id): Path<Uuid>,
    Json(request): Json<UpdateStaffRequest>,
) -> Result<Json<Value>, AppError> {
    let staff_service = StaffService::new(&state);

    let staff = staff_service.update_staff(staff_id, request, &token.0).await?;

    Ok(Json(json!(staff)))
}

#[axum::debug_handler]
pub async fn delete_staff(
    State(state): State<Arc<AppConfig>>,
    Extension(token): Extension<CallerToken>,
    Path(staff_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let staff_service = StaffService::new(&state);

    staff_service.delete_staff(staff_id, &token.0).await?;

    Ok(Json(json!({ "deleted": staff_id })))
}
