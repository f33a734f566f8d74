use std::sync::Arc;

use axum::{routing::get, Router};

use shared_config::AppConfig;

use crate::handlers;

/// Routes nested at `/api/auth`. The role-specific login endpoints live
/// on the role routers instead.
pub fn auth_routes() -> Router<Arc<AppConfig>> {
    Router::new().route("/validate", get(handlers::validate))
}
