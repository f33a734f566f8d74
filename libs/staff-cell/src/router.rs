use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use shared_config::AppConfig;
use shared_utils::extractor::admin_auth;

use crate::handlers;

/// Staff roster routes, nested under the admin surface. Every route
/// requires an `atoken`.
pub fn staff_routes(state: Arc<AppConfig>) -> Router<Arc<AppConfig>> {
    Router::new()
        .route("/", post(handlers::add_staff).get(handlers::list_staff))
        .route(
            "/{id}",
            get(handlers::get_staff)
                .patch(handlers::update_staff)
                .delete(handlers::delete_staff),
        )
        .layer(middleware::from_fn_with_state(state, admin_auth))
}
