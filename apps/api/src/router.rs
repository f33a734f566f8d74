use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use auth_cell::handlers as auth;
use auth_cell::router::auth_routes;
use shared_config::AppConfig;
use shared_utils::extractor::{admin_auth, doctor_auth, patient_auth};
use staff_cell::router::staff_routes;

pub fn create_router(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", get(|| async { "AstraCare API is running!" }))
        .nest("/api/auth", auth_routes())
        .nest("/api/admin", admin_routes(state.clone()))
        .nest("/api/doctor", doctor_routes(state.clone()))
        .nest("/api/user", user_routes(state.clone()))
        .with_state(state)
}

/// Admin surface: login is open, everything else requires an `atoken`.
fn admin_routes(state: Arc<AppConfig>) -> Router<Arc<AppConfig>> {
    let protected = Router::new()
        .route(
            "/doctors",
            post(doctor_cell::handlers::add_doctor).get(doctor_cell::handlers::all_doctors),
        )
        .route(
            "/change-availability",
            post(doctor_cell::handlers::admin_change_availability),
        )
        .route(
            "/appointments",
            get(appointment_cell::handlers::list_all_appointments),
        )
        .route(
            "/cancel-appointment",
            post(appointment_cell::handlers::admin_cancel_appointment),
        )
        .route("/dashboard", get(appointment_cell::handlers::admin_dashboard))
        .layer(middleware::from_fn_with_state(state.clone(), admin_auth));

    Router::new()
        .route("/login", post(auth::admin_login))
        // Staff routes guard themselves with the same admin middleware.
        .nest("/staff", staff_routes(state))
        .merge(protected)
}

/// Doctor surface: login and the public directory are open, the rest
/// requires a `dtoken`.
fn doctor_routes(state: Arc<AppConfig>) -> Router<Arc<AppConfig>> {
    let protected = Router::new()
        .route(
            "/appointments",
            get(appointment_cell::handlers::list_doctor_appointments),
        )
        .route(
            "/cancel-appointment",
            post(appointment_cell::handlers::doctor_cancel_appointment),
        )
        .route(
            "/complete-appointment",
            post(appointment_cell::handlers::complete_appointment),
        )
        .route(
            "/change-availability",
            post(doctor_cell::handlers::doctor_change_availability),
        )
        .route(
            "/profile",
            get(doctor_cell::handlers::doctor_profile)
                .patch(doctor_cell::handlers::update_doctor_profile),
        )
        .route("/dashboard", get(appointment_cell::handlers::doctor_dashboard))
        .layer(middleware::from_fn_with_state(state, doctor_auth));

    Router::new()
        .route("/login", post(auth::doctor_login))
        .route("/list", get(doctor_cell::handlers::list_doctors_public))
        .merge(protected)
}

/// Patient surface: register and login are open, the rest requires a
/// `token`.
fn user_routes(state: Arc<AppConfig>) -> Router<Arc<AppConfig>> {
    let protected = Router::new()
        .route(
            "/profile",
            get(patient_cell::handlers::get_profile).patch(patient_cell::handlers::update_profile),
        )
        .route("/upload-avatar", post(patient_cell::handlers::upload_avatar))
        .route(
            "/book-appointment",
            post(appointment_cell::handlers::book_appointment),
        )
        .route(
            "/appointments",
            get(appointment_cell::handlers::list_user_appointments),
        )
        .route(
            "/cancel-appointment",
            post(appointment_cell::handlers::cancel_appointment),
        )
        .layer(middleware::from_fn_with_state(state, patient_auth));

    Router::new()
        .route("/register", post(auth::user_register))
        .route("/login", post(auth::user_login))
        .merge(protected)
}
