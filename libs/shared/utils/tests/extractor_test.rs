use std::sync::Arc;

use axum::{
    extract::Extension,
    http::{Request, StatusCode},
    middleware,
    routing::get,
    body::Body,
    Router,
};
use tower::ServiceExt;

use shared_models::auth::AuthUser;
use shared_utils::extractor::{admin_auth, doctor_auth};
use shared_utils::test_utils::{JwtTestUtils, TestConfig, TestUser};

async fn whoami(Extension(user): Extension<AuthUser>) -> String {
    format!("{}:{}", user.role, user.id)
}

fn admin_app(config: &TestConfig) -> Router {
    let state = config.to_arc();
    Router::new()
        .route("/", get(whoami))
        .layer(middleware::from_fn_with_state(state.clone(), admin_auth))
        .with_state(state)
}

fn doctor_app(config: &TestConfig) -> Router {
    let state = config.to_arc();
    Router::new()
        .route("/", get(whoami))
        .layer(middleware::from_fn_with_state(state.clone(), doctor_auth))
        .with_state(state)
}

#[tokio::test]
async fn valid_atoken_reaches_the_handler() {
    let config = TestConfig::default();
    let user = TestUser::admin("admin@astracare.test");
    let token = JwtTestUtils::create_test_token(&user, &config.jwt_secret, None);

    let response = admin_app(&config)
        .oneshot(
            Request::builder()
                .uri("/")
                .header("atoken", token)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn missing_header_is_unauthorized() {
    let config = TestConfig::default();

    let response = admin_app(&config)
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn patient_token_on_the_doctor_surface_is_forbidden() {
    let config = TestConfig::default();
    let user = TestUser::patient("patient@example.com");
    let token = JwtTestUtils::create_test_token(&user, &config.jwt_secret, None);

    let response = doctor_app(&config)
        .oneshot(
            Request::builder()
                .uri("/")
                .header("dtoken", token)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn expired_token_is_unauthorized() {
    let config = TestConfig::default();
    let user = TestUser::admin("admin@astracare.test");
    let token = JwtTestUtils::create_expired_token(&user, &config.jwt_secret);

    let response = admin_app(&config)
        .oneshot(
            Request::builder()
                .uri("/")
                .header("atoken", token)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn forged_signature_is_unauthorized() {
    let config = TestConfig::default();
    let user = TestUser::admin("admin@astracare.test");
    let token = JwtTestUtils::create_invalid_signature_token(&user);

    let response = admin_app(&config)
        .oneshot(
            Request::builder()
                .uri("/")
                .header("atoken", token)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn malformed_token_is_unauthorized() {
    let config = TestConfig::default();

    let response = admin_app(&config)
        .oneshot(
            Request::builder()
                .uri("/")
                .header("atoken", JwtTestUtils::create_malformed_token())
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn role_and_id_flow_through_extensions() {
    let config = TestConfig::default();
    let user = TestUser::doctor("doc@example.com");
    let token = JwtTestUtils::create_test_token(&user, &config.jwt_secret, None);

    let response = doctor_app(&config)
        .oneshot(
            Request::builder()
                .uri("/")
                .header("dtoken", token)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&body[..], format!("doctor:{}", user.id).as_bytes());
}
