use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};

use shared_config::AppConfig;
use shared_models::auth::{CallerToken, Role};
use shared_models::error::AppError;

use crate::jwt::validate_token;

/// Admin surface: signed credential in the `atoken` header.
pub async fn admin_auth(
    State(config): State<Arc<AppConfig>>,
    request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    require_role(config, request, next, Role::Admin).await
}

/// Doctor surface: signed credential in the `dtoken` header.
pub async fn doctor_auth(
    State(config): State<Arc<AppConfig>>,
    request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    require_role(config, request, next, Role::Doctor).await
}

/// Patient surface: signed credential in the `token` header.
pub async fn patient_auth(
    State(config): State<Arc<AppConfig>>,
    request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    require_role(config, request, next, Role::Patient).await
}

async fn require_role(
    config: Arc<AppConfig>,
    mut request: Request<Body>,
    next: Next,
    role: Role,
) -> Result<Response, AppError> {
    let header_name = role.header_name();

    let token = request
        .headers()
        .get(header_name)
        .ok_or_else(|| AppError::Auth(format!("Missing {} header", header_name)))?
        .to_str()
        .map_err(|_| AppError::Auth(format!("Invalid {} header format", header_name)))?
        .to_string();

    let user = validate_token(&token, &config.supabase_jwt_secret).map_err(AppError::Auth)?;

    if user.role != role {
        return Err(AppError::Forbidden(format!(
            "{} credentials required",
            role
        )));
    }

    request.extensions_mut().insert(user);
    request.extensions_mut().insert(CallerToken(token));

    Ok(next.run(request).await)
}
