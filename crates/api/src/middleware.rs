use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
};

use partstrack_auth::SessionToken;

use crate::app::errors;
use crate::app::services::AppServices;
use crate::context::SessionContext;

/// Resolve the bearer token to a live session and attach it to the request.
pub async fn auth_middleware(
    State(services): State<Arc<AppServices>>,
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Result<Response, Response> {
    let token = extract_bearer(req.headers()).map_err(|status| {
        errors::json_error(status, "unauthenticated", "missing or malformed bearer token")
    })?;

    let session = services
        .lifecycle
        .resolve_session(&SessionToken::new(token))
        .map_err(errors::auth_error_to_response)?;

    req.extensions_mut().insert(SessionContext::new(session));

    Ok(next.run(req).await)
}

/// Block everything but the password change while a forced change is pending.
///
/// Must run after [`auth_middleware`].
pub async fn require_current_password(
    req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Result<Response, Response> {
    let pending = req
        .extensions()
        .get::<SessionContext>()
        .map(SessionContext::must_change_password)
        .ok_or_else(|| {
            errors::json_error(StatusCode::UNAUTHORIZED, "unauthenticated", "no session")
        })?;

    if pending {
        return Err(errors::json_error(
            StatusCode::FORBIDDEN,
            "password_change_required",
            "you must change your password before continuing",
        ));
    }

    Ok(next.run(req).await)
}

fn extract_bearer(headers: &HeaderMap) -> Result<&str, StatusCode> {
    let header = headers
        .get(axum::http::header::AUTHORIZATION)
        .ok_or(StatusCode::UNAUTHORIZED)?;

    let header = header.to_str().map_err(|_| StatusCode::UNAUTHORIZED)?;

    let header = header
        .strip_prefix("Bearer ")
        .ok_or(StatusCode::UNAUTHORIZED)?;

    let token = header.trim();
    if token.is_empty() {
        return Err(StatusCode::UNAUTHORIZED);
    }

    Ok(token)
}
