use std::sync::Arc;

use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};

use crate::app::dto::{LoginRequest, LoginResponse, PasswordChangeRequest};
use crate::app::errors;
use crate::app::routes::run_blocking;
use crate::app::services::AppServices;
use crate::context::SessionContext;

pub async fn login(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<LoginRequest>,
) -> axum::response::Response {
    let result = match run_blocking(move || {
        services.lifecycle.authenticate(&body.identifier, &body.password)
    })
    .await
    {
        Ok(result) => result,
        Err(resp) => return resp,
    };

    match result {
        Ok(outcome) => (StatusCode::OK, Json(LoginResponse::from(outcome))).into_response(),
        Err(e) => errors::auth_error_to_response(e),
    }
}

pub async fn logout(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(session): Extension<SessionContext>,
) -> axum::response::Response {
    match services.lifecycle.logout(session.token()) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::auth_error_to_response(e),
    }
}

/// Set a new password. The session ends; the client must log in again.
pub async fn force_password_change(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(session): Extension<SessionContext>,
    Json(body): Json<PasswordChangeRequest>,
) -> axum::response::Response {
    let result = match run_blocking(move || {
        services.lifecycle.complete_password_change(
            session.session(),
            &body.new_password,
            &body.confirm_password,
        )
    })
    .await
    {
        Ok(result) => result,
        Err(resp) => return resp,
    };

    match result {
        Ok(()) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "message": "password changed; please log in again",
                "next": "/login",
            })),
        )
            .into_response(),
        Err(e) => errors::validation_error_to_response(e),
    }
}
