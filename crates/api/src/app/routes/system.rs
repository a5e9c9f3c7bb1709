use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};

use crate::context::SessionContext;

pub async fn health() -> StatusCode {
    StatusCode::OK
}

pub async fn whoami(Extension(session): Extension<SessionContext>) -> impl IntoResponse {
    let principal = session.principal();
    Json(serde_json::json!({
        "principal_id": principal.id.to_string(),
        "username": principal.username,
        "display_name": principal.display_name(),
        "role": session.role().as_str(),
        "must_change_password": session.must_change_password(),
    }))
}
