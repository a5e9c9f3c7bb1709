use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};

use partstrack_auth::{ContactUpdate, ProvisionRequest};
use partstrack_core::PrincipalId;

use crate::app::dto::{EmployeeResponse, ProvisionResponse};
use crate::app::errors;
use crate::app::routes::run_blocking;
use crate::app::services::AppServices;
use crate::context::SessionContext;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_employees).post(provision_employee))
        .route("/:id", post(update_employee))
        .route("/:id/deactivate", post(deactivate_employee))
}

fn parse_principal_id(raw: &str) -> Result<PrincipalId, axum::response::Response> {
    raw.parse()
        .map_err(|_| errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid employee id"))
}

pub async fn list_employees(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(session): Extension<SessionContext>,
) -> axum::response::Response {
    if !session.is_admin() {
        return errors::forbidden("only administrators may list employees");
    }

    match services.lifecycle.list_employees() {
        Ok(accounts) => {
            let items: Vec<EmployeeResponse> = accounts.into_iter().map(EmployeeResponse::from).collect();
            Json(items).into_response()
        }
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn provision_employee(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(session): Extension<SessionContext>,
    Json(body): Json<ProvisionRequest>,
) -> axum::response::Response {
    if !session.is_admin() {
        return errors::forbidden("only administrators may create employees");
    }

    let result = match run_blocking(move || services.lifecycle.provision_employee(body)).await {
        Ok(result) => result,
        Err(resp) => return resp,
    };

    match result {
        Ok(provisioned) => (StatusCode::CREATED, Json(ProvisionResponse::from(provisioned))).into_response(),
        Err(e) => errors::provision_error_to_response(e),
    }
}

pub async fn update_employee(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(session): Extension<SessionContext>,
    Path(id): Path<String>,
    Json(body): Json<ContactUpdate>,
) -> axum::response::Response {
    let id = match parse_principal_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.lifecycle.update_employee(id, session.principal(), body) {
        Ok(account) => Json(EmployeeResponse::from(account)).into_response(),
        Err(e) => errors::employee_update_error_to_response(e),
    }
}

pub async fn deactivate_employee(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(session): Extension<SessionContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match parse_principal_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.lifecycle.deactivate(id, session.principal()) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::deactivation_error_to_response(e),
    }
}
