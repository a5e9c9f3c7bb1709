use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;
use tracing::{error, warn};

use partstrack_auth::{
    AuthError, DeactivationError, EmployeeUpdateError, ProvisionError, StoreError, ValidationError,
};
use partstrack_inventory::CatalogError;
use partstrack_reporting::{ExportError, ReportError};

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

pub fn forbidden(message: impl Into<String>) -> axum::response::Response {
    json_error(StatusCode::FORBIDDEN, "forbidden", message)
}

pub fn store_error_to_response(err: StoreError) -> axum::response::Response {
    error!(error = %err, "account store failure");
    json_error(StatusCode::INTERNAL_SERVER_ERROR, "store_error", err.to_string())
}

/// Inactive accounts get the same body as bad credentials.
pub fn auth_error_to_response(err: AuthError) -> axum::response::Response {
    match err {
        AuthError::InvalidCredentials | AuthError::InactiveAccount => {
            json_error(StatusCode::UNAUTHORIZED, "invalid_credentials", err.to_string())
        }
        AuthError::Store(e) => store_error_to_response(e),
    }
}

pub fn provision_error_to_response(err: ProvisionError) -> axum::response::Response {
    match err {
        ProvisionError::Invalid(msg) => json_error(StatusCode::BAD_REQUEST, "validation_error", msg),
        ProvisionError::DuplicateUsername | ProvisionError::DuplicateEmail => {
            json_error(StatusCode::CONFLICT, "conflict", err.to_string())
        }
        ProvisionError::MailDeliveryFailed(_) => {
            warn!(error = %err, "provisioning aborted");
            json_error(StatusCode::BAD_GATEWAY, "mail_delivery_failed", err.to_string())
        }
        ProvisionError::Credential(e) => {
            error!(error = %e, "credential hashing failed");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "credential_error", e.to_string())
        }
        ProvisionError::Store(e) => store_error_to_response(e),
    }
}

pub fn deactivation_error_to_response(err: DeactivationError) -> axum::response::Response {
    match err {
        DeactivationError::Forbidden => forbidden(err.to_string()),
        DeactivationError::CannotDeactivateSuperAdmin => {
            json_error(StatusCode::FORBIDDEN, "cannot_deactivate_super_admin", err.to_string())
        }
        DeactivationError::NotFound => json_error(StatusCode::NOT_FOUND, "not_found", err.to_string()),
        DeactivationError::Store(e) => store_error_to_response(e),
    }
}

pub fn validation_error_to_response(err: ValidationError) -> axum::response::Response {
    match err {
        ValidationError::Empty | ValidationError::Mismatch => {
            json_error(StatusCode::BAD_REQUEST, "validation_error", err.to_string())
        }
        ValidationError::Credential(e) => {
            error!(error = %e, "credential hashing failed");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "credential_error", e.to_string())
        }
        ValidationError::Store(e) => store_error_to_response(e),
    }
}

pub fn employee_update_error_to_response(err: EmployeeUpdateError) -> axum::response::Response {
    match err {
        EmployeeUpdateError::Forbidden => forbidden(err.to_string()),
        EmployeeUpdateError::NotFound => json_error(StatusCode::NOT_FOUND, "not_found", err.to_string()),
        EmployeeUpdateError::DuplicateEmail => json_error(StatusCode::CONFLICT, "conflict", err.to_string()),
        EmployeeUpdateError::Store(e) => store_error_to_response(e),
    }
}

pub fn catalog_error_to_response(err: CatalogError) -> axum::response::Response {
    match err {
        CatalogError::Unavailable(_) => {
            error!(error = %err, "catalog read failed");
            json_error(StatusCode::SERVICE_UNAVAILABLE, "catalog_unavailable", err.to_string())
        }
        CatalogError::DuplicateNumber(_) => json_error(StatusCode::CONFLICT, "conflict", err.to_string()),
    }
}

pub fn report_error_to_response(err: ReportError) -> axum::response::Response {
    json_error(StatusCode::INTERNAL_SERVER_ERROR, "aggregation_failure", err.to_string())
}

pub fn export_error_to_response(err: ExportError) -> axum::response::Response {
    match err {
        ExportError::InvalidQuantity { .. } => {
            json_error(StatusCode::BAD_REQUEST, "invalid_quantity", err.to_string())
        }
    }
}
