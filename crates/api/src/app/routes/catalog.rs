use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use partstrack_core::PartId;
use partstrack_inventory::{InventoryCatalog, classify};
use partstrack_reporting::{Audience, PartListing};

use crate::app::dto::SuppliersResponse;
use crate::app::errors;
use crate::app::services::AppServices;
use crate::context::SessionContext;

fn audience_of(session: &SessionContext) -> Audience {
    if session.is_admin() {
        Audience::Admin
    } else {
        Audience::Employee
    }
}

pub async fn list_parts(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(session): Extension<SessionContext>,
) -> axum::response::Response {
    match services.reports.parts_overview(audience_of(&session)) {
        Ok(overview) => Json(overview).into_response(),
        Err(e) => errors::report_error_to_response(e),
    }
}

pub async fn get_part(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let Ok(id) = id.parse::<PartId>() else {
        return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid part id");
    };

    match services.catalog.part(id) {
        Ok(Some(part)) => Json(PartListing {
            level: classify(&part),
            part,
        })
        .into_response(),
        Ok(None) => errors::json_error(StatusCode::NOT_FOUND, "not_found", "part not found"),
        Err(e) => errors::catalog_error_to_response(e),
    }
}

pub async fn list_sales(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(session): Extension<SessionContext>,
) -> axum::response::Response {
    if !session.is_admin() {
        return errors::forbidden("only administrators may view sales");
    }

    match services.reports.sales_overview() {
        Ok(overview) => Json(overview).into_response(),
        Err(e) => errors::report_error_to_response(e),
    }
}

/// Suppliers ordered by name.
pub async fn list_suppliers(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(session): Extension<SessionContext>,
) -> axum::response::Response {
    if !session.is_admin() {
        return errors::forbidden("only administrators may view suppliers");
    }

    match services.catalog.suppliers() {
        Ok(suppliers) => Json(SuppliersResponse::from(suppliers)).into_response(),
        Err(e) => errors::catalog_error_to_response(e),
    }
}
