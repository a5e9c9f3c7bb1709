use std::sync::Arc;

use axum::{
    extract::Extension,
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};

use partstrack_reporting::EXPORT_FILENAME;

use crate::app::dto::{PurchaseCandidate, PurchaseListRequest};
use crate::app::errors;
use crate::app::services::AppServices;
use crate::context::SessionContext;

pub async fn list_candidates(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(session): Extension<SessionContext>,
) -> axum::response::Response {
    if !session.is_admin() {
        return errors::forbidden("only administrators may build purchase lists");
    }

    match services.reports.reorder_candidates() {
        Ok(parts) => {
            let items: Vec<PurchaseCandidate> = parts.iter().map(PurchaseCandidate::from).collect();
            Json(items).into_response()
        }
        Err(e) => errors::report_error_to_response(e),
    }
}

/// Render the purchase list as a CSV attachment.
pub async fn export_purchase_list(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(session): Extension<SessionContext>,
    Json(body): Json<PurchaseListRequest>,
) -> axum::response::Response {
    if !session.is_admin() {
        return errors::forbidden("only administrators may build purchase lists");
    }

    let requested = match body.parse() {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    let candidates = match services.reports.reorder_candidates() {
        Ok(v) => v,
        Err(e) => return errors::report_error_to_response(e),
    };

    let rows = match services.exporter.build_export(&candidates, &requested) {
        Ok(v) => v,
        Err(e) => return errors::export_error_to_response(e),
    };

    tracing::info!(
        principal_id = %session.principal().id,
        rows = rows.len(),
        "purchase list exported"
    );

    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{EXPORT_FILENAME}\""),
            ),
        ],
        services.exporter.render_csv(&rows),
    )
        .into_response()
}
