use std::sync::Arc;

use axum::{
    extract::{Extension, Query},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::Utc;

use partstrack_reporting::{Audience, StockStatusResponse, TopSellersResponse};

use crate::app::dto::{AnalyticsResponse, DashboardResponse, TopPartsQuery};
use crate::app::errors;
use crate::app::services::AppServices;
use crate::context::SessionContext;

const DEFAULT_TOP_PARTS: usize = 5;
const MAX_TOP_PARTS: usize = 50;

pub async fn dashboard(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(session): Extension<SessionContext>,
) -> axum::response::Response {
    let audience = if session.is_admin() {
        Audience::Admin
    } else {
        Audience::Employee
    };

    match services.reports.dashboard(audience) {
        Ok(summary) => Json(DashboardResponse {
            site_name: services.branding().site_name.clone(),
            display_name: session.principal().display_name(),
            role: session.role(),
            summary,
        })
        .into_response(),
        Err(e) => errors::report_error_to_response(e),
    }
}

pub async fn analytics(Extension(services): Extension<Arc<AppServices>>) -> axum::response::Response {
    match services.reports.analytics() {
        Ok(summary) => Json(AnalyticsResponse {
            site_name: services.branding().site_name.clone(),
            summary,
        })
        .into_response(),
        Err(e) => errors::report_error_to_response(e),
    }
}

pub async fn stock_status(Extension(services): Extension<Arc<AppServices>>) -> axum::response::Response {
    let body = StockStatusResponse::from_result(services.reports.stock_status(), Utc::now());
    let status = if body.is_success() {
        StatusCode::OK
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };
    (status, Json(body)).into_response()
}

pub async fn top_parts(
    Extension(services): Extension<Arc<AppServices>>,
    Query(query): Query<TopPartsQuery>,
) -> axum::response::Response {
    let limit = query.limit.unwrap_or(DEFAULT_TOP_PARTS).clamp(1, MAX_TOP_PARTS);
    let body = TopSellersResponse::from_result(services.reports.top_sellers(limit), Utc::now());
    let status = if body.is_success() {
        StatusCode::OK
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };
    (status, Json(body)).into_response()
}
