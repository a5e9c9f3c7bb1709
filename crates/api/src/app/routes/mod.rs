use axum::{
    http::StatusCode,
    routing::{get, post},
    Router,
};

use crate::app::errors;

pub mod auth;
pub mod catalog;
pub mod employees;
pub mod purchases;
pub mod reports;
pub mod system;

/// Routes open to any session, including one with a pending password change.
pub fn session_router() -> Router {
    Router::new()
        .route("/whoami", get(system::whoami))
        .route("/logout", post(auth::logout))
        .route("/force-password-change", post(auth::force_password_change))
}

/// Router for all authenticated endpoints.
pub fn router() -> Router {
    Router::new()
        .route("/dashboard", get(reports::dashboard))
        .route("/analytics", get(reports::analytics))
        .route("/api/stock-status", get(reports::stock_status))
        .route("/api/top-parts", get(reports::top_parts))
        .route("/parts", get(catalog::list_parts))
        .route("/parts/:id", get(catalog::get_part))
        .route("/sales", get(catalog::list_sales))
        .route("/suppliers", get(catalog::list_suppliers))
        .route(
            "/purchase-list",
            get(purchases::list_candidates).post(purchases::export_purchase_list),
        )
        .nest("/employees", employees::router())
}

/// Run credential hashing on the blocking pool, off the async workers.
pub(crate) async fn run_blocking<T, F>(work: F) -> Result<T, axum::response::Response>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work).await.map_err(|e| {
        tracing::error!(error = %e, "blocking task failed");
        errors::json_error(StatusCode::INTERNAL_SERVER_ERROR, "internal_error", "internal error")
    })
}
