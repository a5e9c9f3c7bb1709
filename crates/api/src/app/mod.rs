//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: backend wiring (stores, lifecycle manager, reports)
//! - `routes/`: HTTP routes + handlers (one file per area)
//! - `dto.rs`: request/response DTOs and JSON mapping helpers
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Extension, Router,
};
use tower::ServiceBuilder;

use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

pub use services::{AppServices, Backends, build_services};

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub fn build_app(services: Arc<AppServices>) -> Router {
    // Reachable while a forced password change is pending.
    let session = routes::session_router()
        .route_layer(Extension(services.clone()))
        .route_layer(axum::middleware::from_fn_with_state(
            services.clone(),
            middleware::auth_middleware,
        ));

    // Everything else requires a settled password.
    let protected = routes::router()
        .route_layer(Extension(services.clone()))
        .route_layer(
            ServiceBuilder::new()
                .layer(axum::middleware::from_fn_with_state(
                    services.clone(),
                    middleware::auth_middleware,
                ))
                .layer(axum::middleware::from_fn(middleware::require_current_password)),
        );

    Router::new()
        .route("/health", get(routes::system::health))
        .route("/login", post(routes::auth::login))
        .route_layer(Extension(services))
        .merge(session)
        .merge(protected)
}
