//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: facade wiring (stores + token registries)
//! - `routes/`: HTTP routes + handlers (one file per entity kind)
//! - `dto.rs`: request DTOs
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{routing::get, Extension, Router};
use tower::ServiceBuilder;

use crate::config::ApiConfig;
use crate::middleware::{self, CorrelationState};

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

use services::AppServices;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
///
/// Every route, `/health` included, runs behind the correlation middleware.
pub fn build_app(services: Arc<AppServices>, config: &ApiConfig) -> Router {
    let correlation = CorrelationState {
        header: config.request_id_header.clone(),
    };

    let api = routes::router().layer(Extension(services));

    Router::new()
        .route("/health", get(routes::system::health))
        .nest("/api/v1", api)
        .layer(ServiceBuilder::new().layer(axum::middleware::from_fn_with_state(
            correlation,
            middleware::correlation_middleware,
        )))
}
