use axum::{extract::Extension, http::StatusCode};

use crate::context::CorrelationContext;

pub async fn health(Extension(correlation): Extension<CorrelationContext>) -> StatusCode {
    tracing::debug!(
        correlation_id = correlation.correlation_id().value(),
        "health check"
    );
    StatusCode::OK
}
