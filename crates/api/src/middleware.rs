use axum::{
    extract::State,
    http::{HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};
use tracing::Instrument;

use erpbench_core::{CorrelationId, CorrelationOutcome};

use crate::context::CorrelationContext;

#[derive(Clone)]
pub struct CorrelationState {
    pub header: HeaderName,
}

/// Attach a normalized correlation id to the request.
///
/// Never rejects: a malformed or out-of-range id is clamped or defaulted and
/// the request proceeds with its normal status.
pub async fn correlation_middleware(
    State(state): State<CorrelationState>,
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Response {
    let supplied = req.headers().get(&state.header).cloned();
    let correlation = CorrelationId::from_header(supplied.as_ref().map(HeaderValue::as_bytes));

    if matches!(
        correlation.outcome(),
        CorrelationOutcome::Clamped | CorrelationOutcome::Defaulted
    ) {
        tracing::warn!(
            raw = correlation.raw(),
            normalized = correlation.value(),
            outcome = ?correlation.outcome(),
            "correlation id normalized"
        );
    }

    let span = tracing::info_span!(
        "request",
        method = %req.method(),
        path = %req.uri().path(),
        correlation_id = correlation.value(),
    );

    req.extensions_mut()
        .insert(CorrelationContext::new(correlation.clone()));

    let mut response = next.run(req).instrument(span).await;

    // A numeric id is echoed as normalized; an unusable one goes back as sent.
    let echo = match correlation.outcome() {
        CorrelationOutcome::Parsed | CorrelationOutcome::Clamped => {
            Some(HeaderValue::from(correlation.value()))
        }
        CorrelationOutcome::Defaulted => supplied,
        CorrelationOutcome::Absent => None,
    };
    if let Some(value) = echo {
        response.headers_mut().insert(state.header.clone(), value);
    }

    response
}
