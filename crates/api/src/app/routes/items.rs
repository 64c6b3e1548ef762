use std::sync::Arc;

use axum::{
    extract::{rejection::PathRejection, Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};

use crate::app::{dto, errors};
use crate::app::routes::path_token;
use crate::app::services::AppServices;
use crate::context::CorrelationContext;

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_item))
        .route("/:token", get(get_item).delete(delete_item))
}

pub async fn create_item(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(correlation): Extension<CorrelationContext>,
    Json(body): Json<dto::CreateItemRequest>,
) -> axum::response::Response {
    let description = body.description.unwrap_or_default();
    let result = services.with_correlation(correlation.correlation_id(), |svc| {
        svc.create_item(&body.name, &description)
    });

    match result {
        Ok(view) => (StatusCode::CREATED, Json(view)).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn get_item(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(correlation): Extension<CorrelationContext>,
    path: Result<Path<String>, PathRejection>,
) -> axum::response::Response {
    let token = match path_token(path) {
        Ok(token) => token,
        Err(res) => return res,
    };
    match services.with_correlation(correlation.correlation_id(), |svc| svc.get_item(&token)) {
        Ok(view) => Json(view).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn delete_item(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(correlation): Extension<CorrelationContext>,
    path: Result<Path<String>, PathRejection>,
) -> axum::response::Response {
    let token = match path_token(path) {
        Ok(token) => token,
        Err(res) => return res,
    };
    match services.with_correlation(correlation.correlation_id(), |svc| svc.delete_item(&token)) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}
