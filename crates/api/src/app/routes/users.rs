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
        .route("/", post(register_user))
        .route("/:token", get(get_user))
        .route("/:token/disable", post(disable_user))
}

pub async fn register_user(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(correlation): Extension<CorrelationContext>,
    Json(body): Json<dto::RegisterUserRequest>,
) -> axum::response::Response {
    let result = services.with_correlation(correlation.correlation_id(), |svc| {
        svc.register_user(&body.display_name, &body.email)
    });

    match result {
        Ok(view) => (StatusCode::CREATED, Json(view)).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

/// Public view of a user. Raw integers, unknown tokens and disabled users
/// all answer 404.
pub async fn get_user(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(correlation): Extension<CorrelationContext>,
    path: Result<Path<String>, PathRejection>,
) -> axum::response::Response {
    let token = match path_token(path) {
        Ok(token) => token,
        Err(res) => return res,
    };
    match services.with_correlation(correlation.correlation_id(), |svc| svc.get_user_view(&token)) {
        Ok(view) => Json(view).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn disable_user(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(correlation): Extension<CorrelationContext>,
    path: Result<Path<String>, PathRejection>,
) -> axum::response::Response {
    let token = match path_token(path) {
        Ok(token) => token,
        Err(res) => return res,
    };
    match services.with_correlation(correlation.correlation_id(), |svc| svc.disable_user(&token)) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}
