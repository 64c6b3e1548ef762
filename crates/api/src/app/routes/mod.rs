use axum::extract::{rejection::PathRejection, Path};
use axum::Router;

use erpbench_infra::ServiceError;

use crate::app::errors;

pub mod items;
pub mod system;
pub mod users;

/// Router for the versioned entity endpoints.
pub fn router() -> Router {
    Router::new()
        .nest("/items", items::router())
        .nest("/users", users::router())
}

/// Token from a `/:token` segment.
///
/// A segment the extractor cannot decode answers the same 404 as an unknown
/// token.
pub(crate) fn path_token(
    path: Result<Path<String>, PathRejection>,
) -> Result<String, axum::response::Response> {
    match path {
        Ok(Path(token)) => Ok(token),
        Err(rejection) => {
            tracing::debug!(error = %rejection, "undecodable token segment");
            Err(errors::service_error_to_response(ServiceError::NotFound))
        }
    }
}
