//! API error types with HTTP response mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use domain::DomainError;
use projections::ProjectionError;

/// API-level error type that maps to HTTP responses.
#[derive(Debug)]
pub enum ApiError {
    /// Resource not found.
    NotFound(String),
    /// Bad request from the client.
    BadRequest(String),
    /// Domain rule or lookup failure.
    Domain(DomainError),
    /// Read model failure.
    Projection(ProjectionError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Domain(err) => (domain_status(&err), err.to_string()),
            ApiError::Projection(err) => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
        };

        if status.is_server_error() {
            tracing::error!(error = %message, "internal server error");
        } else {
            metrics::counter!("api_rejections_total", "status" => status.as_str().to_owned())
                .increment(1);
        }

        let body = serde_json::json!({ "error": message });
        (status, axum::Json(body)).into_response()
    }
}

fn domain_status(err: &DomainError) -> StatusCode {
    match err {
        DomainError::NotFound { .. } => StatusCode::NOT_FOUND,
        DomainError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        DomainError::InvalidTransition { .. }
        | DomainError::StaleStatus { .. }
        | DomainError::Conflict(_)
        | DomainError::NoCapacity { .. } => StatusCode::CONFLICT,
        DomainError::Serialization(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        ApiError::Domain(err)
    }
}

impl From<ProjectionError> for ApiError {
    fn from(err: ProjectionError) -> Self {
        ApiError::Projection(err)
    }
}
