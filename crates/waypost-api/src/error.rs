//! API error types and plain-text error responses.
//!
//! Every per-request failure ends here: handlers return `ApiError` and
//! axum turns it into a status code plus a short text message.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// API error type that maps to HTTP status codes and text responses.
#[derive(Debug)]
pub enum ApiError {
    /// 400 Bad Request - malformed or missing client input.
    BadRequest(String),
    /// 401 Unauthorized - missing or wrong shared secret.
    Unauthorized,
    /// 404 Not Found - lookup miss.
    NotFound(String),
    /// 405 Method Not Allowed.
    MethodNotAllowed,
    /// 500 Internal Server Error - storage or relay failure.
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::BadRequest(msg) | ApiError::NotFound(msg) | ApiError::Internal(msg) => {
                f.write_str(msg)
            }
            ApiError::Unauthorized => f.write_str("unauthorized"),
            ApiError::MethodNotAllowed => f.write_str("Invalid request method"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), self.to_string()).into_response()
    }
}
