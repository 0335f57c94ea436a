//! # Error Responses
//!
//! Conversion of [`AppError`] into HTTP responses.
//!
//! Handlers return `error::Result<T>`; the `IntoResponse` impl below turns
//! any surfaced error into the standard JSON error envelope.

use axum::{body::Body, http::StatusCode, response::Response};

use crate::{response::ApiResponse, AppError};

/// Error handler that converts errors to HTTP responses.
#[derive(Clone)]
pub struct ErrorHandler {
    /// Whether to include error details in response.
    pub include_details: bool,
}

impl ErrorHandler {
    /// Create a new error handler.
    #[inline]
    pub fn new(include_details: bool) -> Self {
        Self {
            include_details,
        }
    }

    /// Convert an error to a response.
    ///
    /// Server-side failures (5xx) never leak internals unless
    /// `include_details` is set; client errors keep their message.
    pub fn to_response(&self, err: &AppError) -> Response {
        let status = err.status();
        let message = if self.include_details || !status.is_server_error() {
            err.message()
        }
        else {
            "Internal server error".to_string()
        };

        if status.is_server_error() {
            tracing::error!(code = err.code(), error = %err, "request failed");
        }

        let response = ApiResponse::<()>::error(err.code(), message);
        let body = serde_json::to_string(&response).unwrap_or_default();

        Response::builder()
            .status(status)
            .header("Content-Type", "application/json")
            .body(Body::from(body))
            .unwrap_or_else(|_| {
                Response::new(Body::from(
                    "{\"status\":\"error\",\"code\":\"INTERNAL_ERROR\",\"message\":\"Internal server error\"}",
                ))
            })
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> Response { ErrorHandler::new(false).to_response(&self) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_handler_not_found() {
        let handler = ErrorHandler::new(false);
        let err = AppError::not_found("User not found");
        let response = handler.to_response(&err);

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_error_handler_hides_internal_details() {
        let handler = ErrorHandler::new(false);
        let err = AppError::internal("secret detail");
        let response = handler.to_response(&err);

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_error_handler_with_details() {
        let handler = ErrorHandler::new(true);
        let err = AppError::database("constraint violated");
        let response = handler.to_response(&err);

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_invalid_state_maps_to_conflict() {
        let handler = ErrorHandler::new(false);
        let err = AppError::invalid_state("point is still open");
        let response = handler.to_response(&err);

        assert_eq!(response.status(), StatusCode::CONFLICT);
    }
}
