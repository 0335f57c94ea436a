//! # API Response Types
//!
//! Generic API response types for the fieldserve application.
//! Provides a consistent response format for all API endpoints.
//!
//! ## Response Format
//!
//! ```json
//! {
//!   "status": "error",
//!   "code": "NOT_FOUND",
//!   "message": "Resource not found"
//! }
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// API response metadata.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct ResponseMeta {
    /// Request ID for correlation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,

    /// Response timestamp.
    #[serde(skip)]
    pub timestamp: DateTime<Utc>,
}

/// API response type.
///
/// The generic envelope used for all API responses, with a status tag,
/// data, and optional metadata. Success payloads are usually returned
/// directly; the error arm is the wire format every failed request gets.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", tag = "status")]
pub enum ApiResponse<T> {
    /// Success response.
    Success {
        /// Response data.
        data: T,

        /// Response metadata.
        #[serde(flatten, skip_serializing_if = "Option::is_none")]
        meta: Option<ResponseMeta>,
    },

    /// Error response.
    Error {
        /// Error code.
        code: String,

        /// Error message.
        message: String,

        /// Error details.
        #[serde(skip_serializing_if = "Option::is_none")]
        details: Option<serde_json::Value>,

        /// Request ID for correlation.
        #[serde(skip_serializing_if = "Option::is_none")]
        request_id: Option<String>,

        /// Response metadata.
        #[serde(flatten, skip_serializing_if = "Option::is_none")]
        meta: Option<ResponseMeta>,
    },
}

impl<T: Default> ApiResponse<T> {
    /// Create a success response with data.
    #[inline]
    pub fn ok(data: T) -> Self {
        ApiResponse::Success {
            data,
            meta: Some(ResponseMeta::default()),
        }
    }

    /// Create an error response.
    #[inline]
    pub fn error(code: impl ToString, message: impl ToString) -> Self {
        ApiResponse::Error {
            code:       code.to_string(),
            message:    message.to_string(),
            details:    None,
            request_id: None,
            meta:       Some(ResponseMeta::default()),
        }
    }

    /// Get a reference to the data if this is a success response.
    #[inline]
    pub fn data(&self) -> Option<&T> {
        match self {
            ApiResponse::Success {
                data,
                ..
            } => Some(data),
            ApiResponse::Error {
                ..
            } => None,
        }
    }

    /// Check if this is a success response.
    #[inline]
    pub fn is_success(&self) -> bool { matches!(self, ApiResponse::Success { .. }) }

    /// Check if this is an error response.
    #[inline]
    pub fn is_error(&self) -> bool { matches!(self, ApiResponse::Error { .. }) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_ok() {
        let response = ApiResponse::ok("test data");
        match response {
            ApiResponse::Success {
                data,
                meta,
            } => {
                assert_eq!(data, "test data");
                assert!(meta.is_some());
            },
            _ => panic!("Expected success response"),
        }
    }

    #[test]
    fn test_response_error() {
        let response: ApiResponse<()> = ApiResponse::error("NOT_FOUND", "Resource not found");
        match response {
            ApiResponse::Error {
                code,
                message,
                details,
                ..
            } => {
                assert_eq!(code, "NOT_FOUND");
                assert_eq!(message, "Resource not found");
                assert!(details.is_none());
            },
            _ => panic!("Expected error response"),
        }
    }

    #[test]
    fn test_response_serialization() {
        let response = ApiResponse::ok("test");
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"status\":\"success\""));
        assert!(json.contains("\"data\":\"test\""));
    }

    #[test]
    fn test_response_error_serialization() {
        let response: ApiResponse<()> = ApiResponse::error("NOT_FOUND", "Not found");
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"status\":\"error\""));
        assert!(json.contains("\"code\":\"NOT_FOUND\""));
        assert!(json.contains("\"message\":\"Not found\""));
    }

    #[test]
    fn test_is_success_is_error() {
        let response_ok = ApiResponse::ok("data");
        let response_err: ApiResponse<()> = ApiResponse::error("CODE", "msg");

        assert!(response_ok.is_success());
        assert!(!response_ok.is_error());
        assert!(response_err.is_error());
        assert!(!response_err.is_success());
    }
}
