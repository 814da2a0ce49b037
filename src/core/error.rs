//! Error type system for Quest Boom
//!
//! One error enum covers the whole backend, with:
//! - HTTP status code mapping for the REST layer
//! - JSON error bodies carrying a trace ID
//! - Conversions from the persistence and I/O layers

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Main error type for the Quest Boom backend
#[derive(Debug, thiserror::Error)]
pub enum BoomError {
    // System-level errors
    #[error("System initialization failed: {0}")]
    InitializationError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Database error: {0}")]
    DatabaseError(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    // API-level errors
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Authentication failed: {0}")]
    AuthenticationError(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    // Outbound notification errors
    #[error("Notification error: {0}")]
    NotificationError(String),

    // Blocking task errors
    #[error("Task error: {0}")]
    TaskError(String),
}

impl BoomError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            // 400 Bad Request
            BoomError::InvalidRequest(_) | BoomError::ValidationError(_) => {
                StatusCode::BAD_REQUEST
            }

            // 401 Unauthorized
            BoomError::AuthenticationError(_) => StatusCode::UNAUTHORIZED,

            // 403 Forbidden
            BoomError::PermissionDenied(_) => StatusCode::FORBIDDEN,

            // 404 Not Found
            BoomError::NotFound(_) => StatusCode::NOT_FOUND,

            // 500 Internal Server Error
            BoomError::InitializationError(_)
            | BoomError::ConfigError(_)
            | BoomError::DatabaseError(_)
            | BoomError::IoError(_)
            | BoomError::NotificationError(_)
            | BoomError::TaskError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error type name for API responses
    pub fn error_type(&self) -> &'static str {
        match self {
            BoomError::InitializationError(_) => "InitializationError",
            BoomError::ConfigError(_) => "ConfigError",
            BoomError::DatabaseError(_) => "DatabaseError",
            BoomError::IoError(_) => "IoError",
            BoomError::InvalidRequest(_) => "InvalidRequest",
            BoomError::ValidationError(_) => "ValidationError",
            BoomError::AuthenticationError(_) => "AuthenticationError",
            BoomError::PermissionDenied(_) => "PermissionDenied",
            BoomError::NotFound(_) => "NotFound",
            BoomError::NotificationError(_) => "NotificationError",
            BoomError::TaskError(_) => "TaskError",
        }
    }
}

/// Error response structure for API endpoints
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error type identifier
    pub error: String,
    /// Human-readable error message
    pub message: String,
    /// Unique trace ID for this error
    pub trace_id: String,
}

impl ErrorResponse {
    /// Create a new error response with a generated trace ID
    pub fn new(error: String, message: String) -> Self {
        Self {
            error,
            message,
            trace_id: Uuid::new_v4().to_string(),
        }
    }

    /// Create an error response from a BoomError
    pub fn from_error(error: &BoomError) -> Self {
        Self::new(error.error_type().to_string(), error.to_string())
    }
}

/// Implement IntoResponse for BoomError to enable automatic error handling in Axum
impl IntoResponse for BoomError {
    fn into_response(self) -> Response {
        let status_code = self.status_code();
        let error_response = ErrorResponse::from_error(&self);

        tracing::error!(
            error_type = self.error_type(),
            trace_id = %error_response.trace_id,
            status_code = %status_code,
            "Request failed: {}",
            self
        );

        (status_code, Json(error_response)).into_response()
    }
}

/// Result type alias for operations that can fail with BoomError
pub type Result<T> = std::result::Result<T, BoomError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_codes() {
        assert_eq!(
            BoomError::InvalidRequest("test".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            BoomError::ValidationError("test".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            BoomError::AuthenticationError("test".into()).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            BoomError::PermissionDenied("test".into()).status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            BoomError::NotFound("test".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            BoomError::DatabaseError(rusqlite::Error::InvalidQuery).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            BoomError::NotificationError("test".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_error_types() {
        assert_eq!(
            BoomError::PermissionDenied("test".into()).error_type(),
            "PermissionDenied"
        );
        assert_eq!(
            BoomError::ValidationError("test".into()).error_type(),
            "ValidationError"
        );
        assert_eq!(BoomError::NotFound("test".into()).error_type(), "NotFound");
    }

    #[test]
    fn test_error_response_creation() {
        let error = BoomError::NotFound("request abc-123".into());
        let response = ErrorResponse::from_error(&error);

        assert_eq!(response.error, "NotFound");
        assert!(response.message.contains("abc-123"));
        assert!(!response.trace_id.is_empty());
    }
}
