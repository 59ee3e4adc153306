//! Unified error handling for the Nido booking backend
//!
//! This module provides a single error type covering all failure scenarios
//! in the application, with automatic HTTP response mapping. Business-rule
//! failures (capacity, slot conflicts, illegal transitions) are expected
//! outcomes mapped to 4xx; only storage and configuration failures are
//! surfaced as 5xx.

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

/// Main application error type
///
/// All errors in the application should be converted to this type.
/// It implements `ResponseError` for automatic HTTP response generation.
#[derive(Error, Debug)]
pub enum AppError {
    // ==================== Database Errors ====================
    #[error("Database error: {0}")]
    Database(String),

    #[error("Database pool error: {0}")]
    Pool(String),

    #[error("Transaction failed: {0}")]
    Transaction(String),

    // ==================== Authentication Errors ====================
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: insufficient permissions")]
    Forbidden,

    // ==================== Booking Errors ====================
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Space is not available for booking: {0}")]
    Unavailable(String),

    #[error("Hosts cannot book their own space")]
    SelfBooking,

    #[error("Guest count {requested} exceeds space capacity of {max}")]
    Capacity { requested: i32, max: i32 },

    #[error("The requested time slot is not available")]
    SlotUnavailable,

    #[error("Invalid time range: {0}")]
    InvalidRange(String),

    #[error("Status transition from {from} to {to} is not permitted")]
    InvalidTransition { from: String, to: String },

    // ==================== Validation Errors ====================
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    // ==================== Internal Errors ====================
    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl AppError {
    /// Returns the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            // 400 Bad Request
            AppError::Validation(_)
            | AppError::InvalidInput(_)
            | AppError::InvalidRange(_)
            | AppError::SelfBooking
            | AppError::Capacity { .. }
            | AppError::Unavailable(_) => StatusCode::BAD_REQUEST,

            // 401 Unauthorized
            AppError::InvalidCredentials | AppError::InvalidToken(_) | AppError::TokenExpired => {
                StatusCode::UNAUTHORIZED
            }

            // 403 Forbidden
            AppError::Forbidden | AppError::Unauthorized(_) => StatusCode::FORBIDDEN,

            // 404 Not Found
            AppError::NotFound(_) => StatusCode::NOT_FOUND,

            // 409 Conflict
            AppError::SlotUnavailable | AppError::InvalidTransition { .. } => StatusCode::CONFLICT,

            // 500 Internal Server Error
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns the error code for API responses
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::Database(_) => "database_error",
            AppError::Pool(_) => "pool_error",
            AppError::Transaction(_) => "transaction_error",
            AppError::InvalidCredentials => "invalid_credentials",
            AppError::TokenExpired => "token_expired",
            AppError::InvalidToken(_) => "invalid_token",
            AppError::Unauthorized(_) => "unauthorized",
            AppError::Forbidden => "forbidden",
            AppError::NotFound(_) => "not_found",
            AppError::Unavailable(_) => "space_unavailable",
            AppError::SelfBooking => "self_booking",
            AppError::Capacity { .. } => "capacity_exceeded",
            AppError::SlotUnavailable => "slot_unavailable",
            AppError::InvalidRange(_) => "invalid_range",
            AppError::InvalidTransition { .. } => "invalid_transition",
            AppError::Validation(_) => "validation_error",
            AppError::InvalidInput(_) => "invalid_input",
            AppError::Internal(_) => "internal_error",
            AppError::Config(_) => "config_error",
            AppError::Serialization(_) => "serialization_error",
        }
    }

    /// Whether a failed operation may be retried transparently
    ///
    /// Covers transient store contention at the serialization boundary
    /// (e.g. a losing transaction under concurrent admission). Genuine
    /// conflicts (`SlotUnavailable`) are not retryable.
    pub fn is_retryable(&self) -> bool {
        matches!(self, AppError::Transaction(_))
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        AppError::status_code(self)
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let body = json!({
            "error": self.error_code(),
            "message": self.to_string(),
            "status": status.as_u16(),
        });

        HttpResponse::build(status).json(body)
    }
}

// ==================== From implementations ====================

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::Config(err.to_string())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::Validation(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_codes() {
        assert_eq!(AppError::SlotUnavailable.status_code(), StatusCode::CONFLICT);
        assert_eq!(
            AppError::NotFound("space 42".to_string()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::Capacity {
                requested: 8,
                max: 5
            }
            .status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::Unauthorized("not a party to this booking".to_string()).status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            AppError::InvalidTransition {
                from: "cancelled".to_string(),
                to: "confirmed".to_string()
            }
            .status_code(),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(AppError::SelfBooking.error_code(), "self_booking");
        assert_eq!(AppError::SlotUnavailable.error_code(), "slot_unavailable");
        assert_eq!(
            AppError::InvalidRange("end before start".to_string()).error_code(),
            "invalid_range"
        );
    }

    #[test]
    fn test_retryable() {
        assert!(AppError::Transaction("serialization failure".to_string()).is_retryable());
        assert!(!AppError::SlotUnavailable.is_retryable());
        assert!(!AppError::Database("connection lost".to_string()).is_retryable());
    }
}
