//! API error types with HTTP response mapping.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use chrono::{DateTime, Utc};
use domain::{DomainError, ValidationError, WishlistError};
use serde::Serialize;

/// API-level error type that maps to HTTP responses.
#[derive(Debug)]
pub enum ApiError {
    /// Bad request from the client.
    BadRequest(String),
    /// Domain logic error.
    Domain(DomainError),
    /// Internal server error.
    Internal(String),
}

/// JSON body of every error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub code: &'static str,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl ApiError {
    /// Returns the HTTP status and stable error code for this error.
    pub fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            ApiError::Domain(err) => domain_status_and_code(err),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_SERVER_ERROR"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        let message = match self {
            ApiError::BadRequest(msg) => msg,
            ApiError::Domain(err) => {
                if status.is_server_error() {
                    tracing::error!(error = %err, code, "request failed");
                }
                err.to_string()
            }
            ApiError::Internal(msg) => {
                tracing::error!(error = %msg, "internal server error");
                msg
            }
        };

        let body = ErrorResponse {
            code,
            message,
            timestamp: Utc::now(),
        };
        (status, axum::Json(body)).into_response()
    }
}

fn domain_status_and_code(err: &DomainError) -> (StatusCode, &'static str) {
    match err {
        DomainError::Wishlist(wishlist_err) => match wishlist_err {
            WishlistError::DuplicateItem { .. } => {
                (StatusCode::BAD_REQUEST, "PRODUCT_ALREADY_EXISTS")
            }
            WishlistError::CapacityExceeded { .. } => {
                (StatusCode::BAD_REQUEST, "WISHLIST_LIMIT_EXCEEDED")
            }
            WishlistError::InvalidQuantity { .. } => (StatusCode::BAD_REQUEST, "INVALID_QUANTITY"),
            WishlistError::InvalidOrder(_) => (StatusCode::BAD_REQUEST, "INVALID_ORDER"),
            WishlistError::ItemNotFound { .. } => (StatusCode::NOT_FOUND, "PRODUCT_NOT_FOUND"),
        },
        DomainError::Validation(validation_err) => match validation_err {
            ValidationError::InvalidCustomerId(_) => {
                (StatusCode::BAD_REQUEST, "INVALID_CUSTOMER_ID")
            }
            ValidationError::InvalidProductId(_) => (StatusCode::BAD_REQUEST, "INVALID_PRODUCT_ID"),
            ValidationError::NoteTooLong { .. } => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
        },
        DomainError::WishlistNotFound { .. } | DomainError::WishlistMissing { .. } => {
            (StatusCode::NOT_FOUND, "WISHLIST_NOT_FOUND")
        }
        DomainError::VersionConflict { .. } => (StatusCode::CONFLICT, "VERSION_CONFLICT"),
        DomainError::ConcurrencyExhausted { .. } => {
            (StatusCode::CONFLICT, "CONCURRENCY_EXHAUSTED")
        }
        DomainError::Storage(_) => (StatusCode::SERVICE_UNAVAILABLE, "STORAGE_UNAVAILABLE"),
        DomainError::Serialization(_) => {
            (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_SERVER_ERROR")
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        ApiError::Domain(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}
