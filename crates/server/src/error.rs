//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures errors to Sentry before
//! responding to the client. All route handlers should return `Result<T, AppError>`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::models::CartError;
use crate::services::{CheckoutError, LocateError, ReorderError, RoleError};
use crate::store::StoreError;

/// Application-level error type for the server.
#[derive(Debug, Error)]
pub enum AppError {
    /// Store operation failed.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Checkout could not complete.
    #[error("Checkout error: {0}")]
    Checkout(#[from] CheckoutError),

    /// Cart manipulation was rejected.
    #[error("Cart error: {0}")]
    Cart(#[from] CartError),

    /// Caller's access level could not be determined.
    #[error("Access error: {0}")]
    Access(#[from] RoleError),

    /// Order lookup failed.
    #[error("Locate error: {0}")]
    Locate(#[from] LocateError),

    /// Reorder-suggestion service failed.
    #[error("Reorder error: {0}")]
    Reorder(#[from] ReorderError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Caller is not authenticated.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if matches!(
            self,
            Self::Store(_)
                | Self::Internal(_)
                | Self::Access(_)
                | Self::Locate(LocateError::Search(_))
                | Self::Reorder(ReorderError::Http(_) | ReorderError::Parse(_))
        ) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = match &self {
            Self::Store(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Checkout(err) => match err {
                CheckoutError::EmptyCart => StatusCode::BAD_REQUEST,
                CheckoutError::ProductNotFound { .. } => StatusCode::NOT_FOUND,
                CheckoutError::InsufficientStock { .. } | CheckoutError::Conflict { .. } => {
                    StatusCode::CONFLICT
                }
            },
            Self::Cart(_) => StatusCode::CONFLICT,
            Self::Access(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Locate(err) => match err {
                LocateError::NotFound(_) => StatusCode::NOT_FOUND,
                LocateError::Search(_) => StatusCode::SERVICE_UNAVAILABLE,
            },
            Self::Reorder(err) => match err {
                ReorderError::Disabled => StatusCode::SERVICE_UNAVAILABLE,
                _ => StatusCode::BAD_GATEWAY,
            },
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        };

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Store(_) | Self::Internal(_) => "Internal server error".to_string(),
            Self::Access(_) => "Cannot determine access level".to_string(),
            Self::Locate(err) => match err {
                LocateError::NotFound(_) => "Order not found or not permitted".to_string(),
                LocateError::Search(_) => "Order search unavailable".to_string(),
            },
            Self::Reorder(err) => match err {
                ReorderError::Disabled => "Reorder suggestions are not configured".to_string(),
                _ => "Suggestion service error".to_string(),
            },
            Self::Checkout(err) => err.to_string(),
            _ => self.to_string(),
        };

        (status, message).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use stockvision_core::{OrderId, ProductId};

    fn get_status(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("product-123".to_string());
        assert_eq!(err.to_string(), "Not found: product-123");

        let err = AppError::BadRequest("invalid input".to_string());
        assert_eq!(err.to_string(), "Bad request: invalid input");
    }

    #[test]
    fn test_app_error_status_codes() {
        assert_eq!(
            get_status(AppError::NotFound("test".to_string())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::Unauthorized("test".to_string())),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            get_status(AppError::BadRequest("test".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::Internal("test".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_checkout_error_status_codes() {
        assert_eq!(
            get_status(AppError::Checkout(CheckoutError::EmptyCart)),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::Checkout(CheckoutError::InsufficientStock {
                id: ProductId::from("prod_1"),
                name: "Arroz Premium 1kg".to_string(),
                requested: 5,
                available: 2,
            })),
            StatusCode::CONFLICT
        );
        assert_eq!(
            get_status(AppError::Checkout(CheckoutError::ProductNotFound {
                id: ProductId::from("prod_99"),
                name: "Unknown".to_string(),
            })),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_locate_not_found_hides_existence() {
        let err = AppError::Locate(LocateError::NotFound(OrderId::from("order-1")));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
