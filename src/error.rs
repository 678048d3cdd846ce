//! Error types and HTTP error response handling.
//!
//! This module defines all application errors and how they are converted
//! into HTTP responses with appropriate status codes and JSON bodies.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::{Value, json};

use crate::unit_of_work::{StoreError, UnitOfWorkError};

/// Application-wide error type.
///
/// # Error Categories
///
/// - **Database Errors**: a single non-transactional statement failed
/// - **Unit of Work Errors**: a transactional request failed and was rolled back
/// - **Resource Errors**: requested customer or order does not exist
/// - **Validation Errors**: malformed or missing request fields
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Database operation failed (e.g., connection error, constraint violation).
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A unit of work failed; any writes it made were rolled back.
    #[error(transparent)]
    UnitOfWork(#[from] UnitOfWorkError),

    /// Returns HTTP 404 Not Found.
    #[error("Customer not found")]
    CustomerNotFound,

    /// Returns HTTP 404 Not Found.
    #[error("Order not found")]
    OrderNotFound,

    /// Request body or parameters are invalid.
    ///
    /// Returns HTTP 400 Bad Request. Raised before any connection is taken.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::InvalidRequest(rejection.body_text())
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::CustomerNotFound | AppError::OrderNotFound => StatusCode::NOT_FOUND,
            AppError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Database(_) | AppError::UnitOfWork(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// JSON body: `{"error": "<message>"}`, plus `"code"` when the store
    /// reported a diagnostic code.
    pub fn body(&self) -> Value {
        let (message, code) = match self {
            AppError::Database(err) => {
                let store = StoreError::from_sqlx(err);
                (store.message, store.code)
            }
            AppError::UnitOfWork(err) => (err.to_string(), err.code().map(str::to_owned)),
            other => (other.to_string(), None),
        };

        match code {
            Some(code) => json!({ "error": message, "code": code }),
            None => json!({ "error": message }),
        }
    }
}

/// Convert AppError into an HTTP response.
///
/// # Status Code Mapping
///
/// - `CustomerNotFound`, `OrderNotFound` → 404 Not Found
/// - `InvalidRequest` → 400 Bad Request
/// - `Database`, `UnitOfWork` → 500 Internal Server Error
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }

        (status, Json(self.body())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_of_work_failure_is_500_with_code() {
        let err = AppError::from(UnitOfWorkError::Step {
            step: "voucher".to_string(),
            source: StoreError::new("violates foreign key constraint").with_code("23503"),
            rollback: None,
        });

        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            err.body(),
            json!({ "error": "violates foreign key constraint", "code": "23503" })
        );
    }

    #[test]
    fn rollback_failure_does_not_replace_primary_message() {
        let err = AppError::from(UnitOfWorkError::Step {
            step: "voucher".to_string(),
            source: StoreError::new("duplicate key value").with_code("23505"),
            rollback: Some(StoreError::new("connection closed")),
        });

        assert_eq!(err.body()["error"], "duplicate key value");
    }

    #[test]
    fn not_found_and_invalid_request_map_to_client_errors() {
        assert_eq!(AppError::CustomerNotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::OrderNotFound.body(), json!({ "error": "Order not found" }));

        let err = AppError::InvalidRequest("Quantity must be positive".to_string());
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            err.body(),
            json!({ "error": "Invalid request: Quantity must be positive" })
        );
    }

    #[test]
    fn non_database_sqlx_errors_have_no_code() {
        let err = AppError::Database(sqlx::Error::RowNotFound);
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(err.body().get("code").is_none());
    }
}
