//! Error types and HTTP error response handling.
//!
//! This module defines all application errors and how they are converted
//! into HTTP responses with appropriate status codes and JSON bodies.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::store::StoreError;

/// Application-wide error type.
///
/// # Error Categories
///
/// - **Generation Errors**: The secure random source or key derivation failed
/// - **Storage Errors**: The store failed a read or a write
/// - **Credential Errors**: Malformed, unknown or expired credentials
/// - **Resource Errors**: Requested API key does not exist
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Key material could not be produced.
    ///
    /// Returns HTTP 500 Internal Server Error.
    #[error("Key generation failed: {0}")]
    Generation(String),

    /// The store failed a read or a write.
    ///
    /// Returns HTTP 500 Internal Server Error.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Presented credential is not a hex encoded 32 byte secret.
    #[error("Invalid credential format")]
    InvalidCredentialFormat,

    /// Presented credential does not match any issued key.
    #[error("Invalid credential")]
    InvalidCredential,

    /// Presented credential matches a key whose expiration has passed.
    #[error("Credential expired")]
    CredentialExpired,

    /// No API key exists with the given ID.
    ///
    /// Returns HTTP 404 Not Found.
    #[error("API key with ID {0} not found")]
    NotFound(String),
}

impl AppError {
    /// Whether this error belongs to the credential family that callers only
    /// ever see as "unauthorized".
    pub fn is_unauthorized(&self) -> bool {
        matches!(
            self,
            AppError::InvalidCredentialFormat
                | AppError::InvalidCredential
                | AppError::CredentialExpired
        )
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => AppError::NotFound(id),
            StoreError::Duplicate(id) => {
                AppError::Generation(format!("key {id} collides with an existing key"))
            }
            StoreError::Unavailable(reason) => AppError::Storage(reason),
        }
    }
}

/// Convert AppError into an HTTP response.
///
/// # Response Format
///
/// ```json
/// {
///   "error": {
///     "code": "error_type",
///     "message": "Human-readable error message"
///   }
/// }
/// ```
///
/// # Status Code Mapping
///
/// - Credential errors → 401 Unauthorized (one undifferentiated message)
/// - `NotFound` → 404 Not Found
/// - `Generation`, `Storage` → 500 Internal Server Error (hides details from client)
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = if self.is_unauthorized() {
            (
                StatusCode::UNAUTHORIZED,
                "unauthorized",
                "Unauthorized".to_string(),
            )
        } else if let AppError::NotFound(_) = self {
            (StatusCode::NOT_FOUND, "not_found", self.to_string())
        } else {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                "An internal error occurred".to_string(),
            )
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
