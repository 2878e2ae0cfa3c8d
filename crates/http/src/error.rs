//! Error handling for the bookstore HTTP layer

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use bookstore_db::{LifecycleError, StoreError};
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

const DATABASE_ERROR: &str = "Database error";
const INTERNAL_ERROR: &str = "Internal server error";

/// Body of every error response: a single `error` string.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Application error types that map to HTTP responses
#[derive(Error, Debug)]
pub enum AppError {
    #[error("validation error: {message}")]
    Validation { message: String },

    #[error("not found: {message}")]
    NotFound { message: String },

    #[error("bad request: {message}")]
    BadRequest { message: String },

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Create a bad request error
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }

    /// HTTP status code for this error
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation { .. } | AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Store(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Machine-readable code used in logs
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Validation { .. } => "validation_error",
            AppError::NotFound { .. } => "not_found",
            AppError::BadRequest { .. } => "bad_request",
            AppError::Store(_) => "store_error",
            AppError::Internal(_) => "internal_error",
        }
    }
}

/// Fallback for paths no route matches.
pub async fn route_not_found() -> AppError {
    AppError::not_found("Not found")
}

/// Fallback for a known path requested with an unsupported method.
pub async fn method_not_allowed() -> (StatusCode, Json<ErrorBody>) {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(ErrorBody {
            error: "Method not allowed".to_string(),
        }),
    )
}

/// Replace the empty body of a timed-out request with the JSON error shape.
pub async fn timeout_body(response: Response) -> Response {
    if response.status() != StatusCode::REQUEST_TIMEOUT {
        return response;
    }
    tracing::warn!("request timed out");
    (
        StatusCode::REQUEST_TIMEOUT,
        Json(ErrorBody {
            error: "Request timed out".to_string(),
        }),
    )
        .into_response()
}

impl From<LifecycleError> for AppError {
    fn from(error: LifecycleError) -> Self {
        match error {
            LifecycleError::MissingFields(_) => AppError::validation("Missing required fields"),
            LifecycleError::InvalidFields(detail) => {
                AppError::validation(format!("Invalid fields: {}", detail))
            }
            LifecycleError::NotFound { resource, .. } => {
                AppError::not_found(format!("{} not found", resource))
            }
            LifecycleError::AlreadyActive { resource, .. } => {
                AppError::bad_request(format!("{} is already active", resource))
            }
            LifecycleError::Store(e) => AppError::Store(e),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let error_code = self.code();

        // Store and internal failures are logged in full but never echoed back.
        let message = match self {
            AppError::Validation { message }
            | AppError::NotFound { message }
            | AppError::BadRequest { message } => {
                tracing::debug!(
                    error_code = %error_code,
                    status_code = %status.as_u16(),
                    message = %message,
                    "Request rejected"
                );
                message
            }
            AppError::Store(e) => {
                tracing::error!(
                    error_id = %Uuid::now_v7(),
                    error_code = %error_code,
                    status_code = %status.as_u16(),
                    error = %e,
                    "Request error"
                );
                DATABASE_ERROR.to_string()
            }
            AppError::Internal(e) => {
                tracing::error!(
                    error_id = %Uuid::now_v7(),
                    error_code = %error_code,
                    status_code = %status.as_u16(),
                    error = %e,
                    "Request error"
                );
                INTERNAL_ERROR.to_string()
            }
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_validation_error() {
        let error = AppError::validation("Missing required fields");

        match error {
            AppError::Validation { ref message } => {
                assert_eq!(message, "Missing required fields");
            }
            _ => panic!("Expected Validation error"),
        }
        assert_eq!(error.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_lifecycle_error_mapping() {
        let missing: AppError = LifecycleError::MissingFields(vec!["name"]).into();
        assert_eq!(missing.status(), StatusCode::BAD_REQUEST);

        let not_found: AppError = LifecycleError::NotFound {
            resource: "Author",
            id: 3,
        }
        .into();
        assert_eq!(not_found.status(), StatusCode::NOT_FOUND);
        assert_eq!(not_found.to_string(), "not found: Author not found");

        let active: AppError = LifecycleError::AlreadyActive {
            resource: "Book",
            id: 1,
        }
        .into();
        assert_eq!(active.status(), StatusCode::BAD_REQUEST);
        assert_eq!(active.to_string(), "bad request: Book is already active");
    }

    #[tokio::test]
    async fn test_error_response_format() {
        let response = AppError::not_found("Book not found").into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            body_json(response).await,
            serde_json::json!({"error": "Book not found"})
        );
    }

    #[tokio::test]
    async fn test_store_error_hides_details() {
        let error: AppError =
            LifecycleError::Store(StoreError::Database(sqlx::Error::PoolTimedOut)).into();
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_json(response).await,
            serde_json::json!({"error": "Database error"})
        );
    }

    #[tokio::test]
    async fn test_internal_error_mapping() {
        let error = AppError::Internal(anyhow::anyhow!("listener closed"));
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_json(response).await,
            serde_json::json!({"error": "Internal server error"})
        );
    }
}
