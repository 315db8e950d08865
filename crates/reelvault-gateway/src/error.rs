use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use reelvault_core::{CatalogError, FieldError};
use serde::Serialize;
use tracing::error;

pub type Result<T> = std::result::Result<T, ApiError>;

/// The closed set of error responses the gateway can produce.
#[derive(Debug)]
pub enum ApiError {
    /// 400 with field-level details.
    Validation(Vec<FieldError>),
    /// 401; missing, malformed, or expired bearer token.
    Authentication(String),
    /// 404; the entry is absent or not owned by the caller. The two are
    /// deliberately indistinguishable.
    NotFound,
    /// 500; the cause is logged but never put on the wire.
    Internal(String),
}

impl From<CatalogError> for ApiError {
    fn from(value: CatalogError) -> Self {
        match value {
            CatalogError::Validation(details) => Self::Validation(details),
            CatalogError::NotFound => Self::NotFound,
            CatalogError::Store(cause) => Self::Internal(cause.to_string()),
        }
    }
}

#[derive(Serialize)]
struct ErrorEnvelope {
    success: bool,
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Vec<FieldError>>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message, details) = match self {
            ApiError::Validation(details) => (
                StatusCode::BAD_REQUEST,
                "Validation error".to_string(),
                Some(details),
            ),
            ApiError::Authentication(message) => (StatusCode::UNAUTHORIZED, message, None),
            ApiError::NotFound => (
                StatusCode::NOT_FOUND,
                "Entry not found or access denied".to_string(),
                None,
            ),
            ApiError::Internal(cause) => {
                error!(cause = %cause, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                    None,
                )
            }
        };

        let body = ErrorEnvelope {
            success: false,
            error: message,
            details,
        };
        (status, Json(body)).into_response()
    }
}
