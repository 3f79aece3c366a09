//! Site error types with HTTP status code mapping.
//!
//! [`SiteError`] is the central error type for the service. Each variant
//! maps to a specific HTTP status code and structured JSON error response.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

/// Structured JSON error response body.
///
/// All error responses follow this shape:
/// ```json
/// {
///   "error": {
///     "code": 1002,
///     "message": "validation failed: email is not a valid address",
///     "details": null
///   }
/// }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Structured error payload.
    pub error: ErrorBody,
}

/// Inner error body with numeric code and human-readable message.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Numeric error code (see code ranges on [`SiteError`]).
    pub code: u32,
    /// Human-readable error message.
    pub message: String,
    /// Optional additional details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Server-side error enum with HTTP status code mapping.
///
/// # Error Code Ranges
///
/// | Range     | Category           | HTTP Status                      |
/// |-----------|--------------------|----------------------------------|
/// | 1000–1999 | Request/Validation | 400 Bad Request / 422            |
/// | 2000–2099 | State/Not Found    | 404 Not Found / 409 Conflict     |
/// | 2100–2199 | Access             | 401 Unauthorized / 403 Forbidden |
/// | 3000–3099 | Server             | 500 Internal Server Error        |
/// | 3100–3199 | Integrations       | 502 Bad Gateway / 503            |
#[derive(Debug, thiserror::Error)]
pub enum SiteError {
    /// Malformed request (bad query parameter, unknown status, ...).
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Well-formed input that failed field validation.
    #[error("validation failed: {0}")]
    Validation(String),

    /// Requested record does not exist.
    #[error("{entity} not found: {key}")]
    NotFound {
        /// Record kind (e.g. `"review"`).
        entity: &'static str,
        /// Lookup key that missed.
        key: String,
    },

    /// Write would violate a uniqueness constraint.
    #[error("conflict: {0}")]
    Conflict(String),

    /// No valid session token was presented.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Session is valid but lacks the required role.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Persistence layer failure.
    #[error("storage error: {0}")]
    Storage(String),

    /// An outbound integration (email, AI, search engine) failed.
    #[error("integration error: {0}")]
    Integration(String),

    /// An outbound integration is not configured.
    #[error("integration not configured: {0}")]
    NotConfigured(&'static str),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl SiteError {
    /// Shorthand for [`SiteError::NotFound`].
    #[must_use]
    pub fn not_found(entity: &'static str, key: impl ToString) -> Self {
        Self::NotFound {
            entity,
            key: key.to_string(),
        }
    }

    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::InvalidRequest(_) => 1001,
            Self::Validation(_) => 1002,
            Self::NotFound { .. } => 2001,
            Self::Conflict(_) => 2002,
            Self::Unauthorized(_) => 2101,
            Self::Forbidden(_) => 2102,
            Self::Internal(_) => 3000,
            Self::Storage(_) => 3001,
            Self::Integration(_) => 3101,
            Self::NotConfigured(_) => 3102,
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::Storage(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Integration(_) => StatusCode::BAD_GATEWAY,
            Self::NotConfigured(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl From<sqlx::Error> for SiteError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                Self::Conflict(db.message().to_string())
            }
            _ => {
                tracing::error!(error = %err, "database query failed");
                Self::Storage(err.to_string())
            }
        }
    }
}

impl IntoResponse for SiteError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::warn!(code = self.error_code(), error = %self, "request failed");
        }
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.error_code(),
                message: self.to_string(),
                details: None,
            },
        };
        let mut response = axum::Json(body).into_response();
        *response.status_mut() = status;
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_maps_to_404() {
        let err = SiteError::not_found("review", "abc");
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(err.error_code(), 2001);
        assert_eq!(err.to_string(), "review not found: abc");
    }

    #[test]
    fn validation_is_unprocessable() {
        let err = SiteError::Validation("rating must be between 1 and 5".to_string());
        assert_eq!(err.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn integration_errors_are_gateway_class() {
        assert_eq!(
            SiteError::Integration("timeout".to_string()).status_code(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            SiteError::NotConfigured("smtp").status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn response_carries_status_and_code() {
        let response = SiteError::Conflict("email already subscribed".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }
}
