//! API error type with HTTP status code mapping.
//!
//! [`ApiError`] is the single error type returned by handlers. Each
//! variant maps to an HTTP status and a numeric code, and service-layer
//! errors convert into it with `?`.

use axum::http::header::RETRY_AFTER;
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

use crate::auth::AuthError;
use crate::domain::BookingId;
use crate::persistence::RepositoryError;
use crate::service::{AdmissionError, TransitionError};

/// Suggested client back-off after a `Busy` rejection.
pub const BUSY_RETRY_AFTER_MS: u64 = 250;

/// Structured JSON error response body.
///
/// All error responses follow this shape:
/// ```json
/// {
///   "error": {
///     "code": 2002,
///     "message": "resource 1 already booked in that time range",
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
    /// Numeric error code.
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
/// | Range     | Category        | HTTP Status                        |
/// |-----------|-----------------|------------------------------------|
/// | 1000–1099 | Validation      | 400 Bad Request                    |
/// | 1100–1199 | Auth            | 401 Unauthorized / 403 Forbidden   |
/// | 2000–2999 | State/Not Found | 404 / 409 Conflict / 429 (busy)    |
/// | 3000–3999 | Server          | 500 Internal Server Error          |
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Malformed request body or path.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Unparseable timestamps or an empty/inverted range.
    #[error("{0}")]
    InvalidRange(String),

    /// No bearer token was supplied.
    #[error("missing token")]
    Unauthenticated,

    /// The bearer token was rejected.
    #[error("invalid token")]
    InvalidToken,

    /// The caller lacks the required role.
    #[error("admin role required")]
    Forbidden,

    /// Booking with the given id does not exist.
    #[error("booking not found: {0}")]
    BookingNotFound(BookingId),

    /// Requested range overlaps an active booking.
    #[error("{0}")]
    Conflict(String),

    /// Status change not allowed from the current state.
    #[error("{0}")]
    InvalidTransition(String),

    /// Resource lock is held or the lock store is unavailable.
    #[error("{message}")]
    Busy {
        /// Human-readable reason.
        message: String,
        /// Milliseconds the client should wait before retrying.
        retry_after_ms: u64,
    },

    /// Persistence failure.
    #[error("storage error: {0}")]
    StorageError(String),
}

impl ApiError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::InvalidRequest(_) => 1001,
            Self::InvalidRange(_) => 1002,
            Self::Unauthenticated => 1101,
            Self::InvalidToken => 1102,
            Self::Forbidden => 1103,
            Self::BookingNotFound(_) => 2001,
            Self::Conflict(_) => 2002,
            Self::InvalidTransition(_) => 2003,
            Self::Busy { .. } => 2004,
            Self::StorageError(_) => 3001,
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) | Self::InvalidRange(_) => StatusCode::BAD_REQUEST,
            Self::Unauthenticated | Self::InvalidToken => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::BookingNotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) | Self::InvalidTransition(_) => StatusCode::CONFLICT,
            Self::Busy { .. } => StatusCode::TOO_MANY_REQUESTS,
            Self::StorageError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<AdmissionError> for ApiError {
    fn from(e: AdmissionError) -> Self {
        match e {
            AdmissionError::InvalidRange(_) => Self::InvalidRange(e.to_string()),
            AdmissionError::Busy(_) => Self::Busy {
                message: e.to_string(),
                retry_after_ms: BUSY_RETRY_AFTER_MS,
            },
            AdmissionError::Conflict { .. } => Self::Conflict(e.to_string()),
            AdmissionError::StorageError(inner) => inner.into(),
        }
    }
}

impl From<TransitionError> for ApiError {
    fn from(e: TransitionError) -> Self {
        match e {
            TransitionError::NotFound(id) => Self::BookingNotFound(id),
            TransitionError::InvalidTransition { .. } => Self::InvalidTransition(e.to_string()),
            TransitionError::StorageError(inner) => inner.into(),
        }
    }
}

impl From<RepositoryError> for ApiError {
    fn from(e: RepositoryError) -> Self {
        Self::StorageError(e.to_string())
    }
}

impl From<AuthError> for ApiError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::Unauthenticated => Self::Unauthenticated,
            AuthError::InvalidToken => Self::InvalidToken,
            AuthError::Forbidden => Self::Forbidden,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }

        let retry_after_ms = match &self {
            Self::Busy { retry_after_ms, .. } => Some(*retry_after_ms),
            _ => None,
        };
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.error_code(),
                message: self.to_string(),
                details: retry_after_ms.map(|ms| format!("retry after {ms} ms")),
            },
        };
        let mut response = axum::Json(body).into_response();
        *response.status_mut() = status;
        if let Some(ms) = retry_after_ms {
            // Retry-After is in whole seconds; round up.
            let secs = ms.div_ceil(1000).max(1);
            if let Ok(value) = HeaderValue::from_str(&secs.to_string()) {
                response.headers_mut().insert(RETRY_AFTER, value);
            }
        }
        response
    }
}
