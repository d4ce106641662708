//! HTTP error types for the Haulwise server.
//!
//! Maps domain errors from `haulwise-core` into HTTP responses. Every error
//! produces the site's JSON envelope: `{ "ok": false, "error": "..." }`.

use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use tracing::error;

use haulwise_core::{IntakeError, ValidationError};

/// Application-level error returned from HTTP handlers.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Only `POST` (and `OPTIONS` pre-flight) are accepted.
    #[error("method not allowed")]
    MethodNotAllowed,
    /// Client sent an unusable body or failed validation.
    #[error("bad request: {0}")]
    BadRequest(String),
    /// The mail provider credential is missing from the deployment.
    #[error("email service is not configured")]
    NotConfigured,
    /// The mail provider refused or could not take the mandatory email.
    #[error("upstream failure: {0}")]
    Upstream(String),
    /// No route or static file matched.
    #[error("not found")]
    NotFound,
}

/// JSON error envelope.
#[derive(Serialize)]
struct ErrorBody {
    ok: bool,
    error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::MethodNotAllowed => (
                StatusCode::METHOD_NOT_ALLOWED,
                "Method not allowed".to_owned(),
            ),
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            Self::NotConfigured => {
                error!("demo request rejected: RESEND_API_KEY is not set");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Email service is not configured".to_owned(),
                )
            }
            Self::Upstream(msg) => (StatusCode::BAD_GATEWAY, msg),
            Self::NotFound => (StatusCode::NOT_FOUND, "Not found".to_owned()),
        };

        let body = ErrorBody {
            ok: false,
            error: message,
        };

        let mut resp = (status, axum::Json(body)).into_response();
        if status == StatusCode::METHOD_NOT_ALLOWED {
            resp.headers_mut()
                .insert(header::ALLOW, HeaderValue::from_static("POST, OPTIONS"));
        }
        resp
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        Self::BadRequest(err.to_string())
    }
}

impl From<IntakeError> for AppError {
    fn from(err: IntakeError) -> Self {
        match err {
            IntakeError::TeamNotification(inner) => {
                error!(error = %inner, "demo request notification failed");
                Self::Upstream(
                    inner
                        .provider_message()
                        .unwrap_or("Failed to send demo request")
                        .to_owned(),
                )
            }
        }
    }
}
