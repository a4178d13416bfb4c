//! Application error type mapping to HTTP status codes.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use parley_infra::line::WebhookError;

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// Rejected webhook delivery (bad signature or payload).
    Webhook(WebhookError),
}

impl From<WebhookError> for AppError {
    fn from(e: WebhookError) -> Self {
        AppError::Webhook(e)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Webhook(e @ WebhookError::MissingSignature) => {
                (StatusCode::BAD_REQUEST, "MISSING_SIGNATURE", e.to_string())
            }
            AppError::Webhook(e @ WebhookError::InvalidSignature) => {
                (StatusCode::BAD_REQUEST, "INVALID_SIGNATURE", e.to_string())
            }
            AppError::Webhook(e @ WebhookError::Malformed(_)) => {
                (StatusCode::BAD_REQUEST, "MALFORMED_EVENT", e.to_string())
            }
        };

        tracing::warn!(code, %message, "webhook rejected");

        let body = json!({
            "error": {
                "code": code,
                "message": message,
            }
        });

        (
            status,
            [(axum::http::header::CONTENT_TYPE, "application/json")],
            body.to_string(),
        )
            .into_response()
    }
}
