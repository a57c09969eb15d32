//! HTTP error mapping
//!
//! Every failure leaves the server as
//! `{"error":{"type":"...","message":"...","request_id":"req_..."}}`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Message shown when the active key cannot reach the image model.
pub const PRO_KEY_MESSAGE: &str = "Access Restricted: Valid API key required.";

/// Fallback when an upstream failure carries no message.
pub const SYNTHESIS_DISRUPTED: &str = "Synthesis disrupted.";

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("image {0} not found")]
    NotFound(String),

    #[error(transparent)]
    Studio(#[from] studio::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Studio(err) => match err {
                studio::Error::InvalidRequest(_) => StatusCode::BAD_REQUEST,
                studio::Error::ProKeyRequired => StatusCode::FORBIDDEN,
                studio::Error::PoolEmpty => StatusCode::SERVICE_UNAVAILABLE,
                studio::Error::QuotaExceeded(_)
                | studio::Error::PermissionDenied(_)
                | studio::Error::EmptySynthesis
                | studio::Error::EmptyText
                | studio::Error::Transport(_) => StatusCode::BAD_GATEWAY,
                studio::Error::InvalidImage(_) | studio::Error::Gallery(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
        }
    }

    pub fn error_type(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "invalid_request",
            ApiError::NotFound(_) => "not_found",
            ApiError::Studio(err) => match err {
                studio::Error::InvalidRequest(_) => "invalid_request",
                studio::Error::ProKeyRequired => "pro_key_required",
                studio::Error::PoolEmpty => "no_api_keys",
                studio::Error::QuotaExceeded(_) => "quota_exceeded",
                studio::Error::PermissionDenied(_) => "permission_denied",
                studio::Error::EmptySynthesis | studio::Error::EmptyText => "empty_response",
                studio::Error::Transport(_) => "upstream_error",
                studio::Error::InvalidImage(_) | studio::Error::Gallery(_) => "internal_error",
            },
        }
    }

    /// Caller-facing message.
    pub fn message(&self) -> String {
        match self {
            ApiError::Studio(studio::Error::ProKeyRequired) => PRO_KEY_MESSAGE.to_string(),
            other => {
                let message = other.to_string();
                if message.trim().is_empty() {
                    SYNTHESIS_DISRUPTED.to_string()
                } else {
                    message
                }
            }
        }
    }

    pub fn respond(self, request_id: &str) -> Response {
        error_response(self.status(), self.error_type(), &self.message(), request_id)
    }
}

pub fn error_response(
    status: StatusCode,
    error_type: &str,
    message: &str,
    request_id: &str,
) -> Response {
    let body = serde_json::json!({
        "error": {
            "type": error_type,
            "message": message,
            "request_id": request_id,
        }
    });
    (
        status,
        [(axum::http::header::CONTENT_TYPE, "application/json")],
        body.to_string(),
    )
        .into_response()
}

pub fn new_request_id() -> String {
    format!("req_{}", uuid::Uuid::new_v4().as_simple())
}
