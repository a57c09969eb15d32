//! Upstream boundary for the generative model service
//!
//! Defines the `Transport` trait that decouples the retry/rotation logic from
//! the HTTP details of the hosted model. `GeminiTransport` talks to the
//! `generateContent` REST endpoint; tests substitute scripted transports.
//!
//! Every upstream failure is reduced to a `Failure` (optional status code plus
//! message) so that classification can stay a pure function over plain data.

pub mod gemini;
pub mod types;

pub use gemini::GeminiTransport;
pub use types::{
    Candidate, Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig,
    ImageConfig, InlineData, Part, ThinkingConfig,
};

use common::Secret;
use std::future::Future;
use std::pin::Pin;

/// Classification of an upstream failure, driving the rotate-or-raise decision.
///
/// - QuotaExceeded rotates to the next credential and retries
/// - PermissionDenied is never retried; synthesis surfaces it as a distinct signal
/// - Other is never retried; the message passes through to the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClassification {
    /// Credential exhausted its call volume (429, quota, resource exhausted)
    QuotaExceeded,
    /// Credential lacks access to the model (403, permission, entity not found)
    PermissionDenied,
    /// Anything else
    Other,
}

impl ErrorClassification {
    /// Label for logs and metrics.
    pub fn label(&self) -> &'static str {
        match self {
            ErrorClassification::QuotaExceeded => "quota_exceeded",
            ErrorClassification::PermissionDenied => "permission_denied",
            ErrorClassification::Other => "other",
        }
    }
}

/// Structured descriptor of one failed upstream call.
///
/// `status` is the HTTP status when a response arrived, `None` for
/// connection-level errors. `message` is the upstream's own error text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct Failure {
    pub status: Option<u16>,
    pub message: String,
}

impl Failure {
    /// Failure carrying an HTTP status from the upstream.
    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Self {
            status: Some(status),
            message: message.into(),
        }
    }

    /// Failure that never produced an HTTP response.
    pub fn network(message: impl Into<String>) -> Self {
        Self {
            status: None,
            message: message.into(),
        }
    }
}

/// Abstraction over the hosted model's `generateContent` operation.
///
/// Uses `Pin<Box<dyn Future>>` return types for dyn-compatibility
/// (`Arc<dyn Transport>`).
pub trait Transport: Send + Sync {
    /// Identifier for logging (e.g. "gemini").
    fn id(&self) -> &str;

    /// Issue one call with the given credential. No retries happen here.
    fn generate_content<'a>(
        &'a self,
        api_key: &'a Secret<String>,
        model: &'a str,
        request: &'a GenerateContentRequest,
    ) -> Pin<Box<dyn Future<Output = Result<GenerateContentResponse, Failure>> + Send + 'a>>;
}
