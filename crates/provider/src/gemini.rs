//! HTTP transport for the Gemini `generateContent` REST endpoint.
//!
//! One call per invocation: the key goes in `x-goog-api-key`, the body is the
//! camelCase JSON request. Non-2xx responses are reduced to a `Failure` whose
//! message is `error.message` from the upstream JSON envelope (raw body when
//! the envelope is missing).

use crate::{Failure, GenerateContentRequest, GenerateContentResponse, Transport};
use common::Secret;
use serde::Deserialize;
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;
use tracing::{debug, warn};

/// Public endpoint of the Generative Language API.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

const API_KEY_HEADER: &str = "x-goog-api-key";

/// `{"error":{"code":429,"message":"...","status":"RESOURCE_EXHAUSTED"}}`
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: Option<String>,
}

pub struct GeminiTransport {
    client: reqwest::Client,
    base_url: String,
    timeout: Option<Duration>,
}

impl GeminiTransport {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            timeout: None,
        }
    }

    /// Per-request timeout. Without one, the client's default applies.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    fn endpoint(&self, model: &str) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            model
        )
    }
}

/// Pull the upstream's error message out of a non-2xx body.
///
/// The status string (e.g. `RESOURCE_EXHAUSTED`) is appended when the
/// message does not already mention it, so classification sees both.
fn failure_message(body: &str) -> String {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) => {
            let ErrorBody { message, status } = envelope.error;
            match status {
                Some(status) if !message.contains(&status) => {
                    if message.is_empty() {
                        status
                    } else {
                        format!("{message} ({status})")
                    }
                }
                _ => message,
            }
        }
        Err(_) => body.trim().to_string(),
    }
}

impl Transport for GeminiTransport {
    fn id(&self) -> &str {
        "gemini"
    }

    fn generate_content<'a>(
        &'a self,
        api_key: &'a Secret<String>,
        model: &'a str,
        request: &'a GenerateContentRequest,
    ) -> Pin<Box<dyn Future<Output = Result<GenerateContentResponse, Failure>> + Send + 'a>> {
        Box::pin(async move {
            let url = self.endpoint(model);
            debug!(model, key = %api_key.hint(), "calling generateContent");

            let mut builder = self
                .client
                .post(&url)
                .header(API_KEY_HEADER, api_key.expose().as_str())
                .json(request);
            if let Some(timeout) = self.timeout {
                builder = builder.timeout(timeout);
            }

            let response = builder.send().await.map_err(|e| {
                warn!(model, error = %e, "upstream request failed");
                if e.is_timeout() {
                    Failure::network(format!("upstream timeout: {e}"))
                } else {
                    Failure::network(format!("upstream request failed: {e}"))
                }
            })?;

            let status = response.status();
            if !status.is_success() {
                let body = response
                    .text()
                    .await
                    .unwrap_or_else(|_| String::from("<no body>"));
                let message = failure_message(&body);
                warn!(model, status = status.as_u16(), error = %message, "upstream returned error");
                return Err(Failure::http(status.as_u16(), message));
            }

            response
                .json::<GenerateContentResponse>()
                .await
                .map_err(|e| Failure::network(format!("invalid generateContent response: {e}")))
        })
    }
}
