//! Resilient request executor
//!
//! Runs one logical call against the hosted model. A quota failure rotates the
//! shared pool cursor and resends immediately, without backoff. Total attempts
//! per call never exceed the pool size, so a single-key pool makes exactly one
//! attempt. Any other failure, or quota on the last allowed attempt, is
//! returned classified.

use std::sync::Arc;

use key_pool::{CredentialPool, classify_failure};
use provider::{ErrorClassification, GenerateContentRequest, GenerateContentResponse, Transport};
use tracing::{debug, warn};

use crate::error::{Error, Result};

/// One kind of upstream call with its own request and response mapping.
pub trait Operation: Send + Sync {
    type Output: Send;

    /// Label for logs and metrics (e.g. "enhance", "synthesize").
    fn name(&self) -> &'static str;

    fn model(&self) -> &str;

    fn build_request(&self) -> GenerateContentRequest;

    /// Map a successful response. Errors here are final and never retried.
    fn map_response(&self, response: GenerateContentResponse) -> Result<Self::Output>;
}

/// Shared by every call site; cloning is cheap.
#[derive(Clone)]
pub struct Executor {
    pool: Arc<CredentialPool>,
    transport: Arc<dyn Transport>,
}

impl Executor {
    pub fn new(pool: Arc<CredentialPool>, transport: Arc<dyn Transport>) -> Self {
        Self { pool, transport }
    }

    pub fn pool(&self) -> &CredentialPool {
        &self.pool
    }

    /// Run `operation` with rotate-on-quota retries.
    pub async fn execute<O: Operation>(&self, operation: &O) -> Result<O::Output> {
        let request = operation.build_request();
        let pool_size = self.pool.len();
        let mut attempt = 0usize;

        loop {
            let credential = self.pool.active_credential()?;
            metrics::counter!("upstream_attempts_total", "operation" => operation.name())
                .increment(1);
            debug!(
                operation = operation.name(),
                transport = self.transport.id(),
                attempt = attempt + 1,
                key = %credential.hint(),
                "issuing upstream call"
            );

            let failure = match self
                .transport
                .generate_content(credential, operation.model(), &request)
                .await
            {
                Ok(response) => return operation.map_response(response),
                Err(failure) => failure,
            };

            let classification = classify_failure(&failure);
            metrics::counter!(
                "upstream_failures_total",
                "operation" => operation.name(),
                "classification" => classification.label()
            )
            .increment(1);

            if classification == ErrorClassification::QuotaExceeded && attempt + 1 < pool_size {
                warn!(
                    operation = operation.name(),
                    attempt = attempt + 1,
                    pool_size,
                    error = %failure,
                    "quota exceeded, retrying with next key"
                );
                self.pool.rotate();
                attempt += 1;
                continue;
            }

            warn!(
                operation = operation.name(),
                attempts = attempt + 1,
                classification = classification.label(),
                error = %failure,
                "upstream call failed"
            );
            return Err(match classification {
                ErrorClassification::QuotaExceeded => Error::QuotaExceeded(failure),
                ErrorClassification::PermissionDenied => Error::PermissionDenied(failure),
                ErrorClassification::Other => Error::Transport(failure),
            });
        }
    }
}
