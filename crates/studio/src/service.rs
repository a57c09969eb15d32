//! Caller-facing facade: model names plus the shared executor.

use std::sync::Arc;

use futures_util::future::try_join_all;
use key_pool::CredentialPool;
use provider::Transport;
use tracing::{info, instrument};

use crate::constants::{DEFAULT_IMAGE_MODEL, DEFAULT_TEXT_MODEL};
use crate::error::Result;
use crate::executor::Executor;
use crate::types::{GenerationRequest, GenerationResult, ImageReference};

/// Model identifiers for the two call kinds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Models {
    pub text: String,
    pub image: String,
}

impl Default for Models {
    fn default() -> Self {
        Self {
            text: DEFAULT_TEXT_MODEL.to_string(),
            image: DEFAULT_IMAGE_MODEL.to_string(),
        }
    }
}

#[derive(Clone)]
pub struct Studio {
    executor: Executor,
    models: Models,
}

impl Studio {
    pub fn new(pool: Arc<CredentialPool>, transport: Arc<dyn Transport>, models: Models) -> Self {
        Self {
            executor: Executor::new(pool, transport),
            models,
        }
    }

    pub fn pool(&self) -> &CredentialPool {
        self.executor.pool()
    }

    /// See [`crate::enhance::enhance`]. Never fails.
    pub async fn enhance(&self, prompt: &str) -> String {
        crate::enhance::enhance(&self.executor, &self.models.text, prompt).await
    }

    /// See [`crate::synthesize::synthesize`].
    pub async fn synthesize(&self, request: &GenerationRequest) -> Result<ImageReference> {
        crate::synthesize::synthesize(&self.executor, &self.models.image, request).await
    }

    /// Issue `batch_size` synthesis calls concurrently and wait for all.
    ///
    /// All-or-nothing: the first failure drops the remaining calls and no
    /// partial batch is returned. Results come back in issuance order.
    #[instrument(skip_all, fields(batch_size = request.batch_size(), style = %request.style(), aspect_ratio = %request.aspect_ratio()))]
    pub async fn generate_batch(&self, request: &GenerationRequest) -> Result<Vec<GenerationResult>> {
        let calls = (0..request.batch_size()).map(|_| async move {
            let image = self.synthesize(request).await?;
            Ok::<_, crate::Error>(GenerationResult::new(image, request))
        });
        let results = try_join_all(calls).await?;
        info!(images = results.len(), "batch generated");
        metrics::counter!("images_generated_total").increment(results.len() as u64);
        Ok(results)
    }
}
