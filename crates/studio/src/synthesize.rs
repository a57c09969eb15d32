//! Image synthesis
//!
//! One call yields one image. Batches are the caller's job (see
//! `Studio::generate_batch`).

use provider::{Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig, ImageConfig};
use tracing::warn;

use crate::error::{Error, Result};
use crate::executor::{Executor, Operation};
use crate::types::{GenerationRequest, ImageReference, ImageStyle};

/// Prompt text sent to the image model.
///
/// `NoStyle` passes the prompt through byte-for-byte; any other style wraps it
/// as `Art Style: {style}. {prompt}. High resolution.`
pub fn build_prompt(prompt: &str, style: ImageStyle) -> String {
    match style {
        ImageStyle::NoStyle => prompt.to_string(),
        style => format!("Art Style: {style}. {prompt}. High resolution."),
    }
}

pub struct SynthesizeImage<'a> {
    pub model: &'a str,
    pub request: &'a GenerationRequest,
}

impl Operation for SynthesizeImage<'_> {
    type Output = ImageReference;

    fn name(&self) -> &'static str {
        "synthesize"
    }

    fn model(&self) -> &str {
        self.model
    }

    fn build_request(&self) -> GenerateContentRequest {
        GenerateContentRequest {
            contents: vec![Content::user_text(build_prompt(
                self.request.prompt(),
                self.request.style(),
            ))],
            system_instruction: None,
            generation_config: Some(GenerationConfig {
                image_config: Some(ImageConfig {
                    aspect_ratio: self.request.aspect_ratio().as_str().to_string(),
                }),
                ..Default::default()
            }),
        }
    }

    fn map_response(&self, response: GenerateContentResponse) -> Result<ImageReference> {
        if response.candidates.is_empty() {
            warn!("synthesis returned no candidates");
            return Err(Error::EmptySynthesis);
        }
        match response.first_inline_data() {
            Some(inline) => Ok(ImageReference::from_inline(&inline.mime_type, &inline.data)),
            None => {
                warn!(
                    candidates = response.candidates.len(),
                    "synthesis returned no inline image data"
                );
                Err(Error::EmptySynthesis)
            }
        }
    }
}

/// Generate one image for `request`.
///
/// Permission failures become `Error::ProKeyRequired`; everything else is
/// returned as classified by the executor.
pub async fn synthesize(
    executor: &Executor,
    model: &str,
    request: &GenerationRequest,
) -> Result<ImageReference> {
    executor
        .execute(&SynthesizeImage { model, request })
        .await
        .map_err(|e| match e {
            Error::PermissionDenied(failure) => {
                warn!(error = %failure, "image model access denied for active key");
                Error::ProKeyRequired
            }
            other => other,
        })
}
