//! Prompt enhancement
//!
//! Expands a short idea into a 40-60 word art prompt. Enhancement is a
//! convenience, so the call never fails: on any error the caller gets the
//! original prompt back.

use provider::{Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig, ThinkingConfig};
use tracing::{info, warn};

use crate::constants::{ENHANCE_SYSTEM_INSTRUCTION, ENHANCE_TEMPERATURE, ENHANCE_THINKING_BUDGET};
use crate::error::{Error, Result};
use crate::executor::{Executor, Operation};

pub struct EnhancePrompt<'a> {
    pub model: &'a str,
    pub prompt: &'a str,
}

impl Operation for EnhancePrompt<'_> {
    type Output = String;

    fn name(&self) -> &'static str {
        "enhance"
    }

    fn model(&self) -> &str {
        self.model
    }

    fn build_request(&self) -> GenerateContentRequest {
        GenerateContentRequest {
            contents: vec![Content::user_text(self.prompt)],
            system_instruction: Some(Content::text(ENHANCE_SYSTEM_INSTRUCTION)),
            generation_config: Some(GenerationConfig {
                temperature: Some(ENHANCE_TEMPERATURE),
                thinking_config: Some(ThinkingConfig {
                    thinking_budget: ENHANCE_THINKING_BUDGET,
                }),
                image_config: None,
            }),
        }
    }

    fn map_response(&self, response: GenerateContentResponse) -> Result<String> {
        response
            .text()
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty())
            .ok_or(Error::EmptyText)
    }
}

/// Expand `prompt`, or return it unchanged if anything goes wrong.
///
/// Blank prompts are returned as-is without calling the model.
pub async fn enhance(executor: &Executor, model: &str, prompt: &str) -> String {
    if prompt.trim().is_empty() {
        return prompt.to_string();
    }

    match executor.execute(&EnhancePrompt { model, prompt }).await {
        Ok(enhanced) => {
            info!(
                original_chars = prompt.chars().count(),
                enhanced_chars = enhanced.chars().count(),
                "prompt enhanced"
            );
            enhanced
        }
        Err(e) => {
            warn!(error = %e, "failed to improve prompt, keeping original");
            prompt.to_string()
        }
    }
}
