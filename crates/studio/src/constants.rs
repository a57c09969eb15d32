//! Model identifiers and fixed prompt text
//!
//! None of these are secrets. API keys come only from runtime configuration.

/// Model used to expand prompts.
pub const DEFAULT_TEXT_MODEL: &str = "gemini-3-flash-preview";

/// Model used to synthesize images.
pub const DEFAULT_IMAGE_MODEL: &str = "gemini-2.5-flash-image";

/// System instruction for prompt enhancement.
pub const ENHANCE_SYSTEM_INSTRUCTION: &str = "Professional art prompt expander. Expand concept to 40-60 words. \
Focus on: lighting, texture, composition, mood. Direct text only. No intro/outro.";

/// Sampling temperature for prompt enhancement.
pub const ENHANCE_TEMPERATURE: f32 = 0.7;

/// Thinking budget for prompt enhancement. Zero keeps latency low.
pub const ENHANCE_THINKING_BUDGET: u32 = 0;

/// Longest accepted prompt, in characters.
pub const MAX_PROMPT_CHARS: usize = 2000;

/// Largest batch a single request may ask for.
pub const MAX_BATCH_SIZE: u8 = 4;

/// Storage key of the cached latest batch; also the default cache file stem.
pub const LATEST_BATCH_KEY: &str = "luminary_latest_batch";

/// Signal returned when the key in use cannot access the image model.
pub const PRO_KEY_REQUIRED: &str = "PRO_KEY_REQUIRED";
