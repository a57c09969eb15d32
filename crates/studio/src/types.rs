//! Request and result types
//!
//! `GenerationRequest` is validated once at construction and immutable
//! afterwards. `GenerationResult` serializes in camelCase so the cached batch
//! keeps the same JSON shape the web gallery wrote.

use std::fmt;
use std::str::FromStr;
use std::time::{SystemTime, UNIX_EPOCH};

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::{Deserialize, Serialize};

use crate::constants::{MAX_BATCH_SIZE, MAX_PROMPT_CHARS};
use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AspectRatio {
    #[default]
    #[serde(rename = "1:1")]
    Square,
    #[serde(rename = "16:9")]
    Landscape,
    #[serde(rename = "9:16")]
    Portrait,
    #[serde(rename = "4:3")]
    Standard,
    #[serde(rename = "3:4")]
    Tall,
}

impl AspectRatio {
    pub const ALL: [AspectRatio; 5] = [
        AspectRatio::Square,
        AspectRatio::Landscape,
        AspectRatio::Portrait,
        AspectRatio::Standard,
        AspectRatio::Tall,
    ];

    /// Ratio string as the upstream expects it.
    pub fn as_str(&self) -> &'static str {
        match self {
            AspectRatio::Square => "1:1",
            AspectRatio::Landscape => "16:9",
            AspectRatio::Portrait => "9:16",
            AspectRatio::Standard => "4:3",
            AspectRatio::Tall => "3:4",
        }
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AspectRatio {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        AspectRatio::ALL
            .into_iter()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| Error::InvalidRequest(format!("unsupported aspect ratio: {s}")))
    }
}

/// Art style. `NoStyle` is the sentinel that leaves the prompt untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ImageStyle {
    #[default]
    #[serde(rename = "No Style")]
    NoStyle,
    Realistic,
    Cinematic,
    #[serde(rename = "3D Pixar")]
    Pixar,
    Anime,
    Cyberpunk,
    Fantasy,
    Sketch,
    Photorealistic,
}

impl ImageStyle {
    pub const ALL: [ImageStyle; 9] = [
        ImageStyle::NoStyle,
        ImageStyle::Realistic,
        ImageStyle::Cinematic,
        ImageStyle::Pixar,
        ImageStyle::Anime,
        ImageStyle::Cyberpunk,
        ImageStyle::Fantasy,
        ImageStyle::Sketch,
        ImageStyle::Photorealistic,
    ];

    /// Display name, also the text spliced into styled prompts.
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageStyle::NoStyle => "No Style",
            ImageStyle::Realistic => "Realistic",
            ImageStyle::Cinematic => "Cinematic",
            ImageStyle::Pixar => "3D Pixar",
            ImageStyle::Anime => "Anime",
            ImageStyle::Cyberpunk => "Cyberpunk",
            ImageStyle::Fantasy => "Fantasy",
            ImageStyle::Sketch => "Sketch",
            ImageStyle::Photorealistic => "Photorealistic",
        }
    }
}

impl fmt::Display for ImageStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ImageStyle {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        ImageStyle::ALL
            .into_iter()
            .find(|st| st.as_str() == s)
            .ok_or_else(|| Error::InvalidRequest(format!("unsupported style: {s}")))
    }
}

/// One user submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    prompt: String,
    aspect_ratio: AspectRatio,
    style: ImageStyle,
    batch_size: u8,
}

impl GenerationRequest {
    /// Validate and build a request.
    ///
    /// The prompt must contain non-whitespace text and at most
    /// `MAX_PROMPT_CHARS` characters; `batch_size` must be 1 to `MAX_BATCH_SIZE`.
    pub fn new(
        prompt: impl Into<String>,
        aspect_ratio: AspectRatio,
        style: ImageStyle,
        batch_size: u8,
    ) -> Result<Self> {
        let prompt = prompt.into();
        if prompt.trim().is_empty() {
            return Err(Error::InvalidRequest("prompt must not be empty".into()));
        }
        let chars = prompt.chars().count();
        if chars > MAX_PROMPT_CHARS {
            return Err(Error::InvalidRequest(format!(
                "prompt is {chars} characters, limit is {MAX_PROMPT_CHARS}"
            )));
        }
        if !(1..=MAX_BATCH_SIZE).contains(&batch_size) {
            return Err(Error::InvalidRequest(format!(
                "batch size must be between 1 and {MAX_BATCH_SIZE}, got {batch_size}"
            )));
        }
        Ok(Self {
            prompt,
            aspect_ratio,
            style,
            batch_size,
        })
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn aspect_ratio(&self) -> AspectRatio {
        self.aspect_ratio
    }

    pub fn style(&self) -> ImageStyle {
        self.style
    }

    pub fn batch_size(&self) -> u8 {
        self.batch_size
    }
}

/// Self-contained image: `data:{mime};base64,{payload}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageReference(String);

impl ImageReference {
    pub fn from_inline(mime_type: &str, base64_data: &str) -> Self {
        Self(format!("data:{mime_type};base64,{base64_data}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Split the URI back into its MIME type and decoded bytes.
    pub fn decode(&self) -> Result<(String, Vec<u8>)> {
        let rest = self
            .0
            .strip_prefix("data:")
            .ok_or_else(|| Error::InvalidImage("missing data: scheme".into()))?;
        let (mime_type, payload) = rest
            .split_once(";base64,")
            .ok_or_else(|| Error::InvalidImage("not a base64 data URI".into()))?;
        let bytes = BASE64
            .decode(payload)
            .map_err(|e| Error::InvalidImage(format!("bad base64 payload: {e}")))?;
        Ok((mime_type.to_string(), bytes))
    }
}

impl fmt::Display for ImageReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageParams {
    pub aspect_ratio: AspectRatio,
    pub style: ImageStyle,
}

/// One generated image as kept in the gallery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationResult {
    pub id: String,
    pub url: ImageReference,
    pub prompt: String,
    /// Unix milliseconds.
    pub timestamp: u64,
    pub params: ImageParams,
}

impl GenerationResult {
    /// Wrap a fresh image with a new id and the current time.
    pub fn new(url: ImageReference, request: &GenerationRequest) -> Self {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64;
        Self {
            id: uuid::Uuid::new_v4().simple().to_string(),
            url,
            prompt: request.prompt().to_string(),
            timestamp,
            params: ImageParams {
                aspect_ratio: request.aspect_ratio(),
                style: request.style(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aspect_ratio_parses_every_wire_value() {
        for ratio in AspectRatio::ALL {
            assert_eq!(ratio.as_str().parse::<AspectRatio>().unwrap(), ratio);
        }
        assert!("2:1".parse::<AspectRatio>().is_err());
    }

    #[test]
    fn style_serializes_as_display_name() {
        assert_eq!(
            serde_json::to_string(&ImageStyle::Pixar).unwrap(),
            r#""3D Pixar""#
        );
        assert_eq!(
            serde_json::to_string(&ImageStyle::NoStyle).unwrap(),
            r#""No Style""#
        );
        assert_eq!(
            serde_json::from_str::<ImageStyle>(r#""Cyberpunk""#).unwrap(),
            ImageStyle::Cyberpunk
        );
    }

    #[test]
    fn style_parse_rejects_unknown() {
        let err = "Watercolor".parse::<ImageStyle>().unwrap_err();
        assert!(err.to_string().contains("Watercolor"));
    }

    #[test]
    fn request_accepts_limits() {
        let prompt = "x".repeat(MAX_PROMPT_CHARS);
        let request =
            GenerationRequest::new(prompt, AspectRatio::Tall, ImageStyle::Anime, 4).unwrap();
        assert_eq!(request.batch_size(), 4);
        assert_eq!(request.aspect_ratio(), AspectRatio::Tall);
    }

    #[test]
    fn request_counts_characters_not_bytes() {
        let prompt = "é".repeat(MAX_PROMPT_CHARS);
        assert!(GenerationRequest::new(prompt, AspectRatio::Square, ImageStyle::NoStyle, 1).is_ok());
    }

    #[test]
    fn request_rejects_long_prompt() {
        let prompt = "x".repeat(MAX_PROMPT_CHARS + 1);
        let err = GenerationRequest::new(prompt, AspectRatio::Square, ImageStyle::NoStyle, 1)
            .unwrap_err();
        assert!(matches!(err, Error::InvalidRequest(_)));
    }

    #[test]
    fn request_rejects_blank_prompt() {
        assert!(GenerationRequest::new("   ", AspectRatio::Square, ImageStyle::NoStyle, 1).is_err());
    }

    #[test]
    fn request_rejects_batch_out_of_range() {
        for size in [0u8, 5, 200] {
            assert!(
                GenerationRequest::new("fox", AspectRatio::Square, ImageStyle::NoStyle, size)
                    .is_err(),
                "batch size {size} should be rejected"
            );
        }
    }

    #[test]
    fn image_reference_decodes_payload() {
        let image = ImageReference::from_inline("image/png", "QUJD");
        assert_eq!(image.as_str(), "data:image/png;base64,QUJD");
        let (mime, bytes) = image.decode().unwrap();
        assert_eq!(mime, "image/png");
        assert_eq!(bytes, b"ABC");
    }

    #[test]
    fn image_reference_rejects_non_data_uri() {
        let image = ImageReference("https://example.com/a.png".into());
        assert!(matches!(image.decode(), Err(Error::InvalidImage(_))));
    }

    #[test]
    fn result_serializes_in_gallery_shape() {
        let request =
            GenerationRequest::new("fox", AspectRatio::Landscape, ImageStyle::Sketch, 1).unwrap();
        let result = GenerationResult::new(ImageReference::from_inline("image/png", "QUJD"), &request);
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["url"], "data:image/png;base64,QUJD");
        assert_eq!(json["prompt"], "fox");
        assert_eq!(json["params"]["aspectRatio"], "16:9");
        assert_eq!(json["params"]["style"], "Sketch");
        assert!(json["timestamp"].as_u64().unwrap() > 0);
        assert_eq!(result.id.len(), 32);
    }

    #[test]
    fn results_get_distinct_ids() {
        let request =
            GenerationRequest::new("fox", AspectRatio::Square, ImageStyle::NoStyle, 2).unwrap();
        let image = ImageReference::from_inline("image/png", "QUJD");
        let a = GenerationResult::new(image.clone(), &request);
        let b = GenerationResult::new(image, &request);
        assert_ne!(a.id, b.id);
    }
}
