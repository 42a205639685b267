use serde::{Deserialize, Serialize};

use crate::error::GenerationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ImageSize {
    #[default]
    #[serde(rename = "1024x1024")]
    Square1024,
    #[serde(rename = "1792x1024")]
    Landscape1792,
    #[serde(rename = "1024x1792")]
    Portrait1792,
}

impl ImageSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageSize::Square1024 => "1024x1024",
            ImageSize::Landscape1792 => "1792x1024",
            ImageSize::Portrait1792 => "1024x1792",
        }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        match self {
            ImageSize::Square1024 => (1024, 1024),
            ImageSize::Landscape1792 => (1792, 1024),
            ImageSize::Portrait1792 => (1024, 1792),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ImageQuality {
    #[serde(rename = "standard")]
    Standard,
    #[default]
    #[serde(rename = "hd")]
    High,
}

impl ImageQuality {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageQuality::Standard => "standard",
            ImageQuality::High => "hd",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StyleHint {
    #[default]
    Vivid,
    Natural,
}

impl StyleHint {
    pub fn as_str(&self) -> &'static str {
        match self {
            StyleHint::Vivid => "vivid",
            StyleHint::Natural => "natural",
        }
    }
}

/// One text-to-image request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRequest {
    pub prompt: String,
    pub size: ImageSize,
    pub quality: ImageQuality,
    pub style_hint: StyleHint,
    pub n: u8,
}

impl ImageRequest {
    /// Square, high quality, vivid, one image.
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            size: ImageSize::default(),
            quality: ImageQuality::default(),
            style_hint: StyleHint::default(),
            n: 1,
        }
    }

    pub fn with_size(mut self, size: ImageSize) -> Self {
        self.size = size;
        self
    }

    pub fn with_quality(mut self, quality: ImageQuality) -> Self {
        self.quality = quality;
        self
    }

    pub fn with_style_hint(mut self, style_hint: StyleHint) -> Self {
        self.style_hint = style_hint;
        self
    }

    pub fn validate(&self) -> Result<(), GenerationError> {
        if self.prompt.trim().is_empty() {
            return Err(GenerationError::InvalidArgument(
                "image prompt must not be empty".to_string(),
            ));
        }
        if self.n == 0 {
            return Err(GenerationError::InvalidArgument(
                "image count must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// A synthesized image, addressed by a (usually short-lived) URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SynthesizedImage {
    pub url: String,
    pub revised_prompt: Option<String>,
}
