//! Client for an OpenAI-compatible `images/generations` endpoint.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::request::{ImageRequest, SynthesizedImage};
use super::ImageSynthesizer;
use crate::error::GenerationError;
use crate::sanitize::{redact_url, truncate_body};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "dall-e-3";
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
// HD generations routinely take 20-40 s.
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Debug, Clone)]
pub struct OpenAiSettings {
    pub base_url: String,
    pub model: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl Default for OpenAiSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

#[derive(Serialize)]
struct GenerationBody<'a> {
    model: &'a str,
    prompt: &'a str,
    size: &'static str,
    quality: &'static str,
    style: &'static str,
    n: u8,
}

#[derive(Deserialize)]
struct GenerationResponse {
    #[serde(default)]
    data: Vec<GeneratedImageData>,
}

#[derive(Deserialize)]
struct GeneratedImageData {
    url: Option<String>,
    revised_prompt: Option<String>,
}

pub struct OpenAiSynthesizer {
    client: Client,
    api_key: SecretString,
    endpoint: String,
    model: String,
}

impl OpenAiSynthesizer {
    pub fn new(api_key: SecretString, settings: OpenAiSettings) -> Result<Self, GenerationError> {
        let client = Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|e| {
                GenerationError::GenerationFailed(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self {
            client,
            api_key,
            endpoint: format!(
                "{}/images/generations",
                settings.base_url.trim_end_matches('/')
            ),
            model: settings.model,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl ImageSynthesizer for OpenAiSynthesizer {
    async fn generate_image(
        &self,
        request: &ImageRequest,
    ) -> Result<SynthesizedImage, GenerationError> {
        request.validate()?;

        let body = GenerationBody {
            model: &self.model,
            prompt: &request.prompt,
            size: request.size.as_str(),
            quality: request.quality.as_str(),
            style: request.style_hint.as_str(),
            n: request.n,
        };

        debug!(model = %self.model, size = body.size, "Requesting image synthesis");

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(self.api_key.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| GenerationError::GenerationFailed(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(GenerationError::GenerationFailed(format!(
                "HTTP {}: {}",
                status,
                truncate_body(&body)
            )));
        }

        let parsed: GenerationResponse = response.json().await.map_err(|e| {
            GenerationError::GenerationFailed(format!("Failed to parse response: {}", e))
        })?;

        let image = first_image(parsed)?;
        debug!(url = %redact_url(&image.url), "Image synthesized");
        Ok(image)
    }
}

/// The first returned image; a missing image or a blank URL is a failure.
fn first_image(response: GenerationResponse) -> Result<SynthesizedImage, GenerationError> {
    let first = response.data.into_iter().next().ok_or_else(|| {
        GenerationError::GenerationFailed("response contained no images".to_string())
    })?;

    let url = first
        .url
        .filter(|u| !u.trim().is_empty())
        .ok_or_else(|| GenerationError::GenerationFailed("response image has no URL".to_string()))?;

    Ok(SynthesizedImage {
        url,
        revised_prompt: first.revised_prompt,
    })
}
