//! Text-to-image synthesis.

pub mod openai;
pub mod request;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::error::GenerationError;
use crate::generation::CancelSignal;

pub use openai::{OpenAiSettings, OpenAiSynthesizer};
pub use request::{ImageQuality, ImageRequest, ImageSize, StyleHint, SynthesizedImage};

#[async_trait]
pub trait ImageSynthesizer: Send + Sync {
    async fn generate_image(
        &self,
        request: &ImageRequest,
    ) -> Result<SynthesizedImage, GenerationError>;
}

#[async_trait]
impl<T: ImageSynthesizer + ?Sized> ImageSynthesizer for Arc<T> {
    async fn generate_image(
        &self,
        request: &ImageRequest,
    ) -> Result<SynthesizedImage, GenerationError> {
        (**self).generate_image(request).await
    }
}

/// Runs `requests` one after another, sleeping `delay` between calls.
///
/// Failed requests are logged and skipped, so the result holds only the
/// successes, in request order. Cancellation stops the batch and returns what
/// was produced so far.
pub async fn batch_generate(
    synthesizer: &dyn ImageSynthesizer,
    requests: &[ImageRequest],
    delay: Duration,
    cancel: &CancelSignal,
) -> Vec<SynthesizedImage> {
    let mut images = Vec::with_capacity(requests.len());

    for (index, request) in requests.iter().enumerate() {
        if cancel.is_cancelled() {
            info!(completed = index, "Synthesis batch cancelled");
            break;
        }

        match synthesizer.generate_image(request).await {
            Ok(image) => images.push(image),
            Err(e) => warn!(index, "Skipping failed synthesis request: {}", e),
        }

        if index + 1 < requests.len() && cancel.sleep(delay).await.is_err() {
            info!(completed = index + 1, "Synthesis batch cancelled");
            break;
        }
    }

    images
}
