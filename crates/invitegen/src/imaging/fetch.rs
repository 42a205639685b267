use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::error::GenerationError;
use crate::sanitize::redact_url;

const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Downloads image bytes by URL.
#[async_trait]
pub trait ImageFetcher: Send + Sync {
    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, GenerationError>;
}

pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self, GenerationError> {
        Self::with_timeouts(DEFAULT_CONNECT_TIMEOUT, DEFAULT_REQUEST_TIMEOUT)
    }

    pub fn with_timeouts(
        connect_timeout: Duration,
        request_timeout: Duration,
    ) -> Result<Self, GenerationError> {
        let client = Client::builder()
            .connect_timeout(connect_timeout)
            .timeout(request_timeout)
            .build()
            .map_err(|e| {
                GenerationError::ImageProcessing(format!("Failed to create HTTP client: {}", e))
            })?;
        Ok(Self { client })
    }
}

#[async_trait]
impl ImageFetcher for HttpFetcher {
    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, GenerationError> {
        // Signed URLs must not leak into errors or logs.
        let redacted = redact_url(url);
        let failed = |status: Option<u16>| GenerationError::DownloadFailed {
            url: redacted.clone(),
            status,
        };

        let response = self.client.get(url).send().await.map_err(|e| {
            debug!(url = %redacted, "Download transport error: {}", e);
            failed(None)
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(failed(Some(status.as_u16())));
        }

        let bytes = response.bytes().await.map_err(|e| {
            debug!(url = %redacted, "Download body error: {}", e);
            failed(None)
        })?;

        debug!(url = %redacted, bytes = bytes.len(), "Downloaded image");
        Ok(bytes.to_vec())
    }
}
