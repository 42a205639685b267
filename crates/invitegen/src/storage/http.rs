use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use reqwest::header::{CACHE_CONTROL, CONTENT_TYPE};
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};

use super::{check_key, ObjectStore};
use crate::error::GenerationError;
use crate::sanitize::truncate_body;

#[derive(Debug, Clone)]
pub struct HttpStoreSettings {
    /// Upload endpoint; objects are PUT to `{endpoint}/{bucket}/{key}`.
    pub endpoint: String,
    pub bucket: String,
    /// Public domain; objects are served from `https://{bucket}.{domain}/{key}`.
    pub domain: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

/// Uploads with HTTP PUT to an S3-style bucket endpoint.
pub struct HttpObjectStore {
    client: Client,
    settings: HttpStoreSettings,
    token: Option<SecretString>,
}

impl HttpObjectStore {
    pub fn new(
        settings: HttpStoreSettings,
        token: Option<SecretString>,
    ) -> Result<Self, GenerationError> {
        let client = Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|e| GenerationError::UploadFailed {
                key: String::new(),
                reason: format!("Failed to create HTTP client: {}", e),
            })?;
        Ok(Self {
            client,
            settings,
            token,
        })
    }

    fn upload_url(&self, key: &str) -> String {
        format!(
            "{}/{}/{}",
            self.settings.endpoint.trim_end_matches('/'),
            self.settings.bucket,
            key
        )
    }
}

#[async_trait]
impl ObjectStore for HttpObjectStore {
    async fn put(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
        cache_control: &str,
    ) -> Result<String, GenerationError> {
        check_key(key)?;
        let size = bytes.len();

        let mut request = self
            .client
            .put(self.upload_url(key))
            .header(CONTENT_TYPE, content_type)
            .header(CACHE_CONTROL, cache_control)
            .body(bytes);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token.expose_secret());
        }

        let response = request
            .send()
            .await
            .map_err(|e| GenerationError::UploadFailed {
                key: key.to_string(),
                reason: format!("Request failed: {}", e),
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(GenerationError::UploadFailed {
                key: key.to_string(),
                reason: format!("HTTP {}: {}", status, truncate_body(&body)),
            });
        }

        debug!("Uploaded {} ({} bytes)", key, size);
        Ok(self.public_url(key))
    }

    fn public_url(&self, key: &str) -> String {
        format!(
            "https://{}.{}/{}",
            self.settings.bucket, self.settings.domain, key
        )
    }
}
