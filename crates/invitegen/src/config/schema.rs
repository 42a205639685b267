use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::imaging::{PrintSpec, DEFAULT_THUMBNAIL_WIDTH};
use crate::secrets::CredentialSource;
use crate::synthesis::openai::{DEFAULT_BASE_URL, DEFAULT_MODEL};
use crate::synthesis::{ImageQuality, OpenAiSettings, StyleHint};

pub const CONFIG_VERSION: &str = "1.0";
pub const DEFAULT_API_KEY_ENV: &str = "OPENAI_API_KEY";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalog_path: Option<String>,
    #[serde(default)]
    pub synthesis: SynthesisConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub batch: BatchSection,
    #[serde(default)]
    pub imaging: ImagingConfig,
    #[serde(default)]
    pub cost: CostConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION.to_string(),
            catalog_path: None,
            synthesis: SynthesisConfig::default(),
            storage: StorageConfig::default(),
            batch: BatchSection::default(),
            imaging: ImagingConfig::default(),
            cost: CostConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SynthesisConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_credentials")]
    pub credentials: CredentialSource,
    #[serde(default)]
    pub quality: ImageQuality,
    #[serde(default)]
    pub style_hint: StyleHint,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_credentials() -> CredentialSource {
    CredentialSource::from_env(DEFAULT_API_KEY_ENV)
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_request_timeout_secs() -> u64 {
    120
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_model(),
            credentials: default_credentials(),
            quality: ImageQuality::default(),
            style_hint: StyleHint::default(),
            connect_timeout_secs: default_connect_timeout_secs(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl SynthesisConfig {
    pub fn to_settings(&self) -> OpenAiSettings {
        OpenAiSettings {
            base_url: self.base_url.clone(),
            model: self.model.clone(),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageKind {
    #[default]
    Filesystem,
    Http,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageConfig {
    #[serde(default)]
    pub kind: StorageKind,
    /// Filesystem root.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_base_url: Option<String>,
    /// HTTP upload endpoint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bucket: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(default)]
    pub credentials: CredentialSource,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            kind: StorageKind::Filesystem,
            root: Some("./output".to_string()),
            public_base_url: None,
            endpoint: None,
            bucket: None,
            domain: None,
            credentials: CredentialSource::default(),
        }
    }
}

/// Batch pacing as written in the config file. See
/// [`BatchConfig`](crate::generation::BatchConfig) for the runtime form.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchSection {
    #[serde(default = "default_styles_per_subcategory")]
    pub styles_per_subcategory: usize,
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    #[serde(default = "default_delay_between_batches_ms")]
    pub delay_between_batches_ms: u64,
    #[serde(default = "default_delay_between_categories_ms")]
    pub delay_between_categories_ms: u64,
    #[serde(default = "default_true")]
    pub use_ai_synthesis: bool,
    /// Subset of category keys to run. Empty means every category.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub categories: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

fn default_styles_per_subcategory() -> usize {
    3
}

fn default_batch_size() -> usize {
    5
}

// Five HD images per minute is the lowest published tier.
fn default_delay_between_batches_ms() -> u64 {
    60_000
}

fn default_delay_between_categories_ms() -> u64 {
    5_000
}

fn default_true() -> bool {
    true
}

impl Default for BatchSection {
    fn default() -> Self {
        Self {
            styles_per_subcategory: default_styles_per_subcategory(),
            batch_size: default_batch_size(),
            delay_between_batches_ms: default_delay_between_batches_ms(),
            delay_between_categories_ms: default_delay_between_categories_ms(),
            use_ai_synthesis: true,
            categories: Vec::new(),
            seed: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImagingConfig {
    #[serde(default = "default_thumbnail_width")]
    pub thumbnail_width: u32,
    #[serde(default = "default_print_size_mm")]
    pub print_size_mm: f64,
    #[serde(default = "default_dpi")]
    pub dpi: u32,
}

fn default_thumbnail_width() -> u32 {
    DEFAULT_THUMBNAIL_WIDTH
}

fn default_print_size_mm() -> f64 {
    148.0
}

fn default_dpi() -> u32 {
    300
}

impl Default for ImagingConfig {
    fn default() -> Self {
        Self {
            thumbnail_width: default_thumbnail_width(),
            print_size_mm: default_print_size_mm(),
            dpi: default_dpi(),
        }
    }
}

impl ImagingConfig {
    pub fn print_spec(&self) -> PrintSpec {
        PrintSpec {
            size_mm: self.print_size_mm,
            dpi: self.dpi,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostConfig {
    #[serde(default = "default_cost_per_image")]
    pub cost_per_image: f64,
    #[serde(default = "default_seconds_per_image")]
    pub seconds_per_image: f64,
}

fn default_cost_per_image() -> f64 {
    0.08
}

fn default_seconds_per_image() -> f64 {
    15.0
}

impl Default for CostConfig {
    fn default() -> Self {
        Self {
            cost_per_image: default_cost_per_image(),
            seconds_per_image: default_seconds_per_image(),
        }
    }
}
