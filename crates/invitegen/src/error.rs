use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum InvitegenError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Generation error: {0}")]
    Generation(#[from] GenerationError),

    #[error("Secret error: {0}")]
    Secret(#[from] crate::secrets::SecretError),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config JSON: {0}")]
    ParseJson(#[from] serde_json::Error),

    #[error("Config validation failed: {message}")]
    Validation { message: String },

    #[error("Schema validation failed: {errors}")]
    SchemaValidation { errors: String },

    #[error("Invalid catalog: {reason}")]
    InvalidCatalog { reason: String },
}

/// Failure kinds of the generation pipeline.
///
/// `InvalidArgument` and `MalformedInput` are caller bugs and never worth
/// retrying. Synthesis, download and upload failures are transient.
#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Image generation failed: {0}")]
    GenerationFailed(String),

    #[error("Download of '{url}' failed{}", status_suffix(.status))]
    DownloadFailed { url: String, status: Option<u16> },

    #[error("Upload of '{key}' failed: {reason}")]
    UploadFailed { key: String, reason: String },

    #[error("Malformed input: {0}")]
    MalformedInput(String),

    #[error("Image processing failed: {0}")]
    ImageProcessing(String),

    #[error("Run cancelled")]
    Cancelled,
}

impl GenerationError {
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            GenerationError::GenerationFailed(_)
                | GenerationError::DownloadFailed { .. }
                | GenerationError::UploadFailed { .. }
        )
    }
}

fn status_suffix(status: &Option<u16>) -> String {
    match status {
        Some(code) => format!(" with HTTP {}", code),
        None => String::new(),
    }
}

pub type Result<T> = std::result::Result<T, InvitegenError>;
