use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Invitegen(#[from] invitegen::InvitegenError),

    #[error("Failed to access '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to encode JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Usage(String),

    #[error("Failed to install Ctrl-C handler: {0}")]
    Signal(#[from] ctrlc::Error),

    #[error("Failed to start runtime: {0}")]
    Runtime(std::io::Error),
}

impl From<invitegen::GenerationError> for CliError {
    fn from(e: invitegen::GenerationError) -> Self {
        CliError::Invitegen(e.into())
    }
}

impl From<invitegen::ConfigError> for CliError {
    fn from(e: invitegen::ConfigError) -> Self {
        CliError::Invitegen(e.into())
    }
}

pub type Result<T> = std::result::Result<T, CliError>;

pub fn io_error(path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> CliError {
    let path = path.into();
    move |source| CliError::Io { path, source }
}
