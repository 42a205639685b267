pub mod catalog;
pub mod config;
pub mod error;
pub mod generation;
pub mod imaging;
pub mod prompt;
pub mod sanitize;
pub mod secrets;
pub mod storage;
pub mod synthesis;

pub use catalog::{
    get_template_stats, load_catalog, Catalog, ColorPalette, DesignStyle, FontPairing,
    TemplateGenerator,
};
pub use config::{load_config, Config};
pub use error::{ConfigError, GenerationError, InvitegenError, Result};
pub use generation::{
    estimate_cost, BatchConfig, BatchProgress, CancelSignal, GenerationResult, Orchestrator,
    ProgressReporter, RunSummary, TemplateArtifact,
};
pub use imaging::{ImageProcessor, OverlayStyle, OverlayText, PrintSpec};
pub use prompt::{compose_decoration_prompt, compose_invitation_prompt, DecorationKind};
pub use secrets::{resolve_secret, SecretError};
pub use storage::{FilesystemStore, HttpObjectStore, ObjectStore};
pub use synthesis::{ImageRequest, ImageSynthesizer, OpenAiSynthesizer};
