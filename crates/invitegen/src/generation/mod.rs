//! Template generation: per-template pipeline, batch loops, pacing, progress
//! and cost estimation.

pub mod cancel;
pub mod config;
pub mod context;
pub mod estimate;
pub mod id;
pub mod progress;
pub mod result;
pub mod runner;

pub use cancel::CancelSignal;
pub use config::{BatchConfig, OrchestratorSettings};
pub use context::{TemplateContext, TemplatePhase, TemplateSlot};
pub use estimate::{estimate_cost, CostEstimate, CostModel};
pub use id::TemplateIdGenerator;
pub use progress::{LogProgress, NoopProgress, ProgressReporter};
pub use result::{BatchProgress, GenerationResult, RunSummary, TemplateArtifact, TemplateMetadata};
pub use runner::Orchestrator;
