use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::catalog::{ColorPalette, DesignStyle, FontPairing};

/// Stages of one template's pipeline. Any stage may move to `Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemplatePhase {
    Pending,
    PromptComposed,
    Synthesizing,
    Downloading,
    PostProcessing,
    Uploading,
    Succeeded,
    Failed,
}

impl fmt::Display for TemplatePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TemplatePhase::Pending => "pending",
            TemplatePhase::PromptComposed => "prompt_composed",
            TemplatePhase::Synthesizing => "synthesizing",
            TemplatePhase::Downloading => "downloading",
            TemplatePhase::PostProcessing => "post_processing",
            TemplatePhase::Uploading => "uploading",
            TemplatePhase::Succeeded => "succeeded",
            TemplatePhase::Failed => "failed",
        };
        f.write_str(s)
    }
}

impl TemplatePhase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, TemplatePhase::Succeeded | TemplatePhase::Failed)
    }
}

/// One point in the catalog: what to generate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateSlot {
    pub category: String,
    pub subcategory: String,
    pub style: DesignStyle,
    pub palette: ColorPalette,
    pub fonts: FontPairing,
}

impl TemplateSlot {
    pub fn new(
        category: impl Into<String>,
        subcategory: impl Into<String>,
        style: impl Into<DesignStyle>,
        palette: ColorPalette,
        fonts: FontPairing,
    ) -> Self {
        Self {
            category: category.into(),
            subcategory: subcategory.into(),
            style: style.into(),
            palette,
            fonts,
        }
    }
}

/// Per-template state carried through the pipeline.
pub struct TemplateContext {
    pub template_id: String,
    pub slot: TemplateSlot,
    phase: TemplatePhase,
    history: Vec<TemplatePhase>,
    pub prompt: Option<String>,
    pub revised_prompt: Option<String>,
    pub image_url: Option<String>,
}

impl TemplateContext {
    pub fn new(template_id: String, slot: TemplateSlot) -> Self {
        Self {
            template_id,
            slot,
            phase: TemplatePhase::Pending,
            history: vec![TemplatePhase::Pending],
            prompt: None,
            revised_prompt: None,
            image_url: None,
        }
    }

    pub fn phase(&self) -> TemplatePhase {
        self.phase
    }

    pub fn history(&self) -> &[TemplatePhase] {
        &self.history
    }

    /// Phases visited so far, for failure logs: `pending > synthesizing > ...`.
    pub fn trail(&self) -> String {
        self.history
            .iter()
            .map(|phase| phase.to_string())
            .collect::<Vec<_>>()
            .join(" > ")
    }

    /// Records a transition. Terminal phases are final.
    pub fn advance(&mut self, next: TemplatePhase) {
        if self.phase.is_terminal() {
            return;
        }
        debug!(template_id = %self.template_id, from = %self.phase, to = %next, "Template phase");
        self.phase = next;
        self.history.push(next);
    }
}
