use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::catalog::{DesignStyle, FontPairing};

/// What was generated and how.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateMetadata {
    pub category: String,
    pub subcategory: String,
    pub style: DesignStyle,
    pub colors: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fonts: Option<FontPairing>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revised_prompt: Option<String>,
    /// False for locally rendered placeholders.
    pub synthesized: bool,
    pub generated_at: DateTime<Utc>,
}

/// The record the catalog UI indexes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateArtifact {
    pub template_id: String,
    pub full_size_url: String,
    pub thumbnail_url: String,
    pub category: String,
    pub subcategory: String,
    pub style: DesignStyle,
    pub colors: [String; 3],
    pub fonts: [String; 2],
}

/// Outcome of one template attempt.
///
/// Built only through [`success`](Self::success) and
/// [`failure`](Self::failure): a success has both URLs and metadata and no
/// error, a failure has an error and nothing else.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationResult {
    template_id: String,
    success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    full_size_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    thumbnail_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    metadata: Option<TemplateMetadata>,
}

impl GenerationResult {
    pub fn success(
        template_id: impl Into<String>,
        full_size_url: String,
        thumbnail_url: String,
        metadata: TemplateMetadata,
    ) -> Self {
        Self {
            template_id: template_id.into(),
            success: true,
            full_size_url: Some(full_size_url),
            thumbnail_url: Some(thumbnail_url),
            error: None,
            metadata: Some(metadata),
        }
    }

    pub fn failure(template_id: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            template_id: template_id.into(),
            success: false,
            full_size_url: None,
            thumbnail_url: None,
            error: Some(error.into()),
            metadata: None,
        }
    }

    pub fn template_id(&self) -> &str {
        &self.template_id
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn full_size_url(&self) -> Option<&str> {
        self.full_size_url.as_deref()
    }

    pub fn thumbnail_url(&self) -> Option<&str> {
        self.thumbnail_url.as_deref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn metadata(&self) -> Option<&TemplateMetadata> {
        self.metadata.as_ref()
    }

    /// The outward artifact record. `None` for failures and for assets that
    /// are not full templates (decorations carry no palette or fonts).
    pub fn artifact(&self) -> Option<TemplateArtifact> {
        let metadata = self.metadata.as_ref()?;
        let colors: [String; 3] = metadata.colors.clone().try_into().ok()?;
        let fonts = metadata.fonts.as_ref()?;
        Some(TemplateArtifact {
            template_id: self.template_id.clone(),
            full_size_url: self.full_size_url.clone()?,
            thumbnail_url: self.thumbnail_url.clone()?,
            category: metadata.category.clone(),
            subcategory: metadata.subcategory.clone(),
            style: metadata.style.clone(),
            colors,
            fonts: [fonts.heading.clone(), fonts.body.clone()],
        })
    }
}

/// Running tally of one batch run.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchProgress {
    pub run_id: Uuid,
    pub total: usize,
    /// Finished items, successful or not.
    pub completed: usize,
    pub failed: usize,
    pub current_category: Option<String>,
    pub current_subcategory: Option<String>,
    pub results: Vec<GenerationResult>,
}

impl BatchProgress {
    pub fn new(total: usize) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            total,
            completed: 0,
            failed: 0,
            current_category: None,
            current_subcategory: None,
            results: Vec::with_capacity(total),
        }
    }

    pub fn record(&mut self, result: GenerationResult) {
        self.completed += 1;
        if !result.is_success() {
            self.failed += 1;
        }
        self.results.push(result);
    }

    pub fn succeeded(&self) -> usize {
        self.completed - self.failed
    }
}

/// Aggregate outcome of a run, written as the run manifest.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunSummary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub failed_ids: Vec<String>,
    pub artifacts: Vec<TemplateArtifact>,
    pub finished_at: DateTime<Utc>,
}

impl RunSummary {
    pub fn from_results(results: &[GenerationResult]) -> Self {
        let failed_ids: Vec<String> = results
            .iter()
            .filter(|r| !r.is_success())
            .map(|r| r.template_id().to_string())
            .collect();
        Self {
            total: results.len(),
            succeeded: results.len() - failed_ids.len(),
            failed: failed_ids.len(),
            failed_ids,
            artifacts: results.iter().filter_map(GenerationResult::artifact).collect(),
            finished_at: Utc::now(),
        }
    }
}
