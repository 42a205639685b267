use std::time::Duration;

use crate::config::Config;
use crate::synthesis::{ImageQuality, ImageSize, StyleHint};

/// Batch loop shape and pacing.
#[derive(Debug, Clone)]
pub struct BatchConfig {
    pub styles_per_subcategory: usize,
    /// Number of AI-backed calls between pacing sleeps.
    pub batch_size: usize,
    pub delay_between_batches: Duration,
    pub delay_between_categories: Duration,
    pub use_ai_synthesis: bool,
    /// Category keys to run, in this order. `None` runs the whole catalog.
    pub categories: Option<Vec<String>>,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            styles_per_subcategory: 3,
            batch_size: 5,
            delay_between_batches: Duration::from_secs(60),
            delay_between_categories: Duration::from_secs(5),
            use_ai_synthesis: true,
            categories: None,
        }
    }
}

impl BatchConfig {
    pub fn from_config(config: &Config) -> Self {
        let batch = &config.batch;
        Self {
            styles_per_subcategory: batch.styles_per_subcategory,
            batch_size: batch.batch_size,
            delay_between_batches: Duration::from_millis(batch.delay_between_batches_ms),
            delay_between_categories: Duration::from_millis(batch.delay_between_categories_ms),
            use_ai_synthesis: batch.use_ai_synthesis,
            categories: (!batch.categories.is_empty()).then(|| batch.categories.clone()),
        }
    }

    /// Local rendering with no pacing.
    pub fn local() -> Self {
        Self {
            use_ai_synthesis: false,
            delay_between_batches: Duration::ZERO,
            delay_between_categories: Duration::ZERO,
            ..Self::default()
        }
    }
}

/// Synthesis parameters used for every template request.
#[derive(Debug, Clone, Copy)]
pub struct OrchestratorSettings {
    pub size: ImageSize,
    pub quality: ImageQuality,
    pub style_hint: StyleHint,
}

impl Default for OrchestratorSettings {
    fn default() -> Self {
        Self {
            size: ImageSize::Square1024,
            quality: ImageQuality::High,
            style_hint: StyleHint::Vivid,
        }
    }
}

impl OrchestratorSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            quality: config.synthesis.quality,
            style_hint: config.synthesis.style_hint,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_config() {
        let mut config = Config::default();
        config.batch.delay_between_batches_ms = 1_500;
        config.batch.categories = vec!["holiday".into()];
        let batch = BatchConfig::from_config(&config);
        assert_eq!(batch.delay_between_batches, Duration::from_millis(1_500));
        assert_eq!(batch.categories, Some(vec!["holiday".to_string()]));

        config.batch.categories.clear();
        assert!(BatchConfig::from_config(&config).categories.is_none());
    }

    #[test]
    fn test_local_has_no_pacing() {
        let batch = BatchConfig::local();
        assert!(!batch.use_ai_synthesis);
        assert!(batch.delay_between_batches.is_zero());
    }
}
