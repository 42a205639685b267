//! Builders for test catalogs and batch settings.

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::time::Duration;

use invitegen::catalog::{
    Catalog, CatalogCategory, ColorPalette, DesignStyle, FontPairing, FALLBACK_STYLE,
};
use invitegen::BatchConfig;

/// Builder for small, fully specified catalogs.
pub struct CatalogBuilder {
    categories: Vec<CatalogCategory>,
    styles: Vec<DesignStyle>,
    palettes: Vec<ColorPalette>,
    fonts: Vec<FontPairing>,
}

impl CatalogBuilder {
    /// One palette, one font pairing, two styles, no categories.
    pub fn new() -> Self {
        Self {
            categories: vec![],
            styles: vec!["elegant".into(), "vintage".into()],
            palettes: vec![ColorPalette::new(
                "Classic Gold",
                "#D4AF37",
                "#1C1917",
                "#FAFAF9",
            )],
            fonts: vec![FontPairing::new("Cinzel", "Raleway")],
        }
    }

    pub fn category(mut self, key: &str, subcategories: &[&str]) -> Self {
        self.categories.push(CatalogCategory {
            key: key.to_string(),
            display_name: key.to_string(),
            subcategories: subcategories.iter().map(|s| s.to_string()).collect(),
            target_count: subcategories.len() * 3,
        });
        self
    }

    pub fn styles(mut self, styles: &[&str]) -> Self {
        self.styles = styles.iter().map(|s| DesignStyle::from(*s)).collect();
        self
    }

    /// Only the fallback style is mapped, which is enough to validate.
    pub fn build(self) -> Catalog {
        let fallback = DesignStyle::from(FALLBACK_STYLE);
        Catalog {
            categories: self.categories,
            styles: self.styles,
            palettes: self.palettes,
            fonts: self.fonts,
            moods: BTreeMap::from([(fallback.clone(), "refined, graceful".to_string())]),
            layouts: BTreeMap::new(),
            name_words: BTreeMap::from([(fallback, vec!["Grace".to_string()])]),
        }
    }
}

/// Builder for `BatchConfig` with no pacing by default.
pub struct BatchBuilder {
    config: BatchConfig,
}

impl BatchBuilder {
    pub fn ai() -> Self {
        Self {
            config: BatchConfig {
                styles_per_subcategory: 1,
                batch_size: 100,
                delay_between_batches: Duration::ZERO,
                delay_between_categories: Duration::ZERO,
                use_ai_synthesis: true,
                categories: None,
            },
        }
    }

    pub fn local() -> Self {
        let mut builder = Self::ai();
        builder.config.use_ai_synthesis = false;
        builder
    }

    pub fn styles_per_subcategory(mut self, count: usize) -> Self {
        self.config.styles_per_subcategory = count;
        self
    }

    pub fn batch_size(mut self, size: usize) -> Self {
        self.config.batch_size = size;
        self
    }

    pub fn delay_between_batches(mut self, delay: Duration) -> Self {
        self.config.delay_between_batches = delay;
        self
    }

    pub fn delay_between_categories(mut self, delay: Duration) -> Self {
        self.config.delay_between_categories = delay;
        self
    }

    pub fn categories(mut self, keys: &[&str]) -> Self {
        self.config.categories = Some(keys.iter().map(|k| k.to_string()).collect());
        self
    }

    pub fn build(self) -> BatchConfig {
        self.config
    }
}
