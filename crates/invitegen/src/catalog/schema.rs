use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Style whose vocabulary and layout stand in for any unmapped style.
pub const FALLBACK_STYLE: &str = "elegant";

const FALLBACK_MOOD: &str = "sophisticated, refined, graceful, luxurious, timeless";

/// Opaque style key ("minimalist", "vintage", ...).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DesignStyle(String);

impl DesignStyle {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DesignStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DesignStyle {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CatalogCategory {
    pub key: String,
    pub display_name: String,
    pub subcategories: Vec<String>,
    pub target_count: usize,
}

impl CatalogCategory {
    /// Templates per subcategory needed to reach `count`: `ceil(count / n)`.
    pub fn per_subcategory(&self, count: usize) -> usize {
        if self.subcategories.is_empty() {
            return 0;
        }
        count.div_ceil(self.subcategories.len())
    }
}

/// Ordered (primary, secondary, accent) triple. Consumers index by position.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ColorPalette {
    pub name: String,
    pub colors: [String; 3],
}

impl ColorPalette {
    pub fn new(name: &str, primary: &str, secondary: &str, accent: &str) -> Self {
        Self {
            name: name.to_string(),
            colors: [primary.to_string(), secondary.to_string(), accent.to_string()],
        }
    }

    pub fn primary(&self) -> &str {
        &self.colors[0]
    }

    pub fn secondary(&self) -> &str {
        &self.colors[1]
    }

    pub fn accent(&self) -> &str {
        &self.colors[2]
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FontPairing {
    pub heading: String,
    pub body: String,
}

impl FontPairing {
    pub fn new(heading: &str, body: &str) -> Self {
        Self {
            heading: heading.to_string(),
            body: body.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HeaderPosition {
    Top,
    Center,
    Bottom,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ImagePosition {
    Background,
    Left,
    Right,
    Top,
    None,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TextAlignment {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Spacing {
    Compact,
    Balanced,
    Spacious,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TemplateLayout {
    pub header_position: HeaderPosition,
    pub image_position: ImagePosition,
    pub text_alignment: TextAlignment,
    #[serde(default)]
    pub decorations: Vec<String>,
    pub spacing: Spacing,
}

impl TemplateLayout {
    /// Layout used when a style has no entry of its own.
    pub fn elegant() -> Self {
        Self {
            header_position: HeaderPosition::Center,
            image_position: ImagePosition::Background,
            text_alignment: TextAlignment::Center,
            decorations: vec!["border".to_string(), "flourish".to_string()],
            spacing: Spacing::Spacious,
        }
    }
}

/// Immutable catalog configuration, built once per run and shared via `Arc`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Catalog {
    pub categories: Vec<CatalogCategory>,
    pub styles: Vec<DesignStyle>,
    pub palettes: Vec<ColorPalette>,
    pub fonts: Vec<FontPairing>,
    #[serde(default)]
    pub moods: BTreeMap<DesignStyle, String>,
    #[serde(default)]
    pub layouts: BTreeMap<DesignStyle, TemplateLayout>,
    #[serde(default)]
    pub name_words: BTreeMap<DesignStyle, Vec<String>>,
}

impl Catalog {
    pub fn category(&self, key: &str) -> Option<&CatalogCategory> {
        self.categories.iter().find(|c| c.key == key)
    }

    pub fn style(&self, key: &str) -> Option<&DesignStyle> {
        self.styles.iter().find(|s| s.as_str() == key)
    }

    /// Style at `index`, cycling once the list is exhausted.
    pub fn style_at(&self, index: usize) -> Option<&DesignStyle> {
        if self.styles.is_empty() {
            return None;
        }
        self.styles.get(index % self.styles.len())
    }

    pub fn total_target_count(&self) -> usize {
        self.categories.iter().map(|c| c.target_count).sum()
    }

    pub fn mood_for(&self, style: &DesignStyle) -> &str {
        self.moods
            .get(style)
            .or_else(|| self.moods.get(&DesignStyle::from(FALLBACK_STYLE)))
            .map(String::as_str)
            .unwrap_or(FALLBACK_MOOD)
    }

    pub fn layout_for(&self, style: &DesignStyle) -> TemplateLayout {
        self.layouts
            .get(style)
            .or_else(|| self.layouts.get(&DesignStyle::from(FALLBACK_STYLE)))
            .cloned()
            .unwrap_or_else(TemplateLayout::elegant)
    }

    pub fn name_words_for(&self, style: &DesignStyle) -> &[String] {
        self.name_words
            .get(style)
            .filter(|words| !words.is_empty())
            .or_else(|| self.name_words.get(&DesignStyle::from(FALLBACK_STYLE)))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn category(subs: &[&str], target: usize) -> CatalogCategory {
        CatalogCategory {
            key: "wedding".into(),
            display_name: "Wedding".into(),
            subcategories: subs.iter().map(|s| s.to_string()).collect(),
            target_count: target,
        }
    }

    #[test]
    fn test_per_subcategory_rounds_up() {
        let cat = category(&["ceremony", "reception", "engagement"], 10);
        assert_eq!(cat.per_subcategory(10), 4);
        assert_eq!(cat.per_subcategory(9), 3);
        assert_eq!(cat.per_subcategory(1), 1);
        assert_eq!(category(&[], 5).per_subcategory(5), 0);
    }

    #[test]
    fn test_palette_positions() {
        let palette = ColorPalette::new("Gold", "#D4AF37", "#1C1917", "#FAFAF9");
        assert_eq!(palette.primary(), "#D4AF37");
        assert_eq!(palette.secondary(), "#1C1917");
        assert_eq!(palette.accent(), "#FAFAF9");
    }

    #[test]
    fn test_unmapped_style_falls_back() {
        let mut catalog = Catalog {
            categories: vec![],
            styles: vec!["elegant".into(), "vintage".into()],
            palettes: vec![],
            fonts: vec![],
            moods: BTreeMap::new(),
            layouts: BTreeMap::new(),
            name_words: BTreeMap::new(),
        };
        let unknown = DesignStyle::from("cyberpunk");

        // Nothing mapped at all: built-in defaults.
        assert_eq!(catalog.mood_for(&unknown), FALLBACK_MOOD);
        assert_eq!(catalog.layout_for(&unknown), TemplateLayout::elegant());
        assert!(catalog.name_words_for(&unknown).is_empty());

        catalog.moods.insert("elegant".into(), "graceful".into());
        catalog
            .name_words
            .insert("elegant".into(), vec!["Grace".into()]);
        assert_eq!(catalog.mood_for(&unknown), "graceful");
        assert_eq!(catalog.name_words_for(&unknown), &["Grace".to_string()]);
    }

    #[test]
    fn test_style_at_cycles() {
        let catalog = Catalog {
            categories: vec![],
            styles: vec!["a".into(), "b".into(), "c".into()],
            palettes: vec![],
            fonts: vec![],
            moods: BTreeMap::new(),
            layouts: BTreeMap::new(),
            name_words: BTreeMap::new(),
        };
        assert_eq!(catalog.style_at(0).unwrap().as_str(), "a");
        assert_eq!(catalog.style_at(4).unwrap().as_str(), "b");
    }

    #[test]
    fn test_layout_serializes_lowercase() {
        let json = serde_json::to_value(TemplateLayout::elegant()).unwrap();
        assert_eq!(json["headerPosition"], "center");
        assert_eq!(json["imagePosition"], "background");
        assert_eq!(json["spacing"], "spacious");
    }
}
