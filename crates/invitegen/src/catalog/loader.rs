use std::collections::HashSet;
use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;

use super::schema::{Catalog, DesignStyle, FALLBACK_STYLE};
use crate::error::ConfigError;
use crate::sanitize::slugify;

fn hex_color() -> &'static Regex {
    static HEX: OnceLock<Regex> = OnceLock::new();
    HEX.get_or_init(|| Regex::new(r"^#[0-9A-Fa-f]{6}$").expect("static regex"))
}

pub fn load_catalog<P: AsRef<Path>>(path: P) -> Result<Catalog, ConfigError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source: e,
    })?;

    load_catalog_from_str(&content)
}

pub fn load_catalog_from_str(content: &str) -> Result<Catalog, ConfigError> {
    let catalog: Catalog = serde_json::from_str(content)?;
    catalog.validate()?;
    Ok(catalog)
}

fn invalid(reason: impl Into<String>) -> ConfigError {
    ConfigError::InvalidCatalog {
        reason: reason.into(),
    }
}

impl Catalog {
    /// Checks the structural invariants the generators rely on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.categories.is_empty() {
            return Err(invalid("catalog has no categories"));
        }

        let mut keys = HashSet::new();
        for category in &self.categories {
            if category.key.trim().is_empty() {
                return Err(invalid("category with empty key"));
            }
            if !keys.insert(category.key.as_str()) {
                return Err(invalid(format!("duplicate category key '{}'", category.key)));
            }
            if category.subcategories.is_empty() {
                return Err(invalid(format!(
                    "category '{}' has no subcategories",
                    category.key
                )));
            }
            // Template ids and storage keys use the slug.
            let mut slugs = HashSet::new();
            for subcategory in &category.subcategories {
                let slug = slugify(subcategory);
                if slug.is_empty() {
                    return Err(invalid(format!(
                        "category '{}' has an empty subcategory",
                        category.key
                    )));
                }
                if !slugs.insert(slug) {
                    return Err(invalid(format!(
                        "category '{}' has duplicate subcategory '{}'",
                        category.key, subcategory
                    )));
                }
            }
            if category.target_count < category.subcategories.len() {
                return Err(invalid(format!(
                    "category '{}' targets {} templates but has {} subcategories",
                    category.key,
                    category.target_count,
                    category.subcategories.len()
                )));
            }
        }

        if self.styles.is_empty() {
            return Err(invalid("catalog has no styles"));
        }
        if self.palettes.is_empty() {
            return Err(invalid("catalog has no color palettes"));
        }
        if self.fonts.is_empty() {
            return Err(invalid("catalog has no font pairings"));
        }

        for palette in &self.palettes {
            if let Some(bad) = palette.colors.iter().find(|c| !hex_color().is_match(c)) {
                return Err(invalid(format!(
                    "palette '{}' has invalid color '{}'",
                    palette.name, bad
                )));
            }
        }

        // Unmapped styles borrow the fallback style's tables, so those must exist.
        let fallback = DesignStyle::from(FALLBACK_STYLE);
        for style in &self.styles {
            let mapped = self.moods.contains_key(style)
                && self.layouts.contains_key(style)
                && self.name_words.get(style).is_some_and(|w| !w.is_empty());
            let fallback_ready = self.moods.contains_key(&fallback)
                && self.name_words.get(&fallback).is_some_and(|w| !w.is_empty());
            if !mapped && !fallback_ready {
                return Err(invalid(format!(
                    "style '{}' is not fully mapped and no '{}' fallback is defined",
                    style, FALLBACK_STYLE
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const MINIMAL: &str = r##"
    {
        "categories": [
            {
                "key": "wedding",
                "displayName": "Wedding",
                "subcategories": ["ceremony", "reception"],
                "targetCount": 4
            }
        ],
        "styles": ["elegant", "vintage"],
        "palettes": [
            { "name": "Classic Gold", "colors": ["#D4AF37", "#1C1917", "#FAFAF9"] }
        ],
        "fonts": [ { "heading": "Cinzel", "body": "Raleway" } ],
        "moods": { "elegant": "graceful" },
        "nameWords": { "elegant": ["Grace"] }
    }
    "##;

    #[test]
    fn test_load_minimal_catalog() {
        let catalog = load_catalog_from_str(MINIMAL).unwrap();
        assert_eq!(catalog.categories[0].subcategories.len(), 2);
        assert_eq!(catalog.mood_for(&"vintage".into()), "graceful");
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(MINIMAL.as_bytes()).unwrap();
        let catalog = load_catalog(file.path()).unwrap();
        assert_eq!(catalog.categories[0].key, "wedding");
    }

    #[test]
    fn test_missing_file() {
        let err = load_catalog("/nonexistent/catalog.json").unwrap_err();
        assert!(matches!(err, ConfigError::ReadFile { .. }));
    }

    #[test]
    fn test_palette_needs_three_colors() {
        let json = MINIMAL.replace(r##""#D4AF37", "#1C1917", "#FAFAF9""##, r##""#D4AF37""##);
        assert!(matches!(
            load_catalog_from_str(&json),
            Err(ConfigError::ParseJson(_))
        ));
    }

    #[test]
    fn test_invalid_hex_color() {
        let json = MINIMAL.replace("#1C1917", "black");
        let err = load_catalog_from_str(&json).unwrap_err();
        assert!(err.to_string().contains("invalid color 'black'"));
    }

    #[test]
    fn test_target_below_subcategory_count() {
        let json = MINIMAL.replace(r#""targetCount": 4"#, r#""targetCount": 1"#);
        assert!(matches!(
            load_catalog_from_str(&json),
            Err(ConfigError::InvalidCatalog { .. })
        ));
    }

    #[test]
    fn test_empty_subcategories() {
        let json = MINIMAL.replace(r#"["ceremony", "reception"]"#, "[]");
        let err = load_catalog_from_str(&json).unwrap_err();
        assert!(err.to_string().contains("no subcategories"));
    }

    #[test]
    fn test_subcategories_colliding_as_slugs() {
        let json = MINIMAL.replace(
            r#"["ceremony", "reception"]"#,
            r#"["Save the Date", "save-the-date"]"#,
        );
        let err = load_catalog_from_str(&json).unwrap_err();
        assert!(err.to_string().contains("duplicate subcategory 'save-the-date'"));

        let json = MINIMAL.replace(r#"["ceremony", "reception"]"#, r#"["ceremony", "  "]"#);
        assert!(matches!(
            load_catalog_from_str(&json),
            Err(ConfigError::InvalidCatalog { .. })
        ));
    }

    #[test]
    fn test_unmapped_style_without_fallback() {
        let json = MINIMAL
            .replace(r#""moods": { "elegant": "graceful" },"#, "")
            .replace(r#""nameWords": { "elegant": ["Grace"] }"#, r#""nameWords": {}"#);
        let err = load_catalog_from_str(&json).unwrap_err();
        assert!(err.to_string().contains("fallback"));
    }

    #[test]
    fn test_duplicate_category_keys() {
        let mut catalog = load_catalog_from_str(MINIMAL).unwrap();
        let dup = catalog.categories[0].clone();
        catalog.categories.push(dup);
        assert!(catalog.validate().is_err());
    }
}
