//! Synchronous, network-free expansion of the catalog into template records.
//!
//! Ids depend only on (category, subcategory, style, index). Palette, fonts,
//! premium flag and popularity come from the injected [`RandomSource`], so
//! re-running the generator yields the same ids with fresh presentation data.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::schema::{
    Catalog, CatalogCategory, ColorPalette, DesignStyle, FontPairing, TemplateLayout,
};
use crate::sanitize::slugify;

/// Share of generated templates flagged premium.
pub const PREMIUM_PROBABILITY: f64 = 0.3;
pub const POPULARITY_MIN: u8 = 60;
pub const POPULARITY_MAX: u8 = 100;

/// Randomness used for the presentation fields of generated templates.
pub trait RandomSource: Send {
    /// Uniform index in `0..len`. `len` is never zero.
    fn index(&mut self, len: usize) -> usize;
    /// `true` with probability `p`.
    fn chance(&mut self, p: f64) -> bool;
    /// Uniform value in `lo..=hi`.
    fn range_u8(&mut self, lo: u8, hi: u8) -> u8;
}

/// Backed by the thread-local generator.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn index(&mut self, len: usize) -> usize {
        rand::thread_rng().gen_range(0..len)
    }

    fn chance(&mut self, p: f64) -> bool {
        rand::thread_rng().gen_bool(p.clamp(0.0, 1.0))
    }

    fn range_u8(&mut self, lo: u8, hi: u8) -> u8 {
        rand::thread_rng().gen_range(lo..=hi)
    }
}

/// Reproducible source for tests and repeatable seeding runs.
#[derive(Debug, Clone)]
pub struct SeededRandom {
    rng: StdRng,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl RandomSource for SeededRandom {
    fn index(&mut self, len: usize) -> usize {
        self.rng.gen_range(0..len)
    }

    fn chance(&mut self, p: f64) -> bool {
        self.rng.gen_bool(p.clamp(0.0, 1.0))
    }

    fn range_u8(&mut self, lo: u8, hi: u8) -> u8 {
        self.rng.gen_range(lo..=hi)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedTemplate {
    pub id: String,
    pub name: String,
    pub category: String,
    pub subcategory: String,
    pub style: DesignStyle,
    pub thumbnail_path: String,
    pub is_premium: bool,
    pub colors: ColorPalette,
    pub fonts: FontPairing,
    pub popularity: u8,
    pub created_at: DateTime<Utc>,
    pub description: String,
    pub tags: Vec<String>,
    pub layout: TemplateLayout,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TemplateStats {
    pub total: usize,
    pub premium: usize,
    pub free: usize,
    pub by_category: BTreeMap<String, usize>,
    pub by_style: BTreeMap<String, usize>,
}

/// Deterministic id of a catalog slot: `{category}-{subcategory}-{style}-{index:03}`.
pub fn template_id(category: &str, subcategory: &str, style: &DesignStyle, index: usize) -> String {
    format!(
        "{}-{}-{}-{:03}",
        slugify(category),
        slugify(subcategory),
        slugify(style.as_str()),
        index
    )
}

fn title_case(value: &str) -> String {
    value
        .split(['-', '_', ' '])
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

pub struct TemplateGenerator {
    catalog: Arc<Catalog>,
    random: Box<dyn RandomSource>,
}

impl TemplateGenerator {
    pub fn new(catalog: Arc<Catalog>, random: Box<dyn RandomSource>) -> Self {
        Self { catalog, random }
    }

    pub fn with_thread_rng(catalog: Arc<Catalog>) -> Self {
        Self::new(catalog, Box::new(ThreadRandom))
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Expands one category into exactly `count` templates (fewer only when
    /// the catalog has no styles, palettes or fonts to draw from).
    pub fn generate_templates_for_category(
        &mut self,
        category_key: &str,
        count: usize,
    ) -> Vec<GeneratedTemplate> {
        let catalog = Arc::clone(&self.catalog);
        let Some(category) = catalog.category(category_key) else {
            warn!("Unknown category '{}', nothing generated", category_key);
            return Vec::new();
        };
        if catalog.styles.is_empty() || catalog.palettes.is_empty() || catalog.fonts.is_empty() {
            warn!("Catalog has no styles, palettes or fonts; nothing generated");
            return Vec::new();
        }

        let per_subcategory = category.per_subcategory(count);
        let mut templates = Vec::with_capacity(count);

        'outer: for subcategory in &category.subcategories {
            for index in 0..per_subcategory {
                if templates.len() >= count {
                    break 'outer;
                }
                let Some(style) = catalog.style_at(index) else {
                    break 'outer;
                };
                templates.push(self.build_template(&catalog, category, subcategory, style, index));
            }
        }

        debug!(
            "Generated {} templates for category '{}'",
            templates.len(),
            category_key
        );
        templates
    }

    /// Every category at its configured target count, in declaration order.
    pub fn generate_all_templates(&mut self) -> Vec<GeneratedTemplate> {
        let catalog = Arc::clone(&self.catalog);
        catalog
            .categories
            .iter()
            .flat_map(|category| {
                self.generate_templates_for_category(&category.key, category.target_count)
            })
            .collect()
    }

    fn build_template(
        &mut self,
        catalog: &Catalog,
        category: &CatalogCategory,
        subcategory: &str,
        style: &DesignStyle,
        index: usize,
    ) -> GeneratedTemplate {
        let id = template_id(&category.key, subcategory, style, index);

        let palette = catalog.palettes[self.random.index(catalog.palettes.len())].clone();
        let fonts = catalog.fonts[self.random.index(catalog.fonts.len())].clone();
        let is_premium = self.random.chance(PREMIUM_PROBABILITY);
        let popularity = self.random.range_u8(POPULARITY_MIN, POPULARITY_MAX);

        let words = catalog.name_words_for(style);
        let word = if words.is_empty() {
            title_case(style.as_str())
        } else {
            words[index % words.len()].clone()
        };
        let name = format!("{} {}", word, title_case(subcategory));

        let description = format!(
            "A {} {} invitation for {} in {} tones, set in {} and {}.",
            style,
            category.display_name.to_lowercase(),
            title_case(subcategory).to_lowercase(),
            palette.name.to_lowercase(),
            fonts.heading,
            fonts.body
        );

        let tags = vec![
            category.key.clone(),
            subcategory.to_string(),
            style.to_string(),
            slugify(&palette.name),
            if is_premium { "premium" } else { "free" }.to_string(),
        ];

        GeneratedTemplate {
            thumbnail_path: format!("/templates/{}/{}.png", category.key, id),
            id,
            name,
            category: category.key.clone(),
            subcategory: subcategory.to_string(),
            style: style.clone(),
            is_premium,
            colors: palette,
            fonts,
            popularity,
            created_at: Utc::now(),
            description,
            tags,
            layout: catalog.layout_for(style),
        }
    }
}

pub fn get_template_stats(templates: &[GeneratedTemplate]) -> TemplateStats {
    let mut stats = TemplateStats {
        total: templates.len(),
        ..TemplateStats::default()
    };

    for template in templates {
        if template.is_premium {
            stats.premium += 1;
        } else {
            stats.free += 1;
        }
        *stats
            .by_category
            .entry(template.category.clone())
            .or_default() += 1;
        *stats
            .by_style
            .entry(template.style.to_string())
            .or_default() += 1;
    }

    stats
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generator(seed: u64) -> TemplateGenerator {
        TemplateGenerator::new(Arc::new(Catalog::builtin()), Box::new(SeededRandom::new(seed)))
    }

    /// Always picks the first element and never flags premium.
    struct FirstPick;

    impl RandomSource for FirstPick {
        fn index(&mut self, _len: usize) -> usize {
            0
        }
        fn chance(&mut self, _p: f64) -> bool {
            false
        }
        fn range_u8(&mut self, lo: u8, _hi: u8) -> u8 {
            lo
        }
    }

    #[test]
    fn test_exact_count_stops_mid_subcategory() {
        let mut gen = generator(1);
        // wedding has 6 subcategories: ceil(7/6) = 2 per subcategory, stop at 7.
        let templates = gen.generate_templates_for_category("wedding", 7);
        assert_eq!(templates.len(), 7);
        assert_eq!(templates[0].subcategory, "ceremony");
        assert_eq!(templates[1].subcategory, "ceremony");
        assert_eq!(templates[6].subcategory, "save-the-date");
    }

    #[test]
    fn test_never_exceeds_count() {
        let mut gen = generator(2);
        for count in [0, 1, 5, 6, 13, 300] {
            let templates = gen.generate_templates_for_category("wedding", count);
            assert_eq!(templates.len(), count, "count {}", count);
        }
    }

    #[test]
    fn test_unknown_category_is_empty() {
        let mut gen = generator(3);
        assert!(gen.generate_templates_for_category("funeral", 10).is_empty());
    }

    #[test]
    fn test_ids_are_deterministic_across_runs() {
        let first: Vec<String> = generator(10)
            .generate_templates_for_category("birthday", 40)
            .into_iter()
            .map(|t| t.id)
            .collect();
        let second: Vec<String> = TemplateGenerator::with_thread_rng(Arc::new(Catalog::builtin()))
            .generate_templates_for_category("birthday", 40)
            .into_iter()
            .map(|t| t.id)
            .collect();
        assert_eq!(first, second);
        assert_eq!(first[0], "birthday-kids-elegant-000");
    }

    #[test]
    fn test_styles_cycle_by_index() {
        let catalog = Catalog::builtin();
        let style_count = catalog.styles.len();
        let mut gen = generator(4);
        // One subcategory's worth is ceil(count / 5) for birthday.
        let templates = gen.generate_templates_for_category("birthday", 5 * (style_count + 2));
        let kids: Vec<_> = templates.iter().filter(|t| t.subcategory == "kids").collect();
        assert_eq!(kids.len(), style_count + 2);
        assert_eq!(kids[0].style, catalog.styles[0]);
        assert_eq!(kids[style_count].style, catalog.styles[0]);
        assert_eq!(kids[style_count + 1].style, catalog.styles[1]);
    }

    #[test]
    fn test_random_fields_within_domain() {
        let catalog = Catalog::builtin();
        let mut gen = generator(5);
        for template in gen.generate_templates_for_category("holiday", 120) {
            assert!((POPULARITY_MIN..=POPULARITY_MAX).contains(&template.popularity));
            assert!(catalog.palettes.contains(&template.colors));
            assert!(catalog.fonts.contains(&template.fonts));
            let flag = if template.is_premium { "premium" } else { "free" };
            assert!(template.tags.iter().any(|t| t == flag));
        }
    }

    #[test]
    fn test_record_fields_with_stub_randomness() {
        let catalog = Arc::new(Catalog::builtin());
        let mut gen = TemplateGenerator::new(Arc::clone(&catalog), Box::new(FirstPick));
        let template = &gen.generate_templates_for_category("wedding", 1)[0];

        assert_eq!(template.id, "wedding-ceremony-elegant-000");
        assert_eq!(template.name, "Grace Ceremony");
        assert_eq!(template.thumbnail_path, "/templates/wedding/wedding-ceremony-elegant-000.png");
        assert_eq!(template.colors, catalog.palettes[0]);
        assert_eq!(template.popularity, POPULARITY_MIN);
        assert!(!template.is_premium);
        assert_eq!(template.layout, catalog.layout_for(&template.style));
        assert_eq!(
            template.tags,
            vec!["wedding", "ceremony", "elegant", "classic-gold", "free"]
        );
    }

    #[test]
    fn test_generate_all_uses_target_counts() {
        let catalog = Catalog::builtin();
        let mut gen = generator(6);
        let templates = gen.generate_all_templates();
        assert_eq!(templates.len(), catalog.total_target_count());

        let stats = get_template_stats(&templates);
        for category in &catalog.categories {
            assert_eq!(stats.by_category[&category.key], category.target_count);
        }
    }

    #[test]
    fn test_stats_invariants() {
        let mut gen = generator(7);
        let mut templates = gen.generate_templates_for_category("wedding", 50);
        templates.extend(gen.generate_templates_for_category("corporate", 33));

        let stats = get_template_stats(&templates);
        assert_eq!(stats.total, 83);
        assert_eq!(stats.premium + stats.free, stats.total);
        assert_eq!(stats.by_category.values().sum::<usize>(), stats.total);
        assert_eq!(stats.by_style.values().sum::<usize>(), stats.total);
        assert_eq!(stats.by_category["corporate"], 33);
    }

    #[test]
    fn test_stats_empty() {
        let stats = get_template_stats(&[]);
        assert_eq!(stats, TemplateStats::default());
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("save-the-date"), "Save The Date");
        assert_eq!(title_case("art-deco"), "Art Deco");
    }
}
