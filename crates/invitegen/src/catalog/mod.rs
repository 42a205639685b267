pub mod defaults;
pub mod generator;
pub mod loader;
pub mod schema;

pub use generator::{
    get_template_stats, template_id, GeneratedTemplate, RandomSource, SeededRandom,
    TemplateGenerator, TemplateStats, ThreadRandom,
};
pub use loader::{load_catalog, load_catalog_from_str};
pub use schema::{
    Catalog, CatalogCategory, ColorPalette, DesignStyle, FontPairing, HeaderPosition,
    ImagePosition, Spacing, TemplateLayout, TextAlignment, FALLBACK_STYLE,
};
