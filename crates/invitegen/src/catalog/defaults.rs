//! Built-in invitation catalog.

use std::collections::BTreeMap;

use super::schema::{
    Catalog, CatalogCategory, ColorPalette, DesignStyle, FontPairing, HeaderPosition,
    ImagePosition, Spacing, TemplateLayout, TextAlignment,
};

const CATEGORIES: &[(&str, &str, &[&str], usize)] = &[
    (
        "wedding",
        "Wedding",
        &[
            "ceremony",
            "reception",
            "engagement",
            "save-the-date",
            "rehearsal-dinner",
            "bridal-shower",
        ],
        300,
    ),
    (
        "birthday",
        "Birthday",
        &["kids", "adult", "milestone", "surprise", "first-birthday"],
        250,
    ),
    (
        "baby-shower",
        "Baby Shower",
        &["boy", "girl", "neutral", "gender-reveal", "sprinkle"],
        150,
    ),
    (
        "holiday",
        "Holiday",
        &[
            "christmas",
            "new-year",
            "thanksgiving",
            "halloween",
            "hanukkah",
            "easter",
        ],
        200,
    ),
    (
        "corporate",
        "Corporate",
        &[
            "conference",
            "gala",
            "product-launch",
            "networking",
            "holiday-party",
        ],
        150,
    ),
    (
        "graduation",
        "Graduation",
        &["high-school", "college", "graduate-degree", "kindergarten"],
        100,
    ),
    (
        "anniversary",
        "Anniversary",
        &["first", "silver", "golden", "vow-renewal"],
        80,
    ),
    (
        "dinner-party",
        "Dinner Party",
        &["formal", "casual", "cocktail", "brunch"],
        80,
    ),
    (
        "religious",
        "Religious",
        &[
            "baptism",
            "communion",
            "bar-mitzvah",
            "bat-mitzvah",
            "confirmation",
        ],
        90,
    ),
];

/// (style, mood, name words)
const STYLES: &[(&str, &str, &[&str])] = &[
    (
        "elegant",
        "sophisticated, refined, graceful, luxurious, timeless",
        &["Grace", "Luxe", "Regal", "Velvet", "Opulence"],
    ),
    (
        "minimalist",
        "clean, simple, understated, airy, modern restraint",
        &["Pure", "Essence", "Line", "Still", "Simple"],
    ),
    (
        "vintage",
        "retro, nostalgic, classic, antique charm, timeless",
        &["Heirloom", "Keepsake", "Sepia", "Memoir", "Cameo"],
    ),
    (
        "modern",
        "bold, contemporary, fresh, sleek, confident",
        &["Edge", "Nova", "Metro", "Prism", "Vivid"],
    ),
    (
        "rustic",
        "warm, natural, earthy, handcrafted, cozy",
        &["Barnwood", "Meadow", "Timber", "Harvest", "Hearth"],
    ),
    (
        "floral",
        "romantic, blooming, lush, delicate, garden-inspired",
        &["Bloom", "Petal", "Blossom", "Garden", "Rosette"],
    ),
    (
        "bohemian",
        "free-spirited, eclectic, layered, sun-washed, artistic",
        &["Wanderer", "Desert", "Macrame", "Sunset", "Gypsy"],
    ),
    (
        "art-deco",
        "glamorous, geometric, gilded, roaring twenties, symmetrical",
        &["Gatsby", "Gilded", "Deco", "Jazz", "Empire"],
    ),
    (
        "watercolor",
        "soft, dreamy, painterly, flowing, translucent washes",
        &["Wash", "Dream", "Mist", "Aquarelle", "Haze"],
    ),
    (
        "geometric",
        "structured, angular, crisp, balanced, pattern-driven",
        &["Facet", "Lattice", "Vertex", "Grid", "Polygon"],
    ),
    (
        "whimsical",
        "playful, joyful, lighthearted, imaginative, storybook",
        &["Confetti", "Sprinkle", "Wonder", "Giggle", "Dreamland"],
    ),
    (
        "botanical",
        "lush greenery, organic, leafy, fresh, natural elegance",
        &["Fern", "Eucalyptus", "Ivy", "Sage", "Canopy"],
    ),
];

const PALETTES: &[(&str, &str, &str, &str)] = &[
    ("Classic Gold", "#D4AF37", "#1C1917", "#FAFAF9"),
    ("Blush Romance", "#F4C2C2", "#FFF5F5", "#B76E79"),
    ("Navy & Silver", "#1E3A5F", "#F8FAFC", "#C0C0C0"),
    ("Sage Garden", "#9CAF88", "#F5F5DC", "#556B2F"),
    ("Burgundy Wine", "#800020", "#FDF6EC", "#D4AF37"),
    ("Dusty Blue", "#8BA5C1", "#F0F4F8", "#2F4858"),
    ("Terracotta", "#E2725B", "#FAF0E6", "#8B4513"),
    ("Lavender Mist", "#B57EDC", "#F8F4FF", "#5B3A7A"),
    ("Emerald Luxe", "#046307", "#F5F5F0", "#C9A227"),
    ("Coral Sunset", "#FF7F50", "#FFF8F0", "#2E4057"),
    ("Monochrome", "#111111", "#FFFFFF", "#888888"),
    ("Pastel Rainbow", "#FFD1DC", "#E0F7FA", "#FFB347"),
];

const FONTS: &[(&str, &str)] = &[
    ("Playfair Display", "Lato"),
    ("Great Vibes", "Montserrat"),
    ("Cormorant Garamond", "Proza Libre"),
    ("Cinzel", "Raleway"),
    ("Dancing Script", "Open Sans"),
    ("Libre Baskerville", "Source Sans Pro"),
    ("Josefin Sans", "Merriweather"),
    ("Abril Fatface", "Poppins"),
    ("Parisienne", "Quicksand"),
    ("Bebas Neue", "Nunito"),
];

fn layout(
    header_position: HeaderPosition,
    image_position: ImagePosition,
    text_alignment: TextAlignment,
    decorations: &[&str],
    spacing: Spacing,
) -> TemplateLayout {
    TemplateLayout {
        header_position,
        image_position,
        text_alignment,
        decorations: decorations.iter().map(|d| d.to_string()).collect(),
        spacing,
    }
}

fn layout_for_style(style: &str) -> TemplateLayout {
    use HeaderPosition as H;
    use ImagePosition as I;
    use Spacing as S;
    use TextAlignment as T;

    match style {
        "minimalist" => layout(H::Center, I::None, T::Center, &[], S::Spacious),
        "vintage" => layout(
            H::Top,
            I::Background,
            T::Center,
            &["ornate-border", "corner-flourish"],
            S::Balanced,
        ),
        "modern" => layout(H::Top, I::Left, T::Left, &["accent-bar"], S::Balanced),
        "rustic" => layout(
            H::Top,
            I::Background,
            T::Center,
            &["twine", "wood-texture"],
            S::Balanced,
        ),
        "floral" => layout(
            H::Center,
            I::Background,
            T::Center,
            &["floral-frame", "corner-bouquet"],
            S::Spacious,
        ),
        "bohemian" => layout(H::Bottom, I::Top, T::Center, &["feathers", "pampas"], S::Balanced),
        "art-deco" => layout(
            H::Center,
            I::Background,
            T::Center,
            &["geometric-frame", "fan-motif"],
            S::Compact,
        ),
        "watercolor" => layout(H::Center, I::Background, T::Center, &["paint-wash"], S::Spacious),
        "geometric" => layout(
            H::Top,
            I::Right,
            T::Left,
            &["polygon-frame", "line-grid"],
            S::Compact,
        ),
        "whimsical" => layout(
            H::Top,
            I::Background,
            T::Center,
            &["confetti", "stars"],
            S::Compact,
        ),
        "botanical" => layout(H::Center, I::Left, T::Left, &["leaf-border", "vine"], S::Balanced),
        _ => TemplateLayout::elegant(),
    }
}

impl Catalog {
    /// The catalog shipped with the crate.
    pub fn builtin() -> Self {
        let categories = CATEGORIES
            .iter()
            .map(|(key, name, subs, target)| CatalogCategory {
                key: key.to_string(),
                display_name: name.to_string(),
                subcategories: subs.iter().map(|s| s.to_string()).collect(),
                target_count: *target,
            })
            .collect();

        let mut moods = BTreeMap::new();
        let mut layouts = BTreeMap::new();
        let mut name_words = BTreeMap::new();
        let mut styles = Vec::with_capacity(STYLES.len());
        for (key, mood, words) in STYLES {
            let style = DesignStyle::from(*key);
            moods.insert(style.clone(), mood.to_string());
            layouts.insert(style.clone(), layout_for_style(key));
            name_words.insert(style.clone(), words.iter().map(|w| w.to_string()).collect());
            styles.push(style);
        }

        Self {
            categories,
            styles,
            palettes: PALETTES
                .iter()
                .map(|(name, p, s, a)| ColorPalette::new(name, p, s, a))
                .collect(),
            fonts: FONTS.iter().map(|(h, b)| FontPairing::new(h, b)).collect(),
            moods,
            layouts,
            name_words,
        }
    }
}
