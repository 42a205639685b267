//! Prompt text for the image model.
//!
//! Both builders are pure. The invitation prompt always carries the same hard
//! constraints so every generated background leaves room for the text overlay.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::catalog::{Catalog, ColorPalette, DesignStyle};
use crate::error::GenerationError;

/// Constraint forbidding rendered text. The model must leave lettering to the overlay.
pub const NO_TEXT_CONSTRAINT: &str = "NO text, letters, words or numbers anywhere in the image";

/// Decorative element types that can be generated on their own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecorationKind {
    Border,
    Corner,
    Flourish,
    Divider,
    Frame,
}

impl DecorationKind {
    pub const ALL: [DecorationKind; 5] = [
        DecorationKind::Border,
        DecorationKind::Corner,
        DecorationKind::Flourish,
        DecorationKind::Divider,
        DecorationKind::Frame,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DecorationKind::Border => "border",
            DecorationKind::Corner => "corner",
            DecorationKind::Flourish => "flourish",
            DecorationKind::Divider => "divider",
            DecorationKind::Frame => "frame",
        }
    }

    fn phrasing(&self) -> &'static str {
        match self {
            DecorationKind::Border => {
                "a decorative rectangular border that runs along all four edges, with an empty interior"
            }
            DecorationKind::Corner => {
                "a single ornamental corner piece designed for the top-left corner of a card"
            }
            DecorationKind::Flourish => {
                "a symmetrical calligraphic flourish ornament, centered, wider than it is tall"
            }
            DecorationKind::Divider => {
                "a thin horizontal divider ornament for separating lines of text"
            }
            DecorationKind::Frame => {
                "an ornate oval frame with a completely empty center"
            }
        }
    }
}

impl fmt::Display for DecorationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DecorationKind {
    type Err = GenerationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "border" => Ok(DecorationKind::Border),
            "corner" => Ok(DecorationKind::Corner),
            "flourish" => Ok(DecorationKind::Flourish),
            "divider" => Ok(DecorationKind::Divider),
            "frame" => Ok(DecorationKind::Frame),
            other => Err(GenerationError::InvalidArgument(format!(
                "unknown decoration kind '{}' (expected one of border, corner, flourish, divider, frame)",
                other
            ))),
        }
    }
}

pub fn compose_invitation_prompt(
    event_type: &str,
    subcategory: &str,
    style: &str,
    colors: &[String; 3],
    mood: &str,
) -> String {
    let event = event_type.replace('-', " ");
    let occasion = subcategory.replace('-', " ");
    format!(
        "Create a {style} invitation background design for a {event} {occasion}.\n\
         Style and mood: {style}; {mood}.\n\
         Color palette: primary color {primary}, secondary color {secondary}, accent color {accent}.\n\
         Requirements:\n\
         - Square 1:1 aspect ratio.\n\
         - Keep a large blank area in the center of the design reserved for text that will be added later.\n\
         - {no_text}.\n\
         - Confine decorative elements to the edges and corners of the composition.\n\
         - Print-quality artwork suitable for a 300 DPI printed card, crisp details, full bleed to every edge.",
        style = style,
        event = event,
        occasion = occasion,
        mood = mood,
        primary = colors[0],
        secondary = colors[1],
        accent = colors[2],
        no_text = NO_TEXT_CONSTRAINT,
    )
}

pub fn compose_decoration_prompt(kind: DecorationKind, style: &str, color: &str) -> String {
    format!(
        "Create {phrasing}, in a {style} style, drawn in {color}.\n\
         The element must be isolated on a transparent or plain white background so it can be composited onto other designs.\n\
         {no_text}. No background scenery, no shadows extending past the element.",
        phrasing = kind.phrasing(),
        style = style,
        color = color,
        no_text = NO_TEXT_CONSTRAINT,
    )
}

/// The inputs for one invitation prompt, resolved from the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptInputs {
    pub event_type: String,
    pub subcategory: String,
    pub style: String,
    pub colors: [String; 3],
    pub mood: String,
}

impl PromptInputs {
    /// Resolves the mood for `style`, falling back to the default style's mood.
    pub fn from_catalog(
        catalog: &Catalog,
        category: &str,
        subcategory: &str,
        style: &DesignStyle,
        palette: &ColorPalette,
    ) -> Self {
        Self {
            event_type: category.to_string(),
            subcategory: subcategory.to_string(),
            style: style.as_str().to_string(),
            colors: palette.colors.clone(),
            mood: catalog.mood_for(style).to_string(),
        }
    }

    pub fn compose(&self) -> String {
        compose_invitation_prompt(
            &self.event_type,
            &self.subcategory,
            &self.style,
            &self.colors,
            &self.mood,
        )
    }
}
