//! Image post-processing: print normalization, thumbnails, local placeholders
//! and text-overlay previews.

pub mod backend;
pub mod fetch;
pub mod markup;
pub mod processor;

use serde::{Deserialize, Serialize};

pub use backend::{Encoding, FitMode, ImageBackend, ImageDimensions, RasterBackend};
pub use fetch::{HttpFetcher, ImageFetcher};
pub use markup::{escape_markup, OverlayStyle, OverlayText};
pub use processor::{ImageProcessor, ProcessedImage, DEFAULT_THUMBNAIL_WIDTH};

const MM_PER_INCH: f64 = 25.4;

/// Physical size of the square print canvas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrintSpec {
    pub size_mm: f64,
    pub dpi: u32,
}

impl Default for PrintSpec {
    fn default() -> Self {
        Self {
            size_mm: 148.0,
            dpi: 300,
        }
    }
}

impl PrintSpec {
    /// Canvas edge in pixels.
    pub fn pixels(&self) -> u32 {
        (self.size_mm / MM_PER_INCH * self.dpi as f64).round() as u32
    }
}
