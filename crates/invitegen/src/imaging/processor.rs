use std::sync::Arc;

use futures_util::future::try_join;
use tracing::debug;

use super::backend::{Encoding, FitMode, ImageBackend, RasterBackend};
use super::fetch::ImageFetcher;
use super::markup::{overlay_svg, placeholder_svg, OverlayStyle, OverlayText};
use super::PrintSpec;
use crate::error::GenerationError;

pub const DEFAULT_THUMBNAIL_WIDTH: u32 = 400;

/// Both renditions of one downloaded image.
#[derive(Debug, Clone)]
pub struct ProcessedImage {
    pub full_size: Vec<u8>,
    pub thumbnail: Vec<u8>,
}

/// Print normalization, thumbnails, placeholders and preview overlays.
#[derive(Clone)]
pub struct ImageProcessor {
    backend: Arc<dyn ImageBackend>,
    print: PrintSpec,
    thumbnail_width: u32,
}

impl ImageProcessor {
    pub fn new(backend: Arc<dyn ImageBackend>, print: PrintSpec, thumbnail_width: u32) -> Self {
        Self {
            backend,
            print,
            thumbnail_width,
        }
    }

    /// Raster backend, 148 mm at 300 DPI, 400 px thumbnails.
    pub fn with_defaults() -> Self {
        Self::new(
            Arc::new(RasterBackend::new()),
            PrintSpec::default(),
            DEFAULT_THUMBNAIL_WIDTH,
        )
    }

    pub fn print_pixels(&self) -> u32 {
        self.print.pixels()
    }

    pub fn thumbnail_width(&self) -> u32 {
        self.thumbnail_width
    }

    pub fn normalize_for_print(&self, bytes: &[u8]) -> Result<Vec<u8>, GenerationError> {
        let side = self.print.pixels();
        self.backend
            .resize(bytes, side, side, FitMode::Cover, Encoding::PrintPng)
    }

    pub fn derive_thumbnail(
        &self,
        bytes: &[u8],
        target_width: u32,
    ) -> Result<Vec<u8>, GenerationError> {
        if target_width == 0 {
            return Err(GenerationError::InvalidArgument(
                "thumbnail width must be positive".to_string(),
            ));
        }
        let source = self.backend.metadata(bytes)?;
        if source.width == 0 {
            return Err(GenerationError::ImageProcessing(
                "source image has zero width".to_string(),
            ));
        }
        let height = (target_width as f64 * source.height as f64 / source.width as f64)
            .round()
            .max(1.0) as u32;
        self.backend
            .resize(bytes, target_width, height, FitMode::Cover, Encoding::WebPng)
    }

    /// Print rendition and thumbnail of `bytes`, derived concurrently from the
    /// same source on blocking threads.
    pub async fn process_bytes(&self, bytes: Vec<u8>) -> Result<ProcessedImage, GenerationError> {
        let source = Arc::new(bytes);

        let full = {
            let this = self.clone();
            let source = Arc::clone(&source);
            tokio::task::spawn_blocking(move || this.normalize_for_print(&source))
        };
        let thumb = {
            let this = self.clone();
            let width = self.thumbnail_width;
            tokio::task::spawn_blocking(move || this.derive_thumbnail(&source, width))
        };

        let (full, thumb) = try_join(full, thumb).await.map_err(|e| {
            GenerationError::ImageProcessing(format!("Image worker failed: {}", e))
        })?;

        Ok(ProcessedImage {
            full_size: full?,
            thumbnail: thumb?,
        })
    }

    /// Downloads `url` once and derives both renditions from it.
    pub async fn process_for_catalog(
        &self,
        fetcher: &dyn ImageFetcher,
        url: &str,
    ) -> Result<ProcessedImage, GenerationError> {
        let bytes = fetcher.fetch_bytes(url).await?;
        debug!(bytes = bytes.len(), "Processing downloaded image");
        self.process_bytes(bytes).await
    }

    /// Renders the local stand-in background. Uses `colors[0..3]` as gradient
    /// center, gradient edge and accent.
    pub fn render_gradient_placeholder(
        &self,
        colors: &[String],
        width: u32,
        height: u32,
    ) -> Result<Vec<u8>, GenerationError> {
        let palette: &[String; 3] = colors
            .get(..3)
            .and_then(|c| c.try_into().ok())
            .ok_or_else(|| {
                GenerationError::InvalidArgument(format!(
                    "placeholder needs 3 colors, got {}",
                    colors.len()
                ))
            })?;
        let svg = placeholder_svg(palette, width, height);
        self.backend.render_svg(&svg, width, height)
    }

    pub fn composite_text_overlay(
        &self,
        bytes: &[u8],
        text: &OverlayText,
        style: &OverlayStyle,
    ) -> Result<Vec<u8>, GenerationError> {
        if text.title.trim().is_empty() {
            return Err(GenerationError::MalformedInput(
                "overlay title must not be empty".to_string(),
            ));
        }
        let dims = self.backend.metadata(bytes)?;
        let svg = overlay_svg(text, style, dims.width, dims.height);
        self.backend.composite(bytes, &svg)
    }
}
