use std::io::Cursor;
use std::sync::Arc;

use image::codecs::png::{CompressionType, FilterType as PngFilter, PngEncoder};
use image::imageops::FilterType;
use image::{DynamicImage, ImageReader, Rgba, RgbaImage};
use resvg::tiny_skia::{Pixmap, Transform};
use resvg::usvg;

use crate::error::GenerationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageDimensions {
    pub width: u32,
    pub height: u32,
}

/// How a source is fitted to a target box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FitMode {
    /// Fill the box, cropping the overflow around the center.
    Cover,
    /// Fit inside the box, padding the remainder.
    Contain,
}

/// Output encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    /// RGBA PNG, Lanczos3 resampling, default compression.
    PrintPng,
    /// RGB PNG, triangle resampling, best compression.
    WebPng,
}

impl Encoding {
    fn filter(&self) -> FilterType {
        match self {
            Encoding::PrintPng => FilterType::Lanczos3,
            Encoding::WebPng => FilterType::Triangle,
        }
    }
}

/// The image operations the pipeline depends on.
pub trait ImageBackend: Send + Sync {
    fn metadata(&self, bytes: &[u8]) -> Result<ImageDimensions, GenerationError>;

    fn resize(
        &self,
        bytes: &[u8],
        width: u32,
        height: u32,
        fit: FitMode,
        encoding: Encoding,
    ) -> Result<Vec<u8>, GenerationError>;

    /// Draws `overlay_svg`, scaled to the base image, on top of `base`.
    fn composite(&self, base: &[u8], overlay_svg: &str) -> Result<Vec<u8>, GenerationError>;

    /// Rasterizes `svg` to a `width` x `height` PNG.
    fn render_svg(&self, svg: &str, width: u32, height: u32) -> Result<Vec<u8>, GenerationError>;
}

fn processing(context: &str, e: impl std::fmt::Display) -> GenerationError {
    GenerationError::ImageProcessing(format!("{}: {}", context, e))
}

/// `image` for raster work, `resvg` for SVG.
pub struct RasterBackend {
    fontdb: Arc<usvg::fontdb::Database>,
}

impl Default for RasterBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl RasterBackend {
    /// Loads the system fonts once. Text in SVG overlays resolves against them.
    pub fn new() -> Self {
        let mut fontdb = usvg::fontdb::Database::new();
        fontdb.load_system_fonts();
        Self {
            fontdb: Arc::new(fontdb),
        }
    }

    fn decode(&self, bytes: &[u8]) -> Result<DynamicImage, GenerationError> {
        image::load_from_memory(bytes).map_err(|e| processing("Failed to decode image", e))
    }

    fn encode(&self, image: DynamicImage, encoding: Encoding) -> Result<Vec<u8>, GenerationError> {
        let (image, compression) = match encoding {
            Encoding::PrintPng => (
                DynamicImage::ImageRgba8(image.to_rgba8()),
                CompressionType::Default,
            ),
            Encoding::WebPng => (
                DynamicImage::ImageRgb8(image.to_rgb8()),
                CompressionType::Best,
            ),
        };

        let mut buffer = Vec::new();
        let encoder = PngEncoder::new_with_quality(&mut buffer, compression, PngFilter::Adaptive);
        image
            .write_with_encoder(encoder)
            .map_err(|e| processing("Failed to encode PNG", e))?;
        Ok(buffer)
    }

    fn rasterize(&self, svg: &str, width: u32, height: u32) -> Result<Pixmap, GenerationError> {
        let options = usvg::Options {
            fontdb: self.fontdb.clone(),
            ..Default::default()
        };
        let tree =
            usvg::Tree::from_str(svg, &options).map_err(|e| processing("Invalid SVG markup", e))?;

        let mut pixmap = Pixmap::new(width, height).ok_or_else(|| {
            GenerationError::InvalidArgument(format!(
                "cannot allocate a {}x{} canvas",
                width, height
            ))
        })?;

        let size = tree.size();
        let transform = Transform::from_scale(
            width as f32 / size.width(),
            height as f32 / size.height(),
        );
        resvg::render(&tree, transform, &mut pixmap.as_mut());
        Ok(pixmap)
    }
}

impl ImageBackend for RasterBackend {
    fn metadata(&self, bytes: &[u8]) -> Result<ImageDimensions, GenerationError> {
        let (width, height) = ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()
            .map_err(|e| processing("Failed to read image header", e))?
            .into_dimensions()
            .map_err(|e| processing("Failed to read image dimensions", e))?;
        Ok(ImageDimensions { width, height })
    }

    fn resize(
        &self,
        bytes: &[u8],
        width: u32,
        height: u32,
        fit: FitMode,
        encoding: Encoding,
    ) -> Result<Vec<u8>, GenerationError> {
        if width == 0 || height == 0 {
            return Err(GenerationError::InvalidArgument(format!(
                "target size {}x{} is empty",
                width, height
            )));
        }

        let source = self.decode(bytes)?;
        let filter = encoding.filter();
        let resized = match fit {
            FitMode::Cover => source.resize_to_fill(width, height, filter),
            FitMode::Contain => {
                let inner = source.resize(width, height, filter).to_rgba8();
                let background = match encoding {
                    Encoding::PrintPng => Rgba([0, 0, 0, 0]),
                    Encoding::WebPng => Rgba([255, 255, 255, 255]),
                };
                let mut canvas = RgbaImage::from_pixel(width, height, background);
                let x = (width - inner.width()) / 2;
                let y = (height - inner.height()) / 2;
                image::imageops::overlay(&mut canvas, &inner, x as i64, y as i64);
                DynamicImage::ImageRgba8(canvas)
            }
        };

        self.encode(resized, encoding)
    }

    fn composite(&self, base: &[u8], overlay_svg: &str) -> Result<Vec<u8>, GenerationError> {
        let mut base = self.decode(base)?.to_rgba8();
        let pixmap = self.rasterize(overlay_svg, base.width(), base.height())?;
        // Round-trip through PNG to get straight (non-premultiplied) alpha.
        let png = pixmap
            .encode_png()
            .map_err(|e| processing("Failed to encode overlay", e))?;
        let overlay = self.decode(&png)?.to_rgba8();
        image::imageops::overlay(&mut base, &overlay, 0, 0);
        self.encode(DynamicImage::ImageRgba8(base), Encoding::PrintPng)
    }

    fn render_svg(&self, svg: &str, width: u32, height: u32) -> Result<Vec<u8>, GenerationError> {
        self.rasterize(svg, width, height)?
            .encode_png()
            .map_err(|e| processing("Failed to encode PNG", e))
    }
}
