//! Test harness for orchestrator runs.
//!
//! Synthesis and downloads are replaced with in-memory doubles that count
//! their calls; storage is a `FilesystemStore` under a temporary directory
//! behind a wrapper that can reject chosen puts.

#![allow(dead_code)]

use std::collections::HashSet;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use tempfile::TempDir;

use invitegen::catalog::{Catalog, SeededRandom};
use invitegen::imaging::{ImageFetcher, ImageProcessor, PrintSpec, RasterBackend};
use invitegen::storage::ObjectStore;
use invitegen::synthesis::{ImageRequest, ImageSynthesizer, SynthesizedImage};
use invitegen::{FilesystemStore, GenerationError, Orchestrator};

/// Print canvas edge used by the harness processor.
pub const PRINT_PIXELS: u32 = 48;
pub const THUMBNAIL_WIDTH: u32 = 16;

/// Returns a distinct URL per call; fails the calls whose 1-based number is
/// in `fail_on`.
pub struct ScriptedSynthesizer {
    calls: AtomicUsize,
    fail_on: HashSet<usize>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedSynthesizer {
    pub fn new() -> Self {
        Self::failing_on(&[])
    }

    pub fn failing_on(calls: &[usize]) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            fail_on: calls.iter().copied().collect(),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl ImageSynthesizer for ScriptedSynthesizer {
    async fn generate_image(
        &self,
        request: &ImageRequest,
    ) -> Result<SynthesizedImage, GenerationError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        self.prompts.lock().unwrap().push(request.prompt.clone());
        if self.fail_on.contains(&call) {
            return Err(GenerationError::GenerationFailed(format!(
                "Image API returned 500 on call {}",
                call
            )));
        }
        Ok(SynthesizedImage {
            url: format!("https://images.test/generated/{}.png", call),
            revised_prompt: Some(format!("revised prompt {}", call)),
        })
    }
}

/// Serves the same small PNG for every URL; answers the calls whose 1-based
/// number is in `fail_on` with a 404.
pub struct StaticFetcher {
    calls: AtomicUsize,
    fail_on: HashSet<usize>,
    body: Vec<u8>,
}

impl StaticFetcher {
    pub fn new() -> Self {
        Self::failing_on(&[])
    }

    pub fn failing_on(calls: &[usize]) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            fail_on: calls.iter().copied().collect(),
            body: sample_png(64, 40),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ImageFetcher for StaticFetcher {
    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, GenerationError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if self.fail_on.contains(&call) {
            return Err(GenerationError::DownloadFailed {
                url: url.to_string(),
                status: Some(404),
            });
        }
        Ok(self.body.clone())
    }
}

/// `FilesystemStore` that rejects the puts whose 1-based number is in
/// `fail_on`. Rejected puts write nothing.
pub struct ScriptedStore {
    inner: FilesystemStore,
    puts: AtomicUsize,
    fail_on: HashSet<usize>,
}

impl ScriptedStore {
    pub fn new(root: &Path, fail_on: &[usize]) -> Self {
        Self {
            inner: FilesystemStore::new(root),
            puts: AtomicUsize::new(0),
            fail_on: fail_on.iter().copied().collect(),
        }
    }

    pub fn puts(&self) -> usize {
        self.puts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ObjectStore for ScriptedStore {
    async fn put(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
        cache_control: &str,
    ) -> Result<String, GenerationError> {
        let put = self.puts.fetch_add(1, Ordering::SeqCst) + 1;
        if self.fail_on.contains(&put) {
            return Err(GenerationError::UploadFailed {
                key: key.to_string(),
                reason: "storage returned 503".to_string(),
            });
        }
        self.inner.put(key, bytes, content_type, cache_control).await
    }

    fn public_url(&self, key: &str) -> String {
        self.inner.public_url(key)
    }
}

/// Encodes a solid-color PNG of the given size.
pub fn sample_png(width: u32, height: u32) -> Vec<u8> {
    let image = RgbaImage::from_pixel(width, height, Rgba([212, 175, 55, 255]));
    let mut buf = Cursor::new(Vec::new());
    DynamicImage::ImageRgba8(image)
        .write_to(&mut buf, ImageFormat::Png)
        .expect("Failed to encode sample PNG");
    buf.into_inner()
}

/// Isolated environment: temp store root plus counting doubles.
pub struct TestHarness {
    temp_dir: TempDir,
    pub store_root: PathBuf,
    pub synthesizer: Arc<ScriptedSynthesizer>,
    pub fetcher: Arc<StaticFetcher>,
    pub store: Arc<ScriptedStore>,
}

impl TestHarness {
    pub fn new() -> Self {
        Self::with_synthesizer(ScriptedSynthesizer::new())
    }

    pub fn with_synthesizer(synthesizer: ScriptedSynthesizer) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let store_root = temp_dir.path().join("store");
        std::fs::create_dir_all(&store_root).expect("Failed to create store dir");
        let store = Arc::new(ScriptedStore::new(&store_root, &[]));
        Self {
            temp_dir,
            store_root,
            synthesizer: Arc::new(synthesizer),
            fetcher: Arc::new(StaticFetcher::new()),
            store,
        }
    }

    pub fn with_fetcher(mut self, fetcher: StaticFetcher) -> Self {
        self.fetcher = Arc::new(fetcher);
        self
    }

    /// Rejects the listed 1-based store puts.
    pub fn failing_puts(mut self, puts: &[usize]) -> Self {
        self.store = Arc::new(ScriptedStore::new(&self.store_root, puts));
        self
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn orchestrator(&self, catalog: Catalog) -> Orchestrator {
        let processor = ImageProcessor::new(
            Arc::new(RasterBackend::new()),
            PrintSpec {
                size_mm: 25.4,
                dpi: PRINT_PIXELS,
            },
            THUMBNAIL_WIDTH,
        );
        Orchestrator::new(
            Arc::new(catalog),
            self.synthesizer.clone(),
            self.fetcher.clone(),
            self.store.clone(),
            processor,
        )
        .with_random(Box::new(SeededRandom::new(42)))
    }

    /// Reads a stored object and returns its pixel dimensions.
    pub fn stored_dimensions(&self, key: &str) -> (u32, u32) {
        let bytes = std::fs::read(self.store_root.join(key))
            .unwrap_or_else(|e| panic!("missing stored object {}: {}", key, e));
        let image = image::load_from_memory(&bytes).expect("stored object is not an image");
        (image.width(), image.height())
    }

    /// All stored keys, relative to the store root, sorted.
    pub fn stored_keys(&self) -> Vec<String> {
        let mut keys = Vec::new();
        collect_files(&self.store_root, &self.store_root, &mut keys);
        keys.sort();
        keys
    }
}

fn collect_files(root: &Path, dir: &Path, out: &mut Vec<String>) {
    for entry in std::fs::read_dir(dir).expect("Failed to read store dir") {
        let path = entry.expect("Failed to read entry").path();
        if path.is_dir() {
            collect_files(root, &path, out);
        } else {
            let relative = path.strip_prefix(root).expect("path under root");
            out.push(relative.to_string_lossy().replace('\\', "/"));
        }
    }
}
