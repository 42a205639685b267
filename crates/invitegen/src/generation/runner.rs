use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use tracing::{debug, info, info_span, warn, Instrument};

use crate::catalog::{
    Catalog, CatalogCategory, ColorPalette, FontPairing, RandomSource, SeededRandom, ThreadRandom,
};
use crate::config::{Config, StorageKind};
use crate::error::{ConfigError, GenerationError, InvitegenError};
use crate::imaging::{HttpFetcher, ImageFetcher, ImageProcessor, ProcessedImage, RasterBackend};
use crate::prompt::{compose_decoration_prompt, DecorationKind, PromptInputs};
use crate::sanitize::redact_url;
use crate::storage::{
    content_type_for, decoration_key, template_key, FilesystemStore, HttpObjectStore,
    HttpStoreSettings, ObjectStore, Rendition, IMMUTABLE_CACHE_CONTROL,
};
use crate::synthesis::{ImageRequest, ImageSynthesizer, OpenAiSynthesizer, SynthesizedImage};

use super::cancel::CancelSignal;
use super::config::{BatchConfig, OrchestratorSettings};
use super::context::{TemplateContext, TemplatePhase, TemplateSlot};
use super::id::TemplateIdGenerator;
use super::progress::ProgressReporter;
use super::result::{BatchProgress, GenerationResult, TemplateMetadata};

const DECORATION_CATEGORY: &str = "decorations";

/// Stands in when no API key is available and the run only renders locally.
struct UnconfiguredSynthesizer;

#[async_trait]
impl ImageSynthesizer for UnconfiguredSynthesizer {
    async fn generate_image(
        &self,
        _request: &ImageRequest,
    ) -> Result<SynthesizedImage, GenerationError> {
        Err(GenerationError::GenerationFailed(
            "image synthesis is not configured (no API key)".to_string(),
        ))
    }
}

struct Uploaded {
    full_size_url: String,
    thumbnail_url: String,
}

/// Drives template generation: prompt, synthesis, post-processing, upload,
/// and the category and catalog batch loops around it.
pub struct Orchestrator {
    catalog: Arc<Catalog>,
    synthesizer: Arc<dyn ImageSynthesizer>,
    fetcher: Arc<dyn ImageFetcher>,
    store: Arc<dyn ObjectStore>,
    processor: ImageProcessor,
    settings: OrchestratorSettings,
    ids: TemplateIdGenerator,
    random: Mutex<Box<dyn RandomSource>>,
}

impl Orchestrator {
    pub fn new(
        catalog: Arc<Catalog>,
        synthesizer: Arc<dyn ImageSynthesizer>,
        fetcher: Arc<dyn ImageFetcher>,
        store: Arc<dyn ObjectStore>,
        processor: ImageProcessor,
    ) -> Self {
        Self {
            catalog,
            synthesizer,
            fetcher,
            store,
            processor,
            settings: OrchestratorSettings::default(),
            ids: TemplateIdGenerator::new(),
            random: Mutex::new(Box::new(ThreadRandom)),
        }
    }

    pub fn with_settings(mut self, settings: OrchestratorSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Source for palette and font picks in batch loops.
    pub fn with_random(mut self, random: Box<dyn RandomSource>) -> Self {
        self.random = Mutex::new(random);
        self
    }

    /// Production constructor: builds every collaborator from `config`.
    pub fn from_config(config: &Config) -> Result<Self, InvitegenError> {
        let catalog = Arc::new(config.load_catalog()?);

        let synthesizer: Arc<dyn ImageSynthesizer> = match config.synthesis.credentials.resolve() {
            Ok(api_key) => Arc::new(OpenAiSynthesizer::new(
                api_key,
                config.synthesis.to_settings(),
            )?),
            Err(e) if !config.batch.use_ai_synthesis => {
                debug!("No synthesis credentials ({}), local rendering only", e);
                Arc::new(UnconfiguredSynthesizer)
            }
            Err(e) => return Err(e.into()),
        };

        let store: Arc<dyn ObjectStore> = match config.storage.kind {
            StorageKind::Filesystem => {
                let root = config.storage.root.as_deref().unwrap_or("./output");
                let store = FilesystemStore::new(root);
                match &config.storage.public_base_url {
                    Some(base) => Arc::new(store.with_public_base_url(base.clone())),
                    None => Arc::new(store),
                }
            }
            StorageKind::Http => {
                let required = |field: &str, value: &Option<String>| {
                    value.clone().ok_or_else(|| ConfigError::Validation {
                        message: format!("HTTP storage requires '{}'", field),
                    })
                };
                let settings = HttpStoreSettings {
                    endpoint: required("endpoint", &config.storage.endpoint)?,
                    bucket: required("bucket", &config.storage.bucket)?,
                    domain: required("domain", &config.storage.domain)?,
                    connect_timeout: Duration::from_secs(config.synthesis.connect_timeout_secs),
                    request_timeout: Duration::from_secs(config.synthesis.request_timeout_secs),
                };
                let token = config.storage.credentials.resolve_optional()?;
                Arc::new(HttpObjectStore::new(settings, token)?)
            }
        };

        let processor = ImageProcessor::new(
            Arc::new(RasterBackend::new()),
            config.imaging.print_spec(),
            config.imaging.thumbnail_width,
        );

        let random: Box<dyn RandomSource> = match config.batch.seed {
            Some(seed) => Box::new(SeededRandom::new(seed)),
            None => Box::new(ThreadRandom),
        };

        Ok(Self::new(
            catalog,
            synthesizer,
            Arc::new(HttpFetcher::new()?),
            store,
            processor,
        )
        .with_settings(OrchestratorSettings::from_config(config))
        .with_random(random))
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Runs one slot through the pipeline. Never fails: any error becomes a
    /// failure result carrying its message.
    pub async fn generate_single_template(
        &self,
        slot: &TemplateSlot,
        use_ai_synthesis: bool,
    ) -> GenerationResult {
        let template_id = self
            .ids
            .next_id(&slot.category, &slot.subcategory, slot.style.as_str());
        let span = info_span!("template",
            template_id = %template_id,
            category = %slot.category,
            subcategory = %slot.subcategory,
            style = %slot.style,
            ai = use_ai_synthesis,
        );

        async move {
            let mut ctx = TemplateContext::new(template_id, slot.clone());
            let outcome = if use_ai_synthesis {
                self.run_synthesized(&mut ctx).await
            } else {
                self.run_local(&mut ctx).await
            };

            match outcome {
                Ok((uploaded, metadata)) => {
                    ctx.advance(TemplatePhase::Succeeded);
                    debug!("Template stored");
                    GenerationResult::success(
                        ctx.template_id,
                        uploaded.full_size_url,
                        uploaded.thumbnail_url,
                        metadata,
                    )
                }
                Err(e) => {
                    let failed_in = ctx.phase();
                    ctx.advance(TemplatePhase::Failed);
                    let source = ctx.image_url.as_deref().map(redact_url);
                    warn!(
                        phase = %failed_in,
                        trail = %ctx.trail(),
                        source = source.as_deref().unwrap_or("-"),
                        retryable = e.is_retryable(),
                        "Template failed: {}",
                        e
                    );
                    GenerationResult::failure(ctx.template_id, e.to_string())
                }
            }
        }
        .instrument(span)
        .await
    }

    async fn run_synthesized(
        &self,
        ctx: &mut TemplateContext,
    ) -> Result<(Uploaded, TemplateMetadata), GenerationError> {
        let slot = &ctx.slot;
        let prompt = PromptInputs::from_catalog(
            &self.catalog,
            &slot.category,
            &slot.subcategory,
            &slot.style,
            &slot.palette,
        )
        .compose();
        ctx.prompt = Some(prompt.clone());
        ctx.advance(TemplatePhase::PromptComposed);

        ctx.advance(TemplatePhase::Synthesizing);
        let image = self.synthesizer.generate_image(&self.request(prompt)).await?;
        ctx.revised_prompt = image.revised_prompt;
        ctx.image_url = Some(image.url.clone());

        ctx.advance(TemplatePhase::Downloading);
        let bytes = self.fetcher.fetch_bytes(&image.url).await?;

        ctx.advance(TemplatePhase::PostProcessing);
        let processed = self.processor.process_bytes(bytes).await?;

        ctx.advance(TemplatePhase::Uploading);
        let uploaded = self
            .upload(
                processed,
                Self::slot_key(ctx, Rendition::Full),
                Self::slot_key(ctx, Rendition::Thumb),
            )
            .await?;

        Ok((uploaded, self.metadata(ctx, true)))
    }

    async fn run_local(
        &self,
        ctx: &mut TemplateContext,
    ) -> Result<(Uploaded, TemplateMetadata), GenerationError> {
        ctx.advance(TemplatePhase::PostProcessing);
        let processor = self.processor.clone();
        let colors = ctx.slot.palette.colors.to_vec();
        let processed = tokio::task::spawn_blocking(move || {
            let side = processor.print_pixels();
            let full_size = processor.render_gradient_placeholder(&colors, side, side)?;
            let thumbnail = processor.derive_thumbnail(&full_size, processor.thumbnail_width())?;
            Ok::<_, GenerationError>(ProcessedImage {
                full_size,
                thumbnail,
            })
        })
        .await
        .map_err(|e| GenerationError::ImageProcessing(format!("Render worker failed: {}", e)))??;

        ctx.advance(TemplatePhase::Uploading);
        let uploaded = self
            .upload(
                processed,
                Self::slot_key(ctx, Rendition::Full),
                Self::slot_key(ctx, Rendition::Thumb),
            )
            .await?;

        Ok((uploaded, self.metadata(ctx, false)))
    }

    fn slot_key(ctx: &TemplateContext, rendition: Rendition) -> String {
        template_key(
            &ctx.slot.category,
            &ctx.slot.subcategory,
            &ctx.template_id,
            rendition,
        )
    }

    fn request(&self, prompt: String) -> ImageRequest {
        ImageRequest::new(prompt)
            .with_size(self.settings.size)
            .with_quality(self.settings.quality)
            .with_style_hint(self.settings.style_hint)
    }

    fn metadata(&self, ctx: &TemplateContext, synthesized: bool) -> TemplateMetadata {
        TemplateMetadata {
            category: ctx.slot.category.clone(),
            subcategory: ctx.slot.subcategory.clone(),
            style: ctx.slot.style.clone(),
            colors: ctx.slot.palette.colors.to_vec(),
            fonts: Some(ctx.slot.fonts.clone()),
            prompt: ctx.prompt.clone(),
            revised_prompt: ctx.revised_prompt.clone(),
            synthesized,
            generated_at: Utc::now(),
        }
    }

    async fn upload(
        &self,
        processed: ProcessedImage,
        full_key: String,
        thumb_key: String,
    ) -> Result<Uploaded, GenerationError> {
        let full_size_url = self
            .store
            .put(
                &full_key,
                processed.full_size,
                &content_type_for(&full_key),
                IMMUTABLE_CACHE_CONTROL,
            )
            .await?;
        let thumbnail_url = self
            .store
            .put(
                &thumb_key,
                processed.thumbnail,
                &content_type_for(&thumb_key),
                IMMUTABLE_CACHE_CONTROL,
            )
            .await?;
        Ok(Uploaded {
            full_size_url,
            thumbnail_url,
        })
    }

    /// Rejects settings and catalogs the batch loops cannot run, before any
    /// slot is attempted.
    fn check_batch(&self, config: &BatchConfig) -> Result<(), GenerationError> {
        if config.styles_per_subcategory == 0 {
            return Err(GenerationError::InvalidArgument(
                "styles_per_subcategory must be at least 1".to_string(),
            ));
        }
        if config.batch_size == 0 {
            return Err(GenerationError::InvalidArgument(
                "batch_size must be at least 1".to_string(),
            ));
        }
        if self.catalog.styles.is_empty() {
            return Err(GenerationError::InvalidArgument(
                "catalog has no styles".to_string(),
            ));
        }
        if self.catalog.palettes.is_empty() || self.catalog.fonts.is_empty() {
            return Err(GenerationError::InvalidArgument(
                "catalog has no palettes or font pairings".to_string(),
            ));
        }
        Ok(())
    }

    /// Only called after `check_batch`, so both lists are non-empty.
    fn pick_palette_and_fonts(&self) -> (ColorPalette, FontPairing) {
        let mut random = self
            .random
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let palette = self.catalog.palettes[random.index(self.catalog.palettes.len())].clone();
        let fonts = self.catalog.fonts[random.index(self.catalog.fonts.len())].clone();
        (palette, fonts)
    }

    fn slots_for(category: &CatalogCategory, config: &BatchConfig) -> usize {
        category.subcategories.len() * config.styles_per_subcategory
    }

    /// Generates `styles_per_subcategory` templates for every subcategory of
    /// `category_key`, in declaration order.
    ///
    /// An unknown key is an error before anything runs. Cancellation ends the
    /// loop at the next item boundary and returns what was produced so far.
    pub async fn generate_category_templates(
        &self,
        category_key: &str,
        config: &BatchConfig,
        progress: &dyn ProgressReporter,
        cancel: &CancelSignal,
    ) -> Result<Vec<GenerationResult>, GenerationError> {
        let category = self.catalog.category(category_key).ok_or_else(|| {
            GenerationError::InvalidArgument(format!("unknown category '{}'", category_key))
        })?;
        self.check_batch(config)?;

        let mut tally = BatchProgress::new(Self::slots_for(category, config));
        let mut ai_calls = 0;
        let span = info_span!("batch", run_id = %tally.run_id, category = %category.key);

        match self
            .run_category(category, config, &mut tally, progress, cancel, &mut ai_calls)
            .instrument(span)
            .await
        {
            Ok(()) => {}
            Err(GenerationError::Cancelled) => {
                info!(completed = tally.completed, "Category batch cancelled");
            }
            Err(e) => return Err(e),
        }

        Ok(tally.results)
    }

    /// Runs every configured category in order, pausing between categories.
    /// Progress totals cover the whole run.
    pub async fn generate_all_templates(
        &self,
        config: &BatchConfig,
        progress: &dyn ProgressReporter,
        cancel: &CancelSignal,
    ) -> Result<Vec<GenerationResult>, GenerationError> {
        let categories: Vec<&CatalogCategory> = match &config.categories {
            Some(keys) => keys
                .iter()
                .map(|key| {
                    self.catalog.category(key).ok_or_else(|| {
                        GenerationError::InvalidArgument(format!("unknown category '{}'", key))
                    })
                })
                .collect::<Result<_, _>>()?,
            None => self.catalog.categories.iter().collect(),
        };
        self.check_batch(config)?;

        let total = categories.iter().map(|c| Self::slots_for(c, config)).sum();
        let mut tally = BatchProgress::new(total);
        let mut ai_calls = 0;
        let span = info_span!("run", run_id = %tally.run_id, categories = categories.len(), total);

        async {
            info!("Starting generation run");
            for (index, category) in categories.iter().enumerate() {
                if index > 0 && cancel.sleep(config.delay_between_categories).await.is_err() {
                    info!(completed = tally.completed, "Run cancelled");
                    break;
                }

                let category_span = info_span!("category", category = %category.key);
                match self
                    .run_category(category, config, &mut tally, progress, cancel, &mut ai_calls)
                    .instrument(category_span)
                    .await
                {
                    Ok(()) => {}
                    Err(GenerationError::Cancelled) => {
                        info!(completed = tally.completed, "Run cancelled");
                        break;
                    }
                    Err(e) => return Err(e),
                }
            }
            info!(
                completed = tally.completed,
                failed = tally.failed,
                "Generation run finished"
            );
            Ok(())
        }
        .instrument(span)
        .await?;

        Ok(tally.results)
    }

    async fn run_category(
        &self,
        category: &CatalogCategory,
        config: &BatchConfig,
        tally: &mut BatchProgress,
        progress: &dyn ProgressReporter,
        cancel: &CancelSignal,
        ai_calls: &mut usize,
    ) -> Result<(), GenerationError> {
        let per_subcategory = config.styles_per_subcategory;
        let last_slot = Self::slots_for(category, config).saturating_sub(1);

        for (sub_index, subcategory) in category.subcategories.iter().enumerate() {
            for style_offset in 0..per_subcategory {
                cancel.check()?;

                let slot_index = sub_index * per_subcategory + style_offset;
                let style = self.catalog.style_at(slot_index).cloned().ok_or_else(|| {
                    GenerationError::InvalidArgument("catalog has no styles".to_string())
                })?;
                let (palette, fonts) = self.pick_palette_and_fonts();
                let slot = TemplateSlot::new(
                    category.key.clone(),
                    subcategory.clone(),
                    style,
                    palette,
                    fonts,
                );

                tally.current_category = Some(category.key.clone());
                tally.current_subcategory = Some(subcategory.clone());
                let result = self
                    .generate_single_template(&slot, config.use_ai_synthesis)
                    .await;
                tally.record(result);
                progress.report(tally);

                // Local rendering is never throttled.
                if config.use_ai_synthesis {
                    *ai_calls += 1;
                    if *ai_calls % config.batch_size == 0 && slot_index < last_slot {
                        info!(
                            calls = *ai_calls,
                            delay_ms = config.delay_between_batches.as_millis() as u64,
                            "Pausing between synthesis batches"
                        );
                        cancel.sleep(config.delay_between_batches).await?;
                    }
                }
            }
        }

        Ok(())
    }

    /// Synthesizes one standalone decorative element and stores it under
    /// `decorations/{kind}/`.
    pub async fn generate_decoration(
        &self,
        kind: DecorationKind,
        style: &str,
        color: &str,
    ) -> GenerationResult {
        let id = self.ids.next_with_parts(&[kind.as_str(), style]);
        let span = info_span!("decoration", id = %id, kind = %kind, style = %style);

        async {
            let prompt = compose_decoration_prompt(kind, style, color);
            let outcome: Result<(Uploaded, Option<String>), GenerationError> = async {
                if style.trim().is_empty() || color.trim().is_empty() {
                    return Err(GenerationError::InvalidArgument(
                        "decoration style and color are required".to_string(),
                    ));
                }
                let image = self.synthesizer.generate_image(&self.request(prompt.clone())).await?;
                let bytes = self.fetcher.fetch_bytes(&image.url).await?;
                let processed = self.processor.process_bytes(bytes).await?;
                let uploaded = self
                    .upload(
                        processed,
                        decoration_key(kind, &id, Rendition::Full),
                        decoration_key(kind, &id, Rendition::Thumb),
                    )
                    .await?;
                Ok((uploaded, image.revised_prompt))
            }
            .await;

            match outcome {
                Ok((uploaded, revised_prompt)) => GenerationResult::success(
                    id.clone(),
                    uploaded.full_size_url,
                    uploaded.thumbnail_url,
                    TemplateMetadata {
                        category: DECORATION_CATEGORY.to_string(),
                        subcategory: kind.to_string(),
                        style: style.into(),
                        colors: vec![color.to_string()],
                        fonts: None,
                        prompt: Some(prompt),
                        revised_prompt,
                        synthesized: true,
                        generated_at: Utc::now(),
                    },
                ),
                Err(e) => {
                    warn!("Decoration failed: {}", e);
                    GenerationResult::failure(id.clone(), e.to_string())
                }
            }
        }
        .instrument(span)
        .await
    }
}
