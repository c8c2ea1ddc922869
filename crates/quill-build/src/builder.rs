//! Post builder: pre-steps, then conversion of every post.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use quill_config::Config;
use quill_renderer::{BlogHooks, RenderHooks};
use tracing::{info, warn};

use crate::discover::discover;
use crate::error::{BuildError, PreStepError};
use crate::persist::ensure_output_dir;
use crate::pipeline::{BuildSummary, ConversionOutcome, Pipeline};
use crate::prestep::{self, ImageStep, IndexStep, MinifySummary};

/// Paths, limits and pre-steps for one build.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    /// Directory of markdown posts.
    pub source_dir: PathBuf,
    /// Directory receiving the HTML files.
    pub output_dir: PathBuf,
    /// Entry names in the source directory that are not posts.
    pub placeholders: Vec<String>,
    /// Marker file created in the output directory.
    pub output_marker: Option<String>,
    /// Maximum number of files converted at the same time.
    pub concurrency: usize,
    /// Time a single file may take.
    pub file_timeout: Duration,
    /// Enable GitHub Flavored Markdown extensions.
    pub gfm: bool,
    /// Index generation, if enabled.
    pub index: Option<IndexStep>,
    /// Image minification, if enabled.
    pub images: Option<ImageStep>,
}

impl BuildConfig {
    /// Build settings with default limits and no pre-steps.
    #[must_use]
    pub fn new(source_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            source_dir: source_dir.into(),
            output_dir: output_dir.into(),
            placeholders: vec![".gitkeep".to_owned()],
            output_marker: None,
            concurrency: 64,
            file_timeout: Duration::from_secs(30),
            gfm: true,
            index: None,
            images: None,
        }
    }
}

impl From<&Config> for BuildConfig {
    fn from(config: &Config) -> Self {
        let posts = &config.posts_resolved;
        let index = config
            .index_resolved
            .as_ref()
            .filter(|index| index.enabled)
            .map(|index| IndexStep {
                command: index.command.clone(),
                working_dir: index.working_dir.clone(),
            });
        let images = &config.images_resolved;
        let images = images.minify_enabled.then(|| ImageStep {
            command: images.command.clone(),
            gif_command: images.gif_command.clone(),
            source_dir: images.source_dir.clone(),
            output_dir: config.images_output_dir(),
            quality: images.quality,
            optimization: images.optimization,
            working_dir: images.working_dir.clone(),
        });

        Self {
            source_dir: posts.source_dir.clone(),
            output_dir: posts.output_dir.clone(),
            placeholders: posts.placeholders.clone(),
            output_marker: posts.output_marker.clone(),
            concurrency: config.build.concurrency,
            file_timeout: config.build.file_timeout(),
            gfm: config.render.gfm,
            index,
            images,
        }
    }
}

/// Blog render policy described by `config`.
#[must_use]
pub fn blog_hooks(config: &Config) -> BlogHooks {
    let render = &config.render;
    let hooks = BlogHooks::new()
        .with_code_class_prefix(render.code_class_prefix.clone())
        .with_new_window_marker(render.new_window_marker.clone())
        .with_strong_code_spans(render.strong_code_spans)
        .with_heading_anchors(render.heading_anchors);
    match &config.images_resolved.upload_base_url {
        Some(base) => hooks.with_upload_base(base.clone()),
        None => hooks,
    }
}

/// Receives build progress. All methods default to doing nothing.
pub trait BuildObserver {
    /// The index pre-step finished.
    fn index_generated(&self, _result: &Result<(), PreStepError>) {}

    /// The image pre-step finished.
    fn images_minified(&self, _result: &Result<MinifySummary, PreStepError>) {}

    /// Discovery found `count` posts; conversion starts.
    fn conversion_started(&self, _count: usize) {}

    /// One post finished converting.
    fn post_converted(&self, _outcome: &ConversionOutcome) {}
}

/// Observer that ignores every event.
pub struct NoopObserver;

impl BuildObserver for NoopObserver {}

/// Builds every post in the source directory.
///
/// # Example
///
/// ```no_run
/// use quill_build::{BuildConfig, NoopObserver, PostBuilder};
/// use quill_renderer::BlogHooks;
///
/// # async fn run() -> Result<(), quill_build::BuildError> {
/// let builder = PostBuilder::new(BuildConfig::new("posts", "dist"), BlogHooks::new().build());
/// let summary = builder.build(&NoopObserver).await?;
/// println!("{} converted, {} failed", summary.succeeded(), summary.failed());
/// # Ok(())
/// # }
/// ```
pub struct PostBuilder {
    config: BuildConfig,
    pipeline: Pipeline,
}

impl PostBuilder {
    /// Create a builder rendering with `hooks`.
    #[must_use]
    pub fn new(config: BuildConfig, hooks: RenderHooks) -> Self {
        let pipeline = Pipeline::new(Arc::new(hooks))
            .with_gfm(config.gfm)
            .with_concurrency(config.concurrency)
            .with_file_timeout(config.file_timeout);
        Self { config, pipeline }
    }

    /// Create a builder with the blog policy described by `config`.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self::new(BuildConfig::from(config), blog_hooks(config).build())
    }

    /// Build settings in use.
    #[must_use]
    pub fn config(&self) -> &BuildConfig {
        &self.config
    }

    /// Run the build.
    ///
    /// Pre-step failures are logged and ignored. Failures of individual
    /// posts are reported in the returned summary.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError`] if the output directory cannot be prepared or
    /// the source directory cannot be listed.
    pub async fn build(&self, observer: &dyn BuildObserver) -> Result<BuildSummary, BuildError> {
        let config = &self.config;
        ensure_output_dir(&config.output_dir, config.output_marker.as_deref()).await?;

        if let Some(index) = &config.index {
            let result = prestep::generate_index(index).await;
            if let Err(e) = &result {
                warn!(error = %e, "Index generation failed, continuing");
            }
            observer.index_generated(&result);
        }

        if let Some(images) = &config.images {
            let result = prestep::minify_images(images).await;
            match &result {
                Ok(summary) => info!(
                    processed = summary.processed,
                    failed = summary.failed,
                    "Images minified"
                ),
                Err(e) => warn!(error = %e, "Image minification failed, continuing"),
            }
            observer.images_minified(&result);
        }

        let documents = discover(&config.source_dir, &config.output_dir, &config.placeholders).await?;
        observer.conversion_started(documents.len());

        let summary = self
            .pipeline
            .convert_all(documents, |outcome| observer.post_converted(outcome))
            .await;

        info!(
            processed = summary.processed(),
            failed = summary.failed(),
            "Build finished"
        );
        Ok(summary)
    }
}
