//! `quill build` command implementation.

use std::path::PathBuf;

use clap::Args;
use quill_build::{
    BuildObserver, ConversionOutcome, MinifySummary, PostBuilder, PreStepError, Stage,
};
use quill_config::{CliSettings, Config};
use tracing::info;

use crate::error::{CliError, articles};
use crate::output::Output;

/// Arguments for the build command.
#[derive(Args)]
pub(crate) struct BuildArgs {
    /// Markdown posts directory (overrides config).
    #[arg(short, long)]
    source_dir: Option<PathBuf>,

    /// HTML output directory (overrides config).
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Base URL for uploaded images (overrides config).
    #[arg(long, env = "QUILL_UPLOAD_BASE_URL")]
    upload_base_url: Option<String>,

    /// Maximum number of posts converted at the same time.
    #[arg(long)]
    concurrency: Option<usize>,

    /// Skip the index generation pre-step.
    #[arg(long)]
    skip_index: bool,

    /// Skip the image minification pre-step.
    #[arg(long)]
    skip_images: bool,

    /// Exit with an error if any post fails to convert.
    #[arg(long)]
    strict: bool,

    /// Path to configuration file (default: auto-discover quill.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose output.
    #[arg(short, long)]
    pub(crate) verbose: bool,
}

impl BuildArgs {
    fn cli_settings(&self) -> CliSettings {
        CliSettings {
            source_dir: self.source_dir.clone(),
            output_dir: self.output_dir.clone(),
            upload_base_url: self.upload_base_url.clone(),
            index_enabled: self.skip_index.then_some(false),
            images_enabled: self.skip_images.then_some(false),
            concurrency: self.concurrency,
        }
    }

    pub(crate) async fn execute(self, output: &Output) -> Result<(), CliError> {
        let config = Config::load(self.config.as_deref(), Some(&self.cli_settings()))?;
        info!(path = ?config.config_path, "Configuration loaded");

        output.info(&format!(
            "Source: {}",
            config.posts_resolved.source_dir.display()
        ));
        output.info(&format!(
            "Output: {}",
            config.posts_resolved.output_dir.display()
        ));

        let builder = PostBuilder::from_config(&config);
        let summary = builder.build(&ConsoleReporter { output }).await?;

        let failed = summary.failed();
        output.banner(
            "DONE",
            &format!(
                "{} {} converted, {failed} failed",
                summary.succeeded(),
                articles(summary.succeeded())
            ),
        );

        if self.strict && failed > 0 {
            return Err(CliError::Failures { count: failed });
        }
        Ok(())
    }
}

/// Prints build progress to the terminal.
struct ConsoleReporter<'a> {
    output: &'a Output,
}

impl BuildObserver for ConsoleReporter<'_> {
    fn index_generated(&self, result: &Result<(), PreStepError>) {
        match result {
            Ok(()) => self.output.info("Index generated"),
            Err(e) => self
                .output
                .warning(&format!("Index generation skipped: {e}")),
        }
    }

    fn images_minified(&self, result: &Result<MinifySummary, PreStepError>) {
        match result {
            Ok(summary) if summary.failed > 0 => self.output.warning(&format!(
                "Minified {} {}, {} failed",
                summary.processed,
                images(summary.processed),
                summary.failed
            )),
            Ok(summary) => self.output.info(&format!(
                "Minified {} {}",
                summary.processed,
                images(summary.processed)
            )),
            Err(e) => self
                .output
                .warning(&format!("Image minification skipped: {e}")),
        }
    }

    fn conversion_started(&self, count: usize) {
        self.output
            .highlight(&format!("Converting {count} {}...", articles(count)));
    }

    fn post_converted(&self, outcome: &ConversionOutcome) {
        self.output.item(&outcome.document.name());
        match &outcome.result {
            Ok(_) => {
                self.output.step("Parsed");
                self.output.step("Saved");
            }
            Err(e) => {
                if e.stage() == Some(Stage::Writing) {
                    self.output.step("Parsed");
                }
                self.output.step_failed(&e.to_string());
            }
        }
    }
}

fn images(count: usize) -> &'static str {
    if count == 1 { "image" } else { "images" }
}
