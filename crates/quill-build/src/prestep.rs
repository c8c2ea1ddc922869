//! Best-effort pre-steps run before conversion.
//!
//! Each pre-step runs external commands and returns a `Result`. The caller
//! decides what a failure means; [`crate::PostBuilder`] logs and continues.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use tokio::fs;
use tokio::process::Command;
use tracing::{debug, warn};

use crate::error::PreStepError;

/// Raster extensions minified with a lossy quality setting.
const RASTER_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "webp"];

/// Index generation: one command run in the project directory.
#[derive(Debug, Clone)]
pub struct IndexStep {
    /// Program and arguments.
    pub command: Vec<String>,
    /// Directory the command runs in.
    pub working_dir: PathBuf,
}

/// Image minification: one command run per image file.
///
/// Raster images and GIFs use separate command templates. Both accept
/// `{input}` and `{output}`; the raster template also gets `{quality}` and
/// the GIF template `{optimization}`.
#[derive(Debug, Clone)]
pub struct ImageStep {
    /// Command template for PNG, JPEG and WebP images.
    pub command: Vec<String>,
    /// Command template for GIF images. GIFs are skipped when empty.
    pub gif_command: Vec<String>,
    /// Directory scanned for images (non-recursive).
    pub source_dir: PathBuf,
    /// Directory minified images are written to.
    pub output_dir: PathBuf,
    /// Lossy quality for raster images.
    pub quality: u8,
    /// Optimization level for GIF images.
    pub optimization: u8,
    /// Directory the command runs in.
    pub working_dir: PathBuf,
}

/// Result of the image pre-step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MinifySummary {
    /// Images minified successfully.
    pub processed: usize,
    /// Images whose command failed.
    pub failed: usize,
}

/// Run the index generator.
///
/// # Errors
///
/// Returns [`PreStepError`] if the command is empty, cannot be spawned or
/// exits unsuccessfully.
pub async fn generate_index(step: &IndexStep) -> Result<(), PreStepError> {
    debug!(command = ?step.command, "Generating index");
    run_command("index", &step.command, &step.working_dir).await
}

/// Minify every image in the image source directory.
///
/// A failing image is logged and counted; the rest are still processed.
/// A missing source directory means there is nothing to do.
///
/// # Errors
///
/// Returns [`PreStepError`] if the command is empty, or if the source
/// directory exists but cannot be read.
pub async fn minify_images(step: &ImageStep) -> Result<MinifySummary, PreStepError> {
    if step.command.is_empty() && step.gif_command.is_empty() {
        return Err(PreStepError::EmptyCommand { step: "images" });
    }

    let images = match list_images(&step.source_dir).await {
        Ok(images) => images,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(dir = %step.source_dir.display(), "No image directory");
            return Ok(MinifySummary::default());
        }
        Err(source) => {
            return Err(PreStepError::ImageDir {
                path: step.source_dir.clone(),
                source,
            });
        }
    };
    if images.is_empty() {
        return Ok(MinifySummary::default());
    }

    fs::create_dir_all(&step.output_dir)
        .await
        .map_err(|source| PreStepError::ImageDir {
            path: step.output_dir.clone(),
            source,
        })?;

    let mut summary = MinifySummary::default();
    for (input, format) in images {
        let Some(file_name) = input.file_name() else {
            continue;
        };
        let template = step.template(format);
        if template.is_empty() {
            debug!(image = %input.display(), ?format, "No minifier for format");
            continue;
        }
        let output = step.output_dir.join(file_name);
        let args = step.substitute(format, &input, &output);
        match run_command("images", &args, &step.working_dir).await {
            Ok(()) => summary.processed += 1,
            Err(e) => {
                warn!(image = %input.display(), error = %e, "Image minification failed");
                summary.failed += 1;
            }
        }
    }

    debug!(
        processed = summary.processed,
        failed = summary.failed,
        "Minified images"
    );
    Ok(summary)
}

/// Image format, which picks the command template and its parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ImageFormat {
    Raster,
    Gif,
}

impl ImageFormat {
    fn of(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?;
        if ext.eq_ignore_ascii_case("gif") {
            Some(Self::Gif)
        } else if RASTER_EXTENSIONS
            .iter()
            .any(|known| known.eq_ignore_ascii_case(ext))
        {
            Some(Self::Raster)
        } else {
            None
        }
    }
}

impl ImageStep {
    fn template(&self, format: ImageFormat) -> &[String] {
        match format {
            ImageFormat::Raster => &self.command,
            ImageFormat::Gif => &self.gif_command,
        }
    }

    /// Fill the command template for one image.
    fn substitute(&self, format: ImageFormat, input: &Path, output: &Path) -> Vec<String> {
        let input = input.to_string_lossy();
        let output = output.to_string_lossy();
        let (placeholder, value) = match format {
            ImageFormat::Raster => ("{quality}", self.quality),
            ImageFormat::Gif => ("{optimization}", self.optimization),
        };
        let value = value.to_string();
        self.template(format)
            .iter()
            .map(|arg| {
                arg.replace("{input}", &input)
                    .replace("{output}", &output)
                    .replace(placeholder, &value)
            })
            .collect()
    }
}

/// Image files directly inside `dir`, sorted.
async fn list_images(dir: &Path) -> std::io::Result<Vec<(PathBuf, ImageFormat)>> {
    let mut entries = fs::read_dir(dir).await?;
    let mut images = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if let Some(format) = ImageFormat::of(&path)
            && entry.file_type().await?.is_file()
        {
            images.push((path, format));
        }
    }
    images.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(images)
}

async fn run_command(
    step: &'static str,
    command: &[String],
    working_dir: &Path,
) -> Result<(), PreStepError> {
    let Some((program, args)) = command.split_first() else {
        return Err(PreStepError::EmptyCommand { step });
    };

    let output = Command::new(program)
        .args(args)
        .current_dir(working_dir)
        .stdin(Stdio::null())
        .output()
        .await
        .map_err(|source| PreStepError::Spawn {
            program: program.clone(),
            source,
        })?;

    let stdout = String::from_utf8_lossy(&output.stdout);
    if !stdout.trim().is_empty() {
        debug!(program = %program, stdout = %stdout.trim(), "Command output");
    }
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        debug!(program = %program, stderr = %stderr.trim(), "Command failed");
        return Err(PreStepError::Failed {
            program: program.clone(),
            status: output.status,
        });
    }
    Ok(())
}
