//! Configuration management for Quill.
//!
//! Parses `quill.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `posts.source_dir`, `posts.output_dir`
//! - `images.upload_base_url`
//! - every argument of `index.command`, `images.command` and
//!   `images.gif_command`

mod expand;

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override posts source directory.
    pub source_dir: Option<PathBuf>,
    /// Override HTML output directory.
    pub output_dir: Option<PathBuf>,
    /// Override image upload base URL.
    pub upload_base_url: Option<String>,
    /// Override index pre-step enabled flag.
    pub index_enabled: Option<bool>,
    /// Override image pre-step enabled flag.
    pub images_enabled: Option<bool>,
    /// Override conversion concurrency limit.
    pub concurrency: Option<usize>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "quill.toml";

/// Default image quality passed to the minifier for raster images.
const DEFAULT_IMAGE_QUALITY: u8 = 80;

/// Default optimization level passed to the minifier for animated images.
const DEFAULT_GIF_OPTIMIZATION: u8 = 3;

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Posts configuration (paths are relative strings from TOML).
    posts: PostsConfigRaw,
    /// Rendering policy.
    pub render: RenderConfig,
    /// Conversion pipeline limits.
    pub build: PipelineConfig,
    /// Index generation pre-step (optional section).
    index: Option<IndexConfigRaw>,
    /// Image configuration.
    images: ImagesConfigRaw,

    /// Resolved posts configuration (set after loading).
    #[serde(skip)]
    pub posts_resolved: PostsConfig,
    /// Resolved index configuration (set after loading).
    #[serde(skip)]
    pub index_resolved: Option<IndexConfig>,
    /// Resolved images configuration (set after loading).
    #[serde(skip)]
    pub images_resolved: ImagesConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Raw posts configuration as parsed from TOML.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct PostsConfigRaw {
    source_dir: Option<String>,
    output_dir: Option<String>,
    placeholders: Option<Vec<String>>,
    output_marker: Option<String>,
}

/// Resolved posts configuration with absolute paths.
#[derive(Debug, Default)]
pub struct PostsConfig {
    /// Directory of markdown posts.
    pub source_dir: PathBuf,
    /// Directory receiving the HTML files.
    pub output_dir: PathBuf,
    /// Entry names in the source directory that are not posts.
    pub placeholders: Vec<String>,
    /// Marker file created in the output directory, if any.
    pub output_marker: Option<String>,
}

/// Rendering policy configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Class prefix for code block languages.
    pub code_class_prefix: String,
    /// Link title that requests a new window.
    pub new_window_marker: String,
    /// Render inline code as `<strong>`.
    pub strong_code_spans: bool,
    /// Add named anchors to headings.
    pub heading_anchors: bool,
    /// Enable GitHub Flavored Markdown extensions.
    pub gfm: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            code_class_prefix: "lang-".to_owned(),
            new_window_marker: "newWindow".to_owned(),
            strong_code_spans: false,
            heading_anchors: false,
            gfm: true,
        }
    }
}

/// Conversion pipeline configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Maximum number of files converted at the same time.
    pub concurrency: usize,
    /// Seconds a single file may take before it is failed.
    pub file_timeout_secs: u64,
}

impl PipelineConfig {
    /// Per-file timeout.
    #[must_use]
    pub fn file_timeout(&self) -> Duration {
        Duration::from_secs(self.file_timeout_secs)
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            concurrency: 64,
            file_timeout_secs: 30,
        }
    }
}

/// Raw index configuration as parsed from TOML.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct IndexConfigRaw {
    enabled: Option<bool>,
    command: Vec<String>,
}

/// Resolved index generation pre-step.
#[derive(Debug, Clone)]
pub struct IndexConfig {
    /// Whether the pre-step runs.
    pub enabled: bool,
    /// Program and arguments.
    pub command: Vec<String>,
    /// Directory the command runs in.
    pub working_dir: PathBuf,
}

/// Raw images configuration as parsed from TOML.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct ImagesConfigRaw {
    upload_base_url: Option<String>,
    enabled: Option<bool>,
    source_dir: Option<String>,
    output_dir: Option<String>,
    command: Vec<String>,
    gif_command: Vec<String>,
    quality: Option<u8>,
    optimization: Option<u8>,
}

/// Resolved images configuration.
#[derive(Debug, Clone, Default)]
pub struct ImagesConfig {
    /// Base URL image sources are rewritten under.
    pub upload_base_url: Option<String>,
    /// Whether the minify pre-step runs.
    pub minify_enabled: bool,
    /// Directory of source images.
    pub source_dir: PathBuf,
    /// Explicit output directory for minified images.
    ///
    /// When `None`, images go to `images/` inside the posts output directory.
    pub output_dir: Option<PathBuf>,
    /// Raster minifier program and arguments, with `{input}`, `{output}`
    /// and `{quality}` placeholders.
    pub command: Vec<String>,
    /// GIF minifier program and arguments, with `{input}`, `{output}` and
    /// `{optimization}` placeholders.
    pub gif_command: Vec<String>,
    /// Lossy quality for raster images (1-100).
    pub quality: u8,
    /// Optimization level for animated images (1-3).
    pub optimization: u8,
    /// Directory the command runs in.
    pub working_dir: PathBuf,
}

impl ImagesConfig {
    /// Whether any minifier command is configured.
    #[must_use]
    pub fn has_command(&self) -> bool {
        !self.command.is_empty() || !self.gif_command.is_empty()
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`images.upload_base_url`").
        field: String,
        /// Error message (e.g., "${`UPLOAD_HOST`} not set").
        message: String,
    },
}

/// Require a URL field to use http:// or https:// scheme.
fn require_http_url(url: &str, field: &str) -> Result<(), ConfigError> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigError::Validation(format!(
            "{field} must start with http:// or https://"
        )));
    }
    Ok(())
}

/// Require a value to lie in `range`.
fn require_in_range(
    value: u64,
    range: std::ops::RangeInclusive<u64>,
    field: &str,
) -> Result<(), ConfigError> {
    if !range.contains(&value) {
        return Err(ConfigError::Validation(format!(
            "{field} must be between {} and {}",
            range.start(),
            range.end()
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `quill.toml` in current directory and parents,
    /// falling back to defaults relative to the current directory.
    ///
    /// CLI settings are applied after loading and path resolution, and the
    /// result is validated.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails or
    /// the final configuration is invalid.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from a TOML string, resolving paths against `base`.
    ///
    /// # Errors
    ///
    /// Returns error if parsing, expansion or validation fails.
    pub fn from_toml_str(content: &str, base: &Path) -> Result<Self, ConfigError> {
        let mut config: Self = toml::from_str(content)?;
        config.expand_env_vars()?;
        config.resolve_paths(base);
        config.validate()?;
        Ok(config)
    }

    /// Output directory for minified images.
    #[must_use]
    pub fn images_output_dir(&self) -> PathBuf {
        self.images_resolved
            .output_dir
            .clone()
            .unwrap_or_else(|| self.posts_resolved.output_dir.join("images"))
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(source_dir) = &settings.source_dir {
            self.posts_resolved.source_dir.clone_from(source_dir);
        }
        if let Some(output_dir) = &settings.output_dir {
            self.posts_resolved.output_dir.clone_from(output_dir);
        }
        if let Some(url) = &settings.upload_base_url {
            self.images_resolved.upload_base_url = Some(url.clone());
        }
        if let Some(enabled) = settings.index_enabled
            && let Some(index) = &mut self.index_resolved
        {
            index.enabled = enabled;
        }
        if let Some(enabled) = settings.images_enabled {
            self.images_resolved.minify_enabled = enabled && self.images_resolved.has_command();
        }
        if let Some(concurrency) = settings.concurrency {
            self.build.concurrency = concurrency;
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Create default config with paths relative to current working directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config with paths relative to given base directory.
    fn default_with_base(base: &Path) -> Self {
        let mut config = Self {
            posts: PostsConfigRaw::default(),
            render: RenderConfig::default(),
            build: PipelineConfig::default(),
            index: None,
            images: ImagesConfigRaw::default(),
            posts_resolved: PostsConfig::default(),
            index_resolved: None,
            images_resolved: ImagesConfig::default(),
            config_path: None,
        };
        config.resolve_paths(base);
        config
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        // Expand environment variables before path resolution
        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_build()?;
        self.validate_index()?;
        self.validate_images()?;
        Ok(())
    }

    fn validate_build(&self) -> Result<(), ConfigError> {
        if self.build.concurrency == 0 {
            return Err(ConfigError::Validation(
                "build.concurrency must be greater than 0".to_owned(),
            ));
        }
        if self.build.file_timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "build.file_timeout_secs must be greater than 0".to_owned(),
            ));
        }
        Ok(())
    }

    fn validate_index(&self) -> Result<(), ConfigError> {
        if let Some(index) = &self.index_resolved
            && index.enabled
            && index.command.is_empty()
        {
            return Err(ConfigError::Validation(
                "[index] section requires command to be set".to_owned(),
            ));
        }
        Ok(())
    }

    fn validate_images(&self) -> Result<(), ConfigError> {
        let images = &self.images_resolved;
        if let Some(url) = &images.upload_base_url {
            require_http_url(url, "images.upload_base_url")?;
        }
        require_in_range(images.quality.into(), 1..=100, "images.quality")?;
        require_in_range(images.optimization.into(), 1..=3, "images.optimization")?;
        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        if let Some(dir) = &self.posts.source_dir {
            self.posts.source_dir = Some(expand::expand_env(dir, "posts.source_dir")?);
        }
        if let Some(dir) = &self.posts.output_dir {
            self.posts.output_dir = Some(expand::expand_env(dir, "posts.output_dir")?);
        }
        if let Some(url) = &self.images.upload_base_url {
            self.images.upload_base_url =
                Some(expand::expand_env(url, "images.upload_base_url")?);
        }
        if let Some(index) = &mut self.index {
            index.command = expand_all(&index.command, "index.command")?;
        }
        self.images.command = expand_all(&self.images.command, "images.command")?;
        self.images.gif_command = expand_all(&self.images.gif_command, "images.gif_command")?;
        Ok(())
    }

    /// Resolve relative paths to absolute paths based on config directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        let resolve = |path: Option<&str>, default: &str| config_dir.join(path.unwrap_or(default));

        self.posts_resolved = PostsConfig {
            source_dir: resolve(self.posts.source_dir.as_deref(), "posts"),
            output_dir: resolve(self.posts.output_dir.as_deref(), "dist"),
            placeholders: self
                .posts
                .placeholders
                .clone()
                .unwrap_or_else(|| vec![".gitkeep".to_owned()]),
            output_marker: self.posts.output_marker.clone(),
        };

        self.index_resolved = self.index.as_ref().map(|index| IndexConfig {
            enabled: index.enabled.unwrap_or(true),
            command: index.command.clone(),
            working_dir: config_dir.to_path_buf(),
        });

        let images = &self.images;
        self.images_resolved = ImagesConfig {
            upload_base_url: images.upload_base_url.clone(),
            minify_enabled: false,
            source_dir: resolve(images.source_dir.as_deref(), "images"),
            output_dir: images.output_dir.as_deref().map(|d| config_dir.join(d)),
            command: images.command.clone(),
            gif_command: images.gif_command.clone(),
            quality: images.quality.unwrap_or(DEFAULT_IMAGE_QUALITY),
            optimization: images.optimization.unwrap_or(DEFAULT_GIF_OPTIMIZATION),
            working_dir: config_dir.to_path_buf(),
        };
        self.images_resolved.minify_enabled =
            images.enabled.unwrap_or(true) && self.images_resolved.has_command();
    }
}

/// Expand every argument of a command line.
fn expand_all(args: &[String], field: &str) -> Result<Vec<String>, ConfigError> {
    args.iter()
        .map(|arg| expand::expand_env(arg, field))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_config() {
        let config = Config::default_with_base(Path::new("/blog"));
        assert_eq!(
            config.posts_resolved.source_dir,
            PathBuf::from("/blog/posts")
        );
        assert_eq!(config.posts_resolved.output_dir, PathBuf::from("/blog/dist"));
        assert_eq!(config.posts_resolved.placeholders, vec![".gitkeep"]);
        assert!(config.posts_resolved.output_marker.is_none());
        assert!(config.index_resolved.is_none());
        assert!(!config.images_resolved.minify_enabled);
        assert!(config.images_resolved.upload_base_url.is_none());
        assert_eq!(config.images_output_dir(), PathBuf::from("/blog/dist/images"));
        assert_eq!(config.build.concurrency, 64);
        assert_eq!(config.build.file_timeout(), Duration::from_secs(30));
        assert_eq!(config.render.code_class_prefix, "lang-");
        assert!(config.render.gfm);
        config.validate().unwrap();
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
[posts]
source_dir = "src/posts"
output_dir = "src/dist"
placeholders = [".gitkeep", ".DS_Store"]
output_marker = ".gitkeep"

[render]
strong_code_spans = true
heading_anchors = true

[build]
concurrency = 8
file_timeout_secs = 5

[index]
command = ["doctoc", "src/posts"]

[images]
upload_base_url = "https://www.example.com/wp-content/uploads/"
source_dir = "src/posts/images"
command = ["imagemin", "{input}", "--out", "{output}", "-q", "{quality}"]
gif_command = ["gifsicle", "-O{optimization}", "{input}", "-o", "{output}"]
quality = 70
"#;
        let config = Config::from_toml_str(toml, Path::new("/blog")).unwrap();

        assert_eq!(
            config.posts_resolved.source_dir,
            PathBuf::from("/blog/src/posts")
        );
        assert_eq!(
            config.posts_resolved.output_dir,
            PathBuf::from("/blog/src/dist")
        );
        assert_eq!(
            config.posts_resolved.placeholders,
            vec![".gitkeep", ".DS_Store"]
        );
        assert_eq!(
            config.posts_resolved.output_marker.as_deref(),
            Some(".gitkeep")
        );
        assert!(config.render.strong_code_spans);
        assert!(config.render.heading_anchors);
        assert_eq!(config.build.concurrency, 8);

        let index = config.index_resolved.as_ref().unwrap();
        assert!(index.enabled);
        assert_eq!(index.command, vec!["doctoc", "src/posts"]);
        assert_eq!(index.working_dir, PathBuf::from("/blog"));

        let images = &config.images_resolved;
        assert!(images.minify_enabled);
        assert_eq!(images.quality, 70);
        assert_eq!(images.optimization, 3);
        assert_eq!(
            images.gif_command,
            vec!["gifsicle", "-O{optimization}", "{input}", "-o", "{output}"]
        );
        assert_eq!(images.source_dir, PathBuf::from("/blog/src/posts/images"));
        assert_eq!(
            config.images_output_dir(),
            PathBuf::from("/blog/src/dist/images")
        );
        assert_eq!(
            images.upload_base_url.as_deref(),
            Some("https://www.example.com/wp-content/uploads/")
        );
    }

    #[test]
    fn test_index_section_requires_command() {
        let err = Config::from_toml_str("[index]\nenabled = true\n", Path::new("/blog"))
            .unwrap_err();
        assert!(
            matches!(err, ConfigError::Validation(_)),
            "Expected ConfigError::Validation, got {err:?}"
        );
        assert!(err.to_string().contains("command"));
    }

    #[test]
    fn test_disabled_index_without_command_is_valid() {
        let config =
            Config::from_toml_str("[index]\nenabled = false\n", Path::new("/blog")).unwrap();
        assert!(!config.index_resolved.unwrap().enabled);
    }

    #[test]
    fn test_upload_base_url_must_be_http() {
        let err = Config::from_toml_str(
            "[images]\nupload_base_url = \"ftp://host/uploads\"\n",
            Path::new("/blog"),
        )
        .unwrap_err();
        assert!(err.to_string().contains("images.upload_base_url"));
    }

    #[test]
    fn test_image_quality_range() {
        let err = Config::from_toml_str("[images]\nquality = 0\n", Path::new("/blog"))
            .unwrap_err();
        assert!(err.to_string().contains("images.quality"));

        let err = Config::from_toml_str("[images]\noptimization = 9\n", Path::new("/blog"))
            .unwrap_err();
        assert!(err.to_string().contains("images.optimization"));
    }

    #[test]
    fn test_zero_concurrency_rejected() {
        let err = Config::from_toml_str("[build]\nconcurrency = 0\n", Path::new("/blog"))
            .unwrap_err();
        assert!(err.to_string().contains("build.concurrency"));
    }

    #[test]
    fn test_unknown_toml_is_parse_error() {
        let err = Config::from_toml_str("[posts\n", Path::new("/blog")).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_apply_cli_settings_paths() {
        let mut config = Config::default_with_base(Path::new("/blog"));
        let settings = CliSettings {
            source_dir: Some(PathBuf::from("/other/posts")),
            output_dir: Some(PathBuf::from("/other/out")),
            ..Default::default()
        };

        config.apply_cli_settings(&settings);

        assert_eq!(
            config.posts_resolved.source_dir,
            PathBuf::from("/other/posts")
        );
        assert_eq!(config.posts_resolved.output_dir, PathBuf::from("/other/out"));
        // Derived from the new output directory
        assert_eq!(config.images_output_dir(), PathBuf::from("/other/out/images"));
    }

    #[test]
    fn test_apply_cli_settings_disables_pre_steps() {
        let mut config = Config::from_toml_str(
            "[index]\ncommand = [\"doctoc\", \"posts\"]\n\n[images]\ncommand = [\"minify\", \"{input}\"]\n",
            Path::new("/blog"),
        )
        .unwrap();
        assert!(config.index_resolved.as_ref().unwrap().enabled);
        assert!(config.images_resolved.minify_enabled);

        let settings = CliSettings {
            index_enabled: Some(false),
            images_enabled: Some(false),
            ..Default::default()
        };
        config.apply_cli_settings(&settings);

        assert!(!config.index_resolved.as_ref().unwrap().enabled);
        assert!(!config.images_resolved.minify_enabled);
    }

    #[test]
    fn test_images_enabled_requires_command() {
        let mut config = Config::default_with_base(Path::new("/blog"));
        let settings = CliSettings {
            images_enabled: Some(true),
            ..Default::default()
        };
        config.apply_cli_settings(&settings);
        assert!(!config.images_resolved.minify_enabled);
    }

    #[test]
    fn test_apply_cli_settings_upload_base_and_concurrency() {
        let mut config = Config::default_with_base(Path::new("/blog"));
        let settings = CliSettings {
            upload_base_url: Some("https://cdn.example.com/u/".to_owned()),
            concurrency: Some(4),
            ..Default::default()
        };
        config.apply_cli_settings(&settings);
        assert_eq!(
            config.images_resolved.upload_base_url.as_deref(),
            Some("https://cdn.example.com/u/")
        );
        assert_eq!(config.build.concurrency, 4);
    }

    #[test]
    fn test_load_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quill.toml");
        std::fs::write(&path, "[posts]\nsource_dir = \"articles\"\n").unwrap();

        let config = Config::load(Some(&path), None).unwrap();

        assert_eq!(config.posts_resolved.source_dir, dir.path().join("articles"));
        assert_eq!(config.config_path.as_deref(), Some(path.as_path()));
    }

    #[test]
    fn test_load_missing_explicit_file() {
        let err = Config::load(Some(Path::new("/nonexistent/quill.toml")), None).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn test_load_validates_cli_settings() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quill.toml");
        std::fs::write(&path, "").unwrap();
        let settings = CliSettings {
            upload_base_url: Some("not-a-url".to_owned()),
            ..Default::default()
        };

        let err = Config::load(Some(&path), Some(&settings)).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }
}
