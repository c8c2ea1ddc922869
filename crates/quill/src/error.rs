//! CLI error types.

use quill_build::BuildError;
use quill_config::ConfigError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Build(#[from] BuildError),

    #[error("{count} {} failed to convert", articles(*count))]
    Failures { count: usize },
}

/// "article" or "articles" for `count`.
pub(crate) fn articles(count: usize) -> &'static str {
    if count == 1 { "article" } else { "articles" }
}
