//! Source document discovery.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::debug;

use crate::error::DiscoveryError;

/// A markdown file to convert, with its output location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDocument {
    /// Absolute path of the markdown file.
    pub source: PathBuf,
    /// Path of the HTML file it converts to.
    pub output: PathBuf,
}

impl SourceDocument {
    /// File name of the source, for display.
    #[must_use]
    pub fn name(&self) -> String {
        self.source
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// List the documents in `source_dir`.
///
/// Only direct entries are considered. Subdirectories and entries named in
/// `placeholders` are skipped. Each document maps to `<stem>.html` in
/// `output_dir`. The result is sorted by source path.
///
/// # Errors
///
/// Returns [`DiscoveryError::ReadDir`] if the directory is missing or
/// unreadable, and [`DiscoveryError::DuplicateOutput`] if two documents
/// would write the same output file.
pub async fn discover(
    source_dir: &Path,
    output_dir: &Path,
    placeholders: &[String],
) -> Result<Vec<SourceDocument>, DiscoveryError> {
    let read_dir_error = |source| DiscoveryError::ReadDir {
        path: source_dir.to_path_buf(),
        source,
    };

    let source_dir = fs::canonicalize(source_dir).await.map_err(read_dir_error)?;
    let mut entries = fs::read_dir(&source_dir).await.map_err(read_dir_error)?;

    let mut sources = Vec::new();
    while let Some(entry) = entries.next_entry().await.map_err(read_dir_error)? {
        let name = entry.file_name();
        if placeholders.iter().any(|p| name.as_os_str() == p.as_str()) {
            continue;
        }
        let path = entry.path();
        // Follows symlinks; unreadable entries are kept so they fail visibly
        if fs::metadata(&path).await.is_ok_and(|meta| meta.is_dir()) {
            debug!(path = %path.display(), "Skipping directory");
            continue;
        }
        sources.push(path);
    }
    sources.sort();

    let mut documents = Vec::with_capacity(sources.len());
    let mut seen: HashMap<PathBuf, PathBuf> = HashMap::new();
    for source in sources {
        let output = output_dir.join(output_file_name(&source));
        if let Some(first) = seen.insert(output.clone(), source.clone()) {
            return Err(DiscoveryError::DuplicateOutput {
                first,
                second: source,
                output,
            });
        }
        documents.push(SourceDocument { source, output });
    }

    debug!(
        count = documents.len(),
        dir = %source_dir.display(),
        "Discovered documents"
    );
    Ok(documents)
}

/// `<stem>.html` for a source path.
fn output_file_name(source: &Path) -> String {
    let stem = source
        .file_stem()
        .map(|stem| stem.to_string_lossy())
        .unwrap_or_default();
    format!("{stem}.html")
}
