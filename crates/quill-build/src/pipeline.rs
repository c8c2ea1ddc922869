//! Concurrent markdown to HTML conversion.

use std::collections::HashMap;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use quill_renderer::{MarkdownRenderer, RenderHooks};
use tokio::fs;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio::time::{Instant, timeout_at};
use tracing::{debug, error, warn};

use crate::discover::SourceDocument;
use crate::error::{ConversionError, PersistError, Stage};
use crate::persist;

/// A successfully written HTML file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenFile {
    pub path: PathBuf,
    pub bytes: usize,
}

/// Result of converting one source document.
#[derive(Debug)]
pub struct ConversionOutcome {
    pub document: SourceDocument,
    /// The written file, or why the document failed.
    pub result: Result<WrittenFile, ConversionError>,
}

impl ConversionOutcome {
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// Outcomes of one conversion run, sorted by source path.
#[derive(Debug, Default)]
pub struct BuildSummary {
    pub outcomes: Vec<ConversionOutcome>,
}

impl BuildSummary {
    /// Number of documents attempted.
    #[must_use]
    pub fn processed(&self) -> usize {
        self.outcomes.len()
    }

    /// Number of documents written.
    #[must_use]
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    /// Number of documents that failed.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.processed() - self.succeeded()
    }

    /// Failed outcomes.
    pub fn failures(&self) -> impl Iterator<Item = &ConversionOutcome> {
        self.outcomes.iter().filter(|o| !o.is_success())
    }
}

/// Converts source documents with shared render hooks.
///
/// Cheap to clone; clones share the hooks.
#[derive(Debug, Clone)]
pub struct Pipeline {
    hooks: Arc<RenderHooks>,
    gfm: bool,
    concurrency: usize,
    file_timeout: Duration,
}

impl Pipeline {
    /// Create a pipeline with default limits (64 files at once, 30s per file).
    #[must_use]
    pub fn new(hooks: Arc<RenderHooks>) -> Self {
        Self {
            hooks,
            gfm: true,
            concurrency: 64,
            file_timeout: Duration::from_secs(30),
        }
    }

    /// Enable or disable GitHub Flavored Markdown extensions.
    #[must_use]
    pub fn with_gfm(mut self, enabled: bool) -> Self {
        self.gfm = enabled;
        self
    }

    /// Limit the number of files converted at the same time.
    #[must_use]
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Fail a file that takes longer than `timeout`.
    #[must_use]
    pub fn with_file_timeout(mut self, timeout: Duration) -> Self {
        self.file_timeout = timeout;
        self
    }

    /// Convert one document: read, render, write.
    ///
    /// # Errors
    ///
    /// Returns [`ConversionError`] naming the stage that failed.
    pub async fn convert_one(
        &self,
        document: &SourceDocument,
    ) -> Result<WrittenFile, ConversionError> {
        let deadline = Instant::now() + self.file_timeout;
        let source = &document.source;

        debug!(source = %source.display(), stage = %Stage::Reading, "Converting");
        let raw = timeout_at(deadline, fs::read(source))
            .await
            .map_err(|_| self.timed_out(Stage::Reading))?
            .map_err(|e| ConversionError::Read {
                path: source.clone(),
                source: e,
            })?;
        let markdown = String::from_utf8(raw).map_err(|e| ConversionError::Read {
            path: source.clone(),
            source: io::Error::new(io::ErrorKind::InvalidData, e),
        })?;

        debug!(source = %source.display(), stage = %Stage::Rendering, "Converting");
        let html = MarkdownRenderer::new(Arc::clone(&self.hooks))
            .with_gfm(self.gfm)
            .render_markdown(&markdown)
            .map_err(|e| ConversionError::Render {
                path: source.clone(),
                source: e,
            })?
            .html;
        if Instant::now() >= deadline {
            return Err(self.timed_out(Stage::Rendering));
        }

        debug!(output = %document.output.display(), stage = %Stage::Writing, "Converting");
        let bytes = html.len();
        // The blocking write outlives a fired timeout; it re-checks the
        // deadline itself so a timed out file is never renamed into place.
        let write = persist::write_atomic_until(&document.output, html, Some(deadline.into_std()));
        timeout_at(deadline, write)
            .await
            .map_err(|_| self.timed_out(Stage::Writing))?
            .map_err(|e| match e {
                PersistError::DeadlineExceeded(_) => self.timed_out(Stage::Writing),
                e => ConversionError::Write {
                    path: document.output.clone(),
                    source: e,
                },
            })?;

        debug!(output = %document.output.display(), bytes, stage = %Stage::Done, "Converted");
        Ok(WrittenFile {
            path: document.output.clone(),
            bytes,
        })
    }

    /// Convert all documents concurrently and wait for every one of them.
    ///
    /// `on_outcome` is called as each document finishes. A failing or
    /// panicking conversion only affects its own document.
    pub async fn convert_all<F>(
        &self,
        documents: Vec<SourceDocument>,
        mut on_outcome: F,
    ) -> BuildSummary
    where
        F: FnMut(&ConversionOutcome),
    {
        let semaphore = Arc::new(Semaphore::new(self.concurrency));
        let mut tasks = JoinSet::new();
        let mut pending = HashMap::with_capacity(documents.len());

        for document in documents {
            let pipeline = self.clone();
            let semaphore = Arc::clone(&semaphore);
            let worker_document = document.clone();
            let handle = tasks.spawn(async move {
                // The semaphore is never closed
                let _permit = semaphore.acquire_owned().await.ok();
                pipeline.convert_one(&worker_document).await
            });
            pending.insert(handle.id(), document);
        }

        let mut outcomes = Vec::with_capacity(pending.len());
        while let Some(joined) = tasks.join_next_with_id().await {
            let (id, result) = match joined {
                Ok((id, result)) => (id, result),
                Err(e) => (e.id(), Err(ConversionError::Aborted(e.to_string()))),
            };
            let Some(document) = pending.remove(&id) else {
                error!(task = %id, "Finished conversion task has no document");
                continue;
            };
            let outcome = ConversionOutcome { document, result };
            if let Err(e) = &outcome.result {
                warn!(source = %outcome.document.source.display(), error = %e, "Conversion failed");
            }
            on_outcome(&outcome);
            outcomes.push(outcome);
        }

        outcomes.sort_by(|a, b| a.document.source.cmp(&b.document.source));
        BuildSummary { outcomes }
    }

    fn timed_out(&self, stage: Stage) -> ConversionError {
        ConversionError::Timeout {
            stage,
            timeout: self.file_timeout,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use quill_renderer::{HookError, RenderEvent};

    fn document(dir: &std::path::Path, name: &str) -> SourceDocument {
        let stem = name.trim_end_matches(".md");
        SourceDocument {
            source: dir.join(name),
            output: dir.join("out").join(format!("{stem}.html")),
        }
    }

    #[tokio::test]
    async fn test_convert_one_writes_html() {
        let temp = tempfile::tempdir().unwrap();
        std::fs::create_dir(temp.path().join("out")).unwrap();
        std::fs::write(temp.path().join("hello.md"), "# Hello\n\nWorld").unwrap();
        let doc = document(temp.path(), "hello.md");

        let written = Pipeline::new(Arc::new(RenderHooks::new()))
            .convert_one(&doc)
            .await
            .unwrap();

        assert_eq!(written.path, doc.output);
        assert_eq!(written.bytes, 26);
        assert_eq!(
            std::fs::read_to_string(&written.path).unwrap(),
            "<h1>Hello</h1><p>World</p>"
        );
    }

    #[tokio::test]
    async fn test_convert_one_missing_source() {
        let temp = tempfile::tempdir().unwrap();
        let doc = document(temp.path(), "gone.md");

        let err = Pipeline::new(Arc::new(RenderHooks::new()))
            .convert_one(&doc)
            .await
            .unwrap_err();

        assert_eq!(err.stage(), Some(Stage::Reading));
    }

    #[tokio::test]
    async fn test_convert_one_invalid_utf8() {
        let temp = tempfile::tempdir().unwrap();
        std::fs::write(temp.path().join("bad.md"), [0xff, 0xfe, 0x00]).unwrap();
        let doc = document(temp.path(), "bad.md");

        let err = Pipeline::new(Arc::new(RenderHooks::new()))
            .convert_one(&doc)
            .await
            .unwrap_err();

        assert!(matches!(err, ConversionError::Read { .. }));
    }

    #[tokio::test]
    async fn test_convert_one_hook_error() {
        let temp = tempfile::tempdir().unwrap();
        std::fs::create_dir(temp.path().join("out")).unwrap();
        std::fs::write(temp.path().join("a.md"), "`x`").unwrap();
        let hooks = RenderHooks::new().with_codespan(|_, _| {
            Err(HookError::new(RenderEvent::Codespan, "rejected"))
        });
        let doc = document(temp.path(), "a.md");

        let err = Pipeline::new(Arc::new(hooks))
            .convert_one(&doc)
            .await
            .unwrap_err();

        assert_eq!(err.stage(), Some(Stage::Rendering));
        assert!(!doc.output.exists());
    }

    #[tokio::test]
    async fn test_convert_one_missing_output_dir() {
        let temp = tempfile::tempdir().unwrap();
        std::fs::write(temp.path().join("a.md"), "text").unwrap();
        let doc = document(temp.path(), "a.md");

        let err = Pipeline::new(Arc::new(RenderHooks::new()))
            .convert_one(&doc)
            .await
            .unwrap_err();

        assert_eq!(err.stage(), Some(Stage::Writing));
    }

    #[tokio::test]
    async fn test_convert_all_isolates_panics() {
        let temp = tempfile::tempdir().unwrap();
        std::fs::create_dir(temp.path().join("out")).unwrap();
        std::fs::write(temp.path().join("ok.md"), "fine").unwrap();
        std::fs::write(temp.path().join("boom.md"), "`boom`").unwrap();
        let hooks = RenderHooks::new().with_codespan(|ctx, _| {
            assert!(ctx.code != "boom", "hook panicked");
            Ok(())
        });

        let mut seen = 0;
        let summary = Pipeline::new(Arc::new(hooks))
            .convert_all(
                vec![document(temp.path(), "ok.md"), document(temp.path(), "boom.md")],
                |_| seen += 1,
            )
            .await;

        assert_eq!(seen, 2);
        assert_eq!(summary.processed(), 2);
        assert_eq!(summary.failed(), 1);
        let failure = summary.failures().next().unwrap();
        assert_eq!(failure.document.name(), "boom.md");
        assert!(matches!(failure.result, Err(ConversionError::Aborted(_))));
        // Sorted by source path
        assert_eq!(summary.outcomes[0].document.name(), "boom.md");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_stalled_read_times_out_alone() {
        let temp = tempfile::tempdir().unwrap();
        std::fs::create_dir(temp.path().join("out")).unwrap();
        std::fs::write(temp.path().join("a.md"), "alpha").unwrap();
        std::fs::write(temp.path().join("c.md"), "gamma").unwrap();
        // Opening a FIFO for reading blocks until a writer shows up
        let fifo = temp.path().join("b.md");
        let status = std::process::Command::new("mkfifo")
            .arg(&fifo)
            .status()
            .unwrap();
        assert!(status.success());

        let summary = Pipeline::new(Arc::new(RenderHooks::new()))
            .with_file_timeout(Duration::from_millis(300))
            .convert_all(
                vec![
                    document(temp.path(), "a.md"),
                    document(temp.path(), "b.md"),
                    document(temp.path(), "c.md"),
                ],
                |_| {},
            )
            .await;

        // Release the blocked reader so the runtime can shut down
        drop(std::fs::OpenOptions::new().write(true).open(&fifo).unwrap());

        assert_eq!(summary.succeeded(), 2);
        let failure = summary.failures().next().unwrap();
        assert_eq!(failure.document.name(), "b.md");
        assert!(matches!(
            failure.result,
            Err(ConversionError::Timeout {
                stage: Stage::Reading,
                ..
            })
        ));
        assert!(temp.path().join("out").join("a.html").is_file());
        assert!(temp.path().join("out").join("c.html").is_file());
        assert!(!temp.path().join("out").join("b.html").exists());
    }

    #[tokio::test]
    async fn test_convert_all_empty() {
        let summary = Pipeline::new(Arc::new(RenderHooks::new()))
            .convert_all(Vec::new(), |_| {})
            .await;

        assert_eq!(summary.processed(), 0);
        assert_eq!(summary.failed(), 0);
    }

    #[test]
    fn test_concurrency_floor() {
        let pipeline = Pipeline::new(Arc::new(RenderHooks::new())).with_concurrency(0);
        assert_eq!(pipeline.concurrency, 1);
    }
}
