//! Error types for discovery, conversion, persistence and pre-steps.

use std::fmt;
use std::io;
use std::path::PathBuf;
use std::process::ExitStatus;
use std::time::Duration;

use quill_renderer::RenderError;

/// Lifecycle stage of a single source document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Discovered,
    Reading,
    Rendering,
    Writing,
    Done,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Discovered => "discovered",
            Self::Reading => "reading",
            Self::Rendering => "rendering",
            Self::Writing => "writing",
            Self::Done => "done",
        };
        f.write_str(name)
    }
}

/// Failure to enumerate the source directory. Ends the run.
#[derive(Debug, thiserror::Error)]
pub enum DiscoveryError {
    #[error("cannot read source directory {}: {source}", path.display())]
    ReadDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error(
        "{} and {} both write {}",
        first.display(),
        second.display(),
        output.display()
    )]
    DuplicateOutput {
        first: PathBuf,
        second: PathBuf,
        output: PathBuf,
    },
}

/// Failure writing to the output directory.
#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    #[error("output path is not a directory: {}", .0.display())]
    NotADirectory(PathBuf),
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("deadline passed before {} was replaced", .0.display())]
    DeadlineExceeded(PathBuf),
    #[error("write task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

impl PersistError {
    pub(crate) fn io(path: impl Into<PathBuf>) -> impl FnOnce(io::Error) -> Self {
        let path = path.into();
        move |source| Self::Io { path, source }
    }
}

/// Failure converting one source document.
///
/// Stops at the file boundary: siblings keep converting.
#[derive(Debug, thiserror::Error)]
pub enum ConversionError {
    #[error("cannot read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("cannot render {}: {source}", path.display())]
    Render {
        path: PathBuf,
        #[source]
        source: RenderError,
    },
    #[error("cannot write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: PersistError,
    },
    #[error("timed out after {}s while {stage}", timeout.as_secs())]
    Timeout { stage: Stage, timeout: Duration },
    #[error("conversion task aborted: {0}")]
    Aborted(String),
}

impl ConversionError {
    /// Stage the document was in when it failed.
    ///
    /// `None` for aborted tasks, whose progress is unknown.
    #[must_use]
    pub fn stage(&self) -> Option<Stage> {
        match self {
            Self::Read { .. } => Some(Stage::Reading),
            Self::Render { .. } => Some(Stage::Rendering),
            Self::Write { .. } => Some(Stage::Writing),
            Self::Timeout { stage, .. } => Some(*stage),
            Self::Aborted(_) => None,
        }
    }
}

/// Failure of a best-effort pre-step. Never fails the build.
#[derive(Debug, thiserror::Error)]
pub enum PreStepError {
    #[error("{step} command is empty")]
    EmptyCommand { step: &'static str },
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },
    #[error("{program} exited with {status}")]
    Failed { program: String, status: ExitStatus },
    #[error("cannot read image directory {}: {source}", path.display())]
    ImageDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Fatal build error.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error(transparent)]
    Discovery(#[from] DiscoveryError),
    #[error("cannot prepare output directory: {0}")]
    OutputDir(#[from] PersistError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversion_error_stage() {
        let err = ConversionError::Read {
            path: PathBuf::from("a.md"),
            source: io::Error::from(io::ErrorKind::NotFound),
        };
        assert_eq!(err.stage(), Some(Stage::Reading));

        let err = ConversionError::Timeout {
            stage: Stage::Writing,
            timeout: Duration::from_secs(30),
        };
        assert_eq!(err.stage(), Some(Stage::Writing));
        assert_eq!(err.to_string(), "timed out after 30s while writing");

        assert_eq!(ConversionError::Aborted("panic".to_owned()).stage(), None);
    }

    #[test]
    fn test_duplicate_output_message() {
        let err = DiscoveryError::DuplicateOutput {
            first: PathBuf::from("/p/a.md"),
            second: PathBuf::from("/p/a.markdown"),
            output: PathBuf::from("/d/a.html"),
        };
        assert_eq!(
            err.to_string(),
            "/p/a.md and /p/a.markdown both write /d/a.html"
        );
    }
}
