//! Post discovery, conversion and pre-build steps for Quill.
//!
//! [`PostBuilder`] runs a full build:
//!
//! 1. prepares the output directory;
//! 2. runs the optional index and image pre-steps, ignoring their failures;
//! 3. discovers the markdown posts and converts them concurrently.
//!
//! A post that fails to convert never stops its siblings; every outcome is
//! collected in a [`BuildSummary`].

mod builder;
mod discover;
mod error;
mod persist;
mod pipeline;
mod prestep;

pub use builder::{BuildConfig, BuildObserver, NoopObserver, PostBuilder, blog_hooks};
pub use discover::{SourceDocument, discover};
pub use error::{BuildError, ConversionError, DiscoveryError, PersistError, PreStepError, Stage};
pub use persist::{ensure_output_dir, write_atomic};
pub use pipeline::{BuildSummary, ConversionOutcome, Pipeline, WrittenFile};
pub use prestep::{ImageStep, IndexStep, MinifySummary, generate_index, minify_images};
