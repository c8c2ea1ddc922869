//! Markdown to HTML renderer with pluggable per-construct hooks.
//!
//! This crate provides a [`MarkdownRenderer`] that walks `pulldown-cmark`
//! events and produces HTML. Rendering of links, images, code blocks, inline
//! code and headings can be overridden through [`RenderHooks`]; every other
//! construct uses standard HTML output.
//!
//! # Architecture
//!
//! - [`RenderHooks`]: immutable set of optional override hooks, built once and
//!   shared (behind an `Arc`) by every render.
//! - [`MarkdownRenderer`]: per-document render state. Create one per document.
//! - [`BlogHooks`]: the blog publishing policy (new-window links, dated upload
//!   URLs for images, `lang-` code classes, anchored headings).
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use quill_renderer::{MarkdownRenderer, RenderHooks};
//!
//! let hooks = Arc::new(RenderHooks::new());
//! let result = MarkdownRenderer::new(hooks)
//!     .render_markdown("# Hello\n\n**Bold** text")
//!     .unwrap();
//! assert_eq!(result.html, "<h1>Hello</h1><p><strong>Bold</strong> text</p>");
//! ```

mod blog;
mod hooks;
mod html;
mod renderer;
mod slug;
mod state;
mod util;

pub use blog::{BlogHooks, DEFAULT_CODE_CLASS_PREFIX, NEW_WINDOW_MARKER, upload_path};
pub use hooks::{
    CodeBlockContext, CodeSpanContext, HeadingContext, HookError, ImageContext, LinkContext,
    RenderEvent, RenderHooks,
};
pub use renderer::{MarkdownRenderer, RenderError, RenderResult};
pub use slug::heading_slug;
pub use state::{escape_angle_brackets, escape_html};
