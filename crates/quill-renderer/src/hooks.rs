//! Render hook configuration.
//!
//! [`RenderHooks`] maps each overridable render event to an optional hook.
//! When a hook is absent the default HTML rendering from [`crate::html`] is used.

use std::fmt;

use crate::html;

/// Overridable render events.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderEvent {
    /// Inline link.
    Link,
    /// Image.
    Image,
    /// Fenced or indented code block.
    Code,
    /// Inline code span.
    Codespan,
    /// ATX or setext heading.
    Heading,
}

impl fmt::Display for RenderEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Link => "link",
            Self::Image => "image",
            Self::Code => "code",
            Self::Codespan => "codespan",
            Self::Heading => "heading",
        };
        f.write_str(name)
    }
}

/// Error returned by a render hook.
///
/// Fails the render of the current document only.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{event} hook failed: {message}")]
pub struct HookError {
    event: RenderEvent,
    message: String,
}

impl HookError {
    /// Create a new hook error for the given event.
    pub fn new(event: RenderEvent, message: impl Into<String>) -> Self {
        Self {
            event,
            message: message.into(),
        }
    }

    /// Event whose hook failed.
    pub fn event(&self) -> RenderEvent {
        self.event
    }

    /// Failure description.
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Link being rendered.
#[derive(Debug)]
pub struct LinkContext<'a> {
    /// Link destination, unescaped.
    pub href: &'a str,
    /// Link title, `None` when the source has no title.
    pub title: Option<&'a str>,
    /// Rendered HTML of the link text.
    pub text_html: &'a str,
}

/// Image being rendered.
#[derive(Debug)]
pub struct ImageContext<'a> {
    /// Image source, unescaped.
    pub src: &'a str,
    /// Image title, `None` when the source has no title.
    pub title: Option<&'a str>,
    /// Plain-text alt text, unescaped.
    pub alt: &'a str,
}

/// Code block being rendered.
#[derive(Debug)]
pub struct CodeBlockContext<'a> {
    /// First word of the fence info string.
    pub lang: Option<&'a str>,
    /// Raw code body, unescaped.
    pub code: &'a str,
}

/// Inline code span being rendered.
#[derive(Debug)]
pub struct CodeSpanContext<'a> {
    /// Raw code, unescaped.
    pub code: &'a str,
}

/// Heading being rendered.
#[derive(Debug)]
pub struct HeadingContext<'a> {
    /// Heading level (1-6).
    pub level: u8,
    /// Plain heading text.
    pub text: &'a str,
    /// Rendered HTML of the heading content.
    pub text_html: &'a str,
}

type LinkHook = Box<dyn Fn(&LinkContext<'_>, &mut String) -> Result<(), HookError> + Send + Sync>;
type ImageHook = Box<dyn Fn(&ImageContext<'_>, &mut String) -> Result<(), HookError> + Send + Sync>;
type CodeHook =
    Box<dyn Fn(&CodeBlockContext<'_>, &mut String) -> Result<(), HookError> + Send + Sync>;
type CodeSpanHook =
    Box<dyn Fn(&CodeSpanContext<'_>, &mut String) -> Result<(), HookError> + Send + Sync>;
type HeadingHook =
    Box<dyn Fn(&HeadingContext<'_>, &mut String) -> Result<(), HookError> + Send + Sync>;

/// Set of render overrides, one optional hook per [`RenderEvent`].
///
/// Built once and shared read-only by every render; there is no way to
/// mutate hooks after construction.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use quill_renderer::{MarkdownRenderer, RenderHooks};
///
/// let hooks = RenderHooks::new().with_codespan(|ctx, out| {
///     out.push_str("<kbd>");
///     out.push_str(ctx.code);
///     out.push_str("</kbd>");
///     Ok(())
/// });
/// let result = MarkdownRenderer::new(Arc::new(hooks))
///     .render_markdown("Press `q`")
///     .unwrap();
/// assert_eq!(result.html, "<p>Press <kbd>q</kbd></p>");
/// ```
#[derive(Default)]
pub struct RenderHooks {
    link: Option<LinkHook>,
    image: Option<ImageHook>,
    code: Option<CodeHook>,
    codespan: Option<CodeSpanHook>,
    heading: Option<HeadingHook>,
}

impl RenderHooks {
    /// Create a hook set with default rendering for every event.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Override link rendering.
    #[must_use]
    pub fn with_link<F>(mut self, hook: F) -> Self
    where
        F: Fn(&LinkContext<'_>, &mut String) -> Result<(), HookError> + Send + Sync + 'static,
    {
        self.link = Some(Box::new(hook));
        self
    }

    /// Override image rendering.
    #[must_use]
    pub fn with_image<F>(mut self, hook: F) -> Self
    where
        F: Fn(&ImageContext<'_>, &mut String) -> Result<(), HookError> + Send + Sync + 'static,
    {
        self.image = Some(Box::new(hook));
        self
    }

    /// Override code block rendering.
    #[must_use]
    pub fn with_code<F>(mut self, hook: F) -> Self
    where
        F: Fn(&CodeBlockContext<'_>, &mut String) -> Result<(), HookError> + Send + Sync + 'static,
    {
        self.code = Some(Box::new(hook));
        self
    }

    /// Override inline code rendering.
    #[must_use]
    pub fn with_codespan<F>(mut self, hook: F) -> Self
    where
        F: Fn(&CodeSpanContext<'_>, &mut String) -> Result<(), HookError> + Send + Sync + 'static,
    {
        self.codespan = Some(Box::new(hook));
        self
    }

    /// Override heading rendering.
    #[must_use]
    pub fn with_heading<F>(mut self, hook: F) -> Self
    where
        F: Fn(&HeadingContext<'_>, &mut String) -> Result<(), HookError> + Send + Sync + 'static,
    {
        self.heading = Some(Box::new(hook));
        self
    }

    /// Whether a hook is registered for `event`.
    pub fn overrides(&self, event: RenderEvent) -> bool {
        match event {
            RenderEvent::Link => self.link.is_some(),
            RenderEvent::Image => self.image.is_some(),
            RenderEvent::Code => self.code.is_some(),
            RenderEvent::Codespan => self.codespan.is_some(),
            RenderEvent::Heading => self.heading.is_some(),
        }
    }

    pub(crate) fn link(&self, ctx: &LinkContext<'_>, out: &mut String) -> Result<(), HookError> {
        match &self.link {
            Some(hook) => hook(ctx, out),
            None => {
                html::link(ctx, out);
                Ok(())
            }
        }
    }

    pub(crate) fn image(&self, ctx: &ImageContext<'_>, out: &mut String) -> Result<(), HookError> {
        match &self.image {
            Some(hook) => hook(ctx, out),
            None => {
                html::image(ctx, out);
                Ok(())
            }
        }
    }

    pub(crate) fn code(
        &self,
        ctx: &CodeBlockContext<'_>,
        out: &mut String,
    ) -> Result<(), HookError> {
        match &self.code {
            Some(hook) => hook(ctx, out),
            None => {
                html::code_block(ctx, out);
                Ok(())
            }
        }
    }

    pub(crate) fn codespan(
        &self,
        ctx: &CodeSpanContext<'_>,
        out: &mut String,
    ) -> Result<(), HookError> {
        match &self.codespan {
            Some(hook) => hook(ctx, out),
            None => {
                html::code_span(ctx, out);
                Ok(())
            }
        }
    }

    pub(crate) fn heading(
        &self,
        ctx: &HeadingContext<'_>,
        out: &mut String,
    ) -> Result<(), HookError> {
        match &self.heading {
            Some(hook) => hook(ctx, out),
            None => {
                html::heading(ctx, out);
                Ok(())
            }
        }
    }
}

impl fmt::Debug for RenderHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderHooks")
            .field("link", &self.link.is_some())
            .field("image", &self.image.is_some())
            .field("code", &self.code.is_some())
            .field("codespan", &self.codespan.is_some())
            .field("heading", &self.heading.is_some())
            .finish()
    }
}
