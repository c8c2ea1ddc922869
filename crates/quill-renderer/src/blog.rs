//! Blog publishing render policy.
//!
//! [`BlogHooks`] builds a [`RenderHooks`] that prepares posts for the blog
//! platform:
//!
//! - external links (and links titled with the new-window marker) open in a
//!   new window
//! - when an upload base URL is set, image sources point at the dated upload
//!   directory (`<base>/<year>/<month>/<file>`)
//! - code blocks carry a `lang-` class and only `<`/`>` are escaped
//! - optionally, inline code renders as `<strong>` and headings get anchors

use std::fmt::Write;

use chrono::{Datelike, Local, NaiveDate};

use crate::hooks::{
    CodeBlockContext, CodeSpanContext, HeadingContext, HookError, ImageContext, LinkContext,
    RenderEvent, RenderHooks,
};
use crate::slug::heading_slug;
use crate::state::{escape_angle_brackets, escape_html};

/// Link title that requests a new window without being rendered as a title.
pub const NEW_WINDOW_MARKER: &str = "newWindow";

/// Class prefix for code block languages.
pub const DEFAULT_CODE_CLASS_PREFIX: &str = "lang-";

/// Builder for the blog render policy.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use chrono::NaiveDate;
/// use quill_renderer::{BlogHooks, MarkdownRenderer};
///
/// let hooks = BlogHooks::new()
///     .with_upload_base("https://blog.example.com/uploads/")
///     .with_date(NaiveDate::from_ymd_opt(2024, 3, 15).unwrap())
///     .build();
/// let html = MarkdownRenderer::new(Arc::new(hooks))
///     .render_markdown("![chart](img/chart.png)")
///     .unwrap()
///     .html;
/// assert!(html.contains(r#"src="https://blog.example.com/uploads/2024/03/chart.png""#));
/// ```
#[derive(Clone, Debug)]
pub struct BlogHooks {
    upload_base: Option<String>,
    date: NaiveDate,
    code_class_prefix: String,
    new_window_marker: String,
    strong_code_spans: bool,
    heading_anchors: bool,
}

impl Default for BlogHooks {
    fn default() -> Self {
        Self::new()
    }
}

impl BlogHooks {
    /// Create the policy dated today, without image rewriting.
    #[must_use]
    pub fn new() -> Self {
        Self {
            upload_base: None,
            date: Local::now().date_naive(),
            code_class_prefix: DEFAULT_CODE_CLASS_PREFIX.to_owned(),
            new_window_marker: NEW_WINDOW_MARKER.to_owned(),
            strong_code_spans: false,
            heading_anchors: false,
        }
    }

    /// Rewrite image sources into dated paths under `base`.
    #[must_use]
    pub fn with_upload_base(mut self, base: impl Into<String>) -> Self {
        self.upload_base = Some(base.into());
        self
    }

    /// Set the date used for image upload paths.
    #[must_use]
    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = date;
        self
    }

    /// Set the class prefix for code block languages.
    #[must_use]
    pub fn with_code_class_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.code_class_prefix = prefix.into();
        self
    }

    /// Set the link title that requests a new window.
    #[must_use]
    pub fn with_new_window_marker(mut self, marker: impl Into<String>) -> Self {
        self.new_window_marker = marker.into();
        self
    }

    /// Render inline code as `<strong>` instead of `<code>`.
    #[must_use]
    pub fn with_strong_code_spans(mut self, enabled: bool) -> Self {
        self.strong_code_spans = enabled;
        self
    }

    /// Wrap headings with a self-referencing named anchor.
    #[must_use]
    pub fn with_heading_anchors(mut self, enabled: bool) -> Self {
        self.heading_anchors = enabled;
        self
    }

    /// Build the hook set.
    #[must_use]
    pub fn build(self) -> RenderHooks {
        let Self {
            upload_base,
            date,
            code_class_prefix,
            new_window_marker,
            strong_code_spans,
            heading_anchors,
        } = self;

        let mut hooks = RenderHooks::new()
            .with_link(move |ctx, out| {
                render_link(ctx, &new_window_marker, out);
                Ok(())
            })
            .with_code(move |ctx, out| {
                render_code(ctx, &code_class_prefix, out);
                Ok(())
            });

        if let Some(base) = upload_base {
            hooks = hooks.with_image(move |ctx, out| render_image(ctx, &base, date, out));
        }

        if strong_code_spans {
            hooks = hooks.with_codespan(|ctx, out| {
                render_strong_code_span(ctx, out);
                Ok(())
            });
        }
        if heading_anchors {
            hooks = hooks.with_heading(|ctx, out| {
                render_anchored_heading(ctx, out);
                Ok(())
            });
        }
        hooks
    }
}

/// Whether `href` is an absolute `http`/`https` URL with something after the scheme.
fn is_external(href: &str) -> bool {
    ["http://", "https://"]
        .iter()
        .any(|scheme| href.len() > scheme.len() && href.starts_with(scheme))
}

fn render_link(ctx: &LinkContext<'_>, marker: &str, out: &mut String) {
    let marked = ctx.title == Some(marker);
    write!(out, r#"<a href="{}""#, escape_html(ctx.href)).unwrap();
    if is_external(ctx.href) || marked {
        out.push_str(r#" target="_blank""#);
    }
    if let Some(title) = ctx.title
        && !marked
    {
        write!(out, r#" title="{}""#, escape_html(title)).unwrap();
    }
    write!(out, ">{}</a>", ctx.text_html).unwrap();
}

/// Rewrite an image source into `<base>/<year>/<month>/<basename>`.
///
/// The month is zero-padded to two digits and the base is joined with a
/// single `/`.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use quill_renderer::upload_path;
///
/// let date = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
/// assert_eq!(
///     upload_path("https://host/uploads/", date, "../images/foo.png").unwrap(),
///     "https://host/uploads/2024/03/foo.png"
/// );
/// ```
pub fn upload_path(base: &str, date: NaiveDate, src: &str) -> Result<String, HookError> {
    let basename = src.rsplit(['/', '\\']).next().unwrap_or_default();
    if basename.is_empty() {
        return Err(HookError::new(
            RenderEvent::Image,
            format!("image source {src:?} has no file name"),
        ));
    }
    Ok(format!(
        "{}/{}/{:02}/{basename}",
        base.trim_end_matches('/'),
        date.year(),
        date.month()
    ))
}

fn render_image(
    ctx: &ImageContext<'_>,
    base: &str,
    date: NaiveDate,
    out: &mut String,
) -> Result<(), HookError> {
    let src = upload_path(base, date, ctx.src)?;
    write!(
        out,
        r#"<img src="{}" alt="{}""#,
        escape_html(&src),
        escape_html(ctx.alt)
    )
    .unwrap();
    if let Some(title) = ctx.title {
        write!(out, r#" title="{}""#, escape_html(title)).unwrap();
    }
    out.push('>');
    Ok(())
}

fn render_code(ctx: &CodeBlockContext<'_>, prefix: &str, out: &mut String) {
    let body = escape_angle_brackets(ctx.code.trim());
    match ctx.lang {
        Some(lang) => write!(
            out,
            r#"<pre><code class="{prefix}{}">{body}</code></pre>"#,
            escape_html(lang)
        )
        .unwrap(),
        None => write!(out, "<pre><code>{body}</code></pre>").unwrap(),
    }
}

fn render_strong_code_span(ctx: &CodeSpanContext<'_>, out: &mut String) {
    write!(out, "<strong>{}</strong>", escape_angle_brackets(ctx.code)).unwrap();
}

fn render_anchored_heading(ctx: &HeadingContext<'_>, out: &mut String) {
    let slug = heading_slug(ctx.text.trim());
    write!(
        out,
        r##"<h{level}><a name="{slug}" class="anchor" href="#{slug}"><span class="header-link"></span></a>{}</h{level}>"##,
        ctx.text_html.trim(),
        level = ctx.level
    )
    .unwrap();
}
