//! Markdown renderer driven by [`RenderHooks`].

use std::fmt::Write;
use std::sync::Arc;

use pulldown_cmark::{CodeBlockKind, Event, LinkType, Options, Parser, Tag, TagEnd};

use crate::hooks::{
    CodeBlockContext, CodeSpanContext, HeadingContext, HookError, ImageContext, LinkContext,
    RenderHooks,
};
use crate::state::{Capture, CodeBlockState, PendingImage, TableState, escape_html, non_empty};
use crate::util::{fence_language, heading_level_to_num};

/// Result of rendering markdown.
#[derive(Clone, Debug)]
pub struct RenderResult {
    /// Rendered HTML content.
    pub html: String,
}

/// Error returned when rendering a document fails.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// A render hook rejected its input.
    #[error(transparent)]
    Hook(#[from] HookError),
}

/// Markdown renderer for a single document.
///
/// Holds the mutable state of one render and a shared, read-only
/// [`RenderHooks`]. Create a new renderer for every document; the hooks can be
/// shared between any number of renderers on any number of threads.
///
/// Links and headings are rendered on their end tag: their inline content is
/// captured into a buffer first so hooks receive the finished inner HTML.
pub struct MarkdownRenderer {
    hooks: Arc<RenderHooks>,
    output: String,
    captures: Vec<Capture>,
    images: Vec<PendingImage>,
    code: CodeBlockState,
    table: TableState,
    gfm: bool,
}

impl MarkdownRenderer {
    /// Create a new renderer with GFM enabled by default.
    #[must_use]
    pub fn new(hooks: Arc<RenderHooks>) -> Self {
        Self {
            hooks,
            output: String::with_capacity(4096),
            captures: Vec::new(),
            images: Vec::new(),
            code: CodeBlockState::default(),
            table: TableState::default(),
            gfm: true,
        }
    }

    /// Enable or disable GitHub Flavored Markdown features.
    ///
    /// GFM is enabled by default. When enabled, the parser supports:
    /// - Tables
    /// - Strikethrough (`~~text~~`)
    /// - Task lists (`- [ ] item`)
    #[must_use]
    pub fn with_gfm(mut self, enabled: bool) -> Self {
        self.gfm = enabled;
        self
    }

    /// Get parser options based on GFM configuration.
    #[must_use]
    pub fn parser_options(&self) -> Options {
        if self.gfm {
            Options::ENABLE_TABLES
                | Options::ENABLE_STRIKETHROUGH
                | Options::ENABLE_TASKLISTS
                | Options::ENABLE_GFM
        } else {
            Options::empty()
        }
    }

    /// Render markdown text using the configured parser options.
    pub fn render_markdown(&mut self, markdown: &str) -> Result<RenderResult, RenderError> {
        let parser = Parser::new_ext(markdown, self.parser_options());
        self.render(parser)
    }

    /// Render markdown events and return the result.
    ///
    /// Stops at the first hook failure; the partial output is discarded.
    pub fn render<'a, I>(&mut self, events: I) -> Result<RenderResult, RenderError>
    where
        I: Iterator<Item = Event<'a>>,
    {
        self.output.clear();
        self.captures.clear();
        self.images.clear();

        for event in events {
            self.process_event(event)?;
        }

        Ok(RenderResult {
            html: std::mem::take(&mut self.output),
        })
    }

    /// Push inline content to the innermost capture, or to the output.
    ///
    /// Markup inside image alt text is dropped.
    fn push_inline(&mut self, content: &str) {
        if !self.images.is_empty() {
            return;
        }
        match self.captures.last_mut() {
            Some(capture) => capture.html_mut().push_str(content),
            None => self.output.push_str(content),
        }
    }

    /// Append plain text to the enclosing heading, if any.
    fn push_heading_text(&mut self, content: &str) {
        let heading = self.captures.iter_mut().rev().find_map(|c| match c {
            Capture::Heading { text, .. } => Some(text),
            Capture::Link { .. } => None,
        });
        if let Some(text) = heading {
            text.push_str(content);
        }
    }

    fn process_event(&mut self, event: Event<'_>) -> Result<(), HookError> {
        match event {
            Event::Start(tag) => self.start_tag(tag),
            Event::End(tag) => self.end_tag(tag)?,
            Event::Text(text) => self.text(&text),
            Event::Code(code) => self.inline_code(&code)?,
            Event::Html(html) => self.output.push_str(&html),
            Event::InlineHtml(html) => self.push_inline(&html),
            Event::SoftBreak => self.soft_break(),
            Event::HardBreak => self.push_inline("<br>"),
            Event::Rule => self.output.push_str("<hr>"),
            Event::TaskListMarker(checked) => self.task_list_marker(checked),
            Event::FootnoteReference(_) | Event::InlineMath(_) | Event::DisplayMath(_) => {
                // Not supported
            }
        }
        Ok(())
    }

    fn start_tag(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Paragraph => self.output.push_str("<p>"),
            Tag::Heading { level, .. } => {
                self.captures.push(Capture::Heading {
                    level: heading_level_to_num(level),
                    text: String::new(),
                    html: String::new(),
                });
            }
            Tag::BlockQuote(_) => self.output.push_str("<blockquote>"),
            Tag::CodeBlock(kind) => {
                let lang = match kind {
                    CodeBlockKind::Fenced(info) => fence_language(&info),
                    CodeBlockKind::Indented => None,
                };
                self.code.start(lang);
            }
            Tag::List(start) => match start {
                Some(1) => self.output.push_str("<ol>"),
                Some(n) => write!(self.output, r#"<ol start="{n}">"#).unwrap(),
                None => self.output.push_str("<ul>"),
            },
            Tag::Item => self.output.push_str("<li>"),
            Tag::FootnoteDefinition(_) | Tag::HtmlBlock | Tag::MetadataBlock(_) => {}
            Tag::DefinitionList => self.output.push_str("<dl>"),
            Tag::DefinitionListTitle => self.output.push_str("<dt>"),
            Tag::DefinitionListDefinition => self.output.push_str("<dd>"),
            Tag::Table(alignments) => {
                self.table.start(alignments);
                self.output.push_str("<table>");
            }
            Tag::TableHead => {
                self.table.start_head();
                self.output.push_str("<thead><tr>");
            }
            Tag::TableRow => {
                self.table.start_row();
                self.output.push_str("<tr>");
            }
            Tag::TableCell => {
                let align = self.table.current_alignment_style();
                let tag = if self.table.is_in_head() { "th" } else { "td" };
                write!(self.output, "<{tag}{align}>").unwrap();
            }
            Tag::Emphasis => self.push_inline("<em>"),
            Tag::Strong => self.push_inline("<strong>"),
            Tag::Strikethrough => self.push_inline("<s>"),
            Tag::Link {
                link_type,
                dest_url,
                title,
                ..
            } => {
                // Email autolinks arrive without their scheme
                let href = if link_type == LinkType::Email {
                    format!("mailto:{dest_url}")
                } else {
                    dest_url.to_string()
                };
                self.captures.push(Capture::Link {
                    href,
                    title: non_empty(&title),
                    html: String::new(),
                });
            }
            Tag::Image {
                dest_url, title, ..
            } => {
                // Alt text is collected until the end tag
                self.images.push(PendingImage {
                    src: dest_url.to_string(),
                    title: non_empty(&title),
                    alt: String::new(),
                });
            }
            Tag::Superscript => self.push_inline("<sup>"),
            Tag::Subscript => self.push_inline("<sub>"),
        }
    }

    fn end_tag(&mut self, tag: TagEnd) -> Result<(), HookError> {
        match tag {
            TagEnd::Paragraph => self.output.push_str("</p>"),
            TagEnd::Heading(_) => {
                if let Some(Capture::Heading { level, text, html }) = self.captures.pop() {
                    let ctx = HeadingContext {
                        level,
                        text: &text,
                        text_html: &html,
                    };
                    let mut rendered = String::new();
                    self.hooks.heading(&ctx, &mut rendered)?;
                    self.output.push_str(&rendered);
                }
            }
            TagEnd::BlockQuote(_) => self.output.push_str("</blockquote>"),
            TagEnd::CodeBlock => {
                let (lang, code) = self.code.end();
                let ctx = CodeBlockContext {
                    lang: lang.as_deref(),
                    code: &code,
                };
                self.hooks.code(&ctx, &mut self.output)?;
            }
            TagEnd::List(ordered) => {
                self.output
                    .push_str(if ordered { "</ol>" } else { "</ul>" });
            }
            TagEnd::Item => self.output.push_str("</li>"),
            TagEnd::FootnoteDefinition | TagEnd::HtmlBlock | TagEnd::MetadataBlock(_) => {}
            TagEnd::DefinitionList => self.output.push_str("</dl>"),
            TagEnd::DefinitionListTitle => self.output.push_str("</dt>"),
            TagEnd::DefinitionListDefinition => self.output.push_str("</dd>"),
            TagEnd::Table => self.output.push_str("</tbody></table>"),
            TagEnd::TableHead => {
                self.output.push_str("</tr></thead><tbody>");
                self.table.end_head();
            }
            TagEnd::TableRow => self.output.push_str("</tr>"),
            TagEnd::TableCell => {
                self.output.push_str(if self.table.is_in_head() {
                    "</th>"
                } else {
                    "</td>"
                });
                self.table.next_cell();
            }
            TagEnd::Emphasis => self.push_inline("</em>"),
            TagEnd::Strong => self.push_inline("</strong>"),
            TagEnd::Strikethrough => self.push_inline("</s>"),
            TagEnd::Link => {
                if let Some(Capture::Link { href, title, html }) = self.captures.pop() {
                    let ctx = LinkContext {
                        href: &href,
                        title: title.as_deref(),
                        text_html: &html,
                    };
                    let mut rendered = String::new();
                    self.hooks.link(&ctx, &mut rendered)?;
                    self.push_inline(&rendered);
                }
            }
            TagEnd::Image => self.end_image()?,
            TagEnd::Superscript => self.push_inline("</sup>"),
            TagEnd::Subscript => self.push_inline("</sub>"),
        }
        Ok(())
    }

    fn end_image(&mut self) -> Result<(), HookError> {
        let Some(image) = self.images.pop() else {
            return Ok(());
        };
        // An image nested in another image's alt text contributes only its alt
        if let Some(outer) = self.images.last_mut() {
            outer.alt.push_str(&image.alt);
            return Ok(());
        }
        let ctx = ImageContext {
            src: &image.src,
            title: image.title.as_deref(),
            alt: &image.alt,
        };
        let mut rendered = String::new();
        self.hooks.image(&ctx, &mut rendered)?;
        self.push_inline(&rendered);
        Ok(())
    }

    fn text(&mut self, text: &str) {
        if self.code.is_active() {
            self.code.push_str(text);
        } else if let Some(image) = self.images.last_mut() {
            image.alt.push_str(text);
        } else {
            self.push_heading_text(text);
            self.push_inline(&escape_html(text));
        }
    }

    fn inline_code(&mut self, code: &str) -> Result<(), HookError> {
        if let Some(image) = self.images.last_mut() {
            image.alt.push_str(code);
            return Ok(());
        }
        self.push_heading_text(code);
        let mut rendered = String::new();
        self.hooks
            .codespan(&CodeSpanContext { code }, &mut rendered)?;
        self.push_inline(&rendered);
        Ok(())
    }

    fn soft_break(&mut self) {
        if let Some(image) = self.images.last_mut() {
            image.alt.push(' ');
        } else {
            self.push_heading_text(" ");
            self.push_inline("\n");
        }
    }

    fn task_list_marker(&mut self, checked: bool) {
        if checked {
            self.output
                .push_str(r#"<input type="checkbox" checked disabled>"#);
        } else {
            self.output.push_str(r#"<input type="checkbox" disabled>"#);
        }
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new(Arc::new(RenderHooks::default()))
    }
}
