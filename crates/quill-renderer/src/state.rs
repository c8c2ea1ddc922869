//! Per-render state and escaping helpers.

use std::borrow::Cow;

use pulldown_cmark::Alignment;

/// Escape `&`, `<`, `>` and `"` for use in HTML text and attribute values.
///
/// Returns the input unchanged (borrowed) when nothing needs escaping.
pub fn escape_html(s: &str) -> Cow<'_, str> {
    if !s.contains(['&', '<', '>', '"']) {
        return Cow::Borrowed(s);
    }
    let mut escaped = String::with_capacity(s.len() + 16);
    for c in s.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    Cow::Owned(escaped)
}

/// Escape only `<` and `>`.
///
/// Ampersands are left alone, so already-escaped entities are not escaped twice.
pub fn escape_angle_brackets(s: &str) -> Cow<'_, str> {
    if !s.contains(['<', '>']) {
        return Cow::Borrowed(s);
    }
    Cow::Owned(s.replace('<', "&lt;").replace('>', "&gt;"))
}

/// Code block being collected.
#[derive(Debug, Default)]
pub(crate) struct CodeBlockState {
    active: bool,
    lang: Option<String>,
    buffer: String,
}

impl CodeBlockState {
    pub(crate) fn start(&mut self, lang: Option<String>) {
        self.active = true;
        self.lang = lang;
        self.buffer.clear();
    }

    pub(crate) fn is_active(&self) -> bool {
        self.active
    }

    pub(crate) fn push_str(&mut self, text: &str) {
        self.buffer.push_str(text);
    }

    pub(crate) fn end(&mut self) -> (Option<String>, String) {
        self.active = false;
        (self.lang.take(), std::mem::take(&mut self.buffer))
    }
}

/// Table being rendered.
#[derive(Debug, Default)]
pub(crate) struct TableState {
    alignments: Vec<Alignment>,
    in_head: bool,
    cell: usize,
}

impl TableState {
    pub(crate) fn start(&mut self, alignments: Vec<Alignment>) {
        self.alignments = alignments;
        self.in_head = false;
        self.cell = 0;
    }

    pub(crate) fn start_head(&mut self) {
        self.in_head = true;
        self.cell = 0;
    }

    pub(crate) fn end_head(&mut self) {
        self.in_head = false;
    }

    pub(crate) fn start_row(&mut self) {
        self.cell = 0;
    }

    pub(crate) fn next_cell(&mut self) {
        self.cell += 1;
    }

    pub(crate) fn is_in_head(&self) -> bool {
        self.in_head
    }

    /// Style attribute for the current cell, empty for unaligned columns.
    pub(crate) fn current_alignment_style(&self) -> &'static str {
        match self.alignments.get(self.cell) {
            Some(Alignment::Left) => r#" style="text-align: left""#,
            Some(Alignment::Center) => r#" style="text-align: center""#,
            Some(Alignment::Right) => r#" style="text-align: right""#,
            Some(Alignment::None) | None => "",
        }
    }
}

/// Image whose alt text is being collected.
#[derive(Debug)]
pub(crate) struct PendingImage {
    pub(crate) src: String,
    pub(crate) title: Option<String>,
    pub(crate) alt: String,
}

/// Inline content captured for a construct rendered on its end tag.
#[derive(Debug)]
pub(crate) enum Capture {
    Link {
        href: String,
        title: Option<String>,
        html: String,
    },
    Heading {
        level: u8,
        text: String,
        html: String,
    },
}

impl Capture {
    pub(crate) fn html_mut(&mut self) -> &mut String {
        match self {
            Self::Link { html, .. } | Self::Heading { html, .. } => html,
        }
    }
}

/// Convert an empty title into `None`.
pub(crate) fn non_empty(s: &str) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s.to_owned())
    }
}
