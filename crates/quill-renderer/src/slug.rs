//! Heading anchor slugs.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

/// Characters escaped by JavaScript's `encodeURIComponent`.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Build the anchor slug for a heading.
///
/// Lowercases the text, percent-encodes it as a URI component and replaces
/// encoded spaces with `+`.
///
/// # Examples
///
/// ```
/// use quill_renderer::heading_slug;
///
/// assert_eq!(heading_slug("Getting Started"), "getting+started");
/// assert_eq!(heading_slug("¿Qué es?"), "%C2%BFqu%C3%A9+es%3F");
/// ```
pub fn heading_slug(text: &str) -> String {
    utf8_percent_encode(&text.to_lowercase(), URI_COMPONENT)
        .to_string()
        .replace("%20", "+")
}
