//! Shared utility functions for markdown rendering.

use pulldown_cmark::HeadingLevel;

/// Convert heading level enum to number (1-6).
#[must_use]
pub(crate) fn heading_level_to_num(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

/// Extract the language from a fence info string.
///
/// The language is the first whitespace-separated word, with any `{...}`
/// attribute block removed: ` ```js {highlight=2}` → `js`.
pub(crate) fn fence_language(info: &str) -> Option<String> {
    let word = info.split_whitespace().next()?;
    let lang = word.split('{').next().unwrap_or_default();
    if lang.is_empty() {
        None
    } else {
        Some(lang.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fence_language_plain() {
        assert_eq!(fence_language("rust"), Some("rust".to_owned()));
    }

    #[test]
    fn test_fence_language_with_attrs() {
        assert_eq!(fence_language("js {highlight=2}"), Some("js".to_owned()));
        assert_eq!(fence_language("js{highlight=2}"), Some("js".to_owned()));
    }

    #[test]
    fn test_fence_language_empty() {
        assert_eq!(fence_language(""), None);
        assert_eq!(fence_language("   "), None);
        assert_eq!(fence_language("{.class}"), None);
    }

    #[test]
    fn test_heading_level_to_num() {
        assert_eq!(heading_level_to_num(HeadingLevel::H1), 1);
        assert_eq!(heading_level_to_num(HeadingLevel::H6), 6);
    }
}
