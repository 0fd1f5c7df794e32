//! Heading anchor ids.

use std::sync::LazyLock;

use regex::Regex;

/// Anything that is not an ASCII word character, whitespace, or a hyphen.
static DISALLOWED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9_\s-]").expect("valid slug regex"));

/// Runs of separators that collapse into a single hyphen.
static SEPARATORS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\s_-]+").expect("valid separator regex"));

/// The text of a heading as handed to the slugifier.
///
/// `raw_text` is the unescaped text content of the heading; `level` is 1-6.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadingText {
    pub raw_text: String,
    pub level: u8,
}

impl HeadingText {
    pub fn new(raw_text: impl Into<String>, level: u8) -> Self {
        Self {
            raw_text: raw_text.into(),
            level,
        }
    }
}

/// Build the anchor id for a heading.
///
/// # Example
///
/// ```
/// use inkview::document::{HeadingText, slugify};
///
/// let heading = HeadingText::new("Hello, World!! --- Test", 2);
/// assert_eq!(slugify(&heading), "hello-world-test");
/// ```
pub fn slugify(heading: &HeadingText) -> String {
    slugify_str(&heading.raw_text)
}

/// Slugify free text. Total over every input; the empty string maps to itself.
///
/// Ids are not deduplicated: two headings with the same text share an id.
pub fn slugify_str(text: &str) -> String {
    let lowered = text.to_lowercase();
    let stripped = DISALLOWED.replace_all(lowered.trim(), "");
    let collapsed = SEPARATORS.replace_all(&stripped, "-");
    collapsed.trim_matches('-').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_heading() {
        assert_eq!(slugify_str("Hello World"), "hello-world");
    }

    #[test]
    fn test_punctuation_and_repeated_separators_collapse() {
        assert_eq!(slugify_str("Hello, World!! --- Test"), "hello-world-test");
    }

    #[test]
    fn test_underscores_become_hyphens() {
        assert_eq!(slugify_str("snake_case__name"), "snake-case-name");
    }

    #[test]
    fn test_leading_and_trailing_hyphens_are_stripped() {
        assert_eq!(slugify_str("  -- Intro --  "), "intro");
        assert_eq!(slugify_str("!Bang?"), "bang");
    }

    #[test]
    fn test_empty_and_symbol_only_input() {
        assert_eq!(slugify_str(""), "");
        assert_eq!(slugify_str("!!!"), "");
        assert_eq!(slugify_str("   "), "");
    }

    #[test]
    fn test_non_ascii_letters_are_dropped() {
        assert_eq!(slugify_str("Café Menü"), "caf-men");
    }

    #[test]
    fn test_digits_survive() {
        assert_eq!(slugify_str("Step 2: Install v1.2"), "step-2-install-v12");
    }

    #[test]
    fn test_same_text_same_id_across_levels() {
        let a = HeadingText::new("Usage", 1);
        let b = HeadingText::new("Usage", 3);
        assert_eq!(slugify(&a), slugify(&b));
    }
}
