//! Markdown documents and their rendered forms.
//!
//! This module handles:
//! - Heading anchor ids ([`slugify`])
//! - Markdown to sanitized HTML ([`render`])
//! - The terminal view of that HTML ([`RenderedView`])
//! - The standalone page used for printing ([`page`])

pub mod page;
mod render;
mod slug;
mod view;

pub use render::{render, sanitize};
pub use slug::{HeadingText, slugify, slugify_str};
pub use view::{
    AnchorRef, Block, InlineSpan, InlineStyle, LineKind, LinkRef, RenderedView, ViewLine,
    first_line_of_block,
};

/// A loaded markdown document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub name: String,
    /// Raw markdown source.
    pub content: String,
}

impl Document {
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }
}

/// Sanitized HTML for one document plus the view derived from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedDocument {
    html: String,
    view: RenderedView,
}

impl RenderedDocument {
    /// Render markdown source.
    pub fn from_markdown(source: &str) -> Self {
        let html = render(source);
        let view = RenderedView::from_html(&html);
        Self { html, view }
    }

    /// The sanitized HTML.
    pub fn html(&self) -> &str {
        &self.html
    }

    pub const fn view(&self) -> &RenderedView {
        &self.view
    }

    /// Tag-stripped text of the document.
    pub fn plain_text(&self) -> String {
        self.view.plain_text()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rendered_document_keeps_html_and_view_in_sync() {
        let rendered = RenderedDocument::from_markdown("# Intro\n\nHello <b>there</b>");
        assert!(rendered.html().contains(r#"<h1 id="intro">"#));
        assert_eq!(rendered.view().anchor_block("intro"), Some(0));
        assert_eq!(rendered.plain_text(), "Intro\nHello there");
    }

    #[test]
    fn test_rendering_is_repeatable() {
        let source = "## Same, Input!\n\n* a\n* b\n";
        assert_eq!(
            RenderedDocument::from_markdown(source),
            RenderedDocument::from_markdown(source)
        );
    }
}
