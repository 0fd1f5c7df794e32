//! Markdown to sanitized HTML.
//!
//! Rendering is two fixed stages: comrak turns the source into HTML (headings
//! go through [`AnchoredHeadings`] so each one carries a slug `id`), then
//! ammonia strips everything outside the allow-list. The sanitizer always
//! runs; documents may come from arbitrary URLs.

use std::io::{self, Write};

use comrak::adapters::{HeadingAdapter, HeadingMeta};
use comrak::nodes::Sourcepos;
use comrak::{Options, Plugins, markdown_to_html_with_plugins};

use super::slug::{HeadingText, slugify};

/// Render markdown source to HTML that is safe to display.
///
/// Never fails: constructs the parser does not understand come out as text,
/// and disallowed markup is dropped without a report.
///
/// # Example
///
/// ```
/// let html = inkview::document::render("# Hello World\n\n<script>alert(1)</script>");
/// assert!(html.contains(r#"<h1 id="hello-world">Hello World</h1>"#));
/// assert!(!html.contains("<script"));
/// ```
pub fn render(source: &str) -> String {
    let raw = render_unsanitized(source);
    sanitize(&raw)
}

fn render_unsanitized(source: &str) -> String {
    let options = create_options();
    let adapter = AnchoredHeadings::new(source);
    let mut plugins = Plugins::default();
    plugins.render.heading_adapter = Some(&adapter);
    markdown_to_html_with_plugins(source, &options, &plugins)
}

fn create_options() -> Options {
    let mut options = Options::default();

    // GFM extensions
    options.extension.strikethrough = true;
    options.extension.table = true;
    options.extension.autolink = true;
    options.extension.tasklist = true;
    options.extension.footnotes = true;
    options.extension.shortcodes = true;

    // Raw HTML is kept here and filtered by the sanitizer instead.
    options.render.unsafe_ = true;
    // Heading ids are cut from the source; the data-sourcepos attributes
    // this adds are not on the allow-list.
    options.render.sourcepos = true;

    options
}

/// Writes `<hN id="...">`, slugging the heading's raw source.
///
/// The raw source includes inline markup and link targets, so
/// `# [Intro](http://x)` gets the id `introhttpx`. When the position is
/// unusable the flattened heading text is slugged instead.
struct AnchoredHeadings<'a> {
    lines: Vec<&'a str>,
}

impl<'a> AnchoredHeadings<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            lines: source.lines().collect(),
        }
    }

    /// Source text between two 1-based, inclusive line/column positions.
    fn raw_text(&self, pos: Sourcepos) -> Option<String> {
        let (start, end) = (pos.start, pos.end);
        if start.line == 0 || start.column == 0 || end.line < start.line {
            return None;
        }
        let mut raw = Vec::new();
        for number in start.line..=end.line {
            let line = *self.lines.get(number - 1)?;
            let from = if number == start.line { start.column - 1 } else { 0 };
            let to = if number == end.line {
                end.column.min(line.len())
            } else {
                line.len()
            };
            raw.push(line.get(from..to.max(from))?);
        }
        Some(raw.join("\n"))
    }
}

impl HeadingAdapter for AnchoredHeadings<'_> {
    fn enter(
        &self,
        output: &mut dyn Write,
        heading: &HeadingMeta,
        sourcepos: Option<Sourcepos>,
    ) -> io::Result<()> {
        let raw = sourcepos
            .and_then(|pos| self.raw_text(pos))
            .unwrap_or_else(|| heading.content.clone());
        let text = HeadingText::new(raw, heading.level);
        // Slugs only contain [a-z0-9_-], no attribute escaping needed.
        write!(output, "<h{} id=\"{}\">", text.level, slugify(&text))
    }

    fn exit(&self, output: &mut dyn Write, heading: &HeadingMeta) -> io::Result<()> {
        writeln!(output, "</h{}>", heading.level)
    }
}

/// Run HTML through the fixed allow-list.
pub fn sanitize(html: &str) -> String {
    let mut builder = ammonia::Builder::default();
    builder
        .add_generic_attributes(&["id", "name"])
        .add_tags(&["input"])
        .add_tag_attributes("input", &["type", "checked", "disabled"])
        .add_tag_attributes("code", &["class"]);
    builder.clean(html).to_string()
}
