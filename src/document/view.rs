//! Terminal presentation of sanitized HTML.
//!
//! The sanitized HTML is the single source for everything shown or spoken:
//! [`RenderedView::from_html`] runs it through the html5ever tokenizer into a
//! list of blocks with styled inline spans, records element ids (for
//! `#anchor` links) and link targets, and [`RenderedView::layout`] wraps the
//! blocks into display lines for a given width. [`RenderedView::plain_text`]
//! is the tag-stripped text used for speech and the plain clipboard flavour.

use std::cell::RefCell;

use html5ever::TokenizerResult;
use html5ever::tendril::StrTendril;
use html5ever::tokenizer::{
    BufferQueue, Tag, TagKind, Token, TokenSink, TokenSinkResult, Tokenizer, TokenizerOpts,
};
use unicode_width::UnicodeWidthStr;

/// Kind of a block or display line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Heading(u8),
    Paragraph,
    ListItem,
    Quote,
    Code,
    TableRow,
    Rule,
    Blank,
}

/// Inline style flags for a text span.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InlineStyle {
    pub emphasis: bool,
    pub strong: bool,
    pub code: bool,
    pub strikethrough: bool,
    pub link: bool,
}

/// A styled inline span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineSpan {
    text: String,
    style: InlineStyle,
}

impl InlineSpan {
    pub fn new(text: impl Into<String>, style: InlineStyle) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub const fn style(&self) -> InlineStyle {
        self.style
    }
}

/// Append `text` to `spans`, merging with the last span when styles match.
fn push_span(spans: &mut Vec<InlineSpan>, text: &str, style: InlineStyle) {
    if text.is_empty() {
        return;
    }
    match spans.last_mut() {
        Some(last) if last.style == style => last.text.push_str(text),
        _ => spans.push(InlineSpan::new(text, style)),
    }
}

fn spans_to_string(spans: &[InlineSpan]) -> String {
    spans.iter().map(InlineSpan::text).collect()
}

/// One block-level element of the rendered document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub kind: LineKind,
    /// List marker (`• `, `3. `), empty outside lists.
    pub marker: String,
    pub text: String,
    /// `text` split into styled runs.
    pub spans: Vec<InlineSpan>,
    /// List nesting depth.
    pub depth: usize,
}

/// A link found in the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkRef {
    pub text: String,
    pub href: String,
    /// Index of the block containing the link.
    pub block: usize,
}

/// An element id and the block it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnchorRef {
    pub id: String,
    pub block: usize,
}

/// A wrapped display line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewLine {
    pub text: String,
    /// `text` split into styled runs; empty for blank lines.
    pub spans: Vec<InlineSpan>,
    pub kind: LineKind,
    pub block: usize,
}

impl ViewLine {
    fn new(text: impl Into<String>, kind: LineKind, block: usize) -> Self {
        let text = text.into();
        let mut spans = Vec::new();
        push_span(&mut spans, &text, InlineStyle::default());
        Self {
            text,
            spans,
            kind,
            block,
        }
    }

    /// A line made of an unstyled lead followed by styled content.
    fn styled(lead: &str, content: Vec<InlineSpan>, kind: LineKind, block: usize) -> Self {
        let mut spans = Vec::with_capacity(content.len() + 1);
        push_span(&mut spans, lead, InlineStyle::default());
        for span in content {
            push_span(&mut spans, &span.text, span.style);
        }
        Self {
            text: spans_to_string(&spans),
            spans,
            kind,
            block,
        }
    }
}

/// Structured view over a rendered document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderedView {
    blocks: Vec<Block>,
    links: Vec<LinkRef>,
    anchors: Vec<AnchorRef>,
}

impl RenderedView {
    /// Build the view from sanitized HTML.
    pub fn from_html(html: &str) -> Self {
        let queue = BufferQueue::default();
        queue.push_back(StrTendril::from_slice(html));
        let tokenizer = Tokenizer::new(ViewSink::default(), TokenizerOpts::default());
        while !matches!(tokenizer.feed(&queue), TokenizerResult::Done) {}
        tokenizer.end();
        tokenizer.sink.builder.into_inner().finish()
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn links(&self) -> &[LinkRef] {
        &self.links
    }

    pub fn anchors(&self) -> &[AnchorRef] {
        &self.anchors
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Block index for an element id. The first element wins when ids repeat.
    pub fn anchor_block(&self, id: &str) -> Option<usize> {
        self.anchors
            .iter()
            .find(|anchor| anchor.id == id)
            .map(|anchor| anchor.block)
    }

    /// Text content with all markup removed, one block per line.
    pub fn plain_text(&self) -> String {
        self.blocks
            .iter()
            .map(|block| match block.kind {
                LineKind::Rule => String::new(),
                _ => block.text.clone(),
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Wrap blocks into display lines no wider than `width` columns.
    pub fn layout(&self, width: u16) -> Vec<ViewLine> {
        let width = usize::from(width.max(8));
        let mut lines = Vec::new();
        for (idx, block) in self.blocks.iter().enumerate() {
            if idx > 0 && needs_gap(self.blocks[idx - 1].kind, block.kind) {
                lines.push(ViewLine::new("", LineKind::Blank, idx));
            }
            let indent = "  ".repeat(block.depth.saturating_sub(1));
            match block.kind {
                LineKind::Code => {
                    let lead = format!("{indent}  ");
                    for code_line in split_spans(&block.spans, '\n') {
                        lines.push(ViewLine::styled(&lead, code_line, LineKind::Code, idx));
                    }
                }
                LineKind::Rule => {
                    lines.push(ViewLine::new("─".repeat(width.min(40)), LineKind::Rule, idx));
                }
                LineKind::Heading(level) => {
                    let prefix = format!("{} ", "#".repeat(usize::from(level)));
                    push_wrapped(&mut lines, &block.spans, &prefix, width, block.kind, idx);
                }
                LineKind::Quote => {
                    push_wrapped(&mut lines, &block.spans, "│ ", width, block.kind, idx);
                }
                LineKind::TableRow => {
                    let row: Vec<_> = block
                        .spans
                        .iter()
                        .map(|span| InlineSpan::new(span.text.replace('\t', " │ "), span.style))
                        .collect();
                    push_wrapped(&mut lines, &row, &indent, width, block.kind, idx);
                }
                LineKind::ListItem => {
                    let prefix = format!("{indent}{}", block.marker);
                    push_wrapped(&mut lines, &block.spans, &prefix, width, block.kind, idx);
                }
                LineKind::Paragraph | LineKind::Blank => {
                    let prefix = "  ".repeat(block.depth);
                    push_wrapped(&mut lines, &block.spans, &prefix, width, block.kind, idx);
                }
            }
        }
        lines
    }
}

/// First display line belonging to `block`.
pub fn first_line_of_block(lines: &[ViewLine], block: usize) -> Option<usize> {
    lines
        .iter()
        .position(|line| line.block == block && line.kind != LineKind::Blank)
}

const fn needs_gap(prev: LineKind, next: LineKind) -> bool {
    !matches!(
        (prev, next),
        (LineKind::ListItem, LineKind::ListItem) | (LineKind::TableRow, LineKind::TableRow)
    )
}

fn push_wrapped(
    lines: &mut Vec<ViewLine>,
    spans: &[InlineSpan],
    prefix: &str,
    width: usize,
    kind: LineKind,
    block: usize,
) {
    let prefix_width = prefix.width();
    let hanging = " ".repeat(prefix_width);
    let available = width.saturating_sub(prefix_width).max(4);
    let mut first = true;
    for segment in split_spans(spans, '\n') {
        for wrapped in wrap_spans(&segment, available) {
            let lead = if first { prefix } else { hanging.as_str() };
            first = false;
            lines.push(ViewLine::styled(lead, wrapped, kind, block));
        }
    }
}

/// Split styled text at every `separator`; there is always one segment.
fn split_spans(spans: &[InlineSpan], separator: char) -> Vec<Vec<InlineSpan>> {
    let mut segments = vec![Vec::new()];
    for span in spans {
        for (idx, piece) in span.text.split(separator).enumerate() {
            if idx > 0 {
                segments.push(Vec::new());
            }
            if let Some(segment) = segments.last_mut() {
                push_span(segment, piece, span.style);
            }
        }
    }
    segments
}

/// A run of non-space text and the style of the space before it.
#[derive(Debug, Default)]
struct Word {
    gap: InlineStyle,
    parts: Vec<InlineSpan>,
    width: usize,
}

fn wrap_spans(spans: &[InlineSpan], width: usize) -> Vec<Vec<InlineSpan>> {
    let mut words = Vec::new();
    let mut current = Word::default();
    for span in spans {
        for (idx, piece) in span.text.split(' ').enumerate() {
            if idx > 0 {
                if !current.parts.is_empty() {
                    words.push(std::mem::take(&mut current));
                }
                current.gap = span.style;
            }
            if !piece.is_empty() {
                push_span(&mut current.parts, piece, span.style);
                current.width += piece.width();
            }
        }
    }
    if !current.parts.is_empty() {
        words.push(current);
    }

    let mut out = Vec::new();
    let mut line: Vec<InlineSpan> = Vec::new();
    let mut line_width = 0;
    for word in words {
        if line_width > 0 && line_width + 1 + word.width > width {
            out.push(std::mem::take(&mut line));
            line_width = 0;
        }
        if line_width > 0 {
            push_span(&mut line, " ", word.gap);
            line_width += 1;
        }
        for part in word.parts {
            push_span(&mut line, &part.text, part.style);
        }
        line_width += word.width;
    }
    if !line.is_empty() || out.is_empty() {
        out.push(line);
    }
    out
}

/// Feeds tokenizer output into a [`ViewBuilder`].
#[derive(Default)]
struct ViewSink {
    builder: RefCell<ViewBuilder>,
}

impl TokenSink for ViewSink {
    type Handle = ();

    fn process_token(&self, token: Token, _line_number: u64) -> TokenSinkResult<()> {
        let mut builder = self.builder.borrow_mut();
        match token {
            Token::TagToken(tag) => {
                let name = tag.name.to_string();
                match tag.kind {
                    TagKind::StartTag => builder.open(&name, &attributes(&tag)),
                    TagKind::EndTag => builder.close(&name),
                }
            }
            Token::CharacterTokens(text) => builder.text(&text),
            _ => {}
        }
        TokenSinkResult::Continue
    }
}

fn attributes(tag: &Tag) -> Vec<(String, String)> {
    tag.attrs
        .iter()
        .map(|attr| (attr.name.local.to_string(), attr.value.to_string()))
        .collect()
}

#[derive(Debug)]
enum ListKind {
    Bullet,
    Ordered(u64),
}

#[derive(Debug)]
struct Pending {
    kind: LineKind,
    marker: String,
    text: String,
    spans: Vec<InlineSpan>,
    depth: usize,
}

impl Pending {
    fn push(&mut self, text: &str, style: InlineStyle) {
        self.text.push_str(text);
        push_span(&mut self.spans, text, style);
    }

    fn ends_at_break(&self) -> bool {
        self.text.is_empty() || self.text.ends_with([' ', '\n', '\t'])
    }

    fn trim_end_spaces(&mut self) {
        while self.text.ends_with(' ') {
            self.text.pop();
            if let Some(last) = self.spans.last_mut() {
                last.text.pop();
                if last.text.is_empty() {
                    self.spans.pop();
                }
            }
        }
    }

    /// Strip characters matching `trim` from both ends of the styled text.
    fn into_trimmed(mut self, trim: fn(char) -> bool) -> (String, Vec<InlineSpan>) {
        while let Some(first) = self.spans.first_mut() {
            first.text = first.text.trim_start_matches(trim).to_string();
            if !first.text.is_empty() {
                break;
            }
            self.spans.remove(0);
        }
        while let Some(last) = self.spans.last_mut() {
            last.text.truncate(last.text.trim_end_matches(trim).len());
            if !last.text.is_empty() {
                break;
            }
            self.spans.pop();
        }
        (spans_to_string(&self.spans), self.spans)
    }
}

#[derive(Debug, Default)]
struct ViewBuilder {
    blocks: Vec<Block>,
    links: Vec<LinkRef>,
    anchors: Vec<AnchorRef>,
    current: Option<Pending>,
    lists: Vec<ListKind>,
    styles: Vec<InlineStyle>,
    quote_depth: usize,
    pre_depth: usize,
    open_link: Option<(String, usize)>,
    cells: usize,
}

impl ViewBuilder {
    fn open(&mut self, name: &str, attrs: &[(String, String)]) {
        match name {
            "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
                let level = name[1..].parse().unwrap_or(1);
                self.start(LineKind::Heading(level));
            }
            "p" => {
                let continues_item = self.current.as_ref().is_some_and(|pending| {
                    pending.kind == LineKind::ListItem && pending.text.trim().is_empty()
                });
                if !continues_item {
                    self.start(self.paragraph_kind());
                }
            }
            "li" => {
                let marker = match self.lists.last_mut() {
                    Some(ListKind::Ordered(next)) => {
                        let marker = format!("{next}. ");
                        *next += 1;
                        marker
                    }
                    _ => "• ".to_string(),
                };
                self.start(LineKind::ListItem);
                if let Some(pending) = self.current.as_mut() {
                    pending.marker = marker;
                }
            }
            "ul" => {
                self.flush();
                self.lists.push(ListKind::Bullet);
            }
            "ol" => {
                self.flush();
                let start = attr(attrs, "start")
                    .and_then(|value| value.parse().ok())
                    .unwrap_or(1);
                self.lists.push(ListKind::Ordered(start));
            }
            "pre" => {
                self.start(LineKind::Code);
                self.pre_depth += 1;
            }
            "blockquote" => {
                self.flush();
                self.quote_depth += 1;
            }
            "tr" => {
                self.start(LineKind::TableRow);
                self.cells = 0;
            }
            "td" | "th" => {
                if self.cells > 0 {
                    self.push_separator("\t");
                }
                self.cells += 1;
            }
            "hr" => {
                self.flush();
                self.blocks.push(Block {
                    kind: LineKind::Rule,
                    marker: String::new(),
                    text: String::new(),
                    spans: Vec::new(),
                    depth: 0,
                });
            }
            "br" => {
                if self.current.is_some() {
                    self.push_separator("\n");
                }
            }
            "img" => {
                let label = match attr(attrs, "alt").filter(|alt| !alt.trim().is_empty()) {
                    Some(alt) => format!("[image: {alt}]"),
                    None => "[image]".to_string(),
                };
                self.text(&label);
            }
            "input" => {
                if attr(attrs, "type") == Some("checkbox") {
                    let mark = if attr(attrs, "checked").is_some() {
                        "[x] "
                    } else {
                        "[ ] "
                    };
                    self.ensure_block();
                    self.push_raw(mark);
                }
            }
            "a" => {
                let mut style = self.style();
                if let Some(href) = attr(attrs, "href") {
                    self.ensure_block();
                    let start = self.current.as_ref().map_or(0, |pending| pending.text.len());
                    self.open_link = Some((href.to_string(), start));
                    style.link = true;
                }
                self.styles.push(style);
            }
            "strong" | "b" => self.push_style(|style| style.strong = true),
            "em" | "i" => self.push_style(|style| style.emphasis = true),
            "del" | "s" | "strike" => self.push_style(|style| style.strikethrough = true),
            "code" => self.push_style(|style| style.code = true),
            "div" | "section" | "table" | "thead" | "tbody" | "dl" | "details" | "figure" => {
                self.flush();
            }
            "dt" | "dd" | "summary" | "figcaption" | "caption" => {
                self.start(self.paragraph_kind());
            }
            _ => {}
        }

        for key in ["id", "name"] {
            if let Some(id) = attr(attrs, key).filter(|id| !id.is_empty()) {
                self.anchors.push(AnchorRef {
                    id: id.to_string(),
                    block: self.blocks.len(),
                });
            }
        }
    }

    fn close(&mut self, name: &str) {
        match name {
            "h1" | "h2" | "h3" | "h4" | "h5" | "h6" | "p" | "li" | "tr" | "dt" | "dd"
            | "summary" | "figcaption" | "caption" => self.flush(),
            "pre" => {
                self.flush();
                self.pre_depth = self.pre_depth.saturating_sub(1);
            }
            "ul" | "ol" => {
                self.flush();
                self.lists.pop();
            }
            "blockquote" => {
                self.flush();
                self.quote_depth = self.quote_depth.saturating_sub(1);
            }
            "a" => {
                self.finish_link();
                self.styles.pop();
            }
            "strong" | "b" | "em" | "i" | "del" | "s" | "strike" | "code" => {
                self.styles.pop();
            }
            _ => {}
        }
    }

    fn text(&mut self, text: &str) {
        if self.pre_depth > 0 {
            self.ensure_block();
            self.push_raw(text);
            return;
        }
        if self.current.is_none() && text.trim().is_empty() {
            return;
        }
        self.ensure_block();
        let style = self.style();
        let Some(pending) = self.current.as_mut() else {
            return;
        };
        let mut buf = [0; 4];
        for ch in text.chars() {
            if ch.is_whitespace() {
                if !pending.ends_at_break() {
                    pending.push(" ", style);
                }
            } else {
                pending.push(ch.encode_utf8(&mut buf), style);
            }
        }
    }

    /// Current inline style; code blocks are shown unstyled.
    fn style(&self) -> InlineStyle {
        if self.pre_depth > 0 {
            return InlineStyle::default();
        }
        self.styles.last().copied().unwrap_or_default()
    }

    fn push_style(&mut self, apply: impl FnOnce(&mut InlineStyle)) {
        let mut style = self.styles.last().copied().unwrap_or_default();
        apply(&mut style);
        self.styles.push(style);
    }

    fn push_raw(&mut self, text: &str) {
        if let Some(pending) = self.current.as_mut() {
            pending.push(text, InlineStyle::default());
        }
    }

    /// Push a cell or line separator, dropping the space collapsed before it.
    fn push_separator(&mut self, separator: &str) {
        if let Some(pending) = self.current.as_mut() {
            pending.trim_end_spaces();
            pending.push(separator, InlineStyle::default());
        }
    }

    fn paragraph_kind(&self) -> LineKind {
        if self.quote_depth > 0 {
            LineKind::Quote
        } else {
            LineKind::Paragraph
        }
    }

    fn ensure_block(&mut self) {
        if self.current.is_none() {
            self.start(self.paragraph_kind());
        }
    }

    fn start(&mut self, kind: LineKind) {
        self.flush();
        self.current = Some(Pending {
            kind,
            marker: String::new(),
            text: String::new(),
            spans: Vec::new(),
            depth: self.lists.len(),
        });
    }

    fn finish_link(&mut self) {
        let Some((href, start)) = self.open_link.take() else {
            return;
        };
        let text = self
            .current
            .as_ref()
            .and_then(|pending| pending.text.get(start..))
            .unwrap_or_default()
            .trim()
            .to_string();
        self.links.push(LinkRef {
            text,
            href,
            block: self.blocks.len(),
        });
    }

    fn flush(&mut self) {
        self.finish_link();
        let Some(pending) = self.current.take() else {
            return;
        };
        let kind = pending.kind;
        let marker = pending.marker.clone();
        let depth = pending.depth;
        let (text, spans) = if kind == LineKind::Code {
            pending.into_trimmed(|c| c == '\n')
        } else {
            pending.into_trimmed(char::is_whitespace)
        };
        if text.is_empty() {
            return;
        }
        self.blocks.push(Block {
            kind,
            marker,
            text,
            spans,
            depth,
        });
    }

    fn finish(mut self) -> RenderedView {
        self.flush();
        RenderedView {
            blocks: self.blocks,
            links: self.links,
            anchors: self.anchors,
        }
    }
}

fn attr<'a>(attrs: &'a [(String, String)], key: &str) -> Option<&'a str> {
    attrs
        .iter()
        .find(|(name, _)| name == key)
        .map(|(_, value)| value.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::render;

    fn view(markdown: &str) -> RenderedView {
        RenderedView::from_html(&render(markdown))
    }

    #[test]
    fn test_heading_block_and_anchor() {
        let view = view("# Hello World\n\nBody text.");
        assert_eq!(view.blocks()[0].kind, LineKind::Heading(1));
        assert_eq!(view.blocks()[0].text, "Hello World");
        assert_eq!(view.anchor_block("hello-world"), Some(0));
        assert_eq!(view.blocks()[1].text, "Body text.");
    }

    #[test]
    fn test_first_anchor_wins_for_duplicate_ids() {
        let view = view("# Setup\n\ntext\n\n# Setup\n");
        assert_eq!(view.anchor_block("setup"), Some(0));
    }

    #[test]
    fn test_links_are_collected_with_block_index() {
        let view = view("# Top\n\nSee [the top](#top) or [docs](https://example.com).");
        let links = view.links();
        assert_eq!(links.len(), 2);
        assert_eq!(links[0].href, "#top");
        assert_eq!(links[0].text, "the top");
        assert_eq!(links[0].block, 1);
        assert_eq!(links[1].href, "https://example.com");
    }

    #[test]
    fn test_lists_get_markers() {
        let view = view("- one\n- two\n\n3. three\n4. four\n");
        let items: Vec<_> = view
            .blocks()
            .iter()
            .map(|b| format!("{}{}", b.marker, b.text))
            .collect();
        assert_eq!(items, vec!["• one", "• two", "3. three", "4. four"]);
    }

    #[test]
    fn test_code_block_keeps_line_breaks() {
        let view = view("```\nfn main() {\n    run();\n}\n```\n");
        let block = &view.blocks()[0];
        assert_eq!(block.kind, LineKind::Code);
        assert_eq!(block.text, "fn main() {\n    run();\n}");
    }

    #[test]
    fn test_entities_are_decoded() {
        let view = view("Fish &amp; chips < 5 > 3 \"quoted\"");
        assert_eq!(view.blocks()[0].text, "Fish & chips < 5 > 3 \"quoted\"");
    }

    #[test]
    fn test_plain_text_has_no_markup() {
        let view = view("# Title\n\nSome **bold** and `code`.\n\n- item\n");
        let text = view.plain_text();
        assert_eq!(text, "Title\nSome bold and code.\nitem");
        assert!(!text.contains('<'));
    }

    #[test]
    fn test_table_rows() {
        let view = view("| a | b |\n|---|---|\n| 1 | 2 |\n");
        let rows: Vec<_> = view
            .blocks()
            .iter()
            .filter(|b| b.kind == LineKind::TableRow)
            .map(|b| b.text.clone())
            .collect();
        assert_eq!(rows, vec!["a\tb", "1\t2"]);
    }

    #[test]
    fn test_quote_blocks() {
        let view = view("> quoted words\n");
        assert_eq!(view.blocks()[0].kind, LineKind::Quote);
        assert_eq!(view.blocks()[0].text, "quoted words");
    }

    #[test]
    fn test_layout_wraps_and_indents() {
        let view = view("This is a paragraph with several words that must wrap.");
        let lines = view.layout(20);
        assert!(lines.len() > 1);
        assert!(lines.iter().all(|l| l.text.width() <= 20));
    }

    #[test]
    fn test_layout_separates_blocks_with_blank_lines() {
        let view = view("# A\n\ntext\n\n- x\n- y\n");
        let kinds: Vec<_> = view.layout(80).iter().map(|l| l.kind).collect();
        assert_eq!(
            kinds,
            vec![
                LineKind::Heading(1),
                LineKind::Blank,
                LineKind::Paragraph,
                LineKind::Blank,
                LineKind::ListItem,
                LineKind::ListItem,
            ]
        );
    }

    #[test]
    fn test_first_line_of_block_skips_gap() {
        let view = view("# A\n\n## B\n");
        let lines = view.layout(80);
        let block = view.anchor_block("b").unwrap();
        let line = first_line_of_block(&lines, block).unwrap();
        assert_eq!(lines[line].text, "## B");
    }

    #[test]
    fn test_task_items_show_checkbox_state() {
        let view = view("- [x] done\n- [ ] open\n");
        assert_eq!(view.blocks()[0].text, "[x] done");
        assert_eq!(view.blocks()[1].text, "[ ] open");
    }

    #[test]
    fn test_character_references_are_decoded() {
        let view = RenderedView::from_html("<p>&copy; &mdash; &#65;&#x42; &amp;amp;</p>");
        assert_eq!(view.blocks()[0].text, "© — AB &amp;");
    }

    #[test]
    fn test_attribute_values_are_decoded() {
        let view = RenderedView::from_html(r#"<p><a title="a>b" href="/x?a=1&amp;b=2">t</a></p>"#);
        assert_eq!(view.links()[0].href, "/x?a=1&b=2");
        assert_eq!(view.links()[0].text, "t");
    }

    #[test]
    fn test_unquoted_and_void_elements() {
        let view = RenderedView::from_html("<p>one<br>two <img alt=logo src=x.png></p>");
        assert_eq!(view.blocks()[0].text, "one\ntwo [image: logo]");
    }

    #[test]
    fn test_inline_markup_becomes_styled_spans() {
        let view = view("Some **bold**, *em*, `code`, ~~gone~~ and [a link](https://x.org).");
        let spans = &view.blocks()[0].spans;
        let styled = |text: &str| {
            spans
                .iter()
                .find(|span| span.text() == text)
                .map(InlineSpan::style)
                .unwrap_or_else(|| panic!("no span {text:?} in {spans:?}"))
        };
        assert!(styled("bold").strong);
        assert!(styled("em").emphasis);
        assert!(styled("code").code);
        assert!(styled("gone").strikethrough);
        assert!(styled("a link").link);
        assert_eq!(styled("Some "), InlineStyle::default());
        assert_eq!(spans_to_string(spans), view.blocks()[0].text);
    }

    #[test]
    fn test_nested_inline_styles_combine() {
        let view = view("***both*** [**strong link**](#x)");
        let spans = &view.blocks()[0].spans;
        assert!(spans[0].style().strong && spans[0].style().emphasis);
        let link = spans.iter().find(|s| s.text() == "strong link").unwrap();
        assert!(link.style().strong && link.style().link);
    }

    #[test]
    fn test_code_blocks_are_not_inline_code() {
        let view = view("```\nlet x = 1;\n```\n");
        assert!(view.blocks()[0].spans.iter().all(|s| !s.style().code));
    }

    #[test]
    fn test_wrapping_keeps_span_styles() {
        let view = view("plain words then **several bold words that wrap** and more");
        let lines = view.layout(20);
        assert!(lines.len() > 2);
        for line in &lines {
            assert_eq!(spans_to_string(&line.spans), line.text);
            assert!(line.text.width() <= 20);
        }
        let bold: Vec<_> = lines
            .iter()
            .flat_map(|line| &line.spans)
            .filter(|span| span.style().strong)
            .map(InlineSpan::text)
            .collect();
        assert_eq!(bold.join(" "), "several bold words that wrap");
    }

    #[test]
    fn test_blank_lines_have_no_spans() {
        let view = view("# A\n\ntext");
        let lines = view.layout(80);
        assert_eq!(lines[1].kind, LineKind::Blank);
        assert!(lines[1].spans.is_empty());
    }
}
