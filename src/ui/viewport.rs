//! Scroll state over a list of display lines.
//!
//! Used by the full-screen preview and by [`super::EmbeddedViewer`], which
//! owns its own instance.

use std::ops::Range;

/// Manages the visible portion of a document.
///
/// # Example
///
/// ```
/// use inkview::ui::viewport::Viewport;
///
/// let mut vp = Viewport::new(80, 20, 50);
/// vp.page_down();
/// assert_eq!(vp.visible_range(), 20..40);
/// vp.go_to_bottom();
/// assert_eq!(vp.visible_range(), 30..50);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Viewport {
    width: u16,
    height: u16,
    offset: usize,
    total_lines: usize,
}

impl Viewport {
    /// `height` is the number of document rows, excluding any status bar.
    pub const fn new(width: u16, height: u16, total_lines: usize) -> Self {
        Self {
            width,
            height,
            offset: 0,
            total_lines,
        }
    }

    /// Current scroll offset in lines.
    pub const fn offset(&self) -> usize {
        self.offset
    }

    /// Viewport width in columns.
    pub const fn width(&self) -> u16 {
        self.width
    }

    /// Number of document rows on screen.
    pub const fn height(&self) -> u16 {
        self.height
    }

    /// Total lines in the document.
    pub const fn total_lines(&self) -> usize {
        self.total_lines
    }

    /// Lines currently on screen, clamped to the document.
    pub fn visible_range(&self) -> Range<usize> {
        let start = self.offset.min(self.total_lines);
        let end = (self.offset + self.height as usize).min(self.total_lines);
        start..end
    }

    /// How far through the document the view is, 0-100. A document that
    /// fits on screen is fully read.
    pub fn scroll_percent(&self) -> u8 {
        let max_offset = self.max_offset();
        if max_offset == 0 {
            return 100;
        }
        let percent = (self.offset * 100 + max_offset / 2) / max_offset;
        u8::try_from(percent.min(100)).unwrap_or(100)
    }

    /// Whether the view is below the top.
    pub const fn can_scroll_up(&self) -> bool {
        self.offset > 0
    }

    /// Whether more lines are below the view.
    pub const fn can_scroll_down(&self) -> bool {
        self.offset < self.max_offset()
    }

    /// Scroll up by `n` lines.
    pub const fn scroll_up(&mut self, n: usize) {
        self.offset = self.offset.saturating_sub(n);
    }

    /// Scroll down by `n` lines, stopping at the last page.
    pub fn scroll_down(&mut self, n: usize) {
        self.offset = (self.offset + n).min(self.max_offset());
    }

    /// Scroll up one page.
    pub const fn page_up(&mut self) {
        self.scroll_up(self.height as usize);
    }

    /// Scroll down one page.
    pub fn page_down(&mut self) {
        self.scroll_down(self.height as usize);
    }

    /// Scroll up half a page.
    pub const fn half_page_up(&mut self) {
        self.scroll_up(self.height as usize / 2);
    }

    /// Scroll down half a page.
    pub fn half_page_down(&mut self) {
        self.scroll_down(self.height as usize / 2);
    }

    /// Go to the beginning of the document.
    pub const fn go_to_top(&mut self) {
        self.offset = 0;
    }

    /// Go to the end of the document.
    pub const fn go_to_bottom(&mut self) {
        self.offset = self.max_offset();
    }

    /// Put `line` at the top of the viewport, or as close as the document
    /// length allows.
    pub fn go_to_line(&mut self, line: usize) {
        self.offset = line.min(self.max_offset());
    }

    /// Change the viewport size, keeping the offset in range.
    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        self.offset = self.offset.min(self.max_offset());
    }

    /// Update the line count after a reflow or a new document.
    pub fn set_total_lines(&mut self, total: usize) {
        self.total_lines = total;
        self.offset = self.offset.min(self.max_offset());
    }

    const fn max_offset(&self) -> usize {
        self.total_lines.saturating_sub(self.height as usize)
    }
}
