//! A self-contained markdown pane for embedding in another ratatui app.
//!
//! [`EmbeddedViewer`] takes one input, the document URL, and renders into
//! whatever [`Rect`] the host gives it. It fetches in the background, keeps
//! its own session and scroll offset, and never touches the terminal itself.
//!
//! ```no_run
//! use inkview::ui::EmbeddedViewer;
//! # fn draw(frame: &mut ratatui::Frame, viewer: &mut EmbeddedViewer) {
//! frame.render_widget(viewer, frame.area());
//! # }
//! let viewer = EmbeddedViewer::new("https://example.com/README.md");
//! ```

use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Padding, Paragraph, Wrap};

use crate::acquire::{AcquireError, Acquirer, AcquisitionRequest, Fetcher, HttpFetcher, Outcome};
use crate::config::Theme;
use crate::document::{Document, ViewLine};
use crate::session::Session;

use super::render::{document_content_width, styled_lines};
use super::viewport::Viewport;
use super::{DOCUMENT_LEFT_PADDING, style};

pub struct EmbeddedViewer {
    url: String,
    acquirer: Acquirer,
    session: Session,
    viewport: Viewport,
    lines: Vec<ViewLine>,
    laid_out_width: Option<u16>,
    error: Option<AcquireError>,
}

impl EmbeddedViewer {
    /// Start fetching `url` (GitHub blob links are read from the raw host).
    pub fn new(url: impl Into<String>) -> Self {
        Self::with_fetcher(url, Arc::new(HttpFetcher::new()))
    }

    /// Like [`EmbeddedViewer::new`] with a caller-supplied transport.
    pub fn with_fetcher(url: impl Into<String>, fetcher: Arc<dyn Fetcher>) -> Self {
        let url = url.into();
        let mut acquirer = Acquirer::new(fetcher);
        let error = acquirer
            .begin(AcquisitionRequest::RemoteUrl(url.clone()))
            .err();
        Self {
            url,
            acquirer,
            session: Session::default(),
            viewport: Viewport::new(0, 0, 0),
            lines: Vec::new(),
            laid_out_width: None,
            error,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub const fn is_loading(&self) -> bool {
        self.acquirer.is_loading()
    }

    pub const fn document(&self) -> Option<&Document> {
        self.session.current()
    }

    pub const fn error(&self) -> Option<&AcquireError> {
        self.error.as_ref()
    }

    pub const fn theme(&self) -> Theme {
        self.session.theme()
    }

    pub const fn set_theme(&mut self, theme: Theme) {
        self.session.set_theme(theme);
    }

    pub const fn offset(&self) -> usize {
        self.viewport.offset()
    }

    /// Take a finished fetch, if any. Returns true when the pane changed.
    pub fn poll(&mut self) -> bool {
        self.acquirer
            .poll()
            .is_some_and(|outcome| self.apply(outcome))
    }

    /// Block until the fetch finishes or `timeout` passes.
    pub fn wait(&mut self, timeout: Duration) -> bool {
        self.acquirer
            .wait(timeout)
            .is_some_and(|outcome| self.apply(outcome))
    }

    fn apply(&mut self, outcome: Outcome) -> bool {
        match outcome {
            Outcome::Loaded(document) => {
                self.session.load(document);
                self.session.set_location(Some(self.url.clone()));
                self.error = None;
                self.laid_out_width = None;
                self.viewport.go_to_top();
            }
            Outcome::Rejected(err) => self.error = Some(err),
        }
        true
    }

    pub fn scroll_down(&mut self, n: usize) {
        self.viewport.scroll_down(n);
    }

    pub const fn scroll_up(&mut self, n: usize) {
        self.viewport.scroll_up(n);
    }

    /// Apply a scroll key forwarded by the host. Returns false for keys the
    /// pane does not use.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => self.viewport.scroll_down(1),
            KeyCode::Char('k') | KeyCode::Up => self.viewport.scroll_up(1),
            KeyCode::PageDown | KeyCode::Char(' ') => self.viewport.page_down(),
            KeyCode::PageUp | KeyCode::Char('b') => self.viewport.page_up(),
            KeyCode::Home | KeyCode::Char('g') => self.viewport.go_to_top(),
            KeyCode::End | KeyCode::Char('G') => self.viewport.go_to_bottom(),
            _ => return false,
        }
        true
    }

    /// Fit the layout and scroll range to `area`.
    fn fit(&mut self, area: Rect) {
        let width = document_content_width(area.width);
        if self.laid_out_width != Some(width) {
            self.lines = self
                .session
                .rendered()
                .map(|rendered| rendered.view().layout(width))
                .unwrap_or_default();
            self.laid_out_width = Some(width);
        }
        self.viewport.resize(area.width, area.height);
        self.viewport.set_total_lines(self.lines.len());
    }
}

impl std::fmt::Debug for EmbeddedViewer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmbeddedViewer")
            .field("url", &self.url)
            .field("loading", &self.is_loading())
            .field("error", &self.error)
            .field("offset", &self.viewport.offset())
            .finish_non_exhaustive()
    }
}

impl Widget for &mut EmbeddedViewer {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.poll();
        self.fit(area);
        let theme = self.session.theme();
        let block = Block::default()
            .padding(Padding::left(DOCUMENT_LEFT_PADDING))
            .style(style::base_style(theme));

        let paragraph = if let Some(err) = &self.error {
            let lines: Vec<Line> = err.notice().lines().map(|l| Line::raw(l.to_string())).collect();
            Paragraph::new(lines).wrap(Wrap { trim: false })
        } else if self.acquirer.is_loading() {
            Paragraph::new(Line::styled("Loading...", style::accent_style(theme)))
        } else {
            let visible = self.lines.get(self.viewport.visible_range()).unwrap_or_default();
            Paragraph::new(styled_lines(visible, theme))
        };
        paragraph.block(block).render(area, buf);
    }
}
