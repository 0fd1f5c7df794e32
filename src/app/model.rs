use std::time::{Duration, Instant};

use crate::acquire::{AcquireError, Outcome};
use crate::config::Theme;
use crate::document::{LinkRef, ViewLine, first_line_of_block};
use crate::session::Session;
use crate::ui::viewport::Viewport;

/// How long a toast stays on screen.
const TOAST_DURATION: Duration = Duration::from_secs(4);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
struct Toast {
    level: ToastLevel,
    message: String,
    expires_at: Instant,
}

/// A blocking message; everything else waits until it is dismissed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub title: String,
    pub body: String,
}

impl Notice {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
        }
    }

    /// Notice for a rejected acquisition; the document stays as it was.
    pub fn from_acquire_error(err: &AcquireError) -> Self {
        let title = match err {
            AcquireError::InvalidFileType { .. } => "Invalid file",
            AcquireError::TransportFailure { .. } | AcquireError::HttpFailure { .. } => {
                "Could not load URL"
            }
            AcquireError::Io { .. } => "Could not open file",
        };
        Self::new(title, err.notice())
    }
}

/// Which screen is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    /// No document: the source prompt.
    Upload,
    Preview,
}

/// The complete application state.
///
/// All state lives here; host capabilities and the acquisition worker are
/// owned by [`crate::app::App`] and touched only from the effects layer.
pub struct Model {
    pub session: Session,
    /// Scroll position over `lines`
    pub viewport: Viewport,
    /// Display lines of the current document at the current width
    pub lines: Vec<ViewLine>,
    /// Text typed into the source prompt
    pub input: String,
    /// Whether the source prompt is open on the preview screen
    pub prompt_open: bool,
    /// Label of the in-flight acquisition
    pub loading: Option<String>,
    /// Location to record once the in-flight acquisition loads
    pub pending_location: Option<String>,
    pub notice: Option<Notice>,
    pub help_visible: bool,
    /// Pending link picker items (`f`)
    pub link_picker_items: Vec<LinkRef>,
    toast: Option<Toast>,
    /// The background-graphics advice was shown this run
    pub print_advised: bool,
    /// The plain-text-only clipboard notice was shown this run
    pub plain_copy_advised: bool,
    pub should_quit: bool,
}

impl std::fmt::Debug for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Model")
            .field("document", &self.session.current().map(|d| d.name.as_str()))
            .field("theme", &self.session.theme())
            .field("loading", &self.loading)
            .field("notice", &self.notice)
            .finish_non_exhaustive()
    }
}

impl Model {
    /// Create a model for a terminal of the given size.
    pub fn new(theme: Theme, terminal_size: (u16, u16)) -> Self {
        Self {
            session: Session::new(theme),
            viewport: Viewport::new(
                terminal_size.0,
                terminal_size.1.saturating_sub(1),
                0,
            ),
            ..Self::default()
        }
    }

    /// Upload until a document is loaded, then Preview.
    pub const fn screen(&self) -> Screen {
        if self.session.current().is_some() {
            Screen::Preview
        } else {
            Screen::Upload
        }
    }

    /// Whether typed characters go to the source prompt.
    pub const fn prompt_active(&self) -> bool {
        matches!(self.screen(), Screen::Upload) || self.prompt_open
    }

    /// Recompute display lines for the current width and document.
    pub(super) fn reflow_layout(&mut self) {
        let width = crate::ui::document_content_width(self.viewport.width());
        self.lines = self
            .session
            .view()
            .map(|view| view.layout(width))
            .unwrap_or_default();
        self.viewport.set_total_lines(self.lines.len());
    }

    /// Fold a finished acquisition into the state.
    ///
    /// A rejection leaves the current document alone.
    pub(super) fn apply_outcome(&mut self, outcome: Outcome) {
        self.loading = None;
        let location = self.pending_location.take();
        match outcome {
            Outcome::Loaded(document) => {
                self.session.load(document);
                self.session.set_location(location);
                self.link_picker_items.clear();
                self.prompt_open = false;
                self.reflow_layout();
                self.viewport.go_to_top();
            }
            Outcome::Rejected(err) => {
                self.notice = Some(Notice::from_acquire_error(&err));
            }
        }
    }

    /// Forget the layout after the session was cleared.
    pub(super) fn after_close(&mut self) {
        self.link_picker_items.clear();
        self.prompt_open = false;
        self.input.clear();
        self.reflow_layout();
        self.viewport.go_to_top();
    }

    /// Scroll so the element with `id` is at the top.
    pub(super) fn scroll_to_anchor(&mut self, id: &str) -> bool {
        let Some(block) = self
            .session
            .view()
            .and_then(|view| view.anchor_block(id))
        else {
            return false;
        };
        let Some(line) = first_line_of_block(&self.lines, block) else {
            return false;
        };
        self.viewport.go_to_line(line);
        true
    }

    /// Links whose block has a line in the visible range, at most nine.
    pub fn visible_links(&self) -> Vec<LinkRef> {
        let Some(view) = self.session.view() else {
            return Vec::new();
        };
        let range = self.viewport.visible_range();
        let visible_lines = self.lines.get(range).unwrap_or_default();
        let mut links: Vec<LinkRef> = view
            .links()
            .iter()
            .filter(|link| visible_lines.iter().any(|line| line.block == link.block))
            .cloned()
            .collect();
        links.truncate(9);
        links
    }

    /// Terminal title: the deep-link location when there is one.
    pub fn window_title(&self) -> String {
        match (self.session.location(), self.session.current()) {
            (Some(location), _) => format!("inkview - {location}"),
            (None, Some(document)) => format!("inkview - {}", document.name),
            (None, None) => "inkview".to_string(),
        }
    }

    pub(super) fn show_toast(&mut self, level: ToastLevel, message: impl Into<String>) {
        self.toast = Some(Toast {
            level,
            message: message.into(),
            expires_at: Instant::now() + TOAST_DURATION,
        });
    }

    pub(super) fn expire_toast(&mut self, now: Instant) -> bool {
        if self
            .toast
            .as_ref()
            .is_some_and(|toast| toast.expires_at <= now)
        {
            self.toast = None;
            return true;
        }
        false
    }

    /// The current toast, if any, with its level.
    pub fn active_toast(&self) -> Option<(&str, ToastLevel)> {
        self.toast
            .as_ref()
            .map(|toast| (toast.message.as_str(), toast.level))
    }

    /// Whether the numbered link picker is open.
    pub const fn link_picker_active(&self) -> bool {
        !self.link_picker_items.is_empty()
    }
}

// Implement Default for Model to allow std::mem::take
impl Default for Model {
    fn default() -> Self {
        Self {
            session: Session::default(),
            viewport: Viewport::new(80, 23, 0),
            lines: Vec::new(),
            input: String::new(),
            prompt_open: false,
            loading: None,
            pending_location: None,
            notice: None,
            help_visible: false,
            link_picker_items: Vec::new(),
            toast: None,
            print_advised: false,
            plain_copy_advised: false,
            should_quit: false,
        }
    }
}
