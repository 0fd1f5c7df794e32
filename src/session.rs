//! The document session: at most one loaded document and its rendering.
//!
//! The session also owns the per-document UI state that must be reset when
//! the document goes away (speech, copy feedback, deep-link location).

use std::time::{Duration, Instant};

use crate::config::Theme;
use crate::document::{Document, RenderedDocument, RenderedView, page};
use crate::host::{ClipboardSink, HostError, SpeechSynth};

/// How long the "copied" indicator stays up.
pub const COPY_FEEDBACK: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyOutcome {
    /// HTML and plain text were both placed on the clipboard.
    Rich,
    /// The rich write was refused; only plain text was copied.
    PlainOnly,
    NothingLoaded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeechToggle {
    Started,
    Stopped,
    NothingLoaded,
}

#[derive(Debug, Clone)]
pub struct Session {
    document: Option<Document>,
    rendered: Option<RenderedDocument>,
    theme: Theme,
    speaking: bool,
    copy_feedback_until: Option<Instant>,
    location: Option<String>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(Theme::Light)
    }
}

impl Session {
    pub const fn new(theme: Theme) -> Self {
        Self {
            document: None,
            rendered: None,
            theme,
            speaking: false,
            copy_feedback_until: None,
            location: None,
        }
    }

    /// Replace the current document and render it.
    pub fn load(&mut self, document: Document) {
        tracing::debug!(name = %document.name, bytes = document.content.len(), "session load");
        self.rendered = Some(RenderedDocument::from_markdown(&document.content));
        self.document = Some(document);
    }

    /// Drop the document and everything derived from it.
    pub fn clear(&mut self, speech: &mut dyn SpeechSynth) {
        speech.cancel();
        self.speaking = false;
        self.document = None;
        self.rendered = None;
        self.copy_feedback_until = None;
        self.location = None;
    }

    pub const fn current(&self) -> Option<&Document> {
        self.document.as_ref()
    }

    pub const fn rendered(&self) -> Option<&RenderedDocument> {
        self.rendered.as_ref()
    }

    pub fn rendered_html(&self) -> Option<&str> {
        self.rendered.as_ref().map(RenderedDocument::html)
    }

    /// Terminal view of the rendered document.
    pub fn view(&self) -> Option<&RenderedView> {
        self.rendered.as_ref().map(RenderedDocument::view)
    }

    pub const fn theme(&self) -> Theme {
        self.theme
    }

    pub const fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
    }

    pub const fn toggle_theme(&mut self) -> Theme {
        self.theme = self.theme.toggled();
        self.theme
    }

    pub const fn is_speaking(&self) -> bool {
        self.speaking
    }

    /// Start reading the document aloud, or stop if already reading.
    ///
    /// # Errors
    /// Returns the synthesizer's error when speech cannot start.
    pub fn toggle_speech(&mut self, speech: &mut dyn SpeechSynth) -> Result<SpeechToggle, HostError> {
        if self.speaking {
            speech.cancel();
            self.speaking = false;
            return Ok(SpeechToggle::Stopped);
        }
        let Some(rendered) = &self.rendered else {
            return Ok(SpeechToggle::NothingLoaded);
        };
        speech.speak(&rendered.plain_text())?;
        self.speaking = true;
        Ok(SpeechToggle::Started)
    }

    /// Stop any active reading.
    pub fn stop_speech(&mut self, speech: &mut dyn SpeechSynth) {
        if self.speaking {
            speech.cancel();
            self.speaking = false;
        }
    }

    /// Notice when the synthesizer finished on its own. Returns true if the
    /// speaking flag changed.
    pub fn sync_speech(&mut self, speech: &mut dyn SpeechSynth) -> bool {
        if self.speaking && !speech.is_speaking() {
            self.speaking = false;
            return true;
        }
        false
    }

    /// Copy the rendered document, rich first, plain text as a fallback.
    ///
    /// # Errors
    /// Returns the clipboard error when even the plain-text write fails.
    pub fn copy(
        &mut self,
        clipboard: &mut dyn ClipboardSink,
        now: Instant,
    ) -> Result<CopyOutcome, HostError> {
        let Some(rendered) = &self.rendered else {
            return Ok(CopyOutcome::NothingLoaded);
        };
        let text = rendered.plain_text();
        let outcome = match clipboard.write_dual(rendered.html(), &text) {
            Ok(()) => CopyOutcome::Rich,
            Err(err) => {
                tracing::warn!(error = %err, "rich clipboard write refused, copying plain text");
                clipboard.write_text(&text)?;
                CopyOutcome::PlainOnly
            }
        };
        self.copy_feedback_until = Some(now + COPY_FEEDBACK);
        Ok(outcome)
    }

    pub fn copy_feedback_active(&self, now: Instant) -> bool {
        self.copy_feedback_until.is_some_and(|until| now < until)
    }

    /// Clear an elapsed copy indicator. Returns true if it was cleared.
    pub fn expire_copy_feedback(&mut self, now: Instant) -> bool {
        if self.copy_feedback_until.is_some_and(|until| now >= until) {
            self.copy_feedback_until = None;
            return true;
        }
        false
    }

    /// The standalone page to print, titled after the document.
    pub fn print_page(&self) -> Option<(String, String)> {
        let document = self.document.as_ref()?;
        let rendered = self.rendered.as_ref()?;
        let page = page::standalone_page(&document.name, rendered.html(), self.theme, true);
        Some((document.name.clone(), page))
    }

    /// Deep-link location the current document was opened from.
    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    pub fn set_location(&mut self, location: Option<String>) {
        self.location = location;
    }
}
