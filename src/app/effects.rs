use std::time::Instant;

use url::Url;

use crate::acquire::{AcquireState, AcquisitionRequest, FileSource, Outcome};
use crate::app::{App, Message, Model, Notice, ToastLevel};
use crate::session::{CopyOutcome, SpeechToggle};

const PRINT_ADVICE: &str = "The page opens in your browser with the print dialog.\n\n\
     To keep the theme colours in the PDF, enable \"Background graphics\" in the \
     print dialog's options.";

const PLAIN_COPY_ADVICE: &str = "The clipboard refused formatted HTML, so only plain \
     text was copied. Pasting into a rich editor will lose formatting.";

impl App {
    pub(super) fn handle_message_side_effects(&mut self, model: &mut Model, msg: &Message) {
        match msg {
            Message::Submit(input) => {
                if let Some(request) = AcquisitionRequest::from_input(input) {
                    self.start_acquisition(model, request);
                }
            }
            Message::DropFiles(paths) => {
                let files = paths.iter().map(FileSource::from_path).collect();
                self.start_acquisition(model, AcquisitionRequest::DroppedFiles(files));
            }
            Message::Acquired(Outcome::Loaded(document)) => {
                model.session.stop_speech(self.host.speech.as_mut());
                model.show_toast(ToastLevel::Info, format!("Loaded {}", document.name));
            }
            Message::ToggleSpeech => self.toggle_speech(model),
            Message::Copy => self.copy_document(model),
            Message::Print => self.print_document(model),
            Message::ToggleTheme => {
                let theme = model.session.theme();
                match self.host.store_theme(theme) {
                    Ok(()) => {
                        model.show_toast(ToastLevel::Info, format!("Theme: {}", theme.as_str()));
                    }
                    Err(err) => model.show_toast(
                        ToastLevel::Warning,
                        format!("Theme: {} (not saved: {err})", theme.as_str()),
                    ),
                }
            }
            Message::CloseDocument => {
                if model.session.current().is_some() {
                    model.session.clear(self.host.speech.as_mut());
                    model.after_close();
                    model.show_toast(ToastLevel::Info, "Document closed");
                }
            }
            Message::OpenVisibleLinks => {
                Self::open_visible_links(model);
            }
            Message::SelectVisibleLink(index) => {
                Self::follow_link_picker_index(model, *index);
            }
            Message::Quit => {
                model.session.stop_speech(self.host.speech.as_mut());
            }
            _ => {}
        }
    }

    /// Validate a request and hand it to the worker.
    pub(super) fn start_acquisition(&mut self, model: &mut Model, request: AcquisitionRequest) {
        let location = match &request {
            AcquisitionRequest::RemoteUrl(url) => Some(url.trim().to_string()),
            AcquisitionRequest::LocalFile(_) | AcquisitionRequest::DroppedFiles(_) => None,
        };
        match self.acquirer.begin(request) {
            Ok(Some(_)) => {
                if let AcquireState::Validating { label, .. } = self.acquirer.state() {
                    model.loading = Some(label.clone());
                }
                model.pending_location = location;
                model.prompt_open = false;
            }
            Ok(None) => {}
            Err(err) => model.notice = Some(Notice::from_acquire_error(&err)),
        }
    }

    /// Collect results from background work. Returns messages to feed
    /// through `update`.
    pub(super) fn poll_background(&mut self, model: &mut Model) -> Vec<Message> {
        let mut messages = Vec::new();
        if let Some(outcome) = self.acquirer.poll() {
            messages.push(Message::Acquired(outcome));
        }
        if model.session.sync_speech(self.host.speech.as_mut()) {
            messages.push(Message::SpeechEnded);
        }
        messages
    }

    fn toggle_speech(&mut self, model: &mut Model) {
        match model.session.toggle_speech(self.host.speech.as_mut()) {
            Ok(SpeechToggle::Started) => {
                model.show_toast(ToastLevel::Info, "Reading aloud (s to stop)");
            }
            Ok(SpeechToggle::Stopped) => model.show_toast(ToastLevel::Info, "Speech stopped"),
            Ok(SpeechToggle::NothingLoaded) => {}
            Err(err) => {
                tracing::warn!(error = %err, "speech failed");
                model.notice = Some(Notice::new("Speech unavailable", err.to_string()));
            }
        }
    }

    fn copy_document(&mut self, model: &mut Model) {
        match model
            .session
            .copy(self.host.clipboard.as_mut(), Instant::now())
        {
            Ok(CopyOutcome::Rich) => model.show_toast(ToastLevel::Info, "Copied"),
            Ok(CopyOutcome::PlainOnly) => {
                model.show_toast(ToastLevel::Warning, "Copied as plain text");
                if !model.plain_copy_advised {
                    model.plain_copy_advised = true;
                    model.notice = Some(Notice::new("Plain text only", PLAIN_COPY_ADVICE));
                }
            }
            Ok(CopyOutcome::NothingLoaded) => {}
            Err(err) => {
                model.notice = Some(Notice::new("Copy failed", err.to_string()));
            }
        }
    }

    fn print_document(&mut self, model: &mut Model) {
        let Some((title, page)) = model.session.print_page() else {
            return;
        };
        match self.host.printer.print_page(&title, &page) {
            Ok(()) => {
                model.show_toast(ToastLevel::Info, "Opened print view");
                if !model.print_advised {
                    model.print_advised = true;
                    model.notice = Some(Notice::new("Print to PDF", PRINT_ADVICE));
                }
            }
            Err(err) => {
                tracing::warn!(error = %err, "print failed");
                model.notice = Some(Notice::new("Print failed", err.to_string()));
            }
        }
    }

    fn open_visible_links(model: &mut Model) {
        let visible = model.visible_links();
        match visible.as_slice() {
            [] => model.show_toast(ToastLevel::Info, "No visible links"),
            [single] => {
                let href = single.href.clone();
                Self::follow_link(model, &href);
            }
            _ => {
                model.link_picker_items = visible;
                model.show_toast(ToastLevel::Info, "Select link: 1-9 (Esc to cancel)");
            }
        }
    }

    fn follow_link_picker_index(model: &mut Model, index: u8) {
        if index == 0 {
            return;
        }
        let idx = usize::from(index - 1);
        let Some(link) = model.link_picker_items.get(idx) else {
            return;
        };
        let href = link.href.clone();
        model.link_picker_items.clear();
        Self::follow_link(model, &href);
    }

    fn follow_link(model: &mut Model, href: &str) {
        if let Some(anchor) = href.strip_prefix('#') {
            if model.scroll_to_anchor(anchor) {
                model.show_toast(ToastLevel::Info, format!("Jumped to #{anchor}"));
            } else {
                model.show_toast(ToastLevel::Warning, format!("Anchor #{anchor} not found"));
            }
            return;
        }

        let target = resolve_link(model.session.location(), href);
        match crate::host::open_external(&target) {
            Ok(()) => model.show_toast(ToastLevel::Info, format!("Opened {target}")),
            Err(err) => model.show_toast(ToastLevel::Error, format!("Open failed: {err}")),
        }
    }
}

/// Resolve a relative link against the document's location, when the
/// document came from a URL.
pub(super) fn resolve_link(location: Option<&str>, href: &str) -> String {
    if Url::parse(href).is_ok() {
        return href.to_string();
    }
    location
        .and_then(|base| Url::parse(base).ok())
        .and_then(|base| base.join(href).ok())
        .map_or_else(|| href.to_string(), String::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_link_against_remote_location() {
        assert_eq!(
            resolve_link(Some("https://example.com/docs/guide.md"), "setup.md"),
            "https://example.com/docs/setup.md"
        );
        assert_eq!(
            resolve_link(Some("https://example.com/docs/guide.md"), "https://other.org/x"),
            "https://other.org/x"
        );
    }

    #[test]
    fn test_resolve_link_without_location_is_unchanged() {
        assert_eq!(resolve_link(None, "setup.md"), "setup.md");
        assert_eq!(resolve_link(Some("not a url"), "setup.md"), "setup.md");
    }
}
