//! Capabilities borrowed from the surrounding system.
//!
//! Speech, clipboard, printing and preference storage are reached through
//! small traits so the session and the UI can be driven by fakes in tests.

mod ambient;
mod clipboard;
mod prefs;
mod print;
mod speech;

use thiserror::Error;

pub use ambient::{detect_ambient_theme, parse_osc11_reply, theme_from_rgb};
pub use clipboard::{SystemClipboard, osc52_sequence};
pub use prefs::{JsonPrefs, PrefsStore};
pub use print::BrowserPrinter;
pub use speech::CommandSpeech;

use crate::config::Theme;

#[derive(Debug, Error)]
pub enum HostError {
    #[error("clipboard write failed: {0}")]
    ClipboardWriteFailure(String),
    #[error("speech unavailable: {0}")]
    Speech(String),
    #[error("print failed: {0}")]
    Print(String),
    #[error("preferences: {0}")]
    Prefs(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Text-to-speech with a single active utterance.
pub trait SpeechSynth {
    /// Start speaking `text`, cancelling anything already playing.
    ///
    /// # Errors
    /// Returns [`HostError::Speech`] when no speech backend can be started.
    fn speak(&mut self, text: &str) -> Result<(), HostError>;

    /// Stop the current utterance. Does nothing when idle.
    fn cancel(&mut self);

    fn is_speaking(&mut self) -> bool;
}

/// Clipboard writes.
pub trait ClipboardSink {
    /// Place HTML together with its plain-text alternative.
    ///
    /// # Errors
    /// Returns [`HostError::ClipboardWriteFailure`] if the dual write is refused.
    fn write_dual(&mut self, html: &str, text: &str) -> Result<(), HostError>;

    /// # Errors
    /// Returns [`HostError::ClipboardWriteFailure`] if nothing could be written.
    fn write_text(&mut self, text: &str) -> Result<(), HostError>;
}

/// Hands a finished HTML page to something that can print it.
pub trait Printer {
    /// # Errors
    /// Returns [`HostError::Print`] when the page cannot be handed off.
    fn print_page(&mut self, title: &str, page_html: &str) -> Result<(), HostError>;
}

/// The set of host capabilities the app runs with.
pub struct Host {
    pub speech: Box<dyn SpeechSynth>,
    pub clipboard: Box<dyn ClipboardSink>,
    pub printer: Box<dyn Printer>,
    pub prefs: Box<dyn PrefsStore>,
}

impl Host {
    /// Capabilities backed by the real system.
    pub fn native() -> Self {
        Self {
            speech: Box::new(CommandSpeech::new()),
            clipboard: Box::new(SystemClipboard::new()),
            printer: Box::new(BrowserPrinter::new()),
            prefs: Box::new(JsonPrefs::new(crate::config::prefs_path())),
        }
    }

    /// Persist the theme choice.
    ///
    /// # Errors
    /// Returns the store's error; the caller decides how to tell the user.
    pub fn store_theme(&mut self, theme: Theme) -> Result<(), HostError> {
        match self.prefs.store_theme(theme) {
            Ok(()) => {
                tracing::debug!(theme = theme.as_str(), "theme stored");
                Ok(())
            }
            Err(err) => {
                tracing::warn!(error = %err, "failed to store theme");
                Err(err)
            }
        }
    }
}

/// Open a URL or file with the platform's default handler.
///
/// # Errors
/// Returns an I/O error if the opener cannot be launched.
pub fn open_external(target: &str) -> std::io::Result<()> {
    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("open")
            .arg(target)
            .spawn()?
            .wait()?;
        Ok(())
    }
    #[cfg(target_os = "windows")]
    {
        use std::process::Stdio;
        std::process::Command::new("cmd")
            .args(["/C", "start", "", target])
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;
        return Ok(());
    }
    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    {
        use std::process::Stdio;
        std::process::Command::new("xdg-open")
            .arg(target)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?
            .wait()?;
        Ok(())
    }
}
