use std::io::{Write, stdout};

use base64::Engine;

use super::{ClipboardSink, HostError};

/// The system clipboard, with an OSC 52 fallback for plain text.
///
/// The arboard handle is created on first use; on headless systems it may
/// never exist, in which case only the escape-sequence path remains.
#[derive(Default)]
pub struct SystemClipboard {
    inner: Option<arboard::Clipboard>,
}

impl SystemClipboard {
    pub const fn new() -> Self {
        Self { inner: None }
    }

    fn handle(&mut self) -> Result<&mut arboard::Clipboard, HostError> {
        if self.inner.is_none() {
            let clipboard = arboard::Clipboard::new()
                .map_err(|err| HostError::ClipboardWriteFailure(err.to_string()))?;
            self.inner = Some(clipboard);
        }
        self.inner
            .as_mut()
            .ok_or_else(|| HostError::ClipboardWriteFailure("clipboard unavailable".to_string()))
    }
}

impl ClipboardSink for SystemClipboard {
    fn write_dual(&mut self, html: &str, text: &str) -> Result<(), HostError> {
        self.handle()?
            .set_html(html, Some(text))
            .map_err(|err| HostError::ClipboardWriteFailure(err.to_string()))
    }

    fn write_text(&mut self, text: &str) -> Result<(), HostError> {
        match self.handle().and_then(|clipboard| {
            clipboard
                .set_text(text)
                .map_err(|err| HostError::ClipboardWriteFailure(err.to_string()))
        }) {
            Ok(()) => Ok(()),
            Err(err) => {
                tracing::debug!(error = %err, "arboard text write failed, using OSC 52");
                copy_to_clipboard_osc52(text)
                    .map_err(|err| HostError::ClipboardWriteFailure(err.to_string()))
            }
        }
    }
}

fn copy_to_clipboard_osc52(text: &str) -> std::io::Result<()> {
    let osc = osc52_sequence(text);
    let mut out = stdout();
    out.write_all(osc.as_bytes())?;
    out.flush()
}

/// Terminal escape that asks the terminal to set its clipboard.
pub fn osc52_sequence(text: &str) -> String {
    let encoded = base64::engine::general_purpose::STANDARD.encode(text.as_bytes());
    format!("\x1b]52;c;{encoded}\x07")
}

#[cfg(test)]
mod tests {
    use super::osc52_sequence;

    #[test]
    fn test_osc52_sequence_encodes_text() {
        assert_eq!(osc52_sequence("hi"), "\x1b]52;c;aGk=\x07");
    }

    #[test]
    fn test_osc52_sequence_encodes_utf8() {
        assert_eq!(osc52_sequence("é"), "\x1b]52;c;w6k=\x07");
    }
}
