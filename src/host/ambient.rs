//! Terminal background detection.

use std::time::Duration;

use crossterm::terminal::{disable_raw_mode, enable_raw_mode};

use crate::config::Theme;

// Query the terminal background using OSC 11.
// We talk to /dev/tty so the terminal responds even when stdout is piped.
// On non-Unix platforms the query is skipped: a blocked reader thread would
// keep the console input buffer and starve crossterm of key events.
#[cfg(not(unix))]
fn query_terminal_background() -> std::io::Result<Option<(u8, u8, u8)>> {
    Ok(None)
}

#[cfg(unix)]
fn query_terminal_background() -> std::io::Result<Option<(u8, u8, u8)>> {
    use std::io::{Read, Write};
    use std::sync::mpsc;

    let (tx, rx) = mpsc::channel();

    let mut io = std::fs::OpenOptions::new()
        .read(true)
        .write(true)
        .open("/dev/tty")?;
    let reader = io.try_clone()?;

    // ESC ] 11 ; ? BEL
    io.write_all(b"\x1b]11;?\x07")?;
    io.flush()?;

    std::thread::spawn(move || {
        let mut reader = reader;
        let mut buf = [0u8; 256];
        let mut collected: Vec<u8> = Vec::new();
        loop {
            match reader.read(&mut buf) {
                Ok(0) | Err(_) => break,
                Ok(n) => {
                    collected.extend_from_slice(&buf[..n]);
                    if collected.contains(&b'\x07') || collected.windows(2).any(|w| w == b"\x1b\\")
                    {
                        let _ = tx.send(collected);
                        break;
                    }
                }
            }
        }
    });

    let reply = rx.recv_timeout(Duration::from_millis(75)).unwrap_or_default();
    let text = String::from_utf8_lossy(&reply);
    Ok(parse_osc11_reply(&text))
}

/// Light for bright backgrounds (luma >= 140), dark otherwise.
pub fn theme_from_rgb(r: u8, g: u8, b: u8) -> Theme {
    // Rec. 709 weights scaled by 10_000.
    let luma = 2126 * u32::from(r) + 7152 * u32::from(g) + 722 * u32::from(b);
    if luma >= 140 * 10_000 {
        Theme::Light
    } else {
        Theme::Dark
    }
}

/// Ask the terminal for its background colour.
///
/// `None` when the terminal does not answer in time.
pub fn detect_ambient_theme() -> Option<Theme> {
    let _raw = enable_raw_mode();
    let result = query_terminal_background();
    let _ = disable_raw_mode();
    let theme = result
        .ok()
        .flatten()
        .map(|(r, g, b)| theme_from_rgb(r, g, b));
    tracing::debug!(?theme, "ambient colour scheme");
    theme
}

/// Parse `ESC ] 11 ; rgb:RRRR/GGGG/BBBB` terminated by BEL or ST.
pub fn parse_osc11_reply(reply: &str) -> Option<(u8, u8, u8)> {
    let start = reply.find("rgb:")?;
    let data = &reply[start + 4..];
    let mut parts = data.split(['/', '\x07', '\x1b']);
    let r = parts.next()?;
    let g = parts.next()?;
    let b = parts.next()?;
    Some((
        parse_osc_component(r)?,
        parse_osc_component(g)?,
        parse_osc_component(b)?,
    ))
}

fn parse_osc_component(s: &str) -> Option<u8> {
    let hex = s.trim();
    if hex.len() >= 4 {
        let v = u16::from_str_radix(hex.get(..4)?, 16).ok()?;
        u8::try_from(v >> 8).ok()
    } else if hex.len() == 2 {
        u8::from_str_radix(hex, 16).ok()
    } else {
        None
    }
}
