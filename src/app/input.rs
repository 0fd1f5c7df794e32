use std::path::PathBuf;

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEvent, MouseEventKind};
use url::Url;

use crate::acquire::looks_like_url;
use crate::app::{App, Message, Model, Screen};

use super::event_loop::ResizeDebouncer;

impl App {
    pub(super) fn handle_event(
        event: &Event,
        model: &Model,
        now_ms: u64,
        resize_debouncer: &mut ResizeDebouncer,
    ) -> Option<Message> {
        match event {
            Event::Key(key) if key.kind != KeyEventKind::Release => Self::handle_key(*key, model),
            Event::Paste(text) => Self::handle_paste(text, model),
            Event::Mouse(mouse) => Self::handle_mouse(*mouse, model),
            Event::Resize(w, h) => {
                tracing::trace!(width = w, height = h, "resize queued");
                resize_debouncer.queue(*w, *h, now_ms);
                None
            }
            _ => None,
        }
    }

    /// Dropping files on a terminal pastes their paths; URLs go to the prompt.
    pub(super) fn handle_paste(text: &str, model: &Model) -> Option<Message> {
        if model.notice.is_some() {
            return None;
        }
        if looks_like_url(text) {
            let url = text.trim();
            if model.prompt_active() {
                return Some(Message::PromptInput(format!("{}{url}", model.input)));
            }
            return Some(Message::Submit(url.to_string()));
        }
        Some(Message::DropFiles(parse_dropped_paths(text)))
    }

    pub(super) fn handle_mouse(mouse: MouseEvent, model: &Model) -> Option<Message> {
        if model.notice.is_some() || model.help_visible || model.screen() == Screen::Upload {
            return None;
        }
        match mouse.kind {
            MouseEventKind::ScrollDown if model.viewport.can_scroll_down() => {
                Some(Message::ScrollDown(3))
            }
            MouseEventKind::ScrollUp if model.viewport.can_scroll_up() => {
                Some(Message::ScrollUp(3))
            }
            _ => None,
        }
    }

    pub(super) fn handle_key(key: KeyEvent, model: &Model) -> Option<Message> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        if ctrl && matches!(key.code, KeyCode::Char('c' | 'q')) {
            return Some(Message::Quit);
        }

        if model.notice.is_some() {
            return match key.code {
                KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ') => Some(Message::DismissNotice),
                _ => None,
            };
        }

        if model.help_visible {
            return Some(Message::HideHelp);
        }

        if model.link_picker_active() {
            return match key.code {
                KeyCode::Char(c @ '1'..='9') => {
                    c.to_digit(10).and_then(|d| u8::try_from(d).ok()).map(Message::SelectVisibleLink)
                }
                _ => Some(Message::CancelVisibleLinkPicker),
            };
        }

        if model.prompt_active() {
            return Self::handle_prompt_key(key, model);
        }

        match key.code {
            // Navigation
            KeyCode::Char('j') | KeyCode::Down => {
                model.viewport.can_scroll_down().then_some(Message::ScrollDown(1))
            }
            KeyCode::Char('k') | KeyCode::Up => {
                model.viewport.can_scroll_up().then_some(Message::ScrollUp(1))
            }
            KeyCode::Char('d') if ctrl => {
                model.viewport.can_scroll_down().then_some(Message::HalfPageDown)
            }
            KeyCode::Char('u') if ctrl => {
                model.viewport.can_scroll_up().then_some(Message::HalfPageUp)
            }
            KeyCode::Char(' ') | KeyCode::PageDown => {
                model.viewport.can_scroll_down().then_some(Message::PageDown)
            }
            KeyCode::Char('b') | KeyCode::PageUp => {
                model.viewport.can_scroll_up().then_some(Message::PageUp)
            }
            KeyCode::Char('g') | KeyCode::Home => Some(Message::GoToTop),
            KeyCode::Char('G') | KeyCode::End => Some(Message::GoToBottom),

            // Document
            KeyCode::Char('f') => Some(Message::OpenVisibleLinks),
            KeyCode::Char('s') => Some(Message::ToggleSpeech),
            KeyCode::Char('c') => Some(Message::Copy),
            KeyCode::Char('p') => Some(Message::Print),
            KeyCode::Char('t') => Some(Message::ToggleTheme),
            KeyCode::Char('x') => Some(Message::CloseDocument),
            KeyCode::Char('o') => Some(Message::OpenPrompt),
            KeyCode::Char('?') | KeyCode::F(1) => Some(Message::ToggleHelp),

            KeyCode::Char('q') => Some(Message::Quit),
            _ => None,
        }
    }

    fn handle_prompt_key(key: KeyEvent, model: &Model) -> Option<Message> {
        let upload = model.screen() == Screen::Upload;
        match key.code {
            KeyCode::Enter => {
                let input = model.input.trim();
                (!input.is_empty()).then(|| Message::Submit(input.to_string()))
            }
            KeyCode::Esc if upload && model.input.is_empty() => Some(Message::Quit),
            KeyCode::Esc => Some(Message::CancelPrompt),
            KeyCode::Backspace => {
                let mut next = model.input.clone();
                next.pop();
                Some(Message::PromptInput(next))
            }
            KeyCode::Char('t') if upload && key.modifiers.contains(KeyModifiers::CONTROL) => {
                Some(Message::ToggleTheme)
            }
            KeyCode::F(1) => Some(Message::ToggleHelp),
            KeyCode::Char(c)
                if !key.modifiers.contains(KeyModifiers::CONTROL)
                    && !key.modifiers.contains(KeyModifiers::ALT) =>
            {
                let mut next = model.input.clone();
                next.push(c);
                Some(Message::PromptInput(next))
            }
            _ => None,
        }
    }
}

/// Characters a shell escapes with a backslash when a file is dropped.
const SHELL_ESCAPED: &[char] = &[
    '\'', '"', '(', ')', '[', ']', '{', '}', '&', ';', '|', '<', '>', '$', '!', '*', '?', '#',
    '~', '`',
];

/// Paths from a bracketed paste produced by dropping files on the terminal.
///
/// Terminals paste dropped files as shell-quoted paths or `file://` URLs,
/// separated by whitespace or newlines. A backslash only escapes whitespace,
/// quotes and shell metacharacters, so Windows paths keep their separators.
pub(super) fn parse_dropped_paths(pasted: &str) -> Vec<PathBuf> {
    let mut paths = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;
    let mut chars = pasted.trim().chars().peekable();
    while let Some(c) = chars.next() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), c) => current.push(c),
            (None, '\'' | '"') => quote = Some(c),
            (None, '\\') => match chars.next_if(|&next| {
                next.is_whitespace() || SHELL_ESCAPED.contains(&next)
            }) {
                Some(escaped) => current.push(escaped),
                None => current.push('\\'),
            },
            (None, c) if c.is_whitespace() => flush_token(&mut current, &mut paths),
            (None, c) => current.push(c),
        }
    }
    flush_token(&mut current, &mut paths);
    paths
}

fn flush_token(token: &mut String, paths: &mut Vec<PathBuf>) {
    if !token.is_empty() {
        paths.push(path_from_token(token));
        token.clear();
    }
}

fn path_from_token(token: &str) -> PathBuf {
    if token.starts_with("file://")
        && let Ok(url) = Url::parse(token)
        && let Ok(path) = url.to_file_path()
    {
        return path;
    }
    PathBuf::from(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_dropped_paths_plain_and_escaped() {
        assert_eq!(
            parse_dropped_paths("/tmp/a.md /tmp/my\\ notes.md\n"),
            vec![PathBuf::from("/tmp/a.md"), PathBuf::from("/tmp/my notes.md")]
        );
    }

    #[test]
    fn test_parse_dropped_paths_quoted() {
        assert_eq!(
            parse_dropped_paths("'/tmp/my notes.md' \"/tmp/b c.markdown\""),
            vec![
                PathBuf::from("/tmp/my notes.md"),
                PathBuf::from("/tmp/b c.markdown")
            ]
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_parse_dropped_paths_file_urls() {
        assert_eq!(
            parse_dropped_paths("file:///tmp/my%20notes.md"),
            vec![PathBuf::from("/tmp/my notes.md")]
        );
    }

    #[test]
    fn test_parse_dropped_paths_windows_separators() {
        assert_eq!(
            parse_dropped_paths(r"C:\Users\me\notes.md"),
            vec![PathBuf::from(r"C:\Users\me\notes.md")]
        );
        assert_eq!(
            parse_dropped_paths(r#""C:\Users\me\my notes.md" \\server\share\b.md"#),
            vec![
                PathBuf::from(r"C:\Users\me\my notes.md"),
                PathBuf::from(r"\\server\share\b.md"),
            ]
        );
    }

    #[test]
    fn test_parse_dropped_paths_escaped_metacharacters() {
        assert_eq!(
            parse_dropped_paths(r"/tmp/draft\ \(1\).md"),
            vec![PathBuf::from("/tmp/draft (1).md")]
        );
    }

    #[test]
    fn test_parse_dropped_paths_empty() {
        assert!(parse_dropped_paths("  \n").is_empty());
    }
}
