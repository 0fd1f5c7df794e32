use std::time::Instant;

use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use crate::app::{Model, ToastLevel};

use super::style;

/// Text of the status bar.
pub fn status_text(model: &Model, now: Instant) -> String {
    let session = &model.session;
    let name = session
        .current()
        .map_or("untitled", |document| document.name.as_str());

    let percent = model.viewport.scroll_percent();
    let line_info = format!(
        "Line {}/{}",
        model.viewport.offset() + 1,
        model.viewport.total_lines()
    );

    let mut parts = vec![
        format!(" {name}"),
        format!("[{percent}%]"),
        line_info,
    ];
    if let Some(label) = &model.loading {
        parts.push(format!("Loading {label}..."));
    }
    if session.is_speaking() {
        parts.push("[speaking]".to_string());
    }
    if session.copy_feedback_active(now) {
        parts.push("Copied!".to_string());
    }
    parts.push(session.theme().as_str().to_string());
    parts.push("?:help".to_string());
    parts.join("  ")
}

pub fn render_status_bar(model: &Model, frame: &mut Frame, area: Rect, now: Instant) {
    let status_bar = Paragraph::new(status_text(model, now))
        .style(style::status_style(model.session.theme()));
    frame.render_widget(status_bar, area);
}

pub fn render_toast_bar(model: &Model, frame: &mut Frame, area: Rect) {
    let Some((message, level)) = model.active_toast() else {
        return;
    };
    let (prefix, style) = match level {
        ToastLevel::Info => ("[info]", style::status_style(model.session.theme())),
        ToastLevel::Warning => (
            "[warn]",
            Style::default().bg(Color::Yellow).fg(Color::Black),
        ),
        ToastLevel::Error => ("[error]", Style::default().bg(Color::Red).fg(Color::White)),
    };
    let toast = Paragraph::new(format!("{prefix} {message}")).style(style);
    frame.render_widget(toast, area);
}
