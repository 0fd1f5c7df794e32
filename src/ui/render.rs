use std::time::Instant;

use ratatui::prelude::*;
use ratatui::widgets::{Block, Clear, Padding, Paragraph, Wrap};

use crate::app::{Model, Screen};
use crate::config::Theme;
use crate::document::ViewLine;

use super::{DOCUMENT_LEFT_PADDING, overlays, status, style};

/// Columns available to document text in a pane of `total_width`.
pub fn document_content_width(total_width: u16) -> u16 {
    total_width.saturating_sub(DOCUMENT_LEFT_PADDING).max(1)
}

/// Render the complete UI.
pub fn render(model: &Model, frame: &mut Frame) {
    let area = frame.area();
    let theme = model.session.theme();
    frame.render_widget(Clear, area);
    frame.render_widget(Block::default().style(style::base_style(theme)), area);

    match model.screen() {
        Screen::Upload => render_upload(model, frame, area),
        Screen::Preview => render_preview(model, frame, area),
    }

    // A notice blocks everything, so it is drawn last and on top.
    if let Some(notice) = &model.notice {
        overlays::render_notice_overlay(notice, theme, frame, area);
    } else if model.help_visible {
        overlays::render_help_overlay(theme, frame, area);
    } else if model.link_picker_active() {
        overlays::render_link_picker_overlay(model, frame, area);
    }
}

fn render_upload(model: &Model, frame: &mut Frame, area: Rect) {
    let theme = model.session.theme();
    let toast_active = model.active_toast().is_some();
    let body = Rect {
        height: area.height.saturating_sub(u16::from(toast_active)),
        ..area
    };

    let width = area.width.saturating_sub(8).clamp(20, 72);
    let height = 10.min(body.height);
    let card = Rect::new(
        body.x + body.width.saturating_sub(width) / 2,
        body.y + body.height.saturating_sub(height) / 2,
        width.min(body.width),
        height,
    );

    let mut lines = vec![
        Line::styled("inkview", style::accent_style(theme)),
        Line::raw(""),
        Line::raw("Open a Markdown file (.md, .markdown) or a URL."),
        Line::styled(
            "Type a path or URL and press Enter, or drop a file onto the terminal.",
            style::muted_style(theme),
        ),
        Line::raw(""),
        prompt_line(&model.input, theme),
        Line::raw(""),
    ];
    if model.loading.is_some() {
        lines.push(Line::styled("Loading...", style::accent_style(theme)));
    } else {
        lines.push(Line::styled(
            "Enter: open · Ctrl-t: theme · F1: help · Esc: quit",
            style::muted_style(theme),
        ));
    }

    let card_widget = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .style(style::base_style(theme));
    frame.render_widget(card_widget, card);

    if toast_active {
        let toast_area = Rect {
            y: area.y + area.height.saturating_sub(1),
            height: 1,
            ..area
        };
        status::render_toast_bar(model, frame, toast_area);
    }
}

fn prompt_line(input: &str, theme: Theme) -> Line<'static> {
    Line::from(vec![
        Span::styled("> ", style::accent_style(theme)),
        Span::styled(input.to_string(), style::prompt_style(theme)),
        Span::styled("█", style::muted_style(theme)),
    ])
}

fn render_preview(model: &Model, frame: &mut Frame, area: Rect) {
    let theme = model.session.theme();
    let toast_active = model.active_toast().is_some();
    let prompt_active = model.prompt_open;
    let footer_rows = 1 + u16::from(toast_active) + u16::from(prompt_active);
    let doc_outer_area = Rect {
        height: area.height.saturating_sub(footer_rows),
        ..area
    };
    let row_above_status = |n: u16| Rect {
        y: area.y + area.height.saturating_sub(1 + n),
        height: 1,
        ..area
    };
    let status_area = row_above_status(0);

    let range = model.viewport.visible_range();
    let visible = model.lines.get(range).unwrap_or_default();
    let doc_block = Block::default()
        .padding(Padding::left(DOCUMENT_LEFT_PADDING))
        .style(style::base_style(theme));
    let doc = Paragraph::new(styled_lines(visible, theme)).block(doc_block);
    frame.render_widget(doc, doc_outer_area);

    if prompt_active {
        let prompt_area = row_above_status(1 + u16::from(toast_active));
        let line = Line::from(vec![
            Span::styled(" Open: ", style::accent_style(theme)),
            Span::styled(model.input.clone(), style::prompt_style(theme)),
            Span::styled("█", style::muted_style(theme)),
        ]);
        frame.render_widget(
            Paragraph::new(line).style(style::prompt_style(theme)),
            prompt_area,
        );
    }
    if toast_active {
        status::render_toast_bar(model, frame, row_above_status(1));
    }
    status::render_status_bar(model, frame, status_area, Instant::now());
}

/// Document lines styled for `theme`.
pub(super) fn styled_lines(lines: &[ViewLine], theme: Theme) -> Vec<Line<'static>> {
    lines
        .iter()
        .map(|line| {
            let line_style = style::style_for_line(line.kind, theme);
            if line.spans.is_empty() {
                return Line::styled(line.text.clone(), line_style);
            }
            let spans: Vec<Span> = line
                .spans
                .iter()
                .map(|span| {
                    Span::styled(
                        span.text().to_string(),
                        style::style_for_inline(line_style, span.style(), theme),
                    )
                })
                .collect();
            Line::from(spans).style(line_style)
        })
        .collect()
}
