use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Padding, Paragraph, Wrap};

use crate::app::{Model, Notice};
use crate::config::Theme;

use super::style;

pub fn link_picker_rect(area: Rect, items_len: usize) -> Rect {
    let popup_width = area.width.saturating_sub(16).max(44);
    // At most nine items
    #[allow(clippy::cast_possible_truncation)]
    let needed_rows = (items_len as u16 * 2) + 4;
    let popup_height = needed_rows.min(area.height.saturating_sub(4).max(8));
    centered_popup_rect(popup_width, popup_height, area)
}

pub fn render_link_picker_overlay(model: &Model, frame: &mut Frame, area: Rect) {
    let items = &model.link_picker_items;
    if items.is_empty() {
        return;
    }
    let theme = model.session.theme();
    let popup = link_picker_rect(area, items.len());

    let mut lines: Vec<Line> = Vec::new();
    for (idx, link) in items.iter().enumerate() {
        let title = if link.text.trim().is_empty() {
            "(untitled link)"
        } else {
            link.text.as_str()
        };
        lines.push(Line::from(vec![
            Span::raw("   "),
            Span::styled(format!("{}: ", idx + 1), style::accent_style(theme)),
            Span::styled(
                title.to_string(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
        ]));
        lines.push(Line::from(vec![
            Span::raw("      "),
            Span::styled(link.href.clone(), style::muted_style(theme)),
        ]));
    }
    lines.push(Line::raw(" "));
    lines.push(Line::from(vec![
        Span::raw("   "),
        Span::styled("1-9 follow · any other key cancels", style::muted_style(theme)),
    ]));

    frame.render_widget(Clear, popup);
    frame.render_widget(Paragraph::new(lines).block(popup_block("Follow Link", theme)), popup);
}

/// Modal notice. Stays until dismissed.
pub fn render_notice_overlay(notice: &Notice, theme: Theme, frame: &mut Frame, area: Rect) {
    let popup_width = area.width.saturating_sub(12).clamp(30, 70);
    let inner_width = usize::from(popup_width.saturating_sub(4)).max(1);
    // Rough wrapped height; the paragraph wraps for real.
    let body_rows: usize = notice
        .body
        .lines()
        .map(|line| line.chars().count().div_ceil(inner_width).max(1))
        .sum();
    let needed = u16::try_from(body_rows).unwrap_or(u16::MAX).saturating_add(6);
    let popup = centered_popup_rect(popup_width, needed.min(area.height), area);

    let mut lines: Vec<Line> = notice.body.lines().map(|l| Line::raw(l.to_string())).collect();
    lines.push(Line::raw(""));
    lines.push(Line::styled("Enter/Esc: dismiss", style::muted_style(theme)));

    frame.render_widget(Clear, popup);
    frame.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .block(popup_block(&notice.title, theme)),
        popup,
    );
}

pub fn render_help_overlay(theme: Theme, frame: &mut Frame, area: Rect) {
    let popup_width = area.width.saturating_sub(12).max(48);
    let popup_height = area.height.saturating_sub(4).max(12);
    let popup = centered_popup_rect(popup_width, popup_height, area);

    let section_style = style::accent_style(theme);
    let all_lines = vec![
        Line::styled("Navigation", section_style),
        Line::raw("  j/k or Up/Down      Scroll"),
        Line::raw("  Space/PageDown      Page down"),
        Line::raw("  b/PageUp            Page up"),
        Line::raw("  Ctrl-d / Ctrl-u     Half page"),
        Line::raw("  g / G               Top / bottom"),
        Line::raw("  f                   Follow a visible link (1-9)"),
        Line::raw(""),
        Line::styled("Document", section_style),
        Line::raw("  s                   Read aloud / stop"),
        Line::raw("  c                   Copy as rich text"),
        Line::raw("  p                   Print / save as PDF"),
        Line::raw("  t                   Toggle light/dark"),
        Line::raw("  x                   Close document"),
        Line::raw("  o                   Open another file or URL"),
        Line::raw(""),
        Line::styled("Other", section_style),
        Line::raw("  Drop a file         Opens it (bracketed paste)"),
        Line::raw("  q / Ctrl-c          Quit"),
        Line::raw("  ? / F1              Toggle help"),
    ];

    frame.render_widget(Clear, popup);
    frame.render_widget(
        Paragraph::new(all_lines).block(popup_block("Help", theme)),
        popup,
    );
}

fn popup_block(title: &str, theme: Theme) -> Block<'static> {
    Block::default()
        .title(title.to_string())
        .borders(Borders::ALL)
        .border_style(Style::default().fg(style::palette(theme).accent))
        .padding(Padding::uniform(1))
        .style(style::base_style(theme))
}

fn centered_popup_rect(width: u16, height: u16, area: Rect) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    let x = area.x + (area.width.saturating_sub(w) / 2);
    let y = area.y + (area.height.saturating_sub(h) / 2);
    Rect::new(x, y, w, h)
}
