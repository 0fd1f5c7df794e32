//! Theming and color definitions.
//!
//! The two palettes mirror the colours of the printable page so the terminal
//! preview and the PDF look alike.

use ratatui::style::{Color, Modifier, Style};

use crate::config::Theme;
use crate::document::{InlineStyle, LineKind};

/// Colours for one theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub bg: Color,
    pub fg: Color,
    pub muted: Color,
    pub accent: Color,
    pub code_bg: Color,
    pub border: Color,
    pub heading: [Color; 3],
}

const LIGHT: Palette = Palette {
    bg: Color::Rgb(0xff, 0xff, 0xff),
    fg: Color::Rgb(0x1f, 0x23, 0x28),
    muted: Color::Rgb(0x59, 0x63, 0x6e),
    accent: Color::Rgb(0x09, 0x69, 0xda),
    code_bg: Color::Rgb(0xf6, 0xf8, 0xfa),
    border: Color::Rgb(0xd1, 0xd9, 0xe0),
    heading: [
        Color::Indexed(24),
        Color::Indexed(22),
        Color::Indexed(58),
    ],
};

const DARK: Palette = Palette {
    bg: Color::Rgb(0x0d, 0x11, 0x17),
    fg: Color::Rgb(0xe6, 0xed, 0xf3),
    muted: Color::Rgb(0x91, 0x98, 0xa1),
    accent: Color::Rgb(0x44, 0x93, 0xf8),
    code_bg: Color::Rgb(0x15, 0x1b, 0x23),
    border: Color::Rgb(0x3d, 0x44, 0x4d),
    heading: [Color::Cyan, Color::Green, Color::Yellow],
};

pub const fn palette(theme: Theme) -> Palette {
    match theme {
        Theme::Light => LIGHT,
        Theme::Dark => DARK,
    }
}

/// Background and text colour of the whole screen.
pub fn base_style(theme: Theme) -> Style {
    let p = palette(theme);
    Style::new().bg(p.bg).fg(p.fg)
}

/// Get the style for a display line of the given kind.
pub fn style_for_line(kind: LineKind, theme: Theme) -> Style {
    let p = palette(theme);
    let base = base_style(theme);
    match kind {
        LineKind::Heading(1) => base
            .fg(p.heading[0])
            .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        LineKind::Heading(2) => base.fg(p.heading[1]).add_modifier(Modifier::BOLD),
        LineKind::Heading(3) => base.fg(p.heading[2]).add_modifier(Modifier::BOLD),
        LineKind::Heading(_) => base.fg(p.accent).add_modifier(Modifier::BOLD),

        LineKind::Code => base.bg(p.code_bg).fg(p.fg),
        LineKind::Quote => base.fg(p.muted).add_modifier(Modifier::ITALIC),
        LineKind::Rule => base.fg(p.border),
        LineKind::TableRow | LineKind::ListItem | LineKind::Paragraph | LineKind::Blank => base,
    }
}

/// Style for an inline span, merged with its line's style.
pub fn style_for_inline(base: Style, inline: InlineStyle, theme: Theme) -> Style {
    let p = palette(theme);
    let mut style = base;

    if inline.emphasis {
        style = style.add_modifier(Modifier::ITALIC);
    }
    if inline.strong {
        style = style.add_modifier(Modifier::BOLD);
    }
    if inline.strikethrough {
        style = style.add_modifier(Modifier::CROSSED_OUT);
    }
    if inline.link {
        style = style.fg(p.accent).add_modifier(Modifier::UNDERLINED);
    }
    if inline.code {
        style = style.bg(p.code_bg);
    }
    style
}

pub fn status_style(theme: Theme) -> Style {
    let p = palette(theme);
    Style::new().bg(p.border).fg(p.fg)
}

pub fn prompt_style(theme: Theme) -> Style {
    let p = palette(theme);
    Style::new().bg(p.code_bg).fg(p.fg)
}

/// Style for secondary text (hints, URLs under link titles).
pub fn muted_style(theme: Theme) -> Style {
    base_style(theme).fg(palette(theme).muted)
}

pub fn accent_style(theme: Theme) -> Style {
    base_style(theme)
        .fg(palette(theme).accent)
        .add_modifier(Modifier::BOLD)
}
