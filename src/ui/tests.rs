use std::sync::Arc;
use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::style::Modifier;

use super::*;
use crate::acquire::{AcquireError, Fetcher, Outcome};
use crate::app::{Message, Model, Notice, update};
use crate::config::Theme;
use crate::document::Document;
use crate::host::fake;

fn create_test_terminal() -> Terminal<TestBackend> {
    Terminal::new(TestBackend::new(80, 24)).unwrap()
}

fn screen_text(terminal: &Terminal<TestBackend>) -> String {
    let buffer = terminal.backend().buffer();
    let width = buffer.area.width as usize;
    buffer
        .content()
        .chunks(width)
        .map(|row| row.iter().map(ratatui::buffer::Cell::symbol).collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}

fn draw(model: &Model) -> String {
    let mut terminal = create_test_terminal();
    terminal.draw(|frame| render(model, frame)).unwrap();
    screen_text(&terminal)
}

fn loaded(source: &str) -> Model {
    update(
        Model::new(Theme::Light, (80, 24)),
        Message::Acquired(Outcome::Loaded(Document::new("guide.md", source))),
    )
}

#[test]
fn test_upload_screen_shows_prompt() {
    let mut model = Model::new(Theme::Light, (80, 24));
    model.input = "docs/readme.md".to_string();
    let screen = draw(&model);
    assert!(screen.contains("inkview"));
    assert!(screen.contains("> docs/readme.md"));
    assert!(screen.contains("Esc: quit"));
    assert!(!screen.contains("Loading..."));
}

#[test]
fn test_upload_screen_shows_loading_text() {
    let mut model = Model::new(Theme::Light, (80, 24));
    model.loading = Some("notes.md".to_string());
    assert!(draw(&model).contains("Loading..."));
}

#[test]
fn test_preview_renders_document_and_status() {
    let model = loaded("# Hello\n\nWorld");
    let screen = draw(&model);
    assert!(screen.contains("# Hello"));
    assert!(screen.contains("World"));
    let status = screen.lines().last().unwrap();
    assert!(status.contains("guide.md"));
    assert!(status.contains("Line 1/3"));
    assert!(status.contains("light"));
}

#[test]
fn test_preview_is_left_padded() {
    let model = loaded("Body");
    let screen = draw(&model);
    assert!(screen.lines().next().unwrap().starts_with("  Body"));
}

#[test]
fn test_scrolled_preview_starts_at_offset() {
    let source: String = (1..=40).map(|i| format!("Para {i}\n\n")).collect();
    let model = update(loaded(&source), Message::ScrollDown(2));
    let first = draw(&model).lines().next().unwrap().to_string();
    assert_eq!(first.trim(), "Para 2");
}

#[test]
fn test_inline_markup_is_styled() {
    let model = loaded("Some **bold** and `code` [here](#x)");
    let mut terminal = create_test_terminal();
    terminal.draw(|frame| render(&model, frame)).unwrap();
    let buffer = terminal.backend().buffer();
    let row = screen_text(&terminal).lines().next().unwrap().to_string();
    assert!(row.starts_with("  Some bold and code here"), "got: {row}");

    let plain = &buffer[(2, 0)];
    assert_eq!(plain.symbol(), "S");
    assert!(!plain.modifier.contains(Modifier::BOLD));

    let bold = &buffer[(7, 0)];
    assert_eq!(bold.symbol(), "b");
    assert!(bold.modifier.contains(Modifier::BOLD));

    let code = &buffer[(16, 0)];
    assert_eq!(code.symbol(), "c");
    assert_eq!(code.bg, style::palette(Theme::Light).code_bg);
    assert_eq!(buffer[(12, 0)].bg, style::palette(Theme::Light).bg);

    let link = &buffer[(21, 0)];
    assert_eq!(link.symbol(), "h");
    assert!(link.modifier.contains(Modifier::UNDERLINED));
    assert_eq!(link.fg, style::palette(Theme::Light).accent);
}

#[test]
fn test_theme_sets_background() {
    let model = update(loaded("text"), Message::ToggleTheme);
    let mut terminal = create_test_terminal();
    terminal.draw(|frame| render(&model, frame)).unwrap();
    let cell = &terminal.backend().buffer()[(10, 5)];
    assert_eq!(cell.bg, style::palette(Theme::Dark).bg);
}

#[test]
fn test_notice_overlay_is_drawn() {
    let mut model = loaded("# Doc");
    model.notice = Some(Notice::new("Invalid file", "notes.txt is not valid"));
    let screen = draw(&model);
    assert!(screen.contains("Invalid file"));
    assert!(screen.contains("notes.txt is not valid"));
    assert!(screen.contains("Enter/Esc: dismiss"));
}

#[test]
fn test_notice_wins_over_help() {
    let mut model = loaded("# Doc");
    model.help_visible = true;
    model.notice = Some(Notice::new("Print to PDF", "advice"));
    let screen = draw(&model);
    assert!(screen.contains("Print to PDF"));
    assert!(!screen.contains("Navigation"));
}

#[test]
fn test_help_overlay_lists_document_keys() {
    let model = update(loaded("# Doc"), Message::ToggleHelp);
    let screen = draw(&model);
    assert!(screen.contains("Read aloud"));
    assert!(screen.contains("Print / save as PDF"));
}

#[test]
fn test_link_picker_lists_numbered_links() {
    let mut model = loaded("[one](#a) and [two](https://example.com/two)");
    model.link_picker_items = model.visible_links();
    let screen = draw(&model);
    assert!(screen.contains("1: one"));
    assert!(screen.contains("2: two"));
    assert!(screen.contains("https://example.com/two"));
}

#[test]
fn test_prompt_bar_over_preview() {
    let model = update(
        update(loaded("# Doc"), Message::OpenPrompt),
        Message::PromptInput("https://x.org/a.md".to_string()),
    );
    assert!(draw(&model).contains("Open: https://x.org/a.md"));
}

#[test]
fn test_status_text_indicators() {
    let (mut host, _log) = fake::host();
    let mut model = loaded("# Doc");
    let now = Instant::now();
    assert!(!status_text(&model, now).contains("[speaking]"));

    model.session.toggle_speech(host.speech.as_mut()).unwrap();
    model.session.copy(host.clipboard.as_mut(), now).unwrap();
    model.loading = Some("next.md".to_string());

    let text = status_text(&model, now);
    assert!(text.contains("[speaking]"));
    assert!(text.contains("Copied!"));
    assert!(text.contains("Loading next.md..."));
    assert!(!status_text(&model, now + Duration::from_secs(3)).contains("Copied!"));
}

#[test]
fn test_content_width_leaves_padding() {
    assert_eq!(document_content_width(80), 78);
    assert_eq!(document_content_width(1), 1);
}

struct StaticFetcher {
    body: Option<String>,
    delay: Duration,
}

impl Fetcher for StaticFetcher {
    fn fetch(&self, url: &str) -> Result<String, AcquireError> {
        std::thread::sleep(self.delay);
        self.body
            .clone()
            .ok_or_else(|| AcquireError::HttpFailure {
                url: url.to_string(),
                status: 404,
            })
    }
}

fn viewer(body: Option<&str>, delay: Duration) -> EmbeddedViewer {
    let body = body.map(str::to_string);
    EmbeddedViewer::with_fetcher(
        "https://example.com/docs/pane.md",
        Arc::new(StaticFetcher { body, delay }),
    )
}

fn draw_viewer(viewer: &mut EmbeddedViewer, width: u16, height: u16) -> String {
    let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
    terminal
        .draw(|frame| frame.render_widget(&mut *viewer, frame.area()))
        .unwrap();
    screen_text(&terminal)
}

#[test]
fn test_embedded_viewer_shows_loading_then_document() {
    let mut pane = viewer(Some("# Pane\n\nEmbedded body"), Duration::from_millis(200));
    assert!(pane.is_loading());
    assert!(draw_viewer(&mut pane, 40, 10).contains("Loading..."));

    assert!(pane.wait(Duration::from_secs(5)));
    let screen = draw_viewer(&mut pane, 40, 10);
    assert!(screen.contains("# Pane"));
    assert!(screen.contains("Embedded body"));
    assert_eq!(pane.document().unwrap().name, "pane.md");
}

#[test]
fn test_embedded_viewer_scrolls_inside_its_area() {
    let source: String = (1..=30).map(|i| format!("Row {i}\n\n")).collect();
    let mut pane = viewer(Some(&source), Duration::ZERO);
    pane.wait(Duration::from_secs(5));
    draw_viewer(&mut pane, 40, 5);

    assert!(pane.handle_key(KeyEvent::new(KeyCode::Char('j'), KeyModifiers::NONE)));
    assert!(!pane.handle_key(KeyEvent::new(KeyCode::Char('z'), KeyModifiers::NONE)));
    assert_eq!(pane.offset(), 1);
    pane.handle_key(KeyEvent::new(KeyCode::End, KeyModifiers::NONE));
    let screen = draw_viewer(&mut pane, 40, 5);
    assert!(screen.contains("Row 30"));
}

#[test]
fn test_embedded_viewer_reports_fetch_failure() {
    let mut pane = viewer(None, Duration::ZERO);
    pane.wait(Duration::from_secs(5));
    assert_eq!(pane.error().and_then(AcquireError::status), Some(404));
    let screen = draw_viewer(&mut pane, 60, 12);
    assert!(screen.contains("404"));
    assert!(pane.document().is_none());
}
