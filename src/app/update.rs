use std::path::PathBuf;

use crate::acquire::Outcome;
use crate::app::Model;

/// All possible events and actions in the application.
///
/// These represent user input, system events, and internal actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    // Navigation
    /// Scroll up by n lines
    ScrollUp(usize),
    /// Scroll down by n lines
    ScrollDown(usize),
    PageUp,
    PageDown,
    HalfPageUp,
    HalfPageDown,
    GoToTop,
    GoToBottom,

    // Sources
    /// Open the source prompt over the preview
    OpenPrompt,
    /// Replace the prompt text
    PromptInput(String),
    /// Close the prompt without submitting
    CancelPrompt,
    /// Acquire the typed path or URL
    Submit(String),
    /// Files dropped onto the terminal (bracketed paste of their paths)
    DropFiles(Vec<PathBuf>),
    /// The acquisition worker finished
    Acquired(Outcome),

    // Document actions
    ToggleSpeech,
    /// Speech ended on its own
    SpeechEnded,
    Copy,
    Print,
    ToggleTheme,
    CloseDocument,

    // Links
    /// Open the visible-link picker (or follow directly when single link)
    OpenVisibleLinks,
    /// Follow numbered link in the picker
    SelectVisibleLink(u8),
    CancelVisibleLinkPicker,

    // Overlays
    ToggleHelp,
    HideHelp,
    DismissNotice,

    // Window
    /// Terminal resized
    Resize(u16, u16),
    Redraw,

    Quit,
}

/// Pure function that updates the model based on a message.
///
/// Messages that need a host capability (speech, clipboard, printing,
/// acquisition, opening links) change nothing here; the effects layer
/// handles them after this returns.
pub fn update(mut model: Model, msg: Message) -> Model {
    match msg {
        // Navigation
        Message::ScrollUp(n) => model.viewport.scroll_up(n),
        Message::ScrollDown(n) => model.viewport.scroll_down(n),
        Message::PageUp => model.viewport.page_up(),
        Message::PageDown => model.viewport.page_down(),
        Message::HalfPageUp => model.viewport.half_page_up(),
        Message::HalfPageDown => model.viewport.half_page_down(),
        Message::GoToTop => model.viewport.go_to_top(),
        Message::GoToBottom => model.viewport.go_to_bottom(),

        // Sources
        Message::OpenPrompt => {
            model.prompt_open = true;
            model.input.clear();
        }
        Message::PromptInput(text) => {
            model.input = text;
        }
        Message::CancelPrompt => {
            model.prompt_open = false;
            model.input.clear();
        }
        Message::Submit(_) | Message::DropFiles(_) => {
            model.input.clear();
            // acquisition started in effects
        }
        Message::Acquired(outcome) => model.apply_outcome(outcome),

        Message::ToggleTheme => {
            model.session.toggle_theme();
        }
        Message::SpeechEnded => {
            // flag already synced by the event loop
        }

        // Links
        Message::OpenVisibleLinks | Message::SelectVisibleLink(_) => {
            // side effect in event loop
        }
        Message::CancelVisibleLinkPicker => {
            model.link_picker_items.clear();
        }

        // Overlays
        Message::ToggleHelp => {
            model.help_visible = !model.help_visible;
        }
        Message::HideHelp => {
            model.help_visible = false;
        }
        Message::DismissNotice => {
            model.notice = None;
        }

        Message::Resize(width, height) => {
            model.viewport.resize(width, height.saturating_sub(1));
            model.reflow_layout();
        }

        // ToggleSpeech/Copy/Print/CloseDocument: handled in effects
        Message::ToggleSpeech
        | Message::Copy
        | Message::Print
        | Message::CloseDocument
        | Message::Redraw => {}

        Message::Quit => {
            model.should_quit = true;
        }
    }
    model
}
