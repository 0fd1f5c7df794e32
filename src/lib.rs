// Only allow lints that are either transitive-dependency noise or
// genuinely opinionated style choices that don't indicate real issues.
#![allow(
    // Transitive dependency version mismatches we can't control
    clippy::multiple_crate_versions,
    // module_name_repetitions is pure style preference (e.g. acquire::AcquireError)
    clippy::module_name_repetitions
)]

//! # inkview
//!
//! A markdown viewer. Documents come from a local file, a file dropped onto
//! the terminal, or a URL; they are rendered to sanitized HTML and shown in
//! the terminal, with read-aloud, rich clipboard copy, print to PDF, anchor
//! links, and a light/dark theme.
//!
//! ## Architecture
//!
//! The interactive viewer uses The Elm Architecture (TEA) pattern:
//! - **Model**: Application state
//! - **Message**: Events and actions
//! - **Update**: Pure state transitions
//! - **View**: Render to terminal
//!
//! ## Modules
//!
//! - [`document`]: Slugs, markdown rendering and sanitizing, the terminal view
//! - [`acquire`]: Getting a document from a file, a drop, or a URL
//! - [`session`]: The loaded document and its per-document state
//! - [`host`]: Speech, clipboard, printing, preferences
//! - [`app`]: Main application loop and state
//! - [`ui`]: Terminal UI components, including the embeddable viewer
//! - [`config`]: Theme selection and saved defaults

pub mod acquire;
pub mod app;
pub mod config;
pub mod document;
pub mod host;
pub mod session;
pub mod ui;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::acquire::{AcquireError, AcquisitionRequest};
    pub use crate::app::{App, Message, Model};
    pub use crate::config::Theme;
    pub use crate::document::{Document, render};
    pub use crate::session::Session;
    pub use crate::ui::EmbeddedViewer;
    pub use crate::ui::viewport::Viewport;
}
