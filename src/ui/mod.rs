//! Terminal UI components.
//!
//! This module contains all UI-related code including:
//! - [`viewport`]: Scroll position and visible range management
//! - [`style`]: Light and dark palettes
//! - [`EmbeddedViewer`]: the document pane for use inside other apps

pub mod style;
pub mod viewport;

mod overlays;
mod pane;
mod render;
mod status;

pub use pane::EmbeddedViewer;
pub use render::{document_content_width, render};
pub use status::status_text;

pub const DOCUMENT_LEFT_PADDING: u16 = 2;

#[cfg(test)]
mod tests;
