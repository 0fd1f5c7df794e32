//! Application state and main event loop.
//!
//! This module implements The Elm Architecture (TEA):
//! - [`Model`]: The complete application state
//! - [`Message`]: All possible events and actions
//! - [`update`]: Pure function for state transitions
//! - [`App::run`]: Main event loop with rendering
//!
//! Host capabilities and the acquisition worker live on [`App`], outside the
//! model, so `update` stays pure.

mod effects;
mod event_loop;
mod input;
mod model;
mod update;

pub use model::{Model, Notice, Screen, ToastLevel};
pub use update::{Message, update};

use crate::acquire::{Acquirer, AcquisitionRequest};
use crate::config::Theme;
use crate::host::Host;

/// Main application struct that owns the host capabilities and runs the
/// event loop.
pub struct App {
    host: Host,
    acquirer: Acquirer,
    theme: Theme,
    initial_request: Option<AcquisitionRequest>,
}

impl App {
    /// Create an application using the real system capabilities.
    pub fn new(theme: Theme) -> Self {
        Self {
            host: Host::native(),
            acquirer: Acquirer::with_http(),
            theme,
            initial_request: None,
        }
    }

    /// Replace the host capabilities.
    #[must_use]
    pub fn with_host(mut self, host: Host) -> Self {
        self.host = host;
        self
    }

    #[must_use]
    pub fn with_acquirer(mut self, acquirer: Acquirer) -> Self {
        self.acquirer = acquirer;
        self
    }

    /// Source to acquire as soon as the loop starts (file or deep link).
    #[must_use]
    pub fn with_initial_request(mut self, request: Option<AcquisitionRequest>) -> Self {
        self.initial_request = request;
        self
    }
}
