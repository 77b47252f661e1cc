//! Application state and main event loop.
//!
//! This module implements The Elm Architecture (TEA):
//! - [`Model`]: The complete application state
//! - [`Message`]: All possible events and actions
//! - [`update`]: Pure function for state transitions
//! - [`App::run`]: Main event loop with rendering

mod effects;
mod event_loop;
mod input;
mod model;
mod update;

pub use model::{Model, SAVED_RESET_DELAY, SaveStatus, ToastLevel};
pub use update::{Message, update};

use std::path::PathBuf;

use crate::document::DisplayOptions;

/// Main application struct that owns the terminal and runs the event loop.
pub struct App {
    file_path: PathBuf,
    watch_enabled: bool,
    options: DisplayOptions,
}

impl App {
    /// Create a new application for the given file.
    pub fn new(file_path: PathBuf) -> Self {
        Self {
            file_path,
            watch_enabled: false,
            options: DisplayOptions::default(),
        }
    }

    /// Enable or disable file watching.
    #[must_use]
    pub const fn with_watch(mut self, enabled: bool) -> Self {
        self.watch_enabled = enabled;
        self
    }

    /// Enable or disable combined rendering of short digit runs.
    #[must_use]
    pub const fn with_digit_annotation(mut self, enabled: bool) -> Self {
        self.options.annotate_digits = enabled;
        self
    }
}
