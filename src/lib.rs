// Only allow lints that are either transitive-dependency noise or
// genuinely opinionated style choices that don't indicate real issues.
#![allow(
    // Transitive dependency version mismatches we can't control
    clippy::multiple_crate_versions,
    // module_name_repetitions is pure style preference (e.g. host::HostError)
    clippy::module_name_repetitions
)]

//! # Tategaki
//!
//! A vertical (tategaki) Japanese text editor core with a terminal front end.
//!
//! Plain text is shown as columns running top to bottom, right to left.
//! Short digit runs are combined into one upright cell (tate-chu-yoko), and
//! every edit is mapped back to the plain text that gets saved.
//!
//! ## Architecture
//!
//! The terminal app uses The Elm Architecture (TEA) pattern:
//! - **Model**: Application state
//! - **Message**: Events and actions
//! - **Update**: Pure state transitions
//! - **View**: Render to terminal
//!
//! ## Modules
//!
//! - [`document`]: Digit annotation, display and reverse transforms, markup
//! - [`editor`]: Caret location, line merging and the editing surface
//! - [`host`]: Save/notify protocol between the surface and its host
//! - [`app`]: Main application loop and state
//! - [`ui`]: Vertical layout and terminal rendering
//! - [`watcher`]: File watching
//! - [`config`]: Persistent default flags
//! - [`perf`]: Timing and debug event logging

pub mod app;
pub mod config;
pub mod document;
pub mod editor;
pub mod host;
pub mod perf;
pub mod ui;
pub mod watcher;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::app::{App, Message, Model, SaveStatus};
    pub use crate::document::{DisplayOptions, ParagraphUnit, RichDocument, Segment};
    pub use crate::editor::{Motion, Surface};
    pub use crate::host::{Host, Inbound, Outbound};
}
