//! Terminal UI components.
//!
//! - [`layout`]: Pure placement of the document in vertical columns
//! - `render`: Drawing the columns and caret with ratatui
//! - `status`: Save indicator, status bar and toasts

pub mod layout;

mod render;
mod status;

pub use render::render;
pub use status::save_status_style;

/// Rows below the document: toast bar and status bar.
pub const FOOTER_ROWS: u16 = 2;

#[cfg(test)]
mod tests;
