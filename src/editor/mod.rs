//! Editing on the rich document.
//!
//! Caret locations are tied to paragraph blocks of a
//! [`RichDocument`](crate::document::RichDocument). The [`Surface`] wraps a
//! document and a selection and exposes the editing operations the
//! application drives.

mod cursor;
mod merge;
mod surface;

pub use cursor::{
    CursorLocation, Position, Selection, is_at_line_start, locate, locate_in, offset_of,
};
pub use merge::{MergeOutcome, merge_with_previous};
pub use surface::{Motion, Surface};
