//! Backspace at the start of a line: merge the paragraph into its predecessor.

use tracing::debug;

use crate::document::{RichDocument, Segment};

use super::cursor::{CursorLocation, Selection, is_at_line_start, locate_in};

/// Result of [`merge_with_previous`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    /// The guard did not hold; nothing was mutated.
    NotApplicable,
    /// The paragraph was merged and removed.
    Merged {
        /// Where the caret must go.
        selection: Selection,
        /// Block index of the paragraph that was removed.
        removed: usize,
    },
}

impl MergeOutcome {
    pub const fn is_merged(&self) -> bool {
        matches!(self, Self::Merged { .. })
    }
}

/// Merge the caret's paragraph into the previous paragraph.
///
/// Only applies to a collapsed selection at the structural start of its
/// paragraph, and only when a previous paragraph exists. An empty (line-break
/// only) predecessor is replaced by the current paragraph's content with the
/// caret at its start; otherwise every segment is appended in order and the
/// caret lands exactly on the old/new boundary. The one exception is an empty
/// current paragraph, whose lone line-break marker is dropped. The current
/// paragraph is removed.
///
/// Callers must fire their content-change notification once for every
/// [`MergeOutcome::Merged`] and never for [`MergeOutcome::NotApplicable`].
pub fn merge_with_previous(doc: &mut RichDocument, selection: Selection) -> MergeOutcome {
    if !selection.is_collapsed() {
        return MergeOutcome::NotApplicable;
    }
    let caret = selection.focus;
    let Some(current) = doc.paragraph(caret.paragraph) else {
        return MergeOutcome::NotApplicable;
    };
    if !is_at_line_start(current, caret.position) {
        return MergeOutcome::NotApplicable;
    }
    let Some(previous) = doc.previous_paragraph(caret.paragraph) else {
        return MergeOutcome::NotApplicable;
    };

    let moved = doc
        .paragraph_mut(caret.paragraph)
        .map(|unit| unit.take_segments())
        .unwrap_or_default();
    let Some(target) = doc.paragraph_mut(previous) else {
        return MergeOutcome::NotApplicable;
    };

    let boundary = if target.is_line_break_only() {
        target.take_segments();
        target.extend(moved);
        0
    } else {
        let boundary = target.char_len();
        // An empty line contributes no segments.
        if !matches!(moved.as_slice(), [Segment::LineBreak]) {
            target.extend(moved);
        }
        boundary
    };
    let position = locate_in(target, boundary);
    doc.remove_block(caret.paragraph);

    debug!(
        into = previous,
        removed = caret.paragraph,
        boundary,
        "merged paragraph into predecessor"
    );
    MergeOutcome::Merged {
        selection: Selection::collapsed(CursorLocation::new(previous, position)),
        removed: caret.paragraph,
    }
}
