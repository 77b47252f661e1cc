use tracing::{debug, trace};

use crate::document::{
    DisplayOptions, ParagraphUnit, RichDocument, paragraph_for_line, parse_markup,
    reverse_markup,
};

use super::cursor::{CursorLocation, Selection, locate_in, offset_of};
use super::merge::{MergeOutcome, merge_with_previous};

/// Caret motion for the editing surface.
///
/// Names are logical: in vertical text "next char" is down the column and
/// "next line" is the column to the left.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Motion {
    NextChar,
    PrevChar,
    NextLine,
    PrevLine,
    LineStart,
    LineEnd,
    DocumentStart,
    DocumentEnd,
}

/// The live editable surface: rich document plus selection.
///
/// Every content change sets a pending notification which
/// [`Surface::take_change`] hands out exactly once, together with the plain
/// text recomputed from the rich document.
#[derive(Debug, Clone)]
pub struct Surface {
    doc: RichDocument,
    selection: Selection,
    options: DisplayOptions,
    change_pending: bool,
}

impl Surface {
    /// Build a surface for a plain-text document with the caret at its start.
    pub fn from_text(text: &str, options: DisplayOptions) -> Self {
        let doc = RichDocument::from_text(text, &options);
        let selection = Selection::collapsed(start_of_document(&doc));
        Self {
            doc,
            selection,
            options,
            change_pending: false,
        }
    }

    /// Build a surface from serialized rich markup.
    ///
    /// Markup that lost its paragraph structure is read back as plain text
    /// and rebuilt, so the surface always holds at least one paragraph.
    pub fn from_markup(markup: &str, options: DisplayOptions) -> Self {
        match parse_markup(markup) {
            Ok(doc) if doc.paragraph_count() > 0 => {
                let selection = Selection::collapsed(start_of_document(&doc));
                Self {
                    doc,
                    selection,
                    options,
                    change_pending: false,
                }
            }
            _ => Self::from_text(&reverse_markup(markup), options),
        }
    }

    pub const fn document(&self) -> &RichDocument {
        &self.doc
    }

    pub const fn selection(&self) -> Selection {
        self.selection
    }

    /// Replace the selection, e.g. after a mouse click.
    pub fn set_selection(&mut self, selection: Selection) {
        self.selection = selection;
    }

    /// Plain text of the whole document.
    pub fn plain_text(&self) -> String {
        self.doc.to_plain_text()
    }

    /// Caret as (paragraph block index, char offset within the paragraph).
    pub fn caret(&self) -> (usize, usize) {
        let focus = self.selection.focus;
        let offset = self
            .doc
            .paragraph(focus.paragraph)
            .map_or(0, |unit| offset_of(unit, focus.position));
        (focus.paragraph, offset)
    }

    /// Caret as (line number, char offset); lines count paragraphs only.
    pub fn caret_line(&self) -> (usize, usize) {
        let (paragraph, offset) = self.caret();
        let line = self
            .doc
            .paragraphs()
            .position(|(idx, _)| idx == paragraph)
            .unwrap_or(0);
        (line, offset)
    }

    /// Take the pending content-change notification, if any.
    pub fn take_change(&mut self) -> Option<String> {
        if !std::mem::take(&mut self.change_pending) {
            return None;
        }
        Some(self.plain_text())
    }

    /// Rebuild from new host text, keeping the caret near where it was.
    ///
    /// Does not count as a content change.
    pub fn reload(&mut self, text: &str) {
        let (ordinal, offset) = self.caret_line();
        self.doc = RichDocument::from_text(text, &self.options);
        let target = self
            .doc
            .paragraphs()
            .nth(ordinal)
            .or_else(|| self.doc.paragraphs().last())
            .map_or(0, |(idx, _)| idx);
        self.place_caret(target, offset);
        self.change_pending = false;
        debug!(paragraphs = self.doc.paragraph_count(), "surface reloaded");
    }

    /// Insert a char at the caret. A newline splits the paragraph.
    pub fn insert_char(&mut self, ch: char) {
        if ch == '\n' {
            self.split_paragraph();
            return;
        }
        let Some((paragraph, offset)) = self.collapse_into_paragraph() else {
            return;
        };
        let mut chars: Vec<char> = self.paragraph_text(paragraph).chars().collect();
        let offset = offset.min(chars.len());
        chars.insert(offset, ch);
        self.rewrite_paragraph(paragraph, &chars.into_iter().collect::<String>());
        self.place_caret(paragraph, offset + 1);
        self.mark_changed();
    }

    /// Insert a string at the caret, splitting paragraphs at newlines.
    ///
    /// The caret paragraph is rebuilt once and the new lines are added in one
    /// pass, so a large paste costs time linear in its size. The result equals
    /// inserting the chars one by one.
    pub fn insert_str(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        let Some((paragraph, offset)) = self.collapse_into_paragraph() else {
            return;
        };
        let current = self.paragraph_text(paragraph);
        let (head, tail) = current.split_at(byte_index(&current, offset));
        let mut pieces = text.split('\n');
        let first = pieces.next().unwrap_or_default();
        let rest: Vec<&str> = pieces.collect();

        match rest.split_last() {
            None => {
                self.rewrite_paragraph(paragraph, &format!("{head}{first}{tail}"));
                self.place_caret(paragraph, head.chars().count() + first.chars().count());
            }
            Some((last, middle)) => {
                self.rewrite_paragraph(paragraph, &format!("{head}{first}"));
                let options = self.options;
                let closing = format!("{last}{tail}");
                let units = middle
                    .iter()
                    .copied()
                    .chain(std::iter::once(closing.as_str()))
                    .map(|line| paragraph_for_line(line, &options));
                self.doc.insert_paragraphs(paragraph + 1, units);
                let caret_paragraph = paragraph + rest.len();
                self.place_caret(caret_paragraph, last.chars().count());
            }
        }
        self.mark_changed();
        trace!(bytes = text.len(), lines = rest.len() + 1, "inserted text");
    }

    /// Split the caret's paragraph in two (Enter).
    pub fn split_paragraph(&mut self) {
        let Some((paragraph, offset)) = self.collapse_into_paragraph() else {
            return;
        };
        let text = self.paragraph_text(paragraph);
        let (head, tail) = text.split_at(byte_index(&text, offset));
        let tail = paragraph_for_line(tail, &self.options);
        self.rewrite_paragraph(paragraph, head);
        self.doc.insert_paragraph(paragraph + 1, tail);
        self.place_caret(paragraph + 1, 0);
        self.mark_changed();
    }

    /// Backspace.
    ///
    /// At the start of a paragraph this merges it into the previous one;
    /// elsewhere it removes the char before the caret. Returns whether the
    /// content changed. A range selection is collapsed to its focus instead.
    pub fn delete_back(&mut self) -> bool {
        if !self.selection.is_collapsed() {
            self.selection = Selection::collapsed(self.selection.focus);
            return false;
        }
        match merge_with_previous(&mut self.doc, self.selection) {
            MergeOutcome::Merged { selection, .. } => {
                self.selection = selection;
                self.reannotate_caret_paragraph();
                self.mark_changed();
                return true;
            }
            MergeOutcome::NotApplicable => {}
        }
        let (paragraph, offset) = self.caret();
        if offset == 0 || self.doc.paragraph(paragraph).is_none() {
            return false;
        }
        let mut chars: Vec<char> = self.paragraph_text(paragraph).chars().collect();
        let offset = offset.min(chars.len());
        chars.remove(offset - 1);
        self.rewrite_paragraph(paragraph, &chars.into_iter().collect::<String>());
        self.place_caret(paragraph, offset - 1);
        self.mark_changed();
        true
    }

    /// Delete key. At the end of a paragraph the next one is merged into it.
    pub fn delete_forward(&mut self) -> bool {
        if !self.selection.is_collapsed() {
            self.selection = Selection::collapsed(self.selection.focus);
            return false;
        }
        let (paragraph, offset) = self.caret();
        let Some(len) = self.doc.paragraph(paragraph).map(ParagraphUnit::char_len) else {
            return false;
        };
        if offset < len {
            let mut chars: Vec<char> = self.paragraph_text(paragraph).chars().collect();
            chars.remove(offset);
            self.rewrite_paragraph(paragraph, &chars.into_iter().collect::<String>());
            self.place_caret(paragraph, offset);
            self.mark_changed();
            return true;
        }
        let Some(next) = self.doc.next_paragraph(paragraph) else {
            return false;
        };
        let previous = self.selection;
        self.place_caret(next, 0);
        if self.delete_back() {
            true
        } else {
            self.selection = previous;
            false
        }
    }

    /// Move the caret; the selection collapses at the new location.
    pub fn move_caret(&mut self, motion: Motion) {
        let (paragraph, offset) = self.caret();
        let len = self
            .doc
            .paragraph(paragraph)
            .map_or(0, ParagraphUnit::char_len);
        let (paragraph, offset) = match motion {
            Motion::NextChar if offset < len => (paragraph, offset + 1),
            Motion::NextChar => match self.doc.next_paragraph(paragraph) {
                Some(next) => (next, 0),
                None => (paragraph, len),
            },
            Motion::PrevChar if offset > 0 => (paragraph, offset - 1),
            Motion::PrevChar => match self.doc.previous_paragraph(paragraph) {
                Some(prev) => (prev, self.paragraph_len(prev)),
                None => (paragraph, 0),
            },
            Motion::NextLine => self
                .doc
                .next_paragraph(paragraph)
                .map_or((paragraph, offset), |next| (next, offset)),
            Motion::PrevLine => self
                .doc
                .previous_paragraph(paragraph)
                .map_or((paragraph, offset), |prev| (prev, offset)),
            Motion::LineStart => (paragraph, 0),
            Motion::LineEnd => (paragraph, len),
            Motion::DocumentStart => (self.doc.first_paragraph().unwrap_or(0), 0),
            Motion::DocumentEnd => {
                let last = self.doc.last_paragraph().unwrap_or(0);
                (last, self.paragraph_len(last))
            }
        };
        let offset = offset.min(self.paragraph_len(paragraph));
        self.place_caret(paragraph, offset);
        trace!(?motion, paragraph, offset, "caret moved");
    }

    /// Move the caret to (paragraph ordinal, char offset), clamping both.
    pub fn move_to(&mut self, ordinal: usize, offset: usize) {
        let Some(paragraph) = self
            .doc
            .paragraphs()
            .nth(ordinal)
            .or_else(|| self.doc.paragraphs().last())
            .map(|(idx, _)| idx)
        else {
            return;
        };
        let offset = offset.min(self.paragraph_len(paragraph));
        self.place_caret(paragraph, offset);
    }

    // --- Private helpers ---

    fn paragraph_text(&self, paragraph: usize) -> String {
        self.doc
            .paragraph(paragraph)
            .map(ParagraphUnit::text)
            .unwrap_or_default()
    }

    fn paragraph_len(&self, paragraph: usize) -> usize {
        self.doc
            .paragraph(paragraph)
            .map_or(0, ParagraphUnit::char_len)
    }

    fn mark_changed(&mut self) {
        self.change_pending = true;
    }

    fn place_caret(&mut self, paragraph: usize, offset: usize) {
        let location = self.doc.paragraph(paragraph).map_or_else(
            || CursorLocation::paragraph_start(paragraph),
            |unit| CursorLocation::new(paragraph, locate_in(unit, offset)),
        );
        self.selection = Selection::collapsed(location);
    }

    /// Collapse the selection and make sure the caret is inside a paragraph.
    fn collapse_into_paragraph(&mut self) -> Option<(usize, usize)> {
        self.selection = Selection::collapsed(self.selection.focus);
        if self.doc.paragraph(self.selection.focus.paragraph).is_none() {
            if self.doc.paragraph_count() == 0 {
                let text = self.doc.to_plain_text();
                self.doc = RichDocument::from_text(&text, &self.options);
            }
            let first = self.doc.first_paragraph()?;
            self.place_caret(first, 0);
        }
        Some(self.caret())
    }

    /// Replace a paragraph's segments with a fresh annotation of `text`.
    ///
    /// A paragraph whose text became empty turns back into a line break.
    fn rewrite_paragraph(&mut self, paragraph: usize, text: &str) {
        let fresh = paragraph_for_line(text, &self.options);
        if let Some(unit) = self.doc.paragraph_mut(paragraph) {
            *unit = fresh;
        }
    }

    fn reannotate_caret_paragraph(&mut self) {
        let (paragraph, offset) = self.caret();
        let text = self.paragraph_text(paragraph);
        self.rewrite_paragraph(paragraph, &text);
        self.place_caret(paragraph, offset);
    }
}

/// Byte index of char offset `offset`, clamped to the end of `text`.
fn byte_index(text: &str, offset: usize) -> usize {
    text.char_indices()
        .nth(offset)
        .map_or(text.len(), |(byte, _)| byte)
}

fn start_of_document(doc: &RichDocument) -> CursorLocation {
    doc.first_paragraph()
        .and_then(|idx| super::cursor::locate(doc, idx, 0))
        .unwrap_or_else(|| CursorLocation::paragraph_start(0))
}
