use crate::document::{ParagraphUnit, RichDocument};

/// Where the caret sits inside one paragraph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    /// Inside the text-bearing segment at index `segment`, after `offset` chars.
    Text { segment: usize, offset: usize },
    /// Directly inside the paragraph, before child `child`.
    ///
    /// Used when the paragraph has no text-bearing segment to hold the caret.
    Paragraph { child: usize },
}

/// Caret location, always tied to the paragraph block that owns it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CursorLocation {
    /// Block index of the owning paragraph.
    pub paragraph: usize,
    pub position: Position,
}

impl CursorLocation {
    pub const fn new(paragraph: usize, position: Position) -> Self {
        Self {
            paragraph,
            position,
        }
    }

    /// The structural start of a paragraph.
    pub const fn paragraph_start(paragraph: usize) -> Self {
        Self::new(paragraph, Position::Paragraph { child: 0 })
    }
}

/// A selection between two caret locations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub anchor: CursorLocation,
    pub focus: CursorLocation,
}

impl Selection {
    /// A zero-width selection.
    pub const fn collapsed(at: CursorLocation) -> Self {
        Self {
            anchor: at,
            focus: at,
        }
    }

    pub fn is_collapsed(&self) -> bool {
        self.anchor == self.focus
    }
}

/// Find the exact position for char offset `target` inside `unit`.
///
/// Walks the text-bearing segments in order; the first one whose cumulative
/// length reaches `target` holds the caret. Past the end, the caret goes after
/// the last char of the last text segment. With no text segments at all the
/// paragraph itself is returned so callers always get a placeable position.
pub fn locate_in(unit: &ParagraphUnit, target: usize) -> Position {
    let mut consumed = 0;
    let mut last = None;
    for (segment, text) in unit.leaves() {
        let len = text.chars().count();
        if consumed + len >= target {
            return Position::Text {
                segment,
                offset: target - consumed,
            };
        }
        consumed += len;
        last = Some((segment, len));
    }
    match last {
        Some((segment, len)) => Position::Text {
            segment,
            offset: len,
        },
        None => Position::Paragraph { child: 0 },
    }
}

/// [`locate_in`] for the paragraph at block index `paragraph`.
///
/// Returns `None` when `paragraph` does not name a paragraph block.
pub fn locate(doc: &RichDocument, paragraph: usize, target: usize) -> Option<CursorLocation> {
    let unit = doc.paragraph(paragraph)?;
    Some(CursorLocation::new(paragraph, locate_in(unit, target)))
}

/// Char offset of `position` from the start of `unit`.
pub fn offset_of(unit: &ParagraphUnit, position: Position) -> usize {
    let segments = unit.segments();
    match position {
        Position::Text { segment, offset } => {
            let segment = segment.min(segments.len());
            let before: usize = segments[..segment].iter().map(|s| s.char_len()).sum();
            let within = segments.get(segment).map_or(0, |s| offset.min(s.char_len()));
            before + within
        }
        Position::Paragraph { child } => segments[..child.min(segments.len())]
            .iter()
            .map(|s| s.char_len())
            .sum(),
    }
}

/// Whether `position` is the structural start of `unit`.
///
/// True at offset 0 of the first text-bearing segment, or when the caret sits
/// directly in the paragraph before its first child.
pub fn is_at_line_start(unit: &ParagraphUnit, position: Position) -> bool {
    match position {
        Position::Paragraph { child } => child == 0,
        Position::Text { segment, offset } => {
            offset == 0 && unit.leaves().next().is_some_and(|(first, _)| first == segment)
        }
    }
}
