//! Vertical (tategaki) placement of a rich document.
//!
//! Each line fills one or more columns top to bottom; columns are numbered
//! from the right edge of the page. The layout is pure and knows nothing
//! about the terminal, so it can be tested and benchmarked directly.

use unicode_width::UnicodeWidthStr;

use crate::document::{RichDocument, Segment};

/// Terminal cells a column occupies.
pub const COLUMN_CELLS: u16 = 2;
/// Blank cell between neighboring columns.
pub const COLUMN_GAP: u16 = 1;
/// Horizontal distance between the starts of neighboring columns.
pub const COLUMN_PITCH: u16 = COLUMN_CELLS + COLUMN_GAP;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlyphKind {
    Plain,
    /// A digit run set horizontally inside the column.
    Annotated,
}

/// One row of a column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Glyph {
    pub text: String,
    pub kind: GlyphKind,
    /// Char offset of the glyph's first char within its line.
    pub offset: usize,
    /// Chars covered by the glyph.
    pub len: usize,
}

impl Glyph {
    /// Terminal width of the glyph text.
    pub fn width(&self) -> usize {
        self.text.width()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    /// Line (paragraph ordinal) the column belongs to.
    pub line: usize,
    pub glyphs: Vec<Glyph>,
}

/// Where the caret is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaretCell {
    pub column: usize,
    pub row: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VerticalLayout {
    columns: Vec<Column>,
    caret: Option<CaretCell>,
    rows: usize,
}

impl VerticalLayout {
    /// Lay out `doc` in columns of `rows` rows.
    ///
    /// `caret` is (line, char offset). A caret sitting after the last glyph of
    /// a full column opens an extra column for its line.
    pub fn build(doc: &RichDocument, rows: usize, caret: Option<(usize, usize)>) -> Self {
        let _scope = crate::perf::scope("ui.layout");
        let rows = rows.max(1);
        let mut columns = Vec::new();
        let mut caret_cell = None;

        for (line, (_, unit)) in doc.paragraphs().enumerate() {
            let glyphs = glyphs_for(unit.segments());
            let caret_offset = caret.and_then(|(l, offset)| (l == line).then_some(offset));
            let caret_index = caret_offset.map(|offset| glyph_index_for(&glyphs, offset));

            let needed = glyphs.len().div_ceil(rows).max(1);
            let needed = caret_index.map_or(needed, |idx| needed.max(idx / rows + 1));

            let first_column = columns.len();
            let mut chunks = glyphs.chunks(rows);
            for _ in 0..needed {
                columns.push(Column {
                    line,
                    glyphs: chunks.next().map(<[Glyph]>::to_vec).unwrap_or_default(),
                });
            }
            if let Some(idx) = caret_index {
                caret_cell = Some(CaretCell {
                    column: first_column + idx / rows,
                    row: idx % rows,
                });
            }
        }

        Self {
            columns,
            caret: caret_cell,
            rows,
        }
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub const fn caret(&self) -> Option<CaretCell> {
        self.caret
    }

    pub const fn rows(&self) -> usize {
        self.rows
    }

    /// Map a (column, row) cell back to (line, char offset).
    ///
    /// Rows past the end of a column resolve to the end of that column's text.
    pub fn position_at(&self, column: usize, row: usize) -> Option<(usize, usize)> {
        let col = self.columns.get(column)?;
        if let Some(glyph) = col.glyphs.get(row) {
            return Some((col.line, glyph.offset));
        }
        let end = col.glyphs.last().map_or_else(
            || self.line_start_before(column),
            |glyph| glyph.offset + glyph.len,
        );
        Some((col.line, end))
    }

    fn line_start_before(&self, column: usize) -> usize {
        // Empty column: either an empty line or the overflow column of a full one.
        let line = self.columns[column].line;
        self.columns[..column]
            .iter()
            .rev()
            .take_while(|c| c.line == line)
            .find_map(|c| c.glyphs.last().map(|g| g.offset + g.len))
            .unwrap_or(0)
    }
}

/// First column index to show so that `column` is visible in a window of
/// `visible` columns starting at `scroll`.
pub fn scroll_to_show(scroll: usize, column: usize, visible: usize) -> usize {
    let visible = visible.max(1);
    if column < scroll {
        column
    } else if column >= scroll + visible {
        column + 1 - visible
    } else {
        scroll
    }
}

/// Number of whole columns that fit in `width` cells.
pub fn visible_columns(width: u16) -> usize {
    usize::from(width.saturating_add(COLUMN_GAP) / COLUMN_PITCH).max(1)
}

fn glyphs_for(segments: &[Segment]) -> Vec<Glyph> {
    let mut glyphs = Vec::new();
    let mut offset = 0;
    for segment in segments {
        match segment {
            Segment::Text(text) => {
                for ch in text.chars() {
                    glyphs.push(Glyph {
                        text: vertical_form(ch).to_string(),
                        kind: GlyphKind::Plain,
                        offset,
                        len: 1,
                    });
                    offset += 1;
                }
            }
            Segment::Annotated(digits) => {
                let len = digits.chars().count();
                glyphs.push(Glyph {
                    text: digits.clone(),
                    kind: GlyphKind::Annotated,
                    offset,
                    len,
                });
                offset += len;
            }
            Segment::LineBreak => {}
        }
    }
    glyphs
}

/// Index of the glyph the caret at `offset` sits on (or just past the end).
fn glyph_index_for(glyphs: &[Glyph], offset: usize) -> usize {
    glyphs
        .iter()
        .position(|g| offset < g.offset + g.len)
        .unwrap_or(glyphs.len())
}

/// Presentation form of punctuation that turns in vertical text.
fn vertical_form(ch: char) -> char {
    match ch {
        '、' => '︑',
        '。' => '︒',
        '「' => '﹁',
        '」' => '﹂',
        '『' => '﹃',
        '』' => '﹄',
        '（' | '(' => '︵',
        '）' | ')' => '︶',
        'ー' | '－' => '｜',
        '…' => '︙',
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::DisplayOptions;

    fn layout(text: &str, rows: usize, caret: Option<(usize, usize)>) -> VerticalLayout {
        let doc = RichDocument::from_text(text, &DisplayOptions::default());
        VerticalLayout::build(&doc, rows, caret)
    }

    fn column_text(column: &Column) -> String {
        column.glyphs.iter().map(|g| g.text.as_str()).collect()
    }

    #[test]
    fn test_one_column_per_short_line() {
        let layout = layout("一行\n二行", 10, None);
        assert_eq!(layout.column_count(), 2);
        assert_eq!(column_text(&layout.columns()[0]), "一行");
        assert_eq!(layout.columns()[1].line, 1);
    }

    #[test]
    fn test_long_line_wraps_into_columns() {
        let layout = layout("あいうえお", 2, None);
        let texts: Vec<String> = layout.columns().iter().map(column_text).collect();
        assert_eq!(texts, vec!["あい", "うえ", "お"]);
        assert!(layout.columns().iter().all(|c| c.line == 0));
    }

    #[test]
    fn test_empty_line_keeps_a_column() {
        let layout = layout("a\n\nb", 5, None);
        assert_eq!(layout.column_count(), 3);
        assert!(layout.columns()[1].glyphs.is_empty());
    }

    #[test]
    fn test_annotated_run_takes_one_row() {
        let layout = layout("平成14年", 10, None);
        let glyphs = &layout.columns()[0].glyphs;
        assert_eq!(glyphs.len(), 4);
        assert_eq!(glyphs[2].text, "14");
        assert_eq!(glyphs[2].kind, GlyphKind::Annotated);
        assert_eq!(glyphs[2].offset, 2);
        assert_eq!(glyphs[3].offset, 4);
    }

    #[test]
    fn test_without_annotation_digits_are_separate_rows() {
        let doc = RichDocument::from_text(
            "平成14年",
            &DisplayOptions {
                annotate_digits: false,
            },
        );
        let layout = VerticalLayout::build(&doc, 10, None);
        assert_eq!(layout.columns()[0].glyphs.len(), 5);
    }

    #[test]
    fn test_punctuation_uses_vertical_forms() {
        let layout = layout("「はい」、", 10, None);
        assert_eq!(column_text(&layout.columns()[0]), "﹁はい﹂︑");
    }

    #[test]
    fn test_caret_on_glyph() {
        let layout = layout("あい\nうえお", 2, Some((1, 2)));
        assert_eq!(layout.caret(), Some(CaretCell { column: 2, row: 0 }));
    }

    #[test]
    fn test_caret_inside_annotated_run_marks_the_run() {
        let layout = layout("第12話", 10, Some((0, 2)));
        assert_eq!(layout.caret(), Some(CaretCell { column: 0, row: 1 }));
    }

    #[test]
    fn test_caret_after_full_column_opens_new_column() {
        let layout = layout("あい\nう", 2, Some((0, 2)));
        assert_eq!(layout.column_count(), 3);
        assert_eq!(layout.caret(), Some(CaretCell { column: 1, row: 0 }));
        assert_eq!(layout.columns()[2].line, 1);
    }

    #[test]
    fn test_caret_on_empty_line() {
        let layout = layout("a\n", 4, Some((1, 0)));
        assert_eq!(layout.caret(), Some(CaretCell { column: 1, row: 0 }));
    }

    #[test]
    fn test_position_at_maps_back_to_offsets() {
        let layout = layout("平成14年", 3, None);
        assert_eq!(layout.position_at(0, 2), Some((0, 2)));
        assert_eq!(layout.position_at(1, 0), Some((0, 4)));
        assert_eq!(layout.position_at(1, 2), Some((0, 5)));
        assert_eq!(layout.position_at(5, 0), None);
    }

    #[test]
    fn test_position_at_in_overflow_column_is_line_end() {
        let layout = layout("あい", 2, Some((0, 2)));
        assert_eq!(layout.position_at(1, 0), Some((0, 2)));
    }

    #[test]
    fn test_scroll_to_show() {
        assert_eq!(scroll_to_show(0, 3, 5), 0);
        assert_eq!(scroll_to_show(0, 7, 5), 3);
        assert_eq!(scroll_to_show(4, 2, 5), 2);
    }

    #[test]
    fn test_visible_columns() {
        assert_eq!(visible_columns(2), 1);
        assert_eq!(visible_columns(5), 2);
        assert_eq!(visible_columns(80), 27);
        assert_eq!(visible_columns(0), 1);
    }
}
