use ratatui::prelude::*;
use ratatui::widgets::Clear;

use crate::app::Model;

use super::layout::{COLUMN_CELLS, COLUMN_PITCH, GlyphKind, VerticalLayout, visible_columns};
use super::{FOOTER_ROWS, status};

/// Render the complete UI.
pub fn render(model: &Model, frame: &mut Frame) {
    let area = frame.area();
    let doc_area = Rect {
        height: area.height.saturating_sub(FOOTER_ROWS),
        ..area
    };
    let toast_area = Rect {
        y: area.y + area.height.saturating_sub(2),
        height: 1.min(area.height),
        ..area
    };
    let status_area = Rect {
        y: area.y + area.height.saturating_sub(1),
        height: 1.min(area.height),
        ..area
    };

    frame.render_widget(Clear, doc_area);
    let layout = VerticalLayout::build(
        model.surface.document(),
        usize::from(doc_area.height),
        Some(model.surface.caret_line()),
    );
    render_columns(&layout, model.scroll, frame.buffer_mut(), doc_area);

    if area.height >= FOOTER_ROWS {
        status::render_toast_bar(model, frame, toast_area);
    }
    status::render_status_bar(model, frame, status_area);
}

/// Draw columns right to left starting with column `scroll`.
pub(super) fn render_columns(layout: &VerticalLayout, scroll: usize, buf: &mut Buffer, area: Rect) {
    if area.width == 0 || area.height == 0 {
        return;
    }
    let caret = layout.caret();
    let visible = visible_columns(area.width);
    let caret_style = Style::default().bg(Color::White).fg(Color::Black);
    let annotated_style = Style::default().add_modifier(Modifier::BOLD);

    for (slot, (index, column)) in layout
        .columns()
        .iter()
        .enumerate()
        .skip(scroll)
        .take(visible)
        .enumerate()
    {
        let Some(x) = column_x(area, slot) else {
            break;
        };
        let caret_row = caret
            .filter(|c| c.column == index)
            .map(|c| c.row);

        for (row, glyph) in column.glyphs.iter().enumerate() {
            let Ok(row) = u16::try_from(row) else {
                break;
            };
            if row >= area.height {
                break;
            }
            let mut style = match glyph.kind {
                GlyphKind::Plain => Style::default(),
                GlyphKind::Annotated => annotated_style,
            };
            if caret_row == Some(usize::from(row)) {
                style = caret_style;
            }
            // Annotated runs may spill into the gap after the column.
            let max_width = match glyph.kind {
                GlyphKind::Plain => usize::from(COLUMN_CELLS),
                GlyphKind::Annotated => glyph.width().clamp(1, usize::from(COLUMN_PITCH)),
            };
            let max_width = max_width.min(usize::from(area.right().saturating_sub(x)));
            buf.set_stringn(x, area.y + row, &glyph.text, max_width, style);
        }

        if let Some(row) = caret_row
            && row >= column.glyphs.len()
            && let Ok(row) = u16::try_from(row)
            && row < area.height
        {
            // Caret after the last glyph: draw an empty highlighted cell.
            buf.set_stringn(x, area.y + row, "  ", usize::from(COLUMN_CELLS), caret_style);
        }
    }
}

/// Left edge of the `slot`-th visible column counted from the right.
fn column_x(area: Rect, slot: usize) -> Option<u16> {
    let slot = u16::try_from(slot).ok()?;
    let from_right = slot.checked_mul(COLUMN_PITCH)?.checked_add(COLUMN_CELLS)?;
    let x = area.right().checked_sub(from_right)?;
    (x >= area.x).then_some(x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{DisplayOptions, RichDocument};

    fn draw(text: &str, width: u16, height: u16, caret: Option<(usize, usize)>) -> Buffer {
        let doc = RichDocument::from_text(text, &DisplayOptions::default());
        let layout = VerticalLayout::build(&doc, usize::from(height), caret);
        let area = Rect::new(0, 0, width, height);
        let mut buf = Buffer::empty(area);
        render_columns(&layout, 0, &mut buf, area);
        buf
    }

    #[test]
    fn test_column_x_counts_from_right() {
        let area = Rect::new(0, 0, 10, 5);
        assert_eq!(column_x(area, 0), Some(8));
        assert_eq!(column_x(area, 1), Some(5));
        assert_eq!(column_x(area, 3), None);
    }

    #[test]
    fn test_first_line_is_rightmost_column() {
        let buf = draw("あい\nう", 6, 3, None);
        assert_eq!(buf[(4, 0)].symbol(), "あ");
        assert_eq!(buf[(4, 1)].symbol(), "い");
        assert_eq!(buf[(1, 0)].symbol(), "う");
    }

    #[test]
    fn test_annotated_run_drawn_horizontally_in_one_row() {
        let buf = draw("第12話", 3, 3, None);
        assert_eq!(buf[(1, 0)].symbol(), "第");
        assert_eq!(buf[(1, 1)].symbol(), "1");
        assert_eq!(buf[(2, 1)].symbol(), "2");
        assert_eq!(buf[(1, 2)].symbol(), "話");
        assert!(buf[(1, 1)].modifier.contains(Modifier::BOLD));
    }

    #[test]
    fn test_caret_cell_is_highlighted() {
        let buf = draw("あい", 3, 3, Some((0, 1)));
        assert_eq!(buf[(1, 1)].bg, Color::White);
        assert_ne!(buf[(1, 0)].bg, Color::White);
    }

    #[test]
    fn test_caret_at_line_end_highlights_empty_cell() {
        let buf = draw("あ", 3, 3, Some((0, 1)));
        assert_eq!(buf[(1, 1)].bg, Color::White);
    }
}
