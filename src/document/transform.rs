//! Conversion between plain text and paragraph units.

use tracing::trace;

use super::annotate::digit_runs;
use super::types::{LineKind, ParagraphUnit, Segment};

/// Options for the display transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayOptions {
    /// Mark isolated 2-3 digit runs for combined (tate-chu-yoko) rendering.
    pub annotate_digits: bool,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            annotate_digits: true,
        }
    }
}

/// Convert a plain-text document into one paragraph unit per line.
///
/// Lines are split on `\n` only. No trimming is applied, so the number of
/// paragraphs always equals the number of lines.
pub fn display(text: &str) -> Vec<ParagraphUnit> {
    display_with(text, &DisplayOptions::default())
}

/// [`display`] with explicit options.
pub fn display_with(text: &str, options: &DisplayOptions) -> Vec<ParagraphUnit> {
    let _scope = crate::perf::scope("document.display");
    let units: Vec<ParagraphUnit> = text
        .split('\n')
        .map(|line| paragraph_for_line(line, options))
        .collect();
    trace!(paragraphs = units.len(), bytes = text.len(), "display transform");
    units
}

/// Build the paragraph unit for a single line.
pub fn paragraph_for_line(line: &str, options: &DisplayOptions) -> ParagraphUnit {
    match LineKind::classify(line) {
        LineKind::Empty => ParagraphUnit::line_break(),
        // Never collapse to a line break; the reverse transform would read it as empty.
        LineKind::Whitespace => ParagraphUnit::new(vec![Segment::Text(line.to_string())]),
        LineKind::Content if options.annotate_digits => annotated_paragraph(line),
        LineKind::Content => ParagraphUnit::new(vec![Segment::Text(line.to_string())]),
    }
}

fn annotated_paragraph(line: &str) -> ParagraphUnit {
    let mut segments = Vec::new();
    let mut cursor = 0;
    for range in digit_runs(line) {
        if range.start > cursor {
            segments.push(Segment::Text(line[cursor..range.start].to_string()));
        }
        segments.push(Segment::Annotated(line[range.clone()].to_string()));
        cursor = range.end;
    }
    if cursor < line.len() {
        segments.push(Segment::Text(line[cursor..].to_string()));
    }
    ParagraphUnit::new(segments)
}

/// Convert paragraph units back into the plain-text document.
///
/// Annotated runs contribute only their digits and a paragraph holding just
/// a line-break marker yields an empty line.
pub fn reverse(units: &[ParagraphUnit]) -> String {
    let lines: Vec<String> = units.iter().map(ParagraphUnit::text).collect();
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> Segment {
        Segment::Text(s.to_string())
    }

    fn annotated(s: &str) -> Segment {
        Segment::Annotated(s.to_string())
    }

    #[test]
    fn test_display_splits_lines_into_paragraphs() {
        let units = display("テスト\n2行目");
        assert_eq!(units.len(), 2);
        assert_eq!(units[0].text(), "テスト");
        assert_eq!(units[1].text(), "2行目");
    }

    #[test]
    fn test_display_empty_line_becomes_line_break() {
        let units = display("第1行目\n\n第3行目");
        assert_eq!(units.len(), 3);
        assert!(units[1].is_line_break_only());
        assert!(!units[0].is_line_break_only());
        assert!(!units[2].is_line_break_only());
    }

    #[test]
    fn test_display_consecutive_empty_lines() {
        let units = display("a\n\n\nb");
        assert_eq!(units.len(), 4);
        assert!(units[1].is_line_break_only());
        assert!(units[2].is_line_break_only());
    }

    #[test]
    fn test_display_whitespace_line_keeps_literal_text() {
        let units = display("1行目\n \n3行目");
        assert_eq!(units[1].segments(), &[text(" ")]);
        let units = display("\u{3000}");
        assert_eq!(units[0].segments(), &[text("\u{3000}")]);
    }

    #[test]
    fn test_display_annotates_digit_runs_in_order() {
        let units = display("平成14年3月10日");
        assert_eq!(
            units[0].segments(),
            &[
                text("平成"),
                annotated("14"),
                text("年3月"),
                annotated("10"),
                text("日"),
            ]
        );
    }

    #[test]
    fn test_display_line_that_is_only_a_digit_run() {
        let units = display("42");
        assert_eq!(units[0].segments(), &[annotated("42")]);
    }

    #[test]
    fn test_display_leaves_long_numbers_alone() {
        let units = display("1234年");
        assert_eq!(units[0].segments(), &[text("1234年")]);
    }

    #[test]
    fn test_display_without_annotation() {
        let options = DisplayOptions {
            annotate_digits: false,
        };
        let units = display_with("平成14年", &options);
        assert_eq!(units[0].segments(), &[text("平成14年")]);
    }

    #[test]
    fn test_display_empty_document_is_single_empty_paragraph() {
        let units = display("");
        assert_eq!(units.len(), 1);
        assert!(units[0].is_line_break_only());
        assert_eq!(reverse(&units), "");
    }

    #[test]
    fn test_display_keeps_carriage_return_as_content() {
        let units = display("a\r\nb");
        assert_eq!(units[0].text(), "a\r");
        assert_eq!(reverse(&units), "a\r\nb");
    }

    #[test]
    fn test_reverse_line_break_paragraph_is_empty_line() {
        let units = vec![
            ParagraphUnit::new(vec![text("a")]),
            ParagraphUnit::line_break(),
            ParagraphUnit::new(vec![text("b")]),
        ];
        assert_eq!(reverse(&units), "a\n\nb");
    }

    #[test]
    fn test_reverse_strips_annotation_markup() {
        let units = vec![ParagraphUnit::new(vec![
            text("平成"),
            annotated("14"),
            text("年"),
        ])];
        assert_eq!(reverse(&units), "平成14年");
    }

    #[test]
    fn test_round_trip_preserves_whitespace_lines() {
        for source in ["1行目\n \n3行目", "\u{3000}\n\n  \n", "\n", "末尾\n"] {
            assert_eq!(reverse(&display(source)), source);
        }
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn round_trip_is_lossless(source in "[0-9a-zあ年 \u{3000}\n]{0,80}") {
                prop_assert_eq!(reverse(&display(&source)), source);
            }

            #[test]
            fn paragraph_count_matches_line_count(source in "[0-9a あ\n]{0,60}") {
                prop_assert_eq!(display(&source).len(), source.split('\n').count());
            }

            #[test]
            fn segments_never_hold_empty_text(source in "[0-9a-z\n]{0,60}") {
                for unit in display(&source) {
                    for segment in unit.segments() {
                        prop_assert!(segment == &Segment::LineBreak || !segment.text().is_empty());
                    }
                }
            }
        }
    }
}
