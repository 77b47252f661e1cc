//! Core document types.

/// Rendering classification of a single plain-text line.
///
/// Recomputed on every transform; never stored alongside the text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// Zero characters.
    Empty,
    /// Only ASCII spaces and ideographic spaces (U+3000).
    Whitespace,
    /// Anything else.
    Content,
}

impl LineKind {
    /// Classify a line (without its trailing newline).
    pub fn classify(line: &str) -> Self {
        if line.is_empty() {
            Self::Empty
        } else if line.chars().all(is_blank) {
            Self::Whitespace
        } else {
            Self::Content
        }
    }
}

/// Space characters that make a line whitespace-only.
pub const fn is_blank(ch: char) -> bool {
    matches!(ch, ' ' | '\u{3000}')
}

/// A contiguous run inside a paragraph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Plain text, typeset upright in the column.
    Text(String),
    /// A short digit run rendered horizontally inside the vertical column.
    Annotated(String),
    /// Structural placeholder that keeps an empty line visible and caret-reachable.
    LineBreak,
}

impl Segment {
    /// Plain-text content of the segment. Line-break markers have none.
    pub fn text(&self) -> &str {
        match self {
            Self::Text(text) | Self::Annotated(text) => text,
            Self::LineBreak => "",
        }
    }

    /// Whether the caret can sit inside this segment.
    pub const fn is_text_bearing(&self) -> bool {
        matches!(self, Self::Text(_) | Self::Annotated(_))
    }

    /// Length in chars.
    pub fn char_len(&self) -> usize {
        self.text().chars().count()
    }
}

/// The rich counterpart of one plain-text line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParagraphUnit {
    segments: Vec<Segment>,
}

impl ParagraphUnit {
    /// Create a paragraph from its segments.
    pub const fn new(segments: Vec<Segment>) -> Self {
        Self { segments }
    }

    /// The representation of an empty line.
    pub fn line_break() -> Self {
        Self::new(vec![Segment::LineBreak])
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub(crate) const fn segments_mut(&mut self) -> &mut Vec<Segment> {
        &mut self.segments
    }

    /// Remove and return every segment, leaving the paragraph childless.
    pub fn take_segments(&mut self) -> Vec<Segment> {
        std::mem::take(&mut self.segments)
    }

    /// Append segments in order.
    pub fn extend(&mut self, segments: impl IntoIterator<Item = Segment>) {
        self.segments.extend(segments);
    }

    /// True when the paragraph holds exactly one line-break marker and nothing else.
    pub fn is_line_break_only(&self) -> bool {
        matches!(self.segments.as_slice(), [Segment::LineBreak])
    }

    /// Concatenated text of all segments.
    pub fn text(&self) -> String {
        self.segments.iter().map(Segment::text).collect()
    }

    /// Total length in chars.
    pub fn char_len(&self) -> usize {
        self.segments.iter().map(Segment::char_len).sum()
    }

    /// Text-bearing segments with their indices, in reading order.
    pub fn leaves(&self) -> impl Iterator<Item = (usize, &str)> {
        self.segments
            .iter()
            .enumerate()
            .filter(|(_, segment)| segment.is_text_bearing())
            .map(|(idx, segment)| (idx, segment.text()))
    }
}

/// A top-level entry of the rich document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Paragraph(ParagraphUnit),
    /// Inline content that lost its paragraph wrapper (external mutation).
    Loose(Segment),
}

/// The rich, paragraph-structured representation of a document.
///
/// Blocks live in a flat arena and are addressed by index; cursor locations
/// carry the index of the paragraph block they belong to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RichDocument {
    blocks: Vec<Block>,
}

impl RichDocument {
    pub const fn new(blocks: Vec<Block>) -> Self {
        Self { blocks }
    }

    /// Build a well-formed document where every block is a paragraph.
    pub fn from_paragraphs(paragraphs: Vec<ParagraphUnit>) -> Self {
        Self::new(paragraphs.into_iter().map(Block::Paragraph).collect())
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// The paragraph at block index `idx`, if that block is a paragraph.
    pub fn paragraph(&self, idx: usize) -> Option<&ParagraphUnit> {
        match self.blocks.get(idx)? {
            Block::Paragraph(unit) => Some(unit),
            Block::Loose(_) => None,
        }
    }

    pub fn paragraph_mut(&mut self, idx: usize) -> Option<&mut ParagraphUnit> {
        match self.blocks.get_mut(idx)? {
            Block::Paragraph(unit) => Some(unit),
            Block::Loose(_) => None,
        }
    }

    /// Paragraphs with their block indices, in document order.
    pub fn paragraphs(&self) -> impl Iterator<Item = (usize, &ParagraphUnit)> {
        self.blocks
            .iter()
            .enumerate()
            .filter_map(|(idx, block)| match block {
                Block::Paragraph(unit) => Some((idx, unit)),
                Block::Loose(_) => None,
            })
    }

    pub fn paragraph_count(&self) -> usize {
        self.paragraphs().count()
    }

    /// Block index of the nearest paragraph before `idx`.
    pub fn previous_paragraph(&self, idx: usize) -> Option<usize> {
        let end = idx.min(self.blocks.len());
        self.blocks[..end]
            .iter()
            .rposition(|block| matches!(block, Block::Paragraph(_)))
    }

    /// Block index of the nearest paragraph after `idx`.
    pub fn next_paragraph(&self, idx: usize) -> Option<usize> {
        self.blocks
            .iter()
            .enumerate()
            .skip(idx.saturating_add(1))
            .find(|(_, block)| matches!(block, Block::Paragraph(_)))
            .map(|(i, _)| i)
    }

    pub fn first_paragraph(&self) -> Option<usize> {
        self.paragraphs().next().map(|(idx, _)| idx)
    }

    pub fn last_paragraph(&self) -> Option<usize> {
        self.blocks
            .iter()
            .rposition(|block| matches!(block, Block::Paragraph(_)))
    }

    /// Insert a paragraph so that it ends up at block index `idx`.
    pub fn insert_paragraph(&mut self, idx: usize, unit: ParagraphUnit) {
        let idx = idx.min(self.blocks.len());
        self.blocks.insert(idx, Block::Paragraph(unit));
    }

    /// Insert paragraphs in order so the first one ends up at block index `idx`.
    pub fn insert_paragraphs(
        &mut self,
        idx: usize,
        units: impl IntoIterator<Item = ParagraphUnit>,
    ) {
        let idx = idx.min(self.blocks.len());
        let tail = self.blocks.split_off(idx);
        self.blocks.extend(units.into_iter().map(Block::Paragraph));
        self.blocks.extend(tail);
    }

    /// Remove the block at `idx`, shifting later blocks down by one.
    pub fn remove_block(&mut self, idx: usize) -> Option<Block> {
        (idx < self.blocks.len()).then(|| self.blocks.remove(idx))
    }

    /// Reconstruct the plain-text document.
    ///
    /// Paragraphs become lines joined with `\n`. When no paragraph structure
    /// survives, all loose content is read back as a single line.
    pub fn to_plain_text(&self) -> String {
        if self.paragraphs().next().is_none() {
            return self
                .blocks
                .iter()
                .map(|block| match block {
                    Block::Loose(segment) => segment.text(),
                    Block::Paragraph(_) => "",
                })
                .collect();
        }
        let lines: Vec<String> = self.paragraphs().map(|(_, unit)| unit.text()).collect();
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> Segment {
        Segment::Text(s.to_string())
    }

    #[test]
    fn test_classify_empty_line() {
        assert_eq!(LineKind::classify(""), LineKind::Empty);
    }

    #[test]
    fn test_classify_space_and_ideographic_space_as_whitespace() {
        assert_eq!(LineKind::classify(" "), LineKind::Whitespace);
        assert_eq!(LineKind::classify("\u{3000}\u{3000}"), LineKind::Whitespace);
        assert_eq!(LineKind::classify(" \u{3000} "), LineKind::Whitespace);
    }

    #[test]
    fn test_classify_tab_is_content() {
        assert_eq!(LineKind::classify("\t"), LineKind::Content);
        assert_eq!(LineKind::classify(" あ "), LineKind::Content);
    }

    #[test]
    fn test_line_break_segment_has_no_text() {
        assert_eq!(Segment::LineBreak.text(), "");
        assert!(!Segment::LineBreak.is_text_bearing());
        assert_eq!(Segment::LineBreak.char_len(), 0);
    }

    #[test]
    fn test_paragraph_text_and_char_len_count_chars() {
        let unit = ParagraphUnit::new(vec![
            text("平成"),
            Segment::Annotated("14".to_string()),
            text("年"),
        ]);
        assert_eq!(unit.text(), "平成14年");
        assert_eq!(unit.char_len(), 5);
    }

    #[test]
    fn test_leaves_skip_line_breaks() {
        let unit = ParagraphUnit::new(vec![text("a"), Segment::LineBreak, text("b")]);
        let leaves: Vec<_> = unit.leaves().collect();
        assert_eq!(leaves, vec![(0, "a"), (2, "b")]);
    }

    #[test]
    fn test_is_line_break_only() {
        assert!(ParagraphUnit::line_break().is_line_break_only());
        assert!(!ParagraphUnit::new(vec![]).is_line_break_only());
        assert!(!ParagraphUnit::new(vec![text("a"), Segment::LineBreak]).is_line_break_only());
    }

    #[test]
    fn test_previous_and_next_paragraph_skip_loose_blocks() {
        let doc = RichDocument::new(vec![
            Block::Paragraph(ParagraphUnit::new(vec![text("a")])),
            Block::Loose(text("stray")),
            Block::Paragraph(ParagraphUnit::new(vec![text("b")])),
        ]);
        assert_eq!(doc.previous_paragraph(2), Some(0));
        assert_eq!(doc.previous_paragraph(0), None);
        assert_eq!(doc.next_paragraph(0), Some(2));
        assert_eq!(doc.next_paragraph(2), None);
        assert_eq!(doc.paragraph_count(), 2);
    }

    #[test]
    fn test_plain_text_ignores_loose_blocks_when_paragraphs_exist() {
        let doc = RichDocument::new(vec![
            Block::Paragraph(ParagraphUnit::new(vec![text("a")])),
            Block::Loose(text("stray")),
            Block::Paragraph(ParagraphUnit::line_break()),
        ]);
        assert_eq!(doc.to_plain_text(), "a\n");
    }

    #[test]
    fn test_plain_text_without_paragraphs_is_single_line() {
        let doc = RichDocument::new(vec![
            Block::Loose(text("一")),
            Block::Loose(Segment::Annotated("12".to_string())),
            Block::Loose(Segment::LineBreak),
            Block::Loose(text("二")),
        ]);
        assert_eq!(doc.to_plain_text(), "一12二");
    }

    #[test]
    fn test_empty_rich_document_is_empty_text() {
        assert_eq!(RichDocument::default().to_plain_text(), "");
    }

    #[test]
    fn test_insert_paragraphs_keeps_order() {
        let mut doc = RichDocument::from_paragraphs(vec![
            ParagraphUnit::new(vec![Segment::Text("a".to_string())]),
            ParagraphUnit::new(vec![Segment::Text("d".to_string())]),
        ]);
        doc.insert_paragraphs(
            1,
            ["b", "c"].map(|t| ParagraphUnit::new(vec![Segment::Text(t.to_string())])),
        );
        assert_eq!(doc.to_plain_text(), "a\nb\nc\nd");
        doc.insert_paragraphs(99, [ParagraphUnit::line_break()]);
        assert_eq!(doc.to_plain_text(), "a\nb\nc\nd\n");
    }

    #[test]
    fn test_remove_block_out_of_range_is_none() {
        let mut doc = RichDocument::from_paragraphs(vec![ParagraphUnit::line_break()]);
        assert!(doc.remove_block(3).is_none());
        assert!(doc.remove_block(0).is_some());
        assert_eq!(doc.block_count(), 0);
    }
}
