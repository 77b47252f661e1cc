//! Plain-text documents and their rich, paragraph-structured form.
//!
//! This module handles:
//! - Detecting short digit runs for combined (tate-chu-yoko) display
//! - Converting plain text to paragraph units and back
//! - Writing and reading the serialized rich markup

mod annotate;
mod markup;
mod transform;
mod types;

pub use annotate::digit_runs;
pub use markup::{MarkupError, parse_markup, reverse_markup, to_markup};
pub use transform::{DisplayOptions, display, display_with, paragraph_for_line, reverse};
pub use types::{Block, LineKind, ParagraphUnit, RichDocument, Segment, is_blank};

impl RichDocument {
    /// Build the rich document for a plain-text document.
    pub fn from_text(text: &str, options: &DisplayOptions) -> Self {
        Self::from_paragraphs(display_with(text, options))
    }
}

/// Normalize text read from disk before it is handed to the display transform.
///
/// A leading byte-order mark is dropped; everything else, including `\r`,
/// is kept so saving writes back exactly what was read.
pub fn prepare_content(content: String) -> String {
    match content.strip_prefix('\u{feff}') {
        Some(stripped) => stripped.to_string(),
        None => content,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_text_builds_one_paragraph_per_line() {
        let doc = RichDocument::from_text("一\n\n三", &DisplayOptions::default());
        assert_eq!(doc.paragraph_count(), 3);
        assert_eq!(doc.to_plain_text(), "一\n\n三");
    }

    #[test]
    fn test_prepare_content_strips_bom() {
        assert_eq!(prepare_content("\u{feff}本文".to_string()), "本文");
    }

    #[test]
    fn test_prepare_content_passes_text_through() {
        let content = "本文\r\n 二行目".to_string();
        assert_eq!(prepare_content(content.clone()), content);
    }
}
