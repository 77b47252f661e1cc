//! Serialized rich form.
//!
//! The editing surface renders paragraphs as
//! `<div class="paragraph">…</div>`, annotated digit runs as
//! `<span class="tate-chu-yoko">…</span>` and empty lines as `<br>`. This
//! module writes that form and reads it back, tolerating markup that was
//! mutated outside of our control.

use thiserror::Error;

use super::types::{Block, ParagraphUnit, RichDocument, Segment};

const PARAGRAPH_CLASS: &str = "paragraph";
const ANNOTATION_CLASS: &str = "tate-chu-yoko";

/// Elements that never have a closing tag.
const VOID_ELEMENTS: &[&str] = &["br", "hr", "img", "input", "meta", "wbr"];

/// Errors from reading serialized markup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MarkupError {
    #[error("unterminated tag at byte {offset}")]
    UnterminatedTag { offset: usize },
    #[error("unexpected closing tag </{tag}> at byte {offset}")]
    UnexpectedClose { tag: String, offset: usize },
    #[error("element <{tag}> is never closed")]
    Unclosed { tag: String },
}

/// Serialize a rich document.
pub fn to_markup(doc: &RichDocument) -> String {
    let mut out = String::new();
    for block in doc.blocks() {
        match block {
            Block::Paragraph(unit) => write_paragraph(&mut out, unit),
            Block::Loose(segment) => write_segment(&mut out, segment),
        }
    }
    out
}

fn write_paragraph(out: &mut String, unit: &ParagraphUnit) {
    out.push_str("<div class=\"paragraph\">");
    for segment in unit.segments() {
        write_segment(out, segment);
    }
    out.push_str("</div>");
}

fn write_segment(out: &mut String, segment: &Segment) {
    match segment {
        Segment::Text(text) => escape_into(out, text),
        Segment::Annotated(text) => {
            out.push_str("<span class=\"tate-chu-yoko\">");
            escape_into(out, text);
            out.push_str("</span>");
        }
        Segment::LineBreak => out.push_str("<br>"),
    }
}

fn escape_into(out: &mut String, text: &str) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
}

/// Plain text of serialized markup. Never fails.
///
/// Well-formed markup is parsed and reversed paragraph by paragraph. If the
/// markup cannot be parsed, every tag is stripped and the remaining text is
/// treated as a single line.
pub fn reverse_markup(markup: &str) -> String {
    match parse_markup(markup) {
        Ok(doc) => doc.to_plain_text(),
        Err(err) => {
            tracing::debug!(%err, "markup fallback to tag stripping");
            strip_tags(markup)
        }
    }
}

fn strip_tags(markup: &str) -> String {
    let mut text = String::new();
    let mut rest = markup;
    while let Some(open) = rest.find('<') {
        text.push_str(&rest[..open]);
        rest = match rest[open..].find('>') {
            Some(close) => &rest[open + close + 1..],
            None => "",
        };
    }
    text.push_str(rest);
    decode_entities(&text)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Role {
    Paragraph,
    Annotation,
    Transparent,
}

#[derive(Debug)]
struct OpenElement {
    name: String,
    role: Role,
}

#[derive(Debug, Default)]
struct Builder {
    blocks: Vec<Block>,
    stack: Vec<OpenElement>,
    paragraph: Option<ParagraphUnit>,
    annotation: Option<String>,
}

impl Builder {
    fn text(&mut self, raw: &str) {
        if raw.is_empty() {
            return;
        }
        let text = decode_entities(raw);
        if let Some(annotation) = self.annotation.as_mut() {
            annotation.push_str(&text);
            return;
        }
        if let Some(unit) = self.paragraph.as_mut() {
            if let Some(Segment::Text(last)) = unit.segments_mut().last_mut() {
                last.push_str(&text);
            } else {
                unit.extend([Segment::Text(text)]);
            }
            return;
        }
        if let Some(Block::Loose(Segment::Text(last))) = self.blocks.last_mut() {
            last.push_str(&text);
        } else {
            self.blocks.push(Block::Loose(Segment::Text(text)));
        }
    }

    fn inline(&mut self, segment: Segment) {
        match self.paragraph.as_mut() {
            Some(unit) => unit.extend([segment]),
            None => self.blocks.push(Block::Loose(segment)),
        }
    }

    fn open(&mut self, name: &str, attrs: &str) {
        if name == "br" {
            if self.annotation.is_none() {
                self.inline(Segment::LineBreak);
            }
            return;
        }
        if VOID_ELEMENTS.contains(&name) {
            return;
        }
        let role = if name == "div" && has_class(attrs, PARAGRAPH_CLASS) && self.paragraph.is_none()
        {
            self.paragraph = Some(ParagraphUnit::default());
            Role::Paragraph
        } else if name == "span" && has_class(attrs, ANNOTATION_CLASS) && self.annotation.is_none()
        {
            self.annotation = Some(String::new());
            Role::Annotation
        } else {
            Role::Transparent
        };
        self.stack.push(OpenElement {
            name: name.to_string(),
            role,
        });
    }

    fn close(&mut self, name: &str, offset: usize) -> Result<(), MarkupError> {
        if VOID_ELEMENTS.contains(&name) {
            return Ok(());
        }
        let Some(open) = self.stack.pop() else {
            return Err(MarkupError::UnexpectedClose {
                tag: name.to_string(),
                offset,
            });
        };
        if open.name != name {
            return Err(MarkupError::UnexpectedClose {
                tag: name.to_string(),
                offset,
            });
        }
        match open.role {
            Role::Paragraph => {
                if let Some(unit) = self.paragraph.take() {
                    self.blocks.push(Block::Paragraph(unit));
                }
            }
            Role::Annotation => {
                if let Some(digits) = self.annotation.take().filter(|d| !d.is_empty()) {
                    self.inline(Segment::Annotated(digits));
                }
            }
            Role::Transparent => {}
        }
        Ok(())
    }

    fn finish(mut self) -> Result<RichDocument, MarkupError> {
        if let Some(open) = self.stack.pop() {
            return Err(MarkupError::Unclosed { tag: open.name });
        }
        Ok(RichDocument::new(self.blocks))
    }
}

/// Parse serialized markup into a rich document.
///
/// Unknown elements are transparent: their text is kept and their markup is
/// dropped. Content outside any paragraph becomes loose blocks.
///
/// # Errors
///
/// Returns an error for unterminated tags, mismatched closing tags, or
/// elements left open at the end of input.
pub fn parse_markup(markup: &str) -> Result<RichDocument, MarkupError> {
    let mut builder = Builder::default();
    let mut pos = 0;
    while let Some(rel) = markup[pos..].find('<') {
        let start = pos + rel;
        builder.text(&markup[pos..start]);
        let Some(len) = markup[start..].find('>') else {
            return Err(MarkupError::UnterminatedTag { offset: start });
        };
        let tag = &markup[start + 1..start + len];
        pos = start + len + 1;

        if let Some(name) = tag.strip_prefix('/') {
            builder.close(&name.trim().to_ascii_lowercase(), start)?;
        } else if !tag.starts_with('!') {
            let tag = tag.trim_end_matches('/').trim();
            let (name, attrs) = tag
                .split_once(char::is_whitespace)
                .unwrap_or((tag, ""));
            builder.open(&name.to_ascii_lowercase(), attrs);
        }
    }
    builder.text(&markup[pos..]);
    builder.finish()
}

fn has_class(attrs: &str, class: &str) -> bool {
    let Some(idx) = attrs.find("class=") else {
        return false;
    };
    let value = &attrs[idx + "class=".len()..];
    let value = match value.chars().next() {
        Some(quote @ ('"' | '\'')) => value[1..].split(quote).next().unwrap_or_default(),
        _ => value.split(char::is_whitespace).next().unwrap_or_default(),
    };
    value.split_whitespace().any(|c| c == class)
}

fn decode_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        rest = &rest[amp..];
        let decoded = rest.find(';').and_then(|semi| {
            let ch = match &rest[1..semi] {
                "amp" => '&',
                "lt" => '<',
                "gt" => '>',
                "quot" => '"',
                "apos" | "#39" => '\'',
                "nbsp" => '\u{a0}',
                _ => return None,
            };
            Some((ch, semi + 1))
        });
        match decoded {
            Some((ch, consumed)) => {
                out.push(ch);
                rest = &rest[consumed..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::transform::display;

    fn rich(source: &str) -> RichDocument {
        RichDocument::from_paragraphs(display(source))
    }

    #[test]
    fn test_to_markup_wraps_paragraphs_and_annotations() {
        let markup = to_markup(&rich("平成14年\n\n "));
        assert_eq!(
            markup,
            "<div class=\"paragraph\">平成<span class=\"tate-chu-yoko\">14</span>年</div>\
             <div class=\"paragraph\"><br></div>\
             <div class=\"paragraph\"> </div>"
        );
    }

    #[test]
    fn test_to_markup_escapes_text() {
        let markup = to_markup(&rich("a<b>&c"));
        assert_eq!(markup, "<div class=\"paragraph\">a&lt;b&gt;&amp;c</div>");
    }

    #[test]
    fn test_parse_markup_reads_back_structure() {
        let doc = rich("平成14年\n\n\u{3000}");
        let parsed = parse_markup(&to_markup(&doc)).unwrap();
        assert_eq!(parsed, doc);
    }

    #[test]
    fn test_parse_markup_accepts_self_closing_breaks() {
        for br in ["<br>", "<br/>", "<br />"] {
            let markup = format!("<div class=\"paragraph\">{br}</div>");
            let doc = parse_markup(&markup).unwrap();
            assert!(doc.paragraph(0).unwrap().is_line_break_only(), "{br}");
        }
    }

    #[test]
    fn test_reverse_markup_round_trips() {
        let source = "1行目\n \n\n第100話 &<>";
        assert_eq!(reverse_markup(&to_markup(&rich(source))), source);
    }

    #[test]
    fn test_reverse_markup_without_paragraphs_is_single_line() {
        assert_eq!(reverse_markup("変更後"), "変更後");
        assert_eq!(
            reverse_markup("前<span class=\"tate-chu-yoko\">12</span>後<br>"),
            "前12後"
        );
    }

    #[test]
    fn test_reverse_markup_of_empty_string() {
        assert_eq!(reverse_markup(""), "");
    }

    #[test]
    fn test_reverse_markup_ignores_unknown_tags() {
        let markup = "<div class=\"paragraph\"><b>太</b>字</div>";
        assert_eq!(reverse_markup(markup), "太字");
    }

    #[test]
    fn test_reverse_markup_falls_back_on_broken_markup() {
        let markup = "<div class=\"paragraph\">abc</span>";
        assert!(parse_markup(markup).is_err());
        assert_eq!(reverse_markup(markup), "abc");
    }

    #[test]
    fn test_parse_markup_reports_unterminated_tag() {
        assert_eq!(
            parse_markup("abc<div"),
            Err(MarkupError::UnterminatedTag { offset: 3 })
        );
        assert_eq!(reverse_markup("abc<div"), "abc");
    }

    #[test]
    fn test_parse_markup_reports_unclosed_element() {
        assert_eq!(
            parse_markup("<div class=\"paragraph\">abc"),
            Err(MarkupError::Unclosed {
                tag: "div".to_string()
            })
        );
    }

    #[test]
    fn test_has_class_handles_multiple_classes_and_quotes() {
        assert!(has_class("class=\"x paragraph\"", "paragraph"));
        assert!(has_class("class='paragraph'", "paragraph"));
        assert!(has_class("id=a class=paragraph", "paragraph"));
        assert!(!has_class("class=\"paragraphs\"", "paragraph"));
    }

    #[test]
    fn test_decode_entities_keeps_unknown_entities() {
        assert_eq!(decode_entities("&amp;&foo;&"), "&&foo;&");
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn markup_round_trip_is_lossless(source in "[0-9a-z<>&年 \u{3000}\n]{0,60}") {
                prop_assert_eq!(reverse_markup(&to_markup(&rich(&source))), source);
            }
        }
    }
}
