use crate::models::NoteBlock;
use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
};
use regex::Regex;

lazy_static::lazy_static! {
    static ref INLINE_RE: Regex = Regex::new(r"\*\*(.+?)\*\*|`([^`]+)`").unwrap();
}

/// Render parsed lecture notes: headings get a blank line above them,
/// bullets are indented, every block supports inline `**bold**` and `code`.
pub fn render_notes(blocks: &[NoteBlock]) -> Vec<Line<'static>> {
    let mut result: Vec<Line<'static>> = Vec::new();

    for block in blocks {
        match block {
            NoteBlock::Heading(text) => {
                if !result.is_empty() {
                    result.push(Line::from(""));
                }
                let style = Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD | Modifier::UNDERLINED);
                let spans: Vec<Span<'static>> = parse_inline(text)
                    .into_iter()
                    .map(|s| Span::styled(s.content, style.patch(s.style)))
                    .collect();
                result.push(Line::from(spans));
            }
            NoteBlock::Bullet(text) => {
                let mut spans = vec![Span::from("  • ")];
                spans.extend(parse_inline(text));
                result.push(Line::from(spans));
            }
            NoteBlock::Paragraph(text) => {
                result.push(Line::from(parse_inline(text)));
            }
        }
    }

    result
}

/// Parse inline markers: **bold** and `code`. Unmatched markers stay literal.
pub fn parse_inline(text: &str) -> Vec<Span<'static>> {
    let mut spans = Vec::new();
    let mut last = 0;

    for caps in INLINE_RE.captures_iter(text) {
        let Some(whole) = caps.get(0) else { continue };
        if whole.start() > last {
            spans.push(Span::from(text[last..whole.start()].to_string()));
        }
        if let Some(bold) = caps.get(1) {
            spans.push(Span::styled(
                bold.as_str().to_string(),
                Style::default().add_modifier(Modifier::BOLD),
            ));
        } else if let Some(code) = caps.get(2) {
            spans.push(Span::styled(
                code.as_str().to_string(),
                Style::default().add_modifier(Modifier::DIM),
            ));
        }
        last = whole.end();
    }

    if last < text.len() {
        spans.push(Span::from(text[last..].to_string()));
    }
    if spans.is_empty() {
        spans.push(Span::from(text.to_string()));
    }
    spans
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line_text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_parse_inline_plain() {
        let spans = parse_inline("just text");
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].content, "just text");
    }

    #[test]
    fn test_parse_inline_bold() {
        let spans = parse_inline("a **key** idea");
        assert_eq!(spans.len(), 3);
        assert_eq!(spans[1].content, "key");
        assert!(spans[1].style.add_modifier.contains(Modifier::BOLD));
        assert_eq!(spans[2].content, " idea");
    }

    #[test]
    fn test_parse_inline_code_and_unclosed_marker() {
        let spans = parse_inline("call `len()` on **open");
        assert_eq!(spans[1].content, "len()");
        assert!(spans[1].style.add_modifier.contains(Modifier::DIM));
        assert_eq!(spans[2].content, " on **open");
    }

    #[test]
    fn test_render_notes_blocks() {
        let blocks = vec![
            NoteBlock::Heading("Intro".into()),
            NoteBlock::Bullet("first **point**".into()),
            NoteBlock::Paragraph("Closing words".into()),
            NoteBlock::Heading("Next".into()),
        ];
        let lines = render_notes(&blocks);
        let texts: Vec<String> = lines.iter().map(line_text).collect();
        assert_eq!(
            texts,
            vec!["Intro", "  • first point", "Closing words", "", "Next"]
        );
        assert!(
            lines[0].spans[0]
                .style
                .add_modifier
                .contains(Modifier::UNDERLINED)
        );
    }

    #[test]
    fn test_render_notes_empty() {
        assert!(render_notes(&[]).is_empty());
    }
}
