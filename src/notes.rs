use crate::models::NoteBlock;

/// Split lecture notes into typed blocks.
/// `## ` lines are headings, `- ` lines are bullets, other non-blank lines are paragraphs.
pub fn parse_notes(notes: &str) -> Vec<NoteBlock> {
    notes
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| {
            if let Some(heading) = line.strip_prefix("## ") {
                NoteBlock::Heading(heading.trim().to_string())
            } else if let Some(item) = line.strip_prefix("- ") {
                NoteBlock::Bullet(item.trim().to_string())
            } else {
                NoteBlock::Paragraph(line.to_string())
            }
        })
        .collect()
}
