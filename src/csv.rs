use crate::models::Flashcard;

pub const EXPORT_HEADER: [&str; 2] = ["Question", "Answer"];

/// Escape one field: double embedded quotes, collapse line breaks to a space, wrap in quotes.
pub fn escape_field(field: &str) -> String {
    let flattened = field.replace("\r\n", " ").replace(['\n', '\r'], " ");
    format!("\"{}\"", flattened.replace('"', "\"\""))
}

/// Encode a deck as tab-separated text with a `Question\tAnswer` header row.
pub fn encode_deck(cards: &[Flashcard]) -> String {
    let mut out = EXPORT_HEADER.join("\t");
    out.push('\n');

    for card in cards {
        out.push_str(&escape_field(&card.question));
        out.push('\t');
        out.push_str(&escape_field(&card.answer));
        out.push('\n');
    }

    out
}

/// Split one tab-separated line into fields, undoing quote wrapping and doubling.
pub fn parse_tsv_line(line: &str) -> Vec<String> {
    let mut chars = line.chars().peekable();
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    while let Some(c) = chars.next() {
        match c {
            '"' if !in_quotes && current.is_empty() => {
                in_quotes = true;
            }
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    current.push('"');
                } else {
                    in_quotes = false;
                }
            }
            '\t' if !in_quotes => {
                fields.push(std::mem::take(&mut current));
            }
            _ => {
                current.push(c);
            }
        }
    }
    fields.push(current);

    fields
}

/// Read an exported deck back into cards. The header row and malformed rows are skipped.
pub fn parse_deck(content: &str) -> Vec<Flashcard> {
    content
        .lines()
        .skip(1)
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| {
            let mut fields = parse_tsv_line(line).into_iter();
            match (fields.next(), fields.next(), fields.next()) {
                (Some(question), Some(answer), None) => Some(Flashcard { question, answer }),
                _ => None,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_header_only_for_empty_deck() {
        assert_eq!(encode_deck(&[]), "Question\tAnswer\n");
    }

    #[test]
    fn test_encode_simple_rows() {
        let cards = vec![
            Flashcard::new("2+2?", "4"),
            Flashcard::new("Capital of France?", "Paris"),
        ];
        assert_eq!(
            encode_deck(&cards),
            "Question\tAnswer\n\"2+2?\"\t\"4\"\n\"Capital of France?\"\t\"Paris\"\n"
        );
    }

    #[test]
    fn test_escape_field_quotes_and_newlines() {
        assert_eq!(escape_field("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(escape_field("line1\nline2"), "\"line1 line2\"");
        assert_eq!(escape_field("a\r\nb"), "\"a b\"");
    }

    #[test]
    fn test_round_trip_with_quotes_and_newlines() {
        let cards = vec![
            Flashcard::new("What does \"idempotent\" mean?", "Same result\nwhen repeated"),
            Flashcard::new("Tab\tinside?", "Yes, \"quoted\" tab"),
        ];
        let parsed = parse_deck(&encode_deck(&cards));

        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0].question, "What does \"idempotent\" mean?");
        // Line breaks are flattened on export.
        assert_eq!(parsed[0].answer, "Same result when repeated");
        assert_eq!(parsed[1].question, "Tab\tinside?");
        assert_eq!(parsed[1].answer, "Yes, \"quoted\" tab");
    }

    #[test]
    fn test_round_trip_without_newlines_is_exact() {
        let cards = vec![
            Flashcard::new("\"\"", "\""),
            Flashcard::new("", "plain"),
            Flashcard::new("ends with quote\"", "\"starts with quote"),
        ];
        assert_eq!(parse_deck(&encode_deck(&cards)), cards);
    }

    #[test]
    fn test_encoded_deck_reads_with_standard_tsv_reader() {
        let cards = vec![
            Flashcard::new("What does \"idempotent\" mean?", "Same result\nwhen repeated"),
            Flashcard::new("Tab\tinside?", "Yes, \"quoted\" tab"),
            Flashcard::new("", "\""),
        ];
        let encoded = encode_deck(&cards);

        let mut reader = ::csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .from_reader(encoded.as_bytes());
        let headers = reader.headers().unwrap().clone();
        assert_eq!(headers.iter().collect::<Vec<_>>(), EXPORT_HEADER);

        let rows: Vec<Vec<String>> = reader
            .records()
            .map(|record| record.unwrap().iter().map(String::from).collect())
            .collect();
        assert_eq!(
            rows,
            vec![
                vec!["What does \"idempotent\" mean?", "Same result when repeated"],
                vec!["Tab\tinside?", "Yes, \"quoted\" tab"],
                vec!["", "\""],
            ]
        );
        assert_eq!(parse_deck(&encoded), {
            let mut expected = cards.clone();
            expected[0].answer = "Same result when repeated".into();
            expected
        });
    }

    #[test]
    fn test_parse_tsv_line_unquoted() {
        assert_eq!(parse_tsv_line("a\tb"), vec!["a", "b"]);
        assert_eq!(parse_tsv_line("\t"), vec!["", ""]);
    }

    #[test]
    fn test_parse_tsv_line_escaped_quotes() {
        let fields = parse_tsv_line("\"What is \"\"quoted\"\"?\"\t\"Answer\"");
        assert_eq!(fields, vec!["What is \"quoted\"?", "Answer"]);
    }

    #[test]
    fn test_parse_deck_skips_bad_rows() {
        let content = "Question\tAnswer\n\"only one field\"\n\n\"q\"\t\"a\"\n\"x\"\t\"y\"\t\"z\"\n";
        let cards = parse_deck(content);
        assert_eq!(cards, vec![Flashcard::new("q", "a")]);
    }
}
