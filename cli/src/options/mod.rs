//! Parser and serializer for the options sub-grammar.
//!
//! An options cell is a multi-line mini-format, one record per line:
//!
//! ```text
//! 5:greet:Hello there
//! farewell:Goodbye
//! # kept verbatim
//! ```
//!
//! Matching is first-match-wins: a line is `Prioritized` only when its
//! first colon-delimited token is all ASCII digits AND a second
//! colon-delimited id follows; otherwise `Plain`; otherwise `Raw`.
//!
//! Parsing never trims. Whitespace-only lines are stored exactly as they
//! appear, so `build(parse(s)) == s` holds for every input, including
//! `#`-prefixed lines (one with a colon parses as `Plain` and rebuilds
//! byte-identically; one without falls through to `Raw`).

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::OptionRecord;

/// `<digits>:<id>:<text>`
static PRIORITIZED: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d+):([^:]+):(.*)$").unwrap());

/// `<id>:<text>`
static PLAIN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^([^:]+):(.*)$").unwrap());

/// Parse an options cell into records, one per line.
///
/// A completely empty cell parses to no records, which [`build`] turns
/// back into the empty string.
pub fn parse(cell: &str) -> Vec<OptionRecord> {
    if cell.is_empty() {
        return Vec::new();
    }
    cell.split('\n').map(parse_line).collect()
}

fn parse_line(line: &str) -> OptionRecord {
    if line.trim().is_empty() {
        return OptionRecord::Raw { raw: line.to_string() };
    }

    if let Some(caps) = PRIORITIZED.captures(line) {
        return OptionRecord::Prioritized {
            priority: caps[1].to_string(),
            id: caps[2].to_string(),
            text: caps[3].to_string(),
        };
    }

    if let Some(caps) = PLAIN.captures(line) {
        return OptionRecord::Plain {
            id: caps[1].to_string(),
            text: caps[2].to_string(),
        };
    }

    OptionRecord::Raw { raw: line.to_string() }
}

/// Serialize records back into cell text. Inverse of [`parse`].
///
/// Lines are joined with a single `\n`; no trailing newline is appended.
pub fn build(records: &[OptionRecord]) -> String {
    let lines: Vec<String> = records
        .iter()
        .map(|record| match record {
            OptionRecord::Raw { raw } => raw.clone(),
            OptionRecord::Prioritized { priority, id, text } => {
                format!("{}:{}:{}", priority, id, text)
            }
            OptionRecord::Plain { id, text } => format!("{}:{}", id, text),
        })
        .collect();

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roundtrip(s: &str) {
        assert_eq!(build(&parse(s)), s, "round-trip failed for {:?}", s);
    }

    #[test]
    fn test_parse_prioritized_and_plain() {
        let records = parse("5:greet:Hello\nfarewell:Bye");
        assert_eq!(
            records,
            vec![
                OptionRecord::Prioritized {
                    priority: "5".into(),
                    id: "greet".into(),
                    text: "Hello".into(),
                },
                OptionRecord::Plain {
                    id: "farewell".into(),
                    text: "Bye".into(),
                },
            ]
        );
        assert_eq!(build(&records), "5:greet:Hello\nfarewell:Bye");
    }

    #[test]
    fn test_digits_without_second_id_are_plain() {
        // "12:34" has digits first but no second colon-delimited id
        assert_eq!(
            parse("12:34"),
            vec![OptionRecord::Plain { id: "12".into(), text: "34".into() }]
        );
    }

    #[test]
    fn test_text_may_contain_colons() {
        assert_eq!(
            parse("5:a:b:c"),
            vec![OptionRecord::Prioritized {
                priority: "5".into(),
                id: "a".into(),
                text: "b:c".into(),
            }]
        );
    }

    #[test]
    fn test_unparseable_line_kept_raw() {
        assert_eq!(
            parse("no delimiter here"),
            vec![OptionRecord::Raw { raw: "no delimiter here".into() }]
        );
    }

    #[test]
    fn test_empty_cell_is_no_records() {
        assert!(parse("").is_empty());
        assert_eq!(build(&[]), "");
    }

    #[test]
    fn test_blank_lines_preserved_verbatim() {
        let records = parse("a:b\n   \n\nc:d");
        assert_eq!(records[1], OptionRecord::Raw { raw: "   ".into() });
        assert_eq!(records[2], OptionRecord::Raw { raw: "".into() });
    }

    #[test]
    fn test_roundtrip_identity() {
        roundtrip("5:greet:Hello\nfarewell:Bye");
        roundtrip("   ");
        roundtrip("a:b\n\nc:d\n");
        roundtrip("# comment: with colon");
        roundtrip("# bare comment");
        roundtrip(":leading colon");
        roundtrip("5::empty id slot");
        roundtrip("  padded:id kept as-is");
    }

    #[test]
    fn test_empty_priority_slot_is_plain() {
        // "5::x" cannot be Prioritized (empty id); the first token becomes
        // the Plain id instead
        assert_eq!(
            parse("5::x"),
            vec![OptionRecord::Plain { id: "5".into(), text: ":x".into() }]
        );
    }
}
