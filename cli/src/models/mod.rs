//! Row and option records shared by both conversion directions.
//!
//! One table row becomes one [`RowRecord`] in the translation document,
//! tagged by `_type` and keyed by `_row_number` (1-based, the header row
//! is 1). Data rows carry both the normalized raw `fields` and a named
//! mapping for translators, with the options column expanded into
//! [`OptionRecord`]s:
//!
//! ```json
//! {
//!   "_type": "data",
//!   "_row_number": 4,
//!   "fields": ["open_comm", "OpenCommLink", "", "", "Hail them.", "5:hail:Hail", ""],
//!   "id": "open_comm",
//!   "trigger": "OpenCommLink",
//!   "conditions": "",
//!   "script": "",
//!   "text": "Hail them.",
//!   "options": [{ "priority": "5", "id": "hail", "text": "Hail" }],
//!   "notes": ""
//! }
//! ```
//!
//! Comment, separator and malformed rows keep only `fields`, re-emitted
//! verbatim on the way back so translation can never disturb row layout.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Column names assumed when a document carries no field names of its own.
pub const DEFAULT_HEADER: [&str; 7] =
    ["id", "trigger", "conditions", "script", "text", "options", "notes"];

/// Column whose cells hold the options sub-grammar.
pub const DEFAULT_OPTIONS_COLUMN: &str = "options";

// =============================================================================
// Row Kind
// =============================================================================

/// Classification of a physical table row.
///
/// The classifier only ever produces the first three kinds; `Malformed`
/// exists as a controlled escape hatch for documents produced by older
/// tooling and is re-emitted verbatim like a comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    Comment,
    BlankSeparator,
    Data,
    Malformed,
}

// =============================================================================
// Option Records
// =============================================================================

/// One line of an options cell.
///
/// Lines are `priority:id:text`, `id:text`, or anything else kept raw.
/// Serialized untagged, so the document shows plain objects; on read the
/// variants are tried in declaration order, which makes an object with all
/// three keys a `Prioritized` record even though it also has `id` + `text`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionRecord {
    /// `<digits>:<id>:<text>`; priority keeps its original digit string.
    Prioritized {
        priority: String,
        id: String,
        text: String,
    },
    /// `<id>:<text>`.
    Plain { id: String, text: String },
    /// Verbatim fallback, whitespace-only lines included.
    Raw { raw: String },
}

// =============================================================================
// Field Values
// =============================================================================

/// A named field on a data row: plain text for ordinary columns, parsed
/// option records for the options column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Options(Vec<OptionRecord>),
}

// =============================================================================
// Row Records
// =============================================================================

/// One logical row of the table, as stored in the translation document.
///
/// `fields` is tolerated missing on read (older documents omitted it for
/// data rows); emission pads to the header width regardless.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "_type", rename_all = "snake_case")]
pub enum RowRecord {
    /// `#`-prefixed row, preserved unchanged through both directions.
    Comment {
        #[serde(rename = "_row_number")]
        row_number: usize,
        #[serde(default)]
        fields: Vec<String>,
    },
    /// Row with no non-blank field; carries the table's visual structure.
    BlankSeparator {
        #[serde(rename = "_row_number")]
        row_number: usize,
        #[serde(default)]
        fields: Vec<String>,
    },
    /// Translatable row. `values` flattens into the record, one key per
    /// column name.
    Data {
        #[serde(rename = "_row_number")]
        row_number: usize,
        #[serde(default)]
        fields: Vec<String>,
        #[serde(flatten)]
        values: IndexMap<String, FieldValue>,
    },
    /// Escape hatch produced by older tooling; emitted verbatim.
    Malformed {
        #[serde(rename = "_row_number")]
        row_number: usize,
        #[serde(default)]
        fields: Vec<String>,
    },
}

impl RowRecord {
    /// The 1-based table position this record belongs to.
    pub fn row_number(&self) -> usize {
        match self {
            RowRecord::Comment { row_number, .. }
            | RowRecord::BlankSeparator { row_number, .. }
            | RowRecord::Data { row_number, .. }
            | RowRecord::Malformed { row_number, .. } => *row_number,
        }
    }

    /// The stored raw fields.
    pub fn fields(&self) -> &[String] {
        match self {
            RowRecord::Comment { fields, .. }
            | RowRecord::BlankSeparator { fields, .. }
            | RowRecord::Data { fields, .. }
            | RowRecord::Malformed { fields, .. } => fields,
        }
    }

    pub fn kind(&self) -> RowKind {
        match self {
            RowRecord::Comment { .. } => RowKind::Comment,
            RowRecord::BlankSeparator { .. } => RowKind::BlankSeparator,
            RowRecord::Data { .. } => RowKind::Data,
            RowRecord::Malformed { .. } => RowKind::Malformed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_row_record_type_tags() {
        let comment = RowRecord::Comment {
            row_number: 3,
            fields: vec!["# note".into()],
        };
        let value = serde_json::to_value(&comment).unwrap();
        assert_eq!(value["_type"], "comment");
        assert_eq!(value["_row_number"], 3);

        let blank = RowRecord::BlankSeparator {
            row_number: 4,
            fields: vec![String::new()],
        };
        let value = serde_json::to_value(&blank).unwrap();
        assert_eq!(value["_type"], "blank_separator");
    }

    #[test]
    fn test_data_row_flattens_values() {
        let mut values = IndexMap::new();
        values.insert("id".to_string(), FieldValue::Text("greet".into()));
        values.insert(
            "options".to_string(),
            FieldValue::Options(vec![OptionRecord::Plain {
                id: "hail".into(),
                text: "Hail them".into(),
            }]),
        );

        let record = RowRecord::Data {
            row_number: 2,
            fields: vec!["greet".into(), "hail:Hail them".into()],
            values,
        };

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["_type"], "data");
        assert_eq!(value["id"], "greet");
        assert_eq!(value["options"][0]["id"], "hail");
    }

    #[test]
    fn test_data_row_roundtrip() {
        let input = json!({
            "_type": "data",
            "_row_number": 7,
            "fields": ["a", "b"],
            "id": "a",
            "options": [{ "priority": "5", "id": "x", "text": "y" }]
        });

        let record: RowRecord = serde_json::from_value(input).unwrap();
        assert_eq!(record.row_number(), 7);
        match &record {
            RowRecord::Data { values, .. } => {
                assert_eq!(values["id"], FieldValue::Text("a".into()));
                assert_eq!(
                    values["options"],
                    FieldValue::Options(vec![OptionRecord::Prioritized {
                        priority: "5".into(),
                        id: "x".into(),
                        text: "y".into(),
                    }])
                );
            }
            other => panic!("expected data row, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_fields_defaults_empty() {
        let input = json!({ "_type": "comment", "_row_number": 9 });
        let record: RowRecord = serde_json::from_value(input).unwrap();
        assert_eq!(record.fields(), &[] as &[String]);
    }

    #[test]
    fn test_option_record_priority_wins_over_plain() {
        let input = json!({ "priority": "5", "id": "greet", "text": "Hello" });
        let record: OptionRecord = serde_json::from_value(input).unwrap();
        assert!(matches!(record, OptionRecord::Prioritized { .. }));

        let input = json!({ "id": "greet", "text": "Hello" });
        let record: OptionRecord = serde_json::from_value(input).unwrap();
        assert!(matches!(record, OptionRecord::Plain { .. }));

        let input = json!({ "raw": "  " });
        let record: OptionRecord = serde_json::from_value(input).unwrap();
        assert_eq!(record, OptionRecord::Raw { raw: "  ".into() });
    }
}
