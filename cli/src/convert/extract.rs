//! Table-to-document conversion (`extract`).
//!
//! A pure forward scan: classify every physical row, keep its normalized
//! raw fields, and expand data rows into the named mapping translators
//! work on. Fully blank rows are preserved as separators rather than
//! dropped, so the trip back reproduces the table's visual structure.

use std::path::Path;

use indexmap::IndexMap;

use crate::document;
use crate::error::ConvertResult;
use crate::logs::{log_success, log_warning};
use crate::models::{FieldValue, RowKind, RowRecord, DEFAULT_OPTIONS_COLUMN};
use crate::options;
use crate::parser::{self, Table};

/// Options for the extract pipeline.
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// Table encoding label; auto-detected when `None`.
    pub table_encoding: Option<String>,
    /// Document encoding label.
    pub document_encoding: String,
    /// Field delimiter.
    pub delimiter: char,
    /// Diagnostic column-count expectation; mismatches warn, never block.
    pub expect_columns: Option<usize>,
    /// Column whose cells hold the options sub-grammar.
    pub options_column: String,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            table_encoding: None,
            document_encoding: crate::encoding::DEFAULT_DOCUMENT_ENCODING.to_string(),
            delimiter: ',',
            expect_columns: None,
            options_column: DEFAULT_OPTIONS_COLUMN.to_string(),
        }
    }
}

/// Convert parsed table rows into document records.
pub fn table_to_records(table: &Table, options_column: &str) -> Vec<RowRecord> {
    table
        .rows
        .iter()
        .map(|row| match row.kind {
            RowKind::Comment => RowRecord::Comment {
                row_number: row.number,
                fields: row.fields.clone(),
            },
            RowKind::BlankSeparator => RowRecord::BlankSeparator {
                row_number: row.number,
                fields: row.fields.clone(),
            },
            // the classifier never produces Malformed; kept for documents
            // written by older tooling
            RowKind::Malformed => RowRecord::Malformed {
                row_number: row.number,
                fields: row.fields.clone(),
            },
            RowKind::Data => {
                let mut values = IndexMap::new();
                for (name, value) in table.header.iter().zip(&row.fields) {
                    let field = if name == options_column {
                        FieldValue::Options(options::parse(value))
                    } else {
                        FieldValue::Text(value.clone())
                    };
                    values.insert(name.clone(), field);
                }
                RowRecord::Data {
                    row_number: row.number,
                    fields: row.fields.clone(),
                    values,
                }
            }
        })
        .collect()
}

/// Run the full extract pipeline: read the table, convert, write the
/// document. Nothing is written unless every step succeeds.
pub fn extract_file(input: &Path, output: &Path, opts: &ExtractOptions) -> ConvertResult<()> {
    let table = parser::read_table_file(
        input,
        opts.table_encoding.as_deref(),
        opts.delimiter,
        opts.expect_columns,
    )?;

    if !table.header.iter().any(|name| name == &opts.options_column) {
        log_warning(format!(
            "Header has no '{}' column; every cell is treated as plain text",
            opts.options_column
        ));
    }

    let records = table_to_records(&table, &opts.options_column);
    document::save_document(output, &records, &opts.document_encoding)?;

    log_success(format!(
        "{} row records written to '{}'",
        records.len(),
        output.display()
    ));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
id,trigger,conditions,script,text,options,notes
# population rules
open_comm,OpenCommLink,,,Hail them.,\"5:hail:Hail\nleave:Leave\",
,,,,,,
short_row,Trigger
";

    fn sample_table() -> Table {
        let (header, rows) = parser::parse_table(SAMPLE, ',').unwrap();
        Table {
            header,
            rows,
            encoding: "UTF-8".into(),
            delimiter: ',',
        }
    }

    #[test]
    fn test_rows_keep_position_and_kind() {
        let records = table_to_records(&sample_table(), "options");
        assert_eq!(records.len(), 4);

        assert!(matches!(records[0], RowRecord::Comment { row_number: 2, .. }));
        assert!(matches!(records[1], RowRecord::Data { row_number: 3, .. }));
        assert!(matches!(
            records[2],
            RowRecord::BlankSeparator { row_number: 4, .. }
        ));
        assert!(matches!(records[3], RowRecord::Data { row_number: 5, .. }));
    }

    #[test]
    fn test_data_row_expands_options() {
        let records = table_to_records(&sample_table(), "options");
        match &records[1] {
            RowRecord::Data { values, .. } => {
                assert_eq!(values["text"], FieldValue::Text("Hail them.".into()));
                match &values["options"] {
                    FieldValue::Options(list) => {
                        assert_eq!(list.len(), 2);
                        assert_eq!(options::build(list), "5:hail:Hail\nleave:Leave");
                    }
                    other => panic!("expected options, got {:?}", other),
                }
            }
            other => panic!("expected data row, got {:?}", other),
        }
    }

    #[test]
    fn test_short_row_padded_in_mapping() {
        let records = table_to_records(&sample_table(), "options");
        match &records[3] {
            RowRecord::Data { values, fields, .. } => {
                assert_eq!(fields.len(), 7);
                assert_eq!(values["id"], FieldValue::Text("short_row".into()));
                assert_eq!(values["notes"], FieldValue::Text("".into()));
                // padded options cell parses to no records
                assert_eq!(values["options"], FieldValue::Options(vec![]));
            }
            other => panic!("expected data row, got {:?}", other),
        }
    }

    #[test]
    fn test_extract_file_writes_document() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("rules.csv");
        let output = dir.path().join("doc.json");
        std::fs::write(&input, SAMPLE).unwrap();

        extract_file(&input, &output, &ExtractOptions::default()).unwrap();

        let records = document::load_document(&output, "utf-8").unwrap();
        assert_eq!(records.len(), 4);
        assert_eq!(records[1].row_number(), 3);
    }

    #[test]
    fn test_extract_file_missing_input_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("absent.csv");
        let output = dir.path().join("doc.json");

        assert!(extract_file(&input, &output, &ExtractOptions::default()).is_err());
        assert!(!output.exists());
    }
}
