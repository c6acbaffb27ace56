//! Document-to-table conversion (`rebuild`).
//!
//! Two modes share the emission path. With the original table supplied
//! (recommended), document records are joined to original rows by
//! `_row_number`: translated data replaces the original row, non-data
//! records re-emit their stored fields, and original rows with no record
//! at all pass through unchanged: translation can substitute rows but
//! never delete them. Without an original table the document's own record
//! order drives the output; that mode cannot resurrect rows a translator
//! deleted and is flagged as degraded at runtime.

use std::collections::HashMap;
use std::path::Path;

use indexmap::IndexMap;

use crate::document;
use crate::encoding;
use crate::error::{ConvertResult, TableError};
use crate::logs::{log_success, log_warning};
use crate::models::{FieldValue, RowRecord};
use crate::options;
use crate::parser::{self, Table};
use crate::writer;

/// Options for the rebuild pipeline.
#[derive(Debug, Clone)]
pub struct RebuildOptions {
    /// Document encoding label.
    pub document_encoding: String,
    /// Original table encoding label; auto-detected when `None`.
    pub table_encoding: Option<String>,
    /// Output table encoding label.
    pub output_encoding: String,
    /// Field delimiter for both the original and the output table.
    pub delimiter: char,
}

impl Default for RebuildOptions {
    fn default() -> Self {
        Self {
            document_encoding: encoding::DEFAULT_DOCUMENT_ENCODING.to_string(),
            table_encoding: None,
            output_encoding: "utf-8".to_string(),
            delimiter: ',',
        }
    }
}

/// Rebuild output rows against the original table, joined by row number.
pub fn rebuild_with_original(original: &Table, records: &[RowRecord]) -> Vec<Vec<String>> {
    let by_number: HashMap<usize, &RowRecord> =
        records.iter().map(|r| (r.row_number(), r)).collect();
    let width = original.header.len();

    original
        .rows
        .iter()
        .map(|row| {
            let fields = match by_number.get(&row.number) {
                Some(RowRecord::Data { values, .. }) => data_row(values, &original.header),
                Some(other) => other.fields().to_vec(),
                None => row.fields.clone(),
            };
            coerce_width(fields, width)
        })
        .collect()
}

/// Rebuild output rows from the document sequence alone (degraded mode).
pub fn rebuild_sequential(records: &[RowRecord], header: &[String]) -> Vec<Vec<String>> {
    records
        .iter()
        .map(|record| {
            let fields = match record {
                RowRecord::Data { values, .. } => data_row(values, header),
                other => other.fields().to_vec(),
            };
            coerce_width(fields, header.len())
        })
        .collect()
}

/// One output field per header column; missing columns become empty
/// strings and option records collapse back to cell text.
fn data_row(values: &IndexMap<String, FieldValue>, header: &[String]) -> Vec<String> {
    header
        .iter()
        .map(|name| match values.get(name) {
            Some(FieldValue::Text(text)) => text.clone(),
            Some(FieldValue::Options(list)) => options::build(list),
            None => String::new(),
        })
        .collect()
}

/// Coerce to exactly `width` fields so every output row has uniform shape
/// regardless of document glitches.
fn coerce_width(mut fields: Vec<String>, width: usize) -> Vec<String> {
    fields.resize(width, String::new());
    fields
}

/// Run the full rebuild pipeline: load the document (and the original
/// table when given), join, render and write the output table atomically.
pub fn rebuild_file(
    document_path: &Path,
    output: &Path,
    original: Option<&Path>,
    opts: &RebuildOptions,
) -> ConvertResult<()> {
    let records = document::load_document(document_path, &opts.document_encoding)?;
    if records.is_empty() {
        log_warning("Document contains no row records");
    }

    let (header, rows) = match original {
        Some(original_path) => {
            let table = parser::read_table_file(
                original_path,
                opts.table_encoding.as_deref(),
                opts.delimiter,
                None,
            )?;
            let rows = rebuild_with_original(&table, &records);
            (table.header, rows)
        }
        None => {
            log_warning(
                "No original table supplied; rebuilding from document order alone (degraded mode)",
            );
            let header = document::resolve_header(&records);
            let rows = rebuild_sequential(&records, &header);
            (header, rows)
        }
    };

    let text = writer::render_table(&header, &rows, opts.delimiter)?;

    let enc = encoding::resolve(&opts.output_encoding)
        .ok_or_else(|| TableError::UnknownEncoding(opts.output_encoding.clone()))?;
    let (bytes, lossy) = encoding::encode(&text, enc);
    if lossy {
        log_warning(format!(
            "Some characters could not be encoded as {} and were replaced",
            enc.name()
        ));
    }

    writer::write_atomic(output, &bytes).map_err(|source| TableError::Write {
        path: output.to_path_buf(),
        source,
    })?;

    log_success(format!(
        "{} rows written to '{}'",
        rows.len(),
        output.display()
    ));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::extract::{extract_file, ExtractOptions};

    const ORIGINAL: &str = "\
id,trigger,conditions,script,text,options,notes
# greetings
open_comm,OpenCommLink,,,Hail them.,\"5:hail:Hail\nleave:Leave\",
,,,,,,
farewell,CloseComm,,,Goodbye.,,
";

    fn original_table() -> Table {
        let (header, rows) = parser::parse_table(ORIGINAL, ',').unwrap();
        Table {
            header,
            rows,
            encoding: "UTF-8".into(),
            delimiter: ',',
        }
    }

    fn translated_record() -> RowRecord {
        let mut values = IndexMap::new();
        values.insert("id".into(), FieldValue::Text("open_comm".into()));
        values.insert("text".into(), FieldValue::Text("Поприветствовать.".into()));
        values.insert(
            "options".into(),
            FieldValue::Options(options::parse("5:hail:Окликнуть\nleave:Уйти")),
        );
        RowRecord::Data {
            row_number: 3,
            fields: vec![],
            values,
        }
    }

    #[test]
    fn test_translated_row_replaces_original() {
        let rows = rebuild_with_original(&original_table(), &[translated_record()]);
        assert_eq!(rows.len(), 4);

        // translated row: mapped columns filled, unmapped columns empty
        assert_eq!(rows[1][0], "open_comm");
        assert_eq!(rows[1][4], "Поприветствовать.");
        assert_eq!(rows[1][5], "5:hail:Окликнуть\nleave:Уйти");
        assert_eq!(rows[1][1], "");
        assert_eq!(rows[1].len(), 7);

        // rows without a document record pass through unchanged
        assert_eq!(rows[0][0], "# greetings");
        assert_eq!(rows[3][0], "farewell");
        assert_eq!(rows[3][4], "Goodbye.");
    }

    #[test]
    fn test_disjoint_row_numbers_leave_original_intact() {
        let mut record = translated_record();
        if let RowRecord::Data { row_number, .. } = &mut record {
            *row_number = 99;
        }
        let table = original_table();
        let rows = rebuild_with_original(&table, &[record]);

        assert_eq!(rows.len(), 4);
        for (row, original_row) in rows.iter().zip(&table.rows) {
            assert_eq!(row, &original_row.fields);
        }
    }

    #[test]
    fn test_non_data_record_emits_stored_fields() {
        let record = RowRecord::Comment {
            row_number: 2,
            fields: vec!["# edited heading".into()],
        };
        let rows = rebuild_with_original(&original_table(), &[record]);
        assert_eq!(rows[0][0], "# edited heading");
        assert_eq!(rows[0].len(), 7);
    }

    #[test]
    fn test_missing_options_key_emits_empty_column() {
        let mut values = IndexMap::new();
        values.insert("id".into(), FieldValue::Text("open_comm".into()));
        let record = RowRecord::Data {
            row_number: 3,
            fields: vec![],
            values,
        };
        let rows = rebuild_with_original(&original_table(), &[record]);
        assert_eq!(rows[1][5], "");
    }

    #[test]
    fn test_sequential_mode_uses_document_order() {
        let header: Vec<String> = vec!["id".into(), "text".into(), "options".into()];
        let records = vec![
            RowRecord::Comment {
                row_number: 2,
                fields: vec!["# top".into()],
            },
            {
                let mut values = IndexMap::new();
                values.insert("id".into(), FieldValue::Text("a".into()));
                values.insert("text".into(), FieldValue::Text("b".into()));
                RowRecord::Data {
                    row_number: 3,
                    fields: vec![],
                    values,
                }
            },
        ];

        let rows = rebuild_sequential(&records, &header);
        assert_eq!(rows, vec![vec!["# top", "", ""], vec!["a", "b", ""]]);
    }

    #[test]
    fn test_full_roundtrip_reproduces_table() {
        // identical to ORIGINAL except the short comment row, padded to
        // the header width, the one declared normalization
        const NORMALIZED: &str = "\
id,trigger,conditions,script,text,options,notes
# greetings,,,,,,
open_comm,OpenCommLink,,,Hail them.,\"5:hail:Hail\nleave:Leave\",
,,,,,,
farewell,CloseComm,,,Goodbye.,,
";

        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("rules.csv");
        let doc = dir.path().join("doc.json");
        let output = dir.path().join("rebuilt.csv");
        std::fs::write(&input, ORIGINAL).unwrap();

        extract_file(&input, &doc, &ExtractOptions::default()).unwrap();
        rebuild_file(&doc, &output, Some(&input), &RebuildOptions::default()).unwrap();
        assert_eq!(std::fs::read_to_string(&output).unwrap(), NORMALIZED);

        // a normalized table is a fixed point: the second trip is
        // byte-identical
        let doc2 = dir.path().join("doc2.json");
        let output2 = dir.path().join("rebuilt2.csv");
        extract_file(&output, &doc2, &ExtractOptions::default()).unwrap();
        rebuild_file(&doc2, &output2, Some(&output), &RebuildOptions::default()).unwrap();
        assert_eq!(std::fs::read_to_string(&output2).unwrap(), NORMALIZED);
    }

    #[test]
    fn test_rebuild_missing_document_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("out.csv");
        let err = rebuild_file(
            &dir.path().join("absent.json"),
            &output,
            None,
            &RebuildOptions::default(),
        );
        assert!(err.is_err());
        assert!(!output.exists());
    }
}
