//! Delimited table reading: record scanning, header extraction, field
//! normalization and row classification.
//!
//! The scanner is hand-rolled because blank rows are records here: row
//! numbers join the table to the translation document, so every physical
//! record must be observed, including empty lines and `#`-comment lines
//! that stock CSV readers silently skip. Quoted fields may contain the
//! delimiter, doubled quotes and line breaks.

use std::fs;
use std::path::Path;

use crate::encoding;
use crate::error::{TableError, TableResult};
use crate::logs::{log_info, log_warning};
use crate::models::RowKind;

/// Result of reading a table, with the metadata needed downstream.
#[derive(Debug, Clone)]
pub struct Table {
    /// Header names, exactly as written in record 1.
    pub header: Vec<String>,
    /// Body rows in file order, header-width normalized and classified.
    pub rows: Vec<Row>,
    /// Encoding the file was decoded with.
    pub encoding: String,
    /// Delimiter used for scanning.
    pub delimiter: char,
}

/// One physical body row.
#[derive(Debug, Clone)]
pub struct Row {
    /// 1-based position in the file; the header row is 1.
    pub number: usize,
    /// Fields normalized to the header width.
    pub fields: Vec<String>,
    pub kind: RowKind,
}

/// Read and parse a table file.
///
/// With no encoding label the encoding is auto-detected and logged.
/// `expect_columns` is diagnostic only: a mismatch against the header
/// width warns and the header width wins.
pub fn read_table_file(
    path: &Path,
    encoding_label: Option<&str>,
    delimiter: char,
    expect_columns: Option<usize>,
) -> TableResult<Table> {
    let bytes = fs::read(path).map_err(|source| TableError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let enc = match encoding_label {
        Some(label) => encoding::resolve(label)
            .ok_or_else(|| TableError::UnknownEncoding(label.to_string()))?,
        None => {
            let detected = encoding::detect(&bytes);
            log_info(format!("Detected table encoding: {}", detected.name()));
            detected
        }
    };

    let content = encoding::decode(&bytes, enc).map_err(|line| TableError::Decode {
        path: path.to_path_buf(),
        encoding: enc.name().to_string(),
        line,
    })?;

    let (header, rows) = parse_table(&content, delimiter).ok_or_else(|| TableError::NoHeader {
        path: path.to_path_buf(),
    })?;

    if let Some(expected) = expect_columns {
        if expected != header.len() {
            log_warning(format!(
                "Header has {} columns, {} expected; proceeding with the header",
                header.len(),
                expected
            ));
        }
    }

    Ok(Table {
        header,
        rows,
        encoding: enc.name().to_string(),
        delimiter,
    })
}

/// Parse decoded table text. Record 1 is the header; its width is the
/// column count every body row is normalized to. `None` means there is
/// no header record at all.
pub fn parse_table(content: &str, delimiter: char) -> Option<(Vec<String>, Vec<Row>)> {
    let mut records = scan_records(content, delimiter).into_iter();
    let header = records.next()?;
    let width = header.len();

    let rows = records
        .enumerate()
        .map(|(i, fields)| {
            let number = i + 2;
            let fields = normalize_fields(fields, width, number);
            let kind = classify(&fields);
            Row { number, fields, kind }
        })
        .collect();

    Some((header, rows))
}

/// Split decoded text into physical records.
///
/// Quote-aware: a `"`-opened field ends at the matching quote, with `""`
/// as an escaped quote, and may span lines. CRLF and LF both terminate
/// records; line breaks inside quoted fields are kept byte-for-byte.
/// A blank line yields a record with one empty field.
pub fn scan_records(content: &str, delimiter: char) -> Vec<Vec<String>> {
    let mut records = Vec::new();
    let mut fields: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = content.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            if c == '"' {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    field.push('"');
                } else {
                    in_quotes = false;
                }
            } else {
                field.push(c);
            }
            continue;
        }

        match c {
            '"' if field.is_empty() => in_quotes = true,
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                fields.push(std::mem::take(&mut field));
                records.push(std::mem::take(&mut fields));
            }
            '\n' => {
                fields.push(std::mem::take(&mut field));
                records.push(std::mem::take(&mut fields));
            }
            c if c == delimiter => fields.push(std::mem::take(&mut field)),
            other => field.push(other),
        }
    }

    // last record when the file has no trailing newline
    if !field.is_empty() || !fields.is_empty() {
        fields.push(field);
        records.push(fields);
    }

    records
}

/// Classify a column-count-normalized field list.
///
/// Priority order: `#`-first-field rows are comments even when later
/// fields hold data; then fully blank rows; everything else is data.
pub fn classify(fields: &[String]) -> RowKind {
    match fields.first() {
        Some(first) if first.trim().starts_with('#') => RowKind::Comment,
        _ if fields.iter().all(|f| f.trim().is_empty()) => RowKind::BlankSeparator,
        _ => RowKind::Data,
    }
}

/// Pad or truncate to the header width.
///
/// A changed field count is a warning-level event, except for fully blank
/// records whose shape is implied. Never an error.
fn normalize_fields(mut fields: Vec<String>, width: usize, row_number: usize) -> Vec<String> {
    if fields.len() != width {
        let blank = fields.iter().all(|f| f.trim().is_empty());
        if !blank {
            let action = if fields.len() < width {
                "padding with empty strings"
            } else {
                "truncating"
            };
            log_warning(format!(
                "Row {}: {} fields, expected {}; {}",
                row_number,
                fields.len(),
                width,
                action
            ));
        }
        fields.resize(width, String::new());
    }
    fields
}
