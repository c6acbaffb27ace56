//! Delimited table output: smart-quote normalization, minimal quoting and
//! atomic file commit.
//!
//! Quoting is the standard scheme: a field is quoted only when it contains
//! the delimiter, a quote character or a line break, and embedded quotes
//! are doubled. Every emitted field first has curly punctuation replaced
//! with its ASCII equivalent; translation tools are known to introduce
//! smart quotes, and they break naive re-parsing of the output downstream.

use std::io::Write;
use std::path::Path;

use crate::error::{TableError, TableResult};

/// Replace curly quotes with their ASCII equivalents.
pub fn normalize_smart_quotes(field: &str) -> String {
    field
        .replace('“', "\"")
        .replace('”', "\"")
        .replace('‘', "'")
        .replace('’', "'")
}

/// Render header and rows as delimited text.
///
/// Rows are written exactly as given; width coercion happens upstream so
/// that every record, separators included, has the header's shape.
pub fn render_table(header: &[String], rows: &[Vec<String>], delimiter: char) -> TableResult<String> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter as u8)
        .quote_style(csv::QuoteStyle::Necessary)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    write_normalized(&mut writer, header)?;
    for row in rows {
        write_normalized(&mut writer, row)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| TableError::Render(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| TableError::Render(e.to_string()))
}

fn write_normalized(writer: &mut csv::Writer<Vec<u8>>, fields: &[String]) -> TableResult<()> {
    let normalized: Vec<String> = fields.iter().map(|f| normalize_smart_quotes(f)).collect();
    writer
        .write_record(&normalized)
        .map_err(|e| TableError::Render(e.to_string()))
}

/// Write bytes to `path` through a temporary file in the same directory,
/// moved into place only once the whole buffer is written. A failed run
/// leaves no partial output behind.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
