//! Reading and writing the structured translation document.
//!
//! The document is an indented JSON array of [`RowRecord`]s, UTF-8 unless
//! configured otherwise. It is the file translators edit, so reading is
//! strict (malformed JSON is fatal with the position serde reports) while
//! shape-level gaps (missing `fields`, missing columns) stay tolerant.

use std::fs;
use std::path::Path;

use crate::encoding;
use crate::error::{DocumentError, DocumentResult};
use crate::logs::log_warning;
use crate::models::{RowRecord, DEFAULT_HEADER};
use crate::writer::write_atomic;

/// Load row records from a document file.
pub fn load_document(path: &Path, encoding_label: &str) -> DocumentResult<Vec<RowRecord>> {
    let bytes = fs::read(path).map_err(|source| DocumentError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let enc = encoding::resolve(encoding_label)
        .ok_or_else(|| DocumentError::UnknownEncoding(encoding_label.to_string()))?;

    let content = encoding::decode(&bytes, enc).map_err(|line| DocumentError::Decode {
        path: path.to_path_buf(),
        encoding: enc.name().to_string(),
        line,
    })?;

    let mut records: Vec<RowRecord> = serde_json::from_str(&content).map_err(|source| {
        DocumentError::Parse {
            path: path.to_path_buf(),
            source,
        }
    })?;

    // serde's internal tagging leaves `_type` among the flattened column
    // values; metadata keys are never column names
    for record in &mut records {
        if let RowRecord::Data { values, .. } = record {
            values.retain(|key, _| !key.starts_with('_'));
        }
    }

    Ok(records)
}

/// Write row records as an indented JSON document, atomically.
pub fn save_document(
    path: &Path,
    records: &[RowRecord],
    encoding_label: &str,
) -> DocumentResult<()> {
    let enc = encoding::resolve(encoding_label)
        .ok_or_else(|| DocumentError::UnknownEncoding(encoding_label.to_string()))?;

    let json = serde_json::to_string_pretty(records).map_err(DocumentError::Serialize)?;

    let (bytes, lossy) = encoding::encode(&json, enc);
    if lossy {
        log_warning(format!(
            "Some characters could not be encoded as {} and were replaced",
            enc.name()
        ));
    }

    write_atomic(path, &bytes).map_err(|source| DocumentError::Write {
        path: path.to_path_buf(),
        source,
    })
}

/// Field names observed on the first data record, in their original order.
///
/// Falls back to the default rules header when the document holds no data
/// rows; used only in the degraded no-original rebuild mode.
pub fn resolve_header(records: &[RowRecord]) -> Vec<String> {
    for record in records {
        if let RowRecord::Data { values, .. } = record {
            if !values.is_empty() {
                return values.keys().cloned().collect();
            }
        }
    }

    log_warning("No data rows in document; assuming the default rules header");
    DEFAULT_HEADER.iter().map(|s| s.to_string()).collect()
}
