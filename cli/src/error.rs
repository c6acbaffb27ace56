//! Error types for the rulebridge conversion pipelines.
//!
//! This module defines a hierarchy of error types:
//!
//! - [`TableError`] - delimited table read/decode/write errors
//! - [`DocumentError`] - translation document errors
//! - [`ConvertError`] - top-level errors for the two converters
//!
//! Error conversion is automatic via `From` implementations,
//! allowing `?` to work across error boundaries.
//!
//! Everything here is fatal: structural tolerances (column-count
//! mismatches, unparseable option lines, empty documents) never become
//! errors, they are reported through [`crate::logs`] and recovered locally.

use std::path::PathBuf;
use thiserror::Error;

// =============================================================================
// Table Errors
// =============================================================================

/// Errors while reading or writing a delimited table.
#[derive(Debug, Error)]
pub enum TableError {
    /// Failed to read the table file.
    #[error("Cannot read table file '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configured encoding rejected a byte sequence.
    #[error(
        "Failed to decode '{path}' as {encoding} (around line {line}). \
         Check the table encoding setting; common alternatives are \
         'utf-8', 'windows-1251', 'windows-1252' and 'latin-1'"
    )]
    Decode {
        path: PathBuf,
        encoding: String,
        line: usize,
    },

    /// The encoding label is not recognized.
    #[error("Unknown encoding label '{0}'")]
    UnknownEncoding(String),

    /// The table has no header row.
    #[error("Table file '{path}' is empty or has no header row")]
    NoHeader { path: PathBuf },

    /// Failed to render the output table.
    #[error("Failed to render table output: {0}")]
    Render(String),

    /// Failed to write the table file.
    #[error("Cannot write table file '{path}': {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

// =============================================================================
// Document Errors
// =============================================================================

/// Errors while reading or writing the translation document.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// Failed to read the document file.
    #[error("Cannot read document file '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The encoding label is not recognized.
    #[error("Unknown encoding label '{0}'")]
    UnknownEncoding(String),

    /// The configured encoding rejected a byte sequence.
    #[error(
        "Failed to decode document '{path}' as {encoding} (around line {line}). \
         Check the document encoding setting"
    )]
    Decode {
        path: PathBuf,
        encoding: String,
        line: usize,
    },

    /// The document is not valid JSON or does not match the record shape.
    #[error("Malformed document '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Failed to serialize row records.
    #[error("Failed to serialize document: {0}")]
    Serialize(#[source] serde_json::Error),

    /// Failed to write the document file.
    #[error("Cannot write document file '{path}': {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

// =============================================================================
// Convert Errors (top-level)
// =============================================================================

/// Top-level error for the two conversion pipelines.
///
/// This is the main error type returned by
/// [`crate::convert::extract_file`] and [`crate::convert::rebuild_file`].
#[derive(Debug, Error)]
pub enum ConvertError {
    /// Table error.
    #[error("{0}")]
    Table(#[from] TableError),

    /// Document error.
    #[error("{0}")]
    Document(#[from] DocumentError),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for table operations.
pub type TableResult<T> = Result<T, TableError>;

/// Result type for document operations.
pub type DocumentResult<T> = Result<T, DocumentError>;

/// Result type for conversion pipelines.
pub type ConvertResult<T> = Result<T, ConvertError>;
