//! # Rulebridge - rule table round-tripping for translation
//!
//! Rulebridge converts a rules CSV into a structured JSON document for
//! external translation, and reassembles the translated table while
//! preserving the original row structure (comments, blank separator rows,
//! column layout).
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌──────────────┐
//! │  rules.csv  │────▶│   Parser    │────▶│   Document   │
//! │ (any 8-bit  │     │ (classify + │     │ (row records │
//! │  code page) │     │  options)   │     │  as JSON)    │
//! └─────────────┘     └─────────────┘     └──────┬───────┘
//!                                                │ translate
//! ┌─────────────┐     ┌─────────────┐     ┌──────▼───────┐
//! │ rebuilt.csv │◀────│   Writer    │◀────│   Rebuild    │
//! │             │     │ (quoting +  │     │ (join by row │
//! │             │     │  encoding)  │     │  number)     │
//! └─────────────┘     └─────────────┘     └──────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use rulebridge::{extract_file, rebuild_file, ExtractOptions, RebuildOptions};
//! use std::path::Path;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     extract_file(
//!         Path::new("rules.csv"),
//!         Path::new("rules_for_translation.json"),
//!         &ExtractOptions::default(),
//!     )?;
//!     Ok(())
//! }
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Hierarchical error types
//! - [`models`] - Row and option records
//! - [`encoding`] - Code page resolution, detection, strict decoding
//! - [`parser`] - Table reading and row classification
//! - [`options`] - The options sub-grammar
//! - [`document`] - Translation document I/O
//! - [`writer`] - Table output with minimal quoting and atomic commit
//! - [`convert`] - The extract and rebuild pipelines

// Core modules
pub mod error;
pub mod logs;
pub mod models;

// Encoding
pub mod encoding;

// Parsing
pub mod options;
pub mod parser;

// Document and table output
pub mod document;
pub mod writer;

// Conversion pipelines
pub mod convert;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{
    ConvertError,
    ConvertResult,
    DocumentError,
    DocumentResult,
    TableError,
    TableResult,
};

// =============================================================================
// Re-exports - Models
// =============================================================================

pub use models::{
    FieldValue,
    OptionRecord,
    RowKind,
    RowRecord,
    DEFAULT_HEADER,
    DEFAULT_OPTIONS_COLUMN,
};

// =============================================================================
// Re-exports - Parsing
// =============================================================================

pub use parser::{classify, parse_table, read_table_file, scan_records, Row, Table};

// =============================================================================
// Re-exports - Options sub-grammar
// =============================================================================

pub use options::{build as build_options, parse as parse_options};

// =============================================================================
// Re-exports - Document
// =============================================================================

pub use document::{load_document, resolve_header, save_document};

// =============================================================================
// Re-exports - Pipelines
// =============================================================================

pub use convert::{
    extract_file,
    rebuild_file,
    rebuild_sequential,
    rebuild_with_original,
    table_to_records,
    ExtractOptions,
    RebuildOptions,
};
