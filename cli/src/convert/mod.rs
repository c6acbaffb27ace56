//! The two conversion pipelines.
//!
//! [`extract`] turns a delimited rules table into the JSON translation
//! document; [`rebuild`] turns the (translated) document back into a
//! table. Both share the option sub-parser and the row record model, and
//! neither writes anything until the whole output buffer is ready.

pub mod extract;
pub mod rebuild;

pub use extract::{extract_file, table_to_records, ExtractOptions};
pub use rebuild::{rebuild_file, rebuild_sequential, rebuild_with_original, RebuildOptions};
