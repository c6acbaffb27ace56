//! Rulebridge CLI - round-trip rule tables through a translation document
//!
//! # Main Commands
//!
//! ```bash
//! rulebridge extract rules.csv -o rules_for_translation.json
//! rulebridge rebuild rules_for_translation.json -o translated_rules.csv --original rules.csv
//! ```
//!
//! # Debug Commands
//!
//! ```bash
//! rulebridge inspect rules.csv        # Classify rows, report encoding and header
//! ```

use clap::{Parser, Subcommand};
use rulebridge::{
    extract_file, rebuild_file, read_table_file, table_to_records, ExtractOptions, RebuildOptions,
    RowKind,
};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "rulebridge")]
#[command(about = "Convert rule tables between CSV and a JSON translation document", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract a rules table into a JSON document for translation
    Extract {
        /// Input table file
        input: PathBuf,

        /// Output document file
        #[arg(short, long)]
        output: PathBuf,

        /// Table encoding (auto-detect if not specified), e.g. cp1251
        #[arg(short, long)]
        encoding: Option<String>,

        /// Field delimiter
        #[arg(short, long, default_value = ",")]
        delimiter: char,

        /// Document encoding
        #[arg(long, default_value = "utf-8")]
        doc_encoding: String,

        /// Expected column count (diagnostic only; mismatches warn)
        #[arg(long)]
        expect_columns: Option<usize>,

        /// Name of the column holding the options sub-grammar
        #[arg(long, default_value = "options")]
        options_column: String,
    },

    /// Rebuild a rules table from a translated JSON document
    Rebuild {
        /// Input document file (after translation)
        document: PathBuf,

        /// Output table file
        #[arg(short, long)]
        output: PathBuf,

        /// Original table used as the structural scaffold (recommended;
        /// without it the document order alone drives the output)
        #[arg(long)]
        original: Option<PathBuf>,

        /// Original table encoding (auto-detect if not specified)
        #[arg(short, long)]
        encoding: Option<String>,

        /// Document encoding
        #[arg(long, default_value = "utf-8")]
        doc_encoding: String,

        /// Output table encoding
        #[arg(long, default_value = "utf-8")]
        output_encoding: String,

        /// Field delimiter
        #[arg(short, long, default_value = ",")]
        delimiter: char,
    },

    /// Parse a table and report row classification (debug aid)
    Inspect {
        /// Input table file
        input: PathBuf,

        /// Table encoding (auto-detect if not specified)
        #[arg(short, long)]
        encoding: Option<String>,

        /// Field delimiter
        #[arg(short, long, default_value = ",")]
        delimiter: char,

        /// Output file for the row records (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Extract {
            input,
            output,
            encoding,
            delimiter,
            doc_encoding,
            expect_columns,
            options_column,
        } => cmd_extract(
            &input,
            &output,
            encoding,
            delimiter,
            doc_encoding,
            expect_columns,
            options_column,
        ),

        Commands::Rebuild {
            document,
            output,
            original,
            encoding,
            doc_encoding,
            output_encoding,
            delimiter,
        } => cmd_rebuild(
            &document,
            &output,
            original.as_deref(),
            encoding,
            doc_encoding,
            output_encoding,
            delimiter,
        ),

        Commands::Inspect {
            input,
            encoding,
            delimiter,
            output,
        } => cmd_inspect(&input, encoding.as_deref(), delimiter, output.as_deref()),
    };

    if let Err(e) = result {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }
}

fn check_delimiter(delimiter: char) -> Result<(), Box<dyn std::error::Error>> {
    if !delimiter.is_ascii() {
        return Err(format!("Delimiter '{}' must be a single ASCII character", delimiter).into());
    }
    Ok(())
}

fn cmd_extract(
    input: &Path,
    output: &Path,
    encoding: Option<String>,
    delimiter: char,
    doc_encoding: String,
    expect_columns: Option<usize>,
    options_column: String,
) -> Result<(), Box<dyn std::error::Error>> {
    check_delimiter(delimiter)?;
    eprintln!("📄 Extracting: {}", input.display());

    let opts = ExtractOptions {
        table_encoding: encoding,
        document_encoding: doc_encoding,
        delimiter,
        expect_columns,
        options_column,
    };
    extract_file(input, output, &opts)?;

    eprintln!("✨ Done!");
    Ok(())
}

fn cmd_rebuild(
    document: &Path,
    output: &Path,
    original: Option<&Path>,
    encoding: Option<String>,
    doc_encoding: String,
    output_encoding: String,
    delimiter: char,
) -> Result<(), Box<dyn std::error::Error>> {
    check_delimiter(delimiter)?;
    eprintln!("📄 Rebuilding from: {}", document.display());
    if let Some(original) = original {
        eprintln!("   Original table: {}", original.display());
    }

    let opts = RebuildOptions {
        document_encoding: doc_encoding,
        table_encoding: encoding,
        output_encoding,
        delimiter,
    };
    rebuild_file(document, output, original, &opts)?;

    eprintln!("✨ Done!");
    Ok(())
}

fn cmd_inspect(
    input: &Path,
    encoding: Option<&str>,
    delimiter: char,
    output: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    check_delimiter(delimiter)?;
    eprintln!("📄 Inspecting: {}", input.display());

    let table = read_table_file(input, encoding, delimiter, None)?;

    let mut comments = 0;
    let mut blanks = 0;
    let mut data = 0;
    for row in &table.rows {
        match row.kind {
            RowKind::Comment => comments += 1,
            RowKind::BlankSeparator => blanks += 1,
            RowKind::Data | RowKind::Malformed => data += 1,
        }
    }

    eprintln!("   Encoding: {}", table.encoding);
    eprintln!("   Columns: {}", table.header.join(", "));
    eprintln!(
        "✅ {} rows: {} data, {} comments, {} separators",
        table.rows.len(),
        data,
        comments,
        blanks
    );

    let records = table_to_records(&table, rulebridge::DEFAULT_OPTIONS_COLUMN);
    let json = serde_json::to_string_pretty(&records)?;
    write_output(&json, output)?;

    Ok(())
}

fn write_output(content: &str, path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    match path {
        Some(p) => {
            fs::write(p, content)?;
            eprintln!("💾 Output written to: {}", p.display());
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
