//! Character encoding support for table and document files.
//!
//! Rule tables in the wild are frequently authored in a legacy 8-bit code
//! page (windows-1251 files are common), so decoding goes through
//! `encoding_rs` with chardet-based auto-detection when no encoding is
//! configured. Decode failures are surfaced with the approximate line of
//! the first offending byte so the operator can locate the source row.

use encoding_rs::Encoding;

/// Encoding used for the translation document unless configured otherwise.
pub const DEFAULT_DOCUMENT_ENCODING: &str = "utf-8";

/// Resolve an encoding label like `utf-8`, `cp1251` or `windows-1252`.
///
/// Labels follow the WHATWG registry, which covers the usual aliases
/// (`cp1251` and `windows-1251` name the same code page).
pub fn resolve(label: &str) -> Option<&'static Encoding> {
    Encoding::for_label(label.trim().as_bytes())
}

/// Detect the encoding of raw bytes using chardet.
pub fn detect(bytes: &[u8]) -> &'static Encoding {
    if bytes.is_empty() {
        return encoding_rs::UTF_8;
    }

    let result = chardet::detect(bytes);
    let charset = result.0;

    // Normalize charset names chardet reports but WHATWG does not list
    let label = match charset.to_lowercase().as_str() {
        "" | "ascii" | "utf-8" | "utf8" => "utf-8".to_string(),
        other => other.to_string(),
    };

    Encoding::for_label(label.as_bytes()).unwrap_or(encoding_rs::UTF_8)
}

/// Decode raw bytes, failing on any malformed sequence.
///
/// On failure the 1-based line of the first offending byte is returned.
/// A leading UTF-8 BOM is stripped so it cannot leak into the first
/// header name.
pub fn decode(bytes: &[u8], encoding: &'static Encoding) -> Result<String, usize> {
    let bytes = if encoding == encoding_rs::UTF_8 {
        bytes.strip_prefix(&[0xEF, 0xBB, 0xBF][..]).unwrap_or(bytes)
    } else {
        bytes
    };

    let (text, had_errors) = encoding.decode_without_bom_handling(bytes);
    if had_errors {
        return Err(first_bad_line(bytes, encoding));
    }
    Ok(text.into_owned())
}

/// 1-based line of the first byte sequence the encoding rejects.
///
/// Splitting on `\n` is approximate for multi-byte encodings, which is
/// acceptable: the number is a pointer for a human, not an offset for a
/// machine.
fn first_bad_line(bytes: &[u8], encoding: &'static Encoding) -> usize {
    for (idx, chunk) in bytes.split(|&b| b == b'\n').enumerate() {
        let (_, had_errors) = encoding.decode_without_bom_handling(chunk);
        if had_errors {
            return idx + 1;
        }
    }
    1
}

/// Encode text for output.
///
/// Returns the encoded bytes and whether any character was unmappable and
/// had to be replaced; the caller decides whether that deserves a warning.
pub fn encode(text: &str, encoding: &'static Encoding) -> (Vec<u8>, bool) {
    let (bytes, _, had_errors) = encoding.encode(text);
    (bytes.into_owned(), had_errors)
}
