//! BibTeX bibliography parser.
//!
//! Splits a bibliography document into per-entry source chunks and extracts
//! individual field values from them. This is a heuristic scanner, not a full
//! BibTeX grammar: entries are located by their `@type{key,` header and closed
//! by walking brace depth, and field values tolerate one level of nested
//! braces.

use std::fs;
use std::path::Path;

use regex::Regex;
use thiserror::Error;

/// Errors that can occur when loading a bibliography file.
#[derive(Error, Debug)]
pub enum BibError {
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),
}

/// One BibTeX entry: its citation key and its full source span,
/// from `@type{key,` through the matching closing brace.
#[derive(Debug, Clone, PartialEq)]
pub struct BibEntry {
    /// The citation key (e.g., "smith2021deep")
    pub key: String,
    /// The entry's raw source text, delimiters included
    pub source: String,
}

/// Loads a BibTeX bibliography from a file.
///
/// Returns the raw file content; parsing is a separate step
/// (see [`parse_entries`]) so the pipeline stays pure.
///
/// # Errors
///
/// Returns an error if the file cannot be read.
pub fn load_bibliography(path: &Path) -> Result<String, BibError> {
    let content = fs::read_to_string(path)?;
    Ok(content)
}

/// Parses a bibliography document into its entries, in document order.
///
/// Each entry is located by the pattern `@<word>{<key>,` (the key is
/// everything up to the first comma) and its extent is found by walking brace
/// depth character by character from the `@`, so nested braces inside field
/// values (e.g. `{A {B} C}`) are handled correctly.
///
/// An entry whose braces never balance before the end of the document is
/// silently dropped. Duplicate keys are kept as separate entries here;
/// collecting into a map gives the last occurrence (see
/// [`crate::remap::remap_document`]).
///
/// # Examples
///
/// ```
/// use cite_remap::parse_entries;
///
/// let bib = "@article{doe2020, title = {Effects of {X} and {Y}}, year = {2020}}";
/// let entries = parse_entries(bib);
/// assert_eq!(entries.len(), 1);
/// assert_eq!(entries[0].key, "doe2020");
/// ```
pub fn parse_entries(bib: &str) -> Vec<BibEntry> {
    let header_re = Regex::new(r"@\w+\{([^,]+),").unwrap();

    let bytes = bib.as_bytes();
    let mut entries = Vec::new();

    for cap in header_re.captures_iter(bib) {
        let start = cap.get(0).unwrap().start();
        let key = cap.get(1).unwrap().as_str();

        // Walk brace depth from the header's `@`; the entry ends where the
        // depth first returns to zero.
        let mut depth: i32 = 0;
        for (i, &b) in bytes.iter().enumerate().skip(start) {
            match b {
                b'{' => depth += 1,
                b'}' => {
                    depth -= 1;
                    if depth == 0 {
                        entries.push(BibEntry {
                            key: key.to_string(),
                            source: bib[start..=i].to_string(),
                        });
                        break;
                    }
                }
                _ => {}
            }
        }
    }

    entries
}

/// Extracts a field's value from one entry's source text.
///
/// The field name must not be immediately preceded by a word character, so
/// `title` does not match inside `subtitle`. Only the character *before* the
/// name is checked, not the one after; a field literally named `titleX`
/// would still false-match a search for `title`.
///
/// Recognized value forms are a brace-delimited value `{...}` (which may
/// itself contain one level of nested braces) and a quote-delimited value
/// `"..."`. The surrounding delimiters are stripped and the edges trimmed.
///
/// # Returns
///
/// The field's logical value, or `None` if the field is not present.
///
/// # Examples
///
/// ```
/// use cite_remap::extract_field;
///
/// let entry = r#"@article{k, title = {Effects of {X} and {Y}}, year = "2020"}"#;
/// assert_eq!(
///     extract_field(entry, "title").as_deref(),
///     Some("Effects of {X} and {Y}")
/// );
/// assert_eq!(extract_field(entry, "year").as_deref(), Some("2020"));
/// assert_eq!(extract_field(entry, "doi"), None);
/// ```
pub fn extract_field(entry: &str, field: &str) -> Option<String> {
    let pattern = format!(
        r#"{}\s*=\s*(\{{(?:[^{{}}]|\{{[^{{}}]*\}})*\}}|"[^"]*")"#,
        regex::escape(field)
    );
    let re = Regex::new(&pattern).unwrap();

    for cap in re.captures_iter(entry) {
        let m = cap.get(0).unwrap();

        // Skip matches where the field name is the tail of a longer word
        // (the regex crate has no lookbehind).
        let preceded_by_word = entry[..m.start()]
            .chars()
            .next_back()
            .map_or(false, |c| c.is_alphanumeric() || c == '_');
        if preceded_by_word {
            continue;
        }

        let raw = cap.get(1).unwrap().as_str().trim();
        let value = if (raw.starts_with('{') && raw.ends_with('}'))
            || (raw.starts_with('"') && raw.ends_with('"'))
        {
            &raw[1..raw.len() - 1]
        } else {
            raw
        };
        return Some(value.trim().to_string());
    }

    None
}
