//! Shared test helpers for integration tests.

/// Build one BibTeX entry from a key and (field, value) pairs.
///
/// Values are wrapped in braces, the way the fixtures' bibliographies are
/// written; pass braces inside the value to test nesting.
pub fn bib_entry(key: &str, fields: &[(&str, &str)]) -> String {
    let body: Vec<String> = fields
        .iter()
        .map(|(name, value)| format!("  {} = {{{}}},", name, value))
        .collect();
    format!("@article{{{},\n{}\n}}", key, body.join("\n"))
}

/// Build a bibliography document from several entries.
pub fn bib_file(entries: &[String]) -> String {
    entries.join("\n\n")
}
