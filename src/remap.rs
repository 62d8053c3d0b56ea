//! Old-to-new key resolution and the remapping pipeline.
//!
//! Ties the pieces together: parse both bibliographies, index the new one,
//! resolve every key the document cites, and rewrite the document. The whole
//! pipeline is pure text-in/text-out; file I/O stays at the process boundary.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use crate::bibtex::{extract_field, parse_entries};
use crate::index::{normalize_title, BibIndex};
use crate::latex::{extract_cite_keys, replace_cite_keys};

/// The result of remapping one document.
#[derive(Debug)]
pub struct RemapOutcome {
    /// The rewritten document text
    pub text: String,
    /// Original cited key → resolved new key, for every key that resolved
    pub mapping: HashMap<String, String>,
    /// Cited keys that could not be resolved, sorted; these pass through
    /// to the output unchanged
    pub unresolved: Vec<String>,
}

impl RemapOutcome {
    /// Serializable view of the outcome, with the mapping in key order.
    pub fn report(&self) -> RemapReport {
        RemapReport {
            remapped: self
                .mapping
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
            unresolved: self.unresolved.clone(),
        }
    }
}

/// Structured summary of a remapping run.
#[derive(Debug, Serialize)]
pub struct RemapReport {
    /// Original cited key → resolved new key
    pub remapped: BTreeMap<String, String>,
    /// Cited keys left unchanged in the output
    pub unresolved: Vec<String>,
}

/// Attempts to resolve one cited key to a key of the new bibliography.
///
/// A key carrying a literal `doi:` prefix has it stripped (once,
/// case-sensitive) before inspection. A key containing `/` is treated as a
/// literal or near-literal DOI: first an exact lookup in the DOI index, then
/// a linear scan comparing each trimmed DOI for exact equality. Any other key
/// is treated as an old-bibliography citation key and resolved through its
/// `title` field via the title index.
///
/// Returns `None` when no path resolves; the caller leaves such keys alone.
pub fn resolve_key(
    cite_key: &str,
    old_entries: &HashMap<String, String>,
    index: &BibIndex,
) -> Option<String> {
    let mut cleaned = cite_key.trim();
    if let Some(stripped) = cleaned.strip_prefix("doi:") {
        cleaned = stripped.trim();
    }

    if cleaned.contains('/') {
        if let Some(new_key) = index.doi_to_key.get(cleaned) {
            return Some(new_key.clone());
        }
        for (doi, new_key) in &index.doi_to_key {
            if cleaned == doi.trim() {
                return Some(new_key.clone());
            }
        }
        None
    } else if let Some(entry) = old_entries.get(cite_key) {
        let title = extract_field(entry, "title")?;
        index.title_to_key.get(&normalize_title(&title)).cloned()
    } else {
        None
    }
}

/// Remaps every citation key in `tex` from `old_bib` onto `new_bib`.
///
/// This is the whole pipeline: parse → index → match → substitute. Keys that
/// cannot be resolved are reported in [`RemapOutcome::unresolved`] and left
/// unchanged in the output text.
///
/// # Examples
///
/// ```
/// use cite_remap::remap_document;
///
/// let tex = r"As shown in \cite{old1}.";
/// let old_bib = "@article{old1, title = {Deep Learning}}";
/// let new_bib = "@article{new1, title = {Deep   Learning}, doi = {10.1000/xyz}}";
///
/// let outcome = remap_document(tex, old_bib, new_bib);
/// assert_eq!(outcome.text, r"As shown in \cite{new1}.");
/// ```
pub fn remap_document(tex: &str, old_bib: &str, new_bib: &str) -> RemapOutcome {
    let new_entries = parse_entries(new_bib);
    let old_entries: HashMap<String, String> = parse_entries(old_bib)
        .into_iter()
        .map(|entry| (entry.key, entry.source))
        .collect();

    let index = BibIndex::build(&new_entries);

    let mut mapping = HashMap::new();
    let mut unresolved = Vec::new();
    for cite_key in extract_cite_keys(tex) {
        match resolve_key(&cite_key, &old_entries, &index) {
            Some(new_key) => {
                // The map's input side is the key exactly as cited,
                // prefix and all.
                mapping.insert(cite_key, new_key);
            }
            None => unresolved.push(cite_key),
        }
    }
    unresolved.sort();

    let text = replace_cite_keys(tex, &mapping);

    RemapOutcome {
        text,
        mapping,
        unresolved,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry_map(bib: &str) -> HashMap<String, String> {
        parse_entries(bib)
            .into_iter()
            .map(|e| (e.key, e.source))
            .collect()
    }

    // ===========================================
    // Tests for resolve_key
    // ===========================================

    #[test]
    fn test_resolve_literal_doi_key() {
        // Given: A new bibliography indexed by DOI
        let new_entries = parse_entries("@article{new1, doi = {10.1000/xyz}}");
        let index = BibIndex::build(&new_entries);
        let old_entries = HashMap::new();

        // When: The document cites the DOI itself
        let resolved = resolve_key("10.1000/xyz", &old_entries, &index);

        // Then: It resolves to the entry's key
        assert_eq!(resolved.as_deref(), Some("new1"));
    }

    #[test]
    fn test_resolve_doi_prefixed_key() {
        let new_entries = parse_entries("@article{new1, doi = {10.1000/xyz}}");
        let index = BibIndex::build(&new_entries);

        let resolved = resolve_key("doi:10.1000/xyz", &HashMap::new(), &index);

        assert_eq!(resolved.as_deref(), Some("new1"));
    }

    #[test]
    fn test_resolve_doi_prefix_is_case_sensitive() {
        let new_entries = parse_entries("@article{new1, doi = {10.1000/xyz}}");
        let index = BibIndex::build(&new_entries);

        // `DOI:` is not the literal prefix; the slash still routes the key
        // down the DOI path, where `DOI:10.1000/xyz` matches nothing
        let resolved = resolve_key("DOI:10.1000/xyz", &HashMap::new(), &index);

        assert_eq!(resolved, None);
    }

    #[test]
    fn test_resolve_title_fallback() {
        // Given: An old entry whose title also appears in the new bibliography
        let old_entries = entry_map("@article{old1, title = {Deep Learning}}");
        let new_entries =
            parse_entries("@article{new1, title = {Deep   Learning}}");
        let index = BibIndex::build(&new_entries);

        // When: The document cites the old key
        let resolved = resolve_key("old1", &old_entries, &index);

        // Then: Normalization bridges the whitespace difference
        assert_eq!(resolved.as_deref(), Some("new1"));
    }

    #[test]
    fn test_resolve_title_fallback_braces_and_case() {
        let old_entries = entry_map("@article{old1, title = {{BERT}: Pre-training}}");
        let new_entries = parse_entries("@article{new1, title = {Bert: pre-training}}");
        let index = BibIndex::build(&new_entries);

        assert_eq!(
            resolve_key("old1", &old_entries, &index).as_deref(),
            Some("new1")
        );
    }

    #[test]
    fn test_resolve_unknown_key_fails() {
        let index = BibIndex::default();

        assert_eq!(resolve_key("ghost2020", &HashMap::new(), &index), None);
    }

    #[test]
    fn test_resolve_old_entry_without_title_fails() {
        let old_entries = entry_map("@misc{old1, year = {2019}}");
        let new_entries = parse_entries("@article{new1, title = {T}}");
        let index = BibIndex::build(&new_entries);

        assert_eq!(resolve_key("old1", &old_entries, &index), None);
    }

    #[test]
    fn test_resolve_title_not_in_new_bibliography_fails() {
        let old_entries = entry_map("@article{old1, title = {Gone Forever}}");
        let new_entries = parse_entries("@article{new1, title = {Something Else}}");
        let index = BibIndex::build(&new_entries);

        assert_eq!(resolve_key("old1", &old_entries, &index), None);
    }

    // ===========================================
    // Tests for remap_document
    // ===========================================

    #[test]
    fn test_remap_records_original_key_in_mapping() {
        // Given: A citation written with the doi: prefix
        let tex = r"\cite{doi:10.1000/xyz}";
        let new_bib = "@article{new1, doi = {10.1000/xyz}}";

        // When: We remap
        let outcome = remap_document(tex, "", new_bib);

        // Then: The mapping's input side preserves the prefix exactly as cited
        assert_eq!(
            outcome.mapping.get("doi:10.1000/xyz").map(String::as_str),
            Some("new1")
        );
        assert_eq!(outcome.text, r"\cite{new1}");
    }

    #[test]
    fn test_remap_unresolved_keys_reported_and_passed_through() {
        // Given: A document citing one resolvable and one unknown key
        let tex = r"\cite{old1} and \cite{mystery}";
        let old_bib = "@article{old1, title = {Deep Learning}}";
        let new_bib = "@article{new1, title = {Deep Learning}}";

        // When: We remap
        let outcome = remap_document(tex, old_bib, new_bib);

        // Then: The unknown key passes through and is listed in the report
        assert_eq!(outcome.text, r"\cite{new1} and \cite{mystery}");
        assert_eq!(outcome.unresolved, vec!["mystery".to_string()]);
    }

    #[test]
    fn test_remap_empty_bibliographies_normalizes_spacing_only() {
        // Given: No bibliographies at all
        let tex = r"Intro \cite{a ,b} outro.";

        // When: We remap
        let outcome = remap_document(tex, "", "");

        // Then: Output equals input up to ", " separator normalization
        assert_eq!(outcome.text, r"Intro \cite{a, b} outro.");
        assert!(outcome.mapping.is_empty());
        assert_eq!(outcome.unresolved, vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_remap_duplicate_old_keys_last_entry_wins() {
        // Given: The old bibliography defines the same key twice
        let tex = r"\cite{dup}";
        let old_bib = "@article{dup, title = {First Title}}\n@article{dup, title = {Second Title}}";
        let new_bib = "@article{new1, title = {Second Title}}";

        // When: We remap
        let outcome = remap_document(tex, old_bib, new_bib);

        // Then: The later definition's title is the one consulted
        assert_eq!(outcome.text, r"\cite{new1}");
    }

    #[test]
    fn test_report_is_serializable_and_ordered() {
        let tex = r"\cite{b1, a1}";
        let outcome = remap_document(tex, "", "");

        let json = serde_json::to_string(&outcome.report()).unwrap();

        assert!(json.contains("\"unresolved\":[\"a1\",\"b1\"]"));
        assert!(json.contains("\"remapped\":{}"));
    }
}
