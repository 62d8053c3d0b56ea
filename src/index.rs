//! DOI and title lookup indexes over the new bibliography.
//!
//! Builds the two maps the key resolver matches against: normalized DOI →
//! citation key and normalized title → citation key. A DOI comes from an
//! entry's explicit `doi` field, or is recovered from its `url` field when no
//! explicit DOI exists.

use std::collections::HashMap;

use regex::Regex;

use crate::bibtex::{extract_field, BibEntry};

/// Normalizes a title for fuzzy comparison: literal braces removed, runs of
/// whitespace collapsed to one space, lower-cased, trimmed.
///
/// # Examples
///
/// ```
/// use cite_remap::normalize_title;
///
/// assert_eq!(normalize_title("{Deep}   Learning "), "deep learning");
/// ```
pub fn normalize_title(title: &str) -> String {
    let unbraced: String = title.chars().filter(|&c| c != '{' && c != '}').collect();
    unbraced
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Recovers a DOI-shaped token from a URL, e.g. `10.1000/abc` out of
/// `https://doi.org/10.1000/abc`.
///
/// Returns `None` unless the URL contains the substring `10.` and a token
/// matching `10.<4-9 digits>/<non-whitespace-run>`.
pub fn doi_from_url(url: &str) -> Option<String> {
    if !url.contains("10.") {
        return None;
    }
    let doi_re = Regex::new(r"10\.\d{4,9}/\S+").unwrap();
    doi_re.find(url).map(|m| m.as_str().trim().to_string())
}

/// Lookup indexes derived from the new bibliography.
#[derive(Debug, Default)]
pub struct BibIndex {
    /// Trimmed DOI string → citation key
    pub doi_to_key: HashMap<String, String>,
    /// Normalized title → citation key
    pub title_to_key: HashMap<String, String>,
}

impl BibIndex {
    /// Builds both indexes from the new bibliography's entries.
    ///
    /// Entries are visited in document order, so on a DOI or title collision
    /// the last entry in the file wins. Entries contributing neither a DOI
    /// nor a title appear in neither index.
    pub fn build(entries: &[BibEntry]) -> Self {
        let mut index = BibIndex::default();

        for entry in entries {
            let mut doi = extract_field(&entry.source, "doi");
            if doi.is_none() {
                if let Some(url) = extract_field(&entry.source, "url") {
                    doi = doi_from_url(&url);
                }
            }
            if let Some(doi) = doi {
                index
                    .doi_to_key
                    .insert(doi.trim().to_string(), entry.key.clone());
            }

            if let Some(title) = extract_field(&entry.source, "title") {
                index
                    .title_to_key
                    .insert(normalize_title(&title), entry.key.clone());
            }
        }

        index
    }
}
