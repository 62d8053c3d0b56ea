//! cite-remap: CLI for remapping LaTeX citation keys onto a new BibTeX bibliography.
//!
//! This library provides functionality to:
//! - Parse BibTeX bibliographies into per-entry source chunks
//! - Extract entry fields and build DOI/title lookup indexes
//! - Extract `\cite{...}` keys from LaTeX documents
//! - Resolve old citation keys to new ones via DOI or normalized-title matching
//! - Rewrite the document with the remapped keys

pub mod bibtex;
pub mod index;
pub mod latex;
pub mod remap;

pub use bibtex::{extract_field, load_bibliography, parse_entries, BibEntry};
pub use index::{doi_from_url, normalize_title, BibIndex};
pub use latex::{extract_cite_keys, replace_cite_keys};
pub use remap::{remap_document, resolve_key, RemapOutcome, RemapReport};
