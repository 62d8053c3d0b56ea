//! LaTeX citation commands.
//!
//! Extracts the citation keys referenced by `\cite{...}` commands and
//! rewrites those commands with remapped keys. Only the literal `\cite`
//! command is recognized; variants like `\citep` are out of scope.

use std::collections::{HashMap, HashSet};

use regex::{Captures, Regex};

/// Extracts the set of distinct citation keys referenced in the document.
///
/// A single `\cite{...}` command may list multiple comma-separated keys;
/// each key is trimmed of surrounding whitespace.
///
/// # Examples
///
/// ```
/// use cite_remap::extract_cite_keys;
///
/// let keys = extract_cite_keys(r"Prior work \cite{a, b} and \cite{a}.");
/// assert_eq!(keys.len(), 2);
/// assert!(keys.contains("a") && keys.contains("b"));
/// ```
pub fn extract_cite_keys(tex: &str) -> HashSet<String> {
    let cite_re = Regex::new(r"\\cite\{([^}]+)\}").unwrap();

    let mut keys = HashSet::new();
    for cap in cite_re.captures_iter(tex) {
        for key in cap[1].split(',') {
            keys.insert(key.trim().to_string());
        }
    }
    keys
}

/// Rewrites every `\cite{...}` command using the old-to-new key map.
///
/// Each comma-separated key is replaced by its mapped value when present, or
/// left as-is (trimmed) when absent, so unresolved keys pass through
/// unchanged. Keys are rejoined with `", "` regardless of original spacing.
pub fn replace_cite_keys(tex: &str, mapping: &HashMap<String, String>) -> String {
    let cite_re = Regex::new(r"\\cite\{([^}]+)\}").unwrap();

    cite_re
        .replace_all(tex, |caps: &Captures| {
            let keys: Vec<&str> = caps[1]
                .split(',')
                .map(|key| {
                    let key = key.trim();
                    mapping.get(key).map_or(key, String::as_str)
                })
                .collect();
            format!(r"\cite{{{}}}", keys.join(", "))
        })
        .into_owned()
}
