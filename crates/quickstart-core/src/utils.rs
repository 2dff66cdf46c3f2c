//! Shared helpers for lookups and de-duplication
//!
//! YAML configs arrive with inconsistent casing, so most lookups in the
//! quickstart are case-insensitive. Ties between keys that normalize to the
//! same value are broken by the lexicographic order of the original keys so
//! that behaviour is stable across runs.

use std::collections::{BTreeMap, HashSet};

/// Normalize a key for case-insensitive comparison (trim + lowercase)
pub fn normalize_lookup_key(key: &str) -> String {
    key.trim().to_lowercase()
}

/// Order-preserving exact de-duplication; blank entries are dropped
pub fn dedupe_strings<I, S>(values: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for value in values {
        let value = value.as_ref().trim();
        if value.is_empty() {
            continue;
        }
        if seen.insert(value.to_string()) {
            out.push(value.to_string());
        }
    }
    out
}

/// Order-preserving case-insensitive de-duplication keeping first-seen casing
pub fn dedupe_case_insensitive<I, S>(values: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for value in values {
        let value = value.as_ref().trim();
        if value.is_empty() {
            continue;
        }
        if seen.insert(normalize_lookup_key(value)) {
            out.push(value.to_string());
        }
    }
    out
}

/// Order-preserving de-duplication of a map-like list by key (first wins)
pub fn dedupe_pairs<K, V>(pairs: Vec<(K, V)>) -> Vec<(K, V)>
where
    K: AsRef<str>,
{
    let mut seen = HashSet::new();
    pairs
        .into_iter()
        .filter(|(k, _)| seen.insert(k.as_ref().to_string()))
        .collect()
}

/// Sorted keys of a map
pub fn sorted_keys<V>(map: &BTreeMap<String, V>) -> Vec<String> {
    map.keys().cloned().collect()
}

/// Case-insensitive map lookup
///
/// An exact match wins. Otherwise every key whose normalized form equals the
/// normalized query is a candidate, and the lexicographically smallest
/// original key is returned.
pub fn case_insensitive_lookup<'a, V>(
    map: &'a BTreeMap<String, V>,
    key: &str,
) -> Option<(&'a str, &'a V)> {
    if let Some((k, v)) = map.get_key_value(key) {
        return Some((k.as_str(), v));
    }

    let wanted = normalize_lookup_key(key);
    if wanted.is_empty() {
        return None;
    }

    // BTreeMap iterates in key order, so the first hit is the tie-break winner
    map.iter()
        .find(|(k, _)| normalize_lookup_key(k) == wanted)
        .map(|(k, v)| (k.as_str(), v))
}

/// Normalize required-field names: trim, dedupe case-insensitively, sort
pub fn normalize_required_field_names<I, S>(fields: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out = dedupe_case_insensitive(fields);
    out.sort();
    out
}

/// Compare two locale lists as case-insensitive sets
pub fn locale_sets_match(a: &[String], b: &[String]) -> bool {
    let left: HashSet<String> = a.iter().map(|l| normalize_lookup_key(l)).collect();
    let right: HashSet<String> = b.iter().map(|l| normalize_lookup_key(l)).collect();
    left == right
}

/// Turn a label into a URL/ID-safe slug (`Content Types` → `content-types`)
pub fn slugify(label: &str) -> String {
    let mut slug = String::with_capacity(label.len());
    let mut pending_dash = false;

    for ch in label.trim().chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(ch.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }

    slug
}
