//! Subpath key matching, including `*` pattern keys.

use serde_json::{Map, Value};

const STAR: char = '*';

/// A key of the map selected for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathMatch<'a> {
    /// The matched key, exact or pattern.
    pub key: &'a str,
    /// Substring captured by the key's `*`; `None` for exact matches.
    pub capture: Option<&'a str>,
}

/// Find the key of `map` that best matches `request`.
///
/// An exact key always wins. Otherwise the most specific single-`*` pattern
/// wins, regardless of the order keys are declared in.
#[must_use]
pub fn find_matching_key<'a>(
    map: &'a Map<String, Value>,
    request: &'a str,
) -> Option<PathMatch<'a>> {
    if !request.contains(STAR) && map.contains_key(request) {
        return Some(PathMatch {
            key: request,
            capture: None,
        });
    }

    map.keys()
        .filter_map(|key| {
            let capture = match_pattern(key, request)?;
            Some(PathMatch {
                key: key.as_str(),
                capture: Some(capture),
            })
        })
        .max_by_key(|m| specificity(m.key))
}

/// Match a pattern key against a request.
///
/// Returns the `*` substitution value if matched.
/// E.g., pattern `"./features/*"` with request `"./features/foo"` returns `Some("foo")`.
/// Keys without exactly one `*` never match.
fn match_pattern<'r>(pattern: &str, request: &'r str) -> Option<&'r str> {
    let (prefix, suffix) = pattern.split_once(STAR)?;
    if suffix.contains(STAR) {
        return None;
    }

    if !request.starts_with(prefix) || !request.ends_with(suffix) {
        return None;
    }

    let start = prefix.len();
    let end = request.len().checked_sub(suffix.len())?;
    if start >= end {
        // Reject empty (or overlapping) star values
        return None;
    }

    Some(&request[start..end])
}

/// Ordering key for competing patterns: a later `*` wins, then a longer key.
///
/// Two distinct keys that both match a request never compare equal, so this
/// is a total order over any candidate set.
fn specificity(key: &str) -> (usize, usize) {
    (key.find(STAR).unwrap_or(0), key.len())
}
