//! Package.json `exports` field evaluation.
//!
//! Implements Node.js-compatible exports resolution:
//! - Root exports, including the string / array / conditions sugar forms
//! - Subpath exports (`"./feature"`)
//! - Pattern exports with a single `*` wildcard (`"./features/*"`)
//! - Conditional exports, nested to any depth, and fallback arrays
//! - `null` targets blocking less specific patterns

use serde_json::{Map, Value};
use tracing::debug;

use super::conditions::{ConditionResolver, MapKind};
use super::matcher::{find_matching_key, PathMatch};
use super::trace::{steps, ResolveTrace, ResolveTraceStep, Tracer};
use crate::config::ResolveOptions;
use crate::error::{Error, Result};

const ROOT: &str = ".";

/// The exports field after sugar normalization.
#[derive(Debug, Clone, Copy)]
enum ExportsMap<'a> {
    /// String, array, or conditions object: shorthand for `{ ".": value }`.
    Root(&'a Value),
    /// Object keyed by subpaths.
    Subpaths(&'a Map<String, Value>),
    /// `true` or a non-zero number: not a map, so no request matches.
    Opaque,
}

impl<'a> ExportsMap<'a> {
    fn normalize(exports: &'a Value) -> Result<Self> {
        match exports {
            Value::Object(obj) => match is_conditions_object(obj)? {
                Some(true) => Ok(Self::Root(exports)),
                _ => Ok(Self::Subpaths(obj)),
            },
            Value::String(_) | Value::Array(_) => Ok(Self::Root(exports)),
            _ => Ok(Self::Opaque),
        }
    }

    fn find(self, request: &'a str) -> Option<(PathMatch<'a>, &'a Value)> {
        match self {
            Self::Root(value) => (request == ROOT).then_some((
                PathMatch {
                    key: ROOT,
                    capture: None,
                },
                value,
            )),
            Self::Subpaths(obj) => {
                let found = find_matching_key(obj, request)?;
                Some((found, obj.get(found.key)?))
            }
            Self::Opaque => None,
        }
    }
}

/// Whether every key is a condition name (`""` or not starting with `.`).
///
/// Returns `None` for an empty object and fails if the key styles are mixed.
fn is_conditions_object(obj: &Map<String, Value>) -> Result<Option<bool>> {
    let mut style = None;
    for key in obj.keys() {
        let is_condition = key.is_empty() || !key.starts_with('.');
        match style {
            None => style = Some(is_condition),
            Some(first) if first != is_condition => {
                return Err(Error::invalid_config(
                    "\"exports\" cannot contain some keys starting with \".\" and some not",
                ));
            }
            Some(_) => {}
        }
    }
    Ok(style)
}

/// `null`, `false`, `0` and `""` count as a missing field.
fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f == 0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}

/// `./`-relative, or protocol-qualified (`^\w+:`, e.g. `node:fs`).
fn is_valid_export_target(target: &str) -> bool {
    if target.starts_with("./") {
        return true;
    }
    match target.find(':') {
        Some(colon) if colon > 0 => target[..colon]
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_'),
        _ => false,
    }
}

/// Resolve `request` against an `exports` field.
///
/// `request` is the subpath after the package name, without a leading `./`:
/// `""` for the package root, `"feature"` for `pkg/feature`.
///
/// Returns every candidate target in preference order. Callers load the
/// first one that exists.
pub fn resolve_exports<S: AsRef<str>>(
    exports: Option<&Value>,
    request: &str,
    conditions: &[S],
) -> Result<Vec<String>> {
    resolve_exports_with(exports, request, &ResolveOptions::new(conditions))
}

/// [`resolve_exports`] with explicit options.
pub fn resolve_exports_with(
    exports: Option<&Value>,
    request: &str,
    options: &ResolveOptions,
) -> Result<Vec<String>> {
    resolve(exports, request, options, Tracer::disabled())
}

/// [`resolve_exports_with`], also returning the steps taken.
pub fn resolve_exports_with_trace(
    exports: Option<&Value>,
    request: &str,
    options: &ResolveOptions,
) -> (Result<Vec<String>>, ResolveTrace) {
    let mut trace = ResolveTrace::new();
    let result = resolve(exports, request, options, Tracer::new(Some(&mut trace)));
    (result, trace)
}

/// Resolve against the `exports` field of a parsed package.json.
pub fn resolve_package_exports<S: AsRef<str>>(
    pkg_json: &Value,
    request: &str,
    conditions: &[S],
) -> Result<Vec<String>> {
    resolve_exports(pkg_json.get("exports"), request, conditions)
}

fn resolve(
    exports: Option<&Value>,
    request: &str,
    options: &ResolveOptions,
    mut tracer: Tracer<'_>,
) -> Result<Vec<String>> {
    let exports = match exports {
        Some(value) if !is_falsy(value) => value,
        _ => {
            return Err(Error::MissingField {
                field: MapKind::Exports.as_str(),
            })
        }
    };

    let request = if request.is_empty() {
        ROOT.to_string()
    } else {
        format!("./{request}")
    };
    tracer.record(|| {
        ResolveTraceStep::new(steps::NORMALIZE_REQUEST, true, format!("Request: {request}"))
    });

    let map = ExportsMap::normalize(exports)?;
    tracer.record(|| match map {
        ExportsMap::Root(_) => {
            ResolveTraceStep::new(steps::NORMALIZE_SUGAR, true, "Shorthand for { \".\": exports }")
        }
        ExportsMap::Subpaths(obj) => ResolveTraceStep::new(
            steps::NORMALIZE_SUGAR,
            true,
            format!("Subpath map with {} key(s)", obj.len()),
        ),
        ExportsMap::Opaque => {
            ResolveTraceStep::new(steps::NORMALIZE_SUGAR, true, "Not a map, nothing matches")
        }
    });

    let found = map.find(&request);
    let (capture, value) = match found {
        Some((path_match, value)) => {
            debug!(request = %request, key = path_match.key, capture = ?path_match.capture, "matched exports key");
            tracer.record(|| {
                let step = ResolveTraceStep::new(steps::MATCH_KEY, true, "Matched exports key")
                    .with_key(path_match.key);
                match path_match.capture {
                    Some(capture) => step.with_capture(capture),
                    None => step,
                }
            });
            (path_match.capture, Some(value))
        }
        None => {
            tracer.record(|| ResolveTraceStep::new(steps::MATCH_KEY, false, "No matching key"));
            (None, None)
        }
    };

    let mut resolver = ConditionResolver::new(MapKind::Exports, options, capture, tracer);
    let resolved = resolver.resolve(value)?;
    let mut tracer = resolver.into_tracer();

    if resolved.is_empty() {
        debug!(request = %request, "exports resolved to no targets");
        let message = if request == ROOT {
            "No \"exports\" main defined".to_string()
        } else {
            format!("Package subpath '{request}' is not defined by \"exports\"")
        };
        tracer.record(|| ResolveTraceStep::new(steps::FINAL_TARGETS, false, message.clone()));
        return Err(Error::path_not_exported(message));
    }

    if let Some(invalid) = resolved.iter().find(|t| !is_valid_export_target(t)) {
        tracer.record(|| {
            ResolveTraceStep::new(
                steps::VALIDATE_TARGET,
                false,
                "Target is neither ./-relative nor protocol-qualified",
            )
            .with_target(invalid.as_str())
        });
        return Err(Error::invalid_target(format!(
            "Invalid \"exports\" target \"{invalid}\" defined in the package config"
        )));
    }

    tracer.record(|| {
        ResolveTraceStep::new(
            steps::FINAL_TARGETS,
            true,
            format!("Resolved {} target(s): {}", resolved.len(), resolved.join(", ")),
        )
    });
    Ok(resolved)
}
