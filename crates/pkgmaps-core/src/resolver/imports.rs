//! Package.json `imports` field evaluation.
//!
//! Same matching and condition rules as `exports`, except that keys are always
//! subpaths (usually `#`-prefixed), requests are used verbatim, and targets
//! may be bare package names.

use serde_json::Value;
use tracing::debug;

use super::conditions::{ConditionResolver, MapKind};
use super::matcher::find_matching_key;
use super::trace::{steps, ResolveTrace, ResolveTraceStep, Tracer};
use crate::config::ResolveOptions;
use crate::error::{Error, Result};

/// Resolve `request` (e.g. `"#internal/utils"`) against an `imports` field.
pub fn resolve_imports<S: AsRef<str>>(
    imports: Option<&Value>,
    request: &str,
    conditions: &[S],
) -> Result<Vec<String>> {
    resolve_imports_with(imports, request, &ResolveOptions::new(conditions))
}

/// [`resolve_imports`] with explicit options.
pub fn resolve_imports_with(
    imports: Option<&Value>,
    request: &str,
    options: &ResolveOptions,
) -> Result<Vec<String>> {
    resolve(imports, request, options, Tracer::disabled())
}

/// [`resolve_imports_with`], also returning the steps taken.
pub fn resolve_imports_with_trace(
    imports: Option<&Value>,
    request: &str,
    options: &ResolveOptions,
) -> (Result<Vec<String>>, ResolveTrace) {
    let mut trace = ResolveTrace::new();
    let result = resolve(imports, request, options, Tracer::new(Some(&mut trace)));
    (result, trace)
}

/// Resolve against the `imports` field of a parsed package.json.
pub fn resolve_package_imports<S: AsRef<str>>(
    pkg_json: &Value,
    request: &str,
    conditions: &[S],
) -> Result<Vec<String>> {
    resolve_imports(pkg_json.get("imports"), request, conditions)
}

fn resolve(
    imports: Option<&Value>,
    request: &str,
    options: &ResolveOptions,
    mut tracer: Tracer<'_>,
) -> Result<Vec<String>> {
    let imports = match imports {
        None | Some(Value::Null) => {
            return Err(Error::MissingField {
                field: MapKind::Imports.as_str(),
            })
        }
        Some(Value::Object(obj)) => obj,
        Some(_) => return Err(Error::invalid_config("\"imports\" must be an object")),
    };

    let (capture, value) = match find_matching_key(imports, request) {
        Some(found) => {
            debug!(request, key = found.key, capture = ?found.capture, "matched imports key");
            tracer.record(|| {
                let step = ResolveTraceStep::new(steps::MATCH_KEY, true, "Matched imports key")
                    .with_key(found.key);
                match found.capture {
                    Some(capture) => step.with_capture(capture),
                    None => step,
                }
            });
            (found.capture, imports.get(found.key))
        }
        None => {
            tracer.record(|| ResolveTraceStep::new(steps::MATCH_KEY, false, "No matching key"));
            (None, None)
        }
    };

    let mut resolver = ConditionResolver::new(MapKind::Imports, options, capture, tracer);
    let resolved = resolver.resolve(value)?;
    let mut tracer = resolver.into_tracer();

    if resolved.is_empty() {
        debug!(request, "imports resolved to no targets");
        let message = format!("Package import specifier \"{request}\" is not defined in package");
        tracer.record(|| ResolveTraceStep::new(steps::FINAL_TARGETS, false, message.clone()));
        return Err(Error::import_not_defined(message));
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
