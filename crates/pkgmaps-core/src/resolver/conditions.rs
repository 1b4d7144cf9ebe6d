//! Expansion of a map value (target, fallback array, condition object) into
//! literal targets.

use serde_json::{Map, Value};
use tracing::trace;

use super::trace::{steps, ResolveTraceStep, Tracer};
use crate::config::ResolveOptions;
use crate::error::{Error, Result};

/// Which package field is being resolved. Only used to label errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapKind {
    Exports,
    Imports,
}

impl MapKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Exports => "exports",
            Self::Imports => "imports",
        }
    }
}

impl std::fmt::Display for MapKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A map value, classified by shape.
#[derive(Debug, Clone, Copy)]
pub enum PathConditions<'a> {
    /// `null` or no matching key: resolves to nothing.
    Blocked,
    /// A literal target path.
    Target(&'a str),
    /// Fallback array; every element contributes.
    Fallback(&'a [Value]),
    /// Condition object; the first active key wins.
    Conditions(&'a Map<String, Value>),
    /// Numbers and booleans.
    Invalid(&'a Value),
}

impl<'a> From<Option<&'a Value>> for PathConditions<'a> {
    fn from(value: Option<&'a Value>) -> Self {
        match value {
            None | Some(Value::Null) => Self::Blocked,
            Some(Value::String(s)) => Self::Target(s),
            Some(Value::Array(items)) => Self::Fallback(items),
            Some(Value::Object(obj)) => Self::Conditions(obj),
            Some(other) => Self::Invalid(other),
        }
    }
}

/// Per-call state shared by every level of the recursion.
pub(crate) struct ConditionResolver<'a, 't> {
    kind: MapKind,
    options: &'a ResolveOptions,
    capture: Option<&'a str>,
    tracer: Tracer<'t>,
}

impl<'a, 't> ConditionResolver<'a, 't> {
    pub(crate) fn new(
        kind: MapKind,
        options: &'a ResolveOptions,
        capture: Option<&'a str>,
        tracer: Tracer<'t>,
    ) -> Self {
        Self {
            kind,
            options,
            capture,
            tracer,
        }
    }

    /// Give the tracer back to the caller.
    pub(crate) fn into_tracer(self) -> Tracer<'t> {
        self.tracer
    }

    /// Expand `value` into literal targets, in preference order.
    pub(crate) fn resolve(&mut self, value: Option<&Value>) -> Result<Vec<String>> {
        let mut out = Vec::new();
        self.resolve_into(PathConditions::from(value), 0, &mut out)?;
        Ok(out)
    }

    fn resolve_into(
        &mut self,
        value: PathConditions<'_>,
        depth: usize,
        out: &mut Vec<String>,
    ) -> Result<()> {
        if depth > self.options.max_depth {
            return Err(Error::invalid_config(format!(
                "\"{}\" exceeds the maximum nesting depth of {}",
                self.kind, self.options.max_depth
            )));
        }

        match value {
            PathConditions::Blocked => Ok(()),
            PathConditions::Target(target) => {
                out.push(self.expand_target(target)?);
                Ok(())
            }
            PathConditions::Fallback(items) => {
                for item in items {
                    self.resolve_into(PathConditions::from(Some(item)), depth + 1, out)?;
                }
                Ok(())
            }
            PathConditions::Conditions(obj) => {
                if obj.keys().any(|key| is_numeric_key(key)) {
                    return Err(Error::invalid_config(
                        "Cannot contain numeric property keys",
                    ));
                }

                let Some((condition, branch)) =
                    obj.iter().find(|(key, _)| self.options.is_active(key))
                else {
                    trace!(kind = %self.kind, "no active condition");
                    self.tracer.record(|| {
                        ResolveTraceStep::new(
                            steps::RESOLVE_CONDITION,
                            false,
                            format!("No active condition among {} key(s)", obj.len()),
                        )
                    });
                    return Ok(());
                };

                trace!(kind = %self.kind, condition = %condition, "selected condition");
                self.tracer.record(|| {
                    ResolveTraceStep::new(
                        steps::RESOLVE_CONDITION,
                        true,
                        format!("Selected condition \"{condition}\" at depth {depth}"),
                    )
                    .with_condition(condition.as_str())
                });
                self.resolve_into(PathConditions::from(Some(branch)), depth + 1, out)
            }
            PathConditions::Invalid(other) => Err(Error::invalid_target(format!(
                "Invalid \"{}\" target \"{}\"",
                self.kind,
                display_scalar(other)
            ))),
        }
    }

    /// Validate a literal target and substitute the wildcard capture.
    fn expand_target(&mut self, target: &str) -> Result<String> {
        if !is_safe_target(target) {
            self.tracer.record(|| {
                ResolveTraceStep::new(steps::VALIDATE_TARGET, false, "Unsafe path segment")
                    .with_target(target)
            });
            return Err(Error::invalid_target(format!(
                "Invalid \"{}\" target \"{target}\" defined in the package config",
                self.kind
            )));
        }

        Ok(match self.capture {
            Some(capture) => target.replace('*', capture),
            None => target.to_string(),
        })
    }
}

/// Render a scalar the way JavaScript string interpolation does: integral
/// floats lose their `.0`.
fn display_scalar(value: &Value) -> String {
    match value {
        Value::Number(n) if n.is_f64() => match n.as_f64() {
            Some(f) if f == 0.0 => "0".to_string(),
            Some(f) if f.fract() == 0.0 && f.abs() < 1e21 => format!("{f:.0}"),
            _ => n.to_string(),
        },
        other => other.to_string(),
    }
}

/// `^\d+$`: keys that would be ambiguous with array indices.
fn is_numeric_key(key: &str) -> bool {
    !key.is_empty() && key.bytes().all(|b| b.is_ascii_digit())
}

/// Reject `..` as the first segment and `.`, `..` or `node_modules` anywhere
/// after it. Both separators count.
fn is_safe_target(target: &str) -> bool {
    let mut segments = target.split(['/', '\\']);
    if segments.next() == Some("..") {
        return false;
    }
    !segments.any(|segment| {
        segment == "." || segment == ".." || segment.eq_ignore_ascii_case("node_modules")
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn resolve(value: &Value, conditions: &[&str], capture: Option<&str>) -> Result<Vec<String>> {
        let options = ResolveOptions::new(conditions);
        ConditionResolver::new(MapKind::Exports, &options, capture, Tracer::disabled())
            .resolve(Some(value))
    }

    #[test]
    fn test_null_resolves_to_nothing() {
        assert_eq!(resolve(&Value::Null, &[], None), Ok(vec![]));
    }

    #[test]
    fn test_string_target() {
        assert_eq!(
            resolve(&json!("./lib/index.js"), &[], None),
            Ok(vec!["./lib/index.js".to_string()])
        );
    }

    #[test]
    fn test_star_replaced_everywhere() {
        assert_eq!(
            resolve(&json!("./*/src/*.mjs"), &[], Some("match")),
            Ok(vec!["./match/src/match.mjs".to_string()])
        );
    }

    #[test]
    fn test_star_literal_without_capture() {
        assert_eq!(
            resolve(&json!("./lib/*.js"), &[], None),
            Ok(vec!["./lib/*.js".to_string()])
        );
    }

    #[test]
    fn test_fallback_concatenates_branches() {
        let value = json!(["./a.js", { "x": "./b.js" }, "./c.js"]);
        assert_eq!(
            resolve(&value, &[], None),
            Ok(vec!["./a.js".to_string(), "./c.js".to_string()])
        );
    }

    #[test]
    fn test_first_active_condition_in_map_order() {
        let value = json!({
            "node": { "import": "./node.import.js", "require": "./node.require.js" },
            "browser": { "import": "./browser.import.js" }
        });
        // Caller order does not matter
        assert_eq!(
            resolve(&value, &["import", "browser", "node"], None),
            Ok(vec!["./node.import.js".to_string()])
        );
        assert_eq!(
            resolve(&value, &["require", "browser"], None),
            Ok(vec![])
        );
    }

    #[test]
    fn test_default_branch() {
        let value = json!({ "condition-a": "./a.js", "default": "./index.js" });
        assert_eq!(
            resolve(&value, &["non-existent"], None),
            Ok(vec!["./index.js".to_string()])
        );
    }

    #[test]
    fn test_inactive_branch_never_evaluated() {
        let value = json!({ "other": "../escape.js", "default": "./ok.js" });
        assert_eq!(resolve(&value, &[], None), Ok(vec!["./ok.js".to_string()]));
    }

    #[test]
    fn test_selected_branch_short_circuits() {
        // Everything after the selected key is ignored, even invalid targets
        let value = json!({ "default": "./ok.js", "import": 1 });
        assert_eq!(
            resolve(&value, &["import"], None),
            Ok(vec!["./ok.js".to_string()])
        );
    }

    #[test]
    fn test_numeric_keys_rejected() {
        let value = json!({ "default": "./a.js", "0": "./b.js" });
        let err = resolve(&value, &[], None).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig { .. }));
        assert_eq!(err.message(), "Cannot contain numeric property keys");
    }

    #[test]
    fn test_invalid_value_types() {
        let err = resolve(&json!(1), &[], None).unwrap_err();
        assert_eq!(err.to_string(), "[ERR_INVALID_PACKAGE_TARGET]: Invalid \"exports\" target \"1\"");

        let err = resolve(&json!(true), &[], None).unwrap_err();
        assert_eq!(err.message(), "Invalid \"exports\" target \"true\"");
    }

    #[test]
    fn test_integral_float_target_rendered_as_integer() {
        let err = resolve(&json!(1.0), &[], None).unwrap_err();
        assert_eq!(err.message(), "Invalid \"exports\" target \"1\"");

        let err = resolve(&json!(-0.0), &[], None).unwrap_err();
        assert_eq!(err.message(), "Invalid \"exports\" target \"0\"");

        let err = resolve(&json!(1.5), &[], None).unwrap_err();
        assert_eq!(err.message(), "Invalid \"exports\" target \"1.5\"");
    }

    #[test]
    fn test_unsafe_targets() {
        for target in [
            "../entry",
            "./lib/../entry.js",
            "./lib/./entry.js",
            "./lib/node_modules/entry.js",
            "./lib/NODE_MODULES/entry.js",
            ".\\lib\\..\\entry.js",
            "./lib/.",
        ] {
            let err = resolve(&json!(target), &[], None).unwrap_err();
            assert_eq!(
                err.message(),
                format!("Invalid \"exports\" target \"{target}\" defined in the package config"),
                "{target} should be rejected"
            );
        }
    }

    #[test]
    fn test_safe_targets() {
        for target in ["./entry.js", "entry", "./", "dep/lib/x.js", "node_modules/x", "./.hidden"] {
            assert!(is_safe_target(target), "{target} should be accepted");
        }
    }

    #[test]
    fn test_validation_happens_before_substitution() {
        // A capture containing ".." is not re-validated here
        assert_eq!(
            resolve(&json!("./*.js"), &[], Some("../x")),
            Ok(vec!["./../x.js".to_string()])
        );
    }

    #[test]
    fn test_depth_ceiling() {
        let mut value = json!("./deep.js");
        for _ in 0..10 {
            value = json!([value]);
        }
        let options = ResolveOptions::default().with_max_depth(5);
        let err = ConditionResolver::new(MapKind::Imports, &options, None, Tracer::disabled())
            .resolve(Some(&value))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidConfig { .. }));
        assert!(err.message().contains("\"imports\" exceeds"));

        assert_eq!(
            resolve(&value, &[], None),
            Ok(vec!["./deep.js".to_string()])
        );
    }
}
