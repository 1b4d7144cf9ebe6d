//! Resolution tracing.
//!
//! Records the decisions taken while resolving a request so tooling can
//! explain why a request resolved (or failed to resolve) the way it did.

use serde::Serialize;

/// Schema version for serialized traces.
/// Bump when the trace structure changes incompatibly.
pub const TRACE_SCHEMA_VERSION: u32 = 1;

/// A single step in the resolution trace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolveTraceStep {
    /// Step name (see [`steps`])
    pub step: &'static str,
    /// Whether this step succeeded
    pub ok: bool,
    /// Human-readable description of what happened
    pub detail: String,
    /// Map key matched, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    /// Wildcard capture, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capture: Option<String>,
    /// Condition selected, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
    /// Target produced or rejected, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
}

impl ResolveTraceStep {
    /// Create a new trace step.
    pub fn new(step: &'static str, ok: bool, detail: impl Into<String>) -> Self {
        Self {
            step,
            ok,
            detail: detail.into(),
            key: None,
            capture: None,
            condition: None,
            target: None,
        }
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn with_capture(mut self, capture: impl Into<String>) -> Self {
        self.capture = Some(capture.into());
        self
    }

    pub fn with_condition(mut self, condition: impl Into<String>) -> Self {
        self.condition = Some(condition.into());
        self
    }

    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }
}

/// Complete resolution trace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolveTrace {
    /// Always [`TRACE_SCHEMA_VERSION`]
    pub schema_version: u32,
    /// Ordered list of resolution steps
    pub steps: Vec<ResolveTraceStep>,
}

impl Default for ResolveTrace {
    fn default() -> Self {
        Self {
            schema_version: TRACE_SCHEMA_VERSION,
            steps: Vec::new(),
        }
    }
}

impl ResolveTrace {
    /// Create a new empty trace.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a step to the trace.
    pub fn add_step(&mut self, step: ResolveTraceStep) {
        self.steps.push(step);
    }

    /// Steps with the given name, in order.
    pub fn find(&self, step: &str) -> impl Iterator<Item = &ResolveTraceStep> {
        let step = step.to_string();
        self.steps.iter().filter(move |s| s.step == step)
    }
}

/// Optional trace sink threaded through resolution.
///
/// Keeps call sites free of `if let Some(trace)` noise.
pub(crate) struct Tracer<'t>(Option<&'t mut ResolveTrace>);

impl<'t> Tracer<'t> {
    pub(crate) fn new(trace: Option<&'t mut ResolveTrace>) -> Self {
        Self(trace)
    }

    pub(crate) fn disabled() -> Self {
        Self(None)
    }

    pub(crate) fn record(&mut self, step: impl FnOnce() -> ResolveTraceStep) {
        if let Some(trace) = self.0.as_deref_mut() {
            trace.add_step(step());
        }
    }
}

/// Step names used in resolution tracing.
pub mod steps {
    pub const NORMALIZE_REQUEST: &str = "normalize_request";
    pub const NORMALIZE_SUGAR: &str = "normalize_sugar";
    pub const MATCH_KEY: &str = "match_key";
    pub const RESOLVE_CONDITION: &str = "resolve_condition";
    pub const VALIDATE_TARGET: &str = "validate_target";
    pub const FINAL_TARGETS: &str = "final_targets";
}
