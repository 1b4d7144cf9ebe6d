use serde::{Deserialize, Serialize};

/// Default ceiling on nested arrays / condition objects.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Options for a single resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolveOptions {
    /// Active condition names. `default` is always active and need not be listed.
    /// Order is irrelevant: the manifest's key order decides priority.
    pub conditions: Vec<String>,

    /// Maximum nesting depth of fallback arrays and condition objects.
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
}

fn default_max_depth() -> usize {
    DEFAULT_MAX_DEPTH
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            conditions: Vec::new(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl ResolveOptions {
    /// Create options with the given active conditions.
    #[must_use]
    pub fn new<S: AsRef<str>>(conditions: &[S]) -> Self {
        Self {
            conditions: conditions.iter().map(|c| c.as_ref().to_string()).collect(),
            ..Default::default()
        }
    }

    /// Add an active condition.
    #[must_use]
    pub fn with_condition(mut self, condition: impl Into<String>) -> Self {
        self.conditions.push(condition.into());
        self
    }

    /// Set the nesting depth ceiling.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Whether `condition` selects a branch: `default` or any active condition.
    #[must_use]
    pub fn is_active(&self, condition: &str) -> bool {
        condition == "default" || self.conditions.iter().any(|c| c == condition)
    }
}

/// Resolution kind determines the conventional condition set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolutionKind {
    /// ESM import (`node`, `import`)
    Import,
    /// CJS require (`node`, `require`)
    Require,
    /// Unknown (`node` only, so `default` branches apply)
    #[default]
    Unknown,
}

impl ResolutionKind {
    /// Convert from import kind string (from an import scanner).
    #[must_use]
    pub fn from_import_kind(kind: &str) -> Self {
        match kind {
            "esm_import" | "esm_export" | "dynamic_import" => Self::Import,
            "cjs_require" => Self::Require,
            _ => Self::Unknown,
        }
    }

    /// Conditions a Node.js loader activates for this kind.
    #[must_use]
    pub fn conditions(self) -> &'static [&'static str] {
        match self {
            Self::Import => &["node", "import"],
            Self::Require => &["node", "require"],
            Self::Unknown => &["node"],
        }
    }

    /// Resolve options with this kind's conditions.
    #[must_use]
    pub fn options(self) -> ResolveOptions {
        ResolveOptions::new(self.conditions())
    }
}

impl std::fmt::Display for ResolutionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Import => write!(f, "import"),
            Self::Require => write!(f, "require"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}
