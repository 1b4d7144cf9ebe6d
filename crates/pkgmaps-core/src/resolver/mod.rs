//! Package `exports` / `imports` map resolution.
//!
//! Flow: entry point (exports or imports) → key matcher (exact key or best
//! `*` pattern) → condition resolver (targets, fallback arrays, nested
//! conditions) → entry point (post-validation, not-found errors).
//!
//! Nothing here touches the filesystem; callers check the returned candidates on disk.

mod conditions;
mod exports;
mod imports;
mod matcher;
pub mod trace;

pub use conditions::{MapKind, PathConditions};
pub use exports::{
    resolve_exports, resolve_exports_with, resolve_exports_with_trace, resolve_package_exports,
};
pub use imports::{
    resolve_imports, resolve_imports_with, resolve_imports_with_trace, resolve_package_imports,
};
pub use matcher::{find_matching_key, PathMatch};
pub use trace::{steps as trace_steps, ResolveTrace, ResolveTraceStep, TRACE_SCHEMA_VERSION};
