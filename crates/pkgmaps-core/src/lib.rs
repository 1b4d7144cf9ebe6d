#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

//! Resolution of package.json `exports` and `imports` maps.
//!
//! Given a package's map, a requested subpath, and the active conditions,
//! returns the ordered candidate targets a module loader should try, with
//! Node.js-compatible matching, condition selection, and target validation.

pub mod config;
pub mod error;
pub mod resolver;

pub use config::{ResolutionKind, ResolveOptions, DEFAULT_MAX_DEPTH};
pub use error::{Error, Result};
pub use resolver::{
    find_matching_key, resolve_exports, resolve_exports_with, resolve_exports_with_trace,
    resolve_imports, resolve_imports_with, resolve_imports_with_trace, resolve_package_exports,
    resolve_package_imports, MapKind, PathConditions, PathMatch, ResolveTrace, ResolveTraceStep,
};
