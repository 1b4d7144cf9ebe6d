//! Resolution error types.

use thiserror::Error;

/// Stable error codes, matching the Node.js resolver.
pub mod codes {
    pub const ERR_INVALID_PACKAGE_CONFIG: &str = "ERR_INVALID_PACKAGE_CONFIG";
    pub const ERR_INVALID_PACKAGE_TARGET: &str = "ERR_INVALID_PACKAGE_TARGET";
    pub const ERR_PACKAGE_PATH_NOT_EXPORTED: &str = "ERR_PACKAGE_PATH_NOT_EXPORTED";
    pub const ERR_PACKAGE_IMPORT_NOT_DEFINED: &str = "ERR_PACKAGE_IMPORT_NOT_DEFINED";
}

/// Error returned by `exports` / `imports` resolution.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The field itself is missing. Not a coded error: callers usually fall
    /// back to `main` here.
    #[error("\"{field}\" is required")]
    MissingField { field: &'static str },

    #[error("[ERR_INVALID_PACKAGE_CONFIG]: {message}")]
    InvalidConfig { message: String },

    #[error("[ERR_INVALID_PACKAGE_TARGET]: {message}")]
    InvalidTarget { message: String },

    #[error("[ERR_PACKAGE_PATH_NOT_EXPORTED]: {message}")]
    PathNotExported { message: String },

    #[error("[ERR_PACKAGE_IMPORT_NOT_DEFINED]: {message}")]
    ImportNotDefined { message: String },
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    pub fn invalid_target(message: impl Into<String>) -> Self {
        Self::InvalidTarget {
            message: message.into(),
        }
    }

    pub fn path_not_exported(message: impl Into<String>) -> Self {
        Self::PathNotExported {
            message: message.into(),
        }
    }

    pub fn import_not_defined(message: impl Into<String>) -> Self {
        Self::ImportNotDefined {
            message: message.into(),
        }
    }

    /// Machine-readable code, `None` for [`Error::MissingField`].
    #[must_use]
    pub fn code(&self) -> Option<&'static str> {
        match self {
            Self::MissingField { .. } => None,
            Self::InvalidConfig { .. } => Some(codes::ERR_INVALID_PACKAGE_CONFIG),
            Self::InvalidTarget { .. } => Some(codes::ERR_INVALID_PACKAGE_TARGET),
            Self::PathNotExported { .. } => Some(codes::ERR_PACKAGE_PATH_NOT_EXPORTED),
            Self::ImportNotDefined { .. } => Some(codes::ERR_PACKAGE_IMPORT_NOT_DEFINED),
        }
    }

    /// Human-readable message without the `[CODE]: ` prefix.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::MissingField { .. } => self.to_string(),
            Self::InvalidConfig { message }
            | Self::InvalidTarget { message }
            | Self::PathNotExported { message }
            | Self::ImportNotDefined { message } => message.clone(),
        }
    }
}
