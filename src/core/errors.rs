//! RLOG-prefixed error types with structured error codes.

#![allow(missing_docs)]

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Shared `Result` alias for the project.
pub type Result<T> = std::result::Result<T, ResultLogError>;

/// Top-level error type for the result-log subsystem.
#[derive(Debug, Error)]
pub enum ResultLogError {
    #[error("[RLOG-1001] invalid configuration: {details}")]
    InvalidConfig { details: String },

    #[error("[RLOG-1002] missing configuration file: {path}")]
    MissingConfig { path: PathBuf },

    #[error("[RLOG-1003] configuration parse failure in {context}: {details}")]
    ConfigParse {
        context: &'static str,
        details: String,
    },

    #[error("[RLOG-2001] {sink} sink is in {mode} mode; {operation} is not available")]
    ModeMismatch {
        sink: &'static str,
        mode: &'static str,
        operation: &'static str,
    },

    #[error("[RLOG-2101] serialization failure in {context}: {details}")]
    Serialization {
        context: &'static str,
        details: String,
    },

    #[error("[RLOG-3001] cannot create log directory {path}: {source}")]
    DirectoryCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("[RLOG-3002] IO failure at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("[RLOG-3003] channel closed in component {component}")]
    ChannelClosed { component: &'static str },

    #[error("[RLOG-3900] runtime failure: {details}")]
    Runtime { details: String },
}

impl ResultLogError {
    /// Stable machine-parseable error code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidConfig { .. } => "RLOG-1001",
            Self::MissingConfig { .. } => "RLOG-1002",
            Self::ConfigParse { .. } => "RLOG-1003",
            Self::ModeMismatch { .. } => "RLOG-2001",
            Self::Serialization { .. } => "RLOG-2101",
            Self::DirectoryCreate { .. } => "RLOG-3001",
            Self::Io { .. } => "RLOG-3002",
            Self::ChannelClosed { .. } => "RLOG-3003",
            Self::Runtime { .. } => "RLOG-3900",
        }
    }

    /// Whether retrying might resolve the failure.
    ///
    /// A failed write leaves the sink usable, so IO failures are retryable.
    /// Directory creation happens during construction and is not.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Io { .. } | Self::ChannelClosed { .. } | Self::Runtime { .. }
        )
    }

    /// Convenience constructor for IO errors with a known path.
    #[must_use]
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }
}

impl From<serde_json::Error> for ResultLogError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialization {
            context: "serde_json",
            details: value.to_string(),
        }
    }
}

impl From<toml::de::Error> for ResultLogError {
    fn from(value: toml::de::Error) -> Self {
        Self::ConfigParse {
            context: "toml",
            details: value.to_string(),
        }
    }
}

impl From<toml::ser::Error> for ResultLogError {
    fn from(value: toml::ser::Error) -> Self {
        Self::Serialization {
            context: "toml",
            details: value.to_string(),
        }
    }
}
