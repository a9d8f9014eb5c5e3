//! Harness-level error types.
//!
//! A `GraderError` means the grading run itself is misconfigured (a fixture
//! is missing, a selector written by a check author is malformed, the config
//! file does not parse). These are fatal to the run. A student submission
//! that does not satisfy a check is never a `GraderError`; see
//! [`crate::checks::CheckError`].

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using `GraderError`.
pub type Result<T> = std::result::Result<T, GraderError>;

/// Fatal harness errors.
#[derive(Error, Debug)]
pub enum GraderError {
    #[error("fixture missing: {}", path.display())]
    FixtureMissing { path: PathBuf },

    #[error("fixture unreadable: {}: {source}", path.display())]
    FixtureUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid selector '{selector}': {reason}")]
    InvalidSelector { selector: String, reason: String },

    #[error("invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("unknown module: {0}")]
    UnknownModule(String),

    #[error("no module directories found under {}", .0.display())]
    NothingToGrade(PathBuf),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("config parse error in {}: {source}", path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error in {context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

impl GraderError {
    pub(crate) fn invalid_selector(selector: &str, reason: impl Into<String>) -> Self {
        GraderError::InvalidSelector {
            selector: selector.to_string(),
            reason: reason.into(),
        }
    }

    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        GraderError::Io {
            context: context.into(),
            source,
        }
    }
}
