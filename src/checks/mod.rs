//! Check building blocks.
//!
//! Checks are plain functions returning a [`CheckOutcome`]. The helpers in
//! this module's children cover the three static tiers:
//! - markup: presence, count and attribute completeness over a parsed document
//! - stylesheet: permissive regex checks over raw CSS text
//! - script: substring checks over comment-stripped script text
//!
//! # Outcome rules
//!
//! - Requirement not met: `CheckError::Unmet`, reported as Fail (or Warn for
//!   advisory checks) and never fatal
//! - Optional artifact absent: `CheckError::Skipped`
//! - Malformed selector or pattern written by a check author:
//!   `CheckError::Harness`, which aborts the run
//!
//! The orchestrator additionally converts panics into failures, so a buggy
//! check never takes down the run.

pub mod markup;
pub mod script;
pub mod stylesheet;

use crate::error::GraderError;
use std::fmt;
use thiserror::Error;

/// A requirement the submission did not meet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    pub message: String,
    pub details: String,
}

impl Failure {
    pub fn new(message: impl Into<String>) -> Self {
        Failure {
            message: message.into(),
            details: String::new(),
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = details.into();
        self
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.details.is_empty() {
            write!(f, "{}", self.message)
        } else {
            write!(f, "{} ({})", self.message, self.details)
        }
    }
}

/// Why a check did not pass.
#[derive(Error, Debug)]
pub enum CheckError {
    #[error("{0}")]
    Unmet(Failure),

    #[error("skipped: {0}")]
    Skipped(String),

    #[error(transparent)]
    Harness(#[from] GraderError),
}

impl From<Failure> for CheckError {
    fn from(failure: Failure) -> Self {
        CheckError::Unmet(failure)
    }
}

/// `Ok` carries the pass message.
pub type CheckOutcome = std::result::Result<String, CheckError>;

/// Shorthand for an unmet requirement.
pub fn fail(message: impl Into<String>) -> CheckError {
    CheckError::Unmet(Failure::new(message))
}

/// Return `Err(fail(message))` unless `condition` holds.
pub fn ensure(condition: bool, message: impl Into<String>) -> Result<(), CheckError> {
    if condition {
        Ok(())
    } else {
        Err(fail(message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ensure_maps_to_unmet() {
        assert!(ensure(true, "unused").is_ok());
        match ensure(false, "missing <h1>") {
            Err(CheckError::Unmet(failure)) => assert_eq!(failure.message, "missing <h1>"),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn failure_display_includes_details() {
        let failure = Failure::new("list item 2 is empty").with_details("selector: ul li");
        assert_eq!(failure.to_string(), "list item 2 is empty (selector: ul li)");
    }

    #[test]
    fn harness_errors_convert() {
        let err: CheckError = GraderError::UnknownModule("module-99".into()).into();
        assert!(matches!(err, CheckError::Harness(_)));
    }
}
