//! Presence checks over comment-stripped script text.
//!
//! Stripping is two regex passes: line comments first, then block comments.
//! All presence and absence checks see only the stripped text, so a construct
//! mentioned in a comment is neither used nor forbidden.

use crate::error::{GraderError, Result};
use regex::Regex;
use std::sync::OnceLock;

static LINE_COMMENT: OnceLock<Regex> = OnceLock::new();
static BLOCK_COMMENT: OnceLock<Regex> = OnceLock::new();

fn strip_comments(raw: &str) -> String {
    let line = LINE_COMMENT.get_or_init(|| Regex::new(r"//.*").expect("line comment pattern is valid"));
    let block = BLOCK_COMMENT
        .get_or_init(|| Regex::new(r"(?s)/\*.*?\*/").expect("block comment pattern is valid"));

    let without_lines = line.replace_all(raw, "");
    block.replace_all(&without_lines, "").into_owned()
}

/// Script or TypeScript source with its comment-free view.
#[derive(Debug, Clone)]
pub struct ScriptSource {
    raw: String,
    stripped: String,
}

impl ScriptSource {
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let stripped = strip_comments(&raw);
        ScriptSource { raw, stripped }
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn stripped(&self) -> &str {
        &self.stripped
    }

    /// True when nothing but comments and whitespace remain.
    pub fn is_effectively_empty(&self) -> bool {
        self.stripped.trim().is_empty()
    }

    pub fn uses(&self, construct: &str) -> bool {
        self.stripped.contains(construct)
    }

    pub fn uses_any(&self, constructs: &[&str]) -> bool {
        constructs.iter().any(|c| self.uses(c))
    }

    pub fn uses_all(&self, constructs: &[&str]) -> bool {
        constructs.iter().all(|c| self.uses(c))
    }

    pub fn count(&self, construct: &str) -> usize {
        if construct.is_empty() {
            return 0;
        }
        self.stripped.matches(construct).count()
    }

    /// Regex over the stripped text.
    pub fn matches(&self, pattern: &str) -> Result<bool> {
        let regex = Regex::new(pattern).map_err(|source| GraderError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })?;
        Ok(regex.is_match(&self.stripped))
    }
}
