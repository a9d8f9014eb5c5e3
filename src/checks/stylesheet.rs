//! Pattern checks over raw stylesheet text.
//!
//! Matching is permissive and order-insensitive. Nothing here decides whether
//! a declaration actually takes effect.

use crate::error::{GraderError, Result};
use regex::Regex;

#[derive(Debug, Clone)]
pub struct Stylesheet {
    text: String,
}

impl Stylesheet {
    pub fn new(text: impl Into<String>) -> Self {
        Stylesheet { text: text.into() }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// `prop\s*:` anywhere, case-insensitive.
    pub fn has_property(&self, property: &str) -> Result<bool> {
        self.matches(&format!(r"(?i){}\s*:", regex::escape(property)))
    }

    /// `selector\s*{` anywhere.
    pub fn has_rule_block(&self, selector: &str) -> Result<bool> {
        self.matches(&format!(r"{}\s*\{{", regex::escape(selector)))
    }

    /// A `selector { ... }` block declaring `property`, case-insensitive.
    pub fn rule_sets_property(&self, selector: &str, property: &str) -> Result<bool> {
        self.matches(&format!(
            r"(?i){}\s*\{{[^}}]*{}\s*:",
            regex::escape(selector),
            regex::escape(property)
        ))
    }

    /// Occurrences of a literal substring.
    pub fn count(&self, literal: &str) -> usize {
        if literal.is_empty() {
            return 0;
        }
        self.text.matches(literal).count()
    }

    pub fn contains(&self, literal: &str) -> bool {
        self.text.contains(literal)
    }

    pub fn contains_any(&self, literals: &[&str]) -> bool {
        literals.iter().any(|l| self.text.contains(l))
    }

    /// Match an arbitrary regex written by a check author.
    pub fn matches(&self, pattern: &str) -> Result<bool> {
        let regex = Regex::new(pattern).map_err(|source| GraderError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })?;
        Ok(regex.is_match(&self.text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSS: &str = r#"
/* Base */
body {
  font-family: Georgia, serif;
  margin: 0;
}
h1 { COLOR: navy; }
.card{padding:1rem}
@media (min-width: 768px) { .grid { display:grid; } }
@media (min-width: 1024px) { .grid { gap: 2rem; } }
"#;

    #[test]
    fn property_lookup_is_case_insensitive() {
        let css = Stylesheet::new(CSS);
        assert!(css.has_property("font-family").unwrap());
        assert!(css.has_property("color").unwrap());
        assert!(!css.has_property("border").unwrap());
    }

    #[test]
    fn rule_blocks_and_declarations() {
        let css = Stylesheet::new(CSS);
        assert!(css.has_rule_block("body").unwrap());
        assert!(css.has_rule_block(".card").unwrap());
        assert!(css.rule_sets_property("h1", "color").unwrap());
        assert!(!css.rule_sets_property("h2", "color").unwrap());
        assert!(!css.rule_sets_property("body", "padding").unwrap());
    }

    #[test]
    fn literal_counts() {
        let css = Stylesheet::new(CSS);
        assert_eq!(css.count("@media"), 2);
        assert!(css.contains("min-width"));
        assert!(css.contains_any(&["display: flex", "display:grid"]));
        assert_eq!(css.count(""), 0);
    }

    #[test]
    fn invalid_pattern_is_harness_error() {
        let err = Stylesheet::new(CSS).matches("(unclosed").unwrap_err();
        assert!(matches!(err, GraderError::InvalidPattern { .. }));
    }

    #[test]
    fn blank_sheet() {
        assert!(Stylesheet::new("  \n\t").is_blank());
        assert!(!Stylesheet::new(CSS).is_blank());
    }
}
