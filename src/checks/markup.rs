//! Structural checks over a parsed document.
//!
//! Failures name the offending instance by 1-based index ("list item 2 is
//! empty", "image 1 is missing alt"). Whitespace-only text counts as empty.

use crate::checks::{ensure, fail, CheckError, CheckOutcome};
use crate::dom::{Document, NodeId};

/// The raw markup must begin with an HTML5 doctype.
pub fn require_doctype(raw_markup: &str) -> CheckOutcome {
    let leading = raw_markup.trim_start().get(..15).unwrap_or_default();
    ensure(
        leading.eq_ignore_ascii_case("<!DOCTYPE html>"),
        "markup does not start with <!DOCTYPE html>",
    )?;
    Ok("HTML5 doctype present".to_string())
}

/// At least one element matches `selector`.
pub fn require_element(doc: &Document, selector: &str, label: &str) -> Result<NodeId, CheckError> {
    doc.query(selector)?
        .ok_or_else(|| fail(format!("missing {} ({})", label, selector)))
}

/// The first match for `selector` exists and has non-blank text.
pub fn require_nonempty_text(doc: &Document, selector: &str, label: &str) -> CheckOutcome {
    let node = require_element(doc, selector, label)?;
    let text = doc.trimmed_text(node);
    ensure(!text.is_empty(), format!("{} is empty", label))?;
    Ok(format!("{} present: \"{}\"", label, truncate(&text, 40)))
}

/// At least `min` elements match `selector`.
pub fn require_count_at_least(
    doc: &Document,
    selector: &str,
    min: usize,
    noun_plural: &str,
) -> Result<Vec<NodeId>, CheckError> {
    let nodes = doc.query_all(selector)?;
    ensure(
        nodes.len() >= min,
        format!(
            "expected at least {} {}, found {}",
            min,
            noun_plural,
            nodes.len()
        ),
    )?;
    Ok(nodes)
}

/// Every node has non-blank text.
pub fn require_each_nonempty(doc: &Document, nodes: &[NodeId], noun: &str) -> Result<(), CheckError> {
    for (index, node) in nodes.iter().enumerate() {
        ensure(
            !doc.trimmed_text(*node).is_empty(),
            format!("{} {} is empty", noun, index + 1),
        )?;
    }
    Ok(())
}

/// Every node carries each of `attrs` with a non-empty value.
pub fn require_attrs(
    doc: &Document,
    nodes: &[NodeId],
    noun: &str,
    attrs: &[&str],
) -> Result<(), CheckError> {
    for (index, node) in nodes.iter().enumerate() {
        for attr in attrs {
            let present = doc.attr(*node, attr).map_or(false, |v| !v.trim().is_empty());
            ensure(present, format!("{} {} is missing {}", noun, index + 1, attr))?;
        }
    }
    Ok(())
}

/// The first match for `selector` carries a non-empty `attr`.
pub fn require_attr(doc: &Document, selector: &str, attr: &str, label: &str) -> CheckOutcome {
    let node = require_element(doc, selector, label)?;
    match doc.attr(node, attr) {
        Some(value) if !value.trim().is_empty() => Ok(format!("{} has {}=\"{}\"", label, attr, value)),
        _ => Err(fail(format!("{} is missing {}", label, attr))),
    }
}

/// Any of `selectors` matches.
pub fn require_any(doc: &Document, selectors: &[&str], label: &str) -> CheckOutcome {
    for selector in selectors {
        if doc.exists(selector)? {
            return Ok(format!("{} present ({})", label, selector));
        }
    }
    Err(fail(format!("no {} found (looked for {})", label, selectors.join(", "))))
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let head: String = text.chars().take(max_chars).collect();
        format!("{}...", head)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc() -> Document {
        Document::parse(
            r#"<!DOCTYPE html><html><head><title>Me</title></head><body>
<h1>Jordan</h1>
<ul><li>Rust</li><li> </li><li>CSS</li></ul>
<img src="me.png" alt="Portrait"><img src="cat.png">
</body></html>"#,
        )
    }

    fn message(err: CheckError) -> String {
        match err {
            CheckError::Unmet(failure) => failure.message,
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn doctype_must_lead() {
        assert!(require_doctype("  <!doctype HTML>\n<html>").is_ok());
        assert!(require_doctype("<html><!DOCTYPE html>").is_err());
    }

    #[test]
    fn missing_element_names_it() {
        let err = require_nonempty_text(&doc(), "h2", "h2 heading").unwrap_err();
        assert_eq!(message(err), "missing h2 heading (h2)");
    }

    #[test]
    fn empty_list_item_named_by_index() {
        let d = doc();
        let items = require_count_at_least(&d, "ul li", 3, "list items").unwrap();
        let err = require_each_nonempty(&d, &items, "list item").unwrap_err();
        assert_eq!(message(err), "list item 2 is empty");
    }

    #[test]
    fn missing_attribute_named_by_index() {
        let d = doc();
        let images = d.query_all("img").unwrap();
        let err = require_attrs(&d, &images, "image", &["src", "alt"]).unwrap_err();
        assert_eq!(message(err), "image 2 is missing alt");
    }

    #[test]
    fn count_shortfall_reports_numbers() {
        let err = require_count_at_least(&doc(), "p", 3, "paragraphs").unwrap_err();
        assert_eq!(message(err), "expected at least 3 paragraphs, found 0");
    }

    #[test]
    fn bad_selector_is_harness_error() {
        let err = require_element(&doc(), "li:first-child", "first item").unwrap_err();
        assert!(matches!(err, CheckError::Harness(_)));
    }
}
