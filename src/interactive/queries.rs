//! Testing-library style queries over a rendered document.
//!
//! `get_*` queries require exactly one match, `get_all_*` at least one,
//! `query_*` tolerate absence. Every miss is reported as a [`Failure`]
//! naming what was looked for.

use crate::checks::Failure;
use crate::dom::document::normalize_whitespace;
use crate::dom::{Document, NodeId};
use crate::error::{GraderError, Result};
use crate::interactive::Instance;
use regex::Regex;
use std::fmt;

/// How a query compares text.
#[derive(Debug, Clone)]
pub enum TextMatch {
    /// Whole-string comparison after whitespace collapsing.
    Exact(String),
    Pattern(Regex),
}

impl TextMatch {
    pub fn pattern(pattern: &str) -> Result<Self> {
        Regex::new(pattern)
            .map(TextMatch::Pattern)
            .map_err(|source| GraderError::InvalidPattern {
                pattern: pattern.to_string(),
                source,
            })
    }

    pub fn matches(&self, candidate: &str) -> bool {
        let normalized = normalize_whitespace(candidate);
        match self {
            TextMatch::Exact(expected) => normalized == normalize_whitespace(expected),
            TextMatch::Pattern(re) => re.is_match(&normalized),
        }
    }
}

impl From<&str> for TextMatch {
    fn from(text: &str) -> Self {
        TextMatch::Exact(text.to_string())
    }
}

impl From<String> for TextMatch {
    fn from(text: String) -> Self {
        TextMatch::Exact(text)
    }
}

impl From<Regex> for TextMatch {
    fn from(re: Regex) -> Self {
        TextMatch::Pattern(re)
    }
}

impl fmt::Display for TextMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TextMatch::Exact(text) => write!(f, "\"{}\"", text),
            TextMatch::Pattern(re) => write!(f, "/{}/", re.as_str()),
        }
    }
}

const IGNORED_FOR_TEXT: &[&str] = &["script", "style"];

/// Elements whose own text matches.
pub fn all_by_text(doc: &Document, matcher: &TextMatch) -> Vec<NodeId> {
    doc.elements()
        .into_iter()
        .filter(|node| {
            let tag = doc.tag_name(*node).unwrap_or_default();
            !IGNORED_FOR_TEXT.contains(&tag)
        })
        .filter(|node| {
            let own = doc.own_text(*node);
            !own.is_empty() && matcher.matches(&own)
        })
        .collect()
}

/// Explicit `role` attribute first, then the implicit role of the tag.
pub fn role_of(doc: &Document, node: NodeId) -> Option<String> {
    if let Some(explicit) = doc
        .attr(node, "role")
        .and_then(|role| role.split_whitespace().next())
    {
        return Some(explicit.to_ascii_lowercase());
    }
    let tag = doc.tag_name(node)?;
    let implicit = match tag {
        "button" => "button",
        "a" if doc.has_attr(node, "href") => "link",
        "input" => {
            let kind = doc
                .attr(node, "type")
                .map(str::to_ascii_lowercase)
                .unwrap_or_else(|| "text".to_string());
            match kind.as_str() {
                "button" | "submit" | "reset" | "image" => "button",
                "checkbox" => "checkbox",
                "radio" => "radio",
                "search" => "searchbox",
                "number" => "spinbutton",
                "range" => "slider",
                "text" | "email" | "tel" | "url" | "" => "textbox",
                _ => return None,
            }
        }
        "textarea" => "textbox",
        "select" => "combobox",
        "ul" | "ol" => "list",
        "li" => "listitem",
        "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => "heading",
        "img" if doc.has_attr(node, "alt") => "img",
        "nav" => "navigation",
        "main" => "main",
        "form" => "form",
        "header" => "banner",
        "footer" => "contentinfo",
        "article" => "article",
        "aside" => "complementary",
        "table" => "table",
        _ => return None,
    };
    Some(implicit.to_string())
}

pub fn all_by_role(doc: &Document, role: &str) -> Vec<NodeId> {
    doc.elements()
        .into_iter()
        .filter(|node| role_of(doc, *node).as_deref() == Some(role))
        .collect()
}

/// `aria-label`, then an associated `<label>`, then `alt`, then text content.
pub fn accessible_name(doc: &Document, node: NodeId) -> String {
    if let Some(label) = doc.attr(node, "aria-label") {
        return normalize_whitespace(label);
    }
    if let Some(label) = label_for(doc, node) {
        return normalize_whitespace(&doc.text(label));
    }
    if let Some(alt) = doc.attr(node, "alt") {
        return normalize_whitespace(alt);
    }
    normalize_whitespace(&doc.text(node))
}

fn label_for(doc: &Document, control: NodeId) -> Option<NodeId> {
    if let Some(id) = doc.attr(control, "id") {
        let explicit = doc
            .elements()
            .into_iter()
            .find(|n| doc.tag_name(*n) == Some("label") && doc.attr(*n, "for") == Some(id));
        if explicit.is_some() {
            return explicit;
        }
    }
    doc.ancestors(control)
        .into_iter()
        .find(|n| doc.tag_name(*n) == Some("label"))
}

pub fn all_by_placeholder(doc: &Document, matcher: &TextMatch) -> Vec<NodeId> {
    doc.elements()
        .into_iter()
        .filter(|node| {
            doc.attr(*node, "placeholder")
                .map_or(false, |p| matcher.matches(p))
        })
        .collect()
}

/// Current value of a form control: `value` for inputs, text for textareas.
pub fn display_value(doc: &Document, node: NodeId) -> Option<String> {
    match doc.tag_name(node)? {
        "input" | "select" => Some(doc.attr(node, "value").unwrap_or_default().to_string()),
        "textarea" => Some(doc.text(node)),
        _ => None,
    }
}

pub fn all_by_display_value(doc: &Document, matcher: &TextMatch) -> Vec<NodeId> {
    doc.elements()
        .into_iter()
        .filter(|node| {
            display_value(doc, *node).map_or(false, |value| matcher.matches(&value))
        })
        .collect()
}

/// Controls labelled by matching text, via `for`, nesting or `aria-label`.
pub fn all_by_label_text(doc: &Document, matcher: &TextMatch) -> Vec<NodeId> {
    let mut found = Vec::new();
    for node in doc.elements() {
        if doc.tag_name(node) == Some("label") && matcher.matches(&doc.text(node)) {
            let target = match doc.attr(node, "for") {
                Some(id) => doc.get_element_by_id(id),
                None => doc.descendants(node).into_iter().find(|n| {
                    matches!(
                        doc.tag_name(*n),
                        Some("input") | Some("textarea") | Some("select") | Some("button")
                    )
                }),
            };
            if let Some(target) = target {
                found.push(target);
            }
        } else if doc
            .attr(node, "aria-label")
            .map_or(false, |label| matcher.matches(label))
        {
            found.push(node);
        }
    }
    found.sort_by_key(|n| doc.elements().iter().position(|e| e == n));
    found.dedup();
    found
}

/// True when `node` or an enclosing `button`/`fieldset` carries `disabled`.
pub fn is_disabled(doc: &Document, node: NodeId) -> bool {
    if doc.has_attr(node, "disabled") {
        return true;
    }
    doc.ancestors(node).into_iter().any(|ancestor| {
        matches!(doc.tag_name(ancestor), Some("button") | Some("fieldset"))
            && doc.has_attr(ancestor, "disabled")
    })
}

pub fn all_by_test_id(doc: &Document, id: &str) -> Vec<NodeId> {
    doc.elements()
        .into_iter()
        .filter(|node| doc.attr(*node, "data-testid") == Some(id))
        .collect()
}

fn exactly_one(found: Vec<NodeId>, what: impl fmt::Display) -> std::result::Result<NodeId, Failure> {
    match found.as_slice() {
        [only] => Ok(*only),
        [] => Err(Failure::new(format!("unable to find element {}", what))),
        many => Err(Failure::new(format!(
            "found {} elements {}, expected one",
            many.len(),
            what
        ))),
    }
}

fn at_most_one(
    found: Vec<NodeId>,
    what: impl fmt::Display,
) -> std::result::Result<Option<NodeId>, Failure> {
    if found.len() > 1 {
        return Err(Failure::new(format!(
            "found {} elements {}, expected at most one",
            found.len(),
            what
        )));
    }
    Ok(found.into_iter().next())
}

fn at_least_one(
    found: Vec<NodeId>,
    what: impl fmt::Display,
) -> std::result::Result<Vec<NodeId>, Failure> {
    if found.is_empty() {
        Err(Failure::new(format!("unable to find any element {}", what)))
    } else {
        Ok(found)
    }
}

type Found<T> = std::result::Result<T, Failure>;

impl Instance {
    pub fn get_by_text(&self, matcher: impl Into<TextMatch>) -> Found<NodeId> {
        let matcher = matcher.into();
        exactly_one(
            all_by_text(self.document(), &matcher),
            format_args!("with text {}", matcher),
        )
    }

    pub fn query_by_text(&self, matcher: impl Into<TextMatch>) -> Found<Option<NodeId>> {
        let matcher = matcher.into();
        at_most_one(
            all_by_text(self.document(), &matcher),
            format_args!("with text {}", matcher),
        )
    }

    pub fn get_all_by_text(&self, matcher: impl Into<TextMatch>) -> Found<Vec<NodeId>> {
        let matcher = matcher.into();
        at_least_one(
            all_by_text(self.document(), &matcher),
            format_args!("with text {}", matcher),
        )
    }

    pub fn query_all_by_text(&self, matcher: impl Into<TextMatch>) -> Vec<NodeId> {
        all_by_text(self.document(), &matcher.into())
    }

    pub fn get_by_role(&self, role: &str) -> Found<NodeId> {
        exactly_one(
            all_by_role(self.document(), role),
            format_args!("with role \"{}\"", role),
        )
    }

    pub fn get_all_by_role(&self, role: &str) -> Found<Vec<NodeId>> {
        at_least_one(
            all_by_role(self.document(), role),
            format_args!("with role \"{}\"", role),
        )
    }

    pub fn query_all_by_role(&self, role: &str) -> Vec<NodeId> {
        all_by_role(self.document(), role)
    }

    /// Role query narrowed by accessible name.
    pub fn get_by_role_named(&self, role: &str, name: impl Into<TextMatch>) -> Found<NodeId> {
        let name = name.into();
        let doc = self.document();
        let found = all_by_role(doc, role)
            .into_iter()
            .filter(|node| name.matches(&accessible_name(doc, *node)))
            .collect();
        exactly_one(found, format_args!("with role \"{}\" and name {}", role, name))
    }

    pub fn get_by_placeholder(&self, matcher: impl Into<TextMatch>) -> Found<NodeId> {
        let matcher = matcher.into();
        exactly_one(
            all_by_placeholder(self.document(), &matcher),
            format_args!("with placeholder {}", matcher),
        )
    }

    pub fn get_by_display_value(&self, matcher: impl Into<TextMatch>) -> Found<NodeId> {
        let matcher = matcher.into();
        exactly_one(
            all_by_display_value(self.document(), &matcher),
            format_args!("with display value {}", matcher),
        )
    }

    pub fn get_by_label_text(&self, matcher: impl Into<TextMatch>) -> Found<NodeId> {
        let matcher = matcher.into();
        exactly_one(
            all_by_label_text(self.document(), &matcher),
            format_args!("labelled {}", matcher),
        )
    }

    pub fn get_by_test_id(&self, id: &str) -> Found<NodeId> {
        exactly_one(
            all_by_test_id(self.document(), id),
            format_args!("with data-testid \"{}\"", id),
        )
    }

    pub fn query_by_test_id(&self, id: &str) -> Found<Option<NodeId>> {
        at_most_one(
            all_by_test_id(self.document(), id),
            format_args!("with data-testid \"{}\"", id),
        )
    }

    pub fn attr(&self, node: NodeId, name: &str) -> Option<String> {
        self.document().attr(node, name).map(str::to_string)
    }

    /// Whitespace-collapsed text content.
    pub fn text(&self, node: NodeId) -> String {
        normalize_whitespace(&self.document().text(node))
    }

    pub fn is_checked(&self, node: NodeId) -> bool {
        let doc = self.document();
        doc.has_attr(node, "checked") || doc.attr(node, "aria-checked") == Some("true")
    }

    pub fn is_disabled(&self, node: NodeId) -> bool {
        is_disabled(self.document(), node)
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.document().parent_element(node)
    }

    pub fn closest(&self, node: NodeId, selector: &str) -> Result<Option<NodeId>> {
        self.document().closest(node, selector)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FORM: &str = r#"
        <main>
          <h1>Contact <em>us</em></h1>
          <form>
            <label for="name">Name</label>
            <input id="name" type="text" placeholder="Your name" value="Ada">
            <label>Message <textarea>Hello there</textarea></label>
            <input type="checkbox" aria-label="Subscribe" checked>
            <button type="submit">Send Message</button>
            <a href="/">Back</a>
            <a>Not a link</a>
          </form>
          <ul><li data-testid="item">One</li><li>Two</li></ul>
          <script>const Send = "Send Message";</script>
        </main>
    "#;

    fn doc() -> Document {
        Document::parse(FORM)
    }

    #[test]
    fn own_text_matching_skips_scripts() {
        let doc = doc();
        let found = all_by_text(&doc, &"Send Message".into());
        assert_eq!(found.len(), 1);
        assert_eq!(doc.tag_name(found[0]), Some("button"));
        assert_eq!(all_by_text(&doc, &"Contact".into()).len(), 1);
    }

    #[test]
    fn pattern_matching() {
        let doc = doc();
        let matcher = TextMatch::pattern("(?i)^send").unwrap();
        assert_eq!(all_by_text(&doc, &matcher).len(), 1);
        assert!(TextMatch::pattern("(").is_err());
    }

    #[test]
    fn implicit_roles() {
        let doc = doc();
        assert_eq!(all_by_role(&doc, "button").len(), 1);
        assert_eq!(all_by_role(&doc, "link").len(), 1);
        assert_eq!(all_by_role(&doc, "textbox").len(), 2);
        assert_eq!(all_by_role(&doc, "checkbox").len(), 1);
        assert_eq!(all_by_role(&doc, "heading").len(), 1);
        assert_eq!(all_by_role(&doc, "listitem").len(), 2);
        assert_eq!(all_by_role(&doc, "main").len(), 1);
    }

    #[test]
    fn accessible_names() {
        let doc = doc();
        let heading = all_by_role(&doc, "heading")[0];
        assert_eq!(accessible_name(&doc, heading), "Contact us");
        let checkbox = all_by_role(&doc, "checkbox")[0];
        assert_eq!(accessible_name(&doc, checkbox), "Subscribe");
        let name = doc.get_element_by_id("name").unwrap();
        assert_eq!(accessible_name(&doc, name), "Name");
    }

    #[test]
    fn label_text_resolves_for_and_nesting() {
        let doc = doc();
        let name = all_by_label_text(&doc, &"Name".into());
        assert_eq!(name, vec![doc.get_element_by_id("name").unwrap()]);
        let message = all_by_label_text(&doc, &TextMatch::pattern("^Message").unwrap());
        assert_eq!(doc.tag_name(message[0]), Some("textarea"));
    }

    #[test]
    fn placeholder_and_display_value() {
        let doc = doc();
        assert_eq!(all_by_placeholder(&doc, &"Your name".into()).len(), 1);
        assert_eq!(all_by_display_value(&doc, &"Ada".into()).len(), 1);
        assert_eq!(all_by_display_value(&doc, &"Hello there".into()).len(), 1);
    }

    #[test]
    fn disabled_is_inherited_from_fieldset() {
        let doc = Document::parse(
            r#"<form><fieldset disabled><input id="inner"></fieldset><input id="outer"><button id="off" disabled>Go</button></form>"#,
        );
        let inner = doc.get_element_by_id("inner").unwrap();
        let outer = doc.get_element_by_id("outer").unwrap();
        let off = doc.get_element_by_id("off").unwrap();
        assert!(is_disabled(&doc, inner));
        assert!(!is_disabled(&doc, outer));
        assert!(is_disabled(&doc, off));
    }

    #[test]
    fn cardinality_failures() {
        let doc = doc();
        let none = exactly_one(all_by_test_id(&doc, "missing"), "with data-testid \"missing\"")
            .unwrap_err();
        assert_eq!(none.message, "unable to find element with data-testid \"missing\"");

        let many = exactly_one(all_by_role(&doc, "listitem"), "with role \"listitem\"").unwrap_err();
        assert!(many.message.starts_with("found 2 elements"));

        assert_eq!(at_most_one(Vec::new(), "x").unwrap(), None);
        assert!(at_least_one(Vec::new(), "x").is_err());
    }
}
