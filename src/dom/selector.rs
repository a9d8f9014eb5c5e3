//! CSS selector subset used by check authors.
//!
//! Supported: type selectors, `*`, `#id`, `.class`, attribute selectors with
//! `= ^= $= *= ~= |=`, the four combinators and `,` lists. Anything else is a
//! harness error.

use crate::dom::document::{Document, NodeId};
use crate::error::{GraderError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
enum AttrCondition {
    Exists { key: String },
    Eq { key: String, value: String },
    StartsWith { key: String, value: String },
    EndsWith { key: String, value: String },
    Contains { key: String, value: String },
    Includes { key: String, value: String },
    DashMatch { key: String, value: String },
}

impl AttrCondition {
    fn matches(&self, doc: &Document, node: NodeId) -> bool {
        match self {
            AttrCondition::Exists { key } => doc.has_attr(node, key),
            AttrCondition::Eq { key, value } => doc.attr(node, key) == Some(value.as_str()),
            AttrCondition::StartsWith { key, value } => doc
                .attr(node, key)
                .map_or(false, |v| !value.is_empty() && v.starts_with(value.as_str())),
            AttrCondition::EndsWith { key, value } => doc
                .attr(node, key)
                .map_or(false, |v| !value.is_empty() && v.ends_with(value.as_str())),
            AttrCondition::Contains { key, value } => doc
                .attr(node, key)
                .map_or(false, |v| !value.is_empty() && v.contains(value.as_str())),
            AttrCondition::Includes { key, value } => doc
                .attr(node, key)
                .map_or(false, |v| v.split_whitespace().any(|w| w == value)),
            AttrCondition::DashMatch { key, value } => doc.attr(node, key).map_or(false, |v| {
                v == value || v.starts_with(&format!("{}-", value))
            }),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Step {
    tag: Option<String>,
    universal: bool,
    id: Option<String>,
    classes: Vec<String>,
    attrs: Vec<AttrCondition>,
}

impl Step {
    fn matches(&self, doc: &Document, node: NodeId) -> bool {
        let Some(element) = doc.element(node) else {
            return false;
        };
        if let Some(tag) = &self.tag {
            if !element.tag.eq_ignore_ascii_case(tag) {
                return false;
            }
        }
        if let Some(id) = &self.id {
            if element.attr("id") != Some(id.as_str()) {
                return false;
            }
        }
        self.classes.iter().all(|c| element.has_class(c))
            && self.attrs.iter().all(|a| a.matches(doc, node))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Combinator {
    Descendant,
    Child,
    AdjacentSibling,
    GeneralSibling,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Part {
    step: Step,
    // Relation to the part on the left.
    combinator: Option<Combinator>,
}

/// A parsed, comma-separated selector list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorList {
    groups: Vec<Vec<Part>>,
}

impl SelectorList {
    pub fn parse(selector: &str) -> Result<Self> {
        let mut groups = Vec::new();
        for group in split_groups(selector)? {
            groups.push(parse_chain(selector, &group)?);
        }
        Ok(SelectorList { groups })
    }

    pub fn matches(&self, doc: &Document, node: NodeId) -> bool {
        self.groups.iter().any(|chain| matches_chain(doc, node, chain))
    }
}

fn matches_chain(doc: &Document, node: NodeId, parts: &[Part]) -> bool {
    let Some((last, rest)) = parts.split_last() else {
        return false;
    };
    if !last.step.matches(doc, node) {
        return false;
    }
    if rest.is_empty() {
        return true;
    }
    let combinator = last.combinator.unwrap_or(Combinator::Descendant);
    match combinator {
        Combinator::Child => doc
            .parent_element(node)
            .map_or(false, |parent| matches_chain(doc, parent, rest)),
        Combinator::Descendant => doc
            .ancestors(node)
            .into_iter()
            .any(|ancestor| matches_chain(doc, ancestor, rest)),
        Combinator::AdjacentSibling => doc
            .previous_element_sibling(node)
            .map_or(false, |sibling| matches_chain(doc, sibling, rest)),
        Combinator::GeneralSibling => {
            let mut cursor = doc.previous_element_sibling(node);
            while let Some(sibling) = cursor {
                if matches_chain(doc, sibling, rest) {
                    return true;
                }
                cursor = doc.previous_element_sibling(sibling);
            }
            false
        }
    }
}

fn split_groups(selector: &str) -> Result<Vec<String>> {
    let mut groups = Vec::new();
    let mut current = String::new();
    let mut bracket_depth = 0usize;
    let mut quote: Option<char> = None;

    for ch in selector.chars() {
        match (quote, ch) {
            (Some(q), c) if c == q => {
                quote = None;
                current.push(ch);
            }
            (Some(_), _) => current.push(ch),
            (None, '"' | '\'') => {
                quote = Some(ch);
                current.push(ch);
            }
            (None, '[') => {
                bracket_depth += 1;
                current.push(ch);
            }
            (None, ']') => {
                bracket_depth = bracket_depth
                    .checked_sub(1)
                    .ok_or_else(|| GraderError::invalid_selector(selector, "unbalanced ']'"))?;
                current.push(ch);
            }
            (None, ',') if bracket_depth == 0 => {
                groups.push(std::mem::take(&mut current));
            }
            _ => current.push(ch),
        }
    }
    if bracket_depth != 0 || quote.is_some() {
        return Err(GraderError::invalid_selector(selector, "unterminated attribute selector"));
    }
    groups.push(current);

    if groups.iter().any(|g| g.trim().is_empty()) {
        return Err(GraderError::invalid_selector(selector, "empty selector"));
    }
    Ok(groups)
}

/// Split a group into compound selectors and combinator tokens.
fn tokenize(selector: &str, group: &str) -> Result<Vec<String>> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_brackets = false;

    for ch in group.trim().chars() {
        if in_brackets {
            current.push(ch);
            if ch == ']' {
                in_brackets = false;
            }
            continue;
        }
        match ch {
            '[' => {
                in_brackets = true;
                current.push(ch);
            }
            '>' | '+' | '~' => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
                tokens.push(ch.to_string());
            }
            c if c.is_whitespace() => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
            }
            _ => current.push(ch),
        }
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    if tokens.is_empty() {
        return Err(GraderError::invalid_selector(selector, "empty selector"));
    }
    Ok(tokens)
}

fn parse_chain(selector: &str, group: &str) -> Result<Vec<Part>> {
    let mut parts: Vec<Part> = Vec::new();
    let mut pending: Option<Combinator> = None;

    for token in tokenize(selector, group)? {
        let combinator = match token.as_str() {
            ">" => Some(Combinator::Child),
            "+" => Some(Combinator::AdjacentSibling),
            "~" => Some(Combinator::GeneralSibling),
            _ => None,
        };
        if let Some(combinator) = combinator {
            if pending.is_some() || parts.is_empty() {
                return Err(GraderError::invalid_selector(selector, "dangling combinator"));
            }
            pending = Some(combinator);
            continue;
        }

        let step = parse_step(selector, &token)?;
        let combinator = if parts.is_empty() {
            None
        } else {
            Some(pending.take().unwrap_or(Combinator::Descendant))
        };
        parts.push(Part { step, combinator });
    }

    if pending.is_some() {
        return Err(GraderError::invalid_selector(selector, "dangling combinator"));
    }
    Ok(parts)
}

fn parse_step(selector: &str, part: &str) -> Result<Step> {
    let bytes = part.as_bytes();
    let mut i = 0usize;
    let mut step = Step::default();

    while i < bytes.len() {
        match bytes[i] {
            b'*' => {
                step.universal = true;
                i += 1;
            }
            b'#' => {
                let (id, next) = parse_ident(part, i + 1)
                    .ok_or_else(|| GraderError::invalid_selector(selector, "expected id after '#'"))?;
                step.id = Some(id);
                i = next;
            }
            b'.' => {
                let (class_name, next) = parse_ident(part, i + 1).ok_or_else(|| {
                    GraderError::invalid_selector(selector, "expected class name after '.'")
                })?;
                step.classes.push(class_name);
                i = next;
            }
            b'[' => {
                let (condition, next) = parse_attr_condition(selector, part, i)?;
                step.attrs.push(condition);
                i = next;
            }
            b':' => {
                return Err(GraderError::invalid_selector(
                    selector,
                    "pseudo-classes are not supported",
                ));
            }
            _ => {
                if step.tag.is_some() || step.id.is_some() || !step.classes.is_empty() || i > 0 {
                    return Err(GraderError::invalid_selector(
                        selector,
                        format!("unexpected character '{}'", char::from(bytes[i])),
                    ));
                }
                let (tag, next) = parse_ident(part, i).ok_or_else(|| {
                    GraderError::invalid_selector(
                        selector,
                        format!("unexpected character '{}'", char::from(bytes[i])),
                    )
                })?;
                step.tag = Some(tag.to_ascii_lowercase());
                i = next;
            }
        }
    }

    Ok(step)
}

fn parse_ident(src: &str, start: usize) -> Option<(String, usize)> {
    let bytes = src.as_bytes();
    let mut end = start;
    while end < bytes.len() && is_ident_char(bytes[end]) {
        end += 1;
    }
    if end == start {
        return None;
    }
    Some((src.get(start..end)?.to_string(), end))
}

fn is_ident_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'-'
}

fn parse_attr_condition(selector: &str, src: &str, open: usize) -> Result<(AttrCondition, usize)> {
    let bad = |reason: &str| GraderError::invalid_selector(selector, reason.to_string());
    let bytes = src.as_bytes();
    let mut i = open + 1;
    skip_ws(bytes, &mut i);

    let key_start = i;
    while i < bytes.len() && (is_ident_char(bytes[i]) || bytes[i] == b':') {
        i += 1;
    }
    if key_start == i {
        return Err(bad("expected attribute name"));
    }
    let key = src[key_start..i].to_ascii_lowercase();
    skip_ws(bytes, &mut i);

    match bytes.get(i) {
        Some(b']') => return Ok((AttrCondition::Exists { key }, i + 1)),
        None => return Err(bad("unterminated attribute selector")),
        _ => {}
    }

    let (op, after_op) = match (bytes.get(i), bytes.get(i + 1)) {
        (Some(b'='), _) => ("=", i + 1),
        (Some(b'^'), Some(b'=')) => ("^=", i + 2),
        (Some(b'$'), Some(b'=')) => ("$=", i + 2),
        (Some(b'*'), Some(b'=')) => ("*=", i + 2),
        (Some(b'~'), Some(b'=')) => ("~=", i + 2),
        (Some(b'|'), Some(b'=')) => ("|=", i + 2),
        _ => return Err(bad("unsupported attribute operator")),
    };
    i = after_op;
    skip_ws(bytes, &mut i);

    let value = match bytes.get(i) {
        Some(&quote) if quote == b'"' || quote == b'\'' => {
            let start = i + 1;
            let end = bytes[start..]
                .iter()
                .position(|b| *b == quote)
                .map(|pos| start + pos)
                .ok_or_else(|| bad("unterminated string"))?;
            i = end + 1;
            src[start..end].to_string()
        }
        Some(_) => {
            let start = i;
            while i < bytes.len() && !bytes[i].is_ascii_whitespace() && bytes[i] != b']' {
                i += 1;
            }
            src[start..i].to_string()
        }
        None => return Err(bad("expected attribute value")),
    };

    skip_ws(bytes, &mut i);
    if bytes.get(i) != Some(&b']') {
        return Err(bad("expected ']'"));
    }

    let condition = match op {
        "=" => AttrCondition::Eq { key, value },
        "^=" => AttrCondition::StartsWith { key, value },
        "$=" => AttrCondition::EndsWith { key, value },
        "*=" => AttrCondition::Contains { key, value },
        "~=" => AttrCondition::Includes { key, value },
        _ => AttrCondition::DashMatch { key, value },
    };
    Ok((condition, i + 1))
}

fn skip_ws(bytes: &[u8], i: &mut usize) {
    while *i < bytes.len() && bytes[*i].is_ascii_whitespace() {
        *i += 1;
    }
}

#[cfg(test)]
mod tests {
    use crate::dom::Document;
    use crate::error::GraderError;

    fn doc() -> Document {
        Document::parse(
            r##"<html lang="en-US"><body>
<header><nav class="main-nav"><a href="#about">About</a><a href="https://x.dev">Out</a></nav></header>
<main>
  <section id="about" class="card featured"><h2>About</h2><p>one</p><p>two</p></section>
  <section id="work" data-kind="grid list"><h2>Work</h2></section>
</main>
</body></html>"##,
        )
    }

    #[test]
    fn type_id_and_class() {
        let d = doc();
        assert_eq!(d.count("section").unwrap(), 2);
        assert!(d.exists("#work").unwrap());
        assert!(d.exists("section.card.featured").unwrap());
        assert!(!d.exists("section.card.missing").unwrap());
        assert_eq!(d.count("*").unwrap(), d.elements().len());
    }

    #[test]
    fn attribute_operators() {
        let d = doc();
        assert_eq!(d.count("a[href^=\"#\"]").unwrap(), 1);
        assert_eq!(d.count("a[href$='.dev']").unwrap(), 1);
        assert_eq!(d.count("a[href*=x]").unwrap(), 1);
        assert!(d.exists("[data-kind~=list]").unwrap());
        assert!(d.exists("html[lang|=en]").unwrap());
        assert_eq!(d.count("section[id]").unwrap(), 2);
    }

    #[test]
    fn combinators() {
        let d = doc();
        assert_eq!(d.count("nav a").unwrap(), 2);
        assert_eq!(d.count("header > nav > a").unwrap(), 2);
        assert_eq!(d.count("main > a").unwrap(), 0);
        assert_eq!(d.count("h2 + p").unwrap(), 1);
        assert_eq!(d.count("h2 ~ p").unwrap(), 2);
    }

    #[test]
    fn selector_lists_deduplicate() {
        let d = doc();
        assert_eq!(d.count("section, #about, main section").unwrap(), 2);
    }

    #[test]
    fn pseudo_classes_are_rejected() {
        let err = doc().count("a:hover").unwrap_err();
        assert!(matches!(err, GraderError::InvalidSelector { .. }));
    }

    #[test]
    fn malformed_selectors_are_rejected() {
        let d = doc();
        for bad in ["", "a,", "> a", "a >", "[href", "a[href^]"] {
            assert!(d.count(bad).is_err(), "expected error for {:?}", bad);
        }
    }
}
