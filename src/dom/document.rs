//! Arena-backed document tree.
//!
//! Nodes live in a flat `Vec` and refer to each other by `NodeId`. The same
//! tree type backs parsed submission markup and the virtual documents that
//! interactive components render into, so every query helper works on both.

use crate::dom::selector::SelectorList;
use crate::error::Result;
use std::collections::HashSet;

/// Handle to a node inside a [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

/// DOM event kinds understood by the virtual document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Click,
    Change,
    Input,
    Submit,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Click => "click",
            EventKind::Change => "change",
            EventKind::Input => "input",
            EventKind::Submit => "submit",
        }
    }
}

/// An event handler attached to a rendered element, identified by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Listener {
    pub kind: EventKind,
    pub handler: String,
}

#[derive(Debug, Clone)]
pub struct Element {
    pub tag: String,
    /// Attributes in source order. Names are lowercase.
    pub attrs: Vec<(String, String)>,
    pub listeners: Vec<Listener>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Element {
            tag: tag.into().to_ascii_lowercase(),
            attrs: Vec::new(),
            listeners: Vec::new(),
        }
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.attr(name).is_some()
    }

    pub fn set_attr(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self
            .attrs
            .iter_mut()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
        {
            Some(slot) => slot.1 = value,
            None => self.attrs.push((name.to_ascii_lowercase(), value)),
        }
    }

    pub fn has_class(&self, class_name: &str) -> bool {
        self.attr("class")
            .map(|classes| classes.split_whitespace().any(|c| c == class_name))
            .unwrap_or(false)
    }

    pub fn listener(&self, kind: EventKind) -> Option<&Listener> {
        self.listeners.iter().find(|l| l.kind == kind)
    }
}

#[derive(Debug, Clone)]
pub enum NodeKind {
    Document,
    Doctype(String),
    Element(Element),
    Text(String),
    Comment(String),
}

#[derive(Debug, Clone)]
pub struct Node {
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) kind: NodeKind,
}

/// Queryable document tree.
#[derive(Debug, Clone)]
pub struct Document {
    pub(crate) nodes: Vec<Node>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create an empty document containing only the root node.
    pub fn new() -> Self {
        Document {
            nodes: vec![Node {
                parent: None,
                children: Vec::new(),
                kind: NodeKind::Document,
            }],
        }
    }

    /// Parse a full HTML document. Never fails; see [`crate::dom::parser`].
    pub fn parse(markup: &str) -> Self {
        crate::dom::parser::parse_document(markup)
    }

    /// Parse markup as a fragment, without synthesizing html/head/body.
    pub fn parse_fragment(markup: &str) -> Self {
        crate::dom::parser::parse_fragment(markup)
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub(crate) fn push_node(&mut self, parent: Option<NodeId>, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            parent,
            children: Vec::new(),
            kind,
        });
        if let Some(parent_id) = parent {
            self.nodes[parent_id.0].children.push(id);
        }
        id
    }

    pub fn append_element(&mut self, parent: NodeId, element: Element) -> NodeId {
        self.push_node(Some(parent), NodeKind::Element(element))
    }

    pub fn append_text(&mut self, parent: NodeId, text: impl Into<String>) -> NodeId {
        self.push_node(Some(parent), NodeKind::Text(text.into()))
    }

    /// Move `child` (and its subtree) under `new_parent`, at `index` or at the end.
    pub(crate) fn reparent(&mut self, child: NodeId, new_parent: NodeId, index: Option<usize>) {
        self.detach(child);
        self.nodes[child.0].parent = Some(new_parent);
        let siblings = &mut self.nodes[new_parent.0].children;
        match index {
            Some(at) if at <= siblings.len() => siblings.insert(at, child),
            _ => siblings.push(child),
        }
    }

    /// Unlink a node from its parent. The node stays in the arena, unreachable.
    pub(crate) fn detach(&mut self, child: NodeId) {
        if let Some(old_parent) = self.nodes[child.0].parent.take() {
            self.nodes[old_parent.0].children.retain(|c| *c != child);
        }
    }

    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.nodes[id.0].kind
    }

    pub fn element(&self, id: NodeId) -> Option<&Element> {
        match &self.nodes.get(id.0)?.kind {
            NodeKind::Element(element) => Some(element),
            _ => None,
        }
    }

    pub fn tag_name(&self, id: NodeId) -> Option<&str> {
        self.element(id).map(|e| e.tag.as_str())
    }

    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        self.element(id).and_then(|e| e.attr(name))
    }

    pub fn has_attr(&self, id: NodeId, name: &str) -> bool {
        self.attr(id, name).is_some()
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id.0).and_then(|n| n.parent)
    }

    /// Nearest ancestor that is an element.
    pub fn parent_element(&self, id: NodeId) -> Option<NodeId> {
        self.parent(id).filter(|p| self.element(*p).is_some())
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    pub fn element_children(&self, id: NodeId) -> Vec<NodeId> {
        self.children(id)
            .iter()
            .copied()
            .filter(|c| self.element(*c).is_some())
            .collect()
    }

    pub fn previous_element_sibling(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.parent(id)?;
        let siblings = self.children(parent);
        let position = siblings.iter().position(|s| *s == id)?;
        siblings[..position]
            .iter()
            .rev()
            .copied()
            .find(|s| self.element(*s).is_some())
    }

    /// Ancestors from the parent upwards, excluding the document root.
    pub fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut cursor = self.parent_element(id);
        while let Some(current) = cursor {
            out.push(current);
            cursor = self.parent_element(current);
        }
        out
    }

    /// The doctype declaration text, if the document has one.
    pub fn doctype(&self) -> Option<&str> {
        self.children(self.root())
            .iter()
            .find_map(|c| match &self.nodes[c.0].kind {
                NodeKind::Doctype(name) => Some(name.as_str()),
                _ => None,
            })
    }

    /// Concatenated text of all descendant text nodes (DOM `textContent`).
    pub fn text(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(id, &mut out);
        out
    }

    fn collect_text(&self, id: NodeId, out: &mut String) {
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            match &self.nodes[current.0].kind {
                NodeKind::Text(text) => out.push_str(text),
                NodeKind::Document | NodeKind::Element(_) => {
                    stack.extend(self.nodes[current.0].children.iter().rev().copied());
                }
                NodeKind::Doctype(_) | NodeKind::Comment(_) => {}
            }
        }
    }

    /// `textContent` with surrounding whitespace trimmed.
    pub fn trimmed_text(&self, id: NodeId) -> String {
        self.text(id).trim().to_string()
    }

    /// Text of the node's direct text children, whitespace-collapsed.
    pub fn own_text(&self, id: NodeId) -> String {
        let mut raw = String::new();
        for child in self.children(id) {
            if let NodeKind::Text(text) = &self.nodes[child.0].kind {
                raw.push_str(text);
            }
        }
        normalize_whitespace(&raw)
    }

    /// All elements in document order.
    pub fn elements(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        self.collect_elements(self.root(), &mut out);
        out
    }

    /// All element descendants of `id` in document order, excluding `id`.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        for child in self.children(id) {
            self.collect_elements(*child, &mut out);
        }
        out
    }

    /// Pre-order walk with an explicit stack; nesting depth is unbounded.
    fn collect_elements(&self, id: NodeId, out: &mut Vec<NodeId>) {
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if self.element(current).is_some() {
                out.push(current);
            }
            stack.extend(self.nodes[current.0].children.iter().rev().copied());
        }
    }

    pub fn get_element_by_id(&self, id_value: &str) -> Option<NodeId> {
        self.elements()
            .into_iter()
            .find(|n| self.attr(*n, "id") == Some(id_value))
    }

    /// First element matching `selector`.
    pub fn query(&self, selector: &str) -> Result<Option<NodeId>> {
        Ok(self.query_all(selector)?.into_iter().next())
    }

    /// Every element matching `selector`, in document order.
    pub fn query_all(&self, selector: &str) -> Result<Vec<NodeId>> {
        let list = SelectorList::parse(selector)?;
        Ok(self.select(self.elements(), &list))
    }

    /// Every descendant of `scope` matching `selector`.
    pub fn query_all_within(&self, scope: NodeId, selector: &str) -> Result<Vec<NodeId>> {
        let list = SelectorList::parse(selector)?;
        Ok(self.select(self.descendants(scope), &list))
    }

    fn select(&self, candidates: Vec<NodeId>, list: &SelectorList) -> Vec<NodeId> {
        let mut seen = HashSet::new();
        candidates
            .into_iter()
            .filter(|c| list.matches(self, *c) && seen.insert(*c))
            .collect()
    }

    pub fn exists(&self, selector: &str) -> Result<bool> {
        Ok(self.query(selector)?.is_some())
    }

    pub fn count(&self, selector: &str) -> Result<usize> {
        Ok(self.query_all(selector)?.len())
    }

    pub fn matches(&self, id: NodeId, selector: &str) -> Result<bool> {
        let list = SelectorList::parse(selector)?;
        Ok(list.matches(self, id))
    }

    /// Nearest inclusive ancestor matching `selector`.
    pub fn closest(&self, id: NodeId, selector: &str) -> Result<Option<NodeId>> {
        let list = SelectorList::parse(selector)?;
        let mut cursor = Some(id).filter(|n| self.element(*n).is_some());
        while let Some(current) = cursor {
            if list.matches(self, current) {
                return Ok(Some(current));
            }
            cursor = self.parent_element(current);
        }
        Ok(None)
    }

    /// Short markup rendering of a node, used in diagnostics.
    pub fn describe(&self, id: NodeId) -> String {
        match &self.nodes[id.0].kind {
            NodeKind::Element(element) => {
                let mut out = format!("<{}", element.tag);
                for (key, value) in &element.attrs {
                    out.push_str(&format!(" {}=\"{}\"", key, value));
                }
                out.push('>');
                out
            }
            NodeKind::Text(text) => format!("\"{}\"", text.trim()),
            NodeKind::Comment(_) => "<!-- -->".to_string(),
            NodeKind::Doctype(name) => format!("<!DOCTYPE {}>", name),
            NodeKind::Document => "#document".to_string(),
        }
    }
}

pub(crate) fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Document {
        Document::parse(
            r#"<!DOCTYPE html>
<html lang="en">
  <head><title> Profile </title></head>
  <body>
    <ul id="skills">
      <li>Rust</li>
      <li>   </li>
    </ul>
    <p class="intro lead">Hello <b>there</b></p>
  </body>
</html>"#,
        )
    }

    #[test]
    fn text_content_and_trim() {
        let doc = sample();
        let title = doc.query("title").unwrap().unwrap();
        assert_eq!(doc.text(title), " Profile ");
        assert_eq!(doc.trimmed_text(title), "Profile");
    }

    #[test]
    fn own_text_ignores_nested_elements() {
        let doc = sample();
        let p = doc.query("p").unwrap().unwrap();
        assert_eq!(doc.own_text(p), "Hello");
        assert_eq!(doc.trimmed_text(p), "Hello there");
    }

    #[test]
    fn query_all_within_scope() {
        let doc = sample();
        let ul = doc.get_element_by_id("skills").unwrap();
        let items = doc.query_all_within(ul, "li").unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(doc.trimmed_text(items[1]), "");
    }

    #[test]
    fn closest_walks_up() {
        let doc = sample();
        let b = doc.query("b").unwrap().unwrap();
        let p = doc.closest(b, "p.intro").unwrap();
        assert_eq!(p, doc.query("p").unwrap());
    }

    #[test]
    fn doctype_is_recorded() {
        let doc = sample();
        assert_eq!(doc.doctype(), Some("html"));
    }

    #[test]
    fn deeply_nested_markup_walks_without_recursion() {
        let depth = 50_000;
        let markup = format!("{}deep", "<div>".repeat(depth));
        let doc = Document::parse(&markup);
        let body = doc.query("body").unwrap().unwrap();
        assert_eq!(doc.trimmed_text(body), "deep");
        assert_eq!(doc.query_all("div").unwrap().len(), depth);
        assert_eq!(doc.descendants(body).len(), depth);
    }
}
