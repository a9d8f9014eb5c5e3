//! Declarative view trees that components render into a [`Document`].

use crate::dom::{Document, Element, EventKind, Listener, NodeId};

#[derive(Debug, Clone)]
pub enum View {
    Element(ViewElement),
    Text(String),
    Fragment(Vec<View>),
    Empty,
}

#[derive(Debug, Clone)]
pub struct ViewElement {
    tag: String,
    attrs: Vec<(String, String)>,
    listeners: Vec<Listener>,
    children: Vec<View>,
}

/// Start building an element.
pub fn el(tag: &str) -> ViewElement {
    ViewElement {
        tag: tag.to_ascii_lowercase(),
        attrs: Vec::new(),
        listeners: Vec::new(),
        children: Vec::new(),
    }
}

pub fn text(content: impl Into<String>) -> View {
    View::Text(content.into())
}

impl ViewElement {
    pub fn attr(mut self, name: &str, value: impl Into<String>) -> Self {
        let value = value.into();
        match self.attrs.iter_mut().find(|(k, _)| k == name) {
            Some(slot) => slot.1 = value,
            None => self.attrs.push((name.to_ascii_lowercase(), value)),
        }
        self
    }

    /// Boolean attribute, present only when `on` is true.
    pub fn flag(self, name: &str, on: bool) -> Self {
        if on {
            self.attr(name, "")
        } else {
            self
        }
    }

    pub fn class(mut self, class_name: &str) -> Self {
        match self.attrs.iter_mut().find(|(k, _)| k == "class") {
            Some(slot) => {
                slot.1.push(' ');
                slot.1.push_str(class_name);
            }
            None => self.attrs.push(("class".to_string(), class_name.to_string())),
        }
        self
    }

    pub fn test_id(self, id: &str) -> Self {
        self.attr("data-testid", id)
    }

    /// Attach a named handler. Handlers may carry an argument as `name:arg`.
    pub fn on(mut self, kind: EventKind, handler: impl Into<String>) -> Self {
        self.listeners.push(Listener {
            kind,
            handler: handler.into(),
        });
        self
    }

    pub fn child(mut self, child: impl Into<View>) -> Self {
        self.children.push(child.into());
        self
    }

    pub fn children<I, V>(mut self, children: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<View>,
    {
        self.children.extend(children.into_iter().map(Into::into));
        self
    }

    pub fn text(self, content: impl Into<String>) -> Self {
        self.child(View::Text(content.into()))
    }
}

impl From<ViewElement> for View {
    fn from(element: ViewElement) -> Self {
        View::Element(element)
    }
}

impl From<&str> for View {
    fn from(content: &str) -> Self {
        View::Text(content.to_string())
    }
}

impl From<String> for View {
    fn from(content: String) -> Self {
        View::Text(content)
    }
}

impl<T: Into<View>> From<Option<T>> for View {
    fn from(maybe: Option<T>) -> Self {
        maybe.map_or(View::Empty, Into::into)
    }
}

impl View {
    pub fn fragment<I, V>(children: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<View>,
    {
        View::Fragment(children.into_iter().map(Into::into).collect())
    }

    /// Append this tree under `parent`.
    pub fn render_into(&self, doc: &mut Document, parent: NodeId) {
        match self {
            View::Element(view) => {
                let mut element = Element::new(view.tag.clone());
                element.attrs = view.attrs.clone();
                element.listeners = view.listeners.clone();
                let node = doc.append_element(parent, element);
                for child in &view.children {
                    child.render_into(doc, node);
                }
            }
            View::Text(content) => {
                if !content.is_empty() {
                    doc.append_text(parent, content.clone());
                }
            }
            View::Fragment(children) => {
                for child in children {
                    child.render_into(doc, parent);
                }
            }
            View::Empty => {}
        }
    }

    /// Render into a fresh `html > body > div` container.
    pub fn to_document(&self) -> Document {
        let mut doc = Document::new();
        let html = doc.append_element(doc.root(), Element::new("html"));
        doc.append_element(html, Element::new("head"));
        let body = doc.append_element(html, Element::new("body"));
        let container = doc.append_element(body, Element::new("div"));
        self.render_into(&mut doc, container);
        doc
    }
}

/// Split a `name:arg` handler into its parts.
pub fn split_handler(handler: &str) -> (&str, Option<&str>) {
    match handler.split_once(':') {
        Some((name, arg)) => (name, Some(arg)),
        None => (handler, None),
    }
}
