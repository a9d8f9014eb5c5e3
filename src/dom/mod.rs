//! Parsed document trees and selector queries.

pub mod document;
pub mod parser;
pub mod selector;

pub use document::{Document, Element, EventKind, Listener, NodeId, NodeKind};
pub use selector::SelectorList;
