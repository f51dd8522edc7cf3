//! A small owned XML element tree.
//!
//! Enough structure to load `db.xml`, replace its map entries, carry
//! occluder shapes around as opaque subtrees, and write everything back
//! out. Comments, processing instructions and doctypes are dropped on load.

mod parse;
mod render;

pub use parse::{parse, read_file};
pub use render::{collapse_blank_lines, render_document, render_element};

/// A child of an element.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    Text(String),
}

/// An XML element with ordered attributes and children.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Element {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Builder: add an attribute.
    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((key.into(), value.into()));
        self
    }

    /// Builder: add a text child.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.children.push(Node::Text(text.into()));
        self
    }

    /// Builder: add an element child.
    pub fn with_child(mut self, child: Element) -> Self {
        self.push(child);
        self
    }

    pub fn push(&mut self, child: Element) {
        self.children.push(Node::Element(child));
    }

    /// Insert an element child before all existing children.
    pub fn push_front(&mut self, child: Element) {
        self.children.insert(0, Node::Element(child));
    }

    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Concatenated text content of the direct text children.
    pub fn text(&self) -> Option<String> {
        let mut text = String::new();
        let mut found = false;
        for child in &self.children {
            if let Node::Text(t) = child {
                text.push_str(t);
                found = true;
            }
        }
        found.then_some(text)
    }

    /// Element children in document order.
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|child| match child {
            Node::Element(el) => Some(el),
            Node::Text(_) => None,
        })
    }

    /// First element child with the given name.
    pub fn find(&self, name: &str) -> Option<&Element> {
        self.elements().find(|el| el.name == name)
    }

    pub fn find_mut(&mut self, name: &str) -> Option<&mut Element> {
        self.children.iter_mut().find_map(|child| match child {
            Node::Element(el) if el.name == name => Some(el),
            _ => None,
        })
    }

    /// Text of the first child element with the given name.
    pub fn child_text(&self, name: &str) -> Option<String> {
        self.find(name).map(|el| el.text().unwrap_or_default())
    }

    pub fn has_elements(&self) -> bool {
        self.elements().next().is_some()
    }

    /// Remove every child, text included.
    pub fn clear(&mut self) {
        self.children.clear();
    }
}
