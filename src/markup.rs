//! Minimal SVG markup builder.
//!
//! Charts only ever append elements with an attribute list and ordered
//! children; serialization is compact (no XML declaration, no
//! pretty-printing) so the output can be embedded directly in a page.

use std::fmt::Write as _;

/// A node in the markup tree.
#[derive(Debug, Clone)]
pub enum Node {
    Element(Element),
    /// Character data, XML-escaped on write.
    Text(String),
    /// Unescaped content. Only used for literal CSS and script text.
    Raw(String),
}

/// An element with a tag name, attributes and ordered children.
#[derive(Debug, Clone)]
pub struct Element {
    tag: String,
    attrs: Vec<(String, String)>,
    children: Vec<Node>,
}

impl Element {
    /// Create an empty element.
    pub fn new(tag: impl Into<String>) -> Self {
        Element {
            tag: tag.into(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Add an attribute, keeping insertion order.
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attr(name, value);
        self
    }

    /// Add or replace an attribute in place.
    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        if let Some(slot) = self.attrs.iter_mut().find(|(n, _)| *n == name) {
            slot.1 = value;
        } else {
            self.attrs.push((name, value));
        }
    }

    /// Append a child element.
    pub fn append(&mut self, child: Element) {
        self.children.push(Node::Element(child));
    }

    /// Append a text child (escaped on write).
    pub fn text(mut self, content: impl Into<String>) -> Self {
        self.children.push(Node::Text(content.into()));
        self
    }

    /// Append raw character data. Reserved for stylesheet and script
    /// blocks; everything else goes through [`Element::text`].
    pub fn raw(mut self, content: impl Into<String>) -> Self {
        self.children.push(Node::Raw(content.into()));
        self
    }

    /// The tag name.
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Serialize the subtree to a compact SVG string.
    pub fn to_svg(&self) -> String {
        let mut out = String::new();
        self.write(&mut out);
        out
    }

    fn write(&self, out: &mut String) {
        let _ = write!(out, "<{}", self.tag);
        for (name, value) in &self.attrs {
            let _ = write!(out, " {}=\"{}\"", name, escape_attr(value));
        }
        if self.children.is_empty() {
            out.push_str("/>");
            return;
        }
        out.push('>');
        for child in &self.children {
            match child {
                Node::Element(el) => el.write(out),
                Node::Text(text) => out.push_str(&escape_xml(text)),
                Node::Raw(raw) => out.push_str(raw),
            }
        }
        let _ = write!(out, "</{}>", self.tag);
    }
}

/// Escape special XML characters in character data.
pub fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Escape special XML characters in an attribute value.
pub fn escape_attr(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('"', "&quot;")
}
