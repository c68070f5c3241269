//! In-memory element tree.
//!
//! [`Document`] is a small arena of elements with attributes and inline
//! styles. It implements [`LayoutTree`] and [`StyleSink`], which makes it a
//! complete [`Host`](crate::Host) for the engine.
//!
//! ```rust
//! use flexout::{Document, LayoutTree};
//!
//! let mut doc = Document::new();
//! let div = doc.create_element("div");
//! doc.append_child(doc.root(), div);
//! doc.set_attribute(div, "flex", "1 0 37px");
//!
//! assert_eq!(doc.parent(div), Some(doc.root()));
//! assert_eq!(doc.attribute(div, "flex"), Some("1 0 37px"));
//! ```

use crate::host::{AttributeSink, LayoutTree, NodeId, StyleSink};
use crate::style::StyleSet;

#[derive(Debug, Clone)]
struct Element {
    tag: String,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    attributes: Vec<(String, String)>,
    styles: StyleSet,
}

impl Element {
    fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            parent: None,
            children: Vec::new(),
            attributes: Vec::new(),
            styles: StyleSet::new(),
        }
    }
}

/// An arena-backed element tree with a `body` root.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Element>,
}

impl Document {
    pub fn new() -> Self {
        Self {
            nodes: vec![Element::new("body")],
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Creates a detached element.
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.nodes.push(Element::new(tag));
        NodeId(self.nodes.len() - 1)
    }

    pub fn contains(&self, node: NodeId) -> bool {
        node.0 < self.nodes.len()
    }

    pub fn tag(&self, node: NodeId) -> Option<&str> {
        self.get(node).map(|el| el.tag.as_str())
    }

    /// Appends `child` under `parent`, detaching it from any previous parent.
    ///
    /// Ignored if either node is unknown or the move would create a cycle.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        if !self.contains(parent) || !self.contains(child) || self.is_ancestor(child, parent) {
            return;
        }
        self.detach(child);
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
    }

    /// Removes `node` from its parent; the subtree stays intact.
    pub fn detach(&mut self, node: NodeId) {
        let Some(parent) = self.get(node).and_then(|el| el.parent) else {
            return;
        };
        self.nodes[parent.0].children.retain(|c| *c != node);
        self.nodes[node.0].parent = None;
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        self.get(node)
            .map(|el| el.children.as_slice())
            .unwrap_or(&[])
    }

    /// Every element below `node` in document order, excluding `node`.
    pub fn descendants(&self, node: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(node).iter().rev().copied().collect();
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self.children(next).iter().rev().copied());
        }
        out
    }

    /// Sets an attribute, replacing any previous value in place.
    pub fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) {
        let Some(el) = self.nodes.get_mut(node.0) else {
            return;
        };
        match el.attributes.iter_mut().find(|(n, _)| n == name) {
            Some((_, v)) => *v = value.to_string(),
            None => el.attributes.push((name.to_string(), value.to_string())),
        }
    }

    pub fn remove_attribute(&mut self, node: NodeId, name: &str) -> Option<String> {
        let el = self.nodes.get_mut(node.0)?;
        let idx = el.attributes.iter().position(|(n, _)| n == name)?;
        Some(el.attributes.remove(idx).1)
    }

    /// Applies inline declarations such as `"flex-direction: column"`.
    pub fn set_inline_style(&mut self, node: NodeId, css: &str) {
        for (property, value) in StyleSet::parse_declarations(css).iter() {
            self.set_style(node, property, value);
        }
    }

    pub fn styles(&self, node: NodeId) -> Option<&StyleSet> {
        self.get(node).map(|el| &el.styles)
    }

    pub fn style(&self, node: NodeId, property: &str) -> Option<&str> {
        self.get(node).and_then(|el| el.styles.get(property))
    }

    fn get(&self, node: NodeId) -> Option<&Element> {
        self.nodes.get(node.0)
    }

    fn is_ancestor(&self, candidate: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(n) = current {
            if n == candidate {
                return true;
            }
            current = self.get(n).and_then(|el| el.parent);
        }
        false
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl LayoutTree for Document {
    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.get(node).and_then(|el| el.parent)
    }

    fn attribute(&self, node: NodeId, name: &str) -> Option<&str> {
        self.get(node)?
            .attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    fn attributes(&self, node: NodeId) -> Vec<(&str, &str)> {
        self.get(node)
            .map(|el| {
                el.attributes
                    .iter()
                    .map(|(n, v)| (n.as_str(), v.as_str()))
                    .collect()
            })
            .unwrap_or_default()
    }

    fn inline_style(&self, node: NodeId, property: &str) -> Option<&str> {
        self.style(node, property)
    }

    fn elements(&self) -> Vec<NodeId> {
        let mut out = vec![self.root()];
        out.extend(self.descendants(self.root()));
        out
    }
}

impl AttributeSink for Document {
    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) {
        Document::set_attribute(self, node, name, value);
    }
}

impl StyleSink for Document {
    fn set_style(&mut self, node: NodeId, property: &str, value: &str) {
        if let Some(el) = self.nodes.get_mut(node.0) {
            el.styles.set(property, value);
        }
    }

    fn remove_style(&mut self, node: NodeId, property: &str) {
        if let Some(el) = self.nodes.get_mut(node.0) {
            el.styles.remove(property);
        }
    }
}
