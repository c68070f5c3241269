//! The seam between the layout engine and whatever owns the elements.
//!
//! The engine never touches a document directly. It reads the tree through
//! [`LayoutTree`] and writes styles through [`StyleSink`]; anything that
//! implements both is a [`Host`]. [`Document`](crate::Document) is the
//! in-memory host used by the tests and the fixture crate.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::style::StyleSet;

/// Identity of an element within a host.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Read access to the element tree.
pub trait LayoutTree {
    /// The element's immediate parent; `None` when detached or the root.
    fn parent(&self, node: NodeId) -> Option<NodeId>;

    fn attribute(&self, node: NodeId, name: &str) -> Option<&str>;

    /// Every attribute on the element, in declaration order.
    fn attributes(&self, node: NodeId) -> Vec<(&str, &str)>;

    /// The currently applied inline declaration for `property`.
    fn inline_style(&self, node: NodeId, property: &str) -> Option<&str>;

    /// Every attached element in document order, parents before children.
    fn elements(&self) -> Vec<NodeId>;
}

/// Write access to element styles.
///
/// Writes to unknown nodes are ignored.
pub trait StyleSink {
    fn set_style(&mut self, node: NodeId, property: &str, value: &str);

    fn remove_style(&mut self, node: NodeId, property: &str);

    /// Writes every declaration of `styles`.
    fn apply(&mut self, node: NodeId, styles: &StyleSet) {
        for (property, value) in styles.iter() {
            self.set_style(node, property, value);
        }
    }
}

/// Attribute writes, needed to change a bound element's declarations.
pub trait AttributeSink {
    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str);
}

/// A tree the engine can both read and style.
pub trait Host: LayoutTree + StyleSink {}

impl<T: LayoutTree + StyleSink + ?Sized> Host for T {}
