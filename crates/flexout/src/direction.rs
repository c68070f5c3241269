//! Parent layout direction lookup.
//!
//! A flex element sizes itself along its parent's main axis, so the builder
//! needs the direction of the *immediate* parent. The resolver probes the
//! parent in this order:
//!
//! | Probe | Source |
//! |-------|--------|
//! | inline `flex-direction` | [`DirectionSource::Styled`] |
//! | layout attribute | [`DirectionSource::Declared`] |
//! | direction cache | [`DirectionSource::Cached`] |
//! | nothing found | [`DirectionSource::Assumed`], recorded as `row` |
//!
//! Grandparents are never consulted, nor is the element's own layout
//! attribute.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ParseError;
use crate::host::{LayoutTree, NodeId};

/// Main-axis direction of a flex container.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LayoutDirection {
    #[default]
    Row,
    Column,
    RowReverse,
    ColumnReverse,
}

impl LayoutDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            LayoutDirection::Row => "row",
            LayoutDirection::Column => "column",
            LayoutDirection::RowReverse => "row-reverse",
            LayoutDirection::ColumnReverse => "column-reverse",
        }
    }

    pub fn is_column(self) -> bool {
        matches!(self, LayoutDirection::Column | LayoutDirection::ColumnReverse)
    }

    /// The `(min, max)` size properties along this main axis.
    pub fn sizing_properties(self) -> (&'static str, &'static str) {
        if self.is_column() {
            ("min-height", "max-height")
        } else {
            ("min-width", "max-width")
        }
    }
}

impl fmt::Display for LayoutDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parses the first whitespace-separated token, case-insensitively, so
/// layout values such as `"column wrap"` are accepted. A blank value means
/// `row`, as for a bare `layout` attribute.
impl FromStr for LayoutDirection {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let Some(token) = s.split_whitespace().next() else {
            return Ok(LayoutDirection::Row);
        };
        match token.to_ascii_lowercase().as_str() {
            "row" => Ok(LayoutDirection::Row),
            "column" => Ok(LayoutDirection::Column),
            "row-reverse" => Ok(LayoutDirection::RowReverse),
            "column-reverse" => Ok(LayoutDirection::ColumnReverse),
            _ => Err(ParseError::InvalidDirection(s.to_string())),
        }
    }
}

/// Directions assumed for parents that declare none, keyed by parent node.
#[derive(Debug, Clone, Default)]
pub struct DirectionCache {
    entries: HashMap<NodeId, LayoutDirection>,
}

impl DirectionCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// The direction recorded for `node`.
    pub fn get(&self, node: NodeId) -> Option<LayoutDirection> {
        self.entries.get(&node).copied()
    }

    /// Records `direction` for `node`. Returns `true` if this was a new write.
    pub fn record(&mut self, node: NodeId, direction: LayoutDirection) -> bool {
        self.entries.insert(node, direction) != Some(direction)
    }

    /// Drops the entry for `node`, returning it.
    pub fn forget(&mut self, node: NodeId) -> Option<LayoutDirection> {
        self.entries.remove(&node)
    }

    /// Number of parents with a recorded direction.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Where a resolved direction came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DirectionSource {
    /// The parent's applied `flex-direction` declaration.
    Styled,
    /// The parent's layout attribute.
    Declared,
    /// A default recorded by an earlier resolution.
    Cached,
    /// Nothing declared; `row` was assumed for `parent`. `first_write` is set
    /// the first time the default is recorded.
    Assumed { parent: NodeId, first_write: bool },
    /// The element has no parent.
    Detached,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Resolution {
    pub direction: LayoutDirection,
    pub source: DirectionSource,
}

/// Resolves parent directions and owns the cache of assumed defaults.
///
/// ```rust
/// use flexout::{DirectionResolver, DirectionSource, Document, LayoutDirection};
///
/// let mut doc = Document::new();
/// let parent = doc.create_element("div");
/// doc.append_child(doc.root(), parent);
/// doc.set_attribute(parent, "layout", "column");
/// let child = doc.create_element("div");
/// doc.append_child(parent, child);
///
/// let mut resolver = DirectionResolver::default();
/// let resolution = resolver.resolve(&doc, child);
/// assert_eq!(resolution.direction, LayoutDirection::Column);
/// assert_eq!(resolution.source, DirectionSource::Declared);
/// ```
#[derive(Debug, Clone)]
pub struct DirectionResolver {
    layout_attr: String,
    cache: DirectionCache,
}

impl DirectionResolver {
    pub fn new(layout_attr: impl Into<String>) -> Self {
        Self {
            layout_attr: layout_attr.into(),
            cache: DirectionCache::new(),
        }
    }

    pub fn layout_attribute(&self) -> &str {
        &self.layout_attr
    }

    pub fn cache(&self) -> &DirectionCache {
        &self.cache
    }

    pub fn cache_mut(&mut self) -> &mut DirectionCache {
        &mut self.cache
    }

    /// Resolves the main-axis direction that applies to `node`.
    pub fn resolve<T: LayoutTree + ?Sized>(&mut self, tree: &T, node: NodeId) -> Resolution {
        let Some(parent) = tree.parent(node) else {
            return Resolution {
                direction: LayoutDirection::Row,
                source: DirectionSource::Detached,
            };
        };

        if let Some(direction) = probe(tree.inline_style(parent, "flex-direction"), parent) {
            return Resolution {
                direction,
                source: DirectionSource::Styled,
            };
        }
        if let Some(direction) = probe(tree.attribute(parent, &self.layout_attr), parent) {
            return Resolution {
                direction,
                source: DirectionSource::Declared,
            };
        }
        if let Some(direction) = self.cache.get(parent) {
            return Resolution {
                direction,
                source: DirectionSource::Cached,
            };
        }

        let first_write = self.cache.record(parent, LayoutDirection::Row);
        tracing::debug!(%parent, "no direction declared on parent, assuming row");
        Resolution {
            direction: LayoutDirection::Row,
            source: DirectionSource::Assumed {
                parent,
                first_write,
            },
        }
    }
}

impl Default for DirectionResolver {
    fn default() -> Self {
        Self::new("layout")
    }
}

fn probe(value: Option<&str>, parent: NodeId) -> Option<LayoutDirection> {
    match value?.parse() {
        Ok(direction) => Some(direction),
        Err(err) => {
            tracing::warn!(%parent, error = %err, "ignoring parent direction");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Document;
    use crate::host::StyleSink;

    fn nested() -> (Document, NodeId, NodeId, NodeId) {
        let mut doc = Document::new();
        let grand = doc.create_element("div");
        doc.append_child(doc.root(), grand);
        let parent = doc.create_element("div");
        doc.append_child(grand, parent);
        let child = doc.create_element("div");
        doc.append_child(parent, child);
        (doc, grand, parent, child)
    }

    #[test]
    fn test_parse_direction_names() {
        assert_eq!("row".parse(), Ok(LayoutDirection::Row));
        assert_eq!("Column".parse(), Ok(LayoutDirection::Column));
        assert_eq!("row-reverse".parse(), Ok(LayoutDirection::RowReverse));
        assert_eq!("column-reverse wrap".parse(), Ok(LayoutDirection::ColumnReverse));
        assert_eq!("".parse(), Ok(LayoutDirection::Row));
        assert_eq!(
            "diagonal".parse::<LayoutDirection>(),
            Err(ParseError::InvalidDirection("diagonal".to_string()))
        );
    }

    #[test]
    fn test_direction_display_round_trip() {
        for dir in [
            LayoutDirection::Row,
            LayoutDirection::Column,
            LayoutDirection::RowReverse,
            LayoutDirection::ColumnReverse,
        ] {
            assert_eq!(dir.to_string().parse(), Ok(dir));
        }
    }

    #[test]
    fn test_sizing_properties() {
        assert_eq!(
            LayoutDirection::Row.sizing_properties(),
            ("min-width", "max-width")
        );
        assert_eq!(
            LayoutDirection::ColumnReverse.sizing_properties(),
            ("min-height", "max-height")
        );
    }

    #[test]
    fn test_serde_kebab_case() {
        let dir: LayoutDirection = serde_yaml::from_str("row-reverse").unwrap();
        assert_eq!(dir, LayoutDirection::RowReverse);
    }

    #[test]
    fn test_cache_record_reports_first_write() {
        let mut cache = DirectionCache::new();
        assert!(cache.record(NodeId(3), LayoutDirection::Row));
        assert!(!cache.record(NodeId(3), LayoutDirection::Row));
        assert_eq!(cache.get(NodeId(3)), Some(LayoutDirection::Row));
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.forget(NodeId(3)), Some(LayoutDirection::Row));
        assert!(cache.is_empty());
    }

    #[test]
    fn test_resolve_declared_on_parent() {
        let (mut doc, _, parent, child) = nested();
        doc.set_attribute(parent, "layout", "column");

        let mut resolver = DirectionResolver::default();
        let res = resolver.resolve(&doc, child);
        assert_eq!(res.direction, LayoutDirection::Column);
        assert_eq!(res.source, DirectionSource::Declared);
    }

    #[test]
    fn test_resolve_styled_parent_wins_over_attribute() {
        let (mut doc, _, parent, child) = nested();
        doc.set_attribute(parent, "layout", "row");
        doc.set_style(parent, "flex-direction", "column");

        let mut resolver = DirectionResolver::default();
        let res = resolver.resolve(&doc, child);
        assert_eq!(res.direction, LayoutDirection::Column);
        assert_eq!(res.source, DirectionSource::Styled);
    }

    #[test]
    fn test_resolve_ignores_grandparent() {
        let (mut doc, grand, parent, child) = nested();
        doc.set_attribute(grand, "layout", "column");

        let mut resolver = DirectionResolver::default();
        let res = resolver.resolve(&doc, child);
        assert_eq!(res.direction, LayoutDirection::Row);
        assert_eq!(
            res.source,
            DirectionSource::Assumed {
                parent,
                first_write: true
            }
        );

        let again = resolver.resolve(&doc, child);
        assert_eq!(again.source, DirectionSource::Cached);
    }

    #[test]
    fn test_resolve_ignores_own_layout() {
        let (mut doc, _, _, child) = nested();
        doc.set_attribute(child, "layout", "column");

        let mut resolver = DirectionResolver::default();
        assert_eq!(resolver.resolve(&doc, child).direction, LayoutDirection::Row);
    }

    #[test]
    fn test_resolve_detached() {
        let mut doc = Document::new();
        let orphan = doc.create_element("div");

        let mut resolver = DirectionResolver::default();
        let res = resolver.resolve(&doc, orphan);
        assert_eq!(res.source, DirectionSource::Detached);
        assert!(resolver.cache().is_empty());
    }

    #[test]
    fn test_resolve_skips_invalid_declaration() {
        let (mut doc, _, parent, child) = nested();
        doc.set_style(parent, "flex-direction", "sideways");
        doc.set_attribute(parent, "layout", "column");

        let mut resolver = DirectionResolver::default();
        let res = resolver.resolve(&doc, child);
        assert_eq!(res.direction, LayoutDirection::Column);
        assert_eq!(res.source, DirectionSource::Declared);
    }

    #[test]
    fn test_resolve_custom_attribute_name() {
        let (mut doc, _, parent, child) = nested();
        doc.set_attribute(parent, "fxLayout", "column");

        let mut resolver = DirectionResolver::new("fxLayout");
        assert_eq!(resolver.resolve(&doc, child).direction, LayoutDirection::Column);
    }
}
