//! The test fixture: a bound document plus a scriptable media source.

use std::fmt::Write as _;

use flexout::{Document, FlexLayout, LayoutConfig, LayoutTree, NodeId, StyleSet};
use flexout_media::{MediaMonitor, MockMatchMedia};

use crate::error::FixtureError;
use crate::template::parse_template;

/// A template rendered into a [`Document`], with every element bound.
///
/// ```rust
/// use flexout_test::Fixture;
///
/// let mut fixture = Fixture::new(r#"<div flex="auto" flex.gt-sm="50%"></div>"#).unwrap();
/// let el = fixture.first().unwrap();
/// fixture.assert_has_styles(el, &[("flex", "1 1 auto")]);
///
/// fixture.activate("xl", Some(true)).unwrap();
/// fixture.assert_has_styles(el, &[("flex", "1 1 100%"), ("max-width", "50%")]);
/// ```
pub struct Fixture {
    layout: FlexLayout<Document>,
    media: MockMatchMedia,
    top: Vec<NodeId>,
}

impl Fixture {
    /// Builds a fixture with the default configuration.
    pub fn new(template: &str) -> Result<Self, FixtureError> {
        Self::with_config(template, LayoutConfig::default())
    }

    pub fn with_config(template: &str, config: LayoutConfig) -> Result<Self, FixtureError> {
        let (doc, top) = parse_template(template)?;
        let monitor = MediaMonitor::new();
        let mut layout = FlexLayout::with_config(doc, monitor.clone(), config)?;
        let media = MockMatchMedia::with_registry(layout.registry().clone(), monitor);
        layout.bind_all();
        Ok(Self { layout, media, top })
    }

    pub fn layout(&self) -> &FlexLayout<Document> {
        &self.layout
    }

    pub fn layout_mut(&mut self) -> &mut FlexLayout<Document> {
        &mut self.layout
    }

    /// Activates a breakpoint; see [`MockMatchMedia::activate`].
    pub fn activate(&mut self, alias: &str, overlaps: Option<bool>) -> Result<(), FixtureError> {
        self.media.activate(alias, overlaps)?;
        Ok(())
    }

    pub fn set_use_overlaps(&mut self, use_overlaps: bool) {
        self.media.set_use_overlaps(use_overlaps);
    }

    pub fn clear_all(&mut self) {
        self.media.clear_all();
    }

    /// The first top-level element of the template.
    pub fn first(&self) -> Option<NodeId> {
        self.top.first().copied()
    }

    /// Elements matching `selector`, in document order.
    ///
    /// Supported selectors: `.class`, `[attr]`, `[attr=value]` and a bare
    /// tag name.
    pub fn query(&self, selector: &str) -> Vec<NodeId> {
        let doc = self.layout.host();
        let root = doc.root();
        let found: Vec<NodeId> = doc
            .elements()
            .into_iter()
            .filter(|node| *node != root && selector_matches(&doc, *node, selector))
            .collect();
        found
    }

    /// Like [`query`](Self::query), but panics unless something matches.
    pub fn query_one(&self, selector: &str) -> NodeId {
        match self.query(selector).first() {
            Some(node) => *node,
            None => panic!("no element matches '{}'", selector),
        }
    }

    pub fn style(&self, node: NodeId, property: &str) -> Option<String> {
        self.layout.host().style(node, property).map(str::to_string)
    }

    pub fn styles(&self, node: NodeId) -> StyleSet {
        self.layout.host().styles(node).cloned().unwrap_or_default()
    }

    /// Panics unless every `(property, value)` pair is present. A value of
    /// `*` matches any value.
    pub fn assert_has_styles(&self, node: NodeId, expected: &[(&str, &str)]) {
        let styles = self.styles(node);
        let missing: Vec<&(&str, &str)> = expected
            .iter()
            .filter(|(p, v)| !has_style(&styles, p, v))
            .collect();
        if !missing.is_empty() {
            panic!("{}", report(node, "expected", &missing, &styles));
        }
    }

    /// Panics if any `(property, value)` pair is present. A value of `*`
    /// matches any value.
    pub fn assert_lacks_styles(&self, node: NodeId, unexpected: &[(&str, &str)]) {
        let styles = self.styles(node);
        let present: Vec<&(&str, &str)> = unexpected
            .iter()
            .filter(|(p, v)| has_style(&styles, p, v))
            .collect();
        if !present.is_empty() {
            panic!("{}", report(node, "unexpected", &present, &styles));
        }
    }
}

/// Returns `true` if `styles` declares `property` with `value`, or with any
/// value when `value` is `*`.
pub fn has_style(styles: &StyleSet, property: &str, value: &str) -> bool {
    match styles.get(property) {
        Some(actual) => value == "*" || actual == value,
        None => false,
    }
}

fn selector_matches(doc: &Document, node: NodeId, selector: &str) -> bool {
    if let Some(class) = selector.strip_prefix('.') {
        return doc
            .attribute(node, "class")
            .map_or(false, |classes| classes.split_whitespace().any(|c| c == class));
    }
    if let Some(inner) = selector.strip_prefix('[').and_then(|s| s.strip_suffix(']')) {
        return match inner.split_once('=') {
            Some((name, value)) => {
                doc.attribute(node, name) == Some(value.trim_matches(|c| c == '"' || c == '\''))
            }
            None => doc.attribute(node, inner).is_some(),
        };
    }
    doc.tag(node) == Some(selector)
}

fn report(node: NodeId, label: &str, pairs: &[&(&str, &str)], styles: &StyleSet) -> String {
    let mut out = format!("element {}: {} styles", node, label);
    for (property, value) in pairs {
        let _ = write!(out, " [{}: {}]", property, value);
    }
    let _ = write!(out, "\n  actual: {}", styles);
    out
}
