//! Per-element bindings.
//!
//! A binding is created once per element from its attributes, parses every
//! declared value up front, and then re-applies styles on each
//! [`Activation`]:
//!
//! - [`FlexBinding`]: `flex` / `flex.<alias>` → [`build_styles`]
//! - [`LayoutBinding`]: `layout` / `layout.<alias>` → [`build_layout_styles`]
//!
//! Malformed values are kept as errors. When the resolved value is one of
//! them, the binding logs a warning and leaves the element's styles as they
//! were. Each binding remembers which properties it wrote, so a refresh
//! removes its own stale declarations without touching anyone else's.

use std::collections::BTreeSet;

use flexout_media::{Activation, BreakPointRegistry};

use crate::direction::{DirectionResolver, DirectionSource, LayoutDirection};
use crate::error::ParseError;
use crate::host::{Host, LayoutTree, NodeId, StyleSink};
use crate::responsive::{ActiveState, Responsive};
use crate::shorthand::{parse, FlexValue};
use crate::style::{build_layout_styles, build_styles, StyleSet};

/// Properties written by a binding on its element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct OwnedStyles(BTreeSet<String>);

impl OwnedStyles {
    /// Removes owned properties missing from `styles`, then writes `styles`.
    fn replace<S: StyleSink + ?Sized>(&mut self, sink: &mut S, node: NodeId, styles: &StyleSet) {
        for stale in self.0.iter().filter(|p| !styles.contains(p)) {
            sink.remove_style(node, stale);
        }
        sink.apply(node, styles);
        self.0 = styles.names().map(str::to_string).collect();
    }
}

/// What a refresh did.
#[derive(Debug, Clone, PartialEq)]
pub enum Refresh {
    /// Styles were written.
    Applied(StyleSet),
    /// The resolved value is malformed; nothing was written.
    Skipped(ParseError),
}

impl Refresh {
    pub fn is_applied(&self) -> bool {
        matches!(self, Refresh::Applied(_))
    }
}

/// Binds `flex` attributes on one element.
#[derive(Debug, Clone)]
pub struct FlexBinding {
    node: NodeId,
    values: Responsive<Result<FlexValue, ParseError>>,
    state: ActiveState,
    owned: OwnedStyles,
}

impl FlexBinding {
    /// Reads `attr` and `attr.<alias>` from `node`.
    ///
    /// Returns `None` if the element declares neither.
    pub fn from_tree<T: LayoutTree + ?Sized>(
        tree: &T,
        node: NodeId,
        attr: &str,
        registry: &BreakPointRegistry,
    ) -> Option<Self> {
        let raw = Responsive::from_attributes(attr, tree.attributes(node), registry)?;
        Some(Self::new(node, raw.map(|value| parse(&value))))
    }

    pub fn new(node: NodeId, values: Responsive<Result<FlexValue, ParseError>>) -> Self {
        Self {
            node,
            values,
            state: ActiveState::Base,
            owned: OwnedStyles::default(),
        }
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn state(&self) -> &ActiveState {
        &self.state
    }

    pub fn values(&self) -> &Responsive<Result<FlexValue, ParseError>> {
        &self.values
    }

    /// Names of the properties this binding last wrote.
    pub fn owned_properties(&self) -> impl Iterator<Item = &str> {
        self.owned.0.iter().map(String::as_str)
    }

    /// Takes over the properties a previous binding of the same element
    /// wrote, so the next refresh cleans them up.
    pub fn inherit(&mut self, previous: &FlexBinding) {
        self.owned = previous.owned.clone();
    }

    /// Resolves the value for `activation` and writes the resulting styles.
    ///
    /// With `inject_default` set, a parent whose direction had to be assumed
    /// receives `flex-direction: row` the first time it is assumed.
    pub fn refresh<H: Host + ?Sized>(
        &mut self,
        host: &mut H,
        resolver: &mut DirectionResolver,
        activation: &Activation,
        registry: &BreakPointRegistry,
        inject_default: bool,
    ) -> Refresh {
        let (state, value) = self.values.resolve(activation, registry);
        let value = match value {
            Ok(value) => value,
            Err(err) => {
                tracing::warn!(
                    node = %self.node,
                    alias = state.alias().unwrap_or("<base>"),
                    error = %err,
                    "skipping malformed flex value"
                );
                return Refresh::Skipped(err.clone());
            }
        };

        let resolution = resolver.resolve(&*host, self.node);
        if let DirectionSource::Assumed {
            parent,
            first_write: true,
        } = resolution.source
        {
            if inject_default {
                tracing::debug!(%parent, "injecting default flex-direction");
                host.set_style(parent, "flex-direction", LayoutDirection::Row.as_str());
            }
        }

        let styles = build_styles(value, resolution.direction);
        self.owned.replace(host, self.node, &styles);
        if state != self.state {
            tracing::debug!(node = %self.node, from = ?self.state, to = ?state, "flex state changed");
            self.state = state;
        }
        tracing::trace!(node = %self.node, styles = %styles, "applied flex styles");
        Refresh::Applied(styles)
    }
}

/// Binds `layout` attributes on one container element.
#[derive(Debug, Clone)]
pub struct LayoutBinding {
    node: NodeId,
    values: Responsive<Result<LayoutDirection, ParseError>>,
    state: ActiveState,
    owned: OwnedStyles,
}

impl LayoutBinding {
    pub fn from_tree<T: LayoutTree + ?Sized>(
        tree: &T,
        node: NodeId,
        attr: &str,
        registry: &BreakPointRegistry,
    ) -> Option<Self> {
        let raw = Responsive::from_attributes(attr, tree.attributes(node), registry)?;
        Some(Self::new(node, raw.map(|value| value.parse())))
    }

    pub fn new(node: NodeId, values: Responsive<Result<LayoutDirection, ParseError>>) -> Self {
        Self {
            node,
            values,
            state: ActiveState::Base,
            owned: OwnedStyles::default(),
        }
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn state(&self) -> &ActiveState {
        &self.state
    }

    pub fn owned_properties(&self) -> impl Iterator<Item = &str> {
        self.owned.0.iter().map(String::as_str)
    }

    pub fn inherit(&mut self, previous: &LayoutBinding) {
        self.owned = previous.owned.clone();
    }

    pub fn refresh<H: StyleSink + ?Sized>(
        &mut self,
        host: &mut H,
        activation: &Activation,
        registry: &BreakPointRegistry,
    ) -> Refresh {
        let (state, value) = self.values.resolve(activation, registry);
        let direction = match value {
            Ok(direction) => *direction,
            Err(err) => {
                tracing::warn!(
                    node = %self.node,
                    alias = state.alias().unwrap_or("<base>"),
                    error = %err,
                    "skipping malformed layout value"
                );
                return Refresh::Skipped(err.clone());
            }
        };

        let styles = build_layout_styles(direction);
        self.owned.replace(host, self.node, &styles);
        if state != self.state {
            tracing::debug!(node = %self.node, from = ?self.state, to = ?state, "layout state changed");
            self.state = state;
        }
        tracing::trace!(node = %self.node, %direction, "applied layout styles");
        Refresh::Applied(styles)
    }
}
