//! Base values with per-breakpoint overrides.
//!
//! An element declares a base value under an attribute name and optional
//! overrides under `name.<alias>`:
//!
//! ```text
//! <div flex="50" flex.gt-xs="33" flex.gt-sm="25">
//! ```
//!
//! [`Responsive::resolve`] picks the value for the current [`Activation`]:
//! among the active aliases that have an override, the registry's most
//! specific breakpoint wins; otherwise the base applies.

use std::collections::BTreeMap;

use flexout_media::{Activation, BreakPointRegistry};

/// Which value a responsive binding is currently showing.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum ActiveState {
    #[default]
    Base,
    Overridden(String),
}

impl ActiveState {
    pub fn alias(&self) -> Option<&str> {
        match self {
            ActiveState::Base => None,
            ActiveState::Overridden(alias) => Some(alias),
        }
    }
}

/// A base value plus overrides keyed by breakpoint alias.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Responsive<T> {
    base: T,
    overrides: BTreeMap<String, T>,
}

impl<T> Responsive<T> {
    pub fn new(base: T) -> Self {
        Self {
            base,
            overrides: BTreeMap::new(),
        }
    }

    pub fn with_override(mut self, alias: impl Into<String>, value: T) -> Self {
        self.overrides.insert(alias.into(), value);
        self
    }

    pub fn base(&self) -> &T {
        &self.base
    }

    pub fn override_for(&self, alias: &str) -> Option<&T> {
        self.overrides.get(alias)
    }

    pub fn overrides(&self) -> impl Iterator<Item = (&str, &T)> {
        self.overrides.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn has_overrides(&self) -> bool {
        !self.overrides.is_empty()
    }

    /// Converts every value, keeping the aliases.
    pub fn map<U, F>(self, mut f: F) -> Responsive<U>
    where
        F: FnMut(T) -> U,
    {
        Responsive {
            base: f(self.base),
            overrides: self
                .overrides
                .into_iter()
                .map(|(alias, value)| (alias, f(value)))
                .collect(),
        }
    }

    /// Selects the value for `activation`.
    ///
    /// ```rust
    /// use flexout::{ActiveState, Responsive};
    /// use flexout_media::{Activation, BreakPointRegistry};
    ///
    /// let registry = BreakPointRegistry::default();
    /// let flex = Responsive::new("50")
    ///     .with_override("gt-xs", "33")
    ///     .with_override("gt-sm", "25");
    ///
    /// let xl = Activation::overlapping("xl", ["xl", "gt-xs", "gt-sm", "gt-md", "gt-lg"]);
    /// assert_eq!(
    ///     flex.resolve(&xl, &registry),
    ///     (ActiveState::Overridden("gt-sm".to_string()), &"25")
    /// );
    /// assert_eq!(flex.resolve(&Activation::none(), &registry).1, &"50");
    /// ```
    pub fn resolve(&self, activation: &Activation, registry: &BreakPointRegistry) -> (ActiveState, &T) {
        let candidates = activation
            .candidates()
            .filter(|alias| self.overrides.contains_key(*alias));
        match registry
            .most_specific(candidates)
            .and_then(|bp| self.overrides.get_key_value(&bp.alias))
        {
            Some((alias, value)) => (ActiveState::Overridden(alias.clone()), value),
            None => (ActiveState::Base, &self.base),
        }
    }
}

impl Responsive<String> {
    /// Collects `name` and `name.<alias>` from an element's attributes.
    ///
    /// Returns `None` when neither is present. A missing base is taken as
    /// the empty string. Overrides for aliases absent from `registry` are
    /// logged and dropped.
    pub fn from_attributes<'a, I>(name: &str, attributes: I, registry: &BreakPointRegistry) -> Option<Self>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut base = None;
        let mut overrides = BTreeMap::new();
        for (attr, value) in attributes {
            if attr == name {
                base = Some(value.to_string());
                continue;
            }
            let Some(alias) = attr.strip_prefix(name).and_then(|rest| rest.strip_prefix('.')) else {
                continue;
            };
            if registry.contains(alias) {
                overrides.insert(alias.to_string(), value.to_string());
            } else {
                tracing::warn!(attribute = attr, alias, "ignoring override for unknown breakpoint");
            }
        }
        if base.is_none() && overrides.is_empty() {
            return None;
        }
        Some(Self {
            base: base.unwrap_or_default(),
            overrides,
        })
    }
}
