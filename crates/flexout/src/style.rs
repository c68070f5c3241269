//! Style sets and the flex style builder.
//!
//! [`build_styles`] turns a parsed [`FlexValue`] and the parent's
//! [`LayoutDirection`] into the declarations an element needs:
//!
//! | Basis kind | `flex` basis | min clamp | max clamp |
//! |------------|--------------|-----------|-----------|
//! | Percent, zero | `0%` | - | - |
//! | Percent | `100%` | fixed, or column with grow > 0 | shrink > 0, or fixed |
//! | Px | as given | grow > 0, or fixed | shrink > 0, or fixed |
//! | Calc, Default | as given | - | - |
//!
//! A box is *fixed* when grow and shrink are both zero. Clamps target
//! `min-width`/`max-width` in rows and `min-height`/`max-height` in columns.
//!
//! ```rust
//! use flexout::{build_styles, parse, LayoutDirection};
//!
//! let styles = build_styles(&parse("1 0 37px").unwrap(), LayoutDirection::Row);
//! assert_eq!(styles.get("flex"), Some("1 0 37px"));
//! assert_eq!(styles.get("min-width"), Some("37px"));
//! assert_eq!(styles.get("max-width"), None);
//! ```

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::direction::LayoutDirection;
use crate::shorthand::{BasisKind, FlexValue};

/// An ordered set of CSS declarations.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct StyleSet {
    properties: BTreeMap<String, String>,
}

impl StyleSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses inline declarations such as `"flex-direction: column; color: red"`.
    ///
    /// Empty and malformed declarations are skipped.
    pub fn parse_declarations(css: &str) -> Self {
        css.split(';')
            .filter_map(|decl| decl.split_once(':'))
            .map(|(name, value)| (name.trim(), value.trim()))
            .filter(|(name, value)| !name.is_empty() && !value.is_empty())
            .collect()
    }

    /// Sets a declaration, returning the previous value.
    pub fn set(&mut self, property: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.properties.insert(property.into(), value.into())
    }

    /// Builder form of [`set`](Self::set).
    pub fn with(mut self, property: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(property, value);
        self
    }

    /// The value declared for `property`.
    pub fn get(&self, property: &str) -> Option<&str> {
        self.properties.get(property).map(String::as_str)
    }

    /// Returns `true` if `property` is declared.
    pub fn contains(&self, property: &str) -> bool {
        self.properties.contains_key(property)
    }

    /// Removes a declaration, returning its value.
    pub fn remove(&mut self, property: &str) -> Option<String> {
        self.properties.remove(property)
    }

    /// Declarations in property-name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.properties
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.properties.keys().map(String::as_str)
    }

    /// Number of declarations.
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for StyleSet {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut styles = StyleSet::new();
        for (k, v) in iter {
            styles.set(k, v);
        }
        styles
    }
}

/// Renders as `prop: value;` pairs separated by spaces, in property order.
impl fmt::Display for StyleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (name, value)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}: {};", name, value)?;
        }
        Ok(())
    }
}

/// Computes the box styles for a flex element.
pub fn build_styles(value: &FlexValue, direction: LayoutDirection) -> StyleSet {
    let (min_prop, max_prop) = direction.sizing_properties();
    let (grow, shrink, basis) = (value.grow(), value.shrink(), value.basis());
    let fixed = value.is_fixed();

    let mut styles = StyleSet::new().with("box-sizing", "border-box");
    match value.kind() {
        BasisKind::Percent if value.is_zero_percent() => {
            styles.set("flex", flex(grow, shrink, "0%"));
        }
        BasisKind::Percent => {
            styles.set("flex", flex(grow, shrink, "100%"));
            if shrink > 0.0 || fixed {
                styles.set(max_prop, basis);
            }
            if fixed || (direction.is_column() && grow > 0.0) {
                styles.set(min_prop, basis);
            }
        }
        BasisKind::Px => {
            styles.set("flex", flex(grow, shrink, basis));
            if grow > 0.0 || fixed {
                styles.set(min_prop, basis);
            }
            if shrink > 0.0 || fixed {
                styles.set(max_prop, basis);
            }
        }
        BasisKind::Calc | BasisKind::Default => {
            styles.set("flex", flex(grow, shrink, basis));
        }
    }
    styles
}

/// Container styles for a layout element.
pub fn build_layout_styles(direction: LayoutDirection) -> StyleSet {
    StyleSet::new()
        .with("display", "flex")
        .with("flex-direction", direction.as_str())
        .with("box-sizing", "border-box")
}

fn flex(grow: f64, shrink: f64, basis: &str) -> String {
    format!("{} {} {}", grow, shrink, basis)
}
