//! Breakpoint registry: the ordered set of aliases an application responds to.
//!
//! The registry answers the two questions the resolution engine asks:
//!
//! 1. Which breakpoints are active for a viewport (or contain a given alias)?
//! 2. Of several active aliases, which is the most specific?
//!
//! # Default Table
//!
//! | Alias | Media query | Overlapping |
//! |-------|-------------|-------------|
//! | `xs` | `(min-width: 0px) and (max-width: 599px)` | no |
//! | `gt-xs` | `(min-width: 600px)` | yes |
//! | `lt-sm` | `(max-width: 599px)` | yes |
//! | `sm` | `(min-width: 600px) and (max-width: 959px)` | no |
//! | `gt-sm` | `(min-width: 960px)` | yes |
//! | `lt-md` | `(max-width: 959px)` | yes |
//! | `md` | `(min-width: 960px) and (max-width: 1279px)` | no |
//! | `gt-md` | `(min-width: 1280px)` | yes |
//! | `lt-lg` | `(max-width: 1279px)` | yes |
//! | `lg` | `(min-width: 1280px) and (max-width: 1919px)` | no |
//! | `gt-lg` | `(min-width: 1920px)` | yes |
//! | `lt-xl` | `(max-width: 1919px)` | yes |
//! | `xl` | `(min-width: 1920px) and (max-width: 5000px)` | no |
//!
//! # From YAML
//!
//! ```rust
//! use flexout_media::BreakPointRegistry;
//!
//! let registry = BreakPointRegistry::from_yaml(r#"
//! - alias: narrow
//!   media_query: "(max-width: 799px)"
//! - alias: wide
//!   media_query: "(min-width: 800px)"
//! "#).unwrap();
//!
//! assert_eq!(registry.len(), 2);
//! assert!(registry.find("wide").is_some());
//! ```

use std::collections::HashSet;
use std::path::Path;

use once_cell::sync::Lazy;

use crate::breakpoint::BreakPoint;
use crate::error::{MediaError, Result};

static DEFAULT_BREAKPOINTS: Lazy<Vec<BreakPoint>> = Lazy::new(|| {
    vec![
        BreakPoint::exact("xs", "(min-width: 0px) and (max-width: 599px)"),
        BreakPoint::overlapping("gt-xs", "(min-width: 600px)"),
        BreakPoint::overlapping("lt-sm", "(max-width: 599px)"),
        BreakPoint::exact("sm", "(min-width: 600px) and (max-width: 959px)"),
        BreakPoint::overlapping("gt-sm", "(min-width: 960px)"),
        BreakPoint::overlapping("lt-md", "(max-width: 959px)"),
        BreakPoint::exact("md", "(min-width: 960px) and (max-width: 1279px)"),
        BreakPoint::overlapping("gt-md", "(min-width: 1280px)"),
        BreakPoint::overlapping("lt-lg", "(max-width: 1279px)"),
        BreakPoint::exact("lg", "(min-width: 1280px) and (max-width: 1919px)"),
        BreakPoint::overlapping("gt-lg", "(min-width: 1920px)"),
        BreakPoint::overlapping("lt-xl", "(max-width: 1919px)"),
        BreakPoint::exact("xl", "(min-width: 1920px) and (max-width: 5000px)"),
    ]
});

/// Ordered collection of breakpoints, keyed by alias.
#[derive(Clone, Debug, PartialEq)]
pub struct BreakPointRegistry {
    items: Vec<BreakPoint>,
}

impl BreakPointRegistry {
    /// Builds a registry, rejecting duplicate aliases and queries without a
    /// width feature.
    pub fn new(items: Vec<BreakPoint>) -> Result<Self> {
        let mut seen = HashSet::new();
        for bp in &items {
            if !seen.insert(bp.alias.as_str()) {
                return Err(MediaError::DuplicateAlias(bp.alias.clone()));
            }
            if !bp.has_width_range() {
                return Err(MediaError::InvalidMediaQuery {
                    alias: bp.alias.clone(),
                    query: bp.media_query.clone(),
                });
            }
        }
        Ok(Self { items })
    }

    /// Parses a YAML list of breakpoints.
    ///
    /// # Errors
    ///
    /// Returns [`MediaError::Parse`] for malformed YAML, or any validation
    /// error from [`new`](Self::new).
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let items: Vec<BreakPoint> =
            serde_yaml::from_str(yaml).map_err(|e| MediaError::Parse {
                path: None,
                message: e.to_string(),
            })?;
        Self::new(items)
    }

    /// Loads a YAML list of breakpoints from a file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| MediaError::Load {
            message: format!("Failed to read {}: {}", path.display(), e),
        })?;
        Self::from_yaml(&content).map_err(|err| match err {
            MediaError::Parse { message, .. } => MediaError::Parse {
                path: Some(path.to_path_buf()),
                message,
            },
            other => other,
        })
    }

    /// All breakpoints in registration order.
    pub fn items(&self) -> &[BreakPoint] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Looks up a breakpoint by alias.
    pub fn find(&self, alias: &str) -> Option<&BreakPoint> {
        self.items.iter().find(|bp| bp.alias == alias)
    }

    /// Returns `true` if `alias` is registered.
    pub fn contains(&self, alias: &str) -> bool {
        self.find(alias).is_some()
    }

    /// Overlapping breakpoints in registration order.
    pub fn overlappings(&self) -> impl Iterator<Item = &BreakPoint> {
        self.items.iter().filter(|bp| bp.overlapping)
    }

    /// Overlapping breakpoints whose range fully contains `alias`'s range.
    ///
    /// For the default table, `overlaps_of("xl")` yields `gt-xs`, `gt-sm`,
    /// `gt-md` and `gt-lg`.
    pub fn overlaps_of(&self, alias: &str) -> Result<Vec<&BreakPoint>> {
        let target = self
            .find(alias)
            .ok_or_else(|| MediaError::UnknownAlias(alias.to_string()))?;
        let range = target.range();
        Ok(self
            .overlappings()
            .filter(|bp| bp.alias != target.alias && bp.range().contains(&range))
            .collect())
    }

    /// Breakpoints whose range contains a viewport of `width` pixels.
    pub fn matching_width(&self, width: f64) -> Vec<&BreakPoint> {
        self.items
            .iter()
            .filter(|bp| bp.range().contains_width(width))
            .collect()
    }

    /// Returns the most specific registered breakpoint among `aliases`.
    ///
    /// Unregistered aliases are ignored. Ties are broken by registration order.
    pub fn most_specific<'a, I>(&self, aliases: I) -> Option<&BreakPoint>
    where
        I: IntoIterator<Item = &'a str>,
    {
        self.by_specificity(aliases).into_iter().next()
    }

    /// Registered breakpoints among `aliases`, most specific first.
    pub fn by_specificity<'a, I>(&self, aliases: I) -> Vec<&BreakPoint>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let wanted: HashSet<&str> = aliases.into_iter().collect();
        let mut found: Vec<&BreakPoint> = self
            .items
            .iter()
            .filter(|bp| wanted.contains(bp.alias.as_str()))
            .collect();
        found.sort_by(|a, b| a.cmp_specificity(b));
        found
    }
}

impl Default for BreakPointRegistry {
    fn default() -> Self {
        Self {
            items: DEFAULT_BREAKPOINTS.clone(),
        }
    }
}
