//! Breakpoint definitions and the width ranges derived from their media queries.

use std::cmp::Ordering;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static MIN_WIDTH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"min-width:\s*(\d+(?:\.\d+)?)px").unwrap());
static MAX_WIDTH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"max-width:\s*(\d+(?:\.\d+)?)px").unwrap());

/// A named responsive condition.
///
/// Exact breakpoints (`sm`, `md`) describe a closed viewport range and are
/// mutually exclusive. Overlapping breakpoints (`gt-sm`, `lt-md`) describe an
/// open range and can be active together with an exact one.
///
/// ```rust
/// use flexout_media::BreakPoint;
///
/// let bp = BreakPoint::overlapping("gt-sm", "(min-width: 960px)");
/// assert!(bp.range().contains_width(1200.0));
/// assert!(!bp.range().contains_width(800.0));
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BreakPoint {
    /// Alias used as the attribute suffix (`flex.gt-sm`).
    pub alias: String,
    /// The media query text, e.g. `(min-width: 600px) and (max-width: 959px)`.
    pub media_query: String,
    /// Whether the breakpoint may be active alongside others.
    #[serde(default)]
    pub overlapping: bool,
}

impl BreakPoint {
    /// Creates an exact (non-overlapping) breakpoint.
    pub fn exact(alias: impl Into<String>, media_query: impl Into<String>) -> Self {
        Self {
            alias: alias.into(),
            media_query: media_query.into(),
            overlapping: false,
        }
    }

    /// Creates an overlapping range breakpoint.
    pub fn overlapping(alias: impl Into<String>, media_query: impl Into<String>) -> Self {
        Self {
            alias: alias.into(),
            media_query: media_query.into(),
            overlapping: true,
        }
    }

    /// The viewport range described by the media query.
    pub fn range(&self) -> MediaRange {
        MediaRange::parse(&self.media_query).unwrap_or_default()
    }

    /// Returns `true` if the media query names at least one width feature.
    pub fn has_width_range(&self) -> bool {
        MediaRange::parse(&self.media_query).is_some()
    }

    /// Orders two breakpoints so the more specific one comes first.
    ///
    /// Narrower ranges are more specific. On equal span an exact breakpoint
    /// beats an overlapping one, then the larger lower bound wins. Equal
    /// keys compare as `Equal` so callers can fall back to registry order.
    pub fn cmp_specificity(&self, other: &BreakPoint) -> Ordering {
        let (a, b) = (self.range(), other.range());
        a.span()
            .total_cmp(&b.span())
            .then_with(|| self.overlapping.cmp(&other.overlapping))
            .then_with(|| b.min.total_cmp(&a.min))
    }
}

/// Inclusive width interval of a breakpoint, in CSS pixels.
///
/// `max == None` means the range is unbounded above.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MediaRange {
    pub min: f64,
    pub max: Option<f64>,
}

impl MediaRange {
    /// Extracts `min-width` / `max-width` pixel features from a media query.
    ///
    /// Returns `None` when neither feature is present.
    pub fn parse(query: &str) -> Option<Self> {
        let feature = |re: &Regex| {
            re.captures(query)
                .and_then(|c| c.get(1))
                .and_then(|m| m.as_str().parse::<f64>().ok())
        };
        let min = feature(&MIN_WIDTH);
        let max = feature(&MAX_WIDTH);
        if min.is_none() && max.is_none() {
            return None;
        }
        Some(Self {
            min: min.unwrap_or(0.0),
            max,
        })
    }

    /// Returns `true` if a viewport of `width` pixels falls in this range.
    pub fn contains_width(&self, width: f64) -> bool {
        width >= self.min && self.max.map_or(true, |max| width <= max)
    }

    /// Returns `true` if `other` lies entirely inside this range.
    pub fn contains(&self, other: &MediaRange) -> bool {
        if other.min < self.min {
            return false;
        }
        match (self.max, other.max) {
            (None, _) => true,
            (Some(_), None) => false,
            (Some(outer), Some(inner)) => inner <= outer,
        }
    }

    /// Width of the range; unbounded ranges are infinitely wide.
    pub fn span(&self) -> f64 {
        self.max.map_or(f64::INFINITY, |max| max - self.min)
    }
}
