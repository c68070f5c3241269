//! Media sources that publish activations into a [`MediaMonitor`].
//!
//! Two sources are provided:
//!
//! - [`MockMatchMedia`]: activate an alias by name, optionally with the
//!   overlapping ranges that contain it. Used by tests and demos.
//! - [`ViewportMedia`]: derive the active set from a viewport width, the way
//!   a browser evaluates media queries on resize.

use std::rc::Rc;

use crate::activation::Activation;
use crate::error::{MediaError, Result};
use crate::monitor::MediaMonitor;
use crate::registry::BreakPointRegistry;

/// Scriptable media source.
///
/// ```rust
/// use flexout_media::{MediaMonitor, MockMatchMedia};
///
/// let monitor = MediaMonitor::new();
/// let mut media = MockMatchMedia::new(monitor.clone());
///
/// media.activate("xl", Some(true)).unwrap();
/// let current = monitor.current();
/// assert!(current.is_active("gt-sm"));
/// assert!(current.is_active("gt-lg"));
/// ```
#[derive(Debug, Clone)]
pub struct MockMatchMedia {
    registry: Rc<BreakPointRegistry>,
    monitor: MediaMonitor,
    use_overlaps: bool,
}

impl MockMatchMedia {
    /// Creates a source over the default breakpoint table.
    pub fn new(monitor: MediaMonitor) -> Self {
        Self::with_registry(Rc::new(BreakPointRegistry::default()), monitor)
    }

    pub fn with_registry(registry: Rc<BreakPointRegistry>, monitor: MediaMonitor) -> Self {
        Self {
            registry,
            monitor,
            use_overlaps: false,
        }
    }

    /// Sets the overlap mode used when [`activate`](Self::activate) is
    /// called without an explicit flag.
    pub fn set_use_overlaps(&mut self, use_overlaps: bool) {
        self.use_overlaps = use_overlaps;
    }

    pub fn use_overlaps(&self) -> bool {
        self.use_overlaps
    }

    pub fn registry(&self) -> &Rc<BreakPointRegistry> {
        &self.registry
    }

    pub fn monitor(&self) -> &MediaMonitor {
        &self.monitor
    }

    /// Makes `alias` the active breakpoint and publishes the change.
    ///
    /// With overlaps (explicit `Some(true)`, or `None` while
    /// [`use_overlaps`](Self::use_overlaps) is set) every overlapping range
    /// containing `alias` becomes active too.
    ///
    /// # Errors
    ///
    /// Returns [`MediaError::UnknownAlias`] if `alias` is not registered.
    pub fn activate(&mut self, alias: &str, overlaps: Option<bool>) -> Result<()> {
        let overlaps = overlaps.unwrap_or(self.use_overlaps);
        let activation = if overlaps {
            let extra: Vec<String> = self
                .registry
                .overlaps_of(alias)?
                .into_iter()
                .map(|bp| bp.alias.clone())
                .collect();
            Activation::overlapping(alias, extra)
        } else if self.registry.contains(alias) {
            Activation::single(alias)
        } else {
            return Err(MediaError::UnknownAlias(alias.to_string()));
        };
        self.monitor.publish(activation);
        Ok(())
    }

    /// Deactivates every breakpoint.
    pub fn clear_all(&mut self) {
        self.monitor.publish(Activation::none());
    }
}

/// Media source driven by a viewport width.
///
/// The active set is every breakpoint matching the width; the exact
/// breakpoint (if any) is the trigger. Activations are published only when
/// the active set changes.
///
/// ```rust
/// use flexout_media::{MediaMonitor, ViewportMedia};
///
/// let monitor = MediaMonitor::new();
/// let mut viewport = ViewportMedia::new(monitor.clone());
///
/// assert!(viewport.resize(1000.0));
/// assert_eq!(monitor.current().alias(), Some("md"));
/// assert!(!viewport.resize(1100.0)); // still md
/// ```
#[derive(Debug, Clone)]
pub struct ViewportMedia {
    registry: Rc<BreakPointRegistry>,
    monitor: MediaMonitor,
    width: Option<f64>,
}

impl ViewportMedia {
    pub fn new(monitor: MediaMonitor) -> Self {
        Self::with_registry(Rc::new(BreakPointRegistry::default()), monitor)
    }

    pub fn with_registry(registry: Rc<BreakPointRegistry>, monitor: MediaMonitor) -> Self {
        Self {
            registry,
            monitor,
            width: None,
        }
    }

    /// The last width passed to [`resize`](Self::resize).
    pub fn width(&self) -> Option<f64> {
        self.width
    }

    /// Evaluates the registry against `width`; publishes and returns `true`
    /// if the active set changed.
    pub fn resize(&mut self, width: f64) -> bool {
        self.width = Some(width);
        let next = self.activation_for(width);
        if next == self.monitor.current() {
            return false;
        }
        self.monitor.publish(next);
        true
    }

    fn activation_for(&self, width: f64) -> Activation {
        let matching = self.registry.matching_width(width);
        let trigger = matching
            .iter()
            .find(|bp| !bp.overlapping)
            .or_else(|| matching.first())
            .map(|bp| bp.alias.clone());
        match trigger {
            Some(alias) => {
                Activation::overlapping(alias, matching.iter().map(|bp| bp.alias.clone()))
            }
            None => Activation::none(),
        }
    }
}
