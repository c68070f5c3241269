//! Flexout Media - responsive breakpoints and the activation feed.
//!
//! This crate models the "which breakpoints are active right now" half of
//! responsive layout:
//!
//! - [`BreakPoint`] / [`BreakPointRegistry`]: named viewport ranges, with a
//!   default table (`xs` … `xl`, `gt-*`, `lt-*`) and YAML loading
//! - [`Activation`]: snapshot of the active aliases after a media change
//! - [`MediaMonitor`]: synchronous observer hub; subscribers receive every
//!   activation before `publish` returns
//! - [`MockMatchMedia`] / [`ViewportMedia`]: sources that publish activations
//!
//! # Quick Start
//!
//! ```rust
//! use flexout_media::{BreakPointRegistry, MediaMonitor, MockMatchMedia};
//!
//! let monitor = MediaMonitor::new();
//! let mut media = MockMatchMedia::new(monitor.clone());
//! let registry = BreakPointRegistry::default();
//!
//! media.activate("xl", Some(true)).unwrap();
//!
//! // `xl` with overlaps also activates gt-xs, gt-sm, gt-md and gt-lg;
//! // of the two an element might care about, gt-sm is more specific.
//! let current = monitor.current();
//! let winner = registry
//!     .most_specific(current.active().filter(|a| *a == "gt-xs" || *a == "gt-sm"))
//!     .unwrap();
//! assert_eq!(winner.alias, "gt-sm");
//! ```
//!
//! # Specificity
//!
//! When several aliases are active at once (overlap mode), the narrowest
//! range wins; exact breakpoints beat overlapping ranges of equal width, and
//! among unbounded ranges the higher lower bound wins. See
//! [`BreakPoint::cmp_specificity`].

mod activation;
mod breakpoint;
mod error;
mod monitor;
mod registry;
mod source;

pub use activation::Activation;
pub use breakpoint::{BreakPoint, MediaRange};
pub use error::{MediaError, Result};
pub use monitor::{MediaMonitor, Subscription};
pub use registry::BreakPointRegistry;
pub use source::{MockMatchMedia, ViewportMedia};
