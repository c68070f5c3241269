//! Flexout - responsive flex sizing for element trees.
//!
//! Elements declare how they size inside a flex container with compact
//! attributes, optionally varying per breakpoint:
//!
//! ```text
//! <div layout="row" layout.lt-md="column">
//!   <div flex="1 0 200px"></div>
//!   <div flex="30" flex.gt-sm="25"></div>
//! </div>
//! ```
//!
//! The engine translates these into box-layout declarations (`flex`,
//! `box-sizing`, and `min-*`/`max-*` clamps along the parent's main axis)
//! and re-applies them whenever the active breakpoints change.
//!
//! # Pieces
//!
//! | Module | Role |
//! |--------|------|
//! | [`shorthand`] | `flex` shorthand → grow/shrink/basis ([`FlexValue`]) |
//! | [`direction`] | immediate parent's [`LayoutDirection`] |
//! | [`style`] | value + direction → [`StyleSet`] |
//! | [`responsive`] | base value and per-alias overrides |
//! | [`binding`] | per-element state, owned properties |
//! | [`FlexLayout`] | host ownership and media subscriptions |
//!
//! Breakpoints and the activation feed live in the `flexout-media` crate.
//!
//! # Quick Start
//!
//! ```rust
//! use flexout::{build_styles, parse, LayoutDirection};
//!
//! let value = parse("37%").unwrap();
//!
//! let row = build_styles(&value, LayoutDirection::Row);
//! assert_eq!(row.to_string(), "box-sizing: border-box; flex: 1 1 100%; max-width: 37%;");
//!
//! let column = build_styles(&value, LayoutDirection::Column);
//! assert_eq!(column.get("min-height"), Some("37%"));
//! ```
//!
//! # Hosts
//!
//! The engine works against the [`LayoutTree`] and [`StyleSink`] traits.
//! [`Document`] is a ready-made in-memory host.
//!
//! # Logging
//!
//! Uses `tracing`: `debug` for state changes and injected directions,
//! `trace` for every applied style set, `warn` for skipped malformed values.
//! No subscriber is installed.

pub mod binding;
mod config;
pub mod direction;
mod dom;
mod engine;
mod error;
mod host;
pub mod responsive;
pub mod shorthand;
pub mod style;

pub use binding::{FlexBinding, LayoutBinding, Refresh};
pub use config::{AttributeNames, LayoutConfig};
pub use direction::{DirectionCache, DirectionResolver, DirectionSource, LayoutDirection, Resolution};
pub use dom::Document;
pub use engine::FlexLayout;
pub use error::{ConfigError, ParseError};
pub use host::{AttributeSink, Host, LayoutTree, NodeId, StyleSink};
pub use responsive::{ActiveState, Responsive};
pub use shorthand::{normalize_calc, parse, BasisKind, FlexValue};
pub use style::{build_layout_styles, build_styles, StyleSet};
