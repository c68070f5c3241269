//! In-process fixture for flexout.
//!
//! Renders a small markup template into a [`flexout::Document`], binds every
//! element, and lets tests drive breakpoints and assert on the resulting
//! inline styles:
//!
//! ```rust
//! use flexout_test::Fixture;
//!
//! let fixture = Fixture::new(r#"
//!     <div layout="column" class="test">
//!       <div flex="30px"></div>
//!     </div>
//! "#).unwrap();
//!
//! let parent = fixture.query_one(".test");
//! let child = fixture.query_one("[flex]");
//! fixture.assert_has_styles(parent, &[("flex-direction", "column"), ("display", "flex")]);
//! fixture.assert_has_styles(child, &[("min-height", "30px")]);
//! fixture.assert_lacks_styles(child, &[("min-width", "*")]);
//! ```

mod error;
mod fixture;
mod template;

pub use error::FixtureError;
pub use fixture::{has_style, Fixture};
pub use template::parse_template;
