//! Error types for the flexout crate.

use std::path::PathBuf;

use flexout_media::MediaError;
use thiserror::Error;

/// Errors produced while parsing attribute values.
///
/// These never abort a binding: the binding layer logs them and leaves the
/// element's previously applied styles alone.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Grow or shrink is not a finite, non-negative number.
    #[error("invalid flex-{factor} '{value}': expected a non-negative number")]
    InvalidFactor { factor: &'static str, value: String },

    /// The basis is neither a length, a percentage, a number nor a keyword.
    #[error("invalid flex basis '{0}'")]
    InvalidBasis(String),

    /// More than three whitespace-separated tokens.
    #[error("flex shorthand '{0}' has more than three parts")]
    TooManyTokens(String),

    /// A `calc()` expression with unbalanced parentheses.
    #[error("malformed calc expression '{0}'")]
    InvalidCalc(String),

    /// Not one of `row`, `column`, `row-reverse`, `column-reverse`.
    #[error("invalid layout direction '{0}'")]
    InvalidDirection(String),
}

/// Errors raised while loading a [`LayoutConfig`](crate::LayoutConfig).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// YAML parse error.
    #[error("failed to parse layout config{}: {message}", location(.path))]
    Parse {
        path: Option<PathBuf>,
        message: String,
    },

    /// File loading error.
    #[error("failed to load layout config: {message}")]
    Load { message: String },

    /// The configured breakpoints do not form a valid registry.
    #[error("invalid breakpoints: {0}")]
    Breakpoints(#[from] MediaError),
}

fn location(path: &Option<PathBuf>) -> String {
    path.as_ref()
        .map(|p| format!(" {}", p.display()))
        .unwrap_or_default()
}
