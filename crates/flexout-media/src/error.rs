//! Error types for the media crate.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while building a breakpoint registry or driving a media source.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MediaError {
    /// YAML breakpoint list could not be parsed.
    #[error("failed to parse breakpoints{}: {message}", location(.path))]
    Parse {
        /// Optional source file path.
        path: Option<PathBuf>,
        /// Error message from the YAML parser.
        message: String,
    },

    /// Breakpoint file could not be read.
    #[error("failed to load breakpoints: {message}")]
    Load { message: String },

    /// Two breakpoints share the same alias.
    #[error("duplicate breakpoint alias '{0}'")]
    DuplicateAlias(String),

    /// The media query carries no `min-width`/`max-width` feature.
    #[error("breakpoint '{alias}' has no width range in media query '{query}'")]
    InvalidMediaQuery { alias: String, query: String },

    /// The alias is not registered.
    #[error("unknown breakpoint alias '{0}'")]
    UnknownAlias(String),
}

fn location(path: &Option<PathBuf>) -> String {
    path.as_ref()
        .map(|p| format!(" {}", p.display()))
        .unwrap_or_default()
}

/// Result type for media operations.
pub type Result<T> = std::result::Result<T, MediaError>;
