use flexout::ConfigError;
use flexout_media::MediaError;
use thiserror::Error;

/// Errors raised while building or driving a [`Fixture`](crate::Fixture).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FixtureError {
    /// The markup template is malformed.
    #[error("invalid template: {0}")]
    Template(String),

    #[error(transparent)]
    Media(#[from] MediaError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}
