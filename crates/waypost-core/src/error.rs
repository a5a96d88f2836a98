use thiserror::Error;

/// Top-level error type for Waypost.
///
/// Storage and startup failures are reported through this type. Request-level
/// failures (bad input, missing credentials) live in the API crate and are
/// converted to HTTP responses there.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum WaypostError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Tag already exists: {0}")]
    DuplicateTag(String),

    #[error("No entry for tag: {0}")]
    NotFound(String),

    #[error("Relay error: {0}")]
    Relay(String),

    #[error("Listener error: {0}")]
    Listener(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<toml::de::Error> for WaypostError {
    fn from(err: toml::de::Error) -> Self {
        WaypostError::Config(err.to_string())
    }
}

/// A specialized `Result` type for Waypost operations.
pub type Result<T> = std::result::Result<T, WaypostError>;
