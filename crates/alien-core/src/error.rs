//! Error types for alien-core

use thiserror::Error;

/// Result type alias for alien operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the alien HTTP router
#[derive(Debug, Error)]
pub enum Error {
    /// Method outside the supported set
    #[error("Unknown HTTP method: {0}")]
    UnknownMethod(String),

    /// Pattern rejected by the trie, or no route matched
    #[error(transparent)]
    Route(#[from] alien_router::Error),

    /// Invalid server configuration value
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// IO error (native only)
    #[cfg(feature = "native")]
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Hyper error (native only)
    #[cfg(feature = "native")]
    #[error("HTTP error: {0}")]
    Hyper(String),
}

impl Error {
    /// True for the request-time "no route" outcome
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::Route(alien_router::Error::NotFound(_)))
    }
}
