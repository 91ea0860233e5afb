//! Error types for alien-router

use thiserror::Error;

/// Result type alias for trie operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while registering patterns or matching paths
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Pattern contains an empty segment before its last position (`//`)
    #[error("Empty path segment in pattern: {0}")]
    EmptyPathSegment(String),

    /// Bare `:` or a name containing `:`/`*`
    #[error("Malformed parameter `{segment}` in pattern: {pattern}")]
    MalformedParam { pattern: String, segment: String },

    /// Catch-all followed by more segments
    #[error("Catch-all must be the last segment: {0}")]
    CatchAllNotTerminal(String),

    /// Identical pattern already registered on this tree
    #[error("Duplicate route: {0}")]
    DuplicateRoute(String),

    /// Pattern does not begin with `/`
    #[error("Pattern must start with '/': {0}")]
    MissingLeadingSlash(String),

    /// No registered pattern matches the path
    #[error("Route not found: {0}")]
    NotFound(String),

    /// Path does not match the pattern given to the extractor
    #[error("Path {path} does not match pattern {pattern}")]
    Mismatch { path: String, pattern: String },
}
