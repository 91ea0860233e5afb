//! alien-router: segment trie for HTTP path matching
//!
//! Method-agnostic core used by alien-core. One [`Tree`] holds the patterns
//! for one HTTP method; the payload type `T` is whatever the caller routes to.
//!
//! ## Path Syntax
//! - `/users` - static segment, matched exactly
//! - `:name` - named parameter (captures one non-empty segment)
//! - `*name` or `*` - catch-all (captures the non-empty remainder, must be
//!   last; a bare `*` is named `catch`)
//! - a trailing slash is significant: `/users/` and `/users` are different
//!
//! ## Priority
//! 1. Exact static match (highest)
//! 2. Parameter match
//! 3. Catch-all match (lowest)
//!
//! Lookup never backtracks: once a child wins at a node, a dead end below it
//! is a miss.
//!
//! ## Example
//! ```
//! use alien_router::Tree;
//!
//! let mut tree = Tree::new();
//! tree.insert("/users", 0).unwrap();
//! tree.insert("/users/:id", 1).unwrap();
//! tree.insert("/files/*path", 2).unwrap();
//!
//! let m = tree.find("/users/123").unwrap();
//! assert_eq!(*m.value(), 1);
//! assert_eq!(m.params.to_string(), "id:123");
//!
//! let m = tree.find("/files/docs/readme.md").unwrap();
//! assert_eq!(m.params.get("path"), Some("docs/readme.md"));
//! ```

#![forbid(unsafe_code)]
#![warn(clippy::all)]

mod error;
mod extract;
mod params;
mod segment;
mod tree;

pub use error::{Error, Result};
pub use extract::extract_params;
pub use params::Params;
pub use segment::{parse_pattern, Segment, DEFAULT_CATCH_ALL};
pub use tree::{Match, NodeKind, Route, Tree};
