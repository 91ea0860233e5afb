//! alien-core: HTTP method dispatch, middleware and serving around the
//! alien-router trie
//!
//! ## Features
//! - `native` (default) - hyper/tokio server in [`server`]
//!
//! ## Example
//! ```
//! use alien_core::{get_params, Method, Mux, Request, Response};
//!
//! let mut mux = Mux::new();
//! mux.get("/hello/:name", |req: &Request, res: &mut Response| {
//!     res.write(get_params(req).to_string());
//! })
//! .unwrap();
//!
//! let res = mux.serve(Request::new(Method::Get, "/hello/world"));
//! assert_eq!(res.body_string().as_deref(), Some("name:world"));
//! ```

#![forbid(unsafe_code)]
#![warn(clippy::all)]

pub mod error;
pub mod group;
pub mod handler;
pub mod method;
pub mod middleware;
pub mod mux;
pub mod request;
pub mod response;
pub mod shared;

#[cfg(feature = "native")]
pub mod server;

// Re-exports
pub use error::{Error, Result};
pub use group::Group;
pub use handler::{BoxedHandler, Handler};
pub use method::Method;
pub use middleware::{Logger, LoggerConfig, Middleware, MiddlewareChain};
pub use mux::{Endpoint, Mux};
pub use request::{get_params, Request, RequestBuilder};
pub use response::Response;
pub use shared::SharedMux;

pub use alien_router::{extract_params, Params};
pub use http::StatusCode;

#[cfg(feature = "native")]
pub use server::{ConnectionTracker, ServerConfig};
