//! Per-method router
//!
//! One [`Tree`] per HTTP method, indexed by [`Method`] for O(1) method
//! dispatch, then matched segment by segment.

use crate::group::Group;
use crate::handler::{BoxedHandler, Handler};
use crate::middleware::{Middleware, MiddlewareChain};
use crate::{Error, Method, Request, Response, Result};
use alien_router::{Match, Tree};
use std::sync::Arc;

/// Terminal payload stored in each method's trie
#[derive(Clone)]
pub struct Endpoint {
    pub method: Method,
    pub handler: BoxedHandler,
}

impl std::fmt::Debug for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Endpoint")
            .field("method", &self.method)
            .finish_non_exhaustive()
    }
}

/// Generates the per-verb registration shorthands
macro_rules! verb_methods {
    ($($name:ident => $method:ident),* $(,)?) => {
        $(
            #[doc = concat!("Add a ", stringify!($method), " route")]
            pub fn $name<H: Handler + 'static>(&mut self, path: &str, handler: H) -> Result<()> {
                self.route(Method::$method, path, handler)
            }
        )*
    };
}
pub(crate) use verb_methods;

/// HTTP request multiplexer
///
/// Register routes and middleware first, then serve. `serve` takes `&self`
/// and never mutates, so a built `Mux` can be shared across threads.
pub struct Mux {
    trees: [Tree<Endpoint>; 9],
    middleware: MiddlewareChain,
}

impl Mux {
    /// Create a new router
    pub fn new() -> Self {
        Self {
            trees: std::array::from_fn(|_| Tree::new()),
            middleware: MiddlewareChain::new(),
        }
    }

    /// Add a route by method name (case-insensitive)
    ///
    /// # Example
    /// ```
    /// use alien_core::{Mux, Request, Response};
    ///
    /// let mut mux = Mux::new();
    /// mux.add_route("GET", "/users/:id", |req: &Request, res: &mut Response| {
    ///     res.write(req.param("id").unwrap_or_default());
    /// })
    /// .unwrap();
    /// assert!(mux.add_route("CRAP", "/users", |_: &Request, _: &mut Response| {}).is_err());
    /// ```
    pub fn add_route<H: Handler + 'static>(
        &mut self,
        method: &str,
        path: &str,
        handler: H,
    ) -> Result<()> {
        let method = method.parse::<Method>().inspect_err(|e| {
            tracing::warn!(path, error = %e, "route rejected");
        })?;
        self.route(method, path, handler)
    }

    /// Add a route
    pub fn route<H: Handler + 'static>(
        &mut self,
        method: Method,
        path: &str,
        handler: H,
    ) -> Result<()> {
        let endpoint = Endpoint {
            method,
            handler: Arc::new(handler),
        };
        match self.trees[method.index()].insert(path, endpoint) {
            Ok(()) => {
                tracing::debug!(%method, path, "route registered");
                Ok(())
            }
            Err(e) => {
                tracing::warn!(%method, path, error = %e, "route rejected");
                Err(e.into())
            }
        }
    }

    verb_methods! {
        get => Get,
        post => Post,
        put => Put,
        patch => Patch,
        delete => Delete,
        head => Head,
        options => Options,
        connect => Connect,
        trace => Trace,
    }

    /// Scope registrations under a path prefix
    pub fn group(&mut self, prefix: &str) -> Group<'_> {
        Group::new(self, prefix)
    }

    /// Append a middleware; it wraps every route, including ones already
    /// registered
    pub fn use_middleware<M: Middleware + 'static>(&mut self, middleware: M) {
        self.middleware.add(middleware);
    }

    /// Resolve a method and path
    pub fn lookup(&self, method: Method, path: &str) -> Result<Match<'_, Endpoint>> {
        let matched = self.trees[method.index()].find(path);
        tracing::trace!(%method, path, found = matched.is_ok(), "lookup");
        matched.map_err(Error::from)
    }

    /// The trie holding `method`'s routes
    pub fn tree(&self, method: Method) -> &Tree<Endpoint> {
        &self.trees[method.index()]
    }

    /// Total number of registered routes
    pub fn len(&self) -> usize {
        self.trees.iter().map(Tree::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Route a request and run its handler inside the middleware chain
    ///
    /// Unmatched requests get a 404 and run neither middleware nor handler.
    /// A path registered only under another method is also a 404.
    pub fn serve(&self, mut req: Request) -> Response {
        let Match { route, params } = match self.lookup(req.method, &req.path) {
            Ok(m) => m,
            Err(_) => {
                tracing::debug!(method = %req.method, path = %req.path, "no route");
                return Response::not_found();
            }
        };

        req.params = params;
        let handler = self.middleware.then(route.value().handler.clone());
        let mut res = Response::ok();
        handler.handle(&req, &mut res);
        res
    }
}

impl Default for Mux {
    fn default() -> Self {
        Self::new()
    }
}
