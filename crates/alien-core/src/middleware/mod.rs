//! Middleware: handler wrappers
//!
//! A middleware takes the next handler and returns a handler. The chain is
//! applied per request around the resolved route handler, first registered
//! outermost.

pub mod logger;

pub use logger::{Logger, LoggerConfig};

use crate::handler::BoxedHandler;
use std::sync::Arc;

/// Middleware trait - wrap a handler, producing a handler
pub trait Middleware: Send + Sync {
    fn wrap(&self, next: BoxedHandler) -> BoxedHandler;
}

impl<F> Middleware for F
where
    F: Fn(BoxedHandler) -> BoxedHandler + Send + Sync,
{
    fn wrap(&self, next: BoxedHandler) -> BoxedHandler {
        self(next)
    }
}

/// Middleware chain
#[derive(Clone, Default)]
pub struct MiddlewareChain {
    middlewares: Vec<Arc<dyn Middleware>>,
}

impl MiddlewareChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add<M: Middleware + 'static>(&mut self, middleware: M) {
        self.middlewares.push(Arc::new(middleware));
    }

    /// Wrap `handler` in every middleware, first added outermost
    pub fn then(&self, handler: BoxedHandler) -> BoxedHandler {
        self.middlewares
            .iter()
            .rev()
            .fold(handler, |next, m| m.wrap(next))
    }

    pub fn len(&self) -> usize {
        self.middlewares.len()
    }

    pub fn is_empty(&self) -> bool {
        self.middlewares.is_empty()
    }
}
