//! Hot-swappable router handle
//!
//! A [`Mux`] is never mutated while serving. To change routes at runtime,
//! build a new one and publish it with [`SharedMux::replace`]; in-flight
//! requests finish on the tree they started with.

use crate::{Mux, Request, Response};
use arc_swap::ArcSwap;
use std::sync::Arc;

/// Atomically replaceable [`Mux`]
pub struct SharedMux {
    current: ArcSwap<Mux>,
}

impl SharedMux {
    pub fn new(mux: Mux) -> Self {
        Self {
            current: ArcSwap::from_pointee(mux),
        }
    }

    /// Current router (lock-free read)
    pub fn load(&self) -> Arc<Mux> {
        self.current.load_full()
    }

    /// Publish a new router, returning the previous one
    pub fn replace(&self, mux: Mux) -> Arc<Mux> {
        let routes = mux.len();
        let previous = self.current.swap(Arc::new(mux));
        tracing::debug!(routes, previous = previous.len(), "router replaced");
        previous
    }

    /// Serve with whichever router is current
    pub fn serve(&self, req: Request) -> Response {
        self.current.load().serve(req)
    }
}

impl From<Mux> for SharedMux {
    fn from(mux: Mux) -> Self {
        Self::new(mux)
    }
}

impl Default for SharedMux {
    fn default() -> Self {
        Self::new(Mux::new())
    }
}
