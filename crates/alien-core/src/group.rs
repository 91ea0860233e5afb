//! Route groups: registration under a shared path prefix

use crate::handler::Handler;
use crate::mux::verb_methods;
use crate::{Method, Mux, Result};

/// Registers routes on the owning [`Mux`] with `prefix` prepended
///
/// Holds no routes of its own. The prefix is joined by plain
/// concatenation, so `group("/api").get("/", ..)` registers `/api/`.
pub struct Group<'a> {
    prefix: String,
    mux: &'a mut Mux,
}

impl<'a> Group<'a> {
    pub(crate) fn new(mux: &'a mut Mux, prefix: &str) -> Self {
        Self {
            prefix: prefix.to_string(),
            mux,
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    fn join(&self, path: &str) -> String {
        format!("{}{}", self.prefix, path)
    }

    /// Add a route by method name under the prefix
    pub fn add_route<H: Handler + 'static>(
        &mut self,
        method: &str,
        path: &str,
        handler: H,
    ) -> Result<()> {
        let full = self.join(path);
        self.mux.add_route(method, &full, handler)
    }

    /// Add a route under the prefix
    pub fn route<H: Handler + 'static>(
        &mut self,
        method: Method,
        path: &str,
        handler: H,
    ) -> Result<()> {
        let full = self.join(path);
        self.mux.route(method, &full, handler)
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

    /// Nested group; prefixes accumulate
    pub fn group(&mut self, prefix: &str) -> Group<'_> {
        let prefix = self.join(prefix);
        Group {
            prefix,
            mux: &mut *self.mux,
        }
    }
}
