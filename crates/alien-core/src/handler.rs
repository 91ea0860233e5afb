//! Handler capability

use crate::{Request, Response};
use std::sync::Arc;

/// Anything that can answer a routed request
///
/// Writes into `res`; the router has already stored the captured path
/// parameters on `req`.
pub trait Handler: Send + Sync {
    fn handle(&self, req: &Request, res: &mut Response);
}

impl<F> Handler for F
where
    F: Fn(&Request, &mut Response) + Send + Sync,
{
    #[inline]
    fn handle(&self, req: &Request, res: &mut Response) {
        self(req, res)
    }
}

/// Shared, type-erased handler
pub type BoxedHandler = Arc<dyn Handler>;
