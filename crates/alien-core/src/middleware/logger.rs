//! Request logging middleware
//!
//! Tags each request with an ID and emits one `tracing` event per request.

use super::Middleware;
use crate::handler::{BoxedHandler, Handler};
use crate::{Request, Response};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Logger configuration
#[derive(Clone)]
pub struct LoggerConfig {
    /// Header carrying the request ID, echoed on the response
    pub header_name: String,
    /// Generate an ID when the request has none
    pub generate_id: bool,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            header_name: "X-Request-ID".to_string(),
            generate_id: true,
        }
    }
}

impl LoggerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn header_name(mut self, name: impl Into<String>) -> Self {
        self.header_name = name.into();
        self
    }

    pub fn generate_id(mut self, generate: bool) -> Self {
        self.generate_id = generate;
        self
    }
}

static COUNTER: AtomicU64 = AtomicU64::new(0);

/// Process-unique, monotonically increasing request ID
pub fn generate_counter_id() -> String {
    let count = COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("{:016x}", count)
}

/// Logging middleware
#[derive(Clone, Default)]
pub struct Logger {
    config: Arc<LoggerConfig>,
}

impl Logger {
    pub fn new(config: LoggerConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }
}

impl Middleware for Logger {
    fn wrap(&self, next: BoxedHandler) -> BoxedHandler {
        Arc::new(Logged {
            config: self.config.clone(),
            next,
        })
    }
}

struct Logged {
    config: Arc<LoggerConfig>,
    next: BoxedHandler,
}

impl Handler for Logged {
    fn handle(&self, req: &Request, res: &mut Response) {
        let start = Instant::now();
        let request_id = req
            .header(&self.config.header_name)
            .map(str::to_string)
            .or_else(|| self.config.generate_id.then(generate_counter_id));

        self.next.handle(req, res);

        if let Some(id) = &request_id {
            res.set_header(self.config.header_name.clone(), id.clone());
        }
        tracing::info!(
            request_id = request_id.as_deref().unwrap_or("-"),
            method = %req.method,
            path = %req.path,
            status = res.status.as_u16(),
            elapsed_us = start.elapsed().as_micros() as u64,
            "request served"
        );
    }
}
