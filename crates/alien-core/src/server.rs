//! Native HTTP server implementation
//!
//! Serves a [`SharedMux`] over HTTP/1.1 using hyper with:
//! - Multi-threaded tokio runtime
//! - SO_REUSEPORT for load balancing
//! - TCP_NODELAY for low latency
//! - Graceful shutdown with connection draining

use crate::{Error, Method, Request, Response, Result, SharedMux};
use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use percent_encoding::percent_decode_str;
use hyper::body::Body;
use hyper::header::{HeaderName, HeaderValue};
use socket2::{Domain, Protocol, Socket, Type};
use std::convert::Infallible;
use std::future::Future;
use std::net::{SocketAddr, ToSocketAddrs};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::watch;

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub hostname: String,
    pub port: u16,
    /// Tokio worker threads
    pub workers: usize,
    /// Listen backlog
    pub backlog: i32,
    /// How long shutdown waits for open connections
    pub shutdown_timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            hostname: "0.0.0.0".to_string(),
            port: 3000,
            workers: num_cpus::get(),
            backlog: 1024,
            shutdown_timeout: Duration::from_secs(10),
        }
    }
}

impl ServerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hostname(mut self, hostname: impl Into<String>) -> Self {
        self.hostname = hostname.into();
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn backlog(mut self, backlog: i32) -> Self {
        self.backlog = backlog;
        self
    }

    pub fn shutdown_timeout(mut self, timeout: Duration) -> Self {
        self.shutdown_timeout = timeout;
        self
    }

    /// Defaults overlaid with `ALIEN_HOST`, `ALIEN_PORT`, `ALIEN_WORKERS`,
    /// `ALIEN_BACKLOG` and `ALIEN_SHUTDOWN_TIMEOUT_MS`
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`ServerConfig::from_env`], reading variables through `lookup`
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(host) = lookup("ALIEN_HOST") {
            config.hostname = host;
        }
        if let Some(port) = parse_var(&lookup, "ALIEN_PORT")? {
            config.port = port;
        }
        if let Some(workers) = parse_var::<usize, _>(&lookup, "ALIEN_WORKERS")? {
            if workers == 0 {
                return Err(Error::Config("ALIEN_WORKERS must be at least 1".to_string()));
            }
            config.workers = workers;
        }
        if let Some(backlog) = parse_var(&lookup, "ALIEN_BACKLOG")? {
            config.backlog = backlog;
        }
        if let Some(ms) = parse_var(&lookup, "ALIEN_SHUTDOWN_TIMEOUT_MS")? {
            config.shutdown_timeout = Duration::from_millis(ms);
        }
        Ok(config)
    }

    /// Resolve `hostname:port`
    pub fn addr(&self) -> Result<SocketAddr> {
        (self.hostname.as_str(), self.port)
            .to_socket_addrs()?
            .next()
            .ok_or_else(|| Error::Config(format!("cannot resolve {}", self.hostname)))
    }
}

fn parse_var<T, F>(lookup: &F, key: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|raw| {
            raw.trim()
                .parse()
                .map_err(|e| Error::Config(format!("{}={:?}: {}", key, raw, e)))
        })
        .transpose()
}

/// Create a TCP socket with optimizations
pub fn create_optimized_socket(addr: &SocketAddr, backlog: i32) -> std::io::Result<Socket> {
    let domain = if addr.is_ipv4() {
        Domain::IPV4
    } else {
        Domain::IPV6
    };

    let socket = Socket::new(domain, Type::STREAM, Some(Protocol::TCP))?;

    // SO_REUSEADDR - allow binding to address in TIME_WAIT
    socket.set_reuse_address(true)?;

    // SO_REUSEPORT - enable kernel load balancing across threads
    #[cfg(unix)]
    socket.set_reuse_port(true)?;

    // TCP_NODELAY - disable Nagle's algorithm for lower latency
    socket.set_nodelay(true)?;

    socket.bind(&(*addr).into())?;
    socket.listen(backlog)?;

    Ok(socket)
}

/// Bind a tokio listener for `config`; must run inside a tokio runtime
pub fn bind(config: &ServerConfig) -> Result<TcpListener> {
    let socket = create_optimized_socket(&config.addr()?, config.backlog)?;
    socket.set_nonblocking(true)?;
    Ok(TcpListener::from_std(socket.into())?)
}

/// Percent-decode a request path for routing
///
/// `%2F` stays encoded so a decoded segment never splits into two. Invalid
/// UTF-8 is replaced lossily.
pub fn decode_path(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(at) = find_encoded_slash(rest) {
        out.push_str(&percent_decode_str(&rest[..at]).decode_utf8_lossy());
        out.push_str("%2F");
        rest = &rest[at + 3..];
    }
    out.push_str(&percent_decode_str(rest).decode_utf8_lossy());
    out
}

fn find_encoded_slash(s: &str) -> Option<usize> {
    s.as_bytes()
        .windows(3)
        .position(|w| w[0] == b'%' && w[1] == b'2' && (w[2] | 0x20) == b'f')
}

/// Convert a hyper request to our Request type
///
/// The path is percent-decoded (see [`decode_path`]); the query is kept raw.
/// Returns `None` for methods outside the routable set.
pub async fn from_hyper_request<B>(req: hyper::Request<B>) -> Result<Option<Request>>
where
    B: Body<Data = Bytes>,
    B::Error: std::fmt::Display,
{
    let (parts, body) = req.into_parts();
    let Ok(method) = Method::try_from(&parts.method) else {
        return Ok(None);
    };

    let mut request = Request::new(method, decode_path(parts.uri.path()));
    request.query = parts.uri.query().map(str::to_string);

    for (name, value) in &parts.headers {
        if let Ok(v) = value.to_str() {
            request.headers.push((name.to_string(), v.to_string()));
        }
    }

    request.body = body
        .collect()
        .await
        .map_err(|e| Error::Hyper(e.to_string()))?
        .to_bytes();

    Ok(Some(request))
}

/// Convert our Response to a hyper Response
///
/// Headers that are not valid HTTP are dropped with a warning.
pub fn to_hyper_response(res: Response) -> hyper::Response<Full<Bytes>> {
    let status = res.status;
    let headers = res.headers.clone();
    let mut out = hyper::Response::new(Full::new(res.into_body()));
    *out.status_mut() = status;

    for (name, value) in headers {
        match (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(&value),
        ) {
            (Ok(name), Ok(value)) => {
                out.headers_mut().append(name, value);
            }
            _ => tracing::warn!(header = %name, "dropping invalid response header"),
        }
    }

    out
}

async fn handle<B>(
    mux: Arc<SharedMux>,
    req: hyper::Request<B>,
) -> std::result::Result<hyper::Response<Full<Bytes>>, Infallible>
where
    B: Body<Data = Bytes>,
    B::Error: std::fmt::Display,
{
    let response = match from_hyper_request(req).await {
        Ok(Some(request)) => mux.serve(request),
        Ok(None) => Response::not_found(),
        Err(e) => {
            tracing::debug!(error = %e, "failed to read request");
            Response::bad_request("Bad Request")
        }
    };
    Ok(to_hyper_response(response))
}

/// Tracks active connections for graceful shutdown
#[derive(Debug, Default)]
pub struct ConnectionTracker {
    active: AtomicU64,
}

impl ConnectionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn increment(&self) {
        self.active.fetch_add(1, Ordering::SeqCst);
    }

    #[inline]
    pub fn decrement(&self) {
        self.active.fetch_sub(1, Ordering::SeqCst);
    }

    #[inline]
    pub fn count(&self) -> u64 {
        self.active.load(Ordering::SeqCst)
    }

    /// Wait until no connection is active, or `timeout` elapses.
    /// Returns whether the drain completed.
    pub async fn drain(&self, timeout: Duration) -> bool {
        let poll = async {
            while self.count() > 0 {
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        };
        tokio::time::timeout(timeout, poll).await.is_ok()
    }
}

/// Accept connections on `listener` until `shutdown` resolves, then ask every
/// open connection to close and wait up to `drain_timeout` for them to finish
///
/// In-flight requests complete; idle keep-alive connections close at once.
pub async fn serve<F>(
    listener: TcpListener,
    mux: Arc<SharedMux>,
    shutdown: F,
    drain_timeout: Duration,
) -> Result<()>
where
    F: Future<Output = ()>,
{
    use hyper::server::conn::http1;
    use hyper::service::service_fn;
    use hyper_util::rt::TokioIo;

    let tracker = Arc::new(ConnectionTracker::new());
    let (stop_tx, stop_rx) = watch::channel(false);
    tokio::pin!(shutdown);

    if let Ok(addr) = listener.local_addr() {
        tracing::info!(%addr, routes = mux.load().len(), "listening");
    }

    loop {
        tokio::select! {
            accepted = listener.accept() => {
                let (stream, peer) = match accepted {
                    Ok(conn) => conn,
                    Err(e) => {
                        tracing::warn!(error = %e, "accept failed");
                        continue;
                    }
                };

                let mux = mux.clone();
                let tracker = tracker.clone();
                let mut stop_rx = stop_rx.clone();
                tracker.increment();

                tokio::spawn(async move {
                    let io = TokioIo::new(stream);
                    let service = service_fn(move |req: hyper::Request<hyper::body::Incoming>| {
                        handle(mux.clone(), req)
                    });

                    let conn = http1::Builder::new().serve_connection(io, service);
                    tokio::pin!(conn);

                    let result = tokio::select! {
                        res = conn.as_mut() => res,
                        _ = stop_rx.changed() => {
                            conn.as_mut().graceful_shutdown();
                            conn.await
                        }
                    };
                    if let Err(e) = result {
                        tracing::debug!(%peer, error = %e, "connection error");
                    }
                    tracker.decrement();
                });
            }
            _ = &mut shutdown => break,
        }
    }

    let _ = stop_tx.send(true);

    tracing::info!(active = tracker.count(), "shutting down");
    if !tracker.drain(drain_timeout).await {
        tracing::warn!(active = tracker.count(), "drain timed out");
    }
    Ok(())
}

/// Build a runtime with `config.workers` threads and serve until Ctrl-C
pub fn run(config: ServerConfig, mux: Arc<SharedMux>) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(config.workers)
        .enable_all()
        .build()?;

    runtime.block_on(async move {
        let listener = bind(&config)?;
        let shutdown = async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "cannot listen for Ctrl-C");
                std::future::pending::<()>().await;
            }
        };
        serve(listener, mux, shutdown, config.shutdown_timeout).await
    })
}
