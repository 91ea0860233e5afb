//! End-to-end tests: a real server on 127.0.0.1:0, raw HTTP/1.1 over TCP.

#![cfg(feature = "native")]

use alien_core::server::serve;
use alien_core::{get_params, BoxedHandler, Method, Mux, Request, Response, SharedMux};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

struct TestServer {
    addr: SocketAddr,
    shared: Arc<SharedMux>,
    stop: oneshot::Sender<()>,
    task: JoinHandle<alien_core::Result<()>>,
}

impl TestServer {
    async fn start(mux: Mux) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let shared = Arc::new(SharedMux::new(mux));
        let (stop, stopped) = oneshot::channel::<()>();

        let task = tokio::spawn(serve(
            listener,
            shared.clone(),
            async move {
                let _ = stopped.await;
            },
            Duration::from_secs(10),
        ));

        Self {
            addr,
            shared,
            stop,
            task,
        }
    }

    async fn request(&self, method: &str, path: &str) -> (u16, String) {
        let mut stream = TcpStream::connect(self.addr).await.unwrap();
        let raw = format!(
            "{} {} HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n",
            method, path
        );
        stream.write_all(raw.as_bytes()).await.unwrap();

        let mut buf = Vec::new();
        stream.read_to_end(&mut buf).await.unwrap();
        let text = String::from_utf8(buf).unwrap();

        let status = text
            .split(' ')
            .nth(1)
            .and_then(|s| s.parse().ok())
            .unwrap_or(0);
        let body = text
            .split_once("\r\n\r\n")
            .map(|(_, b)| b.to_string())
            .unwrap_or_default();
        (status, body)
    }

    async fn stop(self) {
        self.stop.send(()).unwrap();
        self.task.await.unwrap().unwrap();
    }
}

fn echo_path(req: &Request, res: &mut Response) {
    res.write(req.path.as_bytes());
}

fn write_params(req: &Request, res: &mut Response) {
    res.write(get_params(req).to_string());
}

#[tokio::test]
async fn test_verbs_over_the_wire() {
    let mut mux = Mux::new();
    mux.get("/GET", echo_path).unwrap();
    mux.put("/PUT", echo_path).unwrap();
    mux.post("/POST", echo_path).unwrap();
    mux.head("/HEAD", echo_path).unwrap();
    mux.patch("/PATCH", echo_path).unwrap();
    mux.delete("/DELETE", echo_path).unwrap();
    mux.options("/OPTIONS", echo_path).unwrap();
    mux.trace("/TRACE", echo_path).unwrap();
    let server = TestServer::start(mux).await;

    for method in ["GET", "POST", "PUT", "PATCH", "DELETE", "HEAD", "OPTIONS", "TRACE"] {
        let (status, _) = server.request(method, &format!("/{}", method)).await;
        assert_eq!(status, 200, "{}", method);
    }
    server.stop().await;
}

#[tokio::test]
async fn test_mismatch_is_404() {
    let mut mux = Mux::new();
    mux.add_route("GET", "/hello", echo_path).unwrap();
    mux.add_route("POST", "/", echo_path).unwrap();
    assert!(mux.add_route("CRAP", "/hell", echo_path).is_err());
    let server = TestServer::start(mux).await;

    assert_eq!(server.request("GET", "/").await.0, 404);
    assert_eq!(server.request("POST", "/hello").await.0, 404);
    // Not in the routable set at all
    assert_eq!(server.request("PURGE", "/hello").await.0, 404);
    server.stop().await;
}

#[tokio::test]
async fn test_params_over_the_wire() {
    let mut mux = Mux::new();
    mux.get("/hello/:name", write_params).unwrap();
    mux.get("/home/*", write_params).unwrap();
    let server = TestServer::start(mux).await;

    assert_eq!(
        server.request("GET", "/hello/world").await,
        (200, "name:world".to_string())
    );
    assert_eq!(
        server.request("GET", "/home/alone").await,
        (200, "catch:alone".to_string())
    );
    // Captures are percent-decoded
    assert_eq!(
        server.request("GET", "/hello/john%20doe").await,
        (200, "name:john doe".to_string())
    );
    assert_eq!(
        server.request("GET", "/home/a%2Fb/c%21").await,
        (200, "catch:a%2Fb/c!".to_string())
    );
    // Query strings are not part of the path
    assert_eq!(
        server.request("GET", "/hello/world?x=1").await,
        (200, "name:world".to_string())
    );
    server.stop().await;
}

#[tokio::test]
async fn test_group_over_the_wire() {
    let mut mux = Mux::new();
    mux.group("/hello")
        .get("/world", |_: &Request, _: &mut Response| {})
        .unwrap();
    let server = TestServer::start(mux).await;

    assert_eq!(server.request("GET", "/hello/world").await.0, 200);
    assert_eq!(server.request("GET", "/world").await.0, 404);
    server.stop().await;
}

#[tokio::test]
async fn test_middleware_over_the_wire() {
    let mut mux = Mux::new();
    mux.use_middleware(|next: BoxedHandler| -> BoxedHandler {
        Arc::new(move |req: &Request, res: &mut Response| {
            res.write("alien");
            next.handle(req, res);
        })
    });
    mux.get("/", |_: &Request, _: &mut Response| {}).unwrap();
    let server = TestServer::start(mux).await;

    assert_eq!(server.request("GET", "/").await, (200, "alien".to_string()));
    server.stop().await;
}

#[tokio::test]
async fn test_shutdown_closes_idle_keep_alive() {
    let mut mux = Mux::new();
    mux.get("/v", |_: &Request, res: &mut Response| res.write("1")).unwrap();
    let server = TestServer::start(mux).await;

    let mut idle = TcpStream::connect(server.addr).await.unwrap();
    idle.write_all(b"GET /v HTTP/1.1\r\nHost: localhost\r\n\r\n")
        .await
        .unwrap();
    let mut buf = [0u8; 512];
    let n = idle.read(&mut buf).await.unwrap();
    assert!(buf[..n].starts_with(b"HTTP/1.1 200"));

    // Well under the 10s drain timeout: the idle connection is closed, not waited out
    tokio::time::timeout(Duration::from_secs(2), server.stop())
        .await
        .expect("shutdown waited on an idle connection");

    let mut rest = Vec::new();
    tokio::time::timeout(Duration::from_secs(2), idle.read_to_end(&mut rest))
        .await
        .expect("connection left open after shutdown")
        .unwrap();
}

#[tokio::test]
async fn test_hot_swap_while_serving() {
    let mut mux = Mux::new();
    mux.get("/v", |_: &Request, res: &mut Response| res.write("1")).unwrap();
    let server = TestServer::start(mux).await;
    assert_eq!(server.request("GET", "/v").await.1, "1");

    let mut next = Mux::new();
    next.get("/v", |_: &Request, res: &mut Response| res.write("2")).unwrap();
    server.shared.replace(next);
    assert_eq!(server.request("GET", "/v").await.1, "2");
    server.stop().await;
}

struct TestRoute {
    method: &'static str,
    path: &'static str,
}

const fn r(method: &'static str, path: &'static str) -> TestRoute {
    TestRoute { method, path }
}

const GITHUB_API: &[TestRoute] = &[
    r("GET", "/authorizations"),
    r("GET", "/authorizations/:id"),
    r("POST", "/authorizations"),
    r("DELETE", "/authorizations/:id"),
    r("GET", "/applications/:client_id/tokens/:access_token"),
    r("DELETE", "/applications/:client_id/tokens"),
    r("GET", "/events"),
    r("GET", "/repos/:owner/:repo/events"),
    r("GET", "/networks/:owner/:repo/events"),
    r("GET", "/orgs/:org/events"),
    r("GET", "/users/:user/received_events"),
    r("GET", "/users/:user/received_events/public"),
    r("GET", "/notifications"),
    r("PUT", "/notifications"),
    r("GET", "/notifications/threads/:id"),
    r("GET", "/user/starred/:owner/:repo"),
    r("PUT", "/user/starred/:owner/:repo"),
    r("GET", "/users/:user/gists"),
    r("GET", "/gists"),
    r("GET", "/gists/public"),
    r("GET", "/gists/starred"),
    r("GET", "/gists/:id"),
    r("POST", "/gists"),
    r("PUT", "/gists/:id/star"),
    r("DELETE", "/gists/:id/star"),
    r("POST", "/gists/:id/forks"),
    r("GET", "/repos/:owner/:repo/git/blobs/:sha"),
    r("GET", "/repos/:owner/:repo/git/refs"),
    r("GET", "/repos/:owner/:repo/contents/*path"),
    r("GET", "/repos/:owner/:repo/issues"),
    r("GET", "/repos/:owner/:repo/issues/:number"),
    r("POST", "/repos/:owner/:repo/issues"),
    r("GET", "/repos/:owner/:repo/issues/:number/comments"),
    r("GET", "/search/repositories"),
    r("GET", "/users/:user"),
    r("GET", "/user"),
    r("GET", "/users"),
    r("GET", "/user/emails"),
    r("GET", "/users/:user/followers"),
    r("DELETE", "/user/following/:user"),
];

#[tokio::test]
async fn test_github_api_routes_resolve_to_themselves() {
    let mut mux = Mux::new();
    for route in GITHUB_API {
        mux.add_route(route.method, route.path, |req: &Request, res: &mut Response| {
            res.write(req.path.as_bytes());
        })
        .unwrap();
    }
    assert_eq!(mux.len(), GITHUB_API.len());

    assert_routes_resolve(mux, GITHUB_API).await;
}

#[tokio::test]
async fn test_static_routes_resolve_to_themselves() {
    let mut mux = Mux::new();
    for route in STATIC {
        mux.add_route(route.method, route.path, echo_path).unwrap();
    }
    assert_eq!(mux.len(), STATIC.len());

    // Nothing outside the table matches
    assert!(mux.lookup(Method::Get, "/articles/wiki/missing.go").is_err());
    assert!(mux.lookup(Method::Get, "/gopher").is_err());

    assert_routes_resolve(mux, STATIC).await;
}

/// Every route must match its own pattern, in-process and over the wire
async fn assert_routes_resolve(mux: Mux, table: &[TestRoute]) {
    for route in table {
        let method = route.method.parse::<Method>().unwrap();
        let m = mux.lookup(method, route.path).unwrap();
        assert_eq!(m.route.pattern(), route.path);
    }

    let server = TestServer::start(mux).await;
    for route in table {
        let (status, body) = server.request(route.method, route.path).await;
        assert_eq!(status, 200, "{} {}", route.method, route.path);
        assert_eq!(body, route.path);
    }
    server.stop().await;
}

const STATIC: &[TestRoute] = &[
    r("GET", "/"),
    r("GET", "/cmd.html"),
    r("GET", "/code.html"),
    r("GET", "/contrib.html"),
    r("GET", "/contribute.html"),
    r("GET", "/debugging_with_gdb.html"),
    r("GET", "/docs.html"),
    r("GET", "/effective_go.html"),
    r("GET", "/files.log"),
    r("GET", "/gccgo_contribute.html"),
    r("GET", "/gccgo_install.html"),
    r("GET", "/go-logo-black.png"),
    r("GET", "/go-logo-blue.png"),
    r("GET", "/go-logo-white.png"),
    r("GET", "/go1.1.html"),
    r("GET", "/go1.2.html"),
    r("GET", "/go1.html"),
    r("GET", "/go1compat.html"),
    r("GET", "/go_faq.html"),
    r("GET", "/go_mem.html"),
    r("GET", "/go_spec.html"),
    r("GET", "/help.html"),
    r("GET", "/ie.css"),
    r("GET", "/install-source.html"),
    r("GET", "/install.html"),
    r("GET", "/logo-153x55.png"),
    r("GET", "/Makefile"),
    r("GET", "/root.html"),
    r("GET", "/share.png"),
    r("GET", "/sieve.gif"),
    r("GET", "/tos.html"),
    r("GET", "/articles/"),
    r("GET", "/articles/go_command.html"),
    r("GET", "/articles/index.html"),
    r("GET", "/articles/wiki/"),
    r("GET", "/articles/wiki/edit.html"),
    r("GET", "/articles/wiki/final-noclosure.go"),
    r("GET", "/articles/wiki/final-noerror.go"),
    r("GET", "/articles/wiki/final-parsetemplate.go"),
    r("GET", "/articles/wiki/final-template.go"),
    r("GET", "/articles/wiki/final.go"),
    r("GET", "/articles/wiki/get.go"),
    r("GET", "/articles/wiki/http-sample.go"),
    r("GET", "/articles/wiki/index.html"),
    r("GET", "/articles/wiki/Makefile"),
    r("GET", "/articles/wiki/notemplate.go"),
    r("GET", "/articles/wiki/part1-noerror.go"),
    r("GET", "/articles/wiki/part1.go"),
    r("GET", "/articles/wiki/part2.go"),
    r("GET", "/articles/wiki/part3-errorhandling.go"),
    r("GET", "/articles/wiki/part3.go"),
    r("GET", "/articles/wiki/test.bash"),
    r("GET", "/articles/wiki/test_edit.good"),
    r("GET", "/articles/wiki/test_Test.txt.good"),
    r("GET", "/articles/wiki/test_view.good"),
    r("GET", "/articles/wiki/view.html"),
    r("GET", "/codewalk/"),
    r("GET", "/codewalk/codewalk.css"),
    r("GET", "/codewalk/codewalk.js"),
    r("GET", "/codewalk/codewalk.xml"),
    r("GET", "/codewalk/functions.xml"),
    r("GET", "/codewalk/markov.go"),
    r("GET", "/codewalk/markov.xml"),
    r("GET", "/codewalk/pig.go"),
    r("GET", "/codewalk/popout.png"),
    r("GET", "/codewalk/run"),
    r("GET", "/codewalk/sharemem.xml"),
    r("GET", "/codewalk/urlpoll.go"),
    r("GET", "/devel/"),
    r("GET", "/devel/release.html"),
    r("GET", "/devel/weekly.html"),
    r("GET", "/gopher/"),
    r("GET", "/gopher/appenginegopher.jpg"),
    r("GET", "/gopher/appenginegophercolor.jpg"),
    r("GET", "/gopher/appenginelogo.gif"),
    r("GET", "/gopher/bumper.png"),
    r("GET", "/gopher/doc.png"),
    r("GET", "/gopher/frontpage.png"),
    r("GET", "/gopher/gopherbw.png"),
    r("GET", "/gopher/gophercolor.png"),
    r("GET", "/gopher/pencil/"),
    r("GET", "/gopher/pencil/gopherhat.jpg"),
    r("GET", "/gopher/pencil/gopherhelmet.jpg"),
    r("GET", "/gopher/pencil/gophermega.jpg"),
    r("GET", "/gopher/talks.png"),
    r("GET", "/play/"),
    r("GET", "/play/fib.go"),
    r("GET", "/play/hello.go"),
    r("GET", "/play/life.go"),
    r("GET", "/play/peano.go"),
    r("GET", "/play/pi.go"),
    r("GET", "/play/sieve.go"),
    r("GET", "/play/solitaire.go"),
    r("GET", "/play/tree.go"),
    r("GET", "/progs/"),
    r("GET", "/progs/cgo1.go"),
    r("GET", "/progs/cgo2.go"),
    r("GET", "/progs/defer.go"),
    r("GET", "/progs/error.go"),
    r("GET", "/progs/go1.go"),
    r("GET", "/progs/run"),
    r("GET", "/progs/slices.go"),
    r("GET", "/progs/update.bash"),
];
