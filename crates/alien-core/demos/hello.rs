//! Small alien server
//!
//! ```text
//! RUST_LOG=debug ALIEN_PORT=8080 cargo run -p alien-core --example hello
//! curl localhost:8080/hello/world
//! curl localhost:8080/static/css/site.css
//! curl localhost:8080/api/v1/users/42
//! ```

use alien_core::server::run;
use alien_core::{get_params, Logger, Mux, Request, Response, ServerConfig, SharedMux};
use std::fmt::Write;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

fn hello(req: &Request, res: &mut Response) {
    let name = req.param("name").unwrap_or("stranger");
    let _ = writeln!(res, "hello, {}", name);
}

fn show_params(req: &Request, res: &mut Response) {
    let _ = writeln!(res, "{} {} -> {}", req.method, req.path, get_params(req));
}

fn routes() -> alien_core::Result<Mux> {
    let mut mux = Mux::new();
    mux.use_middleware(Logger::default());

    mux.get("/", |_: &Request, res: &mut Response| res.write("alien\n"))?;
    mux.get("/hello/:name", hello)?;
    mux.get("/static/*file", show_params)?;

    let mut api = mux.group("/api/v1");
    api.get("/users/:id", show_params)?;
    api.post("/users", show_params)?;
    api.delete("/users/:id", show_params)?;

    Ok(mux)
}

fn main() -> alien_core::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = ServerConfig::from_env()?;
    let mux = routes()?;
    for method in alien_core::Method::ALL {
        for route in mux.tree(method).routes() {
            tracing::info!(%method, pattern = route.pattern(), "route");
        }
    }

    run(config, Arc::new(SharedMux::new(mux)))
}
