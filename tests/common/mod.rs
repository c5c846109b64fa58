//! Shared utilities for integration tests.

use std::net::SocketAddr;

use axum::http::{Method, Uri};
use di_dispatch::config::ServerConfig;
use di_dispatch::lifecycle::{startup, Shutdown};
use di_dispatch::{Request, ResponseRecorder, Router};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Build a request with no headers or body.
#[allow(dead_code)]
pub fn request(method: Method, uri: &'static str) -> Request {
    Request::new(method, Uri::from_static(uri))
}

/// Route `req` through `router` and return what the handler wrote.
#[allow(dead_code)]
pub fn serve(router: &Router, req: &Request) -> ResponseRecorder {
    let mut recorder = ResponseRecorder::new();
    router.serve_http(&mut recorder, req);
    recorder
}

/// A running server on an ephemeral port.
#[allow(dead_code)]
pub struct TestServer {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
    pub handle: JoinHandle<Result<(), startup::StartupError>>,
}

/// Start the sample application on `127.0.0.1:0`.
#[allow(dead_code)]
pub async fn spawn_server(config: ServerConfig) -> TestServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let shutdown = Shutdown::new();
    let signal = shutdown.subscribe();
    let handle = tokio::spawn(startup::serve(config, listener, signal));
    TestServer {
        addr,
        shutdown,
        handle,
    }
}

/// HTTP client that never pools or proxies.
#[allow(dead_code)]
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
