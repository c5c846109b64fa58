//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router around the frozen route table
//! - Wire up middleware (tracing, timeout, request ID)
//! - Bind server to listener
//! - Buffer requests and hand them to the [`Router`]
//! - Observability (metrics, correlation IDs)

use std::convert::Infallible;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::{Duration, Instant};

use axum::{
    extract::Request as HttpRequest,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use futures_util::future::BoxFuture;
use tokio::net::TcpListener;
use tower::Service;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::ServerConfig;
use crate::http::request::{Request, UuidRequestId};
use crate::http::response::ResponseRecorder;
use crate::lifecycle::ShutdownSignal;
use crate::observability::metrics;
use crate::routing::Router;

/// Adapts the route table to a `tower::Service`.
#[derive(Clone)]
pub struct RouterService {
    router: Arc<Router>,
    max_body_size: usize,
}

impl RouterService {
    pub fn new(router: Arc<Router>, max_body_size: usize) -> Self {
        Self {
            router,
            max_body_size,
        }
    }
}

impl Service<HttpRequest> for RouterService {
    type Response = Response;
    type Error = Infallible;
    type Future = BoxFuture<'static, Result<Response, Infallible>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, request: HttpRequest) -> Self::Future {
        let router = Arc::clone(&self.router);
        let limit = self.max_body_size;
        Box::pin(async move {
            let start_time = Instant::now();
            let method = request.method().to_string();

            let request = match Request::from_http(request, limit).await {
                Ok(request) => request,
                Err(e) => {
                    tracing::warn!(method = %method, error = %e, "Rejecting request");
                    metrics::record_rejected(&method, start_time);
                    return Ok((StatusCode::BAD_REQUEST, e.to_string()).into_response());
                }
            };

            Ok(serve(&router, &request, start_time))
        })
    }
}

fn serve(router: &Router, request: &Request, start_time: Instant) -> Response {
    let mut recorder = ResponseRecorder::new();
    let outcome = router.serve_http(&mut recorder, request);

    tracing::debug!(
        request_id = request.request_id().unwrap_or("unknown"),
        method = %request.method(),
        path = request.path(),
        status = recorder.status().as_u16(),
        outcome = outcome.as_str(),
        "Request served"
    );
    metrics::record_request(
        request.method().as_str(),
        recorder.status().as_u16(),
        outcome,
        start_time,
    );
    recorder.into_response()
}

/// HTTP server hosting a frozen route table.
pub struct HttpServer {
    app: axum::Router,
    config: ServerConfig,
}

impl HttpServer {
    /// Create a new HTTP server serving `router`.
    pub fn new(config: ServerConfig, router: Router) -> Self {
        let service = RouterService::new(Arc::new(router), config.limits.max_body_size);
        let app = Self::build_app(&config, service);
        Self { app, config }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_app(config: &ServerConfig, service: RouterService) -> axum::Router {
        axum::Router::new()
            .fallback_service(service)
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(SetRequestIdLayer::x_request_id(UuidRequestId))
            .layer(TraceLayer::new_for_http())
    }

    /// The fully layered application, for driving without a socket.
    pub fn app(&self) -> axum::Router {
        self.app.clone()
    }

    /// Run the server until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: ShutdownSignal,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            request_timeout_secs = self.config.timeouts.request_secs,
            max_body_size = self.config.limits.max_body_size,
            "HTTP server starting"
        );

        axum::serve(listener, self.app)
            .with_graceful_shutdown(async move {
                shutdown.recv().await;
                tracing::info!("Draining connections");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }
}
