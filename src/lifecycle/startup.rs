//! Startup orchestration.
//!
//! # Responsibilities
//! - Initialize logging and metrics from validated configuration
//! - Register every controller before any listener exists
//! - Bind the listener and serve until shutdown
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Listeners start last (traffic only when the route table is complete)

use std::net::SocketAddr;

use thiserror::Error;
use tokio::net::TcpListener;

use crate::config::ServerConfig;
use crate::dispatch::DispatchError;
use crate::http::HttpServer;
use crate::lifecycle::{signals, Shutdown, ShutdownSignal};
use crate::message;
use crate::observability::{logging, metrics};

/// Anything that stops the server from coming up.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to initialize logging: {0}")]
    Logging(#[from] tracing_subscriber::util::TryInitError),

    #[error("failed to start metrics exporter: {0}")]
    Metrics(#[from] metrics_exporter_prometheus::BuildError),

    #[error("invalid metrics address '{0}'")]
    MetricsAddress(String),

    #[error(transparent)]
    Dispatch(#[from] DispatchError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Bring the whole process up and serve until a termination signal.
pub async fn run(config: ServerConfig) -> Result<(), StartupError> {
    logging::init_logging(&config.observability)?;
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        dispatcher = %config.dispatcher.name,
        "di-server starting"
    );

    if config.observability.metrics_enabled {
        let addr: SocketAddr = config
            .observability
            .metrics_address
            .parse()
            .map_err(|_| StartupError::MetricsAddress(config.observability.metrics_address.clone()))?;
        metrics::init_metrics(addr)?;
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let signal = shutdown.subscribe();
    signals::spawn_signal_listener(shutdown);

    serve(config, listener, signal).await?;
    tracing::info!("Shutdown complete");
    Ok(())
}

/// Register the application's controllers and serve on `listener`.
///
/// Registration completes before the first connection is accepted.
pub async fn serve(
    config: ServerConfig,
    listener: TcpListener,
    shutdown: ShutdownSignal,
) -> Result<(), StartupError> {
    let dispatcher = message::build_dispatcher(&config)?;
    for route in dispatcher.routes() {
        tracing::info!(
            method = %route.method,
            path = route.path,
            controller = %route.controller,
            handler = route.handler,
            "Route ready"
        );
    }

    let server = HttpServer::new(config, dispatcher.into_router());
    server.run(listener, shutdown).await?;
    Ok(())
}
