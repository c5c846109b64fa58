//! Object graph of the messaging application.
//!
//! [`AppFactory`] holds the singletons (config, transports). For every
//! request it hands out a [`RequestScope`], which borrows those singletons
//! and decides which transport a controller gets.

use std::sync::Arc;

use crate::config::{MessagingConfig, TransportKind};
use crate::dispatch::{ApplicationFactory, Controller, RequestFactory};
use crate::http::Request;
use crate::message::controller::{HealthController, MessageController};
use crate::message::transport::{LogTransport, StdoutTransport, Transport};

/// Registration name of [`MessageController`].
pub const MESSAGE: &str = "message";
/// Registration name of [`HealthController`].
pub const HEALTH: &str = "health";

/// Application-wide factory.
pub struct AppFactory {
    service: String,
    config: MessagingConfig,
    stdout: Arc<dyn Transport>,
    log: Arc<dyn Transport>,
}

impl AppFactory {
    pub fn new(service: impl Into<String>, config: MessagingConfig) -> Self {
        Self {
            service: service.into(),
            config,
            stdout: Arc::new(StdoutTransport),
            log: Arc::new(LogTransport),
        }
    }
}

impl ApplicationFactory for AppFactory {
    fn with<'a>(&'a self, request: &'a Request) -> Box<dyn RequestFactory + 'a> {
        Box::new(RequestScope { app: self, request })
    }
}

/// Request-scoped factory.
pub struct RequestScope<'a> {
    app: &'a AppFactory,
    request: &'a Request,
}

impl RequestScope<'_> {
    fn transport(&self) -> Arc<dyn Transport> {
        match self.app.config.transport {
            TransportKind::Stdout => Arc::clone(&self.app.stdout),
            TransportKind::Log => Arc::clone(&self.app.log),
        }
    }
}

impl RequestFactory for RequestScope<'_> {
    fn new_controller(&self, name: &str) -> Box<dyn Controller> {
        tracing::trace!(
            request_id = self.request.request_id().unwrap_or("unknown"),
            controller = name,
            "Creating controller"
        );
        match name {
            MESSAGE => Box::new(MessageController::new(self.transport())),
            HEALTH => Box::new(HealthController::new(self.app.service.clone())),
            _ => panic!("do not know how to create '{name}'"),
        }
    }
}
