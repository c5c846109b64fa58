//! Controllers of the messaging application.

use std::sync::Arc;

use axum::http::{header, HeaderValue, StatusCode};
use serde::Serialize;

use crate::dispatch::{Binding, Controller, MethodSet};
use crate::http::{Request, ResponseSink};
use crate::message::transport::{LogTransport, Transport};

/// Handles requests to send messages. Its transport is injected per request.
#[derive(Clone)]
pub struct MessageController {
    transport: Arc<dyn Transport>,
}

impl MessageController {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// `GET /send?from=&to=&msg=`
    fn send(&self, rw: &mut dyn ResponseSink, req: &Request) {
        let result = self.transport.send(
            &req.form_value("from"),
            &req.form_value("to"),
            &req.form_value("msg"),
        );
        match result {
            Ok(()) => rw.write_status(StatusCode::OK),
            Err(e) => {
                tracing::warn!(
                    request_id = req.request_id().unwrap_or("unknown"),
                    error = %e,
                    "Message not sent"
                );
                rw.write_status(StatusCode::INTERNAL_SERVER_ERROR);
            }
        }
    }
}

impl Default for MessageController {
    fn default() -> Self {
        Self::new(Arc::new(LogTransport))
    }
}

impl Controller for MessageController {
    fn bindings(&self) -> Vec<Binding> {
        vec![Binding::new("GET", "/send", "Send")]
    }

    fn methods() -> MethodSet<Self> {
        MethodSet::new().handler("Send", Self::send)
    }
}

#[derive(Debug, Serialize)]
struct HealthReport<'a> {
    status: &'static str,
    service: &'a str,
    version: &'static str,
    request_id: Option<&'a str>,
}

/// Liveness endpoint.
#[derive(Debug, Clone, Default)]
pub struct HealthController {
    service: String,
}

impl HealthController {
    pub fn new(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
        }
    }

    fn health(&self, rw: &mut dyn ResponseSink, req: &Request) {
        let report = HealthReport {
            status: "ok",
            service: &self.service,
            version: env!("CARGO_PKG_VERSION"),
            request_id: req.request_id(),
        };
        match serde_json::to_vec(&report) {
            Ok(body) => {
                rw.headers_mut()
                    .insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
                rw.write_status(StatusCode::OK);
                rw.write(&body);
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to encode health report");
                rw.write_status(StatusCode::INTERNAL_SERVER_ERROR);
            }
        }
    }
}

impl Controller for HealthController {
    fn bindings(&self) -> Vec<Binding> {
        vec![
            Binding::new("GET", "/healthz", "Health"),
            Binding::new("HEAD", "/healthz", "Health"),
        ]
    }

    fn methods() -> MethodSet<Self> {
        MethodSet::new().handler("Health", Self::health)
    }
}
