//! Exact-match route table.
//!
//! # Responsibilities
//! - Store handlers keyed by (path, method)
//! - Look up the handler for a request, path first
//! - Answer 404 / 405 for requests nothing handles
//!
//! # Design Decisions
//! - O(1) lookups via nested HashMap
//! - Last registration for a key wins
//! - 405 responses do not advertise the allowed methods

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use axum::http::{Method, StatusCode};

use crate::http::{Request, ResponseSink};

/// Type-erased request handler stored in the table.
pub type HandlerFunc = Arc<dyn Fn(&mut dyn ResponseSink, &Request) + Send + Sync>;

/// Result of [`Router::serve_http`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteOutcome {
    /// A handler ran.
    Handled,
    /// No handler is registered for the path.
    NotFound,
    /// The path is known, but not for this method.
    MethodNotAllowed,
}

impl RouteOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            RouteOutcome::Handled => "handled",
            RouteOutcome::NotFound => "not_found",
            RouteOutcome::MethodNotAllowed => "method_not_allowed",
        }
    }
}

/// Exact (method, path) → handler table.
#[derive(Default)]
pub struct Router {
    routes: HashMap<String, HashMap<Method, HandlerFunc>>,
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install `handler` for `method` on `path`, replacing any previous handler.
    pub fn handle_func<F>(&mut self, method: Method, path: impl Into<String>, handler: F)
    where
        F: Fn(&mut dyn ResponseSink, &Request) + Send + Sync + 'static,
    {
        let path = path.into();
        let previous = self
            .routes
            .entry(path.clone())
            .or_default()
            .insert(method.clone(), Arc::new(handler));
        if previous.is_some() {
            tracing::debug!(method = %method, path = %path, "Replacing existing handler");
        }
    }

    /// Route `request` to its handler and report what happened.
    pub fn serve_http(&self, sink: &mut dyn ResponseSink, request: &Request) -> RouteOutcome {
        let Some(methods) = self.routes.get(request.path()) else {
            tracing::debug!(method = %request.method(), path = %request.path(), "No route for path");
            sink.write_status(StatusCode::NOT_FOUND);
            sink.write(b"404 page not found\n");
            return RouteOutcome::NotFound;
        };

        let Some(handler) = methods.get(request.method()) else {
            tracing::debug!(method = %request.method(), path = %request.path(), "Method not allowed");
            sink.write_status(StatusCode::METHOD_NOT_ALLOWED);
            sink.write(b"Method Not Allowed\n");
            return RouteOutcome::MethodNotAllowed;
        };

        handler(sink, request);
        RouteOutcome::Handled
    }

    /// Number of installed (method, path) pairs.
    pub fn len(&self) -> usize {
        self.routes.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether a handler exists for exactly this key.
    pub fn contains(&self, method: &Method, path: &str) -> bool {
        self.routes
            .get(path)
            .map(|methods| methods.contains_key(method))
            .unwrap_or(false)
    }
}

impl fmt::Debug for Router {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<_> = self
            .routes
            .iter()
            .flat_map(|(path, methods)| methods.keys().map(move |m| format!("{m} {path}")))
            .collect();
        keys.sort();
        f.debug_struct("Router").field("routes", &keys).finish()
    }
}
