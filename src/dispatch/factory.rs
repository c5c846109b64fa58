//! Two-stage controller factories.
//!
//! ```text
//! ApplicationFactory (process lifetime, shared by all workers)
//!     .with(&request)          once per request
//!     → RequestFactory (owned by the worker serving the request)
//!         .new_controller(name)
//!         → Box<dyn Controller>
//! ```

use crate::dispatch::controller::Controller;
use crate::http::Request;

/// Process-wide root of the object graph: configuration, shared clients.
///
/// Read concurrently by every worker; any interior mutability is the
/// implementor's business.
pub trait ApplicationFactory: Send + Sync {
    /// Build the request-scoped factory for `request`.
    ///
    /// Called exactly once per dispatched request. Expected to be cheap.
    fn with<'a>(&'a self, request: &'a Request) -> Box<dyn RequestFactory + 'a>;
}

/// Per-request root of the object graph.
pub trait RequestFactory {
    /// Create the controller registered under `name`.
    ///
    /// The concrete type returned for a name must be the type that was passed
    /// to `Dispatcher::register` under that name. Anything else aborts the
    /// request with a panic.
    fn new_controller(&self, name: &str) -> Box<dyn Controller>;
}
