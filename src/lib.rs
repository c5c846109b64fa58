//! Controller dispatch with request-scoped dependency injection.
//!
//! Controllers declare `(method, path, handler)` bindings. A [`Dispatcher`]
//! validates every binding against the controller's exported method table at
//! startup and installs dispatch closures into an exact-match [`Router`]. Per
//! request, an application-wide factory yields a request-scoped factory which
//! builds the controller that serves the request.

pub mod config;
pub mod dispatch;
pub mod http;
pub mod lifecycle;
pub mod message;
pub mod observability;
pub mod routing;

pub use config::schema::ServerConfig;
pub use dispatch::{
    ApplicationFactory, Binding, Controller, DispatchError, Dispatcher, MethodSet, RequestFactory,
};
pub use http::{HttpServer, Request, ResponseRecorder, ResponseSink};
pub use lifecycle::Shutdown;
pub use routing::{RouteOutcome, Router};
