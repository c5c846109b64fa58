//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, tower-http layers, request ID)
//!     → request.rs (buffer body into an immutable Request)
//!     → routing::Router (exact (method, path) lookup)
//!     → response.rs (ResponseRecorder collects status, headers, body)
//!     → Send to client
//! ```
//!
//! # Design Decisions
//! - Handlers are synchronous: they see a fully buffered request
//! - The response sink records; conversion to an axum response happens once
//! - Handler panics are not caught here; they take down the connection task

pub mod request;
pub mod response;
pub mod server;

pub use request::{BodyError, Request, UuidRequestId, X_REQUEST_ID};
pub use response::{ResponseRecorder, ResponseSink};
pub use server::{HttpServer, RouterService};
