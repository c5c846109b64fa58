//! Controller dispatch subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (single-threaded):
//!     Dispatcher::register(controller, name)
//!     → controller.bindings()            (method, path, handler name)
//!     → C::methods()                     exported method table
//!     → Signature::check_handler_shape   (receiver, sink, request)
//!     → Router::handle_func              one dispatch closure per binding
//!
//! Per request (one worker each):
//!     Router → dispatch closure
//!     → ApplicationFactory::with(&request)  → RequestFactory
//!     → RequestFactory::new_controller(name) → Box<dyn Controller>
//!     → downcast to the registered type      (panic on mismatch)
//!     → invoker(controller, sink, request)
//! ```
//!
//! # Design Decisions
//! - Configuration mistakes are returned as [`DispatchError`], never panicked
//! - Broken factory contracts panic with a [`ContractViolation`] message
//! - The application factory is an explicit shared handle, not a global

pub mod binding;
pub mod controller;
pub mod dispatcher;
pub mod error;
pub mod factory;
pub mod signature;

pub use binding::Binding;
pub use controller::{AsAny, Controller, ExportedMethod, Invoker, MethodSet};
pub use dispatcher::{Dispatcher, DispatcherBuilder, RouteRecord};
pub use error::{
    BindingError, ConfigurationError, ContractViolation, DispatchError, ErrorKind, SignatureError,
};
pub use factory::{ApplicationFactory, RequestFactory};
pub use signature::{ParamType, Signature, TypeTag, HANDLER_ARITY};
