//! Sample messaging application.
//!
//! Demonstrates injecting a [`Transport`] into a controller. Which
//! implementation gets injected is decided per request by the request
//! factory, from `messaging.transport` in the configuration.

pub mod controller;
pub mod factory;
pub mod transport;

pub use controller::{HealthController, MessageController};
pub use factory::{AppFactory, RequestScope, HEALTH, MESSAGE};
pub use transport::{LogTransport, StdoutTransport, Transport, TransportError};

use crate::config::ServerConfig;
use crate::dispatch::{DispatchError, Dispatcher};
use crate::routing::Router;

/// Build the dispatcher with every controller of the application registered.
pub fn build_dispatcher(config: &ServerConfig) -> Result<Dispatcher, DispatchError> {
    let factory = AppFactory::new(config.dispatcher.name.clone(), config.messaging.clone());
    let mut dispatcher = Dispatcher::builder(config.dispatcher.name.clone())
        .router(Router::new())
        .factory(factory)
        .build();

    dispatcher.register(MessageController::default(), MESSAGE)?;
    dispatcher.register(HealthController::default(), HEALTH)?;
    Ok(dispatcher)
}
