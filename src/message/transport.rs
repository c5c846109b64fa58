//! Message delivery backends.

use thiserror::Error;

/// Delivery failure reported by a [`Transport`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("missing '{0}' field")]
    MissingField(&'static str),

    #[error("delivery failed: {0}")]
    Delivery(String),
}

/// The ability to send a message.
pub trait Transport: Send + Sync {
    fn send(&self, from: &str, to: &str, msg: &str) -> Result<(), TransportError>;
}

/// Prints `"<msg> <to> from <from>"` to stdout.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutTransport;

impl Transport for StdoutTransport {
    fn send(&self, from: &str, to: &str, msg: &str) -> Result<(), TransportError> {
        println!("{msg} {to} from {from}");
        Ok(())
    }
}

/// Emits every message as an `info` event.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogTransport;

impl Transport for LogTransport {
    fn send(&self, from: &str, to: &str, msg: &str) -> Result<(), TransportError> {
        if to.is_empty() {
            return Err(TransportError::MissingField("to"));
        }
        tracing::info!(from, to, msg, "Message sent");
        Ok(())
    }
}
