//! Dispatcher error definitions.
//!
//! Everything here except [`ContractViolation`] is returned from
//! `Dispatcher::register`. `ContractViolation` is only ever used as a panic
//! message.

use thiserror::Error;

use crate::dispatch::signature::HANDLER_ARITY;

/// Registration failure, prefixed with the dispatcher that reported it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{dispatcher}: {kind}")]
pub struct DispatchError {
    dispatcher: String,
    kind: ErrorKind,
}

impl DispatchError {
    pub(crate) fn new(dispatcher: impl Into<String>, kind: impl Into<ErrorKind>) -> Self {
        Self {
            dispatcher: dispatcher.into(),
            kind: kind.into(),
        }
    }

    /// Diagnostic id of the dispatcher, e.g. `Dispatcher<api>`.
    pub fn dispatcher(&self) -> &str {
        &self.dispatcher
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }
}

/// What went wrong during registration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ErrorKind {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error(transparent)]
    Binding(#[from] BindingError),

    /// The bound method exists but has the wrong shape.
    #[error("error validating {type_name}.{method}: {reason}")]
    Signature {
        type_name: String,
        method: String,
        reason: SignatureError,
    },
}

/// Invalid arguments to `register` or an empty binding list.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("argument 'as' cannot be empty")]
    EmptyName,

    /// The controller registered under this name declares no bindings.
    #[error("type '{0}' returns 0 bindings")]
    NoBindings(String),
}

/// A binding that cannot be resolved.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BindingError {
    #[error("could not find method '{method}' in type '{type_name}'")]
    MethodNotFound { method: String, type_name: String },

    #[error("invalid HTTP method '{method}' for path '{path}'")]
    InvalidMethod { method: String, path: String },
}

/// Shape mismatch between a bound method and the handler shape.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignatureError {
    #[error("wrong number of arguments: {0}, expect {expected}", expected = HANDLER_ARITY)]
    ArgumentCount(usize),

    #[error("1st argument type {0} does not implement ResponseSink")]
    NotResponseSink(String),

    #[error("2nd argument of type {got}, but expect {expected}")]
    NotRequest { got: String, expected: String },

    #[error("method has the handler shape but no invoker")]
    NotInvocable,
}

/// A request factory produced a controller of a type other than the one
/// registered under that name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{dispatcher}: for {method}, {path} NewController({name}) returned {got} but expected {expected}")]
pub struct ContractViolation {
    pub dispatcher: String,
    pub method: String,
    pub path: String,
    pub name: String,
    pub got: &'static str,
    pub expected: &'static str,
}
