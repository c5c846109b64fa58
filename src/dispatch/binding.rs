//! Route-to-method declarations.

use std::fmt;

/// Declares that requests to `(method, path)` are served by the controller
/// method named `handler`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Binding {
    pub method: &'static str,
    pub path: &'static str,
    pub handler: &'static str,
}

impl Binding {
    pub const fn new(method: &'static str, path: &'static str, handler: &'static str) -> Self {
        Self {
            method,
            path,
            handler,
        }
    }
}

impl fmt::Display for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} -> {}", self.method, self.path, self.handler)
    }
}
