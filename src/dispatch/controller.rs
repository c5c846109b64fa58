//! Controllers and their exported method tables.
//!
//! # Responsibilities
//! - Define the [`Controller`] capability
//! - Record which methods a controller exports, with their shapes
//! - Provide the type identity used for the dispatch-time check
//!
//! # Design Decisions
//! - A method not listed in [`MethodSet`] is not exported and never resolved
//! - Handler-shaped methods carry a typed invoker, so calling them needs no
//!   reflection
//! - Other shapes are listed with their [`Signature`] only, for diagnostics

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::dispatch::binding::Binding;
use crate::dispatch::signature::{Signature, TypeTag};
use crate::http::{Request, ResponseSink};

/// Calls a validated handler method on a controller instance.
pub type Invoker<C> = Arc<dyn Fn(&C, &mut dyn ResponseSink, &Request) + Send + Sync>;

/// Type identity of a value behind a trait object.
pub trait AsAny: Any {
    fn as_any(&self) -> &dyn Any;

    fn type_tag(&self) -> TypeTag;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn type_tag(&self) -> TypeTag {
        TypeTag::of::<T>()
    }
}

/// Something that serves requests through bound handler methods.
///
/// ```ignore
/// impl Controller for Greeter {
///     fn bindings(&self) -> Vec<Binding> {
///         vec![Binding::new("GET", "/hello", "Hello")]
///     }
///
///     fn methods() -> MethodSet<Self> {
///         MethodSet::new().handler("Hello", Self::hello)
///     }
/// }
/// ```
pub trait Controller: AsAny {
    /// Routes this controller wants dispatched to it.
    fn bindings(&self) -> Vec<Binding>;

    /// Exported methods of this controller type.
    fn methods() -> MethodSet<Self>
    where
        Self: Sized;
}

/// A method exported by a controller type.
pub struct ExportedMethod<C> {
    name: &'static str,
    signature: Signature,
    invoker: Option<Invoker<C>>,
}

impl<C> ExportedMethod<C> {
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    /// Present only for methods declared via [`MethodSet::handler`].
    pub fn invoker(&self) -> Option<&Invoker<C>> {
        self.invoker.as_ref()
    }
}

impl<C> fmt::Debug for ExportedMethod<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExportedMethod")
            .field("name", &self.name)
            .field("signature", &self.signature)
            .field("invocable", &self.invoker.is_some())
            .finish()
    }
}

/// Exported method table of controller type `C`.
pub struct MethodSet<C> {
    methods: Vec<ExportedMethod<C>>,
}

impl<C: 'static> MethodSet<C> {
    pub fn new() -> Self {
        Self {
            methods: Vec::new(),
        }
    }

    /// Export a request handler under `name`.
    pub fn handler<F>(mut self, name: &'static str, handler: F) -> Self
    where
        F: Fn(&C, &mut dyn ResponseSink, &Request) + Send + Sync + 'static,
    {
        self.methods.push(ExportedMethod {
            name,
            signature: Signature::handler::<C>(),
            invoker: Some(Arc::new(handler)),
        });
        self
    }

    /// Export a method that is not a request handler.
    pub fn method(mut self, name: &'static str, signature: Signature) -> Self {
        self.methods.push(ExportedMethod {
            name,
            signature,
            invoker: None,
        });
        self
    }

    /// Look up an exported method. Later declarations shadow earlier ones.
    pub fn get(&self, name: &str) -> Option<&ExportedMethod<C>> {
        self.methods.iter().rev().find(|m| m.name == name)
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.methods.iter().map(|m| m.name)
    }

    pub fn len(&self) -> usize {
        self.methods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }
}

impl<C: 'static> Default for MethodSet<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> fmt::Debug for MethodSet<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(&self.methods).finish()
    }
}
