//! Binding validation and request dispatch.
//!
//! # Responsibilities
//! - Validate every binding of a controller against its exported methods
//! - Install one dispatch closure per binding into the [`Router`]
//! - Per request: drive the factory pair, check the controller type, invoke
//!
//! # Design Decisions
//! - Registration fails fast: the first bad binding aborts `register`
//! - The registry is append-only and frozen once serving starts
//! - A factory returning the wrong controller type is a programming defect;
//!   the dispatch closure panics instead of answering with an error status

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use axum::http::Method;

use crate::dispatch::binding::Binding;
use crate::dispatch::controller::{Controller, Invoker, MethodSet};
use crate::dispatch::error::{
    BindingError, ConfigurationError, ContractViolation, DispatchError, ErrorKind, SignatureError,
};
use crate::dispatch::factory::ApplicationFactory;
use crate::dispatch::signature::TypeTag;
use crate::http::{Request, ResponseSink};
use crate::routing::Router;

/// A validated `(method, path)` → controller method mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteRecord {
    pub method: Method,
    pub path: &'static str,
    /// Name the controller was registered as.
    pub controller: String,
    pub handler: &'static str,
    pub controller_type: TypeTag,
}

/// Validates controllers and routes requests to freshly built instances.
pub struct Dispatcher {
    name: String,
    router: Router,
    factory: Arc<dyn ApplicationFactory>,
    registry: HashMap<String, TypeTag>,
    routes: Vec<RouteRecord>,
}

/// Collects the arguments of a [`Dispatcher`].
pub struct DispatcherBuilder {
    name: String,
    router: Option<Router>,
    factory: Option<Arc<dyn ApplicationFactory>>,
}

impl DispatcherBuilder {
    pub fn router(mut self, router: Router) -> Self {
        self.router = Some(router);
        self
    }

    pub fn factory<F: ApplicationFactory + 'static>(self, factory: F) -> Self {
        self.shared_factory(Arc::new(factory))
    }

    pub fn shared_factory(mut self, factory: Arc<dyn ApplicationFactory>) -> Self {
        self.factory = Some(factory);
        self
    }

    /// # Panics
    ///
    /// If the name is empty, or the router or factory was never supplied.
    pub fn build(self) -> Dispatcher {
        if self.name.is_empty() {
            panic!("argument 'name' cannot be empty");
        }
        let Some(router) = self.router else {
            panic!("argument 'router' cannot be nil");
        };
        let Some(factory) = self.factory else {
            panic!("argument 'factory' cannot be nil");
        };
        Dispatcher {
            name: self.name,
            router,
            factory,
            registry: HashMap::new(),
            routes: Vec::new(),
        }
    }
}

impl Dispatcher {
    pub fn builder(name: impl Into<String>) -> DispatcherBuilder {
        DispatcherBuilder {
            name: name.into(),
            router: None,
            factory: None,
        }
    }

    /// # Panics
    ///
    /// If `name` is empty.
    pub fn new(name: impl Into<String>, router: Router, factory: Arc<dyn ApplicationFactory>) -> Self {
        Self::builder(name)
            .router(router)
            .shared_factory(factory)
            .build()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Validate the bindings of `controller` and route them to instances
    /// created by the request factory under `name`.
    ///
    /// `controller` is only used to enumerate bindings and fix the expected
    /// type; it is dropped afterwards. Bindings installed before a failing one
    /// stay installed.
    pub fn register<C: Controller>(&mut self, controller: C, name: &str) -> Result<(), DispatchError> {
        if name.is_empty() {
            return Err(self.error(ConfigurationError::EmptyName));
        }

        let bindings = controller.bindings();
        if bindings.is_empty() {
            return Err(self.error(ConfigurationError::NoBindings(name.to_string())));
        }

        let expected = TypeTag::of::<C>();
        let methods = C::methods();
        for binding in bindings {
            let invoker = self.resolve(&methods, &binding, expected)?;
            let method = Method::from_bytes(binding.method.as_bytes()).map_err(|_| {
                self.error(BindingError::InvalidMethod {
                    method: binding.method.to_string(),
                    path: binding.path.to_string(),
                })
            })?;
            self.install::<C>(method.clone(), &binding, name, invoker);

            tracing::debug!(
                dispatcher = %self,
                method = %method,
                path = binding.path,
                controller = name,
                handler = binding.handler,
                "Route registered"
            );
            self.routes.push(RouteRecord {
                method,
                path: binding.path,
                controller: name.to_string(),
                handler: binding.handler,
                controller_type: expected,
            });
        }

        if let Some(previous) = self.registry.insert(name.to_string(), expected) {
            if previous != expected {
                tracing::warn!(
                    dispatcher = %self,
                    controller = name,
                    previous = previous.name(),
                    current = expected.name(),
                    "Controller name re-registered with a different type"
                );
            }
        }
        Ok(())
    }

    /// Type registered under `name`, if any.
    pub fn registered_type(&self, name: &str) -> Option<TypeTag> {
        self.registry.get(name).copied()
    }

    /// Every route installed so far, in registration order.
    pub fn routes(&self) -> &[RouteRecord] {
        &self.routes
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    /// Finish registration and hand the route table over for serving.
    pub fn into_router(self) -> Router {
        self.router
    }

    fn resolve<C: Controller>(
        &self,
        methods: &MethodSet<C>,
        binding: &Binding,
        expected: TypeTag,
    ) -> Result<Invoker<C>, DispatchError> {
        let Some(method) = methods.get(binding.handler) else {
            return Err(self.error(BindingError::MethodNotFound {
                method: binding.handler.to_string(),
                type_name: expected.short_name(),
            }));
        };

        let signature_error = |reason: SignatureError| {
            self.error(ErrorKind::Signature {
                type_name: expected.short_name(),
                method: binding.handler.to_string(),
                reason,
            })
        };
        method
            .signature()
            .check_handler_shape()
            .map_err(&signature_error)?;
        method
            .invoker()
            .cloned()
            .ok_or_else(|| signature_error(SignatureError::NotInvocable))
    }

    fn install<C: Controller>(&mut self, method: Method, binding: &Binding, name: &str, invoker: Invoker<C>) {
        let factory = Arc::clone(&self.factory);
        let dispatcher = self.to_string();
        let name = name.to_string();
        let path = binding.path;
        let expected = TypeTag::of::<C>();
        let method_name = method.to_string();

        self.router
            .handle_func(method, path, move |sink: &mut dyn ResponseSink, request: &Request| {
                let request_factory = factory.with(request);
                let instance = request_factory.new_controller(&name);
                let instance: &dyn Controller = &*instance;

                let Some(controller) = instance.as_any().downcast_ref::<C>() else {
                    let violation = ContractViolation {
                        dispatcher: dispatcher.clone(),
                        method: method_name.clone(),
                        path: path.to_string(),
                        name: name.clone(),
                        got: instance.type_tag().name(),
                        expected: expected.name(),
                    };
                    tracing::error!(
                        request_id = request.request_id().unwrap_or("unknown"),
                        "{violation}"
                    );
                    panic!("{violation}");
                };
                invoker(controller, sink, request);
            });
    }

    fn error(&self, kind: impl Into<ErrorKind>) -> DispatchError {
        DispatchError::new(self.to_string(), kind)
    }
}

impl fmt::Display for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Dispatcher<{}>", self.name)
    }
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("name", &self.name)
            .field("router", &self.router)
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}
