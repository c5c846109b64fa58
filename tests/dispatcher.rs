//! Registration validation and dispatch-time contract tests.

use std::any::type_name;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::http::{Method, StatusCode};
use di_dispatch::dispatch::{ConfigurationError, ErrorKind, Signature, SignatureError, TypeTag};
use di_dispatch::{
    ApplicationFactory, Binding, Controller, Dispatcher, MethodSet, Request, RequestFactory,
    ResponseSink, Router,
};

mod common;

struct PanicController;

impl PanicController {
    fn handle(&self, _rw: &mut dyn ResponseSink, _req: &Request) {}
}

impl Controller for PanicController {
    fn bindings(&self) -> Vec<Binding> {
        vec![Binding::new("GET", "/", "Handle")]
    }

    fn methods() -> MethodSet<Self> {
        MethodSet::new().handler("Handle", Self::handle)
    }
}

/// Serves as both factories, and always builds the wrong controller.
struct PanicFactory;

impl ApplicationFactory for PanicFactory {
    fn with<'a>(&'a self, _request: &'a Request) -> Box<dyn RequestFactory + 'a> {
        Box::new(PanicFactory)
    }
}

impl RequestFactory for PanicFactory {
    fn new_controller(&self, _name: &str) -> Box<dyn Controller> {
        Box::new(DummyController)
    }
}

struct DummyController;

impl Controller for DummyController {
    fn bindings(&self) -> Vec<Binding> {
        Vec::new()
    }

    fn methods() -> MethodSet<Self> {
        MethodSet::new().handler("Handle", |_: &Self, _: &mut dyn ResponseSink, _: &Request| {})
    }
}

struct DummyFactory;

impl ApplicationFactory for DummyFactory {
    fn with<'a>(&'a self, _request: &'a Request) -> Box<dyn RequestFactory + 'a> {
        Box::new(DummyRequestFactory)
    }
}

struct DummyRequestFactory;

impl RequestFactory for DummyRequestFactory {
    fn new_controller(&self, _name: &str) -> Box<dyn Controller> {
        Box::new(DummyController)
    }
}

struct MissingMethod;

impl Controller for MissingMethod {
    fn bindings(&self) -> Vec<Binding> {
        vec![Binding::new("GET", "/missing", "missing")]
    }

    fn methods() -> MethodSet<Self> {
        MethodSet::new()
    }
}

struct Unexported;

impl Unexported {
    // Wrong shape as well, but never listed in the method table.
    #[allow(dead_code)]
    fn method(&self) {}
}

impl Controller for Unexported {
    fn bindings(&self) -> Vec<Binding> {
        vec![Binding::new("GET", "/unexported", "method")]
    }

    fn methods() -> MethodSet<Self> {
        MethodSet::new()
    }
}

struct WrongNumber;

impl Controller for WrongNumber {
    fn bindings(&self) -> Vec<Binding> {
        vec![Binding::new("GET", "/wrongNumber", "Args")]
    }

    fn methods() -> MethodSet<Self> {
        MethodSet::new().method("Args", Signature::receiver::<Self>())
    }
}

struct WrongFirst;

impl Controller for WrongFirst {
    fn bindings(&self) -> Vec<Binding> {
        vec![Binding::new("GET", "/wrongFirst", "Arg")]
    }

    fn methods() -> MethodSet<Self> {
        MethodSet::new().method(
            "Arg",
            Signature::receiver::<Self>().arg::<Request>().arg::<Request>(),
        )
    }
}

struct WrongSecond;

impl Controller for WrongSecond {
    fn bindings(&self) -> Vec<Binding> {
        vec![Binding::new("GET", "/wrongSecond", "Arg")]
    }

    fn methods() -> MethodSet<Self> {
        MethodSet::new().method(
            "Arg",
            Signature::receiver::<Self>()
                .sink::<dyn ResponseSink>()
                .sink::<dyn ResponseSink>(),
        )
    }
}

fn validate_case<C: Controller>(dispatcher: &mut Dispatcher, controller: C, name: &str, expected: &str) {
    let err = dispatcher
        .register(controller, name)
        .expect_err("registration should fail");
    assert_eq!(err.to_string(), expected);
}

#[test]
fn test_validation_errors() {
    let mut dis = Dispatcher::new("ValidateErrors", Router::new(), Arc::new(DummyFactory));
    let prefix = "Dispatcher<ValidateErrors>";

    validate_case(
        &mut dis,
        DummyController,
        "",
        &format!("{prefix}: argument 'as' cannot be empty"),
    );
    validate_case(
        &mut dis,
        DummyController,
        "dummy",
        &format!("{prefix}: type 'dummy' returns 0 bindings"),
    );
    validate_case(
        &mut dis,
        MissingMethod,
        "missing",
        &format!("{prefix}: could not find method 'missing' in type 'MissingMethod'"),
    );
    validate_case(
        &mut dis,
        Unexported,
        "unexported",
        &format!("{prefix}: could not find method 'method' in type 'Unexported'"),
    );
    validate_case(
        &mut dis,
        WrongNumber,
        "wrongNumber",
        &format!("{prefix}: error validating WrongNumber.Args: wrong number of arguments: 1, expect 3"),
    );
    validate_case(
        &mut dis,
        WrongFirst,
        "wrongFirst",
        &format!(
            "{prefix}: error validating WrongFirst.Arg: 1st argument type Request does not implement ResponseSink"
        ),
    );
    validate_case(
        &mut dis,
        WrongSecond,
        "wrongSecond",
        &format!(
            "{prefix}: error validating WrongSecond.Arg: 2nd argument of type dyn ResponseSink, but expect Request"
        ),
    );

    assert!(dis.router().is_empty());
    assert!(dis.routes().is_empty());
}

#[test]
fn test_error_kinds() {
    let mut dis = Dispatcher::new("kinds", Router::new(), Arc::new(DummyFactory));

    let err = dis.register(DummyController, "dummy").unwrap_err();
    assert_eq!(
        err.kind(),
        &ErrorKind::Configuration(ConfigurationError::NoBindings("dummy".into()))
    );

    let err = dis.register(WrongNumber, "wrongNumber").unwrap_err();
    assert_eq!(
        err.kind(),
        &ErrorKind::Signature {
            type_name: "WrongNumber".into(),
            method: "Args".into(),
            reason: SignatureError::ArgumentCount(1),
        }
    );
    assert_eq!(dis.registered_type("wrongNumber"), None);
}

struct Partial;

impl Partial {
    fn ok(&self, rw: &mut dyn ResponseSink, _req: &Request) {
        rw.write_status(StatusCode::OK);
    }
}

impl Controller for Partial {
    fn bindings(&self) -> Vec<Binding> {
        vec![
            Binding::new("GET", "/first", "Ok"),
            Binding::new("GET", "/second", "Missing"),
            Binding::new("GET", "/third", "Ok"),
        ]
    }

    fn methods() -> MethodSet<Self> {
        MethodSet::new().handler("Ok", Self::ok)
    }
}

#[test]
fn test_registration_stops_at_first_bad_binding() {
    let mut dis = Dispatcher::new("partial", Router::new(), Arc::new(DummyFactory));
    let err = dis.register(Partial, "partial").unwrap_err();
    assert_eq!(
        err.to_string(),
        "Dispatcher<partial>: could not find method 'Missing' in type 'Partial'"
    );

    assert!(dis.router().contains(&Method::GET, "/first"));
    assert!(!dis.router().contains(&Method::GET, "/third"));
    assert_eq!(dis.registered_type("partial"), None);
}

#[test]
fn test_serve_panics_on_wrong_controller_type() {
    let mut dispatcher = Dispatcher::new("panic", Router::new(), Arc::new(PanicFactory));
    // registered with PanicController, however PanicFactory returns DummyController
    dispatcher.register(PanicController, "panic").unwrap();
    let router = dispatcher.into_router();

    let req = common::request(Method::GET, "/");
    let payload = panic::catch_unwind(AssertUnwindSafe(|| common::serve(&router, &req)))
        .expect_err("dispatch should panic");
    let message = payload
        .downcast_ref::<String>()
        .expect("panic payload should be a formatted message");

    let expected = format!(
        "Dispatcher<panic>: for GET, / NewController(panic) returned {} but expected {}",
        type_name::<DummyController>(),
        type_name::<PanicController>()
    );
    assert_eq!(message, &expected);
}

#[test]
#[should_panic(expected = "argument 'name' cannot be empty")]
fn test_new_panics_on_empty_name() {
    Dispatcher::builder("").build();
}

#[test]
#[should_panic(expected = "argument 'router' cannot be nil")]
fn test_new_panics_without_router() {
    Dispatcher::builder("notempty").build();
}

#[test]
#[should_panic(expected = "argument 'factory' cannot be nil")]
fn test_new_panics_without_factory() {
    Dispatcher::builder("notempty").router(Router::new()).build();
}

#[test]
#[should_panic(expected = "argument 'name' cannot be empty")]
fn test_name_checked_before_router() {
    Dispatcher::new("", Router::new(), Arc::new(DummyFactory));
}

struct Counter {
    calls: Arc<AtomicUsize>,
}

impl Counter {
    fn hit(&self, rw: &mut dyn ResponseSink, req: &Request) {
        self.calls.fetch_add(1, Ordering::SeqCst);
        rw.write_status(StatusCode::ACCEPTED);
        rw.write(req.form_value("id").as_bytes());
    }
}

impl Controller for Counter {
    fn bindings(&self) -> Vec<Binding> {
        vec![Binding::new("PUT", "/hit", "Hit")]
    }

    fn methods() -> MethodSet<Self> {
        MethodSet::new().handler("Hit", Self::hit)
    }
}

/// Counts factory calls and hands every controller the same handler counter.
struct CountingFactory {
    scopes: AtomicUsize,
    calls: Arc<AtomicUsize>,
}

struct CountingScope<'a> {
    app: &'a CountingFactory,
}

impl ApplicationFactory for CountingFactory {
    fn with<'a>(&'a self, _request: &'a Request) -> Box<dyn RequestFactory + 'a> {
        self.scopes.fetch_add(1, Ordering::SeqCst);
        Box::new(CountingScope { app: self })
    }
}

impl RequestFactory for CountingScope<'_> {
    fn new_controller(&self, name: &str) -> Box<dyn Controller> {
        assert_eq!(name, "counter");
        Box::new(Counter {
            calls: Arc::clone(&self.app.calls),
        })
    }
}

#[test]
fn test_dispatch_builds_one_scope_and_one_call_per_request() {
    let calls = Arc::new(AtomicUsize::new(0));
    let factory = Arc::new(CountingFactory {
        scopes: AtomicUsize::new(0),
        calls: Arc::clone(&calls),
    });
    let mut dispatcher = Dispatcher::new("count", Router::new(), factory.clone());
    dispatcher
        .register(
            Counter {
                calls: Arc::new(AtomicUsize::new(0)),
            },
            "counter",
        )
        .unwrap();
    assert_eq!(dispatcher.registered_type("counter"), Some(TypeTag::of::<Counter>()));
    let router = dispatcher.into_router();

    let rec = common::serve(&router, &common::request(Method::PUT, "/hit?id=7"));
    assert_eq!(rec.status(), StatusCode::ACCEPTED);
    assert_eq!(rec.body(), b"7");
    assert_eq!(factory.scopes.load(Ordering::SeqCst), 1);
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    // Misses never reach the factory.
    let rec = common::serve(&router, &common::request(Method::GET, "/hit"));
    assert_eq!(rec.status(), StatusCode::METHOD_NOT_ALLOWED);
    let rec = common::serve(&router, &common::request(Method::PUT, "/miss"));
    assert_eq!(rec.status(), StatusCode::NOT_FOUND);
    assert_eq!(factory.scopes.load(Ordering::SeqCst), 1);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_reregistering_name_with_other_type_is_allowed() {
    let mut dispatcher = Dispatcher::new("rereg", Router::new(), Arc::new(DummyFactory));
    dispatcher.register(PanicController, "shared").unwrap();
    dispatcher.register(Partial, "shared").unwrap_err();
    assert_eq!(dispatcher.registered_type("shared"), Some(TypeTag::of::<PanicController>()));

    dispatcher
        .register(
            Counter {
                calls: Arc::new(AtomicUsize::new(0)),
            },
            "shared",
        )
        .unwrap();
    assert_eq!(dispatcher.registered_type("shared"), Some(TypeTag::of::<Counter>()));
    assert_eq!(dispatcher.routes().len(), 3);
}

struct RecorderArg;

impl Controller for RecorderArg {
    fn bindings(&self) -> Vec<Binding> {
        vec![Binding::new("GET", "/recorder", "Arg")]
    }

    fn methods() -> MethodSet<Self> {
        MethodSet::new().method(
            "Arg",
            Signature::receiver::<Self>()
                .arg::<di_dispatch::ResponseRecorder>()
                .arg::<Request>(),
        )
    }
}

#[test]
fn test_concrete_sink_parameter_passes_shape_check() {
    let mut dis = Dispatcher::new("x", Router::new(), Arc::new(DummyFactory));
    let err = dis.register(RecorderArg, "recorder").unwrap_err();
    assert_eq!(
        err.kind(),
        &ErrorKind::Signature {
            type_name: "RecorderArg".into(),
            method: "Arg".into(),
            reason: SignatureError::NotInvocable,
        }
    );
}
