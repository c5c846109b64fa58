//! Handler shape descriptions.
//!
//! A [`Signature`] lists every parameter of an exported controller method,
//! the receiver included, so a binding that names a method with the wrong
//! shape is reported precisely instead of failing to compile somewhere far
//! from the binding declaration.

use std::any::{type_name, TypeId};
use std::fmt;

use crate::dispatch::error::SignatureError;
use crate::http::{Request, ResponseRecorder, ResponseSink};

/// Parameters of a handler: receiver, response sink, request.
pub const HANDLER_ARITY: usize = 3;

/// Runtime identity of a type plus its name for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeTag {
    id: TypeId,
    name: &'static str,
}

impl TypeTag {
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
        }
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    /// Fully qualified name, e.g. `di_dispatch::http::request::Request`.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Name with module paths stripped, e.g. `Request`.
    pub fn short_name(&self) -> String {
        short_type_name(self.name)
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Strip every `path::` prefix from a type name, generics included.
pub fn short_type_name(full: &str) -> String {
    let mut out = String::with_capacity(full.len());
    let mut segment_start = 0;
    let mut chars = full.chars().peekable();
    while let Some(c) = chars.next() {
        if c == ':' && chars.peek() == Some(&':') {
            chars.next();
            out.truncate(segment_start);
            continue;
        }
        out.push(c);
        if !(c.is_alphanumeric() || c == '_') {
            segment_start = out.len();
        }
    }
    out
}

/// Whether `tag` names one of the [`ResponseSink`] types defined by this crate.
fn is_known_sink(tag: TypeTag) -> bool {
    [
        TypeTag::of::<dyn ResponseSink>(),
        TypeTag::of::<ResponseRecorder>(),
    ]
    .iter()
    .any(|known| known.id() == tag.id())
}

/// One parameter slot of a method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamType {
    tag: TypeTag,
    response_sink: bool,
}

impl ParamType {
    pub fn tag(&self) -> TypeTag {
        self.tag
    }

    /// Whether the parameter type implements [`ResponseSink`].
    pub fn is_response_sink(&self) -> bool {
        self.response_sink
    }
}

/// Ordered parameter list of an exported method, receiver first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    params: Vec<ParamType>,
}

impl Signature {
    /// A signature holding only the receiver `C`.
    pub fn receiver<C: 'static>() -> Self {
        Self {
            params: vec![ParamType {
                tag: TypeTag::of::<C>(),
                response_sink: false,
            }],
        }
    }

    /// The fixed handler shape `(&C, &mut dyn ResponseSink, &Request)`.
    pub fn handler<C: 'static>() -> Self {
        Self::receiver::<C>()
            .sink::<dyn ResponseSink>()
            .arg::<Request>()
    }

    /// Append a parameter of type `T`.
    ///
    /// The crate's own sink types are recognised here; other implementors of
    /// [`ResponseSink`] are declared through [`Signature::sink`].
    pub fn arg<T: ?Sized + 'static>(mut self) -> Self {
        let tag = TypeTag::of::<T>();
        self.params.push(ParamType {
            tag,
            response_sink: is_known_sink(tag),
        });
        self
    }

    /// Append a parameter of type `T` usable as a response sink.
    pub fn sink<T: ResponseSink + ?Sized + 'static>(mut self) -> Self {
        self.params.push(ParamType {
            tag: TypeTag::of::<T>(),
            response_sink: true,
        });
        self
    }

    /// Parameter count, receiver included.
    pub fn arity(&self) -> usize {
        self.params.len()
    }

    pub fn params(&self) -> &[ParamType] {
        &self.params
    }

    /// Check that this is the handler shape: three slots, a response sink
    /// second and exactly [`Request`] third.
    pub fn check_handler_shape(&self) -> Result<(), SignatureError> {
        if self.arity() != HANDLER_ARITY {
            return Err(SignatureError::ArgumentCount(self.arity()));
        }
        let sink = self.params[1];
        if !sink.is_response_sink() {
            return Err(SignatureError::NotResponseSink(sink.tag().short_name()));
        }
        let request = self.params[2].tag();
        let expected = TypeTag::of::<Request>();
        if request.id() != expected.id() {
            return Err(SignatureError::NotRequest {
                got: request.short_name(),
                expected: expected.short_name(),
            });
        }
        Ok(())
    }
}
