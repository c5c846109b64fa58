//! Request handling.
//!
//! # Responsibilities
//! - Generate unique request ID (UUID v4) for every inbound request
//! - Buffer the body (bounded) into an immutable [`Request`] value
//! - Expose routing-relevant information (method, path) and form values
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing
//! - Body size limit enforced while buffering, never after
//! - Handlers receive `&Request`; nothing downstream can mutate it

use std::borrow::Cow;

use axum::body::{Body, Bytes};
use axum::http::{header, HeaderMap, HeaderName, HeaderValue, Method, Uri};
use thiserror::Error;
use tower_http::request_id::{MakeRequestId, RequestId};
use url::form_urlencoded;
use uuid::Uuid;

/// Header carrying the request correlation ID.
pub const X_REQUEST_ID: &str = "x-request-id";

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Error raised while turning a wire request into a [`Request`].
#[derive(Debug, Error)]
pub enum BodyError {
    /// The body could not be read, or exceeded the configured limit.
    #[error("failed to read request body: {0}")]
    Read(#[from] axum::Error),
}

/// Generates `x-request-id` values from random UUIDs.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidRequestId;

impl MakeRequestId for UuidRequestId {
    fn make_request_id<B>(&mut self, _request: &axum::http::Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

/// Immutable, fully buffered HTTP request handed to handlers.
#[derive(Debug, Clone)]
pub struct Request {
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
}

impl Request {
    /// Create a request with no headers and an empty body.
    pub fn new(method: Method, uri: Uri) -> Self {
        Self {
            method,
            uri,
            headers: HeaderMap::new(),
            body: Bytes::new(),
        }
    }

    /// Add a header, replacing any previous value for the same name.
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Replace the body.
    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// Buffer an axum request, reading at most `limit` body bytes.
    pub async fn from_http(request: axum::http::Request<Body>, limit: usize) -> Result<Self, BodyError> {
        let (parts, body) = request.into_parts();
        let body = axum::body::to_bytes(body, limit).await?;
        Ok(Self {
            method: parts.method,
            uri: parts.uri,
            headers: parts.headers,
            body,
        })
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    /// Path component of the URI, without the query string.
    pub fn path(&self) -> &str {
        self.uri.path()
    }

    pub fn query(&self) -> Option<&str> {
        self.uri.query()
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Correlation ID assigned by the request ID layer, if any.
    pub fn request_id(&self) -> Option<&str> {
        self.headers.get(X_REQUEST_ID).and_then(|v| v.to_str().ok())
    }

    /// First value for `key`, or an empty string.
    ///
    /// Urlencoded body values of POST, PUT and PATCH requests take precedence
    /// over query string values.
    pub fn form_value(&self, key: &str) -> String {
        self.form_pairs()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.into_owned())
            .unwrap_or_default()
    }

    fn form_pairs(&self) -> impl Iterator<Item = (Cow<'_, str>, Cow<'_, str>)> + '_ {
        let body: &[u8] = if self.has_form_body() { &self.body } else { &[] };
        let query = self.uri.query().unwrap_or_default().as_bytes();
        form_urlencoded::parse(body).chain(form_urlencoded::parse(query))
    }

    fn has_form_body(&self) -> bool {
        let accepts_body = matches!(self.method, Method::POST | Method::PUT | Method::PATCH);
        accepts_body
            && self
                .headers
                .get(header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .map(|ct| ct.starts_with(FORM_CONTENT_TYPE))
                .unwrap_or(false)
    }
}
