//! Response handling.
//!
//! # Responsibilities
//! - Define the [`ResponseSink`] capability handlers write to
//! - Record status, headers and body for conversion into an axum response
//!
//! # Design Decisions
//! - The first status written wins; later writes are logged and dropped
//! - Writing a body before any status implies `200 OK`

use axum::body::Body;
use axum::http::{HeaderMap, StatusCode};
use axum::response::Response;

/// A writable response: status code, headers, body.
pub trait ResponseSink {
    /// Headers sent with the response. Changes after the status is written are still kept.
    fn headers_mut(&mut self) -> &mut HeaderMap;

    /// Set the status code. Only the first call has an effect.
    fn write_status(&mut self, status: StatusCode);

    /// Append bytes to the body.
    fn write(&mut self, bytes: &[u8]);
}

/// Buffering [`ResponseSink`].
#[derive(Debug, Default)]
pub struct ResponseRecorder {
    status: Option<StatusCode>,
    headers: HeaderMap,
    body: Vec<u8>,
}

impl ResponseRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Status written so far, `200 OK` if none.
    pub fn status(&self) -> StatusCode {
        self.status.unwrap_or(StatusCode::OK)
    }

    /// Whether any status (explicit or implied) has been written.
    pub fn is_written(&self) -> bool {
        self.status.is_some()
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub fn into_response(self) -> Response {
        let status = self.status();
        let mut response = Response::new(Body::from(self.body));
        *response.status_mut() = status;
        *response.headers_mut() = self.headers;
        response
    }
}

impl ResponseSink for ResponseRecorder {
    fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    fn write_status(&mut self, status: StatusCode) {
        match self.status {
            Some(current) => {
                tracing::warn!(current = %current, ignored = %status, "superfluous status write");
            }
            None => self.status = Some(status),
        }
    }

    fn write(&mut self, bytes: &[u8]) {
        if self.status.is_none() {
            self.status = Some(StatusCode::OK);
        }
        self.body.extend_from_slice(bytes);
    }
}
