//! Incoming HTTP request type.

use bytes::Bytes;
use http::{HeaderMap, Method};

use crate::params::Params;

/// An incoming HTTP request, as seen by handlers.
///
/// The server builds one per inbound request. Callers that pool request
/// objects can recycle one with [`Request::reset`]; the router leaves
/// [`params`](Request::params) empty after every dispatch, so nothing bound
/// for one request is visible to the next.
///
/// [`path`](Request::path) is the raw, still percent-encoded request path and
/// routes match against that text. Parameter values are decoded one segment
/// at a time when bound, so `/users/john%20doe` binds `john doe` and an
/// encoded `%2F` never splits a segment.
#[derive(Debug)]
pub struct Request {
    pub(crate) method: Method,
    pub(crate) path: String,
    pub(crate) headers: HeaderMap,
    pub(crate) body: Bytes,
    pub(crate) params: Params,
}

impl Request {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            headers: HeaderMap::new(),
            body: Bytes::new(),
            params: Params::new(),
        }
    }

    pub(crate) fn from_parts(parts: http::request::Parts, body: Bytes) -> Self {
        Self {
            method: parts.method,
            path: parts.uri.path().to_owned(),
            headers: parts.headers,
            body,
            params: Params::new(),
        }
    }

    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// Re-targets a pooled request object. Headers and body are dropped,
    /// the parameter store is emptied but keeps its allocation.
    pub fn reset(&mut self, method: Method, path: &str) {
        self.method = method;
        self.path.clear();
        self.path.push_str(path);
        self.headers.clear();
        self.body = Bytes::new();
        self.params.clear();
    }

    pub fn method(&self) -> &Method { &self.method }
    pub fn path(&self) -> &str { &self.path }
    pub fn headers(&self) -> &HeaderMap { &self.headers }
    pub fn body(&self) -> &[u8] { &self.body }
    pub fn params(&self) -> &Params { &self.params }

    /// Header lookup. Header names are case-insensitive.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Returns a named path parameter.
    ///
    /// For a route `/users/:id`, `req.param("id")` on `/users/42` returns `Some("42")`.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key)
    }
}
