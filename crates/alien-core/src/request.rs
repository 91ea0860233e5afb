//! HTTP Request types

use crate::Method;
use alien_router::Params;
use smallvec::SmallVec;

/// HTTP Request
///
/// Doubles as the request-scoped context: the router stores the captured
/// path parameters here before any middleware or handler runs.
#[derive(Debug, Clone)]
pub struct Request {
    /// HTTP method
    pub method: Method,
    /// Request path (without query string)
    pub path: String,
    /// Query string (without leading ?)
    pub query: Option<String>,
    /// Request headers (stack-allocated for small header counts)
    pub headers: SmallVec<[(String, String); 16]>,
    /// Request body
    pub body: bytes::Bytes,
    /// Route parameters (populated by the router)
    pub params: Params,
}

impl Request {
    /// Create a new request
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: None,
            headers: SmallVec::new(),
            body: bytes::Bytes::new(),
            params: Params::new(),
        }
    }

    /// Get a header value (case-insensitive)
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Get a route parameter
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name)
    }

    /// All route parameters, in capture order
    pub fn params(&self) -> &Params {
        &self.params
    }
}

/// Parameters the router captured for this request
pub fn get_params(req: &Request) -> &Params {
    &req.params
}

/// Builder for constructing requests
pub struct RequestBuilder {
    request: Request,
}

impl RequestBuilder {
    /// Create a new builder
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            request: Request::new(method, path),
        }
    }

    /// Set query string
    pub fn query(mut self, query: impl Into<String>) -> Self {
        self.request.query = Some(query.into());
        self
    }

    /// Add a header
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.request.headers.push((name.into(), value.into()));
        self
    }

    /// Set body
    pub fn body(mut self, body: impl Into<bytes::Bytes>) -> Self {
        self.request.body = body.into();
        self
    }

    /// Build the request
    pub fn build(self) -> Request {
        self.request
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_header() {
        let req = RequestBuilder::new(Method::Get, "/")
            .header("X-Request-ID", "abc")
            .build();

        assert_eq!(req.header("x-request-id"), Some("abc"));
        assert_eq!(req.header("X-REQUEST-ID"), Some("abc"));
        assert_eq!(req.header("accept"), None);
    }

    #[test]
    fn test_fresh_request_has_no_params() {
        let req = RequestBuilder::new(Method::Post, "/users")
            .query("page=2")
            .body("payload")
            .build();

        assert!(get_params(&req).is_empty());
        assert_eq!(req.param("id"), None);
        assert_eq!(req.query.as_deref(), Some("page=2"));
        assert_eq!(&req.body[..], b"payload");
    }
}
