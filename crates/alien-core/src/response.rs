//! HTTP Response types

use bytes::{Bytes, BytesMut};
use http::StatusCode;
use smallvec::SmallVec;
use std::fmt;

/// HTTP Response
///
/// Handlers and middleware write into it in call order, the way a response
/// writer is used.
#[derive(Debug, Clone)]
pub struct Response {
    /// Status code
    pub status: StatusCode,
    /// Response headers (stack-allocated for small header counts)
    pub headers: SmallVec<[(String, String); 8]>,
    /// Response body
    pub body: BytesMut,
}

impl Response {
    /// Create a new response
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: SmallVec::new(),
            body: BytesMut::new(),
        }
    }

    /// Create a 200 OK response
    pub fn ok() -> Self {
        Self::new(StatusCode::OK)
    }

    /// Create a text response
    pub fn text(body: impl AsRef<[u8]>) -> Self {
        let mut res = Self::ok();
        res.set_header("content-type", "text/plain; charset=utf-8");
        res.write(body);
        res
    }

    /// Create a 404 Not Found response
    pub fn not_found() -> Self {
        let mut res = Self::text("Not Found");
        res.status = StatusCode::NOT_FOUND;
        res
    }

    /// Create a 400 Bad Request response
    pub fn bad_request(message: &str) -> Self {
        let mut res = Self::text(message);
        res.status = StatusCode::BAD_REQUEST;
        res
    }

    /// Append bytes to the body
    pub fn write(&mut self, data: impl AsRef<[u8]>) {
        self.body.extend_from_slice(data.as_ref());
    }

    /// Set a header, replacing any existing value (case-insensitive)
    pub fn set_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self
            .headers
            .iter_mut()
            .find(|(k, _)| k.eq_ignore_ascii_case(&name))
        {
            Some(slot) => slot.1 = value,
            None => self.headers.push((name, value)),
        }
    }

    /// Get a header value
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Get body as string (if UTF-8)
    pub fn body_string(&self) -> Option<String> {
        std::str::from_utf8(&self.body).ok().map(|s| s.to_string())
    }

    /// Freeze the body for sending
    pub fn into_body(self) -> Bytes {
        self.body.freeze()
    }

    /// Serialize to HTTP/1.1 wire format
    pub fn to_http1_bytes(&self) -> Bytes {
        let mut buf = Vec::with_capacity(256 + self.body.len());

        // Status line
        buf.extend_from_slice(b"HTTP/1.1 ");
        buf.extend_from_slice(self.status.as_str().as_bytes());
        buf.push(b' ');
        buf.extend_from_slice(self.status.canonical_reason().unwrap_or("Unknown").as_bytes());
        buf.extend_from_slice(b"\r\n");

        for (name, value) in &self.headers {
            buf.extend_from_slice(name.as_bytes());
            buf.extend_from_slice(b": ");
            buf.extend_from_slice(value.as_bytes());
            buf.extend_from_slice(b"\r\n");
        }

        buf.extend_from_slice(b"content-length: ");
        buf.extend_from_slice(self.body.len().to_string().as_bytes());
        buf.extend_from_slice(b"\r\n\r\n");

        buf.extend_from_slice(&self.body);

        Bytes::from(buf)
    }
}

impl Default for Response {
    fn default() -> Self {
        Self::ok()
    }
}

/// Lets handlers use `write!` on the response body
impl fmt::Write for Response {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.write(s);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fmt::Write;

    #[test]
    fn test_write_appends() {
        let mut res = Response::ok();
        res.write("alien");
        write!(res, "-{}", 42).unwrap();

        assert_eq!(res.body_string().as_deref(), Some("alien-42"));
        assert_eq!(res.status, StatusCode::OK);
    }

    #[test]
    fn test_not_found() {
        let res = Response::not_found();
        assert_eq!(res.status, StatusCode::NOT_FOUND);
        assert_eq!(res.body_string().as_deref(), Some("Not Found"));
        assert_eq!(res.header("Content-Type"), Some("text/plain; charset=utf-8"));
    }

    #[test]
    fn test_set_header_replaces() {
        let mut res = Response::ok();
        res.set_header("X-Request-ID", "a");
        res.set_header("x-request-id", "b");

        assert_eq!(res.headers.len(), 1);
        assert_eq!(res.header("X-Request-Id"), Some("b"));
    }

    #[test]
    fn test_response_to_http1() {
        let mut res = Response::ok();
        res.set_header("x-custom", "value");
        res.write("Hello");

        let bytes = res.to_http1_bytes();
        let s = std::str::from_utf8(&bytes).unwrap();

        assert!(s.starts_with("HTTP/1.1 200 OK\r\n"));
        assert!(s.contains("x-custom: value\r\n"));
        assert!(s.contains("content-length: 5\r\n"));
        assert!(s.ends_with("\r\n\r\nHello"));
    }
}
