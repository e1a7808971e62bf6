//! HTTP request context handed to error handlers.
//!
//! By the time error middleware runs, the request mostly serves as read-only
//! context for building a response. Body consumption stays lazy, so stages
//! that never look at the body pay nothing for it.

use bytes::Bytes;
use http_body_util::BodyExt;
use hyper::{Method, Request, Uri, body::Incoming, header};
use std::collections::HashMap;
use std::fmt;
use std::io;
use std::sync::{Arc, Mutex};

/// Lazy body consumer. The body is only collected on first access.
#[derive(Clone)]
enum Body {
    Streaming(Arc<Mutex<Option<Incoming>>>),
    Consumed(Bytes),
}

/// HTTP request with lazily consumed body.
#[derive(Clone)]
pub struct Req {
    method: Method,
    uri: Uri,
    headers: header::HeaderMap,
    body: Body,
    path_params: HashMap<String, String>,
}

impl Req {
    /// Create from a hyper request.
    pub fn from_hyper(req: Request<Incoming>) -> Self {
        let (parts, body) = req.into_parts();

        Self {
            method: parts.method,
            uri: parts.uri,
            headers: parts.headers,
            body: Body::Streaming(Arc::new(Mutex::new(Some(body)))),
            path_params: HashMap::new(),
        }
    }

    /// Create a bodyless request, mainly useful outside a real server.
    pub fn new(method: Method, uri: Uri) -> Self {
        Self {
            method,
            uri,
            headers: header::HeaderMap::new(),
            body: Body::Consumed(Bytes::new()),
            path_params: HashMap::new(),
        }
    }

    /// Get HTTP method.
    #[inline]
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Get request URI.
    #[inline]
    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    /// Get request path.
    #[inline]
    pub fn path(&self) -> &str {
        self.uri.path()
    }

    /// Get query string.
    #[inline]
    pub fn query(&self) -> Option<&str> {
        self.uri.query()
    }

    /// Get header value by name.
    #[inline]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|value| value.to_str().ok())
    }

    /// Get all headers.
    #[inline]
    pub fn headers(&self) -> &header::HeaderMap {
        &self.headers
    }

    /// Set a header, replacing any previous value. Invalid names or values
    /// are ignored.
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        if let (Ok(name), Ok(value)) = (
            name.parse::<header::HeaderName>(),
            value.parse::<header::HeaderValue>(),
        ) {
            self.headers.insert(name, value);
        }
        self
    }

    /// Get path parameter by name.
    #[inline]
    pub fn param(&self, name: &str) -> Option<&str> {
        self.path_params.get(name).map(|value| value.as_str())
    }

    /// Get all path parameters.
    #[inline]
    pub fn params(&self) -> &HashMap<String, String> {
        &self.path_params
    }

    /// Set path parameters, normally done by the hosting router.
    pub fn set_path_params(&mut self, params: HashMap<String, String>) {
        self.path_params = params;
    }

    /// Consume and read request body as bytes (lazy evaluation).
    /// Cached after the first read.
    pub async fn body(&mut self) -> io::Result<&Bytes> {
        let streaming = match &self.body {
            Body::Consumed(_) => None,
            Body::Streaming(incoming) => Some(Arc::clone(incoming)),
        };

        if let Some(incoming) = streaming {
            let taken = incoming.lock().unwrap().take();

            let Some(incoming_body) = taken else {
                return Err(io::Error::other("request body already consumed"));
            };

            let collected = incoming_body.collect().await.map_err(io::Error::other)?;
            self.body = Body::Consumed(collected.to_bytes());
        }

        match &self.body {
            Body::Consumed(bytes) => Ok(bytes),
            Body::Streaming(_) => unreachable!(),
        }
    }

    /// Get content type header value.
    #[inline]
    pub fn content_type(&self) -> Option<&str> {
        self.header(header::CONTENT_TYPE.as_str())
    }

    /// Check if Content-Type is JSON.
    #[inline]
    pub fn is_json(&self) -> bool {
        self.content_type()
            .map(|ct| ct.contains("application/json"))
            .unwrap_or(false)
    }
}

impl fmt::Debug for Req {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Req")
            .field("method", &self.method)
            .field("uri", &self.uri)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bodyless_requests_expose_their_parts() {
        let req = Req::new(Method::GET, Uri::from_static("/orders?page=2"))
            .with_header("content-type", "application/json");

        assert_eq!(req.method(), &Method::GET);
        assert_eq!(req.path(), "/orders");
        assert_eq!(req.query(), Some("page=2"));
        assert!(req.is_json());
    }

    #[tokio::test]
    async fn consumed_body_reads_as_empty() {
        let mut req = Req::new(Method::POST, Uri::from_static("/orders"));

        let body = req.body().await.unwrap();

        assert!(body.is_empty());
    }
}
