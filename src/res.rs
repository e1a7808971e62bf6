//! HTTP response built by error handlers.

use bytes::Bytes;
use http_body_util::Full;
use hyper::StatusCode;
use serde::Serialize;

/// Response under construction, or produced by a handler.
#[derive(Debug, Clone)]
pub struct Res {
    status: u16,
    headers: Vec<(String, String)>,
    body: Bytes,
}

impl Res {
    /// Start building a response.
    pub fn builder() -> ResBuilder {
        ResBuilder {
            status: 200,
            headers: Vec::new(),
        }
    }

    /// Response with only a status line and its canonical reason text.
    pub fn status(code: u16) -> Res {
        Res::builder().status(code).text(status_line(code))
    }

    /// 200 text response.
    pub fn text(body: impl Into<String>) -> Res {
        Res::builder().text(body)
    }

    /// 200 JSON response from a serializable value.
    pub fn json<T: Serialize>(value: &T) -> Res {
        Res::builder().json(value)
    }

    /// Get status code.
    #[inline]
    pub fn status_code(&self) -> u16 {
        self.status
    }

    /// First header value with the given name, if present.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Raw body bytes.
    #[inline]
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Body decoded as UTF-8, lossily.
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Append a header.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Convert into a hyper response.
    pub fn into_hyper(self) -> hyper::Response<Full<Bytes>> {
        let mut builder = hyper::Response::builder().status(
            StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        );

        for (name, value) in &self.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        builder
            .body(Full::new(self.body))
            .unwrap_or_else(|_| hyper::Response::new(Full::new(Bytes::new())))
    }
}

/// Builder for [`Res`].
#[derive(Debug, Clone)]
pub struct ResBuilder {
    status: u16,
    headers: Vec<(String, String)>,
}

impl ResBuilder {
    /// Set the status code.
    pub fn status(mut self, code: u16) -> Self {
        self.status = code;
        self
    }

    /// Append a header.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Finish with a plain text body.
    pub fn text(self, body: impl Into<String>) -> Res {
        let res = Res {
            status: self.status,
            headers: self.headers,
            body: Bytes::from(body.into()),
        };
        default_content_type(res, "text/plain; charset=utf-8")
    }

    /// Finish with a JSON body.
    pub fn json<T: Serialize>(self, value: &T) -> Res {
        match serde_json::to_vec(value) {
            Ok(body) => {
                let res = Res {
                    status: self.status,
                    headers: self.headers,
                    body: Bytes::from(body),
                };
                default_content_type(res, "application/json")
            }
            Err(e) => Res::builder().status(500).text(format!("JSON error: {}", e)),
        }
    }

    /// Finish with an empty body.
    pub fn empty(self) -> Res {
        Res {
            status: self.status,
            headers: self.headers,
            body: Bytes::new(),
        }
    }
}

fn default_content_type(mut res: Res, value: &str) -> Res {
    if res.header("Content-Type").is_none() {
        res.headers.push(("Content-Type".to_string(), value.to_string()));
    }
    res
}

fn status_line(code: u16) -> String {
    match StatusCode::from_u16(code).ok().and_then(|status| status.canonical_reason()) {
        Some(reason) => format!("{} {}", code, reason),
        None => format!("HTTP {}", code),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_sets_status_headers_and_body() {
        let res = Res::builder()
            .status(418)
            .header("X-Kettle", "on")
            .text("short and stout");

        assert_eq!(res.status_code(), 418);
        assert_eq!(res.header("x-kettle"), Some("on"));
        assert_eq!(res.body_text(), "short and stout");
    }

    #[test]
    fn status_uses_canonical_reason_text() {
        assert_eq!(Res::status(404).body_text(), "404 Not Found");
        assert_eq!(Res::status(799).body_text(), "HTTP 799");
    }

    #[test]
    fn json_sets_content_type() {
        let res = Res::json(&serde_json::json!({ "ok": true }));

        assert_eq!(res.header("Content-Type"), Some("application/json"));
        assert_eq!(res.body_text(), r#"{"ok":true}"#);
    }
}
