//! Ready-made error handlers.
//!
//! ## Available Handlers
//!
//! - [`respond_text`] - plain text error responses
//! - [`respond_json`] - JSON formatted error responses
//!
//! Anything more specific is a [`Handler::from_fn`] away.

use uuid::Uuid;

use crate::middleware::Handler;
use crate::res::Res;

/// Handler answering with `status` and the error's message as plain text.
pub fn respond_text(status: u16) -> Handler {
    Handler::from_fn(move |error, _req, _res, _next| async move {
        Ok(Res::builder()
            .status(status)
            .text(format!("{} {}", status, error)))
    })
}

/// Handler answering with a structured JSON body.
///
/// The body carries the error message, the status and a generated reference
/// id callers can quote back when reporting the problem.
pub fn respond_json(status: u16) -> Handler {
    Handler::from_fn(move |error, _req, _res, _next| async move {
        let body = serde_json::json!({
            "error": error.to_string(),
            "status": status,
            "reference": Uuid::new_v4().to_string(),
        });

        Ok(Res::builder().status(status).json(&body))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::class::ErrorClass;
    use crate::middleware::{ErrorMiddleware, ErrorNext};
    use crate::req::Req;
    use crate::when::when_error_type;
    use hyper::{Method, Uri};

    fn parts() -> (Req, Res, ErrorNext) {
        (
            Req::new(Method::GET, Uri::from_static("/")),
            Res::builder().empty(),
            ErrorNext::end(),
        )
    }

    #[tokio::test]
    async fn text_handler_formats_status_and_message() {
        let timeout = ErrorClass::new("TimeoutError");
        let middleware = when_error_type(timeout.clone(), respond_text(504)).unwrap();
        let error = timeout.construct("too slow").unwrap();
        let (req, res, next) = parts();

        let outcome = middleware.handle(error, req, res, next).await;

        let response = outcome.response().unwrap();
        assert_eq!(response.status_code(), 504);
        assert_eq!(response.body_text(), "504 too slow");
    }

    #[tokio::test]
    async fn json_handler_carries_message_status_and_reference() {
        let timeout = ErrorClass::new("TimeoutError");
        let middleware = when_error_type(timeout.clone(), respond_json(504)).unwrap();
        let error = timeout.construct("too slow").unwrap();
        let (req, res, next) = parts();

        let outcome = middleware.handle(error, req, res, next).await;

        let response = outcome.response().unwrap();
        assert_eq!(response.status_code(), 504);
        assert_eq!(response.header("Content-Type"), Some("application/json"));

        let body: serde_json::Value = serde_json::from_slice(response.body()).unwrap();
        assert_eq!(body["error"], "too slow");
        assert_eq!(body["status"], 504);
        assert!(body["reference"].as_str().is_some_and(|id| !id.is_empty()));
    }
}
