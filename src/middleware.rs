//! Core contract between an error pipeline and its stages.
//!
//! When a request fails, the hosting pipeline hands the error to a chain of
//! error-handling stages. Each stage is invoked with the error, the request
//! that produced it, the response under construction and a continuation into
//! the rest of the chain.

use std::error::Error as StdError;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use futures_util::future::BoxFuture;

use crate::req::Req;
use crate::res::Res;

/// Error value carried through the pipeline.
///
/// Errors are reference counted so a stage can forward an error and still
/// report it as its own result.
pub type SharedError = Arc<dyn StdError + Send + Sync>;

/// Wrap a concrete error for the pipeline.
pub fn shared_error<E>(error: E) -> SharedError
where
    E: StdError + Send + Sync + 'static,
{
    Arc::new(error)
}

/// Result of a single stage invocation.
#[derive(Debug)]
pub enum Outcome {
    /// A handler produced a response; error propagation stops here.
    Handled(Res),
    /// The error was passed on to the next stage of the chain.
    Forwarded(SharedError),
}

impl Outcome {
    /// Whether a handler produced a response.
    #[inline]
    pub fn is_handled(&self) -> bool {
        matches!(self, Outcome::Handled(_))
    }

    /// Whether the error moved on unhandled.
    #[inline]
    pub fn is_forwarded(&self) -> bool {
        matches!(self, Outcome::Forwarded(_))
    }

    /// Response produced by a handler, if any.
    pub fn response(&self) -> Option<&Res> {
        match self {
            Outcome::Handled(res) => Some(res),
            Outcome::Forwarded(_) => None,
        }
    }

    /// Error carried onward, if any.
    pub fn error(&self) -> Option<&SharedError> {
        match self {
            Outcome::Handled(_) => None,
            Outcome::Forwarded(error) => Some(error),
        }
    }
}

type NextFn = dyn Fn(SharedError) -> BoxFuture<'static, Outcome> + Send + Sync;

/// Continuation into the next error-handling stage.
///
/// Takes exactly one argument, the error to forward. What "next" means is the
/// pipeline's business: another stage, or its terminal handler.
#[derive(Clone)]
pub struct ErrorNext {
    run: Arc<NextFn>,
}

impl ErrorNext {
    /// Wrap an async function as a continuation.
    pub fn new<F, Fut>(run: F) -> Self
    where
        F: Fn(SharedError) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Outcome> + Send + 'static,
    {
        Self {
            run: Arc::new(move |error| -> BoxFuture<'static, Outcome> { Box::pin(run(error)) }),
        }
    }

    /// Terminal continuation: the error leaves the chain unhandled.
    pub fn end() -> Self {
        Self::new(|error| async move { Outcome::Forwarded(error) })
    }

    /// Hand `error` to the next stage and wait for its outcome.
    pub async fn forward(&self, error: SharedError) -> Outcome {
        (self.run.as_ref())(error).await
    }
}

impl fmt::Debug for ErrorNext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ErrorNext")
    }
}

/// Result of a handler invocation. `Err` means the handler itself failed.
pub type HandlerResult = Result<Res, SharedError>;

pub(crate) type HandlerFn =
    dyn Fn(SharedError, Req, Res, ErrorNext) -> BoxFuture<'static, HandlerResult> + Send + Sync;

/// A request-time error handler.
///
/// Handlers are dynamic slots rather than plain generics so pipelines can be
/// wired at runtime, e.g. from configuration. An unbound slot is rejected
/// when middleware is built around it.
#[derive(Clone, Default)]
pub struct Handler {
    func: Option<Arc<HandlerFn>>,
}

impl Handler {
    /// Bind an async function to a new slot.
    pub fn from_fn<F, Fut>(func: F) -> Self
    where
        F: Fn(SharedError, Req, Res, ErrorNext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HandlerResult> + Send + 'static,
    {
        Self {
            func: Some(Arc::new(
                move |error, req, res, next| -> BoxFuture<'static, HandlerResult> {
                    Box::pin(func(error, req, res, next))
                },
            )),
        }
    }

    /// A slot with nothing bound to it.
    pub fn unbound() -> Self {
        Self { func: None }
    }

    /// Whether a function is bound to this slot.
    #[inline]
    pub fn is_bound(&self) -> bool {
        self.func.is_some()
    }

    pub(crate) fn into_func(self) -> Option<Arc<HandlerFn>> {
        self.func
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_bound() {
            f.write_str("Handler(bound)")
        } else {
            f.write_str("Handler(unbound)")
        }
    }
}

/// A stage in an error-handling chain.
#[async_trait]
pub trait ErrorMiddleware: Send + Sync + 'static {
    /// Inspect `error` and either produce a response or pass it on.
    async fn handle(&self, error: SharedError, req: Req, res: Res, next: ErrorNext) -> Outcome;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn default_handler_slot_is_unbound() {
        assert!(!Handler::default().is_bound());
        assert!(Handler::from_fn(|_e, _q, _r, _n| async { Ok(Res::text("ok")) }).is_bound());
    }

    #[tokio::test]
    async fn end_continuation_reports_the_error_unhandled() {
        let error: SharedError = Arc::new(io::Error::other("boom"));

        let outcome = ErrorNext::end().forward(error.clone()).await;

        assert!(outcome.is_forwarded());
        assert!(outcome.error().is_some_and(|e| Arc::ptr_eq(e, &error)));
    }
}
