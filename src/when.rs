//! The error-type middleware factory.

use std::sync::Arc;

use async_trait::async_trait;

use crate::class::ErrorClass;
use crate::error::ConfigError;
use crate::middleware::{ErrorMiddleware, ErrorNext, Handler, HandlerFn, Outcome, SharedError};
use crate::req::Req;
use crate::res::Res;

/// Middleware gated on a single error category.
///
/// Built by [`when_error_type`]. Matching errors go to the handler, all
/// others are forwarded untouched.
pub struct WhenErrorType {
    class: ErrorClass,
    handler: Arc<HandlerFn>,
}

/// Build middleware that invokes `handler` for errors belonging to `class`
/// and forwards everything else to the next stage unchanged.
///
/// The parts are validated eagerly, in order: the class must be
/// constructible, the class must belong to the error taxonomy, and the
/// handler slot must be bound. The first failing rule is reported and no
/// middleware is produced.
pub fn when_error_type(class: ErrorClass, handler: Handler) -> Result<WhenErrorType, ConfigError> {
    if !class.is_constructible() {
        return Err(ConfigError::NotConstructible);
    }
    if !class.derives_from_base() {
        return Err(ConfigError::NotAnErrorClass);
    }
    let handler = handler.into_func().ok_or(ConfigError::HandlerNotCallable)?;

    Ok(WhenErrorType { class, handler })
}

impl WhenErrorType {
    /// The category this stage handles.
    #[inline]
    pub fn class(&self) -> &ErrorClass {
        &self.class
    }
}

#[async_trait]
impl ErrorMiddleware for WhenErrorType {
    async fn handle(&self, error: SharedError, req: Req, res: Res, next: ErrorNext) -> Outcome {
        if !self.class.is_instance(&error) {
            return next.forward(error).await;
        }

        match (self.handler.as_ref())(error.clone(), req, res, next.clone()).await {
            Ok(response) => Outcome::Handled(response),
            Err(failure) => {
                // The handler's own failure never escapes; it is forwarded
                // and reported as this stage's result.
                tracing::warn!(class = self.class.name(), error = %failure, "error handler failed");
                let _ = next.forward(failure.clone()).await;
                Outcome::Forwarded(failure)
            }
        }
    }
}
