//! Composition helpers for error middleware.

use std::sync::Arc;

use async_trait::async_trait;

use crate::class::ErrorClass;
use crate::error::ConfigError;
use crate::middleware::{ErrorMiddleware, ErrorNext, Handler, Outcome, SharedError};
use crate::req::Req;
use crate::res::Res;
use crate::when::when_error_type;

/// A sequence of error middleware flattened into one stage.
///
/// Stages run in registration order. The first stage to handle the error
/// wins; later stages never see it. If every stage forwards, the chain's own
/// continuation receives the error.
#[derive(Clone, Default)]
pub struct ErrorChain {
    stages: Vec<Arc<dyn ErrorMiddleware>>,
}

impl ErrorChain {
    /// Create an empty chain.
    pub fn new() -> Self {
        Self { stages: Vec::new() }
    }

    /// Append a stage.
    pub fn add<M: ErrorMiddleware>(mut self, stage: M) -> Self {
        self.stages.push(Arc::new(stage));
        self
    }

    /// Append a stage handling `class` with `handler`.
    ///
    /// Fails fast with the factory's validation errors.
    pub fn when(self, class: ErrorClass, handler: Handler) -> Result<Self, ConfigError> {
        Ok(self.add(when_error_type(class, handler)?))
    }

    /// Number of stages.
    #[inline]
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    /// Whether the chain has no stages.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }
}

#[async_trait]
impl ErrorMiddleware for ErrorChain {
    async fn handle(&self, error: SharedError, req: Req, res: Res, next: ErrorNext) -> Outcome {
        // Wrap each stage around the rest of the chain, in reverse, so the
        // first registered stage sees the error first.
        let mut chain = next;

        for stage in self.stages.iter().rev() {
            let stage = Arc::clone(stage);
            let rest = chain;
            let req = req.clone();
            let res = res.clone();

            chain = ErrorNext::new(move |error| {
                let stage = Arc::clone(&stage);
                let rest = rest.clone();
                let req = req.clone();
                let res = res.clone();

                async move { stage.handle(error, req, res, rest).await }
            });
        }

        chain.forward(error).await
    }
}
