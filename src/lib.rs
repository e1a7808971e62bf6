//! Error-type matching middleware for async request pipelines.
//!
//! The entry point is [`when_error_type`]: give it an error category and a
//! handler, get back a pipeline stage that invokes the handler for matching
//! errors and forwards everything else untouched.
//!
//! ```ignore
//! use when_error_type::prelude::*;
//!
//! let timeout = ErrorClass::new("TimeoutError");
//! let stage = when_error_type(
//!     timeout.clone(),
//!     Handler::from_fn(|error, _req, _res, _next| async move {
//!         Ok(Res::builder().status(504).text(format!("504 {}", error)))
//!     }),
//! )?;
//!
//! // registered into the hosting pipeline like any other error middleware
//! ```
//!
//! Categories form a runtime taxonomy rooted at [`ErrorClass::base`], so a
//! stage built for the base class handles every error, and concrete Rust
//! error types slot in through [`ErrorClass::of`]. Several stages compose
//! into one with [`ErrorChain`], and whole chains can be declared in TOML
//! and materialized against a [`Registry`].

pub mod chain;
pub mod class;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod req;
pub mod res;
pub mod when;

pub use chain::ErrorChain;
pub use class::{ClassedError, ErrorClass, ErrorClassBuilder, find_cause};
pub use config::{ChainConfig, Registry, StageConfig};
pub use error::ConfigError;
pub use middleware::{
    ErrorMiddleware, ErrorNext, Handler, HandlerResult, Outcome, SharedError, shared_error,
};
pub use req::Req;
pub use res::{Res, ResBuilder};
pub use when::{WhenErrorType, when_error_type};

/// Commonly used items.
pub mod prelude {
    pub use crate::chain::ErrorChain;
    pub use crate::class::{ClassedError, ErrorClass};
    pub use crate::config::{ChainConfig, Registry};
    pub use crate::error::ConfigError;
    pub use crate::handlers::{respond_json, respond_text};
    pub use crate::middleware::{
        ErrorMiddleware, ErrorNext, Handler, HandlerResult, Outcome, SharedError, shared_error,
    };
    pub use crate::req::Req;
    pub use crate::res::Res;
    pub use crate::when::{WhenErrorType, when_error_type};
}
