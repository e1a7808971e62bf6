//! Declarative chain assembly.
//!
//! Chains can be described in TOML and materialized against a registry of
//! named classes and handlers:
//!
//! ```toml
//! [[stage]]
//! error_type = "TimeoutError"
//! handler = "retry_page"
//!
//! [[stage]]
//! error_type = "Error"
//! handler = "json_500"
//! ```

use std::collections::HashMap;

use serde::Deserialize;

use crate::chain::ErrorChain;
use crate::class::ErrorClass;
use crate::error::ConfigError;
use crate::middleware::Handler;

/// Declarative description of an error chain.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChainConfig {
    /// Stages in dispatch order.
    #[serde(default, rename = "stage")]
    pub stages: Vec<StageConfig>,
}

/// One stage: which category it handles, and with what.
#[derive(Debug, Clone, Deserialize)]
pub struct StageConfig {
    /// Name of a registered error class.
    pub error_type: String,
    /// Name of a registered handler.
    pub handler: String,
}

impl ChainConfig {
    /// Parse a chain description from TOML text.
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|err| ConfigError::Parse(err.to_string()))
    }
}

/// Named classes and handlers a [`ChainConfig`] can refer to.
#[derive(Default)]
pub struct Registry {
    classes: HashMap<String, ErrorClass>,
    handlers: HashMap<String, Handler>,
}

impl Registry {
    /// Create a registry. The base class is always known, as `Error`.
    pub fn new() -> Self {
        Registry::default().class(ErrorClass::base())
    }

    /// Register a class under its own name.
    pub fn class(mut self, class: ErrorClass) -> Self {
        self.classes.insert(class.name().to_string(), class);
        self
    }

    /// Register a handler under `name`.
    pub fn handler(mut self, name: impl Into<String>, handler: Handler) -> Self {
        self.handlers.insert(name.into(), handler);
        self
    }

    /// Look up a registered class.
    pub fn get_class(&self, name: &str) -> Option<&ErrorClass> {
        self.classes.get(name)
    }

    /// Materialize `config` into a chain.
    ///
    /// Resolution fails fast: the first unknown name or invalid stage aborts
    /// the build.
    pub fn build(&self, config: &ChainConfig) -> Result<ErrorChain, ConfigError> {
        let mut chain = ErrorChain::new();

        for stage in &config.stages {
            let class = self
                .classes
                .get(&stage.error_type)
                .cloned()
                .ok_or_else(|| ConfigError::UnknownErrorClass(stage.error_type.clone()))?;
            let handler = self
                .handlers
                .get(&stage.handler)
                .cloned()
                .ok_or_else(|| ConfigError::UnknownHandler(stage.handler.clone()))?;

            chain = chain.when(class, handler)?;
        }

        Ok(chain)
    }
}
