//! Construction-time errors.

use std::error::Error as StdError;
use std::fmt;

/// Error raised while building middleware from its parts.
///
/// These are setup errors. The pipeline cannot be assembled around an
/// invalid stage, so they surface synchronously from the factory rather than
/// at request time. The first three variants carry fixed messages callers
/// may match on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The error category has no way to create or recognize instances.
    NotConstructible,
    /// The error category is not rooted at the base error class.
    NotAnErrorClass,
    /// The handler slot has no function bound to it.
    HandlerNotCallable,
    /// Configuration referenced an error class that was never registered.
    UnknownErrorClass(String),
    /// Configuration referenced a handler that was never registered.
    UnknownHandler(String),
    /// Configuration text could not be parsed.
    Parse(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::NotConstructible => f.write_str("ErrorType is not a constructor"),
            ConfigError::NotAnErrorClass => {
                f.write_str("ErrorType provided is not an Error class")
            }
            ConfigError::HandlerNotCallable => f.write_str("A handler must be a Function"),
            ConfigError::UnknownErrorClass(name) => write!(f, "unknown error class `{}`", name),
            ConfigError::UnknownHandler(name) => write!(f, "unknown handler `{}`", name),
            ConfigError::Parse(message) => write!(f, "invalid chain config: {}", message),
        }
    }
}

impl StdError for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_messages_are_fixed() {
        assert_eq!(
            ConfigError::NotConstructible.to_string(),
            "ErrorType is not a constructor"
        );
        assert_eq!(
            ConfigError::NotAnErrorClass.to_string(),
            "ErrorType provided is not an Error class"
        );
        assert_eq!(
            ConfigError::HandlerNotCallable.to_string(),
            "A handler must be a Function"
        );
    }

    #[test]
    fn lookup_errors_name_the_missing_entry() {
        assert_eq!(
            ConfigError::UnknownErrorClass("TimeoutError".to_string()).to_string(),
            "unknown error class `TimeoutError`"
        );
        assert_eq!(
            ConfigError::UnknownHandler("retry_page".to_string()).to_string(),
            "unknown handler `retry_page`"
        );
    }
}
