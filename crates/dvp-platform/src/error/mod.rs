//! Errors raised by plugin code and by the platform around it.

use thiserror::Error;

use crate::operation::Operation;

/// Failure raised by plugin authors to fail an operation.
///
/// The message, suggested action and output are shown to the end user.
///
/// # Example
///
/// ```
/// use dvp_platform::UserError;
///
/// let error = UserError::new("Database is down").with_action("Start the database");
/// assert_eq!(error.to_string(), "Database is down");
/// assert_eq!(error.action(), "Start the database");
/// assert_eq!(error.output(), "");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct UserError {
    message: String,
    action: String,
    output: String,
}

impl UserError {
    /// Creates an error with an empty action and output.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            action: String::new(),
            output: String::new(),
        }
    }

    /// Sets the action the user should take.
    #[must_use]
    pub fn with_action(mut self, action: impl Into<String>) -> Self {
        self.action = action.into();
        self
    }

    /// Sets the output to show alongside the message.
    #[must_use]
    pub fn with_output(mut self, output: impl Into<String>) -> Self {
        self.output = output.into();
        self
    }

    /// Returns the message.
    #[must_use]
    pub const fn message(&self) -> &str {
        self.message.as_str()
    }

    /// Returns the suggested action.
    #[must_use]
    pub const fn action(&self) -> &str {
        self.action.as_str()
    }

    /// Returns the output.
    #[must_use]
    pub const fn output(&self) -> &str {
        self.output.as_str()
    }
}

/// Misuse of the platform surface by the plugin wrapper.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlatformError {
    /// The plugin defined the same operation twice.
    #[error("An implementation for {0} operation has already been defined.")]
    OperationAlreadyDefined(Operation),

    /// The engine asked for an operation the plugin never defined.
    #[error("An implementation for the {0} operation has not been defined.")]
    OperationNotDefined(Operation),
}

/// Mistakes in plugin code detected while running it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PluginRuntimeError {
    /// An operation returned a value of the wrong type.
    #[error("The returned object for the {operation} operation was {actual} but should be of {expected}.")]
    IncorrectReturnType {
        /// Operation whose result was checked.
        operation: Operation,
        /// Description of the returned type.
        actual: String,
        /// Description of the expected type.
        expected: String,
    },

    /// A host environment reference is malformed.
    #[error("Reference '{0}' is not a correctly formatted host environment reference.")]
    IncorrectReferenceFormat(String),

    /// The plugin code could not be loaded or lacks its entry point.
    #[error("{0}")]
    IncorrectPluginCode(String),
}

#[cfg(test)]
mod tests;
