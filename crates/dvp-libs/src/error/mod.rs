//! Errors surfaced to plugin code by library operations.
//!
//! Only actionable engine failures become a catchable [`LibraryError`].
//! Non-actionable failures terminate the process (see
//! [`crate::decoder::Terminator`]) and are therefore absent here.

use thiserror::Error;

use crate::binding::LibraryOperation;

/// A structured, user-facing failure reported by the engine.
///
/// The `id` and `message` are carried verbatim from the response so the
/// platform can render them to the end user.
///
/// # Example
///
/// ```
/// use dvp_libs::LibraryError;
///
/// let error = LibraryError::new(15, "Some message");
/// assert_eq!(error.id(), 15);
/// assert_eq!(error.message(), "Some message");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct LibraryError {
    id: i64,
    message: String,
}

impl LibraryError {
    /// Creates a library error.
    #[must_use]
    pub fn new(id: i64, message: impl Into<String>) -> Self {
        Self {
            id,
            message: message.into(),
        }
    }

    /// Returns the engine's identifier for the failure.
    #[must_use]
    pub const fn id(&self) -> i64 {
        self.id
    }

    /// Returns the human-readable message.
    #[must_use]
    pub const fn message(&self) -> &str {
        self.message.as_str()
    }
}

/// Local failure to invoke the engine binding.
///
/// These are never produced by the engine itself; they indicate that the
/// call could not be made or its messages could not be marshalled.
#[derive(Debug, Error)]
pub enum BindingError {
    /// The binding for the operation is not available in this process.
    #[error("engine binding for {operation} is unavailable: {message}")]
    Unavailable {
        /// Operation that was invoked.
        operation: LibraryOperation,
        /// Description supplied by the binding host.
        message: String,
    },

    /// The request could not be serialised.
    #[error("failed to serialise {operation} request: {source}")]
    Encode {
        /// Operation that was invoked.
        operation: LibraryOperation,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// The response could not be deserialised.
    #[error("failed to deserialise {operation} response: {source}")]
    Decode {
        /// Operation that was invoked.
        operation: LibraryOperation,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },
}

/// Errors returned by the dispatcher.
#[derive(Debug, Error)]
pub enum LibsError {
    /// The engine reported an actionable failure.
    #[error(transparent)]
    Library(#[from] LibraryError),

    /// The binding could not be invoked.
    #[error(transparent)]
    Binding(#[from] BindingError),
}

impl LibsError {
    /// Returns the actionable error, if this is one.
    #[must_use]
    pub const fn as_library_error(&self) -> Option<&LibraryError> {
        match self {
            Self::Library(error) => Some(error),
            Self::Binding(_) => None,
        }
    }
}
