//! Registry of operation implementations.
//!
//! The [`OperationRegistry`] stores one handler per [`Operation`]. Defining
//! the same operation twice is rejected, and looking up an operation that
//! was never defined is an error rather than a silent no-op.

use std::collections::BTreeMap;

use crate::error::{PlatformError, PluginRuntimeError};
use crate::operation::Operation;

/// Operation implementations keyed by operation.
///
/// # Example
///
/// ```
/// use dvp_platform::{Operation, OperationRegistry};
///
/// let mut registry = OperationRegistry::new();
/// registry
///     .define(Operation::VirtualStart, || "started")
///     .expect("first definition");
/// let start = registry.get(Operation::VirtualStart).expect("defined");
/// assert_eq!(start(), "started");
/// assert!(registry.get(Operation::VirtualStop).is_err());
/// ```
#[derive(Debug, Clone)]
pub struct OperationRegistry<H> {
    handlers: BTreeMap<Operation, H>,
}

impl<H> Default for OperationRegistry<H> {
    fn default() -> Self {
        Self {
            handlers: BTreeMap::new(),
        }
    }
}

impl<H> OperationRegistry<H> {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the implementation of `operation`.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError::OperationAlreadyDefined`] if the operation
    /// already has an implementation; the existing one is kept.
    pub fn define(&mut self, operation: Operation, handler: H) -> Result<(), PlatformError> {
        if self.handlers.contains_key(&operation) {
            return Err(PlatformError::OperationAlreadyDefined(operation));
        }
        tracing::debug!(operation = operation.as_str(), "operation defined");
        self.handlers.insert(operation, handler);
        Ok(())
    }

    /// Returns the implementation of `operation`.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError::OperationNotDefined`] when no implementation
    /// was recorded.
    pub fn get(&self, operation: Operation) -> Result<&H, PlatformError> {
        self.handlers
            .get(&operation)
            .ok_or(PlatformError::OperationNotDefined(operation))
    }

    /// Returns `true` if `operation` has an implementation.
    #[must_use]
    pub fn is_defined(&self, operation: Operation) -> bool {
        self.handlers.contains_key(&operation)
    }

    /// Lists the defined operations in catalogue order.
    #[must_use]
    pub fn defined(&self) -> Vec<Operation> {
        self.handlers.keys().copied().collect()
    }

    /// Returns the number of defined operations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Returns `true` when nothing is defined.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

/// Compares the type an operation returned with the type it should return.
///
/// # Errors
///
/// Returns [`PluginRuntimeError::IncorrectReturnType`] when they differ.
pub fn check_return_type(
    operation: Operation,
    actual: &str,
    expected: &str,
) -> Result<(), PluginRuntimeError> {
    if actual == expected {
        return Ok(());
    }
    Err(PluginRuntimeError::IncorrectReturnType {
        operation,
        actual: actual.to_owned(),
        expected: expected.to_owned(),
    })
}
