//! Translates operation responses into process-level outcomes.
//!
//! The decoder is the single point where a response's error union becomes an
//! outcome:
//!
//! - a populated `return_value` is unwrapped and returned, and an
//!   operation without a payload succeeds when no error is present;
//! - an `actionable_error` becomes a [`LibraryError`];
//! - a `non_actionable_error` ends the process through a [`Terminator`].
//!
//! Malformed unions are a defect in the binding and panic.

use std::process;

use crate::binding::LibraryOperation;
use crate::error::LibraryError;
use crate::protocol::{OperationResponse, ResponseOutcome, ReturnValue};

/// Exit status used when a non-actionable error ends the process.
pub const NON_ACTIONABLE_EXIT_STATUS: i32 = 1;

/// Ends the current execution when a non-actionable error is received.
///
/// Plugin code must not be able to swallow these failures, so the method
/// never returns.
pub trait Terminator {
    /// Terminates after `operation` reported a non-actionable error.
    fn terminate(&self, operation: LibraryOperation) -> !;
}

/// Terminator that exits the process with [`NON_ACTIONABLE_EXIT_STATUS`].
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessTerminator;

impl Terminator for ProcessTerminator {
    fn terminate(&self, operation: LibraryOperation) -> ! {
        tracing::debug!(
            operation = operation.as_str(),
            "non-actionable library error, exiting"
        );
        process::exit(NON_ACTIONABLE_EXIT_STATUS)
    }
}

impl<T: Terminator + ?Sized> Terminator for &T {
    fn terminate(&self, operation: LibraryOperation) -> ! {
        (**self).terminate(operation)
    }
}

/// Decodes one response for `operation`.
///
/// # Errors
///
/// Returns a [`LibraryError`] carrying the engine's id and message when the
/// response holds an actionable error.
///
/// # Panics
///
/// Panics if the response violates the union invariant (see
/// [`OperationResponse::into_outcome`]).
pub fn decode<T, R>(
    operation: LibraryOperation,
    response: OperationResponse<T>,
    terminator: &R,
) -> Result<T, LibraryError>
where
    T: ReturnValue,
    R: Terminator + ?Sized,
{
    match response.into_outcome() {
        ResponseOutcome::Success(value) => Ok(value),
        ResponseOutcome::Actionable(error) => {
            tracing::debug!(
                operation = operation.as_str(),
                id = error.id(),
                "actionable library error"
            );
            Err(LibraryError::new(error.id(), error.message()))
        }
        ResponseOutcome::NonActionable => terminator.terminate(operation),
    }
}
