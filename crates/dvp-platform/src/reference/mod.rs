//! Validation of host environment references.

use crate::error::PluginRuntimeError;

const REFERENCE_PREFIXES: [&str; 2] = ["UNIX_HOST_ENVIRONMENT-", "WINDOWS_HOST_ENVIRONMENT-"];

/// Checks that `reference` names a UNIX or Windows host environment.
///
/// A valid reference is one of the known prefixes followed by one or more
/// ASCII digits.
///
/// # Errors
///
/// Returns [`PluginRuntimeError::IncorrectReferenceFormat`] otherwise.
///
/// # Example
///
/// ```
/// use dvp_platform::validate_environment_reference;
///
/// assert!(validate_environment_reference("UNIX_HOST_ENVIRONMENT-12").is_ok());
/// assert!(validate_environment_reference("UNIX_HOST-12").is_err());
/// ```
pub fn validate_environment_reference(reference: &str) -> Result<(), PluginRuntimeError> {
    let well_formed = REFERENCE_PREFIXES.iter().any(|prefix| {
        reference
            .strip_prefix(prefix)
            .is_some_and(|id| !id.is_empty() && id.bytes().all(|b| b.is_ascii_digit()))
    });
    if well_formed {
        Ok(())
    } else {
        Err(PluginRuntimeError::IncorrectReferenceFormat(
            reference.to_owned(),
        ))
    }
}
