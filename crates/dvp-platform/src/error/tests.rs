//! Unit tests for platform error messages.

use super::*;

#[test]
fn user_error_defaults_action_and_output() {
    let error = UserError::new("failed");

    assert_eq!(error.message(), "failed");
    assert_eq!(error.action(), "");
    assert_eq!(error.output(), "");
}

#[test]
fn user_error_keeps_every_field() {
    let error = UserError::new("failed")
        .with_action("retry")
        .with_output("stack");

    assert_eq!(error.action(), "retry");
    assert_eq!(error.output(), "stack");
    assert_eq!(error.to_string(), "failed");
}

#[test]
fn platform_error_messages() {
    assert_eq!(
        PlatformError::OperationAlreadyDefined(Operation::VirtualStart).to_string(),
        "An implementation for virtual.start() operation has already been defined."
    );
    assert_eq!(
        PlatformError::OperationNotDefined(Operation::LinkedStatus).to_string(),
        "An implementation for the linked.status() operation has not been defined."
    );
}

#[test]
fn runtime_error_messages() {
    let wrong_type = PluginRuntimeError::IncorrectReturnType {
        operation: Operation::DiscoveryRepository,
        actual: String::from("type 'str'"),
        expected: String::from("type 'list of RepositoryDefinition'"),
    };
    assert_eq!(
        wrong_type.to_string(),
        "The returned object for the discovery.repository() operation was type 'str' \
         but should be of type 'list of RepositoryDefinition'."
    );
    assert_eq!(
        PluginRuntimeError::IncorrectReferenceFormat(String::from("bad")).to_string(),
        "Reference 'bad' is not a correctly formatted host environment reference."
    );
    assert_eq!(
        PluginRuntimeError::IncorrectPluginCode(String::from("no entry point")).to_string(),
        "no entry point"
    );
}
