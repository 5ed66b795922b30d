//! Unit tests for the binding seam.

use std::cell::RefCell;

use rstest::rstest;

use super::*;
use crate::protocol::{Empty, RemoteConnection, RemoteEnvironment};

#[rstest]
#[case(LibraryOperation::RunBash, "run_bash")]
#[case(LibraryOperation::RunPowerShell, "run_powershell")]
#[case(LibraryOperation::RunSync, "run_sync")]
#[case(LibraryOperation::RunExpect, "run_expect")]
fn operation_names_match_binding_functions(
    #[case] operation: LibraryOperation,
    #[case] expected: &str,
) {
    assert_eq!(operation.as_str(), expected);
    assert_eq!(operation.to_string(), expected);
}

#[test]
fn json_binding_forwards_operation_and_request() {
    let seen = RefCell::new(Vec::new());
    let binding = JsonBinding::new(|operation: LibraryOperation, request: &str| {
        seen.borrow_mut().push((operation, request.to_owned()));
        Ok(String::from(r#"{"return_value":{}}"#))
    });
    let connection = RemoteConnection::new(RemoteEnvironment::new("e", "r"));

    let response = binding
        .run_sync(&RunSyncRequest::new(connection, "/src"))
        .expect("exchange succeeds");

    assert_eq!(response.return_value(), Some(&Empty {}));
    let calls = seen.borrow();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, LibraryOperation::RunSync);
    assert!(calls[0].1.contains(r#""source_directory":"/src""#));
}

#[test]
fn json_binding_passes_through_call_failures() {
    let binding = JsonBinding::new(|operation: LibraryOperation, _: &str| {
        Err(BindingError::Unavailable {
            operation,
            message: String::from("detached"),
        })
    });
    let request = RunExpectRequest::new(
        RemoteConnection::new(RemoteEnvironment::new("e", "r")),
        "cmd",
    );

    let error = binding.run_expect(&request).expect_err("call fails");

    assert!(matches!(
        error,
        BindingError::Unavailable {
            operation: LibraryOperation::RunExpect,
            ..
        }
    ));
}

#[test]
fn bindings_are_usable_through_references() {
    fn dispatch<B: EngineBinding>(binding: B) -> Result<RunPowerShellResponse, BindingError> {
        binding.run_powershell(&RunPowerShellRequest::new(
            RemoteConnection::new(RemoteEnvironment::new("e", "r")),
            "Get-Date",
        ))
    }
    let binding = JsonBinding::new(|_: LibraryOperation, _: &str| {
        Ok(String::from(r#"{"error":{"non_actionable_error":{}}}"#))
    });

    let response = dispatch(&binding).expect("exchange succeeds");

    assert!(response.error().is_some_and(|e| e.non_actionable_error().is_some()));
}
