//! Shared test doubles and crate-level tests.

use std::panic::{self, AssertUnwindSafe};

use crate::binding::{EngineBinding, JsonBinding, LibraryOperation};
use crate::decoder::Terminator;
use crate::dispatcher::Libs;
use crate::error::{BindingError, LibsError};
use crate::protocol::{
    CommandResult, RemoteConnection, RemoteEnvironment, RunBashRequest, RunBashResponse,
    RunExpectRequest, RunExpectResponse, RunPowerShellRequest, RunPowerShellResponse,
    RunSyncRequest, RunSyncResponse,
};

mockall::mock! {
    pub(crate) Binding {}

    impl EngineBinding for Binding {
        fn run_bash(&self, request: &RunBashRequest) -> Result<RunBashResponse, BindingError>;
        fn run_powershell(
            &self,
            request: &RunPowerShellRequest,
        ) -> Result<RunPowerShellResponse, BindingError>;
        fn run_sync(&self, request: &RunSyncRequest) -> Result<RunSyncResponse, BindingError>;
        fn run_expect(&self, request: &RunExpectRequest) -> Result<RunExpectResponse, BindingError>;
    }
}

/// Panic payload raised by [`UnwindingTerminator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Terminated(pub(crate) LibraryOperation);

/// Terminator that unwinds instead of exiting so tests can observe it.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct UnwindingTerminator;

impl Terminator for UnwindingTerminator {
    fn terminate(&self, operation: LibraryOperation) -> ! {
        panic::panic_any(Terminated(operation))
    }
}

pub(crate) fn connection() -> RemoteConnection {
    RemoteConnection::new(RemoteEnvironment::new(
        "RemoteConnectionEnv",
        "remoteConnectionReference",
    ))
}

/// Asserts that `call` neither returns nor fails but terminates.
pub(crate) fn assert_terminates<R>(expected: LibraryOperation, call: impl FnOnce() -> R) {
    let Err(payload) = panic::catch_unwind(AssertUnwindSafe(call)) else {
        panic!("{expected} returned instead of terminating");
    };
    let terminated = payload
        .downcast_ref::<Terminated>()
        .unwrap_or_else(|| panic!("{expected} panicked for a reason other than termination"));
    assert_eq!(terminated.0, expected);
}

#[test]
fn json_binding_round_trips_through_dispatcher() {
    let binding = JsonBinding::new(|operation: LibraryOperation, request: &str| {
        assert_eq!(operation, LibraryOperation::RunBash);
        let parsed: serde_json::Value = serde_json::from_str(request).expect("request json");
        assert_eq!(parsed["command"], "echo hi");
        assert_eq!(parsed["use_login_shell"], true);
        assert_eq!(parsed["remote_connection"]["environment"]["name"], "E");
        Ok(String::from(
            r#"{"return_value":{"exit_code":3,"stdout":"out","stderr":"err"}}"#,
        ))
    });
    let libs = Libs::with_terminator(binding, UnwindingTerminator);
    let connection = RemoteConnection::new(RemoteEnvironment::new("E", "R"));

    let result = libs
        .run_bash(&connection, "echo hi", None, true)
        .expect("run_bash succeeds");

    assert_eq!(result.exit_code(), 3);
    assert_eq!(result.stdout(), "out");
    assert_eq!(result.stderr(), "err");
}

#[test]
fn json_binding_actionable_error_surfaces_library_error() {
    let binding = JsonBinding::new(|_: LibraryOperation, _: &str| {
        Ok(String::from(
            r#"{"error":{"actionable_error":{"id":15,"message":"Some message"}}}"#,
        ))
    });
    let libs = Libs::with_terminator(binding, UnwindingTerminator);

    let error = libs
        .run_expect(&connection(), "command", None)
        .expect_err("run_expect fails");

    let library_error = error.as_library_error().expect("library error");
    assert_eq!(library_error.id(), 15);
    assert_eq!(library_error.message(), "Some message");
}

#[test]
fn json_binding_non_actionable_error_terminates() {
    let binding = JsonBinding::new(|_: LibraryOperation, _: &str| {
        Ok(String::from(r#"{"error":{"non_actionable_error":{}}}"#))
    });
    let libs = Libs::with_terminator(binding, UnwindingTerminator);

    assert_terminates(LibraryOperation::RunSync, || {
        libs.run_sync(&connection(), "dir", None, None, None)
    });
}

#[test]
fn json_binding_undecodable_reply_is_binding_error() {
    let binding = JsonBinding::new(|_: LibraryOperation, _: &str| Ok(String::from("not json")));
    let libs = Libs::with_terminator(binding, UnwindingTerminator);

    let error = libs
        .run_powershell(&connection(), "command", None)
        .expect_err("decode fails");

    assert!(
        matches!(
            error,
            LibsError::Binding(BindingError::Decode {
                operation: LibraryOperation::RunPowerShell,
                ..
            })
        ),
        "unexpected error: {error:?}"
    );
}

#[test]
fn json_binding_empty_replies_complete_sync_and_expect() {
    let binding = JsonBinding::new(|_: LibraryOperation, _: &str| Ok(String::from("{}")));
    let libs = Libs::with_terminator(binding, UnwindingTerminator);

    libs.run_sync(&connection(), "sourceDirectory", None, None, None)
        .expect("run_sync succeeds");
    libs.run_expect(&connection(), "command", None)
        .expect("run_expect succeeds");
}

#[test]
fn json_binding_reply_may_omit_zero_exit_code() {
    let binding = JsonBinding::new(|_: LibraryOperation, _: &str| {
        Ok(String::from(r#"{"return_value":{"stdout":"hi"}}"#))
    });
    let libs = Libs::with_terminator(binding, UnwindingTerminator);

    let result = libs
        .run_bash(&connection(), "echo hi", None, false)
        .expect("run_bash succeeds");

    assert_eq!(result, CommandResult::new(0, "hi", ""));
}
