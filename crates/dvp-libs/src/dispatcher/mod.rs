//! The remote-operation dispatcher plugin code calls.
//!
//! [`Libs`] builds a request from typed arguments, hands it to the injected
//! [`EngineBinding`], and decodes the single response it gets back. It holds
//! no state of its own, so one instance can serve concurrent callers as long
//! as the binding can.

use std::collections::{BTreeMap, BTreeSet};

use crate::binding::{EngineBinding, LibraryOperation};
use crate::decoder::{ProcessTerminator, Terminator, decode};
use crate::error::LibsError;
use crate::protocol::{
    RemoteConnection, RunBashRequest, RunBashResult, RunExpectRequest, RunPowerShellRequest,
    RunPowerShellResult, RunSyncRequest,
};

/// Dispatches remote operations through an engine binding.
///
/// # Example
///
/// ```
/// use dvp_libs::{BindingError, EngineBinding, Libs};
/// use dvp_libs::protocol::*;
///
/// struct EchoBinding;
///
/// impl EngineBinding for EchoBinding {
///     fn run_bash(&self, request: &RunBashRequest) -> Result<RunBashResponse, BindingError> {
///         Ok(RunBashResponse::success(CommandResult::new(0, request.command(), "")))
///     }
///     fn run_powershell(
///         &self,
///         _request: &RunPowerShellRequest,
///     ) -> Result<RunPowerShellResponse, BindingError> {
///         Ok(RunPowerShellResponse::actionable(1, "not supported"))
///     }
///     fn run_sync(&self, _request: &RunSyncRequest) -> Result<RunSyncResponse, BindingError> {
///         Ok(RunSyncResponse::success(Empty {}))
///     }
///     fn run_expect(&self, _request: &RunExpectRequest) -> Result<RunExpectResponse, BindingError> {
///         Ok(RunExpectResponse::success(Empty {}))
///     }
/// }
///
/// let libs = Libs::new(EchoBinding);
/// let connection = RemoteConnection::new(RemoteEnvironment::new("env", "UNIX_HOST_ENVIRONMENT-1"));
/// let result = libs.run_bash(&connection, "uname", None, false).unwrap();
/// assert_eq!(result.stdout(), "uname");
///
/// let error = libs.run_powershell(&connection, "Get-Date", None).unwrap_err();
/// assert_eq!(error.as_library_error().map(|e| e.id()), Some(1));
/// ```
#[derive(Debug, Clone)]
pub struct Libs<B, T = ProcessTerminator> {
    binding: B,
    terminator: T,
}

impl<B> Libs<B> {
    /// Creates a dispatcher that exits the process on non-actionable errors.
    #[must_use]
    pub const fn new(binding: B) -> Self {
        Self {
            binding,
            terminator: ProcessTerminator,
        }
    }
}

impl<B, T> Libs<B, T> {
    /// Creates a dispatcher with a custom termination policy.
    #[must_use]
    pub const fn with_terminator(binding: B, terminator: T) -> Self {
        Self {
            binding,
            terminator,
        }
    }
}

impl<B: EngineBinding, T: Terminator> Libs<B, T> {
    /// Runs a bash command on the connection's host.
    ///
    /// `variables` are exported to the command's environment; omitting them
    /// sends an empty map.
    ///
    /// # Errors
    ///
    /// Returns [`LibsError::Library`] for actionable engine errors and
    /// [`LibsError::Binding`] if the binding cannot be invoked.
    pub fn run_bash(
        &self,
        remote_connection: &RemoteConnection,
        command: &str,
        variables: Option<&BTreeMap<String, String>>,
        use_login_shell: bool,
    ) -> Result<RunBashResult, LibsError> {
        let request = RunBashRequest::new(remote_connection.clone(), command)
            .with_variables(copy_variables(variables))
            .with_login_shell(use_login_shell);
        log_dispatch(LibraryOperation::RunBash, remote_connection);
        let response = self.binding.run_bash(&request)?;
        Ok(decode(
            LibraryOperation::RunBash,
            response,
            &self.terminator,
        )?)
    }

    /// Runs a `PowerShell` command on the connection's host.
    ///
    /// # Errors
    ///
    /// Returns [`LibsError::Library`] for actionable engine errors and
    /// [`LibsError::Binding`] if the binding cannot be invoked.
    pub fn run_powershell(
        &self,
        remote_connection: &RemoteConnection,
        command: &str,
        variables: Option<&BTreeMap<String, String>>,
    ) -> Result<RunPowerShellResult, LibsError> {
        let request = RunPowerShellRequest::new(remote_connection.clone(), command)
            .with_variables(copy_variables(variables));
        log_dispatch(LibraryOperation::RunPowerShell, remote_connection);
        let response = self.binding.run_powershell(&request)?;
        Ok(decode(
            LibraryOperation::RunPowerShell,
            response,
            &self.terminator,
        )?)
    }

    /// Syncs `source_directory` from the connection's host to the engine.
    ///
    /// # Errors
    ///
    /// Returns [`LibsError::Library`] for actionable engine errors and
    /// [`LibsError::Binding`] if the binding cannot be invoked.
    pub fn run_sync(
        &self,
        remote_connection: &RemoteConnection,
        source_directory: &str,
        rsync_user: Option<&str>,
        exclude_paths: Option<&BTreeSet<String>>,
        sym_links_to_follow: Option<&BTreeSet<String>>,
    ) -> Result<(), LibsError> {
        let mut request = RunSyncRequest::new(remote_connection.clone(), source_directory)
            .with_exclude_paths(exclude_paths.cloned().unwrap_or_default())
            .with_sym_links_to_follow(sym_links_to_follow.cloned().unwrap_or_default());
        if let Some(user) = rsync_user {
            request = request.with_rsync_user(user);
        }
        log_dispatch(LibraryOperation::RunSync, remote_connection);
        let response = self.binding.run_sync(&request)?;
        decode(LibraryOperation::RunSync, response, &self.terminator)?;
        Ok(())
    }

    /// Runs an expect script on the connection's host.
    ///
    /// # Errors
    ///
    /// Returns [`LibsError::Library`] for actionable engine errors and
    /// [`LibsError::Binding`] if the binding cannot be invoked.
    pub fn run_expect(
        &self,
        remote_connection: &RemoteConnection,
        command: &str,
        variables: Option<&BTreeMap<String, String>>,
    ) -> Result<(), LibsError> {
        let request = RunExpectRequest::new(remote_connection.clone(), command)
            .with_variables(copy_variables(variables));
        log_dispatch(LibraryOperation::RunExpect, remote_connection);
        let response = self.binding.run_expect(&request)?;
        decode(LibraryOperation::RunExpect, response, &self.terminator)?;
        Ok(())
    }
}

fn copy_variables(variables: Option<&BTreeMap<String, String>>) -> BTreeMap<String, String> {
    variables.cloned().unwrap_or_default()
}

fn log_dispatch(operation: LibraryOperation, remote_connection: &RemoteConnection) {
    tracing::debug!(
        operation = operation.as_str(),
        environment = remote_connection.environment().reference(),
        "dispatching library operation"
    );
}
