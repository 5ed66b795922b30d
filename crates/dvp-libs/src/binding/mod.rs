//! The engine binding seam.
//!
//! The engine supplies one callable per remote operation. The dispatcher only
//! knows their signatures, so the binding is modelled as the
//! [`EngineBinding`] trait. Hosts that exchange serialised messages can wrap
//! a raw callable in [`JsonBinding`].

use std::fmt;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::BindingError;
use crate::protocol::{
    RunBashRequest, RunBashResponse, RunExpectRequest, RunExpectResponse, RunPowerShellRequest,
    RunPowerShellResponse, RunSyncRequest, RunSyncResponse,
};

/// Remote operations offered by the library.
///
/// # Example
///
/// ```
/// use dvp_libs::LibraryOperation;
///
/// assert_eq!(LibraryOperation::RunPowerShell.as_str(), "run_powershell");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LibraryOperation {
    /// Runs a bash command.
    RunBash,
    /// Runs a `PowerShell` command.
    RunPowerShell,
    /// Copies a directory from the remote host with rsync.
    RunSync,
    /// Runs an expect script.
    RunExpect,
}

impl LibraryOperation {
    /// Returns the binding function name backing the operation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::RunBash => "run_bash",
            Self::RunPowerShell => "run_powershell",
            Self::RunSync => "run_sync",
            Self::RunExpect => "run_expect",
        }
    }
}

impl fmt::Display for LibraryOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Host-provided surface that performs remote operations.
///
/// Each method accepts exactly one request and returns exactly one response.
/// An `Err` means the call itself could not be made; engine-side failures
/// travel inside the response's error union instead.
pub trait EngineBinding {
    /// Runs a bash command on the remote host.
    ///
    /// # Errors
    ///
    /// Returns a [`BindingError`] if the binding cannot be invoked.
    fn run_bash(&self, request: &RunBashRequest) -> Result<RunBashResponse, BindingError>;

    /// Runs a `PowerShell` command on the remote host.
    ///
    /// # Errors
    ///
    /// Returns a [`BindingError`] if the binding cannot be invoked.
    fn run_powershell(
        &self,
        request: &RunPowerShellRequest,
    ) -> Result<RunPowerShellResponse, BindingError>;

    /// Syncs a remote directory to the engine.
    ///
    /// # Errors
    ///
    /// Returns a [`BindingError`] if the binding cannot be invoked.
    fn run_sync(&self, request: &RunSyncRequest) -> Result<RunSyncResponse, BindingError>;

    /// Runs an expect script on the remote host.
    ///
    /// # Errors
    ///
    /// Returns a [`BindingError`] if the binding cannot be invoked.
    fn run_expect(&self, request: &RunExpectRequest) -> Result<RunExpectResponse, BindingError>;
}

impl<B: EngineBinding + ?Sized> EngineBinding for &B {
    fn run_bash(&self, request: &RunBashRequest) -> Result<RunBashResponse, BindingError> {
        (**self).run_bash(request)
    }

    fn run_powershell(
        &self,
        request: &RunPowerShellRequest,
    ) -> Result<RunPowerShellResponse, BindingError> {
        (**self).run_powershell(request)
    }

    fn run_sync(&self, request: &RunSyncRequest) -> Result<RunSyncResponse, BindingError> {
        (**self).run_sync(request)
    }

    fn run_expect(&self, request: &RunExpectRequest) -> Result<RunExpectResponse, BindingError> {
        (**self).run_expect(request)
    }
}

/// Adapts a callable exchanging JSON text into an [`EngineBinding`].
///
/// The callable receives the operation and the serialised request and must
/// return the serialised response.
///
/// # Example
///
/// ```
/// use dvp_libs::{JsonBinding, Libs, LibraryOperation};
/// use dvp_libs::protocol::{RemoteConnection, RemoteEnvironment};
///
/// let binding = JsonBinding::new(|operation: LibraryOperation, _request: &str| {
///     assert_eq!(operation, LibraryOperation::RunBash);
///     Ok(String::from(
///         r#"{"return_value":{"exit_code":0,"stdout":"hi\n","stderr":""}}"#,
///     ))
/// });
/// let libs = Libs::new(binding);
/// let connection = RemoteConnection::new(RemoteEnvironment::new("env", "UNIX_HOST_ENVIRONMENT-1"));
/// let result = libs.run_bash(&connection, "echo hi", None, false).unwrap();
/// assert_eq!(result.stdout(), "hi\n");
/// ```
pub struct JsonBinding<F> {
    call: F,
}

impl<F> JsonBinding<F>
where
    F: Fn(LibraryOperation, &str) -> Result<String, BindingError>,
{
    /// Wraps the callable.
    #[must_use]
    pub const fn new(call: F) -> Self {
        Self { call }
    }

    fn exchange<Req, Resp>(
        &self,
        operation: LibraryOperation,
        request: &Req,
    ) -> Result<Resp, BindingError>
    where
        Req: Serialize,
        Resp: DeserializeOwned,
    {
        let encoded = serde_json::to_string(request)
            .map_err(|source| BindingError::Encode { operation, source })?;
        let reply = (self.call)(operation, &encoded)?;
        serde_json::from_str(&reply).map_err(|source| BindingError::Decode { operation, source })
    }
}

impl<F> fmt::Debug for JsonBinding<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JsonBinding").finish_non_exhaustive()
    }
}

impl<F> EngineBinding for JsonBinding<F>
where
    F: Fn(LibraryOperation, &str) -> Result<String, BindingError>,
{
    fn run_bash(&self, request: &RunBashRequest) -> Result<RunBashResponse, BindingError> {
        self.exchange(LibraryOperation::RunBash, request)
    }

    fn run_powershell(
        &self,
        request: &RunPowerShellRequest,
    ) -> Result<RunPowerShellResponse, BindingError> {
        self.exchange(LibraryOperation::RunPowerShell, request)
    }

    fn run_sync(&self, request: &RunSyncRequest) -> Result<RunSyncResponse, BindingError> {
        self.exchange(LibraryOperation::RunSync, request)
    }

    fn run_expect(&self, request: &RunExpectRequest) -> Result<RunExpectResponse, BindingError> {
        self.exchange(LibraryOperation::RunExpect, request)
    }
}

#[cfg(test)]
mod tests;
