//! Message types exchanged with the engine binding.
//!
//! Every remote operation is a single request/response exchange. Requests
//! carry the [`RemoteConnection`] identifying the target host plus the
//! operation-specific fields; responses carry either a `return_value` or an
//! `error`. Field names are fixed by the engine and must not be renamed.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// Host environment an operation targets.
///
/// # Example
///
/// ```
/// use dvp_libs::protocol::RemoteEnvironment;
///
/// let environment = RemoteEnvironment::new("prod", "UNIX_HOST_ENVIRONMENT-3");
/// assert_eq!(environment.name(), "prod");
/// assert_eq!(environment.reference(), "UNIX_HOST_ENVIRONMENT-3");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteEnvironment {
    name: String,
    reference: String,
}

impl RemoteEnvironment {
    /// Creates an environment descriptor.
    #[must_use]
    pub fn new(name: impl Into<String>, reference: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            reference: reference.into(),
        }
    }

    /// Returns the environment name.
    #[must_use]
    pub const fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns the engine reference of the environment.
    #[must_use]
    pub const fn reference(&self) -> &str {
        self.reference.as_str()
    }
}

/// Environment user the operation runs as.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteUser {
    name: String,
    reference: String,
}

impl RemoteUser {
    /// Creates a user descriptor.
    #[must_use]
    pub fn new(name: impl Into<String>, reference: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            reference: reference.into(),
        }
    }

    /// Returns the user name.
    #[must_use]
    pub const fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns the engine reference of the user.
    #[must_use]
    pub const fn reference(&self) -> &str {
        self.reference.as_str()
    }
}

/// Host details attached to a connection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteHost {
    name: String,
    reference: String,
    #[serde(default)]
    binary_path: String,
    #[serde(default)]
    scratch_path: String,
}

impl RemoteHost {
    /// Creates a host descriptor with empty toolkit paths.
    #[must_use]
    pub fn new(name: impl Into<String>, reference: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            reference: reference.into(),
            binary_path: String::new(),
            scratch_path: String::new(),
        }
    }

    /// Sets the directory holding the toolkit binaries on the host.
    #[must_use]
    pub fn with_binary_path(mut self, binary_path: impl Into<String>) -> Self {
        self.binary_path = binary_path.into();
        self
    }

    /// Sets the scratch directory the toolkit may write to on the host.
    #[must_use]
    pub fn with_scratch_path(mut self, scratch_path: impl Into<String>) -> Self {
        self.scratch_path = scratch_path.into();
        self
    }

    /// Returns the host name.
    #[must_use]
    pub const fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns the engine reference of the host.
    #[must_use]
    pub const fn reference(&self) -> &str {
        self.reference.as_str()
    }

    /// Returns the toolkit binary directory.
    #[must_use]
    pub const fn binary_path(&self) -> &str {
        self.binary_path.as_str()
    }

    /// Returns the toolkit scratch directory.
    #[must_use]
    pub const fn scratch_path(&self) -> &str {
        self.scratch_path.as_str()
    }
}

/// Identifies the target host environment of a remote operation.
///
/// Constructed by the caller and passed through to the binding unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteConnection {
    environment: RemoteEnvironment,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    user: Option<RemoteUser>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    host: Option<RemoteHost>,
}

impl RemoteConnection {
    /// Creates a connection to the given environment.
    #[must_use]
    pub const fn new(environment: RemoteEnvironment) -> Self {
        Self {
            environment,
            user: None,
            host: None,
        }
    }

    /// Attaches the environment user.
    #[must_use]
    pub fn with_user(mut self, user: RemoteUser) -> Self {
        self.user = Some(user);
        self
    }

    /// Attaches host details.
    #[must_use]
    pub fn with_host(mut self, host: RemoteHost) -> Self {
        self.host = Some(host);
        self
    }

    /// Returns the target environment.
    #[must_use]
    pub const fn environment(&self) -> &RemoteEnvironment {
        &self.environment
    }

    /// Returns the environment user, if any.
    #[must_use]
    pub const fn user(&self) -> Option<&RemoteUser> {
        self.user.as_ref()
    }

    /// Returns the host details, if any.
    #[must_use]
    pub const fn host(&self) -> Option<&RemoteHost> {
        self.host.as_ref()
    }
}

/// Request for `run_bash`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunBashRequest {
    remote_connection: RemoteConnection,
    #[serde(default)]
    command: String,
    #[serde(default)]
    variables: BTreeMap<String, String>,
    #[serde(default)]
    use_login_shell: bool,
}

impl RunBashRequest {
    /// Creates a request with no variables and a non-login shell.
    #[must_use]
    pub fn new(remote_connection: RemoteConnection, command: impl Into<String>) -> Self {
        Self {
            remote_connection,
            command: command.into(),
            variables: BTreeMap::new(),
            use_login_shell: false,
        }
    }

    /// Sets the environment variables exported to the command.
    #[must_use]
    pub fn with_variables<I>(mut self, variables: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        self.variables = variables.into_iter().collect();
        self
    }

    /// Selects whether the command runs in a login shell.
    #[must_use]
    pub const fn with_login_shell(mut self, use_login_shell: bool) -> Self {
        self.use_login_shell = use_login_shell;
        self
    }

    /// Returns the target connection.
    #[must_use]
    pub const fn remote_connection(&self) -> &RemoteConnection {
        &self.remote_connection
    }

    /// Returns the command text.
    #[must_use]
    pub const fn command(&self) -> &str {
        self.command.as_str()
    }

    /// Returns the exported variables.
    #[must_use]
    pub const fn variables(&self) -> &BTreeMap<String, String> {
        &self.variables
    }

    /// Returns whether a login shell is requested.
    #[must_use]
    pub const fn use_login_shell(&self) -> bool {
        self.use_login_shell
    }
}

/// Request for `run_powershell`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunPowerShellRequest {
    remote_connection: RemoteConnection,
    #[serde(default)]
    command: String,
    #[serde(default)]
    variables: BTreeMap<String, String>,
}

impl RunPowerShellRequest {
    /// Creates a request with no variables.
    #[must_use]
    pub fn new(remote_connection: RemoteConnection, command: impl Into<String>) -> Self {
        Self {
            remote_connection,
            command: command.into(),
            variables: BTreeMap::new(),
        }
    }

    /// Sets the environment variables exported to the command.
    #[must_use]
    pub fn with_variables<I>(mut self, variables: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        self.variables = variables.into_iter().collect();
        self
    }

    /// Returns the target connection.
    #[must_use]
    pub const fn remote_connection(&self) -> &RemoteConnection {
        &self.remote_connection
    }

    /// Returns the command text.
    #[must_use]
    pub const fn command(&self) -> &str {
        self.command.as_str()
    }

    /// Returns the exported variables.
    #[must_use]
    pub const fn variables(&self) -> &BTreeMap<String, String> {
        &self.variables
    }
}

/// Request for `run_sync`.
///
/// Path sets are unordered; they serialise in sorted order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSyncRequest {
    remote_connection: RemoteConnection,
    #[serde(default)]
    source_directory: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    rsync_user: Option<String>,
    #[serde(default)]
    exclude_paths: BTreeSet<String>,
    #[serde(default)]
    sym_links_to_follow: BTreeSet<String>,
}

impl RunSyncRequest {
    /// Creates a request with no rsync user and empty path sets.
    #[must_use]
    pub fn new(remote_connection: RemoteConnection, source_directory: impl Into<String>) -> Self {
        Self {
            remote_connection,
            source_directory: source_directory.into(),
            rsync_user: None,
            exclude_paths: BTreeSet::new(),
            sym_links_to_follow: BTreeSet::new(),
        }
    }

    /// Sets the user rsync connects as.
    #[must_use]
    pub fn with_rsync_user(mut self, rsync_user: impl Into<String>) -> Self {
        self.rsync_user = Some(rsync_user.into());
        self
    }

    /// Sets the paths excluded from the sync.
    #[must_use]
    pub fn with_exclude_paths(mut self, exclude_paths: BTreeSet<String>) -> Self {
        self.exclude_paths = exclude_paths;
        self
    }

    /// Sets the symbolic links whose targets are copied.
    #[must_use]
    pub fn with_sym_links_to_follow(mut self, sym_links_to_follow: BTreeSet<String>) -> Self {
        self.sym_links_to_follow = sym_links_to_follow;
        self
    }

    /// Returns the target connection.
    #[must_use]
    pub const fn remote_connection(&self) -> &RemoteConnection {
        &self.remote_connection
    }

    /// Returns the directory to sync from.
    #[must_use]
    pub const fn source_directory(&self) -> &str {
        self.source_directory.as_str()
    }

    /// Returns the rsync user, if one was given.
    #[must_use]
    pub fn rsync_user(&self) -> Option<&str> {
        self.rsync_user.as_deref()
    }

    /// Returns the excluded paths.
    #[must_use]
    pub const fn exclude_paths(&self) -> &BTreeSet<String> {
        &self.exclude_paths
    }

    /// Returns the symbolic links to follow.
    #[must_use]
    pub const fn sym_links_to_follow(&self) -> &BTreeSet<String> {
        &self.sym_links_to_follow
    }
}

/// Request for `run_expect`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunExpectRequest {
    remote_connection: RemoteConnection,
    #[serde(default)]
    command: String,
    #[serde(default)]
    variables: BTreeMap<String, String>,
}

impl RunExpectRequest {
    /// Creates a request with no variables.
    #[must_use]
    pub fn new(remote_connection: RemoteConnection, command: impl Into<String>) -> Self {
        Self {
            remote_connection,
            command: command.into(),
            variables: BTreeMap::new(),
        }
    }

    /// Sets the variables made available to the expect script.
    #[must_use]
    pub fn with_variables<I>(mut self, variables: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        self.variables = variables.into_iter().collect();
        self
    }

    /// Returns the target connection.
    #[must_use]
    pub const fn remote_connection(&self) -> &RemoteConnection {
        &self.remote_connection
    }

    /// Returns the expect script.
    #[must_use]
    pub const fn command(&self) -> &str {
        self.command.as_str()
    }

    /// Returns the script variables.
    #[must_use]
    pub const fn variables(&self) -> &BTreeMap<String, String> {
        &self.variables
    }
}

/// Outcome of a shell command run on a remote host.
///
/// The engine omits zero-valued fields, so a missing `exit_code`, `stdout`
/// or `stderr` reads as `0` or empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommandResult {
    exit_code: i32,
    stdout: String,
    stderr: String,
}

impl CommandResult {
    /// Creates a command result.
    #[must_use]
    pub fn new(exit_code: i32, stdout: impl Into<String>, stderr: impl Into<String>) -> Self {
        Self {
            exit_code,
            stdout: stdout.into(),
            stderr: stderr.into(),
        }
    }

    /// Returns the command's exit code.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        self.exit_code
    }

    /// Returns everything the command wrote to standard output.
    #[must_use]
    pub const fn stdout(&self) -> &str {
        self.stdout.as_str()
    }

    /// Returns everything the command wrote to standard error.
    #[must_use]
    pub const fn stderr(&self) -> &str {
        self.stderr.as_str()
    }
}

/// Success payload of `run_bash`.
pub type RunBashResult = CommandResult;

/// Success payload of `run_powershell`.
pub type RunPowerShellResult = CommandResult;

/// Empty success payload for operations that only signal completion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Empty {}

/// Success payload carried in a response's `return_value`.
pub trait ReturnValue: Sized {
    /// Payload a response stands for when it populates neither
    /// `return_value` nor `error`.
    ///
    /// `None` means such a response is malformed.
    fn implied() -> Option<Self>;
}

impl ReturnValue for CommandResult {
    fn implied() -> Option<Self> {
        None
    }
}

impl ReturnValue for Empty {
    fn implied() -> Option<Self> {
        Some(Self {})
    }
}

/// Success payload of `run_sync`.
pub type RunSyncResult = Empty;

/// Success payload of `run_expect`.
pub type RunExpectResult = Empty;

/// A known, user-meaningful library failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionableLibraryError {
    id: i64,
    message: String,
}

impl ActionableLibraryError {
    /// Creates an actionable error payload.
    #[must_use]
    pub fn new(id: i64, message: impl Into<String>) -> Self {
        Self {
            id,
            message: message.into(),
        }
    }

    /// Returns the error identifier.
    #[must_use]
    pub const fn id(&self) -> i64 {
        self.id
    }

    /// Returns the error message.
    #[must_use]
    pub const fn message(&self) -> &str {
        self.message.as_str()
    }
}

/// Marker for an unexpected internal failure with no structured detail.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NonActionableLibraryError {}

/// Error union carried by a response.
///
/// Exactly one of the two fields is populated in a well-formed message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LibraryErrorUnion {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    actionable_error: Option<ActionableLibraryError>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    non_actionable_error: Option<NonActionableLibraryError>,
}

impl LibraryErrorUnion {
    /// Creates a union holding an actionable error.
    #[must_use]
    pub const fn actionable(error: ActionableLibraryError) -> Self {
        Self {
            actionable_error: Some(error),
            non_actionable_error: None,
        }
    }

    /// Creates a union holding the non-actionable marker.
    #[must_use]
    pub const fn non_actionable() -> Self {
        Self {
            actionable_error: None,
            non_actionable_error: Some(NonActionableLibraryError {}),
        }
    }

    /// Creates a union from raw parts, including malformed combinations.
    #[must_use]
    pub const fn from_parts(
        actionable_error: Option<ActionableLibraryError>,
        non_actionable_error: Option<NonActionableLibraryError>,
    ) -> Self {
        Self {
            actionable_error,
            non_actionable_error,
        }
    }

    /// Returns the actionable error, if populated.
    #[must_use]
    pub const fn actionable_error(&self) -> Option<&ActionableLibraryError> {
        self.actionable_error.as_ref()
    }

    /// Returns the non-actionable marker, if populated.
    #[must_use]
    pub const fn non_actionable_error(&self) -> Option<&NonActionableLibraryError> {
        self.non_actionable_error.as_ref()
    }
}

/// Response returned by the binding for one operation.
///
/// This is the wire shape: both members are optional so that a malformed
/// message can still be represented and rejected by [`Self::into_outcome`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationResponse<T> {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    return_value: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    error: Option<LibraryErrorUnion>,
}

impl<T> OperationResponse<T> {
    /// Creates a successful response.
    #[must_use]
    pub const fn success(return_value: T) -> Self {
        Self {
            return_value: Some(return_value),
            error: None,
        }
    }

    /// Creates a response carrying an actionable error.
    #[must_use]
    pub fn actionable(id: i64, message: impl Into<String>) -> Self {
        Self {
            return_value: None,
            error: Some(LibraryErrorUnion::actionable(ActionableLibraryError::new(
                id, message,
            ))),
        }
    }

    /// Creates a response carrying the non-actionable marker.
    #[must_use]
    pub const fn non_actionable() -> Self {
        Self {
            return_value: None,
            error: Some(LibraryErrorUnion::non_actionable()),
        }
    }

    /// Creates a response from raw parts, including malformed combinations.
    #[must_use]
    pub const fn from_parts(return_value: Option<T>, error: Option<LibraryErrorUnion>) -> Self {
        Self {
            return_value,
            error,
        }
    }

    /// Returns the success payload, if populated.
    #[must_use]
    pub const fn return_value(&self) -> Option<&T> {
        self.return_value.as_ref()
    }

    /// Returns the error union, if populated.
    #[must_use]
    pub const fn error(&self) -> Option<&LibraryErrorUnion> {
        self.error.as_ref()
    }

    /// Converts the wire shape into its tagged form.
    ///
    /// Operations without a payload succeed on any response that carries no
    /// error, including one with neither member populated.
    ///
    /// # Panics
    ///
    /// Panics when the message violates the union invariant: both
    /// `return_value` and `error` populated, neither populated for an
    /// operation that returns a payload, or neither or both members of the
    /// error union populated. Such a message is a defect in the binding.
    #[must_use]
    pub fn into_outcome(self) -> ResponseOutcome<T>
    where
        T: ReturnValue,
    {
        match (self.return_value, self.error) {
            (Some(value), None) => ResponseOutcome::Success(value),
            (None, Some(error)) => match (error.actionable_error, error.non_actionable_error) {
                (Some(actionable), None) => ResponseOutcome::Actionable(actionable),
                (None, Some(_)) => ResponseOutcome::NonActionable,
                (Some(_), Some(_)) => {
                    panic!("protocol violation: error union populates both members")
                }
                (None, None) => panic!("protocol violation: error union is empty"),
            },
            (Some(_), Some(_)) => {
                panic!("protocol violation: response populates both return_value and error")
            }
            (None, None) => match T::implied() {
                Some(value) => ResponseOutcome::Success(value),
                None => {
                    panic!("protocol violation: response populates neither return_value nor error")
                }
            },
        }
    }
}

/// Tagged view of a well-formed [`OperationResponse`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseOutcome<T> {
    /// The operation succeeded with the given payload.
    Success(T),
    /// The operation failed with a user-meaningful error.
    Actionable(ActionableLibraryError),
    /// The operation failed unexpectedly.
    NonActionable,
}

/// Response of `run_bash`.
pub type RunBashResponse = OperationResponse<RunBashResult>;

/// Response of `run_powershell`.
pub type RunPowerShellResponse = OperationResponse<RunPowerShellResult>;

/// Response of `run_sync`.
pub type RunSyncResponse = OperationResponse<RunSyncResult>;

/// Response of `run_expect`.
pub type RunExpectResponse = OperationResponse<RunExpectResult>;
