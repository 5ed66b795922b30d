//! Runtime library for virtualization plugins.
//!
//! Plugin code uses this crate to act on the hosts the platform manages: run
//! a bash or `PowerShell` command, run an expect script, or sync a directory
//! from a host. The work itself is done by the engine. The library builds the
//! request message, hands it to the engine binding, and turns the single
//! response into a value or an error.
//!
//! # Error policy
//!
//! Responses carry either a `return_value` or an `error`. Errors come in
//! two kinds:
//!
//! - **actionable** errors carry an id and a message meant for the end user
//!   and are returned as [`LibraryError`];
//! - **non-actionable** errors signal an unexpected engine failure and end
//!   the process through a [`Terminator`], so plugin code cannot swallow
//!   them.
//!
//! # Example
//!
//! ```rust,no_run
//! use dvp_libs::{JsonBinding, Libs, LibraryOperation};
//! use dvp_libs::protocol::{RemoteConnection, RemoteEnvironment};
//!
//! # fn engine_call(_: LibraryOperation, _: &str) -> Result<String, dvp_libs::BindingError> { todo!() }
//! let libs = Libs::new(JsonBinding::new(engine_call));
//! let connection = RemoteConnection::new(RemoteEnvironment::new(
//!     "oracle-host",
//!     "UNIX_HOST_ENVIRONMENT-12",
//! ));
//! let result = libs.run_bash(&connection, "hostname", None, false)?;
//! println!("{}", result.stdout());
//! # Ok::<(), dvp_libs::LibsError>(())
//! ```

pub mod binding;
pub mod decoder;
pub mod dispatcher;
pub mod error;
pub mod protocol;

#[cfg(test)]
mod tests;

pub use self::binding::{EngineBinding, JsonBinding, LibraryOperation};
pub use self::decoder::{ProcessTerminator, Terminator};
pub use self::dispatcher::Libs;
pub use self::error::{BindingError, LibraryError, LibsError};
pub use self::protocol::{CommandResult, RemoteConnection, RemoteEnvironment};
