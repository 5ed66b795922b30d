//! Plugin-facing platform surface.
//!
//! A plugin implements a subset of the lifecycle [`Operation`]s. The platform
//! records each implementation in an [`OperationRegistry`], rejects duplicate
//! definitions, and reports a missing implementation when the engine asks
//! for one. Plugin code fails an operation by returning a [`UserError`];
//! mistakes in the plugin itself surface as [`PluginRuntimeError`].

pub mod error;
pub mod operation;
pub mod reference;
pub mod registry;

pub use self::error::{PlatformError, PluginRuntimeError, UserError};
pub use self::operation::{Definition, Operation};
pub use self::reference::validate_environment_reference;
pub use self::registry::{OperationRegistry, check_return_type};
