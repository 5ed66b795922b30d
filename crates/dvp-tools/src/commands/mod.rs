//! The `init`, `build` and `upload` commands.

pub mod build;
pub mod init;
pub mod upload;

pub use self::build::build;
pub use self::init::init;
pub use self::upload::upload;
