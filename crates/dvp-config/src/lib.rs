//! Shared configuration for the plugin toolchain.
//!
//! Values are layered with `ortho_config`: built-in defaults, then a TOML
//! file named by `--config-path` (or `DVP_CONFIG_PATH`), then `DVP_*`
//! environment variables, then command-line flags.

mod defaults;
mod logging;

use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};

pub use defaults::{
    DEFAULT_LOG_FILTER, DEFAULT_UPLOAD_TIMEOUT_SECS, default_log_filter,
    default_log_filter_string, default_log_format, default_upload_timeout_secs,
};
pub use logging::{LogFormat, LogFormatParseError};

/// Errors returned when configuration cannot be loaded.
pub type ConfigError = ortho_config::OrthoError;

/// Toolchain configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, OrthoConfig)]
#[ortho_config(prefix = "DVP")]
pub struct Config {
    /// `tracing` filter expression applied to log output.
    #[ortho_config(default = default_log_filter_string())]
    pub log_filter: String,
    /// Log output format.
    #[ortho_config(default = default_log_format())]
    pub log_format: LogFormat,
    /// Engine host used by `upload` when none is given on the command line.
    pub default_engine: Option<String>,
    /// Engine user used by `upload` when none is given on the command line.
    pub default_user: Option<String>,
    /// Timeout in seconds for each HTTP request made during upload.
    #[ortho_config(default = DEFAULT_UPLOAD_TIMEOUT_SECS)]
    pub upload_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_filter: default_log_filter_string(),
            log_format: default_log_format(),
            default_engine: None,
            default_user: None,
            upload_timeout_secs: default_upload_timeout_secs(),
        }
    }
}

impl Config {
    /// Loads configuration from the given arguments plus the environment
    /// and any configuration file they name.
    ///
    /// The first argument is the program name.
    pub fn from_args<I, T>(args: I) -> Result<Self, std::sync::Arc<ConfigError>>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        <Self as OrthoConfig>::load_from_iter(args)
    }

    /// Log filter expression.
    #[must_use]
    pub fn log_filter(&self) -> &str {
        self.log_filter.as_str()
    }

    /// Log output format.
    #[must_use]
    pub fn log_format(&self) -> LogFormat {
        self.log_format
    }

    /// Default engine host for uploads.
    #[must_use]
    pub fn default_engine(&self) -> Option<&str> {
        self.default_engine.as_deref()
    }

    /// Default engine user for uploads.
    #[must_use]
    pub fn default_user(&self) -> Option<&str> {
        self.default_user.as_deref()
    }

    /// Per-request upload timeout.
    #[must_use]
    pub fn upload_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.upload_timeout_secs)
    }
}
