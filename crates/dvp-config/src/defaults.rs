use crate::logging::LogFormat;

/// Default log filter expression.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Default timeout, in seconds, for engine HTTP requests.
pub const DEFAULT_UPLOAD_TIMEOUT_SECS: u64 = 300;

/// Default log filter expression.
pub fn default_log_filter() -> &'static str {
    DEFAULT_LOG_FILTER
}

/// Owned log filter value used where allocation is required (e.g. serde).
pub fn default_log_filter_string() -> String {
    DEFAULT_LOG_FILTER.to_owned()
}

/// Default logging format. The tool is run interactively, so human-readable.
pub fn default_log_format() -> LogFormat {
    LogFormat::Compact
}

/// Default timeout for engine HTTP requests.
pub fn default_upload_timeout_secs() -> u64 {
    DEFAULT_UPLOAD_TIMEOUT_SECS
}
