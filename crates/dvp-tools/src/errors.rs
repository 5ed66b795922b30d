//! Errors reported by the toolchain.
//!
//! Every variant's `Display` output is the message shown to the user when a
//! command fails, so wording is part of the interface.

use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

use crate::package_util::{ApiVersion, ApiVersionType};
use crate::telemetry::TelemetryError;

/// Failure of a toolchain command.
#[derive(Debug, Error)]
pub enum ToolError {
    /// Free-form failure with a ready-made message.
    #[error("{0}")]
    User(String),

    /// The command line could not be parsed.
    #[error("{0}")]
    CliUsage(clap::Error),

    /// Configuration could not be loaded.
    #[error("failed to load configuration: {0}")]
    LoadConfiguration(Arc<ortho_config::OrthoError>),

    /// Logging could not be set up.
    #[error(transparent)]
    Telemetry(#[from] TelemetryError),

    /// A required upload setting was given neither as a flag nor in config.
    #[error("No {setting} was given. Pass {flag} or set {setting} in the configuration.")]
    MissingSetting {
        /// Configuration key that could have supplied the value.
        setting: &'static str,
        /// Command-line flag that could have supplied the value.
        flag: &'static str,
    },

    /// The upload artifact's `engineApi` is missing or malformed.
    #[error(
        "The engineApi field is either missing or malformed. The field must be of the form:\n{}\nVerify that the artifact passed in was generated by the build function.",
        engine_api_example()
    )]
    InvalidArtifact,

    /// The engine answered with an `ErrorResult`.
    #[error("Plugin upload failed with HTTP Status {status}\n{}", parse_error_details(.error))]
    HttpPost {
        /// HTTP status of the response.
        status: u16,
        /// The `error` object of the response.
        error: serde_json::Value,
    },

    /// The engine answered with something other than a result object.
    #[error("Received an unexpected error with HTTP Status {status},\nDumping full response:\n{response}")]
    Unexpected {
        /// HTTP status of the response.
        status: u16,
        /// Response body as received.
        response: String,
    },

    /// The engine could not be reached.
    #[error("Unable to connect to the engine at {url}: {source}")]
    Connection {
        /// Endpoint that was requested.
        url: String,
        /// Underlying transport error.
        #[source]
        source: reqwest::Error,
    },

    /// The engine host does not form a valid URL.
    #[error("'{engine}' is not a valid engine address: {source}")]
    InvalidEngine {
        /// Engine host as given.
        engine: String,
        /// Parse failure.
        #[source]
        source: url::ParseError,
    },

    /// A document failed JSON-Schema validation.
    #[error("{}\nValidation failed on '{}'.", .errors.join("\n"), .file.display())]
    SchemaValidation {
        /// File whose content was validated.
        file: PathBuf,
        /// Every validation error, sorted.
        errors: Vec<String>,
    },

    /// Checks on plugin sources produced warnings.
    #[error("Plugin validation failed:\n{}", .0.join("\n"))]
    ValidationFailed(Vec<String>),

    /// The plugin config file could not be read.
    #[error(
        "Unable to read plugin config file '{}'\nError code: {}. Error message: {}",
        .path.display(), errno(.source), strerror(.source)
    )]
    ReadPluginConfig {
        /// Config file path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The plugin config file is not YAML.
    #[error(
        "Command failed because the plugin config file provided as input '{}' was not valid yaml. Verify the file contents. Error position: {position}",
        .path.display()
    )]
    InvalidYaml {
        /// Config file path.
        path: PathBuf,
        /// `line:column` of the first error.
        position: String,
    },

    /// The schema file could not be read.
    #[error(
        "Unable to load schemas from '{}'\nError code: {}. Error message: {}",
        .path.display(), errno(.source), strerror(.source)
    )]
    ReadSchemas {
        /// Schema file path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The schema file is not JSON.
    #[error(
        "Failed to load schemas because '{}' is not a valid json file. Error: {source}",
        .path.display()
    )]
    InvalidSchemaJson {
        /// Schema file path.
        path: PathBuf,
        /// Parse failure.
        #[source]
        source: serde_json::Error,
    },

    /// A path that must exist does not.
    #[error("The path '{}' does not exist.", .0.display())]
    PathDoesNotExist(PathBuf),

    /// A path that must be a file is not.
    #[error("The path '{}' should be a file but is not.", .0.display())]
    PathIsNotFile(PathBuf),

    /// A path that must be a directory is not.
    #[error("The path '{}' should be a directory but is not.", .0.display())]
    PathIsNotDirectory(PathBuf),

    /// A path that must not exist does.
    #[error("The path '{}' already exists.", .0.display())]
    PathExists(PathBuf),

    /// Python definitions could not be generated.
    #[error("Unable to generate Python definitions: {0}")]
    Codegen(String),

    /// The plugin source directory could not be read.
    #[error(
        "Failed to read source code directory {}. Error code: {}. Error message: {}",
        .dir.display(), errno(.source), strerror(.source)
    )]
    ReadSourceDirectory {
        /// Source directory.
        dir: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The plugin sources could not be compressed.
    #[error("Failed to compress source code in the directory {}. Error message: {source}", .dir.display())]
    Compress {
        /// Source directory.
        dir: PathBuf,
        /// Underlying archive error.
        #[source]
        source: zip::result::ZipError,
    },

    /// The upload artifact could not be written.
    #[error(
        "Failed to write upload_artifact file to {}. Error code: {}. Error message: {}",
        .path.display(), errno(.source), strerror(.source)
    )]
    WriteArtifact {
        /// Artifact path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The upload artifact could not be read.
    #[error(
        "Unable to read upload artifact file '{}'\nError code: {}. Error message: {}",
        .path.display(), errno(.source), strerror(.source)
    )]
    ReadArtifact {
        /// Artifact path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The upload artifact is not JSON.
    #[error(
        "Upload failed because the upload artifact was not a valid json file. Verify the file was built using the build command. Error: {source}"
    )]
    InvalidArtifactJson {
        /// Parse failure.
        #[source]
        source: serde_json::Error,
    },

    /// `init` failed and the files it created were removed.
    #[error("Failed to initialize plugin directory '{}': {cause}.", .root.display())]
    InitFailed {
        /// Plugin root directory.
        root: PathBuf,
        /// Failure that aborted initialisation.
        cause: Box<ToolError>,
    },
}

/// Returns the OS error number of `error`, or `unknown` when it has none.
pub(crate) fn errno(error: &io::Error) -> String {
    error
        .raw_os_error()
        .map_or_else(|| String::from("unknown"), |code| code.to_string())
}

/// Returns the OS description of `error` without the `(os error N)` suffix.
pub(crate) fn strerror(error: &io::Error) -> String {
    let text = error.to_string();
    text.split(" (os error ")
        .next()
        .map_or_else(String::new, str::to_owned)
}

fn engine_api_example() -> String {
    let example = ApiVersion {
        kind: ApiVersionType::ApiVersion,
        major: 1,
        minor: 7,
        micro: 0,
    };
    serde_json::to_string_pretty(&example).unwrap_or_default()
}

/// Renders the `details` and `action` of an engine error object.
pub(crate) fn parse_error_details(error: &serde_json::Value) -> String {
    let details = match error.get("details").filter(|value| is_present(value)) {
        Some(details) => format!("Details: {}", display_value(details)),
        None => format!(
            "Unable to parse details of error. Dumping full response: {}",
            serde_json::to_string_pretty(error).unwrap_or_default()
        ),
    };
    match error.get("action").filter(|value| is_present(value)) {
        Some(action) => format!("{details}\nAction: {}", display_value(action)),
        None => details,
    }
}

fn is_present(value: &serde_json::Value) -> bool {
    match value {
        serde_json::Value::Null => false,
        serde_json::Value::String(text) => !text.is_empty(),
        _ => true,
    }
}

fn display_value(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
