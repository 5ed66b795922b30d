//! Reads and validates a plugin config file.
//!
//! Checks run in order and stop at the first failure: the config is
//! validated against the bundled schema, then its entry point is parsed,
//! then the paths it names are resolved next to the config file and
//! checked, and last the entry-point module must exist in the sources.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::ToolError;
use crate::file_util::{sibling_path, validate_directory, validate_file};
use crate::plugin_config::PluginConfig;
use crate::schema;

/// A config that passed every check, with its paths resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedPluginConfig {
    config: PluginConfig,
    src_dir: PathBuf,
    schema_file: PathBuf,
}

impl ValidatedPluginConfig {
    /// The parsed config.
    #[must_use]
    pub const fn config(&self) -> &PluginConfig {
        &self.config
    }

    /// Source directory resolved against the config file's directory.
    #[must_use]
    pub fn src_dir(&self) -> &Path {
        &self.src_dir
    }

    /// Schema file resolved against the config file's directory.
    #[must_use]
    pub fn schema_file(&self) -> &Path {
        &self.schema_file
    }
}

/// Validates a plugin config file.
#[derive(Debug, Clone)]
pub struct PluginValidator {
    path: PathBuf,
}

impl PluginValidator {
    /// Creates a validator for the config file at `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Reads the config file and runs every check.
    ///
    /// # Errors
    ///
    /// Returns the first failing check's error.
    pub fn validate(&self) -> Result<ValidatedPluginConfig, ToolError> {
        let content = self.read()?;
        tracing::debug!(path = %self.path.display(), "validating plugin config");
        self.validate_content(&content)
    }

    fn read(&self) -> Result<Value, ToolError> {
        tracing::info!(path = %self.path.display(), "reading plugin config file");
        let text = fs::read_to_string(&self.path).map_err(|source| ToolError::ReadPluginConfig {
            path: self.path.clone(),
            source,
        })?;
        let yaml: serde_yaml::Value = serde_yaml::from_str(&text).map_err(|error| {
            let position = error.location().map_or_else(
                || String::from("unknown"),
                |location| format!("{}:{}", location.line(), location.column()),
            );
            ToolError::InvalidYaml {
                path: self.path.clone(),
                position,
            }
        })?;
        serde_json::to_value(yaml).map_err(|error| {
            ToolError::User(format!(
                "Plugin config file '{}' cannot be represented as json: {error}",
                self.path.display()
            ))
        })
    }

    fn validate_content(&self, content: &Value) -> Result<ValidatedPluginConfig, ToolError> {
        schema::validate(&schema::plugin_config_schema()?, content, &self.path)?;
        let config: PluginConfig = serde_json::from_value(content.clone()).map_err(|error| {
            ToolError::User(format!(
                "Plugin config file '{}' is not valid: {error}",
                self.path.display()
            ))
        })?;

        let (module, object) = config.entry_point_parts();
        if module.is_empty() {
            return Err(ToolError::User(String::from("Plugin module is invalid")));
        }
        if object.is_empty() {
            return Err(ToolError::User(String::from("Plugin object is invalid")));
        }

        let src_dir = sibling_path(&self.path, &config.src_dir);
        let schema_file = sibling_path(&self.path, &config.schema_file);
        validate_directory(&src_dir)?;
        validate_file(&schema_file)?;

        let module_file = module_path(&src_dir, module);
        if !module_file.is_file() {
            return Err(ToolError::ValidationFailed(vec![format!(
                "Entry point module '{module}' was not found at '{}'",
                module_file.display()
            )]));
        }

        Ok(ValidatedPluginConfig {
            config,
            src_dir,
            schema_file,
        })
    }
}

fn module_path(src_dir: &Path, module: &str) -> PathBuf {
    let mut path = module
        .split('.')
        .fold(src_dir.to_path_buf(), |path, part| path.join(part));
    path.set_extension("py");
    path
}
