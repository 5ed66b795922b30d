//! JSON-Schema validation of plugin files.
//!
//! Two schemas ship with the toolchain: one for the plugin config and a
//! meta schema for the plugin's own `schema.json`. Both are validated with
//! Draft 7 and every error is reported, not just the first.

use std::fs;
use std::path::Path;

use serde_json::Value;

use crate::ToolError;

const PLUGIN_CONFIG_SCHEMA: &str = include_str!("../../assets/plugin_config_schema.json");
const PLUGIN_SCHEMA: &str = include_str!("../../assets/plugin_schema.json");

/// The five type definitions of a plugin's schema file.
#[derive(Debug, Clone, PartialEq)]
pub struct PluginSchemas {
    repository: Value,
    source_config: Value,
    virtual_source: Value,
    linked_source: Value,
    snapshot: Value,
}

impl PluginSchemas {
    fn from_document(document: &Value) -> Self {
        let take = |key: &str| document.get(key).cloned().unwrap_or(Value::Null);
        Self {
            repository: take("repositoryDefinition"),
            source_config: take("sourceConfigDefinition"),
            virtual_source: take("virtualSourceDefinition"),
            linked_source: take("linkedSourceDefinition"),
            snapshot: take("snapshotDefinition"),
        }
    }

    /// Repository definition.
    #[must_use]
    pub const fn repository(&self) -> &Value {
        &self.repository
    }

    /// Source config definition.
    #[must_use]
    pub const fn source_config(&self) -> &Value {
        &self.source_config
    }

    /// Virtual source definition.
    #[must_use]
    pub const fn virtual_source(&self) -> &Value {
        &self.virtual_source
    }

    /// Linked source definition.
    #[must_use]
    pub const fn linked_source(&self) -> &Value {
        &self.linked_source
    }

    /// Snapshot definition.
    #[must_use]
    pub const fn snapshot(&self) -> &Value {
        &self.snapshot
    }

    /// Definitions in schema-file order, keyed by generated class name.
    #[must_use]
    pub fn by_class(&self) -> [(&'static str, &Value); 5] {
        [
            ("RepositoryDefinition", &self.repository),
            ("SourceConfigDefinition", &self.source_config),
            ("VirtualSourceDefinition", &self.virtual_source),
            ("LinkedSourceDefinition", &self.linked_source),
            ("SnapshotDefinition", &self.snapshot),
        ]
    }
}

/// Returns the bundled plugin config schema.
pub(crate) fn plugin_config_schema() -> Result<Value, ToolError> {
    parse_bundled(PLUGIN_CONFIG_SCHEMA)
}

fn parse_bundled(text: &str) -> Result<Value, ToolError> {
    serde_json::from_str(text)
        .map_err(|error| ToolError::User(format!("Bundled schema is not valid json: {error}")))
}

/// Validates `instance` against `schema`, reporting failures against `file`.
pub(crate) fn validate(schema: &Value, instance: &Value, file: &Path) -> Result<(), ToolError> {
    let validator = jsonschema::draft7::new(schema)
        .map_err(|error| ToolError::User(format!("Bundled schema is invalid: {error}")))?;

    let mut errors: Vec<String> = validator
        .iter_errors(instance)
        .map(|error| {
            let location = error.instance_path.to_string();
            if location.is_empty() {
                error.to_string()
            } else {
                format!("{error} at '{location}'")
            }
        })
        .collect();

    if errors.is_empty() {
        return Ok(());
    }
    errors.sort();
    Err(ToolError::SchemaValidation {
        file: file.to_path_buf(),
        errors,
    })
}

/// Reads the plugin's schema file and validates it against the meta schema.
///
/// # Errors
///
/// Returns [`ToolError::ReadSchemas`] when the file cannot be read,
/// [`ToolError::InvalidSchemaJson`] when it is not JSON and
/// [`ToolError::SchemaValidation`] when it does not define the five
/// required types.
pub fn read_and_validate_schema_file(path: &Path) -> Result<PluginSchemas, ToolError> {
    tracing::info!(path = %path.display(), "reading schemas");
    let text = fs::read_to_string(path).map_err(|source| ToolError::ReadSchemas {
        path: path.to_path_buf(),
        source,
    })?;
    let document: Value =
        serde_json::from_str(&text).map_err(|source| ToolError::InvalidSchemaJson {
            path: path.to_path_buf(),
            source,
        })?;

    validate(&parse_bundled(PLUGIN_SCHEMA)?, &document, path)?;
    Ok(PluginSchemas::from_document(&document))
}

#[cfg(test)]
mod tests;
