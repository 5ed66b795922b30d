//! `dvp init`: create a new plugin that builds and uploads as is.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tera::{Context, Tera};

use crate::ToolError;
use crate::codegen::generate_python;
use crate::errors::{errno, strerror};
use crate::file_util::{delete_paths, validate_paths_do_not_exist};
use crate::plugin_config::{PluginConfig, PluginType};
use crate::schema::read_and_validate_schema_file;
use crate::validator::PluginValidator;

/// Config file written into the plugin root.
pub const DEFAULT_PLUGIN_CONFIG_FILE: &str = "plugin_config.yml";
const DEFAULT_SCHEMA_FILE: &str = "schema.json";
const DEFAULT_SRC_DIRECTORY: &str = "src";
const DEFAULT_ENTRY_POINT_FILE: &str = "plugin_runner.py";

const SCHEMA_TEMPLATE: &str = include_str!("../../../assets/schema_template.json");
const ENTRY_POINT_TEMPLATE: &str = include_str!("../../../assets/entry_point.py.tera");

struct InitPaths {
    config: PathBuf,
    schema: PathBuf,
    src_dir: PathBuf,
}

impl InitPaths {
    fn new(root: &Path) -> Self {
        Self {
            config: root.join(DEFAULT_PLUGIN_CONFIG_FILE),
            schema: root.join(DEFAULT_SCHEMA_FILE),
            src_dir: root.join(DEFAULT_SRC_DIRECTORY),
        }
    }

    fn all(&self) -> [PathBuf; 3] {
        [self.config.clone(), self.schema.clone(), self.src_dir.clone()]
    }
}

/// Creates a plugin in `root`.
///
/// The pretty name defaults to the plugin name. Nothing is overwritten: if
/// the config, schema or source directory already exists the command fails
/// before writing anything. Once writing starts, any failure removes what
/// was created.
///
/// # Errors
///
/// Returns [`ToolError::PathExists`] when a target already exists and
/// [`ToolError::InitFailed`] wrapping the cause of any later failure.
pub fn init(
    root: &Path,
    plugin_name: &str,
    ingestion_strategy: PluginType,
    pretty_name: Option<&str>,
) -> Result<(), ToolError> {
    tracing::info!(root = %root.display(), "initializing directory");
    let paths = InitPaths::new(root);
    validate_paths_do_not_exist(&paths.all())?;

    let display_name = pretty_name.unwrap_or(plugin_name);
    tracing::debug!(plugin_name, ?ingestion_strategy, display_name, "init parameters");

    create_plugin(root, &paths, plugin_name, ingestion_strategy, display_name).map_err(|cause| {
        tracing::debug!(%cause, "cleaning up after failed init");
        delete_paths(&paths.all());
        ToolError::InitFailed {
            root: root.to_path_buf(),
            cause: Box::new(cause),
        }
    })
}

fn create_plugin(
    root: &Path,
    paths: &InitPaths,
    plugin_name: &str,
    ingestion_strategy: PluginType,
    pretty_name: &str,
) -> Result<(), ToolError> {
    tracing::info!(path = %paths.src_dir.display(), "creating source directory");
    fs::create_dir(&paths.src_dir).map_err(|error| write_error(&paths.src_dir, &error))?;

    tracing::info!(path = %paths.schema.display(), "writing schema file");
    fs::write(&paths.schema, SCHEMA_TEMPLATE).map_err(|error| write_error(&paths.schema, &error))?;
    let schemas = read_and_validate_schema_file(&paths.schema)?;
    generate_python(pretty_name, &paths.src_dir, root, &schemas)?;

    tracing::info!(path = %paths.config.display(), "writing config file");
    let config = PluginConfig::template(plugin_name, ingestion_strategy, pretty_name);
    let yaml = serde_yaml::to_string(&config)
        .map_err(|error| ToolError::User(format!("Unable to serialise plugin config: {error}")))?;
    fs::write(&paths.config, yaml).map_err(|error| write_error(&paths.config, &error))?;

    let entry_point = paths.src_dir.join(DEFAULT_ENTRY_POINT_FILE);
    tracing::info!(path = %entry_point.display(), "writing entry point");
    fs::write(&entry_point, entry_point_contents(plugin_name)?)
        .map_err(|error| write_error(&entry_point, &error))?;

    PluginValidator::new(&paths.config).validate().map(drop)
}

/// Renders the entry-point module with the plugin name as a Python literal.
fn entry_point_contents(plugin_name: &str) -> Result<String, ToolError> {
    let mut context = Context::new();
    context.insert("name", &python_repr(plugin_name));
    Tera::one_off(ENTRY_POINT_TEMPLATE, &context, false)
        .map_err(|error| ToolError::User(format!("Unable to render entry point: {error}")))
}

/// Quotes `text` the way Python's `repr` quotes a string.
fn python_repr(text: &str) -> String {
    let quote = if text.contains('\'') && !text.contains('"') {
        '"'
    } else {
        '\''
    };
    let mut literal = String::with_capacity(text.len() + 2);
    literal.push(quote);
    for character in text.chars() {
        match character {
            '\\' => literal.push_str("\\\\"),
            '\n' => literal.push_str("\\n"),
            '\r' => literal.push_str("\\r"),
            '\t' => literal.push_str("\\t"),
            c if c == quote => {
                literal.push('\\');
                literal.push(c);
            }
            c if c.is_control() => literal.push_str(&format!("\\x{:02x}", u32::from(c))),
            c => literal.push(c),
        }
    }
    literal.push(quote);
    literal
}

fn write_error(path: &Path, error: &io::Error) -> ToolError {
    ToolError::User(format!(
        "Unable to write '{}'. Error code: {}. Error message: {}",
        path.display(),
        errno(error),
        strerror(error)
    ))
}

#[cfg(test)]
mod tests;
