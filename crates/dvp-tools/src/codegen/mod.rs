//! Generates Python classes from a plugin's schemas.
//!
//! Each schema definition becomes a class in `generated/definitions.py`
//! under the plugin's source directory. The package is rendered into a
//! scratch directory first and only moved into place once complete, so a
//! failed run leaves the previous package untouched.

use std::error::Error as _;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::Value;
use tera::{Context, Tera};

use crate::ToolError;
use crate::file_util::delete_paths;
use crate::schema::PluginSchemas;

/// Name of the generated package inside the source directory.
pub const CODEGEN_PACKAGE: &str = "generated";

const SCRATCH_DIR: &str = ".dvp-codegen";
const DEFINITIONS_TEMPLATE: &str = include_str!("../../assets/definitions.py.tera");
const INIT_TEMPLATE: &str = include_str!("../../assets/init.py.tera");

const PYTHON_KEYWORDS: &[&str] = &[
    "and", "as", "assert", "break", "class", "continue", "def", "del", "elif", "else", "except",
    "exec", "finally", "for", "from", "global", "if", "import", "in", "is", "lambda", "not", "or",
    "pass", "print", "raise", "return", "try", "while", "with", "yield", "None", "True", "False",
];

#[derive(Debug, Serialize)]
struct ClassModel {
    name: &'static str,
    description: String,
    empty: bool,
    properties: Vec<PropertyModel>,
}

#[derive(Debug, Serialize)]
struct PropertyModel {
    attr: String,
    key: String,
    py_type: &'static str,
    check: &'static str,
    required: bool,
}

/// Writes the `generated` package for `schemas` into `src_dir`.
///
/// `plugin_content_dir` is the directory holding the plugin config; the
/// scratch directory is created there.
///
/// # Errors
///
/// Returns [`ToolError::Codegen`] when rendering or writing fails.
pub fn generate_python(
    name: &str,
    src_dir: &Path,
    plugin_content_dir: &Path,
    schemas: &PluginSchemas,
) -> Result<(), ToolError> {
    tracing::info!(plugin = name, src_dir = %src_dir.display(), "generating python definitions");
    let (definitions, init) = render(name, schemas)?;

    let scratch = plugin_content_dir.join(SCRATCH_DIR);
    delete_paths(&[scratch.clone()]);
    let result = write_package(&scratch, &definitions, &init)
        .and_then(|package| replace_package(&package, &src_dir.join(CODEGEN_PACKAGE)));
    delete_paths(&[scratch]);
    result
}

fn render(name: &str, schemas: &PluginSchemas) -> Result<(String, String), ToolError> {
    let mut tera = Tera::default();
    tera.autoescape_on(Vec::new());
    tera.add_raw_template("definitions.py", DEFINITIONS_TEMPLATE)
        .map_err(|error| codegen_error(&error))?;
    tera.add_raw_template("__init__.py", INIT_TEMPLATE)
        .map_err(|error| codegen_error(&error))?;

    let classes: Vec<ClassModel> = schemas
        .by_class()
        .into_iter()
        .map(|(class, schema)| class_model(class, schema))
        .collect();
    let exported = classes
        .iter()
        .map(|class| format!("\"{}\"", class.name))
        .collect::<Vec<_>>()
        .join(", ");

    let mut context = Context::new();
    context.insert("plugin_name", &python_text(name));
    context.insert("exported", &exported);
    context.insert("classes", &classes);

    let definitions = tera
        .render("definitions.py", &context)
        .map_err(|error| codegen_error(&error))?;
    let init = tera.render("__init__.py", &context).map_err(|error| codegen_error(&error))?;
    Ok((definitions, init))
}

fn class_model(name: &'static str, schema: &Value) -> ClassModel {
    let required: Vec<&str> = schema
        .get("required")
        .and_then(Value::as_array)
        .map(|keys| keys.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default();
    let properties: Vec<PropertyModel> = schema
        .get("properties")
        .and_then(Value::as_object)
        .map(|properties| {
            properties
                .iter()
                .map(|(key, property)| {
                    let (py_type, check) = python_type(property);
                    PropertyModel {
                        attr: attribute_name(key),
                        key: python_text(key),
                        py_type,
                        check,
                        required: required.contains(&key.as_str()),
                    }
                })
                .collect()
        })
        .unwrap_or_default();
    let description = schema
        .get("description")
        .and_then(Value::as_str)
        .map_or_else(|| format!("Generated from the {name} schema."), python_text);

    ClassModel {
        name,
        description,
        empty: properties.is_empty(),
        properties,
    }
}

/// Maps a JSON-Schema property to its Python type name and the expression
/// used for the runtime type check.
fn python_type(property: &Value) -> (&'static str, &'static str) {
    match property.get("type").and_then(Value::as_str) {
        Some("string") => ("str", "basestring"),
        Some("integer") => ("int", "(int, long)"),
        Some("number") => ("float", "(int, long, float)"),
        Some("boolean") => ("bool", "bool"),
        Some("array") => ("list", "list"),
        Some("object") => ("dict", "dict"),
        _ => ("object", "object"),
    }
}

/// Converts a schema key to a Python attribute name.
///
/// `camelCase` becomes `snake_case`, characters outside identifiers become
/// underscores, and names that would clash with keywords or start with a
/// digit are adjusted.
fn attribute_name(key: &str) -> String {
    let mut attr = String::with_capacity(key.len() + 4);
    let mut previous_lower = false;
    for character in key.chars() {
        if character.is_ascii_uppercase() {
            if previous_lower {
                attr.push('_');
            }
            attr.push(character.to_ascii_lowercase());
            previous_lower = false;
        } else if character.is_ascii_alphanumeric() {
            attr.push(character);
            previous_lower = true;
        } else {
            attr.push('_');
            previous_lower = false;
        }
    }
    if attr.is_empty() || attr.starts_with(|c: char| c.is_ascii_digit()) {
        attr.insert(0, '_');
    }
    if PYTHON_KEYWORDS.contains(&attr.as_str()) {
        attr.push('_');
    }
    attr
}

/// Escapes text for use inside a double-quoted Python string.
fn python_text(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}

fn codegen_error(error: &tera::Error) -> ToolError {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    ToolError::Codegen(message)
}

fn write_package(scratch: &Path, definitions: &str, init: &str) -> Result<PathBuf, ToolError> {
    let package = scratch.join(CODEGEN_PACKAGE);
    fs::create_dir_all(&package).map_err(|error| io_error(&package, &error))?;
    for (file, contents) in [("__init__.py", init), ("definitions.py", definitions)] {
        let path = package.join(file);
        fs::write(&path, contents).map_err(|error| io_error(&path, &error))?;
    }
    Ok(package)
}

fn replace_package(package: &Path, destination: &Path) -> Result<(), ToolError> {
    delete_paths(&[destination.to_path_buf()]);
    fs::rename(package, destination).map_err(|error| io_error(destination, &error))?;
    tracing::debug!(path = %destination.display(), "generated package written");
    Ok(())
}

fn io_error(path: &Path, error: &std::io::Error) -> ToolError {
    ToolError::Codegen(format!("unable to write '{}': {error}", path.display()))
}
