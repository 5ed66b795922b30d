//! `dvp build`: validate a plugin and package it for upload.

use std::fs;
use std::io::{Cursor, Write as _};
use std::path::Path;

use base64::{Engine as _, engine::general_purpose};
use dvp_platform::Operation;
use serde_json::{Map, Value, json};
use walkdir::WalkDir;
use zip::ZipWriter;
use zip::result::ZipError;
use zip::write::SimpleFileOptions;

use crate::ToolError;
use crate::codegen::generate_python;
use crate::package_util::{build_api_version, engine_api_version};
use crate::plugin_config::{PluginConfig, PluginType};
use crate::schema::{PluginSchemas, read_and_validate_schema_file};
use crate::validator::PluginValidator;

/// Validates the plugin, regenerates its definitions and, unless
/// `generate_only` is set, writes the upload artifact.
///
/// # Errors
///
/// Returns the first validation, generation or I/O failure.
pub fn build(
    plugin_config: &Path,
    upload_artifact: &Path,
    generate_only: bool,
) -> Result<(), ToolError> {
    tracing::info!(
        plugin_config = %plugin_config.display(),
        upload_artifact = %upload_artifact.display(),
        generate_only,
        "building plugin"
    );

    let validated = PluginValidator::new(plugin_config).validate()?;
    let schemas = read_and_validate_schema_file(validated.schema_file())?;
    let content_dir = plugin_config.parent().unwrap_or_else(|| Path::new("."));
    let config = validated.config();
    generate_python(config.display_name(), validated.src_dir(), content_dir, &schemas)?;

    if generate_only {
        tracing::info!("skipping artifact generation");
        return Ok(());
    }

    let source_code = zip_and_encode_source_files(validated.src_dir())?;
    let artifact = prepare_upload_artifact(config, source_code, &schemas);
    write_artifact(upload_artifact, &artifact)?;
    tracing::info!(path = %upload_artifact.display(), "generated upload artifact");
    Ok(())
}

/// Builds the upload artifact document.
pub(crate) fn prepare_upload_artifact(
    config: &PluginConfig,
    source_code: String,
    schemas: &PluginSchemas,
) -> Value {
    let repository = schemas.repository();
    let source_config = schemas.source_config();
    let mut artifact = json!({
        "type": "Plugin",
        "name": config.name,
        "prettyName": config.display_name(),
        "version": config.version,
        "defaultLocale": config.default_locale,
        "language": config.language,
        "hostTypes": config.host_types,
        "entryPoint": config.entry_point,
        "buildApi": build_api_version(),
        "engineApi": engine_api_version(),
        "rootSquashEnabled": config.root_squash_enabled,
        "sourceCode": source_code,
        "virtualSourceDefinition": {
            "type": "PluginVirtualSourceDefinition",
            "parameters": schemas.virtual_source(),
        },
        "linkedSourceDefinition": {
            "type": config.plugin_type.linked_source_type(),
            "parameters": schemas.linked_source(),
        },
        "discoveryDefinition": {
            "type": "PluginDiscoveryDefinition",
            "repositorySchema": repository,
            "repositoryIdentityFields": repository.get("identityFields"),
            "repositoryNameField": repository.get("nameField"),
            "sourceConfigSchema": source_config,
            "sourceConfigIdentityFields": source_config.get("identityFields"),
            "sourceConfigNameField": source_config.get("nameField"),
            "manualSourceConfigDiscovery": config.manual_discovery,
        },
        "snapshotSchema": schemas.snapshot(),
    });
    if let Some(document) = artifact.as_object_mut() {
        add_empty_plugin_operations(document, config.plugin_type);
    }
    artifact
}

/// Sets every operation slot the plugin type supports to `null`.
///
/// The engine fills these in from the plugin object once uploaded code is
/// imported; staged-only operations are omitted for direct plugins.
pub(crate) fn add_empty_plugin_operations(artifact: &mut Map<String, Value>, plugin_type: PluginType) {
    for operation in Operation::ALL {
        if plugin_type == PluginType::Direct && operation.is_staged_only() {
            continue;
        }
        let definition = artifact
            .entry(operation.definition().key())
            .or_insert_with(|| Value::Object(Map::new()));
        if let Some(slots) = definition.as_object_mut() {
            slots.insert(operation.slot().to_owned(), Value::Null);
        }
    }
}

/// Zips `src_dir` and returns the archive base64 encoded.
pub(crate) fn zip_and_encode_source_files(src_dir: &Path) -> Result<String, ToolError> {
    let read_error = |source| ToolError::ReadSourceDirectory {
        dir: src_dir.to_path_buf(),
        source,
    };
    let compress_error = |source| ToolError::Compress {
        dir: src_dir.to_path_buf(),
        source,
    };

    let mut archive = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

    for walked in WalkDir::new(src_dir).follow_links(false).sort_by_file_name() {
        let entry = walked.map_err(|error| read_error(error.into()))?;
        let Ok(relative) = entry.path().strip_prefix(src_dir) else {
            continue;
        };
        let name = relative
            .components()
            .map(|component| component.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        if name.is_empty() {
            continue;
        }

        if entry.file_type().is_dir() {
            archive
                .add_directory(name, options)
                .map_err(compress_error)?;
        } else if entry.file_type().is_file() {
            let contents = fs::read(entry.path()).map_err(read_error)?;
            archive.start_file(name, options).map_err(compress_error)?;
            archive
                .write_all(&contents)
                .map_err(|error| compress_error(ZipError::Io(error)))?;
        }
    }

    let bytes = archive.finish().map_err(compress_error)?.into_inner();
    tracing::debug!(bytes = bytes.len(), "compressed plugin sources");
    Ok(general_purpose::STANDARD.encode(bytes))
}

fn write_artifact(path: &Path, artifact: &Value) -> Result<(), ToolError> {
    let write_error = |source| ToolError::WriteArtifact {
        path: path.to_path_buf(),
        source,
    };
    let text = serde_json::to_string_pretty(artifact).map_err(|error| write_error(error.into()))?;
    fs::write(path, text).map_err(write_error)
}
