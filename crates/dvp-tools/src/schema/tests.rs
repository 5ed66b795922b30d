//! Tests for schema loading and validation.

use std::fs;
use std::path::PathBuf;

use rstest::{fixture, rstest};
use serde_json::json;
use tempfile::TempDir;

use super::*;

const TEMPLATE: &str = include_str!("../../assets/schema_template.json");

#[fixture]
fn dir() -> TempDir {
    tempfile::tempdir().expect("tempdir")
}

fn write(dir: &TempDir, contents: &str) -> PathBuf {
    let path = dir.path().join("schema.json");
    fs::write(&path, contents).expect("write schema");
    path
}

#[test]
fn bundled_schemas_parse() {
    let config_schema = plugin_config_schema().expect("config schema");
    assert_eq!(config_schema["type"], "object");
    parse_bundled(PLUGIN_SCHEMA).expect("meta schema");
}

#[rstest]
fn template_schema_is_valid(dir: TempDir) {
    let path = write(&dir, TEMPLATE);

    let schemas = read_and_validate_schema_file(&path).expect("template validates");

    assert_eq!(schemas.repository()["nameField"], "name");
    assert_eq!(schemas.source_config()["identityFields"], json!(["name"]));
    assert_eq!(schemas.snapshot()["type"], "object");
    let classes: Vec<&str> = schemas.by_class().iter().map(|(name, _)| *name).collect();
    assert_eq!(
        classes,
        [
            "RepositoryDefinition",
            "SourceConfigDefinition",
            "VirtualSourceDefinition",
            "LinkedSourceDefinition",
            "SnapshotDefinition",
        ]
    );
}

#[rstest]
fn missing_file_reports_errno(dir: TempDir) {
    let path = dir.path().join("absent.json");

    let error = read_and_validate_schema_file(&path).expect_err("read fails");

    assert_eq!(
        error.to_string(),
        format!(
            "Unable to load schemas from '{}'\nError code: 2. Error message: No such file or directory",
            path.display()
        )
    );
}

#[rstest]
fn non_json_file_is_rejected(dir: TempDir) {
    let path = write(&dir, "{not json");

    let error = read_and_validate_schema_file(&path).expect_err("parse fails");

    assert!(matches!(error, ToolError::InvalidSchemaJson { .. }));
    assert!(
        error
            .to_string()
            .starts_with(&format!("Failed to load schemas because '{}' is not a valid json file.", path.display()))
    );
}

#[rstest]
fn missing_definitions_are_all_reported(dir: TempDir) {
    let path = write(&dir, r#"{"snapshotDefinition": {"type": "object"}}"#);

    let error = read_and_validate_schema_file(&path).expect_err("validation fails");

    let ToolError::SchemaValidation { file, errors } = &error else {
        panic!("unexpected error: {error}");
    };
    assert_eq!(file, &path);
    assert_eq!(errors.len(), 4, "errors: {errors:?}");
    assert!(errors.iter().any(|e| e.contains("repositoryDefinition")));
    assert!(errors.iter().any(|e| e.contains("linkedSourceDefinition")));
    let mut sorted = errors.clone();
    sorted.sort();
    assert_eq!(&sorted, errors);
    assert!(error.to_string().ends_with(&format!("Validation failed on '{}'.", path.display())));
}

#[rstest]
#[case::name_field("nameField")]
#[case::identity_fields("identityFields")]
fn repository_needs_identity(dir: TempDir, #[case] field: &str) {
    let mut document: serde_json::Value = serde_json::from_str(TEMPLATE).expect("template");
    document["repositoryDefinition"]
        .as_object_mut()
        .expect("object")
        .remove(field);
    let path = write(&dir, &document.to_string());

    let error = read_and_validate_schema_file(&path).expect_err("validation fails");

    assert!(error.to_string().contains(field), "{error}");
}

#[rstest]
fn extra_top_level_definitions_are_rejected(dir: TempDir) {
    let mut document: serde_json::Value = serde_json::from_str(TEMPLATE).expect("template");
    document["extraDefinition"] = json!({"type": "object"});
    let path = write(&dir, &document.to_string());

    let error = read_and_validate_schema_file(&path).expect_err("validation fails");

    assert!(error.to_string().contains("extraDefinition"), "{error}");
}
