//! Tests for the init command.

use rstest::{fixture, rstest};
use tempfile::TempDir;

use super::*;
use crate::commands::build::build;

#[fixture]
fn root() -> TempDir {
    tempfile::tempdir().expect("tempdir")
}

#[rstest]
fn init_creates_a_valid_plugin(root: TempDir) {
    init(root.path(), "my_plugin", PluginType::Direct, None).expect("init");

    let config_text =
        fs::read_to_string(root.path().join("plugin_config.yml")).expect("config written");
    let config: PluginConfig = serde_yaml::from_str(&config_text).expect("config parses");
    assert_eq!(config.name, "my_plugin");
    assert_eq!(config.pretty_name.as_deref(), Some("my_plugin"));
    assert_eq!(config.version, "0.1.0");
    assert_eq!(config.plugin_type, PluginType::Direct);
    assert_eq!(config.entry_point, "plugin_runner:plugin");
    assert_eq!(config.src_dir, "src");
    assert_eq!(config.schema_file, "schema.json");
    assert!(config.manual_discovery);

    assert_eq!(
        fs::read_to_string(root.path().join("schema.json")).expect("schema"),
        SCHEMA_TEMPLATE
    );
    assert!(root.path().join("src/generated/definitions.py").exists());
    let entry_point =
        fs::read_to_string(root.path().join("src/plugin_runner.py")).expect("entry point");
    assert!(entry_point.contains("PLUGIN_NAME = 'my_plugin'"), "{entry_point}");
    assert!(entry_point.contains("plugin = Plugin()"));
}

#[rstest]
fn init_output_builds(root: TempDir) {
    init(root.path(), "db", PluginType::Staged, Some("Database")).expect("init");

    let config = root.path().join("plugin_config.yml");
    let artifact = root.path().join("artifact.json");
    build(&config, &artifact, false).expect("initialised plugin builds");

    let text = fs::read_to_string(&artifact).expect("artifact");
    let artifact: serde_json::Value = serde_json::from_str(&text).expect("json");
    assert_eq!(artifact["prettyName"], "Database");
    assert_eq!(
        artifact["linkedSourceDefinition"]["type"],
        "PluginLinkedStagedSourceDefinition"
    );
}

#[rstest]
#[case::config("plugin_config.yml")]
#[case::schema("schema.json")]
#[case::src("src")]
fn init_refuses_to_overwrite(root: TempDir, #[case] existing: &str) {
    let path = root.path().join(existing);
    fs::write(&path, "keep me").expect("existing file");

    let error = init(root.path(), "db", PluginType::Direct, None).expect_err("refuses");

    assert_eq!(
        error.to_string(),
        format!("The path '{}' already exists.", path.display())
    );
    assert_eq!(fs::read_to_string(&path).expect("untouched"), "keep me");
}

#[rstest]
fn failed_init_removes_what_it_created(root: TempDir) {
    let missing_root = root.path().join("absent");

    let error = init(&missing_root, "db", PluginType::Direct, None).expect_err("fails");

    let message = error.to_string();
    assert!(
        message.starts_with(&format!(
            "Failed to initialize plugin directory '{}': ",
            missing_root.display()
        )),
        "{message}"
    );
    assert!(message.ends_with('.'));
    assert!(!missing_root.exists());
}

#[rstest]
#[case("plugin", "'plugin'")]
#[case("it's", "\"it's\"")]
#[case("both ' and \"", "'both \\' and \"'")]
#[case("back\\slash", "'back\\\\slash'")]
#[case("tab\there", "'tab\\there'")]
fn python_repr_quotes_like_python(#[case] input: &str, #[case] expected: &str) {
    assert_eq!(python_repr(input), expected);
}
