//! Shared fixtures for toolchain tests.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use dvp_config::Config;
use rstest::{fixture, rstest};
use tempfile::TempDir;

use crate::config::ConfigLoader;
use crate::{ToolError, run_with_loader};

pub(crate) const SCHEMA_TEMPLATE: &str = include_str!("../../assets/schema_template.json");

/// A complete plugin on disk: config, schema and entry-point module.
pub(crate) struct PluginFixture {
    dir: TempDir,
}

impl PluginFixture {
    pub(crate) fn new(plugin_type: &str) -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        let root = dir.path();
        fs::create_dir(root.join("src")).expect("src dir");
        fs::write(root.join("src/plugin_runner.py"), "plugin = None\n").expect("entry point");
        fs::write(root.join("schema.json"), SCHEMA_TEMPLATE).expect("schema");
        let config = format!(
            "name: test_plugin\n\
             prettyName: Test Plugin\n\
             version: 0.1.0\n\
             language: PYTHON27\n\
             hostTypes:\n\
             - UNIX\n\
             pluginType: {plugin_type}\n\
             manualDiscovery: true\n\
             entryPoint: plugin_runner:plugin\n\
             srcDir: src\n\
             schemaFile: schema.json\n"
        );
        fs::write(root.join("plugin_config.yml"), config).expect("config");
        Self { dir }
    }

    pub(crate) fn root(&self) -> &Path {
        self.dir.path()
    }

    pub(crate) fn config_path(&self) -> PathBuf {
        self.root().join("plugin_config.yml")
    }

    pub(crate) fn artifact_path(&self) -> PathBuf {
        self.root().join("artifact.json")
    }
}

#[fixture]
pub(crate) fn direct_plugin() -> PluginFixture {
    PluginFixture::new("DIRECT")
}

#[fixture]
pub(crate) fn staged_plugin() -> PluginFixture {
    PluginFixture::new("STAGED")
}

/// Loader that records what it was given and returns a fixed config.
struct StubLoader {
    config: Config,
    seen: std::cell::RefCell<Vec<OsString>>,
}

impl StubLoader {
    fn new(config: Config) -> Self {
        Self {
            config,
            seen: std::cell::RefCell::default(),
        }
    }
}

impl ConfigLoader for StubLoader {
    fn load(&self, args: &[OsString]) -> Result<Config, ToolError> {
        self.seen.borrow_mut().extend(args.iter().cloned());
        Ok(self.config.clone())
    }
}

struct FailingLoader;

impl ConfigLoader for FailingLoader {
    fn load(&self, _args: &[OsString]) -> Result<Config, ToolError> {
        Err(ToolError::User(String::from("configuration is broken")))
    }
}

struct Outcome {
    code: ExitCode,
    stdout: String,
    stderr: String,
}

fn run_args(args: &[&str], loader: &impl ConfigLoader) -> Outcome {
    let mut stdout = Vec::new();
    let mut stderr = Vec::new();
    let code = run_with_loader(
        args.iter().map(OsString::from),
        &mut stdout,
        &mut stderr,
        loader,
    );
    Outcome {
        code,
        stdout: String::from_utf8(stdout).expect("utf8 stdout"),
        stderr: String::from_utf8(stderr).expect("utf8 stderr"),
    }
}

#[rstest]
fn build_runs_through_the_cli(direct_plugin: PluginFixture) {
    let config = direct_plugin.config_path();
    let artifact = direct_plugin.artifact_path();
    let loader = StubLoader::new(Config::default());

    let outcome = run_args(
        &[
            "dvp",
            "--log-format",
            "json",
            "build",
            "-c",
            config.to_str().expect("utf8 path"),
            "-a",
            artifact.to_str().expect("utf8 path"),
        ],
        &loader,
    );

    assert_eq!(outcome.code, ExitCode::SUCCESS, "{}", outcome.stderr);
    assert!(artifact.exists());
    assert_eq!(
        *loader.seen.borrow(),
        ["dvp", "--log-format", "json"].map(OsString::from)
    );
}

#[rstest]
fn command_failures_are_reported_on_stderr(direct_plugin: PluginFixture) {
    let missing = direct_plugin.root().join("absent.yml");
    let loader = StubLoader::new(Config::default());

    let outcome = run_args(
        &["dvp", "build", "-c", missing.to_str().expect("utf8 path")],
        &loader,
    );

    assert_eq!(outcome.code, ExitCode::FAILURE);
    assert!(
        outcome
            .stderr
            .starts_with(&format!("Unable to read plugin config file '{}'", missing.display())),
        "{}",
        outcome.stderr
    );
}

#[test]
fn help_goes_to_stdout() {
    let outcome = run_args(&["dvp", "--help"], &StubLoader::new(Config::default()));

    assert_eq!(outcome.code, ExitCode::SUCCESS);
    assert!(outcome.stdout.contains("Usage: dvp"), "{}", outcome.stdout);
    assert!(outcome.stderr.is_empty());
}

#[test]
fn usage_errors_go_to_stderr() {
    let outcome = run_args(&["dvp", "frobnicate"], &StubLoader::new(Config::default()));

    assert_eq!(outcome.code, ExitCode::FAILURE);
    assert!(outcome.stderr.contains("frobnicate"), "{}", outcome.stderr);
}

#[test]
fn configuration_errors_fail_the_command() {
    let outcome = run_args(&["dvp", "build"], &FailingLoader);

    assert_eq!(outcome.code, ExitCode::FAILURE);
    assert_eq!(outcome.stderr, "configuration is broken\n");
}

#[test]
fn upload_without_engine_names_the_setting() {
    let outcome = run_args(
        &["dvp", "upload", "-u", "admin", "--password", "pw"],
        &StubLoader::new(Config::default()),
    );

    assert_eq!(outcome.code, ExitCode::FAILURE);
    assert_eq!(
        outcome.stderr,
        "No default_engine was given. Pass --engine or set default_engine in the configuration.\n"
    );
}

#[test]
fn upload_falls_back_to_configured_defaults() {
    let dir = tempfile::tempdir().expect("tempdir");
    let artifact = dir.path().join("artifact.json");
    fs::write(&artifact, r#"{"type": "Plugin"}"#).expect("artifact");
    let config = Config {
        default_engine: Some(String::from("engine.example")),
        default_user: Some(String::from("admin")),
        ..Config::default()
    };

    let outcome = run_args(
        &[
            "dvp",
            "upload",
            "-a",
            artifact.to_str().expect("utf8 path"),
            "--password",
            "pw",
        ],
        &StubLoader::new(config),
    );

    // Engine and user resolve from configuration; the artifact is then
    // rejected before any request is sent.
    assert_eq!(outcome.code, ExitCode::FAILURE);
    assert!(
        outcome.stderr.starts_with("The engineApi field is either missing or malformed."),
        "{}",
        outcome.stderr
    );
}
