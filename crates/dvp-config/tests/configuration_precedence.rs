//! Layering of defaults, configuration file, environment and flags.

use std::ffi::{OsStr, OsString};
use std::fs;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use dvp_config::{Config, LogFormat};
use once_cell::sync::Lazy;
use rstest::{fixture, rstest};
use tempfile::TempDir;

static ENV_MUTEX: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

/// Serialises environment access and restores touched variables on drop.
struct EnvGuard {
    previous: Vec<(&'static str, Option<OsString>)>,
    _lock: MutexGuard<'static, ()>,
}

impl EnvGuard {
    fn new() -> Self {
        let lock = ENV_MUTEX
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        Self {
            previous: Vec::new(),
            _lock: lock,
        }
    }

    fn set(&mut self, key: &'static str, value: impl AsRef<OsStr>) {
        self.previous.push((key, std::env::var_os(key)));
        // Environment mutation is unsafe in edition 2024; the mutex keeps
        // tests in this binary from racing on it.
        unsafe { std::env::set_var(key, value) };
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        while let Some((key, value)) = self.previous.pop() {
            match value {
                Some(previous) => unsafe { std::env::set_var(key, previous) },
                None => unsafe { std::env::remove_var(key) },
            }
        }
    }
}

#[fixture]
fn env() -> EnvGuard {
    EnvGuard::new()
}

fn write_config(dir: &Path, contents: &str) -> OsString {
    let path = dir.join("dvp.toml");
    fs::write(&path, contents).expect("write configuration file");
    path.into_os_string()
}

fn args(extra: &[OsString]) -> Vec<OsString> {
    let mut all = vec![OsString::from("dvp")];
    all.extend_from_slice(extra);
    all
}

#[rstest]
fn defaults_apply_without_overrides(#[from(env)] _env: EnvGuard) {
    let config = Config::from_args(args(&[])).expect("load defaults");

    assert_eq!(config.log_filter(), "info");
    assert_eq!(config.log_format(), LogFormat::Compact);
    assert_eq!(config.default_engine(), None);
    assert_eq!(config.upload_timeout_secs, 300);
}

#[rstest]
fn file_overrides_defaults(#[from(env)] _env: EnvGuard) {
    let dir = TempDir::new().expect("temp dir");
    let path = write_config(
        dir.path(),
        "log_format = \"json\"\ndefault_engine = \"engine.example.com\"\nupload_timeout_secs = 30\n",
    );

    let config = Config::from_args(args(&[OsString::from("--config-path"), path]))
        .expect("load file");

    assert_eq!(config.log_format(), LogFormat::Json);
    assert_eq!(config.default_engine(), Some("engine.example.com"));
    assert_eq!(config.upload_timeout_secs, 30);
}

#[rstest]
fn environment_overrides_file(mut env: EnvGuard) {
    let dir = TempDir::new().expect("temp dir");
    let path = write_config(dir.path(), "default_user = \"from-file\"\n");
    env.set("DVP_DEFAULT_USER", "from-env");

    let config = Config::from_args(args(&[OsString::from("--config-path"), path]))
        .expect("load file and env");

    assert_eq!(config.default_user(), Some("from-env"));
}

#[rstest]
fn flags_override_environment(mut env: EnvGuard) {
    env.set("DVP_LOG_FILTER", "warn");

    let config = Config::from_args(args(&[
        OsString::from("--log-filter"),
        OsString::from("debug"),
    ]))
    .expect("load flags");

    assert_eq!(config.log_filter(), "debug");
}

#[rstest]
fn malformed_file_is_an_error(#[from(env)] _env: EnvGuard) {
    let dir = TempDir::new().expect("temp dir");
    let path = write_config(dir.path(), "upload_timeout_secs = \"soon\"\n");

    let result = Config::from_args(args(&[OsString::from("--config-path"), path]));

    assert!(result.is_err(), "expected failure, got {result:?}");
}
