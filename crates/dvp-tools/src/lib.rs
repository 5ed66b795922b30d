//! The `dvp` plugin toolchain.
//!
//! `dvp init` scaffolds a plugin, `dvp build` validates it, generates Python
//! definitions from its schemas and packages it as an upload artifact, and
//! `dvp upload` sends the artifact to an engine. The runtime is exposed as
//! [`run`] so tests can drive it with their own streams.

use std::ffi::OsString;
use std::io::Write;
use std::process::ExitCode;

use clap::Parser;
use dvp_config::Config;

mod cli;
pub mod codegen;
pub mod commands;
mod config;
pub mod engine_client;
mod errors;
mod file_util;
pub mod package_util;
pub mod plugin_config;
pub mod schema;
pub mod telemetry;
pub mod validator;

#[cfg(test)]
mod tests;

use cli::{Cli, CliCommand};
use config::{ConfigLoader, OrthoConfigLoader, split_config_arguments};
use engine_client::HttpEngineClient;
pub use errors::ToolError;

/// Flags handed to the configuration loader.
///
/// These must match the fields of [`dvp_config::Config`] and appear before
/// the command name.
const CONFIG_CLI_FLAGS: &[&str] = &[
    "--config-path",
    "--log-filter",
    "--log-format",
    "--default-engine",
    "--default-user",
    "--upload-timeout-secs",
];

/// Runs the toolchain with the given arguments and output streams.
#[must_use]
pub fn run<I, W, E>(args: I, stdout: &mut W, stderr: &mut E) -> ExitCode
where
    I: IntoIterator<Item = OsString>,
    W: Write,
    E: Write,
{
    run_with_loader(args, stdout, stderr, &OrthoConfigLoader)
}

pub(crate) fn run_with_loader<I, W, E, L>(
    args: I,
    stdout: &mut W,
    stderr: &mut E,
    loader: &L,
) -> ExitCode
where
    I: IntoIterator<Item = OsString>,
    W: Write,
    E: Write,
    L: ConfigLoader,
{
    let arguments: Vec<OsString> = args.into_iter().collect();
    let split = split_config_arguments(&arguments);

    let result = Cli::try_parse_from(&split.command_arguments)
        .map_err(ToolError::CliUsage)
        .and_then(|cli| {
            let mut config = loader.load(&split.config_arguments)?;
            config.log_filter = telemetry::effective_filter(config.log_filter(), cli.verbose);
            telemetry::initialise(&config)?;
            execute(cli.command, &config)
        });

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(ToolError::CliUsage(error)) if !error.use_stderr() => {
            let _ = write!(stdout, "{error}");
            ExitCode::SUCCESS
        }
        Err(ToolError::CliUsage(error)) => {
            let _ = write!(stderr, "{error}");
            ExitCode::FAILURE
        }
        Err(error) => {
            tracing::debug!(?error, "command failed");
            let _ = writeln!(stderr, "{error}");
            ExitCode::FAILURE
        }
    }
}

fn execute(command: CliCommand, config: &Config) -> Result<(), ToolError> {
    match command {
        CliCommand::Init {
            root_dir,
            plugin_name,
            ingestion_strategy,
            pretty_name,
        } => commands::init(
            &root_dir,
            &plugin_name,
            ingestion_strategy,
            pretty_name.as_deref(),
        ),
        CliCommand::Build {
            plugin_config,
            upload_artifact,
            generate_only,
        } => commands::build(&plugin_config, &upload_artifact, generate_only),
        CliCommand::Upload {
            engine,
            user,
            upload_artifact,
            password,
        } => {
            let engine_host = engine
                .or_else(|| config.default_engine().map(str::to_owned))
                .ok_or(ToolError::MissingSetting {
                    setting: "default_engine",
                    flag: "--engine",
                })?;
            let engine_user = user
                .or_else(|| config.default_user().map(str::to_owned))
                .ok_or(ToolError::MissingSetting {
                    setting: "default_user",
                    flag: "--user",
                })?;
            let client = HttpEngineClient::new(&engine_host, config.upload_timeout())?;
            commands::upload(&client, &engine_user, &upload_artifact, &password)
        }
    }
}
