//! Command-line interface of the `dvp` tool.

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};

use crate::plugin_config::PluginType;

/// Build and upload virtualization plugins.
#[derive(Parser, Debug)]
#[command(name = "dvp", version = crate::package_util::VERSION, disable_help_subcommand = true)]
pub(crate) struct Cli {
    /// Raises log verbosity; repeat for more detail.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub(crate) verbose: u8,
    /// Command to run.
    #[command(subcommand)]
    pub(crate) command: CliCommand,
}

#[derive(Subcommand, Debug, Clone)]
pub(crate) enum CliCommand {
    /// Creates a plugin in a directory.
    Init {
        /// Plugin root directory.
        #[arg(short = 'r', long, default_value = ".")]
        root_dir: PathBuf,
        /// Name of the new plugin.
        #[arg(short = 'n', long)]
        plugin_name: String,
        /// How the plugin ingests data.
        #[arg(short = 's', long, value_enum, ignore_case = true, default_value = "DIRECT")]
        ingestion_strategy: PluginType,
        /// Display name; defaults to the plugin name.
        #[arg(short = 'p', long)]
        pretty_name: Option<String>,
    },
    /// Validates a plugin and writes its upload artifact.
    Build {
        /// Plugin config file.
        #[arg(short = 'c', long, default_value = "plugin_config.yml")]
        plugin_config: PathBuf,
        /// Where to write the upload artifact.
        #[arg(short = 'a', long, default_value = "artifact.json")]
        upload_artifact: PathBuf,
        /// Only regenerate Python definitions.
        #[arg(short = 'g', long)]
        generate_only: bool,
    },
    /// Uploads an artifact to an engine.
    Upload {
        /// Engine host; defaults to `default_engine` from configuration.
        #[arg(short = 'e', long)]
        engine: Option<String>,
        /// Engine user; defaults to `default_user` from configuration.
        #[arg(short = 'u', long)]
        user: Option<String>,
        /// Artifact produced by `build`.
        #[arg(short = 'a', long, default_value = "artifact.json")]
        upload_artifact: PathBuf,
        /// Engine password.
        #[arg(long, env = "DVP_PASSWORD", hide_env_values = true)]
        password: String,
    },
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;
    use rstest::rstest;

    use super::*;

    #[test]
    fn definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[rstest]
    #[case("direct", PluginType::Direct)]
    #[case("STAGED", PluginType::Staged)]
    fn ingestion_strategy_ignores_case(#[case] value: &str, #[case] expected: PluginType) {
        let cli = Cli::try_parse_from(["dvp", "init", "-n", "db", "-s", value]).expect("parses");
        let CliCommand::Init {
            ingestion_strategy, ..
        } = cli.command
        else {
            panic!("expected init");
        };
        assert_eq!(ingestion_strategy, expected);
    }

    #[test]
    fn build_defaults() {
        let cli = Cli::try_parse_from(["dvp", "-vv", "build"]).expect("parses");
        assert_eq!(cli.verbose, 2);
        let CliCommand::Build {
            plugin_config,
            upload_artifact,
            generate_only,
        } = cli.command
        else {
            panic!("expected build");
        };
        assert_eq!(plugin_config, PathBuf::from("plugin_config.yml"));
        assert_eq!(upload_artifact, PathBuf::from("artifact.json"));
        assert!(!generate_only);
    }

    #[test]
    fn init_requires_a_plugin_name() {
        let error = Cli::try_parse_from(["dvp", "init"]).expect_err("name required");
        assert_eq!(error.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn upload_takes_password_flag() {
        let cli = Cli::try_parse_from(["dvp", "upload", "-e", "engine", "--password", "pw"])
            .expect("parses");
        let CliCommand::Upload {
            engine, password, user, ..
        } = cli.command
        else {
            panic!("expected upload");
        };
        assert_eq!(engine.as_deref(), Some("engine"));
        assert_eq!(user, None);
        assert_eq!(password, "pw");
    }
}
