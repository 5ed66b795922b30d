//! Separates configuration flags from the command line.
//!
//! Configuration flags come first (`dvp --log-format json build ...`). They
//! are handed to `ortho_config` on their own while `clap` parses the rest.

use std::ffi::{OsStr, OsString};

use dvp_config::Config;

use crate::ToolError;

/// Loads the toolchain configuration.
pub(crate) trait ConfigLoader {
    /// Loads configuration from the program name plus the configuration
    /// flags that preceded the command.
    fn load(&self, args: &[OsString]) -> Result<Config, ToolError>;
}

/// Loads configuration through `ortho_config`.
pub(crate) struct OrthoConfigLoader;

impl ConfigLoader for OrthoConfigLoader {
    fn load(&self, args: &[OsString]) -> Result<Config, ToolError> {
        Config::from_args(args.iter().cloned()).map_err(ToolError::LoadConfiguration)
    }
}

#[derive(Debug, Clone, Copy)]
enum FlagAction {
    Include { needs_value: bool },
    Skip,
}

fn process_config_flag(argument: &OsStr) -> FlagAction {
    let argument_text = argument.to_string_lossy();
    if !argument_text.starts_with("--") {
        return FlagAction::Skip;
    }
    let (flag, has_inline_value) = match argument_text.split_once('=') {
        Some((flag, _)) => (flag, true),
        None => (argument_text.as_ref(), false),
    };

    if super::CONFIG_CLI_FLAGS.contains(&flag) {
        FlagAction::Include {
            needs_value: !has_inline_value,
        }
    } else {
        FlagAction::Skip
    }
}

/// Result of splitting the raw arguments.
#[derive(Debug)]
pub(crate) struct ConfigArgumentSplit {
    /// Program name followed by every configuration flag and value.
    pub(crate) config_arguments: Vec<OsString>,
    /// Program name followed by the command and its arguments.
    pub(crate) command_arguments: Vec<OsString>,
}

pub(crate) fn split_config_arguments(args: &[OsString]) -> ConfigArgumentSplit {
    let Some((program, rest)) = args.split_first() else {
        return ConfigArgumentSplit {
            config_arguments: Vec::new(),
            command_arguments: Vec::new(),
        };
    };

    let mut config_arguments = vec![program.clone()];
    let mut remaining = rest.iter();
    let mut pending_value = false;
    let mut command_arguments = vec![program.clone()];

    while let Some(argument) = remaining.next() {
        if pending_value {
            config_arguments.push(argument.clone());
            pending_value = false;
            continue;
        }
        match process_config_flag(argument) {
            FlagAction::Include { needs_value } => {
                config_arguments.push(argument.clone());
                pending_value = needs_value;
            }
            FlagAction::Skip => {
                command_arguments.push(argument.clone());
                command_arguments.extend(remaining.cloned());
                break;
            }
        }
    }

    ConfigArgumentSplit {
        config_arguments,
        command_arguments,
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn os_args(items: &[&str]) -> Vec<OsString> {
        items.iter().map(OsString::from).collect()
    }

    #[rstest]
    #[case("--log-filter=debug", false)]
    #[case("--log-filter", true)]
    #[case("--config-path", true)]
    fn known_flags_are_included(#[case] flag: &str, #[case] expected_needs_value: bool) {
        let FlagAction::Include { needs_value } = process_config_flag(OsStr::new(flag)) else {
            panic!("expected {flag} to be included");
        };
        assert_eq!(needs_value, expected_needs_value);
    }

    #[rstest]
    #[case("build")]
    #[case("--unknown")]
    #[case("-v")]
    fn other_arguments_stop_the_split(#[case] argument: &str) {
        assert!(matches!(
            process_config_flag(OsStr::new(argument)),
            FlagAction::Skip
        ));
    }

    #[test]
    fn split_separates_leading_config_flags() {
        let split = split_config_arguments(&os_args(&[
            "dvp",
            "--log-format",
            "json",
            "--log-filter=debug",
            "build",
            "-g",
            "--log-filter",
            "trace",
        ]));

        assert_eq!(
            split.config_arguments,
            os_args(&["dvp", "--log-format", "json", "--log-filter=debug"])
        );
        assert_eq!(
            split.command_arguments,
            os_args(&["dvp", "build", "-g", "--log-filter", "trace"])
        );
    }

    #[test]
    fn split_of_empty_arguments_is_empty() {
        let split = split_config_arguments(&[]);
        assert!(split.config_arguments.is_empty());
        assert!(split.command_arguments.is_empty());
    }
}
