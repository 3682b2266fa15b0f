//! Configuration loading helpers for the CLI.
//!
//! Configuration flags must precede the command. They are split off and
//! handed to `ortho_config`, and the remaining tokens go to the command
//! parser.

use std::ffi::{OsStr, OsString};

use exifstay_config::Config;
use ortho_config::OrthoConfig;

use crate::errors::AppError;

/// CLI flags recognised by the configuration loader.
///
/// Keep in sync with the fields of [`Config`]. Common arguments are left to
/// the configuration file and environment because their values start with a
/// hyphen.
pub(crate) const CONFIG_CLI_FLAGS: &[&str] = &[
    "--config-path",
    "--executable",
    "--search-path",
    "--timeout-secs",
    "--log-filter",
    "--log-format",
];

pub(crate) trait ConfigLoader {
    /// Loads configuration from the program name plus configuration flags.
    fn load(&self, args: &[OsString]) -> Result<Config, AppError>;
}

pub(crate) struct OrthoConfigLoader;

impl ConfigLoader for OrthoConfigLoader {
    fn load(&self, args: &[OsString]) -> Result<Config, AppError> {
        Config::load_from_iter(args.iter().cloned()).map_err(AppError::LoadConfiguration)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FlagAction {
    Include { needs_value: bool },
    Stop,
}

fn classify(argument: &OsStr) -> FlagAction {
    let text = argument.to_string_lossy();
    let (flag, inline_value) = match text.split_once('=') {
        Some((name, _)) => (name, true),
        None => (&*text, false),
    };

    if CONFIG_CLI_FLAGS.contains(&flag) {
        FlagAction::Include {
            needs_value: !inline_value,
        }
    } else {
        FlagAction::Stop
    }
}

/// Arguments split into the configuration loader's share and the command's.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ArgumentSplit {
    pub(crate) config_arguments: Vec<OsString>,
    pub(crate) command_arguments: Vec<OsString>,
}

/// Splits leading configuration flags from the command. Both halves keep the
/// program name as their first element.
pub(crate) fn split_arguments(args: &[OsString]) -> ArgumentSplit {
    let mut remaining = args.iter();
    let program: Vec<OsString> = remaining.next().cloned().into_iter().collect();
    let mut config_arguments = program.clone();
    let mut rest = remaining.as_slice();

    while let Some((argument, tail)) = rest.split_first() {
        match classify(argument) {
            FlagAction::Include { needs_value } => {
                config_arguments.push(argument.clone());
                rest = tail;
                if needs_value && let Some((value, after_value)) = rest.split_first() {
                    config_arguments.push(value.clone());
                    rest = after_value;
                }
            }
            FlagAction::Stop => break,
        }
    }

    let mut command_arguments = program;
    command_arguments.extend(rest.iter().cloned());
    ArgumentSplit {
        config_arguments,
        command_arguments,
    }
}
