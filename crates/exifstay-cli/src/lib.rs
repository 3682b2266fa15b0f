//! Command-line runtime for `exifstay`.
//!
//! The runtime splits configuration flags from the command, loads layered
//! configuration, installs logging and runs the command inside a scoped
//! stay-open session. Output streams are injected so tests can capture them.

use std::error::Error as _;
use std::ffi::OsString;
use std::fmt::Write as _;
use std::io::Write;
use std::process::ExitCode;

use clap::Parser;

mod cli;
mod commands;
mod config;
mod errors;
mod telemetry;

#[cfg(test)]
mod tests;

use cli::Cli;
use config::{ConfigLoader, OrthoConfigLoader, split_arguments};
use errors::AppError;

/// Runs the CLI using the provided arguments and output streams.
#[must_use]
pub fn run<I, W, E>(args: I, stdout: &mut W, stderr: &mut E) -> ExitCode
where
    I: IntoIterator<Item = OsString>,
    W: Write,
    E: Write,
{
    run_with_loader(args, stdout, stderr, &OrthoConfigLoader)
}

/// Runs the CLI with a custom configuration loader.
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
    let split = split_arguments(&arguments);

    let cli = match Cli::try_parse_from(&split.command_arguments) {
        Ok(cli) => cli,
        Err(error) if !error.use_stderr() => {
            return match write!(stdout, "{error}") {
                Ok(()) => ExitCode::SUCCESS,
                Err(_) => ExitCode::FAILURE,
            };
        }
        Err(error) => return report(stderr, &AppError::CliUsage(error)),
    };

    let result = loader.load(&split.config_arguments).and_then(|config| {
        telemetry::initialise(&config)?;
        commands::execute(cli.command, &config, stdout, stderr)
    });

    match result {
        Ok(exit_code) => exit_code,
        Err(error) => report(stderr, &error),
    }
}

/// Writes `error` and its causes to `stderr`.
fn report<E: Write>(stderr: &mut E, error: &AppError) -> ExitCode {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        drop(write!(message, "\n  caused by: {cause}"));
        source = cause.source();
    }
    drop(writeln!(stderr, "{message}"));
    ExitCode::FAILURE
}
