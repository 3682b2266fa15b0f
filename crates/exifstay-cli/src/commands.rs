//! Execution of parsed commands against a stay-open session.

use std::ffi::OsStr;
use std::io::Write;
use std::process::ExitCode;

use exifstay_config::Config;
use exifstay_session::{
    CommandRunner, MetadataClient, Session, SessionConfig, find_executable,
};
use serde_json::to_writer_pretty;
use tracing::debug;

use crate::cli::CliCommand;
use crate::errors::AppError;

/// Log target for CLI command execution.
const COMMAND_TARGET: &str = "exifstay_cli::commands";

/// Runs `command`, starting a session only for commands that need one.
pub(crate) fn execute<W, E>(
    command: CliCommand,
    config: &Config,
    stdout: &mut W,
    stderr: &mut E,
) -> Result<ExitCode, AppError>
where
    W: Write,
    E: Write,
{
    if matches!(command, CliCommand::Which) {
        return print_executable(config, stdout);
    }

    let session_config = SessionConfig::from(config);
    debug!(
        target: COMMAND_TARGET,
        executable = %session_config.executable().display(),
        "starting session"
    );
    Session::scoped(session_config, |session| {
        let mut client = MetadataClient::new(session);
        run_metadata_command(command, config, &mut client, stdout, stderr)
    })
}

fn run_metadata_command<R, W, E>(
    command: CliCommand,
    config: &Config,
    client: &mut MetadataClient<R>,
    stdout: &mut W,
    stderr: &mut E,
) -> Result<ExitCode, AppError>
where
    R: CommandRunner,
    W: Write,
    E: Write,
{
    match command {
        CliCommand::Get { files } => {
            let records = client.get_metadata_batch(&files)?;
            write_json(stdout, &records)
        }
        CliCommand::Tag { tag, file } => match client.get_tag(&tag, &file)? {
            Some(value) => write_json(stdout, &value),
            None => {
                writeln!(stderr, "tag '{tag}' not present in {}", file.display())
                    .map_err(AppError::WriteOutput)?;
                Ok(ExitCode::FAILURE)
            }
        },
        CliCommand::Set { file, assignments } => {
            let tags = parse_assignments(&assignments)?;
            let output = client.set_tags(tags, &file)?;
            write_text(stdout, &output.text())
        }
        CliCommand::Keywords {
            operation,
            file,
            keywords,
        } => {
            let output = client.set_keywords(operation, &keywords, &file)?;
            write_text(stdout, &output.text())
        }
        CliCommand::Copy { source, target } => {
            let output = client.copy_tags(&source, &target)?;
            write_text(stdout, &output.text())
        }
        CliCommand::Which => print_executable(config, stdout),
    }
}

/// Splits `TAG=VALUE` assignments at the first `=`.
pub(crate) fn parse_assignments(assignments: &[String]) -> Result<Vec<(String, String)>, AppError> {
    assignments
        .iter()
        .map(|assignment| match assignment.split_once('=') {
            Some((tag, value)) if !tag.is_empty() => Ok((tag.to_owned(), value.to_owned())),
            _ => Err(AppError::InvalidAssignment(assignment.clone())),
        })
        .collect()
}

fn print_executable<W: Write>(config: &Config, stdout: &mut W) -> Result<ExitCode, AppError> {
    let found = find_executable(config.executable(), config.search_path().map(OsStr::new))
        .ok_or_else(|| AppError::ExecutableNotFound(config.executable().to_string()))?;
    writeln!(stdout, "{}", found.display()).map_err(AppError::WriteOutput)?;
    Ok(ExitCode::SUCCESS)
}

fn write_json<W, T>(stdout: &mut W, value: &T) -> Result<ExitCode, AppError>
where
    W: Write,
    T: serde::Serialize + ?Sized,
{
    to_writer_pretty(&mut *stdout, value).map_err(AppError::SerialiseOutput)?;
    writeln!(stdout).map_err(AppError::WriteOutput)?;
    Ok(ExitCode::SUCCESS)
}

fn write_text<W: Write>(stdout: &mut W, text: &str) -> Result<ExitCode, AppError> {
    writeln!(stdout, "{}", text.trim()).map_err(AppError::WriteOutput)?;
    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn parses_assignments_at_the_first_equals_sign() {
        let parsed = parse_assignments(&[
            String::from("XMP:Subject=Röschen"),
            String::from("Comment=a=b"),
            String::from("Title="),
        ])
        .expect("valid assignments");

        assert_eq!(
            parsed,
            [
                (String::from("XMP:Subject"), String::from("Röschen")),
                (String::from("Comment"), String::from("a=b")),
                (String::from("Title"), String::new()),
            ]
        );
    }

    #[rstest]
    #[case("NoEquals")]
    #[case("=value")]
    fn rejects_malformed_assignments(#[case] assignment: &str) {
        assert!(matches!(
            parse_assignments(&[assignment.to_owned()]),
            Err(AppError::InvalidAssignment(_))
        ));
    }
}
