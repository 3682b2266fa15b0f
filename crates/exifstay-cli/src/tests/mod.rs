//! Runtime tests with an injected configuration loader.

use std::ffi::OsString;
use std::process::ExitCode;

use exifstay_config::Config;
use rstest::{fixture, rstest};

use crate::config::ConfigLoader;
use crate::errors::AppError;
use crate::run_with_loader;

struct StubLoader {
    config: Config,
}

impl ConfigLoader for StubLoader {
    fn load(&self, _args: &[OsString]) -> Result<Config, AppError> {
        Ok(self.config.clone())
    }
}

struct Outcome {
    exit_code: ExitCode,
    stdout: String,
    stderr: String,
}

fn run_with(config: Config, args: &[&str]) -> Outcome {
    let loader = StubLoader { config };
    let mut stdout = Vec::new();
    let mut stderr = Vec::new();
    let exit_code = run_with_loader(
        args.iter().map(OsString::from),
        &mut stdout,
        &mut stderr,
        &loader,
    );
    Outcome {
        exit_code,
        stdout: String::from_utf8(stdout).expect("utf-8 stdout"),
        stderr: String::from_utf8(stderr).expect("utf-8 stderr"),
    }
}

#[fixture]
fn missing_tool() -> Config {
    Config {
        executable: "exifstay-missing-tool".into(),
        search_path: Some(String::from("/")),
        ..Config::default()
    }
}

#[rstest]
fn help_is_written_to_stdout() {
    let outcome = run_with(Config::default(), &["exifstay", "--help"]);

    assert_eq!(outcome.exit_code, ExitCode::SUCCESS);
    assert!(outcome.stdout.contains("Usage"));
    assert!(outcome.stderr.is_empty());
}

#[rstest]
fn unknown_commands_are_usage_errors() {
    let outcome = run_with(Config::default(), &["exifstay", "frobnicate"]);

    assert_eq!(outcome.exit_code, ExitCode::FAILURE);
    assert!(outcome.stderr.contains("frobnicate"));
}

#[rstest]
fn get_reports_a_missing_executable(missing_tool: Config) {
    let outcome = run_with(missing_tool, &["exifstay", "get", "rose.jpg"]);

    assert_eq!(outcome.exit_code, ExitCode::FAILURE);
    assert!(outcome.stdout.is_empty());
    assert!(
        outcome
            .stderr
            .contains("executable 'exifstay-missing-tool' not found on the search path")
    );
}

#[rstest]
fn which_reports_a_missing_executable(missing_tool: Config) {
    let outcome = run_with(missing_tool, &["exifstay", "which"]);

    assert_eq!(outcome.exit_code, ExitCode::FAILURE);
    assert!(outcome.stderr.contains("not found"));
}

#[cfg(unix)]
#[rstest]
fn which_prints_the_resolved_path() {
    use std::fs;
    use std::os::unix::fs::PermissionsExt;

    use tempfile::TempDir;

    let dir = TempDir::new().expect("create temp dir");
    let tool = dir.path().join("exiftool");
    fs::write(&tool, "#!/bin/sh\n").expect("write stand-in tool");
    fs::set_permissions(&tool, fs::Permissions::from_mode(0o755)).expect("chmod stand-in tool");
    let config = Config {
        search_path: Some(dir.path().display().to_string()),
        ..Config::default()
    };

    let outcome = run_with(config, &["exifstay", "which"]);

    assert_eq!(outcome.exit_code, ExitCode::SUCCESS);
    assert_eq!(outcome.stdout.trim_end(), tool.display().to_string());
}
