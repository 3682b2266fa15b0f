//! Shared fixtures for session tests.

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use rstest::fixture;
use tempfile::TempDir;

use crate::SessionConfig;

/// Shell script speaking the stay-open protocol.
///
/// Every argument line is echoed back, `-executeN` answers `{readyN}`, and
/// a few magic arguments simulate misbehaving tools.
const STAND_IN_SCRIPT: &str = r#"#!/bin/sh
while IFS= read -r line; do
  case "$line" in
    -stay_open) ;;
    False) exit 0 ;;
    -hang) exec sleep 30 ;;
    -die) exit 3 ;;
    -stale*) printf '{ready%s}\n' "${line#-stale}" ;;
    -execute*) printf '{ready%s}\n' "${line#-execute}" ;;
    *) printf '%s\n' "$line" ;;
  esac
done
"#;

/// Interpreter used to run the stand-in script.
const SHELL: &str = "/bin/sh";

/// A scratch directory holding the stand-in tool.
pub(crate) struct StandInTool {
    _dir: TempDir,
    script: PathBuf,
}

impl StandInTool {
    /// Session configuration that runs the stand-in without common args.
    pub(crate) fn config(&self) -> SessionConfig {
        SessionConfig::new(SHELL).with_launch_args([self.script.display().to_string()])
    }

    /// Same as [`StandInTool::config`] with a response bound.
    pub(crate) fn config_with_timeout(&self, timeout: Duration) -> SessionConfig {
        self.config().with_timeout(timeout)
    }
}

#[fixture]
pub(crate) fn stand_in_tool() -> StandInTool {
    let dir = TempDir::new().expect("create temp dir");
    let script = dir.path().join("stand-in-tool.sh");
    fs::write(&script, STAND_IN_SCRIPT).expect("write stand-in script");
    StandInTool { _dir: dir, script }
}
