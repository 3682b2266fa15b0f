//! CLI entrypoint for the `exifstay` metadata tool.
//!
//! The binary delegates to [`exifstay_cli::run`], which loads configuration,
//! parses the command and drives one stay-open session.

use std::io::{self, StderrLock, StdoutLock};
use std::process::ExitCode;

fn main() -> ExitCode {
    let mut stdout: StdoutLock<'_> = io::stdout().lock();
    let mut stderr: StderrLock<'_> = io::stderr().lock();
    exifstay_cli::run(std::env::args_os(), &mut stdout, &mut stderr)
}
