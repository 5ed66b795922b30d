//! Entry point for the `dvp` plugin toolchain.
//!
//! The binary delegates to [`dvp_tools::run`], which loads configuration,
//! parses the command line and runs the selected command.

use std::io::{self, StderrLock, StdoutLock};
use std::process::ExitCode;

fn main() -> ExitCode {
    let mut stdout: StdoutLock<'_> = io::stdout().lock();
    let mut stderr: StderrLock<'_> = io::stderr().lock();
    dvp_tools::run(std::env::args_os(), &mut stdout, &mut stderr)
}
