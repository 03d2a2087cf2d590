//! Running the external sync tool.
use std::process::{Command, Stdio};

use crate::error::SyncError;

/// Runs a synchronization command line.
///
/// `args[0]` is the program, the rest are its arguments. Implementations
/// block until the command finishes and fail on non-zero exit.
#[cfg_attr(test, mockall::automock)]
pub trait SyncRunner {
    /// Run the command line.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError`] if the command cannot be started or exits non-zero.
    fn run(&self, args: &[String]) -> Result<(), SyncError>;
}

/// Runs the command as a child process with inherited stdout and stderr, so
/// the tool's output streams straight to the terminal.
#[derive(Debug, Default, Clone, Copy)]
pub struct RsyncRunner;

impl SyncRunner for RsyncRunner {
    fn run(&self, args: &[String]) -> Result<(), SyncError> {
        let Some((program, rest)) = args.split_first() else {
            return Err(SyncError::Spawn {
                program: String::new(),
                source: std::io::Error::new(std::io::ErrorKind::InvalidInput, "empty command line"),
            });
        };
        run_inherited(program, rest)
    }
}

/// Run `program` with inherited stdio and wait for it, failing on non-zero exit.
///
/// # Errors
///
/// Returns [`SyncError::Spawn`] if the program cannot be started and
/// [`SyncError::ExecutionFailed`] if it exits unsuccessfully.
pub fn run_inherited(program: &str, args: &[String]) -> Result<(), SyncError> {
    tracing::debug!("running: {program} {}", args.join(" "));
    let status = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()
        .map_err(|source| SyncError::Spawn {
            program: program.to_string(),
            source,
        })?;
    if !status.success() {
        return Err(SyncError::ExecutionFailed {
            program: program.to_string(),
            code: status.code(),
        });
    }
    Ok(())
}

/// Check if a program is available on PATH (or is an existing path).
#[must_use]
pub fn which(program: &str) -> bool {
    which::which(program).is_ok()
}
