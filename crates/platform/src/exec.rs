//! Process handoff
//!
//! The final pipeline stage replaces the current process image with the
//! configured command, so the generated configuration is consumed by the
//! service as if it had been started directly.

use std::convert::Infallible;
use std::process::Command;

use crate::error::PlatformError;

/// Replace the current process image with `command`.
///
/// The command is a full shell command line and runs through `/bin/sh -c`,
/// inheriting this process's descriptors and environment. On success this
/// never returns; the replacement command's exit status becomes the
/// authoritative one. An `Err` is only produced when the exec itself fails
/// (command not found, not executable).
#[cfg(unix)]
pub fn handoff(command: &str) -> Result<Infallible, PlatformError> {
    use std::os::unix::process::CommandExt;

    // exec only returns on failure
    let source = Command::new("/bin/sh").arg("-c").arg(command).exec();

    Err(PlatformError::Exec {
        command: command.to_string(),
        source,
    })
}

/// Exec-replace is unavailable off Unix: run the command as a child and
/// terminate with its exit status instead. The process tree differs (the
/// parent survives until the child exits), but the observable contract --
/// the replacement command's status is authoritative -- is preserved.
#[cfg(not(unix))]
pub fn handoff(command: &str) -> Result<Infallible, PlatformError> {
    let status = Command::new("cmd")
        .args(["/C", command])
        .status()
        .map_err(|source| PlatformError::Exec {
            command: command.to_string(),
            source,
        })?;

    std::process::exit(status.code().unwrap_or(1));
}
