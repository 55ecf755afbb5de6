//! File mode and ownership application
//!
//! These operations back the privileged half of the output writer: after a
//! generated file is written, its mode is applied first, then its owner and
//! group (the same order the chmod/chown pair has always run in). Callers
//! gate on [`crate::is_superuser`]; an unprivileged chown would fail anyway.

use std::path::Path;

#[cfg(unix)]
use tracing::debug;

use crate::error::PlatformError;

/// Apply a Unix file mode (e.g. `0o644`) to `path`.
#[cfg(unix)]
pub fn set_mode(path: &Path, mode: u32) -> Result<(), PlatformError> {
    use std::os::unix::fs::PermissionsExt;

    std::fs::set_permissions(path, std::fs::Permissions::from_mode(mode)).map_err(|e| {
        PlatformError::Chmod {
            path: path.display().to_string(),
            source: e,
        }
    })?;

    debug!(path = %path.display(), mode = format_args!("{mode:04o}"), "mode applied");
    Ok(())
}

/// Change the owner and group of `path`, both given by name.
///
/// Names are resolved against the system user/group databases; an unknown
/// name is an error before any change is attempted.
#[cfg(unix)]
pub fn set_owner(path: &Path, user: &str, group: &str) -> Result<(), PlatformError> {
    use nix::unistd::{chown, Group, User};

    let user = User::from_name(user)
        .map_err(|e| PlatformError::Io(std::io::Error::from(e)))?
        .ok_or_else(|| PlatformError::UnknownUser(user.to_string()))?;

    let group = Group::from_name(group)
        .map_err(|e| PlatformError::Io(std::io::Error::from(e)))?
        .ok_or_else(|| PlatformError::UnknownGroup(group.to_string()))?;

    chown(path, Some(user.uid), Some(group.gid)).map_err(|e| PlatformError::Chown {
        path: path.display().to_string(),
        source: std::io::Error::from(e),
    })?;

    debug!(path = %path.display(), user = %user.name, group = %group.name, "ownership applied");
    Ok(())
}

/// No-op where Unix permission bits do not apply.
#[cfg(not(unix))]
pub fn set_mode(_path: &Path, _mode: u32) -> Result<(), PlatformError> {
    Ok(())
}

/// No-op where Unix ownership semantics do not apply.
#[cfg(not(unix))]
pub fn set_owner(_path: &Path, _user: &str, _group: &str) -> Result<(), PlatformError> {
    Ok(())
}
