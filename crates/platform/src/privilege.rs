//! Process privilege detection

/// Check whether the process runs with superuser privilege.
///
/// Ownership and mode changes on generated files are only attempted when
/// this returns true; unprivileged runs skip them with a notice.
#[cfg(unix)]
pub fn is_superuser() -> bool {
    nix::unistd::geteuid().is_root()
}

/// Non-Unix builds have no superuser semantics for file ownership, so the
/// privileged path is never taken.
#[cfg(not(unix))]
pub fn is_superuser() -> bool {
    false
}
