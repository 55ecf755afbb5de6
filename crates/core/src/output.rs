//! Output file writing and ownership application

use std::fs;
use std::path::Path;

use tracing::info;

use crate::config::EntrySpec;
use crate::error::CoreError;

/// Write rendered text to `target`, creating or truncating it.
///
/// A trailing newline is appended unless the text already ends with one, so
/// generated files always terminate cleanly without ever gaining a blank
/// line on re-generation.
pub fn write_rendered(target: &Path, rendered: &str) -> Result<(), CoreError> {
    let mut text = String::with_capacity(rendered.len() + 1);
    text.push_str(rendered);
    if !text.ends_with('\n') {
        text.push('\n');
    }

    fs::write(target, text).map_err(|source| CoreError::WriteOutput {
        path: target.to_path_buf(),
        source,
    })
}

/// Apply the entry's mode, owner and group to its target.
///
/// Ownership changes need privilege: an unprivileged run skips the whole
/// step with a notice, which is the expected development-mode behavior and
/// not an error. A privileged run that fails to chmod or chown aborts.
pub fn apply_ownership(spec: &EntrySpec) -> Result<(), CoreError> {
    if !runner_platform::is_superuser() {
        info!(
            target = %spec.target.display(),
            "not running as root, leaving ownership and mode unchanged"
        );
        return Ok(());
    }

    info!(
        target = %spec.target.display(),
        user = spec.owner(),
        group = spec.owner_group(),
        mode = format_args!("{:04o}", spec.mode()),
        "setting ownership and mode"
    );

    runner_platform::set_mode(&spec.target, spec.mode())?;
    runner_platform::set_owner(&spec.target, spec.owner(), spec.owner_group())?;

    Ok(())
}
