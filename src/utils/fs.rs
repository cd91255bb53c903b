//! File helpers used by the installer
//!
//! Writes go through a temporary file in the destination directory and are
//! renamed into place, so readers only ever observe a complete file.

use crate::utils::{InstallerError, Result};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Suffix appended to a bundle path to form its backup path
pub const BACKUP_SUFFIX: &str = ".bak";

/// Check whether a regular file exists at `path`.
///
/// A missing path is `Ok(false)`; any other metadata failure (for example a
/// permission error on a parent directory) is surfaced.
pub fn file_exists(path: &Path) -> Result<bool> {
    match std::fs::metadata(path) {
        Ok(meta) => Ok(meta.is_file()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(InstallerError::io(path, e)),
    }
}

/// Backup location for a bundle path: `<path>.bak`
pub fn backup_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(BACKUP_SUFFIX);
    PathBuf::from(name)
}

/// Copy `src` to `dst` byte for byte, replacing `dst` atomically.
///
/// `src` is only opened for reading. Returns the number of bytes copied.
pub fn copy_file(src: &Path, dst: &Path) -> Result<u64> {
    let mut input = std::fs::File::open(src).map_err(|e| InstallerError::io(src, e))?;
    let mut staged = stage_in(dst)?;

    let bytes = std::io::copy(&mut input, staged.as_file_mut())
        .map_err(|e| InstallerError::io(dst, e))?;

    if let Ok(meta) = input.metadata() {
        // Keep the original's mode so a backup of a key bundle stays private
        if let Err(e) = std::fs::set_permissions(staged.path(), meta.permissions()) {
            tracing::warn!(
                location = %dst.display(),
                error = %e,
                "could not copy file permissions"
            );
        }
    }

    commit(staged, dst)?;
    Ok(bytes)
}

/// Write `content` to `path` in full or not at all
pub fn write_file_atomic(path: &Path, content: &[u8]) -> Result<()> {
    let mut staged = stage_in(path)?;

    restrict_permissions(staged.path());

    staged
        .write_all(content)
        .map_err(|e| InstallerError::io(path, e))?;

    commit(staged, path)
}

fn stage_in(dst: &Path) -> Result<NamedTempFile> {
    let dir = match dst.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };

    NamedTempFile::new_in(&dir).map_err(|e| InstallerError::io(dir, e))
}

fn commit(staged: NamedTempFile, dst: &Path) -> Result<()> {
    staged
        .as_file()
        .sync_all()
        .map_err(|e| InstallerError::io(dst, e))?;

    staged
        .persist(dst)
        .map_err(|e| InstallerError::io(dst, e.error))?;

    Ok(())
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) {
    use std::os::unix::fs::PermissionsExt;
    if let Err(e) = std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600)) {
        tracing::warn!(
            location = %path.display(),
            error = %e,
            "could not restrict file permissions"
        );
    }
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) {}
