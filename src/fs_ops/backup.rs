//! Backup sibling handling.
//! - The backup of `name` is `name.bak` in the same directory.
//! - An existing `.bak` is removed without confirmation before the rename.
//! - On Unix, best-effort fsync of the directory after the rename.

use anyhow::{Context, Result, anyhow};
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use super::helpers::io_error_with_help;

/// Extension appended to backup files.
pub const BACKUP_SUFFIX: &str = ".bak";

/// `<name>.bak` next to `path` (appended, not substituted for the extension).
pub fn backup_path(path: &Path) -> Result<PathBuf> {
    let name = path
        .file_name()
        .ok_or_else(|| anyhow!("path has no file name: {}", path.display()))?;
    let mut bak = OsString::from(name);
    bak.push(BACKUP_SUFFIX);
    Ok(path.with_file_name(bak))
}

/// Move `path` aside to its backup sibling and return the backup path.
pub fn create_backup(path: &Path) -> Result<PathBuf> {
    let bak = backup_path(path)?;
    if fs::symlink_metadata(&bak).is_ok() {
        warn!(backup = %bak.display(), "replacing existing backup file");
        fs::remove_file(&bak).map_err(io_error_with_help("remove old backup", &bak))?;
    }

    fs::rename(path, &bak)
        .with_context(|| format!("rename '{}' -> '{}'", path.display(), bak.display()))?;

    #[cfg(unix)]
    if let Some(parent) = bak.parent() {
        // Ignore fsync errors to avoid turning a successful rename into a failure.
        let _ = fsync_dir(parent);
    }

    info!(path = %path.display(), backup = %bak.display(), "created backup");
    Ok(bak)
}

#[cfg(unix)]
fn fsync_dir(dir: &Path) -> std::io::Result<()> {
    let dir = if dir.as_os_str().is_empty() { Path::new(".") } else { dir };
    fs::File::open(dir)?.sync_all()
}
