//! Config validation logic.
//! Checks the name pattern, the log file location, and the conversion directories.

use anyhow::{Result, bail};
use std::path::Path;
use tracing::{debug, error};

use crate::fs_ops::TransferMode;
use crate::walk::NameMatcher;

use super::types::Config;

impl Config {
    /// Validate the settings that do not depend on a particular run.
    pub fn validate(&self) -> Result<()> {
        let matcher = NameMatcher::new(&self.pattern)?;
        if matcher.is_empty() {
            error!("pattern has no file name globs: '{}'", self.pattern);
            bail!("pattern has no file name globs: '{}'", self.pattern);
        }
        if let Some(log) = &self.log_file
            && log.is_dir()
        {
            bail!("log_file is a directory: {}", log.display());
        }
        debug!(pattern = %self.pattern, "config validated");
        Ok(())
    }
}

/// Check a conversion's source and optional destination before any work starts.
pub fn validate_dirs(source: &Path, dest: Option<&Path>, mode: TransferMode) -> Result<()> {
    if !source.exists() {
        bail!("source directory does not exist: {}", source.display());
    }
    if !source.is_dir() {
        bail!("source is not a directory: {}", source.display());
    }
    if mode == TransferMode::Replace {
        return Ok(());
    }
    if let Some(dest) = dest
        && dest.exists()
        && !dest.is_dir()
    {
        bail!("destination exists but isn't a directory: {}", dest.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn blank_pattern_is_rejected() {
        let cfg = Config {
            pattern: " ; ".into(),
            ..Config::default()
        };
        assert!(cfg.validate().is_err());
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn destination_must_be_a_directory() {
        let td = tempdir().unwrap();
        let file = td.path().join("f");
        fs::write(&file, "x").unwrap();
        assert!(validate_dirs(td.path(), Some(&file), TransferMode::Copy).is_err());
        assert!(validate_dirs(td.path(), Some(&file), TransferMode::Replace).is_ok());
        assert!(validate_dirs(td.path(), Some(&td.path().join("new")), TransferMode::Move).is_ok());
        assert!(validate_dirs(&file, None, TransferMode::Copy).is_err());
    }
}
