//! File content transfer.
//!
//! A `FileTransfer` reads one file below the source directory, turns its bytes into
//! text with a caller-supplied reader, transforms the text into output bytes, and
//! writes them to the destination chosen by the transfer mode.
//!
//! Ordering per file:
//! 1. resolve source and destination
//! 2. read source, run reader and transform (failure here touches nothing)
//! 3. create the destination's parent chain (when destination != source)
//! 4. handle an existing destination per `OverwriteMode`
//! 5. remove the source for `Move` (when destination != source)
//! 6. write the output bytes (create or truncate)

use anyhow::{Context, Result, bail};
use std::fmt;
use std::fs;
use std::io::Write;
use std::path::{Component, Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, info};

use crate::errors::TextEncodeError;

use super::backup::create_backup;
use super::helpers::io_error_with_help;

/// Where converted output goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransferMode {
    /// Rewrite the source file in place.
    Replace,
    /// Write into the destination tree, keep the source.
    #[default]
    Copy,
    /// Write into the destination tree, then remove the source.
    Move,
}

/// What to do when the destination already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverwriteMode {
    #[default]
    Overwrite,
    /// Rename the existing destination to `<name>.bak` first.
    CreateBackup,
    /// Leave both files untouched and report "not converted".
    Skip,
}

impl TransferMode {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "replace" | "inplace" | "in-place" => Some(TransferMode::Replace),
            "copy" => Some(TransferMode::Copy),
            "move" => Some(TransferMode::Move),
            _ => None,
        }
    }
}

impl fmt::Display for TransferMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TransferMode::Replace => "replace",
            TransferMode::Copy => "copy",
            TransferMode::Move => "move",
        })
    }
}

impl FromStr for TransferMode {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("invalid transfer mode: '{s}'"))
    }
}

impl OverwriteMode {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "overwrite" => Some(OverwriteMode::Overwrite),
            "backup" | "create-backup" | "create_backup" => Some(OverwriteMode::CreateBackup),
            "skip" => Some(OverwriteMode::Skip),
            _ => None,
        }
    }
}

impl fmt::Display for OverwriteMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            OverwriteMode::Overwrite => "overwrite",
            OverwriteMode::CreateBackup => "backup",
            OverwriteMode::Skip => "skip",
        })
    }
}

impl FromStr for OverwriteMode {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("invalid overwrite mode: '{s}'"))
    }
}

/// Per-file read/convert/write protocol bound to one source and destination tree.
pub struct FileTransfer<T> {
    source_dir: PathBuf,
    dest_dir: PathBuf,
    transfer_mode: TransferMode,
    overwrite_mode: OverwriteMode,
    transform: T,
}

/// Build a transfer. Without a destination directory (or in `Replace` mode) the
/// destination tree is the source tree.
pub fn create_transfer<T>(
    source_dir: impl Into<PathBuf>,
    dest_dir: Option<&Path>,
    transfer_mode: TransferMode,
    overwrite_mode: OverwriteMode,
    transform: T,
) -> FileTransfer<T>
where
    T: Fn(&str) -> Result<Vec<u8>, TextEncodeError>,
{
    let source_dir = source_dir.into();
    let dest_dir = match dest_dir {
        Some(d) if transfer_mode != TransferMode::Replace && !d.as_os_str().is_empty() => {
            d.to_path_buf()
        }
        _ => source_dir.clone(),
    };
    FileTransfer {
        source_dir,
        dest_dir,
        transfer_mode,
        overwrite_mode,
        transform,
    }
}

impl<T> FileTransfer<T>
where
    T: Fn(&str) -> Result<Vec<u8>, TextEncodeError>,
{
    pub fn transfer_mode(&self) -> TransferMode {
        self.transfer_mode
    }

    pub fn overwrite_mode(&self) -> OverwriteMode {
        self.overwrite_mode
    }

    /// Source and destination for a relative path.
    pub fn resolve(&self, relative: &Path) -> Result<(PathBuf, PathBuf)> {
        ensure_relative(relative)?;
        let src = self.source_dir.join(relative);
        let dest = if self.transfer_mode == TransferMode::Replace {
            src.clone()
        } else {
            self.dest_dir.join(relative)
        };
        Ok((src, dest))
    }

    /// Convert one file. Returns `Ok(false)` only when `Skip` left an existing
    /// destination alone.
    pub fn transfer<R>(&self, relative: &Path, reader: R) -> Result<bool>
    where
        R: FnOnce(&[u8]) -> Result<String, TextEncodeError>,
    {
        let (src, dest) = self.resolve(relative)?;
        debug!(src = %src.display(), dest = %dest.display(), "transfer");

        let data = fs::read(&src).map_err(io_error_with_help("read source file", &src))?;
        let text = reader(&data).with_context(|| format!("read text from '{}'", src.display()))?;
        let output = (self.transform)(&text)
            .with_context(|| format!("convert text of '{}'", src.display()))?;

        let in_place = dest == src;
        if !in_place && let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)
                .map_err(io_error_with_help("create destination directory", parent))?;
        }

        if dest.exists() {
            match self.overwrite_mode {
                OverwriteMode::Overwrite => {}
                OverwriteMode::CreateBackup => {
                    create_backup(&dest)?;
                }
                OverwriteMode::Skip => {
                    info!(dest = %dest.display(), "destination exists; skipped");
                    return Ok(false);
                }
            }
        }

        if self.transfer_mode == TransferMode::Move && !in_place {
            fs::remove_file(&src).map_err(io_error_with_help("remove source file", &src))?;
        }

        write_truncate(&dest, &output)?;
        info!(src = %src.display(), dest = %dest.display(), bytes = output.len(), "converted");
        Ok(true)
    }
}

fn ensure_relative(relative: &Path) -> Result<()> {
    if relative.as_os_str().is_empty() {
        bail!("empty relative path");
    }
    for c in relative.components() {
        match c {
            Component::Normal(_) | Component::CurDir => {}
            _ => bail!("path must stay below the source directory: {}", relative.display()),
        }
    }
    Ok(())
}

fn write_truncate(dest: &Path, bytes: &[u8]) -> Result<()> {
    let mut file = fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(dest)
        .map_err(io_error_with_help("open destination", dest))?;
    file.write_all(bytes)
        .map_err(io_error_with_help("write destination", dest))?;
    file.sync_all()
        .map_err(io_error_with_help("sync destination", dest))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::{EncodingType, decode, encode};
    use tempfile::tempdir;

    fn to_utf8(text: &str) -> Result<Vec<u8>, TextEncodeError> {
        encode(text, EncodingType::Utf8)
    }

    fn read_sjis(bytes: &[u8]) -> Result<String, TextEncodeError> {
        decode(bytes, EncodingType::Windows31J)
    }

    #[test]
    fn replace_rewrites_in_place() {
        let td = tempdir().unwrap();
        let src = td.path().join("a.txt");
        fs::write(&src, encode("日本", EncodingType::Windows31J).unwrap()).unwrap();

        let t = create_transfer(td.path(), None, TransferMode::Replace, OverwriteMode::Overwrite, to_utf8);
        assert!(t.transfer(Path::new("a.txt"), read_sjis).unwrap());
        assert_eq!(fs::read_to_string(&src).unwrap(), "日本");
    }

    #[test]
    fn replace_ignores_destination_directory() {
        let td = tempdir().unwrap();
        let other = td.path().join("elsewhere");
        let t = create_transfer(td.path(), Some(&other), TransferMode::Replace, OverwriteMode::Overwrite, to_utf8);
        let (src, dest) = t.resolve(Path::new("x.txt")).unwrap();
        assert_eq!(src, dest);
    }

    #[test]
    fn copy_creates_parent_chain_and_keeps_source() {
        let td = tempdir().unwrap();
        let src_dir = td.path().join("in");
        let dst_dir = td.path().join("out");
        fs::create_dir_all(src_dir.join("deep/er")).unwrap();
        fs::write(src_dir.join("deep/er/f.txt"), b"plain").unwrap();

        let t = create_transfer(&src_dir, Some(&dst_dir), TransferMode::Copy, OverwriteMode::Overwrite, to_utf8);
        assert!(t.transfer(Path::new("deep/er/f.txt"), |b| decode(b, EncodingType::Utf8)).unwrap());
        assert!(src_dir.join("deep/er/f.txt").exists());
        assert_eq!(fs::read(dst_dir.join("deep/er/f.txt")).unwrap(), b"plain");
    }

    #[test]
    fn move_removes_source_after_writing() {
        let td = tempdir().unwrap();
        let src_dir = td.path().join("in");
        let dst_dir = td.path().join("out");
        fs::create_dir_all(&src_dir).unwrap();
        fs::write(src_dir.join("m.txt"), b"moved").unwrap();

        let t = create_transfer(&src_dir, Some(&dst_dir), TransferMode::Move, OverwriteMode::Overwrite, to_utf8);
        assert!(t.transfer(Path::new("m.txt"), |b| decode(b, EncodingType::Utf8)).unwrap());
        assert!(!src_dir.join("m.txt").exists());
        assert_eq!(fs::read(dst_dir.join("m.txt")).unwrap(), b"moved");
    }

    #[test]
    fn skip_leaves_both_files_untouched() {
        let td = tempdir().unwrap();
        let src_dir = td.path().join("in");
        let dst_dir = td.path().join("out");
        fs::create_dir_all(&src_dir).unwrap();
        fs::create_dir_all(&dst_dir).unwrap();
        fs::write(src_dir.join("s.txt"), b"new").unwrap();
        fs::write(dst_dir.join("s.txt"), b"old").unwrap();

        let t = create_transfer(&src_dir, Some(&dst_dir), TransferMode::Move, OverwriteMode::Skip, to_utf8);
        assert!(!t.transfer(Path::new("s.txt"), |b| decode(b, EncodingType::Utf8)).unwrap());
        assert_eq!(fs::read(src_dir.join("s.txt")).unwrap(), b"new");
        assert_eq!(fs::read(dst_dir.join("s.txt")).unwrap(), b"old");
    }

    #[test]
    fn backup_keeps_previous_destination_bytes() {
        let td = tempdir().unwrap();
        let f = td.path().join("b.txt");
        fs::write(&f, encode("前", EncodingType::Windows31J).unwrap()).unwrap();
        let before = fs::read(&f).unwrap();

        let t = create_transfer(td.path(), None, TransferMode::Replace, OverwriteMode::CreateBackup, to_utf8);
        assert!(t.transfer(Path::new("b.txt"), read_sjis).unwrap());
        assert_eq!(fs::read(td.path().join("b.txt.bak")).unwrap(), before);
        assert_eq!(fs::read_to_string(&f).unwrap(), "前");
    }

    #[test]
    fn reader_failure_touches_nothing() {
        let td = tempdir().unwrap();
        let src_dir = td.path().join("in");
        let dst_dir = td.path().join("out");
        fs::create_dir_all(&src_dir).unwrap();
        fs::create_dir_all(&dst_dir).unwrap();
        fs::write(src_dir.join("bad.txt"), [0xFFu8, 0xFE, 0x00]).unwrap();
        fs::write(dst_dir.join("bad.txt"), b"keep me").unwrap();

        let t = create_transfer(&src_dir, Some(&dst_dir), TransferMode::Move, OverwriteMode::CreateBackup, to_utf8);
        let err = t
            .transfer(Path::new("bad.txt"), |b| decode(b, EncodingType::Utf8))
            .unwrap_err();
        assert!(err.downcast_ref::<TextEncodeError>().is_some());
        assert!(src_dir.join("bad.txt").exists());
        assert_eq!(fs::read(dst_dir.join("bad.txt")).unwrap(), b"keep me");
        assert!(!dst_dir.join("bad.txt.bak").exists());
    }

    #[test]
    fn transform_failure_touches_nothing() {
        let td = tempdir().unwrap();
        let f = td.path().join("u.txt");
        fs::write(&f, "😀").unwrap();
        let t = create_transfer(
            td.path(),
            None,
            TransferMode::Replace,
            OverwriteMode::CreateBackup,
            |text: &str| encode(text, EncodingType::EucJp),
        );
        assert!(t.transfer(Path::new("u.txt"), |b| decode(b, EncodingType::Utf8)).is_err());
        assert_eq!(fs::read_to_string(&f).unwrap(), "😀");
        assert!(!td.path().join("u.txt.bak").exists());
    }

    #[test]
    fn rejects_paths_escaping_the_source_tree() {
        let td = tempdir().unwrap();
        let t = create_transfer(td.path(), None, TransferMode::Replace, OverwriteMode::Overwrite, to_utf8);
        assert!(t.resolve(Path::new("../x.txt")).is_err());
        assert!(t.resolve(Path::new("/etc/passwd")).is_err());
    }

    #[test]
    fn modes_parse_and_display() {
        assert_eq!("MOVE".parse::<TransferMode>().unwrap(), TransferMode::Move);
        assert_eq!(OverwriteMode::parse("backup"), Some(OverwriteMode::CreateBackup));
        assert_eq!(OverwriteMode::CreateBackup.to_string().parse::<OverwriteMode>().unwrap(), OverwriteMode::CreateBackup);
        assert!("sideways".parse::<TransferMode>().is_err());
    }
}
