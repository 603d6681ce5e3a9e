//! File tree walker.
//!
//! Traverses the source directory (immediate children only unless recursive),
//! keeps files whose name matches the pattern list, and detects each file's
//! encoding and line terminator as it is found.
//!
//! Cancellation is polled before every entry, so a cancelled walk stops before
//! descending into the next directory and returns what it has collected.
//! Filesystem errors abort the walk; an undetectable file is recorded as unknown.

use anyhow::{Context, Result};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::encoding::detect_and_decode;
use crate::errors::TextEncodeError;
use crate::fs_ops::io_error_with_help;
use crate::progress::Progress;
use crate::shutdown::CancelFlag;
use crate::terminator::{TermType, presume_term_type};

use super::descriptor::{FileDescriptor, SearchCondition};
use super::pattern::NameMatcher;

pub const WALK_TITLE: &str = "searching...";

/// Walk the tree described by `cond`. On cancellation the partial list is returned;
/// check `cancel.is_cancelled()` to tell the two apart.
pub fn walk(
    cond: &SearchCondition,
    cancel: &CancelFlag,
    progress: &dyn Progress,
) -> Result<Vec<FileDescriptor>> {
    progress.set_title(WALK_TITLE);
    let root = resolve_root(&cond.source_dir)?;
    let matcher = NameMatcher::new(&cond.pattern)?;
    let max_depth = if cond.recursive { usize::MAX } else { 1 };
    info!(root = %root.display(), recursive = cond.recursive, pattern = %cond.pattern, "begin walk");

    let mut files = Vec::new();
    // Depth 0 is the root itself; it is reported as an empty message.
    let mut entries = WalkDir::new(&root)
        .max_depth(max_depth)
        .sort_by_file_name()
        .into_iter();

    loop {
        if cancel.is_cancelled() {
            info!(found = files.len(), "walk cancelled");
            return Ok(files);
        }
        let Some(entry) = entries.next() else {
            break;
        };
        let entry = entry.with_context(|| format!("walk '{}'", root.display()))?;
        let relative = entry
            .path()
            .strip_prefix(&root)
            .unwrap_or(entry.path())
            .to_path_buf();

        if entry.file_type().is_dir() {
            progress.set_message(&relative.display().to_string());
            continue;
        }
        if !matcher.matches_os(entry.file_name()) {
            continue;
        }
        // Symlinks are followed only when they lead to a regular file.
        if entry.path_is_symlink() && !entry.path().is_file() {
            debug!(path = %entry.path().display(), "skipping symlink that is not a file");
            continue;
        }
        files.push(describe_file(entry.path(), relative)?);
    }

    info!(found = files.len(), "end walk");
    Ok(files)
}

fn resolve_root(dir: &Path) -> Result<PathBuf> {
    let root = match dunce::canonicalize(dir) {
        Ok(p) => p,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(TextEncodeError::SourceNotFound(dir.to_path_buf()).into());
        }
        Err(e) => return Err(io_error_with_help("resolve source directory", dir)(e)),
    };
    if !root.is_dir() {
        return Err(TextEncodeError::NotADirectory(dir.to_path_buf()).into());
    }
    Ok(root)
}

/// Read one file and build its descriptor.
pub fn describe_file(path: &Path, relative: PathBuf) -> Result<FileDescriptor> {
    let meta = fs::metadata(path).map_err(io_error_with_help("stat file", path))?;
    let data = fs::read(path).map_err(io_error_with_help("read file", path))?;
    let (encoding, term) = match detect_and_decode(&data) {
        Some((enc, text)) => (Some(enc), presume_term_type(&text)),
        None => (None, TermType::Unknown),
    };
    debug!(
        path = %relative.display(),
        encoding = encoding.map(|e| e.id()).unwrap_or("unknown"),
        term = %term,
        "described file"
    );
    Ok(FileDescriptor {
        path: path.to_path_buf(),
        relative,
        size: meta.len(),
        modified: meta.modified().ok(),
        encoding,
        term,
    })
}
