//! I/O helper utilities.
//!
//! Provides small adapters to enrich io::Error with the operation, the path and an
//! actionable hint, for use with map_err in anyhow::Result code:
//!
//!   fs::read(path).map_err(io_error_with_help("read file", path))?;

use anyhow::anyhow;
use std::io;
use std::path::Path;

fn hint_for(e: &io::Error) -> Option<&'static str> {
    let hint = match e.kind() {
        io::ErrorKind::PermissionDenied => "permission denied; check ownership and write permissions",
        io::ErrorKind::NotFound => "path not found; verify it exists",
        io::ErrorKind::AlreadyExists => "already exists; remove it or choose another destination",
        io::ErrorKind::IsADirectory => "expected a file but found a directory",
        io::ErrorKind::NotADirectory => "a path component is not a directory",
        io::ErrorKind::StorageFull => "insufficient space on device",
        io::ErrorKind::ReadOnlyFilesystem => "read-only filesystem; cannot write here",
        io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut => {
            "busy/timed out; retry after the current writer finishes"
        }
        _ => return None,
    };
    Some(hint)
}

/// Format a human-friendly message with op/path plus a hint when one applies.
fn build_message(op: &str, path: &Path, e: &io::Error) -> String {
    let mut msg = format!("{} '{}': {}", op, path.display(), e);
    if let Some(hint) = hint_for(e) {
        msg.push_str(" (");
        msg.push_str(hint);
        msg.push(')');
    }
    if let Some(code) = e.raw_os_error() {
        msg.push_str(&format!(" [os code: {}]", code));
    }
    msg
}

/// Adapter for anyhow::Result code.
/// Returns a closure suitable for `.map_err(...)` that converts io::Error -> anyhow::Error.
pub fn io_error_with_help<'a>(
    op: &'a str,
    path: &'a Path,
) -> impl FnOnce(io::Error) -> anyhow::Error + 'a {
    move |e: io::Error| anyhow!(build_message(op, path, &e))
}
