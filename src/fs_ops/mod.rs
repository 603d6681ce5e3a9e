//! Filesystem operations: transfer protocol, backups and I/O error helpers.

mod backup;
mod helpers;
mod transfer;

pub use backup::{BACKUP_SUFFIX, backup_path, create_backup};
pub use helpers::io_error_with_help;
pub use transfer::{FileTransfer, OverwriteMode, TransferMode, create_transfer};
