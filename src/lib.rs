//! Core library for `text_encode_changer`.
//!
//! Detects the character encoding and line terminator of text files in a
//! directory tree and converts selected files to a target encoding and
//! terminator, in place or into a destination tree.
//!
//! Layout:
//! - `encoding`: catalog, strict codec, and detection
//! - `terminator`: line break detection and normalization
//! - `walk`: pattern matching and the file tree walker
//! - `fs_ops`: the per-file transfer protocol and backups
//! - `convert`: batch conversion and preview
//! - `worker`: the single background worker used by the CLI
//! - `config`, `cli`, `output`: settings and the command-line surface

pub mod cli;
pub mod config;
pub mod convert;
pub mod encoding;
pub mod errors;
pub mod fs_ops;
pub mod output;
pub mod progress;
pub mod shutdown;
pub mod terminator;
pub mod walk;
pub mod worker;

pub use config::{
    CONFIG_ENV, Config, LogLevel, create_template_config, default_config_path, load_config,
    load_config_from_xml_path, path_has_symlink_ancestor, validate_dirs,
};
pub use convert::{
    CONVERT_TITLE, ConvertRequest, ConvertSummary, PreviewOutcome, SelectedFile, apply_summary,
    convert_files, preview, select_for_conversion,
};
pub use encoding::{EncodingType, decode, detect, detect_and_decode, detect_file, encode};
pub use errors::TextEncodeError;
pub use fs_ops::{FileTransfer, OverwriteMode, TransferMode, create_backup, create_transfer};
pub use progress::{ChannelProgress, NoProgress, Progress, ProgressEvent};
pub use shutdown::CancelFlag;
pub use terminator::{TermType, change_terminator, presume_term_type};
pub use walk::{FileDescriptor, SearchCondition, WALK_TITLE, walk};
pub use worker::{BackgroundWorker, JobHandle, JobOutcome};
