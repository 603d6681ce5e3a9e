//! Batch conversion and text preview.
//!
//! `convert_files` drives a `FileTransfer` over a selection of walked files:
//! each file is strictly decoded under its detected encoding, its line breaks are
//! rewritten to the target terminator (unless that is `Unknown`), and the text is
//! encoded under the target encoding. Cancellation is polled between files.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::encoding::{EncodingType, decode, encode};
use crate::errors::TextEncodeError;
use crate::fs_ops::{OverwriteMode, TransferMode, create_transfer, io_error_with_help};
use crate::progress::Progress;
use crate::shutdown::CancelFlag;
use crate::terminator::{TermType, change_terminator, presume_term_type};
use crate::walk::FileDescriptor;

pub const CONVERT_TITLE: &str = "converting...";

/// One file chosen for conversion, with the encoding it was detected as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub relative: PathBuf,
    pub encoding: Option<EncodingType>,
}

impl From<&FileDescriptor> for SelectedFile {
    fn from(fd: &FileDescriptor) -> Self {
        Self {
            relative: fd.relative.clone(),
            encoding: fd.encoding,
        }
    }
}

/// Everything a batch conversion needs.
#[derive(Debug, Clone)]
pub struct ConvertRequest {
    pub source_dir: PathBuf,
    /// Destination tree for Copy/Move; ignored for Replace.
    pub dest_dir: Option<PathBuf>,
    pub transfer_mode: TransferMode,
    pub overwrite_mode: OverwriteMode,
    pub target_encoding: EncodingType,
    /// `Unknown` keeps each file's line breaks as they are.
    pub target_term: TermType,
    pub files: Vec<SelectedFile>,
}

/// Outcome of a batch that ran to completion or was cancelled.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConvertSummary {
    pub converted: Vec<PathBuf>,
    /// Left alone by the `Skip` overwrite policy.
    pub skipped: Vec<PathBuf>,
    /// Not attempted because their encoding is unknown.
    pub ignored: Vec<PathBuf>,
}

impl ConvertSummary {
    pub fn converted_count(&self) -> usize {
        self.converted.len()
    }
}

/// Files whose encoding or terminator differ from the targets.
pub fn select_for_conversion(
    files: &[FileDescriptor],
    target_encoding: EncodingType,
    target_term: TermType,
) -> Vec<SelectedFile> {
    files
        .iter()
        .filter(|f| f.needs_conversion(target_encoding, target_term))
        .map(SelectedFile::from)
        .collect()
}

/// Convert the selected files. The first failing file aborts the batch; its
/// relative path is part of the error context.
pub fn convert_files(
    req: &ConvertRequest,
    cancel: &CancelFlag,
    progress: &dyn Progress,
) -> Result<ConvertSummary> {
    progress.set_title(CONVERT_TITLE);
    let target = req.target_encoding;
    let target_term = req.target_term;
    info!(
        source = %req.source_dir.display(),
        dest = %req.dest_dir.as_deref().map(|d| d.display().to_string()).unwrap_or_default(),
        mode = %req.transfer_mode,
        overwrite = %req.overwrite_mode,
        encoding = %target,
        term = %target_term,
        files = req.files.len(),
        "begin conversion"
    );

    let transfer = create_transfer(
        &req.source_dir,
        req.dest_dir.as_deref(),
        req.transfer_mode,
        req.overwrite_mode,
        |text: &str| encode(&change_terminator(text, target_term), target),
    );

    let mut summary = ConvertSummary::default();
    for file in &req.files {
        if cancel.is_cancelled() {
            info!(converted = summary.converted_count(), "conversion cancelled");
            break;
        }
        let Some(source_encoding) = file.encoding else {
            warn!(path = %file.relative.display(), "encoding unknown; not converted");
            summary.ignored.push(file.relative.clone());
            continue;
        };

        progress.set_message(&file.relative.display().to_string());
        let converted = transfer
            .transfer(&file.relative, |bytes| decode(bytes, source_encoding))
            .with_context(|| format!("convert '{}'", file.relative.display()))?;
        if converted {
            summary.converted.push(file.relative.clone());
        } else {
            summary.skipped.push(file.relative.clone());
        }
    }

    info!(
        converted = summary.converted.len(),
        skipped = summary.skipped.len(),
        ignored = summary.ignored.len(),
        "end conversion"
    );
    Ok(summary)
}

/// Update walked descriptors to reflect the files a batch converted.
pub fn apply_summary(
    files: &mut [FileDescriptor],
    summary: &ConvertSummary,
    target_encoding: EncodingType,
    target_term: TermType,
) {
    for fd in files.iter_mut() {
        if summary.converted.iter().any(|p| p == &fd.relative) {
            fd.mark_converted(target_encoding, target_term);
        }
    }
}

/// Result of decoding a file for display.
#[derive(Debug)]
pub enum PreviewOutcome {
    Text {
        text: String,
        encoding: EncodingType,
        term: TermType,
    },
    DecodeError {
        encoding: EncodingType,
        error: TextEncodeError,
    },
}

/// Decode `path` with `hint`, or with `fallback` when the encoding is unknown.
/// Only I/O failures are errors; a decode failure is a `DecodeError` outcome.
pub fn preview(
    path: &Path,
    hint: Option<EncodingType>,
    fallback: EncodingType,
) -> Result<PreviewOutcome> {
    let encoding = hint.unwrap_or(fallback);
    let data = fs::read(path).map_err(io_error_with_help("read file", path))?;
    Ok(match decode(&data, encoding) {
        Ok(text) => {
            let term = presume_term_type(&text);
            PreviewOutcome::Text { text, encoding, term }
        }
        Err(error) => {
            warn!(path = %path.display(), encoding = %encoding, %error, "preview decode failed");
            PreviewOutcome::DecodeError { encoding, error }
        }
    })
}
