//! Deterministic encoding detection.
//! Tries each catalog entry in probe order and accepts the first one whose BOM
//! requirement holds and whose strict decode succeeds.

use anyhow::Result;
use std::fs;
use std::path::Path;
use tracing::{debug, trace};

use crate::fs_ops::io_error_with_help;

use super::catalog::EncodingType;
use super::codec::{content_after_bom, decode_strict};

/// Detect the encoding of `bytes`, or `None` when no entry decodes them strictly.
pub fn detect(bytes: &[u8]) -> Option<EncodingType> {
    detect_and_decode(bytes).map(|(enc, _)| enc)
}

/// Detect the encoding and return the decoded text of the winning candidate.
pub fn detect_and_decode(bytes: &[u8]) -> Option<(EncodingType, String)> {
    for candidate in EncodingType::PROBE_ORDER {
        let Some(content) = content_after_bom(bytes, candidate) else {
            trace!(encoding = %candidate, "BOM mismatch");
            continue;
        };
        match decode_strict(content, candidate.charset()) {
            Some(text) => {
                debug!(encoding = %candidate, len = bytes.len(), "encoding detected");
                return Some((candidate, text));
            }
            None => trace!(encoding = %candidate, "strict decode failed"),
        }
    }
    debug!(len = bytes.len(), "no catalog encoding matched");
    None
}

/// Read a whole file and detect its encoding.
pub fn detect_file(path: &Path) -> Result<Option<EncodingType>> {
    let data = fs::read(path).map_err(io_error_with_help("read file", path))?;
    Ok(detect(&data))
}
