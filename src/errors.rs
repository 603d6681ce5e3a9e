//! Typed error definitions for text_encode_changer.
//! Provides a small set of well-known failure modes for better logs and tests.

use std::path::PathBuf;
use thiserror::Error;

use crate::encoding::EncodingType;

#[derive(Debug, Error)]
pub enum TextEncodeError {
    #[error("Byte order mark required by {encoding} is missing or does not match")]
    BomMismatch { encoding: EncodingType },

    #[error("Input is not valid {encoding}")]
    Malformed { encoding: EncodingType },

    #[error("Text contains characters that cannot be represented in {encoding}")]
    Unmappable { encoding: EncodingType },

    #[error("Source path not found: {0}")]
    SourceNotFound(PathBuf),

    #[error("Source path is not a directory: {0}")]
    NotADirectory(PathBuf),
}

impl TextEncodeError {
    /// Stable numeric code, emitted as a structured log field.
    pub fn code(&self) -> u16 {
        match self {
            TextEncodeError::BomMismatch { .. } => 10,
            TextEncodeError::Malformed { .. } => 11,
            TextEncodeError::Unmappable { .. } => 12,
            TextEncodeError::SourceNotFound(_) => 20,
            TextEncodeError::NotADirectory(_) => 21,
        }
    }

    /// True for the decode-side failures (BOM mismatch or malformed input).
    pub fn is_decode_error(&self) -> bool {
        matches!(
            self,
            TextEncodeError::BomMismatch { .. } | TextEncodeError::Malformed { .. }
        )
    }
}
