//! Walk input and output records.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::encoding::EncodingType;
use crate::terminator::TermType;

/// What to search: a directory, whether to descend, and a name pattern list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchCondition {
    pub source_dir: PathBuf,
    pub recursive: bool,
    /// Semicolon-separated globs, e.g. `*.txt;*.csv`.
    pub pattern: String,
}

impl SearchCondition {
    pub fn new(source_dir: impl Into<PathBuf>, recursive: bool, pattern: impl Into<String>) -> Self {
        Self {
            source_dir: source_dir.into(),
            recursive,
            pattern: pattern.into(),
        }
    }
}

/// A matched file with its eagerly detected encoding and line terminator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDescriptor {
    /// Absolute path.
    pub path: PathBuf,
    /// Path relative to the walk root.
    pub relative: PathBuf,
    pub size: u64,
    pub modified: Option<SystemTime>,
    /// `None` when no catalog entry decodes the file strictly.
    pub encoding: Option<EncodingType>,
    pub term: TermType,
}

impl FileDescriptor {
    pub fn relative_path(&self) -> &Path {
        &self.relative
    }

    /// Whether the file should be pre-selected for conversion to the targets.
    /// Files of unknown encoding are never selected.
    pub fn needs_conversion(&self, target: EncodingType, target_term: TermType) -> bool {
        let Some(enc) = self.encoding else {
            return false;
        };
        enc != target || (target_term != TermType::Unknown && self.term != target_term)
    }

    /// Reflect a successful conversion.
    pub fn mark_converted(&mut self, encoding: EncodingType, term: TermType) {
        self.encoding = Some(encoding);
        if term != TermType::Unknown {
            self.term = term;
        }
    }
}

impl fmt::Display for FileDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let enc = self.encoding.map(|e| e.label()).unwrap_or("unknown");
        write!(f, "{enc}={}", self.relative.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fd(encoding: Option<EncodingType>, term: TermType) -> FileDescriptor {
        FileDescriptor {
            path: PathBuf::from("/root/a.txt"),
            relative: PathBuf::from("a.txt"),
            size: 1,
            modified: None,
            encoding,
            term,
        }
    }

    #[test]
    fn preselect_on_encoding_or_terminator_mismatch() {
        let utf8_lf = fd(Some(EncodingType::Utf8), TermType::Lf);
        assert!(!utf8_lf.needs_conversion(EncodingType::Utf8, TermType::Lf));
        assert!(!utf8_lf.needs_conversion(EncodingType::Utf8, TermType::Unknown));
        assert!(utf8_lf.needs_conversion(EncodingType::Utf8, TermType::CrLf));
        assert!(utf8_lf.needs_conversion(EncodingType::Utf8Bom, TermType::Unknown));
    }

    #[test]
    fn unknown_encoding_never_preselected() {
        let unknown = fd(None, TermType::Unknown);
        assert!(!unknown.needs_conversion(EncodingType::Utf8, TermType::Lf));
    }

    #[test]
    fn mark_converted_keeps_terminator_when_target_unknown() {
        let mut f = fd(Some(EncodingType::EucJp), TermType::CrLf);
        f.mark_converted(EncodingType::Utf8, TermType::Unknown);
        assert_eq!(f.encoding, Some(EncodingType::Utf8));
        assert_eq!(f.term, TermType::CrLf);
        f.mark_converted(EncodingType::Utf8, TermType::Lf);
        assert_eq!(f.term, TermType::Lf);
        assert_eq!(f.to_string(), "UTF-8=a.txt");
    }
}
