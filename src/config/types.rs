//! Core configuration types.
//! - Config holds conversion defaults and logging settings.
//! - LogLevel represents verbosity with simple parsing helpers.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::encoding::EncodingType;
use crate::fs_ops::{OverwriteMode, TransferMode};
use crate::terminator::TermType;
use crate::walk::SearchCondition;

/// Name pattern used when none is configured.
pub const DEFAULT_PATTERN: &str = "*.txt";

/// Program-defined verbosity levels exposed to users/config.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    /// Only errors
    Quiet,
    /// Warnings and results (default)
    #[default]
    Normal,
    /// Per-file progress
    Info,
    /// Debug/trace
    Debug,
}

impl LogLevel {
    /// Parse common string names into our LogLevel (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "quiet" | "error" | "none" => Some(LogLevel::Quiet),
            "normal" | "warn" => Some(LogLevel::Normal),
            "info" | "verbose" | "detailed" => Some(LogLevel::Info),
            "debug" | "trace" => Some(LogLevel::Debug),
            _ => None,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LogLevel::Quiet => "quiet",
            LogLevel::Normal => "normal",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
        };
        f.write_str(s)
    }
}

impl FromStr for LogLevel {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("invalid log level: '{s}'"))
    }
}

/// Runtime configuration: conversion targets plus logging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub target_encoding: EncodingType,
    /// `Unknown` keeps each file's terminator.
    pub target_term: TermType,
    pub transfer_mode: TransferMode,
    pub overwrite_mode: OverwriteMode,
    /// Semicolon-separated file name globs
    pub pattern: String,
    pub recursive: bool,
    /// Console verbosity
    pub log_level: LogLevel,
    /// Optional path to a log file
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            target_encoding: EncodingType::Utf8,
            target_term: TermType::Unknown,
            transfer_mode: TransferMode::Copy,
            overwrite_mode: OverwriteMode::Overwrite,
            pattern: DEFAULT_PATTERN.to_string(),
            recursive: true,
            log_level: LogLevel::Normal,
            log_file: None,
        }
    }
}

impl Config {
    /// Walk input for `source_dir` using the configured pattern and recursion.
    pub fn search_condition(&self, source_dir: impl Into<PathBuf>) -> SearchCondition {
        SearchCondition::new(source_dir, self.recursive, self.pattern.clone())
    }
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "target_encoding = {}", self.target_encoding.id())?;
        writeln!(f, "terminator      = {}", self.target_term.name())?;
        writeln!(f, "transfer_mode   = {}", self.transfer_mode)?;
        writeln!(f, "overwrite_mode  = {}", self.overwrite_mode)?;
        writeln!(f, "pattern         = {}", self.pattern)?;
        writeln!(f, "recursive       = {}", self.recursive)?;
        writeln!(f, "log_level       = {}", self.log_level)?;
        write!(
            f,
            "log_file        = {}",
            self.log_file
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "<none>".into())
        )
    }
}
