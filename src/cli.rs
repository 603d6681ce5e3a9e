//! CLI definition and parsing.
//! Defines Args (global flags plus subcommands) and how they override Config.
//!
//! Notes:
//! - --debug is a shorthand for --log-level debug and wins over it.
//! - Flags left unset keep the config file's value.

use clap::{Parser, Subcommand, ValueHint};
use std::path::PathBuf;

use crate::config::types::{Config, LogLevel};
use crate::encoding::EncodingType;
use crate::fs_ops::{OverwriteMode, TransferMode};
use crate::terminator::TermType;

/// Detect and convert the character encoding and line endings of text file trees.
/// CLI flags override config values (which are loaded from XML if present).
#[derive(Parser, Debug, Clone)]
#[command(
    author,
    version,
    about = "Detect and convert text file encodings and line endings"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Enable debug logging (equivalent to `--log-level debug`).
    #[arg(
        short = 'd',
        long,
        global = true,
        help = "Enable debug logging (shorthand for --log-level debug)"
    )]
    pub debug: bool,

    /// Set log level. One of: quiet, normal, info, debug.
    #[arg(long, global = true, help = "Set log level: quiet, normal, info, debug")]
    pub log_level: Option<String>,

    /// Also write logs to this file.
    #[arg(long, global = true, value_hint = ValueHint::FilePath, help = "Append logs to this file")]
    pub log_file: Option<PathBuf>,

    /// Emit logs in structured JSON (includes timestamp, level, and structured fields).
    #[arg(long, global = true, help = "Emit logs in structured JSON")]
    pub json: bool,

    /// Print the config file location and the effective settings, then exit.
    #[arg(long, help = "Print the config file location and effective settings, then exit")]
    pub print_config: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// List matching files with their detected encoding and line terminator.
    Scan(ScanArgs),
    /// Convert matching files to the target encoding and terminator.
    Convert(ConvertArgs),
    /// Decode one file and print its text.
    Preview(PreviewArgs),
    /// Write a template config file to the default location.
    InitConfig,
}

/// Which files to look at.
#[derive(clap::Args, Debug, Clone)]
pub struct WalkArgs {
    /// Directory to search.
    #[arg(value_name = "DIR", value_hint = ValueHint::DirPath)]
    pub dir: PathBuf,

    /// Semicolon-separated file name globs (e.g. "*.txt;*.csv").
    #[arg(short = 'p', long)]
    pub pattern: Option<String>,

    /// Descend into subdirectories.
    #[arg(short = 'r', long, conflicts_with = "no_recursive")]
    pub recursive: bool,

    /// Only look at the directory's immediate children.
    #[arg(long)]
    pub no_recursive: bool,
}

/// Conversion targets.
#[derive(clap::Args, Debug, Clone)]
pub struct TargetArgs {
    /// Target encoding (UTF8, UTF8_BOM, Windows31J, EUC_JP, UTF16_BOM_LE, UTF16_BOM_BE, UTF16_LE, UTF16_BE).
    #[arg(short = 'e', long, value_name = "ENCODING")]
    pub encoding: Option<EncodingType>,

    /// Target line terminator (CR, LF, CRLF, or UNKNOWN to keep).
    #[arg(short = 't', long, value_name = "TERMINATOR")]
    pub terminator: Option<TermType>,
}

#[derive(clap::Args, Debug, Clone)]
pub struct ScanArgs {
    #[command(flatten)]
    pub walk: WalkArgs,
    #[command(flatten)]
    pub target: TargetArgs,
}

#[derive(clap::Args, Debug, Clone)]
pub struct ConvertArgs {
    #[command(flatten)]
    pub walk: WalkArgs,
    #[command(flatten)]
    pub target: TargetArgs,

    /// Destination directory for copy/move (defaults to DIR).
    #[arg(long, value_hint = ValueHint::DirPath)]
    pub dest: Option<PathBuf>,

    /// Transfer mode: replace, copy, move.
    #[arg(short = 'm', long)]
    pub mode: Option<TransferMode>,

    /// What to do with an existing destination: overwrite, backup, skip.
    #[arg(short = 'o', long)]
    pub overwrite: Option<OverwriteMode>,

    /// Convert every file of known encoding, not only those that differ from the target.
    #[arg(short = 'a', long, conflicts_with = "file")]
    pub all: bool,

    /// Convert only these files (paths relative to DIR). Repeatable.
    #[arg(short = 'f', long = "file", value_name = "RELATIVE_PATH")]
    pub file: Vec<PathBuf>,
}

#[derive(clap::Args, Debug, Clone)]
pub struct PreviewArgs {
    /// File to decode.
    #[arg(value_name = "FILE", value_hint = ValueHint::FilePath)]
    pub file: PathBuf,

    /// Decode with this encoding instead of detecting it.
    #[arg(short = 'e', long, value_name = "ENCODING")]
    pub encoding: Option<EncodingType>,

    /// Encoding to use when detection fails.
    #[arg(long, value_name = "ENCODING", default_value = "UTF8")]
    pub fallback: EncodingType,
}

impl Args {
    /// Effective log level derived from flags.
    /// Precedence: --debug > --log-level value > None (use config default).
    pub fn effective_log_level(&self) -> Option<LogLevel> {
        if self.debug {
            return Some(LogLevel::Debug);
        }
        self.log_level.as_deref().and_then(LogLevel::parse)
    }

    /// Apply CLI overrides to a loaded Config (in-place). No-ops for unset flags.
    pub fn apply_overrides(&self, cfg: &mut Config) {
        if let Some(level) = self.effective_log_level() {
            cfg.log_level = level;
        }
        if let Some(lf) = &self.log_file {
            cfg.log_file = Some(lf.clone());
        }
        match &self.command {
            Some(Command::Scan(a)) => {
                a.walk.apply(cfg);
                a.target.apply(cfg);
            }
            Some(Command::Convert(a)) => {
                a.walk.apply(cfg);
                a.target.apply(cfg);
                if let Some(m) = a.mode {
                    cfg.transfer_mode = m;
                }
                if let Some(o) = a.overwrite {
                    cfg.overwrite_mode = o;
                }
            }
            Some(Command::Preview(_)) | Some(Command::InitConfig) | None => {}
        }
    }
}

impl WalkArgs {
    fn apply(&self, cfg: &mut Config) {
        if let Some(p) = &self.pattern {
            cfg.pattern = p.clone();
        }
        if self.recursive {
            cfg.recursive = true;
        }
        if self.no_recursive {
            cfg.recursive = false;
        }
    }
}

impl TargetArgs {
    fn apply(&self, cfg: &mut Config) {
        if let Some(e) = self.encoding {
            cfg.target_encoding = e;
        }
        if let Some(t) = self.terminator {
            cfg.target_term = t;
        }
    }
}

pub fn parse() -> Args {
    Args::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(argv: &[&str]) -> Args {
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn convert_flags_override_config() {
        let a = args(&[
            "tec", "convert", "in", "--dest", "out", "-m", "move", "-o", "backup", "-e", "sjis",
            "-t", "crlf", "--no-recursive", "-p", "*.csv",
        ]);
        let mut cfg = Config::default();
        a.apply_overrides(&mut cfg);
        assert_eq!(cfg.transfer_mode, TransferMode::Move);
        assert_eq!(cfg.overwrite_mode, OverwriteMode::CreateBackup);
        assert_eq!(cfg.target_encoding, EncodingType::Windows31J);
        assert_eq!(cfg.target_term, TermType::CrLf);
        assert!(!cfg.recursive);
        assert_eq!(cfg.pattern, "*.csv");
    }

    #[test]
    fn unset_flags_keep_config() {
        let a = args(&["tec", "scan", "in"]);
        let mut cfg = Config {
            recursive: false,
            target_encoding: EncodingType::EucJp,
            ..Config::default()
        };
        a.apply_overrides(&mut cfg);
        assert!(!cfg.recursive);
        assert_eq!(cfg.target_encoding, EncodingType::EucJp);
        assert_eq!(cfg.log_level, LogLevel::Normal);
    }

    #[test]
    fn debug_wins_over_log_level() {
        let a = args(&["tec", "--log-level", "quiet", "scan", "in", "--debug"]);
        assert_eq!(a.effective_log_level(), Some(LogLevel::Debug));
    }

    #[test]
    fn bad_encoding_is_a_parse_error() {
        assert!(Args::try_parse_from(["tec", "scan", "in", "-e", "latin1"]).is_err());
        assert!(Args::try_parse_from(["tec", "convert", "in", "--all", "--file", "a.txt"]).is_err());
    }
}
