//! XML configuration support.
//! - Loads settings from config.xml (quick_xml + serde).
//! - Creates a commented template on request.
//!
//! Notes:
//! - Values are trimmed; blank elements count as absent.
//! - Unknown elements and unparsable values are errors naming the file.

use anyhow::{Context, Result, bail};
use quick_xml::de::from_str as from_xml_str;
use serde::Deserialize;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, info};

use super::paths::{default_config_path, path_has_symlink_ancestor};
use super::types::{Config, DEFAULT_PATTERN};

/// Struct mirroring the XML config for deserialization.
#[derive(Debug, Default, Deserialize)]
#[serde(rename = "config")]
#[serde(deny_unknown_fields)]
struct XmlConfig {
    target_encoding: Option<String>,
    terminator: Option<String>,
    transfer_mode: Option<String>,
    overwrite_mode: Option<String>,
    pattern: Option<String>,
    recursive: Option<String>,
    log_level: Option<String>,
    log_file: Option<String>,
}

fn non_blank(v: &Option<String>) -> Option<&str> {
    v.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn parse_field<T>(raw: &Option<String>, name: &str) -> Result<Option<T>>
where
    T: FromStr<Err = String>,
{
    match non_blank(raw) {
        None => Ok(None),
        Some(s) => s
            .parse::<T>()
            .map(Some)
            .map_err(|e| anyhow::anyhow!("<{name}>: {e}")),
    }
}

fn parse_bool(raw: &Option<String>, name: &str) -> Result<Option<bool>> {
    match non_blank(raw).map(str::to_ascii_lowercase).as_deref() {
        None => Ok(None),
        Some("true" | "yes" | "1") => Ok(Some(true)),
        Some("false" | "no" | "0") => Ok(Some(false)),
        Some(other) => bail!("<{name}>: expected true or false, got '{other}'"),
    }
}

// Map XmlConfig -> Config; absent fields keep their defaults.
fn xml_to_config(parsed: XmlConfig) -> Result<Config> {
    let mut cfg = Config::default();
    if let Some(v) = parse_field(&parsed.target_encoding, "target_encoding")? {
        cfg.target_encoding = v;
    }
    if let Some(v) = parse_field(&parsed.terminator, "terminator")? {
        cfg.target_term = v;
    }
    if let Some(v) = parse_field(&parsed.transfer_mode, "transfer_mode")? {
        cfg.transfer_mode = v;
    }
    if let Some(v) = parse_field(&parsed.overwrite_mode, "overwrite_mode")? {
        cfg.overwrite_mode = v;
    }
    if let Some(p) = non_blank(&parsed.pattern) {
        cfg.pattern = p.to_string();
    }
    if let Some(v) = parse_bool(&parsed.recursive, "recursive")? {
        cfg.recursive = v;
    }
    if let Some(v) = parse_field(&parsed.log_level, "log_level")? {
        cfg.log_level = v;
    }
    cfg.log_file = non_blank(&parsed.log_file).map(PathBuf::from);
    Ok(cfg)
}

/// Load a Config from a specific XML file path.
pub fn load_config_from_xml_path(path: &Path) -> Result<Config> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("read config xml '{}'", path.display()))?;
    let parsed: XmlConfig = from_xml_str(&contents)
        .with_context(|| format!("parse config xml '{}'", path.display()))?;
    xml_to_config(parsed).with_context(|| format!("invalid value in '{}'", path.display()))
}

/// Load the config from the default location. A missing file yields defaults;
/// the returned path is the file that was read, if any.
pub fn load_config() -> Result<(Config, Option<PathBuf>)> {
    let path = default_config_path()?;
    if !path.exists() {
        debug!(path = %path.display(), "no config file; using defaults");
        return Ok((Config::default(), None));
    }
    let cfg = load_config_from_xml_path(&path)?;
    debug!(path = %path.display(), "loaded config");
    Ok((cfg, Some(path)))
}

/// Write the default template config to `path`. Refuses to overwrite an
/// existing file or to write through a symlinked ancestor.
pub fn create_template_config(path: &Path) -> Result<()> {
    if path_has_symlink_ancestor(path)? {
        bail!(
            "Refusing to create config: ancestor of {} is a symlink",
            path.display()
        );
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("create config directory '{}'", parent.display()))?;
    }

    let content = format!(
        "<!--\n  text_encode_changer configuration (XML)\n\n  target_encoding -> UTF8 | UTF8_BOM | Windows31J | EUC_JP | UTF16_BOM_LE | UTF16_BOM_BE | UTF16_LE | UTF16_BE\n  terminator      -> CR | LF | CRLF | UNKNOWN (keep each file's line breaks)\n  transfer_mode   -> replace | copy | move\n  overwrite_mode  -> overwrite | backup | skip\n  pattern         -> semicolon-separated file name globs\n  recursive       -> true | false\n  log_level       -> quiet | normal | info | debug\n  log_file        -> path to log file (optional)\n\n  CLI flags override XML values.\n-->\n<config>\n  <target_encoding>UTF8</target_encoding>\n  <terminator>UNKNOWN</terminator>\n  <transfer_mode>copy</transfer_mode>\n  <overwrite_mode>overwrite</overwrite_mode>\n  <pattern>{DEFAULT_PATTERN}</pattern>\n  <recursive>true</recursive>\n  <log_level>normal</log_level>\n  <log_file></log_file>\n</config>\n"
    );

    let mut file = fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .with_context(|| format!("create config '{}'", path.display()))?;
    file.write_all(content.as_bytes())
        .with_context(|| format!("write config '{}'", path.display()))?;

    info!("Created template config at {}", path.display());
    Ok(())
}
