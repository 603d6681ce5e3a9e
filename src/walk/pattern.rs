//! File name patterns.
//!
//! A pattern string is a semicolon-separated list of globs: `*` matches zero or
//! more characters, `?` exactly one, everything else literally. Matching is
//! case-insensitive and on the file name only. Blank entries are ignored and
//! `*.*` means "any name". An empty list matches nothing.

use anyhow::{Context, Result};
use regex::{Regex, RegexBuilder};
use std::ffi::OsStr;
use tracing::debug;

/// Translate one glob into an anchored regular expression source.
pub fn glob_to_regex(glob: &str) -> String {
    let mut out = String::with_capacity(glob.len() + 8);
    out.push('^');
    let mut literal = String::new();
    for ch in glob.chars() {
        match ch {
            '*' | '?' => {
                out.push_str(&regex::escape(&literal));
                literal.clear();
                out.push_str(if ch == '*' { ".*" } else { "." });
            }
            _ => literal.push(ch),
        }
    }
    out.push_str(&regex::escape(&literal));
    out.push('$');
    out
}

/// Compiled, OR-combined set of name patterns.
#[derive(Debug, Clone)]
pub struct NameMatcher {
    patterns: Vec<Regex>,
}

impl NameMatcher {
    pub fn new(patterns: &str) -> Result<Self> {
        let mut compiled = Vec::new();
        for raw in patterns.split(';') {
            let mut glob = raw.trim();
            if glob.is_empty() {
                continue;
            }
            if glob == "*.*" {
                glob = "*";
            }
            let src = glob_to_regex(glob);
            let re = RegexBuilder::new(&src)
                .case_insensitive(true)
                .dot_matches_new_line(true)
                .build()
                .with_context(|| format!("invalid name pattern '{glob}'"))?;
            compiled.push(re);
        }
        debug!(patterns = ?compiled.iter().map(Regex::as_str).collect::<Vec<_>>(), "compiled name patterns");
        Ok(Self { patterns: compiled })
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Regular expression sources, in pattern order.
    pub fn sources(&self) -> Vec<&str> {
        self.patterns.iter().map(Regex::as_str).collect()
    }

    pub fn is_match(&self, name: &str) -> bool {
        self.patterns.iter().any(|re| re.is_match(name))
    }

    pub fn matches_os(&self, name: &OsStr) -> bool {
        self.is_match(&name.to_string_lossy())
    }
}
