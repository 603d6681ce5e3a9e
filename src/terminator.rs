//! Line terminator detection and normalization.
//!
//! A two-state scanner (`Normal`, `SeenCr`) walks the text once, reporting every
//! character and every line break to a receiver while counting pure CR, pure LF
//! and CRLF breaks. A trailing lone CR still counts as a CR break.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Line terminator kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TermType {
    Cr,
    Lf,
    CrLf,
    /// No breaks, or more than one kind of break.
    #[default]
    Unknown,
}

impl TermType {
    pub const ALL: [TermType; 4] = [TermType::CrLf, TermType::Lf, TermType::Cr, TermType::Unknown];

    /// Literal terminator string; `None` for `Unknown`.
    pub fn chars(self) -> Option<&'static str> {
        match self {
            TermType::Cr => Some("\r"),
            TermType::Lf => Some("\n"),
            TermType::CrLf => Some("\r\n"),
            TermType::Unknown => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            TermType::Cr => "CR",
            TermType::Lf => "LF",
            TermType::CrLf => "CRLF",
            TermType::Unknown => "UNKNOWN",
        }
    }

    /// Case-insensitive parse. `keep`/`none`/`unknown` map to `Unknown` (leave as is).
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cr" | "mac" => Some(TermType::Cr),
            "lf" | "unix" => Some(TermType::Lf),
            "crlf" | "dos" | "windows" => Some(TermType::CrLf),
            "unknown" | "keep" | "none" | "" => Some(TermType::Unknown),
            _ => None,
        }
    }
}

impl fmt::Display for TermType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TermType {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("invalid line terminator: '{s}'"))
    }
}

/// Event reported by the scanner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanEvent {
    Char(char),
    Break,
}

/// Break tallies collected by one scan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TermCounts {
    pub cr: usize,
    pub lf: usize,
    pub crlf: usize,
}

impl TermCounts {
    /// Exactly one nonzero counter selects that kind; anything else is `Unknown`.
    pub fn classify(&self) -> TermType {
        match (self.cr > 0, self.lf > 0, self.crlf > 0) {
            (true, false, false) => TermType::Cr,
            (false, true, false) => TermType::Lf,
            (false, false, true) => TermType::CrLf,
            _ => TermType::Unknown,
        }
    }

    pub fn total(&self) -> usize {
        self.cr + self.lf + self.crlf
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum ScanState {
    Normal,
    SeenCr,
}

/// Scan `text`, reporting characters and breaks to `receiver`.
pub fn scan<F>(text: &str, mut receiver: F) -> TermCounts
where
    F: FnMut(ScanEvent),
{
    let mut counts = TermCounts::default();
    let mut state = ScanState::Normal;

    for ch in text.chars() {
        match (state, ch) {
            (ScanState::Normal, '\r') => state = ScanState::SeenCr,
            (ScanState::Normal, '\n') => {
                counts.lf += 1;
                receiver(ScanEvent::Break);
            }
            (ScanState::Normal, other) => receiver(ScanEvent::Char(other)),
            (ScanState::SeenCr, '\n') => {
                counts.crlf += 1;
                receiver(ScanEvent::Break);
                state = ScanState::Normal;
            }
            (ScanState::SeenCr, other) => {
                counts.cr += 1;
                receiver(ScanEvent::Break);
                if other == '\r' {
                    // the new CR is pending again
                    continue;
                }
                receiver(ScanEvent::Char(other));
                state = ScanState::Normal;
            }
        }
    }
    if state == ScanState::SeenCr {
        counts.cr += 1;
        receiver(ScanEvent::Break);
    }
    counts
}

/// Classify the line terminator used by `text`.
pub fn presume_term_type(text: &str) -> TermType {
    let counts = scan(text, |_| {});
    let kind = counts.classify();
    if kind == TermType::Unknown && counts.total() > 0 {
        debug!(cr = counts.cr, lf = counts.lf, crlf = counts.crlf, "mixed line terminators");
    }
    kind
}

/// Rewrite every line break in `text` as `target`. `Unknown` returns the input untouched.
pub fn change_terminator(text: &str, target: TermType) -> Cow<'_, str> {
    let Some(term) = target.chars() else {
        return Cow::Borrowed(text);
    };
    let mut out = String::with_capacity(text.len() + text.len() / 16);
    scan(text, |event| match event {
        ScanEvent::Char(c) => out.push(c),
        ScanEvent::Break => out.push_str(term),
    });
    Cow::Owned(out)
}
