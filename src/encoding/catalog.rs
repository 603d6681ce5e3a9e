//! Supported encodings.
//!
//! The catalog is a static table indexed by `EncodingType`. Declaration order is
//! the display order; `PROBE_ORDER` lists the same variants with every BOM-bearing
//! entry first, so a BOM is never consumed as content by a BOM-less sibling.

use std::fmt;
use std::str::FromStr;

use encoding_rs::Encoding;

/// Underlying character set shared by one or more catalog entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Charset {
    Utf8,
    ShiftJis,
    EucJp,
    Utf16Le,
    Utf16Be,
}

impl Charset {
    /// Matching `encoding_rs` codec. Windows-31J maps to the WHATWG Shift_JIS
    /// decoder, which carries the Microsoft extensions.
    pub fn codec(self) -> &'static Encoding {
        match self {
            Charset::Utf8 => encoding_rs::UTF_8,
            Charset::ShiftJis => encoding_rs::SHIFT_JIS,
            Charset::EucJp => encoding_rs::EUC_JP,
            Charset::Utf16Le => encoding_rs::UTF_16LE,
            Charset::Utf16Be => encoding_rs::UTF_16BE,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Charset::Utf8 => "UTF-8",
            Charset::ShiftJis => "Windows-31J",
            Charset::EucJp => "EUC-JP",
            Charset::Utf16Le => "UTF-16LE",
            Charset::Utf16Be => "UTF-16BE",
        }
    }
}

/// One entry of the encoding catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EncodingType {
    Utf8,
    Utf8Bom,
    Windows31J,
    EucJp,
    Utf16BomLe,
    Utf16BomBe,
    Utf16Le,
    Utf16Be,
}

struct EncodingSpec {
    id: &'static str,
    label: &'static str,
    charset: Charset,
    bom: Option<&'static [u8]>,
}

const BOM_UTF8: &[u8] = &[0xEF, 0xBB, 0xBF];
const BOM_UTF16_LE: &[u8] = &[0xFF, 0xFE];
const BOM_UTF16_BE: &[u8] = &[0xFE, 0xFF];

// Indexed by `EncodingType as usize`; keep in declaration order.
static CATALOG: [EncodingSpec; 8] = [
    EncodingSpec { id: "UTF8", label: "UTF-8", charset: Charset::Utf8, bom: None },
    EncodingSpec { id: "UTF8_BOM", label: "UTF-8 (BOM)", charset: Charset::Utf8, bom: Some(BOM_UTF8) },
    EncodingSpec { id: "Windows31J", label: "Windows-31J", charset: Charset::ShiftJis, bom: None },
    EncodingSpec { id: "EUC_JP", label: "EUC-JP", charset: Charset::EucJp, bom: None },
    EncodingSpec { id: "UTF16_BOM_LE", label: "UTF-16 LE (BOM)", charset: Charset::Utf16Le, bom: Some(BOM_UTF16_LE) },
    EncodingSpec { id: "UTF16_BOM_BE", label: "UTF-16 BE (BOM)", charset: Charset::Utf16Be, bom: Some(BOM_UTF16_BE) },
    // BOM-less UTF-16 accepts almost any even-length input; kept last in probe order.
    EncodingSpec { id: "UTF16_LE", label: "UTF-16 LE", charset: Charset::Utf16Le, bom: None },
    EncodingSpec { id: "UTF16_BE", label: "UTF-16 BE", charset: Charset::Utf16Be, bom: None },
];

impl EncodingType {
    /// Display order.
    pub const ALL: [EncodingType; 8] = [
        EncodingType::Utf8,
        EncodingType::Utf8Bom,
        EncodingType::Windows31J,
        EncodingType::EucJp,
        EncodingType::Utf16BomLe,
        EncodingType::Utf16BomBe,
        EncodingType::Utf16Le,
        EncodingType::Utf16Be,
    ];

    /// Detection order: BOM-bearing entries first, each group in display order.
    pub const PROBE_ORDER: [EncodingType; 8] = [
        EncodingType::Utf8Bom,
        EncodingType::Utf16BomLe,
        EncodingType::Utf16BomBe,
        EncodingType::Utf8,
        EncodingType::Windows31J,
        EncodingType::EucJp,
        EncodingType::Utf16Le,
        EncodingType::Utf16Be,
    ];

    fn spec(self) -> &'static EncodingSpec {
        &CATALOG[self as usize]
    }

    /// Stable identifier (used in config files and CLI output).
    pub fn id(self) -> &'static str {
        self.spec().id
    }

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        self.spec().label
    }

    pub fn charset(self) -> Charset {
        self.spec().charset
    }

    /// Required byte order mark, if any.
    pub fn bom(self) -> Option<&'static [u8]> {
        self.spec().bom
    }

    /// True if `buf` starts with this entry's BOM. Entries without a BOM never match.
    pub fn has_bom_prefix(self, buf: &[u8]) -> bool {
        match self.bom() {
            Some(bom) => buf.len() >= bom.len() && &buf[..bom.len()] == bom,
            None => false,
        }
    }

    /// Case-insensitive lookup by identifier, label, or a common alias.
    pub fn parse(s: &str) -> Option<Self> {
        let key: String = s
            .trim()
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' ' | '(' | ')'))
            .collect::<String>()
            .to_ascii_lowercase();
        let found = match key.as_str() {
            "utf8" => EncodingType::Utf8,
            "utf8bom" => EncodingType::Utf8Bom,
            "windows31j" | "sjis" | "shiftjis" | "cp932" | "ms932" => EncodingType::Windows31J,
            "eucjp" => EncodingType::EucJp,
            "utf16bomle" | "utf16lebom" => EncodingType::Utf16BomLe,
            "utf16bombe" | "utf16bebom" => EncodingType::Utf16BomBe,
            "utf16le" => EncodingType::Utf16Le,
            "utf16be" => EncodingType::Utf16Be,
            _ => return None,
        };
        Some(found)
    }
}

impl fmt::Display for EncodingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for EncodingType {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("unknown encoding: '{s}'"))
    }
}
