//! BOM-aware strict text codec.
//!
//! Decoding never substitutes replacement characters: malformed input is an error.
//! Encoding fails on characters the target charset cannot represent.

use crate::errors::TextEncodeError;

use super::catalog::{Charset, EncodingType};

/// Strip the required BOM (if any) and return the content bytes.
/// Returns `None` when a required BOM is absent or different.
pub(crate) fn content_after_bom(bytes: &[u8], encoding: EncodingType) -> Option<&[u8]> {
    match encoding.bom() {
        None => Some(bytes),
        Some(bom) if encoding.has_bom_prefix(bytes) => Some(&bytes[bom.len()..]),
        Some(_) => None,
    }
}

/// Strict decode of `bytes` under a charset, without BOM sniffing.
pub(crate) fn decode_strict(bytes: &[u8], charset: Charset) -> Option<String> {
    charset
        .codec()
        .decode_without_bom_handling_and_without_replacement(bytes)
        .map(|text| text.into_owned())
}

/// Decode bytes under `encoding`.
pub fn decode(bytes: &[u8], encoding: EncodingType) -> Result<String, TextEncodeError> {
    let content =
        content_after_bom(bytes, encoding).ok_or(TextEncodeError::BomMismatch { encoding })?;
    decode_strict(content, encoding.charset()).ok_or(TextEncodeError::Malformed { encoding })
}

/// Encode text under `encoding`, prefixing the BOM when the entry requires one.
pub fn encode(text: &str, encoding: EncodingType) -> Result<Vec<u8>, TextEncodeError> {
    let bom = encoding.bom().unwrap_or_default();
    let mut out = Vec::with_capacity(bom.len() + text.len());
    out.extend_from_slice(bom);
    match encoding.charset() {
        Charset::Utf8 => out.extend_from_slice(text.as_bytes()),
        // encoding_rs only encodes to ASCII-compatible targets; UTF-16 is written directly.
        Charset::Utf16Le => out.extend(text.encode_utf16().flat_map(u16::to_le_bytes)),
        Charset::Utf16Be => out.extend(text.encode_utf16().flat_map(u16::to_be_bytes)),
        charset @ (Charset::ShiftJis | Charset::EucJp) => {
            let (bytes, _, unmappable) = charset.codec().encode(text);
            // The WHATWG encoders fold U+00A5, U+203E and U+2212 onto other code
            // points without reporting them, so the output must decode back to `text`.
            if unmappable || decode_strict(&bytes, charset).as_deref() != Some(text) {
                return Err(TextEncodeError::Unmappable { encoding });
            }
            out.extend_from_slice(&bytes);
        }
    }
    Ok(out)
}
