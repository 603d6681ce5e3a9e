//! Encoding catalog, strict codec and detector.

mod catalog;
mod codec;
mod detect;

pub use catalog::{Charset, EncodingType};
pub use codec::{decode, encode};
pub use detect::{detect, detect_and_decode, detect_file};
