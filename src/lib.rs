//! Linear barcode encoding and decoding: Code 128 (with GS1-128) and the
//! EAN/UPC family.
//!
//! Encoders produce a [`BarcodePattern`], a plain run of bar/space modules.
//! Decoders accept the same representation, in either scan direction.

pub mod code128;
pub mod ean;
mod error;
pub mod format;
pub mod gs1;
mod pattern;

pub use code128::{CodeSet, Code128Sequence};
pub use error::{BarcodeError, Check, ErrorKind, Result};
pub use gs1::{AiRegistry, Gs1Builder, build_gs1, get_ai_data};
pub use pattern::{BarcodePattern, RenderStyle};

/// Finalise explicit symbol values into a Code 128 sequence.
///
/// A leading start symbol in `values` takes precedence over `code_set`; a
/// sequence that already ends in checksum and STOP is verified, not extended.
pub fn encode_code128(code_set: CodeSet, values: &[u8]) -> Result<Code128Sequence> {
    Code128Sequence::build(code_set, values)
}

/// Plan code sets for `text` and build the sequence.
pub fn encode_code128_text(text: &str) -> Result<Code128Sequence> {
    code128::encode_text(text)
}

/// Text carried by a sequence, with `[FNC1]` style markers for function codes.
pub fn decode_code128(sequence: &Code128Sequence) -> String {
    sequence.text()
}

/// Read a Code 128 symbol from its modules, in either direction.
pub fn decode_code128_modules(pattern: &BarcodePattern) -> Result<String> {
    Ok(Code128Sequence::from_modules(pattern)?.text())
}

pub fn encode_ean(digits: &str) -> Result<BarcodePattern> {
    ean::encode(digits)
}

pub fn decode_ean(pattern: &BarcodePattern) -> Result<String> {
    ean::decode(pattern)
}

pub fn checksum_ean(digits: &str) -> Result<u8> {
    ean::checksum(digits)
}

pub fn validate_ean(digits: &str) -> bool {
    ean::validate(digits)
}
