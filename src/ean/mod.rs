//! EAN/UPC family: EAN-13, EAN-8, UPC-A and the 2/5 digit add-ons.

pub mod codec;
pub mod digits;

pub use codec::{
    checksum, decode, encode, parity_pattern, upc_a_to_ean13, validate, verify,
};
pub use digits::{DIGIT_CODES, DigitCode, Encoding};

use std::fmt;

/// Bar layouts produced and recognised by the EAN codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EanKind {
    Ean13,
    Ean8,
    AddOn5,
    AddOn2,
}

impl EanKind {
    /// Layout for a payload length; lengths without a check digit map to
    /// the layout that will carry the appended one.
    pub fn for_payload(len: usize) -> Option<Self> {
        match len {
            12 | 13 => Some(EanKind::Ean13),
            7 | 8 => Some(EanKind::Ean8),
            5 => Some(EanKind::AddOn5),
            2 => Some(EanKind::AddOn2),
            _ => None,
        }
    }

    pub fn for_modules(len: usize) -> Option<Self> {
        [
            EanKind::Ean13,
            EanKind::Ean8,
            EanKind::AddOn5,
            EanKind::AddOn2,
        ]
        .into_iter()
        .find(|kind| kind.modules() == len)
    }

    /// Digits carried by the bar pattern, check digit included.
    pub fn digits(self) -> usize {
        match self {
            EanKind::Ean13 => 13,
            EanKind::Ean8 => 8,
            EanKind::AddOn5 => 5,
            EanKind::AddOn2 => 2,
        }
    }

    pub fn modules(self) -> usize {
        match self {
            EanKind::Ean13 => 95,
            EanKind::Ean8 => 67,
            EanKind::AddOn5 => 47,
            EanKind::AddOn2 => 20,
        }
    }
}

impl fmt::Display for EanKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EanKind::Ean13 => write!(f, "EAN-13"),
            EanKind::Ean8 => write!(f, "EAN-8"),
            EanKind::AddOn5 => write!(f, "5-digit add-on"),
            EanKind::AddOn2 => write!(f, "2-digit add-on"),
        }
    }
}
