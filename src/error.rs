use std::fmt;
use thiserror::Error;

/// Errors raised while building, rendering or parsing a barcode.
///
/// Every variant belongs to exactly one [`ErrorKind`], so callers that only
/// care about the broad failure class can match on [`BarcodeError::kind`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BarcodeError {
    #[error("invalid length {len}: expected {expected}")]
    InvalidLength { len: usize, expected: &'static str },
    #[error("symbol value {value} at index {index} is out of range")]
    SymbolOutOfRange { index: usize, value: u8 },
    #[error("no symbol matches the modules at index {index}")]
    UnknownPattern { index: usize },
    #[error("control symbol {value} is not allowed at index {index}")]
    MisplacedControl { index: usize, value: u8 },
    #[error("invalid digit '{ch}' at index {index}")]
    InvalidDigit { index: usize, ch: char },
    #[error("character {ch:?} at index {index} cannot be encoded")]
    InvalidCharacter { index: usize, ch: char },
    #[error("checksum mismatch: computed {expected}, found {found}")]
    Checksum { expected: u8, found: u8 },
    #[error("pattern cannot be read in either direction")]
    Orientation,
    #[error("application identifier ({ai}): {reason}")]
    UnsupportedField { ai: String, reason: String },
}

/// Broad failure classes shared by every codec in the crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Bad length, out-of-range symbol or unrecognised layout.
    Structural,
    /// Computed check value differs from the supplied one.
    Checksum,
    /// Pattern does not normalise even after reversal.
    Orientation,
    /// A GS1 Application Identifier constraint was violated.
    UnsupportedField,
}

impl BarcodeError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidLength { .. }
            | Self::SymbolOutOfRange { .. }
            | Self::UnknownPattern { .. }
            | Self::MisplacedControl { .. }
            | Self::InvalidDigit { .. }
            | Self::InvalidCharacter { .. } => ErrorKind::Structural,
            Self::Checksum { .. } => ErrorKind::Checksum,
            Self::Orientation => ErrorKind::Orientation,
            Self::UnsupportedField { .. } => ErrorKind::UnsupportedField,
        }
    }

    pub(crate) fn field<A: Into<String>, R: Into<String>>(ai: A, reason: R) -> Self {
        Self::UnsupportedField {
            ai: ai.into(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Structural => write!(f, "structural"),
            ErrorKind::Checksum => write!(f, "checksum"),
            ErrorKind::Orientation => write!(f, "orientation"),
            ErrorKind::UnsupportedField => write!(f, "unsupported-field"),
        }
    }
}

pub type Result<T> = std::result::Result<T, BarcodeError>;

/// Non-throwing status: a success flag plus the failure class, without any
/// partial output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Check {
    pub ok: bool,
    pub kind: Option<ErrorKind>,
}

impl Check {
    pub const PASSED: Check = Check {
        ok: true,
        kind: None,
    };

    pub fn of<T>(result: &Result<T>) -> Self {
        match result {
            Ok(_) => Self::PASSED,
            Err(err) => Self {
                ok: false,
                kind: Some(err.kind()),
            },
        }
    }
}
