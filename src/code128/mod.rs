//! Code 128 symbology: symbol table, checksummed sequences, the text planner
//! and the decode state machine.

pub mod decoder;
pub mod encoder;
pub mod sequence;
pub mod table;

pub use decoder::{DecodeState, Emit, Marker, decode_symbols};
pub use encoder::{Atom, encode_text, plan};
pub use sequence::{Code128Sequence, checksum};

use std::fmt;

/// Interpretation table active at a point in a Code 128 stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CodeSet {
    /// Upper case, digits, punctuation and ASCII control characters.
    A,
    /// Upper and lower case, digits and punctuation.
    B,
    /// Digit pairs 00–99.
    C,
}

impl CodeSet {
    pub fn start_value(self) -> u8 {
        match self {
            CodeSet::A => table::START_A,
            CodeSet::B => table::START_B,
            CodeSet::C => table::START_C,
        }
    }

    pub fn from_start(value: u8) -> Option<Self> {
        match value {
            table::START_A => Some(CodeSet::A),
            table::START_B => Some(CodeSet::B),
            table::START_C => Some(CodeSet::C),
            _ => None,
        }
    }

    /// The set reached by SHIFT: A and B swap, C has no shift.
    pub fn shifted(self) -> Self {
        match self {
            CodeSet::A => CodeSet::B,
            CodeSet::B => CodeSet::A,
            CodeSet::C => CodeSet::C,
        }
    }

    /// Symbol value of a 7-bit character in this set.
    pub fn char_value(self, byte: u8) -> Option<u8> {
        match (self, byte) {
            (CodeSet::A, 32..=95) => Some(byte - 32),
            (CodeSet::A, 0..=31) => Some(byte + 64),
            (CodeSet::B, 32..=127) => Some(byte - 32),
            _ => None,
        }
    }

    /// 7-bit character carried by a symbol value 0–95 in this set.
    pub fn value_char(self, value: u8) -> Option<u8> {
        match (self, value) {
            (CodeSet::A, 0..=63) => Some(value + 32),
            (CodeSet::A, 64..=95) => Some(value - 64),
            (CodeSet::B, 0..=95) => Some(value + 32),
            _ => None,
        }
    }

    /// Value switching from another set into this one.
    pub(crate) fn switch_value(self) -> u8 {
        match self {
            CodeSet::A => 101,
            CodeSet::B => 100,
            CodeSet::C => 99,
        }
    }

    /// FNC4 is 101 in set A and 100 in set B.
    pub(crate) fn fnc4_value(self) -> Option<u8> {
        match self {
            CodeSet::A => Some(101),
            CodeSet::B => Some(100),
            CodeSet::C => None,
        }
    }
}

impl fmt::Display for CodeSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodeSet::A => write!(f, "A"),
            CodeSet::B => write!(f, "B"),
            CodeSet::C => write!(f, "C"),
        }
    }
}
