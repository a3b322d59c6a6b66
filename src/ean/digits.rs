//! The ten EAN/UPC digit codes.
//!
//! Every digit occupies seven modules. L codes (odd parity) and G codes (even
//! parity) appear left of the centre guard, R codes right of it. R is the
//! complement of L and G is R read backwards.

use std::fmt;

pub const DIGIT_WIDTH: usize = 7;

/// Per-digit encoding table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Encoding {
    L,
    G,
    R,
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Encoding::L => write!(f, "L"),
            Encoding::G => write!(f, "G"),
            Encoding::R => write!(f, "R"),
        }
    }
}

/// The three seven-module patterns of one digit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DigitCode {
    pub l: u8,
    pub g: u8,
    pub r: u8,
}

impl DigitCode {
    /// R read right to left; the form an R group takes in a reversed scan.
    pub const fn rg(self) -> u8 {
        self.r.reverse_bits() >> 1
    }

    pub fn pattern(self, encoding: Encoding) -> u8 {
        match encoding {
            Encoding::L => self.l,
            Encoding::G => self.g,
            Encoding::R => self.r,
        }
    }
}

pub static DIGIT_CODES: [DigitCode; 10] = [
    DigitCode { l: 0b0001101, g: 0b0100111, r: 0b1110010 },
    DigitCode { l: 0b0011001, g: 0b0110011, r: 0b1100110 },
    DigitCode { l: 0b0010011, g: 0b0011011, r: 0b1101100 },
    DigitCode { l: 0b0111101, g: 0b0100001, r: 0b1000010 },
    DigitCode { l: 0b0100011, g: 0b0011101, r: 0b1011100 },
    DigitCode { l: 0b0110001, g: 0b0111001, r: 0b1001110 },
    DigitCode { l: 0b0101111, g: 0b0000101, r: 0b1010000 },
    DigitCode { l: 0b0111011, g: 0b0010001, r: 0b1000100 },
    DigitCode { l: 0b0110111, g: 0b0001001, r: 0b1001000 },
    DigitCode { l: 0b0001011, g: 0b0010111, r: 0b1110100 },
];

/// Pattern of `digit` (0–9) in `encoding`.
pub fn encode_digit(digit: u8, encoding: Encoding) -> Option<u8> {
    DIGIT_CODES
        .get(digit as usize)
        .map(|code| code.pattern(encoding))
}

/// Reverse lookup from a seven-module group to its digit and encoding.
pub fn lookup(pattern: u8) -> Option<(u8, Encoding)> {
    DIGIT_CODES.iter().enumerate().find_map(|(digit, code)| {
        let encoding = if code.l == pattern {
            Encoding::L
        } else if code.g == pattern {
            Encoding::G
        } else if code.r == pattern {
            Encoding::R
        } else {
            return None;
        };
        Some((digit as u8, encoding))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn r_is_complement_of_l_and_reverse_of_g() {
        for code in DIGIT_CODES {
            assert_eq!(code.r, !code.l & 0x7f);
            assert_eq!(code.rg(), code.g);
        }
    }

    #[test]
    fn all_thirty_patterns_are_distinct() {
        let mut seen = std::collections::HashSet::new();
        for code in DIGIT_CODES {
            assert!(seen.insert(code.l));
            assert!(seen.insert(code.g));
            assert!(seen.insert(code.r));
        }
    }

    #[test]
    fn lookup_inverts_every_encoding() {
        for digit in 0..10u8 {
            for enc in [Encoding::L, Encoding::G, Encoding::R] {
                let pattern = encode_digit(digit, enc).unwrap();
                assert_eq!(lookup(pattern), Some((digit, enc)));
            }
        }
        assert_eq!(lookup(0b1111111), None);
        assert_eq!(encode_digit(10, Encoding::L), None);
    }
}
