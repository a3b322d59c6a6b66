//! Code 128 symbol patterns.
//!
//! Each of the 107 symbol values maps to an 11 module pattern made of three
//! bars and three spaces, stored most significant module first. The stop
//! symbol is followed by a fixed two module closing bar that is not part of
//! the table.

/// Number of symbol values, including the three start codes and stop.
pub const SYMBOL_COUNT: usize = 107;
/// Modules per symbol.
pub const SYMBOL_WIDTH: usize = 11;

pub const START_A: u8 = 103;
pub const START_B: u8 = 104;
pub const START_C: u8 = 105;
pub const STOP: u8 = 106;

/// Highest value allowed between start and checksum.
pub const MAX_DATA_VALUE: u8 = 102;

/// The bar appended after the stop symbol.
pub const CLOSING_BAR: u16 = 0b11;
pub const CLOSING_BAR_WIDTH: usize = 2;

static PATTERNS: [u16; SYMBOL_COUNT] = [
    0b11011001100, 0b11001101100, 0b11001100110, 0b10010011000, 0b10010001100,
    0b10001001100, 0b10011001000, 0b10011000100, 0b10001100100, 0b11001001000,
    0b11001000100, 0b11000100100, 0b10110011100, 0b10011011100, 0b10011001110,
    0b10111001100, 0b10011101100, 0b10011100110, 0b11001110010, 0b11001011100,
    0b11001001110, 0b11011100100, 0b11001110100, 0b11101101110, 0b11101001100,
    0b11100101100, 0b11100100110, 0b11101100100, 0b11100110100, 0b11100110010,
    0b11011011000, 0b11011000110, 0b11000110110, 0b10100011000, 0b10001011000,
    0b10001000110, 0b10110001000, 0b10001101000, 0b10001100010, 0b11010001000,
    0b11000101000, 0b11000100010, 0b10110111000, 0b10110001110, 0b10001101110,
    0b10111011000, 0b10111000110, 0b10001110110, 0b11101110110, 0b11010001110,
    0b11000101110, 0b11011101000, 0b11011100010, 0b11011101110, 0b11101011000,
    0b11101000110, 0b11100010110, 0b11101101000, 0b11101100010, 0b11100011010,
    0b11101111010, 0b11001000010, 0b11110001010, 0b10100110000, 0b10100001100,
    0b10010110000, 0b10010000110, 0b10000101100, 0b10000100110, 0b10110010000,
    0b10110000100, 0b10011010000, 0b10011000010, 0b10000110100, 0b10000110010,
    0b11000010010, 0b11001010000, 0b11110111010, 0b11000010100, 0b10001111010,
    0b10100111100, 0b10010111100, 0b10010011110, 0b10111100100, 0b10011110100,
    0b10011110010, 0b11110100100, 0b11110010100, 0b11110010010, 0b11011011110,
    0b11011110110, 0b11110110110, 0b10101111000, 0b10100011110, 0b10001011110,
    0b10111101000, 0b10111100010, 0b11110101000, 0b11110100010, 0b10111011110,
    0b10111101110, 0b11101011110, 0b11110101110, 0b11010000100, 0b11010010000,
    0b11010011100, 0b11000111010,
];

/// Pattern for a symbol value, or `None` when the value is outside 0..=106.
pub fn pattern(value: u8) -> Option<u16> {
    PATTERNS.get(value as usize).copied()
}

/// Reverse lookup from an 11 module pattern to its symbol value.
pub fn lookup(pattern: u16) -> Option<u8> {
    PATTERNS
        .iter()
        .position(|&p| p == pattern)
        .map(|value| value as u8)
}
