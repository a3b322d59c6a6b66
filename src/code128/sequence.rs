use super::CodeSet;
use super::decoder::decode_symbols;
use super::table::{
    self, CLOSING_BAR, CLOSING_BAR_WIDTH, MAX_DATA_VALUE, STOP, SYMBOL_COUNT, SYMBOL_WIDTH,
};
use crate::error::{BarcodeError, Result};
use crate::pattern::BarcodePattern;

/// Stop symbol followed by the closing bar, as read left to right.
const STOP_TAIL: u16 = 0b1100011101011;
const STOP_TAIL_WIDTH: usize = SYMBOL_WIDTH + CLOSING_BAR_WIDTH;
/// Start, one data symbol, checksum and stop.
const MIN_SYMBOLS: usize = 4;

/// A finalised Code 128 symbol list: start, data, checksum, stop.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Code128Sequence {
    symbols: Vec<u8>,
}

/// Modulo 103 checksum over the start value and position-weighted data.
pub fn checksum(start: u8, data: &[u8]) -> u8 {
    let weighted: u32 = data
        .iter()
        .enumerate()
        .map(|(i, &v)| (i as u32 + 1) * v as u32)
        .sum();
    ((start as u32 + weighted) % 103) as u8
}

impl Code128Sequence {
    /// Finalise raw symbol values.
    ///
    /// A missing start symbol is taken from `code_set`; a missing stop gets
    /// the checksum and stop appended. A list that already ends in STOP is
    /// verified and kept as given. Error indices refer to `values`.
    pub fn build(code_set: CodeSet, values: &[u8]) -> Result<Self> {
        if let Some(index) = values.iter().position(|&v| v as usize >= SYMBOL_COUNT) {
            return Err(BarcodeError::SymbolOutOfRange {
                index,
                value: values[index],
            });
        }
        let has_start = values.first().is_some_and(|&v| CodeSet::from_start(v).is_some());
        let prepended = usize::from(!has_start);
        let mut symbols = Vec::with_capacity(values.len() + 3);
        if !has_start {
            symbols.push(code_set.start_value());
        } else if values[0] != code_set.start_value() {
            tracing::debug!(
                requested = %code_set,
                start = values[0],
                "keeping start symbol already present"
            );
        }
        symbols.extend_from_slice(values);

        if symbols.last() == Some(&STOP) && symbols.len() > 1 {
            return Self::from_symbols(symbols)
                .map_err(|err| rebase(err, |i| i.saturating_sub(prepended)));
        }

        validate_data(&symbols[1..]).map_err(|err| rebase(err, |i| i + 1 - prepended))?;
        if symbols.len() < 2 {
            return Err(BarcodeError::InvalidLength {
                len: values.len(),
                expected: "at least one data symbol",
            });
        }
        symbols.push(checksum(symbols[0], &symbols[1..]));
        symbols.push(STOP);
        Ok(Self { symbols })
    }

    /// Verify a complete symbol list.
    fn from_symbols(symbols: Vec<u8>) -> Result<Self> {
        if symbols.len() < MIN_SYMBOLS {
            return Err(BarcodeError::InvalidLength {
                len: symbols.len(),
                expected: "start, data, checksum and stop symbols",
            });
        }
        if CodeSet::from_start(symbols[0]).is_none() {
            return Err(BarcodeError::MisplacedControl {
                index: 0,
                value: symbols[0],
            });
        }
        let last = symbols.len() - 1;
        if symbols[last] != STOP {
            return Err(BarcodeError::MisplacedControl {
                index: last,
                value: symbols[last],
            });
        }
        let data = &symbols[1..last - 1];
        validate_data(data).map_err(|err| rebase(err, |i| i + 1))?;
        let found = symbols[last - 1];
        if found > MAX_DATA_VALUE {
            return Err(BarcodeError::MisplacedControl {
                index: last - 1,
                value: found,
            });
        }
        let expected = checksum(symbols[0], data);
        if found != expected {
            return Err(BarcodeError::Checksum { expected, found });
        }
        Ok(Self { symbols })
    }

    /// Parse rendered modules back into a sequence. A right-to-left module
    /// list is turned around first.
    pub fn from_modules(pattern: &BarcodePattern) -> Result<Self> {
        let len = pattern.len();
        if len < MIN_SYMBOLS * SYMBOL_WIDTH + CLOSING_BAR_WIDTH
            || (len - CLOSING_BAR_WIDTH) % SYMBOL_WIDTH != 0
        {
            return Err(BarcodeError::InvalidLength {
                len,
                expected: "11 modules per symbol plus a 2 module closing bar",
            });
        }

        let reversed;
        let pattern = if pattern.bits_at(len - STOP_TAIL_WIDTH, STOP_TAIL_WIDTH) == Some(STOP_TAIL)
        {
            pattern
        } else {
            reversed = pattern.reversed();
            if reversed.bits_at(len - STOP_TAIL_WIDTH, STOP_TAIL_WIDTH) != Some(STOP_TAIL) {
                return Err(BarcodeError::Orientation);
            }
            tracing::debug!(modules = len, "code 128 modules read right to left; reversing");
            &reversed
        };

        let count = (len - CLOSING_BAR_WIDTH) / SYMBOL_WIDTH;
        let mut symbols = Vec::with_capacity(count);
        for index in 0..count {
            let bits = pattern
                .bits_at(index * SYMBOL_WIDTH, SYMBOL_WIDTH)
                .ok_or(BarcodeError::UnknownPattern { index })?;
            let value = table::lookup(bits).ok_or(BarcodeError::UnknownPattern { index })?;
            symbols.push(value);
        }
        Self::from_symbols(symbols)
    }

    pub fn symbols(&self) -> &[u8] {
        &self.symbols
    }

    pub fn start_set(&self) -> CodeSet {
        // from_symbols guarantees a start symbol at index 0
        CodeSet::from_start(self.symbols[0]).unwrap_or(CodeSet::B)
    }

    /// Data symbols between the start symbol and the checksum.
    pub fn data(&self) -> &[u8] {
        &self.symbols[1..self.symbols.len() - 2]
    }

    pub fn checksum(&self) -> u8 {
        self.symbols[self.symbols.len() - 2]
    }

    /// Every symbol's modules in order, then the closing bar.
    pub fn to_modules(&self) -> BarcodePattern {
        let mut pattern =
            BarcodePattern::with_capacity(self.symbols.len() * SYMBOL_WIDTH + CLOSING_BAR_WIDTH);
        for &value in &self.symbols {
            // values were range checked when the sequence was built
            if let Some(bits) = table::pattern(value) {
                pattern.push_bits(bits, SYMBOL_WIDTH);
            }
        }
        pattern.push_bits(CLOSING_BAR, CLOSING_BAR_WIDTH);
        pattern
    }

    /// Human readable text carried by the sequence.
    pub fn text(&self) -> String {
        decode_symbols(&self.symbols)
    }
}

fn validate_data(data: &[u8]) -> Result<()> {
    for (index, &value) in data.iter().enumerate() {
        if value as usize >= SYMBOL_COUNT {
            return Err(BarcodeError::SymbolOutOfRange { index, value });
        }
        if value > MAX_DATA_VALUE {
            return Err(BarcodeError::MisplacedControl { index, value });
        }
    }
    Ok(())
}

/// Re-base an index reported against a sub-slice.
fn rebase(err: BarcodeError, f: impl Fn(usize) -> usize) -> BarcodeError {
    match err {
        BarcodeError::SymbolOutOfRange { index, value } => BarcodeError::SymbolOutOfRange {
            index: f(index),
            value,
        },
        BarcodeError::MisplacedControl { index, value } => BarcodeError::MisplacedControl {
            index: f(index),
            value,
        },
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn appends_checksum_and_stop() {
        // "PJJ123C" in set B: 879 mod 103
        let values = [48, 42, 42, 17, 18, 19, 35];
        let seq = Code128Sequence::build(CodeSet::B, &values).unwrap();
        assert_eq!(seq.symbols()[0], table::START_B);
        assert_eq!(seq.data(), &values);
        assert_eq!(seq.checksum(), 55);
        assert_eq!(*seq.symbols().last().unwrap(), STOP);
    }

    #[test]
    fn building_a_terminated_list_is_idempotent() {
        let seq = Code128Sequence::build(CodeSet::C, &[12, 34, 56]).unwrap();
        let again = Code128Sequence::build(CodeSet::C, seq.symbols()).unwrap();
        assert_eq!(again, seq);
        let from_other_set = Code128Sequence::build(CodeSet::A, seq.symbols()).unwrap();
        assert_eq!(from_other_set, seq);
    }

    #[test]
    fn rejects_out_of_range_symbols() {
        let err = Code128Sequence::build(CodeSet::B, &[1, 2, 107]).unwrap_err();
        assert_eq!(
            err,
            BarcodeError::SymbolOutOfRange {
                index: 2,
                value: 107
            }
        );
        let err = Code128Sequence::build(CodeSet::B, &[1, 104, 2]).unwrap_err();
        assert_eq!(
            err,
            BarcodeError::MisplacedControl {
                index: 1,
                value: 104
            }
        );
    }

    #[test]
    fn rejects_wrong_supplied_checksum() {
        let err = Code128Sequence::build(CodeSet::B, &[104, 40, 73, 0, STOP]).unwrap_err();
        assert_eq!(
            err,
            BarcodeError::Checksum {
                expected: checksum(104, &[40, 73]),
                found: 0
            }
        );
    }

    #[test]
    fn rejects_empty_data() {
        let err = Code128Sequence::build(CodeSet::B, &[]).unwrap_err();
        assert!(matches!(err, BarcodeError::InvalidLength { .. }));
    }

    #[test]
    fn modules_round_trip() {
        let seq = Code128Sequence::build(CodeSet::A, &[33, 34, 35, 64]).unwrap();
        let modules = seq.to_modules();
        assert_eq!(modules.len(), seq.symbols().len() * 11 + 2);
        assert_eq!(Code128Sequence::from_modules(&modules).unwrap(), seq);
        assert_eq!(
            Code128Sequence::from_modules(&modules.reversed()).unwrap(),
            seq
        );
    }

    #[test]
    fn unknown_pattern_reports_symbol_index() {
        let seq = Code128Sequence::build(CodeSet::B, &[1, 2, 3]).unwrap();
        let mut modules = seq.to_modules().modules().to_vec();
        // flip the first module of symbol 2 into an unused pattern
        modules[2 * 11 + 1] = !modules[2 * 11 + 1];
        modules[2 * 11 + 2] = !modules[2 * 11 + 2];
        let err = Code128Sequence::from_modules(&BarcodePattern::new(modules));
        assert!(
            matches!(
                err,
                Err(BarcodeError::UnknownPattern { index: 2 }) | Err(BarcodeError::Checksum { .. })
            ),
            "{err:?}"
        );
    }

    #[test]
    fn truncated_modules_are_structural() {
        let err = Code128Sequence::from_modules(&BarcodePattern::new(vec![true; 30])).unwrap_err();
        assert!(matches!(err, BarcodeError::InvalidLength { len: 30, .. }));
    }
}
