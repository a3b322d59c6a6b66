//! Text to Code 128 symbol values.
//!
//! The planner is greedy: set C for digit runs long enough to pay for the
//! switch, SHIFT for a single character from the other of A/B, and a latch
//! otherwise. It does not search for the shortest possible encoding.

use super::decoder::Marker;
use super::{CodeSet, Code128Sequence};
use crate::error::{BarcodeError, Result};

const SHIFT: u8 = 98;
const FNC1: u8 = 102;

/// One unit of input for the planner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Atom {
    /// A Latin-1 character.
    Byte(u8),
    Fnc1,
}

impl Atom {
    fn digit(self) -> Option<u8> {
        match self {
            Atom::Byte(b @ b'0'..=b'9') => Some(b - b'0'),
            _ => None,
        }
    }
}

/// Split text into atoms, turning literal `[FNC1]` markers into
/// [`Atom::Fnc1`]. Characters above U+00FF cannot be carried.
pub fn atoms(text: &str) -> Result<Vec<Atom>> {
    let marker = Marker::Fnc1.as_str();
    let mut out = Vec::with_capacity(text.len());
    let mut rest = text;
    let mut index = 0;
    while let Some(ch) = rest.chars().next() {
        if rest.starts_with(marker) {
            out.push(Atom::Fnc1);
            rest = &rest[marker.len()..];
            index += marker.chars().count();
            continue;
        }
        let byte = u8::try_from(ch as u32)
            .map_err(|_| BarcodeError::InvalidCharacter { index, ch })?;
        out.push(Atom::Byte(byte));
        rest = &rest[ch.len_utf8()..];
        index += 1;
    }
    Ok(out)
}

fn digit_run(atoms: &[Atom], from: usize) -> usize {
    atoms[from..]
        .iter()
        .take_while(|a| a.digit().is_some())
        .count()
}

/// Prefer A when a control character comes before any lower case letter.
fn pick_alpha_set(atoms: &[Atom], from: usize) -> CodeSet {
    for atom in &atoms[from..] {
        if let Atom::Byte(b) = atom {
            match b & 0x7f {
                0..=31 => return CodeSet::A,
                96..=127 => return CodeSet::B,
                _ => {}
            }
        }
    }
    CodeSet::B
}

fn pick_start(atoms: &[Atom]) -> CodeSet {
    let first = atoms
        .iter()
        .position(|a| *a != Atom::Fnc1)
        .unwrap_or(atoms.len());
    let run = digit_run(atoms, first);
    let remaining = atoms.len() - first;
    if run >= 4 || (run >= 2 && run == remaining && run % 2 == 0) {
        CodeSet::C
    } else {
        pick_alpha_set(atoms, first)
    }
}

/// Plan symbol values for `atoms`, returning the start set and data values.
pub fn plan(atoms: &[Atom]) -> Result<(CodeSet, Vec<u8>)> {
    if atoms.is_empty() {
        return Err(BarcodeError::InvalidLength {
            len: 0,
            expected: "at least one character",
        });
    }
    let start = pick_start(atoms);
    let mut set = start;
    let mut values = Vec::with_capacity(atoms.len());
    let mut i = 0;

    while i < atoms.len() {
        let byte = match atoms[i] {
            Atom::Fnc1 => {
                values.push(FNC1);
                i += 1;
                continue;
            }
            Atom::Byte(b) => b,
        };
        let run = digit_run(atoms, i);

        if set == CodeSet::C {
            if run >= 2 {
                let hi = atoms[i].digit().unwrap_or(0);
                let lo = atoms[i + 1].digit().unwrap_or(0);
                values.push(hi * 10 + lo);
                i += 2;
            } else {
                set = pick_alpha_set(atoms, i);
                values.push(set.switch_value());
            }
            continue;
        }

        let at_end = i + run == atoms.len();
        if run % 2 == 0 && (run >= 6 || (run >= 4 && at_end)) {
            set = CodeSet::C;
            values.push(set.switch_value());
            continue;
        }

        let low = byte & 0x7f;
        let high = byte >= 0x80;
        let Some(value) = set.char_value(low) else {
            let other = set.shifted();
            let next_fits = matches!(
                atoms.get(i + 1),
                Some(Atom::Byte(next)) if *next < 0x80 && set.char_value(*next).is_some()
            );
            if next_fits && !high {
                if let Some(value) = other.char_value(low) {
                    values.push(SHIFT);
                    values.push(value);
                    i += 1;
                    continue;
                }
            }
            set = other;
            values.push(set.switch_value());
            continue;
        };
        if high {
            if let Some(fnc4) = set.fnc4_value() {
                values.push(fnc4);
            }
        }
        values.push(value);
        i += 1;
    }
    Ok((start, values))
}

/// Encode Latin-1 text (with optional `[FNC1]` markers) as a finalised
/// Code 128 sequence.
pub fn encode_text(text: &str) -> Result<Code128Sequence> {
    let atoms = atoms(text)?;
    let (start, values) = plan(&atoms)?;
    tracing::trace!(%start, symbols = values.len(), "planned code 128 values");
    Code128Sequence::build(start, &values)
}
