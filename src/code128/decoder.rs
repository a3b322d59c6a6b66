use super::CodeSet;
use super::table::{MAX_DATA_VALUE, STOP};

/// Literal text emitted for the function characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    Fnc1,
    Fnc2,
    Fnc3,
}

impl Marker {
    pub fn as_str(self) -> &'static str {
        match self {
            Marker::Fnc1 => "[FNC1]",
            Marker::Fnc2 => "[FNC2]",
            Marker::Fnc3 => "[FNC3]",
        }
    }
}

/// Output of a single decode step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Emit {
    /// A Latin-1 character from set A or B.
    Char(char),
    /// A digit pair 00–99 from set C.
    Pair(u8),
    Marker(Marker),
}

impl Emit {
    fn push_to(self, out: &mut String) {
        match self {
            Emit::Char(ch) => out.push(ch),
            Emit::Pair(pair) => {
                out.push(char::from(b'0' + pair / 10));
                out.push(char::from(b'0' + pair % 10));
            }
            Emit::Marker(marker) => out.push_str(marker.as_str()),
        }
    }
}

/// Decoder state between symbols.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeState {
    pub active: CodeSet,
    /// SHIFT seen: the next data symbol is read in the other of A/B.
    pub shift: bool,
    /// FNC4 seen: the next character gets +128.
    pub high_bit: bool,
}

impl DecodeState {
    pub fn new(start: CodeSet) -> Self {
        Self {
            active: start,
            shift: false,
            high_bit: false,
        }
    }

    /// Interpret one data symbol. Values outside 0..=102 leave the state
    /// untouched and emit nothing.
    pub fn step(self, value: u8) -> (Self, Option<Emit>) {
        if value > MAX_DATA_VALUE {
            return (self, None);
        }
        let set = if self.shift {
            self.active.shifted()
        } else {
            self.active
        };
        let mut next = Self {
            shift: false,
            ..self
        };

        match set {
            CodeSet::C => {
                let emit = match value {
                    0..=99 => Some(Emit::Pair(value)),
                    100 => {
                        next.active = CodeSet::B;
                        None
                    }
                    101 => {
                        next.active = CodeSet::A;
                        None
                    }
                    _ => Some(Emit::Marker(Marker::Fnc1)),
                };
                (next, emit)
            }
            CodeSet::A | CodeSet::B => {
                let emit = match value {
                    0..=95 => {
                        let byte = set.value_char(value).unwrap_or(b'?');
                        let byte = if self.high_bit { byte | 0x80 } else { byte };
                        next.high_bit = false;
                        Some(Emit::Char(char::from(byte)))
                    }
                    96 => Some(Emit::Marker(Marker::Fnc3)),
                    97 => Some(Emit::Marker(Marker::Fnc2)),
                    98 => {
                        next.shift = true;
                        None
                    }
                    99 => {
                        next.active = CodeSet::C;
                        None
                    }
                    100 if set == CodeSet::A => {
                        next.active = CodeSet::B;
                        None
                    }
                    101 if set == CodeSet::B => {
                        next.active = CodeSet::A;
                        None
                    }
                    100 | 101 => {
                        next.high_bit = !self.high_bit;
                        None
                    }
                    _ => Some(Emit::Marker(Marker::Fnc1)),
                };
                (next, emit)
            }
        }
    }
}

/// Decode a raw symbol list to text.
///
/// The first symbol selects the starting set. Decoding stops at STOP, and
/// the checksum in front of it is consumed without output. A stray start or
/// stop value in the data halts decoding with whatever text was produced.
pub fn decode_symbols(symbols: &[u8]) -> String {
    let mut out = String::new();
    let Some((&start, rest)) = symbols.split_first() else {
        return out;
    };
    let Some(start_set) = CodeSet::from_start(start) else {
        tracing::debug!(start, "symbol list does not begin with a start code");
        return out;
    };
    let data = match rest.iter().position(|&v| v == STOP) {
        Some(stop) => &rest[..stop.saturating_sub(1)],
        None => rest,
    };

    let mut state = DecodeState::new(start_set);
    for (index, &value) in data.iter().enumerate() {
        if value > MAX_DATA_VALUE {
            tracing::debug!(index = index + 1, value, "unexpected control symbol; halting");
            break;
        }
        let (next, emit) = state.step(value);
        if next.active != state.active {
            tracing::trace!(from = %state.active, to = %next.active, "code set switch");
        }
        state = next;
        if let Some(emit) = emit {
            emit.push_to(&mut out);
        }
    }
    out
}
