use crate::error::{BarcodeError, Result};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// How much data follows an Application Identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LengthClass {
    FixedNumeric { len: usize },
    FixedAlphanumeric { len: usize },
    VariableNumeric { max: usize },
    VariableAlphanumeric { max: usize },
}

impl LengthClass {
    pub fn is_fixed(self) -> bool {
        matches!(
            self,
            LengthClass::FixedNumeric { .. } | LengthClass::FixedAlphanumeric { .. }
        )
    }

    pub fn is_numeric(self) -> bool {
        matches!(
            self,
            LengthClass::FixedNumeric { .. } | LengthClass::VariableNumeric { .. }
        )
    }

    /// Exact length for fixed classes, upper bound for variable ones.
    pub fn max_len(self) -> usize {
        match self {
            LengthClass::FixedNumeric { len } | LengthClass::FixedAlphanumeric { len } => len,
            LengthClass::VariableNumeric { max } | LengthClass::VariableAlphanumeric { max } => max,
        }
    }
}

/// Format notation used in the GS1 general specifications, e.g. `N14` or
/// `X..20`.
impl std::fmt::Display for LengthClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LengthClass::FixedNumeric { len } => write!(f, "N{len}"),
            LengthClass::FixedAlphanumeric { len } => write!(f, "X{len}"),
            LengthClass::VariableNumeric { max } => write!(f, "N..{max}"),
            LengthClass::VariableAlphanumeric { max } => write!(f, "X..{max}"),
        }
    }
}

/// One Application Identifier definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AiSpec {
    pub ai: String,
    pub title: String,
    pub length: LengthClass,
    /// Data is a `YYMMDD` date.
    #[serde(default)]
    pub date: bool,
    /// Last digit is a GS1 modulo 10 check digit.
    #[serde(default)]
    pub check_digit: bool,
}

/// Set of known Application Identifiers.
///
/// The table is configuration: [`AiRegistry::builtin`] carries the common
/// identifiers, and a full table can be loaded from JSON.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AiRegistry {
    entries: Vec<AiSpec>,
}

/// Built-in row: identifier, title, length class and flags.
struct BuiltinAi {
    ai: &'static str,
    title: &'static str,
    length: LengthClass,
    date: bool,
    check_digit: bool,
}

macro_rules! ai {
    ($ai:expr, $title:expr, $length:expr) => {
        ai!($ai, $title, $length, date: false, check: false)
    };
    ($ai:expr, $title:expr, $length:expr, date) => {
        ai!($ai, $title, $length, date: true, check: false)
    };
    ($ai:expr, $title:expr, $length:expr, check) => {
        ai!($ai, $title, $length, date: false, check: true)
    };
    ($ai:expr, $title:expr, $length:expr, date: $date:expr, check: $check:expr) => {
        BuiltinAi {
            ai: $ai,
            title: $title,
            length: $length,
            date: $date,
            check_digit: $check,
        }
    };
}

const fn n(len: usize) -> LengthClass {
    LengthClass::FixedNumeric { len }
}

const fn n_var(max: usize) -> LengthClass {
    LengthClass::VariableNumeric { max }
}

const fn x_var(max: usize) -> LengthClass {
    LengthClass::VariableAlphanumeric { max }
}

static BUILTIN: &[BuiltinAi] = &[
    ai!("00", "SSCC", n(18), check),
    ai!("01", "GTIN", n(14), check),
    ai!("02", "CONTENT", n(14), check),
    ai!("10", "BATCH/LOT", x_var(20)),
    ai!("11", "PROD DATE", n(6), date),
    ai!("12", "DUE DATE", n(6), date),
    ai!("13", "PACK DATE", n(6), date),
    ai!("15", "BEST BEFORE", n(6), date),
    ai!("16", "SELL BY", n(6), date),
    ai!("17", "USE BY", n(6), date),
    ai!("20", "VARIANT", n(2)),
    ai!("21", "SERIAL", x_var(20)),
    ai!("22", "CPV", x_var(20)),
    ai!("240", "ADDITIONAL ID", x_var(30)),
    ai!("241", "CUST. PART No.", x_var(30)),
    ai!("250", "SECONDARY SERIAL", x_var(30)),
    ai!("251", "REF. TO SOURCE", x_var(30)),
    ai!("30", "VAR. COUNT", n_var(8)),
    ai!("37", "COUNT", n_var(8)),
    ai!("400", "ORDER NUMBER", x_var(30)),
    ai!("401", "GINC", x_var(30)),
    ai!("410", "SHIP TO LOC", n(13), check),
    ai!("414", "LOC No.", n(13), check),
    ai!("420", "SHIP TO POST", x_var(20)),
    ai!("422", "ORIGIN", n(3)),
    ai!("8005", "PRICE PER UNIT", n(6)),
    ai!("90", "INTERNAL", x_var(30)),
];

/// Measures with an implied decimal point: the fourth AI digit is the
/// number of decimals.
static MEASURES: &[(&str, &str)] = &[
    ("310", "NET WEIGHT (kg)"),
    ("311", "LENGTH (m)"),
    ("312", "WIDTH (m)"),
    ("313", "HEIGHT (m)"),
];

/// Decimal positions allowed in the fourth digit of a measure AI.
pub const MAX_MEASURE_DECIMALS: u8 = 5;

impl AiRegistry {
    /// Build a registry, rejecting malformed or duplicate identifiers.
    pub fn new(entries: Vec<AiSpec>) -> Result<Self> {
        for (idx, spec) in entries.iter().enumerate() {
            if !(2..=4).contains(&spec.ai.len()) || !spec.ai.bytes().all(|b| b.is_ascii_digit()) {
                return Err(BarcodeError::field(
                    spec.ai.as_str(),
                    "identifier must be 2 to 4 digits",
                ));
            }
            if spec.length.max_len() == 0 {
                return Err(BarcodeError::field(spec.ai.as_str(), "zero data length"));
            }
            if spec.check_digit && !spec.length.is_numeric() {
                return Err(BarcodeError::field(
                    spec.ai.as_str(),
                    "check digit needs numeric data",
                ));
            }
            if spec.date && spec.length != n(6) {
                return Err(BarcodeError::field(spec.ai.as_str(), "dates are six digits"));
            }
            if entries[..idx].iter().any(|other| other.ai == spec.ai) {
                return Err(BarcodeError::field(spec.ai.as_str(), "defined twice"));
            }
        }
        Ok(Self { entries })
    }

    /// The identifiers most labels need.
    pub fn builtin() -> Self {
        let mut entries: Vec<AiSpec> = BUILTIN
            .iter()
            .map(|row| AiSpec {
                ai: row.ai.to_string(),
                title: row.title.to_string(),
                length: row.length,
                date: row.date,
                check_digit: row.check_digit,
            })
            .collect();
        for &(prefix, title) in MEASURES {
            for decimals in 0..=MAX_MEASURE_DECIMALS {
                entries.push(AiSpec {
                    ai: format!("{prefix}{decimals}"),
                    title: title.to_string(),
                    length: n(6),
                    date: false,
                    check_digit: false,
                });
            }
        }
        Self { entries }
    }

    /// Parse a JSON array of [`AiSpec`] objects.
    pub fn from_json_str(json: &str) -> anyhow::Result<Self> {
        let entries: Vec<AiSpec> =
            serde_json::from_str(json).context("failed to parse application identifier table")?;
        Ok(Self::new(entries)?)
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read AI table {}", path.display()))?;
        Self::from_json_str(&raw).with_context(|| format!("invalid AI table {}", path.display()))
    }

    pub fn to_json(&self) -> anyhow::Result<String> {
        serde_json::to_string_pretty(self).context("failed to serialize AI table")
    }

    pub fn list(&self) -> &[AiSpec] {
        &self.entries
    }

    pub fn get(&self, ai: &str) -> Result<&AiSpec> {
        self.entries
            .iter()
            .find(|spec| spec.ai == ai)
            .ok_or_else(|| BarcodeError::field(ai, "unknown application identifier"))
    }

    /// Longest identifier that prefixes `text`.
    pub fn match_prefix(&self, text: &str) -> Option<&AiSpec> {
        self.entries
            .iter()
            .filter(|spec| text.starts_with(spec.ai.as_str()))
            .max_by_key(|spec| spec.ai.len())
    }
}
