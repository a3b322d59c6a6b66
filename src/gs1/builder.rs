use super::registry::{AiRegistry, AiSpec, MAX_MEASURE_DECIMALS};
use crate::code128::{Atom, Code128Sequence, plan};
use crate::ean::codec::mod10;
use crate::error::{BarcodeError, Result};
use crate::format::yymmdd;
use chrono::NaiveDate;
use std::fmt;

/// One validated Application Identifier with its data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AiField {
    pub ai: String,
    pub data: String,
}

impl AiField {
    /// AI digits followed by the data, as carried in the symbol.
    pub fn element(&self) -> String {
        format!("{}{}", self.ai, self.data)
    }
}

/// Human readable form, `(01)00012345678905`.
impl fmt::Display for AiField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}){}", self.ai, self.data)
    }
}

/// GS1 "CSET 82", the characters allowed in alphanumeric AI data.
fn is_cset82(b: u8) -> bool {
    matches!(b,
        b'!' | b'"' | b'%'..=b'/' | b'0'..=b'9' | b':'..=b'?' | b'A'..=b'Z' | b'_' | b'a'..=b'z')
}

fn normalize_date(ai: &str, data: &str) -> Result<String> {
    let invalid = || {
        BarcodeError::field(
            ai,
            format!("'{data}' is not a date (YYMMDD, YYYYMMDD or YYYY-MM-DD)"),
        )
    };
    if data.len() == 6 && data.bytes().all(|b| b.is_ascii_digit()) {
        let part = |range: std::ops::Range<usize>| data[range].parse::<u32>().map_err(|_| invalid());
        let (yy, mm, dd) = (part(0..2)?, part(2..4)?, part(4..6)?);
        // Day 00 stands for the last day of the month.
        NaiveDate::from_ymd_opt(2000 + yy as i32, mm, dd.max(1)).ok_or_else(invalid)?;
        return Ok(data.to_string());
    }
    ["%Y%m%d", "%Y-%m-%d"]
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(data, fmt).ok())
        .map(yymmdd)
        .ok_or_else(invalid)
}

/// Check `data` against the AI definition, returning the normalised form.
pub fn validate_field(spec: &AiSpec, data: &str) -> Result<String> {
    let ai = spec.ai.as_str();
    let data = if spec.date {
        normalize_date(ai, data)?
    } else {
        data.to_string()
    };
    if data.is_empty() {
        return Err(BarcodeError::field(ai, "empty data"));
    }
    let len = data.chars().count();
    if spec.length.is_fixed() && len != spec.length.max_len() {
        return Err(BarcodeError::field(
            ai,
            format!("expected {} characters, got {len}", spec.length.max_len()),
        ));
    }
    if len > spec.length.max_len() {
        return Err(BarcodeError::field(
            ai,
            format!("{len} characters exceed the maximum of {}", spec.length.max_len()),
        ));
    }
    if spec.length.is_numeric() {
        if let Some(ch) = data.chars().find(|c| !c.is_ascii_digit()) {
            return Err(BarcodeError::field(
                ai,
                format!("non-numeric character {ch:?} in numeric data"),
            ));
        }
    } else if let Some(ch) = data.chars().find(|&c| !c.is_ascii() || !is_cset82(c as u8)) {
        return Err(BarcodeError::field(
            ai,
            format!("character {ch:?} is not allowed in AI data"),
        ));
    }
    if spec.check_digit {
        let digits: Vec<u8> = data.bytes().map(|b| b - b'0').collect();
        let (body, found) = digits.split_at(digits.len() - 1);
        let expected = mod10(body);
        if expected != found[0] {
            return Err(BarcodeError::Checksum {
                expected,
                found: found[0],
            });
        }
    }
    Ok(data)
}

/// Fixed six digit measure with `decimals` implied decimal places.
fn measure_data(ai: &str, value: f64, decimals: u8) -> Result<String> {
    if !value.is_finite() || value < 0.0 {
        return Err(BarcodeError::field(ai, format!("invalid measure {value}")));
    }
    let scaled = (value * 10f64.powi(decimals as i32)).round();
    if scaled > 999_999.0 {
        return Err(BarcodeError::field(
            ai,
            format!("{value} does not fit six digits with {decimals} decimals"),
        ));
    }
    Ok(format!("{:06}", scaled as u64))
}

/// Assembles a GS1-128 symbol from several AI fields.
///
/// ```
/// use barline::gs1::{AiRegistry, Gs1Builder};
///
/// let registry = AiRegistry::builtin();
/// let seq = Gs1Builder::new(&registry)
///     .field("01", "00012345678905")?
///     .field("10", "AB123")?
///     .build()?;
/// assert_eq!(seq.text(), "[FNC1]010001234567890510AB123");
/// # Ok::<(), barline::BarcodeError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Gs1Builder<'r> {
    registry: &'r AiRegistry,
    fields: Vec<(&'r AiSpec, String)>,
}

impl<'r> Gs1Builder<'r> {
    pub fn new(registry: &'r AiRegistry) -> Self {
        Self {
            registry,
            fields: Vec::new(),
        }
    }

    pub fn field(mut self, ai: &str, data: &str) -> Result<Self> {
        let spec = self.registry.get(ai)?;
        if self.fields.iter().any(|(s, _)| s.ai == spec.ai) {
            return Err(BarcodeError::field(ai, "already present"));
        }
        let data = validate_field(spec, data)?;
        self.fields.push((spec, data));
        Ok(self)
    }

    pub fn date(self, ai: &str, date: NaiveDate) -> Result<Self> {
        if !self.registry.get(ai)?.date {
            return Err(BarcodeError::field(ai, "not a date field"));
        }
        self.field(ai, &yymmdd(date))
    }

    /// A measure AI (`310`, `311`, ...) whose fourth digit carries the
    /// number of decimals.
    pub fn measure(self, prefix: &str, value: f64, decimals: u8) -> Result<Self> {
        let ai = format!("{prefix}{decimals}");
        if decimals > MAX_MEASURE_DECIMALS {
            return Err(BarcodeError::field(
                ai,
                format!("at most {MAX_MEASURE_DECIMALS} decimals"),
            ));
        }
        let data = measure_data(&ai, value, decimals)?;
        self.field(&ai, &data)
    }

    pub fn net_weight_kg(self, kg: f64, decimals: u8) -> Result<Self> {
        self.measure("310", kg, decimals)
    }

    /// Length, width and height in metres (AIs 311n, 312n, 313n).
    pub fn dimensions(self, length: f64, width: f64, height: f64, decimals: u8) -> Result<Self> {
        self.measure("311", length, decimals)?
            .measure("312", width, decimals)?
            .measure("313", height, decimals)
    }

    pub fn fields(&self) -> Vec<AiField> {
        self.fields
            .iter()
            .map(|(spec, data)| AiField {
                ai: spec.ai.clone(),
                data: data.clone(),
            })
            .collect()
    }

    fn atoms(&self) -> Result<Vec<Atom>> {
        if self.fields.is_empty() {
            return Err(BarcodeError::InvalidLength {
                len: 0,
                expected: "at least one application identifier",
            });
        }
        let mut atoms = vec![Atom::Fnc1];
        for (i, (spec, data)) in self.fields.iter().enumerate() {
            atoms.extend(spec.ai.bytes().chain(data.bytes()).map(Atom::Byte));
            if !spec.length.is_fixed() && i + 1 < self.fields.len() {
                atoms.push(Atom::Fnc1);
            }
        }
        Ok(atoms)
    }

    /// Element string with `[FNC1]` markers, as the decoder reports it.
    pub fn element_string(&self) -> Result<String> {
        let mut out = String::new();
        for atom in self.atoms()? {
            match atom {
                Atom::Fnc1 => out.push_str("[FNC1]"),
                Atom::Byte(b) => out.push(char::from(b)),
            }
        }
        Ok(out)
    }

    /// Human readable interpretation, `(01)...(10)...`.
    pub fn hri(&self) -> String {
        self.fields().iter().map(AiField::to_string).collect()
    }

    pub fn build(&self) -> Result<Code128Sequence> {
        let atoms = self.atoms()?;
        let (start, values) = plan(&atoms)?;
        tracing::debug!(fields = self.fields.len(), %start, "composed GS1-128 symbol");
        Code128Sequence::build(start, &values)
    }
}

/// Single-field GS1-128 symbol using the built-in AI table.
pub fn build_gs1(ai: &str, data: &str) -> Result<Code128Sequence> {
    let registry = AiRegistry::builtin();
    Gs1Builder::new(&registry).field(ai, data)?.build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::code128::CodeSet;
    use crate::error::ErrorKind;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    #[test]
    fn gtin_and_batch_pack_into_set_c_then_b() {
        let registry = AiRegistry::builtin();
        let builder = Gs1Builder::new(&registry)
            .field("01", "00012345678905")
            .unwrap()
            .field("10", "AB123")
            .unwrap();
        let seq = builder.build().unwrap();
        assert_eq!(seq.start_set(), CodeSet::C);
        assert_eq!(
            seq.data(),
            &[102, 1, 0, 1, 23, 45, 67, 89, 5, 10, 100, 33, 34, 17, 18, 19]
        );
        assert_eq!(builder.hri(), "(01)00012345678905(10)AB123");
        // 01 is fixed length, so no separator before 10
        assert_eq!(seq.text(), "[FNC1]010001234567890510AB123");
    }

    #[test]
    fn separator_only_between_variable_and_next_field() {
        let registry = AiRegistry::builtin();
        let builder = Gs1Builder::new(&registry)
            .field("10", "LOT7")
            .unwrap()
            .field("01", "00012345678905")
            .unwrap()
            .field("21", "S1")
            .unwrap();
        assert_eq!(
            builder.element_string().unwrap(),
            "[FNC1]10LOT7[FNC1]010001234567890521S1"
        );
        assert_eq!(builder.build().unwrap().text(), builder.element_string().unwrap());
    }

    #[test]
    fn single_field_helper() {
        let seq = build_gs1("00", "376104250021234569").unwrap();
        assert_eq!(seq.text(), "[FNC1]00376104250021234569");
    }

    #[test_case("01", "0001234567890" ; "fixed length too short")]
    #[test_case("10", "ABCDEFGHIJKLMNOPQRSTU" ; "variable length too long")]
    #[test_case("01", "0001234567890A" ; "letter in numeric")]
    #[test_case("10", "AB 12" ; "space outside cset 82")]
    #[test_case("99", "1" ; "unknown identifier")]
    #[test_case("17", "241340" ; "impossible date")]
    #[test_case("10", "" ; "empty data")]
    fn rejects_unsupported_fields(ai: &str, data: &str) {
        let err = build_gs1(ai, data).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedField, "{err}");
    }

    #[test]
    fn bad_check_digit_is_a_checksum_error() {
        let err = build_gs1("01", "00012345678906").unwrap_err();
        assert_eq!(
            err,
            BarcodeError::Checksum {
                expected: 5,
                found: 6
            }
        );
    }

    #[test_case("240305", "240305")]
    #[test_case("20240305", "240305")]
    #[test_case("2024-03-05", "240305")]
    #[test_case("241200", "241200" ; "day zero")]
    fn dates_normalise_to_yymmdd(input: &str, expected: &str) {
        let registry = AiRegistry::builtin();
        let fields = Gs1Builder::new(&registry)
            .field("17", input)
            .unwrap()
            .fields();
        assert_eq!(fields[0].data, expected);
    }

    #[test]
    fn typed_dates_and_measures() {
        let registry = AiRegistry::builtin();
        let builder = Gs1Builder::new(&registry)
            .date("15", NaiveDate::from_ymd_opt(2025, 1, 31).unwrap())
            .unwrap()
            .net_weight_kg(1.5, 3)
            .unwrap()
            .dimensions(1.2, 0.8, 0.25, 2)
            .unwrap();
        assert_eq!(
            builder.hri(),
            "(15)250131(3103)001500(3112)000120(3122)000080(3132)000025"
        );
        assert!(builder.build().is_ok());
    }

    #[test]
    fn measure_limits() {
        let registry = AiRegistry::builtin();
        assert!(Gs1Builder::new(&registry).net_weight_kg(1.0, 6).is_err());
        assert!(Gs1Builder::new(&registry).net_weight_kg(10_000.0, 2).is_err());
        assert!(Gs1Builder::new(&registry).net_weight_kg(-1.0, 0).is_err());
        assert!(Gs1Builder::new(&registry).date("10", NaiveDate::MIN).is_err());
    }

    #[test]
    fn duplicate_and_empty_builders_fail() {
        let registry = AiRegistry::builtin();
        let dup = Gs1Builder::new(&registry)
            .field("21", "A")
            .unwrap()
            .field("21", "B");
        assert!(dup.is_err());
        let err = Gs1Builder::new(&registry).build().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Structural);
    }
}
