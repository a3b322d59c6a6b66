use super::EanKind;
use super::digits::{self, DIGIT_WIDTH, Encoding};
use crate::error::{BarcodeError, Result};
use crate::pattern::BarcodePattern;

const EDGE_GUARD: u16 = 0b101;
const EDGE_GUARD_WIDTH: usize = 3;
const CENTER_GUARD: u16 = 0b01010;
const CENTER_GUARD_WIDTH: usize = 5;
const ADDON_GUARD: u16 = 0b1011;
const ADDON_GUARD_WIDTH: usize = 4;
const ADDON_SEPARATOR: u16 = 0b01;
const ADDON_SEPARATOR_WIDTH: usize = 2;

/// L/G choice for digits 1–6 of an EAN-13, indexed by the leading digit.
/// A set bit means G; the most significant of the six bits is digit 1.
static FIRST_DIGIT_PARITY: [u8; 10] = [
    0b000000, 0b001011, 0b001101, 0b001110, 0b010011, 0b011001, 0b011100, 0b010101, 0b010110,
    0b011010,
];

/// L/G choice for the five add-on digits, indexed by the add-on checksum.
static ADDON5_PARITY: [u8; 10] = [
    0b11000, 0b10100, 0b10010, 0b10001, 0b01100, 0b00110, 0b00011, 0b01010, 0b01001, 0b00101,
];

/// L/G choice for the two add-on digits, indexed by value mod 4.
static ADDON2_PARITY: [u8; 4] = [0b00, 0b01, 0b10, 0b11];

const SUPPORTED_LENGTHS: &str = "2, 5, 7, 8, 12, 13, 17 or 18 digits";
const PATTERN_LENGTHS: &str = "2, 5, 7, 8, 12 or 13 digits";

fn parse_digits(input: &str) -> Result<Vec<u8>> {
    input
        .chars()
        .enumerate()
        .map(|(index, ch)| {
            ch.to_digit(10)
                .map(|d| d as u8)
                .ok_or(BarcodeError::InvalidDigit { index, ch })
        })
        .collect()
}

/// GS1 modulo 10: weight 3 on the digit next to the check digit, then
/// alternating 1 and 3 towards the front.
pub(crate) fn mod10(data: &[u8]) -> u8 {
    let sum: u32 = data
        .iter()
        .rev()
        .enumerate()
        .map(|(i, &d)| d as u32 * if i % 2 == 0 { 3 } else { 1 })
        .sum();
    ((10 - sum % 10) % 10) as u8
}

fn addon5_checksum(d: &[u8]) -> u8 {
    let odd = d[0] as u32 + d[2] as u32 + d[4] as u32;
    let even = d[1] as u32 + d[3] as u32;
    ((odd * 3 + even * 9) % 10) as u8
}

fn addon2_checksum(d: &[u8]) -> u8 {
    (d[0] * 2 + d[1]) % 4
}

fn checksum_digits(d: &[u8]) -> Result<u8> {
    match d.len() {
        7 | 8 => Ok(mod10(&d[..7])),
        12 | 13 => Ok(mod10(&d[..12])),
        17 | 18 => Ok(mod10(&d[..17])),
        5 => Ok(addon5_checksum(d)),
        2 => Ok(addon2_checksum(d)),
        len => Err(BarcodeError::InvalidLength {
            len,
            expected: SUPPORTED_LENGTHS,
        }),
    }
}

/// Check value for a digit payload.
///
/// For 7/8, 12/13 and 17/18 digits this is the check digit over the first
/// 7, 12 or 17 digits. For add-ons it is the value that selects the digit
/// parities; it is never printed.
pub fn checksum(digits: &str) -> Result<u8> {
    checksum_digits(&parse_digits(digits)?)
}

fn verify_digits(d: &[u8]) -> Result<()> {
    let expected = checksum_digits(d)?;
    match d.len() {
        8 | 13 | 18 => {
            let found = d[d.len() - 1];
            if found != expected {
                return Err(BarcodeError::Checksum { expected, found });
            }
            Ok(())
        }
        _ => Ok(()),
    }
}

/// Confirm a payload is well formed and that a stored check digit matches.
pub fn verify(digits: &str) -> Result<()> {
    verify_digits(&parse_digits(digits)?)
}

/// `true` when [`verify`] passes.
///
/// Only 8, 13 and 18 digit payloads carry a check digit. Any 2, 5, 7, 12 or
/// 17 digit string is accepted, so `true` there means well formed, not
/// checked.
pub fn validate(digits: &str) -> bool {
    verify(digits).is_ok()
}

/// Convert a 12-digit UPC-A (check digit included) into its EAN-13 form.
pub fn upc_a_to_ean13(upc: &str) -> Result<String> {
    let d = parse_digits(upc)?;
    if d.len() != 12 {
        return Err(BarcodeError::InvalidLength {
            len: d.len(),
            expected: "12 UPC-A digits",
        });
    }
    let ean = format!("0{upc}");
    verify(&ean)?;
    Ok(ean)
}

/// Encodings used for each digit group of the bar pattern of `digits`.
pub fn parity_pattern(digits: &str) -> Result<Vec<Encoding>> {
    let d = complete(parse_digits(digits)?)?;
    let parity = |mask: u8, width: usize| -> Vec<Encoding> {
        (0..width).map(|k| pick(mask, width, k)).collect()
    };
    Ok(match d.len() {
        13 => {
            let mut out = parity(FIRST_DIGIT_PARITY[d[0] as usize], 6);
            out.extend([Encoding::R; 6]);
            out
        }
        8 => [[Encoding::L; 4], [Encoding::R; 4]].concat(),
        5 => parity(ADDON5_PARITY[addon5_checksum(&d) as usize], 5),
        _ => parity(ADDON2_PARITY[addon2_checksum(&d) as usize], 2),
    })
}

/// Append a missing check digit, verify a present one, and reject lengths
/// that have no bar layout.
fn complete(mut d: Vec<u8>) -> Result<Vec<u8>> {
    match d.len() {
        7 | 12 => {
            let check = checksum_digits(&d)?;
            d.push(check);
            Ok(d)
        }
        2 | 5 | 8 | 13 => {
            verify_digits(&d)?;
            Ok(d)
        }
        len => Err(BarcodeError::InvalidLength {
            len,
            expected: PATTERN_LENGTHS,
        }),
    }
}

fn push_digit(pattern: &mut BarcodePattern, digit: u8, encoding: Encoding) {
    // digits come from parse_digits, so the lookup always succeeds
    if let Some(bits) = digits::encode_digit(digit, encoding) {
        pattern.push_bits(bits as u16, DIGIT_WIDTH);
    }
}

fn pick(mask: u8, width: usize, k: usize) -> Encoding {
    if (mask >> (width - 1 - k)) & 1 == 1 {
        Encoding::G
    } else {
        Encoding::L
    }
}

/// Assemble the bar pattern for a digit payload.
///
/// 7 and 12 digit payloads get their check digit appended; 8 and 13 digit
/// payloads must carry a correct one.
pub fn encode(digits: &str) -> Result<BarcodePattern> {
    let d = complete(parse_digits(digits)?)?;
    let kind = EanKind::for_payload(d.len()).ok_or(BarcodeError::InvalidLength {
        len: d.len(),
        expected: PATTERN_LENGTHS,
    })?;
    let mut p = BarcodePattern::with_capacity(kind.modules());

    match kind {
        EanKind::Ean13 => {
            let mask = FIRST_DIGIT_PARITY[d[0] as usize];
            p.push_bits(EDGE_GUARD, EDGE_GUARD_WIDTH);
            for (k, &digit) in d[1..7].iter().enumerate() {
                push_digit(&mut p, digit, pick(mask, 6, k));
            }
            p.push_bits(CENTER_GUARD, CENTER_GUARD_WIDTH);
            for &digit in &d[7..13] {
                push_digit(&mut p, digit, Encoding::R);
            }
            p.push_bits(EDGE_GUARD, EDGE_GUARD_WIDTH);
        }
        EanKind::Ean8 => {
            p.push_bits(EDGE_GUARD, EDGE_GUARD_WIDTH);
            for &digit in &d[..4] {
                push_digit(&mut p, digit, Encoding::L);
            }
            p.push_bits(CENTER_GUARD, CENTER_GUARD_WIDTH);
            for &digit in &d[4..8] {
                push_digit(&mut p, digit, Encoding::R);
            }
            p.push_bits(EDGE_GUARD, EDGE_GUARD_WIDTH);
        }
        EanKind::AddOn5 | EanKind::AddOn2 => {
            let (mask, width) = if kind == EanKind::AddOn5 {
                (ADDON5_PARITY[addon5_checksum(&d) as usize], 5)
            } else {
                (ADDON2_PARITY[addon2_checksum(&d) as usize], 2)
            };
            p.push_bits(ADDON_GUARD, ADDON_GUARD_WIDTH);
            for (k, &digit) in d.iter().enumerate() {
                if k > 0 {
                    p.push_bits(ADDON_SEPARATOR, ADDON_SEPARATOR_WIDTH);
                }
                push_digit(&mut p, digit, pick(mask, width, k));
            }
        }
    }
    debug_assert_eq!(p.len(), kind.modules());
    Ok(p)
}

fn expect_bits(p: &BarcodePattern, start: usize, width: usize, bits: u16) -> Result<()> {
    if p.bits_at(start, width) == Some(bits) {
        Ok(())
    } else {
        Err(BarcodeError::UnknownPattern { index: start })
    }
}

fn read_group(p: &BarcodePattern, start: usize) -> Result<(u8, Encoding)> {
    p.bits_at(start, DIGIT_WIDTH)
        .and_then(|bits| digits::lookup(bits as u8))
        .ok_or(BarcodeError::UnknownPattern { index: start })
}

/// Read an EAN-13 or EAN-8 left to right. Any group on the wrong side of
/// the centre guard, or an unknown parity key, is a misread.
fn read_main(p: &BarcodePattern, kind: EanKind) -> Result<Vec<u8>> {
    let half = kind.digits() / 2;
    let left_start = EDGE_GUARD_WIDTH;
    let center = left_start + half * DIGIT_WIDTH;
    let right_start = center + CENTER_GUARD_WIDTH;
    let end = right_start + half * DIGIT_WIDTH;

    expect_bits(p, 0, EDGE_GUARD_WIDTH, EDGE_GUARD)?;
    expect_bits(p, center, CENTER_GUARD_WIDTH, CENTER_GUARD)?;
    expect_bits(p, end, EDGE_GUARD_WIDTH, EDGE_GUARD)?;

    let mut out = Vec::with_capacity(kind.digits());
    let mut key = 0u8;
    for k in 0..half {
        let start = left_start + k * DIGIT_WIDTH;
        let (digit, encoding) = read_group(p, start)?;
        match (kind, encoding) {
            (_, Encoding::R) | (EanKind::Ean8, Encoding::G) => {
                return Err(BarcodeError::UnknownPattern { index: start });
            }
            _ => {}
        }
        key = (key << 1) | u8::from(encoding == Encoding::G);
        out.push(digit);
    }
    if kind == EanKind::Ean13 {
        let first = FIRST_DIGIT_PARITY
            .iter()
            .position(|&mask| mask == key)
            .ok_or(BarcodeError::UnknownPattern { index: left_start })?;
        out.insert(0, first as u8);
    }
    for k in 0..half {
        let start = right_start + k * DIGIT_WIDTH;
        match read_group(p, start)? {
            (digit, Encoding::R) => out.push(digit),
            _ => return Err(BarcodeError::UnknownPattern { index: start }),
        }
    }
    Ok(out)
}

fn has_addon_guard(p: &BarcodePattern) -> bool {
    p.bits_at(0, ADDON_GUARD_WIDTH) == Some(ADDON_GUARD)
}

fn read_addon(p: &BarcodePattern, kind: EanKind) -> Result<Vec<u8>> {
    expect_bits(p, 0, ADDON_GUARD_WIDTH, ADDON_GUARD)?;
    let count = kind.digits();
    let mut out = Vec::with_capacity(count);
    let mut mask = 0u8;
    for k in 0..count {
        let start = ADDON_GUARD_WIDTH + k * (DIGIT_WIDTH + ADDON_SEPARATOR_WIDTH);
        if k > 0 {
            expect_bits(
                p,
                start - ADDON_SEPARATOR_WIDTH,
                ADDON_SEPARATOR_WIDTH,
                ADDON_SEPARATOR,
            )?;
        }
        let (digit, encoding) = read_group(p, start)?;
        if encoding == Encoding::R {
            return Err(BarcodeError::UnknownPattern { index: start });
        }
        mask = (mask << 1) | u8::from(encoding == Encoding::G);
        out.push(digit);
    }

    let (expected, found) = if kind == EanKind::AddOn5 {
        let found = ADDON5_PARITY
            .iter()
            .position(|&m| m == mask)
            .ok_or(BarcodeError::UnknownPattern {
                index: ADDON_GUARD_WIDTH,
            })?;
        (addon5_checksum(&out), found as u8)
    } else {
        (addon2_checksum(&out), mask)
    };
    if expected != found {
        return Err(BarcodeError::Checksum { expected, found });
    }
    Ok(out)
}

fn digits_to_string(d: &[u8]) -> String {
    d.iter().map(|&digit| char::from(b'0' + digit)).collect()
}

/// Parse a bar pattern back to its digits, correcting a reversed scan.
///
/// A stored check digit that does not match is a hard
/// [`BarcodeError::Checksum`] failure.
pub fn decode(pattern: &BarcodePattern) -> Result<String> {
    let kind = EanKind::for_modules(pattern.len()).ok_or(BarcodeError::InvalidLength {
        len: pattern.len(),
        expected: "95, 67, 47 or 20 modules",
    })?;

    let digits = match kind {
        EanKind::Ean13 | EanKind::Ean8 => match read_main(pattern, kind) {
            Ok(d) => d,
            Err(forward) => {
                let reversed = pattern.reversed();
                match read_main(&reversed, kind) {
                    Ok(d) => {
                        tracing::debug!(%kind, "pattern read right to left; reversed");
                        d
                    }
                    Err(_) if is_guard_failure(&forward, kind) => return Err(forward),
                    Err(backward) => {
                        return Err(match leading_encoding(pattern) {
                            Some(Encoding::L) => forward,
                            Some(Encoding::G) => mirrored(backward, pattern.len()),
                            _ => BarcodeError::Orientation,
                        });
                    }
                }
            }
        },
        EanKind::AddOn5 | EanKind::AddOn2 => match read_addon(pattern, kind) {
            Ok(d) => d,
            Err(forward) => {
                let guarded = has_addon_guard(pattern);
                let reversed = pattern.reversed();
                if !has_addon_guard(&reversed) {
                    return Err(if guarded {
                        forward
                    } else {
                        BarcodeError::Orientation
                    });
                }
                match read_addon(&reversed, kind) {
                    Ok(d) => {
                        tracing::debug!(%kind, "add-on guard found at the tail; reversed");
                        d
                    }
                    Err(backward) => return Err(if guarded { forward } else { backward }),
                }
            }
        },
    };

    verify_digits(&digits)?;
    Ok(digits_to_string(&digits))
}

/// Guards are symmetric, so a broken guard fails in both directions and is
/// reported as such rather than as an orientation problem.
fn is_guard_failure(err: &BarcodeError, kind: EanKind) -> bool {
    let center = EDGE_GUARD_WIDTH + kind.digits() / 2 * DIGIT_WIDTH;
    let end = kind.modules() - EDGE_GUARD_WIDTH;
    matches!(err, BarcodeError::UnknownPattern { index } if *index == 0 || *index == center || *index == end)
}

/// Encoding of the first left-hand group. A forward symbol always starts
/// with an L group; read backwards, that slot holds a mirrored R group,
/// which is a G code.
fn leading_encoding(p: &BarcodePattern) -> Option<Encoding> {
    read_group(p, EDGE_GUARD_WIDTH).ok().map(|(_, encoding)| encoding)
}

/// Map a group index from a reversed read back onto the caller's pattern.
fn mirrored(err: BarcodeError, len: usize) -> BarcodeError {
    match err {
        BarcodeError::UnknownPattern { index } => BarcodeError::UnknownPattern {
            index: len.saturating_sub(index + DIGIT_WIDTH),
        },
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    #[test_case("400638133393", 1; "ean13 prefix")]
    #[test_case("4006381333931", 1; "ean13 full")]
    #[test_case("9638507", 4; "ean8 prefix")]
    #[test_case("96385074", 4; "ean8 full")]
    #[test_case("12345", 1; "addon5")]
    #[test_case("53", 1; "addon2")]
    #[test_case("00000000000000017", 8; "sscc prefix")]
    fn checksums(input: &str, expected: u8) {
        assert_eq!(checksum(input).unwrap(), expected);
    }

    #[test]
    fn sscc_checksum_spans_seventeen_digits() {
        assert_eq!(checksum("34567890123456789").unwrap(), 5);
        assert!(validate("345678901234567895"));
        assert!(!validate("345678901234567894"));
    }

    #[test]
    fn rejects_non_digits_and_lengths() {
        assert_eq!(
            checksum("40063813339a").unwrap_err(),
            BarcodeError::InvalidDigit { index: 11, ch: 'a' }
        );
        for len in [0, 1, 3, 4, 6, 9, 10, 11, 14, 15, 16, 19] {
            let digits = "1".repeat(len);
            assert!(
                matches!(
                    checksum(&digits),
                    Err(BarcodeError::InvalidLength { .. })
                ),
                "{len}"
            );
            assert!(encode(&digits).is_err(), "{len}");
        }
    }

    #[test]
    fn ean13_layout() {
        let p = encode("4006381333931").unwrap();
        assert_eq!(p.len(), 95);
        let s = p.to_string();
        assert!(s.starts_with("101"));
        assert_eq!(&s[45..50], "01010");
        assert!(s.ends_with("101"));
        // leading 4 -> LGLLGG; digit 1 is 0 in L
        assert_eq!(&s[3..10], "0001101");
        // digit 2 is 0 in G
        assert_eq!(&s[10..17], "0100111");
    }

    #[test]
    fn ean8_layout() {
        let p = encode("96385074").unwrap();
        assert_eq!(p.len(), 67);
        let s = p.to_string();
        assert_eq!(&s[3..10], "0001011");
        assert_eq!(&s[64..67], "101");
    }

    #[test]
    fn short_payloads_get_check_digit() {
        assert_eq!(
            decode(&encode("400638133393").unwrap()).unwrap(),
            "4006381333931"
        );
        assert_eq!(decode(&encode("9638507").unwrap()).unwrap(), "96385074");
    }

    #[test]
    fn wrong_check_digit_is_rejected_on_encode() {
        assert_eq!(
            encode("4006381333932").unwrap_err(),
            BarcodeError::Checksum {
                expected: 1,
                found: 2
            }
        );
    }

    #[test]
    fn checksum_only_lengths_have_no_pattern() {
        assert!(matches!(
            encode("345678901234567895"),
            Err(BarcodeError::InvalidLength { len: 18, .. })
        ));
    }

    #[test]
    fn addon5_parity_follows_checksum() {
        let parity = parity_pattern("12345").unwrap();
        use Encoding::{G, L};
        assert_eq!(parity, vec![G, L, G, L, L]);
        let p = encode("12345").unwrap();
        assert_eq!(p.len(), 47);
        let s = p.to_string();
        assert!(s.starts_with("1011"));
        // first digit 1 in G
        assert_eq!(&s[4..11], "0110011");
        assert_eq!(&s[11..13], "01");
    }

    #[test]
    fn addon2_parity_follows_value_mod_4() {
        use Encoding::{G, L};
        assert_eq!(parity_pattern("12").unwrap(), vec![L, L]);
        assert_eq!(parity_pattern("53").unwrap(), vec![L, G]);
        assert_eq!(parity_pattern("34").unwrap(), vec![G, L]);
        assert_eq!(parity_pattern("99").unwrap(), vec![G, G]);
        assert_eq!(encode("53").unwrap().len(), 20);
    }

    #[test_case("4006381333931")]
    #[test_case("5901234123457")]
    #[test_case("0036000291452")]
    #[test_case("96385074")]
    #[test_case("12345")]
    #[test_case("90000")]
    #[test_case("53")]
    #[test_case("07")]
    fn round_trip(digits: &str) {
        let p = encode(digits).unwrap();
        assert_eq!(decode(&p).unwrap(), digits);
        assert_eq!(decode(&p.reversed()).unwrap(), digits);
    }

    #[test]
    fn stored_checksum_mismatch_is_hard_failure() {
        // swap the last R group for the code of a different digit
        let mut p = encode("4006381333931").unwrap().modules().to_vec();
        let wrong = digits::encode_digit(2, Encoding::R).unwrap();
        for k in 0..7 {
            p[85 + k] = (wrong >> (6 - k)) & 1 == 1;
        }
        let err = decode(&BarcodePattern::new(p)).unwrap_err();
        assert_eq!(
            err,
            BarcodeError::Checksum {
                expected: 1,
                found: 2
            }
        );
    }

    #[test]
    fn broken_guard_reports_its_index() {
        let mut p = encode("96385074").unwrap().modules().to_vec();
        p[33] = !p[33];
        let err = decode(&BarcodePattern::new(p)).unwrap_err();
        assert_eq!(err, BarcodeError::UnknownPattern { index: 31 });
    }

    #[test_case(17 ; "left group")]
    #[test_case(57 ; "right group")]
    fn corrupt_group_reports_its_index(start: usize) {
        let mut p = encode("4006381333931").unwrap().modules().to_vec();
        for m in &mut p[start..start + DIGIT_WIDTH] {
            *m = true;
        }
        let err = decode(&BarcodePattern::new(p)).unwrap_err();
        assert_eq!(err, BarcodeError::UnknownPattern { index: start });
    }

    #[test]
    fn corrupt_group_in_reversed_scan_reports_caller_index() {
        let mut p = encode("4006381333931").unwrap().modules().to_vec();
        for m in &mut p[17..24] {
            *m = true;
        }
        let reversed = BarcodePattern::new(p).reversed();
        let err = decode(&reversed).unwrap_err();
        assert_eq!(err, BarcodeError::UnknownPattern { index: 71 });
    }

    #[test]
    fn garbage_groups_are_an_orientation_failure() {
        let mut p = encode("4006381333931").unwrap().modules().to_vec();
        for m in &mut p[3..10] {
            *m = true;
        }
        for m in &mut p[85..92] {
            *m = true;
        }
        let err = decode(&BarcodePattern::new(p)).unwrap_err();
        assert_eq!(err, BarcodeError::Orientation);
    }

    #[test]
    fn validate_only_checks_stored_check_digits() {
        assert!(validate("400638133392"));
        assert!(validate("12345"));
        assert!(!validate("4006381333932"));
        assert!(!validate("123"));
    }

    #[test]
    fn upc_a_maps_to_ean13() {
        assert_eq!(upc_a_to_ean13("036000291452").unwrap(), "0036000291452");
        assert!(matches!(
            upc_a_to_ean13("036000291453"),
            Err(BarcodeError::Checksum { .. })
        ));
    }
}
