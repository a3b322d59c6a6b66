//! Small formatting collaborators used by the codecs and the CLI.

use chrono::{Datelike, NaiveDate};

const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Render `value` in positional notation with the given radix, left padded
/// with zeros to at least `width` characters. `None` unless `radix` is in
/// `2..=36`.
///
/// `to_padded_radix(0b1011, 2, 7)` yields `Some("0001011")`.
pub fn to_padded_radix(mut value: u64, radix: u32, width: usize) -> Option<String> {
    if !(2..=36).contains(&radix) {
        return None;
    }
    let radix = radix as u64;
    let mut out = Vec::with_capacity(width.max(8));
    loop {
        out.push(DIGITS[(value % radix) as usize]);
        value /= radix;
        if value == 0 {
            break;
        }
    }
    while out.len() < width {
        out.push(b'0');
    }
    out.reverse();
    Some(out.into_iter().map(char::from).collect())
}

/// Six digit `YYMMDD` form used by GS1 date fields.
pub fn yymmdd(date: NaiveDate) -> String {
    format!(
        "{:02}{:02}{:02}",
        date.year().rem_euclid(100),
        date.month(),
        date.day()
    )
}
