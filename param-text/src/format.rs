//! Number formatting for parameter display.
//!
//! Everything here renders into a fixed-capacity [`NumText`], so the console
//! and the listing commands can format values without heap allocation. The
//! output is deterministic and locale independent: the same bit pattern
//! always produces the same text.

use core::fmt::Write;

use heapless::String;

/// Capacity of a formatted number. Large enough for an `i32` in base 2
/// (sign + 32 digits).
pub const NUM_TEXT_LEN: usize = 36;

/// Formatted number text.
pub type NumText = String<NUM_TEXT_LEN>;

/// Digit alphabet shared by every radix.
const DIGITS: &[u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Smallest number of digits rendered for the scaled magnitude, so there is
/// always at least one digit before the decimal point.
const MIN_SCALED_DIGITS: usize = 4;

/// Largest magnitude (in thousandths) for non-negative values; the legacy
/// renderer converted through an `i32`.
const MAX_POSITIVE_THOUSANDTHS: u64 = i32::MAX as u64;

/// Largest magnitude (in thousandths) for negative values.
const MAX_NEGATIVE_THOUSANDTHS: u64 = i32::MAX as u64 + 1;

/// Capacity for the shortest round-trip decimal of any finite `f32`
/// (subnormals need 45 fractional digits).
const DECIMAL_LEN: usize = 64;

/// Convert a signed integer to text in the given radix.
///
/// Radixes outside `2..=36` fall back to base 10. Digits above 9 are
/// uppercase letters. Negative values get a leading `-`.
///
/// # Example
///
/// ```
/// use param_text::format_int;
///
/// assert_eq!(format_int(-1500, 10).as_str(), "-1500");
/// assert_eq!(format_int(255, 16).as_str(), "FF");
/// assert_eq!(format_int(7, 99).as_str(), "7");
/// ```
#[must_use]
pub fn format_int(value: i32, radix: u32) -> NumText {
    let radix = if (2..=36).contains(&radix) { radix } else { 10 };
    let mut out = NumText::new();
    if value < 0 {
        let _ = out.push('-');
    }
    push_digits(&mut out, value.unsigned_abs(), radix);
    out
}

/// Append the digits of `value`, most significant first.
///
/// Recurses once per digit; the depth is bounded by 32 (base 2).
fn push_digits(out: &mut NumText, value: u32, radix: u32) {
    if value / radix > 0 {
        push_digits(out, value / radix, radix);
    }
    let _ = out.push(DIGITS[(value % radix) as usize] as char);
}

/// Render a float with exactly three fractional digits.
///
/// Rounding is half away from zero at the third decimal: the magnitude is
/// biased by 0.0005, scaled by 1000 and truncated. The bias is applied to the
/// shortest decimal that round-trips to `value`, not to the binary `f32`, so
/// `1.0005` (stored as `1.00049996…`) renders as `1.001` exactly like the text
/// that produced it. The scaled magnitude saturates at the `i32` range, as
/// the legacy integer conversion did.
///
/// Negative inputs keep their sign even when the rounded magnitude is zero.
/// Non-negative values start with their first digit, with no sign column.
/// NaN renders as `0.000`.
///
/// # Example
///
/// ```
/// use param_text::format_float;
///
/// assert_eq!(format_float(0.5).as_str(), "0.500");
/// assert_eq!(format_float(-2.25).as_str(), "-2.250");
/// assert_eq!(format_float(1.0005).as_str(), "1.001");
/// assert_eq!(format_float(-0.0001).as_str(), "-0.000");
/// ```
#[must_use]
pub fn format_float(value: f32) -> NumText {
    let negative = value < 0.0;
    let limit = if negative {
        MAX_NEGATIVE_THOUSANDTHS
    } else {
        MAX_POSITIVE_THOUSANDTHS
    };
    let thousandths = if value.is_nan() {
        0
    } else if value.is_infinite() {
        limit
    } else {
        scaled_magnitude(value.abs()).min(limit)
    };

    let mut digits = NumText::new();
    let magnitude = thousandths as u32;
    let mut width = 1;
    let mut rest = magnitude / 10;
    while rest > 0 {
        width += 1;
        rest /= 10;
    }
    for _ in width..MIN_SCALED_DIGITS {
        let _ = digits.push('0');
    }
    push_digits(&mut digits, magnitude, 10);

    let split = digits.len() - 3;
    let mut out = NumText::new();
    if negative {
        let _ = out.push('-');
    }
    let _ = out.push_str(&digits[..split]);
    let _ = out.push('.');
    let _ = out.push_str(&digits[split..]);
    out
}

/// Round a finite, non-negative value to thousandths, half away from zero.
///
/// Works on the shortest round-trip decimal produced by `core::fmt`, which
/// never uses exponent notation for `Display`. Saturates instead of
/// overflowing.
fn scaled_magnitude(value: f32) -> u64 {
    let mut decimal: String<DECIMAL_LEN> = String::new();
    if write!(decimal, "{}", value).is_err() {
        return 0;
    }

    let (integer, fraction) = match decimal.split_once('.') {
        Some((integer, fraction)) => (integer, fraction),
        None => (decimal.as_str(), ""),
    };

    let mut thousandths: u64 = 0;
    for b in integer.bytes() {
        thousandths = thousandths
            .saturating_mul(10)
            .saturating_add(u64::from(b - b'0'));
    }
    let mut fraction = fraction.bytes();
    for _ in 0..3 {
        let digit = fraction.next().map_or(0, |b| u64::from(b - b'0'));
        thousandths = thousandths.saturating_mul(10).saturating_add(digit);
    }
    // The 0.0005 bias carries into the last kept digit exactly when the
    // first dropped digit is 5 or more.
    if fraction.next().is_some_and(|b| b >= b'5') {
        thousandths = thousandths.saturating_add(1);
    }
    thousandths
}
