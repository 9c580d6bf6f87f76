//! Lenient number parsing for console input.
//!
//! Both parsers are total: they never fail, they stop at the first byte that
//! does not fit the grammar and return whatever was accumulated. The console
//! relies on the bounds check afterwards to reject nonsense.

/// Largest decimal exponent honoured by [`parse_float`].
pub const MAX_EXPONENT: u32 = 308;

/// Skip leading spaces and tabs.
#[inline]
fn trim_leading_whitespace(s: &[u8]) -> &[u8] {
    let start = s
        .iter()
        .position(|&b| b != b' ' && b != b'\t')
        .unwrap_or(s.len());
    &s[start..]
}

/// Split an optional leading sign off the input.
#[inline]
fn split_sign(s: &[u8]) -> (bool, &[u8]) {
    match s.first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    }
}

/// Parse a decimal float.
///
/// Grammar: `[ \t]* [+-]? digits* ('.' digits*)? ([eE] [+-]? digits+)?`.
/// Accumulation happens in `f64` and the result is narrowed to `f32` at the
/// end. Exponents are clamped to [`MAX_EXPONENT`]. Input that does not start
/// with a number yields `0.0`.
///
/// # Example
///
/// ```
/// use param_text::parse_float;
///
/// assert_eq!(parse_float(b"  -2.5"), -2.5);
/// assert_eq!(parse_float(b"1e3"), 1000.0);
/// assert_eq!(parse_float(b"abc"), 0.0);
/// ```
#[must_use]
pub fn parse_float(text: &[u8]) -> f32 {
    let s = trim_leading_whitespace(text);
    let (negative, mut s) = split_sign(s);

    let mut value: f64 = 0.0;
    while let Some((&b, rest)) = s.split_first() {
        if !b.is_ascii_digit() {
            break;
        }
        value = value * 10.0 + f64::from(b - b'0');
        s = rest;
    }

    if let Some((b'.', rest)) = s.split_first() {
        s = rest;
        let mut pow10: f64 = 10.0;
        while let Some((&b, rest)) = s.split_first() {
            if !b.is_ascii_digit() {
                break;
            }
            value += f64::from(b - b'0') / pow10;
            pow10 *= 10.0;
            s = rest;
        }
    }

    let mut scale: f64 = 1.0;
    let mut shrink = false;
    if let Some((b'e' | b'E', rest)) = s.split_first() {
        let (exp_negative, mut digits) = split_sign(rest);
        shrink = exp_negative;
        let mut exponent: u32 = 0;
        while let Some((&b, rest)) = digits.split_first() {
            if !b.is_ascii_digit() {
                break;
            }
            exponent = exponent
                .saturating_mul(10)
                .saturating_add(u32::from(b - b'0'));
            digits = rest;
        }
        let mut exponent = exponent.min(MAX_EXPONENT);
        while exponent >= 50 {
            scale *= 1e50;
            exponent -= 50;
        }
        while exponent >= 8 {
            scale *= 1e8;
            exponent -= 8;
        }
        while exponent > 0 {
            scale *= 10.0;
            exponent -= 1;
        }
    }

    let magnitude = if shrink { value / scale } else { value * scale };
    let signed = if negative { -magnitude } else { magnitude };
    signed as f32
}

/// Parse a decimal integer.
///
/// Grammar: `[ \t]* [+-]? digits*`, stopping at the first non-digit.
/// Arithmetic wraps on overflow; empty or non-numeric input yields `0`.
///
/// # Example
///
/// ```
/// use param_text::parse_int;
///
/// assert_eq!(parse_int(b" 1500"), 1500);
/// assert_eq!(parse_int(b"-12abc"), -12);
/// assert_eq!(parse_int(b""), 0);
/// ```
#[must_use]
pub fn parse_int(text: &[u8]) -> i32 {
    let s = trim_leading_whitespace(text);
    let (negative, s) = split_sign(s);

    let mut value: i32 = 0;
    for &b in s {
        if !b.is_ascii_digit() {
            break;
        }
        value = value.wrapping_mul(10).wrapping_add(i32::from(b - b'0'));
    }

    if negative {
        value.wrapping_neg()
    } else {
        value
    }
}
