//! Numeric interpretation of configuration values for bound checks.

use confdrift_core::ConfigValue;

/// Interpret `value` as a number.
///
/// Numbers are used as-is (NaN is not a number). Strings are read by their
/// leading numeric prefix after optional whitespace: sign, digits with an
/// optional fraction and exponent, or `Infinity`. `"5000ms"` reads as 5000,
/// `"abc"` does not read. Booleans and null never read as numbers.
pub fn parse_numeric(value: &ConfigValue) -> Option<f64> {
    match value {
        ConfigValue::Number(n) if !n.is_nan() => Some(*n),
        ConfigValue::String(s) => leading_number(s),
        _ => None,
    }
}

fn leading_number(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let len = bytes.len();
    let mut i = 0;

    let negative = bytes.first() == Some(&b'-');
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        i += 1;
    }
    if s[i..].starts_with("Infinity") {
        return Some(if negative {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        });
    }

    let int_start = i;
    while i < len && bytes[i].is_ascii_digit() {
        i += 1;
    }
    let mut digits = i - int_start;

    if i < len && bytes[i] == b'.' {
        let mut j = i + 1;
        while j < len && bytes[j].is_ascii_digit() {
            j += 1;
        }
        digits += j - (i + 1);
        if digits > 0 {
            i = j;
        }
    }
    if digits == 0 {
        return None;
    }

    if i < len && matches!(bytes[i], b'e' | b'E') {
        let mut j = i + 1;
        if j < len && matches!(bytes[j], b'+' | b'-') {
            j += 1;
        }
        let exp_start = j;
        while j < len && bytes[j].is_ascii_digit() {
            j += 1;
        }
        if j > exp_start {
            i = j;
        }
    }

    s[..i].parse::<f64>().ok()
}
