//! Parsers for form-style text input.
//!
//! None of these fail: unparseable or out-of-domain text degrades to a safe
//! value, the same way the calculator form treats a half-typed field.

use crate::clamp_non_negative;

/// Leading decimal number of `text`, ignoring trailing garbage: `"12abc"`
/// reads as 12, `"1e5x"` as 100000. `Infinity` with an optional sign is
/// accepted; overflowing exponents read as infinite.
pub fn leading_number(text: &str) -> Option<f64> {
    let text = text.trim_start();
    let (sign, rest) = match text.as_bytes().first() {
        Some(b'-') => (-1.0, &text[1..]),
        Some(b'+') => (1.0, &text[1..]),
        _ => (1.0, text),
    };
    if rest.starts_with(|c: char| c == '+' || c == '-') {
        return None;
    }
    if rest.starts_with("Infinity") {
        return Some(sign * f64::INFINITY);
    }
    let end = rest
        .find(|c: char| !(c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-')))
        .unwrap_or(rest.len());
    // The candidate is ASCII, so every index is a char boundary.
    (1..=end)
        .rev()
        .find_map(|i| rest[..i].parse::<f64>().ok())
        .map(|v| sign * v)
}

/// Currency or rate amount. Unparseable, negative or non-finite text is 0.
pub fn parse_amount(text: &str) -> f64 {
    leading_number(text).map(clamp_non_negative).unwrap_or(0.0)
}

/// Whole non-negative count.
pub fn parse_count(text: &str) -> f64 {
    parse_amount(text).floor()
}

/// Horizon length, never below one month.
pub fn parse_months(text: &str) -> f64 {
    parse_count(text).max(1.0)
}

/// Percentage on a 0..=100 scale.
pub fn parse_percent(text: &str) -> f64 {
    parse_amount(text).min(100.0)
}

/// Optional participant cap. Blank or infinite means uncapped.
///
/// The whole field must be a number; anything else caps at 0.
pub fn parse_cap(text: &str) -> Option<f64> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    let value = match text.strip_prefix('+').unwrap_or(text) {
        "Infinity" => f64::INFINITY,
        other => other.parse::<f64>().unwrap_or(0.0),
    };
    if value == f64::INFINITY {
        None
    } else {
        Some(clamp_non_negative(value).floor())
    }
}
