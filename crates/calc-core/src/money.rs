//! Currency rounding and report formatting.

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

/// Round a float amount to cents, half away from zero.
///
/// Returns `None` for non-finite input or values outside `Decimal` range.
///
/// Example:
/// assert_eq!(to_money(0.125), Some(Decimal::new(13, 2)));
pub fn to_money(value: f64) -> Option<Decimal> {
    if !value.is_finite() {
        return None;
    }
    Decimal::from_f64(value)
        .map(|d| d.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero))
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

fn non_finite(value: f64) -> String {
    if value.is_nan() {
        "—".to_string()
    } else if value > 0.0 {
        "∞".to_string()
    } else {
        "-∞".to_string()
    }
}

/// Format as US dollars, e.g. `$1,234.50` or `-$12.00`.
pub fn format_usd(value: f64) -> String {
    let Some(amount) = to_money(value) else {
        if value.is_finite() {
            return format!("${value:.2}");
        }
        return non_finite(value);
    };
    let text = format!("{:.2}", amount.abs());
    let (int_part, frac_part) = text.split_once('.').unwrap_or((text.as_str(), "00"));
    let sign = if amount.is_sign_negative() && !amount.is_zero() {
        "-"
    } else {
        ""
    };
    format!("{sign}${}.{frac_part}", group_thousands(int_part))
}

/// Format as a whole count with thousands separators.
pub fn format_count(value: f64) -> String {
    if !value.is_finite() {
        return non_finite(value);
    }
    let rounded = value.round();
    let digits = format!("{:.0}", rounded.abs());
    if rounded < 0.0 {
        format!("-{}", group_thousands(&digits))
    } else {
        group_thousands(&digits)
    }
}
