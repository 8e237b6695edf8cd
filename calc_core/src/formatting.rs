//! Number and timestamp formatting shared by the converters and calculators.
//!
//! Results are shown with exactly two decimals. Currency amounts additionally
//! get `en-US` thousands separators (`1,234.50`).

use chrono::{DateTime, TimeZone};
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};

/// Timestamp layout used for "Updated:" lines, e.g. `05/03/2025, 14:07:09`.
pub const TIMESTAMP_FORMAT: &str = "%d/%m/%Y, %H:%M:%S";

/// Exact value of `value` rounded to two places, halves away from zero.
///
/// `None` outside the decimal range (or for NaN/infinity).
fn to_cents(value: f64) -> Option<Decimal> {
    Decimal::from_f64_retain(value)
        .or_else(|| Decimal::from_f64(value))
        .map(|d| d.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero))
}

/// Round to two decimal places, halves away from zero (`0.125` -> `0.13`).
pub fn round2(value: f64) -> f64 {
    to_cents(value).and_then(|d| d.to_f64()).unwrap_or(value)
}

/// Two fixed decimals without grouping (`1234.5` -> `"1234.50"`).
///
/// Rounds exactly like [`round2`], so a value and its text never disagree.
pub fn fixed2(value: f64) -> String {
    match to_cents(value) {
        // -0.004 rounds to zero; never print "-0.00"
        Some(cents) if cents.is_zero() => "0.00".to_string(),
        Some(cents) => format!("{:.2}", cents),
        None => format!("{:.2}", value),
    }
}

/// Two fixed decimals with `en-US` grouping (`1234.5` -> `"1,234.50"`).
pub fn format_number(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }

    let fixed = fixed2(value);
    let (sign, digits) = match fixed.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", fixed.as_str()),
    };
    let (int_part, frac_part) = digits.split_once('.').unwrap_or((digits, "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    format!("{}{}.{}", sign, grouped, frac_part)
}

/// Format a timestamp as `DD/MM/YYYY, HH:MM:SS`.
pub fn format_timestamp<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    at.format(TIMESTAMP_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_round2() {
        assert_eq!(round2(22.857142), 22.86);
        assert_eq!(round2(25.0), 25.0);
    }

    #[test]
    fn test_fixed2() {
        assert_eq!(fixed2(1234.5), "1234.50");
        assert_eq!(fixed2(-0.001), "0.00");
    }

    #[test]
    fn test_halves_round_away_from_zero() {
        assert_eq!(fixed2(0.125), "0.13");
        assert_eq!(round2(0.125), 0.13);
        assert_eq!(fixed2(2.675), "2.67"); // 2.67499999... in binary
        assert_eq!(fixed2(-0.125), "-0.13");
        assert_eq!(fixed2(1.0 / 800.0 * 100.0), "0.13");
    }

    #[test]
    fn test_round2_matches_fixed2() {
        for value in [0.125, 0.375, 1.005, 22.857142, 99.995, 12345.675] {
            assert_eq!(fixed2(value), fixed2(round2(value)), "value {}", value);
        }
    }

    #[test]
    fn test_format_number_grouping() {
        assert_eq!(format_number(0.0), "0.00");
        assert_eq!(format_number(999.999), "1,000.00");
        assert_eq!(format_number(1234567.891), "1,234,567.89");
        assert_eq!(format_number(-35123.4), "-35,123.40");
    }

    #[test]
    fn test_format_timestamp() {
        let at = Utc.with_ymd_and_hms(2025, 3, 5, 14, 7, 9).unwrap();
        assert_eq!(format_timestamp(&at), "05/03/2025, 14:07:09");
    }
}
