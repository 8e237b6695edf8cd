//! Percentage of a whole: `(part ÷ whole) × 100`, rounded to two decimals.
//! Blank or non-positive inputs give `0`.

use serde::{Deserialize, Serialize};

use crate::formatting::fixed2;

/// ## JSON Example
///
/// ```json
/// { "whole": 200.0, "part": 50.0 }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PercentageInput {
    #[serde(default)]
    pub whole: Option<f64>,
    #[serde(default)]
    pub part: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PercentageResult {
    pub percentage: f64,
    /// `"25.00"`, or `"0"` for invalid input
    pub display: String,
}

/// # Example
///
/// ```rust
/// use calc_core::calculations::percentage::{calculate, PercentageInput};
///
/// let result = calculate(&PercentageInput { whole: Some(200.0), part: Some(50.0) });
/// assert_eq!(result.display, "25.00");
/// ```
pub fn calculate(input: &PercentageInput) -> PercentageResult {
    match (input.whole, input.part) {
        (Some(whole), Some(part))
            if whole.is_finite() && part.is_finite() && whole > 0.0 && part > 0.0 =>
        {
            let display = fixed2(part / whole * 100.0);
            PercentageResult {
                percentage: display.parse().unwrap_or(0.0),
                display,
            }
        }
        _ => PercentageResult {
            percentage: 0.0,
            display: "0".to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pct(whole: f64, part: f64) -> PercentageResult {
        calculate(&PercentageInput {
            whole: Some(whole),
            part: Some(part),
        })
    }

    #[test]
    fn test_quarter() {
        let result = pct(200.0, 50.0);
        assert_eq!(result.percentage, 25.0);
        assert_eq!(result.display, "25.00");
    }

    #[test]
    fn test_rounding() {
        assert_eq!(pct(3.0, 1.0).display, "33.33");
        assert_eq!(pct(3.0, 2.0).percentage, 66.67);
    }

    #[test]
    fn test_half_cent_rounds_up() {
        let result = pct(800.0, 1.0);
        assert_eq!(result.display, "0.13");
        assert_eq!(result.percentage, 0.13);
    }

    #[test]
    fn test_part_larger_than_whole() {
        assert_eq!(pct(50.0, 75.0).display, "150.00");
    }

    #[test]
    fn test_invalid_inputs() {
        assert_eq!(pct(0.0, 5.0).display, "0");
        assert_eq!(pct(10.0, -5.0).display, "0");
        assert_eq!(calculate(&PercentageInput::default()).percentage, 0.0);
    }
}
