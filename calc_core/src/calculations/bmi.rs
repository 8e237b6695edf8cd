//! # Body Mass Index
//!
//! `bmi = weight_kg / height_m²`, with height entered in centimetres. The
//! value is rounded to two decimals before it is categorised, so a raw
//! 24.996 reports as 25.00 / Overweight.
//!
//! Blank or non-positive inputs never raise an error: they produce the
//! neutral result (`0`, `N/A`).
//!
//! ## Example
//!
//! ```rust
//! use calc_core::calculations::bmi::{calculate, BmiCategory, BmiInput};
//!
//! let result = calculate(&BmiInput { weight_kg: Some(70.0), height_cm: Some(175.0) });
//! assert_eq!(result.bmi_display, "22.86");
//! assert_eq!(result.category, BmiCategory::Normal);
//! ```

use serde::{Deserialize, Serialize};

use crate::formatting::fixed2;

/// Lower and upper ends of the gauge scale
const GAUGE_MIN: f64 = 15.0;
const GAUGE_MAX: f64 = 35.0;

/// BMI form inputs.
///
/// ## JSON Example
///
/// ```json
/// { "weight_kg": 70.0, "height_cm": 175.0 }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BmiInput {
    #[serde(default)]
    pub weight_kg: Option<f64>,
    #[serde(default)]
    pub height_cm: Option<f64>,
}

/// Weight category thresholds: < 18.5, < 25, < 30, otherwise obese.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BmiCategory {
    Underweight,
    Normal,
    Overweight,
    Obese,
    #[serde(rename = "N/A")]
    NotAvailable,
}

impl BmiCategory {
    pub fn from_bmi(bmi: f64) -> Self {
        if bmi < 18.5 {
            BmiCategory::Underweight
        } else if bmi < 25.0 {
            BmiCategory::Normal
        } else if bmi < 30.0 {
            BmiCategory::Overweight
        } else {
            BmiCategory::Obese
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            BmiCategory::Underweight => "Underweight",
            BmiCategory::Normal => "Normal",
            BmiCategory::Overweight => "Overweight",
            BmiCategory::Obese => "Obese",
            BmiCategory::NotAvailable => "N/A",
        }
    }
}

impl std::fmt::Display for BmiCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// BMI result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BmiResult {
    /// BMI rounded to two decimals (0 when not available)
    pub bmi: f64,
    /// `"22.86"`, or `"0"` when not available
    pub bmi_display: String,
    pub category: BmiCategory,
    /// Marker position on a 15-35 gauge, 0-100 %
    pub gauge_position_pct: f64,
}

impl BmiResult {
    fn not_available() -> Self {
        BmiResult {
            bmi: 0.0,
            bmi_display: "0".to_string(),
            category: BmiCategory::NotAvailable,
            gauge_position_pct: 0.0,
        }
    }
}

/// Where a BMI value sits on the gauge, clamped to the 15-35 scale.
pub fn gauge_position_pct(bmi: f64) -> f64 {
    let clamped = bmi.clamp(GAUGE_MIN, GAUGE_MAX);
    (clamped - GAUGE_MIN) / (GAUGE_MAX - GAUGE_MIN) * 100.0
}

/// Calculate BMI and category.
pub fn calculate(input: &BmiInput) -> BmiResult {
    let (weight, height_cm) = match (input.weight_kg, input.height_cm) {
        (Some(w), Some(h)) if w.is_finite() && h.is_finite() && w > 0.0 && h > 0.0 => (w, h),
        _ => return BmiResult::not_available(),
    };

    let height_m = height_cm / 100.0;
    let raw = weight / (height_m * height_m);
    let bmi_display = fixed2(raw);
    let bmi = bmi_display.parse::<f64>().unwrap_or(raw);

    BmiResult {
        bmi,
        bmi_display,
        category: BmiCategory::from_bmi(bmi),
        gauge_position_pct: gauge_position_pct(bmi),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bmi(weight_kg: f64, height_cm: f64) -> BmiResult {
        calculate(&BmiInput {
            weight_kg: Some(weight_kg),
            height_cm: Some(height_cm),
        })
    }

    #[test]
    fn test_reference_value() {
        let result = bmi(70.0, 175.0);
        assert!((result.bmi - 22.86).abs() < 1e-9);
        assert_eq!(result.category, BmiCategory::Normal);
    }

    #[test]
    fn test_display_rounds_half_up() {
        // 1 m tall, so the BMI equals the weight
        let result = bmi(22.125, 100.0);
        assert_eq!(result.bmi_display, "22.13");
        assert_eq!(result.bmi, 22.13);
    }

    #[test]
    fn test_category_thresholds() {
        assert_eq!(BmiCategory::from_bmi(18.49), BmiCategory::Underweight);
        assert_eq!(BmiCategory::from_bmi(18.5), BmiCategory::Normal);
        assert_eq!(BmiCategory::from_bmi(24.99), BmiCategory::Normal);
        assert_eq!(BmiCategory::from_bmi(25.0), BmiCategory::Overweight);
        assert_eq!(BmiCategory::from_bmi(29.99), BmiCategory::Overweight);
        assert_eq!(BmiCategory::from_bmi(30.0), BmiCategory::Obese);
    }

    #[test]
    fn test_invalid_inputs_are_neutral() {
        let neutral = calculate(&BmiInput::default());
        assert_eq!(neutral.category, BmiCategory::NotAvailable);
        assert_eq!(neutral.bmi_display, "0");

        assert_eq!(bmi(0.0, 175.0).category, BmiCategory::NotAvailable);
        assert_eq!(bmi(70.0, -1.0).category, BmiCategory::NotAvailable);
    }

    #[test]
    fn test_gauge_position() {
        assert_eq!(gauge_position_pct(10.0), 0.0);
        assert_eq!(gauge_position_pct(25.0), 50.0);
        assert_eq!(gauge_position_pct(40.0), 100.0);
    }

    #[test]
    fn test_category_serialization() {
        let json = serde_json::to_string(&BmiCategory::NotAvailable).unwrap();
        assert_eq!(json, "\"N/A\"");
    }
}
