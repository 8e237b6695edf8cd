//! # Unit Conversion
//!
//! Fixed-factor conversion for the weight, length, volume and area
//! converters. Every category is a square `unit -> unit` factor matrix where
//! `table[from][to] = base(from) / base(to)`, so identity entries are exactly
//! `1` and a round trip recovers the input up to floating-point error.
//!
//! ## Example
//!
//! ```rust
//! use calc_core::conversion::convert;
//! use calc_core::units::LengthUnit;
//!
//! let inches = convert(1.0, LengthUnit::Foot, LengthUnit::Inch);
//! assert!((inches - 12.0).abs() < 1e-9);
//! ```
//!
//! The form-level API mirrors a converter screen: a missing or non-positive
//! value produces no result rather than an error.
//!
//! ```rust
//! use calc_core::conversion::{convert_form, UnitConversionInput};
//! use calc_core::units::UnitCategory;
//!
//! let input = UnitConversionInput {
//!     category: UnitCategory::Volume,
//!     value: Some(2.0),
//!     from: "l".to_string(),
//!     to: "ml".to_string(),
//! };
//! let result = convert_form(&input).unwrap();
//! assert_eq!(result.formatted.as_deref(), Some("2000.00"));
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};
use crate::formatting::{fixed2, round2};
use crate::units::{AnyUnit, MeasureUnit, UnitCategory};

/// Multiplicative factor taking a value in `from` to a value in `to`.
pub fn factor<U: MeasureUnit>(from: U, to: U) -> f64 {
    if from == to {
        return 1.0;
    }
    from.base_factor() / to.base_factor()
}

/// Convert `value` from one unit to another within a category.
pub fn convert<U: MeasureUnit>(value: f64, from: U, to: U) -> f64 {
    if from == to {
        return value;
    }
    value * from.base_factor() / to.base_factor()
}

/// Convert between category-erased units.
///
/// Fails when the two units belong to different categories.
pub fn convert_any(value: f64, from: AnyUnit, to: AnyUnit) -> CalcResult<f64> {
    if from.category() != to.category() {
        return Err(CalcError::invalid_input(
            "to",
            to.key(),
            format!("Cannot convert {} to {}", from.category(), to.category()),
        ));
    }
    if from == to {
        return Ok(value);
    }
    Ok(value * from.base_factor() / to.base_factor())
}

/// Full factor matrix for a category.
#[derive(Debug, Clone, Serialize)]
pub struct ConversionTable {
    pub category: UnitCategory,
    /// Unit keys labelling both rows and columns
    pub units: Vec<&'static str>,
    /// `factors[i][j]` converts `units[i]` into `units[j]`
    pub factors: Vec<Vec<f64>>,
}

impl ConversionTable {
    /// Look up a factor by unit keys.
    pub fn get(&self, from: &str, to: &str) -> Option<f64> {
        let row = self.units.iter().position(|u| *u == from)?;
        let col = self.units.iter().position(|u| *u == to)?;
        Some(self.factors[row][col])
    }
}

/// Build the factor matrix for a category in canonical unit order.
pub fn conversion_table(category: UnitCategory) -> ConversionTable {
    let units = category.units();
    let factors = units
        .iter()
        .map(|from| {
            units
                .iter()
                .map(|to| {
                    if from == to {
                        1.0
                    } else {
                        from.base_factor() / to.base_factor()
                    }
                })
                .collect()
        })
        .collect();

    ConversionTable {
        category,
        units: units.iter().map(|u| u.key()).collect(),
        factors,
    }
}

/// Converter form state.
///
/// ## JSON Example
///
/// ```json
/// { "category": "weight", "value": 70.0, "from": "kg", "to": "lb" }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitConversionInput {
    pub category: UnitCategory,
    /// Entered value; `None` when the field is blank
    #[serde(default)]
    pub value: Option<f64>,
    pub from: String,
    pub to: String,
}

impl UnitConversionInput {
    /// Exchange source and target units.
    pub fn swap(&mut self) {
        std::mem::swap(&mut self.from, &mut self.to);
    }
}

/// Converter output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitConversionResult {
    pub from: AnyUnit,
    pub to: AnyUnit,
    /// Factor applied (`table[from][to]`)
    pub factor: f64,
    /// Converted value rounded to two decimals; `None` for blank or non-positive input
    pub result: Option<f64>,
    /// `result` with two fixed decimals
    pub formatted: Option<String>,
}

/// Run the converter form.
///
/// Unknown unit keys are errors; a blank or non-positive value is not.
pub fn convert_form(input: &UnitConversionInput) -> CalcResult<UnitConversionResult> {
    let from = AnyUnit::parse(input.category, &input.from)?;
    let to = AnyUnit::parse(input.category, &input.to)?;
    let factor = convert_any(1.0, from, to)?;

    let converted = match input.value {
        Some(value) if value.is_finite() && value > 0.0 => Some(convert_any(value, from, to)?),
        _ => None,
    };

    Ok(UnitConversionResult {
        from,
        to,
        factor,
        result: converted.map(round2),
        formatted: converted.map(fixed2),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::{AreaUnit, LengthUnit, VolumeUnit, WeightUnit};

    const SAMPLES: [f64; 6] = [0.001, 1.0, 2.5, 70.0, 12_345.678, 9.87e9];

    fn assert_round_trip<U: MeasureUnit>() {
        for &a in U::ALL {
            for &b in U::ALL {
                for x in SAMPLES {
                    let back = convert(convert(x, a, b), b, a);
                    let rel = ((back - x) / x).abs();
                    assert!(rel < 1e-6, "{:?} -> {:?} -> {:?}: {} vs {}", a, b, a, back, x);
                }
            }
        }
    }

    fn assert_identity<U: MeasureUnit>() {
        for &u in U::ALL {
            for x in SAMPLES {
                assert_eq!(convert(x, u, u), x);
            }
            assert_eq!(factor(u, u), 1.0);
        }
    }

    #[test]
    fn test_identity_conversion() {
        assert_identity::<WeightUnit>();
        assert_identity::<LengthUnit>();
        assert_identity::<VolumeUnit>();
        assert_identity::<AreaUnit>();
    }

    #[test]
    fn test_round_trip_consistency() {
        assert_round_trip::<WeightUnit>();
        assert_round_trip::<LengthUnit>();
        assert_round_trip::<VolumeUnit>();
        assert_round_trip::<AreaUnit>();
    }

    #[test]
    fn test_known_factors() {
        assert!((factor(WeightUnit::Kilogram, WeightUnit::Pound) - 2.20462).abs() < 1e-5);
        assert!((factor(WeightUnit::Pound, WeightUnit::Ounce) - 16.0).abs() < 1e-9);
        assert!((factor(WeightUnit::Stone, WeightUnit::Pound) - 14.0).abs() < 1e-9);
        assert!((factor(LengthUnit::Meter, LengthUnit::Foot) - 3.28084).abs() < 1e-5);
        assert!((factor(VolumeUnit::Gallon, VolumeUnit::Cup) - 16.0).abs() < 1e-9);
        assert!((factor(AreaUnit::Acre, AreaUnit::SquareFoot) - 43_560.0).abs() < 1e-6);
        assert!((factor(AreaUnit::Hectare, AreaUnit::Acre) - 2.47105).abs() < 1e-5);
    }

    #[test]
    fn test_conversion_table_shape() {
        let table = conversion_table(UnitCategory::Weight);
        assert_eq!(table.units.len(), 9);
        assert!(table.factors.iter().all(|row| row.len() == 9));
        for i in 0..9 {
            assert_eq!(table.factors[i][i], 1.0);
        }
        let g_per_kg = table.get("kg", "g").unwrap();
        assert!((g_per_kg - 1000.0).abs() < 1e-9);
        assert!(table.get("kg", "furlong").is_none());
    }

    #[test]
    fn test_convert_any_rejects_mixed_categories() {
        let kg = AnyUnit::Weight(WeightUnit::Kilogram);
        let m = AnyUnit::Length(LengthUnit::Meter);
        assert!(convert_any(1.0, kg, m).is_err());
    }

    #[test]
    fn test_form_blank_and_non_positive_values() {
        let mut input = UnitConversionInput {
            category: UnitCategory::Length,
            value: None,
            from: "m".to_string(),
            to: "cm".to_string(),
        };
        assert_eq!(convert_form(&input).unwrap().result, None);

        input.value = Some(0.0);
        assert_eq!(convert_form(&input).unwrap().result, None);

        input.value = Some(-3.0);
        assert_eq!(convert_form(&input).unwrap().formatted, None);
    }

    #[test]
    fn test_form_rounds_to_two_decimals() {
        let input = UnitConversionInput {
            category: UnitCategory::Weight,
            value: Some(70.0),
            from: "kg".to_string(),
            to: "lb".to_string(),
        };
        let result = convert_form(&input).unwrap();
        assert_eq!(result.result, Some(154.32));
        assert_eq!(result.formatted.as_deref(), Some("154.32"));
    }

    #[test]
    fn test_form_value_and_text_agree_on_halves() {
        let input = UnitConversionInput {
            category: UnitCategory::Length,
            value: Some(0.125),
            from: "m".to_string(),
            to: "m".to_string(),
        };
        let result = convert_form(&input).unwrap();
        assert_eq!(result.result, Some(0.13));
        assert_eq!(result.formatted.as_deref(), Some("0.13"));
    }

    #[test]
    fn test_form_unknown_unit() {
        let input = UnitConversionInput {
            category: UnitCategory::Area,
            value: Some(1.0),
            from: "sqm".to_string(),
            to: "sqyd".to_string(),
        };
        assert_eq!(
            convert_form(&input).unwrap_err(),
            CalcError::unknown_unit("area", "sqyd")
        );
    }

    #[test]
    fn test_form_swap() {
        let mut input = UnitConversionInput {
            category: UnitCategory::Volume,
            value: Some(1.0),
            from: "gal".to_string(),
            to: "l".to_string(),
        };
        input.swap();
        assert_eq!(input.from, "l");
        assert_eq!(input.to, "gal");
    }
}
