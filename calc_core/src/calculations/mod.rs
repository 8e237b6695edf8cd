//! # Everyday Calculations
//!
//! Each calculation follows the pattern:
//!
//! - `*Input` - form inputs (JSON-serializable, blank fields are `None`)
//! - `*Result` - calculation results (JSON-serializable)
//! - `calculate(&input) -> *Result` - pure calculation function
//!
//! Blank or out-of-range inputs never raise an error here: every form has a
//! neutral result (zeros, `N/A`) that a screen can show while the user is
//! still typing.
//!
//! ## Available Calculations
//!
//! - [`bmi`] - Body mass index and weight category
//! - [`loan`] - Simple-interest loan repayments
//! - [`percentage`] - Part as a percentage of a whole
//! - [`tax`] - Progressive personal income tax

pub mod bmi;
pub mod loan;
pub mod percentage;
pub mod tax;

use serde::{Deserialize, Serialize};

use crate::conversion::{convert_form, UnitConversionInput, UnitConversionResult};
use crate::errors::CalcResult;

pub use bmi::{BmiCategory, BmiInput, BmiResult};
pub use loan::{LoanInput, LoanResult, TermUnit};
pub use percentage::{PercentageInput, PercentageResult};
pub use tax::{TaxInput, TaxResult};

/// Enum wrapper for every calculation input, so one JSON document can name
/// any calculation.
///
/// ## JSON Example
///
/// ```json
/// [
///   { "type": "Bmi", "weight_kg": 70.0, "height_cm": 175.0 },
///   { "type": "Conversion", "category": "weight", "value": 70.0, "from": "kg", "to": "lb" }
/// ]
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum CalculationItem {
    Bmi(BmiInput),
    Loan(LoanInput),
    Percentage(PercentageInput),
    Tax(TaxInput),
    /// Unit conversion form
    Conversion(UnitConversionInput),
}

/// Result of evaluating a [`CalculationItem`], tagged the same way.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum CalculationOutput {
    Bmi(BmiResult),
    Loan(LoanResult),
    Percentage(PercentageResult),
    Tax(TaxResult),
    Conversion(UnitConversionResult),
}

impl CalculationItem {
    /// Get the calculation type as a string
    pub fn calc_type(&self) -> &'static str {
        match self {
            CalculationItem::Bmi(_) => "Bmi",
            CalculationItem::Loan(_) => "Loan",
            CalculationItem::Percentage(_) => "Percentage",
            CalculationItem::Tax(_) => "Tax",
            CalculationItem::Conversion(_) => "Conversion",
        }
    }

    /// Run the wrapped calculation.
    ///
    /// Only a conversion can fail (unknown unit keys).
    pub fn evaluate(&self) -> CalcResult<CalculationOutput> {
        Ok(match self {
            CalculationItem::Bmi(input) => CalculationOutput::Bmi(bmi::calculate(input)),
            CalculationItem::Loan(input) => CalculationOutput::Loan(loan::calculate(input)),
            CalculationItem::Percentage(input) => {
                CalculationOutput::Percentage(percentage::calculate(input))
            }
            CalculationItem::Tax(input) => CalculationOutput::Tax(tax::calculate(input)),
            CalculationItem::Conversion(input) => {
                CalculationOutput::Conversion(convert_form(input)?)
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_from_tagged_json() {
        let json = r#"[
            { "type": "Bmi", "weight_kg": 70.0, "height_cm": 175.0 },
            { "type": "Loan", "principal": 100000.0, "annual_rate_pct": 5.0, "term": 24.0 },
            { "type": "Percentage", "whole": 200.0, "part": 50.0 },
            { "type": "Tax", "income": 460000.0 },
            { "type": "Conversion", "category": "weight", "value": 70.0, "from": "kg", "to": "lb" }
        ]"#;
        let items: Vec<CalculationItem> = serde_json::from_str(json).unwrap();
        let types: Vec<_> = items.iter().map(|i| i.calc_type()).collect();
        assert_eq!(types, ["Bmi", "Loan", "Percentage", "Tax", "Conversion"]);

        match items[1].evaluate().unwrap() {
            CalculationOutput::Loan(r) => assert_eq!(r.monthly_payment, 4_583.33),
            other => panic!("unexpected output {:?}", other),
        }
        match items[3].evaluate().unwrap() {
            CalculationOutput::Tax(r) => assert_eq!(r.tax_payable, 17_500.0),
            other => panic!("unexpected output {:?}", other),
        }
    }

    #[test]
    fn test_output_is_tagged() {
        let item = CalculationItem::Percentage(PercentageInput {
            whole: Some(200.0),
            part: Some(50.0),
        });
        let value = serde_json::to_value(item.evaluate().unwrap()).unwrap();
        assert_eq!(value["type"], "Percentage");
        assert_eq!(value["display"], "25.00");
    }

    #[test]
    fn test_conversion_error_propagates() {
        let item = CalculationItem::Conversion(UnitConversionInput {
            category: crate::units::UnitCategory::Length,
            value: Some(1.0),
            from: "m".to_string(),
            to: "league".to_string(),
        });
        assert!(item.evaluate().is_err());
    }
}
