//! # Personal Income Tax
//!
//! Progressive schedule applied to taxable income, where
//!
//! ```text
//! taxable = income - (personal allowance + deductions + allowances)
//! ```
//!
//! | Taxable income      | Rate |
//! |---------------------|------|
//! | 0 - 150,000         | 0 %  |
//! | 150,000 - 300,000   | 5 %  |
//! | 300,000 - 500,000   | 10 % |
//! | 500,000 - 750,000   | 15 % |
//! | 750,000 - 1,000,000 | 20 % |
//! | 1,000,000 - 2,000,000 | 25 % |
//! | 2,000,000 - 5,000,000 | 30 % |
//! | above 5,000,000     | 35 % |
//!
//! ## Example
//!
//! ```rust
//! use calc_core::calculations::tax::{calculate, TaxInput};
//!
//! let result = calculate(&TaxInput { income: Some(460_000.0), ..Default::default() });
//! assert_eq!(result.taxable_income, 400_000.0);
//! assert_eq!(result.tax_payable, 17_500.0);
//! ```

use serde::{Deserialize, Serialize};

use crate::formatting::round2;

/// Allowance every taxpayer receives before deductions.
pub const PERSONAL_ALLOWANCE: f64 = 60_000.0;

/// One band of the progressive schedule.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TaxBracket {
    pub lower: f64,
    /// `None` for the open top band
    pub upper: Option<f64>,
    pub rate_pct: f64,
}

impl TaxBracket {
    const fn new(lower: f64, upper: Option<f64>, rate_pct: f64) -> Self {
        TaxBracket {
            lower,
            upper,
            rate_pct,
        }
    }

    /// Portion of `taxable` that falls inside this band.
    pub fn portion(&self, taxable: f64) -> f64 {
        let top = match self.upper {
            Some(upper) => taxable.min(upper),
            None => taxable,
        };
        (top - self.lower).max(0.0)
    }
}

pub const TAX_BRACKETS: [TaxBracket; 8] = [
    TaxBracket::new(0.0, Some(150_000.0), 0.0),
    TaxBracket::new(150_000.0, Some(300_000.0), 5.0),
    TaxBracket::new(300_000.0, Some(500_000.0), 10.0),
    TaxBracket::new(500_000.0, Some(750_000.0), 15.0),
    TaxBracket::new(750_000.0, Some(1_000_000.0), 20.0),
    TaxBracket::new(1_000_000.0, Some(2_000_000.0), 25.0),
    TaxBracket::new(2_000_000.0, Some(5_000_000.0), 30.0),
    TaxBracket::new(5_000_000.0, None, 35.0),
];

/// Tax form inputs. Blank deduction fields count as zero.
///
/// ## JSON Example
///
/// ```json
/// { "income": 600000.0, "deductions": 50000.0, "allowances": 30000.0 }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaxInput {
    #[serde(default)]
    pub income: Option<f64>,
    #[serde(default)]
    pub deductions: Option<f64>,
    #[serde(default)]
    pub allowances: Option<f64>,
}

/// Tax owed within a single band.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BracketTax {
    pub lower: f64,
    pub upper: Option<f64>,
    pub rate_pct: f64,
    /// Income falling in this band
    pub amount: f64,
    pub tax: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaxResult {
    /// Personal allowance plus entered deductions and allowances
    pub total_deductions: f64,
    pub taxable_income: f64,
    pub tax_payable: f64,
    /// Tax as a percentage of gross income
    pub effective_rate_pct: f64,
    /// Bands that hold part of the taxable income
    pub brackets: Vec<BracketTax>,
}

/// Tax on an already-reduced taxable income. Zero for non-positive input.
pub fn tax_on_taxable_income(taxable: f64) -> f64 {
    if !taxable.is_finite() || taxable <= 0.0 {
        return 0.0;
    }
    TAX_BRACKETS
        .iter()
        .map(|b| b.portion(taxable) * b.rate_pct / 100.0)
        .sum()
}

/// Per-band breakdown of `taxable`.
pub fn breakdown(taxable: f64) -> Vec<BracketTax> {
    if !taxable.is_finite() || taxable <= 0.0 {
        return Vec::new();
    }
    TAX_BRACKETS
        .iter()
        .filter_map(|b| {
            let amount = b.portion(taxable);
            (amount > 0.0).then(|| BracketTax {
                lower: b.lower,
                upper: b.upper,
                rate_pct: b.rate_pct,
                amount: round2(amount),
                tax: round2(amount * b.rate_pct / 100.0),
            })
        })
        .collect()
}

/// Calculate taxable income and tax payable.
pub fn calculate(input: &TaxInput) -> TaxResult {
    let income = match input.income {
        Some(v) if v.is_finite() && v > 0.0 => v,
        _ => return TaxResult::default(),
    };

    let total_deductions = PERSONAL_ALLOWANCE
        + input.deductions.unwrap_or(0.0)
        + input.allowances.unwrap_or(0.0);
    let taxable = income - total_deductions;

    if taxable <= 0.0 {
        return TaxResult {
            total_deductions: round2(total_deductions),
            ..TaxResult::default()
        };
    }

    let tax = tax_on_taxable_income(taxable);

    TaxResult {
        total_deductions: round2(total_deductions),
        taxable_income: round2(taxable),
        tax_payable: round2(tax),
        effective_rate_pct: round2(tax / income * 100.0),
        brackets: breakdown(taxable),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schedule_reference_points() {
        assert_eq!(tax_on_taxable_income(150_000.0), 0.0);
        assert_eq!(tax_on_taxable_income(300_000.0), 7_500.0);
        assert_eq!(tax_on_taxable_income(500_000.0), 27_500.0);
        assert_eq!(tax_on_taxable_income(1_000_000.0), 115_000.0);
        assert_eq!(tax_on_taxable_income(5_000_000.0), 1_265_000.0);
        assert_eq!(tax_on_taxable_income(6_000_000.0), 1_615_000.0);
    }

    #[test]
    fn test_non_positive_taxable_income() {
        assert_eq!(tax_on_taxable_income(0.0), 0.0);
        assert_eq!(tax_on_taxable_income(-10.0), 0.0);
        assert!(breakdown(0.0).is_empty());
    }

    #[test]
    fn test_personal_allowance_applied() {
        let result = calculate(&TaxInput {
            income: Some(460_000.0),
            ..Default::default()
        });
        assert_eq!(result.total_deductions, PERSONAL_ALLOWANCE);
        assert_eq!(result.taxable_income, 400_000.0);
        assert_eq!(result.tax_payable, 17_500.0);
    }

    #[test]
    fn test_deductions_and_allowances() {
        let result = calculate(&TaxInput {
            income: Some(600_000.0),
            deductions: Some(50_000.0),
            allowances: Some(30_000.0),
        });
        assert_eq!(result.taxable_income, 460_000.0);
        assert_eq!(result.tax_payable, 23_500.0);
    }

    #[test]
    fn test_income_below_allowance() {
        let result = calculate(&TaxInput {
            income: Some(50_000.0),
            ..Default::default()
        });
        assert_eq!(result.taxable_income, 0.0);
        assert_eq!(result.tax_payable, 0.0);
        assert!(result.brackets.is_empty());

        assert_eq!(calculate(&TaxInput::default()), TaxResult::default());
    }

    #[test]
    fn test_breakdown_sums_to_total() {
        let result = calculate(&TaxInput {
            income: Some(1_060_000.0),
            ..Default::default()
        });
        assert_eq!(result.brackets.len(), 5);
        let sum: f64 = result.brackets.iter().map(|b| b.tax).sum();
        assert_eq!(sum, result.tax_payable);
        assert_eq!(result.brackets[4].rate_pct, 20.0);
        assert_eq!(result.brackets[4].amount, 250_000.0);
    }

    #[test]
    fn test_effective_rate() {
        let result = calculate(&TaxInput {
            income: Some(1_060_000.0),
            ..Default::default()
        });
        assert_eq!(result.effective_rate_pct, 10.85);
    }
}
