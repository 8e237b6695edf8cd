//! # Loan Interest
//!
//! Simple (non-compounding) interest:
//!
//! ```text
//! interest = principal × rate% × years
//! total    = principal + interest
//! monthly  = total ÷ months
//! yearly   = total ÷ years
//! ```
//!
//! The term may be entered in months or years. Any blank or non-positive
//! input yields an all-zero result.

use serde::{Deserialize, Serialize};

use crate::formatting::round2;

/// Months per year
const MONTHS_PER_YEAR: f64 = 12.0;

/// Unit the loan term is entered in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TermUnit {
    #[default]
    Months,
    Years,
}

impl TermUnit {
    /// Convert a term value from this unit into `to`.
    pub fn convert(self, value: f64, to: TermUnit) -> f64 {
        match (self, to) {
            (TermUnit::Months, TermUnit::Years) => value / MONTHS_PER_YEAR,
            (TermUnit::Years, TermUnit::Months) => value * MONTHS_PER_YEAR,
            _ => value,
        }
    }

    pub fn from_str_flexible(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "m" | "mo" | "month" | "months" => Some(TermUnit::Months),
            "y" | "yr" | "year" | "years" => Some(TermUnit::Years),
            _ => None,
        }
    }
}

/// Loan form inputs.
///
/// ## JSON Example
///
/// ```json
/// { "principal": 100000.0, "annual_rate_pct": 5.0, "term": 24.0, "term_unit": "months" }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoanInput {
    #[serde(default)]
    pub principal: Option<f64>,
    /// Annual interest rate in percent
    #[serde(default)]
    pub annual_rate_pct: Option<f64>,
    #[serde(default)]
    pub term: Option<f64>,
    #[serde(default)]
    pub term_unit: TermUnit,
}

/// Loan results. Money values are rounded to two decimals.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoanResult {
    pub interest: f64,
    pub total: f64,
    pub monthly_payment: f64,
    pub yearly_payment: f64,
    pub term_months: f64,
    pub term_years: f64,
}

fn positive(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite() && *v > 0.0)
}

/// Calculate simple interest and repayment figures.
///
/// # Example
///
/// ```rust
/// use calc_core::calculations::loan::{calculate, LoanInput, TermUnit};
///
/// let result = calculate(&LoanInput {
///     principal: Some(100_000.0),
///     annual_rate_pct: Some(5.0),
///     term: Some(2.0),
///     term_unit: TermUnit::Years,
/// });
/// assert_eq!(result.interest, 10_000.0);
/// assert_eq!(result.monthly_payment, 4_583.33);
/// ```
pub fn calculate(input: &LoanInput) -> LoanResult {
    let (principal, rate, term) = match (
        positive(input.principal),
        positive(input.annual_rate_pct),
        positive(input.term),
    ) {
        (Some(p), Some(r), Some(t)) => (p, r, t),
        _ => return LoanResult::default(),
    };

    let term_years = input.term_unit.convert(term, TermUnit::Years);
    let term_months = input.term_unit.convert(term, TermUnit::Months);

    let interest = principal * rate * term_years / 100.0;
    let total = principal + interest;

    LoanResult {
        interest: round2(interest),
        total: round2(total),
        monthly_payment: round2(total / term_months),
        yearly_payment: round2(total / term_years),
        term_months,
        term_years,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_monthly_term() {
        let result = calculate(&LoanInput {
            principal: Some(100_000.0),
            annual_rate_pct: Some(5.0),
            term: Some(24.0),
            term_unit: TermUnit::Months,
        });
        assert_eq!(result.term_years, 2.0);
        assert_eq!(result.interest, 10_000.0);
        assert_eq!(result.total, 110_000.0);
        assert_eq!(result.monthly_payment, 4_583.33);
        assert_eq!(result.yearly_payment, 55_000.0);
    }

    #[test]
    fn test_yearly_term() {
        let result = calculate(&LoanInput {
            principal: Some(12_000.0),
            annual_rate_pct: Some(10.0),
            term: Some(1.0),
            term_unit: TermUnit::Years,
        });
        assert_eq!(result.term_months, 12.0);
        assert_eq!(result.total, 13_200.0);
        assert_eq!(result.monthly_payment, 1_100.0);
    }

    #[test]
    fn test_invalid_inputs_zero_result() {
        assert_eq!(calculate(&LoanInput::default()), LoanResult::default());

        let negative_rate = LoanInput {
            principal: Some(1000.0),
            annual_rate_pct: Some(-1.0),
            term: Some(12.0),
            term_unit: TermUnit::Months,
        };
        assert_eq!(calculate(&negative_rate), LoanResult::default());
    }

    #[test]
    fn test_term_unit_conversion() {
        assert_eq!(TermUnit::Months.convert(18.0, TermUnit::Years), 1.5);
        assert_eq!(TermUnit::Years.convert(3.0, TermUnit::Months), 36.0);
        assert_eq!(TermUnit::Years.convert(3.0, TermUnit::Years), 3.0);
        assert_eq!(TermUnit::from_str_flexible("Years"), Some(TermUnit::Years));
    }
}
