//! Text and JSON rendering for every command.

use anyhow::Result;
use serde::Serialize;
use serde_json::json;

use calc_core::calculations::{BmiResult, CalculationOutput, LoanResult, PercentageResult, TaxResult};
use calc_core::calculator::{Calculator, KeyOutcome};
use calc_core::conversion::{ConversionTable, UnitConversionResult};
use calc_core::currency::{ConverterState, CurrencyInfo, Favorites, Language, Notice, NoticeKind};
use calc_core::formatting::format_number;
use calc_core::{CalcError, UnitCategory};

/// Chooses between human-readable text and JSON.
pub struct Output {
    json: bool,
}

impl Output {
    pub fn new(json: bool) -> Self {
        Output { json }
    }

    pub fn is_json(&self) -> bool {
        self.json
    }

    /// Print `value` as pretty JSON, or run `text`.
    fn emit<T: Serialize>(&self, value: &T, text: impl FnOnce()) -> Result<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(value)?);
        } else {
            text();
        }
        Ok(())
    }

    /// Report a failed command. Structured errors keep their shape in JSON.
    pub fn error(&self, error: &anyhow::Error) {
        if !self.json {
            eprintln!("Error: {:#}", error);
            return;
        }
        let body = match error.downcast_ref::<CalcError>() {
            Some(calc) => json!({ "error": calc, "code": calc.error_code() }),
            None => json!({ "error": { "type": "Other", "details": { "message": format!("{:#}", error) } } }),
        };
        match serde_json::to_string_pretty(&body) {
            Ok(text) => println!("{}", text),
            Err(_) => eprintln!("Error: {:#}", error),
        }
    }

    pub fn conversion(&self, result: &UnitConversionResult, value: f64, language: Language) -> Result<()> {
        self.emit(result, || match &result.formatted {
            Some(formatted) => println!(
                "{} {} = {} {}",
                value,
                result.from.label().short,
                formatted,
                result.to.label().short
            ),
            None => println!(
                "No result: enter a positive value ({} > {})",
                result.from.label().name(language),
                result.to.label().name(language)
            ),
        })
    }

    pub fn units(&self, category: UnitCategory, language: Language) -> Result<()> {
        let units = category.units();
        let listing: Vec<_> = units
            .iter()
            .map(|u| json!({ "key": u.key(), "label": u.label(), "base_factor": u.base_factor() }))
            .collect();
        self.emit(&listing, || {
            println!("{} units:", category.display_name());
            for unit in &units {
                let label = unit.label();
                println!("  {:<6} {:<6} {}", unit.key(), label.short, label.name(language));
            }
        })
    }

    pub fn conversion_table(&self, table: &ConversionTable) -> Result<()> {
        self.emit(table, || {
            print!("{:>8}", "");
            for unit in &table.units {
                print!(" {:>14}", unit);
            }
            println!();
            for (from, row) in table.units.iter().zip(&table.factors) {
                print!("{:>8}", from);
                for factor in row {
                    print!(" {:>14.6e}", factor);
                }
                println!();
            }
        })
    }

    pub fn currencies(&self, currencies: &[CurrencyInfo], language: Language) -> Result<()> {
        self.emit(&currencies, || {
            for currency in currencies {
                println!("  {}  {}", currency.code, currency.name(language));
            }
        })
    }

    pub fn currency_state(&self, state: &ConverterState, notices: &[Notice]) -> Result<()> {
        let body = json!({ "state": state, "result_display": state.result_display(), "notices": notices });
        self.emit(&body, || {
            print_notices(notices);
            print_currency_state(state);
        })
    }

    pub fn notices(&self, notices: &[Notice]) -> Result<()> {
        if self.json {
            // Folded into the structured output of the calling command
            return Ok(());
        }
        print_notices(notices);
        Ok(())
    }

    pub fn favorites(&self, favorites: &Favorites, limit: usize) -> Result<()> {
        let shown = favorites.displayed(limit);
        self.emit(&shown, || {
            if favorites.is_empty() {
                println!("No favorites yet");
                return;
            }
            for pair in shown {
                let pin = if pair.pinned { "*" } else { " " };
                println!("  {} {}", pin, pair.label());
            }
            if favorites.len() > shown.len() {
                println!("  ... {} more", favorites.len() - shown.len());
            }
        })
    }

    pub fn calculator(&self, calc: &Calculator, outcomes: &[KeyOutcome]) -> Result<()> {
        let body = json!({ "calculator": calc, "outcomes": outcomes });
        self.emit(&body, || {
            print_key_outcomes(outcomes);
            println!("{}", calc.display());
        })
    }

    pub fn bmi(&self, result: &BmiResult) -> Result<()> {
        self.emit(result, || print_bmi(result))
    }

    pub fn loan(&self, result: &LoanResult) -> Result<()> {
        self.emit(result, || print_loan(result))
    }

    pub fn percentage(&self, result: &PercentageResult) -> Result<()> {
        self.emit(result, || print_percentage(result))
    }

    pub fn tax(&self, result: &TaxResult) -> Result<()> {
        self.emit(result, || print_tax(result))
    }

    pub fn calculation_outputs(&self, results: &[(&str, CalculationOutput)]) -> Result<()> {
        let outputs: Vec<_> = results.iter().map(|(_, output)| output).collect();
        self.emit(&outputs, || {
            for (i, (calc_type, output)) in results.iter().enumerate() {
                if i > 0 {
                    println!();
                }
                println!("[{}] {}", i + 1, calc_type);
                match output {
                    CalculationOutput::Bmi(r) => print_bmi(r),
                    CalculationOutput::Loan(r) => print_loan(r),
                    CalculationOutput::Percentage(r) => print_percentage(r),
                    CalculationOutput::Tax(r) => print_tax(r),
                    CalculationOutput::Conversion(r) => match &r.formatted {
                        Some(formatted) => println!("  {} {}", formatted, r.to.label().short),
                        None => println!("  No result"),
                    },
                }
            }
        })
    }
}

pub fn print_notices(notices: &[Notice]) {
    for notice in notices {
        match notice.kind {
            NoticeKind::Success => println!("[OK] {}", notice.message),
            NoticeKind::Error => eprintln!("[!] {}", notice.message),
        }
    }
}

pub fn print_currency_state(state: &ConverterState) {
    if let Some(error) = &state.error {
        eprintln!("{}", error);
    }
    let amount = if state.amount.is_empty() { "0" } else { state.amount.as_str() };
    println!("{} {} = {} {}", amount, state.from, state.result_display(), state.to);
    if let Some(line) = state.rate_line() {
        println!("{}", line);
    }
    if let Some(line) = state.updated_line() {
        println!("{}", line);
    }
}

fn print_key_outcomes(outcomes: &[KeyOutcome]) {
    for outcome in outcomes {
        match outcome {
            KeyOutcome::Notice(message) => eprintln!("[i] {}", message),
            KeyOutcome::Error(message) => eprintln!("[!] {}", message),
            KeyOutcome::Updated | KeyOutcome::Evaluated(_) => {}
        }
    }
}

fn print_bmi(result: &BmiResult) {
    println!("  BMI:      {}", result.bmi_display);
    println!("  Category: {}", result.category);
    if result.bmi > 0.0 {
        println!("  Gauge:    {:.0}% of 15-35", result.gauge_position_pct);
    }
}

fn print_loan(result: &LoanResult) {
    println!("  Interest:        {}", format_number(result.interest));
    println!("  Total repayment: {}", format_number(result.total));
    println!("  Monthly payment: {}", format_number(result.monthly_payment));
    println!("  Yearly payment:  {}", format_number(result.yearly_payment));
}

fn print_percentage(result: &PercentageResult) {
    println!("  {}%", result.display);
}

fn print_tax(result: &TaxResult) {
    println!("  Total deductions: {}", format_number(result.total_deductions));
    println!("  Taxable income:   {}", format_number(result.taxable_income));
    println!("  Tax payable:      {}", format_number(result.tax_payable));
    println!("  Effective rate:   {:.2}%", result.effective_rate_pct);
    for band in &result.brackets {
        let upper = band
            .upper
            .map(format_number)
            .unwrap_or_else(|| "and above".to_string());
        println!(
            "    {:>14} - {:<14} {:>4}%  {}",
            format_number(band.lower),
            upper,
            band.rate_pct,
            format_number(band.tax)
        );
    }
}
