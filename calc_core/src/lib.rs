//! # calc_core - Everyday Conversion and Calculation Engine
//!
//! `calc_core` holds every behavior of a multi-tool calculator: fixed-factor
//! unit converters, a live currency converter, a keypad calculator, and small
//! finance/health calculators. All inputs and outputs are JSON-serializable so
//! any front end (the bundled CLI, scripts, other programs) can drive it.
//!
//! ## Design Philosophy
//!
//! - **Stateless where possible**: converters and calculators are pure
//!   functions from an input struct to a result struct
//! - **Neutral results**: blank or non-positive form inputs give zero/`N/A`
//!   results instead of errors
//! - **Rich Errors**: structured error types, not just strings
//! - **Stateful only at the edges**: the currency session and the store own
//!   the little state that must outlive a call
//!
//! ## Quick Start
//!
//! ```rust
//! use calc_core::calculations::bmi::{calculate, BmiInput};
//! use calc_core::conversion::convert;
//! use calc_core::units::WeightUnit;
//!
//! let pounds = convert(70.0, WeightUnit::Kilogram, WeightUnit::Pound);
//! assert!((pounds - 154.32).abs() < 0.01);
//!
//! let bmi = calculate(&BmiInput { weight_kg: Some(70.0), height_cm: Some(175.0) });
//! assert_eq!(bmi.bmi_display, "22.86");
//! ```
//!
//! ## Modules
//!
//! - [`units`] - Unit enums, labels and categories
//! - [`conversion`] - Conversion factors, tables and the converter form
//! - [`currency`] - Currency codes, rate provider, converter session, favorites
//! - [`calculator`] - Keypad calculator state machine
//! - [`calculations`] - BMI, loan, percentage and tax calculators
//! - [`storage`] - Local key-value store with atomic saves and locking
//! - [`config`] - Application configuration
//! - [`formatting`] - Number and timestamp formatting
//! - [`errors`] - Structured error types

pub mod calculations;
pub mod calculator;
pub mod config;
pub mod conversion;
pub mod currency;
pub mod errors;
pub mod formatting;
pub mod storage;
pub mod units;

// Re-export commonly used types at crate root for convenience
pub use calculations::{CalculationItem, CalculationOutput};
pub use calculator::Calculator;
pub use config::AppConfig;
pub use conversion::{convert, convert_form, UnitConversionInput, UnitConversionResult};
pub use currency::{CurrencyCode, CurrencySession, Language};
pub use errors::{CalcError, CalcResult};
pub use storage::LocalStore;
pub use units::{AnyUnit, UnitCategory};
