//! # Error Types
//!
//! Structured error types for calc_core. These errors are designed to be
//! informative for both humans and machine consumers, providing enough context
//! to understand and fix issues programmatically.
//!
//! ## Example
//!
//! ```rust
//! use calc_core::errors::{CalcError, CalcResult};
//!
//! fn validate_amount(amount: f64) -> CalcResult<()> {
//!     if amount <= 0.0 {
//!         return Err(CalcError::InvalidInput {
//!             field: "amount".to_string(),
//!             value: amount.to_string(),
//!             reason: "Amount must be positive".to_string(),
//!         });
//!     }
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for calc_core operations
pub type CalcResult<T> = Result<T, CalcError>;

/// Structured error type for conversion and calculation operations.
///
/// Each variant provides specific context about what went wrong,
/// enabling programmatic error handling by scripts and other consumers.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum CalcError {
    /// An input value is invalid (out of range, wrong type, etc.)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// Unit key not known within its category
    #[error("Unknown {category} unit: {unit}")]
    UnknownUnit { category: String, unit: String },

    /// Currency code not in the supported list
    #[error("Unsupported currency: {code}")]
    UnknownCurrency { code: String },

    /// Rate document did not carry a usable rate for the target currency
    #[error("Rate not found for {from} -> {to}")]
    RateNotFound { from: String, to: String },

    /// Exchange-rate request failed (network, HTTP status, bad body)
    #[error("Fetch failed for '{url}': {reason}")]
    FetchFailed { url: String, reason: String },

    /// Calculation failed (division by zero, malformed expression, etc.)
    #[error("Calculation failed: {calculation_type} - {reason}")]
    CalculationFailed {
        calculation_type: String,
        reason: String,
    },

    /// File I/O error
    #[error("File error: {operation} on '{path}' - {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
    },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },

    /// Schema version mismatch
    #[error("Version mismatch: file version {file_version}, expected {expected_version}")]
    VersionMismatch {
        file_version: String,
        expected_version: String,
    },

    /// Generic internal error (should be rare)
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl CalcError {
    /// Create an InvalidInput error
    pub fn invalid_input(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create an UnknownUnit error
    pub fn unknown_unit(category: impl Into<String>, unit: impl Into<String>) -> Self {
        CalcError::UnknownUnit {
            category: category.into(),
            unit: unit.into(),
        }
    }

    /// Create an UnknownCurrency error
    pub fn unknown_currency(code: impl Into<String>) -> Self {
        CalcError::UnknownCurrency { code: code.into() }
    }

    /// Create a RateNotFound error
    pub fn rate_not_found(from: impl Into<String>, to: impl Into<String>) -> Self {
        CalcError::RateNotFound {
            from: from.into(),
            to: to.into(),
        }
    }

    /// Create a FetchFailed error
    pub fn fetch_failed(url: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::FetchFailed {
            url: url.into(),
            reason: reason.into(),
        }
    }

    /// Create a CalculationFailed error
    pub fn calculation_failed(calculation_type: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::CalculationFailed {
            calculation_type: calculation_type.into(),
            reason: reason.into(),
        }
    }

    /// Create a FileError
    pub fn file_error(operation: impl Into<String>, path: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a SerializationError
    pub fn serialization(reason: impl Into<String>) -> Self {
        CalcError::SerializationError {
            reason: reason.into(),
        }
    }

    /// Check if this is a recoverable error (e.g., can retry)
    pub fn is_recoverable(&self) -> bool {
        matches!(self, CalcError::FetchFailed { .. } | CalcError::RateNotFound { .. })
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            CalcError::InvalidInput { .. } => "INVALID_INPUT",
            CalcError::UnknownUnit { .. } => "UNKNOWN_UNIT",
            CalcError::UnknownCurrency { .. } => "UNKNOWN_CURRENCY",
            CalcError::RateNotFound { .. } => "RATE_NOT_FOUND",
            CalcError::FetchFailed { .. } => "FETCH_FAILED",
            CalcError::CalculationFailed { .. } => "CALCULATION_FAILED",
            CalcError::FileError { .. } => "FILE_ERROR",
            CalcError::SerializationError { .. } => "SERIALIZATION_ERROR",
            CalcError::VersionMismatch { .. } => "VERSION_MISMATCH",
            CalcError::Internal { .. } => "INTERNAL_ERROR",
        }
    }
}
