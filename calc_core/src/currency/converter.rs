//! Currency converter screen state.
//!
//! Pure state transitions; the session in [`super::session`] decides when to
//! fetch and feeds outcomes back through [`ConverterState::apply_rate`] and
//! [`ConverterState::apply_failure`].

use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};

use super::codes::CurrencyCode;
use crate::formatting::{format_number, format_timestamp};

/// Error text shown when a rate fetch fails.
pub const FETCH_FAILED_MESSAGE: &str = "Failed to fetch exchange rate";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeKind {
    Success,
    Error,
}

/// Short user-facing message (a toast on a graphical front end).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Notice {
            kind: NoticeKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Notice {
            kind: NoticeKind::Error,
            message: message.into(),
        }
    }
}

/// Everything the converter screen displays.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConverterState {
    /// Amount exactly as typed
    pub amount: String,
    pub from: CurrencyCode,
    pub to: CurrencyCode,
    /// Units of `to` per one `from` for the selected pair
    pub rate: Option<f64>,
    /// `amount × rate`; `None` while the amount is blank or not positive
    pub result: Option<f64>,
    /// `DD/MM/YYYY, HH:MM:SS` of the last successful fetch
    pub last_updated: Option<String>,
    pub error: Option<String>,
    pub loading: bool,
}

impl ConverterState {
    pub fn new(from: CurrencyCode, to: CurrencyCode) -> Self {
        ConverterState {
            amount: String::new(),
            from,
            to,
            rate: None,
            result: None,
            last_updated: None,
            error: None,
            loading: false,
        }
    }

    /// The amount as a positive number, if it is one.
    pub fn parsed_amount(&self) -> Option<f64> {
        self.amount
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite() && *v > 0.0)
    }

    /// Replace the amount and recompute against the cached rate.
    pub fn set_amount(&mut self, amount: impl Into<String>) {
        self.amount = amount.into();
        self.recompute();
    }

    /// Select a pair. Returns whether the pair changed.
    ///
    /// A rate only ever belongs to the pair it was fetched for, so a change
    /// drops the rate, result and timestamp until the new pair's rate is
    /// restored or fetched.
    pub fn set_pair(&mut self, from: CurrencyCode, to: CurrencyCode) -> bool {
        if self.from == from && self.to == to {
            return false;
        }
        self.from = from;
        self.to = to;
        self.rate = None;
        self.result = None;
        self.last_updated = None;
        true
    }

    pub fn set_from(&mut self, from: CurrencyCode) -> bool {
        self.set_pair(from, self.to)
    }

    pub fn set_to(&mut self, to: CurrencyCode) -> bool {
        self.set_pair(self.from, to)
    }

    /// Exchange source and target. Returns whether the pair changed.
    pub fn swap(&mut self) -> bool {
        self.set_pair(self.to, self.from)
    }

    pub fn is_current_pair(&self, from: CurrencyCode, to: CurrencyCode) -> bool {
        self.from == from && self.to == to
    }

    /// Mark a fetch for the current pair as in flight.
    pub fn begin_fetch(&mut self) -> (CurrencyCode, CurrencyCode) {
        self.loading = true;
        (self.from, self.to)
    }

    /// Record a fetched rate.
    ///
    /// Returns `false` and changes nothing when `from`/`to` is no longer the
    /// selected pair.
    pub fn apply_rate<Tz: TimeZone>(
        &mut self,
        from: CurrencyCode,
        to: CurrencyCode,
        rate: f64,
        fetched_at: &DateTime<Tz>,
    ) -> bool
    where
        Tz::Offset: std::fmt::Display,
    {
        if !self.is_current_pair(from, to) {
            return false;
        }
        self.rate = Some(rate);
        self.last_updated = Some(format_timestamp(fetched_at));
        self.error = None;
        self.loading = false;
        self.recompute();
        true
    }

    /// Restore a previously fetched rate with its original timestamp.
    pub fn restore_rate(&mut self, rate: f64, last_updated: impl Into<String>) {
        self.rate = Some(rate);
        self.last_updated = Some(last_updated.into());
        self.recompute();
    }

    /// Record a failed fetch. The prior rate and result are kept.
    ///
    /// Returns the notice to raise, or `None` when the failure belongs to a
    /// pair that is no longer selected.
    pub fn apply_failure(&mut self, from: CurrencyCode, to: CurrencyCode) -> Option<Notice> {
        if !self.is_current_pair(from, to) {
            return None;
        }
        self.error = Some(FETCH_FAILED_MESSAGE.to_string());
        self.loading = false;
        Some(Notice::error(FETCH_FAILED_MESSAGE))
    }

    /// Clear amount, result, rate, timestamp and error. The pair is kept.
    pub fn reset(&mut self) {
        self.amount.clear();
        self.result = None;
        self.rate = None;
        self.last_updated = None;
        self.error = None;
    }

    fn recompute(&mut self) {
        self.result = match (self.parsed_amount(), self.rate) {
            (Some(amount), Some(rate)) => Some(amount * rate),
            _ => None,
        };
    }

    /// Result with grouping and two decimals, `0.00` when there is none.
    pub fn result_display(&self) -> String {
        match self.result {
            Some(result) => format_number(result),
            None => "0.00".to_string(),
        }
    }

    /// `1 USD = 33.71 THB`
    pub fn rate_line(&self) -> Option<String> {
        self.rate
            .map(|rate| format!("1 {} = {} {}", self.from, format_number(rate), self.to))
    }

    /// `Updated: 05/03/2025, 14:07:09`
    pub fn updated_line(&self) -> Option<String> {
        self.last_updated.as_ref().map(|ts| format!("Updated: {}", ts))
    }
}
