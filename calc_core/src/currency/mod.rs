//! # Currency Conversion
//!
//! Live exchange rates for 25 currencies:
//!
//! - [`codes`] - supported currency codes and localized names
//! - [`rates`] - rate documents and the [`RateProvider`] seam (HTTP by default)
//! - [`converter`] - converter screen state and user notices
//! - [`favorites`] - favorite currency pairs
//! - [`debounce`] - trailing-edge debouncer for pair changes
//! - [`session`] - ties the above together with persistence

pub mod codes;
pub mod converter;
pub mod debounce;
pub mod favorites;
pub mod rates;
pub mod session;

pub use codes::{CurrencyCode, CurrencyInfo, Language, SUPPORTED_CURRENCIES};
pub use converter::{ConverterState, Notice, NoticeKind, FETCH_FAILED_MESSAGE};
pub use debounce::{Debouncer, DEFAULT_DEBOUNCE};
pub use favorites::{CurrencyPair, Favorites, DEFAULT_DISPLAY_LIMIT};
pub use rates::{HttpRateProvider, RateDocument, RateProvider, DEFAULT_BASE_URL};
pub use session::{CachedRate, CurrencySession, RateCache, SessionConfig};
