//! # Currency Converter Session
//!
//! Drives a [`ConverterState`] against a [`RateProvider`]:
//!
//! - opening a session fetches the restored pair immediately
//! - pair changes (select, swap) schedule a debounced fetch, so only the
//!   last pair chosen within the quiet window hits the network
//! - amount changes reuse the cached rate without refetching
//! - failures keep the previous rate and queue an error [`Notice`]
//!
//! With a [`LocalStore`] attached, the selected pair, favorites and the
//! last fetched rate per pair survive between sessions.
//!
//! ## Example
//!
//! ```rust,no_run
//! use calc_core::currency::{CurrencySession, HttpRateProvider, SessionConfig};
//!
//! # async fn demo() -> calc_core::CalcResult<()> {
//! let provider = HttpRateProvider::with_defaults()?;
//! let session = CurrencySession::open(provider, None, SessionConfig::default()).await;
//! session.set_amount("100");
//! println!("{}", session.state().result_display());
//! # Ok(())
//! # }
//! ```

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;

use super::codes::CurrencyCode;
use super::converter::{ConverterState, Notice};
use super::debounce::{Debouncer, DEFAULT_DEBOUNCE};
use super::favorites::Favorites;
use super::rates::RateProvider;
use crate::formatting::format_timestamp;
use crate::storage::{keys, LocalStore};

/// Session tuning, normally taken from the app config.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub debounce: Duration,
    /// Pair used when the store holds none
    pub default_from: CurrencyCode,
    pub default_to: CurrencyCode,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            debounce: DEFAULT_DEBOUNCE,
            default_from: CurrencyCode::USD,
            default_to: CurrencyCode::THB,
        }
    }
}

/// Last fetched rate for one pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedRate {
    pub rate: f64,
    /// Display timestamp recorded at fetch time
    pub updated: String,
    pub fetched_at: DateTime<Utc>,
}

/// Stored rate cache, keyed `FROM>TO`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RateCache {
    entries: BTreeMap<String, CachedRate>,
}

impl RateCache {
    fn key(from: CurrencyCode, to: CurrencyCode) -> String {
        format!("{}>{}", from, to)
    }

    pub fn get(&self, from: CurrencyCode, to: CurrencyCode) -> Option<&CachedRate> {
        self.entries.get(&Self::key(from, to))
    }

    pub fn insert(&mut self, from: CurrencyCode, to: CurrencyCode, entry: CachedRate) {
        self.entries.insert(Self::key(from, to), entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

struct Shared<P> {
    provider: P,
    state: Mutex<ConverterState>,
    favorites: Mutex<Favorites>,
    rate_cache: Mutex<RateCache>,
    notices: Mutex<Vec<Notice>>,
    store: Option<Mutex<LocalStore>>,
}

/// A poisoned lock only means another task panicked mid-update; the state
/// itself is still usable.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl<P> Shared<P> {
    fn persist<T: Serialize + ?Sized>(&self, key: &str, value: &T) {
        if let Some(store) = &self.store {
            if let Err(e) = lock(store).set(key, value) {
                tracing::warn!(key, error = %e, "failed to persist converter setting");
            }
        }
    }

    fn push_notice(&self, notice: Notice) {
        lock(&self.notices).push(notice);
    }

    /// Show the cached rate for the selected pair, if there is one.
    fn restore_cached_rate(&self) {
        let mut state = lock(&self.state);
        let cache = lock(&self.rate_cache);
        if let Some(entry) = cache.get(state.from, state.to) {
            state.restore_rate(entry.rate, entry.updated.clone());
        }
    }
}

impl<P: RateProvider> Shared<P> {
    /// Fetch the currently selected pair and apply the outcome.
    async fn fetch_current(&self) {
        let (from, to) = lock(&self.state).begin_fetch();
        tracing::debug!(%from, %to, "fetching exchange rate");

        match self.provider.rate(from, to).await {
            Ok(rate) => {
                let now = Local::now();
                let applied = lock(&self.state).apply_rate(from, to, rate, &now);
                if !applied {
                    tracing::debug!(%from, %to, "discarding rate for deselected pair");
                    return;
                }
                tracing::info!(%from, %to, rate, "exchange rate updated");

                let cache = {
                    let mut cache = lock(&self.rate_cache);
                    cache.insert(
                        from,
                        to,
                        CachedRate {
                            rate,
                            updated: format_timestamp(&now),
                            fetched_at: now.with_timezone(&Utc),
                        },
                    );
                    cache.clone()
                };
                self.persist(keys::RATE_CACHE, &cache);
            }
            Err(e) => {
                tracing::warn!(%from, %to, error = %e, retryable = e.is_recoverable(), "exchange rate fetch failed");
                let notice = lock(&self.state).apply_failure(from, to);
                match notice {
                    Some(notice) => self.push_notice(notice),
                    None => tracing::debug!(%from, %to, "ignoring failure for deselected pair"),
                }
            }
        }
    }
}

/// Interactive currency converter.
pub struct CurrencySession<P> {
    shared: Arc<Shared<P>>,
    debouncer: Debouncer,
}

impl<P: RateProvider + 'static> CurrencySession<P> {
    /// Build a session from stored settings without fetching.
    pub fn new(provider: P, store: Option<LocalStore>, config: SessionConfig) -> Self {
        let (from, to, favorites, rate_cache) = match &store {
            Some(store) => (
                store
                    .get::<CurrencyCode>(keys::FROM_CURRENCY)
                    .unwrap_or(config.default_from),
                store
                    .get::<CurrencyCode>(keys::TO_CURRENCY)
                    .unwrap_or(config.default_to),
                store
                    .get::<Vec<serde_json::Value>>(keys::FAVORITE_PAIRS)
                    .map(Favorites::from_stored)
                    .unwrap_or_default(),
                store.get::<RateCache>(keys::RATE_CACHE).unwrap_or_default(),
            ),
            None => (
                config.default_from,
                config.default_to,
                Favorites::new(),
                RateCache::default(),
            ),
        };

        let shared = Arc::new(Shared {
            provider,
            state: Mutex::new(ConverterState::new(from, to)),
            favorites: Mutex::new(favorites),
            rate_cache: Mutex::new(rate_cache),
            notices: Mutex::new(Vec::new()),
            store: store.map(Mutex::new),
        });
        shared.restore_cached_rate();

        CurrencySession {
            shared,
            debouncer: Debouncer::new(config.debounce),
        }
    }

    /// Build a session and fetch the restored pair immediately.
    pub async fn open(provider: P, store: Option<LocalStore>, config: SessionConfig) -> Self {
        let session = Self::new(provider, store, config);
        session.refresh_now().await;
        session
    }

    pub fn provider(&self) -> &P {
        &self.shared.provider
    }

    /// Snapshot of the converter state.
    pub fn state(&self) -> ConverterState {
        lock(&self.shared.state).clone()
    }

    /// Fetch the selected pair now, bypassing the debouncer.
    pub async fn refresh_now(&self) {
        self.debouncer.cancel();
        self.shared.fetch_current().await;
    }

    pub fn set_amount(&self, amount: impl Into<String>) {
        lock(&self.shared.state).set_amount(amount);
    }

    /// Select a pair. Returns the pending debounced fetch when it changed.
    pub fn select_pair(&self, from: CurrencyCode, to: CurrencyCode) -> Option<JoinHandle<()>> {
        self.change_pair(|state| state.set_pair(from, to))
    }

    pub fn set_from(&self, from: CurrencyCode) -> Option<JoinHandle<()>> {
        self.change_pair(|state| state.set_from(from))
    }

    pub fn set_to(&self, to: CurrencyCode) -> Option<JoinHandle<()>> {
        self.change_pair(|state| state.set_to(to))
    }

    pub fn swap(&self) -> Option<JoinHandle<()>> {
        self.change_pair(ConverterState::swap)
    }

    fn change_pair(&self, change: impl FnOnce(&mut ConverterState) -> bool) -> Option<JoinHandle<()>> {
        let (from, to) = {
            let mut state = lock(&self.shared.state);
            if !change(&mut state) {
                return None;
            }
            (state.from, state.to)
        };

        self.shared.persist(keys::FROM_CURRENCY, &from);
        self.shared.persist(keys::TO_CURRENCY, &to);
        self.shared.restore_cached_rate();

        let shared = Arc::clone(&self.shared);
        Some(self.debouncer.call(move || async move {
            shared.fetch_current().await;
        }))
    }

    /// Drop a pending debounced fetch.
    pub fn cancel_pending(&self) {
        self.debouncer.cancel();
    }

    /// Clear amount, rate, result, timestamp and error.
    pub fn reset(&self) {
        lock(&self.shared.state).reset();
    }

    pub fn favorites(&self) -> Favorites {
        lock(&self.shared.favorites).clone()
    }

    /// Add the selected pair to favorites.
    pub fn add_current_favorite(&self) {
        let (from, to) = {
            let state = lock(&self.shared.state);
            (state.from, state.to)
        };
        self.add_favorite(from, to);
    }

    pub fn add_favorite(&self, from: CurrencyCode, to: CurrencyCode) {
        self.update_favorites(|favorites| favorites.add(from, to));
    }

    pub fn toggle_pin(&self, from: CurrencyCode, to: CurrencyCode) {
        self.update_favorites(|favorites| favorites.toggle_pin(from, to));
    }

    pub fn clear_favorites(&self) {
        self.update_favorites(|favorites| Some(favorites.clear()));
    }

    fn update_favorites(&self, change: impl FnOnce(&mut Favorites) -> Option<Notice>) {
        let (notice, pairs) = {
            let mut favorites = lock(&self.shared.favorites);
            let notice = change(&mut favorites);
            (notice, favorites.pairs().to_vec())
        };
        if let Some(notice) = notice {
            self.shared.persist(keys::FAVORITE_PAIRS, &pairs);
            self.shared.push_notice(notice);
        }
    }

    /// Take every queued notice.
    pub fn drain_notices(&self) -> Vec<Notice> {
        std::mem::take(&mut *lock(&self.shared.notices))
    }
}
