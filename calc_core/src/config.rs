//! # Application Configuration
//!
//! Optional JSON file; every field has a default so partial files work:
//!
//! ```json
//! {
//!   "exchange": { "base_url": "https://api.exchangerate-api.com/v4/latest", "timeout_secs": 10, "debounce_ms": 500 },
//!   "display": { "favorites_limit": 4, "language": "en" },
//!   "defaults": { "from": "USD", "to": "THB" },
//!   "store_path": null
//! }
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::currency::debounce::DEFAULT_DEBOUNCE;
use crate::currency::favorites::DEFAULT_DISPLAY_LIMIT;
use crate::currency::rates::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};
use crate::currency::{CurrencyCode, HttpRateProvider, Language, SessionConfig};
use crate::errors::{CalcError, CalcResult};
use crate::storage::LocalStore;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub exchange: ExchangeConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub defaults: DefaultsConfig,
    /// Store file override; platform data directory when unset
    #[serde(default)]
    pub store_path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExchangeConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayConfig {
    #[serde(default = "default_favorites_limit")]
    pub favorites_limit: usize,
    #[serde(default)]
    pub language: Language,
}

/// Currency pair used until the user picks one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefaultsConfig {
    #[serde(default = "default_from")]
    pub from: CurrencyCode,
    #[serde(default = "default_to")]
    pub to: CurrencyCode,
}

fn default_base_url() -> String { DEFAULT_BASE_URL.to_string() }
fn default_timeout_secs() -> u64 { DEFAULT_TIMEOUT_SECS }
fn default_debounce_ms() -> u64 { DEFAULT_DEBOUNCE.as_millis() as u64 }
fn default_favorites_limit() -> usize { DEFAULT_DISPLAY_LIMIT }
fn default_from() -> CurrencyCode { CurrencyCode::USD }
fn default_to() -> CurrencyCode { CurrencyCode::THB }

impl Default for ExchangeConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            debounce_ms: default_debounce_ms(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            favorites_limit: default_favorites_limit(),
            language: Language::default(),
        }
    }
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            from: default_from(),
            to: default_to(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a JSON file; a missing file yields defaults.
    pub fn load(path: &Path) -> CalcResult<Self> {
        if !path.exists() {
            tracing::info!("Config file not found at {:?}, using defaults", path);
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .map_err(|e| CalcError::file_error("read", path.display().to_string(), e.to_string()))?;
        serde_json::from_str(&content)
            .map_err(|e| CalcError::serialization(format!("Failed to parse config {}: {}", path.display(), e)))
    }

    /// Save configuration as pretty JSON.
    pub fn save(&self, path: &Path) -> CalcResult<()> {
        let content = serde_json::to_string_pretty(self).map_err(|e| CalcError::serialization(e.to_string()))?;
        std::fs::write(path, content)
            .map_err(|e| CalcError::file_error("write", path.display().to_string(), e.to_string()))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.exchange.timeout_secs)
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.exchange.debounce_ms)
    }

    /// HTTP provider for the configured endpoint.
    pub fn rate_provider(&self) -> CalcResult<HttpRateProvider> {
        HttpRateProvider::new(&self.exchange.base_url, self.timeout())
    }

    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            debounce: self.debounce(),
            default_from: self.defaults.from,
            default_to: self.defaults.to,
        }
    }

    /// Configured store path, or the platform default.
    pub fn resolve_store_path(&self) -> CalcResult<PathBuf> {
        match &self.store_path {
            Some(path) => Ok(path.clone()),
            None => LocalStore::default_path(),
        }
    }

    pub fn open_store(&self) -> CalcResult<LocalStore> {
        LocalStore::open(self.resolve_store_path()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.exchange.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.debounce(), Duration::from_millis(500));
        assert_eq!(config.display.favorites_limit, 4);
        assert_eq!(config.defaults.from, CurrencyCode::USD);
        assert_eq!(config.defaults.to, CurrencyCode::THB);
        assert!(config.store_path.is_none());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let config: AppConfig = serde_json::from_str(
            r#"{ "exchange": { "debounce_ms": 250 }, "display": { "language": "th" } }"#,
        )
        .unwrap();
        assert_eq!(config.exchange.debounce_ms, 250);
        assert_eq!(config.exchange.timeout_secs, DEFAULT_TIMEOUT_SECS);
        assert_eq!(config.display.language, Language::Th);
        assert_eq!(config.display.favorites_limit, 4);
    }

    #[test]
    fn test_rejects_unsupported_default_currency() {
        let result = serde_json::from_str::<AppConfig>(r#"{ "defaults": { "from": "XYZ" } }"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let config = AppConfig::load(&dir.path().join("absent.json")).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        let mut config = AppConfig::default();
        config.defaults.to = CurrencyCode::parse("EUR").unwrap();
        config.store_path = Some(dir.path().join("store.json"));
        config.save(&path).unwrap();

        let loaded = AppConfig::load(&path).unwrap();
        assert_eq!(loaded, config);
        assert_eq!(loaded.session_config().default_to.as_str(), "EUR");
        assert_eq!(loaded.resolve_store_path().unwrap(), dir.path().join("store.json"));
    }
}
