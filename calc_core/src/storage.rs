//! # Local Key-Value Store
//!
//! Persists user preferences (selected currencies, favorite pairs, the last
//! fetched rate per pair) between runs. One JSON file holds every entry:
//!
//! ```json
//! {
//!   "version": "0.1.0",
//!   "modified": "2025-03-05T14:07:09Z",
//!   "entries": { "fromCurrency": "USD", "toCurrency": "THB" }
//! }
//! ```
//!
//! Safety features:
//! - **Write-through**: every `set`/`remove`/`clear` is saved immediately
//! - **Atomic saves**: write to `.tmp`, fsync, rename over the store file
//! - **File locking**: an exclusive OS lock on a sidecar `.lock` file
//!   serialises writers from several processes
//! - **Version validation**: files from an incompatible schema are rejected
//!
//! ## Example
//!
//! ```rust,no_run
//! use calc_core::storage::{keys, LocalStore};
//!
//! let mut store = LocalStore::open(LocalStore::default_path()?)?;
//! let from: String = store.get_or(keys::FROM_CURRENCY, "USD".to_string());
//! store.set(keys::TO_CURRENCY, &"EUR")?;
//! # Ok::<(), calc_core::errors::CalcError>(())
//! ```

use std::collections::BTreeMap;
use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use directories::ProjectDirs;
use semver::Version;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::{CalcError, CalcResult};

/// Current store schema version.
pub const STORE_SCHEMA_VERSION: &str = "0.1.0";

/// Default store file name inside the data directory.
pub const STORE_FILE_NAME: &str = "store.json";

/// Keys used by the currency converter.
pub mod keys {
    pub const FROM_CURRENCY: &str = "fromCurrency";
    pub const TO_CURRENCY: &str = "toCurrency";
    pub const FAVORITE_PAIRS: &str = "favoritePairs";
    pub const RATE_CACHE: &str = "rateCache";
}

/// On-disk layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoreFile {
    version: String,
    modified: DateTime<Utc>,
    #[serde(default)]
    entries: BTreeMap<String, Value>,
}

impl StoreFile {
    fn empty() -> Self {
        StoreFile {
            version: STORE_SCHEMA_VERSION.to_string(),
            modified: Utc::now(),
            entries: BTreeMap::new(),
        }
    }
}

/// JSON-file backed key-value store.
#[derive(Debug)]
pub struct LocalStore {
    path: PathBuf,
    file: StoreFile,
}

impl LocalStore {
    /// Open a store, starting empty when the file does not exist yet.
    ///
    /// # Returns
    ///
    /// * `Err(CalcError::VersionMismatch)` - File schema is incompatible
    /// * `Err(CalcError::SerializationError)` - File is not a valid store
    /// * `Err(CalcError::FileError)` - I/O error
    pub fn open(path: impl Into<PathBuf>) -> CalcResult<Self> {
        let path = path.into();

        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "store file missing, starting empty");
                return Ok(LocalStore {
                    path,
                    file: StoreFile::empty(),
                });
            }
            Err(e) => {
                return Err(CalcError::file_error("read", path.display().to_string(), e.to_string()))
            }
        };

        let file: StoreFile = serde_json::from_str(&contents).map_err(|e| {
            CalcError::serialization(format!("Invalid store file {}: {}", path.display(), e))
        })?;

        validate_version(&file.version)?;

        tracing::debug!(path = %path.display(), entries = file.entries.len(), "store loaded");
        Ok(LocalStore { path, file })
    }

    /// Platform data directory location (`.../everyday-calc/store.json`).
    pub fn default_path() -> CalcResult<PathBuf> {
        ProjectDirs::from("", "", "everyday-calc")
            .map(|dirs| dirs.data_dir().join(STORE_FILE_NAME))
            .ok_or_else(|| CalcError::Internal {
                message: "No home directory available for the store".to_string(),
            })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// When the store was last written.
    pub fn modified(&self) -> DateTime<Utc> {
        self.file.modified
    }

    pub fn contains(&self, key: &str) -> bool {
        self.file.entries.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.file.entries.keys().map(String::as_str)
    }

    /// Decode a stored value.
    ///
    /// Absent keys and values that no longer decode as `T` both yield `None`.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let value = self.file.entries.get(key)?;
        match serde_json::from_value(value.clone()) {
            Ok(decoded) => Some(decoded),
            Err(e) => {
                tracing::warn!(key, error = %e, "ignoring undecodable store entry");
                None
            }
        }
    }

    /// Decode a stored value, falling back to `default`.
    pub fn get_or<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        self.get(key).unwrap_or(default)
    }

    /// Store a value and save.
    pub fn set<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) -> CalcResult<()> {
        let value = serde_json::to_value(value).map_err(|e| CalcError::serialization(e.to_string()))?;
        self.file.entries.insert(key.to_string(), value);
        self.save()
    }

    /// Remove a key and save. Returns whether the key was present.
    pub fn remove(&mut self, key: &str) -> CalcResult<bool> {
        if self.file.entries.remove(key).is_none() {
            return Ok(false);
        }
        self.save()?;
        Ok(true)
    }

    /// Remove every entry and save.
    pub fn clear(&mut self) -> CalcResult<()> {
        self.file.entries.clear();
        self.save()
    }

    fn save(&mut self) -> CalcResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                CalcError::file_error("create directory", parent.display().to_string(), e.to_string())
            })?;
        }

        let _lock = StoreLock::acquire(&self.path)?;

        self.file.version = STORE_SCHEMA_VERSION.to_string();
        self.file.modified = Utc::now();
        write_atomic(&self.path, &self.file)?;

        tracing::debug!(path = %self.path.display(), entries = self.file.entries.len(), "store saved");
        Ok(())
    }
}

/// Exclusive lock on the sidecar `.lock` file, released when dropped.
struct StoreLock {
    #[cfg(not(target_arch = "wasm32"))]
    file: File,
}

impl StoreLock {
    #[cfg(not(target_arch = "wasm32"))]
    fn acquire(store_path: &Path) -> CalcResult<Self> {
        use fs2::FileExt;

        let lock_path = lock_path_for(store_path);
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)
            .map_err(|e| {
                CalcError::file_error("create lock", lock_path.display().to_string(), e.to_string())
            })?;

        // Blocks until any other writer finishes its save
        file.lock_exclusive().map_err(|e| {
            CalcError::file_error("lock", lock_path.display().to_string(), e.to_string())
        })?;

        Ok(StoreLock { file })
    }

    #[cfg(target_arch = "wasm32")]
    fn acquire(_store_path: &Path) -> CalcResult<Self> {
        Ok(StoreLock {})
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl Drop for StoreLock {
    fn drop(&mut self) {
        use fs2::FileExt;
        let _ = FileExt::unlock(&self.file);
    }
}

/// Get the lock file path for a store file
fn lock_path_for(store_path: &Path) -> PathBuf {
    let mut lock_path = store_path.to_path_buf();
    let extension = lock_path
        .extension()
        .map(|e| format!("{}.lock", e.to_string_lossy()))
        .unwrap_or_else(|| "lock".to_string());
    lock_path.set_extension(extension);
    lock_path
}

/// Serialize, write to `.tmp`, fsync, rename.
fn write_atomic<T: Serialize>(path: &Path, value: &T) -> CalcResult<()> {
    let json = serde_json::to_string_pretty(value).map_err(|e| CalcError::serialization(e.to_string()))?;

    let tmp_path = path.with_extension("json.tmp");

    let mut tmp_file = File::create(&tmp_path).map_err(|e| {
        CalcError::file_error("create temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    tmp_file.write_all(json.as_bytes()).map_err(|e| {
        CalcError::file_error("write temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    tmp_file.sync_all().map_err(|e| {
        CalcError::file_error("sync temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        CalcError::file_error("rename to final", path.display().to_string(), e.to_string())
    })
}

/// Same major version required; while 0.x, a newer minor is rejected too.
fn validate_version(file_version: &str) -> CalcResult<()> {
    let mismatch = || CalcError::VersionMismatch {
        file_version: file_version.to_string(),
        expected_version: STORE_SCHEMA_VERSION.to_string(),
    };

    let file = Version::parse(file_version).map_err(|_| mismatch())?;
    let current = Version::parse(STORE_SCHEMA_VERSION).map_err(|_| mismatch())?;

    if file.major != current.major {
        return Err(mismatch());
    }
    if current.major == 0 && file.minor > current.minor {
        return Err(mismatch());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn temp_store() -> (TempDir, PathBuf) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(STORE_FILE_NAME);
        (dir, path)
    }

    #[test]
    fn test_lock_path_generation() {
        let lock_path = lock_path_for(Path::new("/data/store.json"));
        assert_eq!(lock_path, Path::new("/data/store.json.lock"));
    }

    #[test]
    fn test_missing_file_opens_empty() {
        let (_dir, path) = temp_store();
        let store = LocalStore::open(&path).unwrap();
        assert_eq!(store.keys().count(), 0);
        assert!(!path.exists());
    }

    #[test]
    fn test_set_writes_through() {
        let (_dir, path) = temp_store();
        let mut store = LocalStore::open(&path).unwrap();
        store.set(keys::FROM_CURRENCY, "EUR").unwrap();
        store.set(keys::FAVORITE_PAIRS, &vec![("USD", "THB")]).unwrap();

        let reopened = LocalStore::open(&path).unwrap();
        assert_eq!(reopened.get::<String>(keys::FROM_CURRENCY).as_deref(), Some("EUR"));
        let pairs: Vec<(String, String)> = reopened.get(keys::FAVORITE_PAIRS).unwrap();
        assert_eq!(pairs, vec![("USD".to_string(), "THB".to_string())]);
    }

    #[test]
    fn test_atomic_save_leaves_no_tmp_file() {
        let (_dir, path) = temp_store();
        let mut store = LocalStore::open(&path).unwrap();
        store.set("k", &1).unwrap();
        assert!(path.exists());
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn test_get_or_falls_back() {
        let (_dir, path) = temp_store();
        let mut store = LocalStore::open(&path).unwrap();
        assert_eq!(store.get_or(keys::TO_CURRENCY, "THB".to_string()), "THB");

        // Present but wrong shape
        store.set(keys::TO_CURRENCY, &42).unwrap();
        assert_eq!(store.get_or(keys::TO_CURRENCY, "THB".to_string()), "THB");
    }

    #[test]
    fn test_remove_and_clear() {
        let (_dir, path) = temp_store();
        let mut store = LocalStore::open(&path).unwrap();
        store.set("a", &1).unwrap();
        store.set("b", &2).unwrap();

        assert!(store.remove("a").unwrap());
        assert!(!store.remove("a").unwrap());
        assert!(store.contains("b"));

        store.clear().unwrap();
        let reopened = LocalStore::open(&path).unwrap();
        assert_eq!(reopened.keys().count(), 0);
    }

    #[test]
    fn test_creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("deeper").join(STORE_FILE_NAME);
        let mut store = LocalStore::open(&path).unwrap();
        store.set("k", "v").unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_rejects_invalid_json() {
        let (_dir, path) = temp_store();
        fs::write(&path, "not json").unwrap();
        assert_eq!(
            LocalStore::open(&path).unwrap_err().error_code(),
            "SERIALIZATION_ERROR"
        );
    }

    #[test]
    fn test_rejects_incompatible_version() {
        let (_dir, path) = temp_store();
        fs::write(
            &path,
            r#"{"version":"1.0.0","modified":"2025-01-01T00:00:00Z","entries":{}}"#,
        )
        .unwrap();
        assert!(matches!(
            LocalStore::open(&path),
            Err(CalcError::VersionMismatch { .. })
        ));
    }

    #[test]
    fn test_version_validation() {
        assert!(validate_version(STORE_SCHEMA_VERSION).is_ok());
        assert!(validate_version("0.1.5").is_ok());
        assert!(validate_version("0.0.9").is_ok());
        assert!(validate_version("1.0.0").is_err());
        assert!(validate_version("0.2.0").is_err());
        assert!(validate_version("garbage").is_err());
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn test_lock_excludes_other_handles() {
        use fs2::FileExt;

        let (_dir, path) = temp_store();
        let guard = StoreLock::acquire(&path).unwrap();

        let other = File::open(lock_path_for(&path)).unwrap();
        assert!(other.try_lock_exclusive().is_err());

        drop(guard);
        assert!(other.try_lock_exclusive().is_ok());
    }
}
