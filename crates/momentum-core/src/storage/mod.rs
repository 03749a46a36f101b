mod config;
pub mod database;

pub use config::{Config, DisplayConfig, LoggingConfig, StorageConfig, WatchConfig};
pub use database::Database;

use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::error::{CoreError, DatabaseError};

/// Returns the Momentum data directory, creating it if needed.
///
/// Resolution order:
/// - `MOMENTUM_HOME`, used verbatim
/// - `~/.config/momentum-dev/` when `MOMENTUM_ENV=dev`
/// - `~/.config/momentum/`
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, CoreError> {
    let dir = match std::env::var_os("MOMENTUM_HOME") {
        Some(home) if !home.is_empty() => PathBuf::from(home),
        _ => {
            let base_dir = dirs::home_dir()
                .ok_or(CoreError::NoDataDir)?
                .join(".config");
            let env = std::env::var("MOMENTUM_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("momentum-dev")
            } else {
                base_dir.join("momentum")
            }
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// A flat string key-value medium.
///
/// No queries: each `set` is a full overwrite of one key. Failures of the
/// medium are returned as-is; callers decide whether to swallow them.
pub trait KvStore {
    fn get(&self, key: &str) -> Result<Option<String>, DatabaseError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), DatabaseError>;
    /// Write several keys as one unit.
    ///
    /// The default writes key by key and can stop partway; media with
    /// transactions override it.
    fn set_many(&mut self, entries: &[(&str, String)]) -> Result<(), DatabaseError> {
        for (key, value) in entries {
            self.set(key, value)?;
        }
        Ok(())
    }
    /// Drop every key.
    fn clear(&mut self) -> Result<(), DatabaseError>;
}

/// Volatile in-process store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KvStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, DatabaseError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), DatabaseError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn clear(&mut self) -> Result<(), DatabaseError> {
        self.entries.clear();
        Ok(())
    }
}

impl<T: KvStore + ?Sized> KvStore for &mut T {
    fn get(&self, key: &str) -> Result<Option<String>, DatabaseError> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), DatabaseError> {
        (**self).set(key, value)
    }

    fn set_many(&mut self, entries: &[(&str, String)]) -> Result<(), DatabaseError> {
        (**self).set_many(entries)
    }

    fn clear(&mut self) -> Result<(), DatabaseError> {
        (**self).clear()
    }
}
