//! Flat-file key-value persistence.
//!
//! Four JSON files live under the data directory: the check-in ledger
//! (`progress.json`), the group rank (`rank.json`), the evaluation/
//! reminder metadata (`meta.json`) and the reaction-post index
//! (`checkin_posts.json`), plus the TOML app config (`config.toml`).
//!
//! Read paths always load fresh from disk; mutations go through
//! `update`, which holds a store-level lock across the whole
//! load-modify-save so overlapping writers cannot drop each other's
//! changes.

mod config;
pub(crate) mod ledger;
mod meta;
mod posts;
mod rank;

pub use config::{AiConfig, Config, JobTime};
pub use ledger::{CheckInEntry, Ledger, UserWeek, WeekBucket};
pub use meta::Meta;
pub use posts::PostIndex;

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::Result;

/// Returns `~/.config/habitbot[-dev]/` based on HABITBOT_ENV.
///
/// Set HABITBOT_ENV=dev to use the development data directory.
pub fn data_dir() -> Result<PathBuf> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("HABITBOT_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("habitbot-dev")
    } else {
        base_dir.join("habitbot")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// Handle on the flat-file store.
pub struct Store {
    dir: PathBuf,
    // Serializes every read-modify-write cycle.
    write_lock: Mutex<()>,
}

impl Store {
    /// Open the store at the default data directory.
    pub fn open() -> Result<Self> {
        Ok(Self::at(data_dir()?))
    }

    /// Open a store rooted at an explicit directory (tests, dev tooling).
    pub fn at(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }

    fn load_json<T: DeserializeOwned + Default>(&self, name: &str) -> Result<T> {
        let path = self.path(name);
        if !path.exists() {
            return Ok(T::default());
        }
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    fn save_json<T: Serialize>(&self, name: &str, value: &T) -> Result<()> {
        std::fs::create_dir_all(&self.dir)?;
        let text = serde_json::to_string_pretty(value)?;
        std::fs::write(self.path(name), text)?;
        Ok(())
    }

    /// Atomically (per call) load, mutate and save one JSON file.
    fn update<T, R, F>(&self, name: &str, f: F) -> Result<R>
    where
        T: DeserializeOwned + Serialize + Default,
        F: FnOnce(&mut T) -> Result<R>,
    {
        let _guard = self
            .write_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let mut value: T = self.load_json(name)?;
        let result = f(&mut value)?;
        self.save_json(name, &value)?;
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_loads_default() {
        let dir = tempdir().unwrap();
        let store = Store::at(dir.path());
        let ledger: Ledger = store.load_json("progress.json").unwrap();
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_update_round_trips() {
        let dir = tempdir().unwrap();
        let store = Store::at(dir.path());
        store
            .update("meta.json", |m: &mut Meta| {
                m.reminder_users.push("u1".to_string());
                Ok(())
            })
            .unwrap();
        let meta: Meta = store.load_json("meta.json").unwrap();
        assert_eq!(meta.reminder_users, vec!["u1".to_string()]);
    }
}
