//! Evaluation and reminder metadata (`meta.json`).

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::storage::Store;

/// Process-wide bookkeeping: the last week id the automatic evaluator
/// closed out, and which users opted into daily reminders.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Meta {
    /// Week id (Monday ISO date) last handled by automatic evaluation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_eval: Option<String>,
    #[serde(default)]
    pub reminder_users: Vec<String>,
}

const META_FILE: &str = "meta.json";

impl Store {
    pub fn load_meta(&self) -> Result<Meta> {
        self.load_json(META_FILE)
    }

    pub fn update_meta<R>(&self, f: impl FnOnce(&mut Meta) -> Result<R>) -> Result<R> {
        self.update(META_FILE, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_meta_defaults_empty() {
        let dir = tempdir().unwrap();
        let store = Store::at(dir.path());
        let meta = store.load_meta().unwrap();
        assert!(meta.last_eval.is_none());
        assert!(meta.reminder_users.is_empty());
    }

    #[test]
    fn test_last_eval_round_trips() {
        let dir = tempdir().unwrap();
        let store = Store::at(dir.path());
        store
            .update_meta(|m| {
                m.last_eval = Some("2025-04-28".to_string());
                Ok(())
            })
            .unwrap();
        assert_eq!(
            store.load_meta().unwrap().last_eval.as_deref(),
            Some("2025-04-28")
        );
    }
}
