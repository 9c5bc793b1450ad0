//! Check-in ledger: week id -> user id -> day -> recorded entries.
//!
//! Entries are structured records rather than the `"habit:123"` string
//! tokens of earlier revisions; the semantic content is identical.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::storage::Store;

/// One recorded habit completion for a user on a day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckInEntry {
    pub habit_id: String,
    /// Numeric magnitude for numeric habits; None for boolean ones
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<u32>,
}

impl CheckInEntry {
    pub fn new(habit_id: impl Into<String>, value: Option<u32>) -> Self {
        Self {
            habit_id: habit_id.into(),
            value,
        }
    }
}

/// Days within one week for one user: day ISO date -> entries.
pub type UserWeek = BTreeMap<String, Vec<CheckInEntry>>;

/// One week's bucket: user id -> days.
pub type WeekBucket = BTreeMap<String, UserWeek>;

/// Full ledger: week id -> bucket.
pub type Ledger = BTreeMap<String, WeekBucket>;

const LEDGER_FILE: &str = "progress.json";

impl Store {
    /// Load the full check-in ledger, fresh from disk.
    pub fn load_ledger(&self) -> Result<Ledger> {
        self.load_json(LEDGER_FILE)
    }

    /// Load-modify-save the ledger under the store lock.
    pub fn update_ledger<R>(&self, f: impl FnOnce(&mut Ledger) -> Result<R>) -> Result<R> {
        self.update(LEDGER_FILE, f)
    }
}

/// Replace any existing entries for the same habit on the same day with
/// the new entry. Returns true when a prior entry was replaced.
pub fn upsert_entry(
    ledger: &mut Ledger,
    week_id: &str,
    user_id: &str,
    day_iso: &str,
    entry: CheckInEntry,
) -> bool {
    let day = ledger
        .entry(week_id.to_string())
        .or_default()
        .entry(user_id.to_string())
        .or_default()
        .entry(day_iso.to_string())
        .or_default();
    let before = day.len();
    day.retain(|e| e.habit_id != entry.habit_id);
    let replaced = day.len() < before;
    day.push(entry);
    replaced
}

/// Remove the entry for a habit on a day. Empty day and user maps are
/// pruned. Returns true when something was removed.
pub fn remove_entry(
    ledger: &mut Ledger,
    week_id: &str,
    user_id: &str,
    day_iso: &str,
    habit_id: &str,
) -> bool {
    let Some(bucket) = ledger.get_mut(week_id) else {
        return false;
    };
    let Some(user_week) = bucket.get_mut(user_id) else {
        return false;
    };
    let Some(day) = user_week.get_mut(day_iso) else {
        return false;
    };
    let before = day.len();
    day.retain(|e| e.habit_id != habit_id);
    let removed = day.len() < before;
    if day.is_empty() {
        user_week.remove(day_iso);
    }
    if user_week.is_empty() {
        bucket.remove(user_id);
    }
    removed
}
