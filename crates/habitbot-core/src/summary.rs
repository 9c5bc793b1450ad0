//! Weekly aggregation over the check-in ledger.
//!
//! Pure counting: a habit counts one day per calendar day it was logged,
//! whatever the numeric magnitude. No validation, no side effects.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::Result;
use crate::storage::{Store, WeekBucket};

/// user id -> habit id -> distinct days logged that week.
pub type WeekSummary = BTreeMap<String, BTreeMap<String, u32>>;

/// Summarize one week's bucket.
pub fn summarize_week(bucket: &WeekBucket) -> WeekSummary {
    let mut summary = WeekSummary::new();
    for (user_id, days) in bucket {
        let per_habit = summary.entry(user_id.clone()).or_default();
        for entries in days.values() {
            for entry in entries {
                *per_habit.entry(entry.habit_id.clone()).or_default() += 1;
            }
        }
    }
    summary
}

/// Summary for a week id, loaded fresh from the store.
pub fn summary_for(store: &Store, week_id: &str) -> Result<WeekSummary> {
    let ledger = store.load_ledger()?;
    Ok(ledger
        .get(week_id)
        .map(summarize_week)
        .unwrap_or_default())
}

/// Cumulative all-time totals for one user, feeding the leaderboard.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UserTotals {
    /// Summed numeric magnitudes per numeric habit (minutes, pages)
    pub amounts: BTreeMap<String, u64>,
    /// Day counts per habit
    pub days: BTreeMap<String, u32>,
}

/// All-time per-user totals across every stored week.
pub fn cumulative_totals(store: &Store) -> Result<BTreeMap<String, UserTotals>> {
    let ledger = store.load_ledger()?;
    let mut totals: BTreeMap<String, UserTotals> = BTreeMap::new();
    for bucket in ledger.values() {
        for (user_id, days) in bucket {
            let user = totals.entry(user_id.clone()).or_default();
            for entries in days.values() {
                for entry in entries {
                    *user.days.entry(entry.habit_id.clone()).or_default() += 1;
                    if let Some(value) = entry.value {
                        *user.amounts.entry(entry.habit_id.clone()).or_default() += value as u64;
                    }
                }
            }
        }
    }
    Ok(totals)
}
