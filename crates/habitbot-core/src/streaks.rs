//! Consecutive-day streak computation.
//!
//! Streaks are derived on demand from the stored ledger over a bounded
//! lookback window; nothing is persisted. The current streak anchors at
//! today with no grace period: a day without a record breaks it
//! immediately, even if yesterday closed a long run.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{Duration, NaiveDate};
use serde::Serialize;

use crate::error::Result;
use crate::storage::Store;
use crate::week::LOOKBACK_DAYS;

/// Current and best consecutive-day runs for one habit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Streak {
    /// Run of logged days ending at today; 0 when today is unlogged
    pub current: u32,
    /// Longest run anywhere in the lookback window
    pub best: u32,
}

/// Streaks per habit for one user, over the 90-day window ending at
/// `today`. Habits with no logged day in the window are omitted.
pub fn streaks_for(store: &Store, user_id: &str, today: NaiveDate) -> Result<BTreeMap<String, Streak>> {
    let ledger = store.load_ledger()?;
    let window_start = today - Duration::days(LOOKBACK_DAYS - 1);

    // (habit, date) pairs logged by this user inside the window
    let mut logged: BTreeMap<String, BTreeSet<NaiveDate>> = BTreeMap::new();
    for bucket in ledger.values() {
        let Some(days) = bucket.get(user_id) else {
            continue;
        };
        for (day_iso, entries) in days {
            let Ok(date) = NaiveDate::parse_from_str(day_iso, "%Y-%m-%d") else {
                continue;
            };
            if date < window_start || date > today {
                continue;
            }
            for entry in entries {
                logged.entry(entry.habit_id.clone()).or_default().insert(date);
            }
        }
    }

    let mut out = BTreeMap::new();
    for (habit_id, dates) in logged {
        let streak = compute_streak(&dates, today);
        if streak.current > 0 || streak.best > 0 {
            out.insert(habit_id, streak);
        }
    }
    Ok(out)
}

fn compute_streak(dates: &BTreeSet<NaiveDate>, today: NaiveDate) -> Streak {
    let mut current = 0u32;
    let mut best = 0u32;
    let mut run = 0u32;
    // walk the window most-recent-first so the leading run is "current"
    for offset in 0..LOOKBACK_DAYS {
        let day = today - Duration::days(offset);
        if dates.contains(&day) {
            run += 1;
            if offset as u32 + 1 == run {
                current = run;
            }
            best = best.max(run);
        } else {
            run = 0;
        }
    }
    Streak { current, best }
}
