//! Mid-week risk classification for weekly targets.
//!
//! Strictly a status-at-a-glance heuristic: rank evaluation never reads
//! it. Daily habits (target 7) are judged against elapsed days; other
//! habits against whether the remaining target still fits in the days
//! left.

use serde::Serialize;

/// How likely a weekly target is to be missed, judged mid-week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Risk {
    None,
    Low,
    Medium,
    High,
}

/// Per-user rollup of habit risks; the worst habit wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UserStatus {
    Tracking,
    AtRisk,
    Behind,
}

impl UserStatus {
    /// Status-line phrasing used by the daily digest.
    pub fn display(&self) -> &'static str {
        match self {
            UserStatus::Tracking => "✅ tracking",
            UserStatus::AtRisk => "⚠️ at risk",
            UserStatus::Behind => "❌ behind",
        }
    }
}

/// Classify one habit's weekly progress.
///
/// `days_elapsed` includes today; `days_remaining` is `7 - days_elapsed`.
pub fn classify(completed: u32, target: u32, days_elapsed: u32, days_remaining: u32) -> Risk {
    if completed >= target {
        return Risk::None;
    }
    let is_daily = target == 7;
    if is_daily {
        // missing a prior day entirely is unrecoverable for a daily habit
        if (completed as i64) < days_elapsed as i64 - 1 {
            Risk::High
        } else if completed < days_elapsed {
            Risk::Medium
        } else {
            Risk::None
        }
    } else {
        let remaining = target - completed;
        if remaining > days_remaining {
            Risk::High
        } else if remaining == days_remaining {
            Risk::Medium
        } else {
            Risk::Low
        }
    }
}

/// Worst-wins rollup across a user's habit risks.
pub fn rollup(risks: impl IntoIterator<Item = Risk>) -> UserStatus {
    let mut status = UserStatus::Tracking;
    for risk in risks {
        match risk {
            Risk::High => return UserStatus::Behind,
            Risk::Medium => status = UserStatus::AtRisk,
            Risk::Low | Risk::None => {}
        }
    }
    status
}
