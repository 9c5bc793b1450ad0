//! Rank definitions.
//!
//! Ranks form a contiguous ladder; the group's challenge at rank L is
//! the cumulative set of tasks from ranks 1..=L, with later tasks for
//! the same habit overriding earlier ones. Target specs are written as
//! `"Ndays"` (weekly day count) or `"Nunits"` (per-occurrence minimum,
//! e.g. `"30min"`, `"10pages"`).

use std::sync::OnceLock;

use serde::Serialize;

use crate::catalog::habits::habit;
use crate::error::{ConfigError, Result};

/// Parsed form of a task target string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetSpec {
    /// Habit must be done on this many distinct days that week
    Days(u32),
    /// Per-occurrence minimum in the given unit; weekly counting falls
    /// back to the habit's default target
    Amount { value: u32, unit: &'static str },
}

impl TargetSpec {
    fn parse(level: u32, habit_id: &'static str, raw: &'static str) -> Result<Self, ConfigError> {
        let digits: String = raw.chars().take_while(|c| c.is_ascii_digit()).collect();
        let suffix = &raw[digits.len()..];
        let bad = || ConfigError::BadTargetSpec {
            level,
            habit: habit_id.to_string(),
            target: raw.to_string(),
        };
        let value: u32 = digits.parse().map_err(|_| bad())?;
        if suffix.is_empty() || !suffix.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(bad());
        }
        if suffix == "days" {
            Ok(TargetSpec::Days(value))
        } else {
            Ok(TargetSpec::Amount { value, unit: suffix })
        }
    }
}

impl std::fmt::Display for TargetSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TargetSpec::Days(n) => write!(f, "{n}days"),
            TargetSpec::Amount { value, unit } => write!(f, "{value}{unit}"),
        }
    }
}

/// One (habit, target) requirement within a rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Task {
    pub habit_id: &'static str,
    pub target: TargetSpec,
}

/// A single rung of the rank ladder.
#[derive(Debug, Clone, Serialize)]
pub struct RankDefinition {
    /// 1-based level, contiguous across the catalog
    pub level: u32,
    pub name: &'static str,
    pub tasks: Vec<Task>,
}

// Raw catalog in (level, name, [(habit, target)]) form, mirroring how
// the challenge ladder is maintained.
const RAW_RANKS: &[(u32, &str, &[(&str, &str)])] = &[
    (1, "rank 1", &[("meditation", "30min")]),
    (2, "rank 2", &[("exercise", "4days")]),
    (3, "rank 3", &[("reading", "10pages")]),
    (4, "rank 4", &[("walking", "4days")]),
    (5, "rank 5", &[("porn", "7days"), ("journaling", "7days")]),
    (6, "rank 6", &[("reading", "12pages")]),
    (7, "rank 7", &[("diet", "7days")]),
    // weekdays only
    (8, "rank 8", &[("bedtime", "5days")]),
    (9, "rank 9", &[("digitaldetox", "15min")]),
    // weekdays only
    (10, "rank 10", &[("streaming", "5days")]),
    (11, "rank 11", &[("meditation", "45min")]),
];

fn build_catalog() -> Result<Vec<RankDefinition>, ConfigError> {
    let mut out = Vec::with_capacity(RAW_RANKS.len());
    for (position, (level, name, raw_tasks)) in RAW_RANKS.iter().enumerate() {
        if *level != position as u32 + 1 {
            return Err(ConfigError::NonContiguousLevels {
                found: *level,
                position,
            });
        }
        let mut tasks = Vec::with_capacity(raw_tasks.len());
        for (habit_id, target) in raw_tasks.iter() {
            if habit(habit_id).is_none() {
                return Err(ConfigError::UnknownHabitInRank {
                    level: *level,
                    habit: habit_id.to_string(),
                });
            }
            tasks.push(Task {
                habit_id,
                target: TargetSpec::parse(*level, habit_id, target)?,
            });
        }
        out.push(RankDefinition {
            level: *level,
            name,
            tasks,
        });
    }
    Ok(out)
}

static RANKS: OnceLock<Vec<RankDefinition>> = OnceLock::new();

/// The validated rank ladder. The first call parses and validates the
/// raw catalog; an unknown habit or malformed target is fatal.
pub fn rank_catalog() -> Result<&'static [RankDefinition]> {
    if let Some(ranks) = RANKS.get() {
        return Ok(ranks.as_slice());
    }
    let built = build_catalog()?;
    Ok(RANKS.get_or_init(|| built).as_slice())
}

/// Look up a rank by level.
pub fn rank(level: u32) -> Result<Option<&'static RankDefinition>> {
    Ok(rank_catalog()?.iter().find(|r| r.level == level))
}

/// Highest level in the ladder.
pub fn top_level() -> Result<u32> {
    Ok(rank_catalog()?.len() as u32)
}
