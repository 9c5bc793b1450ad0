//! Progress/target resolution over the rank ladder.
//!
//! The challenge at rank L is cumulative: every task from ranks 1..=L
//! applies, and when the same habit appears more than once the
//! latest-appearing task wins. That includes two tasks for one habit
//! inside a single rank: the literal last occurrence in scan order
//! decides, with no smarter merge.

use serde::Serialize;

use crate::catalog::{habit, rank_catalog, RankDefinition, TargetSpec, Task};
use crate::error::Result;

/// Where an effective weekly target came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetSource {
    /// An explicit "Ndays" task
    Days,
    /// The habit definition's default weekly target
    Default,
}

/// Effective weekly day-count target for an unlocked habit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EffectiveTarget {
    pub count: u32,
    pub source: TargetSource,
}

/// Habit ids unlocked at `level`, in first-seen order across ranks
/// 1..=level with duplicates collapsed.
pub fn unlocked_habits(level: u32) -> Result<Vec<&'static str>> {
    Ok(unlocked_in(rank_catalog()?, level))
}

fn unlocked_in(ranks: &[RankDefinition], level: u32) -> Vec<&str> {
    let mut seen = Vec::new();
    for rank in ranks.iter().filter(|r| r.level <= level) {
        for task in &rank.tasks {
            if !seen.contains(&task.habit_id) {
                seen.push(task.habit_id);
            }
        }
    }
    seen
}

/// Latest-overriding task per habit at `level`, in first-seen habit
/// order.
pub fn latest_tasks(level: u32) -> Result<Vec<&'static Task>> {
    Ok(latest_tasks_in(rank_catalog()?, level))
}

fn latest_tasks_in(ranks: &[RankDefinition], level: u32) -> Vec<&Task> {
    // first-seen habit order, latest task per habit
    let mut latest: Vec<(&str, &Task)> = Vec::new();
    for rank in ranks.iter().filter(|r| r.level <= level) {
        for task in &rank.tasks {
            match latest.iter_mut().find(|(id, _)| *id == task.habit_id) {
                Some(slot) => slot.1 = task,
                None => latest.push((task.habit_id, task)),
            }
        }
    }
    latest.into_iter().map(|(_, task)| task).collect()
}

/// Effective weekly targets at `level`: each unlocked habit paired with
/// its day-count target. A "Ndays" task gives the count directly; an
/// amount task (per-occurrence minimum) falls back to the habit's
/// default weekly target.
pub fn effective_targets(level: u32) -> Result<Vec<(&'static str, EffectiveTarget)>> {
    Ok(effective_targets_in(rank_catalog()?, level))
}

fn effective_targets_in(ranks: &[RankDefinition], level: u32) -> Vec<(&str, EffectiveTarget)> {
    latest_tasks_in(ranks, level)
        .into_iter()
        .map(|task| {
            let target = match task.target {
                TargetSpec::Days(count) => EffectiveTarget {
                    count,
                    source: TargetSource::Days,
                },
                TargetSpec::Amount { .. } => EffectiveTarget {
                    count: habit(task.habit_id)
                        .map(|h| h.weekly_target())
                        .unwrap_or(7),
                    source: TargetSource::Default,
                },
            };
            (task.habit_id, target)
        })
        .collect()
}

/// Effective target for one habit at `level`, if unlocked.
pub fn effective_target(level: u32, habit_id: &str) -> Result<Option<EffectiveTarget>> {
    Ok(effective_targets(level)?
        .into_iter()
        .find(|(id, _)| *id == habit_id)
        .map(|(_, t)| t))
}

/// First rank whose tasks mention the habit; None when no rank ever
/// requires it.
pub fn unlock_level(habit_id: &str) -> Result<Option<u32>> {
    Ok(rank_catalog()?
        .iter()
        .find(|r| r.tasks.iter().any(|t| t.habit_id == habit_id))
        .map(|r| r.level))
}

/// The latest-overriding task for a habit at `level`, if unlocked.
pub fn latest_task(level: u32, habit_id: &str) -> Result<Option<&'static Task>> {
    Ok(latest_tasks(level)?
        .into_iter()
        .find(|t| t.habit_id == habit_id))
}
