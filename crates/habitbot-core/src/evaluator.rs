//! Group rank evaluation at week boundaries.
//!
//! The whole group shares one rank. When a completed week is evaluated:
//! promote if every participating user met every required target,
//! demote if every participating user missed at least one, hold
//! otherwise. A week with no participants holds — both "all met" and
//! "all missed" are vacuously true over an empty set, and promoting on
//! an idle week is exactly the bug this guard exists for.

use serde::Serialize;

use crate::catalog::{rank, top_level, RankDefinition, Task};
use crate::error::{CoreError, Result};
use crate::resolver::{effective_targets, latest_tasks};
use crate::storage::Store;
use crate::summary::summary_for;

/// What an evaluation decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Promoted,
    Demoted,
    Held,
}

/// Result of evaluating one completed week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EvaluationOutcome {
    pub week_id: String,
    pub old_level: u32,
    pub new_level: u32,
    pub verdict: Verdict,
}

/// Evaluate the group's performance for `week_id` and persist any rank
/// change. Requirements are the effective targets at the rank held when
/// the week is evaluated.
pub fn evaluate_week(store: &Store, week_id: &str) -> Result<EvaluationOutcome> {
    let old_level = store.load_rank()?;
    let summary = summary_for(store, week_id)?;
    let requirements = effective_targets(old_level)?;

    let held = EvaluationOutcome {
        week_id: week_id.to_string(),
        old_level,
        new_level: old_level,
        verdict: Verdict::Held,
    };

    // no participants, no movement
    if summary.is_empty() {
        return Ok(held);
    }

    let met_all = |habits: &std::collections::BTreeMap<String, u32>| {
        requirements
            .iter()
            .all(|(habit_id, target)| habits.get(*habit_id).copied().unwrap_or(0) >= target.count)
    };

    let everyone_met = summary.values().all(met_all);
    let everyone_missed_one = summary.values().all(|habits| !met_all(habits));

    let outcome = if everyone_met && old_level < top_level()? {
        EvaluationOutcome {
            new_level: old_level + 1,
            verdict: Verdict::Promoted,
            ..held
        }
    } else if everyone_missed_one && old_level > 1 {
        EvaluationOutcome {
            new_level: old_level - 1,
            verdict: Verdict::Demoted,
            ..held
        }
    } else {
        held
    };

    if outcome.new_level != old_level {
        store.save_rank(outcome.new_level)?;
    }
    Ok(outcome)
}

/// Manually promote the group one rank.
pub fn promote(store: &Store) -> Result<u32> {
    let level = store.load_rank()?;
    if level >= top_level()? {
        return Err(CoreError::RankLimit { at_top: true });
    }
    store.save_rank(level + 1)?;
    Ok(level + 1)
}

/// Manually demote the group one rank.
pub fn demote(store: &Store) -> Result<u32> {
    let level = store.load_rank()?;
    if level <= 1 {
        return Err(CoreError::RankLimit { at_top: false });
    }
    store.save_rank(level - 1)?;
    Ok(level - 1)
}

/// The next rank and its cumulative challenge, or None at the top.
pub fn next_challenge(level: u32) -> Result<Option<(&'static RankDefinition, Vec<&'static Task>)>> {
    if level >= top_level()? {
        return Ok(None);
    }
    let Some(next) = rank(level + 1)? else {
        return Ok(None);
    };
    Ok(Some((next, latest_tasks(level + 1)?)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::ledger::upsert_entry;
    use crate::storage::{CheckInEntry, Ledger};
    use tempfile::tempdir;

    const WEEK: &str = "2025-04-28";

    fn seed_days(store: &Store, user: &str, habit: &str, days: &[u32]) {
        let monday = chrono::NaiveDate::parse_from_str(WEEK, "%Y-%m-%d").unwrap();
        store
            .update_ledger(|ledger: &mut Ledger| {
                for d in days {
                    let day = (monday + chrono::Duration::days(*d as i64 - 1)).to_string();
                    upsert_entry(ledger, WEEK, user, &day, CheckInEntry::new(habit, None));
                }
                Ok(())
            })
            .unwrap();
    }

    #[test]
    fn test_empty_week_holds_rank() {
        let dir = tempdir().unwrap();
        let store = Store::at(dir.path());
        store.save_rank(3).unwrap();

        let outcome = evaluate_week(&store, WEEK).unwrap();
        assert_eq!(outcome.verdict, Verdict::Held);
        assert_eq!(store.load_rank().unwrap(), 3);
    }

    #[test]
    fn test_everyone_met_promotes() {
        let dir = tempdir().unwrap();
        let store = Store::at(dir.path());
        store.save_rank(2).unwrap();
        // rank 2 requires meditation (7 days, default) and exercise (4 days)
        seed_days(&store, "u1", "meditation", &[1, 2, 3, 4, 5, 6, 7]);
        seed_days(&store, "u1", "exercise", &[1, 3, 5, 7]);
        seed_days(&store, "u2", "meditation", &[1, 2, 3, 4, 5, 6, 7]);
        seed_days(&store, "u2", "exercise", &[1, 2, 3, 4, 5]);

        let outcome = evaluate_week(&store, WEEK).unwrap();
        assert_eq!(outcome.verdict, Verdict::Promoted);
        assert_eq!(outcome.new_level, 3);
        assert_eq!(store.load_rank().unwrap(), 3);
    }

    #[test]
    fn test_everyone_missed_demotes() {
        let dir = tempdir().unwrap();
        let store = Store::at(dir.path());
        store.save_rank(2).unwrap();
        seed_days(&store, "u1", "meditation", &[1, 2]);
        seed_days(&store, "u2", "exercise", &[1]);

        let outcome = evaluate_week(&store, WEEK).unwrap();
        assert_eq!(outcome.verdict, Verdict::Demoted);
        assert_eq!(store.load_rank().unwrap(), 1);
    }

    #[test]
    fn test_mixed_results_hold() {
        let dir = tempdir().unwrap();
        let store = Store::at(dir.path());
        store.save_rank(2).unwrap();
        // u1 meets everything, u2 does not
        seed_days(&store, "u1", "meditation", &[1, 2, 3, 4, 5, 6, 7]);
        seed_days(&store, "u1", "exercise", &[1, 2, 3, 4]);
        seed_days(&store, "u2", "meditation", &[1]);

        let outcome = evaluate_week(&store, WEEK).unwrap();
        assert_eq!(outcome.verdict, Verdict::Held);
        assert_eq!(store.load_rank().unwrap(), 2);
    }

    #[test]
    fn test_no_promotion_past_top() {
        let dir = tempdir().unwrap();
        let store = Store::at(dir.path());
        let top = top_level().unwrap();
        store.save_rank(top).unwrap();
        // a single user meeting every requirement at the top rank
        for (habit_id, target) in effective_targets(top).unwrap() {
            seed_days(
                &store,
                "u1",
                habit_id,
                &(1..=target.count).collect::<Vec<_>>(),
            );
        }

        let outcome = evaluate_week(&store, WEEK).unwrap();
        assert_eq!(outcome.verdict, Verdict::Held);
        assert_eq!(store.load_rank().unwrap(), top);
    }

    #[test]
    fn test_no_demotion_below_one() {
        let dir = tempdir().unwrap();
        let store = Store::at(dir.path());
        seed_days(&store, "u1", "meditation", &[1]);

        let outcome = evaluate_week(&store, WEEK).unwrap();
        assert_eq!(outcome.verdict, Verdict::Held);
        assert_eq!(store.load_rank().unwrap(), 1);
    }

    #[test]
    fn test_manual_promote_demote_bounds() {
        let dir = tempdir().unwrap();
        let store = Store::at(dir.path());
        assert!(matches!(
            demote(&store),
            Err(CoreError::RankLimit { at_top: false })
        ));
        assert_eq!(promote(&store).unwrap(), 2);
        store.save_rank(top_level().unwrap()).unwrap();
        assert!(matches!(
            promote(&store),
            Err(CoreError::RankLimit { at_top: true })
        ));
    }

    #[test]
    fn test_next_challenge_preview() {
        let (next, tasks) = next_challenge(2).unwrap().unwrap();
        assert_eq!(next.level, 3);
        assert!(tasks.iter().any(|t| t.habit_id == "reading"));
        assert!(next_challenge(top_level().unwrap()).unwrap().is_none());
    }
}
