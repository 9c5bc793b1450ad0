//! Check-in recording: validation, upsert, lazy week close-out.
//!
//! A check-in command is a list of habit tokens, each optionally
//! followed by a numeric value (numeric habits only), plus an optional
//! trailing day selector (weekday name and/or week offset) that applies
//! to every habit in the batch. Validation aborts the whole batch on
//! the first invalid token; nothing is partially recorded.

use chrono::NaiveDate;
use serde::Serialize;

use crate::catalog::{habit, HabitDefinition, HabitKind};
use crate::error::{CoreError, Result};
use crate::evaluator::{evaluate_week, EvaluationOutcome};
use crate::resolver::{unlock_level, unlocked_habits};
use crate::storage::ledger::{remove_entry, upsert_entry};
use crate::storage::{CheckInEntry, Store};
use crate::week::{parse_week_offset, parse_weekday, week_id, DaySelector};

/// A parsed check-in request: habits with optional explicit values,
/// and the day they apply to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckInRequest {
    pub habits: Vec<(&'static HabitDefinition, Option<u32>)>,
    pub selector: DaySelector,
}

/// A successfully recorded batch.
#[derive(Debug, Clone, Serialize)]
pub struct RecordedCheckIn {
    pub user_id: String,
    pub date: NaiveDate,
    pub week_id: String,
    pub entries: Vec<CheckInEntry>,
    /// Present when this write closed out a previous week
    pub evaluation: Option<EvaluationOutcome>,
}

/// Split the trailing day-selector tokens off a command's argument
/// list: at most one weekday name and one week offset, in either order.
pub fn split_selector(tokens: &[String]) -> (&[String], DaySelector) {
    let mut selector = DaySelector::default();
    let mut end = tokens.len();
    let mut saw_weekday = false;
    let mut saw_offset = false;
    while end > 0 {
        let token = &tokens[end - 1];
        if !saw_weekday {
            if let Some(day) = parse_weekday(token) {
                selector.weekday = Some(day);
                saw_weekday = true;
                end -= 1;
                continue;
            }
        }
        if !saw_offset {
            if let Some(offset) = parse_week_offset(token) {
                selector.week_offset = offset;
                saw_offset = true;
                end -= 1;
                continue;
            }
        }
        break;
    }
    (&tokens[..end], selector)
}

/// Parse and validate a check-in argument list against the catalog and
/// the current group rank. Fails on the first invalid token.
pub fn parse_request(tokens: &[String], rank_level: u32) -> Result<CheckInRequest> {
    let (habit_tokens, selector) = split_selector(tokens);
    if habit_tokens.is_empty() {
        return Err(CoreError::BadInput(
            "You need to specify at least one habit, e.g. `checkin meditation 40`".to_string(),
        ));
    }

    let unlocked = unlocked_habits(rank_level)?;
    let mut habits = Vec::new();
    let mut i = 0;
    while i < habit_tokens.len() {
        let name = habit_tokens[i].to_ascii_lowercase();
        let Some(definition) = habit(&name) else {
            return Err(CoreError::UnknownHabit(name));
        };
        if !unlocked.contains(&definition.id) {
            return Err(CoreError::LockedHabit {
                habit: definition.id.to_string(),
                unlocks_at: unlock_level(definition.id)?,
            });
        }

        let value = match definition.kind {
            HabitKind::Boolean => None,
            HabitKind::Numeric { min, max, unit } => {
                // a bare habit token falls back to the minimum
                let mut value = min;
                if i + 1 < habit_tokens.len() {
                    if let Ok(explicit) = habit_tokens[i + 1].parse::<u32>() {
                        value = explicit;
                        i += 1;
                    }
                }
                if value < min {
                    return Err(CoreError::BelowMinimum {
                        habit: definition.id.to_string(),
                        min,
                        unit,
                    });
                }
                if let Some(max) = max {
                    if value > max {
                        return Err(CoreError::AboveMaximum {
                            habit: definition.id.to_string(),
                            max,
                            unit,
                        });
                    }
                }
                Some(value)
            }
        };
        habits.push((definition, value));
        i += 1;
    }

    Ok(CheckInRequest { habits, selector })
}

/// Validate and record a check-in batch for `user_id`, filing each
/// entry under the week of the resolved date. After a successful write
/// the previous week is lazily closed out if this is the first activity
/// of a new week.
pub fn record_check_ins(
    store: &Store,
    user_id: &str,
    tokens: &[String],
    today: NaiveDate,
) -> Result<RecordedCheckIn> {
    let rank_level = store.load_rank()?;
    let request = parse_request(tokens, rank_level)?;

    let date = request.selector.resolve(today);
    let week = week_id(date);
    let day_iso = date.to_string();

    let entries: Vec<CheckInEntry> = request
        .habits
        .iter()
        .map(|(definition, value)| CheckInEntry::new(definition.id, *value))
        .collect();

    store.update_ledger(|ledger| {
        for entry in &entries {
            upsert_entry(ledger, &week, user_id, &day_iso, entry.clone());
        }
        Ok(())
    })?;

    let evaluation = maybe_close_out_week(store, today)?;

    Ok(RecordedCheckIn {
        user_id: user_id.to_string(),
        date,
        week_id: week,
        entries,
        evaluation,
    })
}

/// Remove a logged habit for the selected day. `NoData` when no entry
/// matches.
pub fn delete_check_in(
    store: &Store,
    user_id: &str,
    habit_id: &str,
    selector: DaySelector,
    today: NaiveDate,
) -> Result<NaiveDate> {
    let name = habit_id.to_ascii_lowercase();
    let Some(definition) = habit(&name) else {
        return Err(CoreError::UnknownHabit(name));
    };

    let date = selector.resolve(today);
    let week = week_id(date);
    let day_iso = date.to_string();

    let removed = store.update_ledger(|ledger| {
        Ok(remove_entry(ledger, &week, user_id, &day_iso, definition.id))
    })?;
    if !removed {
        return Err(CoreError::NoData(format!(
            "No {} entry found on {}",
            definition.id,
            date.format("%A, %d %b")
        )));
    }
    Ok(date)
}

/// Close out the previous week exactly once when the first write of a
/// new week arrives. The marker advances only after the evaluation
/// succeeds, so a failed evaluation is retried on the next write.
pub fn maybe_close_out_week(store: &Store, today: NaiveDate) -> Result<Option<EvaluationOutcome>> {
    let current = week_id(today);
    let meta = store.load_meta()?;
    let outcome = match meta.last_eval {
        Some(ref prev) if *prev != current => Some(evaluate_week(store, prev)?),
        Some(_) => return Ok(None),
        None => None,
    };
    store.update_meta(|m| {
        m.last_eval = Some(current.clone());
        Ok(())
    })?;
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluator::Verdict;
    use proptest::prelude::*;
    use tempfile::tempdir;

    fn tokens(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    // Thursday 2025-05-01; week id 2025-04-28
    fn thursday() -> NaiveDate {
        date(2025, 5, 1)
    }

    #[test]
    fn test_records_default_minimum() {
        let dir = tempdir().unwrap();
        let store = Store::at(dir.path());
        let recorded =
            record_check_ins(&store, "u1", &tokens(&["meditation"]), thursday()).unwrap();
        assert_eq!(recorded.week_id, "2025-04-28");
        assert_eq!(recorded.entries[0].value, Some(30));
    }

    #[test]
    fn test_records_explicit_value() {
        let dir = tempdir().unwrap();
        let store = Store::at(dir.path());
        let recorded =
            record_check_ins(&store, "u1", &tokens(&["meditation", "45"]), thursday()).unwrap();
        assert_eq!(recorded.entries[0].value, Some(45));
    }

    #[test]
    fn test_below_minimum_rejected() {
        let dir = tempdir().unwrap();
        let store = Store::at(dir.path());
        let err =
            record_check_ins(&store, "u1", &tokens(&["meditation", "10"]), thursday()).unwrap_err();
        assert!(matches!(err, CoreError::BelowMinimum { min: 30, .. }));
    }

    #[test]
    fn test_unknown_habit_rejected() {
        let dir = tempdir().unwrap();
        let store = Store::at(dir.path());
        let err =
            record_check_ins(&store, "u1", &tokens(&["skydiving"]), thursday()).unwrap_err();
        assert!(matches!(err, CoreError::UnknownHabit(_)));
    }

    #[test]
    fn test_locked_habit_names_unlocking_rank() {
        let dir = tempdir().unwrap();
        let store = Store::at(dir.path());
        // group is at rank 1; exercise unlocks at 2
        let err = record_check_ins(&store, "u1", &tokens(&["exercise"]), thursday()).unwrap_err();
        match err {
            CoreError::LockedHabit { habit, unlocks_at } => {
                assert_eq!(habit, "exercise");
                assert_eq!(unlocks_at, Some(2));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_never_ranked_habit_is_locked_without_level() {
        let dir = tempdir().unwrap();
        let store = Store::at(dir.path());
        store.save_rank(11).unwrap();
        let err = record_check_ins(&store, "u1", &tokens(&["pmo"]), thursday()).unwrap_err();
        assert!(matches!(
            err,
            CoreError::LockedHabit {
                unlocks_at: None,
                ..
            }
        ));
    }

    #[test]
    fn test_batch_aborts_without_partial_writes() {
        let dir = tempdir().unwrap();
        let store = Store::at(dir.path());
        store.save_rank(2).unwrap();
        let err = record_check_ins(
            &store,
            "u1",
            &tokens(&["meditation", "45", "skydiving"]),
            thursday(),
        )
        .unwrap_err();
        assert!(matches!(err, CoreError::UnknownHabit(_)));
        assert!(store.load_ledger().unwrap().is_empty());
    }

    #[test]
    fn test_multi_habit_batch_with_shared_selector() {
        let dir = tempdir().unwrap();
        let store = Store::at(dir.path());
        store.save_rank(2).unwrap();
        let recorded = record_check_ins(
            &store,
            "u1",
            &tokens(&["meditation", "50", "exercise", "monday"]),
            thursday(),
        )
        .unwrap();
        assert_eq!(recorded.date, date(2025, 4, 28));
        assert_eq!(recorded.entries.len(), 2);

        let ledger = store.load_ledger().unwrap();
        assert_eq!(ledger["2025-04-28"]["u1"]["2025-04-28"].len(), 2);
    }

    #[test]
    fn test_idempotent_repeat() {
        let dir = tempdir().unwrap();
        let store = Store::at(dir.path());
        let args = tokens(&["meditation", "45"]);
        record_check_ins(&store, "u1", &args, thursday()).unwrap();
        record_check_ins(&store, "u1", &args, thursday()).unwrap();

        let ledger = store.load_ledger().unwrap();
        let day = &ledger["2025-04-28"]["u1"]["2025-05-01"];
        assert_eq!(day.len(), 1);
        assert_eq!(day[0].value, Some(45));
    }

    #[test]
    fn test_replace_keeps_newest_value() {
        let dir = tempdir().unwrap();
        let store = Store::at(dir.path());
        record_check_ins(&store, "u1", &tokens(&["meditation", "30"]), thursday()).unwrap();
        record_check_ins(&store, "u1", &tokens(&["meditation", "60"]), thursday()).unwrap();

        let ledger = store.load_ledger().unwrap();
        let day = &ledger["2025-04-28"]["u1"]["2025-05-01"];
        assert_eq!(day.len(), 1);
        assert_eq!(day[0].value, Some(60));
    }

    #[test]
    fn test_last_friday_files_under_prior_week() {
        let dir = tempdir().unwrap();
        let store = Store::at(dir.path());
        // Monday of a new week, logging for last Friday
        let monday = date(2025, 5, 5);
        let recorded = record_check_ins(
            &store,
            "u1",
            &tokens(&["meditation", "friday", "last"]),
            monday,
        )
        .unwrap();
        assert_eq!(recorded.date, date(2025, 5, 2));
        assert_eq!(recorded.week_id, "2025-04-28");

        let ledger = store.load_ledger().unwrap();
        assert!(ledger["2025-04-28"]["u1"].contains_key("2025-05-02"));
        assert!(!ledger.contains_key("2025-05-05"));
    }

    #[test]
    fn test_first_write_of_new_week_evaluates_previous() {
        let dir = tempdir().unwrap();
        let store = Store::at(dir.path());
        store
            .update_meta(|m| {
                m.last_eval = Some("2025-04-21".to_string());
                Ok(())
            })
            .unwrap();

        let recorded =
            record_check_ins(&store, "u1", &tokens(&["meditation"]), thursday()).unwrap();
        let evaluation = recorded.evaluation.unwrap();
        assert_eq!(evaluation.week_id, "2025-04-21");
        // empty evaluated week holds
        assert_eq!(evaluation.verdict, Verdict::Held);
        assert_eq!(
            store.load_meta().unwrap().last_eval.as_deref(),
            Some("2025-04-28")
        );
    }

    #[test]
    fn test_same_week_write_does_not_reevaluate() {
        let dir = tempdir().unwrap();
        let store = Store::at(dir.path());
        let first = record_check_ins(&store, "u1", &tokens(&["meditation"]), thursday()).unwrap();
        assert!(first.evaluation.is_none());
        let second =
            record_check_ins(&store, "u1", &tokens(&["meditation", "40"]), thursday()).unwrap();
        assert!(second.evaluation.is_none());
    }

    #[test]
    fn test_delete_selected_day() {
        let dir = tempdir().unwrap();
        let store = Store::at(dir.path());
        record_check_ins(&store, "u1", &tokens(&["meditation", "monday"]), thursday()).unwrap();

        let removed = delete_check_in(
            &store,
            "u1",
            "meditation",
            DaySelector {
                weekday: Some(chrono::Weekday::Mon),
                week_offset: 0,
            },
            thursday(),
        )
        .unwrap();
        assert_eq!(removed, date(2025, 4, 28));

        let err = delete_check_in(
            &store,
            "u1",
            "meditation",
            DaySelector {
                weekday: Some(chrono::Weekday::Mon),
                week_offset: 0,
            },
            thursday(),
        )
        .unwrap_err();
        assert!(matches!(err, CoreError::NoData(_)));
    }

    #[test]
    fn test_split_selector_orders() {
        let toks = tokens(&["meditation", "45", "last", "friday"]);
        let (rest, sel) = split_selector(&toks);
        assert_eq!(rest.len(), 2);
        assert_eq!(sel.weekday, Some(chrono::Weekday::Fri));
        assert_eq!(sel.week_offset, -1);

        let toks = tokens(&["exercise", "friday", "last"]);
        let (rest, sel) = split_selector(&toks);
        assert_eq!(rest.len(), 1);
        assert_eq!(sel.weekday, Some(chrono::Weekday::Fri));
        assert_eq!(sel.week_offset, -1);

        let toks = tokens(&["exercise"]);
        let (rest, sel) = split_selector(&toks);
        assert_eq!(rest.len(), 1);
        assert_eq!(sel, DaySelector::default());
    }

    proptest! {
        // recording the same habit/day any number of times with any
        // in-range values leaves exactly one entry holding the last
        #[test]
        fn prop_replace_leaves_single_entry(values in proptest::collection::vec(30u32..300, 1..6)) {
            let dir = tempdir().unwrap();
            let store = Store::at(dir.path());
            for v in &values {
                record_check_ins(
                    &store,
                    "u1",
                    &tokens(&["meditation", &v.to_string()]),
                    thursday(),
                )
                .unwrap();
            }
            let ledger = store.load_ledger().unwrap();
            let day = &ledger["2025-04-28"]["u1"]["2025-05-01"];
            prop_assert_eq!(day.len(), 1);
            prop_assert_eq!(day[0].value, Some(*values.last().unwrap()));
        }
    }
}
