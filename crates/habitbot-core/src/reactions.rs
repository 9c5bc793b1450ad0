//! Reaction-based quick check-ins.
//!
//! One message per day lists the unlocked habits with an emoji each;
//! reacting logs the default (minimum) entry for the post's date, and
//! removing the reaction undoes it. A value entered via the check-in
//! command always wins over the reaction default: adding a reaction on
//! top of a custom value is a no-op, and removing one never deletes a
//! custom value.

use chrono::NaiveDate;
use serde::Serialize;

use crate::catalog::{habit, HabitDefinition, HabitKind};
use crate::checkin::maybe_close_out_week;
use crate::error::{CoreError, Result};
use crate::evaluator::EvaluationOutcome;
use crate::resolver::unlocked_habits;
use crate::storage::ledger::{remove_entry, upsert_entry};
use crate::storage::{CheckInEntry, Store};
use crate::week::week_id;

const EMOJI_MAP: &[(&str, &str)] = &[
    ("meditation", "🧘"),
    ("reading", "📖"),
    ("journaling", "📝"),
    ("exercise", "🏃"),
    ("walking", "🚶"),
    ("diet", "🍽️"),
    ("bedtime", "🌙"),
    ("digitaldetox", "📵"),
    // no PMO
    ("porn", "🍑"),
    // no streaming
    ("streaming", "📺"),
];

/// Emoji for a habit, if it has one.
pub fn emoji_for(habit_id: &str) -> Option<&'static str> {
    EMOJI_MAP
        .iter()
        .find(|(id, _)| *id == habit_id)
        .map(|(_, emoji)| *emoji)
}

/// Habit mapped to an emoji, if any.
pub fn habit_for_emoji(emoji: &str) -> Option<&'static str> {
    EMOJI_MAP
        .iter()
        .find(|(_, e)| *e == emoji)
        .map(|(id, _)| *id)
}

/// One line of the daily check-in post.
#[derive(Debug, Clone, Serialize)]
pub struct PostLine {
    pub habit_id: &'static str,
    pub emoji: &'static str,
    pub label: &'static str,
    /// Default minimum for numeric habits, shown as "min N <unit>"
    pub minimum: Option<u32>,
    pub unit: &'static str,
}

/// Lines for the daily post: habits unlocked at the current rank that
/// have an emoji mapping, in emoji-map order.
pub fn daily_post_lines(store: &Store) -> Result<Vec<PostLine>> {
    let rank_level = store.load_rank()?;
    let unlocked = unlocked_habits(rank_level)?;
    Ok(EMOJI_MAP
        .iter()
        .filter(|(id, _)| unlocked.contains(id))
        .filter_map(|(id, emoji)| {
            habit(id).map(|definition| PostLine {
                habit_id: definition.id,
                emoji,
                label: definition.label,
                minimum: definition.min_value(),
                unit: definition.unit(),
            })
        })
        .collect())
}

/// What handling a reaction event did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReactionOutcome {
    /// Default entry recorded for the post's date
    Recorded {
        habit_id: String,
        date: NaiveDate,
        evaluation: Option<EvaluationOutcome>,
    },
    /// Default entry removed for the post's date
    Removed { habit_id: String, date: NaiveDate },
    /// A command-entered custom value exists; reaction left it alone
    CustomValueKept { habit_id: String, date: NaiveDate },
    /// Reaction was not on one of our posts
    UnknownPost,
    /// Emoji has no habit mapping; the transport may tidy it away
    UnknownEmoji,
    /// Nothing to remove
    NoOp,
}

fn default_entry(definition: &HabitDefinition) -> CheckInEntry {
    match definition.kind {
        HabitKind::Boolean => CheckInEntry::new(definition.id, None),
        HabitKind::Numeric { min, .. } => CheckInEntry::new(definition.id, Some(min)),
    }
}

/// Handle a reaction add/remove on a daily check-in post. The post's
/// date (not today) decides which day and week the entry files under,
/// so reacting to an older pinned post backfills that day.
pub fn handle_reaction(
    store: &Store,
    message_id: u64,
    emoji: &str,
    user_id: &str,
    added: bool,
    today: NaiveDate,
) -> Result<ReactionOutcome> {
    let Some(date_iso) = store.post_date(message_id)? else {
        return Ok(ReactionOutcome::UnknownPost);
    };
    let Some(habit_id) = habit_for_emoji(emoji) else {
        return Ok(ReactionOutcome::UnknownEmoji);
    };
    let Some(definition) = habit(habit_id) else {
        return Ok(ReactionOutcome::UnknownEmoji);
    };

    let date = NaiveDate::parse_from_str(&date_iso, "%Y-%m-%d")
        .map_err(|e| CoreError::BadInput(format!("Bad post date '{date_iso}': {e}")))?;
    let week = week_id(date);
    let default = default_entry(definition);

    enum Applied {
        Recorded,
        Removed,
        CustomKept,
        Nothing,
    }

    let applied = store.update_ledger(|ledger| {
        let existing = ledger
            .get(&week)
            .and_then(|b| b.get(user_id))
            .and_then(|days| days.get(&date_iso))
            .and_then(|entries| entries.iter().find(|e| e.habit_id == habit_id))
            .cloned();
        let has_custom = existing.as_ref().is_some_and(|e| *e != default);

        if added {
            if has_custom {
                return Ok(Applied::CustomKept);
            }
            upsert_entry(ledger, &week, user_id, &date_iso, default.clone());
            Ok(Applied::Recorded)
        } else {
            if has_custom {
                return Ok(Applied::CustomKept);
            }
            if existing.is_none() {
                return Ok(Applied::Nothing);
            }
            remove_entry(ledger, &week, user_id, &date_iso, habit_id);
            Ok(Applied::Removed)
        }
    })?;

    Ok(match applied {
        Applied::Recorded => ReactionOutcome::Recorded {
            habit_id: habit_id.to_string(),
            date,
            evaluation: maybe_close_out_week(store, today)?,
        },
        Applied::Removed => ReactionOutcome::Removed {
            habit_id: habit_id.to_string(),
            date,
        },
        Applied::CustomKept => ReactionOutcome::CustomValueKept {
            habit_id: habit_id.to_string(),
            date,
        },
        Applied::Nothing => ReactionOutcome::NoOp,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checkin::record_check_ins;
    use tempfile::tempdir;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn setup() -> (tempfile::TempDir, Store) {
        let dir = tempdir().unwrap();
        let store = Store::at(dir.path());
        store.record_post("2025-05-01", 42).unwrap();
        (dir, store)
    }

    #[test]
    fn test_emoji_round_trip() {
        assert_eq!(emoji_for("meditation"), Some("🧘"));
        assert_eq!(habit_for_emoji("🧘"), Some("meditation"));
        assert_eq!(habit_for_emoji("🦄"), None);
        // pmo has no reaction shortcut
        assert_eq!(emoji_for("pmo"), None);
    }

    #[test]
    fn test_post_lines_follow_rank() {
        let dir = tempdir().unwrap();
        let store = Store::at(dir.path());
        let lines = daily_post_lines(&store).unwrap();
        // rank 1: only meditation unlocked
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].habit_id, "meditation");
        assert_eq!(lines[0].minimum, Some(30));

        store.save_rank(5).unwrap();
        let lines = daily_post_lines(&store).unwrap();
        let ids: Vec<_> = lines.iter().map(|l| l.habit_id).collect();
        assert!(ids.contains(&"exercise"));
        assert!(ids.contains(&"journaling"));
        assert!(!ids.contains(&"diet"));
    }

    #[test]
    fn test_add_records_default() {
        let (_dir, store) = setup();
        let outcome =
            handle_reaction(&store, 42, "🧘", "u1", true, date(2025, 5, 1)).unwrap();
        assert!(matches!(outcome, ReactionOutcome::Recorded { .. }));

        let ledger = store.load_ledger().unwrap();
        let day = &ledger["2025-04-28"]["u1"]["2025-05-01"];
        assert_eq!(day[0].value, Some(30));
    }

    #[test]
    fn test_add_keeps_custom_value() {
        let (_dir, store) = setup();
        record_check_ins(&store, "u1", &["meditation".into(), "60".into()], date(2025, 5, 1))
            .unwrap();

        let outcome =
            handle_reaction(&store, 42, "🧘", "u1", true, date(2025, 5, 1)).unwrap();
        assert!(matches!(outcome, ReactionOutcome::CustomValueKept { .. }));

        let ledger = store.load_ledger().unwrap();
        assert_eq!(ledger["2025-04-28"]["u1"]["2025-05-01"][0].value, Some(60));
    }

    #[test]
    fn test_remove_undoes_only_default() {
        let (_dir, store) = setup();
        handle_reaction(&store, 42, "🧘", "u1", true, date(2025, 5, 1)).unwrap();
        let outcome =
            handle_reaction(&store, 42, "🧘", "u1", false, date(2025, 5, 1)).unwrap();
        assert!(matches!(outcome, ReactionOutcome::Removed { .. }));
        assert!(store.load_ledger().unwrap().is_empty());

        // custom value survives a reaction removal
        record_check_ins(&store, "u1", &["meditation".into(), "60".into()], date(2025, 5, 1))
            .unwrap();
        let outcome =
            handle_reaction(&store, 42, "🧘", "u1", false, date(2025, 5, 1)).unwrap();
        assert!(matches!(outcome, ReactionOutcome::CustomValueKept { .. }));
        assert_eq!(
            store.load_ledger().unwrap()["2025-04-28"]["u1"]["2025-05-01"][0].value,
            Some(60)
        );
    }

    #[test]
    fn test_unknown_post_and_emoji() {
        let (_dir, store) = setup();
        assert_eq!(
            handle_reaction(&store, 999, "🧘", "u1", true, date(2025, 5, 1)).unwrap(),
            ReactionOutcome::UnknownPost
        );
        assert_eq!(
            handle_reaction(&store, 42, "🦄", "u1", true, date(2025, 5, 1)).unwrap(),
            ReactionOutcome::UnknownEmoji
        );
    }

    #[test]
    fn test_backfill_files_under_post_week() {
        let (_dir, store) = setup();
        // reacting on Tuesday of the next week to the May 1 post
        let outcome =
            handle_reaction(&store, 42, "🏃", "u1", true, date(2025, 5, 6)).unwrap();
        // exercise locked or not, reactions do not gate; entry lands on
        // the post's date
        assert!(matches!(outcome, ReactionOutcome::Recorded { .. }));
        let ledger = store.load_ledger().unwrap();
        assert!(ledger["2025-04-28"]["u1"].contains_key("2025-05-01"));
    }
}
