use clap::Subcommand;
use habitbot_core::catalog::habit;
use habitbot_core::format::{entry_line, progress_line};
use habitbot_core::resolver::effective_targets;
use habitbot_core::risk::{classify, rollup};
use habitbot_core::summary::summary_for;
use habitbot_core::week::{days_elapsed, days_remaining, parse_week_id, parse_week_offset, week_id};

use crate::common::{open, today, CliResult};

#[derive(Subcommand)]
pub enum ProgressAction {
    /// Everyone's progress for a week ("last", "next" or a signed offset)
    Show { week: Option<String> },
    /// One user's day-by-day entries for a week
    History { user: String, week: Option<String> },
}

fn resolve_week(today: chrono::NaiveDate, token: Option<&str>) -> Result<String, String> {
    let offset = match token {
        None => 0,
        Some(t) => parse_week_offset(t).ok_or_else(|| format!("bad week selector: {t}"))?,
    };
    Ok(week_id(today + chrono::Duration::weeks(offset)))
}

pub fn run(action: ProgressAction) -> CliResult {
    let (store, config) = open()?;
    let today = today(&config)?;

    match action {
        ProgressAction::Show { week } => {
            let week = resolve_week(today, week.as_deref())?;
            let monday = parse_week_id(&week)?;
            let elapsed = days_elapsed(monday, today);
            let remaining = days_remaining(monday, today);

            let rank_level = store.load_rank()?;
            let targets = effective_targets(rank_level)?;
            let summary = summary_for(&store, &week)?;
            if summary.is_empty() {
                println!("No check-ins for week of {week}");
                return Ok(());
            }

            println!("Week of {week} (rank {rank_level}, day {elapsed}/7)");
            for (user, habits) in &summary {
                let risks: Vec<_> = targets
                    .iter()
                    .map(|(habit_id, target)| {
                        let done = habits.get(*habit_id).copied().unwrap_or(0);
                        classify(done, target.count, elapsed, remaining)
                    })
                    .collect();
                println!("{user} — {}", rollup(risks).display());
                for (habit_id, target) in &targets {
                    let done = habits.get(*habit_id).copied().unwrap_or(0);
                    println!("  {habit_id}: {}", progress_line(done, target.count));
                }
            }
        }
        ProgressAction::History { user, week } => {
            let week = resolve_week(today, week.as_deref())?;
            let ledger = store.load_ledger()?;
            let days = ledger
                .get(&week)
                .and_then(|bucket| bucket.get(&user))
                .cloned()
                .unwrap_or_default();
            if days.is_empty() {
                println!("No check-ins for {user} in week of {week}");
                return Ok(());
            }
            println!("{user}, week of {week}:");
            for (day, entries) in &days {
                let lines: Vec<String> = entries
                    .iter()
                    .filter_map(|entry| habit(&entry.habit_id).map(|def| entry_line(def, entry)))
                    .collect();
                println!("  {day}: {}", lines.join(", "));
            }
        }
    }
    Ok(())
}
