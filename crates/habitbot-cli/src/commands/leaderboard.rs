use clap::Subcommand;
use habitbot_core::catalog::habit;
use habitbot_core::summary::cumulative_totals;

use crate::common::{open, CliResult};

#[derive(Subcommand)]
pub enum LeaderboardAction {
    /// All-time totals per user
    Show {
        /// Emit JSON instead of the plain listing
        #[arg(long)]
        json: bool,
    },
}

pub fn run(action: LeaderboardAction) -> CliResult {
    let (store, _config) = open()?;

    match action {
        LeaderboardAction::Show { json } => {
            let totals = cumulative_totals(&store)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&totals)?);
                return Ok(());
            }
            if totals.is_empty() {
                println!("No check-ins recorded yet");
                return Ok(());
            }
            for (user, user_totals) in &totals {
                println!("{user}:");
                for (habit_id, days) in &user_totals.days {
                    match user_totals.amounts.get(habit_id) {
                        Some(amount) => {
                            let unit = habit(habit_id).map(|h| h.unit()).unwrap_or("");
                            println!("  {habit_id}: {days} days, {amount} {unit} total");
                        }
                        None => println!("  {habit_id}: {days} days"),
                    }
                }
            }
        }
    }
    Ok(())
}
