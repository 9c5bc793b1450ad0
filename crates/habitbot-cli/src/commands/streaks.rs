use clap::Subcommand;
use habitbot_core::streaks::streaks_for;

use crate::common::{open, today, CliResult};

#[derive(Subcommand)]
pub enum StreaksAction {
    /// A user's current and best daily streaks
    Show { user: String },
}

pub fn run(action: StreaksAction) -> CliResult {
    let (store, config) = open()?;
    let today = today(&config)?;

    match action {
        StreaksAction::Show { user } => {
            let streaks = streaks_for(&store, &user, today)?;
            if streaks.is_empty() {
                println!("No streaks yet for {user}");
                return Ok(());
            }
            println!("Streaks for {user}:");
            for (habit_id, streak) in &streaks {
                println!(
                    "  {habit_id}: {} current, {} best",
                    streak.current, streak.best
                );
            }
        }
    }
    Ok(())
}
