use clap::Subcommand;
use habitbot_core::reminder::{opted_in, set_opt_in, users_needing_reminder};

use crate::common::{open, today, CliResult};

#[derive(Subcommand)]
pub enum ReminderAction {
    /// Opt a user into the daily reminder
    On { user: String },
    /// Opt a user out
    Off { user: String },
    /// Everyone currently opted in
    List,
    /// Who would be reminded right now
    Due,
}

pub fn run(action: ReminderAction) -> CliResult {
    let (store, config) = open()?;

    match action {
        ReminderAction::On { user } => {
            set_opt_in(&store, &user, true)?;
            println!("Reminders on for {user}");
        }
        ReminderAction::Off { user } => {
            set_opt_in(&store, &user, false)?;
            println!("Reminders off for {user}");
        }
        ReminderAction::List => {
            let users = opted_in(&store)?;
            if users.is_empty() {
                println!("Nobody opted in");
            } else {
                println!("{}", users.join("\n"));
            }
        }
        ReminderAction::Due => {
            let users = users_needing_reminder(&store, today(&config)?)?;
            if users.is_empty() {
                println!("Everyone has checked in today");
            } else {
                println!("{}", users.join("\n"));
            }
        }
    }
    Ok(())
}
