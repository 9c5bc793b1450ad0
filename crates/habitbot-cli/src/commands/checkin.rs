use clap::Subcommand;
use habitbot_core::catalog::habit;
use habitbot_core::checkin::{delete_check_in, record_check_ins, split_selector};
use habitbot_core::evaluator::Verdict;
use habitbot_core::format::reply_line;

use crate::common::{open, today, CliResult};

#[derive(Subcommand)]
pub enum CheckinAction {
    /// Record habits, e.g. `log alice meditation 45 exercise monday`
    Log {
        user: String,
        #[arg(required = true)]
        tokens: Vec<String>,
    },
    /// Remove a logged habit, with an optional day selector
    Delete {
        user: String,
        habit: String,
        selector: Vec<String>,
    },
}

pub fn run(action: CheckinAction) -> CliResult {
    let (store, config) = open()?;
    let today = today(&config)?;

    match action {
        CheckinAction::Log { user, tokens } => {
            let recorded = record_check_ins(&store, &user, &tokens, today)?;
            let lines: Vec<String> = recorded
                .entries
                .iter()
                .filter_map(|entry| {
                    habit(&entry.habit_id).map(|def| reply_line(def, entry.value))
                })
                .collect();
            println!(
                "Recorded {} on {} for {user}",
                lines.join(", "),
                recorded.date.format("%A, %d %b")
            );
            if let Some(eval) = recorded.evaluation {
                match eval.verdict {
                    Verdict::Promoted => {
                        println!("Week {} closed: promoted to rank {}!", eval.week_id, eval.new_level)
                    }
                    Verdict::Demoted => {
                        println!("Week {} closed: demoted to rank {}", eval.week_id, eval.new_level)
                    }
                    Verdict::Held => println!("Week {} closed: rank held", eval.week_id),
                }
            }
        }
        CheckinAction::Delete {
            user,
            habit,
            selector,
        } => {
            let (rest, selector) = split_selector(&selector);
            if !rest.is_empty() {
                return Err(format!("unrecognized day selector: {}", rest.join(" ")).into());
            }
            let date = delete_check_in(&store, &user, &habit, selector, today)?;
            println!("Removed {habit} on {} for {user}", date.format("%A, %d %b"));
        }
    }
    Ok(())
}
