use clap::Subcommand;
use habitbot_core::catalog::{rank, rank_catalog};
use habitbot_core::evaluator::{demote, next_challenge, promote};
use habitbot_core::format::task_line;
use habitbot_core::resolver::latest_tasks;

use crate::common::{open, CliResult};

#[derive(Subcommand)]
pub enum RankAction {
    /// Current rank and its cumulative challenge
    Show,
    /// The whole ladder
    List,
    /// Preview the next rank's challenge
    Next,
    /// Manually promote the group
    Up,
    /// Manually demote the group
    Down,
}

pub fn run(action: RankAction) -> CliResult {
    let (store, _config) = open()?;

    match action {
        RankAction::Show => {
            let level = store.load_rank()?;
            let name = rank(level)?.map(|r| r.name).unwrap_or("unknown");
            println!("Rank {level}: {name}");
            for task in latest_tasks(level)? {
                println!("  {}", task_line(task));
            }
        }
        RankAction::List => {
            for definition in rank_catalog()? {
                println!("{}. {}", definition.level, definition.name);
                for task in &definition.tasks {
                    println!("     {}", task_line(task));
                }
            }
        }
        RankAction::Next => {
            let level = store.load_rank()?;
            match next_challenge(level)? {
                Some((next, tasks)) => {
                    println!("Next up — rank {}: {}", next.level, next.name);
                    for task in tasks {
                        println!("  {}", task_line(task));
                    }
                }
                None => println!("Already at the top rank"),
            }
        }
        RankAction::Up => {
            let level = promote(&store)?;
            let name = rank(level)?.map(|r| r.name).unwrap_or("unknown");
            println!("Promoted to rank {level}: {name}");
        }
        RankAction::Down => {
            let level = demote(&store)?;
            let name = rank(level)?.map(|r| r.name).unwrap_or("unknown");
            println!("Demoted to rank {level}: {name}");
        }
    }
    Ok(())
}
