use clap::{Parser, Subcommand};

mod commands;
mod common;

#[derive(Parser)]
#[command(name = "habitbot-cli", version, about = "Habitbot CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Record or remove check-ins
    Checkin {
        #[command(subcommand)]
        action: commands::checkin::CheckinAction,
    },
    /// Weekly progress against the current challenge
    Progress {
        #[command(subcommand)]
        action: commands::progress::ProgressAction,
    },
    /// Group rank management
    Rank {
        #[command(subcommand)]
        action: commands::rank::RankAction,
    },
    /// Daily streaks
    Streaks {
        #[command(subcommand)]
        action: commands::streaks::StreaksAction,
    },
    /// Cumulative leaderboard
    Leaderboard {
        #[command(subcommand)]
        action: commands::leaderboard::LeaderboardAction,
    },
    /// Reminder opt-in management
    Reminder {
        #[command(subcommand)]
        action: commands::reminder::ReminderAction,
    },
    /// Daily digest
    Digest {
        #[command(subcommand)]
        action: commands::digest::DigestAction,
    },
    /// Scheduled jobs
    Jobs {
        #[command(subcommand)]
        action: commands::jobs::JobsAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn main() {
    // a malformed rank ladder is a programming error; refuse to start
    if let Err(e) = habitbot_core::catalog::validate() {
        eprintln!("error: {e}");
        std::process::exit(1);
    }

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Checkin { action } => commands::checkin::run(action),
        Commands::Progress { action } => commands::progress::run(action),
        Commands::Rank { action } => commands::rank::run(action),
        Commands::Streaks { action } => commands::streaks::run(action),
        Commands::Leaderboard { action } => commands::leaderboard::run(action),
        Commands::Reminder { action } => commands::reminder::run(action),
        Commands::Digest { action } => commands::digest::run(action),
        Commands::Jobs { action } => commands::jobs::run(action),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
