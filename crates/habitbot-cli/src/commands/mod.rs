pub mod checkin;
pub mod config;
pub mod digest;
pub mod jobs;
pub mod leaderboard;
pub mod progress;
pub mod rank;
pub mod reminder;
pub mod streaks;
