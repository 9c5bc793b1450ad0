//! Core error types for habitbot-core.
//!
//! User-input validation errors (unknown/locked habits, numeric bounds)
//! are surfaced verbatim to the caller; configuration errors are fatal
//! at startup; store and HTTP failures carry their sources.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for habitbot-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Habit id not present in the habit catalog
    #[error("Unrecognised habit: {0}")]
    UnknownHabit(String),

    /// Habit exists but is not unlocked at the current group rank
    #[error("{}", locked_habit_message(.habit, .unlocks_at))]
    LockedHabit {
        habit: String,
        /// Rank at which the habit unlocks; None if no rank ever requires it
        unlocks_at: Option<u32>,
    },

    /// Numeric check-in value below the habit's minimum
    #[error("{habit} must be at least {min} {unit}")]
    BelowMinimum {
        habit: String,
        min: u32,
        unit: &'static str,
    },

    /// Numeric check-in value above the habit's maximum
    #[error("{habit} must be at most {max} {unit}")]
    AboveMaximum {
        habit: String,
        max: u32,
        unit: &'static str,
    },

    /// Query matched nothing; an empty-result message, not a failure
    #[error("{0}")]
    NoData(String),

    /// Group rank already at the top or bottom of the catalog
    #[error("The group is already at the {} rank", rank_limit_word(.at_top))]
    RankLimit { at_top: bool },

    /// Malformed check-in or selector input
    #[error("{0}")]
    BadInput(String),

    /// Configuration-related errors (fatal at startup)
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Summarizer collaborator failed; never affects decision logic
    #[error("Summarizer error: {0}")]
    Summarizer(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP errors from the summarizer client
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

fn rank_limit_word(at_top: &bool) -> &'static str {
    if *at_top {
        "highest"
    } else {
        "lowest"
    }
}

fn locked_habit_message(habit: &str, unlocks_at: &Option<u32>) -> String {
    match unlocks_at {
        Some(level) => format!("{habit} is locked until the group reaches rank {level}"),
        None => format!("{habit} is not part of any rank challenge yet"),
    }
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A rank task references a habit absent from the habit catalog
    #[error("Rank {level} references unknown habit '{habit}'")]
    UnknownHabitInRank { level: u32, habit: String },

    /// A rank task target string parses to neither "Ndays" nor "Nunits"
    #[error("Rank {level} has unparseable target '{target}' for habit '{habit}'")]
    BadTargetSpec {
        level: u32,
        habit: String,
        target: String,
    },

    /// Rank levels are not contiguous from 1
    #[error("Rank catalog levels must be contiguous from 1; found {found} at position {position}")]
    NonContiguousLevels { found: u32, position: usize },

    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
