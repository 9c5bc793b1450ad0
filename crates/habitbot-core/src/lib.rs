//! # Habitbot Core Library
//!
//! Core business logic for the habit-tracking group bot. Everything
//! here is transport-agnostic: the Discord-facing layer and the CLI
//! binary are thin adapters over these modules.
//!
//! ## Architecture
//!
//! - **Catalog**: Compile-time habit definitions and the rank ladder
//! - **Storage**: JSON flat files (ledger, rank, meta, post index) and
//!   TOML configuration under a platform data directory
//! - **Engines**: Check-in recording, weekly summaries, streaks, group
//!   rank evaluation, risk classification
//! - **Jobs**: Minute-tick scheduler for the reminder sweep, daily
//!   digest and reaction check-in post
//!
//! ## Key Components
//!
//! - [`Store`]: Flat-file persistence with serialized writes
//! - [`record_check_ins`]: Validated batch check-in entry point
//! - [`evaluate_week`]: Group promote/demote/hold decision
//! - [`JobRunner`]: Scheduled-job driver over a [`Transport`]

pub mod catalog;
pub mod checkin;
pub mod digest;
pub mod error;
pub mod evaluator;
pub mod format;
pub mod jobs;
pub mod reactions;
pub mod reminder;
pub mod resolver;
pub mod risk;
pub mod storage;
pub mod streaks;
pub mod summary;
pub mod week;

pub use catalog::{habit_catalog, rank_catalog, HabitDefinition, HabitKind, RankDefinition, Task};
pub use checkin::{delete_check_in, record_check_ins, RecordedCheckIn};
pub use digest::{build_digest, Digest, OpenAiSummarizer, Snapshot, Summarizer};
pub use error::{ConfigError, CoreError, Result};
pub use evaluator::{evaluate_week, EvaluationOutcome, Verdict};
pub use jobs::{JobRunner, Transport};
pub use reactions::{handle_reaction, ReactionOutcome};
pub use risk::{Risk, UserStatus};
pub use storage::{Config, Store};
