//! Static habit and rank catalogs.
//!
//! Both catalogs are fixed at process start. `validate()` must pass
//! before the catalogs are usable; a rank task naming an unknown habit
//! or carrying an unparseable target is a fatal configuration error.

mod habits;
mod ranks;

pub use habits::{habit, habit_catalog, HabitDefinition, HabitKind};
pub use ranks::{rank, rank_catalog, top_level, RankDefinition, Task, TargetSpec};

use crate::error::Result;

/// Fail-fast catalog validation, intended to run once at startup.
pub fn validate() -> Result<()> {
    ranks::rank_catalog().map(|_| ())
}
