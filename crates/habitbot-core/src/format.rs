//! Presentation helpers for replies and posts.
//!
//! The catalog and ledger stay presentation-free; everything that turns
//! an entry or a task into user-facing text lives here.

use crate::catalog::{HabitDefinition, HabitKind, Task};
use crate::reactions::PostLine;
use crate::storage::CheckInEntry;

/// Confirmation fragment for one recorded entry, e.g.
/// "**meditation** for **45 min**" or "**no porn**".
pub fn reply_line(definition: &HabitDefinition, value: Option<u32>) -> String {
    match (definition.kind, value) {
        (HabitKind::Numeric { unit, .. }, Some(v)) => {
            format!("**{}** for **{v} {unit}**", definition.label)
        }
        _ => format!("**{}**", definition.label),
    }
}

/// Same, from a stored entry.
pub fn entry_line(definition: &HabitDefinition, entry: &CheckInEntry) -> String {
    reply_line(definition, entry.value)
}

/// One requirement of a rank challenge, e.g. "reading: 12 pages" or
/// "exercise: 4 days/week".
pub fn task_line(task: &Task) -> String {
    use crate::catalog::TargetSpec;
    match task.target {
        TargetSpec::Days(n) => format!("{}: {n} days/week", task.habit_id),
        TargetSpec::Amount { value, unit } => format!("{}: {value} {unit}", task.habit_id),
    }
}

/// One line of the daily reaction post, e.g.
/// "🧘 meditation (min 30 min)" or "🏃 exercise".
pub fn post_line(line: &PostLine) -> String {
    match line.minimum {
        Some(min) => format!("{} {} (min {min} {})", line.emoji, line.label, line.unit),
        None => format!("{} {}", line.emoji, line.label),
    }
}

/// Weekly progress fragment, e.g. "5/7 ✓" once met.
pub fn progress_line(completed: u32, target: u32) -> String {
    if completed >= target {
        format!("{completed}/{target} ✓")
    } else {
        format!("{completed}/{target}")
    }
}
