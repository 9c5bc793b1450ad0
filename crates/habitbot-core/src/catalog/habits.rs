//! Habit definitions.
//!
//! Each habit is either boolean (done/not-done) or numeric (a magnitude
//! in minutes or pages, with a per-occurrence minimum and optional
//! maximum). The weekly default target is used whenever no rank task
//! overrides it with an explicit day count.

use serde::Serialize;

/// Value kind for a habit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HabitKind {
    /// Presence-only; a check-in carries no value
    Boolean,
    /// Magnitude per occurrence, bounded below and optionally above
    Numeric {
        /// Display unit ("min", "pages")
        unit: &'static str,
        /// Minimum accepted value, also the default when none is given
        min: u32,
        /// Optional maximum accepted value
        max: Option<u32>,
    },
}

/// A single habit definition. Immutable, defined at process start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HabitDefinition {
    /// Unique key used in commands and the stored ledger
    pub id: &'static str,
    /// Human phrasing used by the presentation formatter
    pub label: &'static str,
    pub kind: HabitKind,
    /// Weekly day-count target when no rank task overrides it; None means 7
    pub default_weekly_target: Option<u32>,
}

impl HabitDefinition {
    /// Effective default weekly target (7 for every-day habits).
    pub fn weekly_target(&self) -> u32 {
        self.default_weekly_target.unwrap_or(7)
    }

    /// Minimum numeric value, if this is a numeric habit.
    pub fn min_value(&self) -> Option<u32> {
        match self.kind {
            HabitKind::Numeric { min, .. } => Some(min),
            HabitKind::Boolean => None,
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self.kind, HabitKind::Numeric { .. })
    }

    /// Display unit for numeric habits, empty for boolean ones.
    pub fn unit(&self) -> &'static str {
        match self.kind {
            HabitKind::Numeric { unit, .. } => unit,
            HabitKind::Boolean => "",
        }
    }
}

const HABITS: &[HabitDefinition] = &[
    HabitDefinition {
        id: "meditation",
        label: "meditation",
        kind: HabitKind::Numeric {
            unit: "min",
            min: 30,
            max: None,
        },
        default_weekly_target: None,
    },
    HabitDefinition {
        id: "exercise",
        label: "exercise",
        kind: HabitKind::Boolean,
        default_weekly_target: Some(4),
    },
    HabitDefinition {
        id: "reading",
        label: "reading",
        kind: HabitKind::Numeric {
            unit: "pages",
            min: 10,
            max: None,
        },
        default_weekly_target: None,
    },
    HabitDefinition {
        id: "walking",
        label: "walking",
        kind: HabitKind::Boolean,
        default_weekly_target: Some(4),
    },
    HabitDefinition {
        id: "porn",
        label: "no porn",
        kind: HabitKind::Boolean,
        default_weekly_target: Some(7),
    },
    HabitDefinition {
        id: "pmo",
        label: "no PMO",
        kind: HabitKind::Boolean,
        default_weekly_target: Some(7),
    },
    HabitDefinition {
        id: "diet",
        label: "diet",
        kind: HabitKind::Boolean,
        default_weekly_target: Some(7),
    },
    HabitDefinition {
        id: "bedtime",
        label: "11pm bedtime",
        kind: HabitKind::Boolean,
        default_weekly_target: Some(5),
    },
    HabitDefinition {
        id: "streaming",
        label: "no streaming",
        kind: HabitKind::Boolean,
        default_weekly_target: Some(5),
    },
    HabitDefinition {
        id: "journaling",
        label: "journaling",
        kind: HabitKind::Boolean,
        default_weekly_target: Some(7),
    },
    HabitDefinition {
        id: "digitaldetox",
        label: "digital detox",
        kind: HabitKind::Numeric {
            unit: "min",
            min: 15,
            max: None,
        },
        default_weekly_target: None,
    },
];

/// The full habit registry.
pub fn habit_catalog() -> &'static [HabitDefinition] {
    HABITS
}

/// Look up a habit by id.
pub fn habit(id: &str) -> Option<&'static HabitDefinition> {
    HABITS.iter().find(|h| h.id == id)
}
