//! Enumerations and field types of the native project model.
//!
//! This module defines the structured values a native task or dependency can
//! carry: the five-level priority scale, the dependency constraint kinds and
//! the time units lengths are expressed in.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Priority classification for native tasks.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum Priority {
    Highest,
    High,
    #[default]
    Normal,
    Low,
    Lowest,
}

/// Scheduling constraint carried by a dependency between two tasks.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum ConstraintKind {
    FinishFinish,
    #[default]
    FinishStart,
    StartFinish,
    StartStart,
}

/// Units a task length can be expressed in.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, ValueEnum, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum TimeUnit {
    Hour,
    #[default]
    Day,
    Week,
}

impl TimeUnit {
    /// Length of one unit in seconds of elapsed time.
    pub fn seconds(self) -> i64 {
        match self {
            TimeUnit::Hour => 3_600,
            TimeUnit::Day => 86_400,
            TimeUnit::Week => 7 * 86_400,
        }
    }
}

/// Reaction to a dependency rejected by the native dependency engine.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, ValueEnum, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum DependencyPolicy {
    /// Log the rejection and keep linking the remaining relations.
    #[default]
    Continue,
    /// Abandon the rest of the dependency stage after the first rejection.
    Abort,
}

/// Format a priority for display.
pub fn format_priority(p: Priority) -> &'static str {
    match p {
        Priority::Highest => "Highest",
        Priority::High => "High",
        Priority::Normal => "Normal",
        Priority::Low => "Low",
        Priority::Lowest => "Lowest",
    }
}

/// Format a constraint kind for display.
pub fn format_constraint(c: ConstraintKind) -> &'static str {
    match c {
        ConstraintKind::FinishFinish => "FF",
        ConstraintKind::FinishStart => "FS",
        ConstraintKind::StartFinish => "SF",
        ConstraintKind::StartStart => "SS",
    }
}

/// Format a time unit for display, pluralised by count.
pub fn format_time_unit(unit: TimeUnit, count: i64) -> &'static str {
    match (unit, count == 1) {
        (TimeUnit::Hour, true) => "hour",
        (TimeUnit::Hour, false) => "hours",
        (TimeUnit::Day, true) => "day",
        (TimeUnit::Day, false) => "days",
        (TimeUnit::Week, true) => "week",
        (TimeUnit::Week, false) => "weeks",
    }
}
