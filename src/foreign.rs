//! In-memory graph of a foreign project plan.
//!
//! A `ForeignProject` is what a `ProjectReader` yields: a forest of foreign
//! tasks in document order, each optionally declaring predecessor relations,
//! plus the header context needed to convert durations between units.
//! The graph is read-only input to the importer.

use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Root of a decoded foreign document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ForeignProject {
    #[serde(default)]
    pub header: ProjectHeader,
    #[serde(default)]
    pub tasks: Vec<ForeignTask>,
}

impl ForeignProject {
    /// All tasks of the forest, flattened in pre-order (document order).
    pub fn all_tasks(&self) -> Vec<&ForeignTask> {
        let mut out = Vec::new();
        for t in &self.tasks {
            collect_tasks(t, &mut out);
        }
        out
    }
}

fn collect_tasks<'a>(task: &'a ForeignTask, out: &mut Vec<&'a ForeignTask>) {
    out.push(task);
    for child in &task.children {
        collect_tasks(child, out);
    }
}

/// Calendar context of the foreign document.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectHeader {
    pub minutes_per_day: u32,
    pub minutes_per_week: u32,
    pub days_per_month: u32,
}

impl Default for ProjectHeader {
    fn default() -> Self {
        ProjectHeader {
            minutes_per_day: 480,
            minutes_per_week: 2400,
            days_per_month: 20,
        }
    }
}

/// A task of the foreign document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ForeignTask {
    pub id: i32,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub start: Option<NaiveDateTime>,
    #[serde(default)]
    pub finish: Option<NaiveDateTime>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub hyperlink: Option<String>,
    #[serde(default)]
    pub milestone: bool,
    #[serde(default)]
    pub physical_percent_complete: Option<f64>,
    #[serde(default)]
    pub priority: Option<ForeignPriority>,
    #[serde(default)]
    pub children: Vec<ForeignTask>,
    /// `None` when the task declares no predecessor list at all.
    #[serde(default)]
    pub predecessors: Option<Vec<ForeignRelation>>,
}

/// Ordinal priority of the foreign scheduler.
///
/// Decoded from any JSON number; values off the scale (negative, fractional,
/// out of range) are kept as unknown rather than failing the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "f64")]
pub struct ForeignPriority(pub i64);

impl From<f64> for ForeignPriority {
    fn from(v: f64) -> Self {
        if v.fract() == 0.0 && v.abs() <= i64::MAX as f64 {
            ForeignPriority(v as i64)
        } else {
            ForeignPriority(ForeignPriority::UNKNOWN)
        }
    }
}

impl ForeignPriority {
    /// Stand-in for values that are not whole numbers.
    pub const UNKNOWN: i64 = 0;
    pub const LOWEST: i64 = 100;
    pub const VERY_LOW: i64 = 200;
    pub const LOWER: i64 = 300;
    pub const LOW: i64 = 400;
    pub const MEDIUM: i64 = 500;
    pub const HIGH: i64 = 600;
    pub const HIGHER: i64 = 700;
    pub const VERY_HIGH: i64 = 800;
    pub const HIGHEST: i64 = 900;
    pub const DO_NOT_LEVEL: i64 = 1000;

    pub fn value(self) -> i64 {
        self.0
    }
}

/// A predecessor relation declared by a foreign task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForeignRelation {
    /// Id of the task that owns the relation (the successor).
    pub source_task: i32,
    /// Id of the predecessor task.
    pub target_task: i32,
    #[serde(rename = "type")]
    pub relation_type: RelationType,
    #[serde(default)]
    pub lag: ForeignDuration,
}

/// Kind of a foreign relation.
///
/// The four scheduling kinds form a closed set; anything else the decoder
/// meets is kept verbatim as `Unrecognized`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RelationType {
    FinishFinish,
    FinishStart,
    StartFinish,
    StartStart,
    Unrecognized(String),
}

impl From<String> for RelationType {
    fn from(s: String) -> Self {
        match s.to_uppercase().replace(['-', '_'], "").as_str() {
            "FF" | "FINISHFINISH" => RelationType::FinishFinish,
            "FS" | "FINISHSTART" => RelationType::FinishStart,
            "SF" | "STARTFINISH" => RelationType::StartFinish,
            "SS" | "STARTSTART" => RelationType::StartStart,
            _ => RelationType::Unrecognized(s),
        }
    }
}

impl From<RelationType> for String {
    fn from(t: RelationType) -> Self {
        t.to_string()
    }
}

impl fmt::Display for RelationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RelationType::FinishFinish => f.write_str("FF"),
            RelationType::FinishStart => f.write_str("FS"),
            RelationType::StartFinish => f.write_str("SF"),
            RelationType::StartStart => f.write_str("SS"),
            RelationType::Unrecognized(s) => f.write_str(s),
        }
    }
}

/// Units a foreign duration can be expressed in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ForeignTimeUnit {
    Minutes,
    Hours,
    #[default]
    Days,
    Weeks,
    Months,
    Years,
    Percent,
    ElapsedMinutes,
    ElapsedHours,
    ElapsedDays,
    ElapsedWeeks,
    ElapsedMonths,
    ElapsedYears,
    ElapsedPercent,
}

/// A signed amount of foreign time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ForeignDuration {
    pub duration: f64,
    #[serde(default)]
    pub units: ForeignTimeUnit,
}

const MINUTES_PER_ELAPSED_DAY: f64 = 1440.0;

impl ForeignDuration {
    pub fn new(duration: f64, units: ForeignTimeUnit) -> Self {
        ForeignDuration { duration, units }
    }

    /// Convert to days.
    ///
    /// Working units go through the header (a working day is
    /// `minutes_per_day` long); elapsed units count calendar days. Percent
    /// amounts are relative to another task and have no day equivalent.
    pub fn convert_to_days(&self, header: &ProjectHeader) -> Option<f64> {
        let d = self.duration;
        let minutes_per_day = f64::from(header.minutes_per_day.max(1));
        let days = match self.units {
            ForeignTimeUnit::Minutes => d / minutes_per_day,
            ForeignTimeUnit::Hours => d * 60.0 / minutes_per_day,
            ForeignTimeUnit::Days => d,
            ForeignTimeUnit::Weeks => d * f64::from(header.minutes_per_week) / minutes_per_day,
            ForeignTimeUnit::Months => d * f64::from(header.days_per_month),
            ForeignTimeUnit::Years => d * f64::from(header.days_per_month) * 12.0,
            ForeignTimeUnit::ElapsedMinutes => d / MINUTES_PER_ELAPSED_DAY,
            ForeignTimeUnit::ElapsedHours => d / 24.0,
            ForeignTimeUnit::ElapsedDays => d,
            ForeignTimeUnit::ElapsedWeeks => d * 7.0,
            ForeignTimeUnit::ElapsedMonths => d * 30.0,
            ForeignTimeUnit::ElapsedYears => d * 365.0,
            ForeignTimeUnit::Percent | ForeignTimeUnit::ElapsedPercent => return None,
        };
        Some(days)
    }
}
