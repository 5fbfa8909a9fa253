//! Native task and dependency data structures.
//!
//! This module defines the `Task` struct that represents a single node of the
//! native task tree, the `TaskLength` it is scheduled for, and the
//! `Dependency` edges linking tasks together.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::fields::*;

/// Handle of a native task: its index in the owning task arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(pub usize);

/// Handle of a native dependency: its index in the dependency list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DependencyId(pub usize);

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for DependencyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A length of time expressed as a whole number of native time units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskLength {
    pub unit: TimeUnit,
    pub count: i64,
}

impl TaskLength {
    pub fn new(unit: TimeUnit, count: i64) -> Self {
        TaskLength { unit, count }
    }
}

impl Default for TaskLength {
    fn default() -> Self {
        TaskLength::new(TimeUnit::Day, 1)
    }
}

impl fmt::Display for TaskLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.count, format_time_unit(self.unit, self.count))
    }
}

/// A node of the native task tree.
///
/// Summary tasks (tasks with children) keep their default duration, milestone
/// flag and completion; their effective schedule is derived from the children.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub name: String,
    pub start: NaiveDate,
    pub notes: Option<String>,
    pub web_link: Option<String>,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub milestone: bool,
    #[serde(default)]
    pub completion_percentage: f64,
    #[serde(default)]
    pub duration: TaskLength,
    pub parent: Option<TaskId>,
    #[serde(default)]
    pub children: Vec<TaskId>,
}

impl Task {
    /// Create a task carrying the native defaults.
    pub fn new(id: TaskId, start: NaiveDate, duration: TaskLength) -> Self {
        Task {
            id,
            name: String::new(),
            start,
            notes: None,
            web_link: None,
            priority: Priority::Normal,
            milestone: false,
            completion_percentage: 0.0,
            duration,
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// A directed scheduling constraint: `dependant` is constrained by `dependee`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dependency {
    pub id: DependencyId,
    pub dependant: TaskId,
    pub dependee: TaskId,
    pub constraint: ConstraintKind,
    /// Lag in days, absent when the dependency has none.
    pub difference: Option<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_length_display() {
        assert_eq!(TaskLength::new(TimeUnit::Day, 1).to_string(), "1 day");
        assert_eq!(TaskLength::new(TimeUnit::Week, 3).to_string(), "3 weeks");
    }

    #[test]
    fn test_new_task_defaults() {
        let start = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();
        let task = Task::new(TaskId(7), start, TaskLength::default());
        assert_eq!(task.priority, Priority::Normal);
        assert_eq!(task.completion_percentage, 0.0);
        assert!(!task.milestone);
        assert!(task.is_leaf());
        assert_eq!(task.parent, None);
    }
}
