//! The native project operations the importer relies on.
//!
//! The importer never reaches for a global project; it is handed a
//! `ProjectSink` and drives every mutation through it.

use chrono::{NaiveDate, NaiveDateTime};

use crate::db::Database;
use crate::error::DependencyError;
use crate::fields::{ConstraintKind, Priority, TimeUnit};
use crate::task::{DependencyId, TaskId, TaskLength};

pub trait ProjectSink {
    fn root_task(&self) -> TaskId;

    /// Create a task with native defaults. Creation cannot fail.
    fn create_task(&mut self) -> TaskId;

    /// Place `task` as the last child of `parent`.
    fn move_task(&mut self, task: TaskId, parent: TaskId);

    fn set_name(&mut self, task: TaskId, name: &str);
    fn set_start(&mut self, task: TaskId, start: NaiveDate);
    fn set_notes(&mut self, task: TaskId, notes: Option<String>);
    fn set_web_link(&mut self, task: TaskId, link: Option<String>);
    fn set_priority(&mut self, task: TaskId, priority: Priority);
    fn set_completion_percentage(&mut self, task: TaskId, percent: f64);
    fn set_milestone(&mut self, task: TaskId, milestone: bool);
    fn set_duration(&mut self, task: TaskId, length: TaskLength);

    fn create_dependency(
        &mut self,
        dependant: TaskId,
        dependee: TaskId,
        constraint: ConstraintKind,
    ) -> Result<DependencyId, DependencyError>;

    /// Set the lag, in days, of a created dependency.
    fn set_dependency_difference(&mut self, dependency: DependencyId, days: i32);

    /// A length of `count` default time units.
    fn create_length(&self, count: i64) -> TaskLength;

    fn create_length_between(
        &self,
        unit: TimeUnit,
        start: NaiveDateTime,
        finish: NaiveDateTime,
    ) -> TaskLength;

    fn default_time_unit(&self) -> TimeUnit;
}

impl ProjectSink for Database {
    fn root_task(&self) -> TaskId {
        Database::root_task(self)
    }

    fn create_task(&mut self) -> TaskId {
        Database::create_task(self)
    }

    fn move_task(&mut self, task: TaskId, parent: TaskId) {
        if !Database::move_task(self, task, parent) {
            tracing::warn!(%task, %parent, "ignored invalid task move");
        }
    }

    fn set_name(&mut self, task: TaskId, name: &str) {
        if let Some(t) = self.get_mut(task) {
            t.name = name.to_string();
        }
    }

    fn set_start(&mut self, task: TaskId, start: NaiveDate) {
        if let Some(t) = self.get_mut(task) {
            t.start = start;
        }
    }

    fn set_notes(&mut self, task: TaskId, notes: Option<String>) {
        if let Some(t) = self.get_mut(task) {
            t.notes = notes;
        }
    }

    fn set_web_link(&mut self, task: TaskId, link: Option<String>) {
        if let Some(t) = self.get_mut(task) {
            t.web_link = link;
        }
    }

    fn set_priority(&mut self, task: TaskId, priority: Priority) {
        if let Some(t) = self.get_mut(task) {
            t.priority = priority;
        }
    }

    fn set_completion_percentage(&mut self, task: TaskId, percent: f64) {
        if let Some(t) = self.get_mut(task) {
            t.completion_percentage = percent;
        }
    }

    fn set_milestone(&mut self, task: TaskId, milestone: bool) {
        if let Some(t) = self.get_mut(task) {
            t.milestone = milestone;
        }
    }

    fn set_duration(&mut self, task: TaskId, length: TaskLength) {
        if let Some(t) = self.get_mut(task) {
            t.duration = length;
        }
    }

    fn create_dependency(
        &mut self,
        dependant: TaskId,
        dependee: TaskId,
        constraint: ConstraintKind,
    ) -> Result<DependencyId, DependencyError> {
        Database::create_dependency(self, dependant, dependee, constraint)
    }

    fn set_dependency_difference(&mut self, dependency: DependencyId, days: i32) {
        Database::set_dependency_difference(self, dependency, days)
    }

    fn create_length(&self, count: i64) -> TaskLength {
        Database::create_length(self, count)
    }

    fn create_length_between(
        &self,
        unit: TimeUnit,
        start: NaiveDateTime,
        finish: NaiveDateTime,
    ) -> TaskLength {
        Database::create_length_between(self, unit, start, finish)
    }

    fn default_time_unit(&self) -> TimeUnit {
        self.default_time_unit
    }
}
