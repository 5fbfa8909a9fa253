//! Native project store and its task manager operations.
//!
//! This module provides the `Database` struct owning the native task tree (an
//! arena indexed by `TaskId`) and the dependency list, along with length
//! construction, the dependency engine checks, JSON persistence and the
//! tree printing helpers used by the CLI.

use std::collections::HashSet;
use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::Path;

use chrono::{Local, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::DependencyError;
use crate::fields::*;
use crate::task::{Dependency, DependencyId, Task, TaskId, TaskLength};

/// In-memory native project: task arena, dependencies and scheduling defaults.
#[derive(Debug, Serialize, Deserialize)]
pub struct Database {
    pub start: NaiveDate,
    #[serde(default)]
    pub default_time_unit: TimeUnit,
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub dependencies: Vec<Dependency>,
}

impl Default for Database {
    fn default() -> Self {
        Database::new(Local::now().date_naive(), TimeUnit::Day)
    }
}

impl Database {
    /// Create an empty project holding only the root task.
    pub fn new(start: NaiveDate, default_time_unit: TimeUnit) -> Self {
        let mut root = Task::new(TaskId(0), start, TaskLength::new(default_time_unit, 1));
        root.name = "root".into();
        Database {
            start,
            default_time_unit,
            tasks: vec![root],
            dependencies: Vec::new(),
        }
    }

    /// Load database from JSON file, creating a new empty database if file doesn't exist.
    pub fn load(path: &Path) -> io::Result<Self> {
        if !path.exists() {
            return Ok(Database::default());
        }
        let mut buf = String::new();
        File::open(path)?.read_to_string(&mut buf)?;
        let db: Database =
            serde_json::from_str(&buf).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        db.validate()
            .map_err(|msg| io::Error::new(io::ErrorKind::InvalidData, msg))?;
        Ok(db)
    }

    /// Check the arena invariants a loaded file must satisfy: task 0 is the
    /// parentless root, every id equals its index, parent and children links
    /// agree and stay in range, and every parent chain ends at the root.
    pub fn validate(&self) -> Result<(), String> {
        let len = self.tasks.len();
        let Some(root) = self.tasks.first() else {
            return Err("project has no root task".into());
        };
        if root.parent.is_some() {
            return Err("root task has a parent".into());
        }
        for (i, t) in self.tasks.iter().enumerate() {
            if t.id != TaskId(i) {
                return Err(format!("task at index {} has id {}", i, t.id));
            }
            if i > 0 {
                let Some(p) = t.parent else {
                    return Err(format!("task {} has no parent", i));
                };
                if p.0 >= len || p.0 == i {
                    return Err(format!("task {} has invalid parent {}", i, p));
                }
                if !self.tasks[p.0].children.contains(&t.id) {
                    return Err(format!("task {} is missing from the children of {}", i, p));
                }
            }
            for c in &t.children {
                if c.0 >= len || self.tasks[c.0].parent != Some(t.id) {
                    return Err(format!("task {} lists invalid child {}", i, c));
                }
            }
            let mut cur = t.parent;
            let mut steps = 0;
            while let Some(p) = cur {
                steps += 1;
                if steps > len {
                    return Err(format!("parent chain of task {} has a loop", i));
                }
                cur = self.tasks[p.0].parent;
            }
        }
        for (i, d) in self.dependencies.iter().enumerate() {
            if d.id != DependencyId(i) || d.dependant.0 >= len || d.dependee.0 >= len {
                return Err(format!("dependency at index {} is invalid", i));
            }
        }
        Ok(())
    }

    /// Save database to JSON file using atomic write (temp file + rename).
    pub fn save(&self, path: &Path) -> io::Result<()> {
        let tmp = path.with_extension("json.tmp");
        let data = serde_json::to_string_pretty(self)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        let mut f = File::create(&tmp)?;
        f.write_all(data.as_bytes())?;
        f.flush()?;
        fs::rename(tmp, path)?;
        Ok(())
    }

    pub fn root_task(&self) -> TaskId {
        TaskId(0)
    }

    /// Get a task by ID.
    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.get(id.0)
    }

    /// Get a mutable reference to a task by ID.
    pub fn get_mut(&mut self, id: TaskId) -> Option<&mut Task> {
        self.tasks.get_mut(id.0)
    }

    pub fn children(&self, id: TaskId) -> &[TaskId] {
        self.get(id).map(|t| t.children.as_slice()).unwrap_or(&[])
    }

    /// Create a task with native defaults, placed under the root task.
    pub fn create_task(&mut self) -> TaskId {
        let id = TaskId(self.tasks.len());
        let mut task = Task::new(id, self.start, self.create_length(1));
        let root = self.root_task();
        task.parent = Some(root);
        self.tasks.push(task);
        self.tasks[root.0].children.push(id);
        id
    }

    /// Move a task (with its subtree) to the end of `parent`'s children.
    ///
    /// Returns false and leaves the tree untouched when the move is invalid:
    /// unknown tasks, moving the root, or moving a task into its own subtree.
    pub fn move_task(&mut self, task: TaskId, parent: TaskId) -> bool {
        if task == self.root_task() || self.get(task).is_none() || self.get(parent).is_none() {
            return false;
        }
        if task == parent || collect_ancestors(parent, self).contains(&task) {
            return false;
        }
        if let Some(old) = self.tasks[task.0].parent {
            self.tasks[old.0].children.retain(|c| *c != task);
        }
        self.tasks[parent.0].children.push(task);
        self.tasks[task.0].parent = Some(parent);
        true
    }

    /// A length of `count` default time units.
    pub fn create_length(&self, count: i64) -> TaskLength {
        TaskLength::new(self.default_time_unit, count)
    }

    /// The length spanning `start..finish`, rounded up to whole units.
    /// A span where finish precedes start has zero length.
    pub fn create_length_between(
        &self,
        unit: TimeUnit,
        start: NaiveDateTime,
        finish: NaiveDateTime,
    ) -> TaskLength {
        let secs = (finish - start).num_seconds();
        if secs <= 0 {
            return TaskLength::new(unit, 0);
        }
        let unit_secs = unit.seconds();
        TaskLength::new(unit, (secs + unit_secs - 1) / unit_secs)
    }

    /// Create a dependency after running the dependency engine checks.
    pub fn create_dependency(
        &mut self,
        dependant: TaskId,
        dependee: TaskId,
        constraint: ConstraintKind,
    ) -> Result<DependencyId, DependencyError> {
        for id in [dependant, dependee] {
            if self.get(id).is_none() {
                return Err(DependencyError::UnknownTask(id));
            }
        }
        if dependant == dependee {
            return Err(DependencyError::SelfDependency(dependant));
        }
        if self
            .dependencies
            .iter()
            .any(|d| d.dependant == dependant && d.dependee == dependee)
        {
            return Err(DependencyError::Duplicate { dependant, dependee });
        }
        if collect_ancestors(dependant, self).contains(&dependee)
            || collect_ancestors(dependee, self).contains(&dependant)
        {
            return Err(DependencyError::Hierarchy { dependant, dependee });
        }
        if self.depends_on(dependee, dependant) {
            return Err(DependencyError::Loop { dependant, dependee });
        }
        let id = DependencyId(self.dependencies.len());
        self.dependencies.push(Dependency {
            id,
            dependant,
            dependee,
            constraint,
            difference: None,
        });
        Ok(id)
    }

    /// Set the lag in days of an existing dependency.
    pub fn set_dependency_difference(&mut self, id: DependencyId, days: i32) {
        if let Some(dep) = self.dependencies.get_mut(id.0) {
            dep.difference = Some(days);
        }
    }

    /// Whether `from` transitively depends on `to` through existing dependencies.
    pub fn depends_on(&self, from: TaskId, to: TaskId) -> bool {
        let mut seen = HashSet::new();
        let mut stack = vec![from];
        while let Some(cur) = stack.pop() {
            if cur == to {
                return true;
            }
            if !seen.insert(cur) {
                continue;
            }
            for d in self.dependencies.iter().filter(|d| d.dependant == cur) {
                stack.push(d.dependee);
            }
        }
        false
    }

    /// Dependencies where `id` is the dependant.
    pub fn dependencies_of(&self, id: TaskId) -> Vec<&Dependency> {
        self.dependencies.iter().filter(|d| d.dependant == id).collect()
    }
}

/// Collect all ancestor task IDs by following parent references.
pub fn collect_ancestors(mut id: TaskId, db: &Database) -> Vec<TaskId> {
    let mut chain = Vec::new();
    while let Some(p) = db.get(id).and_then(|t| t.parent) {
        chain.push(p);
        id = p;
    }
    chain
}

/// Print the task tree below the root with one row per task.
pub fn print_table(db: &Database, show_deps: bool) {
    println!(
        "{:<5} {:<10} {:<10} {:<5} {:<9} {:<4} {}",
        "ID", "Start", "Duration", "Done", "Priority", "MS", "Name"
    );
    let root = db.root_task();
    for &child in db.children(root) {
        print_row(db, child, 0, show_deps);
    }
}

fn print_row(db: &Database, id: TaskId, depth: usize, show_deps: bool) {
    let Some(t) = db.get(id) else { return };
    let duration = if t.is_leaf() { t.duration.to_string() } else { "-".into() };
    println!(
        "{:<5} {:<10} {:<10} {:<5} {:<9} {:<4} {}{}",
        t.id,
        t.start.format("%Y-%m-%d"),
        truncate(&duration, 10),
        format!("{:.0}%", t.completion_percentage),
        format_priority(t.priority),
        if t.milestone { "*" } else { "" },
        "  ".repeat(depth),
        t.name
    );
    if show_deps {
        for d in db.dependencies_of(id) {
            let lag = d.difference.map(|l| format!(" lag {l}d")).unwrap_or_default();
            println!(
                "{:<48}{}  -> {} {}{}",
                "",
                "  ".repeat(depth),
                format_constraint(d.constraint),
                d.dependee,
                lag
            );
        }
    }
    for &c in &t.children {
        print_row(db, c, depth + 1, show_deps);
    }
}

/// Truncate a string to a maximum width, adding ellipsis if needed.
pub fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        s.to_string()
    } else {
        let mut out = String::new();
        for (i, ch) in s.chars().enumerate() {
            if i + 1 >= width {
                out.push('…');
                break;
            }
            out.push(ch);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap().and_hms_opt(0, 0, 0).unwrap()
    }

    fn project() -> Database {
        Database::new(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(), TimeUnit::Day)
    }

    #[test]
    fn test_create_task_attaches_to_root() {
        let mut db = project();
        let a = db.create_task();
        let b = db.create_task();
        assert_eq!(db.children(db.root_task()), &[a, b]);
        assert_eq!(db.get(a).unwrap().parent, Some(db.root_task()));
    }

    #[test]
    fn test_move_task_appends_and_detaches() {
        let mut db = project();
        let a = db.create_task();
        let b = db.create_task();
        let c = db.create_task();
        assert!(db.move_task(b, a));
        assert!(db.move_task(c, a));
        assert_eq!(db.children(db.root_task()), &[a]);
        assert_eq!(db.children(a), &[b, c]);
        assert_eq!(db.get(c).unwrap().parent, Some(a));
    }

    #[test]
    fn test_move_task_rejects_cycles_and_root() {
        let mut db = project();
        let a = db.create_task();
        let b = db.create_task();
        db.move_task(b, a);
        assert!(!db.move_task(a, b));
        assert!(!db.move_task(a, a));
        assert!(!db.move_task(db.root_task(), a));
        assert_eq!(db.children(a), &[b]);
    }

    #[test]
    fn test_create_length_between() {
        let db = project();
        assert_eq!(db.create_length_between(TimeUnit::Day, day(1), day(6)).count, 5);
        let afternoon = day(5) + chrono::Duration::hours(17);
        assert_eq!(db.create_length_between(TimeUnit::Day, day(1), afternoon).count, 5);
        assert_eq!(db.create_length_between(TimeUnit::Hour, day(1), day(2)).count, 24);
        assert_eq!(db.create_length_between(TimeUnit::Week, day(1), day(15)).count, 2);
        assert_eq!(db.create_length_between(TimeUnit::Day, day(6), day(1)).count, 0);
    }

    #[test]
    fn test_dependency_engine_checks() {
        let mut db = project();
        let a = db.create_task();
        let b = db.create_task();
        let c = db.create_task();
        let sub = db.create_task();
        db.move_task(sub, c);

        assert!(db.create_dependency(b, a, ConstraintKind::FinishStart).is_ok());
        assert_eq!(
            db.create_dependency(b, a, ConstraintKind::StartStart),
            Err(DependencyError::Duplicate { dependant: b, dependee: a })
        );
        assert_eq!(
            db.create_dependency(a, a, ConstraintKind::FinishStart),
            Err(DependencyError::SelfDependency(a))
        );
        assert_eq!(
            db.create_dependency(a, b, ConstraintKind::FinishStart),
            Err(DependencyError::Loop { dependant: a, dependee: b })
        );
        assert_eq!(
            db.create_dependency(sub, c, ConstraintKind::FinishStart),
            Err(DependencyError::Hierarchy { dependant: sub, dependee: c })
        );
        assert_eq!(
            db.create_dependency(a, TaskId(99), ConstraintKind::FinishStart),
            Err(DependencyError::UnknownTask(TaskId(99)))
        );
        assert_eq!(db.dependencies.len(), 1);
    }

    #[test]
    fn test_transitive_loop_detected() {
        let mut db = project();
        let a = db.create_task();
        let b = db.create_task();
        let c = db.create_task();
        db.create_dependency(b, a, ConstraintKind::FinishStart).unwrap();
        db.create_dependency(c, b, ConstraintKind::FinishStart).unwrap();
        assert!(matches!(
            db.create_dependency(a, c, ConstraintKind::FinishStart),
            Err(DependencyError::Loop { .. })
        ));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("native.json");
        let mut db = project();
        let a = db.create_task();
        db.get_mut(a).unwrap().name = "Design".into();
        db.save(&path).unwrap();

        let loaded = Database::load(&path).unwrap();
        assert_eq!(loaded.tasks.len(), 2);
        assert_eq!(loaded.get(a).unwrap().name, "Design");
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn test_collect_ancestors() {
        let mut db = project();
        let a = db.create_task();
        let b = db.create_task();
        let c = db.create_task();
        db.move_task(b, a);
        db.move_task(c, b);
        assert_eq!(collect_ancestors(c, &db), vec![b, a, db.root_task()]);
        assert!(collect_ancestors(db.root_task(), &db).is_empty());
    }

    fn load_str(body: &str) -> io::Result<Database> {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("native.json");
        fs::write(&path, body).unwrap();
        Database::load(&path)
    }

    #[test]
    fn test_load_rejects_project_without_root() {
        let err = load_str(r#"{"start":"2024-01-01","tasks":[]}"#).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn test_load_rejects_broken_arena() {
        let mut db = project();
        let a = db.create_task();
        let b = db.create_task();
        db.move_task(b, a);

        let mut shifted = serde_json::to_value(&db).unwrap();
        shifted["tasks"][1]["id"] = serde_json::json!(5);
        let err = load_str(&shifted.to_string()).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);

        let mut rooted = serde_json::to_value(&db).unwrap();
        rooted["tasks"][0]["parent"] = serde_json::json!(2);
        assert!(load_str(&rooted.to_string()).is_err());

        let mut looped = serde_json::to_value(&db).unwrap();
        looped["tasks"][1]["parent"] = serde_json::json!(2);
        looped["tasks"][2]["children"] = serde_json::json!([1]);
        looped["tasks"][0]["children"] = serde_json::json!([]);
        assert!(load_str(&looped.to_string()).is_err());

        let mut dangling = serde_json::to_value(&db).unwrap();
        dangling["tasks"][1]["children"] = serde_json::json!([2, 42]);
        assert!(load_str(&dangling.to_string()).is_err());

        assert!(load_str(&serde_json::to_string(&db).unwrap()).is_ok());
    }
}
