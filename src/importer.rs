//! Import of a foreign project plan into the native task model.
//!
//! The import runs in two passes over the foreign document:
//!
//! 1. **Task tree**: a pre-order walk of the foreign forest creates one native
//!    task per foreign task under its translated parent and records the
//!    foreign id → native `TaskId` mapping.
//! 2. **Dependencies**: every predecessor relation of the flattened task list
//!    is resolved through that mapping and turned into a native dependency.
//!
//! The second pass only starts once the mapping is complete, since a relation
//! may name a task that appears later in the document.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::path::Path;

use tracing::{debug, info, warn};

use crate::error::{DependencyError, ImportError};
use crate::fields::DependencyPolicy;
use crate::foreign::{ForeignProject, ForeignRelation, ForeignTask};
use crate::reader::ProjectReader;
use crate::sink::ProjectSink;
use crate::task::{DependencyId, TaskId};
use crate::translate::{convert_constraint, convert_duration, convert_lag, convert_priority};

/// Foreign task id → native task, valid for one import run.
pub type IdentityMap = HashMap<i32, TaskId>;

/// What happened to a single foreign relation.
#[derive(Debug, Clone, PartialEq)]
pub enum RelationOutcome {
    Created {
        dependency: DependencyId,
        source_task: i32,
        target_task: i32,
    },
    /// One of the endpoints is not a task of the imported document.
    SkippedUnresolved { source_task: i32, target_task: i32 },
    /// The native dependency engine refused the edge.
    Rejected {
        source_task: i32,
        target_task: i32,
        error: DependencyError,
    },
}

/// Summary of an import run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportReport {
    pub tasks_created: usize,
    pub dependencies: Vec<RelationOutcome>,
    /// Set when a rejection stopped the dependency pass early.
    pub aborted_dependencies: bool,
}

impl ImportReport {
    pub fn created(&self) -> usize {
        self.count(|o| matches!(o, RelationOutcome::Created { .. }))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, RelationOutcome::SkippedUnresolved { .. }))
    }

    pub fn rejected(&self) -> usize {
        self.count(|o| matches!(o, RelationOutcome::Rejected { .. }))
    }

    fn count(&self, f: impl Fn(&RelationOutcome) -> bool) -> usize {
        self.dependencies.iter().filter(|o| f(o)).count()
    }
}

/// Imports foreign project files into an injected native project.
pub struct ProjectFileImporter<'a, S: ProjectSink + ?Sized> {
    native: &'a mut S,
    reader: Box<dyn ProjectReader>,
    policy: DependencyPolicy,
}

impl<'a, S: ProjectSink + ?Sized> ProjectFileImporter<'a, S> {
    pub fn new(native: &'a mut S, reader: Box<dyn ProjectReader>) -> Self {
        ProjectFileImporter {
            native,
            reader,
            policy: DependencyPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: DependencyPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Read `path` and import it. A decode failure leaves the native project untouched.
    pub fn run(&mut self, path: &Path) -> Result<ImportReport, ImportError> {
        let project = self.reader.read(path)?;
        info!(path = %path.display(), tasks = project.all_tasks().len(), "read foreign project");
        self.import_project(&project)
    }

    /// Import an already decoded foreign project.
    ///
    /// Tasks created before a fatal dependency error stay in the native project.
    pub fn import_project(&mut self, project: &ForeignProject) -> Result<ImportReport, ImportError> {
        let mut ids = IdentityMap::new();
        let tasks_created = self.import_tasks(project, &mut ids);
        info!(tasks_created, "imported task tree");

        let (dependencies, aborted_dependencies) = self.import_dependencies(project, &ids)?;
        let report = ImportReport {
            tasks_created,
            dependencies,
            aborted_dependencies,
        };
        info!(
            created = report.created(),
            skipped = report.skipped(),
            rejected = report.rejected(),
            aborted = report.aborted_dependencies,
            "imported dependencies"
        );
        Ok(report)
    }

    fn import_tasks(&mut self, project: &ForeignProject, ids: &mut IdentityMap) -> usize {
        let root = self.native.root_task();
        let mut created = 0;
        for t in &project.tasks {
            created += self.import_task(t, root, ids);
        }
        created
    }

    /// Import `t` and its subtree under `parent`, returning the number of tasks created.
    fn import_task(&mut self, t: &ForeignTask, parent: TaskId, ids: &mut IdentityMap) -> usize {
        let native = self.native.create_task();
        self.native.move_task(native, parent);
        self.native.set_name(native, t.name.as_deref().unwrap_or_default());
        if let Some(start) = t.start {
            self.native.set_start(native, start.date());
        }
        self.native.set_notes(native, t.notes.clone());
        self.native.set_web_link(native, t.hyperlink.clone());
        self.native.set_priority(native, convert_priority(t.priority));

        let mut created = 1;
        if t.children.is_empty() {
            if let Some(percent) = t.physical_percent_complete {
                self.native.set_completion_percentage(native, percent);
            }
            self.native.set_milestone(native, t.milestone);
            if let Some(length) = convert_duration(t, &*self.native) {
                self.native.set_duration(native, length);
            }
        } else {
            for child in &t.children {
                created += self.import_task(child, native, ids);
            }
        }

        debug!(foreign_id = t.id, %native, "imported task");
        match ids.entry(t.id) {
            Entry::Occupied(e) => {
                warn!(foreign_id = t.id, previous = %e.get(), duplicate = %native, "duplicate foreign task id, keeping first");
            }
            Entry::Vacant(e) => {
                e.insert(native);
            }
        }
        created
    }

    fn import_dependencies(
        &mut self,
        project: &ForeignProject,
        ids: &IdentityMap,
    ) -> Result<(Vec<RelationOutcome>, bool), ImportError> {
        let mut outcomes = Vec::new();
        for t in project.all_tasks() {
            let Some(predecessors) = &t.predecessors else {
                continue;
            };
            for r in predecessors {
                let outcome = self.import_relation(project, r, ids)?;
                let rejected = matches!(outcome, RelationOutcome::Rejected { .. });
                outcomes.push(outcome);
                if rejected && self.policy == DependencyPolicy::Abort {
                    warn!("abandoning remaining dependencies after rejection");
                    return Ok((outcomes, true));
                }
            }
        }
        Ok((outcomes, false))
    }

    fn import_relation(
        &mut self,
        project: &ForeignProject,
        r: &ForeignRelation,
        ids: &IdentityMap,
    ) -> Result<RelationOutcome, ImportError> {
        let constraint = convert_constraint(r)?;
        let (source_task, target_task) = (r.source_task, r.target_task);
        let (Some(&dependant), Some(&dependee)) = (ids.get(&source_task), ids.get(&target_task)) else {
            debug!(source_task, target_task, "relation endpoint not in document, skipped");
            return Ok(RelationOutcome::SkippedUnresolved { source_task, target_task });
        };

        match self.native.create_dependency(dependant, dependee, constraint) {
            Ok(dependency) => {
                if let Some(days) = convert_lag(&r.lag, &project.header) {
                    self.native.set_dependency_difference(dependency, days);
                }
                debug!(%dependant, %dependee, ?constraint, "created dependency");
                Ok(RelationOutcome::Created {
                    dependency,
                    source_task,
                    target_task,
                })
            }
            Err(error) => {
                warn!(source_task, target_task, %error, "dependency rejected");
                Ok(RelationOutcome::Rejected {
                    source_task,
                    target_task,
                    error,
                })
            }
        }
    }
}
