//! Pure attribute translation between the foreign and native models.

use crate::error::ImportError;
use crate::fields::{ConstraintKind, Priority};
use crate::foreign::{ForeignDuration, ForeignPriority, ForeignRelation, ForeignTask, ProjectHeader, RelationType};
use crate::sink::ProjectSink;
use crate::task::TaskLength;

/// Map the foreign ordinal priority onto the five native buckets.
/// Absent and unknown values land on `Normal`.
pub fn convert_priority(priority: Option<ForeignPriority>) -> Priority {
    let Some(p) = priority else {
        return Priority::Normal;
    };
    match p.value() {
        ForeignPriority::HIGHEST | ForeignPriority::VERY_HIGH => Priority::Highest,
        ForeignPriority::HIGHER | ForeignPriority::HIGH => Priority::High,
        ForeignPriority::MEDIUM => Priority::Normal,
        ForeignPriority::LOWER | ForeignPriority::LOW => Priority::Low,
        ForeignPriority::VERY_LOW | ForeignPriority::LOWEST => Priority::Lowest,
        _ => Priority::Normal,
    }
}

/// Native duration of a leaf task.
///
/// Milestones get one default unit. Other tasks are measured from their
/// start/finish span in the native default unit; `None` when either end is
/// missing.
pub fn convert_duration<S: ProjectSink + ?Sized>(task: &ForeignTask, sink: &S) -> Option<TaskLength> {
    if task.milestone {
        return Some(sink.create_length(1));
    }
    let (start, finish) = (task.start?, task.finish?);
    Some(sink.create_length_between(sink.default_time_unit(), start, finish))
}

pub fn convert_constraint(relation: &ForeignRelation) -> Result<ConstraintKind, ImportError> {
    match &relation.relation_type {
        RelationType::FinishFinish => Ok(ConstraintKind::FinishFinish),
        RelationType::FinishStart => Ok(ConstraintKind::FinishStart),
        RelationType::StartFinish => Ok(ConstraintKind::StartFinish),
        RelationType::StartStart => Ok(ConstraintKind::StartStart),
        RelationType::Unrecognized(other) => Err(ImportError::UnknownRelationType {
            relation_type: other.clone(),
            source_task: relation.source_task,
            target_task: relation.target_task,
        }),
    }
}

/// Lag in whole days (truncated toward zero), `None` when there is no lag to set.
pub fn convert_lag(lag: &ForeignDuration, header: &ProjectHeader) -> Option<i32> {
    if lag.duration == 0.0 {
        return None;
    }
    let Some(days) = lag.convert_to_days(header) else {
        tracing::warn!(units = ?lag.units, duration = lag.duration, "lag unit has no day equivalent, ignored");
        return None;
    };
    let days = days.trunc() as i32;
    (days != 0).then_some(days)
}
