//! Error types for decoding, dependency creation and the import run.

use std::path::PathBuf;

use thiserror::Error;

use crate::task::TaskId;

/// Failure to turn a foreign file into a foreign project graph.
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("unsupported project file format: {0}")]
    UnsupportedFormat(PathBuf),
}

/// Rejection of a dependency by the native dependency engine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DependencyError {
    #[error("task {0} does not exist")]
    UnknownTask(TaskId),

    #[error("task {0} cannot depend on itself")]
    SelfDependency(TaskId),

    #[error("dependency {dependant} -> {dependee} already exists")]
    Duplicate { dependant: TaskId, dependee: TaskId },

    #[error("task {dependant} and task {dependee} are supertask and subtask")]
    Hierarchy { dependant: TaskId, dependee: TaskId },

    #[error("dependency {dependant} -> {dependee} would create a loop")]
    Loop { dependant: TaskId, dependee: TaskId },
}

/// Failure of an import run.
#[derive(Error, Debug)]
pub enum ImportError {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error("unknown relation type {relation_type:?} between foreign tasks {source_task} and {target_task}")]
    UnknownRelationType {
        relation_type: String,
        source_task: i32,
        target_task: i32,
    },
}

/// Failure to load an import configuration file.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}
