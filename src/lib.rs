//! # plan_import
//!
//! Imports foreign project plans into a native task model.
//!
//! A foreign document (task forest, predecessor relations, calendar header) is
//! decoded by a [`reader::ProjectReader`] and mapped onto a native project
//! through the [`sink::ProjectSink`] operations:
//!
//! - the task hierarchy is rebuilt with the same containment and sibling order;
//! - priority, duration, milestone and percent-complete are re-derived for the
//!   native scheduler (summary tasks take their schedule from their children);
//! - predecessor relations become native dependencies once every foreign id
//!   has been resolved to a native task.
//!
//! ```no_run
//! use std::path::Path;
//! use plan_import::{db::Database, importer::ProjectFileImporter, reader::reader_for_path};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let path = Path::new("plan.json");
//! let mut db = Database::default();
//! let report = ProjectFileImporter::new(&mut db, reader_for_path(path)?).run(path)?;
//! println!("{} tasks, {} dependencies", report.tasks_created, report.created());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod db;
pub mod error;
pub mod fields;
pub mod foreign;
pub mod importer;
pub mod logging;
pub mod reader;
pub mod sink;
pub mod task;
pub mod translate;
