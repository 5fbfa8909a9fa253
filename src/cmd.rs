//! Command implementations for the CLI interface.
//!
//! This module contains the handlers behind each subcommand: running an
//! import into the native project file, printing the imported tree, taking
//! backups and generating shell completions.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::Local;
use clap::Subcommand;
use clap_complete::{generate, Shell};

use plan_import::config::ImportConfig;
use plan_import::db::{print_table, Database};
use plan_import::error::ImportError;
use plan_import::fields::{DependencyPolicy, TimeUnit};
use plan_import::importer::{ImportReport, ProjectFileImporter, RelationOutcome};
use plan_import::reader::reader_for_path;

#[derive(Subcommand)]
pub enum Commands {
    /// Import a foreign project file into the native project.
    Import {
        /// Foreign project file (.json).
        input: PathBuf,
        /// TOML file with import settings.
        #[arg(long)]
        config: Option<PathBuf>,
        /// What to do when a dependency is rejected: continue | abort.
        #[arg(long, value_enum)]
        on_dependency_error: Option<DependencyPolicy>,
        /// Default time unit of the native project: hour | day | week.
        #[arg(long, value_enum)]
        time_unit: Option<TimeUnit>,
        /// Skip the backup of the native project file.
        #[arg(long)]
        no_backup: bool,
    },

    /// Print the native task tree.
    Show {
        /// Also list each task's dependencies.
        #[arg(long)]
        deps: bool,
    },

    /// Create a timestamped backup of the native project file.
    Backup,

    /// Generate shell completion scripts.
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Run an import into the project file at `db_path`.
pub fn cmd_import(
    db_path: &Path,
    input: PathBuf,
    config: Option<PathBuf>,
    on_dependency_error: Option<DependencyPolicy>,
    time_unit: Option<TimeUnit>,
    no_backup: bool,
) -> Result<()> {
    let mut cfg = match config {
        Some(path) => ImportConfig::load_from(&path)?,
        None => ImportConfig::default(),
    };
    if let Some(policy) = on_dependency_error {
        cfg.dependency_policy = policy;
    }
    if time_unit.is_some() {
        cfg.default_time_unit = time_unit;
    }

    let mut db = Database::load(db_path)
        .with_context(|| format!("failed to load project {}", db_path.display()))?;
    if let Some(unit) = cfg.default_time_unit {
        db.default_time_unit = unit;
    }

    if cfg.backup && !no_backup && db_path.exists() {
        let backup_path = create_backup(db_path).context("failed to create backup")?;
        println!("Created backup: {}", backup_path.display());
    }

    let reader = reader_for_path(&input)?;
    let result = ProjectFileImporter::new(&mut db, reader)
        .with_policy(cfg.dependency_policy)
        .run(&input);

    match result {
        Ok(report) => {
            save(&db, db_path)?;
            print_report(&report);
            Ok(())
        }
        Err(e @ ImportError::Decode(_)) => Err(e.into()),
        Err(e) => {
            save(&db, db_path)?;
            bail!("dependency import failed, tasks were kept: {e}")
        }
    }
}

fn save(db: &Database, db_path: &Path) -> Result<()> {
    db.save(db_path)
        .with_context(|| format!("failed to save project {}", db_path.display()))
}

fn print_report(report: &ImportReport) {
    println!(
        "Imported {} tasks, {} dependencies ({} skipped, {} rejected).",
        report.tasks_created,
        report.created(),
        report.skipped(),
        report.rejected()
    );
    for outcome in &report.dependencies {
        if let RelationOutcome::Rejected { source_task, target_task, error } = outcome {
            println!("  rejected {} -> {}: {}", source_task, target_task, error);
        }
    }
    if report.aborted_dependencies {
        println!("Remaining dependencies were not imported.");
    }
}

/// Print the native task tree.
pub fn cmd_show(db_path: &Path, deps: bool) -> Result<()> {
    let db = Database::load(db_path)
        .with_context(|| format!("failed to load project {}", db_path.display()))?;
    if db.children(db.root_task()).is_empty() {
        println!("No tasks.");
        return Ok(());
    }
    print_table(&db, deps);
    Ok(())
}

/// Generate shell completion scripts.
pub fn cmd_completions(shell: Shell) {
    use clap::CommandFactory;
    use crate::cli::Cli;

    let mut app = Cli::command();
    let app_name = app.get_name().to_string();
    generate(shell, &mut app, app_name, &mut std::io::stdout());
}

/// Create a timestamped backup of the project file.
pub fn create_backup(db_path: &Path) -> std::io::Result<PathBuf> {
    if !db_path.exists() {
        return Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "Project file does not exist",
        ));
    }

    let parent_dir = db_path.parent().unwrap_or_else(|| Path::new("."));
    let backup_dir = parent_dir.join("backup");
    fs::create_dir_all(&backup_dir)?;

    let timestamp = Local::now().format("%Y-%m-%d_%H-%M-%S");
    let db_filename = db_path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("project.json");
    let backup_path = backup_dir.join(format!("{}_{}", timestamp, db_filename));

    fs::copy(db_path, &backup_path)?;
    Ok(backup_path)
}

/// Create a backup command implementation.
pub fn cmd_backup(db_path: &Path) -> Result<()> {
    let backup_path = create_backup(db_path).context("failed to create backup")?;
    println!("Backup created: {}", backup_path.display());
    Ok(())
}
