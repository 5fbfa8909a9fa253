use std::path::PathBuf;

use clap::Parser;

use crate::cmd::Commands;

/// Import foreign project plans into a native project file.
/// Storage defaults to ./project.json or a path passed via --db.
#[derive(Parser)]
#[command(name = "plan-import", version, about = "Foreign project plan importer")]
pub struct Cli {
    /// Path to the native project JSON file.
    #[arg(long, global = true, default_value = "project.json")]
    pub db: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}
