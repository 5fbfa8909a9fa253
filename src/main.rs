//! # plan-import
//!
//! Command-line host for the `plan_import` library: imports a foreign project
//! plan into a native project file and prints the resulting task tree.
//!
//! ```bash
//! # Import into ./project.json (a backup is taken first)
//! plan-import import plan.json
//!
//! # Stop linking dependencies at the first rejected one
//! plan-import import plan.json --on-dependency-error abort
//!
//! # Show the tree with dependencies
//! plan-import show --deps
//! ```
//!
//! Set `RUST_LOG=debug` to trace every task and relation.

use clap::Parser;

pub mod cli;
pub mod cmd;

use cli::Cli;
use cmd::*;

fn main() -> anyhow::Result<()> {
    plan_import::logging::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Import { input, config, on_dependency_error, time_unit, no_backup } =>
            cmd_import(&cli.db, input, config, on_dependency_error, time_unit, no_backup),

        Commands::Show { deps } => cmd_show(&cli.db, deps),

        Commands::Backup => cmd_backup(&cli.db),

        Commands::Completions { shell } => {
            cmd_completions(shell);
            Ok(())
        }
    }
}
