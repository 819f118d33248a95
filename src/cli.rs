use std::path::PathBuf;

use clap::Parser;

use crate::cmd::Commands;

/// Single-screen to-do list.
/// Storage defaults to ~/.todo/tasks.json or a path passed via --db.
#[derive(Parser)]
#[command(name = "todo", version, about = "Single-screen to-do list")]
pub struct Cli {
    /// Path to the JSON task file.
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Directory for log files. Defaults to a `logs` folder next to the task file.
    #[arg(long, global = true)]
    pub log_dir: Option<PathBuf>,

    /// Log level: trace | debug | info | warn | error.
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Launches the UI when omitted.
    #[command(subcommand)]
    pub command: Option<Commands>,
}
