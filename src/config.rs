//! Runtime configuration resolved from the command line and the environment.

use std::path::{Path, PathBuf};

use crate::cli::Cli;
use crate::logging::default_log_level;

const APP_DIR: &str = ".todo";
const DB_FILE: &str = "tasks.json";
const LOG_SUBDIR: &str = "logs";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub db_path: PathBuf,
    pub log_dir: PathBuf,
    pub log_level: String,
}

impl Config {
    /// Resolve paths and levels, falling back to `$HOME/.todo`.
    pub fn from_cli(cli: &Cli) -> Self {
        let home = std::env::var_os("HOME").map(PathBuf::from);
        Self::resolve(cli.db.clone(), cli.log_dir.clone(), cli.log_level.clone(), home.as_deref())
    }

    pub fn resolve(
        db: Option<PathBuf>,
        log_dir: Option<PathBuf>,
        log_level: Option<String>,
        home: Option<&Path>,
    ) -> Self {
        let db_path = db.unwrap_or_else(|| {
            home.unwrap_or_else(|| Path::new("."))
                .join(APP_DIR)
                .join(DB_FILE)
        });
        let log_dir = log_dir.unwrap_or_else(|| {
            db_path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."))
                .join(LOG_SUBDIR)
        });
        Config {
            db_path,
            log_dir,
            log_level: log_level.unwrap_or_else(|| default_log_level().to_string()),
        }
    }
}
