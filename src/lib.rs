//! # todo - Single-screen to-do list
//!
//! A small task list with a terminal user interface (TUI) and a matching
//! command-line surface, backed by a local JSON file.
//!
//! ## Key Features
//!
//! - **Quick capture**: Add a task with a title and a Low/Medium/High priority
//! - **One-key completion**: Toggle tasks done straight from the list
//! - **Details**: Change completion or priority and keep a free-text comment per task
//! - **Batch delete**: Mark several rows and remove them after one confirmation
//! - **Local File Storage**: One JSON document, written atomically on every change
//!
//! ## Quick Start
//!
//! ```bash
//! # Launch the TUI
//! todo
//!
//! # Add a task via CLI
//! todo add "Buy milk" --priority high
//!
//! # List tasks, newest first
//! todo list
//!
//! # Mark the first row done
//! todo toggle 1
//! ```
//!
//! Data is stored in `~/.todo/tasks.json` unless `--db` points elsewhere.

pub mod cli;
pub mod cmd;
pub mod config;
pub mod controller;
pub mod db;
pub mod fields;
pub mod logging;
pub mod task;
pub mod tui {
    pub mod app;
    pub mod colors;
    pub mod enums;
    pub mod input;
    pub mod run;
    pub mod utils;
}
