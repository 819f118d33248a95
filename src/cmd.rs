//! Command implementations for the CLI interface.
//!
//! Each subcommand goes through the same list and detail controllers the
//! terminal UI uses, so both surfaces share one set of rules.

use clap::{CommandFactory, Subcommand};
use clap_complete::{generate, Shell};
use log::error;

use crate::cli::Cli;
use crate::controller::{DetailController, ListController};
use crate::db::{print_table, StoreError, TaskStore};
use crate::fields::Priority;
use crate::task::Task;
use crate::tui::run::run_tui;

const MIN_ID_PREFIX: usize = 4;

#[derive(Subcommand)]
pub enum Commands {
    /// Launch the interactive UI interface.
    Ui,

    /// Add a new task.
    Add {
        /// Short title for the task.
        title: String,
        /// Priority level: low | medium | high.
        #[arg(long, value_enum, default_value_t = Priority::Medium)]
        priority: Priority,
    },

    /// List tasks, newest first.
    List,

    /// Toggle completion of a task.
    Toggle {
        /// List position (1-based) or task id / id prefix.
        task: String,
    },

    /// Set the priority of a task.
    Priority {
        /// List position (1-based) or task id / id prefix.
        task: String,
        #[arg(value_enum)]
        level: Priority,
    },

    /// Set or clear the comment on a task.
    Comment {
        /// List position (1-based) or task id / id prefix.
        task: String,
        /// New comment. Omit to clear.
        text: Option<String>,
    },

    /// Delete one or more tasks.
    Delete {
        /// List positions (1-based) or task ids / id prefixes.
        #[arg(required = true)]
        tasks: Vec<String>,
    },

    /// Generate shell completion scripts.
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Resolve a task reference to its position in `rows`.
///
/// Accepts a 1-based position, a full id, or a unique id prefix of at least
/// four characters.
pub fn resolve_task_ref(reference: &str, rows: &[Task]) -> Result<usize, String> {
    let reference = reference.trim();
    if let Ok(pos) = reference.parse::<usize>() {
        if pos >= 1 && pos <= rows.len() {
            return Ok(pos - 1);
        }
        if reference.len() < MIN_ID_PREFIX {
            return Err(format!("No task at position {} ({} tasks)", pos, rows.len()));
        }
    }

    let needle: String = reference.to_lowercase().chars().filter(|c| *c != '-').collect();
    if needle.len() < MIN_ID_PREFIX {
        return Err(format!(
            "Task reference '{}' is too short; use a position or at least {} id characters",
            reference, MIN_ID_PREFIX
        ));
    }

    let matches: Vec<usize> = rows
        .iter()
        .enumerate()
        .filter(|(_, t)| t.id.simple().to_string().starts_with(&needle))
        .map(|(i, _)| i)
        .collect();

    match matches.as_slice() {
        [] => Err(format!("No task found with id '{}'", reference)),
        [only] => Ok(*only),
        many => {
            let mut msg = format!("Multiple tasks match '{}':\n", reference);
            for &i in many {
                msg.push_str(&format!("  {} {}: {}\n", i + 1, rows[i].id, rows[i].title));
            }
            msg.push_str("Please use a longer id prefix.");
            Err(msg)
        }
    }
}

fn fail(msg: impl std::fmt::Display) -> ! {
    eprintln!("{}", msg);
    std::process::exit(1);
}

fn report(result: Result<(), StoreError>) {
    if let Err(e) = result {
        error!("event=cli_command module=cmd status=error error={}", e);
        fail(format!("Error saving: {}", e));
    }
}

/// Launch the terminal UI on an open store.
pub fn cmd_ui(store: TaskStore) {
    if let Err(e) = run_tui(store) {
        error!("event=tui_exit module=cmd status=error error={}", e);
        fail(format!("UI error: {}", e));
    }
}

pub fn cmd_add(store: &mut TaskStore, title: String, priority: Priority) {
    let mut list = ListController::new(store);
    list.open_add_form();
    list.set_draft_title(title);
    list.set_draft_priority(priority);
    match list.submit_add(store) {
        Ok(Some(task)) => println!("Added \"{}\" ({} priority)", task.title, task.priority.label()),
        Ok(None) => fail("Title must not be empty"),
        Err(e) => report(Err(e)),
    }
}

pub fn cmd_list(store: &TaskStore) {
    let list = ListController::new(store);
    if list.rows().is_empty() {
        println!("No tasks");
        return;
    }
    print_table(list.rows());
}

pub fn cmd_toggle(store: &mut TaskStore, reference: &str) {
    let mut list = ListController::new(store);
    let idx = resolve_task_ref(reference, list.rows()).unwrap_or_else(|e| fail(e));
    let task = list.rows()[idx].clone();
    match list.toggle_complete(store, task.id) {
        Ok(Some(true)) => println!("Completed \"{}\"", task.title),
        Ok(Some(false)) => println!("Reopened \"{}\"", task.title),
        Ok(None) => fail(format!("Task {} no longer exists", task.id)),
        Err(e) => report(Err(e)),
    }
}

fn open_detail(store: &TaskStore, reference: &str) -> DetailController {
    let list = ListController::new(store);
    let idx = resolve_task_ref(reference, list.rows()).unwrap_or_else(|e| fail(e));
    DetailController::open(store, list.rows()[idx].id)
        .unwrap_or_else(|| fail(format!("Task '{}' no longer exists", reference)))
}

pub fn cmd_priority(store: &mut TaskStore, reference: &str, level: Priority) {
    let mut detail = open_detail(store, reference);
    report(detail.set_priority(store, level));
    println!("{}", level.description());
}

pub fn cmd_comment(store: &mut TaskStore, reference: &str, text: Option<String>) {
    let mut detail = open_detail(store, reference);
    detail.set_comment_draft(text.unwrap_or_default());
    report(detail.confirm_done(store));
    match detail.task(store).and_then(|t| t.comment.as_deref()) {
        Some(_) => println!("Comment saved"),
        None => println!("Comment cleared"),
    }
}

pub fn cmd_delete(store: &mut TaskStore, references: &[String]) {
    let mut list = ListController::new(store);
    let mut positions = Vec::new();
    for reference in references {
        positions.push(resolve_task_ref(reference, list.rows()).unwrap_or_else(|e| fail(e)));
    }
    match list.delete_at(store, &positions) {
        Ok(n) => println!("Deleted {} task(s)", n),
        Err(e) => report(Err(e)),
    }
}

pub fn cmd_completions(shell: Shell) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut std::io::stdout());
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(titles: &[&str]) -> Vec<Task> {
        let mut store = TaskStore::in_memory();
        for t in titles {
            store.create(t, Priority::Medium).unwrap();
        }
        store.all()
    }

    #[test]
    fn resolves_positions() {
        let rows = rows(&["a", "b"]);
        assert_eq!(resolve_task_ref("1", &rows), Ok(0));
        assert_eq!(resolve_task_ref(" 2 ", &rows), Ok(1));
        assert!(resolve_task_ref("3", &rows).is_err());
        assert!(resolve_task_ref("0", &rows).is_err());
    }

    #[test]
    fn resolves_full_and_prefix_ids() {
        let rows = rows(&["a", "b"]);
        let full = rows[1].id.to_string();
        assert_eq!(resolve_task_ref(&full, &rows), Ok(1));
        assert_eq!(resolve_task_ref(&full.to_uppercase(), &rows), Ok(1));
        let prefix = &rows[1].id.simple().to_string()[..12];
        assert_eq!(resolve_task_ref(prefix, &rows), Ok(1));
    }

    #[test]
    fn rejects_short_or_unknown_ids() {
        let rows = rows(&["a"]);
        assert!(resolve_task_ref("ab", &rows).unwrap_err().contains("too short"));
        assert!(resolve_task_ref("zzzzzzzz", &rows).unwrap_err().contains("No task found"));
    }
}
