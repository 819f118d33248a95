//! Task storage and display helpers.
//!
//! This module provides `TaskStore`, the durable collection of tasks backed by a
//! single JSON document, plus the formatting helpers shared by the CLI table and
//! the terminal UI.

use std::collections::HashSet;
use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, Utc};
use log::{debug, error, info};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::fields::Priority;
use crate::task::{normalise_comment, Task};

/// Errors raised by the task store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("task title must not be empty")]
    EmptyTitle,
    #[error("could not open task store at {path}: {source}")]
    Open { path: PathBuf, source: io::Error },
    #[error("task store at {path} is corrupt: {source}")]
    Corrupt {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("could not write task store: {0}")]
    Write(#[from] io::Error),
    #[error("could not encode task store: {0}")]
    Encode(#[from] serde_json::Error),
}

impl StoreError {
    /// True for failures that happen while opening the store. These are fatal.
    pub fn is_init_failure(&self) -> bool {
        matches!(self, StoreError::Open { .. } | StoreError::Corrupt { .. })
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Source of creation timestamps.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock in UTC.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// On-disk document. Tasks are kept in insertion order.
#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreFile {
    tasks: Vec<Task>,
}

#[derive(Serialize)]
struct StoreFileRef<'a> {
    tasks: &'a [Task],
}

/// The persisted task collection.
///
/// Every mutating call commits to disk before it returns, so the next `all()`
/// always reflects earlier writes. `revision()` moves on each successful
/// mutation and lets views detect changes made elsewhere in the app.
pub struct TaskStore {
    path: Option<PathBuf>,
    tasks: Vec<Task>,
    revision: u64,
    clock: Box<dyn Clock>,
}

impl TaskStore {
    /// Open the store at `path`, creating an empty document if none exists.
    pub fn open(path: &Path) -> StoreResult<Self> {
        info!("event=store_open module=db status=start path={}", path.display());
        let tasks = match Self::read_file(path) {
            Ok(tasks) => tasks,
            Err(e) => {
                error!("event=store_open module=db status=error error={}", e);
                return Err(e);
            }
        };
        let store = TaskStore {
            path: Some(path.to_path_buf()),
            tasks,
            revision: 0,
            clock: Box::new(SystemClock),
        };
        if !path.exists() {
            store.save(&store.tasks).map_err(|e| match e {
                StoreError::Write(source) => StoreError::Open {
                    path: path.to_path_buf(),
                    source,
                },
                other => other,
            })?;
        }
        info!(
            "event=store_open module=db status=ok tasks={}",
            store.tasks.len()
        );
        Ok(store)
    }

    /// A store with no backing file.
    pub fn in_memory() -> Self {
        TaskStore {
            path: None,
            tasks: Vec::new(),
            revision: 0,
            clock: Box::new(SystemClock),
        }
    }

    /// Replace the timestamp source used by `create`.
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    fn read_file(path: &Path) -> StoreResult<Vec<Task>> {
        let open_err = |source: io::Error| StoreError::Open {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(open_err)?;
        }
        if !path.exists() {
            return Ok(Vec::new());
        }
        let mut buf = String::new();
        File::open(path)
            .and_then(|mut f| f.read_to_string(&mut buf))
            .map_err(open_err)?;
        let file: StoreFile = serde_json::from_str(&buf).map_err(|source| StoreError::Corrupt {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(file.tasks)
    }

    /// Write `tasks` as the document using atomic write (temp file + rename).
    fn save(&self, tasks: &[Task]) -> StoreResult<()> {
        let Some(path) = self.path.as_ref() else {
            return Ok(());
        };
        let tmp = path.with_extension("json.tmp");
        let data = serde_json::to_string_pretty(&StoreFileRef { tasks })?;
        let mut f = File::create(&tmp)?;
        f.write_all(data.as_bytes())?;
        f.flush()?;
        f.sync_all()?;
        fs::rename(&tmp, path)?;
        Ok(())
    }

    /// Persist `tasks`, then make them current. On failure nothing in memory changes.
    fn commit(&mut self, tasks: Vec<Task>) -> StoreResult<()> {
        if let Err(e) = self.save(&tasks) {
            error!("event=store_commit module=db status=error error={}", e);
            return Err(e);
        }
        self.tasks = tasks;
        self.revision += 1;
        debug!(
            "event=store_commit module=db status=ok tasks={} revision={}",
            self.tasks.len(),
            self.revision
        );
        Ok(())
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Create and persist a task. The title is stored trimmed.
    pub fn create(&mut self, title: &str, priority: Priority) -> StoreResult<Task> {
        let title = title.trim();
        if title.is_empty() {
            return Err(StoreError::EmptyTitle);
        }
        let task = Task::new(title, priority, self.clock.now());
        let mut tasks = self.tasks.clone();
        tasks.push(task.clone());
        self.commit(tasks)?;
        info!(
            "event=task_create module=db status=ok id={} priority={}",
            task.id,
            u8::from(priority)
        );
        Ok(task)
    }

    /// All tasks, newest first. Equal timestamps keep insertion order.
    pub fn all(&self) -> Vec<Task> {
        let mut tasks = self.tasks.clone();
        tasks.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        tasks
    }

    /// Get a task by ID.
    pub fn get(&self, id: Uuid) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Persist the mutable fields of `task` onto the stored copy with the same id.
    ///
    /// Returns `false` without writing when the id is unknown.
    pub fn update(&mut self, task: &Task) -> StoreResult<bool> {
        let mut tasks = self.tasks.clone();
        let Some(stored) = tasks.iter_mut().find(|t| t.id == task.id) else {
            debug!("event=task_update module=db status=skipped id={}", task.id);
            return Ok(false);
        };
        stored.is_completed = task.is_completed;
        stored.priority = task.priority;
        stored.comment = normalise_comment(task.comment.clone());
        self.commit(tasks)?;
        debug!("event=task_update module=db status=ok id={}", task.id);
        Ok(true)
    }

    /// Remove tasks by IDs. Unknown IDs are ignored.
    pub fn delete(&mut self, ids: &HashSet<Uuid>) -> StoreResult<usize> {
        let tasks: Vec<Task> = self
            .tasks
            .iter()
            .filter(|t| !ids.contains(&t.id))
            .cloned()
            .collect();
        let removed = self.tasks.len() - tasks.len();
        if removed > 0 {
            self.commit(tasks)?;
        }
        info!(
            "event=task_delete module=db status=ok requested={} removed={}",
            ids.len(),
            removed
        );
        Ok(removed)
    }
}

/// Format a creation time for list rows ("5 Mar 14:02").
pub fn format_created_short(at: DateTime<Utc>) -> String {
    at.with_timezone(&Local).format("%-d %b %H:%M").to_string()
}

/// Format a creation time for the detail view ("5 Mar 2025, 14:02").
pub fn format_created_long(at: DateTime<Utc>) -> String {
    at.with_timezone(&Local).format("%-d %b %Y, %H:%M").to_string()
}

/// Check box shown in front of a task.
pub fn format_check(done: bool) -> &'static str {
    if done {
        "[x]"
    } else {
        "[ ]"
    }
}

/// Print tasks in a formatted table with 1-based positions.
pub fn print_table(tasks: &[Task]) {
    println!("{:<4} {:<4} {:<8} {:<13} {:<8} {}", "#", "Done", "Pri", "Created", "ID", "Title");
    for (i, t) in tasks.iter().enumerate() {
        let mut id = t.id.simple().to_string();
        id.truncate(8);
        let comment = if t.comment.is_some() { " *" } else { "" };
        println!(
            "{:<4} {:<4} {:<8} {:<13} {:<8} {}{}",
            i + 1,
            format_check(t.is_completed),
            t.priority.label(),
            format_created_short(t.created_at),
            id,
            truncate(&t.title, 60),
            comment
        );
    }
}

/// Truncate a string to a maximum width, adding ellipsis if needed.
pub fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        s.to_string()
    } else {
        let mut out = String::new();
        for (i, ch) in s.chars().enumerate() {
            if i + 1 >= width {
                out.push('…');
                break;
            }
            out.push(ch);
        }
        out
    }
}
