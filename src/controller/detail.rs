//! Editing of a single task.
//!
//! Completion and priority are written to the store on every change. The
//! comment is edited as a draft and committed when the view is left, whether by
//! navigating away or by the explicit Done action.

use log::debug;
use uuid::Uuid;

use crate::db::{StoreResult, TaskStore};
use crate::fields::Priority;
use crate::task::{normalise_comment, Task};

#[derive(Debug, Clone)]
pub struct DetailController {
    task_id: Uuid,
    comment_draft: String,
}

impl DetailController {
    /// Enter the detail view for `id`. `None` if the task does not exist.
    pub fn open(store: &TaskStore, id: Uuid) -> Option<Self> {
        store.get(id)?;
        let mut detail = DetailController {
            task_id: id,
            comment_draft: String::new(),
        };
        detail.on_enter(store);
        Some(detail)
    }

    /// Load the comment draft from the stored task.
    pub fn on_enter(&mut self, store: &TaskStore) {
        self.comment_draft = store
            .get(self.task_id)
            .map(|t| t.comment_text().to_string())
            .unwrap_or_default();
    }

    pub fn task<'a>(&self, store: &'a TaskStore) -> Option<&'a Task> {
        store.get(self.task_id)
    }

    /// Apply `edit` to the stored task and persist it.
    fn write_through(&self, store: &mut TaskStore, edit: impl FnOnce(&mut Task)) -> StoreResult<()> {
        let Some(mut task) = store.get(self.task_id).cloned() else {
            return Ok(());
        };
        edit(&mut task);
        store.update(&task)?;
        Ok(())
    }

    pub fn set_completed(&mut self, store: &mut TaskStore, done: bool) -> StoreResult<()> {
        self.write_through(store, |t| t.is_completed = done)
    }

    pub fn toggle_completed(&mut self, store: &mut TaskStore) -> StoreResult<()> {
        self.write_through(store, |t| t.is_completed = !t.is_completed)
    }

    pub fn set_priority(&mut self, store: &mut TaskStore, priority: Priority) -> StoreResult<()> {
        self.write_through(store, |t| t.priority = priority)
    }

    pub fn cycle_priority(&mut self, store: &mut TaskStore, forward: bool) -> StoreResult<()> {
        self.write_through(store, |t| t.priority = t.priority.cycle(forward))
    }

    pub fn comment_draft(&self) -> &str {
        &self.comment_draft
    }

    pub fn set_comment_draft(&mut self, text: impl Into<String>) {
        self.comment_draft = text.into();
    }

    /// Leaving the view commits the comment draft.
    pub fn on_exit(&mut self, store: &mut TaskStore) -> StoreResult<()> {
        self.commit_comment(store)
    }

    /// The explicit Done action. Same commit as `on_exit`.
    pub fn confirm_done(&mut self, store: &mut TaskStore) -> StoreResult<()> {
        self.commit_comment(store)
    }

    fn commit_comment(&mut self, store: &mut TaskStore) -> StoreResult<()> {
        let comment = normalise_comment(Some(self.comment_draft.clone()));
        debug!(
            "event=detail_commit module=controller id={} has_comment={}",
            self.task_id,
            comment.is_some()
        );
        self.write_through(store, |t| t.comment = comment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn one_task() -> (TaskStore, Uuid) {
        let mut store = TaskStore::in_memory();
        let id = store.create("Buy milk", Priority::Medium).unwrap().id;
        (store, id)
    }

    #[test]
    fn open_unknown_task_is_none() {
        let (store, _) = one_task();
        assert!(DetailController::open(&store, Uuid::new_v4()).is_none());
    }

    #[test]
    fn absent_comment_loads_as_empty_draft() {
        let (store, id) = one_task();
        let detail = DetailController::open(&store, id).unwrap();
        assert_eq!(detail.comment_draft(), "");
    }

    #[test]
    fn setters_commit_immediately() {
        let (mut store, id) = one_task();
        let mut detail = DetailController::open(&store, id).unwrap();

        detail.set_completed(&mut store, true).unwrap();
        detail.set_priority(&mut store, Priority::High).unwrap();

        let task = store.get(id).unwrap();
        assert!(task.is_completed);
        assert_eq!(task.priority, Priority::High);
    }

    #[test]
    fn comment_is_deferred_until_exit() {
        let (mut store, id) = one_task();
        let mut detail = DetailController::open(&store, id).unwrap();

        detail.set_comment_draft("note");
        assert_eq!(store.get(id).unwrap().comment, None);

        detail.on_exit(&mut store).unwrap();
        assert_eq!(store.get(id).unwrap().comment.as_deref(), Some("note"));
    }

    #[test]
    fn done_and_exit_commit_the_same_way() {
        let (mut store, id) = one_task();
        let mut detail = DetailController::open(&store, id).unwrap();

        detail.set_comment_draft("via done");
        detail.confirm_done(&mut store).unwrap();
        assert_eq!(store.get(id).unwrap().comment.as_deref(), Some("via done"));

        detail.set_comment_draft("");
        detail.on_exit(&mut store).unwrap();
        assert_eq!(store.get(id).unwrap().comment, None);
    }

    #[test]
    fn reentering_reloads_draft() {
        let (mut store, id) = one_task();
        let mut detail = DetailController::open(&store, id).unwrap();
        detail.set_comment_draft("kept");
        detail.on_exit(&mut store).unwrap();

        let again = DetailController::open(&store, id).unwrap();
        assert_eq!(again.comment_draft(), "kept");
    }

    #[test]
    fn commit_after_delete_is_noop() {
        let (mut store, id) = one_task();
        let mut detail = DetailController::open(&store, id).unwrap();
        store.delete(&[id].into_iter().collect()).unwrap();

        detail.set_comment_draft("orphan");
        detail.on_exit(&mut store).unwrap();
        detail.set_priority(&mut store, Priority::Low).unwrap();
        assert!(store.is_empty());
    }
}
