//! Task list state: the rendered snapshot, the add-form drafts, and the
//! add/toggle/delete gestures.

use std::collections::HashSet;

use log::{debug, info};
use uuid::Uuid;

use crate::db::{StoreResult, TaskStore};
use crate::fields::Priority;
use crate::task::Task;

/// What the list screen should show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListPresentation {
    /// No tasks at all. There is no loading state; the store is local.
    Empty,
    Rows(usize),
}

/// Presents the full task collection and mediates add, delete and toggle.
#[derive(Debug, Default)]
pub struct ListController {
    rows: Vec<Task>,
    seen_revision: Option<u64>,
    draft_title: String,
    draft_priority: Priority,
    add_form_visible: bool,
}

impl ListController {
    /// Build a controller already showing the store's contents.
    pub fn new(store: &TaskStore) -> Self {
        let mut list = ListController::default();
        list.refresh(store);
        list
    }

    /// Re-read the sorted collection.
    pub fn refresh(&mut self, store: &TaskStore) {
        self.rows = store.all();
        self.seen_revision = Some(store.revision());
    }

    /// Refresh only when the store changed since the last read.
    pub fn sync(&mut self, store: &TaskStore) -> bool {
        if self.seen_revision == Some(store.revision()) {
            return false;
        }
        self.refresh(store);
        true
    }

    pub fn presentation(&self) -> ListPresentation {
        if self.rows.is_empty() {
            ListPresentation::Empty
        } else {
            ListPresentation::Rows(self.rows.len())
        }
    }

    /// The snapshot last read from the store, newest first.
    pub fn rows(&self) -> &[Task] {
        &self.rows
    }

    pub fn row(&self, index: usize) -> Option<&Task> {
        self.rows.get(index)
    }

    pub fn position_of(&self, id: Uuid) -> Option<usize> {
        self.rows.iter().position(|t| t.id == id)
    }

    pub fn draft_title(&self) -> &str {
        &self.draft_title
    }

    pub fn set_draft_title(&mut self, title: impl Into<String>) {
        self.draft_title = title.into();
    }

    pub fn draft_priority(&self) -> Priority {
        self.draft_priority
    }

    pub fn set_draft_priority(&mut self, priority: Priority) {
        self.draft_priority = priority;
    }

    pub fn is_add_form_visible(&self) -> bool {
        self.add_form_visible
    }

    pub fn open_add_form(&mut self) {
        self.add_form_visible = true;
    }

    /// Hide the form. Drafts survive until the next successful add.
    pub fn cancel_add(&mut self) {
        self.add_form_visible = false;
    }

    /// Whether the add action is currently enabled.
    pub fn can_submit(&self) -> bool {
        !self.draft_title.trim().is_empty()
    }

    /// Create a task from the drafts.
    ///
    /// A blank title refuses silently: nothing is created, the form stays open
    /// and `Ok(None)` is returned.
    pub fn submit_add(&mut self, store: &mut TaskStore) -> StoreResult<Option<Task>> {
        if !self.can_submit() {
            debug!("event=list_add module=controller status=refused reason=empty_title");
            return Ok(None);
        }
        let task = store.create(&self.draft_title, self.draft_priority)?;
        self.draft_title.clear();
        self.draft_priority = Priority::Medium;
        self.add_form_visible = false;
        self.refresh(store);
        Ok(Some(task))
    }

    /// Invert completion of the identified task and persist it.
    ///
    /// Reads the current stored value each time, so repeated calls alternate.
    /// Returns the new value, or `None` for an unknown id.
    pub fn toggle_complete(&mut self, store: &mut TaskStore, id: Uuid) -> StoreResult<Option<bool>> {
        let Some(mut task) = store.get(id).cloned() else {
            debug!("event=list_toggle module=controller status=skipped id={}", id);
            return Ok(None);
        };
        task.is_completed = !task.is_completed;
        store.update(&task)?;
        self.refresh(store);
        Ok(Some(task.is_completed))
    }

    /// Delete the tasks at the given positions of the rendered snapshot.
    ///
    /// Positions are resolved against `rows()` as last shown, before any
    /// refresh. Out-of-range positions are ignored.
    pub fn delete_at(&mut self, store: &mut TaskStore, indices: &[usize]) -> StoreResult<usize> {
        let ids: HashSet<Uuid> = indices
            .iter()
            .filter_map(|&i| self.rows.get(i))
            .map(|t| t.id)
            .collect();
        let removed = if ids.is_empty() { 0 } else { store.delete(&ids)? };
        self.refresh(store);
        info!(
            "event=list_delete module=controller status=ok positions={} removed={}",
            indices.len(),
            removed
        );
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded(titles: &[&str]) -> (TaskStore, ListController) {
        let mut store = TaskStore::in_memory();
        for t in titles {
            store.create(t, Priority::Medium).unwrap();
        }
        let list = ListController::new(&store);
        (store, list)
    }

    #[test]
    fn empty_store_presents_empty() {
        let (_, list) = seeded(&[]);
        assert_eq!(list.presentation(), ListPresentation::Empty);
    }

    #[test]
    fn submit_add_resets_drafts_and_closes_form() {
        let (mut store, mut list) = seeded(&[]);
        list.open_add_form();
        list.set_draft_title("Buy milk");
        list.set_draft_priority(Priority::High);

        let task = list.submit_add(&mut store).unwrap().unwrap();
        assert_eq!(task.priority, Priority::High);
        assert_eq!(list.draft_title(), "");
        assert_eq!(list.draft_priority(), Priority::Medium);
        assert!(!list.is_add_form_visible());
        assert_eq!(list.presentation(), ListPresentation::Rows(1));
    }

    #[test]
    fn blank_title_keeps_form_open() {
        let (mut store, mut list) = seeded(&[]);
        list.open_add_form();
        list.set_draft_title("   ");
        list.set_draft_priority(Priority::Low);

        assert_eq!(list.submit_add(&mut store).unwrap(), None);
        assert!(list.is_add_form_visible());
        assert_eq!(list.draft_title(), "   ");
        assert_eq!(list.draft_priority(), Priority::Low);
        assert!(store.is_empty());
    }

    #[test]
    fn cancel_keeps_drafts() {
        let (_, mut list) = seeded(&[]);
        list.open_add_form();
        list.set_draft_title("half typed");
        list.cancel_add();
        assert!(!list.is_add_form_visible());
        assert_eq!(list.draft_title(), "half typed");
    }

    #[test]
    fn toggle_twice_restores_state() {
        let (mut store, mut list) = seeded(&["a"]);
        let id = list.rows()[0].id;
        assert_eq!(list.toggle_complete(&mut store, id).unwrap(), Some(true));
        assert!(list.rows()[0].is_completed);
        assert_eq!(list.toggle_complete(&mut store, id).unwrap(), Some(false));
        assert!(!store.get(id).unwrap().is_completed);
    }

    #[test]
    fn toggle_unknown_id_is_noop() {
        let (mut store, mut list) = seeded(&["a"]);
        assert_eq!(list.toggle_complete(&mut store, Uuid::new_v4()).unwrap(), None);
    }

    #[test]
    fn delete_at_uses_rendered_snapshot() {
        let (mut store, mut list) = seeded(&["a", "b", "c"]);
        let shown: Vec<Uuid> = list.rows().iter().map(|t| t.id).collect();

        // Another part of the app adds a task after the list rendered.
        store.create("late", Priority::Medium).unwrap();

        let survivor = store.get(shown[1]).unwrap().clone();
        assert_eq!(list.delete_at(&mut store, &[0, 2, 9]).unwrap(), 2);
        assert!(store.get(shown[0]).is_none());
        assert_eq!(store.get(shown[1]), Some(&survivor));
        assert!(store.get(shown[2]).is_none());
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn sync_only_refreshes_after_changes() {
        let (mut store, mut list) = seeded(&["a"]);
        assert!(!list.sync(&store));

        let mut task = store.all()[0].clone();
        task.priority = Priority::High;
        store.update(&task).unwrap();

        assert!(list.sync(&store));
        assert_eq!(list.rows()[0].priority, Priority::High);
    }
}
