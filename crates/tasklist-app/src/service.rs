//! Service façade shared by every front end.
//!
//! Wraps the [`TaskStore`] with logging, selection-driven bulk actions and the
//! prompt text destructive commands must be confirmed with.

use std::path::{Path, PathBuf};

use tasklist_core::error::Result;
use tasklist_core::{
    PriorityFilter, SelectionState, SortKey, StatusFilter, StoreError, Task,
    TaskFields, TaskId, TaskStore,
};
use tracing::{debug, info, warn};

use crate::task_patch::TaskPatch;
use crate::transfer::{self, PendingImport, TransferError};

/// Prompt a caller must get consent for before running a destructive command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Confirmation {
    /// Short heading.
    pub title: String,
    /// Question shown to the user.
    pub message: String,
}

/// Task service owning the store for the whole session.
#[derive(Debug, Default)]
pub struct TaskService {
    store: TaskStore,
}

impl TaskService {
    /// Wrap an existing store.
    #[must_use]
    pub const fn new(store: TaskStore) -> Self {
        Self { store }
    }

    /// Read-only access to the store and its derived views.
    #[must_use]
    pub const fn store(&self) -> &TaskStore {
        &self.store
    }

    // ---------------------------------------------------------------------
    // Single-task commands
    // ---------------------------------------------------------------------

    /// Create a task.
    ///
    /// # Errors
    /// Returns a validation error when the title is blank.
    pub fn add(&mut self, fields: TaskFields) -> Result<TaskId> {
        let id = self
            .store
            .add(fields)
            .inspect_err(|err| warn!("add rejected: {err}"))?;
        info!(task = %id, "task added");
        Ok(id)
    }

    /// Apply a partial edit.
    ///
    /// # Errors
    /// Returns not-found for unknown ids and a validation error for a blank title.
    pub fn edit(&mut self, id: TaskId, patch: TaskPatch) -> Result<()> {
        let fields = self
            .store
            .get(id)
            .map(|task| patch.apply_to(task))
            .ok_or(StoreError::NotFound(id))?;
        self.store
            .edit(id, fields)
            .inspect_err(|err| warn!(task = %id, "edit rejected: {err}"))?;
        info!(task = %id, "task updated");
        Ok(())
    }

    /// Flip completion and return the new value.
    ///
    /// # Errors
    /// Returns not-found for unknown ids.
    pub fn toggle(&mut self, id: TaskId) -> Result<bool> {
        let completed = self.store.toggle_completion(id)?;
        info!(task = %id, completed, "completion toggled");
        Ok(completed)
    }

    /// Prompt for deleting `id`, naming its title.
    ///
    /// # Errors
    /// Returns not-found for unknown ids.
    pub fn confirm_delete(&self, id: TaskId) -> Result<Confirmation> {
        let task = self
            .store
            .get(id)
            .ok_or(StoreError::NotFound(id))?;
        Ok(Confirmation {
            title: "Delete Task".into(),
            message: format!("Are you sure you want to delete \"{}\"?", task.title),
        })
    }

    /// Delete a task the caller has confirmed.
    ///
    /// # Errors
    /// Returns not-found for unknown ids.
    pub fn delete(&mut self, id: TaskId) -> Result<Task> {
        let removed = self.store.delete(id)?;
        info!(task = %id, "task deleted");
        Ok(removed)
    }

    /// Move a task to the front of the manual order.
    pub fn reorder_to_front(&mut self, id: TaskId) -> bool {
        let moved = self.store.reorder_to_front(id);
        if moved {
            debug!(task = %id, "task reordered to front");
        }
        moved
    }

    // ---------------------------------------------------------------------
    // Selection
    // ---------------------------------------------------------------------

    /// Select every id, or none of them when any id is unknown.
    ///
    /// # Errors
    /// Returns not-found for the first id absent from the collection; the
    /// selection is unchanged then.
    pub fn select(&mut self, ids: &[TaskId]) -> Result<()> {
        if let Some(&missing) = ids.iter().find(|&&id| !self.store.contains(id)) {
            warn!(task = %missing, "select rejected: unknown task");
            return Err(StoreError::NotFound(missing));
        }
        for &id in ids {
            self.store.select(id)?;
        }
        debug!(selected = self.store.selection().len(), "selection extended");
        Ok(())
    }

    /// Deselect every id.
    pub fn deselect(&mut self, ids: &[TaskId]) {
        for &id in ids {
            self.store.deselect(id);
        }
    }

    /// Set membership of a single task explicitly.
    ///
    /// # Errors
    /// Returns not-found when selecting an id absent from the collection.
    pub fn set_selected(&mut self, id: TaskId, selected: bool) -> Result<()> {
        self.store.set_selected(id, selected)?;
        debug!(task = %id, selected, "selection toggled");
        Ok(())
    }

    /// Select every visible task.
    pub fn select_all_visible(&mut self) {
        self.store.select_all_visible();
        debug!(selected = self.store.selection().len(), "visible tasks selected");
    }

    /// Drop the selection.
    pub fn clear_selection(&mut self) {
        self.store.clear_selection();
    }

    /// Tri-state selection summary for the visible subset.
    #[must_use]
    pub fn selection_state(&self) -> SelectionState {
        self.store.selection_state()
    }

    /// Mark every selected task completed, then clear the selection.
    pub fn complete_selected(&mut self) -> usize {
        self.set_selected_completion(true)
    }

    /// Mark every selected task open again, then clear the selection.
    pub fn reopen_selected(&mut self) -> usize {
        self.set_selected_completion(false)
    }

    fn set_selected_completion(&mut self, completed: bool) -> usize {
        let ids = self.store.selected_ids();
        let matched = self.store.bulk_set_completion(ids, completed);
        self.store.clear_selection();
        info!(matched, completed, "bulk completion applied");
        matched
    }

    /// Prompt for deleting the selection; `None` when nothing is selected.
    #[must_use]
    pub fn confirm_delete_selected(&self) -> Option<Confirmation> {
        let count = self.store.selection().len();
        (count > 0).then(|| Confirmation {
            title: "Delete Tasks".into(),
            message: format!("Are you sure you want to delete {count} selected task(s)?"),
        })
    }

    /// Delete every selected task the caller has confirmed.
    pub fn delete_selected(&mut self) -> usize {
        let ids = self.store.selected_ids();
        let removed = self.store.bulk_delete(ids);
        self.store.clear_selection();
        info!(removed, "selected tasks deleted");
        removed
    }

    // ---------------------------------------------------------------------
    // Criteria
    // ---------------------------------------------------------------------

    /// Change the status filter.
    pub fn set_status(&mut self, status: StatusFilter) {
        debug!(status = status.as_str(), "status filter changed");
        self.store.set_status_filter(status);
    }

    /// Change the priority filter.
    pub fn set_priority(&mut self, priority: PriorityFilter) {
        debug!(priority = priority.as_str(), "priority filter changed");
        self.store.set_priority_filter(priority);
    }

    /// Change the search text.
    pub fn set_search(&mut self, search: impl Into<String>) {
        let search = search.into();
        debug!(search = %search, "search changed");
        self.store.set_search(search);
    }

    /// Reset the search text to empty.
    pub fn clear_search(&mut self) {
        self.store.clear_search();
    }

    /// Change the sort key.
    pub fn set_sort(&mut self, sort: SortKey) {
        debug!(sort = sort.as_str(), "sort key changed");
        self.store.set_sort(sort);
    }

    // ---------------------------------------------------------------------
    // Export / import
    // ---------------------------------------------------------------------

    /// Read and validate an import file without touching the store.
    ///
    /// # Errors
    /// Propagates read and format errors.
    pub async fn load_import(path: impl AsRef<Path>) -> std::result::Result<PendingImport, TransferError> {
        transfer::read_import_file(path)
            .await
            .inspect_err(|err| warn!("import rejected: {err}"))
    }

    /// Prompt for replacing the collection with `pending`.
    #[must_use]
    pub fn confirm_import(pending: &PendingImport) -> Confirmation {
        Confirmation {
            title: "Import Tasks".into(),
            message: format!(
                "This will replace all current tasks with {} imported tasks. Continue?",
                pending.len()
            ),
        }
    }

    /// Replace the collection with a confirmed import.
    ///
    /// # Errors
    /// Returns an import format error when a record has a blank title.
    pub fn apply_import(&mut self, pending: PendingImport) -> Result<Vec<TaskId>> {
        let PendingImport { source, records } = pending;
        let ids = self.store.import_replace_all(records)?;
        info!(source = %source.display(), imported = ids.len(), "tasks imported");
        Ok(ids)
    }

    /// Export the collection into `dir`.
    ///
    /// # Errors
    /// Propagates encoding and write errors.
    pub async fn export_to(&self, dir: impl AsRef<Path>) -> std::result::Result<PathBuf, TransferError> {
        let snapshot = self.store.export_snapshot();
        let path = transfer::write_export(dir, &snapshot).await?;
        info!(path = %path.display(), tasks = snapshot.todos.len(), "tasks exported");
        Ok(path)
    }
}
