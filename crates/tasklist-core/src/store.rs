//! The task store: single owner of the collection, criteria and selection.
//!
//! Every command recomputes the derived views (visible subset, statistics and
//! the selection reconciliation) before returning, so readers never observe a
//! half-applied change.

use std::collections::{HashMap, HashSet};

use time::OffsetDateTime;

use crate::error::{Result, StoreError};
use crate::filter::{FilterCriteria, PriorityFilter, SortKey, StatusFilter};
use crate::id::{IdAllocator, TaskId};
use crate::selection::{Selection, SelectionState};
use crate::snapshot::{ExportSnapshot, ImportFormatError, ImportRecord};
use crate::stats::Statistics;
use crate::task::{Task, TaskFields, ValidationError};

/// Source of "now" for creation and export timestamps.
pub type Clock = fn() -> OffsetDateTime;

/// In-memory task collection with derived views.
#[derive(Debug, Clone)]
pub struct TaskStore {
    tasks: Vec<Task>,
    task_index: HashMap<TaskId, usize>,
    ids: IdAllocator,
    criteria: FilterCriteria,
    selection: Selection,
    visible: Vec<TaskId>,
    stats: Statistics,
    clock: Clock,
}

impl Default for TaskStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskStore {
    /// Empty store; the first task gets id 1.
    #[must_use]
    pub fn new() -> Self {
        Self {
            tasks: Vec::new(),
            task_index: HashMap::new(),
            ids: IdAllocator::default(),
            criteria: FilterCriteria::default(),
            selection: Selection::default(),
            visible: Vec::new(),
            stats: Statistics::default(),
            clock: OffsetDateTime::now_utc,
        }
    }

    /// Store seeded with an existing data set; ids are kept as given.
    ///
    /// # Errors
    /// Fails when a task has a blank title or two tasks share an id.
    pub fn from_tasks(tasks: Vec<Task>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(tasks.len());
        for task in &tasks {
            if task.title.trim().is_empty() {
                return Err(ValidationError::EmptyTitle.into());
            }
            if !seen.insert(task.id) {
                return Err(ImportFormatError::DuplicateId { id: task.id.get() }.into());
            }
        }
        let mut store = Self::new();
        store.ids = IdAllocator::seeded(tasks.iter().map(|task| task.id));
        store.tasks = tasks;
        store.refresh();
        Ok(store)
    }

    /// Replace the clock used for `createdAt` and export timestamps.
    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Replace the initial criteria.
    #[must_use]
    pub fn with_criteria(mut self, criteria: FilterCriteria) -> Self {
        self.set_criteria(criteria);
        self
    }

    // ---------------------------------------------------------------------
    // Queries
    // ---------------------------------------------------------------------

    /// Every task in collection order (most recently inserted first).
    #[must_use]
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Look up a task by id.
    #[must_use]
    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.task_index.get(&id).and_then(|&idx| self.tasks.get(idx))
    }

    /// Whether `id` is in the collection.
    #[must_use]
    pub fn contains(&self, id: TaskId) -> bool {
        self.task_index.contains_key(&id)
    }

    /// Number of tasks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// True when the collection is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Id the next created task will receive.
    #[must_use]
    pub const fn next_id(&self) -> TaskId {
        self.ids.peek()
    }

    /// Active filter criteria.
    #[must_use]
    pub const fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    /// Ids of the visible subset, in display order.
    #[must_use]
    pub fn visible_ids(&self) -> &[TaskId] {
        &self.visible
    }

    /// The visible subset, in display order.
    pub fn visible_tasks(&self) -> impl Iterator<Item = &Task> + '_ {
        self.visible.iter().filter_map(|id| self.get(*id))
    }

    /// Statistics over the full collection.
    #[must_use]
    pub const fn statistics(&self) -> Statistics {
        self.stats
    }

    /// Current selection.
    #[must_use]
    pub const fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Selected ids in ascending order.
    #[must_use]
    pub fn selected_ids(&self) -> Vec<TaskId> {
        self.selection.iter().collect()
    }

    /// Selection summary relative to the visible subset.
    #[must_use]
    pub fn selection_state(&self) -> SelectionState {
        self.selection.state(&self.visible)
    }

    // ---------------------------------------------------------------------
    // Criteria
    // ---------------------------------------------------------------------

    /// Replace all criteria at once.
    pub fn set_criteria(&mut self, criteria: FilterCriteria) {
        self.criteria = criteria;
        self.refresh();
    }

    /// Change the status filter.
    pub fn set_status_filter(&mut self, status: StatusFilter) {
        self.criteria.status = status;
        self.refresh();
    }

    /// Change the priority filter.
    pub fn set_priority_filter(&mut self, priority: PriorityFilter) {
        self.criteria.priority = priority;
        self.refresh();
    }

    /// Change the search text.
    pub fn set_search(&mut self, search: impl Into<String>) {
        self.criteria.search = search.into();
        self.refresh();
    }

    /// Reset the search text to empty.
    pub fn clear_search(&mut self) {
        self.set_search(String::new());
    }

    /// Change the sort key.
    pub fn set_sort(&mut self, sort: SortKey) {
        self.criteria.sort = sort;
        self.refresh();
    }

    // ---------------------------------------------------------------------
    // Selection
    // ---------------------------------------------------------------------

    /// Mark `id` for bulk operations.
    ///
    /// # Errors
    /// Returns [`StoreError::NotFound`] when `id` is not in the collection.
    pub fn select(&mut self, id: TaskId) -> Result<()> {
        self.set_selected(id, true)
    }

    /// Unmark `id`. Unknown ids are ignored.
    pub fn deselect(&mut self, id: TaskId) {
        self.selection.deselect(id);
    }

    /// Set selection membership of `id` explicitly.
    ///
    /// # Errors
    /// Returns [`StoreError::NotFound`] when selecting an id not in the collection.
    pub fn set_selected(&mut self, id: TaskId, selected: bool) -> Result<()> {
        if selected && !self.contains(id) {
            return Err(StoreError::NotFound(id));
        }
        self.selection.set(id, selected);
        Ok(())
    }

    /// Select every currently visible task.
    pub fn select_all_visible(&mut self) {
        self.selection.select_all(&self.visible);
    }

    /// Empty the selection.
    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    // ---------------------------------------------------------------------
    // Mutations
    // ---------------------------------------------------------------------

    /// Create a task at the front of the collection and return its id.
    ///
    /// # Errors
    /// Returns [`StoreError::Validation`] when the title is blank; nothing changes then.
    pub fn add(&mut self, fields: TaskFields) -> Result<TaskId> {
        let fields = fields.validate()?;
        let id = self.ids.next_id();
        let task = Task::new(id, fields, (self.clock)());
        self.tasks.insert(0, task);
        self.refresh();
        Ok(id)
    }

    /// Overwrite title, description, priority and due date of `id`.
    ///
    /// # Errors
    /// Returns [`StoreError::NotFound`] for unknown ids and
    /// [`StoreError::Validation`] for a blank title; nothing changes then.
    pub fn edit(&mut self, id: TaskId, fields: TaskFields) -> Result<()> {
        let idx = self.index_of(id)?;
        let fields = fields.validate()?;
        self.tasks[idx].overwrite(fields);
        self.refresh();
        Ok(())
    }

    /// Flip the completion flag of `id` and return the new value.
    ///
    /// # Errors
    /// Returns [`StoreError::NotFound`] for unknown ids.
    pub fn toggle_completion(&mut self, id: TaskId) -> Result<bool> {
        let idx = self.index_of(id)?;
        let task = &mut self.tasks[idx];
        task.completed = !task.completed;
        let completed = task.completed;
        self.refresh();
        Ok(completed)
    }

    /// Remove `id` and return the removed task.
    ///
    /// # Errors
    /// Returns [`StoreError::NotFound`] for unknown ids, including a second
    /// delete of the same id.
    pub fn delete(&mut self, id: TaskId) -> Result<Task> {
        let idx = self.index_of(id)?;
        let removed = self.tasks.remove(idx);
        self.refresh();
        Ok(removed)
    }

    /// Set the completion flag on every listed task that still exists.
    ///
    /// Missing ids are skipped. Returns how many tasks matched.
    pub fn bulk_set_completion<I>(&mut self, ids: I, completed: bool) -> usize
    where
        I: IntoIterator<Item = TaskId>,
    {
        let wanted: HashSet<TaskId> = ids.into_iter().collect();
        let mut matched = 0;
        for task in self.tasks.iter_mut().filter(|task| wanted.contains(&task.id)) {
            task.completed = completed;
            matched += 1;
        }
        self.refresh();
        matched
    }

    /// Remove every listed task that still exists.
    ///
    /// Missing ids are skipped. Returns how many tasks were removed.
    pub fn bulk_delete<I>(&mut self, ids: I) -> usize
    where
        I: IntoIterator<Item = TaskId>,
    {
        let doomed: HashSet<TaskId> = ids.into_iter().collect();
        let before = self.tasks.len();
        self.tasks.retain(|task| !doomed.contains(&task.id));
        let removed = before - self.tasks.len();
        self.refresh();
        removed
    }

    /// Move `id` to the front of the collection.
    ///
    /// Only visible under [`SortKey::Manual`]; every other key re-sorts by
    /// task fields. Unknown ids are a no-op and return `false`.
    pub fn reorder_to_front(&mut self, id: TaskId) -> bool {
        let Some(&idx) = self.task_index.get(&id) else {
            return false;
        };
        let task = self.tasks.remove(idx);
        self.tasks.insert(0, task);
        self.refresh();
        true
    }

    /// Replace the whole collection with `records`, each under a fresh id.
    ///
    /// The selection is cleared. Records keep their order; the first record
    /// receives the lowest new id.
    ///
    /// # Errors
    /// Returns [`StoreError::ImportFormat`] when a record has a blank title;
    /// the current collection is untouched then.
    pub fn import_replace_all(&mut self, records: Vec<ImportRecord>) -> Result<Vec<TaskId>> {
        if let Some(index) = records.iter().position(|record| record.title.trim().is_empty()) {
            return Err(ImportFormatError::MissingTitle { index }.into());
        }
        let now = (self.clock)();
        let mut imported = Vec::with_capacity(records.len());
        let mut ids = Vec::with_capacity(records.len());
        for record in records {
            let id = self.ids.next_id();
            ids.push(id);
            imported.push(Task {
                id,
                title: record.title.trim().to_owned(),
                description: record.description,
                priority: record.priority,
                due_date: record.due_date,
                completed: record.completed,
                created_at: record.created_at.unwrap_or(now),
            });
        }
        self.tasks = imported;
        self.selection.clear();
        self.refresh();
        Ok(ids)
    }

    /// Copy of the full collection stamped with the current time.
    #[must_use]
    pub fn export_snapshot(&self) -> ExportSnapshot {
        ExportSnapshot::new(self.tasks.clone(), (self.clock)())
    }

    fn index_of(&self, id: TaskId) -> Result<usize> {
        self.task_index.get(&id).copied().ok_or(StoreError::NotFound(id))
    }

    fn refresh(&mut self) {
        self.task_index.clear();
        for (idx, task) in self.tasks.iter().enumerate() {
            self.task_index.insert(task.id, idx);
        }
        let index = &self.task_index;
        self.selection.reconcile(|id| index.contains_key(&id));
        self.visible = self
            .criteria
            .apply(&self.tasks)
            .into_iter()
            .map(|task| task.id)
            .collect();
        self.stats = Statistics::compute(&self.tasks);
    }
}
