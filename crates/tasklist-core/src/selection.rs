//! Tracks which tasks are marked for bulk operations.

use std::collections::BTreeSet;

use crate::id::TaskId;

/// Tri-state summary of the selection relative to the visible tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionState {
    /// No visible task is selected.
    None,
    /// Some, but not all, visible tasks are selected.
    Some,
    /// Every visible task is selected (and at least one is visible).
    All,
}

/// Set of selected task identifiers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    ids: BTreeSet<TaskId>,
}

impl Selection {
    /// Add `id`; selecting twice is harmless.
    pub fn select(&mut self, id: TaskId) {
        self.ids.insert(id);
    }

    /// Remove `id`; deselecting an unselected id is harmless.
    pub fn deselect(&mut self, id: TaskId) {
        self.ids.remove(&id);
    }

    /// Set membership explicitly, as a checkbox would.
    pub fn set(&mut self, id: TaskId, selected: bool) {
        if selected {
            self.select(id);
        } else {
            self.deselect(id);
        }
    }

    /// Add every visible id. Ids outside `visible` are left alone.
    pub fn select_all<'a, I>(&mut self, visible: I)
    where
        I: IntoIterator<Item = &'a TaskId>,
    {
        self.ids.extend(visible.into_iter().copied());
    }

    /// Drop every selected id.
    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// Forget ids that are no longer part of the collection.
    pub fn reconcile<F>(&mut self, mut exists: F)
    where
        F: FnMut(TaskId) -> bool,
    {
        self.ids.retain(|id| exists(*id));
    }

    /// Whether `id` is selected.
    #[must_use]
    pub fn contains(&self, id: TaskId) -> bool {
        self.ids.contains(&id)
    }

    /// Number of selected ids, visible or not.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// True when nothing is selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Selected ids in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = TaskId> + '_ {
        self.ids.iter().copied()
    }

    /// True iff `visible` is non-empty and every one of its ids is selected.
    #[must_use]
    pub fn is_all_selected(&self, visible: &[TaskId]) -> bool {
        !visible.is_empty() && visible.iter().all(|id| self.ids.contains(id))
    }

    /// True iff at least one visible id is selected.
    #[must_use]
    pub fn is_any_selected(&self, visible: &[TaskId]) -> bool {
        visible.iter().any(|id| self.ids.contains(id))
    }

    /// Summarise the selection against the visible ids.
    #[must_use]
    pub fn state(&self, visible: &[TaskId]) -> SelectionState {
        if self.is_all_selected(visible) {
            SelectionState::All
        } else if self.is_any_selected(visible) {
            SelectionState::Some
        } else {
            SelectionState::None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(raw: &[u64]) -> Vec<TaskId> {
        raw.iter().copied().map(TaskId).collect()
    }

    #[test]
    fn select_and_deselect_are_idempotent() {
        let mut selection = Selection::default();
        selection.select(TaskId(1));
        selection.select(TaskId(1));
        assert_eq!(selection.len(), 1);
        selection.deselect(TaskId(1));
        selection.deselect(TaskId(1));
        assert!(selection.is_empty());
    }

    #[test]
    fn select_all_only_touches_visible_ids() {
        let mut selection = Selection::default();
        selection.select(TaskId(9));
        selection.select_all(&ids(&[1, 2]));
        assert_eq!(selection.iter().collect::<Vec<_>>(), ids(&[1, 2, 9]));
    }

    #[test]
    fn reconcile_drops_missing_ids() {
        let mut selection = Selection::default();
        selection.select_all(&ids(&[1, 2, 3]));
        let remaining = ids(&[1, 3]);
        selection.reconcile(|id| remaining.contains(&id));
        assert_eq!(selection.iter().collect::<Vec<_>>(), remaining);
    }

    #[test]
    fn state_reports_none_some_all() {
        let visible = ids(&[1, 2]);
        let mut selection = Selection::default();
        assert_eq!(selection.state(&visible), SelectionState::None);

        selection.select(TaskId(1));
        assert_eq!(selection.state(&visible), SelectionState::Some);

        selection.set(TaskId(2), true);
        assert_eq!(selection.state(&visible), SelectionState::All);
    }

    #[test]
    fn empty_visible_set_is_never_all_selected() {
        let mut selection = Selection::default();
        selection.select(TaskId(1));
        assert!(!selection.is_all_selected(&[]));
        assert_eq!(selection.state(&[]), SelectionState::None);
    }

    #[test]
    fn hidden_selection_does_not_count_for_visible_state() {
        let mut selection = Selection::default();
        selection.select(TaskId(7));
        assert_eq!(selection.state(&ids(&[1, 2])), SelectionState::None);
    }
}
