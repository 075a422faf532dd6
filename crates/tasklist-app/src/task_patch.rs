use tasklist_core::{Task, TaskFields};

/// Partial edit of a task; `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    /// New title.
    pub title: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// New priority token; unknown tokens become `medium` on validation.
    pub priority: Option<String>,
    /// Due date change.
    pub due_date: Option<DueDatePatch>,
}

/// Change to the due date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DueDatePatch {
    /// Replace the due date.
    Set(String),
    /// Remove the due date.
    Clear,
}

impl TaskPatch {
    /// Returns true when the patch would not change anything.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.priority.is_none()
            && self.due_date.is_none()
    }

    /// Full field set for `task` with this patch applied on top.
    #[must_use]
    pub fn apply_to(self, task: &Task) -> TaskFields {
        let mut fields = TaskFields::from(task);
        if let Some(title) = self.title {
            fields.title = title;
        }
        if let Some(description) = self.description {
            fields.description = Some(description);
        }
        if let Some(priority) = self.priority {
            fields.priority = Some(priority);
        }
        match self.due_date {
            Some(DueDatePatch::Set(due)) => fields.due_date = Some(due),
            Some(DueDatePatch::Clear) => fields.due_date = None,
            None => {}
        }
        fields
    }
}
