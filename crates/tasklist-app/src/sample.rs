//! Tasks the application starts with when sample data is enabled.

use tasklist_core::{Priority, Task, TaskId};
use time::macros::datetime;

/// The three built-in sample tasks (ids 1 to 3).
#[must_use]
pub fn sample_tasks() -> Vec<Task> {
    vec![
        Task {
            id: TaskId(1),
            title: "Complete project documentation".into(),
            description: "Write comprehensive documentation for the final year project including API docs and user manual".into(),
            priority: Priority::High,
            due_date: Some("2025-08-20".into()),
            completed: false,
            created_at: datetime!(2025-08-10 10:30 UTC),
        },
        Task {
            id: TaskId(2),
            title: "Prepare for technical interview".into(),
            description: "Review data structures, algorithms, and system design concepts".into(),
            priority: Priority::High,
            due_date: Some("2025-08-15".into()),
            completed: false,
            created_at: datetime!(2025-08-09 14:20 UTC),
        },
        Task {
            id: TaskId(3),
            title: "Submit assignment".into(),
            description: "Submit the web development assignment for CS course".into(),
            priority: Priority::Medium,
            due_date: Some("2025-08-13".into()),
            completed: true,
            created_at: datetime!(2025-08-08 09:15 UTC),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use tasklist_core::TaskStore;

    #[test]
    fn sample_store_continues_after_highest_id() {
        let store = TaskStore::from_tasks(sample_tasks())
            .unwrap_or_else(|err| panic!("sample data must load: {err}"));
        assert_eq!(store.next_id(), TaskId(4));
        assert_eq!(store.statistics().completed, 1);
        assert_eq!(store.statistics().progress_percent, 33);
    }
}
