use serde::Serialize;

use crate::task::Task;

/// Counts and progress over the whole collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    /// Number of tasks.
    pub total: usize,
    /// Number of completed tasks.
    pub completed: usize,
    /// `total - completed`.
    pub pending: usize,
    /// Completed share in percent, rounded half up; 0 for an empty list.
    pub progress_percent: u8,
}

impl Statistics {
    /// Derive statistics from every task in the collection.
    #[must_use]
    pub fn compute(tasks: &[Task]) -> Self {
        let total = tasks.len();
        let completed = tasks.iter().filter(|task| task.completed).count();
        Self {
            total,
            completed,
            pending: total - completed,
            progress_percent: progress_percent(completed, total),
        }
    }
}

fn progress_percent(completed: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    // round(100 * c / t) with halves rounded up, in integer arithmetic.
    let rounded = (200 * completed + total) / (2 * total);
    u8::try_from(rounded).unwrap_or(100)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::TaskId;
    use crate::task::Priority;
    use time::OffsetDateTime;

    fn tasks(flags: &[bool]) -> Vec<Task> {
        flags
            .iter()
            .zip(1..)
            .map(|(&completed, id)| Task {
                id: TaskId(id),
                title: format!("task {id}"),
                description: String::new(),
                priority: Priority::Medium,
                due_date: None,
                completed,
                created_at: OffsetDateTime::UNIX_EPOCH,
            })
            .collect()
    }

    #[test]
    fn empty_collection_has_zero_progress() {
        assert_eq!(Statistics::compute(&[]), Statistics::default());
    }

    #[test]
    fn half_done_is_fifty_percent() {
        let stats = Statistics::compute(&tasks(&[false, true]));
        assert_eq!(
            stats,
            Statistics {
                total: 2,
                completed: 1,
                pending: 1,
                progress_percent: 50,
            }
        );
    }

    #[test]
    fn progress_rounds_to_nearest_percent() {
        assert_eq!(Statistics::compute(&tasks(&[true, false, false])).progress_percent, 33);
        assert_eq!(Statistics::compute(&tasks(&[true, true, false])).progress_percent, 67);
        assert_eq!(
            Statistics::compute(&tasks(&[true, false, false, false, false, false, false, false])).progress_percent,
            13
        );
        assert_eq!(Statistics::compute(&tasks(&[true, true])).progress_percent, 100);
    }
}
