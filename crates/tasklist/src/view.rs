//! Plain-text rendering of the task list.

use std::io::{self, Write};

use anyhow::Result;
use tasklist_core::{SelectionState, Statistics, Task, TaskStore};
use time::Date;

/// Render the visible tasks of `store` as a table followed by a summary line.
pub fn render_task_table<W: Write>(out: &mut W, store: &TaskStore, today: Date) -> io::Result<()> {
    let visible: Vec<&Task> = store.visible_tasks().collect();
    if visible.is_empty() {
        if store.criteria().is_unfiltered() {
            writeln!(out, "No tasks found")?;
        } else {
            writeln!(out, "No tasks matched the current filters")?;
        }
        return Ok(());
    }

    writeln!(out, "Sel | ID | Done | Priority | Due | Title")?;
    writeln!(out, "--- | -- | ---- | -------- | --- | -----")?;
    for task in &visible {
        let selected = if store.selection().contains(task.id) {
            "[x]"
        } else {
            "[ ]"
        };
        let done = if task.completed { "yes" } else { "no" };
        let due = match task.due_date.as_deref() {
            None => "-".to_owned(),
            Some(due) if task.is_overdue(today) => format!("{due} (overdue)"),
            Some(due) => due.to_owned(),
        };
        writeln!(
            out,
            "{selected} | {} | {done} | {} | {due} | {}",
            task.id, task.priority, task.title
        )?;
        if !task.description.is_empty() {
            writeln!(out, "      {}", task.description)?;
        }
    }

    let criteria = store.criteria();
    writeln!(
        out,
        "{} of {} shown (status: {}, priority: {}, sort: {}); selection: {}",
        visible.len(),
        store.len(),
        criteria.status.as_str(),
        criteria.priority.as_str(),
        criteria.sort.as_str(),
        selection_label(store.selection_state()),
    )
}

/// Render the visible tasks as a JSON array.
pub fn render_task_json<W: Write>(out: &mut W, store: &TaskStore) -> Result<()> {
    let visible: Vec<&Task> = store.visible_tasks().collect();
    serde_json::to_writer_pretty(&mut *out, &visible)?;
    writeln!(out)?;
    Ok(())
}

/// Render collection statistics.
pub fn render_stats<W: Write>(out: &mut W, stats: Statistics) -> io::Result<()> {
    writeln!(
        out,
        "total: {}  completed: {}  pending: {}  progress: {}%",
        stats.total, stats.completed, stats.pending, stats.progress_percent
    )
}

const fn selection_label(state: SelectionState) -> &'static str {
    match state {
        SelectionState::None => "none",
        SelectionState::Some => "some",
        SelectionState::All => "all",
    }
}
