use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use time::macros::format_description;
use time::{Date, OffsetDateTime};

use crate::id::TaskId;

/// Urgency level of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    /// Can wait.
    Low,
    /// Default level.
    #[default]
    Medium,
    /// Needs attention first.
    High,
}

impl Priority {
    /// Every level, lowest first.
    pub const ALL: [Self; 3] = [Self::Low, Self::Medium, Self::High];

    /// Sort rank; higher is more urgent.
    #[must_use]
    pub const fn rank(self) -> u8 {
        match self {
            Self::Low => 1,
            Self::Medium => 2,
            Self::High => 3,
        }
    }

    /// Token used in the exchange document.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    /// Strict parse of a priority token (case-insensitive).
    #[must_use]
    pub fn parse(token: &str) -> Option<Self> {
        let normalized = token.trim().to_ascii_lowercase();
        Self::ALL.into_iter().find(|level| level.as_str() == normalized)
    }

    /// Parse a priority token, falling back to [`Priority::Medium`] for anything unknown.
    #[must_use]
    pub fn parse_lenient(token: &str) -> Self {
        Self::parse(token).unwrap_or_default()
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single entry of the task list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Session-unique identifier.
    pub id: TaskId,
    /// Trimmed, never empty.
    pub title: String,
    /// Free-form notes; empty when none were given.
    #[serde(default)]
    pub description: String,
    /// Urgency level.
    #[serde(default)]
    pub priority: Priority,
    /// Calendar date as supplied by the caller (usually `YYYY-MM-DD`).
    #[serde(default)]
    pub due_date: Option<String>,
    /// Completion flag.
    #[serde(default)]
    pub completed: bool,
    /// Creation instant; immutable.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl Task {
    /// Build a task from already validated fields.
    #[must_use]
    pub fn new(id: TaskId, fields: ValidFields, created_at: OffsetDateTime) -> Self {
        let ValidFields {
            title,
            description,
            priority,
            due_date,
        } = fields;
        Self {
            id,
            title,
            description,
            priority,
            due_date,
            completed: false,
            created_at,
        }
    }

    /// Due date parsed as a calendar date, when it has one in `YYYY-MM-DD` form.
    #[must_use]
    pub fn due(&self) -> Option<Date> {
        self.due_date.as_deref().and_then(parse_due_date)
    }

    /// True when the task is still open and its due date lies before `today`.
    #[must_use]
    pub fn is_overdue(&self, today: Date) -> bool {
        !self.completed && self.due().is_some_and(|due| due < today)
    }

    pub(crate) fn overwrite(&mut self, fields: ValidFields) {
        self.title = fields.title;
        self.description = fields.description;
        self.priority = fields.priority;
        self.due_date = fields.due_date;
    }
}

/// Parse a `YYYY-MM-DD` calendar date.
#[must_use]
pub fn parse_due_date(raw: &str) -> Option<Date> {
    Date::parse(raw.trim(), format_description!("[year]-[month]-[day]")).ok()
}

/// Rejected field input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Title was empty after trimming.
    #[error("empty title")]
    EmptyTitle,
}

/// Raw field values for creating or editing a task.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFields {
    /// Title as typed; trimmed during validation.
    pub title: String,
    /// Optional notes.
    pub description: Option<String>,
    /// Priority token; unknown or missing values become `medium`.
    pub priority: Option<String>,
    /// Optional due date string.
    pub due_date: Option<String>,
}

impl TaskFields {
    /// Start a field set with the given title.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Attach a description.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Attach a priority token.
    #[must_use]
    pub fn priority(mut self, priority: impl Into<String>) -> Self {
        self.priority = Some(priority.into());
        self
    }

    /// Attach a due date.
    #[must_use]
    pub fn due_date(mut self, due_date: impl Into<String>) -> Self {
        self.due_date = Some(due_date.into());
        self
    }

    /// Normalise the raw input.
    ///
    /// # Errors
    /// Returns [`ValidationError::EmptyTitle`] when the trimmed title is empty.
    pub fn validate(self) -> Result<ValidFields, ValidationError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(ValidationError::EmptyTitle);
        }
        let description = self
            .description
            .map(|text| text.trim().to_owned())
            .unwrap_or_default();
        let priority = self
            .priority
            .as_deref()
            .map(Priority::parse_lenient)
            .unwrap_or_default();
        let due_date = self.due_date.and_then(|raw| {
            let trimmed = raw.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_owned())
        });
        Ok(ValidFields {
            title: title.to_owned(),
            description,
            priority,
            due_date,
        })
    }
}

impl From<&Task> for TaskFields {
    fn from(task: &Task) -> Self {
        Self {
            title: task.title.clone(),
            description: Some(task.description.clone()),
            priority: Some(task.priority.as_str().to_owned()),
            due_date: task.due_date.clone(),
        }
    }
}

/// Field values that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidFields {
    /// Trimmed non-empty title.
    pub title: String,
    /// Trimmed description, possibly empty.
    pub description: String,
    /// Resolved priority.
    pub priority: Priority,
    /// Trimmed due date, `None` when blank.
    pub due_date: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::{date, datetime};

    fn ok<T, E: fmt::Display>(result: Result<T, E>, context: &str) -> T {
        result.unwrap_or_else(|err| panic!("{context}: {err}"))
    }

    #[test]
    fn validate_trims_title_and_description() {
        let fields = ok(
            TaskFields::new("  Write docs \n")
                .description("  api + manual ")
                .validate(),
            "valid fields",
        );
        assert_eq!(fields.title, "Write docs");
        assert_eq!(fields.description, "api + manual");
        assert_eq!(fields.priority, Priority::Medium);
        assert_eq!(fields.due_date, None);
    }

    #[test]
    fn validate_rejects_blank_titles() {
        assert_eq!(TaskFields::new("").validate(), Err(ValidationError::EmptyTitle));
        assert_eq!(TaskFields::new(" \t ").validate(), Err(ValidationError::EmptyTitle));
    }

    #[test]
    fn unknown_priority_falls_back_to_medium() {
        let fields = ok(TaskFields::new("x").priority("urgent").validate(), "valid fields");
        assert_eq!(fields.priority, Priority::Medium);
        let fields = ok(TaskFields::new("x").priority("HIGH").validate(), "valid fields");
        assert_eq!(fields.priority, Priority::High);
    }

    #[test]
    fn blank_due_date_is_absent() {
        let fields = ok(TaskFields::new("x").due_date("  ").validate(), "valid fields");
        assert_eq!(fields.due_date, None);
        let fields = ok(TaskFields::new("x").due_date("2025-08-20").validate(), "valid fields");
        assert_eq!(fields.due_date.as_deref(), Some("2025-08-20"));
    }

    #[test]
    fn overdue_requires_open_task_with_past_due_date() {
        let fields = ok(TaskFields::new("x").due_date("2025-08-13").validate(), "valid fields");
        let mut task = Task::new(TaskId(1), fields, datetime!(2025-08-01 0:00 UTC));
        assert!(task.is_overdue(date!(2025 - 08 - 14)));
        assert!(!task.is_overdue(date!(2025 - 08 - 13)));
        task.completed = true;
        assert!(!task.is_overdue(date!(2025 - 08 - 14)));
    }

    #[test]
    fn unparseable_due_date_is_never_overdue() {
        let fields = ok(TaskFields::new("x").due_date("someday").validate(), "valid fields");
        let task = Task::new(TaskId(1), fields, datetime!(2025-08-01 0:00 UTC));
        assert_eq!(task.due(), None);
        assert!(!task.is_overdue(date!(2030 - 01 - 01)));
    }

    #[test]
    fn priority_ranks_high_above_low() {
        assert!(Priority::High.rank() > Priority::Medium.rank());
        assert!(Priority::Medium.rank() > Priority::Low.rank());
        assert_eq!(Priority::parse("nope"), None);
    }
}
