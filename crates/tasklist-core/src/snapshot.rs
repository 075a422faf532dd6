//! Export/import exchange document.
//!
//! ```json
//! { "todos": [ { "id": 1, "title": "...", ... } ], "exportDate": "...", "version": "1.0" }
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::task::{Priority, Task};

/// Version tag written into every export.
pub const FORMAT_VERSION: &str = "1.0";

/// Point-in-time copy of the whole collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportSnapshot {
    /// Every task, in collection order.
    pub todos: Vec<Task>,
    /// When the snapshot was taken.
    #[serde(with = "time::serde::rfc3339")]
    pub export_date: OffsetDateTime,
    /// Document format version.
    pub version: String,
}

impl ExportSnapshot {
    /// Wrap a copy of `tasks` taken at `export_date`.
    #[must_use]
    pub fn new(todos: Vec<Task>, export_date: OffsetDateTime) -> Self {
        Self {
            todos,
            export_date,
            version: FORMAT_VERSION.to_owned(),
        }
    }

    /// Render as pretty-printed JSON.
    ///
    /// # Errors
    /// Returns an error if serialization fails.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Reasons an import document is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ImportFormatError {
    /// The text is not JSON at all.
    #[error("not a JSON document: {0}")]
    Json(String),
    /// The document has no `todos` array.
    #[error("document has no `todos` array")]
    MissingTodos,
    /// An entry of `todos` is not an object.
    #[error("entry {index} is not a task object")]
    NotAnObject {
        /// Zero-based position in `todos`.
        index: usize,
    },
    /// An entry has no usable title.
    #[error("entry {index} has no title")]
    MissingTitle {
        /// Zero-based position in `todos`.
        index: usize,
    },
    /// Two tasks of a loaded data set share an identifier.
    #[error("duplicate task id #{id}")]
    DuplicateId {
        /// The repeated identifier.
        id: u64,
    },
}

/// Task-shaped record read from an import document.
///
/// Any `id` carried by the source is dropped; the store assigns a fresh one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportRecord {
    /// Title as found in the document.
    pub title: String,
    /// Description, empty when absent.
    pub description: String,
    /// Priority; unknown tokens read as `medium`.
    pub priority: Priority,
    /// Due date, `None` when absent, null or blank.
    pub due_date: Option<String>,
    /// Completion flag; anything but a boolean reads as `false`.
    pub completed: bool,
    /// Original creation time, when present and RFC 3339.
    pub created_at: Option<OffsetDateTime>,
}

impl ImportRecord {
    /// Record with only a title; every other field takes its default.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            priority: Priority::default(),
            due_date: None,
            completed: false,
            created_at: None,
        }
    }

    fn from_value(index: usize, value: &Value) -> Result<Self, ImportFormatError> {
        let object = value
            .as_object()
            .ok_or(ImportFormatError::NotAnObject { index })?;
        let title = string_field(object, "title")
            .map(str::trim)
            .filter(|title| !title.is_empty())
            .ok_or(ImportFormatError::MissingTitle { index })?;
        Ok(Self {
            title: title.to_owned(),
            description: string_field(object, "description").unwrap_or_default().to_owned(),
            priority: string_field(object, "priority")
                .map(Priority::parse_lenient)
                .unwrap_or_default(),
            due_date: string_field(object, "dueDate")
                .map(str::trim)
                .filter(|due| !due.is_empty())
                .map(str::to_owned),
            completed: object.get("completed").and_then(Value::as_bool).unwrap_or(false),
            created_at: string_field(object, "createdAt")
                .and_then(|raw| OffsetDateTime::parse(raw.trim(), &Rfc3339).ok()),
        })
    }
}

fn string_field<'a>(object: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    object.get(key).and_then(Value::as_str)
}

/// Parse the text of an import document into records.
///
/// # Errors
/// Returns an [`ImportFormatError`] when the text is not JSON, lacks a `todos`
/// array, or any entry is not a titled object.
pub fn parse_import_document(text: &str) -> Result<Vec<ImportRecord>, ImportFormatError> {
    let value: Value = serde_json::from_str(text).map_err(|err| ImportFormatError::Json(err.to_string()))?;
    records_from_value(&value)
}

fn records_from_value(document: &Value) -> Result<Vec<ImportRecord>, ImportFormatError> {
    let todos = document
        .get("todos")
        .and_then(Value::as_array)
        .ok_or(ImportFormatError::MissingTodos)?;
    todos
        .iter()
        .enumerate()
        .map(|(index, entry)| ImportRecord::from_value(index, entry))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::TaskId;
    use time::macros::datetime;

    fn ok<T, E: std::fmt::Display>(result: Result<T, E>, context: &str) -> T {
        result.unwrap_or_else(|err| panic!("{context}: {err}"))
    }

    #[test]
    fn export_uses_exchange_field_names() {
        let task = Task {
            id: TaskId(7),
            title: "Submit assignment".into(),
            description: String::new(),
            priority: Priority::High,
            due_date: None,
            completed: true,
            created_at: datetime!(2025-08-08 09:15 UTC),
        };
        let snapshot = ExportSnapshot::new(vec![task], datetime!(2025-08-12 12:00 UTC));
        let value: Value = ok(
            serde_json::from_str(&ok(snapshot.to_json_pretty(), "serialize")),
            "reparse",
        );
        assert_eq!(value["version"], "1.0");
        assert_eq!(value["exportDate"], "2025-08-12T12:00:00Z");
        let todo = &value["todos"][0];
        assert_eq!(todo["id"], 7);
        assert_eq!(todo["priority"], "high");
        assert_eq!(todo["dueDate"], Value::Null);
        assert_eq!(todo["completed"], true);
        assert_eq!(todo["createdAt"], "2025-08-08T09:15:00Z");
    }

    #[test]
    fn import_reads_task_shaped_objects_leniently() {
        let text = r#"{
            "todos": [
                { "id": 99, "title": " X ", "priority": "urgent", "completed": "yes", "extra": 1 },
                { "title": "Y", "description": "d", "priority": "low", "dueDate": "2025-08-20",
                  "completed": true, "createdAt": "2025-08-10T10:30:00.000Z" }
            ],
            "version": "1.0"
        }"#;
        let records = ok(parse_import_document(text), "valid document");
        assert_eq!(records.len(), 2);
        assert_eq!(records[0], ImportRecord::new("X"));
        assert_eq!(records[1].priority, Priority::Low);
        assert_eq!(records[1].due_date.as_deref(), Some("2025-08-20"));
        assert!(records[1].completed);
        assert_eq!(records[1].created_at, Some(datetime!(2025-08-10 10:30 UTC)));
    }

    #[test]
    fn import_rejects_documents_without_todos_array() {
        assert_eq!(parse_import_document(r#"{"tasks": []}"#), Err(ImportFormatError::MissingTodos));
        assert_eq!(parse_import_document(r#"{"todos": {}}"#), Err(ImportFormatError::MissingTodos));
        assert_eq!(parse_import_document("[]"), Err(ImportFormatError::MissingTodos));
        assert!(matches!(parse_import_document("not json"), Err(ImportFormatError::Json(_))));
    }

    #[test]
    fn import_rejects_untitled_or_non_object_entries() {
        assert_eq!(
            parse_import_document(r#"{"todos": [{"title": "ok"}, {"title": "  "}]}"#),
            Err(ImportFormatError::MissingTitle { index: 1 })
        );
        assert_eq!(
            parse_import_document(r#"{"todos": [{"description": "no title"}]}"#),
            Err(ImportFormatError::MissingTitle { index: 0 })
        );
        assert_eq!(
            parse_import_document(r#"{"todos": ["just text"]}"#),
            Err(ImportFormatError::NotAnObject { index: 0 })
        );
    }

    #[test]
    fn empty_todos_array_is_a_valid_import() {
        assert_eq!(parse_import_document(r#"{"todos": []}"#), Ok(Vec::new()));
    }
}
