//! Task collection engine: records, filtering, selection and mutations.

/// Error kinds returned by store commands.
pub mod error;
/// Filter/sort pipeline.
pub mod filter;
/// Identifier types and allocation.
pub mod id;
/// Selection tracking.
pub mod selection;
/// Export/import document codec.
pub mod snapshot;
/// Collection statistics.
pub mod stats;
/// The task store and its mutation API.
pub mod store;
/// Task record model and field validation.
pub mod task;
/// Text search helper.
pub mod text_matcher;

pub use error::StoreError;
pub use filter::{FilterCriteria, PriorityFilter, SortKey, StatusFilter};
pub use id::{IdAllocator, TaskId};
pub use selection::{Selection, SelectionState};
pub use snapshot::{
    ExportSnapshot, FORMAT_VERSION, ImportFormatError, ImportRecord, parse_import_document,
};
pub use stats::Statistics;
pub use store::{Clock, TaskStore};
pub use task::{Priority, Task, TaskFields, ValidFields, ValidationError};
