//! Error kinds reported by the task store.

use thiserror::Error;

use crate::id::TaskId;
use crate::snapshot::ImportFormatError;
use crate::task::ValidationError;

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors returned by [`TaskStore`](crate::TaskStore) commands.
///
/// A failed command never leaves the store partially mutated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Field input was rejected.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// A single-item command targeted an id not in the collection.
    #[error("task not found: #{0}")]
    NotFound(TaskId),

    /// An import document or record batch was malformed.
    #[error("import format error: {0}")]
    ImportFormat(#[from] ImportFormatError),
}
