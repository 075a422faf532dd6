//! Application layer for the task list: configuration, preferences, the
//! task service façade and file transfer.

/// Application configuration loading.
pub mod config;
/// Utilities for turning user-facing tokens into filter criteria.
pub mod filter_util;
/// Persisted theme preference.
pub mod preferences;
/// Built-in sample data.
pub mod sample;
/// Service façade over the task store.
pub mod service;
/// Partial task edits.
pub mod task_patch;
/// Export/import file transfer.
pub mod transfer;

pub use config::AppConfig;
pub use preferences::{PreferenceStore, Theme};
pub use service::{Confirmation, TaskService};
pub use task_patch::{DueDatePatch, TaskPatch};
pub use transfer::{PendingImport, TransferError};

use anyhow::Result;
use tasklist_core::TaskStore;

impl TaskService {
    /// Build the session service described by `config`.
    ///
    /// # Errors
    /// Returns an error when the configured view tokens are invalid.
    pub fn startup(config: &AppConfig) -> Result<Self> {
        let store = if config.startup.sample_data {
            TaskStore::from_tasks(sample::sample_tasks())?
        } else {
            TaskStore::new()
        };
        let store = store.with_criteria(config.initial_criteria()?);
        tracing::debug!(tasks = store.len(), "task service started");
        Ok(Self::new(store))
    }
}
