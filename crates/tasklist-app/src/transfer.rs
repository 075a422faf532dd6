//! Asynchronous export/import file transfer.
//!
//! Reading an import file is a single-shot future that resolves to a fully
//! validated record batch; the store is only touched afterwards.

use std::io;
use std::path::{Path, PathBuf};

use tasklist_core::{ExportSnapshot, ImportFormatError, ImportRecord, parse_import_document};
use thiserror::Error;
use time::Date;
use tracing::debug;

/// Errors raised while moving documents to or from disk.
#[derive(Debug, Error)]
pub enum TransferError {
    /// Reading the import file failed.
    #[error("failed to read {}: {source}", path.display())]
    Read {
        /// File that was read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// Writing the export file failed.
    #[error("failed to write {}: {source}", path.display())]
    Write {
        /// File that was written.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The snapshot could not be encoded.
    #[error("failed to encode export: {0}")]
    Encode(#[from] serde_json::Error),

    /// The import document was malformed.
    #[error(transparent)]
    Format(#[from] ImportFormatError),
}

/// Records read from an import file, not yet applied to any store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingImport {
    /// File the records came from.
    pub source: PathBuf,
    /// Validated records in document order.
    pub records: Vec<ImportRecord>,
}

impl PendingImport {
    /// Number of tasks the import would create.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True when the document held no tasks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Read and validate an import document.
///
/// # Errors
/// Returns [`TransferError::Read`] when the file cannot be read and
/// [`TransferError::Format`] when its content is not a valid document.
pub async fn read_import_file(path: impl AsRef<Path>) -> Result<PendingImport, TransferError> {
    let path = path.as_ref();
    let text = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| TransferError::Read {
            path: path.to_path_buf(),
            source,
        })?;
    let records = parse_import_document(&text)?;
    debug!(path = %path.display(), records = records.len(), "import document parsed");
    Ok(PendingImport {
        source: path.to_path_buf(),
        records,
    })
}

/// File name used for an export taken on `date`.
#[must_use]
pub fn export_file_name(date: Date) -> String {
    format!(
        "tasks-export-{:04}-{:02}-{:02}.json",
        date.year(),
        u8::from(date.month()),
        date.day()
    )
}

/// Write `snapshot` as pretty JSON into `dir` and return the file path.
///
/// # Errors
/// Returns an error when encoding fails or the file cannot be written.
pub async fn write_export(dir: impl AsRef<Path>, snapshot: &ExportSnapshot) -> Result<PathBuf, TransferError> {
    let dir = dir.as_ref();
    let path = dir.join(export_file_name(snapshot.export_date.date()));
    let json = snapshot.to_json_pretty()?;
    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|source| TransferError::Write {
            path: dir.to_path_buf(),
            source,
        })?;
    tokio::fs::write(&path, json)
        .await
        .map_err(|source| TransferError::Write {
            path: path.clone(),
            source,
        })?;
    debug!(path = %path.display(), tasks = snapshot.todos.len(), "export written");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn export_file_name_is_dated() {
        assert_eq!(export_file_name(date!(2025 - 08 - 05)), "tasks-export-2025-08-05.json");
    }

    #[test]
    fn pending_import_reports_size() {
        let pending = PendingImport {
            source: PathBuf::from("x.json"),
            records: vec![ImportRecord::new("a"), ImportRecord::new("b")],
        };
        assert_eq!(pending.len(), 2);
        assert!(!pending.is_empty());
    }
}
