//! Error types for file snapshots.

use std::io;
use std::path::PathBuf;

/// Result type alias for snapshot operations.
pub type Result<T> = std::result::Result<T, SnapshotError>;

/// Errors that can occur while saving, loading, or scanning snapshots.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    /// File or directory I/O error.
    #[error("Failed to access '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A data line did not have the expected shape.
    #[error("Snapshot format error at line {line}: {message}")]
    Format { line: u64, message: String },

    /// The underlying reader or writer failed.
    #[error("Snapshot CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// An entry path cannot be written without being misread later.
    #[error("Path '{path}' cannot be stored in a snapshot: it contains the delimiter or a line break")]
    UnrepresentablePath { path: String },
}

impl SnapshotError {
    /// Create an I/O error.
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create a format error.
    pub fn format(line: u64, message: impl Into<String>) -> Self {
        Self::Format {
            line,
            message: message.into(),
        }
    }

    /// Returns true if this error describes malformed snapshot content.
    pub fn is_format(&self) -> bool {
        matches!(self, Self::Format { .. })
    }
}
