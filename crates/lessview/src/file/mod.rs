//! File-tree snapshots for extraction checks.
//!
//! An extraction run produces a directory tree. This module records that tree
//! as a flat list of `(path, size)` entries, stores it as a small text file,
//! and compares it against a previously approved snapshot.
//!
//! # Example
//!
//! ```ignore
//! use lessview::file::FileSnapshot;
//!
//! let expected = FileSnapshot::load("sample.expected.csv", "expected")?;
//! let actual = FileSnapshot::scan_dir("out/sample", "actual")?;
//!
//! if let Err(mismatch) = expected.compare(&actual) {
//!     eprintln!("{mismatch}");
//! }
//! ```

mod error;
mod scan;
mod snapshot;

pub use error::{Result, SnapshotError};
pub use snapshot::{FileEntry, FileSnapshot, SnapshotComparison, SnapshotMismatch, SnapshotOptions};
