//! Flat file-tree snapshots.
//!
//! A [`FileSnapshot`] is an ordered list of `(path, size)` entries recorded
//! from an extraction run. Snapshots are saved as a two-column text file and
//! compared entry by entry against later runs.
//!
//! # Format
//!
//! ```text
//! Path,Size
//! SourceDir/setup.exe,120
//! SourceDir/readme.txt,0
//! ```
//!
//! The first line is a header. Every following line holds a path and a
//! non-negative integer size. Fields are never quoted, so paths containing the
//! delimiter or a line break cannot be stored.
//!
//! # Example
//!
//! ```ignore
//! use lessview::file::{FileEntry, FileSnapshot};
//!
//! let mut expected = FileSnapshot::new("sample.msi");
//! expected.push(FileEntry::new("SourceDir/setup.exe", 120));
//! expected.save("sample.expected.csv")?;
//!
//! let actual = FileSnapshot::scan_dir("extracted/sample", "extracted")?;
//! let result = FileSnapshot::compare_entries(&expected, &actual);
//! assert!(result.matches, "{}", result.message);
//! ```

use std::fmt;
use std::fs::File;
use std::io;
use std::path::Path;

use csv::{QuoteStyle, ReaderBuilder, StringRecord, WriterBuilder};
use lessview_core::PerfSpan;
use lessview_core::logging::targets;

use super::error::{Result, SnapshotError};
use super::scan;

const HEADER_LINE: u64 = 1;

/// Configuration options for the snapshot text format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotOptions {
    /// Field delimiter (default: comma)
    delimiter: u8,
    /// Header of the path column (default: `Path`)
    path_column: String,
    /// Header of the size column (default: `Size`)
    size_column: String,
}

impl SnapshotOptions {
    /// Creates default snapshot options.
    pub fn new() -> Self {
        Self {
            delimiter: b',',
            path_column: "Path".to_string(),
            size_column: "Size".to_string(),
        }
    }

    /// Sets the field delimiter.
    pub fn delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Sets the header names written on the first line.
    pub fn columns(mut self, path_column: impl Into<String>, size_column: impl Into<String>) -> Self {
        self.path_column = path_column.into();
        self.size_column = size_column.into();
        self
    }

    /// Returns the header line these options produce, without a line break.
    pub fn header(&self) -> String {
        format!(
            "{}{}{}",
            self.path_column,
            char::from(self.delimiter),
            self.size_column
        )
    }

    fn reader_builder(&self) -> ReaderBuilder {
        let mut builder = ReaderBuilder::new();
        builder
            .delimiter(self.delimiter)
            .has_headers(false)
            .flexible(true)
            .quoting(false);
        builder
    }

    fn writer_builder(&self) -> WriterBuilder {
        let mut builder = WriterBuilder::new();
        builder
            .delimiter(self.delimiter)
            .has_headers(false)
            .quote_style(QuoteStyle::Never);
        builder
    }

    fn can_store(&self, path: &str) -> bool {
        !path
            .bytes()
            .any(|b| b == self.delimiter || b == b'\n' || b == b'\r')
    }
}

impl Default for SnapshotOptions {
    fn default() -> Self {
        Self::new()
    }
}

/// A single file record: a relative path and a size in bytes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FileEntry {
    /// Path of the file, relative to the snapshot root.
    pub path: String,
    /// Size of the file in bytes.
    pub size: u64,
}

impl FileEntry {
    /// Creates a new entry.
    pub fn new(path: impl Into<String>, size: u64) -> Self {
        Self {
            path: path.into(),
            size,
        }
    }
}

impl fmt::Display for FileEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.path, self.size)
    }
}

/// The first difference found between two snapshots.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SnapshotMismatch {
    /// The snapshots hold a different number of entries.
    #[error(
        "Entries for '{left_name}' and '{right_name}' have a different number of file entries ({left_len}, {right_len} respectively)"
    )]
    Count {
        left_name: String,
        right_name: String,
        left_len: usize,
        right_len: usize,
    },

    /// The entries at `index` differ.
    #[error(
        "'{}' ({} bytes) != '{}' ({} bytes) at index {}",
        .left.path, .left.size, .right.path, .right.size, .index
    )]
    Entry {
        index: usize,
        left: FileEntry,
        right: FileEntry,
    },
}

/// Outcome of [`FileSnapshot::compare_entries`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotComparison {
    /// Whether the snapshots are equal entry for entry.
    pub matches: bool,
    /// Description of the first difference; empty when `matches` is true.
    pub message: String,
}

/// An ordered list of file entries with a descriptive name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSnapshot {
    name: String,
    entries: Vec<FileEntry>,
}

impl FileSnapshot {
    // ========================================================================
    // Construction
    // ========================================================================

    /// Creates an empty snapshot.
    ///
    /// `name` identifies what the snapshot describes (typically the package
    /// file name) and appears in mismatch messages.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: Vec::new(),
        }
    }

    /// Creates a snapshot holding `entries`.
    pub fn with_entries(name: impl Into<String>, entries: impl IntoIterator<Item = FileEntry>) -> Self {
        Self {
            name: name.into(),
            entries: entries.into_iter().collect(),
        }
    }

    /// Records every regular file below `root`.
    ///
    /// Paths are relative to `root`, `/`-separated, and sorted.
    pub fn scan_dir(root: impl AsRef<Path>, name: impl Into<String>) -> Result<Self> {
        let root = root.as_ref();
        let _span = PerfSpan::new("snapshot_scan");
        let entries = scan::scan_dir(root)?;
        tracing::debug!(
            target: targets::FILE,
            root = %root.display(),
            count = entries.len(),
            "scanned directory"
        );
        Ok(Self::with_entries(name, entries))
    }

    // ========================================================================
    // Entries
    // ========================================================================

    /// Returns the snapshot name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the entries in order.
    pub fn entries(&self) -> &[FileEntry] {
        &self.entries
    }

    /// Returns a mutable reference to the entries.
    pub fn entries_mut(&mut self) -> &mut Vec<FileEntry> {
        &mut self.entries
    }

    /// Appends an entry.
    pub fn push(&mut self, entry: FileEntry) {
        self.entries.push(entry);
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if there are no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    // ========================================================================
    // Serialization
    // ========================================================================

    /// Saves the snapshot to `path` in the default format, replacing any
    /// existing file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        self.save_with_options(path, &SnapshotOptions::default())
    }

    /// Saves the snapshot to `path` with custom options.
    pub fn save_with_options(&self, path: impl AsRef<Path>, options: &SnapshotOptions) -> Result<()> {
        let path = path.as_ref();
        // Refuse before touching the file so a bad entry never truncates it.
        self.check_storable(options)?;

        let file = File::create(path).map_err(|e| SnapshotError::io(path, e))?;
        self.write_to(file, options)?;

        tracing::debug!(
            target: targets::FILE,
            path = %path.display(),
            count = self.entries.len(),
            "saved snapshot"
        );
        Ok(())
    }

    /// Writes the snapshot to any writer.
    pub fn write_to<W: io::Write>(&self, writer: W, options: &SnapshotOptions) -> Result<()> {
        self.check_storable(options)?;

        let mut writer = options.writer_builder().from_writer(writer);
        writer.write_record([options.path_column.as_str(), options.size_column.as_str()])?;
        for entry in &self.entries {
            writer.write_record([entry.path.as_str(), entry.size.to_string().as_str()])?;
        }
        writer.flush().map_err(csv::Error::from)?;
        Ok(())
    }

    /// Loads a snapshot from `path` in the default format.
    pub fn load(path: impl AsRef<Path>, name: impl Into<String>) -> Result<Self> {
        Self::load_with_options(path, name, &SnapshotOptions::default())
    }

    /// Loads a snapshot from `path` with custom options.
    ///
    /// Any malformed line aborts the load.
    pub fn load_with_options(
        path: impl AsRef<Path>,
        name: impl Into<String>,
        options: &SnapshotOptions,
    ) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| SnapshotError::io(path, e))?;
        let snapshot = Self::read_from(file, name, options)?;

        tracing::debug!(
            target: targets::FILE,
            path = %path.display(),
            count = snapshot.len(),
            "loaded snapshot"
        );
        Ok(snapshot)
    }

    /// Reads a snapshot from any reader.
    ///
    /// The first line is treated as the header and skipped, even when it is
    /// blank. A blank data line is a format error.
    pub fn read_from<R: io::Read>(reader: R, name: impl Into<String>, options: &SnapshotOptions) -> Result<Self> {
        let mut reader = options.reader_builder().from_reader(reader);
        let mut snapshot = Self::new(name);
        // Line of the previous record; line 1 is the header.
        let mut last_line = HEADER_LINE;
        let mut first = true;

        for record in reader.records() {
            let record = record?;
            let line = record.position().map_or(last_line + 1, |p| p.line());
            if std::mem::take(&mut first) && line == HEADER_LINE {
                continue;
            }
            // Quoting is off, so every record is one line. The reader skips
            // empty lines, which shows up as a gap in line numbers.
            if line > last_line + 1 {
                return Err(SnapshotError::format(
                    last_line + 1,
                    "expected two fields, found 1",
                ));
            }
            snapshot.push(parse_entry(&record, line)?);
            last_line = line;
        }

        Ok(snapshot)
    }

    // ========================================================================
    // Comparison
    // ========================================================================

    /// Compares two snapshots entry by entry.
    ///
    /// Returns the first difference: a count mismatch, or the lowest index at
    /// which the path or size differ.
    pub fn compare(&self, other: &FileSnapshot) -> std::result::Result<(), SnapshotMismatch> {
        if self.entries.len() != other.entries.len() {
            return Err(SnapshotMismatch::Count {
                left_name: self.name.clone(),
                right_name: other.name.clone(),
                left_len: self.entries.len(),
                right_len: other.entries.len(),
            });
        }

        match self
            .entries
            .iter()
            .zip(&other.entries)
            .position(|(left, right)| left != right)
        {
            Some(index) => Err(SnapshotMismatch::Entry {
                index,
                left: self.entries[index].clone(),
                right: other.entries[index].clone(),
            }),
            None => Ok(()),
        }
    }

    /// Compares two snapshots and reports the outcome as a flag and message.
    pub fn compare_entries(a: &FileSnapshot, b: &FileSnapshot) -> SnapshotComparison {
        match a.compare(b) {
            Ok(()) => SnapshotComparison {
                matches: true,
                message: String::new(),
            },
            Err(mismatch) => SnapshotComparison {
                matches: false,
                message: mismatch.to_string(),
            },
        }
    }

    fn check_storable(&self, options: &SnapshotOptions) -> Result<()> {
        match self.entries.iter().find(|e| !options.can_store(&e.path)) {
            Some(entry) => Err(SnapshotError::UnrepresentablePath {
                path: entry.path.clone(),
            }),
            None => Ok(()),
        }
    }
}

/// Parses one data record read from `line`.
fn parse_entry(record: &StringRecord, line: u64) -> Result<FileEntry> {
    if record.len() != 2 {
        return Err(SnapshotError::format(
            line,
            format!("expected two fields, found {}", record.len()),
        ));
    }

    let path = &record[0];
    let size = record[1]
        .parse::<u64>()
        .map_err(|_| SnapshotError::format(line, format!("invalid size '{}'", &record[1])))?;

    Ok(FileEntry::new(path, size))
}
