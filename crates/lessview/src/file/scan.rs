//! Directory scanning for snapshots.

use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};

use super::error::{Result, SnapshotError};
use super::snapshot::FileEntry;

/// Walks `root` breadth-first and returns an entry for every regular file.
///
/// Entry paths are relative to `root`, use `/` as the separator, and are
/// sorted. Symbolic links are neither followed nor reported.
pub(crate) fn scan_dir(root: &Path) -> Result<Vec<FileEntry>> {
    let metadata = fs::metadata(root).map_err(|e| SnapshotError::io(root, e))?;
    if !metadata.is_dir() {
        return Err(SnapshotError::io(
            root,
            std::io::Error::new(std::io::ErrorKind::NotADirectory, "not a directory"),
        ));
    }

    let mut entries = Vec::new();
    let mut queue: VecDeque<PathBuf> = VecDeque::new();
    queue.push_back(root.to_path_buf());

    while let Some(dir) = queue.pop_front() {
        let read_dir = fs::read_dir(&dir).map_err(|e| SnapshotError::io(&dir, e))?;
        for fs_entry in read_dir {
            let fs_entry = fs_entry.map_err(|e| SnapshotError::io(&dir, e))?;
            let path = fs_entry.path();
            let file_type = fs_entry.file_type().map_err(|e| SnapshotError::io(&path, e))?;

            if file_type.is_dir() {
                queue.push_back(path);
            } else if file_type.is_file() {
                let size = fs_entry
                    .metadata()
                    .map_err(|e| SnapshotError::io(&path, e))?
                    .len();
                entries.push(FileEntry::new(relative_path(root, &path), size));
            }
        }
    }

    entries.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(entries)
}

/// Renders `path` relative to `root` with `/` separators.
fn relative_path(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .map(|component| component.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
