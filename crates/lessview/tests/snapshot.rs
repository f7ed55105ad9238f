//! Integration tests for file snapshots on disk.

use std::fs;

use lessview::file::{FileEntry, FileSnapshot, SnapshotError, SnapshotMismatch, SnapshotOptions};

fn sample(name: &str) -> FileSnapshot {
    FileSnapshot::with_entries(
        name,
        vec![FileEntry::new("a/b.txt", 120), FileEntry::new("c.dat", 0)],
    )
}

#[test]
fn save_then_load_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sample.csv");

    let saved = sample("saved");
    saved.save(&path).unwrap();
    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        "Path,Size\na/b.txt,120\nc.dat,0\n"
    );

    let loaded = FileSnapshot::load(&path, "loaded").unwrap();
    assert_eq!(loaded.entries(), saved.entries());
    assert_eq!(loaded.name(), "loaded");

    let result = FileSnapshot::compare_entries(&saved, &loaded);
    assert!(result.matches);
    assert!(result.message.is_empty());
}

#[test]
fn save_overwrites_existing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("snapshot.csv");
    fs::write(&path, "stale contents that are much longer than the new file\n").unwrap();

    FileSnapshot::new("empty").save(&path).unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap(), "Path,Size\n");
    assert!(FileSnapshot::load(&path, "empty").unwrap().is_empty());
}

#[test]
fn differing_size_is_reported_at_index_zero() {
    let left = FileSnapshot::with_entries("left", vec![FileEntry::new("a", 1)]);
    let right = FileSnapshot::with_entries("right", vec![FileEntry::new("a", 2)]);

    let result = FileSnapshot::compare_entries(&left, &right);
    assert!(!result.matches);
    assert!(result.message.contains("index 0"), "{}", result.message);
    assert!(result.message.contains("'a' (1 bytes)"), "{}", result.message);
    assert!(result.message.contains("'a' (2 bytes)"), "{}", result.message);

    assert!(matches!(
        left.compare(&right),
        Err(SnapshotMismatch::Entry { index: 0, .. })
    ));
}

#[test]
fn count_mismatch_names_both_snapshots() {
    let expected = sample("expected.msi");
    let actual = FileSnapshot::new("extracted");

    let mismatch = expected.compare(&actual).unwrap_err();
    assert_eq!(
        mismatch,
        SnapshotMismatch::Count {
            left_name: "expected.msi".into(),
            right_name: "extracted".into(),
            left_len: 2,
            right_len: 0,
        }
    );
}

#[test]
fn malformed_file_aborts_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.csv");
    fs::write(&path, "Path,Size\ngood.txt,10\nbroken line without size\n").unwrap();

    let err = FileSnapshot::load(&path, "broken").unwrap_err();
    assert!(err.is_format());
    assert!(matches!(err, SnapshotError::Format { line: 3, .. }));
}

#[test]
fn blank_data_line_aborts_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("gap.csv");
    fs::write(&path, "Path,Size\na.txt,1\n\nb.txt,2\n").unwrap();

    let err = FileSnapshot::load(&path, "gap").unwrap_err();
    assert!(matches!(err, SnapshotError::Format { line: 3, .. }), "{err:?}");
}

#[test]
fn blank_header_line_is_still_the_header() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("no-header.csv");
    fs::write(&path, "\na.txt,1\nb.txt,2\n").unwrap();

    let loaded = FileSnapshot::load(&path, "no-header").unwrap();
    assert_eq!(
        loaded.entries(),
        &[FileEntry::new("a.txt", 1), FileEntry::new("b.txt", 2)]
    );
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = FileSnapshot::load(dir.path().join("absent.csv"), "absent").unwrap_err();
    assert!(matches!(err, SnapshotError::Io { .. }));
}

#[test]
fn unrepresentable_path_leaves_existing_file_alone() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("keep.csv");
    sample("keep").save(&path).unwrap();

    let bad = FileSnapshot::with_entries("bad", vec![FileEntry::new("line\nbreak", 1)]);
    let err = bad.save(&path).unwrap_err();
    assert!(matches!(err, SnapshotError::UnrepresentablePath { .. }));

    let kept = FileSnapshot::load(&path, "kept").unwrap();
    assert_eq!(kept.entries(), sample("keep").entries());
}

#[test]
fn custom_delimiter_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tabbed.tsv");
    let options = SnapshotOptions::new().delimiter(b'\t').columns("File", "Bytes");

    let snapshot = FileSnapshot::with_entries("tabbed", vec![FileEntry::new("a,b.txt", 7)]);
    snapshot.save_with_options(&path, &options).unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap(), "File\tBytes\na,b.txt\t7\n");

    let loaded = FileSnapshot::load_with_options(&path, "tabbed", &options).unwrap();
    assert_eq!(loaded, snapshot);
}

#[test]
fn scanned_tree_matches_saved_snapshot() {
    let tree = tempfile::tempdir().unwrap();
    fs::create_dir_all(tree.path().join("SourceDir/bin")).unwrap();
    fs::write(tree.path().join("SourceDir/bin/app.exe"), vec![0u8; 64]).unwrap();
    fs::write(tree.path().join("SourceDir/readme.txt"), b"hello").unwrap();

    let scanned = FileSnapshot::scan_dir(tree.path(), "scanned").unwrap();
    assert_eq!(
        scanned.entries(),
        &[
            FileEntry::new("SourceDir/bin/app.exe", 64),
            FileEntry::new("SourceDir/readme.txt", 5),
        ]
    );

    let out = tempfile::tempdir().unwrap();
    let path = out.path().join("expected.csv");
    scanned.save(&path).unwrap();

    let expected = FileSnapshot::load(&path, "expected").unwrap();
    assert_eq!(expected.compare(&scanned), Ok(()));

    fs::write(tree.path().join("SourceDir/readme.txt"), b"hello, world").unwrap();
    let rescanned = FileSnapshot::scan_dir(tree.path(), "rescanned").unwrap();
    assert!(matches!(
        expected.compare(&rescanned),
        Err(SnapshotMismatch::Entry { index: 1, .. })
    ));
}
