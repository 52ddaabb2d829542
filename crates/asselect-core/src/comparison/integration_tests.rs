//! Integration tests for change detection

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use filetime::FileTime;
use tempfile::TempDir;

use super::ChangeDetector;

fn write_with_mtime(path: &Path, content: &str, mtime: SystemTime) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
    filetime::set_file_mtime(path, FileTime::from_system_time(mtime)).unwrap();
}

fn project() -> (TempDir, PathBuf, PathBuf) {
    let tmp = TempDir::new().unwrap();
    let src = tmp.path().join("Logical/Libraries_6");
    let work = tmp.path().join("Logical/Libraries");
    fs::create_dir_all(&src).unwrap();
    fs::create_dir_all(&work).unwrap();
    (tmp, src, work)
}

#[test]
fn test_identical_trees_within_tolerance() {
    let (_tmp, src, work) = project();
    let base = SystemTime::now() - Duration::from_secs(3600);

    write_with_mtime(&src.join("Lib/a.st"), "PROGRAM", base);
    write_with_mtime(
        &work.join("Lib/a.st"),
        "PROGRAM",
        base + Duration::from_millis(800),
    );
    write_with_mtime(&src.join("b.typ"), "TYPE", base);
    write_with_mtime(&work.join("b.typ"), "TYPE", base);

    let changes = ChangeDetector::detect(&src, &work);

    assert!(changes.is_empty(), "unexpected changes: {changes:?}");
    assert!(!ChangeDetector::has_changes(&src, &work));
}

#[test]
fn test_mtime_beyond_tolerance_is_modified() {
    let (_tmp, src, work) = project();
    let base = SystemTime::now() - Duration::from_secs(3600);

    write_with_mtime(&src.join("a.st"), "same", base);
    write_with_mtime(&work.join("a.st"), "same", base + Duration::from_secs(2));

    let changes = ChangeDetector::detect(&src, &work);

    assert_eq!(changes.modified, vec![PathBuf::from("a.st")]);
}

#[test]
fn test_mixed_scenario() {
    let (_tmp, src, work) = project();
    let base = SystemTime::now() - Duration::from_secs(3600);

    // a.txt exists only in the working copy
    write_with_mtime(&work.join("a.txt"), "0123456789", base);

    // b.txt grew by three bytes and is five seconds newer
    write_with_mtime(&src.join("b.txt"), "hello", base);
    write_with_mtime(&work.join("b.txt"), "hello!!!", base + Duration::from_secs(5));

    // c.txt was removed from the working copy
    write_with_mtime(&src.join("c.txt"), "old", base);

    let changes = ChangeDetector::detect(&src, &work);

    assert_eq!(changes.new, vec![PathBuf::from("a.txt")]);
    assert_eq!(changes.modified, vec![PathBuf::from("b.txt")]);
    assert_eq!(changes.deleted, vec![PathBuf::from("c.txt")]);
    assert_eq!(changes.len(), 3);
}

#[test]
fn test_lists_are_disjoint_and_sorted() {
    let (_tmp, src, work) = project();
    let base = SystemTime::now() - Duration::from_secs(3600);

    for name in ["z.st", "m.st", "a.st"] {
        write_with_mtime(&work.join(name), "new", base);
    }
    for name in ["y.st", "b.st"] {
        write_with_mtime(&src.join(name), "x", base);
        write_with_mtime(&work.join(name), "xy", base);
    }
    for name in ["q.st", "c.st"] {
        write_with_mtime(&src.join(name), "gone", base);
    }

    let changes = ChangeDetector::detect(&src, &work);

    assert_eq!(
        changes.new,
        vec![
            PathBuf::from("a.st"),
            PathBuf::from("m.st"),
            PathBuf::from("z.st")
        ]
    );
    assert_eq!(
        changes.modified,
        vec![PathBuf::from("b.st"), PathBuf::from("y.st")]
    );
    assert_eq!(
        changes.deleted,
        vec![PathBuf::from("c.st"), PathBuf::from("q.st")]
    );

    for path in &changes.new {
        assert!(!changes.modified.contains(path));
        assert!(!changes.deleted.contains(path));
    }
    for path in &changes.modified {
        assert!(!changes.deleted.contains(path));
    }
}

#[test]
fn test_missing_working_copy_reports_all_deleted() {
    let tmp = TempDir::new().unwrap();
    let src = tmp.path().join("Libraries_45");
    fs::create_dir_all(src.join("Lib")).unwrap();
    fs::write(src.join("Lib/one.st"), "1").unwrap();
    fs::write(src.join("two.st"), "2").unwrap();

    let changes = ChangeDetector::detect(&src, &tmp.path().join("Libraries"));

    assert_eq!(changes.deleted.len(), 2);
    assert!(changes.new.is_empty());
    assert!(changes.modified.is_empty());
}
