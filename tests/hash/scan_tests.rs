// Tests for the tree walker

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use treehash::hash::{ExcludeFilter, FileEntry, TreeWalker, WalkStats};

use super::common::write;

fn collect(root: &Path, exclude: &ExcludeFilter, follow: bool) -> (Vec<FileEntry>, WalkStats) {
    let mut entries = Vec::new();
    let stats = TreeWalker::new(exclude, follow).walk(root, |entry| entries.push(entry));
    (entries, stats)
}

fn paths(entries: &[FileEntry]) -> Vec<PathBuf> {
    entries.iter().map(|e| e.path.clone()).collect()
}

#[test]
fn test_walk_nested_directories_depth_first() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "b.txt", b"b");
    write(dir.path(), "a/z.txt", b"z");
    write(dir.path(), "a/deeper/y.txt", b"y");

    let (entries, stats) = collect(dir.path(), &ExcludeFilter::none(), false);

    assert_eq!(stats.submitted, 3);
    assert_eq!(stats.errors, 0);
    assert_eq!(
        paths(&entries),
        vec![
            dir.path().join("a/deeper/y.txt"),
            dir.path().join("a/z.txt"),
            dir.path().join("b.txt"),
        ]
    );
    assert!(entries.iter().all(|e| e.meta.is_regular && !e.meta.is_symlink));
}

#[test]
fn test_empty_directory() {
    let dir = TempDir::new().unwrap();
    let (entries, stats) = collect(dir.path(), &ExcludeFilter::none(), false);
    assert!(entries.is_empty());
    assert_eq!(stats.submitted, 0);
}

#[test]
fn test_excluded_file_is_skipped_siblings_continue() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "keep.txt", b"k");
    write(dir.path(), "drop.log", b"d");
    write(dir.path(), "also.txt", b"a");

    let exclude = ExcludeFilter::new(r"\.log$").unwrap();
    let (entries, stats) = collect(dir.path(), &exclude, false);

    assert_eq!(paths(&entries), vec![dir.path().join("also.txt"), dir.path().join("keep.txt")]);
    assert_eq!(stats.excluded, 1);
}

#[cfg(unix)]
#[test]
fn test_excluded_directory_is_never_entered() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "keep/file.txt", b"k");
    write(dir.path(), "cache/file.txt", b"c");
    // Sentinel: a dangling link that would be reported as an error if visited
    std::os::unix::fs::symlink(dir.path().join("nowhere"), dir.path().join("cache/sentinel")).unwrap();

    let exclude = ExcludeFilter::new("/cache$").unwrap();
    let (entries, stats) = collect(dir.path(), &exclude, true);

    assert_eq!(paths(&entries), vec![dir.path().join("keep/file.txt")]);
    assert_eq!(stats.excluded, 1);
    assert_eq!(stats.errors, 0);
}

#[test]
fn test_excluded_root_prunes_everything() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "file.txt", b"x");
    let exclude = ExcludeFilter::new(&regex::escape(&dir.path().to_string_lossy())).unwrap();

    let (entries, stats) = collect(dir.path(), &exclude, false);
    assert!(entries.is_empty());
    assert_eq!(stats.excluded, 1);
}

#[cfg(unix)]
#[test]
fn test_symlink_skipped_when_not_following() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "real.txt", b"hi");
    std::os::unix::fs::symlink("real.txt", dir.path().join("link.txt")).unwrap();

    let (entries, stats) = collect(dir.path(), &ExcludeFilter::none(), false);
    assert_eq!(paths(&entries), vec![dir.path().join("real.txt")]);
    assert_eq!(stats.skipped, 1);
}

#[cfg(unix)]
#[test]
fn test_symlink_followed_submits_target_with_target_metadata() {
    use std::os::unix::fs::MetadataExt;

    let dir = TempDir::new().unwrap();
    write(dir.path(), "data/real.txt", b"hi");
    fs::create_dir(dir.path().join("links")).unwrap();
    // Relative target resolves against the link's own directory
    std::os::unix::fs::symlink("../data/real.txt", dir.path().join("links/link.txt")).unwrap();

    let exclude = ExcludeFilter::new("/data$").unwrap();
    let (entries, stats) = collect(dir.path(), &exclude, true);

    assert_eq!(stats.submitted, 1);
    let entry = &entries[0];
    assert_eq!(entry.path, dir.path().join("links").join("../data/real.txt"));
    let target_ino = fs::metadata(dir.path().join("data/real.txt")).unwrap().ino();
    assert_eq!(entry.meta.inode.map(|i| i.ino), Some(target_ino));
    assert!(entry.meta.is_regular);
}

#[cfg(unix)]
#[test]
fn test_dangling_symlink_is_reported_and_walk_continues() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "ok.txt", b"ok");
    std::os::unix::fs::symlink("missing.txt", dir.path().join("broken")).unwrap();

    let (entries, stats) = collect(dir.path(), &ExcludeFilter::none(), true);
    assert_eq!(paths(&entries), vec![dir.path().join("ok.txt")]);
    assert_eq!(stats.errors, 1);
}

#[cfg(unix)]
#[test]
fn test_symlink_to_directory_is_not_descended() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "sub/inner.txt", b"x");
    std::os::unix::fs::symlink("sub", dir.path().join("loop")).unwrap();

    let (entries, stats) = collect(dir.path(), &ExcludeFilter::none(), true);
    assert_eq!(paths(&entries), vec![dir.path().join("sub/inner.txt")]);
    assert_eq!(stats.skipped, 1);
}

#[test]
fn test_missing_root_is_walk_error() {
    let dir = TempDir::new().unwrap();
    let (entries, stats) = collect(&dir.path().join("absent"), &ExcludeFilter::none(), false);
    assert!(entries.is_empty());
    assert_eq!(stats.errors, 1);
}

#[test]
fn test_root_may_be_a_file() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "single.txt", b"x");
    let (entries, _) = collect(&dir.path().join("single.txt"), &ExcludeFilter::none(), false);
    assert_eq!(paths(&entries), vec![dir.path().join("single.txt")]);
}
