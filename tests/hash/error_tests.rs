// Tests for error module

use std::error::Error;
use std::io;
use std::path::PathBuf;

use treehash::hash::HashWalkError;

#[test]
fn test_file_not_found_error_display() {
    let error = HashWalkError::FileNotFound {
        path: PathBuf::from("/path/to/file.txt"),
    };
    let message = error.to_string();
    assert!(message.contains("File not found"));
    assert!(message.contains("/path/to/file.txt"));
}

#[test]
fn test_permission_denied_error_display() {
    let error = HashWalkError::PermissionDenied {
        path: PathBuf::from("/protected/file.txt"),
        operation: "opening".to_string(),
    };
    let message = error.to_string();
    assert!(message.contains("Permission denied"));
    assert!(message.contains("opening"));
    assert!(message.contains("/protected/file.txt"));
}

#[test]
fn test_io_error_with_path_keeps_source() {
    let error = HashWalkError::IoError {
        path: Some(PathBuf::from("data.bin")),
        operation: "reading".to_string(),
        source: io::Error::new(io::ErrorKind::Other, "disk on fire"),
    };
    let message = error.to_string();
    assert!(message.contains("reading data.bin"));
    assert!(message.contains("disk on fire"));
    assert!(error.source().is_some());
}

#[test]
fn test_io_error_without_path() {
    let error = HashWalkError::IoError {
        path: None,
        operation: "spawning worker thread".to_string(),
        source: io::Error::new(io::ErrorKind::Other, "no threads left"),
    };
    assert_eq!(
        error.to_string(),
        "I/O error while spawning worker thread: no threads left"
    );
}

#[test]
fn test_from_io_error_classifies_kinds() {
    let not_found = HashWalkError::from_io_error(
        io::Error::new(io::ErrorKind::NotFound, "nope"),
        "opening",
        Some(PathBuf::from("a.txt")),
    );
    assert!(matches!(not_found, HashWalkError::FileNotFound { .. }));

    let dir_not_found = HashWalkError::from_io_error(
        io::Error::new(io::ErrorKind::NotFound, "nope"),
        "resolving root directory",
        Some(PathBuf::from("root")),
    );
    assert!(matches!(dir_not_found, HashWalkError::DirectoryNotFound { .. }));

    let denied = HashWalkError::from_io_error(
        io::Error::new(io::ErrorKind::PermissionDenied, "nope"),
        "reading",
        Some(PathBuf::from("a.txt")),
    );
    assert!(matches!(denied, HashWalkError::PermissionDenied { .. }));

    let other = HashWalkError::from_io_error(
        io::Error::new(io::ErrorKind::UnexpectedEof, "short"),
        "reading",
        Some(PathBuf::from("a.txt")),
    );
    assert!(matches!(other, HashWalkError::IoError { .. }));
    assert!(other.is_io());
}

#[test]
fn test_from_io_error_without_path_stays_generic() {
    let error: HashWalkError = io::Error::new(io::ErrorKind::NotFound, "nope").into();
    assert!(matches!(error, HashWalkError::IoError { path: None, .. }));
}

#[test]
fn test_symlink_error_display() {
    let error = HashWalkError::SymlinkResolution {
        path: PathBuf::from("/data/broken"),
        source: io::Error::new(io::ErrorKind::NotFound, "No such file"),
    };
    assert!(error.to_string().starts_with("error reading symlink /data/broken"));
    assert!(!error.is_io());
}
