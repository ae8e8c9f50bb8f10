//! File entries produced by the walk and consumed by workers.

use std::fs::Metadata;
use std::path::PathBuf;

/// Filesystem identity shared by every hard link to the same data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InodeId {
    pub dev: u64,
    pub ino: u64,
}

/// The subset of metadata the workers care about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileMeta {
    pub is_regular: bool,
    pub is_symlink: bool,
    pub link_count: u64,
    /// `None` on platforms without inode numbers.
    pub inode: Option<InodeId>,
}

impl FileMeta {
    #[cfg(unix)]
    pub fn from_metadata(metadata: &Metadata) -> Self {
        use std::os::unix::fs::MetadataExt;

        Self {
            is_regular: metadata.file_type().is_file(),
            is_symlink: metadata.file_type().is_symlink(),
            link_count: metadata.nlink(),
            inode: Some(InodeId {
                dev: metadata.dev(),
                ino: metadata.ino(),
            }),
        }
    }

    #[cfg(not(unix))]
    pub fn from_metadata(metadata: &Metadata) -> Self {
        Self {
            is_regular: metadata.file_type().is_file(),
            is_symlink: metadata.file_type().is_symlink(),
            link_count: 1,
            inode: None,
        }
    }

    /// Another directory entry may point at the same data.
    pub fn has_other_links(&self) -> bool {
        self.link_count > 1
    }
}

/// One eligible object found by the walk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// Path the worker opens (the link target for followed symlinks).
    pub path: PathBuf,
    pub meta: FileMeta,
}

impl FileEntry {
    pub fn new(path: PathBuf, meta: FileMeta) -> Self {
        Self { path, meta }
    }
}
