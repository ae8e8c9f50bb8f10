// Directory scanning module
// Depth-first traversal that classifies entries and hands eligible files to a submitter

use std::fs::{self, Metadata};
use std::path::Path;

use tracing::{info, warn};

use super::entry::{FileEntry, FileMeta};
use super::exclude::ExcludeFilter;
use super::symlink;

/// Counters collected during one walk
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WalkStats {
    /// Entries handed to the submitter
    pub submitted: usize,
    /// Symlinks and special files that were not hashed
    pub skipped: usize,
    /// Directories and files pruned by the exclusion pattern
    pub excluded: usize,
    /// Listing, stat, and symlink errors (logged, not fatal)
    pub errors: usize,
}

/// Single-threaded tree walker
pub struct TreeWalker<'a> {
    exclude: &'a ExcludeFilter,
    follow_symlinks: bool,
}

impl<'a> TreeWalker<'a> {
    pub fn new(exclude: &'a ExcludeFilter, follow_symlinks: bool) -> Self {
        Self {
            exclude,
            follow_symlinks,
        }
    }

    /// Walk `root` depth-first, calling `submit` once per eligible file.
    ///
    /// Per-path errors are logged and counted; they never stop the walk.
    pub fn walk<F>(&self, root: &Path, mut submit: F) -> WalkStats
    where
        F: FnMut(FileEntry),
    {
        let mut stats = WalkStats::default();

        match fs::symlink_metadata(root) {
            Ok(metadata) => self.visit(root, &metadata, &mut stats, &mut submit),
            Err(e) => {
                warn!("unable to walk {}: {}", root.display(), e);
                stats.errors += 1;
            }
        }

        stats
    }

    fn visit<F>(&self, path: &Path, metadata: &Metadata, stats: &mut WalkStats, submit: &mut F)
    where
        F: FnMut(FileEntry),
    {
        if metadata.is_dir() {
            if self.exclude.matches(path) {
                stats.excluded += 1;
                return;
            }
            self.walk_dir(path, stats, submit);
            return;
        }

        if self.exclude.matches(path) {
            stats.excluded += 1;
            return;
        }

        if metadata.file_type().is_file() {
            stats.submitted += 1;
            submit(FileEntry::new(path.to_path_buf(), FileMeta::from_metadata(metadata)));
            return;
        }

        if !self.follow_symlinks {
            info!("skipping non-regular file {}", path.display());
            stats.skipped += 1;
            return;
        }

        match symlink::resolve(path) {
            Ok(Some(link)) if link.metadata.is_file() => {
                stats.submitted += 1;
                submit(FileEntry::new(link.target, FileMeta::from_metadata(&link.metadata)));
            }
            Ok(Some(link)) => {
                info!(
                    "skipping symlink {} to non-regular target {}",
                    path.display(),
                    link.target.display()
                );
                stats.skipped += 1;
            }
            Ok(None) => {
                info!("skipping non-regular file {}", path.display());
                stats.skipped += 1;
            }
            Err(e) => {
                warn!("{}", e);
                stats.errors += 1;
            }
        }
    }

    fn walk_dir<F>(&self, dir: &Path, stats: &mut WalkStats, submit: &mut F)
    where
        F: FnMut(FileEntry),
    {
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                warn!("unable to walk {}: {}", dir.display(), e);
                stats.errors += 1;
                return;
            }
        };

        // Lexical order keeps runs over the same tree reproducible.
        let mut children = Vec::new();
        for entry_result in entries {
            match entry_result {
                Ok(entry) => children.push(entry),
                Err(e) => {
                    warn!("unable to walk {}: {}", dir.display(), e);
                    stats.errors += 1;
                }
            }
        }
        children.sort_by_key(|entry| entry.file_name());

        for entry in children {
            let path = entry.path();
            // DirEntry::metadata does not traverse symlinks
            match entry.metadata() {
                Ok(metadata) => self.visit(&path, &metadata, stats, submit),
                Err(e) => {
                    warn!("unable to walk {}: {}", path.display(), e);
                    stats.errors += 1;
                }
            }
        }
    }
}
