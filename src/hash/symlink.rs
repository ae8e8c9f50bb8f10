//! Symbolic link resolution.
//!
//! The walker only consults this module for entries that are neither
//! directories nor regular files.

use std::fs::{self, Metadata};
use std::path::{Path, PathBuf};

use super::error::{HashWalkError, Result};
use super::path_utils;

/// A symlink whose target has been located and stat'ed.
#[derive(Debug, Clone)]
pub struct ResolvedLink {
    /// Path of the link target, relative targets joined onto the link's directory.
    pub target: PathBuf,
    /// Metadata of the final target (links followed).
    pub metadata: Metadata,
}

/// Reports whether `path` is a symbolic link and, if so, its raw target
/// exactly as stored in the link.
pub fn check_symlink(path: &Path) -> Result<Option<PathBuf>> {
    let metadata = fs::symlink_metadata(path).map_err(|source| HashWalkError::SymlinkResolution {
        path: path.to_path_buf(),
        source,
    })?;

    if !metadata.file_type().is_symlink() {
        return Ok(None);
    }

    let target = fs::read_link(path).map_err(|source| HashWalkError::SymlinkResolution {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(Some(target))
}

/// Resolve a symlink to its target path and the target's metadata.
///
/// Relative targets are interpreted against the directory holding the link,
/// the same way the kernel follows them. Returns `Ok(None)` when `path` is
/// not a symlink, and an error for dangling or unreadable links.
pub fn resolve(path: &Path) -> Result<Option<ResolvedLink>> {
    let raw = match check_symlink(path)? {
        Some(raw) => raw,
        None => return Ok(None),
    };

    let base = path.parent().unwrap_or_else(|| Path::new("/"));
    // No lexical cleaning here: ".." after a symlinked directory must be
    // left for the kernel to interpret.
    let target = path_utils::resolve_path(&raw, base);

    // fs::metadata follows the whole chain, so a link to a link still lands
    // on the final object.
    let metadata = fs::metadata(path).map_err(|source| HashWalkError::SymlinkResolution {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(Some(ResolvedLink {
        target,
        metadata,
    }))
}
