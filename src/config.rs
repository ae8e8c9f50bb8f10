//! Resolved run configuration.
//!
//! Everything here is validated before the walk starts: the root is made
//! absolute and cleaned, the exclusion pattern is compiled, and the algorithm
//! identifier is resolved once (so an unsupported name warns once per run).

use std::path::{Path, PathBuf};

use crate::hash::error::{HashWalkError, Result};
use crate::hash::exclude::ExcludeFilter;
use crate::hash::hash::{Algorithm, HashRegistry};
use crate::hash::path_utils;

pub const DEFAULT_POOL_SIZE: i64 = 8;
pub const DEFAULT_ALGORITHM: &str = "sha256";

#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Absolute, cleaned traversal root
    pub root: PathBuf,
    /// Maximum concurrently active workers; `<= 0` is unlimited
    pub concurrency: i64,
    pub follow_symlinks: bool,
    pub algorithm: Algorithm,
    pub exclude: ExcludeFilter,
}

impl RunConfig {
    /// Defaults for everything except the root.
    pub fn new(root: &Path) -> Result<Self> {
        Ok(Self {
            root: resolve_root(root)?,
            concurrency: DEFAULT_POOL_SIZE,
            follow_symlinks: false,
            algorithm: Algorithm::default(),
            exclude: ExcludeFilter::none(),
        })
    }

    /// Validate raw option values into a configuration.
    pub fn resolve(
        root: &Path,
        concurrency: i64,
        follow_symlinks: bool,
        algorithm: &str,
        exclude: Option<&str>,
    ) -> Result<Self> {
        // Compile the pattern first so a bad one fails before anything else is reported.
        let exclude = ExcludeFilter::from_option(exclude)?;
        Ok(Self {
            root: resolve_root(root)?,
            concurrency,
            follow_symlinks,
            algorithm: HashRegistry::resolve(algorithm),
            exclude,
        })
    }

    pub fn with_concurrency(mut self, concurrency: i64) -> Self {
        self.concurrency = concurrency;
        self
    }

    pub fn with_follow_symlinks(mut self, follow: bool) -> Self {
        self.follow_symlinks = follow;
        self
    }

    pub fn with_algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    pub fn with_exclude(mut self, exclude: ExcludeFilter) -> Self {
        self.exclude = exclude;
        self
    }
}

fn resolve_root(root: &Path) -> Result<PathBuf> {
    path_utils::absolute_clean(root).map_err(|e| {
        HashWalkError::from_io_error(e, "resolving root directory", Some(root.to_path_buf()))
    })
}
