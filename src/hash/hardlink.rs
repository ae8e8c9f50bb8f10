//! Hard-link digest cache shared by all workers of one run.
//!
//! Each inode with more than one link gets a slot guarded by its own mutex.
//! The first worker to lock an empty slot hashes the file and fills it; any
//! other link to the same inode waits on that slot and reuses the digest.
//! A slot is filled at most once and never changed afterwards. If hashing
//! fails the slot stays empty and the next link computes the digest itself.

use std::sync::{Arc, Mutex, MutexGuard};

use dashmap::DashMap;

use super::entry::{FileMeta, InodeId};
use super::error::Result;

type Slot = Arc<Mutex<Option<String>>>;

/// How the cache produced a digest
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheOutcome {
    /// The file was read and hashed by this caller
    Computed(String),
    /// An earlier link to the same inode already supplied the digest
    Reused(String),
}

impl CacheOutcome {
    pub fn digest(&self) -> &str {
        match self {
            CacheOutcome::Computed(d) | CacheOutcome::Reused(d) => d,
        }
    }
}

#[derive(Debug, Default)]
pub struct HardLinkCache {
    slots: DashMap<InodeId, Slot>,
}

fn lock(slot: &Slot) -> MutexGuard<'_, Option<String>> {
    // A panicking worker never leaves a half-written digest behind: the slot
    // is only assigned after hashing succeeds.
    slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl HardLinkCache {
    #[must_use]
    pub fn new() -> Self {
        Self {
            slots: DashMap::new(),
        }
    }

    /// Cached digest for this file's inode, if a previous link was hashed.
    ///
    /// Blocks while another worker is hashing the same inode.
    pub fn lookup(&self, meta: &FileMeta) -> Option<String> {
        let inode = meta.inode?;
        // Clone the Arc out so the shard lock is released before waiting.
        let slot = self.slots.get(&inode).map(|entry| Arc::clone(entry.value()))?;
        let digest = lock(&slot).clone();
        digest
    }

    /// Return the cached digest for `meta`'s inode, or run `compute` and
    /// cache its result when the file has other links.
    ///
    /// Files with a single link (or no inode identity) are computed without
    /// touching the cache.
    pub fn get_or_compute<F>(&self, meta: &FileMeta, compute: F) -> Result<CacheOutcome>
    where
        F: FnOnce() -> Result<String>,
    {
        let inode = match meta.inode {
            Some(inode) if meta.has_other_links() => inode,
            _ => {
                if let Some(digest) = self.lookup(meta) {
                    return Ok(CacheOutcome::Reused(digest));
                }
                return compute().map(CacheOutcome::Computed);
            }
        };

        let slot = Arc::clone(self.slots.entry(inode).or_default().value());
        let mut guard = lock(&slot);
        if let Some(digest) = guard.as_ref() {
            return Ok(CacheOutcome::Reused(digest.clone()));
        }

        let digest = compute()?;
        *guard = Some(digest.clone());
        Ok(CacheOutcome::Computed(digest))
    }

    /// Number of inodes with a cached digest
    pub fn len(&self) -> usize {
        self.slots
            .iter()
            .filter(|entry| lock(entry.value()).is_some())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
