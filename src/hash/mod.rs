// Tree hashing core
// Walk, schedule, and hash every file under a root with hard-link deduplication

pub mod coordinator;
pub mod entry;
pub mod error;
pub mod exclude;
pub mod hardlink;
pub mod hash;
pub mod path_utils;
pub mod scan;
pub mod scheduler;
pub mod symlink;
pub mod worker;

// Re-export commonly used types for convenience
pub use coordinator::{RunCoordinator, RunOutcome, RunSummary};
pub use entry::{FileEntry, FileMeta, InodeId};
pub use error::HashWalkError;
pub use exclude::ExcludeFilter;
pub use hardlink::{CacheOutcome, HardLinkCache};
pub use hash::{Algorithm, AlgorithmInfo, HashComputer, HashRegistry, HashResult, Hasher};
pub use scan::{TreeWalker, WalkStats};
pub use scheduler::BoundedScheduler;
pub use worker::{DigestRecord, FileWorker, Marker, MemorySink, ResultSink, StdoutSink};
