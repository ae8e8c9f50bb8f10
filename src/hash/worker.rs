// File worker
// Hashes one file (or reuses a hard link's digest) and emits its result line

use std::fmt;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use tracing::debug;

use super::entry::FileEntry;
use super::error::{HashWalkError, Result};
use super::hardlink::{CacheOutcome, HardLinkCache};
use super::hash::{Algorithm, HashComputer};

/// How a result's digest was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    /// File contents were read and hashed
    Computed,
    /// Digest taken from the hard-link cache
    Reused,
}

impl Marker {
    pub fn symbol(self) -> &'static str {
        match self {
            Marker::Computed => "-",
            Marker::Reused => "*",
        }
    }
}

/// One result line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DigestRecord {
    pub digest: String,
    pub path: PathBuf,
    pub marker: Marker,
}

impl fmt::Display for DigestRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}  {}  {}",
            self.digest,
            self.path.display(),
            self.marker.symbol()
        )
    }
}

/// Destination for result lines. Called concurrently from every worker.
pub trait ResultSink: Send + Sync {
    fn emit(&self, record: &DigestRecord) -> io::Result<()>;
}

/// Writes each record as one line on stdout
#[derive(Debug, Default)]
pub struct StdoutSink;

impl ResultSink for StdoutSink {
    fn emit(&self, record: &DigestRecord) -> io::Result<()> {
        // The lock keeps whole lines together across workers.
        let mut out = io::stdout().lock();
        writeln!(out, "{}", record)
    }
}

/// Keeps records in memory, for library callers and tests
#[derive(Debug, Default)]
pub struct MemorySink {
    records: Mutex<Vec<DigestRecord>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<DigestRecord> {
        self.records
            .lock()
            .map(|records| records.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }
}

impl ResultSink for MemorySink {
    fn emit(&self, record: &DigestRecord) -> io::Result<()> {
        let mut records = self
            .records
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        records.push(record.clone());
        Ok(())
    }
}

/// Counters shared by all workers of a run
#[derive(Debug, Default)]
pub struct WorkerCounters {
    pub computed: AtomicUsize,
    pub reused: AtomicUsize,
}

/// Task body run by the scheduler for each submitted entry
#[derive(Clone)]
pub struct FileWorker {
    algorithm: Algorithm,
    computer: HashComputer,
    cache: Arc<HardLinkCache>,
    sink: Arc<dyn ResultSink>,
    counters: Arc<WorkerCounters>,
}

impl FileWorker {
    pub fn new(algorithm: Algorithm, cache: Arc<HardLinkCache>, sink: Arc<dyn ResultSink>) -> Self {
        Self {
            algorithm,
            computer: HashComputer::new(),
            cache,
            sink,
            counters: Arc::new(WorkerCounters::default()),
        }
    }

    pub fn with_computer(mut self, computer: HashComputer) -> Self {
        self.computer = computer;
        self
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    pub fn counters(&self) -> &WorkerCounters {
        &self.counters
    }

    /// Produce and emit the result for one entry.
    ///
    /// Open/read failures are returned without emitting anything.
    pub fn process(&self, entry: &FileEntry) -> Result<DigestRecord> {
        let outcome = self.cache.get_or_compute(&entry.meta, || {
            self.computer
                .compute_hash(&entry.path, self.algorithm)
                .map(|result| result.hash)
        })?;

        let record = match outcome {
            CacheOutcome::Reused(digest) => {
                debug!(path = %entry.path.display(), "hard link cache hit");
                self.counters.reused.fetch_add(1, Ordering::Relaxed);
                DigestRecord {
                    digest,
                    path: entry.path.clone(),
                    marker: Marker::Reused,
                }
            }
            CacheOutcome::Computed(digest) => {
                self.counters.computed.fetch_add(1, Ordering::Relaxed);
                DigestRecord {
                    digest,
                    path: entry.path.clone(),
                    marker: Marker::Computed,
                }
            }
        };

        self.finish(&record)?;
        Ok(record)
    }

    fn finish(&self, record: &DigestRecord) -> Result<()> {
        self.sink.emit(record).map_err(|e| {
            HashWalkError::from_io_error(e, "writing result for", Some(record.path.clone()))
        })
    }
}
