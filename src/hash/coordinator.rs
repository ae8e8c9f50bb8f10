// Run coordinator
// Owns the per-run cache and scheduler, drives the walk, and collects the outcome

use std::fmt;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use super::error::HashWalkError;
use super::hardlink::HardLinkCache;
use super::hash::HashComputer;
use super::scan::{TreeWalker, WalkStats};
use super::scheduler::BoundedScheduler;
use super::worker::{FileWorker, ResultSink};
use crate::config::RunConfig;

/// Statistics for one run
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// Entries submitted to the scheduler
    pub files_processed: usize,
    pub computed: usize,
    pub reused: usize,
    pub skipped: usize,
    pub excluded: usize,
    pub walk_errors: usize,
    pub duration: Duration,
}

/// The end-of-run line written to stderr
impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Files processed: {}", self.files_processed)
    }
}

impl RunSummary {
    fn from_walk(walk: WalkStats, computed: usize, reused: usize, duration: Duration) -> Self {
        Self {
            files_processed: walk.submitted,
            computed,
            reused,
            skipped: walk.skipped,
            excluded: walk.excluded,
            walk_errors: walk.errors,
            duration,
        }
    }
}

/// Summary plus the first worker error, if any
#[derive(Debug)]
pub struct RunOutcome {
    pub summary: RunSummary,
    pub first_error: Option<HashWalkError>,
}

impl RunOutcome {
    pub fn is_success(&self) -> bool {
        self.first_error.is_none()
    }

    pub fn into_result(self) -> Result<RunSummary, HashWalkError> {
        match self.first_error {
            Some(err) => Err(err),
            None => Ok(self.summary),
        }
    }
}

pub struct RunCoordinator {
    config: RunConfig,
    sink: Arc<dyn ResultSink>,
    computer: HashComputer,
}

impl RunCoordinator {
    pub fn new(config: RunConfig, sink: Arc<dyn ResultSink>) -> Self {
        Self {
            config,
            sink,
            computer: HashComputer::new(),
        }
    }

    /// Use a custom read buffer size for hashing
    pub fn with_computer(mut self, computer: HashComputer) -> Self {
        self.computer = computer;
        self
    }

    /// Walk the tree, hash every eligible file, and wait for all workers.
    ///
    /// Every discovered file is attempted; worker failures are logged as they
    /// happen and the first one is kept in the outcome.
    pub fn run(&self) -> RunOutcome {
        let start_time = Instant::now();
        let cache = Arc::new(HardLinkCache::new());
        let worker = FileWorker::new(self.config.algorithm, Arc::clone(&cache), Arc::clone(&self.sink))
            .with_computer(self.computer.clone());

        let mut scheduler = match BoundedScheduler::new(self.config.concurrency) {
            Ok(scheduler) => scheduler,
            Err(err) => {
                return RunOutcome {
                    summary: RunSummary::from_walk(WalkStats::default(), 0, 0, start_time.elapsed()),
                    first_error: Some(err),
                }
            }
        };

        debug!(
            root = %self.config.root.display(),
            algorithm = %self.config.algorithm,
            limit = ?scheduler.limit(),
            follow_symlinks = self.config.follow_symlinks,
            exclude = self.config.exclude.is_active(),
            "starting run"
        );

        let walker = TreeWalker::new(&self.config.exclude, self.config.follow_symlinks);
        let walk = walker.walk(&self.config.root, |entry| {
            let worker = worker.clone();
            scheduler.submit(move || {
                worker.process(&entry).map(|_| ()).map_err(|err| {
                    warn!("{}", err);
                    err
                })
            });
        });

        debug!(submitted = scheduler.submitted(), "walk finished, waiting for workers");
        let first_error = scheduler.join().err();
        let counters = worker.counters();

        RunOutcome {
            summary: RunSummary::from_walk(
                walk,
                counters.computed.load(Ordering::Relaxed),
                counters.reused.load(Ordering::Relaxed),
                start_time.elapsed(),
            ),
            first_error,
        }
    }
}
