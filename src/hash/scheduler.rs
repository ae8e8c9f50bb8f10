//! Bounded task scheduler.
//!
//! With a limit, tasks run on a rayon pool of exactly `limit` threads. The
//! pool drains a rendezvous channel through `par_bridge`, so `submit` blocks
//! until some pool thread is free to take the task. Without a limit each task
//! gets its own thread.
//!
//! A failing task never cancels the others; every submitted task runs to
//! completion and `join` returns the first error recorded.

use std::any::Any;
use std::io;
use std::num::NonZeroUsize;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

use crossbeam_channel::{bounded, Sender};
use rayon::iter::{ParallelBridge, ParallelIterator};
use rayon::ThreadPoolBuilder;
use tracing::{debug, warn};

use super::error::{HashWalkError, Result};

pub type Task = Box<dyn FnOnce() -> Result<()> + Send + 'static>;

type Job = Box<dyn FnOnce() + Send + 'static>;

/// Finished per-task threads are reaped after this many submissions.
const REAP_INTERVAL: usize = 1024;

#[derive(Debug, Default)]
struct ErrorSlot(Mutex<Option<HashWalkError>>);

impl ErrorSlot {
    fn record(&self, err: HashWalkError) {
        let mut slot = self.0.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if slot.is_none() {
            *slot = Some(err);
        }
    }

    fn take(&self) -> Option<HashWalkError> {
        self.0
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .take()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        msg.to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

fn run_task(task: Task, errors: &ErrorSlot) {
    match panic::catch_unwind(AssertUnwindSafe(task)) {
        Ok(Ok(())) => {}
        Ok(Err(err)) => errors.record(err),
        Err(payload) => errors.record(HashWalkError::WorkerPanicked {
            message: panic_message(payload.as_ref()),
        }),
    }
}

fn take_pending(pending: &Mutex<Option<Task>>) -> Option<Task> {
    pending
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
        .take()
}

/// Run `task` on a thread started by `spawn`. If no thread can be started the
/// task runs on the calling thread instead, so it is never lost.
fn spawn_or_run_inline<S>(task: Task, errors: &Arc<ErrorSlot>, spawn: S) -> Option<JoinHandle<()>>
where
    S: FnOnce(Job) -> io::Result<JoinHandle<()>>,
{
    let pending = Arc::new(Mutex::new(Some(task)));
    let job: Job = {
        let pending = Arc::clone(&pending);
        let errors = Arc::clone(errors);
        Box::new(move || {
            if let Some(task) = take_pending(&pending) {
                run_task(task, &errors);
            }
        })
    };

    match spawn(job) {
        Ok(handle) => Some(handle),
        Err(e) => {
            warn!("unable to spawn worker thread ({}), hashing inline", e);
            if let Some(task) = take_pending(&pending) {
                run_task(task, errors);
            }
            None
        }
    }
}

/// Rayon pool fed from a rendezvous channel by a dispatch thread
struct WorkerPool {
    sender: Sender<Task>,
    dispatcher: JoinHandle<()>,
}

impl WorkerPool {
    fn start(threads: NonZeroUsize, errors: Arc<ErrorSlot>) -> Result<Self> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(threads.get())
            .thread_name(|index| format!("treehash-worker-{}", index))
            .build()
            .map_err(|source| HashWalkError::WorkerPool { source })?;

        // Capacity 0: a send completes only when a pool thread is waiting for work.
        let (sender, receiver) = bounded::<Task>(0);

        let dispatcher = thread::Builder::new()
            .name("treehash-dispatch".to_string())
            .spawn(move || {
                pool.install(|| {
                    receiver
                        .into_iter()
                        .par_bridge()
                        .for_each(|task| run_task(task, &errors));
                });
            })
            .map_err(|e| HashWalkError::from_io_error(e, "spawning dispatch thread", None))?;

        Ok(Self { sender, dispatcher })
    }
}

pub struct BoundedScheduler {
    limit: Option<NonZeroUsize>,
    pool: Option<WorkerPool>,
    handles: Vec<JoinHandle<()>>,
    errors: Arc<ErrorSlot>,
    submitted: usize,
}

impl BoundedScheduler {
    /// Create a scheduler; `limit <= 0` means unlimited concurrency.
    pub fn new(limit: i64) -> Result<Self> {
        let limit = usize::try_from(limit).ok().and_then(NonZeroUsize::new);
        let errors = Arc::new(ErrorSlot::default());

        let pool = match limit {
            Some(n) => {
                let pool = WorkerPool::start(n, Arc::clone(&errors))?;
                debug!(workers = n.get(), "started bounded worker pool");
                Some(pool)
            }
            None => {
                debug!("worker pool is unbounded");
                None
            }
        };

        Ok(Self {
            limit,
            pool,
            handles: Vec::new(),
            errors,
            submitted: 0,
        })
    }

    /// `None` when unbounded
    pub fn limit(&self) -> Option<usize> {
        self.limit.map(NonZeroUsize::get)
    }

    /// Number of tasks handed to the scheduler so far
    pub fn submitted(&self) -> usize {
        self.submitted
    }

    /// Queue a task. Blocks while every worker is busy.
    pub fn submit<F>(&mut self, task: F)
    where
        F: FnOnce() -> Result<()> + Send + 'static,
    {
        self.submitted += 1;
        let task: Task = Box::new(task);

        if let Some(pool) = &self.pool {
            // The channel stays open until `join`, so a failed send means the
            // dispatch thread has died.
            if let Err(err) = pool.sender.send(task) {
                run_task(err.into_inner(), &self.errors);
            }
            return;
        }

        if self.submitted % REAP_INTERVAL == 0 {
            self.handles.retain(|handle| !handle.is_finished());
        }

        let handle = spawn_or_run_inline(task, &self.errors, |job| {
            thread::Builder::new()
                .name("treehash-task".to_string())
                .spawn(job)
        });
        if let Some(handle) = handle {
            self.handles.push(handle);
        }
    }

    /// Wait for every submitted task and return the first error, if any.
    pub fn join(mut self) -> Result<()> {
        if let Some(WorkerPool { sender, dispatcher }) = self.pool.take() {
            // Closing the channel ends the bridge once the pool has drained it.
            drop(sender);
            if let Err(payload) = dispatcher.join() {
                self.errors.record(HashWalkError::WorkerPanicked {
                    message: panic_message(payload.as_ref()),
                });
            }
        }

        for handle in self.handles.drain(..) {
            if let Err(payload) = handle.join() {
                self.errors.record(HashWalkError::WorkerPanicked {
                    message: panic_message(payload.as_ref()),
                });
            }
        }

        match self.errors.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}
