//! Fixed-size worker pool.
//!
//! Tasks are kept on a stack: an idle worker always takes the most
//! recently submitted task. Under sustained load older tasks can wait
//! indefinitely. Callers that need submission order should use a queue of
//! their own (the database source's I/O thread is one).

mod handle;

pub use handle::TaskHandle;

use parking_lot::{Condvar, Mutex};
use std::io;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use thiserror::Error;
use tokio::sync::oneshot;
use tracing::{debug, info, warn};

/// Errors reported by the worker pool.
#[derive(Debug, Error)]
pub enum PoolError {
    /// Work was submitted after [`WorkerPool::stop`]
    #[error("Worker pool has been stopped")]
    Stopped,

    /// The task panicked; the worker survived
    #[error("Task panicked")]
    TaskPanicked,

    /// The task was discarded before producing a result
    #[error("Task was dropped before completing")]
    TaskDropped,

    /// A worker thread could not be spawned
    #[error("Failed to spawn worker thread: {0}")]
    Spawn(#[source] io::Error),

    /// A pool needs at least one thread
    #[error("Worker pool needs at least one thread")]
    NoThreads,
}

type Task = Box<dyn FnOnce() + Send + 'static>;

#[derive(Default)]
struct State {
    tasks: Vec<Task>,
    running: usize,
    stopped: bool,
}

struct Inner {
    state: Mutex<State>,
    wake: Condvar,
}

impl Inner {
    fn worker_loop(&self) {
        loop {
            let task = {
                let mut state = self.state.lock();
                while !state.stopped && state.tasks.is_empty() {
                    self.wake.wait(&mut state);
                }
                match state.tasks.pop() {
                    Some(task) => {
                        state.running += 1;
                        task
                    }
                    None => break,
                }
            };

            task();
            self.state.lock().running -= 1;
        }
    }
}

/// A fixed set of threads executing submitted closures, newest first.
///
/// # Example
///
/// ```
/// use tilestream::pool::WorkerPool;
///
/// let pool = WorkerPool::new(2).unwrap();
/// let handle = pool.enqueue(|| 6 * 7).unwrap();
/// assert_eq!(handle.wait().unwrap(), 42);
/// ```
pub struct WorkerPool {
    inner: Arc<Inner>,
    workers: Mutex<Vec<JoinHandle<()>>>,
}

impl WorkerPool {
    /// Start a pool with `threads` workers.
    pub fn new(threads: usize) -> Result<Self, PoolError> {
        if threads == 0 {
            return Err(PoolError::NoThreads);
        }

        let pool = Self {
            inner: Arc::new(Inner {
                state: Mutex::new(State::default()),
                wake: Condvar::new(),
            }),
            workers: Mutex::new(Vec::with_capacity(threads)),
        };

        for i in 0..threads {
            let inner = Arc::clone(&pool.inner);
            let spawned = thread::Builder::new()
                .name(format!("tile-worker-{}", i))
                .spawn(move || inner.worker_loop());

            match spawned {
                Ok(handle) => pool.workers.lock().push(handle),
                Err(e) => {
                    pool.stop();
                    return Err(PoolError::Spawn(e));
                }
            }
        }

        info!(threads, "started worker pool");
        Ok(pool)
    }

    /// Submit `work` and return a handle to its result.
    ///
    /// Never blocks. Fails once the pool has been stopped. A panic inside
    /// `work` is reported through the handle as [`PoolError::TaskPanicked`].
    pub fn enqueue<F, R>(&self, work: F) -> Result<TaskHandle<R>, PoolError>
    where
        F: FnOnce() -> R + Send + 'static,
        R: Send + 'static,
    {
        let (tx, rx) = oneshot::channel();
        let task: Task = Box::new(move || {
            let result = panic::catch_unwind(AssertUnwindSafe(work)).map_err(|_| {
                warn!("worker pool task panicked");
                PoolError::TaskPanicked
            });
            let _ = tx.send(result);
        });

        {
            let mut state = self.inner.state.lock();
            if state.stopped {
                return Err(PoolError::Stopped);
            }
            state.tasks.push(task);
        }
        self.inner.wake.notify_one();

        Ok(TaskHandle::new(rx))
    }

    /// Number of tasks queued but not yet started.
    pub fn pending_task_count(&self) -> usize {
        self.inner.state.lock().tasks.len()
    }

    /// Number of tasks currently executing.
    pub fn running_task_count(&self) -> usize {
        self.inner.state.lock().running
    }

    /// Number of worker threads still attached to the pool.
    pub fn thread_count(&self) -> usize {
        self.workers.lock().len()
    }

    /// Whether [`WorkerPool::stop`] has been called.
    pub fn is_stopped(&self) -> bool {
        self.inner.state.lock().stopped
    }

    /// Discard every task that has not started yet and return how many
    /// were dropped. Their handles report [`PoolError::TaskDropped`].
    pub fn clear_pending(&self) -> usize {
        let discarded = std::mem::take(&mut self.inner.state.lock().tasks);
        discarded.len()
    }

    /// Reject new work, let workers finish what is already queued, and
    /// join them. Calling it again is a no-op.
    pub fn stop(&self) {
        self.inner.state.lock().stopped = true;
        self.inner.wake.notify_all();

        let workers = std::mem::take(&mut *self.workers.lock());
        if workers.is_empty() {
            return;
        }

        let current = thread::current().id();
        for worker in workers {
            if worker.thread().id() == current {
                continue;
            }
            if worker.join().is_err() {
                warn!("worker thread panicked");
            }
        }
        debug!("worker pool stopped");
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.stop();
    }
}
