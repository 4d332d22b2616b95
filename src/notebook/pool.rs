//! Bounded Worker Pool
//!
//! A fixed-size thread pool shared by every notebook request. Both fan-out
//! layers (documents within a request, pages within a document) run on the
//! same pool, so its capacity is the single ceiling on concurrent
//! rasterization and composition work.
//!
//! # Design
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                        WorkerPool                              │
//! │                  (rayon, fixed capacity)                       │
//! │                                                                │
//! │  install(documents) ──► par_iter ──► process_document          │
//! │                                         │                      │
//! │                                   par_iter(pages)              │
//! │                                         │                      │
//! │                     track() → TaskGuard → compose → drop()     │
//! │                         ↑                              ↓       │
//! │                   [active_count++]            [active_count--] │
//! │                                               [completed++]    │
//! └────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Nested parallel iterators issued from inside the pool are scheduled on
//! the same worker threads; they never spawn extra threads.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use rayon::{ThreadPool, ThreadPoolBuilder};
use serde::Serialize;

use super::error::{NotebookError, NotebookResult};

/// Default number of worker threads
pub const DEFAULT_WORKERS: usize = 4;

/// Fixed-capacity worker pool with utilization tracking
pub struct WorkerPool {
    /// Underlying work-stealing pool
    threads: ThreadPool,
    /// Number of worker threads
    capacity: usize,
    /// Tasks currently executing
    active_count: AtomicUsize,
    /// Tasks finished since startup (for metrics)
    completed_count: AtomicUsize,
}

impl WorkerPool {
    /// Create a pool with `capacity` worker threads
    pub fn new(capacity: usize) -> NotebookResult<Self> {
        if capacity == 0 {
            return Err(NotebookError::WorkerPool(
                "worker capacity must be at least 1".to_string(),
            ));
        }

        let threads = ThreadPoolBuilder::new()
            .num_threads(capacity)
            .thread_name(|index| format!("notebook-worker-{}", index))
            .build()?;

        tracing::debug!(capacity, "Worker pool started");

        Ok(Self {
            threads,
            capacity,
            active_count: AtomicUsize::new(0),
            completed_count: AtomicUsize::new(0),
        })
    }

    /// Number of worker threads
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Run `op` inside the pool, blocking the caller until it returns
    ///
    /// Parallel iterators used by `op` execute on this pool's threads.
    pub fn install<OP, R>(&self, op: OP) -> R
    where
        OP: FnOnce() -> R + Send,
        R: Send,
    {
        self.threads.install(op)
    }

    /// Mark a task as running until the returned guard is dropped
    pub fn track(&self) -> TaskGuard<'_> {
        self.active_count.fetch_add(1, Ordering::Relaxed);
        TaskGuard { pool: self }
    }

    fn finish(&self) {
        self.active_count.fetch_sub(1, Ordering::Relaxed);
        self.completed_count.fetch_add(1, Ordering::Relaxed);
    }

    /// Get pool statistics
    pub fn stats(&self) -> PoolStats {
        PoolStats {
            capacity: self.capacity,
            active: self.active_count.load(Ordering::Relaxed),
            completed: self.completed_count.load(Ordering::Relaxed),
        }
    }
}

/// RAII guard - marks the task finished on drop
pub struct TaskGuard<'a> {
    pool: &'a WorkerPool,
}

impl Drop for TaskGuard<'_> {
    fn drop(&mut self) {
        self.pool.finish();
    }
}

/// Pool statistics
#[derive(Debug, Clone, Serialize)]
pub struct PoolStats {
    /// Number of worker threads
    pub capacity: usize,
    /// Currently running tasks
    pub active: usize,
    /// Tasks finished since startup
    pub completed: usize,
}

impl PoolStats {
    /// Fraction of workers busy right now (0.0 to 1.0)
    pub fn utilization(&self) -> f64 {
        if self.capacity == 0 {
            return 0.0;
        }
        (self.active.min(self.capacity)) as f64 / self.capacity as f64
    }
}

/// Shared worker pool for the application
pub type SharedWorkerPool = Arc<WorkerPool>;

/// Create a shared worker pool with the given capacity
pub fn create_shared_pool(capacity: usize) -> NotebookResult<SharedWorkerPool> {
    Ok(Arc::new(WorkerPool::new(capacity)?))
}
