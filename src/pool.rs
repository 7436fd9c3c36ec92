//! Fixed-size worker pool for HTML text extraction.
//!
//! This module provides [`WorkerPool`], which runs jobs on a fixed set of
//! threads created through a [`ThreadFactory`]. Every worker owns its own
//! [`TextExtractor`], constructed when the worker starts and reused for
//! every job it runs, so parser state is never shared between threads.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │                 WorkerPool                   │
//! │  submit()/execute() ──→ job queue (mpsc)     │
//! │                           │                  │
//! │        ┌──────────────────┼───────────────┐  │
//! │        ▼                  ▼               ▼  │
//! │   [worker 1]         [worker 2]  ...  [worker N]
//! │   TextExtractor      TextExtractor    TextExtractor
//! └──────────────────────────────────────────────┘
//!            threads prepared by a ThreadFactory
//! ```
//!
//! # Example
//!
//! ```rust
//! use poolkit::{WorkerPool, WorkerPoolConfigBuilder};
//!
//! let pool = WorkerPool::builder()
//!     .config(
//!         WorkerPoolConfigBuilder::new()
//!             .worker_count(2)
//!             .thread_name_prefix("docs")
//!             .build()?,
//!     )
//!     .build()?;
//!
//! let text = pool.extract_blocking("<p>Hello <b>world</b></p>")?;
//! assert_eq!(text, "Hello world");
//!
//! pool.shutdown();
//! # Ok::<(), poolkit::PoolkitError>(())
//! ```

use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, mpsc};
use std::thread;

use tokio::sync::oneshot;

use crate::config::WorkerPoolConfig;
use crate::error::{PoolkitError, Result};
use crate::extract::TextExtractor;
use crate::factory::{NamedThreadFactory, ThreadFactory};
use crate::stats::PoolStats;
use crate::thread::WorkerThread;

/// Hands a finished job's result to its caller. Runs after the job is counted.
type Delivery = Box<dyn FnOnce() + Send + 'static>;

type Job = Box<dyn FnOnce(&mut TextExtractor) -> Option<Delivery> + Send + 'static>;

fn lock_or_recover<'a, T>(mutex: &'a Mutex<T>, what: &str) -> MutexGuard<'a, T> {
    mutex.lock().unwrap_or_else(|poisoned| {
        log::warn!("{} lock was poisoned, recovering", what);
        poisoned.into_inner()
    })
}

// ============================================================================
// WorkerPoolInner
// ============================================================================

/// State shared between the pool and its workers.
pub(crate) struct WorkerPoolInner {
    /// Configuration (immutable after creation).
    config: WorkerPoolConfig,

    /// Job intake. `None` once shutdown begins, which closes the queue.
    sender: Mutex<Option<mpsc::Sender<Job>>>,

    /// Job queue shared by all workers; one worker waits on it at a time.
    receiver: Mutex<mpsc::Receiver<Job>>,

    /// Set once shutdown begins. No new jobs are accepted afterwards.
    shutting_down: AtomicBool,

    queued: AtomicUsize,
    running_workers: AtomicUsize,
    completed: AtomicU64,
    failed: AtomicU64,
}

impl WorkerPoolInner {
    fn new(config: WorkerPoolConfig) -> Arc<Self> {
        let (sender, receiver) = mpsc::channel();
        Arc::new(Self {
            config,
            sender: Mutex::new(Some(sender)),
            receiver: Mutex::new(receiver),
            shutting_down: AtomicBool::new(false),
            queued: AtomicUsize::new(0),
            running_workers: AtomicUsize::new(0),
            completed: AtomicU64::new(0),
            failed: AtomicU64::new(0),
        })
    }

    fn next_job(&self) -> Option<Job> {
        lock_or_recover(&self.receiver, "Job queue").recv().ok()
    }

    /// Worker main loop. Runs until the queue is closed and drained.
    fn run_worker(self: Arc<Self>) {
        let name = thread::current().name().unwrap_or("worker").to_string();
        log::debug!("Worker '{}' started", name);

        let mut extractor = TextExtractor::new(self.config.extractor.clone());

        while let Some(job) = self.next_job() {
            self.queued.fetch_sub(1, Ordering::AcqRel);

            match panic::catch_unwind(AssertUnwindSafe(|| job(&mut extractor))) {
                Ok(delivery) => {
                    self.completed.fetch_add(1, Ordering::AcqRel);
                    if let Some(deliver) = delivery {
                        deliver();
                    }
                }
                Err(_) => {
                    self.failed.fetch_add(1, Ordering::AcqRel);
                    log::error!("Job panicked on worker '{}', resetting its extractor", name);
                    extractor = TextExtractor::new(self.config.extractor.clone());
                }
            }
        }

        self.running_workers.fetch_sub(1, Ordering::AcqRel);
        log::debug!(
            "Worker '{}' exiting after {} extractions",
            name,
            extractor.extractions()
        );
    }

    fn close_intake(&self) -> bool {
        if self.shutting_down.swap(true, Ordering::AcqRel) {
            return false;
        }
        lock_or_recover(&self.sender, "Job intake").take();
        true
    }
}

// ============================================================================
// WorkerPool
// ============================================================================

/// Fixed-size pool of threads, each owning a [`TextExtractor`].
///
/// Methods take `&self`, so a pool can be shared behind an [`Arc`]
/// (see [`SharedWorkerPool`](crate::SharedWorkerPool)).
pub struct WorkerPool {
    inner: Arc<WorkerPoolInner>,
    workers: Mutex<Vec<WorkerThread>>,
}

impl WorkerPool {
    /// Create a new builder.
    pub fn builder() -> WorkerPoolBuilder {
        WorkerPoolBuilder::new()
    }

    /// Convert the pool into a shareable [`Arc`].
    pub fn into_shared(self) -> Arc<WorkerPool> {
        log::debug!("Converting WorkerPool into shared Arc");
        Arc::new(self)
    }

    /// Pool configuration.
    pub fn config(&self) -> &WorkerPoolConfig {
        &self.inner.config
    }

    /// Whether shutdown has begun.
    pub fn is_shutting_down(&self) -> bool {
        self.inner.shutting_down.load(Ordering::Acquire)
    }

    /// Queue a job. It runs on some worker with that worker's extractor.
    ///
    /// # Errors
    ///
    /// Returns [`PoolkitError::ShuttingDown`] once shutdown has begun.
    pub fn execute<F>(&self, job: F) -> Result<()>
    where
        F: FnOnce(&mut TextExtractor) + Send + 'static,
    {
        self.enqueue(Box::new(move |extractor: &mut TextExtractor| -> Option<Delivery> {
            job(extractor);
            None
        }))
    }

    fn enqueue(&self, job: Job) -> Result<()> {
        if self.is_shutting_down() {
            return Err(PoolkitError::ShuttingDown);
        }

        let sender = lock_or_recover(&self.inner.sender, "Job intake");
        let Some(sender) = sender.as_ref() else {
            return Err(PoolkitError::ShuttingDown);
        };

        self.inner.queued.fetch_add(1, Ordering::AcqRel);
        sender.send(job).map_err(|_| {
            self.inner.queued.fetch_sub(1, Ordering::AcqRel);
            PoolkitError::ShuttingDown
        })
    }

    /// Queue an extraction and return a ticket for its result.
    ///
    /// # Errors
    ///
    /// Returns [`PoolkitError::ShuttingDown`] once shutdown has begun.
    pub fn submit(&self, html: impl Into<String>) -> Result<ExtractionTicket> {
        let html = html.into();
        let (reply, receiver) = oneshot::channel();

        self.enqueue(Box::new(move |extractor: &mut TextExtractor| -> Option<Delivery> {
            let result = extractor.extract_text(&html);
            Some(Box::new(move || {
                // The caller may have dropped its ticket.
                let _ = reply.send(result);
            }) as Delivery)
        }))?;

        Ok(ExtractionTicket { receiver })
    }

    /// Extract text on a worker and await the result.
    pub async fn extract(&self, html: impl Into<String>) -> Result<String> {
        self.submit(html)?.recv().await
    }

    /// Extract text on a worker, blocking the calling thread until done.
    ///
    /// # Panics
    ///
    /// Panics if called from within an asynchronous execution context;
    /// use [`extract`](Self::extract) there.
    pub fn extract_blocking(&self, html: impl Into<String>) -> Result<String> {
        self.submit(html)?.wait()
    }

    /// Current pool statistics.
    ///
    /// A job is counted in `completed` before its reply is sent, so a caller
    /// that has received N results sees at least N completions.
    pub fn stats(&self) -> PoolStats {
        let stats = PoolStats {
            workers: self.inner.running_workers.load(Ordering::Acquire),
            queued: self.inner.queued.load(Ordering::Acquire),
            completed: self.inner.completed.load(Ordering::Acquire),
            failed: self.inner.failed.load(Ordering::Acquire),
        };
        log::trace!("Pool stats: {:?}", stats);
        stats
    }

    /// Names of the worker threads that have not been joined yet.
    pub fn thread_names(&self) -> Vec<String> {
        lock_or_recover(&self.workers, "Worker list")
            .iter()
            .map(|worker| worker.name().to_string())
            .collect()
    }

    /// Stop accepting jobs, let queued jobs finish and join the workers.
    ///
    /// Idempotent. Called automatically on drop.
    pub fn shutdown(&self) {
        if !self.inner.close_intake() {
            log::debug!("Pool already shut down");
            return;
        }
        log::info!("Shutting down worker pool...");

        let workers = std::mem::take(&mut *lock_or_recover(&self.workers, "Worker list"));
        for worker in workers {
            if worker.is_current_thread() {
                log::warn!(
                    "Shutdown called from worker '{}'; it will exit after the current job",
                    worker.name()
                );
                continue;
            }

            let name = worker.name().to_string();
            match worker.join() {
                Ok(()) => log::debug!("Worker '{}' stopped", name),
                Err(e) => log::error!("{}", e),
            }
        }

        let stats = self.stats();
        log::info!(
            "Shutdown complete - Completed: {}, Failed: {}",
            stats.completed,
            stats.failed
        );
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        if !self.is_shutting_down() {
            log::warn!("WorkerPool dropped without explicit shutdown - cleaning up");
            self.shutdown();
        }
    }
}

// ============================================================================
// ExtractionTicket
// ============================================================================

/// Pending result of [`WorkerPool::submit`].
#[derive(Debug)]
pub struct ExtractionTicket {
    receiver: oneshot::Receiver<Result<String>>,
}

impl ExtractionTicket {
    /// Block until the extraction finishes.
    ///
    /// # Errors
    ///
    /// - The extraction's own error.
    /// - [`PoolkitError::WorkerLost`] if the job was dropped without a reply.
    ///
    /// # Panics
    ///
    /// Panics if called from within an asynchronous execution context.
    pub fn wait(self) -> Result<String> {
        self.receiver
            .blocking_recv()
            .unwrap_or(Err(PoolkitError::WorkerLost))
    }

    /// Await the extraction result.
    ///
    /// # Errors
    ///
    /// Same as [`wait`](Self::wait).
    pub async fn recv(self) -> Result<String> {
        self.receiver.await.unwrap_or(Err(PoolkitError::WorkerLost))
    }
}

// ============================================================================
// WorkerPoolBuilder
// ============================================================================

/// Builder for constructing a [`WorkerPool`].
///
/// # Example
///
/// ```rust
/// use poolkit::{NamedThreadFactory, WorkerPool};
///
/// let pool = WorkerPool::builder()
///     .factory(Box::new(NamedThreadFactory::new(Some("custom"), true)))
///     .build()?;
///
/// assert!(pool.thread_names().iter().all(|n| n.starts_with("custom-pool-")));
/// # Ok::<(), poolkit::PoolkitError>(())
/// ```
pub struct WorkerPoolBuilder {
    /// Optional configuration (uses default if not provided).
    config: Option<WorkerPoolConfig>,

    /// Optional thread factory (named factory from the config if not provided).
    factory: Option<Box<dyn ThreadFactory>>,
}

impl WorkerPoolBuilder {
    /// Create a new builder with defaults.
    pub fn new() -> Self {
        Self {
            config: None,
            factory: None,
        }
    }

    /// Set custom configuration.
    ///
    /// If not called, uses [`WorkerPoolConfig::default()`].
    pub fn config(mut self, config: WorkerPoolConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the thread factory.
    ///
    /// A custom factory decides thread names and the daemon flag itself;
    /// `thread_name_prefix` and `daemon` from the configuration are then
    /// ignored.
    pub fn factory(mut self, factory: Box<dyn ThreadFactory>) -> Self {
        self.factory = Some(factory);
        self
    }

    /// Build the pool and start its workers.
    ///
    /// # Errors
    ///
    /// - Returns [`PoolkitError::Configuration`] if `worker_count` is 0.
    /// - Returns [`PoolkitError::ThreadSpawn`] if a worker cannot be started;
    ///   workers started before the failure are shut down.
    pub fn build(self) -> Result<WorkerPool> {
        let config = self.config.unwrap_or_default();
        if config.worker_count == 0 {
            return Err(PoolkitError::Configuration(
                "worker_count must be greater than 0".to_string(),
            ));
        }

        let factory = match self.factory {
            Some(factory) => factory,
            None => Box::new(NamedThreadFactory::new(
                config.thread_name_prefix.as_deref(),
                config.daemon,
            )),
        };

        log::info!("Building worker pool with config: {:?}", config);

        let worker_count = config.worker_count;
        let inner = WorkerPoolInner::new(config);
        let pool = WorkerPool {
            inner: Arc::clone(&inner),
            workers: Mutex::new(Vec::with_capacity(worker_count)),
        };

        for _ in 0..worker_count {
            let worker_inner = Arc::clone(&inner);
            let prepared = factory.new_thread(Box::new(move || worker_inner.run_worker()));

            inner.running_workers.fetch_add(1, Ordering::AcqRel);
            match prepared.start() {
                Ok(worker) => lock_or_recover(&pool.workers, "Worker list").push(worker),
                Err(e) => {
                    inner.running_workers.fetch_sub(1, Ordering::AcqRel);
                    log::error!("Failed to start worker: {}", e);
                    pool.shutdown();
                    return Err(e);
                }
            }
        }

        log::info!("Worker pool built with {} workers", worker_count);
        Ok(pool)
    }
}

impl Default for WorkerPoolBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Environment Initialization (feature-gated)
// ============================================================================

/// Initialize a shared worker pool from environment variables.
///
/// See [`config::env`](crate::config::env) for the variables read.
///
/// # Errors
///
/// - Returns error if configuration is invalid.
/// - Returns error if a worker cannot be started.
#[cfg(feature = "env-config")]
pub fn init_worker_pool() -> Result<crate::SharedWorkerPool> {
    use crate::config::env::from_env;

    log::info!("Initializing worker pool from environment...");

    let config = from_env()?;
    let pool = WorkerPool::builder().config(config).build().map_err(|e| {
        log::error!("Failed to create worker pool: {}", e);
        e
    })?;

    log::info!("Worker pool ready - Workers: {}", pool.stats().workers);
    Ok(pool.into_shared())
}

// ============================================================================
// Unit Tests
// ============================================================================
