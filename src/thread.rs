//! Prepared and started threads.
//!
//! A [`ThreadFactory`](crate::ThreadFactory) hands out [`PreparedThread`]s:
//! fully described threads (name, daemon flag, priority, group) that have
//! not been started yet. [`PreparedThread::start`] spawns the OS thread and
//! returns a [`WorkerThread`] handle.
//!
//! # Lifecycle
//!
//! ```text
//! ThreadFactory::new_thread(task)
//!       │
//!       ▼
//! PreparedThread  ──→  start()  ──→  WorkerThread
//!                                        │
//!                                        ├──→ join()  (explicit wait)
//!                                        │
//!                                        └──→ Drop
//!                                             ├── daemon:     detach
//!                                             └── non-daemon: wait for exit
//! ```
//!
//! # Priority
//!
//! The standard library has no portable way to change OS scheduling
//! priority, so [`ThreadPriority`] is a descriptor carried by the thread
//! and visible to it through [`ThreadPriority::current()`]. It never
//! affects scheduling.

use std::cell::Cell;
use std::fmt;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crate::error::{PoolkitError, Result};
use crate::factory::Task;
use crate::factory::group::ThreadGroup;

thread_local! {
    static CURRENT_PRIORITY: Cell<ThreadPriority> = const { Cell::new(ThreadPriority::NORM) };
}

/// Priority level of a thread, from [`MIN`](Self::MIN) (1) to [`MAX`](Self::MAX) (10).
///
/// # Example
///
/// ```rust
/// use poolkit::ThreadPriority;
///
/// assert_eq!(ThreadPriority::default(), ThreadPriority::NORM);
/// assert_eq!(ThreadPriority::new(7).map(|p| p.level()), Some(7));
/// assert!(ThreadPriority::new(11).is_none());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ThreadPriority(u8);

impl ThreadPriority {
    /// Lowest priority.
    pub const MIN: ThreadPriority = ThreadPriority(1);
    /// Standard priority.
    pub const NORM: ThreadPriority = ThreadPriority(5);
    /// Highest priority.
    pub const MAX: ThreadPriority = ThreadPriority(10);

    /// Priority for `level`, or `None` when outside `1..=10`.
    pub fn new(level: u8) -> Option<Self> {
        (Self::MIN.0..=Self::MAX.0)
            .contains(&level)
            .then_some(ThreadPriority(level))
    }

    /// Numeric level.
    pub fn level(self) -> u8 {
        self.0
    }

    /// Priority of the calling thread.
    ///
    /// Threads not started through [`PreparedThread::start`] report
    /// [`NORM`](Self::NORM).
    pub fn current() -> Self {
        CURRENT_PRIORITY.with(Cell::get)
    }
}

impl Default for ThreadPriority {
    fn default() -> Self {
        Self::NORM
    }
}

/// A thread that has been configured but not started.
///
/// A freshly prepared thread inherits the calling thread's priority
/// (capped at its group's maximum) and is non-daemon.
pub struct PreparedThread {
    name: String,
    daemon: bool,
    priority: ThreadPriority,
    group: Arc<ThreadGroup>,
    task: Task,
}

impl PreparedThread {
    /// Prepare `task` to run on a thread called `name` inside `group`.
    pub fn new(group: Arc<ThreadGroup>, name: impl Into<String>, task: Task) -> Self {
        let priority = ThreadPriority::current().min(group.max_priority());
        Self {
            name: name.into(),
            daemon: false,
            priority,
            group,
            task,
        }
    }

    /// Thread name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the thread is a daemon thread.
    pub fn is_daemon(&self) -> bool {
        self.daemon
    }

    /// Mark the thread as daemon (or not).
    pub fn set_daemon(&mut self, daemon: bool) {
        self.daemon = daemon;
    }

    /// Thread priority.
    pub fn priority(&self) -> ThreadPriority {
        self.priority
    }

    /// Change the priority. Values above the group's maximum are capped.
    pub fn set_priority(&mut self, priority: ThreadPriority) {
        self.priority = priority.min(self.group.max_priority());
    }

    /// Group the thread will run in.
    pub fn group(&self) -> &Arc<ThreadGroup> {
        &self.group
    }

    /// Spawn the OS thread and run the task on it.
    ///
    /// The group's active count includes the thread from the moment this
    /// returns until the task finishes (or panics).
    ///
    /// # Errors
    ///
    /// Returns [`PoolkitError::ThreadSpawn`] if the OS refuses to create the thread.
    pub fn start(self) -> Result<WorkerThread> {
        let PreparedThread {
            name,
            daemon,
            priority,
            group,
            task,
        } = self;

        let membership = group.admit();
        let handle = thread::Builder::new()
            .name(name.clone())
            .spawn(move || {
                membership.bind_current_thread();
                CURRENT_PRIORITY.with(|current| current.set(priority));
                task();
            })
            .map_err(PoolkitError::ThreadSpawn)?;

        log::trace!(
            "Started thread '{}' (daemon={}, priority={}, group={})",
            name,
            daemon,
            priority.level(),
            group.name()
        );

        Ok(WorkerThread {
            name,
            daemon,
            priority,
            group,
            handle: Some(handle),
        })
    }
}

impl fmt::Debug for PreparedThread {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PreparedThread")
            .field("name", &self.name)
            .field("daemon", &self.daemon)
            .field("priority", &self.priority)
            .field("group", &self.group.name())
            .finish_non_exhaustive()
    }
}

/// Handle to a started thread.
///
/// Dropping the handle of a non-daemon thread blocks until the thread
/// exits; dropping a daemon thread's handle detaches it.
#[derive(Debug)]
pub struct WorkerThread {
    name: String,
    daemon: bool,
    priority: ThreadPriority,
    group: Arc<ThreadGroup>,
    handle: Option<JoinHandle<()>>,
}

impl WorkerThread {
    /// Thread name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the thread is a daemon thread.
    pub fn is_daemon(&self) -> bool {
        self.daemon
    }

    /// Thread priority.
    pub fn priority(&self) -> ThreadPriority {
        self.priority
    }

    /// Group the thread runs in.
    pub fn group(&self) -> &Arc<ThreadGroup> {
        &self.group
    }

    /// Whether the thread has finished running its task.
    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().is_none_or(JoinHandle::is_finished)
    }

    /// Whether this handle refers to the calling thread.
    pub fn is_current_thread(&self) -> bool {
        self.handle
            .as_ref()
            .is_some_and(|handle| handle.thread().id() == thread::current().id())
    }

    /// Wait for the thread to finish.
    ///
    /// # Errors
    ///
    /// Returns [`PoolkitError::WorkerPanicked`] if the task panicked.
    pub fn join(mut self) -> Result<()> {
        match self.handle.take() {
            Some(handle) => handle
                .join()
                .map_err(|_| PoolkitError::WorkerPanicked(self.name.clone())),
            None => Ok(()),
        }
    }
}

impl Drop for WorkerThread {
    fn drop(&mut self) {
        let Some(handle) = self.handle.take() else {
            return;
        };

        if self.daemon {
            log::trace!("Detaching daemon thread '{}'", self.name);
            return;
        }

        // A thread cannot wait for itself.
        if handle.thread().id() == thread::current().id() {
            log::warn!("Thread '{}' dropped its own handle; detaching", self.name);
            return;
        }

        log::debug!("Waiting for non-daemon thread '{}' to exit", self.name);
        if handle.join().is_err() {
            log::error!("Thread '{}' panicked", self.name);
        }
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::mpsc;

    /// Verifies priority bounds and ordering.
    #[test]
    fn test_priority_levels() {
        assert_eq!(ThreadPriority::MIN.level(), 1);
        assert_eq!(ThreadPriority::NORM.level(), 5);
        assert_eq!(ThreadPriority::MAX.level(), 10);
        assert!(ThreadPriority::new(0).is_none());
        assert!(ThreadPriority::MIN < ThreadPriority::MAX);
    }

    /// Verifies that threads not started by the crate report normal priority.
    #[test]
    fn test_current_priority_default() {
        assert_eq!(ThreadPriority::current(), ThreadPriority::NORM);
    }

    /// Verifies that a prepared thread does not run until started.
    #[test]
    fn test_prepared_thread_not_started() {
        let ran = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&ran);
        let prepared = PreparedThread::new(
            ThreadGroup::root(),
            "idle",
            Box::new(move || flag.store(true, Ordering::SeqCst)),
        );

        assert_eq!(prepared.name(), "idle");
        assert!(!prepared.is_daemon());
        drop(prepared);
        assert!(!ran.load(Ordering::SeqCst), "Task must not run before start()");
    }

    /// Verifies that the started thread carries its name and priority.
    #[test]
    fn test_start_applies_name_and_priority() {
        let (tx, rx) = mpsc::channel();
        let mut prepared = PreparedThread::new(
            ThreadGroup::root(),
            "sample-thread",
            Box::new(move || {
                let name = thread::current().name().map(str::to_string);
                tx.send((name, ThreadPriority::current())).unwrap();
            }),
        );
        prepared.set_priority(ThreadPriority::MAX);

        let worker = prepared.start().unwrap();
        assert_eq!(worker.name(), "sample-thread");
        worker.join().unwrap();

        let (name, priority) = rx.recv().unwrap();
        assert_eq!(name.as_deref(), Some("sample-thread"));
        assert_eq!(priority, ThreadPriority::MAX);
    }

    /// Verifies that a panicking task surfaces as WorkerPanicked on join.
    #[test]
    fn test_join_reports_panic() {
        let prepared = PreparedThread::new(
            ThreadGroup::root(),
            "doomed",
            Box::new(|| panic!("boom")),
        );

        let result = prepared.start().unwrap().join();
        match result {
            Err(PoolkitError::WorkerPanicked(name)) => assert_eq!(name, "doomed"),
            other => panic!("Expected WorkerPanicked, got {:?}", other),
        }
    }

    /// Verifies that dropping a non-daemon handle waits for the thread.
    #[test]
    fn test_drop_waits_for_non_daemon() {
        let done = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&done);
        let prepared = PreparedThread::new(
            ThreadGroup::root(),
            "slow",
            Box::new(move || {
                thread::sleep(std::time::Duration::from_millis(50));
                flag.store(true, Ordering::SeqCst);
            }),
        );

        drop(prepared.start().unwrap());
        assert!(done.load(Ordering::SeqCst), "Drop should have joined the thread");
    }
}
