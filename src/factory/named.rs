//! Named thread factory.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::factory::{Task, ThreadFactory};
use crate::factory::group::ThreadGroup;
use crate::thread::{PreparedThread, ThreadPriority};

/// Label used when a factory is constructed without one.
pub const FALLBACK_LABEL: &str = "NamedThreadFactory";

/// Process-wide pool index, incremented once per factory construction.
static POOL_NUMBER: AtomicUsize = AtomicUsize::new(1);

/// Thread factory producing threads named `<label>-pool-<K>-thread-<N>`.
///
/// `K` is drawn from a process-wide counter when the factory is built, so
/// two factories never share a prefix; `N` counts threads prepared by this
/// factory starting at 1. Every thread gets the factory's daemon flag and
/// [`ThreadPriority::NORM`], whatever the priority of the thread calling
/// [`new_thread`](ThreadFactory::new_thread).
///
/// # Example
///
/// ```rust
/// use poolkit::{NamedThreadFactory, ThreadFactory, ThreadPriority};
///
/// let factory = NamedThreadFactory::new(None, false);
/// let first = factory.new_thread(Box::new(|| {}));
/// let second = factory.new_thread(Box::new(|| {}));
///
/// assert_eq!(first.name(), format!("{}1", factory.name_prefix()));
/// assert_eq!(second.name(), format!("{}2", factory.name_prefix()));
/// assert_eq!(first.priority(), ThreadPriority::NORM);
/// ```
#[derive(Debug)]
pub struct NamedThreadFactory {
    group: Arc<ThreadGroup>,
    pool_number: usize,
    name_prefix: String,
    thread_number: AtomicUsize,
    daemon: bool,
}

impl NamedThreadFactory {
    /// Create a factory whose threads join the calling thread's group.
    ///
    /// # Parameters
    ///
    /// * `label` - Leading part of thread names; [`FALLBACK_LABEL`] when `None`.
    /// * `daemon` - Daemon flag applied to every thread.
    pub fn new(label: Option<&str>, daemon: bool) -> Self {
        Self::with_group(label, daemon, ThreadGroup::current())
    }

    /// Create a factory whose threads join `group` instead of the calling
    /// thread's group.
    pub fn with_group(label: Option<&str>, daemon: bool, group: Arc<ThreadGroup>) -> Self {
        let pool_number = POOL_NUMBER.fetch_add(1, Ordering::Relaxed);
        let name_prefix = format!(
            "{}-pool-{}-thread-",
            label.unwrap_or(FALLBACK_LABEL),
            pool_number
        );

        log::debug!(
            "Created thread factory '{}' (daemon={}, group={})",
            name_prefix,
            daemon,
            group.name()
        );

        Self {
            group,
            pool_number,
            name_prefix,
            thread_number: AtomicUsize::new(1),
            daemon,
        }
    }

    /// Prefix shared by every thread name, ending in `-thread-`.
    pub fn name_prefix(&self) -> &str {
        &self.name_prefix
    }

    /// Process-wide index of this factory.
    pub fn pool_number(&self) -> usize {
        self.pool_number
    }

    /// Daemon flag applied to every thread.
    pub fn is_daemon(&self) -> bool {
        self.daemon
    }

    /// Group threads are created in.
    pub fn group(&self) -> &Arc<ThreadGroup> {
        &self.group
    }

    /// Number of threads prepared so far.
    pub fn threads_created(&self) -> usize {
        self.thread_number.load(Ordering::Relaxed) - 1
    }
}

impl ThreadFactory for NamedThreadFactory {
    fn new_thread(&self, task: Task) -> PreparedThread {
        let number = self.thread_number.fetch_add(1, Ordering::Relaxed);
        let mut thread = PreparedThread::new(
            Arc::clone(&self.group),
            format!("{}{}", self.name_prefix, number),
            task,
        );
        thread.set_daemon(self.daemon);
        if thread.priority() != ThreadPriority::NORM {
            thread.set_priority(ThreadPriority::NORM);
        }

        log::trace!("Prepared thread '{}'", thread.name());
        thread
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::mpsc;

    fn noop() -> Task {
        Box::new(|| {})
    }

    /// Verifies the `<label>-pool-<K>-thread-<N>` naming scheme.
    #[test]
    fn test_thread_names_follow_pattern() {
        let factory = NamedThreadFactory::new(Some("fetcher"), false);
        let k = factory.pool_number();

        for n in 1..=3 {
            let thread = factory.new_thread(noop());
            assert_eq!(thread.name(), format!("fetcher-pool-{}-thread-{}", k, n));
        }
        assert_eq!(factory.threads_created(), 3);
    }

    /// Verifies that a missing label falls back to the default one.
    #[test]
    fn test_fallback_label() {
        let factory = NamedThreadFactory::new(None, false);
        assert!(
            factory
                .name_prefix()
                .starts_with(&format!("{}-pool-", FALLBACK_LABEL))
        );
    }

    /// Verifies that pool numbers strictly increase across factories.
    #[test]
    fn test_pool_numbers_increase() {
        let a = NamedThreadFactory::new(Some("same"), false);
        let b = NamedThreadFactory::new(Some("same"), false);

        assert!(b.pool_number() > a.pool_number());
        assert_ne!(a.name_prefix(), b.name_prefix());
    }

    /// Verifies that the daemon flag is applied to every thread.
    #[test]
    fn test_daemon_flag_applied() {
        let daemon = NamedThreadFactory::new(Some("d"), true);
        let regular = NamedThreadFactory::new(Some("r"), false);

        assert!(daemon.new_thread(noop()).is_daemon());
        assert!(!regular.new_thread(noop()).is_daemon());
    }

    /// Verifies that priority is reset to normal even when the caller runs at MAX.
    #[test]
    fn test_priority_reset_from_high_priority_caller() {
        let (tx, rx) = mpsc::channel();
        let mut caller = PreparedThread::new(
            ThreadGroup::root(),
            "high-priority-caller",
            Box::new(move || {
                let factory = NamedThreadFactory::new(Some("inner"), false);
                let prepared = factory.new_thread(Box::new(|| {}));
                tx.send((ThreadPriority::current(), prepared.priority())).unwrap();
            }),
        );
        caller.set_priority(ThreadPriority::MAX);
        caller.start().unwrap().join().unwrap();

        let (caller_priority, prepared_priority) = rx.recv().unwrap();
        assert_eq!(caller_priority, ThreadPriority::MAX);
        assert_eq!(prepared_priority, ThreadPriority::NORM);
    }

    /// Verifies that factories inherit the creating thread's group.
    #[test]
    fn test_group_inherited_from_creating_thread() {
        let group = ThreadGroup::new("outer");
        let (tx, rx) = mpsc::channel();
        PreparedThread::new(
            Arc::clone(&group),
            "outer-1",
            Box::new(move || {
                let factory = NamedThreadFactory::new(None, false);
                tx.send(factory.group().name().to_string()).unwrap();
            }),
        )
        .start()
        .unwrap()
        .join()
        .unwrap();

        assert_eq!(rx.recv().unwrap(), "outer");
    }

    /// Verifies that an explicit group overrides the inherited one.
    #[test]
    fn test_explicit_group() {
        let group = ThreadGroup::new("explicit");
        let factory = NamedThreadFactory::with_group(Some("x"), false, Arc::clone(&group));
        let thread = factory.new_thread(noop());
        assert!(Arc::ptr_eq(thread.group(), &group));
    }

    /// Verifies that names stay unique under concurrent new_thread calls.
    #[test]
    fn test_concurrent_names_unique() {
        let factory = Arc::new(NamedThreadFactory::new(Some("race"), true));
        let mut callers = Vec::new();

        for _ in 0..8 {
            let factory = Arc::clone(&factory);
            callers.push(std::thread::spawn(move || {
                (0..50)
                    .map(|_| factory.new_thread(Box::new(|| {})).name().to_string())
                    .collect::<Vec<_>>()
            }));
        }

        let mut names = HashSet::new();
        for caller in callers {
            for name in caller.join().unwrap() {
                assert!(names.insert(name), "Duplicate thread name");
            }
        }
        assert_eq!(names.len(), 400);
        assert_eq!(factory.threads_created(), 400);
    }
}
