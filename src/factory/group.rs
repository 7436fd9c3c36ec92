//! Thread groups.
//!
//! A [`ThreadGroup`] is a named node in a tree rooted at the process-wide
//! `"main"` group. Threads started through
//! [`PreparedThread::start`](crate::PreparedThread::start) run inside their
//! group; [`ThreadGroup::current()`] reports it, so factories constructed on
//! such a thread inherit the group automatically. Grouping is for
//! introspection only and never affects scheduling.

use std::cell::RefCell;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, OnceLock};

use crate::thread::ThreadPriority;

/// Name of the root group.
pub const ROOT_GROUP_NAME: &str = "main";

static ROOT: OnceLock<Arc<ThreadGroup>> = OnceLock::new();

thread_local! {
    static CURRENT_GROUP: RefCell<Option<Arc<ThreadGroup>>> = const { RefCell::new(None) };
}

/// A named group of threads.
#[derive(Debug)]
pub struct ThreadGroup {
    name: String,
    parent: Option<Arc<ThreadGroup>>,
    max_priority: ThreadPriority,
    active: AtomicUsize,
}

impl ThreadGroup {
    /// The process-wide root group.
    pub fn root() -> Arc<ThreadGroup> {
        Arc::clone(ROOT.get_or_init(|| {
            Arc::new(ThreadGroup {
                name: ROOT_GROUP_NAME.to_string(),
                parent: None,
                max_priority: ThreadPriority::MAX,
                active: AtomicUsize::new(0),
            })
        }))
    }

    /// Group of the calling thread, falling back to [`root()`](Self::root).
    pub fn current() -> Arc<ThreadGroup> {
        CURRENT_GROUP
            .with(|current| current.borrow().clone())
            .unwrap_or_else(Self::root)
    }

    /// Create a child of the calling thread's group.
    pub fn new(name: impl Into<String>) -> Arc<ThreadGroup> {
        Self::with_parent(name, Self::current())
    }

    /// Create a child of `parent`. The child inherits the parent's maximum priority.
    pub fn with_parent(name: impl Into<String>, parent: Arc<ThreadGroup>) -> Arc<ThreadGroup> {
        let max_priority = parent.max_priority;
        Arc::new(ThreadGroup {
            name: name.into(),
            parent: Some(parent),
            max_priority,
            active: AtomicUsize::new(0),
        })
    }

    /// Create a child of the calling thread's group whose threads are capped
    /// at `max_priority` (never above the parent's cap).
    pub fn with_max_priority(name: impl Into<String>, max_priority: ThreadPriority) -> Arc<ThreadGroup> {
        let parent = Self::current();
        let max_priority = max_priority.min(parent.max_priority);
        Arc::new(ThreadGroup {
            name: name.into(),
            parent: Some(parent),
            max_priority,
            active: AtomicUsize::new(0),
        })
    }

    /// Group name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Parent group, `None` for the root.
    pub fn parent(&self) -> Option<&Arc<ThreadGroup>> {
        self.parent.as_ref()
    }

    /// Highest priority a thread in this group may have.
    pub fn max_priority(&self) -> ThreadPriority {
        self.max_priority
    }

    /// Number of started threads currently running in this group.
    ///
    /// Threads of child groups are not counted.
    pub fn active_count(&self) -> usize {
        self.active.load(Ordering::Acquire)
    }

    /// Whether `self` is `other` or one of its ancestors.
    pub fn contains(&self, other: &ThreadGroup) -> bool {
        let mut cursor = Some(other);
        while let Some(group) = cursor {
            if std::ptr::eq(group, self) {
                return true;
            }
            cursor = group.parent.as_deref();
        }
        false
    }

    pub(crate) fn admit(self: &Arc<Self>) -> Membership {
        self.active.fetch_add(1, Ordering::AcqRel);
        Membership {
            group: Arc::clone(self),
        }
    }
}

/// Counts a thread as active in its group until dropped.
pub(crate) struct Membership {
    group: Arc<ThreadGroup>,
}

impl Membership {
    /// Make the group visible through [`ThreadGroup::current()`] on this thread.
    pub(crate) fn bind_current_thread(&self) {
        CURRENT_GROUP.with(|current| {
            *current.borrow_mut() = Some(Arc::clone(&self.group));
        });
    }
}

impl Drop for Membership {
    fn drop(&mut self) {
        self.group.active.fetch_sub(1, Ordering::AcqRel);
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::thread::PreparedThread;
    use std::sync::mpsc;

    /// Verifies that threads outside the crate belong to the root group.
    #[test]
    fn test_current_defaults_to_root() {
        let current = ThreadGroup::current();
        assert_eq!(current.name(), ROOT_GROUP_NAME);
        assert!(current.parent().is_none());
        assert!(Arc::ptr_eq(&current, &ThreadGroup::root()));
    }

    /// Verifies parent links and containment.
    #[test]
    fn test_child_group() {
        let child = ThreadGroup::new("crawlers");
        let grandchild = ThreadGroup::with_parent("fetchers", Arc::clone(&child));

        assert_eq!(child.parent().map(|p| p.name()), Some(ROOT_GROUP_NAME));
        assert!(ThreadGroup::root().contains(&grandchild));
        assert!(child.contains(&grandchild));
        assert!(!grandchild.contains(&child));
    }

    /// Verifies that the priority cap never exceeds the parent's.
    #[test]
    fn test_max_priority_capped_by_parent() {
        let low = ThreadGroup::with_max_priority("low", ThreadPriority::MIN);
        let child = ThreadGroup::with_parent("child", Arc::clone(&low));
        assert_eq!(child.max_priority(), ThreadPriority::MIN);
    }

    /// Verifies that started threads see their group and are counted while running.
    #[test]
    fn test_started_thread_runs_in_group() {
        let group = ThreadGroup::new("sample");
        let (started_tx, started_rx) = mpsc::channel();
        let (release_tx, release_rx) = mpsc::channel::<()>();

        let worker = PreparedThread::new(
            Arc::clone(&group),
            "sample-1",
            Box::new(move || {
                started_tx.send(ThreadGroup::current().name().to_string()).unwrap();
                let _ = release_rx.recv();
            }),
        )
        .start()
        .unwrap();

        assert_eq!(started_rx.recv().unwrap(), "sample");
        assert_eq!(group.active_count(), 1);

        release_tx.send(()).unwrap();
        worker.join().unwrap();
        assert_eq!(group.active_count(), 0);
    }
}
