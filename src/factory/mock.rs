//! Recording thread factory for testing.
//!
//! Available with the `test-utils` feature.
//!
//! # Example
//!
//! ```rust,ignore
//! use poolkit::factory::mock::RecordingThreadFactory;
//! use poolkit::{ThreadFactory, WorkerPool};
//!
//! let factory = RecordingThreadFactory::new(Some("test"), false);
//! let pool = WorkerPool::builder()
//!     .factory(Box::new(factory.clone()))
//!     .build()?;
//!
//! assert_eq!(factory.created(), 4);
//! ```

use std::sync::{Arc, Mutex};

use crate::factory::{NamedThreadFactory, Task, ThreadFactory};
use crate::thread::PreparedThread;

/// A [`NamedThreadFactory`] that remembers every thread name it hands out.
///
/// Clones share the same record, so a test can keep one clone and pass
/// the other to a pool.
#[derive(Debug, Clone)]
pub struct RecordingThreadFactory {
    inner: Arc<NamedThreadFactory>,
    names: Arc<Mutex<Vec<String>>>,
}

impl RecordingThreadFactory {
    /// Create a recording factory; arguments as in [`NamedThreadFactory::new`].
    pub fn new(label: Option<&str>, daemon: bool) -> Self {
        Self {
            inner: Arc::new(NamedThreadFactory::new(label, daemon)),
            names: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// The wrapped factory.
    pub fn inner(&self) -> &NamedThreadFactory {
        &self.inner
    }

    /// Names handed out so far, in order.
    pub fn names(&self) -> Vec<String> {
        self.names.lock().map(|names| names.clone()).unwrap_or_default()
    }

    /// Number of threads prepared so far.
    pub fn created(&self) -> usize {
        self.names.lock().map(|names| names.len()).unwrap_or(0)
    }
}

impl ThreadFactory for RecordingThreadFactory {
    fn new_thread(&self, task: Task) -> PreparedThread {
        let thread = self.inner.new_thread(task);
        if let Ok(mut names) = self.names.lock() {
            names.push(thread.name().to_string());
        }
        thread
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
