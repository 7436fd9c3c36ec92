//! Thread factory implementations.
//!
//! This module provides the [`ThreadFactory`] trait and implementations
//! for preparing the threads a worker pool runs on.
//!
//! # Overview
//!
//! The factory pattern abstracts thread creation, allowing:
//! - Consistent, human-readable thread names
//! - Daemon/non-daemon policy in one place
//! - Recording factories for testing
//!
//! # Available Factories
//!
//! | Factory | Description |
//! |---------|-------------|
//! | [`NamedThreadFactory`] | `<label>-pool-<K>-thread-<N>` names |
//! | [`mock::RecordingThreadFactory`] | For testing (feature-gated) |
//!
//! # Example
//!
//! ```rust
//! use poolkit::{NamedThreadFactory, ThreadFactory};
//!
//! let factory = NamedThreadFactory::new(Some("indexer"), true);
//! let thread = factory.new_thread(Box::new(|| println!("working")));
//!
//! assert!(thread.name().starts_with("indexer-pool-"));
//! assert!(thread.name().ends_with("-thread-1"));
//! thread.start()?.join()?;
//! # Ok::<(), poolkit::PoolkitError>(())
//! ```
//!
//! # Custom Factory
//!
//! ```rust
//! use poolkit::{PreparedThread, Task, ThreadFactory, ThreadGroup};
//!
//! struct SingleNameFactory;
//!
//! impl ThreadFactory for SingleNameFactory {
//!     fn new_thread(&self, task: Task) -> PreparedThread {
//!         PreparedThread::new(ThreadGroup::current(), "worker", task)
//!     }
//! }
//! ```

pub mod group;
mod named;

#[cfg(any(test, feature = "test-utils"))]
pub mod mock;

pub use named::{FALLBACK_LABEL, NamedThreadFactory};

use crate::thread::PreparedThread;

/// A unit of work run on a thread created by a [`ThreadFactory`].
pub type Task = Box<dyn FnOnce() + Send + 'static>;

/// Pluggable thread-creation strategy.
///
/// # Thread Safety
///
/// This trait requires `Send + Sync` because factories are shared
/// with, and may be called concurrently by, the pools that use them.
///
/// # Implementors
///
/// - [`NamedThreadFactory`] - Uniquely named threads
/// - [`mock::RecordingThreadFactory`] - For testing (when `test-utils` feature enabled)
pub trait ThreadFactory: Send + Sync {
    /// Prepare a new, not yet started, thread that will run `task`.
    fn new_thread(&self, task: Task) -> PreparedThread;
}
