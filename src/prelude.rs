//! Convenient imports for common usage patterns.
//!
//! ```rust
//! use poolkit::prelude::*;
//!
//! let pool: SharedWorkerPool = WorkerPool::builder().build()?.into_shared();
//! let worker_pool = Arc::clone(&pool);
//! std::thread::spawn(move || worker_pool.extract_blocking("<p>hi</p>"))
//!     .join()
//!     .unwrap()?;
//! # Ok::<(), PoolkitError>(())
//! ```

// Core types
pub use crate::config::{ExtractorConfig, WorkerPoolConfig, WorkerPoolConfigBuilder};
pub use crate::error::{PoolkitError, Result};
pub use crate::extract::{ParserFeature, TextExtractor, extract_text};
pub use crate::factory::group::ThreadGroup;
pub use crate::factory::{NamedThreadFactory, Task, ThreadFactory};
pub use crate::pool::{ExtractionTicket, WorkerPool, WorkerPoolBuilder};
pub use crate::stats::PoolStats;
pub use crate::thread::{PreparedThread, ThreadPriority, WorkerThread};
pub use crate::SharedWorkerPool;

// Feature-gated exports
#[cfg(feature = "env-config")]
pub use crate::config::env::from_env;

#[cfg(feature = "env-config")]
pub use crate::pool::init_worker_pool;

// Re-export Arc for convenience (commonly needed with SharedWorkerPool)
pub use std::sync::Arc;
