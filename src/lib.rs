//! # poolkit
//!
//! Named worker threads and lenient HTML text extraction.
//!
//! This crate provides two independent building blocks and a small pool
//! that combines them:
//!
//! - **[`NamedThreadFactory`]**: prepares threads named
//!   `<label>-pool-<K>-thread-<N>`, with a fixed daemon flag, normal
//!   priority and the creating context's [`ThreadGroup`].
//! - **[`TextExtractor`]**: strips markup from HTML with a streaming parser
//!   that tolerates malformed documents, returning the text nodes in
//!   document order.
//! - **[`WorkerPool`]**: a fixed-size pool whose threads come from a
//!   [`ThreadFactory`] and each own a [`TextExtractor`].
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │                WorkerPool                   │
//! │   job queue ──→ worker threads              │
//! │                 (each owns a TextExtractor) │
//! └─────────────────┬───────────────────────────┘
//!                   │ new_thread(task)
//!                   ▼
//! ┌─────────────────────────────────────────────┐
//! │      ThreadFactory (NamedThreadFactory)     │
//! │   name, daemon flag, priority, ThreadGroup  │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use poolkit::prelude::*;
//!
//! // One-off extraction on the current thread
//! let mut extractor = TextExtractor::with_defaults();
//! assert_eq!(extractor.extract_text("<p>Hello <b>world</b></p>")?, "Hello world");
//!
//! // Extraction on a pool of named workers
//! let pool = WorkerPool::builder()
//!     .config(
//!         WorkerPoolConfigBuilder::new()
//!             .worker_count(2)
//!             .thread_name_prefix("scraper")
//!             .build()?,
//!     )
//!     .build()?;
//!
//! assert_eq!(pool.extract_blocking("<li>item</li>")?, "item");
//! pool.shutdown();
//! # Ok::<(), PoolkitError>(())
//! ```
//!
//! ## Environment Configuration
//!
//! When the `env-config` feature is enabled, a shared pool can be built
//! from environment variables (loaded from an `app.env` file or the
//! system environment):
//!
//! ```rust,no_run
//! use poolkit::init_worker_pool;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let pool = init_worker_pool()?;
//!     // pool is Arc<WorkerPool>, ready to share between threads
//!     Ok(())
//! }
//! ```
//!
//! | Variable | Type | Default | Description |
//! |----------|------|---------|-------------|
//! | `POOL_WORKER_COUNT` | usize | 4 | Worker threads |
//! | `POOL_THREAD_NAME_PREFIX` | String | unset | Thread name label |
//! | `POOL_DAEMON_THREADS` | bool | false | Daemon worker threads |
//! | `EXTRACT_DECODE_ENTITIES` | bool | true | Decode character references |
//! | `EXTRACT_INCLUDE_RAW_TEXT` | bool | true | Keep script/style bodies |
//! | `EXTRACT_MAX_MEMORY_BYTES` | usize | unlimited | Parser memory limit |
//! | `EXTRACT_READ_CHUNK_SIZE` | usize | 8192 | Reader buffer size |
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `env-config` | Enable environment-based configuration |
//! | `test-utils` | Enable the recording thread factory for testing |
//!
//! ## Error Handling
//!
//! All fallible operations return [`Result<T, PoolkitError>`](Result):
//!
//! ```rust
//! use poolkit::{PoolkitError, TextExtractor};
//!
//! let mut extractor = TextExtractor::with_defaults();
//! match extractor.extract_from_reader(std::io::empty()) {
//!     Ok(text) => assert!(text.is_empty()),
//!     Err(PoolkitError::Io(e)) => eprintln!("Input failed: {}", e),
//!     Err(e) => eprintln!("Extraction failed: {}", e),
//! }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

// ============================================================================
// Modules
// ============================================================================

pub mod config;
pub mod error;
pub mod extract;
pub mod factory;
pub mod pool;
pub mod prelude;
pub mod stats;
pub mod thread;

// ============================================================================
// Re-exports (Public API)
// ============================================================================

pub use config::{ExtractorConfig, WorkerPoolConfig, WorkerPoolConfigBuilder};
pub use error::{PoolkitError, Result};
pub use extract::{ParserFeature, TextCollector, TextExtractor, TextKind, extract_text};
pub use factory::group::ThreadGroup;
pub use factory::{NamedThreadFactory, Task, ThreadFactory};
pub use pool::{ExtractionTicket, WorkerPool, WorkerPoolBuilder};
pub use stats::PoolStats;
pub use thread::{PreparedThread, ThreadPriority, WorkerThread};

// Feature-gated re-exports
#[cfg(feature = "env-config")]
pub use config::env::from_env;

#[cfg(feature = "env-config")]
pub use pool::init_worker_pool;

// ============================================================================
// Convenience type aliases
// ============================================================================

/// Shared worker pool type.
///
/// All [`WorkerPool`] methods take `&self`, so an [`Arc`](std::sync::Arc)
/// is enough to share one between threads.
pub type SharedWorkerPool = std::sync::Arc<WorkerPool>;
