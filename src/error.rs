//! Error types for thread creation, text extraction and the worker pool.
//!
//! This module provides [`PoolkitError`], a unified error type for all
//! fallible operations in the crate, and a convenient [`Result`] type alias.
//!
//! # Example
//!
//! ```rust
//! use poolkit::{PoolkitError, Result};
//!
//! fn strip(html: &str) -> Result<String> {
//!     poolkit::extract_text(html)
//! }
//!
//! match strip("<p>Hello</p>") {
//!     Ok(text) => println!("Extracted {} chars", text.len()),
//!     Err(PoolkitError::Markup(msg)) => eprintln!("Parser gave up: {}", msg),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use std::io;

/// Errors that can occur while creating threads, extracting text or
/// running jobs on a [`WorkerPool`](crate::WorkerPool).
///
/// # Example
///
/// ```rust
/// use poolkit::PoolkitError;
///
/// fn describe(error: &PoolkitError) -> &'static str {
///     match error {
///         PoolkitError::Io(_) => "input stream failed",
///         PoolkitError::Markup(_) => "parser failure",
///         PoolkitError::UnsupportedFeature(_) => "parser feature rejected",
///         PoolkitError::ThreadSpawn(_) => "thread could not be started",
///         PoolkitError::WorkerPanicked(_) => "worker panicked",
///         PoolkitError::WorkerLost => "worker dropped the job",
///         PoolkitError::ShuttingDown => "pool is shutting down",
///         PoolkitError::Configuration(_) => "bad configuration",
///     }
/// }
/// ```
#[derive(Debug, thiserror::Error)]
pub enum PoolkitError {
    /// The character stream feeding the parser could not be read.
    ///
    /// Never produced for in-memory strings; only
    /// [`TextExtractor::extract_from_reader`](crate::TextExtractor::extract_from_reader)
    /// can surface it.
    #[error("Failed to read HTML input: {0}")]
    Io(#[from] io::Error),

    /// The parser hit an error it could not recover from, even in lenient mode.
    ///
    /// # Common Causes
    ///
    /// - The document exceeded the configured
    ///   [`max_memory_bytes`](crate::ExtractorConfig::max_memory_bytes)
    #[error("Failed to parse markup: {0}")]
    Markup(String),

    /// A parser feature toggle was rejected.
    ///
    /// [`TextExtractor`](crate::TextExtractor) swallows this error for the
    /// toggles it applies during construction; it only reaches callers who
    /// invoke [`set_feature`](crate::TextExtractor::set_feature) directly.
    #[error("Unsupported parser feature: {0}")]
    UnsupportedFeature(String),

    /// The operating system refused to start a thread.
    #[error("Failed to spawn thread: {0}")]
    ThreadSpawn(#[source] io::Error),

    /// A joined thread terminated by panicking. Carries the thread name.
    #[error("Thread '{0}' panicked")]
    WorkerPanicked(String),

    /// A worker dropped a job without replying.
    ///
    /// Happens when the job panicked or the worker exited while the job
    /// was still queued.
    #[error("Worker dropped the job before replying")]
    WorkerLost,

    /// Operation attempted during pool shutdown.
    ///
    /// Handle it by stopping any pending work rather than retrying.
    #[error("Pool is shutting down")]
    ShuttingDown,

    /// Invalid configuration provided.
    ///
    /// # Common Causes
    ///
    /// - `worker_count` is set to 0
    /// - `thread_name_prefix` is blank
    /// - `read_chunk_size` is set to 0
    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Convenience conversion from [`String`] to [`PoolkitError::Configuration`].
///
/// Allows using the `?` operator on the `String` errors returned by
/// [`WorkerPoolConfigBuilder::build`](crate::WorkerPoolConfigBuilder::build).
impl From<String> for PoolkitError {
    fn from(msg: String) -> Self {
        PoolkitError::Configuration(msg)
    }
}

/// Convenience conversion from `&str` to [`PoolkitError::Configuration`].
impl From<&str> for PoolkitError {
    fn from(msg: &str) -> Self {
        PoolkitError::Configuration(msg.to_string())
    }
}

/// Result type alias using [`PoolkitError`].
pub type Result<T> = std::result::Result<T, PoolkitError>;

// ============================================================================
// Unit Tests
// ============================================================================
