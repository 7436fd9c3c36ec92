//! Configuration for text extraction and the worker pool.
//!
//! This module provides [`ExtractorConfig`], [`WorkerPoolConfig`] and
//! [`WorkerPoolConfigBuilder`].
//!
//! # Example
//!
//! ```rust
//! use poolkit::WorkerPoolConfigBuilder;
//!
//! let config = WorkerPoolConfigBuilder::new()
//!     .worker_count(8)
//!     .thread_name_prefix("scraper")
//!     .daemon(true)
//!     .build()
//!     .expect("Invalid configuration");
//!
//! assert_eq!(config.worker_count, 8);
//! assert_eq!(config.thread_name_prefix.as_deref(), Some("scraper"));
//! ```
//!
//! # Environment Configuration
//!
//! When the `env-config` feature is enabled, you can load configuration
//! from environment variables and an optional `app.env` file:
//!
//! ```rust,ignore
//! use poolkit::config::env::from_env;
//!
//! let config = from_env()?;
//! ```
//!
//! See [`mod@env`] module for available environment variables.

/// Settings for a [`TextExtractor`](crate::TextExtractor).
///
/// # Fields Overview
///
/// | Field | Default | Description |
/// |-------|---------|-------------|
/// | `decode_entities` | true | Decode `&amp;` and friends in text nodes |
/// | `include_raw_text` | true | Keep `<script>`/`<style>` bodies |
/// | `max_memory_bytes` | unlimited | Parser buffering limit |
/// | `read_chunk_size` | 8192 | Bytes per read when streaming from a reader |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractorConfig {
    /// Decode character references in text nodes.
    ///
    /// Only references terminated by `;` are decoded. Legacy forms such as
    /// `&amp` without the semicolon are left as written.
    pub decode_entities: bool,

    /// Include the bodies of raw-text elements (`<script>`, `<style>`).
    ///
    /// Every run of character data is reported by default. Set to `false`
    /// to keep only text that a browser would render.
    pub include_raw_text: bool,

    /// Upper bound on the memory the parser may use for buffering.
    ///
    /// Exceeding it while streaming from a reader aborts the parse with
    /// [`PoolkitError::Markup`](crate::PoolkitError::Markup). In-memory
    /// input is handed over in one write and is not limited.
    pub max_memory_bytes: usize,

    /// Size of the read buffer used by
    /// [`extract_from_reader`](crate::TextExtractor::extract_from_reader).
    pub read_chunk_size: usize,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            decode_entities: true,
            include_raw_text: true,
            max_memory_bytes: usize::MAX,
            read_chunk_size: 8192,
        }
    }
}

/// Configuration for a [`WorkerPool`](crate::WorkerPool).
///
/// Use [`WorkerPoolConfigBuilder`] for validation and convenience.
///
/// # Fields Overview
///
/// | Field | Default | Description |
/// |-------|---------|-------------|
/// | `worker_count` | 4 | Number of worker threads |
/// | `thread_name_prefix` | `None` | Label used in worker thread names |
/// | `daemon` | false | Whether worker threads are daemon threads |
/// | `extractor` | defaults | Settings for each worker's extractor |
///
/// # Example
///
/// ```rust
/// use poolkit::WorkerPoolConfig;
///
/// let config = WorkerPoolConfig::default();
/// assert_eq!(config.worker_count, 4);
/// assert!(!config.daemon);
/// ```
#[derive(Debug, Clone)]
pub struct WorkerPoolConfig {
    /// Number of worker threads started by the pool.
    ///
    /// # Default
    ///
    /// 4 workers
    pub worker_count: usize,

    /// Label for worker thread names.
    ///
    /// Workers are named `<label>-pool-<K>-thread-<N>`. When `None`,
    /// the factory's fallback label is used.
    pub thread_name_prefix: Option<String>,

    /// Whether worker threads are daemon threads.
    ///
    /// Non-daemon workers are waited for when their handles are dropped.
    pub daemon: bool,

    /// Settings for the extractor owned by each worker.
    pub extractor: ExtractorConfig,
}

impl Default for WorkerPoolConfig {
    fn default() -> Self {
        Self {
            worker_count: 4,
            thread_name_prefix: None,
            daemon: false,
            extractor: ExtractorConfig::default(),
        }
    }
}

/// Builder for [`WorkerPoolConfig`] with validation.
///
/// # Validation
///
/// The [`build()`](Self::build) method validates:
/// - `worker_count` must be greater than 0
/// - `thread_name_prefix`, when set, must not be blank
/// - `extractor.read_chunk_size` must be greater than 0
pub struct WorkerPoolConfigBuilder {
    config: WorkerPoolConfig,
}

impl WorkerPoolConfigBuilder {
    /// Create a new builder with default values.
    pub fn new() -> Self {
        Self {
            config: WorkerPoolConfig::default(),
        }
    }

    /// Set the number of worker threads (must be > 0).
    ///
    /// # Example
    ///
    /// ```rust
    /// use poolkit::WorkerPoolConfigBuilder;
    ///
    /// let config = WorkerPoolConfigBuilder::new()
    ///     .worker_count(2)
    ///     .build()
    ///     .unwrap();
    ///
    /// assert_eq!(config.worker_count, 2);
    /// ```
    pub fn worker_count(mut self, count: usize) -> Self {
        self.config.worker_count = count;
        self
    }

    /// Set the label used in worker thread names.
    pub fn thread_name_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.config.thread_name_prefix = Some(prefix.into());
        self
    }

    /// Mark worker threads as daemon (or not).
    pub fn daemon(mut self, daemon: bool) -> Self {
        self.config.daemon = daemon;
        self
    }

    /// Replace the extractor settings wholesale.
    pub fn extractor(mut self, extractor: ExtractorConfig) -> Self {
        self.config.extractor = extractor;
        self
    }

    /// Decode character references in extracted text.
    pub fn decode_entities(mut self, decode: bool) -> Self {
        self.config.extractor.decode_entities = decode;
        self
    }

    /// Keep `<script>`/`<style>` bodies in extracted text.
    pub fn include_raw_text(mut self, include: bool) -> Self {
        self.config.extractor.include_raw_text = include;
        self
    }

    /// Limit the memory the parser may use per document.
    pub fn max_memory_bytes(mut self, bytes: usize) -> Self {
        self.config.extractor.max_memory_bytes = bytes;
        self
    }

    /// Set the read buffer size used when streaming from a reader.
    pub fn read_chunk_size(mut self, size: usize) -> Self {
        self.config.extractor.read_chunk_size = size;
        self
    }

    /// Build and validate the configuration.
    ///
    /// # Errors
    ///
    /// - Returns error if `worker_count` is 0
    /// - Returns error if `thread_name_prefix` is blank
    /// - Returns error if `read_chunk_size` is 0
    ///
    /// # Example
    ///
    /// ```rust
    /// use poolkit::WorkerPoolConfigBuilder;
    ///
    /// assert!(WorkerPoolConfigBuilder::new().worker_count(3).build().is_ok());
    /// assert!(WorkerPoolConfigBuilder::new().worker_count(0).build().is_err());
    /// assert!(WorkerPoolConfigBuilder::new().thread_name_prefix("  ").build().is_err());
    /// ```
    pub fn build(self) -> std::result::Result<WorkerPoolConfig, String> {
        if self.config.worker_count == 0 {
            return Err("worker_count must be greater than 0".to_string());
        }

        if let Some(prefix) = &self.config.thread_name_prefix {
            if prefix.trim().is_empty() {
                return Err("thread_name_prefix must not be blank".to_string());
            }
        }

        if self.config.extractor.read_chunk_size == 0 {
            return Err("read_chunk_size must be greater than 0".to_string());
        }

        Ok(self.config)
    }
}

impl Default for WorkerPoolConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Environment Configuration (feature-gated)
// ============================================================================

/// Environment-based configuration loading.
///
/// This module is only available when the `env-config` feature is enabled.
///
/// # Environment Variables
///
/// | Variable | Type | Default | Description |
/// |----------|------|---------|-------------|
/// | `POOL_WORKER_COUNT` | usize | 4 | Worker threads |
/// | `POOL_THREAD_NAME_PREFIX` | String | unset | Thread name label |
/// | `POOL_DAEMON_THREADS` | bool | false | Daemon worker threads |
/// | `EXTRACT_DECODE_ENTITIES` | bool | true | Decode character references |
/// | `EXTRACT_INCLUDE_RAW_TEXT` | bool | true | Keep script/style bodies |
/// | `EXTRACT_MAX_MEMORY_BYTES` | usize | unlimited | Parser memory limit |
/// | `EXTRACT_READ_CHUNK_SIZE` | usize | 8192 | Reader buffer size |
///
/// # Example `app.env` File
///
/// ```text
/// POOL_WORKER_COUNT=8
/// POOL_THREAD_NAME_PREFIX=scraper
/// POOL_DAEMON_THREADS=true
/// EXTRACT_MAX_MEMORY_BYTES=16777216
/// ```
#[cfg(feature = "env-config")]
pub mod env {
    use super::*;
    use crate::error::PoolkitError;

    /// Default environment file name.
    pub const ENV_FILE_NAME: &str = "app.env";

    /// Load environment variables from `app.env` file.
    ///
    /// Automatically called by [`from_env`].
    pub fn load_env_file() -> Result<std::path::PathBuf, dotenvy::Error> {
        dotenvy::from_filename(ENV_FILE_NAME)
    }

    fn parsed<T: std::str::FromStr>(key: &str) -> Option<T> {
        std::env::var(key).ok().and_then(|s| s.trim().parse().ok())
    }

    /// Load configuration from environment variables.
    ///
    /// Absent or unparsable values fall back to defaults; the result is
    /// validated through [`WorkerPoolConfigBuilder`].
    ///
    /// # Errors
    ///
    /// Returns [`PoolkitError::Configuration`] if configuration values are invalid.
    pub fn from_env() -> Result<WorkerPoolConfig, PoolkitError> {
        match load_env_file() {
            Ok(path) => {
                log::info!("Loaded configuration from: {:?}", path);
            }
            Err(e) => {
                log::debug!(
                    "No {} file found or failed to load: {} (using environment variables and defaults)",
                    ENV_FILE_NAME,
                    e
                );
            }
        }

        let defaults = WorkerPoolConfig::default();

        let worker_count = parsed("POOL_WORKER_COUNT").unwrap_or(defaults.worker_count);
        let prefix = std::env::var("POOL_THREAD_NAME_PREFIX").ok();
        let daemon = parsed("POOL_DAEMON_THREADS").unwrap_or(defaults.daemon);
        let decode_entities =
            parsed("EXTRACT_DECODE_ENTITIES").unwrap_or(defaults.extractor.decode_entities);
        let include_raw_text =
            parsed("EXTRACT_INCLUDE_RAW_TEXT").unwrap_or(defaults.extractor.include_raw_text);
        let max_memory_bytes =
            parsed("EXTRACT_MAX_MEMORY_BYTES").unwrap_or(defaults.extractor.max_memory_bytes);
        let read_chunk_size =
            parsed("EXTRACT_READ_CHUNK_SIZE").unwrap_or(defaults.extractor.read_chunk_size);

        log::info!("Loading pool configuration from environment:");
        log::info!("   - Worker count: {}", worker_count);
        log::info!(
            "   - Thread name prefix: {}",
            prefix.as_deref().unwrap_or("(fallback)")
        );
        log::info!("   - Daemon threads: {}", daemon);
        log::info!("   - Decode entities: {}", decode_entities);
        log::info!("   - Include raw text: {}", include_raw_text);

        let mut builder = WorkerPoolConfigBuilder::new()
            .worker_count(worker_count)
            .daemon(daemon)
            .decode_entities(decode_entities)
            .include_raw_text(include_raw_text)
            .max_memory_bytes(max_memory_bytes)
            .read_chunk_size(read_chunk_size);
        if let Some(prefix) = prefix {
            builder = builder.thread_name_prefix(prefix);
        }

        builder.build().map_err(PoolkitError::Configuration)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
