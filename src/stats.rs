//! Pool statistics for monitoring and health checks.
//!
//! This module provides [`PoolStats`], a snapshot of a worker pool's
//! current state.
//!
//! # Example
//!
//! ```rust,ignore
//! let stats = pool.stats();
//! if stats.queued > stats.workers * 10 {
//!     log::warn!("Extraction backlog growing: {} jobs queued", stats.queued);
//! }
//! ```

/// Snapshot of pool statistics at a point in time.
///
/// # Fields
///
/// | Field | Description |
/// |-------|-------------|
/// | `workers` | Worker threads still running |
/// | `queued` | Jobs submitted but not yet picked up |
/// | `completed` | Jobs that ran to completion |
/// | `failed` | Jobs that panicked |
///
/// # Note
///
/// Counters are read independently, so a snapshot taken while jobs are
/// moving may be off by one between fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PoolStats {
    /// Worker threads still running.
    pub workers: usize,

    /// Jobs submitted but not yet picked up by a worker.
    pub queued: usize,

    /// Jobs that ran to completion.
    pub completed: u64,

    /// Jobs that panicked.
    pub failed: u64,
}

impl PoolStats {
    /// Jobs that finished, successfully or not.
    pub fn finished(&self) -> u64 {
        self.completed + self.failed
    }

    /// Whether no job is waiting for a worker.
    pub fn is_idle(&self) -> bool {
        self.queued == 0
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
