//! Progress reporting and cooperative cancellation.
//!
//! One [`Progress`] value is shared between the caller and all workers of a
//! conversion invocation. Workers increment the completed counter after
//! each finished sub-region; the caller may poll [`Progress::fraction`] or
//! request a stop with [`Progress::cancel`].
//!
//! # Granularity
//!
//! Cancellation is checked once per sub-region, before work on it starts.
//! A sub-region in progress always runs to completion, which bounds
//! cancellation latency to one sub-region's processing time while keeping
//! the per-pixel path free of any flag checks.
//!
//! # Usage
//!
//! ```rust
//! use ndcast_engine::Progress;
//!
//! let progress = Progress::new();
//! progress.begin(4);
//! progress.complete_one();
//! assert_eq!(progress.fraction(), 0.25);
//!
//! progress.cancel();
//! assert!(progress.is_cancelled());
//! ```

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

/// Shared progress counter and cancellation flag for one invocation.
///
/// All fields are atomics; the counters are the only state mutated by
/// multiple workers. Relaxed ordering is sufficient: the counters are
/// advisory and carry no data dependencies.
#[derive(Debug, Default)]
pub struct Progress {
    completed: AtomicU64,
    total: AtomicU64,
    cancelled: AtomicBool,
}

impl Progress {
    /// Creates an idle tracker with zero total units.
    pub fn new() -> Self {
        Self::default()
    }

    /// Resets the tracker for a new invocation with `total` work units.
    ///
    /// Units are typically sub-region counts. Clears the completed counter
    /// and any previous cancellation request.
    pub fn begin(&self, total: u64) {
        self.completed.store(0, Ordering::Relaxed);
        self.total.store(total, Ordering::Relaxed);
        self.cancelled.store(false, Ordering::Relaxed);
    }

    /// Records one completed work unit.
    #[inline]
    pub fn complete_one(&self) {
        self.completed.fetch_add(1, Ordering::Relaxed);
    }

    /// Records `units` completed work units.
    #[inline]
    pub fn complete_units(&self, units: u64) {
        self.completed.fetch_add(units, Ordering::Relaxed);
    }

    /// Returns the number of completed work units.
    #[inline]
    pub fn completed(&self) -> u64 {
        self.completed.load(Ordering::Relaxed)
    }

    /// Returns the total work units of the current invocation.
    #[inline]
    pub fn total(&self) -> u64 {
        self.total.load(Ordering::Relaxed)
    }

    /// Returns completion as a fraction in `[0, 1]`.
    ///
    /// Returns 0.0 before [`Progress::begin`] has set a non-zero total.
    pub fn fraction(&self) -> f32 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        (self.completed().min(total) as f32) / (total as f32)
    }

    /// Requests a cooperative stop at the next sub-region boundary.
    #[inline]
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    /// Returns `true` if a stop has been requested.
    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}
