//! Error types for the conversion engine.
//!
//! # Taxonomy
//!
//! - Configuration errors (mismatched vector component counts) are caught
//!   when the program is compiled and have no variant here.
//! - Resource errors surface as [`CastError::Core`] wrapping the buffer
//!   allocation failure.
//! - Scheduler-supplied sub-regions are validated and rejected with
//!   [`CastError::RegionOutOfBounds`].
//! - Cooperative cancellation reports [`CastError::Cancelled`].
//! - A panicking worker reports [`CastError::WorkerFault`] after all
//!   workers have been joined; output already written by other workers is
//!   left as-is and the whole output must be treated as indeterminate.
//!
//! Numeric overflow or precision loss during conversion is never an error.

use ndcast_core::CoreError;
use thiserror::Error;

/// Result type alias using [`CastError`] as the error type.
pub type CastResult<T> = std::result::Result<T, CastError>;

/// Errors reported by the conversion engine's entry points.
#[derive(Debug, Error)]
pub enum CastError {
    /// A core buffer operation failed (allocation, storage mismatch).
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A requested sub-region is not contained in a buffer's extent.
    #[error("sub-region {region} exceeds the {side} extent {extent}")]
    RegionOutOfBounds {
        /// Display form of the offending sub-region.
        region: String,
        /// Which buffer was exceeded (`"source"` or `"destination"`).
        side: &'static str,
        /// Display form of the buffer's extent.
        extent: String,
    },

    /// The invocation observed a cancellation request and stopped at a
    /// sub-region boundary.
    #[error("conversion cancelled after {completed} of {total} sub-regions")]
    Cancelled {
        /// Sub-regions completed before the stop.
        completed: u64,
        /// Sub-regions planned for the invocation.
        total: u64,
    },

    /// A worker panicked while converting its sub-region.
    #[error("worker fault while converting a sub-region: {0}")]
    WorkerFault(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_error_is_transparent() {
        let core = CoreError::allocation_failed(16, "no memory");
        let err: CastError = core.into();
        assert!(err.to_string().contains("no memory"));
    }

    #[test]
    fn test_cancelled_message() {
        let err = CastError::Cancelled {
            completed: 1,
            total: 4,
        };
        assert!(err.to_string().contains("1 of 4"));
    }
}
