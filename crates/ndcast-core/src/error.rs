//! Error types for ndcast-core operations.
//!
//! # Overview
//!
//! The [`CoreError`] enum covers the failure modes of buffer construction
//! and addressing:
//!
//! - Allocation failure when reserving pixel storage
//! - Storage length not matching a region's pixel count
//! - Positions or regions outside a buffer's extent
//!
//! Numeric overflow or precision loss during pixel conversion is **not** an
//! error anywhere in this workspace; conversions follow native `as`-cast
//! semantics silently.
//!
//! # Dependencies
//!
//! - [`thiserror`] - Derive macro error implementation
//!
//! # Used By
//!
//! - [`crate::image::Image`] - Buffer construction and bounds checking
//! - `ndcast-engine` - Wrapped into the engine's error type

use thiserror::Error;

/// Result type alias using [`CoreError`] as the error type.
pub type CoreResult<T> = std::result::Result<T, CoreError>;

/// Errors that can occur constructing or addressing image buffers.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Memory allocation for a pixel buffer failed.
    ///
    /// Reported instead of aborting so the caller (typically an external
    /// pipeline scheduler) can decide on a retry policy.
    #[error("failed to allocate storage for {pixels} pixels: {reason}")]
    AllocationFailed {
        /// Number of pixels requested.
        pixels: usize,
        /// Failure reason.
        reason: String,
    },

    /// Provided storage does not match the region's pixel count.
    #[error("storage length {len} does not match region pixel count {expected}")]
    StorageMismatch {
        /// Length of the provided storage.
        len: usize,
        /// Pixel count of the region.
        expected: usize,
    },

    /// A position or region lies outside a buffer's extent.
    #[error("{what} is outside the buffer extent {extent}")]
    OutOfExtent {
        /// Description of the offending position or region.
        what: String,
        /// Display form of the buffer's region.
        extent: String,
    },
}

impl CoreError {
    /// Creates an [`CoreError::AllocationFailed`] error.
    #[inline]
    pub fn allocation_failed(pixels: usize, reason: impl Into<String>) -> Self {
        Self::AllocationFailed {
            pixels,
            reason: reason.into(),
        }
    }

    /// Creates an [`CoreError::OutOfExtent`] error.
    #[inline]
    pub fn out_of_extent(what: impl Into<String>, extent: impl Into<String>) -> Self {
        Self::OutOfExtent {
            what: what.into(),
            extent: extent.into(),
        }
    }
}
