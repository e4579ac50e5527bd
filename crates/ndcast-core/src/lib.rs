//! # ndcast-core
//!
//! Core types for N-dimensional pixel-type conversion.
//!
//! This crate provides the foundational value types used by the `ndcast`
//! conversion engine:
//!
//! - [`Region`] - Axis-aligned N-dimensional index range
//! - [`Component`], [`Pixel`] - Compile-time pixel storage descriptors
//! - [`CastFrom`], [`PixelCast`] - Compile-time cast dispatch per type pair
//! - [`Image`] - Owned pixel buffer with copy-on-write storage
//!
//! ## Design Philosophy
//!
//! The central principle is **compile-time cast dispatch**. Whether a
//! conversion between two pixel types is direct (one native numeric cast)
//! or element-wise (per component of a vector pixel) is decided when the
//! types are instantiated, not per call; incompatible vector shapes fail to
//! compile:
//!
//! ```compile_fail
//! use ndcast_core::PixelCast;
//!
//! // Component counts differ: no impl, does not compile.
//! let _: [u8; 4] = PixelCast::cast_pixel([1i32, 2, 3]);
//! ```
//!
//! ## Crate Structure
//!
//! This crate has no internal dependencies. The conversion engine builds
//! on it:
//!
//! ```text
//! ndcast-core (this crate)
//!    ^
//!    |
//!    +-- ndcast-engine (kernel, splitter, in-place policy, progress)
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod cast;
pub mod component;
pub mod error;
pub mod image;
pub mod pixel;
pub mod region;

// Re-exports for convenience
pub use cast::{CastKind, PixelCast};
pub use component::{CastFrom, Component};
pub use error::{CoreError, CoreResult};
pub use image::Image;
pub use pixel::{Pixel, PixelLayout};
pub use region::{Region, RegionIndices};

/// Prelude module for convenient imports.
///
/// # Usage
///
/// ```
/// use ndcast_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::cast::{CastKind, PixelCast};
    pub use crate::component::{CastFrom, Component};
    pub use crate::error::{CoreError, CoreResult};
    pub use crate::image::Image;
    pub use crate::pixel::{Pixel, PixelLayout};
    pub use crate::region::{Region, RegionIndices};
}
