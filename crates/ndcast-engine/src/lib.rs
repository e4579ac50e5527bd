//! # ndcast-engine
//!
//! Multithreaded execution layer for N-dimensional pixel-type conversion.
//!
//! Builds on [`ndcast_core`]'s data model and per-pixel casts: splits a
//! whole-image region into disjoint sub-regions, converts them across a
//! worker pool, and tracks progress and cancellation while doing so.
//!
//! # Modules
//!
//! - [`engine`] - The two-stage conversion engine (negotiate, execute)
//! - [`split`] - Deterministic region splitting for work distribution
//! - [`progress`] - Shared progress and cancellation state
//! - [`inplace`] - In-place buffer aliasing policy
//!
//! # Example
//!
//! ```rust
//! use ndcast_core::{Image, Region};
//! use ndcast_engine::{CastEngine, Progress};
//!
//! let input: Image<i32, 2> = Image::filled(Region::from_size([64, 64]), 300).unwrap();
//!
//! let engine = CastEngine::new();
//! let progress = Progress::new();
//! let output: Image<u8, 2> = engine.execute(input, &progress).unwrap();
//!
//! assert!(output.data().iter().all(|&v| v == 44));
//! ```
//!
//! # Tuning
//!
//! Worker count and the serial/parallel threshold come from
//! `NDCAST_WORKERS` and `NDCAST_MIN_PARALLEL_PIXELS`, overridable per
//! engine with [`CastEngine::with_workers`] and
//! [`CastEngine::with_min_parallel_pixels`]. Disabling the default
//! `parallel` feature removes the thread pool entirely; the engine then
//! runs every sub-region on the calling thread.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod engine;
mod env_config;
mod error;
pub mod inplace;
mod kernel;
pub mod progress;
pub mod split;

pub use engine::{CastEngine, CastPlan, cast_image};
pub use error::{CastError, CastResult};
pub use inplace::can_alias;
pub use progress::Progress;
pub use split::{RegionSplit, split_region};
