//! The per-region conversion kernel.
//!
//! Walks one sub-region of an input and an output buffer in lock-step and
//! converts every pixel. The scan order is lexicographic over the
//! multi-index with axis 0 innermost, matching buffer storage order, so
//! the inner loop is a contiguous run.
//!
//! # Ordering Guarantees
//!
//! Within one kernel invocation every pixel of the region is visited
//! exactly once, in scan order. Each source pixel is read into a local
//! before the converted value is written, so when source and destination
//! alias the same storage (the in-place case, where element sizes match
//! and read and write offsets coincide) no pixel's source value is
//! destroyed before it is read.
//!
//! # Dependencies
//!
//! - [`ndcast_core::PixelCast`] - The per-pixel conversion
//! - [`ndcast_core::Region`] - Offsets and row iteration

use ndcast_core::{Pixel, PixelCast, Region};

/// Converts `region` from `src` into `dst`.
///
/// `src_extent` and `dst_extent` describe the buffer layouts the two
/// pointers address; `region` must be contained in both. The two buffers
/// may alias only when `Src` and `Dst` have identical element size and
/// the extents are equal, so every write offset equals its read offset.
///
/// # Safety
///
/// - `src` must be valid for reads of `src_extent.num_pixels()` elements
///   and `dst` for writes of `dst_extent.num_pixels()` elements.
/// - `region` must be contained in both extents.
/// - No other thread may write the `dst` positions of `region`, and none
///   may access the aliased positions at all in the in-place case.
pub(crate) unsafe fn cast_region_unchecked<Src, Dst, const D: usize>(
    src: *const Src,
    src_extent: &Region<D>,
    dst: *mut Dst,
    dst_extent: &Region<D>,
    region: &Region<D>,
) where
    Src: Pixel,
    Dst: PixelCast<Src>,
{
    if region.is_empty() {
        return;
    }
    if D == 0 {
        // A zero-dimensional region is a single position at offset 0.
        unsafe {
            let value = src.read();
            dst.write(Dst::cast_pixel(value));
        }
        return;
    }

    // Iterate rows: all positions with axis 0 pinned to the region start,
    // then run the contiguous axis-0 span from each row base.
    let run = region.size[0];
    let mut row = *region;
    row.size[0] = 1;
    for base in row.iter_indices() {
        let src_offset = src_extent.offset_of(base);
        let dst_offset = dst_extent.offset_of(base);
        for i in 0..run {
            unsafe {
                // Read before write: required when src and dst alias.
                let value = src.add(src_offset + i).read();
                dst.add(dst_offset + i).write(Dst::cast_pixel(value));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndcast_core::Image;

    fn run_kernel<Src, Dst, const D: usize>(
        src: &Image<Src, D>,
        dst: &mut Image<Dst, D>,
        region: &Region<D>,
    ) where
        Src: Pixel,
        Dst: PixelCast<Src>,
    {
        let src_extent = src.region();
        let dst_extent = dst.region();
        unsafe {
            cast_region_unchecked(
                src.data().as_ptr(),
                &src_extent,
                dst.data_mut().as_mut_ptr(),
                &dst_extent,
                region,
            );
        }
    }

    #[test]
    fn test_kernel_full_region() {
        let region = Region::new([0, 0], [4, 4]);
        let src: Image<i32, 2> = Image::filled(region, 300).unwrap();
        let mut dst: Image<u8, 2> = Image::new(region).unwrap();
        run_kernel(&src, &mut dst, &region);
        assert!(dst.data().iter().all(|&v| v == 44));
    }

    #[test]
    fn test_kernel_sub_region_touches_only_its_pixels() {
        let extent = Region::new([0, 0], [4, 3]);
        let data: Vec<i32> = (0..12).collect();
        let src = Image::from_data(extent, data).unwrap();
        let mut dst: Image<i16, 2> = Image::filled(extent, -1).unwrap();

        let sub = Region::new([1, 1], [2, 2]);
        run_kernel(&src, &mut dst, &sub);

        for position in extent.iter_indices() {
            let expected = if sub.contains(position) {
                src.pixel(position) as i16
            } else {
                -1
            };
            assert_eq!(dst.pixel(position), expected, "at {position:?}");
        }
    }

    #[test]
    fn test_kernel_mismatched_extents() {
        // Source covers a larger extent than the destination; offsets are
        // computed against each buffer's own layout.
        let src_extent = Region::new([0, 0], [6, 4]);
        let data: Vec<u8> = (0..24).collect();
        let src = Image::from_data(src_extent, data).unwrap();

        let dst_extent = Region::new([2, 1], [3, 2]);
        let mut dst: Image<f32, 2> = Image::new(dst_extent).unwrap();
        run_kernel(&src, &mut dst, &dst_extent);

        for position in dst_extent.iter_indices() {
            assert_eq!(dst.pixel(position), src.pixel(position) as f32);
        }
    }

    #[test]
    fn test_kernel_vector_pixels() {
        let region = Region::new([0], [2]);
        let src = Image::from_data(region, vec![[300i32, -1, 0], [1, 2, 3]]).unwrap();
        let mut dst: Image<[u8; 3], 1> = Image::new(region).unwrap();
        run_kernel(&src, &mut dst, &region);
        assert_eq!(dst.pixel([0]), [44, 255, 0]);
        assert_eq!(dst.pixel([1]), [1, 2, 3]);
    }

    #[test]
    fn test_kernel_aliased_same_size() {
        // In-place: reinterpret i32 storage as f32 and convert over itself.
        let region = Region::new([0, 0], [3, 3]);
        let src: Image<i32, 2> = Image::filled(region, 7).unwrap();
        let data = src.try_take().unwrap();
        let mut data: Vec<f32> = crate::inplace::reinterpret_storage(data);
        let base = data.as_mut_ptr();
        unsafe {
            cast_region_unchecked(base as *const i32, &region, base, &region, &region);
        }
        assert!(data.iter().all(|&v| v == 7.0));
    }
}
