//! N-dimensional image buffer.
//!
//! This module provides [`Image`], the owned pixel container the conversion
//! engine reads from and writes to.
//!
//! # Memory Layout
//!
//! Pixels are stored contiguously in row-major order with axis 0
//! fastest-varying, matching [`Region::offset_of`] and
//! [`Region::iter_indices`]. An image's addressable extent is the
//! [`Region`] it was created with; its starting index need not be zero.
//!
//! # Sharing
//!
//! Storage lives in an `Arc<Vec<P>>`, so cloning an image is cheap and
//! copy-on-write: mutation through [`Image::data_mut`] or
//! [`Image::set_pixel`] clones the storage first if it is shared. The
//! exclusivity signal ([`Image::is_exclusive`]) is what the in-place
//! conversion policy consults before aliasing a buffer.
//!
//! # Usage
//!
//! ```rust
//! use ndcast_core::{Image, Region};
//!
//! let region = Region::new([0, 0], [4, 4]);
//! let mut img: Image<i32, 2> = Image::filled(region, 300).unwrap();
//! assert_eq!(img.pixel([2, 3]), 300);
//!
//! img.set_pixel([0, 0], 7);
//! assert_eq!(img.pixel([0, 0]), 7);
//! ```
//!
//! # Dependencies
//!
//! - [`crate::pixel::Pixel`] - Pixel storage trait
//! - [`crate::region::Region`] - Extent and addressing
//! - [`crate::error`] - Failure reporting
//!
//! # Used By
//!
//! - `ndcast-engine` - Conversion input and output buffers

use crate::error::{CoreError, CoreResult};
use crate::pixel::Pixel;
use crate::region::Region;
use std::sync::Arc;

/// Owned N-dimensional pixel buffer with copy-on-write storage.
///
/// # Type Parameters
///
/// - `P: Pixel` - The pixel storage type (scalar or `[T; N]` vector)
/// - `D` - Number of dimensions
#[derive(Debug, Clone)]
pub struct Image<P: Pixel, const D: usize> {
    region: Region<D>,
    data: Arc<Vec<P>>,
}

impl<P: Pixel, const D: usize> Image<P, D> {
    /// Creates a zero-filled image covering `region`.
    ///
    /// Storage is reserved with `try_reserve_exact`; an allocation failure
    /// is reported as [`CoreError::AllocationFailed`] rather than aborting.
    pub fn new(region: Region<D>) -> CoreResult<Self> {
        Self::filled(region, P::ZERO)
    }

    /// Creates an image covering `region` with every pixel set to `pixel`.
    pub fn filled(region: Region<D>, pixel: P) -> CoreResult<Self> {
        let count = region.num_pixels();
        let mut data = Vec::new();
        data.try_reserve_exact(count)
            .map_err(|e| CoreError::allocation_failed(count, e.to_string()))?;
        data.resize(count, pixel);
        Ok(Self {
            region,
            data: Arc::new(data),
        })
    }

    /// Creates an image from existing storage.
    ///
    /// `data` must hold exactly `region.num_pixels()` pixels in the
    /// buffer's scan order (axis 0 fastest).
    pub fn from_data(region: Region<D>, data: Vec<P>) -> CoreResult<Self> {
        let expected = region.num_pixels();
        if data.len() != expected {
            return Err(CoreError::StorageMismatch {
                len: data.len(),
                expected,
            });
        }
        Ok(Self {
            region,
            data: Arc::new(data),
        })
    }

    /// Returns the addressable extent of this image.
    #[inline]
    pub fn region(&self) -> Region<D> {
        self.region
    }

    /// Returns the total pixel count.
    #[inline]
    pub fn num_pixels(&self) -> usize {
        self.region.num_pixels()
    }

    /// Returns `true` if the image covers no pixels.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.region.is_empty()
    }

    /// Returns the pixel storage in scan order.
    #[inline]
    pub fn data(&self) -> &[P] {
        &self.data
    }

    /// Returns mutable pixel storage, cloning it first if shared.
    #[inline]
    pub fn data_mut(&mut self) -> &mut [P] {
        Arc::<Vec<P>>::make_mut(&mut self.data)
    }

    /// Returns `true` if no other image shares this storage.
    ///
    /// This is the "not shared by any other live consumer" signal the
    /// in-place conversion policy requires before aliasing the buffer.
    #[inline]
    pub fn is_exclusive(&self) -> bool {
        Arc::strong_count(&self.data) == 1
    }

    /// Consumes the image and returns its storage if exclusively held.
    ///
    /// Returns the intact image as `Err` when the storage is shared, so the
    /// caller can fall back to an allocating path.
    pub fn try_take(self) -> Result<Vec<P>, Self> {
        let region = self.region;
        Arc::try_unwrap(self.data).map_err(|data| Self { region, data })
    }

    /// Returns the pixel at `position`.
    ///
    /// # Panics
    ///
    /// Panics if `position` is outside the image's region. Use
    /// [`Image::get_pixel`] for a checked variant.
    #[inline]
    pub fn pixel(&self, position: [i64; D]) -> P {
        self.data[self.region.offset_of(position)]
    }

    /// Returns the pixel at `position`, or `None` when out of bounds.
    #[inline]
    pub fn get_pixel(&self, position: [i64; D]) -> Option<P> {
        if self.region.contains(position) {
            Some(self.data[self.region.offset_of(position)])
        } else {
            None
        }
    }

    /// Sets the pixel at `position`.
    ///
    /// # Panics
    ///
    /// Panics if `position` is outside the image's region.
    #[inline]
    pub fn set_pixel(&mut self, position: [i64; D], pixel: P) {
        let offset = self.region.offset_of(position);
        self.data_mut()[offset] = pixel;
    }

    /// Sets every pixel to `pixel`.
    pub fn fill(&mut self, pixel: P) {
        self.data_mut().fill(pixel);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_new_zeroed() {
        let img: Image<u8, 2> = Image::new(Region::from_size([3, 2])).unwrap();
        assert_eq!(img.num_pixels(), 6);
        assert!(img.data().iter().all(|&v| v == 0));
    }

    #[test]
    fn test_image_filled() {
        let img: Image<i32, 2> = Image::filled(Region::from_size([4, 4]), 300).unwrap();
        assert!(img.data().iter().all(|&v| v == 300));
    }

    #[test]
    fn test_image_from_data_length_check() {
        let region = Region::from_size([2, 2]);
        assert!(Image::from_data(region, vec![1u8, 2, 3, 4]).is_ok());
        assert!(matches!(
            Image::from_data(region, vec![1u8, 2, 3]),
            Err(CoreError::StorageMismatch { len: 3, expected: 4 })
        ));
    }

    #[test]
    fn test_image_pixel_addressing() {
        let region = Region::new([0, 0], [3, 2]);
        let data: Vec<u8> = (0..6).collect();
        let img = Image::from_data(region, data).unwrap();
        assert_eq!(img.pixel([0, 0]), 0);
        assert_eq!(img.pixel([2, 0]), 2);
        assert_eq!(img.pixel([0, 1]), 3);
        assert_eq!(img.get_pixel([3, 0]), None);
    }

    #[test]
    fn test_image_nonzero_starting_index() {
        let region = Region::new([10, -4], [2, 2]);
        let img = Image::from_data(region, vec![1u16, 2, 3, 4]).unwrap();
        assert_eq!(img.pixel([10, -4]), 1);
        assert_eq!(img.pixel([11, -3]), 4);
    }

    #[test]
    fn test_image_copy_on_write() {
        let mut a: Image<u8, 1> = Image::filled(Region::from_size([4]), 9).unwrap();
        let b = a.clone();
        assert!(!a.is_exclusive());

        a.set_pixel([0], 1);
        assert_eq!(a.pixel([0]), 1);
        // The clone keeps the original storage.
        assert_eq!(b.pixel([0]), 9);
        assert!(a.is_exclusive());
        assert!(b.is_exclusive());
    }

    #[test]
    fn test_image_try_take() {
        let a: Image<u8, 1> = Image::filled(Region::from_size([4]), 9).unwrap();
        let b = a.clone();
        // Shared storage cannot be taken.
        let a = a.try_take().unwrap_err();
        drop(b);
        let data = a.try_take().unwrap();
        assert_eq!(data, vec![9, 9, 9, 9]);
    }

    #[test]
    fn test_image_vector_pixels() {
        let region = Region::from_size([2]);
        let img = Image::from_data(region, vec![[1u8, 2, 3], [4, 5, 6]]).unwrap();
        assert_eq!(img.pixel([1]), [4, 5, 6]);
    }
}
