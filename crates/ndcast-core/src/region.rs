//! N-dimensional region types for image addressing.
//!
//! This module provides the geometric primitive used to address pixels in an
//! N-dimensional image domain:
//!
//! - [`Region`] - An axis-aligned index range (index + size per axis)
//! - [`RegionIndices`] - Lexicographic iterator over a region's positions
//!
//! # Coordinate System
//!
//! A region is described by a signed starting `index` and an unsigned `size`
//! along each axis. The covered range on axis `d` is the half-open interval
//! `[index[d], index[d] + size[d])`.
//!
//! A region with `size[d] == 0` on any axis is **empty**: it contains no
//! positions, iterates over nothing, and is skipped by region splitting.
//!
//! # Memory Order
//!
//! Buffer offsets computed by [`Region::offset_of`] follow row-major layout
//! with **axis 0 fastest-varying** (innermost). [`Region::iter_indices`]
//! visits positions in the same order, so iterating a buffer's own region
//! walks its storage sequentially.
//!
//! # Usage
//!
//! ```rust
//! use ndcast_core::Region;
//!
//! let region = Region::new([0, 0], [4, 3]);
//! assert_eq!(region.num_pixels(), 12);
//! assert!(region.contains([3, 2]));
//! assert!(!region.contains([4, 0]));
//! ```
//!
//! # Dependencies
//!
//! None (pure Rust types)
//!
//! # Used By
//!
//! - [`crate::image::Image`] - Addressable extent of a buffer
//! - `ndcast-engine` - Region splitting and kernel iteration

/// An axis-aligned index range over an N-dimensional image domain.
///
/// # Invariants
///
/// - The range on axis `d` is half-open: `[index[d], index[d] + size[d])`
/// - A region with any `size[d] == 0` is empty and contains no positions
///
/// # Example
///
/// ```rust
/// use ndcast_core::Region;
///
/// let region = Region::new([10, 20], [100, 50]);
/// assert_eq!(region.upper(0), 110);
/// assert_eq!(region.upper(1), 70);
/// assert_eq!(region.num_pixels(), 5000);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Region<const D: usize> {
    /// Starting index on each axis (inclusive).
    pub index: [i64; D],
    /// Extent on each axis, in pixels.
    pub size: [usize; D],
}

impl<const D: usize> Default for Region<D> {
    fn default() -> Self {
        Self {
            index: [0; D],
            size: [0; D],
        }
    }
}

impl<const D: usize> Region<D> {
    /// Creates a new region with the given starting index and extents.
    #[inline]
    pub const fn new(index: [i64; D], size: [usize; D]) -> Self {
        Self { index, size }
    }

    /// Creates a region starting at the origin with the given extents.
    ///
    /// # Example
    ///
    /// ```rust
    /// use ndcast_core::Region;
    ///
    /// let region = Region::from_size([1920, 1080]);
    /// assert_eq!(region.index, [0, 0]);
    /// ```
    #[inline]
    pub const fn from_size(size: [usize; D]) -> Self {
        Self {
            index: [0; D],
            size,
        }
    }

    /// Returns the exclusive upper bound on the given axis (`index + size`).
    #[inline]
    pub const fn upper(&self, axis: usize) -> i64 {
        self.index[axis] + self.size[axis] as i64
    }

    /// Returns the total number of positions in this region.
    ///
    /// Zero when the region is empty. For `D == 0` the empty product is 1
    /// (a single, unindexed position).
    #[inline]
    pub fn num_pixels(&self) -> usize {
        self.size.iter().product()
    }

    /// Returns `true` if any axis has zero extent.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.size.iter().any(|&s| s == 0)
    }

    /// Returns `true` if the position is inside this region.
    ///
    /// # Example
    ///
    /// ```rust
    /// use ndcast_core::Region;
    ///
    /// let region = Region::new([10, 10], [100, 100]);
    /// assert!(region.contains([10, 10]));
    /// assert!(region.contains([109, 109]));
    /// assert!(!region.contains([110, 10]));
    /// ```
    #[inline]
    pub fn contains(&self, position: [i64; D]) -> bool {
        (0..D).all(|d| position[d] >= self.index[d] && position[d] < self.upper(d))
    }

    /// Returns `true` if this region fully contains another.
    ///
    /// An empty `other` is contained in any region.
    #[inline]
    pub fn contains_region(&self, other: &Region<D>) -> bool {
        if other.is_empty() {
            return true;
        }
        (0..D).all(|d| other.index[d] >= self.index[d] && other.upper(d) <= self.upper(d))
    }

    /// Returns the intersection of two regions.
    ///
    /// Returns `None` if the regions don't overlap (including when either
    /// is empty).
    pub fn intersect(&self, other: &Region<D>) -> Option<Region<D>> {
        let mut index = [0i64; D];
        let mut size = [0usize; D];
        for d in 0..D {
            let lo = self.index[d].max(other.index[d]);
            let hi = self.upper(d).min(other.upper(d));
            if lo >= hi {
                return None;
            }
            index[d] = lo;
            size[d] = (hi - lo) as usize;
        }
        Some(Region::new(index, size))
    }

    /// Returns the bounding box that contains both regions.
    ///
    /// An empty region does not contribute to the bounds.
    pub fn bounding_union(&self, other: &Region<D>) -> Region<D> {
        if self.is_empty() {
            return *other;
        }
        if other.is_empty() {
            return *self;
        }
        let mut index = [0i64; D];
        let mut size = [0usize; D];
        for d in 0..D {
            let lo = self.index[d].min(other.index[d]);
            let hi = self.upper(d).max(other.upper(d));
            index[d] = lo;
            size[d] = (hi - lo) as usize;
        }
        Region::new(index, size)
    }

    /// Returns the axis with the largest extent (lowest axis wins ties).
    #[inline]
    pub fn largest_axis(&self) -> usize {
        let mut axis = 0;
        for d in 1..D {
            if self.size[d] > self.size[axis] {
                axis = d;
            }
        }
        axis
    }

    /// Splits this region along `axis` at `extent` positions from its start.
    ///
    /// Returns the lower and upper halves, in axis order. Returns `None`
    /// unless both halves would be non-empty (`0 < extent < size[axis]`).
    ///
    /// # Example
    ///
    /// ```rust
    /// use ndcast_core::Region;
    ///
    /// let region = Region::new([0, 0], [10, 4]);
    /// let (lo, hi) = region.split_at(0, 6).unwrap();
    /// assert_eq!(lo, Region::new([0, 0], [6, 4]));
    /// assert_eq!(hi, Region::new([6, 0], [4, 4]));
    /// ```
    pub fn split_at(&self, axis: usize, extent: usize) -> Option<(Region<D>, Region<D>)> {
        if extent == 0 || extent >= self.size[axis] {
            return None;
        }
        let mut lo = *self;
        let mut hi = *self;
        lo.size[axis] = extent;
        hi.index[axis] += extent as i64;
        hi.size[axis] -= extent;
        Some((lo, hi))
    }

    /// Returns the per-axis strides of a buffer laid out over this region.
    ///
    /// Stride of axis 0 is 1 (fastest-varying); each further axis strides
    /// by the product of the extents below it.
    #[inline]
    pub fn strides(&self) -> [usize; D] {
        let mut strides = [1usize; D];
        for d in 1..D {
            strides[d] = strides[d - 1] * self.size[d - 1];
        }
        strides
    }

    /// Returns the linear buffer offset of a position within this region.
    ///
    /// The position must be inside the region; offsets are computed
    /// relative to `index` in row-major order with axis 0 innermost.
    ///
    /// # Example
    ///
    /// ```rust
    /// use ndcast_core::Region;
    ///
    /// let region = Region::new([0, 0], [4, 3]);
    /// assert_eq!(region.offset_of([0, 0]), 0);
    /// assert_eq!(region.offset_of([3, 0]), 3);
    /// assert_eq!(region.offset_of([0, 1]), 4);
    /// ```
    #[inline]
    pub fn offset_of(&self, position: [i64; D]) -> usize {
        debug_assert!(self.contains(position) || D == 0);
        let strides = self.strides();
        let mut offset = 0usize;
        for d in 0..D {
            offset += (position[d] - self.index[d]) as usize * strides[d];
        }
        offset
    }

    /// Returns an iterator over all positions in this region.
    ///
    /// Positions are visited in lexicographic order with axis 0
    /// fastest-varying, matching [`Region::offset_of`] buffer order.
    /// An empty region yields nothing.
    ///
    /// # Example
    ///
    /// ```rust
    /// use ndcast_core::Region;
    ///
    /// let region = Region::new([0, 0], [2, 2]);
    /// let positions: Vec<_> = region.iter_indices().collect();
    /// assert_eq!(positions, vec![[0, 0], [1, 0], [0, 1], [1, 1]]);
    /// ```
    #[inline]
    pub fn iter_indices(&self) -> RegionIndices<D> {
        RegionIndices {
            region: *self,
            next: self.index,
            done: self.is_empty(),
        }
    }
}

impl<const D: usize> std::fmt::Display for Region<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Region(index={:?}, size={:?})", self.index, self.size)
    }
}

/// Iterator over the positions of a [`Region`], axis 0 fastest-varying.
///
/// Created by [`Region::iter_indices`].
#[derive(Debug, Clone)]
pub struct RegionIndices<const D: usize> {
    region: Region<D>,
    next: [i64; D],
    done: bool,
}

impl<const D: usize> Iterator for RegionIndices<D> {
    type Item = [i64; D];

    fn next(&mut self) -> Option<[i64; D]> {
        if self.done {
            return None;
        }
        let current = self.next;
        if D == 0 {
            // A zero-dimensional region addresses a single position.
            self.done = true;
            return Some(current);
        }
        // Advance with carry, axis 0 first.
        for d in 0..D {
            self.next[d] += 1;
            if self.next[d] < self.region.upper(d) {
                return Some(current);
            }
            self.next[d] = self.region.index[d];
        }
        self.done = true;
        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.done {
            return (0, Some(0));
        }
        // Remaining count from the current multi-index.
        let strides = self.region.strides();
        let consumed: usize = (0..D)
            .map(|d| (self.next[d] - self.region.index[d]) as usize * strides[d])
            .sum();
        let remaining = self.region.num_pixels() - consumed;
        (remaining, Some(remaining))
    }
}

impl<const D: usize> ExactSizeIterator for RegionIndices<D> {}
