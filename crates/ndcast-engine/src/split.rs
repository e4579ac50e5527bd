//! Region splitting for parallel work distribution.
//!
//! Divides a full image region into disjoint, gap-free sub-regions, one
//! per worker invocation. The split is computed by successively dividing
//! along the axis with the largest extent, giving each half an extent
//! proportional to its share of the requested worker count.
//!
//! # Guarantees
//!
//! - **Partition**: the sub-regions are pairwise disjoint and their union
//!   is exactly the input region.
//! - **Determinism**: the same `(region, want)` always yields the same
//!   sequence, ordered with the lower half before the upper.
//! - **No empty pieces**: when the region has fewer splittable units than
//!   requested, fewer sub-regions are produced; none is ever empty. An
//!   empty input region yields nothing.
//!
//! [`RegionSplit`] is lazy and restartable: it is a pure function of its
//! inputs, so the same split can be recomputed at any time by constructing
//! (or cloning) the iterator again.
//!
//! # Example
//!
//! ```rust
//! use ndcast_core::Region;
//! use ndcast_engine::split_region;
//!
//! let region = Region::new([0, 0], [10, 1]);
//! let pieces = split_region(&region, 4);
//! assert_eq!(pieces.len(), 4);
//! let total: usize = pieces.iter().map(|r| r.size[0]).sum();
//! assert_eq!(total, 10);
//! ```

use ndcast_core::Region;

/// Lazy iterator over the sub-regions of a split.
///
/// Created by [`RegionSplit::new`] or collected eagerly via
/// [`split_region`].
#[derive(Debug, Clone)]
pub struct RegionSplit<const D: usize> {
    // Stack of (region, worker share) still to expand; top is next.
    pending: Vec<(Region<D>, usize)>,
}

impl<const D: usize> RegionSplit<D> {
    /// Prepares a split of `region` into up to `want` sub-regions.
    ///
    /// A `want` of zero is treated as one.
    pub fn new(region: Region<D>, want: usize) -> Self {
        let mut pending = Vec::new();
        if !region.is_empty() {
            pending.push((region, want.max(1)));
        }
        Self { pending }
    }
}

impl<const D: usize> Iterator for RegionSplit<D> {
    type Item = Region<D>;

    fn next(&mut self) -> Option<Region<D>> {
        let (mut region, mut want) = self.pending.pop()?;
        while want > 1 {
            if region.num_pixels() <= 1 {
                break;
            }
            let axis = region.largest_axis();
            let extent = region.size[axis];
            if extent < 2 {
                // Largest axis has a single position: nothing left to divide.
                break;
            }
            // Lower half takes the larger share of the remaining workers
            // and an extent proportional to it.
            let lo_want = want.div_ceil(2);
            let hi_want = want - lo_want;
            let lo_extent = (extent * lo_want / want).clamp(1, extent - 1);
            let (lo, hi) = region
                .split_at(axis, lo_extent)
                .expect("clamped extent keeps both halves non-empty");
            self.pending.push((hi, hi_want.max(1)));
            region = lo;
            want = lo_want;
        }
        Some(region)
    }
}

/// Splits `region` into up to `want` disjoint sub-regions.
///
/// Eager convenience over [`RegionSplit`]; see the module documentation
/// for the partition and determinism guarantees.
pub fn split_region<const D: usize>(region: &Region<D>, want: usize) -> Vec<Region<D>> {
    RegionSplit::new(*region, want).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Checks disjointness and exact coverage against the input region.
    fn assert_partition<const D: usize>(region: &Region<D>, pieces: &[Region<D>]) {
        for piece in pieces {
            assert!(!piece.is_empty(), "empty sub-region produced");
            assert!(region.contains_region(piece), "{piece} escapes {region}");
        }
        for (i, a) in pieces.iter().enumerate() {
            for b in &pieces[i + 1..] {
                assert!(a.intersect(b).is_none(), "{a} overlaps {b}");
            }
        }
        let covered: usize = pieces.iter().map(Region::num_pixels).sum();
        assert_eq!(covered, region.num_pixels(), "coverage gap");
    }

    #[test]
    fn test_split_partition_property() {
        let cases: Vec<(Region<2>, usize)> = vec![
            (Region::new([0, 0], [10, 1]), 4),
            (Region::new([0, 0], [64, 64]), 8),
            (Region::new([-8, 3], [17, 5]), 7),
            (Region::new([0, 0], [1, 1]), 16),
            (Region::new([5, 5], [3, 100]), 3),
        ];
        for (region, want) in cases {
            let pieces = split_region(&region, want);
            assert!(pieces.len() <= want.max(1));
            assert_partition(&region, &pieces);
        }
    }

    #[test]
    fn test_split_partition_3d() {
        let region: Region<3> = Region::new([0, -2, 10], [9, 6, 4]);
        for want in 1..=12 {
            let pieces = split_region(&region, want);
            assert_partition(&region, &pieces);
        }
    }

    #[test]
    fn test_split_deterministic() {
        let region: Region<2> = Region::new([1, 2], [23, 19]);
        assert_eq!(split_region(&region, 6), split_region(&region, 6));
    }

    #[test]
    fn test_split_ten_by_one_into_four() {
        let region: Region<2> = Region::new([0, 0], [10, 1]);
        let pieces = split_region(&region, 4);
        assert_eq!(pieces.len(), 4);
        let total: usize = pieces.iter().map(|r| r.size[0]).sum();
        assert_eq!(total, 10);
        assert_partition(&region, &pieces);
    }

    #[test]
    fn test_split_divides_largest_axis_first() {
        let region: Region<2> = Region::new([0, 0], [2, 100]);
        let pieces = split_region(&region, 2);
        assert_eq!(pieces.len(), 2);
        assert_eq!(pieces[0].size, [2, 50]);
        assert_eq!(pieces[1].size, [2, 50]);
        assert_eq!(pieces[1].index, [0, 50]);
    }

    #[test]
    fn test_split_fewer_than_requested() {
        let region: Region<1> = Region::new([0], [3]);
        let pieces = split_region(&region, 8);
        assert!(pieces.len() <= 3);
        assert_partition(&region, &pieces);
    }

    #[test]
    fn test_split_single_worker() {
        let region: Region<2> = Region::new([4, 4], [8, 8]);
        assert_eq!(split_region(&region, 1), vec![region]);
    }

    #[test]
    fn test_split_empty_region_yields_nothing() {
        let region: Region<2> = Region::new([0, 0], [10, 0]);
        assert!(split_region(&region, 4).is_empty());
    }

    #[test]
    fn test_split_iterator_is_restartable() {
        let region: Region<2> = Region::new([0, 0], [40, 30]);
        let split = RegionSplit::new(region, 5);
        let first: Vec<_> = split.clone().collect();
        let second: Vec<_> = split.collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_split_order_is_lower_before_upper() {
        let region: Region<1> = Region::new([0], [16]);
        let pieces = split_region(&region, 4);
        for pair in pieces.windows(2) {
            assert!(pair[0].index[0] < pair[1].index[0]);
            assert_eq!(pair[0].upper(0), pair[1].index[0], "gap between pieces");
        }
    }
}
