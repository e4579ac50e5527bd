//! In-place buffer aliasing policy.
//!
//! When source and destination pixel types occupy identical storage, the
//! whole-image entry point can reuse the input's allocation for the output
//! instead of allocating and copying. This module holds the layout
//! predicate and the storage reinterpretation it licenses.
//!
//! # Policy
//!
//! [`can_alias`] permits aliasing only when the two pixel types have the
//! same component count, the same per-component byte width, and identical
//! Rust size and alignment (so the allocation can be retyped soundly). The
//! engine additionally requires the input's storage to be exclusively held
//! before taking it; see [`Image::is_exclusive`](ndcast_core::Image::is_exclusive).
//!
//! Matching pixel sizes also make the aliased conversion safe: every write
//! lands at the element offset it was read from, and the kernel reads each
//! pixel into a local before writing it back.
//!
//! # Example
//!
//! ```rust
//! use ndcast_engine::can_alias;
//!
//! assert!(can_alias::<i32, u32>());
//! assert!(can_alias::<i32, f32>());
//! assert!(!can_alias::<i32, u8>());
//! assert!(!can_alias::<[u8; 4], u32>()); // same size, different layout
//! ```

use ndcast_core::Pixel;

/// Returns `true` if an output of pixel type `Dst` may reuse the backing
/// storage of an input of pixel type `Src`.
///
/// Pure layout predicate, evaluated at compile time for any concrete type
/// pair; the caller still has to establish that the source buffer is not
/// shared.
#[must_use]
pub const fn can_alias<Src: Pixel, Dst: Pixel>() -> bool {
    Src::COMPONENTS == Dst::COMPONENTS
        && size_of::<Src::Component>() == size_of::<Dst::Component>()
        && size_of::<Src>() == size_of::<Dst>()
        && align_of::<Src>() == align_of::<Dst>()
}

/// Retypes a pixel allocation from `Src` to `Dst` without copying.
///
/// The returned vector still holds the source pixels' bit patterns; the
/// caller must convert every element (reading through `*const Src`) before
/// the contents are meaningful as `Dst`. Both component types are plain
/// numerics with no invalid bit patterns, so holding the bits in a
/// `Vec<Dst>` in the interim is sound.
///
/// # Panics
///
/// Panics if `can_alias::<Src, Dst>()` is false.
pub(crate) fn reinterpret_storage<Src: Pixel, Dst: Pixel>(data: Vec<Src>) -> Vec<Dst> {
    assert!(can_alias::<Src, Dst>(), "pixel layouts differ");
    let mut data = std::mem::ManuallyDrop::new(data);
    let len = data.len();
    let capacity = data.capacity();
    let ptr = data.as_mut_ptr() as *mut Dst;
    // SAFETY: size and alignment are equal per can_alias, so the
    // allocation's layout is unchanged; len and capacity carry over
    // one-to-one.
    unsafe { Vec::from_raw_parts(ptr, len, capacity) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use half::f16;

    #[test]
    fn test_can_alias_same_width_scalars() {
        assert!(can_alias::<i32, u32>());
        assert!(can_alias::<i32, f32>());
        assert!(can_alias::<u16, f16>());
        assert!(can_alias::<u64, f64>());
        assert!(can_alias::<u8, u8>());
    }

    #[test]
    fn test_can_alias_rejects_width_mismatch() {
        assert!(!can_alias::<i32, u8>());
        assert!(!can_alias::<f32, f64>());
        assert!(!can_alias::<u8, f16>());
    }

    #[test]
    fn test_can_alias_vector_pixels() {
        assert!(can_alias::<[u8; 3], [i8; 3]>());
        assert!(can_alias::<[f32; 4], [u32; 4]>());
        assert!(!can_alias::<[u8; 3], [u8; 4]>());
        // Identical byte size but different component layout.
        assert!(!can_alias::<[u8; 4], u32>());
        assert!(!can_alias::<[u16; 2], [u8; 4]>());
    }

    #[test]
    fn test_reinterpret_storage_round_trip() {
        let data: Vec<i32> = vec![-1, 0, 300];
        let raw: Vec<u32> = reinterpret_storage(data);
        assert_eq!(raw.len(), 3);
        assert_eq!(raw[0], u32::MAX);
        assert_eq!(raw[2], 300);
        let back: Vec<i32> = reinterpret_storage(raw);
        assert_eq!(back, vec![-1, 0, 300]);
    }
}
