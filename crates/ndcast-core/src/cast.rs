//! Compile-time cast dispatch between pixel types.
//!
//! This module decides, per (source pixel type, destination pixel type)
//! pair, which conversion path applies. The decision is baked into which
//! trait impl is selected at instantiation; there is no runtime type
//! inspection and no dynamic dispatch table.
//!
//! # Dispatch Policy
//!
//! - Scalar to scalar: [`CastKind::Direct`], one native numeric cast per
//!   pixel (see [`CastFrom`](crate::CastFrom) for the exact semantics).
//! - `[S; N]` to `[T; N]`: [`CastKind::ElementWise`], the component cast
//!   applied per element, preserving component order.
//! - `[S; M]` to `[T; N]` with `M != N`: no impl exists. The mismatch is a
//!   configuration error caught when the program is compiled, never at
//!   execution time.
//!
//! # Example
//!
//! ```rust
//! use ndcast_core::{CastKind, PixelCast};
//!
//! assert_eq!(<u8 as PixelCast<i32>>::KIND, CastKind::Direct);
//! assert_eq!(<[u8; 3] as PixelCast<[i32; 3]>>::KIND, CastKind::ElementWise);
//!
//! let px: [u8; 3] = PixelCast::cast_pixel([300i32, 301, 302]);
//! assert_eq!(px, [44, 45, 46]);
//! ```
//!
//! # Dependencies
//!
//! - [`crate::component`] - Per-component cast grid
//! - [`crate::pixel`] - Pixel trait
//!
//! # Used By
//!
//! - `ndcast-engine` - The conversion kernel applies [`PixelCast::cast_pixel`]

use crate::component::{CastFrom, Component};
use crate::pixel::Pixel;
use half::f16;

/// Which conversion path a (source, destination) pixel pair uses.
///
/// Fixed once per type-pair instantiation; never varies per call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CastKind {
    /// A single native numeric cast converts the whole pixel.
    Direct,
    /// A per-component loop converts each element of a vector pixel.
    ElementWise,
}

/// Pixel-level conversion from a source pixel type.
///
/// `Dst: PixelCast<Src>` is the engine's well-formedness predicate: a
/// conversion between two image types exists exactly when this bound holds.
///
/// # Example
///
/// ```rust
/// use ndcast_core::PixelCast;
///
/// let v: u8 = PixelCast::cast_pixel(300i32);
/// assert_eq!(v, 44);
/// ```
pub trait PixelCast<S: Pixel>: Pixel {
    /// The conversion path for this type pair.
    const KIND: CastKind;

    /// Converts one source pixel.
    fn cast_pixel(src: S) -> Self;
}

/// Implements the direct scalar path for one source type against a row of
/// destinations.
macro_rules! impl_direct_cast_row {
    ($src:ty => $($dst:ty),+ $(,)?) => {
        $(
            impl PixelCast<$src> for $dst {
                const KIND: CastKind = CastKind::Direct;

                #[inline(always)]
                fn cast_pixel(src: $src) -> Self {
                    <$dst as CastFrom<$src>>::cast_from(src)
                }
            }
        )+
    };
}

impl_direct_cast_row!(u8  => u8, u16, u32, u64, i8, i16, i32, i64, f16, f32, f64);
impl_direct_cast_row!(u16 => u8, u16, u32, u64, i8, i16, i32, i64, f16, f32, f64);
impl_direct_cast_row!(u32 => u8, u16, u32, u64, i8, i16, i32, i64, f16, f32, f64);
impl_direct_cast_row!(u64 => u8, u16, u32, u64, i8, i16, i32, i64, f16, f32, f64);
impl_direct_cast_row!(i8  => u8, u16, u32, u64, i8, i16, i32, i64, f16, f32, f64);
impl_direct_cast_row!(i16 => u8, u16, u32, u64, i8, i16, i32, i64, f16, f32, f64);
impl_direct_cast_row!(i32 => u8, u16, u32, u64, i8, i16, i32, i64, f16, f32, f64);
impl_direct_cast_row!(i64 => u8, u16, u32, u64, i8, i16, i32, i64, f16, f32, f64);
impl_direct_cast_row!(f16 => u8, u16, u32, u64, i8, i16, i32, i64, f16, f32, f64);
impl_direct_cast_row!(f32 => u8, u16, u32, u64, i8, i16, i32, i64, f16, f32, f64);
impl_direct_cast_row!(f64 => u8, u16, u32, u64, i8, i16, i32, i64, f16, f32, f64);

/// Element-wise path for vector pixels of matching component count.
///
/// Deliberately absent for mismatched counts; that makes `[S; M] -> [T; N]`
/// with `M != N` fail to compile.
impl<S, T, const N: usize> PixelCast<[S; N]> for [T; N]
where
    S: Component,
    T: Component + CastFrom<S>,
{
    const KIND: CastKind = CastKind::ElementWise;

    #[inline(always)]
    fn cast_pixel(src: [S; N]) -> Self {
        std::array::from_fn(|i| T::cast_from(src[i]))
    }
}
