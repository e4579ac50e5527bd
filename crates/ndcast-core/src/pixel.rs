//! Pixel types for N-dimensional image buffers.
//!
//! A [`Pixel`] is one addressable element of an image: either a scalar
//! [`Component`](crate::Component) or a fixed-length vector of components
//! (`[T; N]`). The trait is a compile-time descriptor; nothing here is
//! allocated or inspected at run time.
//!
//! # Types
//!
//! - [`Pixel`] - Trait describing a pixel's component type and count
//! - [`PixelLayout`] - Storage descriptor (component count and byte width)
//!
//! # Design
//!
//! Scalars are 1-component pixels. Arrays `[T; N]` are N-component vector
//! pixels whose components are stored in order. Because component count is
//! part of the type, mismatched vector shapes are unrepresentable in the
//! cast dispatch (see [`crate::cast`]): the program simply fails to compile.
//!
//! # Dependencies
//!
//! - [`crate::component::Component`] - Scalar component trait
//!
//! # Used By
//!
//! - [`crate::image::Image`] - Buffers store pixels
//! - [`crate::cast`] - Cast dispatch between pixel types
//! - `ndcast-engine` - Kernel iteration and in-place layout checks

use crate::component::Component;
use half::f16;

/// Storage descriptor for a pixel type.
///
/// Derived from a [`Pixel`] implementation via [`Pixel::layout`]; used by
/// the in-place buffer policy to compare source and destination storage.
///
/// # Example
///
/// ```rust
/// use ndcast_core::{Pixel, PixelLayout};
///
/// let layout = <[u16; 3]>::layout();
/// assert_eq!(layout.components, 3);
/// assert_eq!(layout.component_bytes, 2);
/// assert_eq!(layout.pixel_bytes(), 6);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PixelLayout {
    /// Number of components per pixel.
    pub components: usize,
    /// Byte width of one component.
    pub component_bytes: usize,
}

impl PixelLayout {
    /// Total byte width of one pixel.
    #[inline]
    pub const fn pixel_bytes(&self) -> usize {
        self.components * self.component_bytes
    }
}

/// Trait for pixel storage types.
///
/// Implemented for every [`Component`](crate::Component) scalar and for
/// component arrays `[T; N]`.
///
/// # Example
///
/// ```rust
/// use ndcast_core::Pixel;
///
/// assert_eq!(<i32 as Pixel>::COMPONENTS, 1);
/// assert_eq!(<[u8; 4] as Pixel>::COMPONENTS, 4);
/// ```
pub trait Pixel: Copy + Clone + Send + Sync + 'static {
    /// The scalar component type.
    type Component: Component;

    /// Number of components per pixel.
    const COMPONENTS: usize;

    /// The all-zero pixel, used to initialize fresh buffers.
    const ZERO: Self;

    /// Returns the storage descriptor for this pixel type.
    #[inline]
    fn layout() -> PixelLayout {
        PixelLayout {
            components: Self::COMPONENTS,
            component_bytes: std::mem::size_of::<Self::Component>(),
        }
    }
}

macro_rules! impl_scalar_pixel {
    ($($t:ty),+ $(,)?) => {
        $(
            impl Pixel for $t {
                type Component = $t;
                const COMPONENTS: usize = 1;
                const ZERO: Self = <$t as Component>::ZERO;
            }
        )+
    };
}

impl_scalar_pixel!(u8, u16, u32, u64, i8, i16, i32, i64, f16, f32, f64);

impl<T: Component, const N: usize> Pixel for [T; N] {
    type Component = T;
    const COMPONENTS: usize = N;
    const ZERO: Self = [T::ZERO; N];
}
