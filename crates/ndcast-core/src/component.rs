//! Scalar component types for pixel storage.
//!
//! A [`Component`] is one numeric channel of a pixel: the standard unsigned
//! and signed integer widths, `f32`/`f64`, and half-precision [`f16`] from
//! the `half` crate.
//!
//! # Conversion Semantics
//!
//! [`CastFrom`] wires every component pair to the language-native `as`
//! conversion: integer-to-integer conversions truncate (wrap), float-to-int
//! conversions saturate, int-to-float conversions round. Overflow and
//! precision loss are silent and well-defined; they are never reported as
//! errors. `f16` pairs route through `f32`, the narrowest type `as` supports.
//!
//! # Dependencies
//!
//! - `half` crate for `f16` support
//!
//! # Used By
//!
//! - [`crate::pixel`] - Pixel traits build on components
//! - [`crate::cast`] - Per-pair cast dispatch

use half::f16;

/// Trait for scalar pixel component types.
///
/// Implemented for `u8`, `u16`, `u32`, `u64`, `i8`, `i16`, `i32`, `i64`,
/// `f16`, `f32` and `f64`. All implementors are plain numeric types with no
/// invalid bit patterns, which the engine relies on when it reinterprets a
/// buffer for in-place conversion.
///
/// # Example
///
/// ```rust
/// use ndcast_core::Component;
///
/// assert_eq!(u8::BITS_PER_COMPONENT, 8);
/// assert!(!u8::IS_FLOAT);
/// assert!(f32::IS_FLOAT);
/// assert_eq!(i16::ZERO, 0);
/// ```
pub trait Component: Copy + Clone + Default + Send + Sync + PartialOrd + 'static {
    /// Number of bits in this component type.
    const BITS_PER_COMPONENT: u32;

    /// Whether this is a floating-point type.
    const IS_FLOAT: bool;

    /// The zero value.
    const ZERO: Self;
}

/// Native numeric conversion between two component types.
///
/// The single implementation point for the engine's cast semantics: each
/// impl is one `as` conversion, selected at instantiation time. There is no
/// runtime inspection and no dispatch table.
///
/// # Example
///
/// ```rust
/// use ndcast_core::CastFrom;
///
/// // Integer narrowing truncates.
/// assert_eq!(u8::cast_from(300i32), 44);
/// // Float to integer saturates.
/// assert_eq!(i16::cast_from(1.0e9f32), i16::MAX);
/// ```
pub trait CastFrom<S: Component>: Component {
    /// Converts `value` with native numeric cast semantics.
    fn cast_from(value: S) -> Self;
}

macro_rules! impl_component {
    ($($t:ty => $zero:expr, $bits:expr, $float:expr);+ $(;)?) => {
        $(
            impl Component for $t {
                const BITS_PER_COMPONENT: u32 = $bits;
                const IS_FLOAT: bool = $float;
                const ZERO: Self = $zero;
            }
        )+
    };
}

impl_component! {
    u8  => 0, 8, false;
    u16 => 0, 16, false;
    u32 => 0, 32, false;
    u64 => 0, 64, false;
    i8  => 0, 8, false;
    i16 => 0, 16, false;
    i32 => 0, 32, false;
    i64 => 0, 64, false;
    f16 => f16::ZERO, 16, true;
    f32 => 0.0, 32, true;
    f64 => 0.0, 64, true;
}

/// Implements [`CastFrom`] for one source type against a row of
/// destinations, each as a plain `as` conversion.
macro_rules! impl_cast_row {
    ($src:ty => $($dst:ty),+ $(,)?) => {
        $(
            impl CastFrom<$src> for $dst {
                #[inline(always)]
                fn cast_from(value: $src) -> Self {
                    value as $dst
                }
            }
        )+
    };
}

impl_cast_row!(u8  => u8, u16, u32, u64, i8, i16, i32, i64, f32, f64);
impl_cast_row!(u16 => u8, u16, u32, u64, i8, i16, i32, i64, f32, f64);
impl_cast_row!(u32 => u8, u16, u32, u64, i8, i16, i32, i64, f32, f64);
impl_cast_row!(u64 => u8, u16, u32, u64, i8, i16, i32, i64, f32, f64);
impl_cast_row!(i8  => u8, u16, u32, u64, i8, i16, i32, i64, f32, f64);
impl_cast_row!(i16 => u8, u16, u32, u64, i8, i16, i32, i64, f32, f64);
impl_cast_row!(i32 => u8, u16, u32, u64, i8, i16, i32, i64, f32, f64);
impl_cast_row!(i64 => u8, u16, u32, u64, i8, i16, i32, i64, f32, f64);
impl_cast_row!(f32 => u8, u16, u32, u64, i8, i16, i32, i64, f32, f64);
impl_cast_row!(f64 => u8, u16, u32, u64, i8, i16, i32, i64, f32, f64);

/// `f16` has no `as` conversion; both directions route through `f32`.
macro_rules! impl_cast_f16 {
    ($($t:ty),+ $(,)?) => {
        $(
            impl CastFrom<f16> for $t {
                #[inline(always)]
                fn cast_from(value: f16) -> Self {
                    value.to_f32() as $t
                }
            }
            impl CastFrom<$t> for f16 {
                #[inline(always)]
                fn cast_from(value: $t) -> Self {
                    f16::from_f32(value as f32)
                }
            }
        )+
    };
}

impl_cast_f16!(u8, u16, u32, u64, i8, i16, i32, i64, f32, f64);

impl CastFrom<f16> for f16 {
    #[inline(always)]
    fn cast_from(value: f16) -> Self {
        value
    }
}
