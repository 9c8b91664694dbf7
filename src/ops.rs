// THEORY:
// The `ops` module is the top-level API. It turns the free functions of
// `core_modules` into operator syntax:
//
// - `PixelOps` is an extension trait implemented for every `PixelContainer`, so
//   `a.plus(b)`, `a.lt(b)`, `a.as_f32()` and friends read left to right.
// - `+` and `*` are implemented for the crate's own container and view types.
//   The `Output` of each impl is the promoted view type, so
//   `&a + &b` where `a: ArrayImg<i32>` and `b: ArrayImg<u16>` is a lazy view of
//   `i32` chosen at compile time.
//
// Comparisons cannot use `<`: `PartialOrd` must return a plain `bool`, and a
// container comparison returns a container of them. They are methods instead.
// There is also no unary `+` in Rust; `identity` stands in for it.
//
// `RealPixelOps` and the second operator macro give real-coordinate containers
// the same surface. No type is both kinds of container, so the two method sets
// never compete.

use crate::core_modules::arithmetic::{self, PromotedProduct, PromotedSum};
use crate::core_modules::comparison::{self, Comparing};
use crate::core_modules::container::{self, FunctionView};
use crate::core_modules::convert::{self, AsType};
use crate::core_modules::real::{
    self, Raster, RealAsType, RealBinaryView, RealComparing, RealConvertedView, RealFunctionView,
    RealPromotedProduct, RealPromotedSum,
};
use crate::core_modules::view::{FnBiConverter, FnConverter};
use crate::error::Result;
use std::ops::{Add, Mul};

// Re-export the types needed to use the API.
pub use crate::core_modules::container::{ArrayImg, PixelContainer, Scalar};
pub use crate::core_modules::dynamic::{AnyContainer, AnyScalar};
pub use crate::core_modules::interval::Interval;
pub use crate::core_modules::pixel_type::pixel_type::{ElementType, NativeType, PixelType};
pub use crate::core_modules::promotion::{Operator, Promote, promotion_matrix};
pub use crate::core_modules::real::{NearestNeighbor, RealInterval, RealPixelContainer, rasterize};
pub use crate::core_modules::view::{BinaryView, Converter, ConvertedView};
#[cfg(feature = "image")]
pub use crate::core_modules::image_interop::{from_image_buffer, to_image_buffer};

/// Operator methods for every pixel container.
pub trait PixelOps: PixelContainer + Sized {
    fn as_type<U: NativeType>(self) -> AsType<Self, U>
    where
        Self::Pixel: NativeType,
    {
        convert::as_type(self)
    }

    fn as_f64(self) -> AsType<Self, f64>
    where
        Self::Pixel: NativeType,
    {
        convert::as_f64(self)
    }

    fn as_f32(self) -> AsType<Self, f32>
    where
        Self::Pixel: NativeType,
    {
        convert::as_f32(self)
    }

    fn as_i64(self) -> AsType<Self, i64>
    where
        Self::Pixel: NativeType,
    {
        convert::as_i64(self)
    }

    fn as_i32(self) -> AsType<Self, i32>
    where
        Self::Pixel: NativeType,
    {
        convert::as_i32(self)
    }

    fn as_i16(self) -> AsType<Self, i16>
    where
        Self::Pixel: NativeType,
    {
        convert::as_i16(self)
    }

    fn as_i8(self) -> AsType<Self, i8>
    where
        Self::Pixel: NativeType,
    {
        convert::as_i8(self)
    }

    fn as_u64(self) -> AsType<Self, u64>
    where
        Self::Pixel: NativeType,
    {
        convert::as_u64(self)
    }

    fn as_u32(self) -> AsType<Self, u32>
    where
        Self::Pixel: NativeType,
    {
        convert::as_u32(self)
    }

    fn as_u16(self) -> AsType<Self, u16>
    where
        Self::Pixel: NativeType,
    {
        convert::as_u16(self)
    }

    fn as_u8(self) -> AsType<Self, u8>
    where
        Self::Pixel: NativeType,
    {
        convert::as_u8(self)
    }

    /// Applies `f` to every pixel, lazily.
    fn map<F, O>(self, f: F) -> ConvertedView<Self, FnConverter<F>>
    where
        F: Fn(Self::Pixel) -> O,
        O: Copy,
    {
        ConvertedView::new(self, FnConverter(f))
    }

    /// Combines this container with `other` pixel by pixel, lazily.
    fn zip_with<B, F, O>(self, other: B, f: F) -> BinaryView<Self, B, FnBiConverter<F>>
    where
        B: PixelContainer,
        F: Fn(Self::Pixel, B::Pixel) -> O,
        O: Copy,
    {
        BinaryView::new(self, other, FnBiConverter(f))
    }

    fn plus<B>(self, other: B) -> PromotedSum<Self, B>
    where
        B: PixelContainer,
        Self::Pixel: Promote<B::Pixel>,
        B::Pixel: NativeType,
    {
        arithmetic::plus(self, other)
    }

    fn times<B>(self, other: B) -> PromotedProduct<Self, B>
    where
        B: PixelContainer,
        Self::Pixel: Promote<B::Pixel>,
        B::Pixel: NativeType,
    {
        arithmetic::times(self, other)
    }

    fn gt<B>(self, other: B) -> Comparing<Self, B>
    where
        B: PixelContainer,
        Self::Pixel: NativeType,
        B::Pixel: NativeType,
    {
        comparison::gt(self, other)
    }

    fn le<B>(self, other: B) -> Comparing<Self, B>
    where
        B: PixelContainer,
        Self::Pixel: NativeType,
        B::Pixel: NativeType,
    {
        comparison::le(self, other)
    }

    fn lt<B>(self, other: B) -> Comparing<B, Self>
    where
        B: PixelContainer,
        Self::Pixel: NativeType,
        B::Pixel: NativeType,
    {
        comparison::lt(self, other)
    }

    fn ge<B>(self, other: B) -> Comparing<B, Self>
    where
        B: PixelContainer,
        Self::Pixel: NativeType,
        B::Pixel: NativeType,
    {
        comparison::ge(self, other)
    }

    /// Copies every value into new storage.
    fn materialize(&self) -> Result<ArrayImg<Self::Pixel>> {
        container::materialize(self)
    }

    /// Unary plus.
    fn identity(self) -> Self {
        self
    }
}

impl<C: PixelContainer> PixelOps for C {}

macro_rules! impl_pixel_operators {
    ($(impl[$($generics:tt)*] for $ty:ty;)*) => {$(
        impl<$($generics)*, R> Add<R> for $ty
        where
            $ty: PixelContainer,
            R: PixelContainer,
            <$ty as PixelContainer>::Pixel: Promote<<R as PixelContainer>::Pixel>,
            <R as PixelContainer>::Pixel: NativeType,
        {
            type Output = PromotedSum<$ty, R>;

            fn add(self, rhs: R) -> Self::Output {
                arithmetic::plus(self, rhs)
            }
        }

        impl<$($generics)*, R> Mul<R> for $ty
        where
            $ty: PixelContainer,
            R: PixelContainer,
            <$ty as PixelContainer>::Pixel: Promote<<R as PixelContainer>::Pixel>,
            <R as PixelContainer>::Pixel: NativeType,
        {
            type Output = PromotedProduct<$ty, R>;

            fn mul(self, rhs: R) -> Self::Output {
                arithmetic::times(self, rhs)
            }
        }
    )*};
}

impl_pixel_operators! {
    impl[T] for ArrayImg<T>;
    impl['a, T] for &'a ArrayImg<T>;
    impl[T] for Scalar<T>;
    impl[C, F] for ConvertedView<C, F>;
    impl['a, C, F] for &'a ConvertedView<C, F>;
    impl[A, B, F] for BinaryView<A, B, F>;
    impl['a, A, B, F] for &'a BinaryView<A, B, F>;
    impl[F, T] for FunctionView<F, T>;
    impl[C] for Raster<C>;
}

macro_rules! real_conversions {
    ($($name:ident => $ty:ty),* $(,)?) => {$(
        fn $name(self) -> RealAsType<Self, $ty>
        where
            Self::Pixel: NativeType,
        {
            real::as_type(self)
        }
    )*};
}

/// Operator methods for every real-coordinate container.
pub trait RealPixelOps: RealPixelContainer + Sized {
    fn as_type<U: NativeType>(self) -> RealAsType<Self, U>
    where
        Self::Pixel: NativeType,
    {
        real::as_type(self)
    }

    real_conversions! {
        as_f64 => f64,
        as_f32 => f32,
        as_i64 => i64,
        as_i32 => i32,
        as_i16 => i16,
        as_i8 => i8,
        as_u64 => u64,
        as_u32 => u32,
        as_u16 => u16,
        as_u8 => u8,
    }

    fn map<F, O>(self, f: F) -> RealConvertedView<Self, FnConverter<F>>
    where
        F: Fn(Self::Pixel) -> O,
        O: Copy,
    {
        RealConvertedView::new(self, FnConverter(f))
    }

    fn zip_with<B, F, O>(self, other: B, f: F) -> RealBinaryView<Self, B, FnBiConverter<F>>
    where
        B: RealPixelContainer,
        F: Fn(Self::Pixel, B::Pixel) -> O,
        O: Copy,
    {
        RealBinaryView::new(self, other, FnBiConverter(f))
    }

    fn plus<B>(self, other: B) -> RealPromotedSum<Self, B>
    where
        B: RealPixelContainer,
        Self::Pixel: Promote<B::Pixel>,
        B::Pixel: NativeType,
    {
        real::plus(self, other)
    }

    fn times<B>(self, other: B) -> RealPromotedProduct<Self, B>
    where
        B: RealPixelContainer,
        Self::Pixel: Promote<B::Pixel>,
        B::Pixel: NativeType,
    {
        real::times(self, other)
    }

    fn gt<B>(self, other: B) -> RealComparing<Self, B>
    where
        B: RealPixelContainer,
        Self::Pixel: NativeType,
        B::Pixel: NativeType,
    {
        real::gt(self, other)
    }

    fn le<B>(self, other: B) -> RealComparing<Self, B>
    where
        B: RealPixelContainer,
        Self::Pixel: NativeType,
        B::Pixel: NativeType,
    {
        real::le(self, other)
    }

    fn lt<B>(self, other: B) -> RealComparing<B, Self>
    where
        B: RealPixelContainer,
        Self::Pixel: NativeType,
        B::Pixel: NativeType,
    {
        real::lt(self, other)
    }

    fn ge<B>(self, other: B) -> RealComparing<B, Self>
    where
        B: RealPixelContainer,
        Self::Pixel: NativeType,
        B::Pixel: NativeType,
    {
        real::ge(self, other)
    }

    /// Samples the container on the integer coordinates of `interval`.
    fn rasterize(self, interval: Interval) -> Raster<Self> {
        real::rasterize(self, interval)
    }

    fn identity(self) -> Self {
        self
    }
}

impl<C: RealPixelContainer> RealPixelOps for C {}

macro_rules! impl_real_pixel_operators {
    ($(impl[$($generics:tt)*] for $ty:ty;)*) => {$(
        impl<$($generics)*, R> Add<R> for $ty
        where
            $ty: RealPixelContainer,
            R: RealPixelContainer,
            <$ty as RealPixelContainer>::Pixel: Promote<<R as RealPixelContainer>::Pixel>,
            <R as RealPixelContainer>::Pixel: NativeType,
        {
            type Output = RealPromotedSum<$ty, R>;

            fn add(self, rhs: R) -> Self::Output {
                real::plus(self, rhs)
            }
        }

        impl<$($generics)*, R> Mul<R> for $ty
        where
            $ty: RealPixelContainer,
            R: RealPixelContainer,
            <$ty as RealPixelContainer>::Pixel: Promote<<R as RealPixelContainer>::Pixel>,
            <R as RealPixelContainer>::Pixel: NativeType,
        {
            type Output = RealPromotedProduct<$ty, R>;

            fn mul(self, rhs: R) -> Self::Output {
                real::times(self, rhs)
            }
        }
    )*};
}

impl_real_pixel_operators! {
    impl[C, F] for RealConvertedView<C, F>;
    impl['a, C, F] for &'a RealConvertedView<C, F>;
    impl[A, B, F] for RealBinaryView<A, B, F>;
    impl['a, A, B, F] for &'a RealBinaryView<A, B, F>;
    impl[F, T] for RealFunctionView<F, T>;
    impl['a, F, T] for &'a RealFunctionView<F, T>;
    impl[C] for NearestNeighbor<C>;
    impl['a, C] for &'a NearestNeighbor<C>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operators_promote_at_compile_time() {
        let a = ArrayImg::filled(&[2, 2], 5i32).unwrap();
        let b = ArrayImg::filled(&[2, 2], 10u16).unwrap();
        let sum = &a + &b;
        let value: i32 = sum.get(&[1, 1]);
        assert_eq!(value, 15);
    }

    #[test]
    fn views_chain_without_materializing() {
        let a = ArrayImg::from_vec(&[3], vec![1u8, 2, 3]).unwrap();
        let expr = (&a + Scalar(0.5f32)) * Scalar(2i64);
        let out = expr.materialize().unwrap();
        assert_eq!(out.as_slice(), &[3.0f32, 5.0, 7.0]);
    }

    #[test]
    fn comparison_methods_yield_bool_views() {
        let a = ArrayImg::from_vec(&[3], vec![1i16, 5, 9]).unwrap();
        let mask = (&a).gt(Scalar(4u32)).materialize().unwrap();
        assert_eq!(mask.as_slice(), &[false, true, true]);
        let mask = (&a).lt(Scalar(5u8)).materialize().unwrap();
        assert_eq!(mask.as_slice(), &[true, false, false]);
    }

    #[test]
    fn map_and_zip_with() {
        let a = ArrayImg::from_vec(&[2], vec![3u8, 4]).unwrap();
        let b = ArrayImg::from_vec(&[2], vec![1.5f64, 2.0]).unwrap();
        let squared = (&a).map(|v| v as u32 * v as u32);
        assert_eq!(squared.get(&[1]), 16);
        let weighted = (&a).zip_with(&b, |x, w| x as f64 * w);
        assert_eq!(weighted.get(&[0]), 4.5);
    }

    #[test]
    fn identity_is_unchanged() {
        let a = ArrayImg::from_vec(&[2], vec![-1i8, 1]).unwrap();
        assert_eq!(a.clone().identity(), a);
    }

    #[test]
    fn real_operators_share_the_promotion_table() {
        let grid = ArrayImg::from_vec(&[2], vec![1u16, 3]).unwrap();
        let offset = RealFunctionView::new(1, |p: &[f64]| p[0] as i8 - 1);
        let sum = NearestNeighbor::new(&grid) + &offset;
        let value: i32 = sum.get(&[1.2]);
        assert_eq!(value, 3);
        let mask = sum.gt(RealFunctionView::new(1, |_: &[f64]| 2.5f64));
        let samples = mask.rasterize(Interval::from_dimensions(&[2]).unwrap()).materialize().unwrap();
        assert_eq!(samples.as_slice(), &[false, true]);
    }
}
