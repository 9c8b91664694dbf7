// THEORY:
// Lazy views are the two primitives every operator in the crate is built from:
//
// - `ConvertedView`: value at `x` is `g(a(x))`. Used for type conversion
//   (`TypeConverter`) and for arbitrary per-pixel mapping (`FnConverter`).
// - `BinaryView`: value at `x` is `f(a(x), b(x))`. Used for `+`, `*`, the
//   comparisons, and arbitrary pairwise combination (`FnBiConverter`).
//
// Views own their sources. Passing `&img` instead of `img` makes the view borrow,
// and the borrow checker then guarantees the source outlives the view. Nothing is
// cached: every `get` reads the sources again, and no view holds mutable state, so
// a view is `Send`/`Sync` exactly when its sources and converter are.
//
// Converters are small named types rather than closures wherever the crate itself
// builds the view. That keeps the full type of a view nameable, which the
// `std::ops` impls need for their `Output` types.

use crate::core_modules::container::PixelContainer;
use crate::core_modules::interval::Interval;
use crate::core_modules::pixel_type::pixel_type::{NativeType, cast};
use std::marker::PhantomData;

/// Maps one pixel value to another.
pub trait Converter<S> {
    type Output: Copy;

    fn convert(&self, value: S) -> Self::Output;
}

/// Maps a pair of pixel values to one.
pub trait BiConverter<L, R> {
    type Output: Copy;

    fn convert(&self, lhs: L, rhs: R) -> Self::Output;
}

/// Converts any pixel type to `T` with `cast`.
pub struct TypeConverter<T>(PhantomData<fn() -> T>);

impl<T> TypeConverter<T> {
    pub fn new() -> Self {
        Self(PhantomData)
    }
}

impl<T> Default for TypeConverter<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: NativeType, T: NativeType> Converter<S> for TypeConverter<T> {
    type Output = T;

    #[inline]
    fn convert(&self, value: S) -> T {
        cast(value)
    }
}

/// Adapts a closure into a `Converter`.
pub struct FnConverter<F>(pub F);

impl<S, O, F> Converter<S> for FnConverter<F>
where
    F: Fn(S) -> O,
    O: Copy,
{
    type Output = O;

    #[inline]
    fn convert(&self, value: S) -> O {
        (self.0)(value)
    }
}

/// Adapts a closure into a `BiConverter`.
pub struct FnBiConverter<F>(pub F);

impl<L, R, O, F> BiConverter<L, R> for FnBiConverter<F>
where
    F: Fn(L, R) -> O,
    O: Copy,
{
    type Output = O;

    #[inline]
    fn convert(&self, lhs: L, rhs: R) -> O {
        (self.0)(lhs, rhs)
    }
}

/// A lazy view whose value at each coordinate is `converter(source(x))`.
pub struct ConvertedView<C, F> {
    source: C,
    converter: F,
}

impl<C, F> ConvertedView<C, F>
where
    C: PixelContainer,
    F: Converter<C::Pixel>,
{
    pub fn new(source: C, converter: F) -> Self {
        Self { source, converter }
    }

    pub fn source(&self) -> &C {
        &self.source
    }
}

impl<C, F> PixelContainer for ConvertedView<C, F>
where
    C: PixelContainer,
    F: Converter<C::Pixel>,
{
    type Pixel = F::Output;

    fn num_dimensions(&self) -> usize {
        self.source.num_dimensions()
    }

    fn interval(&self) -> Option<Interval> {
        self.source.interval()
    }

    #[inline]
    fn get(&self, position: &[i64]) -> F::Output {
        self.converter.convert(self.source.get(position))
    }
}

/// A lazy view whose value at each coordinate is `converter(lhs(x), rhs(x))`.
///
/// The domain is the first bounded operand's interval; operands are expected to
/// share a domain and this is not checked.
pub struct BinaryView<A, B, F> {
    lhs: A,
    rhs: B,
    converter: F,
}

impl<A, B, F> BinaryView<A, B, F>
where
    A: PixelContainer,
    B: PixelContainer,
    F: BiConverter<A::Pixel, B::Pixel>,
{
    pub fn new(lhs: A, rhs: B, converter: F) -> Self {
        Self { lhs, rhs, converter }
    }
}

impl<A, B, F> PixelContainer for BinaryView<A, B, F>
where
    A: PixelContainer,
    B: PixelContainer,
    F: BiConverter<A::Pixel, B::Pixel>,
{
    type Pixel = F::Output;

    fn num_dimensions(&self) -> usize {
        self.lhs.num_dimensions().max(self.rhs.num_dimensions())
    }

    fn interval(&self) -> Option<Interval> {
        self.lhs.interval().or_else(|| self.rhs.interval())
    }

    #[inline]
    fn get(&self, position: &[i64]) -> F::Output {
        self.converter
            .convert(self.lhs.get(position), self.rhs.get(position))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_modules::container::{ArrayImg, Scalar};

    #[test]
    fn converted_view_reads_through() {
        let img = ArrayImg::from_vec(&[3], vec![1u8, 2, 3]).unwrap();
        let doubled = ConvertedView::new(&img, FnConverter(|v: u8| v as u32 * 2));
        assert_eq!(doubled.get(&[2]), 6);
        assert_eq!(doubled.interval(), img.interval());
    }

    #[test]
    fn converted_view_is_not_cached() {
        let mut img = ArrayImg::from_vec(&[1], vec![1i32]).unwrap();
        {
            let view = ConvertedView::new(&img, TypeConverter::<f64>::new());
            assert_eq!(view.get(&[0]), 1.0);
        }
        img.set(&[0], 5);
        let view = ConvertedView::new(&img, TypeConverter::<f64>::new());
        assert_eq!(view.get(&[0]), 5.0);
    }

    #[test]
    fn binary_view_takes_domain_from_bounded_operand() {
        let img = ArrayImg::from_vec(&[2], vec![1i64, 2]).unwrap();
        let view = BinaryView::new(Scalar(10i64), &img, FnBiConverter(|a: i64, b: i64| a - b));
        assert_eq!(view.interval(), img.interval());
        assert_eq!(view.num_dimensions(), 1);
        assert_eq!(view.get(&[1]), 8);
    }
}
