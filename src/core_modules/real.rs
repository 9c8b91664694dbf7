// THEORY:
// Real-coordinate containers. A `PixelContainer` is read at integer coordinates;
// a `RealPixelContainer` is read at any point of continuous space. Typical
// sources are analytic functions (a fractal, a gradient) and pixel grids seen
// through an interpolator.
//
// The family mirrors the integer one piece for piece and shares everything that
// is not about coordinates:
//
// - the same `Converter`/`BiConverter` converters, so `TypeConverter`, `Sum`,
//   `Product` and `Compare` work unchanged;
// - the same `Promote` table, so `plus`/`times` pick the same result type for
//   the same pair of element types;
// - the same comparison space and `lt`/`ge` duals.
//
// Only the coordinate type differs, so the views are separate structs
// (`RealConvertedView`, `RealBinaryView`) rather than one view generic over the
// coordinate. Crossing between the families is explicit: `NearestNeighbor`
// lifts a pixel grid into real space, `Raster` samples a real container at the
// coordinates of an `Interval` so it can be materialized.

use crate::core_modules::arithmetic::{Product, Sum};
use crate::core_modules::comparison::{Compare, Comparison};
use crate::core_modules::container::PixelContainer;
use crate::core_modules::interval::Interval;
use crate::core_modules::pixel_type::pixel_type::NativeType;
use crate::core_modules::promotion::Promote;
use crate::core_modules::view::{BiConverter, Converter, TypeConverter};
use crate::error::{PixelError, Result};
use std::marker::PhantomData;

/// An inclusive box of real coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct RealInterval {
    min: Vec<f64>,
    max: Vec<f64>,
}

impl RealInterval {
    /// Fails if the corners differ in rank, or a bound is NaN or inverted.
    pub fn new(min: Vec<f64>, max: Vec<f64>) -> Result<Self> {
        if min.len() != max.len() {
            return Err(PixelError::DimensionMismatch {
                expected: min.len(),
                actual: max.len(),
            });
        }
        let invalid = |(lo, hi): (&f64, &f64)| lo.is_nan() || hi.is_nan() || lo > hi;
        if let Some(dimension) = min.iter().zip(&max).position(invalid) {
            return Err(PixelError::InvalidRealInterval { dimension });
        }
        Ok(Self { min, max })
    }

    pub fn num_dimensions(&self) -> usize {
        self.min.len()
    }

    pub fn min(&self) -> &[f64] {
        &self.min
    }

    pub fn max(&self) -> &[f64] {
        &self.max
    }

    pub fn contains(&self, position: &[f64]) -> bool {
        position.len() == self.num_dimensions()
            && position
                .iter()
                .zip(self.min.iter().zip(&self.max))
                .all(|(p, (lo, hi))| lo <= p && p <= hi)
    }
}

impl From<&Interval> for RealInterval {
    fn from(interval: &Interval) -> Self {
        Self {
            min: interval.min().iter().map(|&v| v as f64).collect(),
            max: interval.max().iter().map(|&v| v as f64).collect(),
        }
    }
}

/// A read-only source of pixel values addressed by real coordinates.
pub trait RealPixelContainer {
    type Pixel: Copy;

    fn num_dimensions(&self) -> usize;

    /// The bounded domain, or `None` if the container can be read anywhere.
    fn real_interval(&self) -> Option<RealInterval>;

    fn get(&self, position: &[f64]) -> Self::Pixel;
}

impl<C: RealPixelContainer + ?Sized> RealPixelContainer for &C {
    type Pixel = C::Pixel;

    fn num_dimensions(&self) -> usize {
        (**self).num_dimensions()
    }

    fn real_interval(&self) -> Option<RealInterval> {
        (**self).real_interval()
    }

    #[inline]
    fn get(&self, position: &[f64]) -> Self::Pixel {
        (**self).get(position)
    }
}

impl<C: RealPixelContainer + ?Sized> RealPixelContainer for Box<C> {
    type Pixel = C::Pixel;

    fn num_dimensions(&self) -> usize {
        (**self).num_dimensions()
    }

    fn real_interval(&self) -> Option<RealInterval> {
        (**self).real_interval()
    }

    #[inline]
    fn get(&self, position: &[f64]) -> Self::Pixel {
        (**self).get(position)
    }
}

/// Values computed from a real coordinate by a closure.
pub struct RealFunctionView<F, T> {
    num_dimensions: usize,
    interval: Option<RealInterval>,
    function: F,
    _pixel: PhantomData<fn() -> T>,
}

impl<F, T> RealFunctionView<F, T>
where
    F: Fn(&[f64]) -> T,
    T: Copy,
{
    pub fn new(num_dimensions: usize, function: F) -> Self {
        Self {
            num_dimensions,
            interval: None,
            function,
            _pixel: PhantomData,
        }
    }

    pub fn bounded(self, interval: RealInterval) -> Self {
        Self {
            num_dimensions: interval.num_dimensions(),
            interval: Some(interval),
            ..self
        }
    }
}

impl<F, T> RealPixelContainer for RealFunctionView<F, T>
where
    F: Fn(&[f64]) -> T,
    T: Copy,
{
    type Pixel = T;

    fn num_dimensions(&self) -> usize {
        self.num_dimensions
    }

    fn real_interval(&self) -> Option<RealInterval> {
        self.interval.clone()
    }

    #[inline]
    fn get(&self, position: &[f64]) -> T {
        (self.function)(position)
    }
}

/// A pixel grid read at real coordinates by taking the nearest pixel.
///
/// Coordinates round half up. A bounded source is extended at its border:
/// positions outside it read the closest edge pixel.
pub struct NearestNeighbor<C> {
    source: C,
    interval: Option<Interval>,
}

impl<C: PixelContainer> NearestNeighbor<C> {
    pub fn new(source: C) -> Self {
        let interval = source.interval();
        Self { source, interval }
    }
}

impl<C: PixelContainer> RealPixelContainer for NearestNeighbor<C> {
    type Pixel = C::Pixel;

    fn num_dimensions(&self) -> usize {
        self.source.num_dimensions()
    }

    fn real_interval(&self) -> Option<RealInterval> {
        self.interval.as_ref().map(RealInterval::from)
    }

    fn get(&self, position: &[f64]) -> C::Pixel {
        let nearest: Vec<i64> = position
            .iter()
            .enumerate()
            .map(|(d, &x)| {
                let p = (x + 0.5).floor() as i64;
                match &self.interval {
                    Some(interval) => p.clamp(interval.min()[d], interval.max()[d]),
                    None => p,
                }
            })
            .collect();
        self.source.get(&nearest)
    }
}

/// A real container sampled on the integer grid of an `Interval`.
///
/// Grid coordinate `x` reads the source at `origin + x * spacing`, per
/// dimension. Without `scaled` the grid and the real coordinates coincide.
pub struct Raster<C> {
    source: C,
    interval: Interval,
    origin: Vec<f64>,
    spacing: Vec<f64>,
}

impl<C: RealPixelContainer> Raster<C> {
    pub fn new(source: C, interval: Interval) -> Self {
        let n = interval.num_dimensions();
        Self {
            source,
            interval,
            origin: vec![0.0; n],
            spacing: vec![1.0; n],
        }
    }

    /// Places the grid at `origin` with `spacing` between neighbouring samples.
    pub fn scaled(self, origin: Vec<f64>, spacing: Vec<f64>) -> Result<Self> {
        let expected = self.interval.num_dimensions();
        for actual in [origin.len(), spacing.len()] {
            if actual != expected {
                return Err(PixelError::DimensionMismatch { expected, actual });
            }
        }
        Ok(Self {
            origin,
            spacing,
            ..self
        })
    }
}

impl<C: RealPixelContainer> PixelContainer for Raster<C> {
    type Pixel = C::Pixel;

    fn num_dimensions(&self) -> usize {
        self.interval.num_dimensions()
    }

    fn interval(&self) -> Option<Interval> {
        Some(self.interval.clone())
    }

    fn get(&self, position: &[i64]) -> C::Pixel {
        let real: Vec<f64> = position
            .iter()
            .zip(self.origin.iter().zip(&self.spacing))
            .map(|(&x, (o, s))| o + x as f64 * s)
            .collect();
        self.source.get(&real)
    }
}

/// Samples `source` on the integer coordinates of `interval`.
pub fn rasterize<C: RealPixelContainer>(source: C, interval: Interval) -> Raster<C> {
    Raster::new(source, interval)
}

/// A lazy real view whose value at each point is `converter(source(x))`.
pub struct RealConvertedView<C, F> {
    source: C,
    converter: F,
}

impl<C, F> RealConvertedView<C, F>
where
    C: RealPixelContainer,
    F: Converter<C::Pixel>,
{
    pub fn new(source: C, converter: F) -> Self {
        Self { source, converter }
    }
}

impl<C, F> RealPixelContainer for RealConvertedView<C, F>
where
    C: RealPixelContainer,
    F: Converter<C::Pixel>,
{
    type Pixel = F::Output;

    fn num_dimensions(&self) -> usize {
        self.source.num_dimensions()
    }

    fn real_interval(&self) -> Option<RealInterval> {
        self.source.real_interval()
    }

    #[inline]
    fn get(&self, position: &[f64]) -> F::Output {
        self.converter.convert(self.source.get(position))
    }
}

/// A lazy real view whose value at each point is `converter(lhs(x), rhs(x))`.
/// The domain is the first bounded operand's.
pub struct RealBinaryView<A, B, F> {
    lhs: A,
    rhs: B,
    converter: F,
}

impl<A, B, F> RealBinaryView<A, B, F>
where
    A: RealPixelContainer,
    B: RealPixelContainer,
    F: BiConverter<A::Pixel, B::Pixel>,
{
    pub fn new(lhs: A, rhs: B, converter: F) -> Self {
        Self { lhs, rhs, converter }
    }
}

impl<A, B, F> RealPixelContainer for RealBinaryView<A, B, F>
where
    A: RealPixelContainer,
    B: RealPixelContainer,
    F: BiConverter<A::Pixel, B::Pixel>,
{
    type Pixel = F::Output;

    fn num_dimensions(&self) -> usize {
        self.lhs.num_dimensions().max(self.rhs.num_dimensions())
    }

    fn real_interval(&self) -> Option<RealInterval> {
        self.lhs.real_interval().or_else(|| self.rhs.real_interval())
    }

    #[inline]
    fn get(&self, position: &[f64]) -> F::Output {
        self.converter
            .convert(self.lhs.get(position), self.rhs.get(position))
    }
}

/// A real container viewed as element type `U`.
pub type RealAsType<C, U> = RealConvertedView<C, TypeConverter<U>>;

/// The element type of `A op B` after promotion.
pub type RealPromoted<A, B> =
    <<A as RealPixelContainer>::Pixel as Promote<<B as RealPixelContainer>::Pixel>>::Output;

pub type RealPromotedSum<A, B> = RealBinaryView<
    RealAsType<A, RealPromoted<A, B>>,
    RealAsType<B, RealPromoted<A, B>>,
    Sum<RealPromoted<A, B>>,
>;

pub type RealPromotedProduct<A, B> = RealBinaryView<
    RealAsType<A, RealPromoted<A, B>>,
    RealAsType<B, RealPromoted<A, B>>,
    Product<RealPromoted<A, B>>,
>;

pub type RealComparing<A, B> = RealBinaryView<A, B, Compare>;

pub fn as_type<C, U>(container: C) -> RealAsType<C, U>
where
    C: RealPixelContainer,
    C::Pixel: NativeType,
    U: NativeType,
{
    RealConvertedView::new(container, TypeConverter::new())
}

pub fn plus<A, B>(lhs: A, rhs: B) -> RealPromotedSum<A, B>
where
    A: RealPixelContainer,
    B: RealPixelContainer,
    A::Pixel: Promote<B::Pixel>,
    B::Pixel: NativeType,
{
    RealBinaryView::new(as_type(lhs), as_type(rhs), Sum::new())
}

pub fn times<A, B>(lhs: A, rhs: B) -> RealPromotedProduct<A, B>
where
    A: RealPixelContainer,
    B: RealPixelContainer,
    A::Pixel: Promote<B::Pixel>,
    B::Pixel: NativeType,
{
    RealBinaryView::new(as_type(lhs), as_type(rhs), Product::new())
}

pub fn gt<A, B>(lhs: A, rhs: B) -> RealComparing<A, B>
where
    A: RealPixelContainer,
    B: RealPixelContainer,
    A::Pixel: NativeType,
    B::Pixel: NativeType,
{
    RealBinaryView::new(lhs, rhs, Compare(Comparison::Greater))
}

pub fn le<A, B>(lhs: A, rhs: B) -> RealComparing<A, B>
where
    A: RealPixelContainer,
    B: RealPixelContainer,
    A::Pixel: NativeType,
    B::Pixel: NativeType,
{
    RealBinaryView::new(lhs, rhs, Compare(Comparison::LessOrEqual))
}

/// `lhs < rhs`, evaluated as `rhs > lhs`.
pub fn lt<A, B>(lhs: A, rhs: B) -> RealComparing<B, A>
where
    A: RealPixelContainer,
    B: RealPixelContainer,
    A::Pixel: NativeType,
    B::Pixel: NativeType,
{
    gt(rhs, lhs)
}

/// `lhs >= rhs`, evaluated as `rhs <= lhs`.
pub fn ge<A, B>(lhs: A, rhs: B) -> RealComparing<B, A>
where
    A: RealPixelContainer,
    B: RealPixelContainer,
    A::Pixel: NativeType,
    B::Pixel: NativeType,
{
    le(rhs, lhs)
}
