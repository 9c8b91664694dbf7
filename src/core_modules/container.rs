// THEORY:
// The `container` module defines what a pixel container is: a read-only function
// from an integer coordinate to a pixel value, with an optional bounded domain.
// It deliberately says nothing about where values come from. Three kinds of
// "dumb" sources live here:
//
// 1.  **`ArrayImg`**: materialized storage. A flat `Vec` in first-dimension-fastest
//     order plus the `Interval` it covers. The only container that can be written.
// 2.  **`Scalar`**: a single value repeated over an unbounded domain. Lets a scalar
//     take part in any container operator without a separate code path.
// 3.  **`FunctionView`**: values computed from the coordinate by a closure, e.g. a
//     procedurally generated fractal. Unbounded unless given an interval.
//
// Everything that combines or converts containers (`view`, `arithmetic`,
// `comparison`) is built on the trait alone, so any of these, any reference to
// them, any boxed trait object and any lazy view can be mixed freely.

use crate::core_modules::interval::Interval;
use crate::core_modules::pixel_type::pixel_type::NativeType;
use crate::error::{PixelError, Result};
use std::marker::PhantomData;

/// A read-only, coordinate-indexed source of pixel values.
pub trait PixelContainer {
    type Pixel: Copy;

    fn num_dimensions(&self) -> usize;

    /// The bounded domain, or `None` if the container can be read anywhere.
    fn interval(&self) -> Option<Interval>;

    /// Reads the value at `position`.
    fn get(&self, position: &[i64]) -> Self::Pixel;
}

impl<C: PixelContainer + ?Sized> PixelContainer for &C {
    type Pixel = C::Pixel;

    fn num_dimensions(&self) -> usize {
        (**self).num_dimensions()
    }

    fn interval(&self) -> Option<Interval> {
        (**self).interval()
    }

    #[inline]
    fn get(&self, position: &[i64]) -> Self::Pixel {
        (**self).get(position)
    }
}

impl<C: PixelContainer + ?Sized> PixelContainer for Box<C> {
    type Pixel = C::Pixel;

    fn num_dimensions(&self) -> usize {
        (**self).num_dimensions()
    }

    fn interval(&self) -> Option<Interval> {
        (**self).interval()
    }

    #[inline]
    fn get(&self, position: &[i64]) -> Self::Pixel {
        (**self).get(position)
    }
}

/// Materialized pixel storage over a bounded interval.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayImg<T> {
    /// The coordinates this image covers.
    interval: Interval,
    /// Element stride of each dimension; the first dimension has stride 1.
    strides: Vec<usize>,
    /// Pixel values, first dimension fastest.
    data: Vec<T>,
}

impl<T: NativeType> ArrayImg<T> {
    /// A zero-filled image with its origin at zero.
    pub fn new(dimensions: &[usize]) -> Result<Self> {
        Self::filled(dimensions, T::ZERO)
    }
}

impl<T: Copy> ArrayImg<T> {
    /// An image with every pixel set to `value`.
    pub fn filled(dimensions: &[usize], value: T) -> Result<Self> {
        let interval = Interval::from_dimensions(dimensions)?;
        let data = vec![value; interval.num_elements()];
        Ok(Self::from_parts(interval, data))
    }

    /// Wraps existing pixel data laid out first dimension fastest.
    pub fn from_vec(dimensions: &[usize], data: Vec<T>) -> Result<Self> {
        let interval = Interval::from_dimensions(dimensions)?;
        Self::from_interval(interval, data)
    }

    /// Wraps existing pixel data covering `interval`.
    pub fn from_interval(interval: Interval, data: Vec<T>) -> Result<Self> {
        let expected = interval.num_elements();
        if data.len() != expected {
            return Err(PixelError::LengthMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self::from_parts(interval, data))
    }

    fn from_parts(interval: Interval, data: Vec<T>) -> Self {
        let mut strides = Vec::with_capacity(interval.num_dimensions());
        let mut stride = 1;
        for d in 0..interval.num_dimensions() {
            strides.push(stride);
            stride *= interval.dimension(d);
        }
        Self {
            interval,
            strides,
            data,
        }
    }

    /// Moves the image by `offset`; values keep their relative layout.
    pub fn translate(self, offset: &[i64]) -> Result<Self> {
        let interval = self.interval.translate(offset)?;
        Ok(Self { interval, ..self })
    }

    pub fn dimensions(&self) -> Vec<usize> {
        self.interval.dimensions()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    /// Writes the value at `position`.
    ///
    /// # Panics
    /// Panics if `position` lies outside the image.
    pub fn set(&mut self, position: &[i64], value: T) {
        let index = self.index(position);
        self.data[index] = value;
    }

    fn index(&self, position: &[i64]) -> usize {
        assert!(
            self.interval.contains(position),
            "position {position:?} outside of {:?}",
            self.interval
        );
        position
            .iter()
            .zip(self.interval.min())
            .zip(&self.strides)
            .map(|((p, min), stride)| (p - min) as usize * stride)
            .sum()
    }
}

impl<T: Copy> PixelContainer for ArrayImg<T> {
    type Pixel = T;

    fn num_dimensions(&self) -> usize {
        self.interval.num_dimensions()
    }

    fn interval(&self) -> Option<Interval> {
        Some(self.interval.clone())
    }

    /// # Panics
    /// Panics if `position` lies outside the image.
    #[inline]
    fn get(&self, position: &[i64]) -> T {
        self.data[self.index(position)]
    }
}

/// A constant value over an unbounded domain of any dimensionality.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scalar<T>(pub T);

impl<T: Copy> PixelContainer for Scalar<T> {
    type Pixel = T;

    fn num_dimensions(&self) -> usize {
        0
    }

    fn interval(&self) -> Option<Interval> {
        None
    }

    #[inline]
    fn get(&self, _position: &[i64]) -> T {
        self.0
    }
}

/// A container whose value at each coordinate is computed by a closure.
pub struct FunctionView<F, T> {
    num_dimensions: usize,
    interval: Option<Interval>,
    function: F,
    _pixel: PhantomData<fn() -> T>,
}

impl<F, T> FunctionView<F, T>
where
    F: Fn(&[i64]) -> T,
    T: Copy,
{
    /// An unbounded container of the given dimensionality.
    pub fn new(num_dimensions: usize, function: F) -> Self {
        Self {
            num_dimensions,
            interval: None,
            function,
            _pixel: PhantomData,
        }
    }

    /// Restricts the view to `interval`, taking its dimensionality.
    pub fn bounded(self, interval: Interval) -> Self {
        Self {
            num_dimensions: interval.num_dimensions(),
            interval: Some(interval),
            ..self
        }
    }
}

impl<F, T> PixelContainer for FunctionView<F, T>
where
    F: Fn(&[i64]) -> T,
    T: Copy,
{
    type Pixel = T;

    fn num_dimensions(&self) -> usize {
        self.num_dimensions
    }

    fn interval(&self) -> Option<Interval> {
        self.interval.clone()
    }

    #[inline]
    fn get(&self, position: &[i64]) -> T {
        (self.function)(position)
    }
}

/// Copies every value of a bounded container into new storage.
pub fn materialize<C: PixelContainer + ?Sized>(container: &C) -> Result<ArrayImg<C::Pixel>> {
    let interval = container.interval().ok_or(PixelError::UnboundedDomain)?;
    log::debug!(
        "materializing {} pixels over {:?}",
        interval.num_elements(),
        interval.dimensions()
    );
    let data = interval.positions().map(|position| container.get(&position)).collect();
    ArrayImg::from_interval(interval, data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn array_img_is_first_dimension_fastest() {
        let img = ArrayImg::from_vec(&[3, 2], vec![1u8, 2, 3, 4, 5, 6]).unwrap();
        assert_eq!(img.get(&[0, 0]), 1);
        assert_eq!(img.get(&[2, 0]), 3);
        assert_eq!(img.get(&[0, 1]), 4);
        assert_eq!(img.get(&[2, 1]), 6);
    }

    #[test]
    fn array_img_rejects_wrong_length() {
        let error = ArrayImg::from_vec(&[2, 2], vec![0i32; 3]).unwrap_err();
        assert_eq!(error, PixelError::LengthMismatch { expected: 4, actual: 3 });
    }

    #[test]
    fn set_then_get() {
        let mut img = ArrayImg::<f32>::new(&[4, 4]).unwrap();
        img.set(&[1, 2], 7.5);
        assert_eq!(img.get(&[1, 2]), 7.5);
        assert_eq!(img.get(&[2, 1]), 0.0);
    }

    #[test]
    fn translated_image_reads_at_shifted_coordinates() {
        let img = ArrayImg::from_vec(&[2], vec![10i16, 20]).unwrap().translate(&[-5]).unwrap();
        assert_eq!(img.get(&[-5]), 10);
        assert_eq!(img.get(&[-4]), 20);
    }

    #[test]
    #[should_panic(expected = "outside of")]
    fn get_outside_panics() {
        let img = ArrayImg::<u8>::new(&[2, 2]).unwrap();
        img.get(&[2, 0]);
    }

    #[test]
    fn scalar_is_unbounded() {
        let scalar = Scalar(3u16);
        assert_eq!(scalar.interval(), None);
        assert_eq!(scalar.get(&[100, -100, 7]), 3);
    }

    #[test]
    fn function_view_materializes_when_bounded() {
        let view = FunctionView::new(2, |p: &[i64]| p[0] * 10 + p[1]);
        assert_eq!(materialize(&view).unwrap_err(), PixelError::UnboundedDomain);

        let bounded = view.bounded(Interval::from_dimensions(&[2, 2]).unwrap());
        let img = materialize(&bounded).unwrap();
        assert_eq!(img.as_slice(), &[0, 10, 1, 11]);
    }

    #[test]
    fn boxed_trait_objects_are_containers() {
        let img = ArrayImg::filled(&[2], 9u32).unwrap();
        let boxed: Box<dyn PixelContainer<Pixel = u32>> = Box::new(img);
        assert_eq!(boxed.get(&[1]), 9);
        assert_eq!(boxed.num_dimensions(), 1);
    }
}
