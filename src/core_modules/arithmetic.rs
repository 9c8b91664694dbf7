// THEORY:
// Pixel-wise `+` and `*`. Each operator has two entry points:
//
// - `plus_same` / `times_same`: both operands already share an element type. The
//   operator is applied directly to the values read from the sources.
// - `plus` / `times`: operands of any two numeric types. The result type is looked
//   up in the compile-time promotion table (`Promote`), both operands are viewed
//   as that type with `as_type`, and the same-type path is applied to the views.
//
// There is one generic function per operator, not one per type pair: the pair is
// a type parameter and the table lookup is trait resolution. When the operand
// types already agree the `as_type` views are identity casts, so the promoted
// path costs the same as the direct one.

use crate::core_modules::container::PixelContainer;
use crate::core_modules::convert::{AsType, as_type};
use crate::core_modules::pixel_type::pixel_type::NativeType;
use crate::core_modules::promotion::Promote;
use crate::core_modules::view::{BiConverter, BinaryView};
use std::marker::PhantomData;

/// Same-type `+` with the element type's overflow semantics.
pub struct Sum<T>(PhantomData<fn() -> T>);

/// Same-type `*` with the element type's overflow semantics.
pub struct Product<T>(PhantomData<fn() -> T>);

impl<T> Sum<T> {
    pub fn new() -> Self {
        Self(PhantomData)
    }
}

impl<T> Default for Sum<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Product<T> {
    pub fn new() -> Self {
        Self(PhantomData)
    }
}

impl<T> Default for Product<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: NativeType> BiConverter<T, T> for Sum<T> {
    type Output = T;

    #[inline]
    fn convert(&self, lhs: T, rhs: T) -> T {
        lhs.pixel_add(rhs)
    }
}

impl<T: NativeType> BiConverter<T, T> for Product<T> {
    type Output = T;

    #[inline]
    fn convert(&self, lhs: T, rhs: T) -> T {
        lhs.pixel_mul(rhs)
    }
}

/// The element type of `A op B` after promotion.
pub type Promoted<A, B> =
    <<A as PixelContainer>::Pixel as Promote<<B as PixelContainer>::Pixel>>::Output;

/// The view produced by `plus(a, b)`.
pub type PromotedSum<A, B> =
    BinaryView<AsType<A, Promoted<A, B>>, AsType<B, Promoted<A, B>>, Sum<Promoted<A, B>>>;

/// The view produced by `times(a, b)`.
pub type PromotedProduct<A, B> =
    BinaryView<AsType<A, Promoted<A, B>>, AsType<B, Promoted<A, B>>, Product<Promoted<A, B>>>;

/// `lhs + rhs` for operands of the same element type.
pub fn plus_same<A, B, T>(lhs: A, rhs: B) -> BinaryView<A, B, Sum<T>>
where
    A: PixelContainer<Pixel = T>,
    B: PixelContainer<Pixel = T>,
    T: NativeType,
{
    BinaryView::new(lhs, rhs, Sum::new())
}

/// `lhs * rhs` for operands of the same element type.
pub fn times_same<A, B, T>(lhs: A, rhs: B) -> BinaryView<A, B, Product<T>>
where
    A: PixelContainer<Pixel = T>,
    B: PixelContainer<Pixel = T>,
    T: NativeType,
{
    BinaryView::new(lhs, rhs, Product::new())
}

/// `lhs + rhs`, computed in the promoted element type.
pub fn plus<A, B>(lhs: A, rhs: B) -> PromotedSum<A, B>
where
    A: PixelContainer,
    B: PixelContainer,
    A::Pixel: Promote<B::Pixel>,
    B::Pixel: NativeType,
{
    plus_same(as_type(lhs), as_type(rhs))
}

/// `lhs * rhs`, computed in the promoted element type.
pub fn times<A, B>(lhs: A, rhs: B) -> PromotedProduct<A, B>
where
    A: PixelContainer,
    B: PixelContainer,
    A::Pixel: Promote<B::Pixel>,
    B::Pixel: NativeType,
{
    times_same(as_type(lhs), as_type(rhs))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_modules::container::{ArrayImg, Scalar};

    #[test]
    fn mixed_signed_and_narrower_unsigned_keeps_signed_width() {
        let a = ArrayImg::filled(&[1], 5i32).unwrap();
        let b = ArrayImg::filled(&[1], 10u16).unwrap();
        let sum = plus(&a, &b);
        let value: i32 = sum.get(&[0]);
        assert_eq!(value, 15);
    }

    #[test]
    fn real_times_integer_is_real() {
        let a = ArrayImg::filled(&[1], 2.5f64).unwrap();
        let b = ArrayImg::filled(&[1], 4i32).unwrap();
        let product: f64 = times(&a, &b).get(&[0]);
        assert_eq!(product, 10.0);
    }

    #[test]
    fn same_type_paths_agree() {
        let a = ArrayImg::from_vec(&[3], vec![250u8, 1, 7]).unwrap();
        let b = ArrayImg::from_vec(&[3], vec![10u8, 2, 9]).unwrap();
        for x in 0..3 {
            assert_eq!(plus_same(&a, &b).get(&[x]), plus(&a, &b).get(&[x]));
            assert_eq!(times_same(&a, &b).get(&[x]), times(&a, &b).get(&[x]));
        }
        assert_eq!(plus_same(&a, &b).get(&[0]), 4);
    }

    #[test]
    fn signed_and_equal_width_unsigned_widen() {
        let a = ArrayImg::filled(&[1], i32::MAX).unwrap();
        let b = ArrayImg::filled(&[1], u32::MAX).unwrap();
        let sum: i64 = plus(&a, &b).get(&[0]);
        assert_eq!(sum, i32::MAX as i64 + u32::MAX as i64);
    }

    #[test]
    fn scalar_operand() {
        let img = ArrayImg::from_vec(&[2], vec![1.5f32, -1.0]).unwrap();
        let shifted = plus(&img, Scalar(2u8));
        assert_eq!(shifted.get(&[0]), 3.5f32);
        assert_eq!(shifted.get(&[1]), 1.0f32);
        assert_eq!(shifted.interval(), img.interval());
    }
}
