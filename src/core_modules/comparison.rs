// THEORY:
// Pixel-wise comparisons. The result element type is always `bool`, whatever the
// operand types.
//
// Only two comparisons are primitive: `gt` and `le`. The other two are defined by
// swapping operands, `lt(a, b) := gt(b, a)` and `ge(a, b) := le(b, a)`, so each
// dual pair shares one code path and cannot disagree.
//
// The comparison space is chosen from the operand types, not from the promotion
// table: two integer operands are compared exactly as integers, anything else as
// `f64`. The integer space is 128 bits wide so that every `u64` and every `i64`
// keeps its value. NaN follows IEEE 754, every relational comparison against it
// is false.

use crate::core_modules::container::PixelContainer;
use crate::core_modules::pixel_type::pixel_type::{NativeType, PixelType};
use crate::core_modules::promotion::Operator;
use crate::core_modules::view::{BiConverter, BinaryView};

/// The two primitive comparisons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    Greater,
    LessOrEqual,
}

impl Comparison {
    pub const fn operator(self) -> Operator {
        match self {
            Comparison::Greater => Operator::Gt,
            Comparison::LessOrEqual => Operator::Le,
        }
    }
}

/// The exact integer value of `value`. `to_i64` reinterprets `u64`, so its bits
/// are read back as unsigned.
#[inline]
fn integer_value<T: NativeType>(value: T) -> i128 {
    match T::PIXEL_TYPE {
        PixelType::UInt64 => value.to_i64() as u64 as i128,
        _ => value.to_i64() as i128,
    }
}

/// Compares two values of any pixel types in their comparison space.
#[derive(Debug, Clone, Copy)]
pub struct Compare(pub Comparison);

impl<L: NativeType, R: NativeType> BiConverter<L, R> for Compare {
    type Output = bool;

    #[inline]
    fn convert(&self, lhs: L, rhs: R) -> bool {
        if L::PIXEL_TYPE.is_integer() && R::PIXEL_TYPE.is_integer() {
            let (lhs, rhs) = (integer_value(lhs), integer_value(rhs));
            match self.0 {
                Comparison::Greater => lhs > rhs,
                Comparison::LessOrEqual => lhs <= rhs,
            }
        } else {
            let (lhs, rhs) = (lhs.to_f64(), rhs.to_f64());
            match self.0 {
                Comparison::Greater => lhs > rhs,
                Comparison::LessOrEqual => lhs <= rhs,
            }
        }
    }
}

/// A comparison result view.
pub type Comparing<A, B> = BinaryView<A, B, Compare>;

pub fn gt<A, B>(lhs: A, rhs: B) -> Comparing<A, B>
where
    A: PixelContainer,
    B: PixelContainer,
    A::Pixel: NativeType,
    B::Pixel: NativeType,
{
    BinaryView::new(lhs, rhs, Compare(Comparison::Greater))
}

pub fn le<A, B>(lhs: A, rhs: B) -> Comparing<A, B>
where
    A: PixelContainer,
    B: PixelContainer,
    A::Pixel: NativeType,
    B::Pixel: NativeType,
{
    BinaryView::new(lhs, rhs, Compare(Comparison::LessOrEqual))
}

/// `lhs < rhs`, evaluated as `rhs > lhs`.
pub fn lt<A, B>(lhs: A, rhs: B) -> Comparing<B, A>
where
    A: PixelContainer,
    B: PixelContainer,
    A::Pixel: NativeType,
    B::Pixel: NativeType,
{
    gt(rhs, lhs)
}

/// `lhs >= rhs`, evaluated as `rhs <= lhs`.
pub fn ge<A, B>(lhs: A, rhs: B) -> Comparing<B, A>
where
    A: PixelContainer,
    B: PixelContainer,
    A::Pixel: NativeType,
    B::Pixel: NativeType,
{
    le(rhs, lhs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_modules::container::{ArrayImg, Scalar};

    #[test]
    fn unsigned_bytes_compare_by_value() {
        let a = ArrayImg::filled(&[1], 200u8).unwrap();
        let b = ArrayImg::filled(&[1], 100u8).unwrap();
        assert!(!lt(&a, &b).get(&[0]));
        assert!(gt(&a, &b).get(&[0]));
        assert!(ge(&a, &b).get(&[0]));
        assert!(!le(&a, &b).get(&[0]));
    }

    #[test]
    fn integers_compare_exactly_beyond_double_precision() {
        let a = Scalar(i64::MAX);
        let b = Scalar(i64::MAX - 1);
        assert!(gt(a, b).get(&[]));
        assert!(!le(a, b).get(&[]));
    }

    #[test]
    fn unsigned_64_bit_values_keep_their_magnitude() {
        let big = Scalar(u64::MAX);
        assert!(gt(big, Scalar(0u64)).get(&[]));
        assert!(gt(big, Scalar(0u8)).get(&[]));
        assert!(!lt(big, Scalar(1i8)).get(&[]));
        assert!(lt(Scalar(-1i64), Scalar(u64::MAX)).get(&[]));
        assert!(!le(Scalar(i64::MAX as u64 + 1), Scalar(i64::MAX)).get(&[]));
    }

    #[test]
    fn mixed_real_and_integer_compare_as_double() {
        let a = Scalar(2.5f32);
        let b = Scalar(2u16);
        assert!(gt(a, b).get(&[]));
        assert!(lt(b, a).get(&[]));
    }

    #[test]
    fn nan_comparisons_are_false() {
        let nan = Scalar(f64::NAN);
        let one = Scalar(1i32);
        assert!(!lt(nan, one).get(&[]));
        assert!(!le(nan, one).get(&[]));
        assert!(!gt(nan, one).get(&[]));
        assert!(!ge(nan, one).get(&[]));
    }
}
