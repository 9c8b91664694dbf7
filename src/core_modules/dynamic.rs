// THEORY:
// Runtime-tagged containers, for when the element type is only known at run time
// (e.g. an image decoded from disk). `AnyContainer` is a closed tagged union with
// one variant per `ElementType`, each holding a boxed trait object.
//
// Dispatch is a nested `match` over both operands' tags. Every numeric pair is
// spelled out by the `with_numeric!` macro, so each of the 100 combinations is
// monomorphized into the same statically typed code `arithmetic` and `comparison`
// use, and the compiler checks that no tag is forgotten. The only fallthrough is
// a `Bool` operand, which has no arithmetic meaning and is reported as
// `UnsupportedTypeCombination`.
//
// When both tags agree, the same-type operators are called directly and no
// promotion happens at all.

use crate::core_modules::arithmetic::{plus, plus_same, times, times_same};
use crate::core_modules::comparison::{gt, le};
use crate::core_modules::container::{ArrayImg, PixelContainer, Scalar, materialize};
use crate::core_modules::convert::as_type;
use crate::core_modules::interval::Interval;
use crate::core_modules::pixel_type::pixel_type::{ElementType, NativeType, PixelType};
use crate::core_modules::promotion::{Operator, Promote, result_type};
use crate::error::{PixelError, Result};
use log::{debug, trace};

/// A boxed container of a statically known element type.
pub type DynContainer<'a, T> = Box<dyn PixelContainer<Pixel = T> + 'a>;

/// A container whose element type is a runtime tag.
pub enum AnyContainer<'a> {
    Double(DynContainer<'a, f64>),
    Float(DynContainer<'a, f32>),
    Int64(DynContainer<'a, i64>),
    Int32(DynContainer<'a, i32>),
    Int16(DynContainer<'a, i16>),
    Int8(DynContainer<'a, i8>),
    UInt64(DynContainer<'a, u64>),
    UInt32(DynContainer<'a, u32>),
    UInt16(DynContainer<'a, u16>),
    UInt8(DynContainer<'a, u8>),
    Bool(DynContainer<'a, bool>),
}

/// Element types that have an `AnyContainer` variant.
pub trait TaggedPixel: Copy + 'static {
    const ELEMENT_TYPE: ElementType;

    fn tag<'a>(container: DynContainer<'a, Self>) -> AnyContainer<'a>;

    fn untag<'a>(container: AnyContainer<'a>) -> Option<DynContainer<'a, Self>>;
}

macro_rules! tagged_pixel {
    ($($ty:ty => $variant:ident),* $(,)?) => {$(
        impl TaggedPixel for $ty {
            const ELEMENT_TYPE: ElementType = ElementType::Numeric(PixelType::$variant);

            fn tag<'a>(container: DynContainer<'a, Self>) -> AnyContainer<'a> {
                AnyContainer::$variant(container)
            }

            fn untag<'a>(container: AnyContainer<'a>) -> Option<DynContainer<'a, Self>> {
                match container {
                    AnyContainer::$variant(inner) => Some(inner),
                    _ => None,
                }
            }
        }
    )*};
}

tagged_pixel! {
    f64 => Double,
    f32 => Float,
    i64 => Int64,
    i32 => Int32,
    i16 => Int16,
    i8 => Int8,
    u64 => UInt64,
    u32 => UInt32,
    u16 => UInt16,
    u8 => UInt8,
}

impl TaggedPixel for bool {
    const ELEMENT_TYPE: ElementType = ElementType::Bool;

    fn tag<'a>(container: DynContainer<'a, Self>) -> AnyContainer<'a> {
        AnyContainer::Bool(container)
    }

    fn untag<'a>(container: AnyContainer<'a>) -> Option<DynContainer<'a, Self>> {
        match container {
            AnyContainer::Bool(inner) => Some(inner),
            _ => None,
        }
    }
}

/// Binds the typed container inside a numeric `AnyContainer` to `$inner` and
/// evaluates `$numeric`; evaluates `$fallback` for `Bool`.
macro_rules! with_numeric {
    ($container:expr, $inner:ident => $numeric:expr, bool => $fallback:expr) => {
        match $container {
            AnyContainer::Double($inner) => $numeric,
            AnyContainer::Float($inner) => $numeric,
            AnyContainer::Int64($inner) => $numeric,
            AnyContainer::Int32($inner) => $numeric,
            AnyContainer::Int16($inner) => $numeric,
            AnyContainer::Int8($inner) => $numeric,
            AnyContainer::UInt64($inner) => $numeric,
            AnyContainer::UInt32($inner) => $numeric,
            AnyContainer::UInt16($inner) => $numeric,
            AnyContainer::UInt8($inner) => $numeric,
            AnyContainer::Bool(_) => $fallback,
        }
    };
}

/// Binds both typed containers when the tags agree (`$same`), otherwise hands the
/// untouched operands to `$mixed`.
macro_rules! with_same_type {
    ($lhs:expr, $rhs:expr, ($a:ident, $b:ident) => $same:expr, ($x:ident, $y:ident) => $mixed:expr) => {
        match ($lhs, $rhs) {
            (AnyContainer::Double($a), AnyContainer::Double($b)) => $same,
            (AnyContainer::Float($a), AnyContainer::Float($b)) => $same,
            (AnyContainer::Int64($a), AnyContainer::Int64($b)) => $same,
            (AnyContainer::Int32($a), AnyContainer::Int32($b)) => $same,
            (AnyContainer::Int16($a), AnyContainer::Int16($b)) => $same,
            (AnyContainer::Int8($a), AnyContainer::Int8($b)) => $same,
            (AnyContainer::UInt64($a), AnyContainer::UInt64($b)) => $same,
            (AnyContainer::UInt32($a), AnyContainer::UInt32($b)) => $same,
            (AnyContainer::UInt16($a), AnyContainer::UInt16($b)) => $same,
            (AnyContainer::UInt8($a), AnyContainer::UInt8($b)) => $same,
            ($x, $y) => $mixed,
        }
    };
}

/// A binary operator applied to typed operands pulled out of `AnyContainer`s.
trait DynOperation {
    const OPERATOR: Operator;

    fn apply_same<'a, T>(lhs: DynContainer<'a, T>, rhs: DynContainer<'a, T>) -> AnyContainer<'a>
    where
        T: NativeType + TaggedPixel;

    fn apply<'a, L, R>(lhs: DynContainer<'a, L>, rhs: DynContainer<'a, R>) -> AnyContainer<'a>
    where
        L: Promote<R>,
        R: NativeType,
        <L as Promote<R>>::Output: TaggedPixel;
}

struct PlusOperation;
struct TimesOperation;
struct GtOperation;
struct LeOperation;

impl DynOperation for PlusOperation {
    const OPERATOR: Operator = Operator::Plus;

    fn apply_same<'a, T>(lhs: DynContainer<'a, T>, rhs: DynContainer<'a, T>) -> AnyContainer<'a>
    where
        T: NativeType + TaggedPixel,
    {
        AnyContainer::new(plus_same(lhs, rhs))
    }

    fn apply<'a, L, R>(lhs: DynContainer<'a, L>, rhs: DynContainer<'a, R>) -> AnyContainer<'a>
    where
        L: Promote<R>,
        R: NativeType,
        <L as Promote<R>>::Output: TaggedPixel,
    {
        AnyContainer::new(plus(lhs, rhs))
    }
}

impl DynOperation for TimesOperation {
    const OPERATOR: Operator = Operator::Times;

    fn apply_same<'a, T>(lhs: DynContainer<'a, T>, rhs: DynContainer<'a, T>) -> AnyContainer<'a>
    where
        T: NativeType + TaggedPixel,
    {
        AnyContainer::new(times_same(lhs, rhs))
    }

    fn apply<'a, L, R>(lhs: DynContainer<'a, L>, rhs: DynContainer<'a, R>) -> AnyContainer<'a>
    where
        L: Promote<R>,
        R: NativeType,
        <L as Promote<R>>::Output: TaggedPixel,
    {
        AnyContainer::new(times(lhs, rhs))
    }
}

impl DynOperation for GtOperation {
    const OPERATOR: Operator = Operator::Gt;

    fn apply_same<'a, T>(lhs: DynContainer<'a, T>, rhs: DynContainer<'a, T>) -> AnyContainer<'a>
    where
        T: NativeType + TaggedPixel,
    {
        AnyContainer::new(gt(lhs, rhs))
    }

    fn apply<'a, L, R>(lhs: DynContainer<'a, L>, rhs: DynContainer<'a, R>) -> AnyContainer<'a>
    where
        L: Promote<R>,
        R: NativeType,
        <L as Promote<R>>::Output: TaggedPixel,
    {
        AnyContainer::new(gt(lhs, rhs))
    }
}

impl DynOperation for LeOperation {
    const OPERATOR: Operator = Operator::Le;

    fn apply_same<'a, T>(lhs: DynContainer<'a, T>, rhs: DynContainer<'a, T>) -> AnyContainer<'a>
    where
        T: NativeType + TaggedPixel,
    {
        AnyContainer::new(le(lhs, rhs))
    }

    fn apply<'a, L, R>(lhs: DynContainer<'a, L>, rhs: DynContainer<'a, R>) -> AnyContainer<'a>
    where
        L: Promote<R>,
        R: NativeType,
        <L as Promote<R>>::Output: TaggedPixel,
    {
        AnyContainer::new(le(lhs, rhs))
    }
}

impl<'a> AnyContainer<'a> {
    /// Boxes a statically typed container behind its runtime tag.
    pub fn new<C>(container: C) -> Self
    where
        C: PixelContainer + 'a,
        C::Pixel: TaggedPixel,
    {
        <C::Pixel as TaggedPixel>::tag(Box::new(container))
    }

    pub fn element_type(&self) -> ElementType {
        match self {
            AnyContainer::Double(_) => ElementType::Numeric(PixelType::Double),
            AnyContainer::Float(_) => ElementType::Numeric(PixelType::Float),
            AnyContainer::Int64(_) => ElementType::Numeric(PixelType::Int64),
            AnyContainer::Int32(_) => ElementType::Numeric(PixelType::Int32),
            AnyContainer::Int16(_) => ElementType::Numeric(PixelType::Int16),
            AnyContainer::Int8(_) => ElementType::Numeric(PixelType::Int8),
            AnyContainer::UInt64(_) => ElementType::Numeric(PixelType::UInt64),
            AnyContainer::UInt32(_) => ElementType::Numeric(PixelType::UInt32),
            AnyContainer::UInt16(_) => ElementType::Numeric(PixelType::UInt16),
            AnyContainer::UInt8(_) => ElementType::Numeric(PixelType::UInt8),
            AnyContainer::Bool(_) => ElementType::Bool,
        }
    }

    /// The numeric element type, or `None` for boolean containers.
    pub fn pixel_type(&self) -> Option<PixelType> {
        self.element_type().pixel_type()
    }

    pub fn num_dimensions(&self) -> usize {
        match self {
            AnyContainer::Bool(inner) => inner.num_dimensions(),
            numeric => with_numeric!(numeric, inner => inner.num_dimensions(), bool => 0),
        }
    }

    pub fn interval(&self) -> Option<Interval> {
        match self {
            AnyContainer::Bool(inner) => inner.interval(),
            numeric => with_numeric!(numeric, inner => inner.interval(), bool => None),
        }
    }

    /// The typed container, if the tag is `T`'s.
    pub fn downcast<T: TaggedPixel>(self) -> Option<DynContainer<'a, T>> {
        T::untag(self)
    }

    pub fn plus(self, other: AnyContainer<'a>) -> Result<AnyContainer<'a>> {
        self.dispatch::<PlusOperation>(other)
    }

    pub fn times(self, other: AnyContainer<'a>) -> Result<AnyContainer<'a>> {
        self.dispatch::<TimesOperation>(other)
    }

    pub fn gt(self, other: AnyContainer<'a>) -> Result<AnyContainer<'a>> {
        self.dispatch::<GtOperation>(other)
    }

    pub fn le(self, other: AnyContainer<'a>) -> Result<AnyContainer<'a>> {
        self.dispatch::<LeOperation>(other)
    }

    /// `self < other`, evaluated as `other > self`.
    pub fn lt(self, other: AnyContainer<'a>) -> Result<AnyContainer<'a>> {
        other.gt(self).map_err(|error| swap_operands(error, Operator::Lt))
    }

    /// `self >= other`, evaluated as `other <= self`.
    pub fn ge(self, other: AnyContainer<'a>) -> Result<AnyContainer<'a>> {
        other.le(self).map_err(|error| swap_operands(error, Operator::Ge))
    }

    pub fn lt_scalar(self, scalar: AnyScalar) -> Result<AnyContainer<'a>> {
        self.lt(scalar.into_container())
    }

    pub fn le_scalar(self, scalar: AnyScalar) -> Result<AnyContainer<'a>> {
        self.le(scalar.into_container())
    }

    pub fn gt_scalar(self, scalar: AnyScalar) -> Result<AnyContainer<'a>> {
        self.gt(scalar.into_container())
    }

    pub fn ge_scalar(self, scalar: AnyScalar) -> Result<AnyContainer<'a>> {
        self.ge(scalar.into_container())
    }

    /// Views the container as `target`. Boolean containers cannot be converted.
    pub fn as_type(self, target: PixelType) -> Result<AnyContainer<'a>> {
        let from = self.element_type();
        if from == ElementType::Numeric(target) {
            return Ok(self);
        }
        trace!("viewing {from} container as {target}");
        let unsupported = PixelError::UnsupportedConversion { from, to: target };
        match target {
            PixelType::Double => with_numeric!(self, c => Ok(AnyContainer::new(as_type::<_, f64>(c))), bool => Err(unsupported)),
            PixelType::Float => with_numeric!(self, c => Ok(AnyContainer::new(as_type::<_, f32>(c))), bool => Err(unsupported)),
            PixelType::Int64 => with_numeric!(self, c => Ok(AnyContainer::new(as_type::<_, i64>(c))), bool => Err(unsupported)),
            PixelType::Int32 => with_numeric!(self, c => Ok(AnyContainer::new(as_type::<_, i32>(c))), bool => Err(unsupported)),
            PixelType::Int16 => with_numeric!(self, c => Ok(AnyContainer::new(as_type::<_, i16>(c))), bool => Err(unsupported)),
            PixelType::Int8 => with_numeric!(self, c => Ok(AnyContainer::new(as_type::<_, i8>(c))), bool => Err(unsupported)),
            PixelType::UInt64 => with_numeric!(self, c => Ok(AnyContainer::new(as_type::<_, u64>(c))), bool => Err(unsupported)),
            PixelType::UInt32 => with_numeric!(self, c => Ok(AnyContainer::new(as_type::<_, u32>(c))), bool => Err(unsupported)),
            PixelType::UInt16 => with_numeric!(self, c => Ok(AnyContainer::new(as_type::<_, u16>(c))), bool => Err(unsupported)),
            PixelType::UInt8 => with_numeric!(self, c => Ok(AnyContainer::new(as_type::<_, u8>(c))), bool => Err(unsupported)),
        }
    }

    /// Reads every value as a double into new storage.
    pub fn to_doubles(self) -> Result<ArrayImg<f64>> {
        let doubles = self
            .as_type(PixelType::Double)?
            .downcast::<f64>()
            .ok_or(PixelError::UnsupportedConversion {
                from: ElementType::Bool,
                to: PixelType::Double,
            })?;
        materialize(&doubles)
    }

    fn dispatch<O: DynOperation>(self, other: AnyContainer<'a>) -> Result<AnyContainer<'a>> {
        let (lhs, rhs) = (self.element_type(), other.element_type());
        let result = result_type(lhs, rhs, O::OPERATOR)?;
        debug!("{lhs} {} {rhs} -> {result}", O::OPERATOR.symbol());

        let unsupported = || PixelError::UnsupportedTypeCombination {
            lhs,
            rhs,
            operator: O::OPERATOR,
        };
        with_same_type!(self, other,
            (a, b) => Ok(O::apply_same(a, b)),
            (x, y) => with_numeric!(x,
                a => with_numeric!(y, b => Ok(O::apply(a, b)), bool => Err(unsupported())),
                bool => Err(unsupported()))
        )
    }
}

/// Reports a swapped-operand failure in terms of the caller's operand order.
fn swap_operands(error: PixelError, operator: Operator) -> PixelError {
    match error {
        PixelError::UnsupportedTypeCombination { lhs, rhs, .. } => PixelError::UnsupportedTypeCombination {
            lhs: rhs,
            rhs: lhs,
            operator,
        },
        other => other,
    }
}

/// A single pixel value whose type is a runtime tag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AnyScalar {
    Double(f64),
    Float(f32),
    Int64(i64),
    Int32(i32),
    Int16(i16),
    Int8(i8),
    UInt64(u64),
    UInt32(u32),
    UInt16(u16),
    UInt8(u8),
}

macro_rules! any_scalar_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {$(
        impl From<$ty> for AnyScalar {
            fn from(value: $ty) -> Self {
                AnyScalar::$variant(value)
            }
        }
    )*};
}

any_scalar_from! {
    f64 => Double,
    f32 => Float,
    i64 => Int64,
    i32 => Int32,
    i16 => Int16,
    i8 => Int8,
    u64 => UInt64,
    u32 => UInt32,
    u16 => UInt16,
    u8 => UInt8,
}

impl AnyScalar {
    pub fn pixel_type(&self) -> PixelType {
        match self {
            AnyScalar::Double(_) => PixelType::Double,
            AnyScalar::Float(_) => PixelType::Float,
            AnyScalar::Int64(_) => PixelType::Int64,
            AnyScalar::Int32(_) => PixelType::Int32,
            AnyScalar::Int16(_) => PixelType::Int16,
            AnyScalar::Int8(_) => PixelType::Int8,
            AnyScalar::UInt64(_) => PixelType::UInt64,
            AnyScalar::UInt32(_) => PixelType::UInt32,
            AnyScalar::UInt16(_) => PixelType::UInt16,
            AnyScalar::UInt8(_) => PixelType::UInt8,
        }
    }

    /// The value as an unbounded constant container.
    pub fn into_container<'a>(self) -> AnyContainer<'a> {
        match self {
            AnyScalar::Double(v) => AnyContainer::new(Scalar(v)),
            AnyScalar::Float(v) => AnyContainer::new(Scalar(v)),
            AnyScalar::Int64(v) => AnyContainer::new(Scalar(v)),
            AnyScalar::Int32(v) => AnyContainer::new(Scalar(v)),
            AnyScalar::Int16(v) => AnyContainer::new(Scalar(v)),
            AnyScalar::Int8(v) => AnyContainer::new(Scalar(v)),
            AnyScalar::UInt64(v) => AnyContainer::new(Scalar(v)),
            AnyScalar::UInt32(v) => AnyContainer::new(Scalar(v)),
            AnyScalar::UInt16(v) => AnyContainer::new(Scalar(v)),
            AnyScalar::UInt8(v) => AnyContainer::new(Scalar(v)),
        }
    }

    /// `self < container`, evaluated as `container > self`.
    pub fn lt_container(self, container: AnyContainer<'_>) -> Result<AnyContainer<'_>> {
        container.gt_scalar(self)
    }

    /// `self <= container`, evaluated as `container >= self`.
    pub fn le_container(self, container: AnyContainer<'_>) -> Result<AnyContainer<'_>> {
        container.ge_scalar(self)
    }

    /// `self > container`, evaluated as `container < self`.
    pub fn gt_container(self, container: AnyContainer<'_>) -> Result<AnyContainer<'_>> {
        container.lt_scalar(self)
    }

    /// `self >= container`, evaluated as `container <= self`.
    pub fn ge_container(self, container: AnyContainer<'_>) -> Result<AnyContainer<'_>> {
        container.le_scalar(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn constant<T: TaggedPixel>(value: T) -> AnyContainer<'static> {
        AnyContainer::new(ArrayImg::filled(&[1], value).unwrap())
    }

    #[test]
    fn tags_follow_element_types() {
        assert_eq!(constant(1u16).element_type(), ElementType::Numeric(PixelType::UInt16));
        assert_eq!(constant(true).element_type(), ElementType::Bool);
        assert_eq!(constant(true).pixel_type(), None);
    }

    #[test]
    fn mixed_plus_resolves_promoted_tag() {
        let sum = constant(5i32).plus(constant(10u16)).unwrap();
        assert_eq!(sum.pixel_type(), Some(PixelType::Int32));
        assert_eq!(sum.downcast::<i32>().unwrap().get(&[0]), 15);
    }

    #[test]
    fn same_tag_fast_path_keeps_type() {
        let product = constant(3u8).times(constant(4u8)).unwrap();
        assert_eq!(product.downcast::<u8>().unwrap().get(&[0]), 12);
    }

    #[test]
    fn bool_operand_is_unsupported() {
        let error = constant(1.0f64).plus(constant(false)).err().unwrap();
        assert_eq!(
            error,
            PixelError::UnsupportedTypeCombination {
                lhs: ElementType::Numeric(PixelType::Double),
                rhs: ElementType::Bool,
                operator: Operator::Plus,
            }
        );
    }

    #[test]
    fn swapped_comparison_errors_keep_caller_order() {
        let error = constant(false).lt(constant(1i8)).err().unwrap();
        assert_eq!(
            error,
            PixelError::UnsupportedTypeCombination {
                lhs: ElementType::Bool,
                rhs: ElementType::Numeric(PixelType::Int8),
                operator: Operator::Lt,
            }
        );
    }

    #[test]
    fn bool_cannot_be_converted() {
        let error = constant(true).as_type(PixelType::Int32).err().unwrap();
        assert_eq!(
            error,
            PixelError::UnsupportedConversion {
                from: ElementType::Bool,
                to: PixelType::Int32,
            }
        );
    }

    #[test]
    fn scalar_comparisons_from_both_sides() {
        let img = AnyContainer::new(ArrayImg::from_vec(&[3], vec![1u8, 5, 9]).unwrap());
        let below = AnyScalar::from(5i64).gt_container(img).unwrap();
        let below = below.downcast::<bool>().unwrap();
        assert_eq!(
            (0..3).map(|x| below.get(&[x])).collect::<Vec<_>>(),
            vec![true, false, false]
        );
    }
}
