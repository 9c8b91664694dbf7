// THEORY:
// The promotion table decides which element type the result of a mixed-type
// binary operator has. It is the only piece of policy in the crate; everything
// else is plumbing that applies it.
//
// The table is data, not a derived rule. It is written once, as 45 unordered
// pairs, inside a single `promotion_table!` invocation. That one invocation emits
// both halves of the table:
//
// 1.  **Compile-time**: `impl Promote<Rhs> for Lhs { type Output = ... }` in both
//     orderings. Statically typed dispatch (`arithmetic::plus`, the `+`/`*`
//     operators) resolves its result type through these impls, so an unsupported
//     pair is a type error, not a runtime error.
// 2.  **Run-time**: `PROMOTION_RULES`, a slice of `PromotionRule`s that the
//     runtime-tagged containers in `dynamic` consult through `promote`.
//
// Because both halves come from the same token list they cannot disagree, and
// storing each unordered pair once means the two orderings cannot drift apart.
// The additive and multiplicative families share the table. The comparison
// family does not use it at all: comparisons are exact integer comparisons when
// both operands are integers and are computed in `f64` space otherwise, and
// always yield `bool`.

use crate::core_modules::pixel_type::pixel_type::{ElementType, NativeType, PixelType};
use crate::error::{PixelError, Result};
use std::fmt;

/// Compile-time promotion: the element type of `Self op Rhs`.
pub trait Promote<Rhs: NativeType>: NativeType {
    type Output: NativeType;
}

impl<T: NativeType> Promote<T> for T {
    type Output = T;
}

/// A class of operators that share one promotion table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperatorFamily {
    Additive,
    Multiplicative,
    Comparison,
}

/// A pixel-wise binary operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Plus,
    Times,
    Lt,
    Le,
    Gt,
    Ge,
}

impl Operator {
    pub const fn family(self) -> OperatorFamily {
        match self {
            Operator::Plus => OperatorFamily::Additive,
            Operator::Times => OperatorFamily::Multiplicative,
            Operator::Lt | Operator::Le | Operator::Gt | Operator::Ge => OperatorFamily::Comparison,
        }
    }

    pub const fn symbol(self) -> &'static str {
        match self {
            Operator::Plus => "+",
            Operator::Times => "*",
            Operator::Lt => "<",
            Operator::Le => "<=",
            Operator::Gt => ">",
            Operator::Ge => ">=",
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Operator::Plus => "plus",
            Operator::Times => "times",
            Operator::Lt => "lt",
            Operator::Le => "le",
            Operator::Gt => "gt",
            Operator::Ge => "ge",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.symbol(), self.name())
    }
}

/// One entry of the table. Matches `(lhs, rhs)` in either order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PromotionRule {
    pub lhs: PixelType,
    pub rhs: PixelType,
    pub result: PixelType,
}

impl PromotionRule {
    pub fn matches(&self, a: PixelType, b: PixelType) -> bool {
        (self.lhs == a && self.rhs == b) || (self.lhs == b && self.rhs == a)
    }
}

macro_rules! promotion_table {
    ($($lhs:ty, $rhs:ty => $out:ty;)*) => {
        $(
            impl Promote<$rhs> for $lhs {
                type Output = $out;
            }

            impl Promote<$lhs> for $rhs {
                type Output = $out;
            }
        )*

        /// The arithmetic promotion table, one rule per unordered pair of
        /// distinct pixel types. Shared by `+` and `*`.
        pub const PROMOTION_RULES: &[PromotionRule] = &[
            $(
                PromotionRule {
                    lhs: <$lhs as NativeType>::PIXEL_TYPE,
                    rhs: <$rhs as NativeType>::PIXEL_TYPE,
                    result: <$out as NativeType>::PIXEL_TYPE,
                },
            )*
        ];
    };
}

promotion_table! {
    f64, f32 => f64;
    f64, i64 => f64;
    f64, i32 => f64;
    f64, i16 => f64;
    f64, i8 => f64;
    f64, u64 => f64;
    f64, u32 => f64;
    f64, u16 => f64;
    f64, u8 => f64;

    f32, i64 => f32;
    f32, i32 => f32;
    f32, i16 => f32;
    f32, i8 => f32;
    f32, u64 => f32;
    f32, u32 => f32;
    f32, u16 => f32;
    f32, u8 => f32;

    i64, i32 => i64;
    i64, i16 => i64;
    i64, i8 => i64;
    i64, u64 => i64;
    i64, u32 => i64;
    i64, u16 => i64;
    i64, u8 => i64;

    i32, i16 => i32;
    i32, i8 => i32;
    i32, u64 => i64;
    i32, u32 => i64;
    i32, u16 => i32;
    i32, u8 => i32;

    i16, i8 => i16;
    i16, u64 => i64;
    i16, u32 => i64;
    i16, u16 => i32;
    i16, u8 => i16;

    i8, u64 => i64;
    i8, u32 => i64;
    i8, u16 => i32;
    i8, u8 => i16;

    u64, u32 => u64;
    u64, u16 => u64;
    u64, u8 => u64;

    u32, u16 => u32;
    u32, u8 => u32;

    u16, u8 => u16;
}

/// The element type `lhs op rhs` is computed in for an operator family.
///
/// Arithmetic families return the table entry, or the operand type itself when
/// both operands agree. The comparison family returns the comparison space:
/// `Int64` when both operands are integers, `Double` otherwise. `Int64` labels
/// the exact integer space; `u64` values above `i64::MAX` still compare by
/// value. `None` means the table has no rule for the pair.
pub fn promote(lhs: PixelType, rhs: PixelType, family: OperatorFamily) -> Option<PixelType> {
    match family {
        OperatorFamily::Comparison => Some(comparison_space(lhs, rhs)),
        OperatorFamily::Additive | OperatorFamily::Multiplicative => {
            if lhs == rhs {
                return Some(lhs);
            }
            PROMOTION_RULES
                .iter()
                .find(|rule| rule.matches(lhs, rhs))
                .map(|rule| rule.result)
        }
    }
}

pub fn comparison_space(lhs: PixelType, rhs: PixelType) -> PixelType {
    if lhs.is_integer() && rhs.is_integer() {
        PixelType::Int64
    } else {
        PixelType::Double
    }
}

/// Resolves the element type of `lhs operator rhs` for runtime-tagged operands.
///
/// Comparisons always yield `Bool`. Any non-numeric operand, or a pair missing
/// from the table, is an `UnsupportedTypeCombination`.
pub fn result_type(lhs: ElementType, rhs: ElementType, operator: Operator) -> Result<ElementType> {
    let unsupported = || PixelError::UnsupportedTypeCombination { lhs, rhs, operator };
    let (ElementType::Numeric(lhs_type), ElementType::Numeric(rhs_type)) = (lhs, rhs) else {
        return Err(unsupported());
    };
    let promoted = promote(lhs_type, rhs_type, operator.family()).ok_or_else(unsupported)?;
    Ok(match operator.family() {
        OperatorFamily::Comparison => ElementType::Bool,
        OperatorFamily::Additive | OperatorFamily::Multiplicative => ElementType::Numeric(promoted),
    })
}

/// The full arithmetic table as a matrix indexed like `PixelType::ALL`.
pub fn promotion_matrix(family: OperatorFamily) -> Vec<Vec<Option<PixelType>>> {
    PixelType::ALL
        .iter()
        .map(|&lhs| PixelType::ALL.iter().map(|&rhs| promote(lhs, rhs, family)).collect())
        .collect()
}
