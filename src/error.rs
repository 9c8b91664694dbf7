// THEORY:
// Every fallible operation in the crate reports through `PixelError`. Operator
// dispatch itself has exactly one failure mode, `UnsupportedTypeCombination`,
// and it can only be reached through the runtime-tagged containers in
// `core_modules::dynamic`; statically typed dispatch is checked by the compiler.
// The remaining variants belong to the container layer: building storage,
// materializing views and moving pixels in and out of `image` buffers.
//
// Errors are synchronous and deterministic. Nothing here is retried, and no
// partially built container is ever returned alongside an error.

use crate::core_modules::pixel_type::pixel_type::{ElementType, PixelType};
use crate::core_modules::promotion::Operator;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PixelError {
    /// No promotion rule applies to the operand types, e.g. a numeric operand
    /// combined with a boolean one.
    #[error(
        "Operator {operator} not supported for combination of types `{lhs}` and `{rhs}`. Use any pairwise combination of numeric pixel types."
    )]
    UnsupportedTypeCombination {
        lhs: ElementType,
        rhs: ElementType,
        operator: Operator,
    },
    #[error("Cannot convert elements of type `{from}` to `{to}`.")]
    UnsupportedConversion { from: ElementType, to: PixelType },
    #[error("Invalid interval with min {min:?} and max {max:?}.")]
    InvalidInterval { min: Vec<i64>, max: Vec<i64> },
    #[error("Invalid real interval: dimension {dimension} has a NaN bound or min > max.")]
    InvalidRealInterval { dimension: usize },
    #[error("Expected {expected} elements, got {actual}.")]
    LengthMismatch { expected: usize, actual: usize },
    #[error("Cannot materialize a container with an unbounded domain.")]
    UnboundedDomain,
    #[error("Expected {expected} dimensions, got {actual}.")]
    DimensionMismatch { expected: usize, actual: usize },
    #[error("Unsupported image: {0}")]
    UnsupportedImage(String),
}

pub type Result<T> = std::result::Result<T, PixelError>;
