// tests/test_promotion.rs: The promotion table seen through the public API.
//
// The runtime table (`promote`, `result_type`) is what tagged containers use,
// the compile-time table (`Promote`) is what `+` and `*` use. Both are checked
// here against a few hand-picked pairs and against each other.

use pixelwise::core_modules::promotion::{OperatorFamily, promote, result_type};
use pixelwise::error::PixelError;
use pixelwise::ops::{ElementType, NativeType, Operator, PixelType, Promote, promotion_matrix};

fn static_result<A: Promote<B>, B: NativeType>() -> PixelType {
    <<A as Promote<B>>::Output as NativeType>::PIXEL_TYPE
}

#[test]
fn matrix_is_symmetric_and_complete() {
    let matrix = promotion_matrix(OperatorFamily::Additive);
    for (i, row) in matrix.iter().enumerate() {
        assert_eq!(row[i], Some(PixelType::ALL[i]));
        for (j, entry) in row.iter().enumerate() {
            assert!(entry.is_some());
            assert_eq!(*entry, matrix[j][i]);
        }
    }
}

#[test]
fn reals_dominate_integers() {
    for t in PixelType::ALL {
        assert_eq!(promote(PixelType::Double, t, OperatorFamily::Additive), Some(PixelType::Double));
        if t != PixelType::Double {
            assert_eq!(promote(t, PixelType::Float, OperatorFamily::Multiplicative), Some(PixelType::Float));
        }
    }
}

#[test]
fn compile_time_and_runtime_tables_agree() {
    let pairs = [
        (static_result::<i32, u16>(), PixelType::Int32, PixelType::UInt16),
        (static_result::<u32, i16>(), PixelType::UInt32, PixelType::Int16),
        (static_result::<i8, u8>(), PixelType::Int8, PixelType::UInt8),
        (static_result::<u64, f32>(), PixelType::UInt64, PixelType::Float),
        (static_result::<u16, u8>(), PixelType::UInt16, PixelType::UInt8),
    ];
    for (compile_time, lhs, rhs) in pairs {
        assert_eq!(Some(compile_time), promote(lhs, rhs, OperatorFamily::Additive));
    }
}

#[test]
fn comparisons_yield_bool() {
    let lhs = ElementType::Numeric(PixelType::Float);
    let rhs = ElementType::Numeric(PixelType::Int8);
    assert_eq!(result_type(lhs, rhs, Operator::Ge), Ok(ElementType::Bool));
    assert_eq!(result_type(lhs, rhs, Operator::Times), Ok(lhs));
}

#[test]
fn bool_operand_is_rejected() {
    let error = result_type(ElementType::Bool, ElementType::Numeric(PixelType::UInt8), Operator::Plus)
        .unwrap_err();
    assert_eq!(
        error.to_string(),
        "Operator + (plus) not supported for combination of types `bool` and `u8`. Use any pairwise combination of numeric pixel types."
    );
    assert!(matches!(error, PixelError::UnsupportedTypeCombination { .. }));
}

#[test]
fn arithmetic_families_match_the_table() {
    use PixelType::{
        Double as F64, Float as F32, Int8 as I8, Int16 as I16, Int32 as I32, Int64 as I64,
        UInt8 as U8, UInt16 as U16, UInt32 as U32, UInt64 as U64,
    };
    // Rows and columns in `PixelType::ALL` order: f64 f32 i64 i32 i16 i8 u64 u32 u16 u8.
    let expected = [
        [F64, F64, F64, F64, F64, F64, F64, F64, F64, F64],
        [F64, F32, F32, F32, F32, F32, F32, F32, F32, F32],
        [F64, F32, I64, I64, I64, I64, I64, I64, I64, I64],
        [F64, F32, I64, I32, I32, I32, I64, I64, I32, I32],
        [F64, F32, I64, I32, I16, I16, I64, I64, I32, I16],
        [F64, F32, I64, I32, I16, I8, I64, I64, I32, I16],
        [F64, F32, I64, I64, I64, I64, U64, U64, U64, U64],
        [F64, F32, I64, I64, I64, I64, U64, U32, U32, U32],
        [F64, F32, I64, I32, I32, I32, U64, U32, U16, U16],
        [F64, F32, I64, I32, I16, I16, U64, U32, U16, U8],
    ];
    let expected: Vec<Vec<Option<PixelType>>> = expected
        .iter()
        .map(|row| row.iter().copied().map(Some).collect())
        .collect();
    assert_eq!(promotion_matrix(OperatorFamily::Additive), expected);
    assert_eq!(promotion_matrix(OperatorFamily::Multiplicative), expected);
}
