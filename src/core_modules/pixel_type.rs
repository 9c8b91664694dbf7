// THEORY:
// The `PixelType` module is the most fundamental unit of the crate. It names the
// closed set of ten numeric element types a pixel container can hold and gives
// each of them a single, uniform way to be read and written:
//
// - `to_f64` / `from_f64`: the "real" lens. Every type can be read as a double,
//   and written from a double (integers round half up, then wrap to their width).
// - `to_i64` / `from_i64`: the "integer" lens. Integers round-trip through a
//   64-bit two's-complement value; narrower targets keep the low bits. `u64` is
//   reinterpreted, so values above `i64::MAX` read back as negative numbers;
//   comparisons undo this before comparing.
//
// `cast` picks the lens: integer -> integer goes through `i64` so no precision is
// lost for 64-bit values, anything involving a real type goes through `f64`.
//
// Key principles:
// 1) Closed set: the ten types are an enum, so every `match` over them is checked
//    for exhaustiveness by the compiler.
// 2) Static and dynamic views of the same fact: `PixelType` is the runtime tag,
//    `NativeType::PIXEL_TYPE` ties each Rust primitive to its tag at compile time.
// 3) Arithmetic semantics live with the type: integer `+`/`*` wrap on overflow,
//    real `+`/`*` follow IEEE 754.

pub mod pixel_type {
    use std::fmt;

    /// One of the ten numeric element types a pixel container can hold.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
    pub enum PixelType {
        Double,
        Float,
        Int64,
        Int32,
        Int16,
        Int8,
        UInt64,
        UInt32,
        UInt16,
        UInt8,
    }

    impl PixelType {
        /// All pixel types, reals first, then signed and unsigned integers from
        /// widest to narrowest.
        pub const ALL: [PixelType; 10] = [
            PixelType::Double,
            PixelType::Float,
            PixelType::Int64,
            PixelType::Int32,
            PixelType::Int16,
            PixelType::Int8,
            PixelType::UInt64,
            PixelType::UInt32,
            PixelType::UInt16,
            PixelType::UInt8,
        ];

        pub const fn bit_width(self) -> u32 {
            match self {
                PixelType::Double | PixelType::Int64 | PixelType::UInt64 => 64,
                PixelType::Float | PixelType::Int32 | PixelType::UInt32 => 32,
                PixelType::Int16 | PixelType::UInt16 => 16,
                PixelType::Int8 | PixelType::UInt8 => 8,
            }
        }

        /// Reals count as signed.
        pub const fn is_signed(self) -> bool {
            !matches!(
                self,
                PixelType::UInt64 | PixelType::UInt32 | PixelType::UInt16 | PixelType::UInt8
            )
        }

        pub const fn is_real(self) -> bool {
            matches!(self, PixelType::Double | PixelType::Float)
        }

        pub const fn is_integer(self) -> bool {
            !self.is_real()
        }

        /// The Rust primitive name of the type, e.g. `"u16"`.
        pub const fn name(self) -> &'static str {
            match self {
                PixelType::Double => "f64",
                PixelType::Float => "f32",
                PixelType::Int64 => "i64",
                PixelType::Int32 => "i32",
                PixelType::Int16 => "i16",
                PixelType::Int8 => "i8",
                PixelType::UInt64 => "u64",
                PixelType::UInt32 => "u32",
                PixelType::UInt16 => "u16",
                PixelType::UInt8 => "u8",
            }
        }
    }

    impl fmt::Display for PixelType {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(self.name())
        }
    }

    /// The runtime tag of a container element. Comparison results are the only
    /// non-numeric elements the crate produces.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub enum ElementType {
        Numeric(PixelType),
        Bool,
    }

    impl ElementType {
        pub const fn pixel_type(self) -> Option<PixelType> {
            match self {
                ElementType::Numeric(pixel_type) => Some(pixel_type),
                ElementType::Bool => None,
            }
        }
    }

    impl From<PixelType> for ElementType {
        fn from(pixel_type: PixelType) -> Self {
            ElementType::Numeric(pixel_type)
        }
    }

    impl fmt::Display for ElementType {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            match self {
                ElementType::Numeric(pixel_type) => fmt::Display::fmt(pixel_type, f),
                ElementType::Bool => f.write_str("bool"),
            }
        }
    }

    /// A Rust primitive that can be stored as a pixel of a given `PixelType`.
    pub trait NativeType: Copy + PartialEq + fmt::Debug + Send + Sync + 'static {
        /// The runtime tag of this type.
        const PIXEL_TYPE: PixelType;
        /// The zero value, used to initialise storage.
        const ZERO: Self;

        fn to_f64(self) -> f64;
        fn to_i64(self) -> i64;
        fn from_f64(value: f64) -> Self;
        fn from_i64(value: i64) -> Self;

        /// `+` with the type's overflow semantics.
        fn pixel_add(self, other: Self) -> Self;
        /// `*` with the type's overflow semantics.
        fn pixel_mul(self, other: Self) -> Self;
    }

    /// Rounds half up, matching `floor(x + 0.5)`.
    #[inline]
    fn round_half_up(value: f64) -> f64 {
        (value + 0.5).floor()
    }

    macro_rules! integer_native_type {
        ($($ty:ty => $tag:ident),* $(,)?) => {$(
            // The `as i64` casts are no-ops in the `i64` expansion.
            #[allow(clippy::unnecessary_cast)]
            impl NativeType for $ty {
                const PIXEL_TYPE: PixelType = PixelType::$tag;
                const ZERO: Self = 0;

                #[inline]
                fn to_f64(self) -> f64 {
                    self as f64
                }

                #[inline]
                fn to_i64(self) -> i64 {
                    self as i64
                }

                #[inline]
                fn from_f64(value: f64) -> Self {
                    round_half_up(value) as i64 as $ty
                }

                #[inline]
                fn from_i64(value: i64) -> Self {
                    value as $ty
                }

                #[inline]
                fn pixel_add(self, other: Self) -> Self {
                    self.wrapping_add(other)
                }

                #[inline]
                fn pixel_mul(self, other: Self) -> Self {
                    self.wrapping_mul(other)
                }
            }
        )*};
    }

    integer_native_type! {
        i64 => Int64,
        i32 => Int32,
        i16 => Int16,
        i8 => Int8,
        u32 => UInt32,
        u16 => UInt16,
        u8 => UInt8,
    }

    // u64 is kept out of the macro: going through i64 would clamp values above i64::MAX.
    impl NativeType for u64 {
        const PIXEL_TYPE: PixelType = PixelType::UInt64;
        const ZERO: Self = 0;

        #[inline]
        fn to_f64(self) -> f64 {
            self as f64
        }

        #[inline]
        fn to_i64(self) -> i64 {
            self as i64
        }

        #[inline]
        fn from_f64(value: f64) -> Self {
            let rounded = round_half_up(value);
            if rounded < 0.0 {
                rounded as i64 as u64
            } else {
                rounded as u64
            }
        }

        #[inline]
        fn from_i64(value: i64) -> Self {
            value as u64
        }

        #[inline]
        fn pixel_add(self, other: Self) -> Self {
            self.wrapping_add(other)
        }

        #[inline]
        fn pixel_mul(self, other: Self) -> Self {
            self.wrapping_mul(other)
        }
    }

    macro_rules! real_native_type {
        ($($ty:ty => $tag:ident),* $(,)?) => {$(
            #[allow(clippy::unnecessary_cast)]
            impl NativeType for $ty {
                const PIXEL_TYPE: PixelType = PixelType::$tag;
                const ZERO: Self = 0.0;

                #[inline]
                fn to_f64(self) -> f64 {
                    self as f64
                }

                #[inline]
                fn to_i64(self) -> i64 {
                    round_half_up(self as f64) as i64
                }

                #[inline]
                fn from_f64(value: f64) -> Self {
                    value as $ty
                }

                #[inline]
                fn from_i64(value: i64) -> Self {
                    value as $ty
                }

                #[inline]
                fn pixel_add(self, other: Self) -> Self {
                    self + other
                }

                #[inline]
                fn pixel_mul(self, other: Self) -> Self {
                    self * other
                }
            }
        )*};
    }

    real_native_type! {
        f64 => Double,
        f32 => Float,
    }

    /// Converts a value between pixel types. Integer to integer goes through
    /// `i64`, everything else through `f64`. Same-type casts are the identity.
    #[inline]
    pub fn cast<S: NativeType, T: NativeType>(value: S) -> T {
        if S::PIXEL_TYPE.is_integer() && T::PIXEL_TYPE.is_integer() {
            T::from_i64(value.to_i64())
        } else {
            T::from_f64(value.to_f64())
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn widths_and_signedness() {
            assert_eq!(PixelType::Double.bit_width(), 64);
            assert_eq!(PixelType::UInt16.bit_width(), 16);
            assert!(PixelType::Float.is_signed());
            assert!(PixelType::Int8.is_signed());
            assert!(!PixelType::UInt64.is_signed());
            assert!(PixelType::Double.is_real());
            assert!(PixelType::UInt8.is_integer());
        }

        #[test]
        fn native_types_carry_their_tag() {
            assert_eq!(<f64 as NativeType>::PIXEL_TYPE, PixelType::Double);
            assert_eq!(<u8 as NativeType>::PIXEL_TYPE, PixelType::UInt8);
            assert_eq!(<i16 as NativeType>::PIXEL_TYPE, PixelType::Int16);
        }

        #[test]
        fn real_to_integer_rounds_half_up_then_wraps() {
            assert_eq!(cast::<f64, i32>(2.5), 3);
            assert_eq!(cast::<f64, i32>(-2.5), -2);
            assert_eq!(cast::<f64, u8>(300.0), 44);
            assert_eq!(cast::<f32, i16>(-1.4), -1);
        }

        #[test]
        fn integer_to_integer_keeps_low_bits() {
            assert_eq!(cast::<i32, u8>(257), 1);
            assert_eq!(cast::<i8, u16>(-1), u16::MAX);
            assert_eq!(cast::<u64, u64>(u64::MAX), u64::MAX);
            assert_eq!(cast::<u64, i64>(u64::MAX), -1);
        }

        #[test]
        fn unsigned_long_reads_as_unsigned_double() {
            assert_eq!(cast::<u64, f64>(u64::MAX), u64::MAX as f64);
            assert_eq!(cast::<f64, u64>(1e19), 10_000_000_000_000_000_000);
        }

        #[test]
        fn integer_arithmetic_wraps() {
            assert_eq!(200u8.pixel_add(100), 44);
            assert_eq!(i32::MAX.pixel_add(1), i32::MIN);
            assert_eq!(16u8.pixel_mul(16), 0);
            assert_eq!(2.5f64.pixel_mul(4.0), 10.0);
        }

        #[test]
        fn element_type_display() {
            assert_eq!(ElementType::from(PixelType::Int32).to_string(), "i32");
            assert_eq!(ElementType::Bool.to_string(), "bool");
            assert_eq!(ElementType::Bool.pixel_type(), None);
        }
    }
}

// -----------------------------------------------------------------------------
// Glossary: Element Types
//
// - Real type: `f64` or `f32`. Read and written through the double lens.
//
// - Integer type: any of the four signed and four unsigned integer types. Read
//   and written through the 64-bit integer lens when both sides are integers.
//
// - Wrap: keep the low `bit_width` bits of a wider two's-complement value. Used
//   for narrowing conversions and for integer overflow in `+` and `*`.
//
// - Tag: the runtime `PixelType`/`ElementType` value naming what a container
//   holds. Statically typed containers know their tag through `NativeType`.
