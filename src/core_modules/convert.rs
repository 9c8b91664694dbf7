// THEORY:
// Type conversion is a `ConvertedView` with a `TypeConverter`. The named helpers
// (`as_f64`, ..., `as_u8`) exist for readability at call sites and all funnel into
// `as_type`. Converting a container to its own type is an identity view: the cast
// compiles to a plain read.

use crate::core_modules::container::PixelContainer;
use crate::core_modules::pixel_type::pixel_type::NativeType;
use crate::core_modules::view::{ConvertedView, TypeConverter};

/// A container viewed as element type `U`.
pub type AsType<C, U> = ConvertedView<C, TypeConverter<U>>;

/// Views `container` as element type `U`.
pub fn as_type<C, U>(container: C) -> AsType<C, U>
where
    C: PixelContainer,
    C::Pixel: NativeType,
    U: NativeType,
{
    ConvertedView::new(container, TypeConverter::new())
}

macro_rules! conversion_helpers {
    ($($name:ident => $ty:ty),* $(,)?) => {$(
        #[doc = concat!("Views `container` as `", stringify!($ty), "`.")]
        pub fn $name<C>(container: C) -> AsType<C, $ty>
        where
            C: PixelContainer,
            C::Pixel: NativeType,
        {
            as_type(container)
        }
    )*};
}

conversion_helpers! {
    as_f64 => f64,
    as_f32 => f32,
    as_i64 => i64,
    as_i32 => i32,
    as_i16 => i16,
    as_i8 => i8,
    as_u64 => u64,
    as_u32 => u32,
    as_u16 => u16,
    as_u8 => u8,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_modules::container::ArrayImg;

    #[test]
    fn integer_conversion_wraps() {
        let img = ArrayImg::from_vec(&[2], vec![-1i32, 300]).unwrap();
        let bytes = as_u8(&img);
        assert_eq!(bytes.get(&[0]), 255);
        assert_eq!(bytes.get(&[1]), 44);
    }

    #[test]
    fn real_conversion_rounds() {
        let img = ArrayImg::from_vec(&[3], vec![0.5f64, 1.49, -0.5]).unwrap();
        let ints = as_i32(&img);
        assert_eq!(ints.get(&[0]), 1);
        assert_eq!(ints.get(&[1]), 1);
        assert_eq!(ints.get(&[2]), 0);
    }

    #[test]
    fn same_type_conversion_is_identity() {
        let img = ArrayImg::from_vec(&[1], vec![u64::MAX]).unwrap();
        assert_eq!(as_u64(&img).get(&[0]), u64::MAX);
        assert_eq!(as_type::<_, f32>(as_f32(&img)).get(&[0]), u64::MAX as f32);
    }
}
