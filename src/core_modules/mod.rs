pub mod arithmetic;
pub mod comparison;
pub mod container;
pub mod convert;
pub mod dynamic;
#[cfg(feature = "image")]
pub mod image_interop;
pub mod interval;
pub mod pixel_type;
pub mod promotion;
pub mod real;
pub mod view;
