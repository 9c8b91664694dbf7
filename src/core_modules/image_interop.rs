// THEORY:
// Bridges between `image` crate buffers and pixel containers.
//
// An `ImageBuffer` stores channels interleaved, row by row. Containers are indexed
// by coordinate with the first dimension fastest, so a single-channel image maps
// to a 2-D container `[x, y]` and a multi-channel image to a 3-D container
// `[x, y, channel]` whose channels are stored as separate planes. Moving data in
// either direction is a full copy; views are never backed by an `ImageBuffer`.
//
// Decoded images only become runtime-tagged containers, because the subpixel type
// of a `DynamicImage` is not known until run time.

use crate::core_modules::container::{ArrayImg, PixelContainer};
use crate::core_modules::dynamic::AnyContainer;
use crate::error::{PixelError, Result};
use image::{DynamicImage, ImageBuffer, Pixel};
use log::{debug, warn};

/// Copies an image into planar container storage.
pub fn from_image_buffer<P>(buffer: &ImageBuffer<P, Vec<P::Subpixel>>) -> Result<ArrayImg<P::Subpixel>>
where
    P: Pixel,
{
    let (width, height) = (buffer.width() as usize, buffer.height() as usize);
    let channels = P::CHANNEL_COUNT as usize;
    let raw = buffer.as_raw();

    if channels == 1 {
        return ArrayImg::from_vec(&[width, height], raw[..width * height].to_vec());
    }

    let mut data = Vec::with_capacity(width * height * channels);
    for channel in 0..channels {
        for y in 0..height {
            for x in 0..width {
                data.push(raw[(y * width + x) * channels + channel]);
            }
        }
    }
    ArrayImg::from_vec(&[width, height, channels], data)
}

/// Copies a bounded container into an image of pixel type `P`.
///
/// Single-channel pixel types take a 2-D container; others a 3-D container whose
/// last dimension is the channel count. The container's origin becomes the
/// image's top-left corner.
pub fn to_image_buffer<P, C>(container: &C) -> Result<ImageBuffer<P, Vec<P::Subpixel>>>
where
    P: Pixel,
    C: PixelContainer<Pixel = P::Subpixel> + ?Sized,
{
    let interval = container.interval().ok_or(PixelError::UnboundedDomain)?;
    let channels = P::CHANNEL_COUNT as usize;
    let expected = if channels == 1 { 2 } else { 3 };
    if interval.num_dimensions() != expected {
        return Err(PixelError::DimensionMismatch {
            expected,
            actual: interval.num_dimensions(),
        });
    }

    let dimensions = interval.dimensions();
    if channels > 1 && dimensions[2] != channels {
        return Err(PixelError::UnsupportedImage(format!(
            "expected {channels} channels, found {}",
            dimensions[2]
        )));
    }

    let (width, height) = (dimensions[0], dimensions[1]);
    let origin = interval.min();
    let mut position = origin.to_vec();
    let mut data = Vec::with_capacity(width * height * channels);
    for y in 0..height {
        position[1] = origin[1] + y as i64;
        for x in 0..width {
            position[0] = origin[0] + x as i64;
            for channel in 0..channels {
                if channels > 1 {
                    position[2] = origin[2] + channel as i64;
                }
                data.push(container.get(&position));
            }
        }
    }

    let too_large = || PixelError::UnsupportedImage(format!("{width}x{height} exceeds image bounds"));
    let width = u32::try_from(width).map_err(|_| too_large())?;
    let height = u32::try_from(height).map_err(|_| too_large())?;
    ImageBuffer::from_raw(width, height, data).ok_or_else(too_large)
}

impl AnyContainer<'static> {
    /// Copies a decoded image into a container tagged with its subpixel type.
    pub fn from_dynamic_image(image: &DynamicImage) -> Result<Self> {
        let container = match image {
            DynamicImage::ImageLuma8(buffer) => AnyContainer::new(from_image_buffer(buffer)?),
            DynamicImage::ImageLumaA8(buffer) => AnyContainer::new(from_image_buffer(buffer)?),
            DynamicImage::ImageRgb8(buffer) => AnyContainer::new(from_image_buffer(buffer)?),
            DynamicImage::ImageRgba8(buffer) => AnyContainer::new(from_image_buffer(buffer)?),
            DynamicImage::ImageLuma16(buffer) => AnyContainer::new(from_image_buffer(buffer)?),
            DynamicImage::ImageLumaA16(buffer) => AnyContainer::new(from_image_buffer(buffer)?),
            DynamicImage::ImageRgb16(buffer) => AnyContainer::new(from_image_buffer(buffer)?),
            DynamicImage::ImageRgba16(buffer) => AnyContainer::new(from_image_buffer(buffer)?),
            DynamicImage::ImageRgb32F(buffer) => AnyContainer::new(from_image_buffer(buffer)?),
            DynamicImage::ImageRgba32F(buffer) => AnyContainer::new(from_image_buffer(buffer)?),
            other => {
                warn!("no container mapping for {:?} images", other.color());
                return Err(PixelError::UnsupportedImage(format!("{:?}", other.color())));
            }
        };
        debug!(
            "decoded {:?} image as {} container over {:?}",
            image.color(),
            container.element_type(),
            container.interval().map(|interval| interval.dimensions())
        );
        Ok(container)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_modules::pixel_type::pixel_type::PixelType;
    use image::{Luma, Rgb};

    #[test]
    fn rgb_channels_become_planes() {
        let buffer: ImageBuffer<Rgb<u8>, Vec<u8>> =
            ImageBuffer::from_raw(2, 1, vec![1, 2, 3, 4, 5, 6]).unwrap();
        let img = from_image_buffer(&buffer).unwrap();
        assert_eq!(img.dimensions(), vec![2, 1, 3]);
        assert_eq!(img.as_slice(), &[1, 4, 2, 5, 3, 6]);
        assert_eq!(img.get(&[1, 0, 2]), 6);
    }

    #[test]
    fn round_trip_keeps_interleaving() {
        let buffer: ImageBuffer<Rgb<u8>, Vec<u8>> =
            ImageBuffer::from_raw(2, 2, (0..12).collect()).unwrap();
        let img = from_image_buffer(&buffer).unwrap();
        let back: ImageBuffer<Rgb<u8>, Vec<u8>> = to_image_buffer(&img).unwrap();
        assert_eq!(back, buffer);
    }

    #[test]
    fn wrong_dimensionality_is_rejected() {
        let img = ArrayImg::filled(&[2, 2, 3], 0u16).unwrap();
        let error = to_image_buffer::<Luma<u16>, _>(&img).unwrap_err();
        assert_eq!(error, PixelError::DimensionMismatch { expected: 2, actual: 3 });
    }

    #[test]
    fn dynamic_images_are_tagged_by_subpixel() {
        let rgb = AnyContainer::from_dynamic_image(&DynamicImage::new_rgb8(4, 3)).unwrap();
        assert_eq!(rgb.pixel_type(), Some(PixelType::UInt8));
        assert_eq!(rgb.num_dimensions(), 3);

        let gray = AnyContainer::from_dynamic_image(&DynamicImage::new_luma16(4, 3)).unwrap();
        assert_eq!(gray.pixel_type(), Some(PixelType::UInt16));
        assert_eq!(gray.num_dimensions(), 2);

        let hdr = AnyContainer::from_dynamic_image(&DynamicImage::new_rgba32f(1, 1)).unwrap();
        assert_eq!(hdr.pixel_type(), Some(PixelType::Float));
    }
}
