//! RGBA8 pixel buffers and the rasterization capability.
//!
//! Text, symbols, and arbitrary drawables reach the sampler through
//! [`Rasterize`]: anything that can produce an RGBA8 buffer of known size
//! together with its placement offset. The core never rasterizes on its own.

use crate::color::Srgb;
use crate::error::ParticleError;

/// Whether color channels are stored premultiplied by alpha.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AlphaMode {
    #[default]
    Straight,
    Premultiplied,
}

/// Row-major RGBA8 pixel buffer, 4 bytes per pixel.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelBuffer {
    width: usize,
    height: usize,
    alpha_mode: AlphaMode,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Wraps raw RGBA bytes.
    ///
    /// Returns `InvalidDimensions` if either dimension is zero or the byte
    /// count overflows, and `BufferSizeMismatch` if `data` is not exactly
    /// `width * height * 4` bytes.
    pub fn from_rgba8(
        width: usize,
        height: usize,
        alpha_mode: AlphaMode,
        data: Vec<u8>,
    ) -> Result<Self, ParticleError> {
        if width == 0 || height == 0 {
            return Err(ParticleError::InvalidDimensions);
        }
        let expected = width
            .checked_mul(height)
            .and_then(|n| n.checked_mul(4))
            .ok_or(ParticleError::InvalidDimensions)?;
        if data.len() != expected {
            return Err(ParticleError::BufferSizeMismatch {
                expected,
                got: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            alpha_mode,
            data,
        })
    }

    /// Fully transparent buffer.
    pub fn transparent(width: usize, height: usize) -> Result<Self, ParticleError> {
        let len = width
            .checked_mul(height)
            .and_then(|n| n.checked_mul(4))
            .ok_or(ParticleError::InvalidDimensions)?;
        Self::from_rgba8(width, height, AlphaMode::Straight, vec![0; len])
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn alpha_mode(&self) -> AlphaMode {
        self.alpha_mode
    }

    /// Raw RGBA bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// The four channels at `(x, y)`. Panics if out of bounds.
    pub fn rgba(&self, x: usize, y: usize) -> [u8; 4] {
        assert!(x < self.width && y < self.height, "pixel ({x}, {y}) out of bounds");
        let i = (y * self.width + x) * 4;
        [self.data[i], self.data[i + 1], self.data[i + 2], self.data[i + 3]]
    }

    /// Writes the four channels at `(x, y)`. Panics if out of bounds.
    pub fn set_rgba(&mut self, x: usize, y: usize, rgba: [u8; 4]) {
        assert!(x < self.width && y < self.height, "pixel ({x}, {y}) out of bounds");
        let i = (y * self.width + x) * 4;
        self.data[i..i + 4].copy_from_slice(&rgba);
    }

    /// Alpha channel at `(x, y)`.
    pub fn alpha(&self, x: usize, y: usize) -> u8 {
        self.rgba(x, y)[3]
    }

    /// Un-premultiplied color at `(x, y)`.
    pub fn color(&self, x: usize, y: usize) -> Srgb {
        let [r, g, b, a] = self.rgba(x, y);
        match self.alpha_mode {
            AlphaMode::Straight => Srgb::from_rgb8(r, g, b),
            AlphaMode::Premultiplied => Srgb::from_premultiplied_rgba8(r, g, b, a),
        }
    }
}

/// A rasterized source placed in output space.
#[derive(Debug, Clone, PartialEq)]
pub struct Raster {
    pub pixels: PixelBuffer,
    /// Offset added to pixel coordinates to get world coordinates.
    pub offset: (f64, f64),
}

impl Raster {
    pub fn new(pixels: PixelBuffer, offset: (f64, f64)) -> Self {
        Self { pixels, offset }
    }
}

/// Anything that can be rasterized to an RGBA8 buffer of known size.
///
/// Implemented by the image-producing layer (text, icon, drawable). Errors
/// should be reported as [`ParticleError::Raster`].
pub trait Rasterize {
    fn rasterize(&self) -> Result<Raster, ParticleError>;
}

impl Rasterize for Raster {
    fn rasterize(&self) -> Result<Raster, ParticleError> {
        Ok(self.clone())
    }
}

impl Rasterize for PixelBuffer {
    fn rasterize(&self) -> Result<Raster, ParticleError> {
        Ok(Raster::new(self.clone(), (0.0, 0.0)))
    }
}

#[cfg(feature = "image")]
impl Rasterize for image::RgbaImage {
    fn rasterize(&self) -> Result<Raster, ParticleError> {
        let pixels = PixelBuffer::from_rgba8(
            self.width() as usize,
            self.height() as usize,
            AlphaMode::Straight,
            self.as_raw().clone(),
        )?;
        Ok(Raster::new(pixels, (0.0, 0.0)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_rgba8_accepts_matching_length() {
        let buf = PixelBuffer::from_rgba8(2, 3, AlphaMode::Straight, vec![0; 24]).unwrap();
        assert_eq!(buf.width(), 2);
        assert_eq!(buf.height(), 3);
        assert_eq!(buf.data().len(), 24);
    }

    #[test]
    fn from_rgba8_rejects_zero_dimensions() {
        assert!(matches!(
            PixelBuffer::from_rgba8(0, 4, AlphaMode::Straight, vec![]),
            Err(ParticleError::InvalidDimensions)
        ));
        assert!(matches!(
            PixelBuffer::from_rgba8(4, 0, AlphaMode::Straight, vec![]),
            Err(ParticleError::InvalidDimensions)
        ));
    }

    #[test]
    fn from_rgba8_rejects_length_mismatch() {
        let err = PixelBuffer::from_rgba8(2, 2, AlphaMode::Straight, vec![0; 15]).unwrap_err();
        assert!(matches!(
            err,
            ParticleError::BufferSizeMismatch {
                expected: 16,
                got: 15
            }
        ));
    }

    #[test]
    fn from_rgba8_rejects_overflowing_dimensions() {
        assert!(matches!(
            PixelBuffer::from_rgba8(usize::MAX, 2, AlphaMode::Straight, vec![]),
            Err(ParticleError::InvalidDimensions)
        ));
    }

    #[test]
    fn pixel_access_is_row_major() {
        let mut buf = PixelBuffer::transparent(3, 2).unwrap();
        buf.set_rgba(2, 1, [1, 2, 3, 4]);
        assert_eq!(buf.rgba(2, 1), [1, 2, 3, 4]);
        assert_eq!(&buf.data()[20..24], &[1, 2, 3, 4]);
        assert_eq!(buf.alpha(2, 1), 4);
        assert_eq!(buf.alpha(0, 0), 0);
    }

    #[test]
    fn color_respects_alpha_mode() {
        let straight = PixelBuffer::from_rgba8(1, 1, AlphaMode::Straight, vec![100, 0, 0, 200]).unwrap();
        let premul =
            PixelBuffer::from_rgba8(1, 1, AlphaMode::Premultiplied, vec![100, 0, 0, 200]).unwrap();
        assert!((straight.color(0, 0).r - 100.0 / 255.0).abs() < 1e-12);
        assert!((premul.color(0, 0).r - 0.5).abs() < 1e-12);
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn rgba_panics_out_of_bounds() {
        let buf = PixelBuffer::transparent(2, 2).unwrap();
        buf.rgba(2, 0);
    }

    #[test]
    fn pixel_buffer_rasterizes_at_origin() {
        let buf = PixelBuffer::transparent(4, 4).unwrap();
        let raster = buf.rasterize().unwrap();
        assert_eq!(raster.offset, (0.0, 0.0));
        assert_eq!(raster.pixels, buf);
    }

    #[test]
    fn raster_rasterizes_to_itself() {
        let raster = Raster::new(PixelBuffer::transparent(1, 1).unwrap(), (5.0, -3.0));
        assert_eq!(raster.rasterize().unwrap(), raster);
    }

    #[cfg(feature = "image")]
    #[test]
    fn rgba_image_rasterizes_with_same_bytes() {
        let mut img = image::RgbaImage::new(2, 2);
        img.put_pixel(1, 0, image::Rgba([9, 8, 7, 255]));
        let raster = img.rasterize().unwrap();
        assert_eq!(raster.pixels.rgba(1, 0), [9, 8, 7, 255]);
    }
}
