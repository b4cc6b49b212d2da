//! Conversions between host image representations and [`PixelBuffer`].
//!
//! Filters only ever see a [`PixelBuffer`]. Anything that draws, decodes or
//! composites (a canvas, a numpy array, a platform bitmap) implements
//! [`Surface`] to get in and out of that form.
//!
//! ## Provided Surfaces
//!
//! | Type | Layout | Notes |
//! |------|--------|-------|
//! | `Array3<u8>` | (H, W, C) | C = 4 RGBA, 3 RGB, 1 gray; always exported as RGBA |
//! | [`ArgbSurface`] | `Vec<u32>` | packed `0xAARRGGBB`, row-major |

use ndarray::{Array3, ArrayView3};

use crate::buffer::{PixelBuffer, Rgba};
use crate::error::{FilterError, FilterResult};

/// A host image that can be converted to and from a [`PixelBuffer`].
pub trait Surface: Sized {
    fn to_pixel_buffer(&self) -> FilterResult<PixelBuffer>;

    fn from_pixel_buffer(buffer: &PixelBuffer) -> Self;
}

fn dimension(value: usize) -> FilterResult<u32> {
    u32::try_from(value).map_err(|_| {
        FilterError::InvalidParameter(format!("dimension {value} exceeds u32 range"))
    })
}

// ============================================================================
// ndarray (H, W, C)
// ============================================================================

/// Read an `(height, width, channels)` array.
///
/// # Errors
/// `ShapeMismatch` for channel counts other than 1, 3 or 4.
pub fn buffer_from_array(input: ArrayView3<u8>) -> FilterResult<PixelBuffer> {
    let (height, width, channels) = input.dim();
    let (w, h) = (dimension(width)?, dimension(height)?);

    if !matches!(channels, 1 | 3 | 4) {
        return Err(FilterError::ShapeMismatch {
            expected: width * height * 4,
            actual: width * height * channels,
        });
    }

    Ok(PixelBuffer::from_fn(w, h, |x, y| {
        let (x, y) = (x as usize, y as usize);
        match channels {
            4 => Rgba::argb(input[[y, x, 3]], input[[y, x, 0]], input[[y, x, 1]], input[[y, x, 2]]),
            3 => Rgba::rgb(input[[y, x, 0]], input[[y, x, 1]], input[[y, x, 2]]),
            _ => {
                let v = input[[y, x, 0]];
                Rgba::rgb(v, v, v)
            }
        }
    }))
}

/// Write an `(height, width, 4)` RGBA array.
pub fn buffer_to_array(buffer: &PixelBuffer) -> Array3<u8> {
    let (width, height) = (buffer.width() as usize, buffer.height() as usize);
    let mut output = Array3::<u8>::zeros((height, width, 4));

    for (y, row) in buffer.rows().enumerate().take(height) {
        for (x, px) in row.iter().enumerate() {
            output[[y, x, 0]] = px.r;
            output[[y, x, 1]] = px.g;
            output[[y, x, 2]] = px.b;
            output[[y, x, 3]] = px.a;
        }
    }
    output
}

impl Surface for Array3<u8> {
    fn to_pixel_buffer(&self) -> FilterResult<PixelBuffer> {
        buffer_from_array(self.view())
    }

    fn from_pixel_buffer(buffer: &PixelBuffer) -> Self {
        buffer_to_array(buffer)
    }
}

// ============================================================================
// Packed ARGB
// ============================================================================

/// Row-major packed `0xAARRGGBB` pixels, the integer form host bitmaps expose.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgbSurface {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u32>,
}

impl Surface for ArgbSurface {
    fn to_pixel_buffer(&self) -> FilterResult<PixelBuffer> {
        let samples = self.pixels.iter().map(|&w| Rgba::from_argb_u32(w)).collect();
        PixelBuffer::new(self.width, self.height, samples)
    }

    fn from_pixel_buffer(buffer: &PixelBuffer) -> Self {
        ArgbSurface {
            width: buffer.width(),
            height: buffer.height(),
            pixels: buffer.samples().iter().map(|px| px.to_argb_u32()).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_array_rgba_roundtrip() {
        let mut img = Array3::<u8>::zeros((2, 3, 4));
        img[[1, 2, 0]] = 10;
        img[[1, 2, 1]] = 20;
        img[[1, 2, 2]] = 30;
        img[[1, 2, 3]] = 40;

        let buf = img.to_pixel_buffer().unwrap();
        assert_eq!((buf.width(), buf.height()), (3, 2));
        assert_eq!(buf.get(2, 1).unwrap(), Rgba::argb(40, 10, 20, 30));
        assert_eq!(Array3::<u8>::from_pixel_buffer(&buf), img);
    }

    #[test]
    fn test_array_rgb_is_opaque() {
        let mut img = Array3::<u8>::zeros((1, 1, 3));
        img[[0, 0, 0]] = 200;

        let buf = img.to_pixel_buffer().unwrap();
        assert_eq!(buf.get(0, 0).unwrap(), Rgba::rgb(200, 0, 0));
    }

    #[test]
    fn test_array_gray_expands() {
        let mut img = Array3::<u8>::zeros((1, 2, 1));
        img[[0, 1, 0]] = 128;

        let buf = img.to_pixel_buffer().unwrap();
        assert_eq!(buf.get(1, 0).unwrap(), Rgba::rgb(128, 128, 128));

        let out = Array3::<u8>::from_pixel_buffer(&buf);
        assert_eq!(out.dim(), (1, 2, 4));
    }

    #[test]
    fn test_array_bad_channel_count() {
        let img = Array3::<u8>::zeros((2, 2, 2));
        assert!(matches!(
            img.to_pixel_buffer(),
            Err(FilterError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_argb_roundtrip() {
        let surface = ArgbSurface {
            width: 2,
            height: 1,
            pixels: vec![0xFF00_FF00, 0x1234_5678],
        };
        let buf = surface.to_pixel_buffer().unwrap();
        assert_eq!(buf.get(1, 0).unwrap(), Rgba::argb(0x12, 0x34, 0x56, 0x78));
        assert_eq!(ArgbSurface::from_pixel_buffer(&buf), surface);
    }

    #[test]
    fn test_argb_wrong_length() {
        let surface = ArgbSurface {
            width: 2,
            height: 2,
            pixels: vec![0; 3],
        };
        assert!(matches!(
            surface.to_pixel_buffer(),
            Err(FilterError::ShapeMismatch { expected: 4, actual: 3 })
        ));
    }
}
