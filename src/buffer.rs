//! RGBA sample and the pixel buffer every filter reads and writes.
//!
//! ## Layout
//!
//! A [`PixelBuffer`] stores `width * height` samples row-major, so the
//! sample for `(x, y)` lives at index `y * width + x`. Buffers are frozen
//! once built: the only way to write individual pixels is through a
//! [`BufferBuilder`], which is consumed by [`BufferBuilder::finish`].
//!
//! ## Sample order
//!
//! [`Rgba`] keeps the channels in alpha, red, green, blue order and packs
//! to the `0xAARRGGBB` word used by host bitmaps.

use rayon::prelude::*;

use crate::error::{FilterError, FilterResult};

// ============================================================================
// Rgba
// ============================================================================

/// One 8-bit-per-channel sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgba {
    pub a: u8,
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgba {
    pub const TRANSPARENT: Rgba = Rgba::argb(0, 0, 0, 0);
    pub const BLACK: Rgba = Rgba::argb(255, 0, 0, 0);
    pub const WHITE: Rgba = Rgba::argb(255, 255, 255, 255);

    /// Build a sample from alpha, red, green, blue.
    #[inline]
    pub const fn argb(a: u8, r: u8, g: u8, b: u8) -> Self {
        Rgba { a, r, g, b }
    }

    /// Build a fully opaque sample.
    #[inline]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Rgba { a: 255, r, g, b }
    }

    /// Unpack a `0xAARRGGBB` word.
    #[inline]
    pub const fn from_argb_u32(word: u32) -> Self {
        Rgba {
            a: (word >> 24) as u8,
            r: (word >> 16) as u8,
            g: (word >> 8) as u8,
            b: word as u8,
        }
    }

    /// Pack into a `0xAARRGGBB` word.
    #[inline]
    pub const fn to_argb_u32(self) -> u32 {
        (self.a as u32) << 24 | (self.r as u32) << 16 | (self.g as u32) << 8 | self.b as u32
    }

    /// Same alpha, new color channels.
    #[inline]
    pub const fn with_rgb(self, r: u8, g: u8, b: u8) -> Self {
        Rgba { a: self.a, r, g, b }
    }
}

impl From<u32> for Rgba {
    fn from(word: u32) -> Self {
        Rgba::from_argb_u32(word)
    }
}

impl From<Rgba> for u32 {
    fn from(px: Rgba) -> Self {
        px.to_argb_u32()
    }
}

/// Clamp an integer channel result into `0..=255`.
#[inline]
pub(crate) fn clamp_channel(v: i32) -> u8 {
    v.clamp(0, 255) as u8
}

/// Truncate toward zero, then clamp into `0..=255`.
///
/// `as i32` saturates, so out-of-range floats land on the clamp as well.
#[inline]
pub(crate) fn clamp_channel_f64(v: f64) -> u8 {
    clamp_channel(v as i32)
}

// ============================================================================
// PixelBuffer
// ============================================================================

fn sample_count(width: u32, height: u32) -> usize {
    width as usize * height as usize
}

/// An immutable `width x height` grid of [`Rgba`] samples.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    samples: Vec<Rgba>,
}

impl PixelBuffer {
    /// Wrap a row-major sample vector.
    ///
    /// # Errors
    /// `ShapeMismatch` if `samples.len() != width * height`.
    pub fn new(width: u32, height: u32, samples: Vec<Rgba>) -> FilterResult<Self> {
        let expected = sample_count(width, height);
        if samples.len() != expected {
            return Err(FilterError::ShapeMismatch {
                expected,
                actual: samples.len(),
            });
        }
        Ok(PixelBuffer {
            width,
            height,
            samples,
        })
    }

    /// Internal constructor for transforms that already hold a correctly sized vector.
    pub(crate) fn from_parts(width: u32, height: u32, samples: Vec<Rgba>) -> Self {
        debug_assert_eq!(samples.len(), sample_count(width, height));
        PixelBuffer {
            width,
            height,
            samples,
        }
    }

    /// A buffer where every pixel is `color`.
    pub fn filled(width: u32, height: u32, color: Rgba) -> Self {
        PixelBuffer {
            width,
            height,
            samples: vec![color; sample_count(width, height)],
        }
    }

    /// Build a buffer by evaluating `f(x, y)` for every pixel in row-major order.
    pub fn from_fn<F>(width: u32, height: u32, mut f: F) -> Self
    where
        F: FnMut(u32, u32) -> Rgba,
    {
        let mut samples = Vec::with_capacity(sample_count(width, height));
        for y in 0..height {
            for x in 0..width {
                samples.push(f(x, y));
            }
        }
        PixelBuffer {
            width,
            height,
            samples,
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of pixels.
    #[inline]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Row-major samples.
    #[inline]
    pub fn samples(&self) -> &[Rgba] {
        &self.samples
    }

    pub fn into_samples(self) -> Vec<Rgba> {
        self.samples
    }

    /// Sample at `(x, y)`.
    ///
    /// # Errors
    /// `OutOfBounds` if `x >= width` or `y >= height`.
    pub fn get(&self, x: u32, y: u32) -> FilterResult<Rgba> {
        self.index_of(x, y).map(|i| self.samples[i])
    }

    /// Iterate rows top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Rgba]> {
        self.samples.chunks(self.width.max(1) as usize)
    }

    fn index_of(&self, x: u32, y: u32) -> FilterResult<usize> {
        checked_index(x, y, self.width, self.height)
    }

    /// Apply `f` to every sample into a freshly allocated buffer.
    ///
    /// Rows are split across the rayon pool; each worker writes only its own
    /// output row.
    pub(crate) fn map_pixels<F>(&self, f: F) -> PixelBuffer
    where
        F: Fn(Rgba) -> Rgba + Sync + Send,
    {
        let row_len = self.width.max(1) as usize;
        let mut samples = vec![Rgba::TRANSPARENT; self.samples.len()];

        samples
            .par_chunks_mut(row_len)
            .zip(self.samples.par_chunks(row_len))
            .for_each(|(out_row, in_row)| {
                for (out, &px) in out_row.iter_mut().zip(in_row) {
                    *out = f(px);
                }
            });

        PixelBuffer {
            width: self.width,
            height: self.height,
            samples,
        }
    }
}

fn checked_index(x: u32, y: u32, width: u32, height: u32) -> FilterResult<usize> {
    if x >= width || y >= height {
        return Err(FilterError::OutOfBounds {
            x,
            y,
            width,
            height,
        });
    }
    Ok(y as usize * width as usize + x as usize)
}

// ============================================================================
// BufferBuilder
// ============================================================================

/// Write access to a buffer under construction.
///
/// Pixels can only be set here; [`finish`](BufferBuilder::finish) hands out
/// the frozen [`PixelBuffer`].
#[derive(Debug, Clone)]
pub struct BufferBuilder {
    width: u32,
    height: u32,
    samples: Vec<Rgba>,
}

impl BufferBuilder {
    /// Start from a transparent black canvas.
    pub fn new(width: u32, height: u32) -> Self {
        BufferBuilder {
            width,
            height,
            samples: vec![Rgba::TRANSPARENT; sample_count(width, height)],
        }
    }

    /// Start from a copy of an existing buffer.
    pub fn from_buffer(buffer: &PixelBuffer) -> Self {
        BufferBuilder {
            width: buffer.width,
            height: buffer.height,
            samples: buffer.samples.clone(),
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn get(&self, x: u32, y: u32) -> FilterResult<Rgba> {
        checked_index(x, y, self.width, self.height).map(|i| self.samples[i])
    }

    /// Set the sample at `(x, y)`.
    ///
    /// # Errors
    /// `OutOfBounds` if `x >= width` or `y >= height`.
    pub fn set(&mut self, x: u32, y: u32, value: Rgba) -> FilterResult<()> {
        let i = checked_index(x, y, self.width, self.height)?;
        self.samples[i] = value;
        Ok(())
    }

    /// Freeze into an immutable buffer.
    pub fn finish(self) -> PixelBuffer {
        PixelBuffer {
            width: self.width,
            height: self.height,
            samples: self.samples,
        }
    }
}
