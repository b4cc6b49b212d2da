//! 3x3 convolution kernels: Gaussian Blur, Sharpen, Mean Removal, Smooth, Emboss, Engrave.
//!
//! Every preset is the same engine with a different weight matrix, divisor
//! and bias. For each interior pixel the weighted sum of its 3x3
//! neighborhood is computed per color channel, then
//!
//! ```text
//! out = clamp(round(sum / factor + offset), 0, 255)
//! ```
//!
//! ## Border Policy
//!
//! The one pixel wide border (first/last row and column) is copied from the
//! source unchanged; no edge extension or wrapping takes place. Buffers
//! narrower or shorter than 3 pixels therefore come back untouched.
//!
//! ## Kernel Orientation
//!
//! `weights[row][col]` multiplies the neighbor at `(x + col - 1, y + row - 1)`.
//!
//! Alpha of the center pixel is always carried over.

use rayon::prelude::*;
use tracing::debug;

use crate::buffer::{PixelBuffer, Rgba};
use crate::error::{ensure_finite, FilterError, FilterResult};

/// Row-major 3x3 weight matrix.
pub type Weights = [[f64; 3]; 3];

const GAUSSIAN_BLUR: Weights = [[1.0, 2.0, 1.0], [2.0, 4.0, 2.0], [1.0, 2.0, 1.0]];
const MEAN_REMOVAL: Weights = [[-1.0, -1.0, -1.0], [-1.0, 9.0, -1.0], [-1.0, -1.0, -1.0]];
const EMBOSS: Weights = [[-1.0, 0.0, -1.0], [0.0, 4.0, 0.0], [-1.0, 0.0, -1.0]];

/// A 3x3 weight matrix with its normalization divisor and bias.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConvolutionKernel {
    weights: Weights,
    factor: f64,
    offset: f64,
}

impl ConvolutionKernel {
    /// Kernel edge length.
    pub const SIZE: usize = 3;

    /// Create a kernel from raw weights.
    ///
    /// # Arguments
    /// * `weights` - 3x3 weight matrix, `weights[row][col]`
    /// * `factor` - Divisor applied to the weighted sum (must be non-zero)
    /// * `offset` - Bias added after division
    ///
    /// # Errors
    /// `InvalidParameter` if `factor` is zero or any value is not finite.
    pub fn new(weights: Weights, factor: f64, offset: f64) -> FilterResult<Self> {
        if weights.iter().flatten().any(|w| !w.is_finite()) {
            return Err(FilterError::InvalidParameter(
                "kernel weights must be finite".into(),
            ));
        }
        let factor = ensure_finite("kernel factor", factor)?;
        if factor == 0.0 {
            return Err(FilterError::InvalidParameter(
                "kernel factor must be non-zero".into(),
            ));
        }
        let offset = ensure_finite("kernel offset", offset)?;
        Ok(ConvolutionKernel {
            weights,
            factor,
            offset,
        })
    }

    pub fn weights(&self) -> &Weights {
        &self.weights
    }

    pub fn factor(&self) -> f64 {
        self.factor
    }

    pub fn offset(&self) -> f64 {
        self.offset
    }

    // ========================================================================
    // Presets
    // ========================================================================

    /// 3x3 binomial blur, `factor = 16`.
    pub const fn gaussian_blur() -> Self {
        ConvolutionKernel {
            weights: GAUSSIAN_BLUR,
            factor: 16.0,
            offset: 0.0,
        }
    }

    /// Sharpen with a configurable center weight, `factor = weight - 8`.
    ///
    /// # Errors
    /// `InvalidParameter` for `weight == 8` (zero divisor) or a non-finite weight.
    pub fn sharpen(weight: f64) -> FilterResult<Self> {
        let weight = ensure_finite("sharpen weight", weight)?;
        Self::new(
            [[0.0, -2.0, 0.0], [-2.0, weight, -2.0], [0.0, -2.0, 0.0]],
            weight - 8.0,
            0.0,
        )
    }

    /// Mean removal (strong sharpen), weights sum to 1.
    pub const fn mean_removal() -> Self {
        ConvolutionKernel {
            weights: MEAN_REMOVAL,
            factor: 1.0,
            offset: 0.0,
        }
    }

    /// Box-like smoothing with a weighted center, `factor = value + 8`, `offset = 1`.
    ///
    /// # Errors
    /// `InvalidParameter` for `value == -8` (zero divisor) or a non-finite value.
    pub fn smooth(value: f64) -> FilterResult<Self> {
        let value = ensure_finite("smooth value", value)?;
        let mut weights = [[1.0; 3]; 3];
        weights[1][1] = value;
        Self::new(weights, value + 8.0, 1.0)
    }

    /// Emboss, biased to mid gray (`offset = 127`).
    pub const fn emboss() -> Self {
        ConvolutionKernel {
            weights: EMBOSS,
            factor: 1.0,
            offset: 127.0,
        }
    }

    /// Engrave: top-left `-2`, center `value`, biased by 95.
    pub fn engrave(value: f64) -> FilterResult<Self> {
        let value = ensure_finite("engrave value", value)?;
        let mut weights = [[0.0; 3]; 3];
        weights[0][0] = -2.0;
        weights[1][1] = value;
        Self::new(weights, 1.0, 95.0)
    }

    // ========================================================================
    // Application
    // ========================================================================

    /// Convolve `src` into a new buffer of identical dimensions.
    ///
    /// Interior rows are processed in parallel; each worker writes only its
    /// own output row, reading from the untouched source.
    pub fn apply(&self, src: &PixelBuffer) -> PixelBuffer {
        let (width, height) = (src.width() as usize, src.height() as usize);
        debug!(
            width,
            height,
            factor = self.factor,
            offset = self.offset,
            "applying 3x3 convolution"
        );

        if width < Self::SIZE || height < Self::SIZE {
            return src.clone();
        }

        let input = src.samples();
        let mut samples = input.to_vec();

        samples
            .par_chunks_mut(width)
            .enumerate()
            .skip(1)
            .take(height - 2)
            .for_each(|(y, row)| {
                for (x, out) in row.iter_mut().enumerate().take(width - 1).skip(1) {
                    *out = self.convolve_at(input, width, x, y);
                }
            });

        PixelBuffer::from_parts(src.width(), src.height(), samples)
    }

    #[inline]
    fn convolve_at(&self, input: &[Rgba], width: usize, x: usize, y: usize) -> Rgba {
        let (mut sum_r, mut sum_g, mut sum_b) = (0.0f64, 0.0f64, 0.0f64);

        for (ky, weight_row) in self.weights.iter().enumerate() {
            let row_start = (y + ky - 1) * width;
            for (kx, &w) in weight_row.iter().enumerate() {
                let px = input[row_start + x + kx - 1];
                sum_r += w * px.r as f64;
                sum_g += w * px.g as f64;
                sum_b += w * px.b as f64;
            }
        }

        let center = input[y * width + x];
        Rgba::argb(
            center.a,
            self.normalize(sum_r),
            self.normalize(sum_g),
            self.normalize(sum_b),
        )
    }

    /// Divide, bias, round to nearest (ties away from zero), clamp.
    #[inline]
    fn normalize(&self, sum: f64) -> u8 {
        (sum / self.factor + self.offset).round().clamp(0.0, 255.0) as u8
    }
}

// ============================================================================
// Filter entry points
// ============================================================================

/// Apply an arbitrary kernel.
pub fn convolve(src: &PixelBuffer, kernel: &ConvolutionKernel) -> PixelBuffer {
    kernel.apply(src)
}

/// Apply the 3x3 Gaussian blur preset.
pub fn gaussian_blur(src: &PixelBuffer) -> PixelBuffer {
    ConvolutionKernel::gaussian_blur().apply(src)
}

/// Sharpen with center weight `weight`.
///
/// # Arguments
/// * `src` - Source buffer
/// * `weight` - Center weight; typical values 9-12, must not be 8
pub fn sharpen(src: &PixelBuffer, weight: f64) -> FilterResult<PixelBuffer> {
    Ok(ConvolutionKernel::sharpen(weight)?.apply(src))
}

/// Apply the mean removal preset.
pub fn mean_removal(src: &PixelBuffer) -> PixelBuffer {
    ConvolutionKernel::mean_removal().apply(src)
}

/// Smooth with center weight `value`; must not be -8.
pub fn smooth(src: &PixelBuffer, value: f64) -> FilterResult<PixelBuffer> {
    Ok(ConvolutionKernel::smooth(value)?.apply(src))
}

/// Apply the emboss preset.
pub fn emboss(src: &PixelBuffer) -> PixelBuffer {
    ConvolutionKernel::emboss().apply(src)
}

/// Engrave with center weight `value`.
pub fn engrave(src: &PixelBuffer, value: f64) -> FilterResult<PixelBuffer> {
    Ok(ConvolutionKernel::engrave(value)?.apply(src))
}
