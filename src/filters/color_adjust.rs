//! Color adjustment filters: Invert, Grayscale, Gamma, Color Filter, Sepia,
//! Color Depth, Contrast, Brightness, Channel Boost, Shading.
//!
//! These are pixel-wise operations that don't require spatial context. Each
//! returns a newly allocated buffer of the same dimensions.
//!
//! ## Alpha
//!
//! Alpha is preserved unchanged by every filter here except [`shading`],
//! which masks all four channels.
//!
//! ## Numeric Rules
//!
//! Channel results are clamped to 0-255. Fractional results are truncated
//! toward zero, with two exceptions: the gamma lookup table rounds half up,
//! and contrast rounds to nearest so that `contrast(0)` is lossless.

use tracing::debug;

use crate::buffer::{clamp_channel, clamp_channel_f64, PixelBuffer, Rgba};
use crate::error::{ensure_finite, FilterError, FilterResult};

/// Selects one color channel for [`boost_intensity`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    Red,
    Green,
    Blue,
}

impl TryFrom<u8> for Channel {
    type Error = FilterError;

    /// 1 = red, 2 = green, 3 = blue.
    fn try_from(value: u8) -> FilterResult<Self> {
        match value {
            1 => Ok(Channel::Red),
            2 => Ok(Channel::Green),
            3 => Ok(Channel::Blue),
            other => Err(FilterError::InvalidParameter(format!(
                "channel selector must be 1, 2 or 3, got {other}"
            ))),
        }
    }
}

// ============================================================================
// Invert
// ============================================================================

/// Invert color channels: `c' = 255 - c`.
pub fn invert(src: &PixelBuffer) -> PixelBuffer {
    src.map_pixels(|px| px.with_rgb(255 - px.r, 255 - px.g, 255 - px.b))
}

// ============================================================================
// Grayscale
// ============================================================================

/// Luminance weights, in thousandths.
const GRAY_R: u32 = 299;
const GRAY_G: u32 = 587;
const GRAY_B: u32 = 114;

/// Truncated luminance `0.299 R + 0.587 G + 0.114 B`.
///
/// Computed in fixed point so that a gray input maps exactly onto itself.
#[inline]
fn luminance(px: Rgba) -> u8 {
    ((GRAY_R * px.r as u32 + GRAY_G * px.g as u32 + GRAY_B * px.b as u32) / 1000) as u8
}

/// Convert to grayscale with R = G = B = luminance.
pub fn grayscale(src: &PixelBuffer) -> PixelBuffer {
    src.map_pixels(|px| {
        let gray = luminance(px);
        px.with_rgb(gray, gray, gray)
    })
}

// ============================================================================
// Gamma
// ============================================================================

fn gamma_table(gamma: f64) -> [u8; 256] {
    let inv_gamma = 1.0 / gamma;
    let mut table = [0u8; 256];
    for (i, entry) in table.iter_mut().enumerate() {
        let corrected = 255.0 * (i as f64 / 255.0).powf(inv_gamma) + 0.5;
        *entry = clamp_channel_f64(corrected);
    }
    table
}

fn validate_gamma(name: &str, gamma: f64) -> FilterResult<f64> {
    let gamma = ensure_finite(name, gamma)?;
    if gamma <= 0.0 {
        return Err(FilterError::InvalidParameter(format!(
            "{name} must be positive, got {gamma}"
        )));
    }
    Ok(gamma)
}

/// Per-channel gamma correction.
///
/// Builds three 256-entry lookup tables once, then maps every pixel
/// through them.
///
/// # Arguments
/// * `src` - Source buffer
/// * `red`, `green`, `blue` - Gamma per channel: > 1.0 brightens, < 1.0 darkens
///
/// # Errors
/// `InvalidParameter` if any gamma is not a positive finite number.
pub fn gamma_correct(src: &PixelBuffer, red: f64, green: f64, blue: f64) -> FilterResult<PixelBuffer> {
    let table_r = gamma_table(validate_gamma("red gamma", red)?);
    let table_g = gamma_table(validate_gamma("green gamma", green)?);
    let table_b = gamma_table(validate_gamma("blue gamma", blue)?);
    debug!(red, green, blue, "gamma correction");

    Ok(src.map_pixels(|px| {
        px.with_rgb(
            table_r[px.r as usize],
            table_g[px.g as usize],
            table_b[px.b as usize],
        )
    }))
}

// ============================================================================
// Color Filter
// ============================================================================

/// Scale each channel by its own factor: `c' = clamp(c * factor)`.
pub fn filter_color(src: &PixelBuffer, red: f64, green: f64, blue: f64) -> FilterResult<PixelBuffer> {
    let red = ensure_finite("red factor", red)?;
    let green = ensure_finite("green factor", green)?;
    let blue = ensure_finite("blue factor", blue)?;

    Ok(src.map_pixels(|px| {
        px.with_rgb(
            clamp_channel_f64(px.r as f64 * red),
            clamp_channel_f64(px.g as f64 * green),
            clamp_channel_f64(px.b as f64 * blue),
        )
    }))
}

// ============================================================================
// Sepia
// ============================================================================

/// Desaturate with 0.3/0.59/0.11 weights, then tint by `depth * weight` per channel.
///
/// # Arguments
/// * `src` - Source buffer
/// * `depth` - Tint strength, typically 0-100
/// * `red`, `green`, `blue` - Tint weight per channel
///
/// # Example
///
/// Classic sepia is `sepia_toning(&img, 50, 2.2, 0.0, 0.0)`.
pub fn sepia_toning(
    src: &PixelBuffer,
    depth: i32,
    red: f64,
    green: f64,
    blue: f64,
) -> FilterResult<PixelBuffer> {
    let tint_r = depth as f64 * ensure_finite("red weight", red)?;
    let tint_g = depth as f64 * ensure_finite("green weight", green)?;
    let tint_b = depth as f64 * ensure_finite("blue weight", blue)?;

    Ok(src.map_pixels(|px| {
        let gray = ((30 * px.r as u32 + 59 * px.g as u32 + 11 * px.b as u32) / 100) as f64;
        px.with_rgb(
            clamp_channel_f64(gray + tint_r),
            clamp_channel_f64(gray + tint_g),
            clamp_channel_f64(gray + tint_b),
        )
    }))
}

// ============================================================================
// Color Depth
// ============================================================================

/// Posterize by snapping each channel to a multiple of `bit_offset`, minus one.
///
/// `c' = (c + o/2) - ((c + o/2) mod o) - 1`, floored at 0.
///
/// # Errors
/// `InvalidParameter` if `bit_offset` is 0.
pub fn decrease_color_depth(src: &PixelBuffer, bit_offset: u32) -> FilterResult<PixelBuffer> {
    if bit_offset == 0 {
        return Err(FilterError::InvalidParameter(
            "bit offset must be greater than zero".into(),
        ));
    }
    let offset = bit_offset.min(i32::MAX as u32) as i32;
    let half = offset / 2;

    let reduce = move |c: u8| -> u8 {
        let v = c as i32 + half;
        clamp_channel(v - v % offset - 1)
    };

    Ok(src.map_pixels(|px| px.with_rgb(reduce(px.r), reduce(px.g), reduce(px.b))))
}

// ============================================================================
// Contrast
// ============================================================================

/// Adjust contrast around mid gray.
///
/// `factor = ((100 + value) / 100)^2`, then for every channel
/// `c' = ((c / 255 - 0.5) * factor + 0.5) * 255`, rounded and clamped.
///
/// # Arguments
/// * `value` - Contrast amount: -100 flattens to gray, 0 = no change, positive increases
pub fn contrast(src: &PixelBuffer, value: f64) -> FilterResult<PixelBuffer> {
    let value = ensure_finite("contrast", value)?;
    let factor = ((100.0 + value) / 100.0).powi(2);
    debug!(value, factor, "contrast");

    let adjust = move |c: u8| -> u8 {
        let v = ((c as f64 / 255.0 - 0.5) * factor + 0.5) * 255.0;
        v.round().clamp(0.0, 255.0) as u8
    };

    Ok(src.map_pixels(|px| px.with_rgb(adjust(px.r), adjust(px.g), adjust(px.b))))
}

// ============================================================================
// Brightness
// ============================================================================

/// Add `value` to every color channel, clamped.
pub fn brightness(src: &PixelBuffer, value: i32) -> PixelBuffer {
    let shift = move |c: u8| clamp_channel((c as i32).saturating_add(value));
    src.map_pixels(|px| px.with_rgb(shift(px.r), shift(px.g), shift(px.b)))
}

// ============================================================================
// Channel Boost
// ============================================================================

/// Scale one channel by `1 + percent`; the other two pass through.
///
/// # Arguments
/// * `channel` - Channel to boost
/// * `percent` - Fractional boost, e.g. `0.5` for +50%
pub fn boost_intensity(src: &PixelBuffer, channel: Channel, percent: f64) -> FilterResult<PixelBuffer> {
    let scale = 1.0 + ensure_finite("boost percent", percent)?;
    let boost = move |c: u8| clamp_channel_f64(c as f64 * scale);

    Ok(src.map_pixels(|px| match channel {
        Channel::Red => px.with_rgb(boost(px.r), px.g, px.b),
        Channel::Green => px.with_rgb(px.r, boost(px.g), px.b),
        Channel::Blue => px.with_rgb(px.r, px.g, boost(px.b)),
    }))
}

// ============================================================================
// Shading
// ============================================================================

/// Bitwise AND every pixel with `mask`, alpha included.
pub fn shading(src: &PixelBuffer, mask: Rgba) -> PixelBuffer {
    let mask = mask.to_argb_u32();
    src.map_pixels(|px| Rgba::from_argb_u32(px.to_argb_u32() & mask))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single(px: Rgba) -> PixelBuffer {
        PixelBuffer::filled(1, 1, px)
    }

    fn first(buf: &PixelBuffer) -> Rgba {
        buf.get(0, 0).unwrap()
    }

    // ========================================================================
    // Invert Tests
    // ========================================================================

    #[test]
    fn test_invert_rgba() {
        let result = invert(&single(Rgba::argb(128, 100, 200, 50)));
        assert_eq!(first(&result), Rgba::argb(128, 155, 55, 205));
    }

    #[test]
    fn test_invert_involutive() {
        let src = PixelBuffer::from_fn(4, 3, |x, y| Rgba::argb(y as u8 * 60, x as u8 * 70, 13, 255));
        assert_eq!(invert(&invert(&src)), src);
    }

    // ========================================================================
    // Grayscale Tests
    // ========================================================================

    #[test]
    fn test_grayscale_red() {
        let src = PixelBuffer::filled(2, 2, Rgba::argb(255, 255, 0, 0));
        let result = grayscale(&src);
        assert!(result.samples().iter().all(|&p| p == Rgba::argb(255, 76, 76, 76)));
    }

    #[test]
    fn test_grayscale_idempotent_for_every_level() {
        let src = PixelBuffer::from_fn(256, 1, |x, _| Rgba::rgb(x as u8, x as u8, x as u8));
        assert_eq!(grayscale(&src), src);
    }

    #[test]
    fn test_grayscale_preserves_alpha() {
        let result = grayscale(&single(Rgba::argb(7, 10, 20, 30)));
        assert_eq!(first(&result).a, 7);
    }

    // ========================================================================
    // Gamma Tests
    // ========================================================================

    #[test]
    fn test_gamma_one_is_identity() {
        let src = PixelBuffer::from_fn(256, 1, |x, _| Rgba::argb(9, x as u8, 255 - x as u8, x as u8 / 2));
        assert_eq!(gamma_correct(&src, 1.0, 1.0, 1.0).unwrap(), src);
    }

    #[test]
    fn test_gamma_table_values() {
        let table = gamma_table(2.0);
        assert_eq!(table[0], 0);
        assert_eq!(table[255], 255);
        // 255 * sqrt(64 / 255) + 0.5 = 128.249...
        assert_eq!(table[64], 128);
    }

    #[test]
    fn test_gamma_per_channel() {
        let result = gamma_correct(&single(Rgba::rgb(64, 64, 64)), 2.0, 1.0, 0.5).unwrap();
        let px = first(&result);
        assert_eq!(px.r, 128);
        assert_eq!(px.g, 64);
        assert!(px.b < 64);
    }

    #[test]
    fn test_gamma_rejects_non_positive() {
        let src = single(Rgba::BLACK);
        assert!(matches!(
            gamma_correct(&src, 0.0, 1.0, 1.0),
            Err(FilterError::InvalidParameter(_))
        ));
        assert!(gamma_correct(&src, 1.0, -2.0, 1.0).is_err());
        assert!(gamma_correct(&src, 1.0, 1.0, f64::NAN).is_err());
    }

    // ========================================================================
    // Color Filter Tests
    // ========================================================================

    #[test]
    fn test_filter_color_scales_and_clamps() {
        let result = filter_color(&single(Rgba::argb(1, 100, 100, 100)), 0.5, 3.0, -1.0).unwrap();
        assert_eq!(first(&result), Rgba::argb(1, 50, 255, 0));
    }

    // ========================================================================
    // Sepia Tests
    // ========================================================================

    #[test]
    fn test_sepia_toning() {
        // gray = (30*100 + 59*150 + 11*200) / 100 = 140
        let result = sepia_toning(&single(Rgba::rgb(100, 150, 200)), 50, 2.2, 0.5, 0.0).unwrap();
        assert_eq!(first(&result), Rgba::rgb(250, 165, 140));
    }

    #[test]
    fn test_sepia_clamps_high() {
        let result = sepia_toning(&single(Rgba::WHITE), 100, 1.0, 0.0, 0.0).unwrap();
        assert_eq!(first(&result), Rgba::WHITE);
    }

    // ========================================================================
    // Color Depth Tests
    // ========================================================================

    #[test]
    fn test_decrease_color_depth() {
        // offset 64: 100 + 32 = 132 -> 132 - 4 - 1 = 127
        //            10 + 32 = 42 -> 42 - 42 - 1 = -1 -> 0
        //            255 + 32 = 287 -> 287 - 31 - 1 = 255
        let result = decrease_color_depth(&single(Rgba::argb(3, 100, 10, 255)), 64).unwrap();
        assert_eq!(first(&result), Rgba::argb(3, 127, 0, 255));
    }

    #[test]
    fn test_decrease_color_depth_zero_rejected() {
        let err = decrease_color_depth(&single(Rgba::BLACK), 0).unwrap_err();
        assert!(matches!(err, FilterError::InvalidParameter(_)));
    }

    // ========================================================================
    // Contrast Tests
    // ========================================================================

    #[test]
    fn test_contrast_zero_is_identity() {
        let src = PixelBuffer::from_fn(256, 1, |x, _| Rgba::rgb(x as u8, 255 - x as u8, 17));
        assert_eq!(contrast(&src, 0.0).unwrap(), src);
    }

    #[test]
    fn test_contrast_uses_each_channel() {
        let result = contrast(&single(Rgba::argb(50, 200, 50, 128)), 50.0).unwrap();
        let px = first(&result);
        assert!(px.r > 200);
        assert!(px.g < 50);
        assert_eq!(px.a, 50);
    }

    #[test]
    fn test_contrast_minus_100_is_mid_gray() {
        let result = contrast(&single(Rgba::rgb(0, 90, 255)), -100.0).unwrap();
        assert_eq!(first(&result), Rgba::rgb(128, 128, 128));
    }

    // ========================================================================
    // Brightness Tests
    // ========================================================================

    #[test]
    fn test_brightness_bounds() {
        let src = PixelBuffer::from_fn(16, 16, |x, y| Rgba::argb(x as u8, (x * 16) as u8, (y * 16) as u8, 200));
        assert_eq!(brightness(&src, 0), src);
        assert!(brightness(&src, -255).samples().iter().all(|p| (p.r, p.g, p.b) == (0, 0, 0)));
        assert!(brightness(&src, 255).samples().iter().all(|p| (p.r, p.g, p.b) == (255, 255, 255)));
        assert!(brightness(&src, i32::MAX).samples().iter().zip(src.samples()).all(|(o, s)| o.a == s.a));
    }

    // ========================================================================
    // Channel Boost Tests
    // ========================================================================

    #[test]
    fn test_boost_intensity_single_channel() {
        let src = single(Rgba::rgb(100, 100, 200));
        assert_eq!(first(&boost_intensity(&src, Channel::Red, 0.5).unwrap()), Rgba::rgb(150, 100, 200));
        assert_eq!(first(&boost_intensity(&src, Channel::Green, -0.25).unwrap()), Rgba::rgb(100, 75, 200));
        assert_eq!(first(&boost_intensity(&src, Channel::Blue, 1.0).unwrap()), Rgba::rgb(100, 100, 255));
    }

    #[test]
    fn test_channel_selector() {
        assert_eq!(Channel::try_from(2), Ok(Channel::Green));
        assert!(Channel::try_from(0).is_err());
        assert!(Channel::try_from(4).is_err());
    }

    // ========================================================================
    // Shading Tests
    // ========================================================================

    #[test]
    fn test_shading_masks_all_channels() {
        let result = shading(&single(Rgba::argb(0xFF, 0xAB, 0xCD, 0xEF)), Rgba::argb(0x80, 0xFF, 0x0F, 0x00));
        assert_eq!(first(&result), Rgba::argb(0x80, 0xAB, 0x0D, 0x00));
    }
}
