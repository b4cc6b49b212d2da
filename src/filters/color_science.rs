//! Color science filters: Hue Scale, Saturation Scale.
//!
//! These filters round-trip every pixel through HSV (hexcone model), modify
//! one component and re-encode. The round trip is lossy by at most one step
//! per channel; that is accepted, not an error.
//!
//! Alpha is preserved unchanged.

use tracing::debug;

use crate::buffer::{PixelBuffer, Rgba};
use crate::error::{ensure_finite, FilterResult};

// ============================================================================
// Color Space Conversion
// ============================================================================

/// Hue in degrees `[0, 360)`, saturation and value in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsv {
    pub hue: f32,
    pub saturation: f32,
    pub value: f32,
}

impl Hsv {
    /// Convert 8-bit RGB to HSV.
    pub fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        let (r, g, b) = (r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0);
        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let delta = max - min;

        if delta <= 0.0 {
            return Hsv {
                hue: 0.0,
                saturation: 0.0,
                value: max,
            };
        }

        let hue = if r == max {
            (g - b) / delta
        } else if g == max {
            2.0 + (b - r) / delta
        } else {
            4.0 + (r - g) / delta
        };
        let hue = (hue * 60.0).rem_euclid(360.0);

        Hsv {
            // rem_euclid can land on 360.0 through rounding
            hue: if hue >= 360.0 { 0.0 } else { hue },
            saturation: delta / max,
            value: max,
        }
    }

    /// Convert back to 8-bit RGB, rounding each channel.
    ///
    /// Saturation and value are pinned to `[0, 1]`; a hue outside `[0, 360)`
    /// is treated as 0.
    pub fn to_rgb(self) -> (u8, u8, u8) {
        let s = self.saturation.clamp(0.0, 1.0);
        let v = self.value.clamp(0.0, 1.0);
        let v_byte = to_byte(v);

        if s <= f32::EPSILON {
            return (v_byte, v_byte, v_byte);
        }

        let hx = if (0.0..360.0).contains(&self.hue) {
            self.hue / 60.0
        } else {
            0.0
        };
        let sector = hx.floor();
        let f = hx - sector;

        let p = to_byte((1.0 - s) * v);
        let q = to_byte((1.0 - s * f) * v);
        let t = to_byte((1.0 - s * (1.0 - f)) * v);

        match sector as u32 {
            0 => (v_byte, t, p),
            1 => (q, v_byte, p),
            2 => (p, v_byte, t),
            3 => (p, q, v_byte),
            4 => (t, p, v_byte),
            _ => (v_byte, p, q),
        }
    }
}

#[inline]
fn to_byte(unit: f32) -> u8 {
    (unit * 255.0).round().clamp(0.0, 255.0) as u8
}

fn map_hsv<F>(src: &PixelBuffer, f: F) -> PixelBuffer
where
    F: Fn(Hsv) -> Hsv + Sync + Send,
{
    src.map_pixels(|px| {
        let (r, g, b) = f(Hsv::from_rgb(px.r, px.g, px.b)).to_rgb();
        Rgba::argb(px.a, r, g, b)
    })
}

// ============================================================================
// Hue
// ============================================================================

/// Multiply hue by `level`, clamped to `[0, 360]`.
///
/// This scales rather than rotates: hue 0 (red) never moves, and anything
/// that reaches 360 re-encodes as red.
///
/// # Arguments
/// * `src` - Source buffer
/// * `level` - Hue multiplier
pub fn hue_shift(src: &PixelBuffer, level: f32) -> FilterResult<PixelBuffer> {
    let level = ensure_finite("hue level", level as f64)? as f32;
    debug!(level, "hue scale");

    Ok(map_hsv(src, |hsv| Hsv {
        hue: (hsv.hue * level).clamp(0.0, 360.0),
        ..hsv
    }))
}

// ============================================================================
// Saturation
// ============================================================================

/// Multiply saturation by `level`, clamped to `[0, 1]`.
///
/// `level = 0` fully desaturates while keeping value (brightness).
pub fn saturation_scale(src: &PixelBuffer, level: f32) -> FilterResult<PixelBuffer> {
    let level = ensure_finite("saturation level", level as f64)? as f32;
    debug!(level, "saturation scale");

    Ok(map_hsv(src, |hsv| Hsv {
        saturation: (hsv.saturation * level).clamp(0.0, 1.0),
        ..hsv
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn single(px: Rgba) -> PixelBuffer {
        PixelBuffer::filled(1, 1, px)
    }

    fn first(buf: &PixelBuffer) -> Rgba {
        buf.get(0, 0).unwrap()
    }

    // ========================================================================
    // Conversion Tests
    // ========================================================================

    #[test]
    fn test_rgb_hsv_primaries() {
        let red = Hsv::from_rgb(255, 0, 0);
        assert_relative_eq!(red.hue, 0.0);
        assert_relative_eq!(red.saturation, 1.0);
        assert_relative_eq!(red.value, 1.0);

        assert_relative_eq!(Hsv::from_rgb(0, 255, 0).hue, 120.0);
        assert_relative_eq!(Hsv::from_rgb(0, 0, 255).hue, 240.0);
        assert_relative_eq!(Hsv::from_rgb(255, 0, 255).hue, 300.0);
    }

    #[test]
    fn test_rgb_hsv_gray() {
        let gray = Hsv::from_rgb(128, 128, 128);
        assert_eq!(gray.hue, 0.0);
        assert_eq!(gray.saturation, 0.0);
        assert_relative_eq!(gray.value, 128.0 / 255.0);
    }

    #[test]
    fn test_rgb_hsv_roundtrip_within_one() {
        for &(r, g, b) in &[(200, 100, 50), (12, 240, 180), (90, 90, 91), (255, 1, 128)] {
            let (nr, ng, nb) = Hsv::from_rgb(r, g, b).to_rgb();
            assert!((nr as i32 - r as i32).abs() <= 1);
            assert!((ng as i32 - g as i32).abs() <= 1);
            assert!((nb as i32 - b as i32).abs() <= 1);
        }
    }

    #[test]
    fn test_hsv_360_is_red() {
        let hsv = Hsv {
            hue: 360.0,
            saturation: 1.0,
            value: 1.0,
        };
        assert_eq!(hsv.to_rgb(), (255, 0, 0));
    }

    // ========================================================================
    // Hue Tests
    // ========================================================================

    #[test]
    fn test_hue_shift_level_one_keeps_color() {
        let result = hue_shift(&single(Rgba::argb(77, 0, 255, 0)), 1.0).unwrap();
        assert_eq!(first(&result), Rgba::argb(77, 0, 255, 0));
    }

    #[test]
    fn test_hue_shift_multiplies() {
        // Green (120) * 2 = 240 -> blue
        let result = hue_shift(&single(Rgba::rgb(0, 255, 0)), 2.0).unwrap();
        assert_eq!(first(&result), Rgba::rgb(0, 0, 255));

        // Green (120) * 0 = 0 -> red
        let result = hue_shift(&single(Rgba::rgb(0, 255, 0)), 0.0).unwrap();
        assert_eq!(first(&result), Rgba::rgb(255, 0, 0));
    }

    #[test]
    fn test_hue_shift_clamps_not_wraps() {
        // 120 * 4 = 480 -> clamped to 360 -> red, not 120 (green)
        let result = hue_shift(&single(Rgba::rgb(0, 255, 0)), 4.0).unwrap();
        assert_eq!(first(&result), Rgba::rgb(255, 0, 0));
    }

    #[test]
    fn test_hue_shift_rejects_nan() {
        assert!(hue_shift(&single(Rgba::BLACK), f32::NAN).is_err());
    }

    // ========================================================================
    // Saturation Tests
    // ========================================================================

    #[test]
    fn test_saturation_zero_is_gray_at_same_value() {
        let result = saturation_scale(&single(Rgba::argb(90, 200, 100, 50)), 0.0).unwrap();
        assert_eq!(first(&result), Rgba::argb(90, 200, 200, 200));
    }

    #[test]
    fn test_saturation_clamps_to_one() {
        // s = 0.5, * 10 -> 1.0: min channel drops to 0
        let result = saturation_scale(&single(Rgba::rgb(200, 100, 150)), 10.0).unwrap();
        let px = first(&result);
        assert_eq!(px.r, 200);
        assert_eq!(px.g, 0);
    }

    #[test]
    fn test_saturation_does_not_or_with_source() {
        // Old pixel bits must not leak into the result
        let result = saturation_scale(&single(Rgba::rgb(0b1010_1010, 0b0101_0101, 0)), 0.0).unwrap();
        let px = first(&result);
        assert_eq!((px.r, px.g, px.b), (0b1010_1010, 0b1010_1010, 0b1010_1010));
    }
}
