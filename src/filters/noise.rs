//! Noise filters: Snow, Flea.
//!
//! Both filters consume one pseudo-random decision per pixel. The generator
//! is injected so results are reproducible under a fixed seed:
//!
//! - `*_with_rng` takes any [`rand::Rng`]
//! - `*_seeded` builds a [`StdRng`] from a `u64` seed
//! - the plain variants draw from [`rand::thread_rng`]
//!
//! Pixels are visited in row-major order on the calling thread, so the same
//! generator state always produces the same image.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::buffer::{PixelBuffer, Rgba};

/// Exclusive upper bound for every random draw.
const DRAW_LIMIT: u8 = 255;

fn map_pixels_seq<R, F>(src: &PixelBuffer, rng: &mut R, mut f: F) -> PixelBuffer
where
    R: Rng + ?Sized,
    F: FnMut(Rgba, &mut R) -> Rgba,
{
    let samples = src.samples().iter().map(|&px| f(px, rng)).collect();
    PixelBuffer::from_parts(src.width(), src.height(), samples)
}

// ============================================================================
// Snow
// ============================================================================

/// Whiten bright pixels at random.
///
/// Per pixel a threshold is drawn from `[0, 255)`; if red, green and blue
/// all exceed it, the pixel becomes opaque white.
pub fn snow_effect_with_rng<R: Rng + ?Sized>(src: &PixelBuffer, rng: &mut R) -> PixelBuffer {
    debug!(width = src.width(), height = src.height(), "snow effect");

    map_pixels_seq(src, rng, |px, rng| {
        let threshold = rng.gen_range(0..DRAW_LIMIT);
        if px.r > threshold && px.g > threshold && px.b > threshold {
            Rgba::WHITE
        } else {
            px
        }
    })
}

/// [`snow_effect_with_rng`] with a reproducible seed.
pub fn snow_effect_seeded(src: &PixelBuffer, seed: u64) -> PixelBuffer {
    snow_effect_with_rng(src, &mut StdRng::seed_from_u64(seed))
}

/// [`snow_effect_with_rng`] using the thread-local generator.
pub fn snow_effect(src: &PixelBuffer) -> PixelBuffer {
    snow_effect_with_rng(src, &mut rand::thread_rng())
}

// ============================================================================
// Flea
// ============================================================================

/// OR a random color into every pixel.
///
/// Red, green and blue are drawn (in that order) from `[0, 255)` and
/// bitwise-ORed into the source channels. Alpha is preserved.
pub fn flea_effect_with_rng<R: Rng + ?Sized>(src: &PixelBuffer, rng: &mut R) -> PixelBuffer {
    debug!(width = src.width(), height = src.height(), "flea effect");

    map_pixels_seq(src, rng, |px, rng| {
        let r = rng.gen_range(0..DRAW_LIMIT);
        let g = rng.gen_range(0..DRAW_LIMIT);
        let b = rng.gen_range(0..DRAW_LIMIT);
        px.with_rgb(px.r | r, px.g | g, px.b | b)
    })
}

/// [`flea_effect_with_rng`] with a reproducible seed.
pub fn flea_effect_seeded(src: &PixelBuffer, seed: u64) -> PixelBuffer {
    flea_effect_with_rng(src, &mut StdRng::seed_from_u64(seed))
}

/// [`flea_effect_with_rng`] using the thread-local generator.
pub fn flea_effect(src: &PixelBuffer) -> PixelBuffer {
    flea_effect_with_rng(src, &mut rand::thread_rng())
}
