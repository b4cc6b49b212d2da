//! Filter modules for pixel-level image transforms.
//!
//! ## Calling Convention
//!
//! Every filter borrows a [`PixelBuffer`](crate::PixelBuffer) plus its own
//! parameters and returns a freshly allocated buffer, so the input can be
//! kept and reused. Filters with parameters that can be out of range return
//! [`FilterResult`](crate::FilterResult).
//!
//! ## Filter Categories
//!
//! | Module | Filters | Per-pixel |
//! |--------|---------|-----------|
//! | [`convolution`] | gaussian_blur, sharpen, mean_removal, smooth, emboss, engrave | no (3x3) |
//! | [`color_adjust`] | invert, grayscale, gamma, filter_color, sepia, color depth, contrast, brightness, boost, shading | yes |
//! | [`color_science`] | hue_shift, saturation_scale (HSV) | yes |
//! | [`noise`] | snow, flea (random) | yes |
//! | [`rotate`] | flip, quarter-turn rotate | remap |
//!
//! ## Architecture
//!
//! - **Alpha preservation** - only snow and shading touch alpha
//! - **Thread-safe** - deterministic filters split rows across rayon workers
//! - **Reproducible noise** - random filters take an injectable generator

pub mod color_adjust;
pub mod color_science;
pub mod convolution;
pub mod noise;
pub mod rotate;
