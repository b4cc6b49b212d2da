//! WebAssembly exports for rasterfx filters.
//!
//! These functions are exposed to JavaScript via wasm-bindgen.
//!
//! ## Data Layout
//!
//! Every function takes a flat array of RGBA bytes (length =
//! `width * height * 4`, as returned by `ImageData.data`) and returns a new
//! flat RGBA array of the output dimensions. Invalid input or parameters
//! reject with an error string.

use ndarray::Array3;
use wasm_bindgen::prelude::*;

use crate::filters::{color_adjust, color_science, convolution, noise, rotate};
use crate::surface::{buffer_from_array, buffer_to_array};
use crate::{FilterError, FilterResult, PixelBuffer};

fn read(data: &[u8], width: usize, height: usize) -> FilterResult<PixelBuffer> {
    let input = Array3::from_shape_vec((height, width, 4), data.to_vec()).map_err(|_| {
        FilterError::ShapeMismatch {
            expected: width * height * 4,
            actual: data.len(),
        }
    })?;
    buffer_from_array(input.view())
}

fn write(buffer: &PixelBuffer) -> Vec<u8> {
    buffer_to_array(buffer).into_raw_vec_and_offset().0
}

fn js_err(err: FilterError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Decode, filter, encode.
fn run<F>(data: &[u8], width: usize, height: usize, filter: F) -> Result<Vec<u8>, JsValue>
where
    F: FnOnce(&PixelBuffer) -> FilterResult<PixelBuffer>,
{
    let src = read(data, width, height).map_err(js_err)?;
    let out = filter(&src).map_err(js_err)?;
    Ok(write(&out))
}

// ============================================================================
// Color Adjustment Filters
// ============================================================================

#[wasm_bindgen]
pub fn invert_wasm(data: &[u8], width: usize, height: usize) -> Result<Vec<u8>, JsValue> {
    run(data, width, height, |src| Ok(color_adjust::invert(src)))
}

#[wasm_bindgen]
pub fn grayscale_wasm(data: &[u8], width: usize, height: usize) -> Result<Vec<u8>, JsValue> {
    run(data, width, height, |src| Ok(color_adjust::grayscale(src)))
}

#[wasm_bindgen]
pub fn gamma_correct_wasm(
    data: &[u8],
    width: usize,
    height: usize,
    red: f64,
    green: f64,
    blue: f64,
) -> Result<Vec<u8>, JsValue> {
    run(data, width, height, |src| color_adjust::gamma_correct(src, red, green, blue))
}

#[wasm_bindgen]
pub fn filter_color_wasm(
    data: &[u8],
    width: usize,
    height: usize,
    red: f64,
    green: f64,
    blue: f64,
) -> Result<Vec<u8>, JsValue> {
    run(data, width, height, |src| color_adjust::filter_color(src, red, green, blue))
}

#[wasm_bindgen]
pub fn sepia_toning_wasm(
    data: &[u8],
    width: usize,
    height: usize,
    depth: i32,
    red: f64,
    green: f64,
    blue: f64,
) -> Result<Vec<u8>, JsValue> {
    run(data, width, height, |src| color_adjust::sepia_toning(src, depth, red, green, blue))
}

#[wasm_bindgen]
pub fn decrease_color_depth_wasm(
    data: &[u8],
    width: usize,
    height: usize,
    bit_offset: u32,
) -> Result<Vec<u8>, JsValue> {
    run(data, width, height, |src| color_adjust::decrease_color_depth(src, bit_offset))
}

#[wasm_bindgen]
pub fn contrast_wasm(data: &[u8], width: usize, height: usize, value: f64) -> Result<Vec<u8>, JsValue> {
    run(data, width, height, |src| color_adjust::contrast(src, value))
}

#[wasm_bindgen]
pub fn brightness_wasm(data: &[u8], width: usize, height: usize, value: i32) -> Result<Vec<u8>, JsValue> {
    run(data, width, height, |src| Ok(color_adjust::brightness(src, value)))
}

/// Boost one channel: 1 = red, 2 = green, 3 = blue.
#[wasm_bindgen]
pub fn boost_intensity_wasm(
    data: &[u8],
    width: usize,
    height: usize,
    channel: u8,
    percent: f64,
) -> Result<Vec<u8>, JsValue> {
    run(data, width, height, |src| {
        let channel = color_adjust::Channel::try_from(channel)?;
        color_adjust::boost_intensity(src, channel, percent)
    })
}

#[wasm_bindgen]
pub fn shading_wasm(data: &[u8], width: usize, height: usize, mask: u32) -> Result<Vec<u8>, JsValue> {
    run(data, width, height, |src| {
        Ok(color_adjust::shading(src, crate::Rgba::from_argb_u32(mask)))
    })
}

// ============================================================================
// Color Science Filters
// ============================================================================

#[wasm_bindgen]
pub fn hue_shift_wasm(data: &[u8], width: usize, height: usize, level: f32) -> Result<Vec<u8>, JsValue> {
    run(data, width, height, |src| color_science::hue_shift(src, level))
}

#[wasm_bindgen]
pub fn saturation_scale_wasm(
    data: &[u8],
    width: usize,
    height: usize,
    level: f32,
) -> Result<Vec<u8>, JsValue> {
    run(data, width, height, |src| color_science::saturation_scale(src, level))
}

// ============================================================================
// Noise Filters
// ============================================================================

#[wasm_bindgen]
pub fn snow_effect_wasm(
    data: &[u8],
    width: usize,
    height: usize,
    seed: Option<u64>,
) -> Result<Vec<u8>, JsValue> {
    run(data, width, height, |src| {
        Ok(match seed {
            Some(seed) => noise::snow_effect_seeded(src, seed),
            None => noise::snow_effect(src),
        })
    })
}

#[wasm_bindgen]
pub fn flea_effect_wasm(
    data: &[u8],
    width: usize,
    height: usize,
    seed: Option<u64>,
) -> Result<Vec<u8>, JsValue> {
    run(data, width, height, |src| {
        Ok(match seed {
            Some(seed) => noise::flea_effect_seeded(src, seed),
            None => noise::flea_effect(src),
        })
    })
}

// ============================================================================
// Convolution Filters
// ============================================================================

#[wasm_bindgen]
pub fn gaussian_blur_wasm(data: &[u8], width: usize, height: usize) -> Result<Vec<u8>, JsValue> {
    run(data, width, height, |src| Ok(convolution::gaussian_blur(src)))
}

#[wasm_bindgen]
pub fn sharpen_wasm(data: &[u8], width: usize, height: usize, weight: f64) -> Result<Vec<u8>, JsValue> {
    run(data, width, height, |src| convolution::sharpen(src, weight))
}

#[wasm_bindgen]
pub fn mean_removal_wasm(data: &[u8], width: usize, height: usize) -> Result<Vec<u8>, JsValue> {
    run(data, width, height, |src| Ok(convolution::mean_removal(src)))
}

#[wasm_bindgen]
pub fn smooth_wasm(data: &[u8], width: usize, height: usize, value: f64) -> Result<Vec<u8>, JsValue> {
    run(data, width, height, |src| convolution::smooth(src, value))
}

#[wasm_bindgen]
pub fn emboss_wasm(data: &[u8], width: usize, height: usize) -> Result<Vec<u8>, JsValue> {
    run(data, width, height, |src| Ok(convolution::emboss(src)))
}

#[wasm_bindgen]
pub fn engrave_wasm(data: &[u8], width: usize, height: usize, value: f64) -> Result<Vec<u8>, JsValue> {
    run(data, width, height, |src| convolution::engrave(src, value))
}

// ============================================================================
// Geometry
// ============================================================================

/// Mirror: 1 = vertical, 2 = horizontal.
#[wasm_bindgen]
pub fn flip_wasm(data: &[u8], width: usize, height: usize, direction: u8) -> Result<Vec<u8>, JsValue> {
    run(data, width, height, |src| {
        Ok(rotate::flip(src, rotate::FlipDirection::try_from(direction)?))
    })
}

/// Rotate clockwise by a multiple of 90 degrees. 90 and 270 swap the
/// caller's width and height.
#[wasm_bindgen]
pub fn rotate_quarter_wasm(
    data: &[u8],
    width: usize,
    height: usize,
    degrees: i32,
) -> Result<Vec<u8>, JsValue> {
    run(data, width, height, |src| {
        Ok(match rotate::Rotation::from_degrees(degrees)? {
            Some(rotation) => rotate::rotate(src, rotation),
            None => src.clone(),
        })
    })
}
