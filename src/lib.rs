//! rasterfx
//!
//! Pixel-level image transforms over an in-memory RGBA buffer, with Python
//! bindings via PyO3 and WASM bindings for JavaScript.
//!
//! ## Image Format
//! Every filter operates on a [`PixelBuffer`]: `width x height` samples of
//! [`Rgba`] (8 bits per channel), row-major. Host images get in and out
//! through the [`Surface`] trait:
//! - **ndarray**: (height, width, channels) with 1, 3 or 4 channels
//! - **Packed ARGB**: `0xAARRGGBB` words, see [`ArgbSurface`]
//!
//! ## Filter Architecture
//! Filters are free functions grouped under [`filters`]. Each borrows its
//! input and allocates a new output, so buffers are never mutated after
//! construction. The 3x3 kernels share one engine,
//! [`ConvolutionKernel`], configured by presets.
//!
//! ```
//! use rasterfx::filters::{color_adjust, convolution};
//! use rasterfx::{PixelBuffer, Rgba};
//!
//! let img = PixelBuffer::filled(5, 5, Rgba::rgb(200, 120, 40));
//! let blurred = convolution::gaussian_blur(&img);
//! let gray = color_adjust::grayscale(&blurred);
//! assert_eq!(gray.get(2, 2).unwrap(), Rgba::rgb(134, 134, 134));
//! ```

pub mod buffer;
pub mod error;
pub mod filters;
pub mod surface;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use buffer::{BufferBuilder, PixelBuffer, Rgba};
pub use error::{FilterError, FilterResult};
pub use filters::convolution::ConvolutionKernel;
pub use surface::{ArgbSurface, Surface};

// Python bindings (only when python feature is enabled)
#[cfg(feature = "python")]
mod python {
    use numpy::{IntoPyArray, PyArray3, PyReadonlyArray3};
    use pyo3::exceptions::PyValueError;
    use pyo3::prelude::*;

    use crate::filters::{color_adjust, color_science, convolution, noise, rotate};
    use crate::surface::{buffer_from_array, buffer_to_array};
    use crate::{ConvolutionKernel, FilterError, PixelBuffer, Rgba};

    impl From<FilterError> for PyErr {
        fn from(err: FilterError) -> PyErr {
            PyValueError::new_err(err.to_string())
        }
    }

    fn read(image: &PyReadonlyArray3<'_, u8>) -> PyResult<PixelBuffer> {
        Ok(buffer_from_array(image.as_array())?)
    }

    fn write<'py>(py: Python<'py>, buffer: &PixelBuffer) -> Bound<'py, PyArray3<u8>> {
        buffer_to_array(buffer).into_pyarray(py)
    }

    // ========================================================================
    // Color Adjustment Filters
    // ========================================================================

    /// Invert RGB channels, alpha preserved.
    #[pyfunction]
    pub fn invert<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let result = color_adjust::invert(&read(&image)?);
        Ok(write(py, &result))
    }

    /// Grayscale with 0.299/0.587/0.114 weights. Output is RGBA with R=G=B.
    #[pyfunction]
    pub fn grayscale<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let result = color_adjust::grayscale(&read(&image)?);
        Ok(write(py, &result))
    }

    #[pyfunction]
    #[pyo3(signature = (image, red=1.0, green=1.0, blue=1.0))]
    pub fn gamma_correct<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        red: f64,
        green: f64,
        blue: f64,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let result = color_adjust::gamma_correct(&read(&image)?, red, green, blue)?;
        Ok(write(py, &result))
    }

    #[pyfunction]
    pub fn filter_color<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        red: f64,
        green: f64,
        blue: f64,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let result = color_adjust::filter_color(&read(&image)?, red, green, blue)?;
        Ok(write(py, &result))
    }

    /// Sepia toning. Defaults give the classic brown tint.
    #[pyfunction]
    #[pyo3(signature = (image, depth=50, red=2.2, green=0.0, blue=0.0))]
    pub fn sepia_toning<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        depth: i32,
        red: f64,
        green: f64,
        blue: f64,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let result = color_adjust::sepia_toning(&read(&image)?, depth, red, green, blue)?;
        Ok(write(py, &result))
    }

    #[pyfunction]
    pub fn decrease_color_depth<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        bit_offset: u32,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let result = color_adjust::decrease_color_depth(&read(&image)?, bit_offset)?;
        Ok(write(py, &result))
    }

    #[pyfunction]
    pub fn contrast<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        value: f64,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let result = color_adjust::contrast(&read(&image)?, value)?;
        Ok(write(py, &result))
    }

    #[pyfunction]
    pub fn brightness<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        value: i32,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let result = color_adjust::brightness(&read(&image)?, value);
        Ok(write(py, &result))
    }

    /// Boost one channel: 1 = red, 2 = green, 3 = blue.
    #[pyfunction]
    pub fn boost_intensity<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        channel: u8,
        percent: f64,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let channel = color_adjust::Channel::try_from(channel)?;
        let result = color_adjust::boost_intensity(&read(&image)?, channel, percent)?;
        Ok(write(py, &result))
    }

    /// AND every pixel with a packed 0xAARRGGBB mask.
    #[pyfunction]
    pub fn shading<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        mask: u32,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let result = color_adjust::shading(&read(&image)?, Rgba::from_argb_u32(mask));
        Ok(write(py, &result))
    }

    // ========================================================================
    // Color Science Filters
    // ========================================================================

    #[pyfunction]
    pub fn hue_shift<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        level: f32,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let result = color_science::hue_shift(&read(&image)?, level)?;
        Ok(write(py, &result))
    }

    #[pyfunction]
    pub fn saturation_scale<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        level: f32,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let result = color_science::saturation_scale(&read(&image)?, level)?;
        Ok(write(py, &result))
    }

    // ========================================================================
    // Noise Filters
    // ========================================================================

    #[pyfunction]
    #[pyo3(signature = (image, seed=None))]
    pub fn snow_effect<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        seed: Option<u64>,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let src = read(&image)?;
        let result = match seed {
            Some(seed) => noise::snow_effect_seeded(&src, seed),
            None => noise::snow_effect(&src),
        };
        Ok(write(py, &result))
    }

    #[pyfunction]
    #[pyo3(signature = (image, seed=None))]
    pub fn flea_effect<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        seed: Option<u64>,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let src = read(&image)?;
        let result = match seed {
            Some(seed) => noise::flea_effect_seeded(&src, seed),
            None => noise::flea_effect(&src),
        };
        Ok(write(py, &result))
    }

    // ========================================================================
    // Convolution Filters
    // ========================================================================

    #[pyfunction]
    pub fn gaussian_blur<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let result = convolution::gaussian_blur(&read(&image)?);
        Ok(write(py, &result))
    }

    #[pyfunction]
    #[pyo3(signature = (image, weight=11.0))]
    pub fn sharpen<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        weight: f64,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let result = convolution::sharpen(&read(&image)?, weight)?;
        Ok(write(py, &result))
    }

    #[pyfunction]
    pub fn mean_removal<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let result = convolution::mean_removal(&read(&image)?);
        Ok(write(py, &result))
    }

    #[pyfunction]
    #[pyo3(signature = (image, value=1.0))]
    pub fn smooth<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        value: f64,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let result = convolution::smooth(&read(&image)?, value)?;
        Ok(write(py, &result))
    }

    #[pyfunction]
    pub fn emboss<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let result = convolution::emboss(&read(&image)?);
        Ok(write(py, &result))
    }

    #[pyfunction]
    #[pyo3(signature = (image, value=2.0))]
    pub fn engrave<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        value: f64,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let result = convolution::engrave(&read(&image)?, value)?;
        Ok(write(py, &result))
    }

    /// Apply a custom 3x3 kernel: `weights[row][col]`, divisor and bias.
    #[pyfunction]
    #[pyo3(signature = (image, weights, factor=1.0, offset=0.0))]
    pub fn convolve<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        weights: [[f64; 3]; 3],
        factor: f64,
        offset: f64,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let kernel = ConvolutionKernel::new(weights, factor, offset)?;
        let result = convolution::convolve(&read(&image)?, &kernel);
        Ok(write(py, &result))
    }

    // ========================================================================
    // Geometry
    // ========================================================================

    /// Mirror: 1 = vertical, 2 = horizontal.
    #[pyfunction]
    pub fn flip<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        direction: u8,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let direction = rotate::FlipDirection::try_from(direction)?;
        let result = rotate::flip(&read(&image)?, direction);
        Ok(write(py, &result))
    }

    /// Rotate clockwise by a multiple of 90 degrees.
    #[pyfunction]
    pub fn rotate_quarter<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        degrees: i32,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let src = read(&image)?;
        let result = match rotate::Rotation::from_degrees(degrees)? {
            Some(rotation) => rotate::rotate(&src, rotation),
            None => src,
        };
        Ok(write(py, &result))
    }

    /// rasterfx extension module
    #[pymodule]
    pub fn rasterfx(m: &Bound<'_, PyModule>) -> PyResult<()> {
        // Color adjustment filters
        m.add_function(wrap_pyfunction!(invert, m)?)?;
        m.add_function(wrap_pyfunction!(grayscale, m)?)?;
        m.add_function(wrap_pyfunction!(gamma_correct, m)?)?;
        m.add_function(wrap_pyfunction!(filter_color, m)?)?;
        m.add_function(wrap_pyfunction!(sepia_toning, m)?)?;
        m.add_function(wrap_pyfunction!(decrease_color_depth, m)?)?;
        m.add_function(wrap_pyfunction!(contrast, m)?)?;
        m.add_function(wrap_pyfunction!(brightness, m)?)?;
        m.add_function(wrap_pyfunction!(boost_intensity, m)?)?;
        m.add_function(wrap_pyfunction!(shading, m)?)?;

        // Color science filters
        m.add_function(wrap_pyfunction!(hue_shift, m)?)?;
        m.add_function(wrap_pyfunction!(saturation_scale, m)?)?;

        // Noise filters
        m.add_function(wrap_pyfunction!(snow_effect, m)?)?;
        m.add_function(wrap_pyfunction!(flea_effect, m)?)?;

        // Convolution filters
        m.add_function(wrap_pyfunction!(gaussian_blur, m)?)?;
        m.add_function(wrap_pyfunction!(sharpen, m)?)?;
        m.add_function(wrap_pyfunction!(mean_removal, m)?)?;
        m.add_function(wrap_pyfunction!(smooth, m)?)?;
        m.add_function(wrap_pyfunction!(emboss, m)?)?;
        m.add_function(wrap_pyfunction!(engrave, m)?)?;
        m.add_function(wrap_pyfunction!(convolve, m)?)?;

        // Geometry
        m.add_function(wrap_pyfunction!(flip, m)?)?;
        m.add_function(wrap_pyfunction!(rotate_quarter, m)?)?;

        Ok(())
    }
}

#[cfg(feature = "python")]
pub use python::rasterfx;
