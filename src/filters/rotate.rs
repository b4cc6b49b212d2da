//! Image rotation and mirroring functions.
//!
//! Provides exact quarter-turn rotation and mirroring. These are pure index
//! remaps: no resampling, every source pixel lands on exactly one output
//! pixel. Arbitrary-angle rotation needs a resampling surface and is left to
//! the host.
//!
//! ## Rotation Direction
//!
//! All rotations are clockwise (CW):
//! - 90° CW: (x, y) -> (H - 1 - y, x)
//! - 180°: (x, y) -> (W - 1 - x, H - 1 - y)
//! - 270° CW (90° CCW): (x, y) -> (y, W - 1 - x)

use crate::buffer::PixelBuffer;
use crate::error::{FilterError, FilterResult};

/// Mirror axis for [`flip`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlipDirection {
    /// Top row becomes bottom row.
    Vertical,
    /// Left column becomes right column.
    Horizontal,
}

impl TryFrom<u8> for FlipDirection {
    type Error = FilterError;

    /// 1 = vertical, 2 = horizontal.
    fn try_from(value: u8) -> FilterResult<Self> {
        match value {
            1 => Ok(FlipDirection::Vertical),
            2 => Ok(FlipDirection::Horizontal),
            other => Err(FilterError::InvalidParameter(format!(
                "flip direction must be 1 (vertical) or 2 (horizontal), got {other}"
            ))),
        }
    }
}

/// Clockwise quarter turn for [`rotate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rotation {
    Cw90,
    Cw180,
    Cw270,
}

impl Rotation {
    /// Map a multiple of 90 degrees (any sign) to a rotation.
    ///
    /// Returns `Ok(None)` for full turns.
    pub fn from_degrees(degrees: i32) -> FilterResult<Option<Self>> {
        if degrees % 90 != 0 {
            return Err(FilterError::InvalidParameter(format!(
                "rotation must be a multiple of 90 degrees, got {degrees}"
            )));
        }
        Ok(match degrees.rem_euclid(360) {
            90 => Some(Rotation::Cw90),
            180 => Some(Rotation::Cw180),
            270 => Some(Rotation::Cw270),
            _ => None,
        })
    }
}

/// Mirror the buffer.
pub fn flip(src: &PixelBuffer, direction: FlipDirection) -> PixelBuffer {
    let (w, h) = (src.width(), src.height());
    let samples = src.samples();
    let row = w as usize;

    PixelBuffer::from_fn(w, h, |x, y| {
        let (sx, sy) = match direction {
            FlipDirection::Horizontal => (w - 1 - x, y),
            FlipDirection::Vertical => (x, h - 1 - y),
        };
        samples[sy as usize * row + sx as usize]
    })
}

/// Rotate clockwise by a quarter turn.
///
/// # Returns
/// Rotated buffer; 90° and 270° swap width and height.
pub fn rotate(src: &PixelBuffer, rotation: Rotation) -> PixelBuffer {
    let (w, h) = (src.width(), src.height());
    let samples = src.samples();
    let row = w as usize;
    let at = |x: u32, y: u32| samples[y as usize * row + x as usize];

    match rotation {
        // Output (nx, ny) reads source (ny, h - 1 - nx)
        Rotation::Cw90 => PixelBuffer::from_fn(h, w, |nx, ny| at(ny, h - 1 - nx)),
        Rotation::Cw180 => PixelBuffer::from_fn(w, h, |nx, ny| at(w - 1 - nx, h - 1 - ny)),
        // Output (nx, ny) reads source (w - 1 - ny, nx)
        Rotation::Cw270 => PixelBuffer::from_fn(h, w, |nx, ny| at(w - 1 - ny, nx)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::Rgba;

    fn numbered(w: u32, h: u32) -> PixelBuffer {
        PixelBuffer::from_fn(w, h, |x, y| Rgba::rgb(x as u8, y as u8, (y * w + x) as u8))
    }

    #[test]
    fn test_flip_horizontal() {
        let src = numbered(3, 2);
        let out = flip(&src, FlipDirection::Horizontal);
        assert_eq!(out.get(0, 0).unwrap(), src.get(2, 0).unwrap());
        assert_eq!(out.get(2, 1).unwrap(), src.get(0, 1).unwrap());
    }

    #[test]
    fn test_flip_vertical() {
        let src = numbered(3, 2);
        let out = flip(&src, FlipDirection::Vertical);
        assert_eq!(out.get(1, 0).unwrap(), src.get(1, 1).unwrap());
    }

    #[test]
    fn test_flip_involutive() {
        let src = numbered(5, 4);
        for dir in [FlipDirection::Horizontal, FlipDirection::Vertical] {
            assert_eq!(flip(&flip(&src, dir), dir), src);
        }
    }

    #[test]
    fn test_flip_selector() {
        assert_eq!(FlipDirection::try_from(1), Ok(FlipDirection::Vertical));
        assert_eq!(FlipDirection::try_from(2), Ok(FlipDirection::Horizontal));
        assert!(FlipDirection::try_from(3).is_err());
    }

    #[test]
    fn test_rotate_90_cw() {
        // 3 wide, 2 tall -> 2 wide, 3 tall; top-left lands top-right
        let src = numbered(3, 2);
        let out = rotate(&src, Rotation::Cw90);
        assert_eq!((out.width(), out.height()), (2, 3));
        assert_eq!(out.get(1, 0).unwrap(), src.get(0, 0).unwrap());
        assert_eq!(out.get(0, 0).unwrap(), src.get(0, 1).unwrap());
        assert_eq!(out.get(0, 2).unwrap(), src.get(2, 1).unwrap());
    }

    #[test]
    fn test_rotate_270_is_inverse_of_90() {
        let src = numbered(4, 3);
        let out = rotate(&rotate(&src, Rotation::Cw90), Rotation::Cw270);
        assert_eq!(out, src);
    }

    #[test]
    fn test_four_quarter_turns_identity() {
        let src = numbered(4, 3);
        let mut out = src.clone();
        for _ in 0..4 {
            out = rotate(&out, Rotation::Cw90);
        }
        assert_eq!(out, src);
    }

    #[test]
    fn test_rotate_180_matches_double_flip() {
        let src = numbered(4, 3);
        let flipped = flip(&flip(&src, FlipDirection::Horizontal), FlipDirection::Vertical);
        assert_eq!(rotate(&src, Rotation::Cw180), flipped);
    }

    #[test]
    fn test_rotation_from_degrees() {
        assert_eq!(Rotation::from_degrees(90), Ok(Some(Rotation::Cw90)));
        assert_eq!(Rotation::from_degrees(-90), Ok(Some(Rotation::Cw270)));
        assert_eq!(Rotation::from_degrees(720), Ok(None));
        assert!(Rotation::from_degrees(45).is_err());
    }
}
