// ============================================================================
// TRANSFORM OPERATIONS — flip, rotate, resize for the whole document
// ============================================================================

use image::{RgbaImage, imageops};

/// Interpolation used when resampling.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Interpolation {
    Nearest,
    #[default]
    Bilinear,
    CatmullRom,
    Lanczos3,
}

impl Interpolation {
    pub fn all() -> &'static [Interpolation] {
        &[
            Interpolation::Nearest,
            Interpolation::Bilinear,
            Interpolation::CatmullRom,
            Interpolation::Lanczos3,
        ]
    }

    pub fn to_filter(self) -> imageops::FilterType {
        match self {
            Interpolation::Nearest => imageops::FilterType::Nearest,
            Interpolation::Bilinear => imageops::FilterType::Triangle,
            Interpolation::CatmullRom => imageops::FilterType::CatmullRom,
            Interpolation::Lanczos3 => imageops::FilterType::Lanczos3,
        }
    }
}

/// Rotate 90° clockwise. Swaps the image dimensions.
pub fn rotate_90cw(src: &RgbaImage) -> RgbaImage {
    imageops::rotate90(src)
}

/// Rotate 90° counter-clockwise. Swaps the image dimensions.
pub fn rotate_90ccw(src: &RgbaImage) -> RgbaImage {
    imageops::rotate270(src)
}

/// Rotate 180°. Dimensions are unchanged.
pub fn rotate_180(src: &RgbaImage) -> RgbaImage {
    imageops::rotate180(src)
}

/// Mirror left-to-right.
pub fn flip_horizontal(src: &RgbaImage) -> RgbaImage {
    imageops::flip_horizontal(src)
}

/// Mirror top-to-bottom.
pub fn flip_vertical(src: &RgbaImage) -> RgbaImage {
    imageops::flip_vertical(src)
}

/// Resample to `new_w` × `new_h`. Zero target dimensions are clamped to 1.
pub fn resize(src: &RgbaImage, new_w: u32, new_h: u32, interp: Interpolation) -> RgbaImage {
    imageops::resize(src, new_w.max(1), new_h.max(1), interp.to_filter())
}
