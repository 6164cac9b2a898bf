// ============================================================================
// IMAGE I/O — decode/encode through the `image` crate's codecs
// ============================================================================
//
// File *dialogs* belong to the GUI shell; this module only moves pixels
// between disk and `RgbaImage`.

use image::{ImageError, RgbaImage};
use std::path::Path;

/// File extensions the editor offers for open/save (lowercase).
pub const SUPPORTED_EXTENSIONS: &[&str] = &[
    "png", "jpg", "jpeg", "webp", "bmp", "tga", "ico", "tif", "tiff",
];

/// Check whether a file extension is a supported raster format.
pub fn is_supported_extension(ext: &str) -> bool {
    SUPPORTED_EXTENSIONS.contains(&ext.to_lowercase().as_str())
}

/// Decode an image file to RGBA, whatever its on-disk format.
pub fn load_image(path: &Path) -> Result<RgbaImage, ImageError> {
    Ok(image::open(path)?.to_rgba8())
}

/// Encode `img` to `path`; the format is chosen from the file extension.
pub fn save_image(path: &Path, img: &RgbaImage) -> Result<(), ImageError> {
    img.save(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_check_is_case_insensitive() {
        assert!(is_supported_extension("png"));
        assert!(is_supported_extension("PNG"));
        assert!(is_supported_extension("JpEg"));
        assert!(!is_supported_extension("svg"));
        assert!(!is_supported_extension(""));
    }
}
