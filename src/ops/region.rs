// ============================================================================
// REGION OPERATIONS — crop and masked apply over a selection mask
// ============================================================================

use image::{GrayImage, Rgba, RgbaImage, imageops};

use crate::mask::bbox_from_mask;

/// Crop `image` to the bounding box of the nonzero mask pixels.
///
/// The box is re-clamped against the image even though the rasterizer
/// already clamped the geometry — the mask may have been built for
/// different dimensions than the image supplied here. Returns `None` for
/// an empty mask or a degenerate clamped box.
///
/// With `strict`, pixels inside the box that the mask excludes are
/// blanked, so polygon and lasso selections come out as a cutout on a
/// transparent background. Without it the full rectangle is returned
/// unmodified — a non-strict crop of a polygon selection is its bounding
/// box, not a cutout.
pub fn crop_to_selection(
    image: &RgbaImage,
    mask: &GrayImage,
    strict: bool,
) -> Option<RgbaImage> {
    let (bx, by, bw, bh) = bbox_from_mask(mask)?;

    let iw = image.width();
    let ih = image.height();
    let x0 = bx.min(iw);
    let y0 = by.min(ih);
    let x1 = (bx + bw).min(iw);
    let y1 = (by + bh).min(ih);
    if x1 <= x0 || y1 <= y0 {
        return None;
    }

    let mut out = imageops::crop_imm(image, x0, y0, x1 - x0, y1 - y0).to_image();

    if strict {
        for (x, y, p) in out.enumerate_pixels_mut() {
            let mx = x0 + x;
            let my = y0 + y;
            if mx < mask.width() && my < mask.height() && mask.get_pixel(mx, my).0[0] == 0 {
                *p = Rgba([0, 0, 0, 0]);
            }
        }
    }
    Some(out)
}

/// Run `op` against the full image and keep its output only where the
/// mask is nonzero.
///
/// `op` always sees the complete image and must return one of identical
/// dimensions — it is never handed a cropped sub-image, so kernels that
/// read past the selection edge (blur, median) pick up real surrounding
/// pixels instead of a synthetic border. If `op` changes dimensions the
/// blend is undefined and the original image is returned untouched.
pub fn apply_in_mask<F>(image: &RgbaImage, op: F, mask: &GrayImage) -> RgbaImage
where
    F: FnOnce(&RgbaImage) -> RgbaImage,
{
    let modified = op(image);
    if modified.width() != image.width() || modified.height() != image.height() {
        return image.clone();
    }

    let mut out = image.clone();
    for (x, y, p) in out.enumerate_pixels_mut() {
        if x < mask.width() && y < mask.height() && mask.get_pixel(x, y).0[0] > 0 {
            *p = *modified.get_pixel(x, y);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mask::{polygon_mask, rect_mask};
    use crate::ops::filters;

    fn gradient_image(w: u32, h: u32) -> RgbaImage {
        RgbaImage::from_fn(w, h, |x, y| {
            Rgba([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8, 255])
        })
    }

    #[test]
    fn crop_returns_none_for_empty_mask() {
        let img = gradient_image(20, 20);
        let mask = GrayImage::new(20, 20);
        assert!(crop_to_selection(&img, &mask, false).is_none());
        assert!(crop_to_selection(&img, &mask, true).is_none());
    }

    #[test]
    fn crop_extracts_rectangle_subimage() {
        let img = gradient_image(100, 100);
        let mask = rect_mask((100, 100), (10, 20), (40, 50));

        let out = crop_to_selection(&img, &mask, false).unwrap();
        assert_eq!((out.width(), out.height()), (30, 30));
        assert_eq!(out.get_pixel(0, 0), img.get_pixel(10, 20));
        assert_eq!(out.get_pixel(29, 29), img.get_pixel(39, 49));
    }

    #[test]
    fn strict_has_no_effect_for_rectangle_masks() {
        let img = gradient_image(64, 64);
        let mask = rect_mask((64, 64), (5, 5), (25, 30));

        let loose = crop_to_selection(&img, &mask, false).unwrap();
        let strict = crop_to_selection(&img, &mask, true).unwrap();
        assert_eq!(loose, strict);
    }

    #[test]
    fn strict_crop_blanks_outside_polygon() {
        let img = gradient_image(64, 64);
        let mask = polygon_mask((64, 64), &[(10, 10), (30, 10), (10, 30)]);

        let out = crop_to_selection(&img, &mask, true).unwrap();
        let (bx, by, _, _) = crate::mask::bbox_from_mask(&mask).unwrap();

        for (x, y, p) in out.enumerate_pixels() {
            let inside = mask.get_pixel(bx + x, by + y).0[0] > 0;
            if inside {
                assert_eq!(p, img.get_pixel(bx + x, by + y));
            } else {
                assert_eq!(*p, Rgba([0, 0, 0, 0]));
            }
        }

        // Non-strict keeps the excluded corner intact.
        let loose = crop_to_selection(&img, &mask, false).unwrap();
        let (w, h) = (loose.width(), loose.height());
        assert_eq!(loose.get_pixel(w - 1, h - 1), img.get_pixel(bx + w - 1, by + h - 1));
    }

    #[test]
    fn crop_reclamps_mask_built_for_larger_image() {
        // Mask rasterized for 100×100, image only 30×30: the bbox must be
        // re-clamped instead of slicing out of bounds.
        let img = gradient_image(30, 30);
        let mask = rect_mask((100, 100), (20, 20), (80, 80));
        let out = crop_to_selection(&img, &mask, false).unwrap();
        assert_eq!((out.width(), out.height()), (10, 10));

        let off_image = rect_mask((100, 100), (40, 40), (80, 80));
        assert!(crop_to_selection(&img, &off_image, false).is_none());
    }

    #[test]
    fn apply_in_mask_blends_only_inside() {
        let img = gradient_image(40, 40);
        let mask = polygon_mask((40, 40), &[(5, 5), (30, 8), (25, 30), (6, 28)]);

        let out = apply_in_mask(&img, filters::invert, &mask);

        for (x, y, p) in out.enumerate_pixels() {
            let src = img.get_pixel(x, y);
            if mask.get_pixel(x, y).0[0] > 0 {
                assert_eq!(p.0[0], 255 - src.0[0]);
                assert_eq!(p.0[1], 255 - src.0[1]);
                assert_eq!(p.0[2], 255 - src.0[2]);
                assert_eq!(p.0[3], src.0[3]);
            } else {
                assert_eq!(p, src);
            }
        }
    }

    #[test]
    fn apply_in_mask_rejects_dimension_change() {
        let img = gradient_image(16, 16);
        let mask = rect_mask((16, 16), (2, 2), (10, 10));
        let out = apply_in_mask(&img, |_| RgbaImage::new(8, 8), &mask);
        assert_eq!(out, img);
    }
}
