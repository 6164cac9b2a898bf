// ============================================================================
// MASK RASTERIZATION — selection geometry to binary per-pixel masks
// ============================================================================

use image::{GrayImage, Luma};

/// Binary mask (0 = outside, 255 = inside) for the axis-aligned rectangle
/// spanned by two opposite corners given in any order.
///
/// Corners are normalized per axis (min becomes top-left) and clamped into
/// `[0, w] × [0, h]` — one past the last pixel index, the half-open bound
/// used for row/column slicing. A zero- or negative-area rectangle selects
/// nothing.
pub fn rect_mask(dims: (u32, u32), a: (i32, i32), b: (i32, i32)) -> GrayImage {
    let (w, h) = dims;
    let mut mask = GrayImage::new(w, h);

    let (x1, x2) = if a.0 <= b.0 { (a.0, b.0) } else { (b.0, a.0) };
    let (y1, y2) = if a.1 <= b.1 { (a.1, b.1) } else { (b.1, a.1) };

    let x1 = x1.clamp(0, w as i32) as u32;
    let x2 = x2.clamp(0, w as i32) as u32;
    let y1 = y1.clamp(0, h as i32) as u32;
    let y2 = y2.clamp(0, h as i32) as u32;

    if x2 <= x1 || y2 <= y1 {
        return mask;
    }

    for y in y1..y2 {
        for x in x1..x2 {
            mask.put_pixel(x, y, Luma([255]));
        }
    }
    mask
}

/// Binary mask for the filled interior of a closed polygon.
///
/// Fewer than three vertices select nothing. Vertices are clamped into
/// `[0, w-1] × [0, h-1]` — pixel-index bounds, unlike the rectangle's
/// half-open clamp. The closing edge from the last vertex back to the
/// first is implicit.
///
/// Fill rule is even-odd, sampled at pixel centers: a pixel belongs to the
/// mask when its center `(x+0.5, y+0.5)` lies between an odd/even pair of
/// edge crossings on its scanline. An axis-aligned square from (0,0) to
/// (n,n) therefore covers exactly rows and columns `0..n`.
pub fn polygon_mask(dims: (u32, u32), points: &[(i32, i32)]) -> GrayImage {
    let (w, h) = dims;
    let mut mask = GrayImage::new(w, h);
    if points.len() < 3 || w == 0 || h == 0 {
        return mask;
    }

    let pts: Vec<(f32, f32)> = points
        .iter()
        .map(|&(x, y)| {
            (
                x.clamp(0, w as i32 - 1) as f32,
                y.clamp(0, h as i32 - 1) as f32,
            )
        })
        .collect();

    let n = pts.len();
    let mut nodes: Vec<f32> = Vec::new();
    for y in 0..h {
        let yf = y as f32 + 0.5; // centre of pixel row
        nodes.clear();
        // Walk polygon edges, including the closing edge n-1 → 0.
        for i in 0..n {
            let j = (i + 1) % n;
            let yi = pts[i].1;
            let yj = pts[j].1;
            if (yi < yf && yj >= yf) || (yj < yf && yi >= yf) {
                let t = (yf - yi) / (yj - yi);
                nodes.push(pts[i].0 + t * (pts[j].0 - pts[i].0));
            }
        }
        nodes.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        // Fill pixels whose centers fall between pairs of crossings.
        let mut k = 0;
        while k + 1 < nodes.len() {
            let x_start = (nodes[k] - 0.5).ceil().max(0.0) as u32;
            let x_end = ((nodes[k + 1] - 0.5).ceil().max(0.0) as u32).min(w);
            for x in x_start..x_end {
                mask.put_pixel(x, y, Luma([255]));
            }
            k += 2;
        }
    }
    mask
}

/// Mask for a freehand lasso path: the sampled drag points are treated as
/// the vertex list of a closed polygon.
pub fn lasso_mask(dims: (u32, u32), points: &[(i32, i32)]) -> GrayImage {
    polygon_mask(dims, points)
}

/// Smallest axis-aligned rectangle `(x, y, w, h)` enclosing all nonzero
/// mask pixels, or `None` when the mask is entirely zero.
pub fn bbox_from_mask(mask: &GrayImage) -> Option<(u32, u32, u32, u32)> {
    let (mw, mh) = (mask.width(), mask.height());
    let raw = mask.as_raw();

    let mut min_x = mw;
    let mut min_y = mh;
    let mut max_x = 0u32;
    let mut max_y = 0u32;
    for y in 0..mh {
        let row = y as usize * mw as usize;
        for x in 0..mw {
            if raw[row + x as usize] > 0 {
                min_x = min_x.min(x);
                min_y = min_y.min(y);
                max_x = max_x.max(x);
                max_y = max_y.max(y);
            }
        }
    }

    if min_x > max_x || min_y > max_y {
        return None;
    }
    Some((min_x, min_y, max_x - min_x + 1, max_y - min_y + 1))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count_set(mask: &GrayImage) -> usize {
        mask.as_raw().iter().filter(|&&v| v > 0).count()
    }

    #[test]
    fn rect_mask_fills_normalized_interior() {
        // Corners in "wrong" order normalize to the same rectangle.
        let mask = rect_mask((100, 100), (50, 60), (10, 10));
        assert_eq!(count_set(&mask), 40 * 50);
        assert_eq!(mask.get_pixel(10, 10).0[0], 255);
        assert_eq!(mask.get_pixel(49, 59).0[0], 255);
        assert_eq!(mask.get_pixel(50, 60).0[0], 0);
        assert_eq!(mask.get_pixel(9, 10).0[0], 0);
    }

    #[test]
    fn rect_mask_degenerate_is_empty() {
        assert_eq!(count_set(&rect_mask((64, 64), (5, 5), (5, 20))), 0);
        assert_eq!(count_set(&rect_mask((64, 64), (5, 5), (20, 5))), 0);
        assert_eq!(count_set(&rect_mask((64, 64), (7, 7), (7, 7))), 0);
    }

    #[test]
    fn rect_mask_clamps_to_half_open_bounds() {
        // Corners far outside clamp to the full image.
        let mask = rect_mask((10, 10), (-100, -100), (100, 100));
        assert_eq!(count_set(&mask), 100);
        // Entirely off-image rectangles clamp to zero area.
        assert_eq!(count_set(&rect_mask((10, 10), (20, 20), (30, 30))), 0);
        assert_eq!(count_set(&rect_mask((10, 10), (-30, -30), (-20, -20))), 0);
    }

    #[test]
    fn polygon_mask_needs_three_points() {
        assert_eq!(count_set(&polygon_mask((32, 32), &[])), 0);
        assert_eq!(count_set(&polygon_mask((32, 32), &[(1, 1)])), 0);
        assert_eq!(count_set(&polygon_mask((32, 32), &[(1, 1), (10, 10)])), 0);
        assert_eq!(count_set(&lasso_mask((32, 32), &[(1, 1), (10, 10)])), 0);
    }

    #[test]
    fn polygon_mask_square_covers_expected_pixels() {
        // Pixel-center sampling: the square (0,0)..(10,10) covers exactly
        // rows and columns 0..=9.
        let mask = polygon_mask((100, 100), &[(0, 0), (10, 0), (10, 10), (0, 10)]);
        assert_eq!(count_set(&mask), 100);
        assert_eq!(bbox_from_mask(&mask), Some((0, 0, 10, 10)));
    }

    #[test]
    fn polygon_mask_triangle_stays_inside_bbox() {
        let mask = polygon_mask((64, 64), &[(2, 2), (20, 2), (2, 20)]);
        let (bx, by, bw, bh) = bbox_from_mask(&mask).unwrap();
        assert!(bx >= 2 && by >= 2);
        assert!(bx + bw <= 21 && by + bh <= 21);
        // Interior point is selected, far corner is not.
        assert_eq!(mask.get_pixel(5, 5).0[0], 255);
        assert_eq!(mask.get_pixel(19, 19).0[0], 0);
    }

    #[test]
    fn polygon_mask_clamps_to_pixel_index_bounds() {
        // Vertices past the edge clamp to w-1/h-1, not w/h.
        let mask = polygon_mask((10, 10), &[(-5, -5), (50, -5), (50, 50), (-5, 50)]);
        let (bx, by, bw, bh) = bbox_from_mask(&mask).unwrap();
        assert_eq!((bx, by), (0, 0));
        // Last covered column/row is 8: the clamped outline runs through
        // x=9, and the center of column 9 (9.5) sits past it.
        assert_eq!((bw, bh), (9, 9));
    }

    #[test]
    fn bbox_of_empty_mask_is_none() {
        assert_eq!(bbox_from_mask(&GrayImage::new(16, 16)), None);
    }

    #[test]
    fn bbox_round_trips_through_rect_mask() {
        let mask = rect_mask((100, 80), (12, 30), (40, 44));
        assert_eq!(bbox_from_mask(&mask), Some((12, 30, 28, 14)));

        // Clamped rectangle round-trips to its clamped bounds.
        let mask = rect_mask((50, 50), (40, 40), (90, 90));
        assert_eq!(bbox_from_mask(&mask), Some((40, 40, 10, 10)));
    }
}
