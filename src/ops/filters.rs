// ============================================================================
// IMAGE FILTERS — blur, threshold, edge detection, histogram equalization
// ============================================================================
//
// Every filter is a pure `RgbaImage -> RgbaImage` function of unchanged
// dimensions, so each one can be handed directly to
// `SelectionManager::apply_in_selection` to run inside a frozen selection.
// Alpha is carried through untouched.

use image::{Rgba, RgbaImage};
use rayon::prelude::*;

/// BT.709 luminance of an RGB triple.
#[inline]
fn luma(r: u8, g: u8, b: u8) -> f32 {
    0.2126 * r as f32 + 0.7152 * g as f32 + 0.0722 * b as f32
}

// ---------------------------------------------------------------------------
//  Parallel separable Gaussian blur (rayon)
// ---------------------------------------------------------------------------

/// Build a 1-D Gaussian kernel truncated at ceil(3*sigma).
fn build_gaussian_kernel(sigma: f32) -> Vec<f32> {
    let radius = (sigma * 3.0).ceil() as usize;
    if radius == 0 {
        return vec![1.0];
    }
    let len = radius * 2 + 1;
    let mut kernel = vec![0.0f32; len];
    let s2 = 2.0 * sigma * sigma;
    let mut sum = 0.0f32;
    for (i, v) in kernel.iter_mut().enumerate() {
        let x = i as f32 - radius as f32;
        *v = (-x * x / s2).exp();
        sum += *v;
    }
    let inv = 1.0 / sum;
    for v in &mut kernel {
        *v *= inv;
    }
    kernel
}

/// Separable Gaussian blur, horizontal then vertical pass, each pass
/// parallelised by row. Samples are edge-clamped so borders do not darken.
pub fn gaussian_blur(src: &RgbaImage, sigma: f32) -> RgbaImage {
    let w = src.width() as usize;
    let h = src.height() as usize;
    if w == 0 || h == 0 {
        return src.clone();
    }

    let kernel = build_gaussian_kernel(sigma);
    let radius = kernel.len() / 2;
    let src_raw = src.as_raw();

    let pixel_count = w * h * 4;
    let buf_in: Vec<f32> = src_raw.iter().map(|&b| b as f32).collect();

    // --- Horizontal pass ---
    let mut buf_h = vec![0.0f32; pixel_count];
    buf_h.par_chunks_mut(w * 4).enumerate().for_each(|(y, row_out)| {
        let row_in_start = y * w * 4;
        for x in 0..w {
            let mut acc = [0.0f32; 4];
            for (ki, &kv) in kernel.iter().enumerate() {
                let sx = (x as isize + ki as isize - radius as isize)
                    .max(0)
                    .min(w as isize - 1) as usize;
                let idx = row_in_start + sx * 4;
                for c in 0..4 {
                    acc[c] += buf_in[idx + c] * kv;
                }
            }
            let out_idx = x * 4;
            row_out[out_idx..out_idx + 4].copy_from_slice(&acc);
        }
    });

    // --- Vertical pass ---
    let mut buf_v = vec![0.0f32; pixel_count];
    buf_v.par_chunks_mut(w * 4).enumerate().for_each(|(y, row_out)| {
        for x in 0..w {
            let mut acc = [0.0f32; 4];
            for (ki, &kv) in kernel.iter().enumerate() {
                let sy = (y as isize + ki as isize - radius as isize)
                    .max(0)
                    .min(h as isize - 1) as usize;
                let idx = sy * w * 4 + x * 4;
                for c in 0..4 {
                    acc[c] += buf_h[idx + c] * kv;
                }
            }
            let out_idx = x * 4;
            row_out[out_idx..out_idx + 4].copy_from_slice(&acc);
        }
    });

    let dst_raw: Vec<u8> = buf_v
        .iter()
        .map(|&v| v.round().clamp(0.0, 255.0) as u8)
        .collect();
    RgbaImage::from_raw(w as u32, h as u32, dst_raw).unwrap_or_else(|| src.clone())
}

/// Median blur with an odd `ksize`×`ksize` window (even sizes are bumped
/// up by one). Each channel takes the median of its window independently;
/// samples are edge-clamped.
pub fn median_blur(src: &RgbaImage, ksize: u32) -> RgbaImage {
    let w = src.width() as usize;
    let h = src.height() as usize;
    if w == 0 || h == 0 {
        return src.clone();
    }

    let ksize = if ksize % 2 == 0 { ksize + 1 } else { ksize }.max(1);
    let radius = (ksize / 2) as isize;
    let src_raw = src.as_raw();
    let stride = w * 4;

    let mut dst_raw = vec![0u8; w * h * 4];
    dst_raw.par_chunks_mut(stride).enumerate().for_each(|(y, row_out)| {
        let mut window: Vec<u8> = Vec::with_capacity((ksize * ksize) as usize);
        for x in 0..w {
            for c in 0..4 {
                window.clear();
                for dy in -radius..=radius {
                    let sy = (y as isize + dy).max(0).min(h as isize - 1) as usize;
                    for dx in -radius..=radius {
                        let sx = (x as isize + dx).max(0).min(w as isize - 1) as usize;
                        window.push(src_raw[sy * stride + sx * 4 + c]);
                    }
                }
                window.sort_unstable();
                row_out[x * 4 + c] = window[window.len() / 2];
            }
        }
    });

    RgbaImage::from_raw(w as u32, h as u32, dst_raw).unwrap_or_else(|| src.clone())
}

// ---------------------------------------------------------------------------
//  Point operations
// ---------------------------------------------------------------------------

/// Luminance-based desaturation (BT.709 weights).
pub fn grayscale(src: &RgbaImage) -> RgbaImage {
    let mut out = src.clone();
    for p in out.pixels_mut() {
        let v = luma(p.0[0], p.0[1], p.0[2]).round().clamp(0.0, 255.0) as u8;
        *p = Rgba([v, v, v, p.0[3]]);
    }
    out
}

/// Binary threshold on luminance: pixels at or above `t` turn white, the
/// rest black.
pub fn threshold(src: &RgbaImage, t: u8) -> RgbaImage {
    let mut out = src.clone();
    for p in out.pixels_mut() {
        let v = if luma(p.0[0], p.0[1], p.0[2]) >= t as f32 { 255 } else { 0 };
        *p = Rgba([v, v, v, p.0[3]]);
    }
    out
}

/// Invert RGB channels, leaving alpha alone.
pub fn invert(src: &RgbaImage) -> RgbaImage {
    let mut out = src.clone();
    for p in out.pixels_mut() {
        *p = Rgba([255 - p.0[0], 255 - p.0[1], 255 - p.0[2], p.0[3]]);
    }
    out
}

// ---------------------------------------------------------------------------
//  Sobel edge detection
// ---------------------------------------------------------------------------

/// Which gradient the Sobel filter reports.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SobelDirection {
    /// Vertical edges (horizontal gradient).
    X,
    /// Horizontal edges (vertical gradient).
    Y,
    /// Combined magnitude of both.
    Both,
}

/// 3×3 Sobel edge detection over the luminance channel. The result is a
/// grayscale edge map; alpha is carried over from the source.
pub fn sobel(src: &RgbaImage, direction: SobelDirection) -> RgbaImage {
    let w = src.width() as usize;
    let h = src.height() as usize;
    if w == 0 || h == 0 {
        return src.clone();
    }

    let gray: Vec<f32> = src
        .pixels()
        .map(|p| luma(p.0[0], p.0[1], p.0[2]))
        .collect();
    let src_raw = src.as_raw();
    let stride = w * 4;

    let sample = |x: isize, y: isize| -> f32 {
        let sx = x.max(0).min(w as isize - 1) as usize;
        let sy = y.max(0).min(h as isize - 1) as usize;
        gray[sy * w + sx]
    };

    let mut dst_raw = vec![0u8; w * h * 4];
    dst_raw.par_chunks_mut(stride).enumerate().for_each(|(y, row_out)| {
        let yi = y as isize;
        for x in 0..w {
            let xi = x as isize;
            let gx = -sample(xi - 1, yi - 1) + sample(xi + 1, yi - 1)
                - 2.0 * sample(xi - 1, yi)
                + 2.0 * sample(xi + 1, yi)
                - sample(xi - 1, yi + 1)
                + sample(xi + 1, yi + 1);
            let gy = -sample(xi - 1, yi - 1)
                - 2.0 * sample(xi, yi - 1)
                - sample(xi + 1, yi - 1)
                + sample(xi - 1, yi + 1)
                + 2.0 * sample(xi, yi + 1)
                + sample(xi + 1, yi + 1);

            let mag = match direction {
                SobelDirection::X => gx.abs(),
                SobelDirection::Y => gy.abs(),
                SobelDirection::Both => (gx * gx + gy * gy).sqrt(),
            };
            let v = mag.round().clamp(0.0, 255.0) as u8;
            let pi = x * 4;
            row_out[pi] = v;
            row_out[pi + 1] = v;
            row_out[pi + 2] = v;
            row_out[pi + 3] = src_raw[y * stride + pi + 3];
        }
    });

    RgbaImage::from_raw(w as u32, h as u32, dst_raw).unwrap_or_else(|| src.clone())
}

// ---------------------------------------------------------------------------
//  Histogram equalization
// ---------------------------------------------------------------------------

/// Equalize the luminance histogram. The CDF-remapped luminance is applied
/// as a per-pixel gain on the RGB channels so hue is preserved.
pub fn equalize_histogram(src: &RgbaImage) -> RgbaImage {
    let total = (src.width() as u64) * (src.height() as u64);
    if total == 0 {
        return src.clone();
    }

    let mut hist = [0u64; 256];
    for p in src.pixels() {
        let v = luma(p.0[0], p.0[1], p.0[2]).round().clamp(0.0, 255.0) as usize;
        hist[v] += 1;
    }

    // Cumulative distribution; cdf_min anchors the darkest occupied bin at 0.
    let mut cdf = [0u64; 256];
    let mut running = 0u64;
    for (i, &count) in hist.iter().enumerate() {
        running += count;
        cdf[i] = running;
    }
    let cdf_min = cdf.iter().copied().find(|&c| c > 0).unwrap_or(0);
    if total == cdf_min {
        // Single occupied bin — nothing to equalize.
        return src.clone();
    }

    let mut lut = [0u8; 256];
    let denom = (total - cdf_min) as f32;
    for (i, entry) in lut.iter_mut().enumerate() {
        let num = cdf[i].saturating_sub(cdf_min) as f32;
        *entry = (num / denom * 255.0).round().clamp(0.0, 255.0) as u8;
    }

    let mut out = src.clone();
    for p in out.pixels_mut() {
        let y = luma(p.0[0], p.0[1], p.0[2]);
        let yi = y.round().clamp(0.0, 255.0) as usize;
        let target = lut[yi] as f32;
        if y > 0.0 {
            let gain = target / y;
            *p = Rgba([
                (p.0[0] as f32 * gain).round().clamp(0.0, 255.0) as u8,
                (p.0[1] as f32 * gain).round().clamp(0.0, 255.0) as u8,
                (p.0[2] as f32 * gain).round().clamp(0.0, 255.0) as u8,
                p.0[3],
            ]);
        } else {
            let v = target.round() as u8;
            *p = Rgba([v, v, v, p.0[3]]);
        }
    }
    out
}
