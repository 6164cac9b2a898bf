// ============================================================================
// CANVAS — document pixels and the screen↔image viewport mapping
// ============================================================================

use image::{Rgba, RgbaImage};

/// Hard cap on document size (~256 megapixels) to prevent overflow in
/// buffer-size arithmetic.
const MAX_PIXELS: u64 = 256_000_000;

/// Zoom limits shared by all zoom entry points.
const MIN_ZOOM: f32 = 0.1;
const MAX_ZOOM: f32 = 100.0;

/// The document being edited: a flat RGBA pixel buffer plus dimension
/// queries. Layers, undo history, and rendering live elsewhere — region
/// operations only need pixels and a size.
#[derive(Clone, Debug)]
pub struct CanvasState {
    pub width: u32,
    pub height: u32,
    pub pixels: RgbaImage,
}

impl CanvasState {
    /// Create a white canvas. Dimensions outside `1..=256M pixels` are
    /// clamped to 1×1.
    pub fn new(width: u32, height: u32) -> Self {
        let (width, height) = {
            let total = (width as u64) * (height as u64);
            if total > MAX_PIXELS || width == 0 || height == 0 {
                eprintln!(
                    "CanvasState::new: dimensions {}×{} out of range, clamped to 1×1",
                    width, height
                );
                (1, 1)
            } else {
                (width, height)
            }
        };
        Self {
            width,
            height,
            pixels: RgbaImage::from_pixel(width, height, Rgba([255, 255, 255, 255])),
        }
    }

    /// Adopt an existing image as the document.
    pub fn from_image(pixels: RgbaImage) -> Self {
        Self {
            width: pixels.width(),
            height: pixels.height(),
            pixels,
        }
    }

    /// Swap in a replacement image (crop result, filter output, transform),
    /// keeping the dimension fields in sync.
    pub fn replace_image(&mut self, pixels: RgbaImage) {
        self.width = pixels.width();
        self.height = pixels.height();
        self.pixels = pixels;
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

/// Screen↔image affine mapping under pan and zoom.
///
/// The image is drawn centered in the view area, offset by `pan` and
/// scaled by `zoom`. The selection core never sees screen coordinates —
/// the session maps every pointer event through here first, and the shell
/// uses the inverse to draw overlays.
#[derive(Clone, Copy, Debug)]
pub struct Viewport {
    pub zoom: f32,
    pub pan: (f32, f32),
    /// Size in screen units of the area the image is drawn into.
    pub view_size: (f32, f32),
}

impl Viewport {
    pub fn new(view_w: f32, view_h: f32) -> Self {
        Self {
            zoom: 1.0,
            pan: (0.0, 0.0),
            view_size: (view_w, view_h),
        }
    }

    /// Screen position of the image's top-left corner.
    fn image_origin(&self, dims: (u32, u32)) -> (f32, f32) {
        let iw = dims.0 as f32 * self.zoom;
        let ih = dims.1 as f32 * self.zoom;
        (
            self.view_size.0 / 2.0 + self.pan.0 - iw / 2.0,
            self.view_size.1 / 2.0 + self.pan.1 - ih / 2.0,
        )
    }

    /// Map a screen position to the image pixel containing it. `None`
    /// outside the image.
    pub fn screen_to_image(
        &self,
        screen: (f32, f32),
        dims: (u32, u32),
    ) -> Option<(i32, i32)> {
        let (ox, oy) = self.image_origin(dims);
        let rel_x = (screen.0 - ox) / self.zoom;
        let rel_y = (screen.1 - oy) / self.zoom;

        if rel_x >= 0.0 && rel_x < dims.0 as f32 && rel_y >= 0.0 && rel_y < dims.1 as f32 {
            Some((rel_x.floor() as i32, rel_y.floor() as i32))
        } else {
            None
        }
    }

    /// Inverse mapping for overlay rendering: the screen position of an
    /// image pixel's top-left corner.
    pub fn image_to_screen(&self, pixel: (i32, i32), dims: (u32, u32)) -> (f32, f32) {
        let (ox, oy) = self.image_origin(dims);
        (
            ox + pixel.0 as f32 * self.zoom,
            oy + pixel.1 as f32 * self.zoom,
        )
    }

    pub fn zoom_in(&mut self) {
        self.zoom = (self.zoom * 1.2).clamp(MIN_ZOOM, MAX_ZOOM);
    }

    pub fn zoom_out(&mut self) {
        self.zoom = (self.zoom / 1.2).clamp(MIN_ZOOM, MAX_ZOOM);
    }

    /// Fit the whole image inside the view and re-center it.
    pub fn zoom_fit(&mut self, dims: (u32, u32)) {
        if dims.0 == 0 || dims.1 == 0 {
            return;
        }
        let zx = self.view_size.0 / dims.0 as f32;
        let zy = self.view_size.1 / dims.1 as f32;
        self.zoom = zx.min(zy).clamp(MIN_ZOOM, MAX_ZOOM);
        self.pan = (0.0, 0.0);
    }

    pub fn pan_by(&mut self, dx: f32, dy: f32) {
        self.pan.0 += dx;
        self.pan.1 += dy;
    }
}
