// ============================================================================
// EDITOR SESSION — document + selection + viewport, driven by a GUI shell
// ============================================================================
//
// The shell owns the window and the event loop; it forwards pointer events
// (in screen coordinates) and discrete commands here, and redraws from
// whatever this session exposes. Nothing in this module touches a GUI
// toolkit, which is what makes the whole selection subsystem unit-testable.

use image::{GrayImage, RgbaImage};

use crate::canvas::{CanvasState, Viewport};
use crate::ops::{clipboard, transform};
use crate::selection::{DEFAULT_MIN_DIST, SelectionManager, SelectionMode};
use crate::{log_info, log_warn};

pub struct EditorSession {
    pub state: CanvasState,
    pub selection: SelectionManager,
    pub viewport: Viewport,
}

impl EditorSession {
    /// Start a session over an existing image, viewed through a
    /// `view_w` × `view_h` screen area.
    pub fn new(image: RgbaImage, view_w: f32, view_h: f32) -> Self {
        Self {
            state: CanvasState::from_image(image),
            selection: SelectionManager::new(),
            viewport: Viewport::new(view_w, view_h),
        }
    }

    // ---- commands -----------------------------------------------------------

    /// Activate a selection tool by name ("rect", "poly", "lasso"); any
    /// other name deactivates selection. The previous selection — frozen
    /// or not — is discarded.
    pub fn begin_selection(&mut self, tool: &str) {
        let mode = SelectionMode::from_name(tool);
        self.selection.start(mode, DEFAULT_MIN_DIST);
        log_info!("selection: started {:?}", mode);
    }

    /// Commit the in-progress selection (the Enter binding). Returns
    /// whether the freeze took effect.
    pub fn commit_selection(&mut self) -> bool {
        let frozen = self.selection.freeze();
        if frozen {
            log_info!("selection: frozen");
        }
        frozen
    }

    /// Discard the selection entirely (the Escape binding).
    pub fn cancel_selection(&mut self) {
        self.selection.cancel();
    }

    // ---- pointer routing ----------------------------------------------------

    /// Pointer button pressed at a screen position. Maps through the
    /// viewport and dispatches on the active mode; presses outside the
    /// image are ignored.
    pub fn pointer_pressed(&mut self, screen: (f32, f32)) {
        let Some((x, y)) = self.viewport.screen_to_image(screen, self.state.dimensions())
        else {
            return;
        };
        match self.selection.state().mode {
            SelectionMode::Rectangle => {
                self.selection.rect_start(x, y);
            }
            SelectionMode::Polygon => self.selection.polygon_add_vertex(x, y),
            SelectionMode::Lasso => self.selection.lasso_press(x, y),
            SelectionMode::None => {}
        }
    }

    /// Pointer moved. `button_down` reports whether the primary button is
    /// still held; only drags mutate the selection.
    pub fn pointer_moved(&mut self, screen: (f32, f32), button_down: bool) {
        let Some((x, y)) = self.viewport.screen_to_image(screen, self.state.dimensions())
        else {
            return;
        };
        match self.selection.state().mode {
            SelectionMode::Rectangle => {
                if button_down {
                    self.selection.rect_update(x, y);
                }
            }
            SelectionMode::Lasso => self.selection.lasso_move(x, y, button_down),
            SelectionMode::Polygon | SelectionMode::None => {}
        }
    }

    /// Pointer button released.
    pub fn pointer_released(&mut self) {
        if self.selection.state().mode == SelectionMode::Lasso {
            self.selection.lasso_release();
        }
    }

    // ---- document operations ------------------------------------------------

    /// Crop the document to the frozen selection and make the result the
    /// new document. The selection is consumed: the new image has new
    /// dimensions, so the old geometry no longer applies.
    pub fn crop_to_selection(&mut self, strict: bool) -> bool {
        match self.selection.crop(&self.state.pixels, strict) {
            Some(cropped) => {
                log_info!(
                    "crop: {}×{} -> {}×{} (strict={})",
                    self.state.width,
                    self.state.height,
                    cropped.width(),
                    cropped.height(),
                    strict
                );
                self.state.replace_image(cropped);
                self.selection.cancel();
                true
            }
            None => {
                log_warn!("crop: no frozen selection");
                false
            }
        }
    }

    /// Run a filter over the document. With a frozen selection the output
    /// is blended back only inside the mask; otherwise the whole image is
    /// replaced. The selection geometry survives, so several filters can
    /// be applied to the same frozen region.
    pub fn apply_filter<F>(&mut self, op: F) -> bool
    where
        F: FnOnce(&RgbaImage) -> RgbaImage,
    {
        if self.selection.has_frozen_selection() {
            if let Some(result) = self.selection.apply_in_selection(&self.state.pixels, op) {
                self.state.replace_image(result);
                return true;
            }
            return false;
        }

        let result = op(&self.state.pixels);
        if result.dimensions() != self.state.pixels.dimensions() {
            log_warn!("filter: operation changed dimensions, discarded");
            return false;
        }
        self.state.replace_image(result);
        true
    }

    /// Copy the frozen selection to the clipboards.
    pub fn copy_selection(&self) -> bool {
        clipboard::copy_selection(&self.state.pixels, &self.selection)
    }

    // ---- whole-document transforms ------------------------------------------

    pub fn rotate_90cw(&mut self) {
        let out = transform::rotate_90cw(&self.state.pixels);
        self.replace_with_transform(out);
    }

    pub fn rotate_90ccw(&mut self) {
        let out = transform::rotate_90ccw(&self.state.pixels);
        self.replace_with_transform(out);
    }

    pub fn rotate_180(&mut self) {
        let out = transform::rotate_180(&self.state.pixels);
        self.replace_with_transform(out);
    }

    pub fn flip_horizontal(&mut self) {
        let out = transform::flip_horizontal(&self.state.pixels);
        self.replace_with_transform(out);
    }

    pub fn flip_vertical(&mut self) {
        let out = transform::flip_vertical(&self.state.pixels);
        self.replace_with_transform(out);
    }

    pub fn resize(&mut self, new_w: u32, new_h: u32, interp: transform::Interpolation) {
        let out = transform::resize(&self.state.pixels, new_w, new_h, interp);
        self.replace_with_transform(out);
    }

    /// Swap in a transformed image. A dimension change invalidates any
    /// selection mask, so the selection resets; same-size transforms keep
    /// the geometry (it still addresses valid pixels).
    fn replace_with_transform(&mut self, out: RgbaImage) {
        let dims_changed = out.dimensions() != self.state.pixels.dimensions();
        self.state.replace_image(out);
        if dims_changed {
            self.selection.cancel();
        }
    }

    // ---- shell-facing queries -----------------------------------------------

    /// In-progress rectangle corners for overlay rendering.
    pub fn rect_overlay(&self) -> (Option<(i32, i32)>, Option<(i32, i32)>) {
        self.selection.rect_points()
    }

    /// In-progress polygon/lasso path for overlay rendering.
    pub fn path_overlay(&self) -> &[(i32, i32)] {
        self.selection.polygon_points()
    }

    /// Selection mask at the document's current dimensions.
    pub fn selection_mask(&self) -> GrayImage {
        self.selection.mask(self.state.dimensions())
    }
}
