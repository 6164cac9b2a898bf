// ============================================================================
// SELECTION STATE MACHINE — rectangle / polygon / lasso lifecycle
// ============================================================================

use image::{GrayImage, RgbaImage};

use crate::mask;
use crate::ops::region;

/// Default minimum spacing between recorded lasso points, in pixels.
pub const DEFAULT_MIN_DIST: i32 = 2;

/// Active selection tool. Each variant gates its own set of mutation
/// operations on [`SelectionManager`]; calls for the wrong mode are
/// silently ignored.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum SelectionMode {
    /// No selection in progress.
    #[default]
    None,
    /// Axis-aligned rectangle dragged between two corners.
    Rectangle,
    /// Click-per-vertex polygon.
    Polygon,
    /// Freehand path sampled while the pointer button is held.
    Lasso,
}

impl SelectionMode {
    /// Parse an external tool name. Unknown names map to `None`, matching
    /// the forgiving command surface the editor shell speaks.
    pub fn from_name(name: &str) -> Self {
        match name {
            "rect" => SelectionMode::Rectangle,
            "poly" => SelectionMode::Polygon,
            "lasso" => SelectionMode::Lasso,
            _ => SelectionMode::None,
        }
    }
}

/// Geometry and lifecycle flags of the selection being defined.
///
/// Replaced wholesale by [`SelectionManager::start`] and mutated only
/// through the manager, so the mode and frozen guards always hold.
#[derive(Clone, Debug)]
pub struct SelectionState {
    pub mode: SelectionMode,
    /// Set once by [`SelectionManager::freeze`]; cleared only by a full
    /// reset (`start`/`cancel`).
    pub frozen: bool,
    /// First rectangle corner, fixed at press.
    pub rect_anchor: Option<(i32, i32)>,
    /// Opposite rectangle corner, tracking the pointer.
    pub rect_current: Option<(i32, i32)>,
    /// Polygon vertices or sampled lasso path, in insertion order.
    pub points: Vec<(i32, i32)>,
    /// Minimum Euclidean distance between consecutive lasso points.
    pub min_dist: i32,
    /// Most recently recorded lasso point, for the spacing check.
    pub last_pt: Option<(i32, i32)>,
    /// True while a lasso drag is in progress.
    pub drawing: bool,
}

impl SelectionState {
    fn new(mode: SelectionMode, min_dist: i32) -> Self {
        Self {
            mode,
            frozen: false,
            rect_anchor: None,
            rect_current: None,
            points: Vec::new(),
            min_dist,
            last_pt: None,
            drawing: false,
        }
    }
}

impl Default for SelectionState {
    fn default() -> Self {
        Self::new(SelectionMode::None, DEFAULT_MIN_DIST)
    }
}

/// Owns the one active [`SelectionState`] of an editing session and
/// exposes mode-gated mutation plus mode-independent queries.
///
/// Every mutator no-ops on a mode or frozen-state violation instead of
/// erroring: the callers are live pointer streams where out-of-sequence
/// events (a stray move after release, a click in the wrong tool) are
/// routine, not exceptional.
#[derive(Clone, Debug, Default)]
pub struct SelectionManager {
    state: SelectionState,
}

impl SelectionManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read-only view of the current state, for overlay rendering and
    /// session-level dispatch.
    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    /// Begin a new selection, discarding the previous one entirely.
    /// `min_dist` is clamped to ≥1. Any mask derived from the prior
    /// selection is invalid after this call.
    pub fn start(&mut self, mode: SelectionMode, min_dist: i32) {
        self.state = SelectionState::new(mode, min_dist.max(1));
    }

    /// Reset to the inactive state.
    pub fn cancel(&mut self) {
        self.start(SelectionMode::None, DEFAULT_MIN_DIST);
    }

    /// True when the current geometry is complete enough to freeze:
    /// both rectangle corners, or at least three path points.
    pub fn is_ready(&self) -> bool {
        let s = &self.state;
        match s.mode {
            SelectionMode::Rectangle => {
                s.rect_anchor.is_some() && s.rect_current.is_some()
            }
            SelectionMode::Polygon | SelectionMode::Lasso => s.points.len() >= 3,
            SelectionMode::None => false,
        }
    }

    /// Commit the selection, locking its geometry so region operations may
    /// consume it. Returns `true` only on the single transition from
    /// unfrozen to frozen; repeated calls are a no-op, not an error.
    pub fn freeze(&mut self) -> bool {
        if self.is_ready() && !self.state.frozen {
            self.state.frozen = true;
            return true;
        }
        false
    }

    /// Frozen AND still ready — the gate for crop/apply. The ready check
    /// is kept so a frozen flag can never outlive usable geometry.
    pub fn has_frozen_selection(&self) -> bool {
        self.state.frozen && self.is_ready()
    }

    // ---- rectangle ----------------------------------------------------------

    /// Place both corners at the press position. Returns `false` when the
    /// call is rejected by the mode/frozen guard.
    pub fn rect_start(&mut self, x: i32, y: i32) -> bool {
        let s = &mut self.state;
        if s.mode == SelectionMode::Rectangle && !s.frozen {
            s.rect_anchor = Some((x, y));
            s.rect_current = s.rect_anchor;
            return true;
        }
        false
    }

    /// Drag the tracking corner. Requires an anchor from `rect_start`.
    pub fn rect_update(&mut self, x: i32, y: i32) {
        let s = &mut self.state;
        if s.mode == SelectionMode::Rectangle && !s.frozen && s.rect_anchor.is_some() {
            s.rect_current = Some((x, y));
        }
    }

    /// Both corners, for the shell's overlay rendering.
    pub fn rect_points(&self) -> (Option<(i32, i32)>, Option<(i32, i32)>) {
        (self.state.rect_anchor, self.state.rect_current)
    }

    // ---- polygon ------------------------------------------------------------

    /// Append a vertex. Consecutive duplicate clicks produce duplicate
    /// vertices; the rasterizer tolerates the degenerate edges.
    pub fn polygon_add_vertex(&mut self, x: i32, y: i32) {
        let s = &mut self.state;
        if s.mode == SelectionMode::Polygon && !s.frozen {
            s.points.push((x, y));
        }
    }

    /// The vertex list, for the shell's overlay path.
    pub fn polygon_points(&self) -> &[(i32, i32)] {
        &self.state.points
    }

    // ---- lasso --------------------------------------------------------------

    /// Begin a freehand drag: records the press position as the first path
    /// point and as the spacing reference.
    pub fn lasso_press(&mut self, x: i32, y: i32) {
        let s = &mut self.state;
        if s.mode == SelectionMode::Lasso && !s.frozen {
            s.drawing = true;
            s.last_pt = Some((x, y));
            s.points.push((x, y));
        }
    }

    /// Sample the pointer path. Ignored unless a lasso drag is in progress
    /// with the button held. A point is recorded only when it has moved at
    /// least `min_dist` pixels from the last recorded one (squared-distance
    /// comparison, no square root).
    pub fn lasso_move(&mut self, x: i32, y: i32, button_down: bool) {
        let s = &mut self.state;
        if s.mode != SelectionMode::Lasso || s.frozen || !s.drawing || !button_down {
            return;
        }

        let (last_x, last_y) = match s.last_pt {
            Some(p) => p,
            None => {
                s.last_pt = Some((x, y));
                return;
            }
        };

        let dx = x - last_x;
        let dy = y - last_y;
        if dx * dx + dy * dy >= s.min_dist * s.min_dist {
            s.points.push((x, y));
            s.last_pt = Some((x, y));
        }
    }

    /// End the drag. Accumulated path points are kept; only the transient
    /// drag fields reset.
    pub fn lasso_release(&mut self) {
        let s = &mut self.state;
        if s.mode == SelectionMode::Lasso {
            s.drawing = false;
            s.last_pt = None;
        }
    }

    /// The sampled path, for the shell's overlay.
    pub fn lasso_points(&self) -> &[(i32, i32)] {
        &self.state.points
    }

    // ---- mask & region operations -------------------------------------------

    /// Rasterize the current geometry into a mask of the given dimensions.
    /// Incomplete or inactive selections yield an all-zero mask. The mask
    /// is rebuilt on every call and must be considered stale as soon as the
    /// image dimensions change.
    pub fn mask(&self, dims: (u32, u32)) -> GrayImage {
        let s = &self.state;
        match s.mode {
            SelectionMode::Rectangle => {
                if let (Some(a), Some(b)) = (s.rect_anchor, s.rect_current) {
                    return mask::rect_mask(dims, a, b);
                }
            }
            SelectionMode::Polygon if s.points.len() >= 3 => {
                return mask::polygon_mask(dims, &s.points);
            }
            SelectionMode::Lasso if s.points.len() >= 3 => {
                return mask::lasso_mask(dims, &s.points);
            }
            _ => {}
        }
        GrayImage::new(dims.0, dims.1)
    }

    /// Bounding box of the selection rasterized at the given dimensions.
    pub fn bbox(&self, dims: (u32, u32)) -> Option<(u32, u32, u32, u32)> {
        mask::bbox_from_mask(&self.mask(dims))
    }

    /// Crop `image` to the frozen selection's bounding box. `strict`
    /// additionally blanks pixels the mask excludes, so non-rectangular
    /// shapes come out as a cutout inside the box; non-strict returns the
    /// plain bounding-box rectangle. `None` without a frozen selection or
    /// when the mask is empty.
    pub fn crop(&self, image: &RgbaImage, strict: bool) -> Option<RgbaImage> {
        if !self.has_frozen_selection() {
            return None;
        }
        let mask = self.mask((image.width(), image.height()));
        region::crop_to_selection(image, &mask, strict)
    }

    /// Run `op` over a full copy of `image` and keep its output only
    /// inside the frozen selection. `None` without a frozen selection.
    pub fn apply_in_selection<F>(&self, image: &RgbaImage, op: F) -> Option<RgbaImage>
    where
        F: FnOnce(&RgbaImage) -> RgbaImage,
    {
        if !self.has_frozen_selection() {
            return None;
        }
        let mask = self.mask((image.width(), image.height()));
        Some(region::apply_in_mask(image, op, &mask))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count_set(mask: &GrayImage) -> usize {
        mask.as_raw().iter().filter(|&&v| v > 0).count()
    }

    #[test]
    fn from_name_falls_back_to_none() {
        assert_eq!(SelectionMode::from_name("rect"), SelectionMode::Rectangle);
        assert_eq!(SelectionMode::from_name("poly"), SelectionMode::Polygon);
        assert_eq!(SelectionMode::from_name("lasso"), SelectionMode::Lasso);
        assert_eq!(SelectionMode::from_name("magic-wand"), SelectionMode::None);
        assert_eq!(SelectionMode::from_name(""), SelectionMode::None);
    }

    #[test]
    fn start_replaces_state_and_clamps_min_dist() {
        let mut sel = SelectionManager::new();
        sel.start(SelectionMode::Polygon, 2);
        sel.polygon_add_vertex(1, 1);
        sel.polygon_add_vertex(2, 2);

        sel.start(SelectionMode::Lasso, 0);
        assert!(sel.state().points.is_empty());
        assert_eq!(sel.state().min_dist, 1);
        assert!(!sel.state().frozen);
    }

    #[test]
    fn rectangle_lifecycle_and_freeze() {
        let mut sel = SelectionManager::new();
        sel.start(SelectionMode::Rectangle, 2);
        assert!(!sel.is_ready());
        assert!(!sel.freeze());

        assert!(sel.rect_start(10, 10));
        sel.rect_update(50, 60);
        assert!(sel.is_ready());
        assert!(!sel.has_frozen_selection());

        assert!(sel.freeze());
        assert!(sel.has_frozen_selection());

        // Second freeze is an idempotent no-op.
        assert!(!sel.freeze());
        assert!(sel.has_frozen_selection());

        // Mutation after freeze is ignored.
        sel.rect_update(90, 90);
        assert_eq!(sel.rect_points().1, Some((50, 60)));

        let mask = sel.mask((100, 100));
        assert_eq!(count_set(&mask), 40 * 50);
        assert_eq!(mask.get_pixel(10, 10).0[0], 255);
        assert_eq!(mask.get_pixel(49, 59).0[0], 255);
        assert_eq!(mask.get_pixel(50, 60).0[0], 0);
    }

    #[test]
    fn rect_update_requires_anchor() {
        let mut sel = SelectionManager::new();
        sel.start(SelectionMode::Rectangle, 2);
        sel.rect_update(30, 30);
        assert_eq!(sel.rect_points(), (None, None));
        assert!(!sel.is_ready());
    }

    #[test]
    fn rect_operations_rejected_in_other_modes() {
        let mut sel = SelectionManager::new();
        sel.start(SelectionMode::Polygon, 2);
        assert!(!sel.rect_start(1, 1));
        sel.polygon_add_vertex(1, 1);

        sel.start(SelectionMode::None, 2);
        assert!(!sel.rect_start(1, 1));
        sel.polygon_add_vertex(1, 1);
        assert!(sel.state().points.is_empty());
    }

    #[test]
    fn polygon_ready_at_three_vertices() {
        let mut sel = SelectionManager::new();
        sel.start(SelectionMode::Polygon, 2);
        sel.polygon_add_vertex(0, 0);
        sel.polygon_add_vertex(10, 0);
        assert!(!sel.is_ready());
        sel.polygon_add_vertex(10, 10);
        assert!(sel.is_ready());
        sel.polygon_add_vertex(0, 10);
        assert!(sel.freeze());
        assert_eq!(sel.bbox((100, 100)), Some((0, 0, 10, 10)));
    }

    #[test]
    fn lasso_spacing_filter() {
        let mut sel = SelectionManager::new();
        sel.start(SelectionMode::Lasso, 5);
        sel.lasso_press(0, 0);
        // Too close — dropped.
        sel.lasso_move(2, 2, true);
        sel.lasso_move(3, 3, true);
        assert_eq!(sel.lasso_points().len(), 1);
        // 3-4-5 triangle: exactly min_dist away, accepted.
        sel.lasso_move(3, 4, true);
        assert_eq!(sel.lasso_points().len(), 2);
        sel.lasso_move(20, 4, true);
        assert_eq!(sel.lasso_points().len(), 3);

        // No two consecutive recorded points closer than min_dist.
        let pts = sel.lasso_points();
        for pair in pts.windows(2) {
            let dx = pair[1].0 - pair[0].0;
            let dy = pair[1].1 - pair[0].1;
            assert!(dx * dx + dy * dy >= 25);
        }
    }

    #[test]
    fn lasso_move_requires_drag_in_progress() {
        let mut sel = SelectionManager::new();
        sel.start(SelectionMode::Lasso, 2);

        // Move before press: no drag yet.
        sel.lasso_move(5, 5, true);
        assert!(sel.lasso_points().is_empty());

        sel.lasso_press(0, 0);
        // Button not held.
        sel.lasso_move(10, 10, false);
        assert_eq!(sel.lasso_points().len(), 1);

        sel.lasso_move(10, 10, true);
        assert_eq!(sel.lasso_points().len(), 2);

        // Release keeps points, clears transient drag state.
        sel.lasso_release();
        assert!(!sel.state().drawing);
        assert_eq!(sel.state().last_pt, None);
        assert_eq!(sel.lasso_points().len(), 2);

        // Stray move after release is ignored.
        sel.lasso_move(50, 50, true);
        assert_eq!(sel.lasso_points().len(), 2);
    }

    #[test]
    fn mask_is_zero_when_not_ready() {
        let mut sel = SelectionManager::new();
        assert_eq!(count_set(&sel.mask((32, 32))), 0);

        sel.start(SelectionMode::Lasso, 2);
        sel.lasso_press(1, 1);
        sel.lasso_move(10, 1, true);
        assert_eq!(count_set(&sel.mask((32, 32))), 0);
        assert_eq!(sel.bbox((32, 32)), None);
    }

    #[test]
    fn cancel_discards_frozen_selection() {
        let mut sel = SelectionManager::new();
        sel.start(SelectionMode::Rectangle, 2);
        sel.rect_start(1, 1);
        sel.rect_update(9, 9);
        assert!(sel.freeze());

        sel.cancel();
        assert!(!sel.has_frozen_selection());
        assert_eq!(sel.state().mode, SelectionMode::None);
        assert_eq!(count_set(&sel.mask((32, 32))), 0);
    }
}
