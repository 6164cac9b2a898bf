//! Paint++ selection core — the mask-based selection subsystem of a raster
//! image editor, packaged as a UI-framework-agnostic library.
//!
//! A GUI shell owns the window, menus, and event loop; it drives an
//! [`app::EditorSession`] with already-dispatched pointer events and
//! commands, and renders whatever the session hands back (overlay geometry,
//! masks, replacement images). Nothing in this crate draws or blocks.

pub mod app;
pub mod canvas;
pub mod io;
pub mod logger;
pub mod mask;
pub mod ops;
pub mod selection;

pub use app::EditorSession;
pub use canvas::{CanvasState, Viewport};
pub use selection::{SelectionManager, SelectionMode, SelectionState};
