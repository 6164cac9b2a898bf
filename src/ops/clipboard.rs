// ============================================================================
// CLIPBOARD OPERATIONS — copy the frozen selection, paste from anywhere
// ============================================================================

use image::RgbaImage;
use std::sync::Mutex;

use crate::selection::SelectionManager;

// ---------------------------------------------------------------------------
//  Internal clipboard (application-level, supports transparency)
// ---------------------------------------------------------------------------

/// In-app clipboard storing an RGBA image with full transparency support.
static APP_CLIPBOARD: Mutex<Option<RgbaImage>> = Mutex::new(None);

/// Store an image in the app clipboard.
fn set_clipboard_image(img: RgbaImage) {
    *APP_CLIPBOARD.lock().unwrap_or_else(|e| e.into_inner()) = Some(img);
}

/// Retrieve a clone from the app clipboard.
fn get_clipboard_image() -> Option<RgbaImage> {
    APP_CLIPBOARD.lock().unwrap_or_else(|e| e.into_inner()).clone()
}

pub fn has_clipboard_image() -> bool {
    APP_CLIPBOARD
        .lock()
        .unwrap_or_else(|e| e.into_inner())
        .is_some()
}

// ---------------------------------------------------------------------------
//  System clipboard helpers (OS-level copy/paste via arboard)
// ---------------------------------------------------------------------------

/// Write an RGBA image to the system clipboard. Failures are swallowed —
/// the in-app clipboard still holds the copy.
pub fn copy_to_system_clipboard(img: &RgbaImage) {
    // arboard wants ImageData { width, height, bytes: Cow<[u8]> } in RGBA order.
    if let Ok(mut clip) = arboard::Clipboard::new() {
        let data = arboard::ImageData {
            width: img.width() as usize,
            height: img.height() as usize,
            bytes: std::borrow::Cow::Borrowed(img.as_raw()),
        };
        let _ = clip.set_image(data);
    }
}

/// Try to read an image from the system clipboard. Returns `None` if
/// nothing usable is there. Handles two cases:
///   1. Raw image data (a screenshot, or a copy from another editor).
///   2. Text on the clipboard that happens to be a valid image file path.
pub fn get_from_system_clipboard() -> Option<RgbaImage> {
    if let Ok(mut clip) = arboard::Clipboard::new() {
        if let Ok(img_data) = clip.get_image() {
            if let Some(img) = RgbaImage::from_raw(
                img_data.width as u32,
                img_data.height as u32,
                img_data.bytes.into_owned(),
            ) {
                return Some(img);
            }
        }
    }

    if let Ok(mut clip) = arboard::Clipboard::new() {
        if let Ok(text) = clip.get_text() {
            let path = std::path::Path::new(text.trim());
            if path.is_file() {
                if let Ok(dyn_img) = image::open(path) {
                    return Some(dyn_img.to_rgba8());
                }
            }
        }
    }

    None
}

// ---------------------------------------------------------------------------
//  Selection-aware entry points
// ---------------------------------------------------------------------------

/// Copy the frozen selection out of `image` to both clipboards, as a
/// strict crop (out-of-mask pixels transparent). Returns `false` when
/// there is no frozen selection to copy.
pub fn copy_selection(image: &RgbaImage, selection: &SelectionManager) -> bool {
    match selection.crop(image, true) {
        Some(cut) => {
            copy_to_system_clipboard(&cut);
            set_clipboard_image(cut);
            true
        }
        None => false,
    }
}

/// Fetch whatever image is available: the app clipboard first (it keeps
/// transparency), then the system clipboard.
pub fn paste_image() -> Option<RgbaImage> {
    get_clipboard_image().or_else(get_from_system_clipboard)
}
