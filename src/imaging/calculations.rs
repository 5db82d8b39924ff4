//! Pure calculation functions for image geometry.
//!
//! All functions here are pure and testable without any I/O or images.
//! Two fitting policies live side by side and are intentionally distinct:
//!
//! - [`aspect_fit`] scales the whole image into a target rectangle (export).
//! - [`crop_fill`] picks the part of the image that covers a target rectangle
//!   (on-screen preview).

use serde::Serialize;

/// An axis-aligned rectangle with a top-left origin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// True when the rectangle encloses a positive area.
    pub fn has_area(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }
}

/// Calculate dimensions whose longer side equals `target`, preserving aspect ratio.
///
/// Small images are scaled up, large images down. Neither side drops below 1px.
///
/// # Examples
/// ```
/// # use page_assembler::imaging::calculations::fit_longest_side;
/// assert_eq!(fit_longest_side((1000, 500), 128), (128, 64));
/// assert_eq!(fit_longest_side((300, 600), 128), (64, 128));
/// ```
pub fn fit_longest_side(source: (u32, u32), target: u32) -> (u32, u32) {
    let (src_w, src_h) = source;
    let longer = src_w.max(src_h).max(1) as f64;
    let ratio = target as f64 / longer;

    let w = ((src_w as f64 * ratio).round() as u32).max(1);
    let h = ((src_h as f64 * ratio).round() as u32).max(1);
    (w, h)
}

/// Scale `source` uniformly so it fits entirely inside `target`, centered.
///
/// Returns the placed rectangle in the same coordinate space as `target`.
/// The scale is `min(target.w / src.w, target.h / src.h)`; nothing is cropped.
pub fn aspect_fit(source: (u32, u32), target: Rect) -> Rect {
    let (src_w, src_h) = (source.0.max(1) as f32, source.1.max(1) as f32);
    let scale = (target.width / src_w).min(target.height / src_h);

    let width = src_w * scale;
    let height = src_h * scale;
    Rect {
        x: target.x + (target.width - width) / 2.0,
        y: target.y + (target.height - height) / 2.0,
        width,
        height,
    }
}

/// Compute the centered source crop whose aspect ratio matches `target`.
///
/// Drawing the returned region of the image into `target` fills it completely;
/// the excess along whichever axis overflows is discarded.
pub fn crop_fill(source: (u32, u32), target: Rect) -> Rect {
    let (img_w, img_h) = (source.0.max(1) as f32, source.1.max(1) as f32);
    let target_aspect = target.width / target.height;
    let image_aspect = img_w / img_h;

    if image_aspect > target_aspect {
        // Image is wider: keep full height, crop the sides
        let crop_w = img_h * target_aspect;
        Rect::new((img_w - crop_w) / 2.0, 0.0, crop_w, img_h)
    } else {
        // Image is taller: keep full width, crop top and bottom
        let crop_h = img_w / target_aspect;
        Rect::new(0.0, (img_h - crop_h) / 2.0, img_w, crop_h)
    }
}
