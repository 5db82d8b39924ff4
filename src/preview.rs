//! Full-view canvas preview geometry.
//!
//! The full-view screen shows the viewed image on a miniature of the export
//! canvas. The canvas is sized at `dpi` pixels per inch, scaled down to fit the
//! content area minus padding, and centered. The image then fills the area
//! inside the scaled margins using [`crop_fill`], so the preview never shows
//! letterboxing even though the exported page may.

use crate::imaging::{Rect, crop_fill};
use crate::layout::CanvasSpec;
use serde::Serialize;

/// Screen rectangles for drawing one preview frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PreviewFrame {
    /// Scale from canvas pixels (at `dpi`) to screen pixels.
    pub scale: f32,
    /// The whole canvas on screen.
    pub canvas: Rect,
    /// The canvas minus the scaled margins.
    pub drawable: Rect,
    /// Region of the source image to draw into `drawable`, `None` when there is
    /// no image or no drawable area.
    pub source: Option<Rect>,
}

/// Compute where the canvas, drawable area, and image crop go on screen.
pub fn compute_preview(
    canvas: &CanvasSpec,
    dpi: u32,
    content: Rect,
    padding: f32,
    image_size: Option<(u32, u32)>,
) -> PreviewFrame {
    let dpi = dpi as f32;
    let canvas_w = canvas.width * dpi;
    let canvas_h = canvas.height * dpi;

    let scale = if canvas_w > 0.0 && canvas_h > 0.0 {
        ((content.width - padding) / canvas_w)
            .min((content.height - padding) / canvas_h)
            .max(0.0)
    } else {
        0.0
    };

    let display_w = canvas_w * scale;
    let display_h = canvas_h * scale;
    let canvas_rect = Rect::new(
        content.x + (content.width - display_w) / 2.0,
        content.y + (content.height - display_h) / 2.0,
        display_w,
        display_h,
    );

    let left = canvas.margin_left * dpi * scale;
    let right = canvas.margin_right * dpi * scale;
    let top = canvas.margin_top * dpi * scale;
    let bottom = canvas.margin_bottom * dpi * scale;
    let drawable = Rect::new(
        canvas_rect.x + left,
        canvas_rect.y + top,
        display_w - left - right,
        display_h - top - bottom,
    );

    let source = match image_size {
        Some((w, h)) if w > 0 && h > 0 && drawable.has_area() => Some(crop_fill((w, h), drawable)),
        _ => None,
    };

    PreviewFrame {
        scale,
        canvas: canvas_rect,
        drawable,
        source,
    }
}
