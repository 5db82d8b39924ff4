//! Export page layout.
//!
//! Turns a [`CanvasSpec`] and the sorted selection into one [`PagePlan`] per
//! selected entry. All values are in PDF points (72 per inch) with a top-left
//! origin; the PDF writer flips the y axis when it emits drawing operators.
//!
//! ```text
//!  ┌──────────── width × 72 ────────────┐
//!  │            margin_top              │
//!  │      ┌──────── drawable ───────┐   │
//!  │ left │   ┌─────────────────┐   │ right
//!  │      │   │  aspect-fit img │   │   │
//!  │      │   └─────────────────┘   │   │
//!  │      └─────────────────────────┘   │
//!  │           margin_bottom            │
//!  └────────────────────────────────────┘
//! ```
//!
//! Blank pages, images without known dimensions, and canvases whose margins
//! leave no drawable area all produce an empty page of full canvas size.

use crate::imaging::{Rect, aspect_fit};
use serde::{Deserialize, Serialize};

/// Export resolution, fixed by the PDF coordinate system.
pub const POINTS_PER_INCH: f32 = 72.0;

/// Physical page and margins, all in inches.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CanvasSpec {
    pub width: f32,
    pub height: f32,
    pub margin_top: f32,
    pub margin_bottom: f32,
    pub margin_left: f32,
    pub margin_right: f32,
}

impl Default for CanvasSpec {
    fn default() -> Self {
        Self {
            width: 8.0,
            height: 10.0,
            margin_top: 1.0,
            margin_bottom: 1.0,
            margin_left: 1.0,
            margin_right: 1.0,
        }
    }
}

impl CanvasSpec {
    /// Field values in settings-file order: width, height, top, bottom, left, right.
    pub fn to_fields(&self) -> [f32; 6] {
        [
            self.width,
            self.height,
            self.margin_top,
            self.margin_bottom,
            self.margin_left,
            self.margin_right,
        ]
    }

    pub fn from_fields(fields: [f32; 6]) -> Self {
        let [width, height, margin_top, margin_bottom, margin_left, margin_right] = fields;
        Self {
            width,
            height,
            margin_top,
            margin_bottom,
            margin_left,
            margin_right,
        }
    }

    /// True when every value is finite and non-negative.
    pub fn is_valid(&self) -> bool {
        self.to_fields().iter().all(|v| v.is_finite() && *v >= 0.0)
    }
}

/// Page size in points.
pub fn page_size_pt(canvas: &CanvasSpec) -> (f32, f32) {
    (
        canvas.width * POINTS_PER_INCH,
        canvas.height * POINTS_PER_INCH,
    )
}

/// The area inside the margins, in points, top-left origin.
///
/// Width or height may be zero or negative when the margins swallow the page.
pub fn drawable_rect_pt(canvas: &CanvasSpec) -> Rect {
    let (page_w, page_h) = page_size_pt(canvas);
    let left = canvas.margin_left * POINTS_PER_INCH;
    let top = canvas.margin_top * POINTS_PER_INCH;
    Rect::new(
        left,
        top,
        page_w - left - canvas.margin_right * POINTS_PER_INCH,
        page_h - top - canvas.margin_bottom * POINTS_PER_INCH,
    )
}

/// Layout of a single export page.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PagePlan {
    pub width_pt: f32,
    pub height_pt: f32,
    /// Where the image goes, `None` for an empty page.
    pub placement: Option<Rect>,
}

impl PagePlan {
    pub fn is_empty(&self) -> bool {
        self.placement.is_none()
    }
}

/// Plan one page for an image of `image_size` pixels, or `None` for a blank.
pub fn plan_page(canvas: &CanvasSpec, image_size: Option<(u32, u32)>) -> PagePlan {
    let (width_pt, height_pt) = page_size_pt(canvas);
    let drawable = drawable_rect_pt(canvas);

    let placement = match image_size {
        Some((w, h)) if w > 0 && h > 0 && drawable.has_area() => {
            Some(aspect_fit((w, h), drawable))
        }
        _ => None,
    };

    PagePlan {
        width_pt,
        height_pt,
        placement,
    }
}

/// Plan every page in order. One plan per input, blanks included.
pub fn plan_document<I>(canvas: &CanvasSpec, pages: I) -> Vec<PagePlan>
where
    I: IntoIterator<Item = Option<(u32, u32)>>,
{
    pages
        .into_iter()
        .map(|size| plan_page(canvas, size))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f32, expected: f32) {
        assert!(
            (actual - expected).abs() < 1e-3,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn default_canvas_is_letterish() {
        let canvas = CanvasSpec::default();
        assert_eq!(canvas.to_fields(), [8.0, 10.0, 1.0, 1.0, 1.0, 1.0]);
        assert_eq!(page_size_pt(&canvas), (576.0, 720.0));
    }

    #[test]
    fn drawable_rect_subtracts_margins() {
        let canvas = CanvasSpec {
            margin_left: 0.5,
            margin_top: 2.0,
            ..CanvasSpec::default()
        };
        let rect = drawable_rect_pt(&canvas);
        assert_eq!(rect, Rect::new(36.0, 144.0, 576.0 - 36.0 - 72.0, 720.0 - 144.0 - 72.0));
    }

    #[test]
    fn wide_image_on_default_canvas() {
        // 8x10in, 1in margins → 432x576pt drawable; 1000x500 → scale 0.432
        let plan = plan_page(&CanvasSpec::default(), Some((1000, 500)));
        let placed = plan.placement.unwrap();

        assert_close(placed.width / 1000.0, 0.432);
        assert_close(placed.width, 432.0);
        assert_close(placed.height, 216.0);
        // 180pt below the top of the drawable area
        assert_close(placed.y - 72.0, 180.0);
        assert_close(placed.x, 72.0);
        assert_eq!((plan.width_pt, plan.height_pt), (576.0, 720.0));
    }

    #[test]
    fn blank_page_has_no_placement() {
        let plan = plan_page(&CanvasSpec::default(), None);
        assert!(plan.is_empty());
        assert_eq!((plan.width_pt, plan.height_pt), (576.0, 720.0));
    }

    #[test]
    fn margins_swallowing_page_give_empty_page() {
        let canvas = CanvasSpec {
            width: 2.0,
            margin_left: 1.0,
            margin_right: 1.5,
            ..CanvasSpec::default()
        };
        let plan = plan_page(&canvas, Some((100, 100)));
        assert!(plan.is_empty());
        assert_close(plan.width_pt, 144.0);
    }

    #[test]
    fn document_keeps_order_and_count() {
        let plans = plan_document(
            &CanvasSpec::default(),
            vec![Some((100, 100)), None, Some((50, 200))],
        );
        assert_eq!(plans.len(), 3);
        assert!(!plans[0].is_empty());
        assert!(plans[1].is_empty());
        let tall = plans[2].placement.unwrap();
        assert_close(tall.height, 576.0);
        assert_close(tall.width, 144.0);
    }

    #[test]
    fn invalid_canvas_values_detected() {
        assert!(CanvasSpec::default().is_valid());
        let negative = CanvasSpec {
            margin_top: -1.0,
            ..CanvasSpec::default()
        };
        assert!(!negative.is_valid());
        let nan = CanvasSpec {
            width: f32::NAN,
            ..CanvasSpec::default()
        };
        assert!(!nan.is_valid());
    }
}
