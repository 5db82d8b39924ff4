//! Document writer trait.
//!
//! Export hands finished page plans to a [`DocumentWriter`]; the writer owns
//! the output format. The production writer is
//! [`PdfWriter`](super::pdf::PdfWriter).

use crate::imaging::{Bitmap, Rect};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("No document started; call begin() first")]
    NotStarted,
    #[error("Failed to encode page {page}: {reason}")]
    Encode { page: usize, reason: String },
    #[error("Failed to save {path}: {reason}")]
    Save { path: String, reason: String },
}

/// Receives pages in order and serializes them to a file.
///
/// Coordinates passed to [`write_page`](Self::write_page) are PDF points with a
/// top-left origin; writers for bottom-up formats flip them.
pub trait DocumentWriter {
    /// Start a new document whose pages are `width_pt` x `height_pt`.
    fn begin(&mut self, width_pt: f32, height_pt: f32);

    /// Append a page, drawing `image` into `placement` when both are present.
    fn write_page(
        &mut self,
        image: Option<&Bitmap>,
        placement: Option<Rect>,
    ) -> Result<(), DocumentError>;

    /// Write the document to `path`.
    fn save(&mut self, path: &Path) -> Result<(), DocumentError>;
}
