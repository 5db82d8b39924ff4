//! Image processing backend trait and shared types.
//!
//! The [`ImageBackend`] trait defines the pixel operations the rest of the
//! crate relies on: identify, decode, resize, and encode. Thumbnail materialization,
//! the full-resolution window, and export all go through it, so none of them
//! touch a codec directly.
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend), built on the `image`
//! crate.

use image::RgbaImage;
use std::path::Path;
use thiserror::Error;

/// A decoded image held in memory as 8-bit RGBA.
pub type Bitmap = RgbaImage;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to decode {path}: {reason}")]
    Decode { path: String, reason: String },
    #[error("Failed to encode {path}: {reason}")]
    Encode { path: String, reason: String },
}

/// Width and height of an image in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn of(bitmap: &Bitmap) -> Self {
        Self {
            width: bitmap.width(),
            height: bitmap.height(),
        }
    }
}

/// Trait for image processing backends.
///
/// All operations are synchronous: callers run them to completion inside the
/// tick that triggers them.
pub trait ImageBackend {
    /// Read image dimensions without decoding pixel data.
    fn identify(&self, path: &Path) -> Result<Dimensions, BackendError>;

    /// Decode an image file into an RGBA bitmap.
    fn decode(&self, path: &Path) -> Result<Bitmap, BackendError>;

    /// Resample a bitmap to exactly `width` x `height`.
    fn resize(&self, bitmap: &Bitmap, width: u32, height: u32) -> Bitmap;

    /// Encode a bitmap to disk, format chosen by the path extension.
    fn encode(&self, bitmap: &Bitmap, path: &Path) -> Result<(), BackendError>;
}
