//! Pure Rust image backend built on the `image` crate.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Identify | `image::ImageReader::into_dimensions` (header only) |
//! | Decode (JPEG, PNG) | `image::ImageReader` with format sniffing |
//! | Resize | `image::imageops::resize` with `Lanczos3` filter |
//! | Encode | `image::ImageBuffer::save_with_format`, format from extension |

use super::backend::{BackendError, Bitmap, Dimensions, ImageBackend};
use image::imageops::FilterType;
use image::{ImageFormat, ImageReader};
use std::path::Path;

/// Extensions accepted by the folder scan. Matched case-insensitively.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg"];

/// Returns true if `path` has one of the [`SUPPORTED_EXTENSIONS`].
pub fn has_image_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| {
            SUPPORTED_EXTENSIONS
                .iter()
                .any(|supported| e.eq_ignore_ascii_case(supported))
        })
}

/// Backend using the `image` crate decoders and encoders.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

fn output_format(path: &Path) -> Result<ImageFormat, BackendError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match ext.as_str() {
        "png" => Ok(ImageFormat::Png),
        "jpg" | "jpeg" => Ok(ImageFormat::Jpeg),
        other => Err(BackendError::Encode {
            path: path.display().to_string(),
            reason: format!("unsupported output format: {other:?}"),
        }),
    }
}

impl ImageBackend for RustBackend {
    fn identify(&self, path: &Path) -> Result<Dimensions, BackendError> {
        let (width, height) = ImageReader::open(path)?
            .with_guessed_format()?
            .into_dimensions()
            .map_err(|e| BackendError::Decode {
                path: path.display().to_string(),
                reason: format!("Failed to read dimensions: {e}"),
            })?;
        Ok(Dimensions { width, height })
    }

    fn decode(&self, path: &Path) -> Result<Bitmap, BackendError> {
        let decoded = ImageReader::open(path)?
            .with_guessed_format()?
            .decode()
            .map_err(|e| BackendError::Decode {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;
        Ok(decoded.to_rgba8())
    }

    fn resize(&self, bitmap: &Bitmap, width: u32, height: u32) -> Bitmap {
        image::imageops::resize(bitmap, width, height, FilterType::Lanczos3)
    }

    fn encode(&self, bitmap: &Bitmap, path: &Path) -> Result<(), BackendError> {
        let format = output_format(path)?;
        // JPEG has no alpha channel
        let result = match format {
            ImageFormat::Jpeg => image::DynamicImage::ImageRgba8(bitmap.clone())
                .to_rgb8()
                .save_with_format(path, format),
            _ => bitmap.save_with_format(path, format),
        };
        result.map_err(|e| BackendError::Encode {
            path: path.display().to_string(),
            reason: e.to_string(),
        })
    }
}
