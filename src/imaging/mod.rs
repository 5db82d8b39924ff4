//! Image decoding and resizing behind a backend trait, plus pure geometry.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Decode** | `image::ImageReader` (JPEG, PNG) |
//! | **Resize** | `image::imageops::resize`, Lanczos3 |
//! | **Encode** | `image` PNG/JPEG encoders |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for dimension and fitting math (unit testable)
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]

pub mod backend;
pub mod calculations;
pub mod rust_backend;

pub use backend::{BackendError, Bitmap, Dimensions, ImageBackend};
pub use calculations::{Rect, aspect_fit, crop_fill, fit_longest_side};
pub use rust_backend::{RustBackend, has_image_extension};
