//! Shared test utilities for the page-assembler test suite.
//!
//! Provides synthetic image writers and folder fixtures, plus lookups that
//! panic with a clear message on miss.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = setup_folder(&[("a.png", 40, 20), ("b.jpg", 20, 40)]);
//! let store = ImageStore::scan(tmp.path());
//! let id = find_entry(&store, "a.png");
//! ```

use image::{ImageEncoder, RgbImage};
use std::path::Path;
use tempfile::TempDir;

use crate::store::{EntryId, ImageStore};

// =========================================================================
// Synthetic images
// =========================================================================

fn gradient(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    })
}

/// Create a small valid JPEG file with the given dimensions.
pub fn create_test_jpeg(path: &Path, width: u32, height: u32) {
    let img = gradient(width, height);
    let file = std::fs::File::create(path).unwrap();
    let writer = std::io::BufWriter::new(file);
    image::codecs::jpeg::JpegEncoder::new(writer)
        .write_image(img.as_raw(), width, height, image::ExtendedColorType::Rgb8)
        .unwrap();
}

/// Create a small valid PNG file with the given dimensions.
pub fn create_test_png(path: &Path, width: u32, height: u32) {
    gradient(width, height)
        .save_with_format(path, image::ImageFormat::Png)
        .unwrap();
}

// =========================================================================
// Folder fixtures
// =========================================================================

/// Create a temp folder holding one synthetic image per `(name, width, height)`.
///
/// The encoder follows the extension: `.png` files are PNG, everything else JPEG.
pub fn setup_folder(images: &[(&str, u32, u32)]) -> TempDir {
    let tmp = TempDir::new().unwrap();
    for (name, width, height) in images {
        let path = tmp.path().join(name);
        let is_png = Path::new(name)
            .extension()
            .is_some_and(|e| e.eq_ignore_ascii_case("png"));
        if is_png {
            create_test_png(&path, *width, *height);
        } else {
            create_test_jpeg(&path, *width, *height);
        }
    }
    tmp
}

// =========================================================================
// Store lookups (panic with a clear message on a miss)
// =========================================================================

/// Find an entry by file name. Panics if not found.
pub fn find_entry(store: &ImageStore, file_name: &str) -> EntryId {
    store.find_by_file_name(file_name).unwrap_or_else(|| {
        let names: Vec<String> = store
            .ids()
            .filter_map(|id| store.get(id).file_name())
            .collect();
        panic!("entry '{file_name}' not found. Available: {names:?}")
    })
}

/// Display names of the sorted selection, blank pages shown as `[BLANK_PAGE]`.
pub fn selection_names(store: &ImageStore) -> Vec<String> {
    store
        .sorted_selection()
        .into_iter()
        .map(|id| store.get(id).display_name())
        .collect()
}

/// Assert the selection ranks form exactly `1..=K` with no gaps or duplicates.
pub fn assert_dense_ranks(store: &ImageStore) {
    let mut ranks: Vec<u32> = store
        .ids()
        .filter_map(|id| store.get(id).selection_order())
        .collect();
    ranks.sort_unstable();
    let expected: Vec<u32> = (1..=ranks.len() as u32).collect();
    assert_eq!(ranks, expected, "selection ranks are not dense");
}
