//! CLI output formatting for every command.
//!
//! # Entity Display
//!
//! Gallery images and selected pages are shown by their positional index and
//! file name; details (rank, thumbnail size, placement) follow as indented
//! context lines. Blank pages show as `[BLANK_PAGE]`.
//!
//! # Output Format
//!
//! ## Scan
//!
//! ```text
//! Folder /photos
//! Images
//! 001 IMG_0002.jpg
//! 002 IMG_0001.jpg  #1
//!
//! Selection
//! #1 IMG_0001.jpg
//! #2 [BLANK_PAGE]
//!
//! Canvas
//!     8 x 10 in, margins 1 / 1 / 1 / 1 in (top / bottom / left / right)
//! ```
//!
//! ## Thumbnails
//!
//! ```text
//! 001 IMG_0002.jpg
//!     thumbnail: 128x96
//! 002 broken.png
//!     thumbnail: failed
//!
//! Thumbnails: 1 generated, 1 failed
//! ```
//!
//! ## Layout
//!
//! ```text
//! Page size 576 x 720 pt
//! 001 IMG_0001.jpg (1000x500)
//!     placed 432 x 216 pt at (72, 252)
//! 002 [BLANK_PAGE]
//!     empty page
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format functions
//! are pure: no I/O, no side effects.

use crate::export::{ExportSummary, PageLayout};
use crate::layout::{CanvasSpec, page_size_pt};
use crate::session::Tile;
use crate::thumbnails::CacheStats;
use std::path::Path;

// ============================================================================
// Shared display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Format a gallery line: index, name, and rank when selected.
///
/// ```text
/// 001 IMG_0002.jpg
/// 002 IMG_0001.jpg  #1
/// ```
fn tile_line(index: usize, tile: &Tile) -> String {
    match tile.selection_order {
        Some(rank) => format!("{} {}  #{}", format_index(index), tile.name, rank),
        None => format!("{} {}", format_index(index), tile.name),
    }
}

/// Format the canvas as a single context line.
fn canvas_line(canvas: &CanvasSpec) -> String {
    format!(
        "{}{} x {} in, margins {} / {} / {} / {} in (top / bottom / left / right)",
        indent(1),
        canvas.width,
        canvas.height,
        canvas.margin_top,
        canvas.margin_bottom,
        canvas.margin_left,
        canvas.margin_right
    )
}

// ============================================================================
// Scan
// ============================================================================

/// Format the folder inventory: gallery, current selection, and canvas.
pub fn format_scan_output(
    folder: &Path,
    tiles: &[Tile],
    selection: &[Tile],
    canvas: &CanvasSpec,
) -> Vec<String> {
    let mut lines = vec![format!("Folder {}", folder.display())];

    lines.push("Images".to_string());
    if tiles.is_empty() {
        lines.push(format!("{}(none)", indent(1)));
    }
    for (i, tile) in tiles.iter().enumerate() {
        lines.push(tile_line(i + 1, tile));
    }

    lines.push(String::new());
    lines.extend(format_selection_output(selection));

    lines.push(String::new());
    lines.push("Canvas".to_string());
    lines.push(canvas_line(canvas));
    lines
}

pub fn print_scan_output(folder: &Path, tiles: &[Tile], selection: &[Tile], canvas: &CanvasSpec) {
    for line in format_scan_output(folder, tiles, selection, canvas) {
        println!("{}", line);
    }
}

// ============================================================================
// Selection
// ============================================================================

/// Format the ordered selection, one `#rank name` line per page.
pub fn format_selection_output(selection: &[Tile]) -> Vec<String> {
    let mut lines = vec!["Selection".to_string()];
    if selection.is_empty() {
        lines.push(format!("{}(nothing selected)", indent(1)));
    }
    for (i, tile) in selection.iter().enumerate() {
        lines.push(format!("#{} {}", i + 1, tile.name));
    }
    lines
}

pub fn print_selection_output(selection: &[Tile]) {
    for line in format_selection_output(selection) {
        println!("{}", line);
    }
}

// ============================================================================
// Thumbnails
// ============================================================================

/// Format per-image thumbnail status followed by cache statistics.
pub fn format_thumbnail_output(tiles: &[Tile], stats: &CacheStats) -> Vec<String> {
    let mut lines = Vec::new();
    for (i, tile) in tiles.iter().enumerate() {
        lines.push(format!("{} {}", format_index(i + 1), tile.name));
        let status = match (tile.thumbnail_loaded, tile.thumbnail_size) {
            (_, Some((w, h))) => format!("{w}x{h}"),
            (true, None) => "failed".to_string(),
            (false, None) => "pending".to_string(),
        };
        lines.push(format!("{}thumbnail: {}", indent(1), status));
    }
    lines.push(String::new());
    lines.push(format!("Thumbnails: {}", stats));
    lines
}

pub fn print_thumbnail_output(tiles: &[Tile], stats: &CacheStats) {
    for line in format_thumbnail_output(tiles, stats) {
        println!("{}", line);
    }
}

// ============================================================================
// Layout and export
// ============================================================================

/// Format the page plan of the current selection.
pub fn format_layout_output(rows: &[PageLayout], canvas: &CanvasSpec) -> Vec<String> {
    let (w, h) = page_size_pt(canvas);
    let mut lines = vec![format!("Page size {} x {} pt", w, h)];

    for row in rows {
        let header = match row.image_size {
            Some((iw, ih)) => format!("{} {} ({}x{})", format_index(row.page), row.name, iw, ih),
            None => format!("{} {}", format_index(row.page), row.name),
        };
        lines.push(header);

        let detail = match row.plan.placement {
            Some(rect) => format!(
                "placed {} x {} pt at ({}, {})",
                rect.width.round(),
                rect.height.round(),
                rect.x.round(),
                rect.y.round()
            ),
            None if row.blank => "empty page".to_string(),
            None => "empty page (image could not be placed)".to_string(),
        };
        lines.push(format!("{}{}", indent(1), detail));
    }
    lines
}

pub fn print_layout_output(rows: &[PageLayout], canvas: &CanvasSpec) {
    for line in format_layout_output(rows, canvas) {
        println!("{}", line);
    }
}

/// Format the page plan as pretty JSON.
pub fn format_layout_json(rows: &[PageLayout]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(rows)
}

pub fn format_export_output(summary: &ExportSummary) -> Vec<String> {
    vec![format!("Exported {} → {}", summary, summary.path.display())]
}

pub fn print_export_output(summary: &ExportSummary) {
    for line in format_export_output(summary) {
        println!("{}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::plan_page;
    use crate::store::ImageStore;
    use crate::test_helpers::*;
    use std::path::PathBuf;

    /// Build tiles from a real store so `id` values are genuine.
    fn tiles(names: &[(&str, Option<u32>)]) -> Vec<Tile> {
        let images: Vec<(&str, u32, u32)> = names.iter().map(|(n, _)| (*n, 2, 2)).collect();
        let tmp = setup_folder(&images);
        let store = ImageStore::scan(tmp.path());
        names
            .iter()
            .map(|(name, rank)| Tile {
                id: find_entry(&store, name),
                name: name.to_string(),
                blank: false,
                selection_order: *rank,
                thumbnail_loaded: false,
                thumbnail_size: None,
            })
            .collect()
    }

    #[test]
    fn format_index_pads() {
        assert_eq!(format_index(1), "001");
        assert_eq!(format_index(100), "100");
    }

    #[test]
    fn scan_output_lists_images_selection_and_canvas() {
        let gallery = tiles(&[("b.jpg", None), ("a.png", Some(1))]);
        let selection = vec![gallery[1].clone()];

        let lines = format_scan_output(
            Path::new("/photos"),
            &gallery,
            &selection,
            &CanvasSpec::default(),
        );

        assert_eq!(
            lines,
            vec![
                "Folder /photos",
                "Images",
                "001 b.jpg",
                "002 a.png  #1",
                "",
                "Selection",
                "#1 a.png",
                "",
                "Canvas",
                "    8 x 10 in, margins 1 / 1 / 1 / 1 in (top / bottom / left / right)",
            ]
        );
    }

    #[test]
    fn empty_selection_is_called_out() {
        assert_eq!(
            format_selection_output(&[]),
            vec!["Selection", "    (nothing selected)"]
        );
    }

    #[test]
    fn thumbnail_output_shows_status() {
        let mut gallery = tiles(&[("a.png", None), ("b.png", None), ("c.png", None)]);
        gallery[0].thumbnail_loaded = true;
        gallery[0].thumbnail_size = Some((128, 64));
        gallery[1].thumbnail_loaded = true;
        let stats = CacheStats {
            generated: 1,
            failed: 1,
            ..CacheStats::default()
        };

        let lines = format_thumbnail_output(&gallery, &stats);

        assert_eq!(lines[1], "    thumbnail: 128x64");
        assert_eq!(lines[3], "    thumbnail: failed");
        assert_eq!(lines[5], "    thumbnail: pending");
        assert_eq!(lines.last().unwrap(), "Thumbnails: 1 generated, 1 failed");
    }

    #[test]
    fn layout_output_describes_each_page() {
        let canvas = CanvasSpec::default();
        let rows = vec![
            PageLayout {
                page: 1,
                name: "wide.jpg".into(),
                blank: false,
                image_size: Some((1000, 500)),
                plan: plan_page(&canvas, Some((1000, 500))),
            },
            PageLayout {
                page: 2,
                name: "[BLANK_PAGE]".into(),
                blank: true,
                image_size: None,
                plan: plan_page(&canvas, None),
            },
            PageLayout {
                page: 3,
                name: "broken.png".into(),
                blank: false,
                image_size: None,
                plan: plan_page(&canvas, None),
            },
        ];

        let lines = format_layout_output(&rows, &canvas);

        assert_eq!(
            lines,
            vec![
                "Page size 576 x 720 pt",
                "001 wide.jpg (1000x500)",
                "    placed 432 x 216 pt at (72, 252)",
                "002 [BLANK_PAGE]",
                "    empty page",
                "003 broken.png",
                "    empty page (image could not be placed)",
            ]
        );
    }

    #[test]
    fn layout_json_is_parseable() {
        let canvas = CanvasSpec::default();
        let rows = vec![PageLayout {
            page: 1,
            name: "a.png".into(),
            blank: false,
            image_size: Some((10, 10)),
            plan: plan_page(&canvas, Some((10, 10))),
        }];

        let json = format_layout_json(&rows).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[0]["name"], "a.png");
        assert_eq!(value[0]["plan"]["width_pt"], 576.0);
        let width = value[0]["plan"]["placement"]["width"].as_f64().unwrap();
        assert!((width - 432.0).abs() < 1e-3);
    }

    #[test]
    fn export_output_names_the_file() {
        let summary = ExportSummary {
            path: PathBuf::from("/tmp/book.pdf"),
            pages: 3,
            images: 2,
            blanks: 1,
            skipped: 0,
        };
        assert_eq!(
            format_export_output(&summary),
            vec!["Exported 3 pages (2 images, 1 blank) → /tmp/book.pdf"]
        );
    }
}
