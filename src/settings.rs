//! Per-folder settings file.
//!
//! Each image folder carries a small plain-text file (`.assembler_settings` by
//! default) that restores the canvas and the ordered selection when the folder
//! is opened again:
//!
//! ```text
//! 8            ← canvas width (in)
//! 10           ← canvas height (in)
//! 1            ← margin top
//! 1            ← margin bottom
//! 1            ← margin left
//! 1            ← margin right
//! cover.jpg    ← rank 1
//! [BLANK_PAGE] ← rank 2
//! back.png     ← rank 3
//! ```
//!
//! Reading never fails. A missing file, a short file, or a field that does not
//! parse as a finite non-negative number falls back to the default for that
//! field only.

use crate::layout::CanvasSpec;
use crate::selection::SavedItem;
use crate::store::{BLANK_PAGE_MARKER, ImageStore};
use log::{debug, warn};
use std::fmt::Write as _;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Cannot write settings file {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Parsed contents of a settings file.
#[derive(Debug, Clone, PartialEq)]
pub struct FolderSettings {
    pub canvas: CanvasSpec,
    /// Selection in rank order.
    pub selection: Vec<SavedItem>,
}

/// Parse settings text, falling back per field to `defaults`.
pub fn parse_settings(text: &str, defaults: &CanvasSpec) -> FolderSettings {
    let mut lines = text.lines();

    let mut fields = defaults.to_fields();
    for field in fields.iter_mut() {
        let Some(line) = lines.next() else {
            break;
        };
        match line.trim().parse::<f32>() {
            Ok(value) if value.is_finite() && value >= 0.0 => *field = value,
            _ => debug!("Ignoring invalid canvas value {line:?}"),
        }
    }

    let selection = lines
        .map(|line| line.trim_end_matches('\r'))
        .filter(|line| !line.is_empty())
        .map(|line| {
            if line == BLANK_PAGE_MARKER {
                SavedItem::BlankPage
            } else {
                SavedItem::File(line.to_string())
            }
        })
        .collect();

    FolderSettings {
        canvas: CanvasSpec::from_fields(fields),
        selection,
    }
}

/// Render settings text for `canvas` and the store's current selection.
pub fn format_settings(canvas: &CanvasSpec, store: &ImageStore) -> String {
    let mut out = String::new();
    for value in canvas.to_fields() {
        let _ = writeln!(out, "{value}");
    }
    for id in store.sorted_selection() {
        let _ = writeln!(out, "{}", store.get(id).display_name());
    }
    out
}

/// Read the settings file at `path`. Never fails; see the module docs.
pub fn load_settings(path: &Path, defaults: &CanvasSpec) -> FolderSettings {
    match fs::read_to_string(path) {
        Ok(text) => parse_settings(&text, defaults),
        Err(e) => {
            if e.kind() != io::ErrorKind::NotFound {
                warn!("Cannot read settings {}: {}", path.display(), e);
            }
            FolderSettings {
                canvas: *defaults,
                selection: Vec::new(),
            }
        }
    }
}

/// Write the canvas and the sorted selection to `path`.
pub fn save_settings(
    path: &Path,
    canvas: &CanvasSpec,
    store: &ImageStore,
) -> Result<(), SettingsError> {
    fs::write(path, format_settings(canvas, store)).map_err(|source| SettingsError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    debug!("Saved settings to {}", path.display());
    Ok(())
}

/// Apply loaded settings to a freshly scanned store, returning the canvas.
pub fn apply_settings(settings: &FolderSettings, store: &mut ImageStore) -> CanvasSpec {
    store.restore_selection(&settings.selection);
    settings.canvas
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;

    #[test]
    fn full_file_parses() {
        let text = "8.5\n11\n0.5\n0.75\n1\n1.25\na.png\n[BLANK_PAGE]\nb.jpg\n";
        let settings = parse_settings(text, &CanvasSpec::default());

        assert_eq!(settings.canvas.to_fields(), [8.5, 11.0, 0.5, 0.75, 1.0, 1.25]);
        assert_eq!(
            settings.selection,
            vec![
                SavedItem::File("a.png".into()),
                SavedItem::BlankPage,
                SavedItem::File("b.jpg".into()),
            ]
        );
    }

    #[test]
    fn short_file_uses_defaults_for_missing_fields() {
        let settings = parse_settings("12\n14\n", &CanvasSpec::default());
        assert_eq!(settings.canvas.to_fields(), [12.0, 14.0, 1.0, 1.0, 1.0, 1.0]);
        assert!(settings.selection.is_empty());
    }

    #[test]
    fn malformed_fields_fall_back_individually() {
        let text = "wide\n-3\nNaN\ninf\n0\n2\n";
        let settings = parse_settings(text, &CanvasSpec::default());
        assert_eq!(settings.canvas.to_fields(), [8.0, 10.0, 1.0, 1.0, 0.0, 2.0]);
    }

    #[test]
    fn empty_text_is_all_defaults() {
        let settings = parse_settings("", &CanvasSpec::default());
        assert_eq!(settings.canvas, CanvasSpec::default());
    }

    #[test]
    fn crlf_lines_are_accepted() {
        let settings = parse_settings("8\r\n10\r\n1\r\n1\r\n1\r\n1\r\nx.png\r\n", &CanvasSpec::default());
        assert_eq!(settings.canvas, CanvasSpec::default());
        assert_eq!(settings.selection, vec![SavedItem::File("x.png".into())]);
    }

    #[test]
    fn missing_file_gives_defaults() {
        let defaults = CanvasSpec {
            width: 5.0,
            ..CanvasSpec::default()
        };
        let settings = load_settings(Path::new("/no/such/settings"), &defaults);
        assert_eq!(settings.canvas, defaults);
        assert!(settings.selection.is_empty());
    }

    #[test]
    fn blank_pages_round_trip_through_file() {
        let tmp = setup_folder(&[("a.png", 4, 4), ("b.png", 4, 4), ("c.png", 4, 4)]);
        let mut store = ImageStore::scan(tmp.path());
        let c = find_entry(&store, "c.png");
        let a = find_entry(&store, "a.png");
        store.toggle_select(c);
        store.append_blank_page();
        store.toggle_select(a);
        store.append_blank_page();
        let canvas = CanvasSpec {
            width: 6.0,
            margin_right: 0.25,
            ..CanvasSpec::default()
        };

        let path = tmp.path().join(".assembler_settings");
        save_settings(&path, &canvas, &store).unwrap();

        let mut reopened = ImageStore::scan(tmp.path());
        let loaded = load_settings(&path, &CanvasSpec::default());
        let restored_canvas = apply_settings(&loaded, &mut reopened);

        assert_eq!(restored_canvas, canvas);
        assert_eq!(
            selection_names(&reopened),
            vec!["c.png", "[BLANK_PAGE]", "a.png", "[BLANK_PAGE]"]
        );
        assert_dense_ranks(&reopened);
        assert_eq!(reopened.gallery_len(), 3);
        assert_eq!(reopened.len(), 5);
    }

    #[test]
    fn saved_text_layout() {
        let tmp = setup_folder(&[("a.png", 4, 4)]);
        let mut store = ImageStore::scan(tmp.path());
        let a = find_entry(&store, "a.png");
        store.append_blank_page();
        store.toggle_select(a);

        let text = format_settings(&CanvasSpec::default(), &store);
        assert_eq!(text, "8\n10\n1\n1\n1\n1\n[BLANK_PAGE]\na.png\n");
    }

    #[test]
    fn save_into_missing_folder_fails() {
        let tmp = setup_folder(&[]);
        let store = ImageStore::scan(tmp.path());
        let result = save_settings(
            &tmp.path().join("gone/.assembler_settings"),
            &CanvasSpec::default(),
            &store,
        );
        assert!(matches!(result, Err(SettingsError::Write { .. })));
    }
}
