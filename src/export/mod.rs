//! Export of the ordered selection as a multi-page document.
//!
//! | Stage | Function |
//! |---|---|
//! | Order | [`ImageStore::sorted_selection`] |
//! | Layout | [`plan_page`](crate::layout::plan_page) per entry |
//! | Pixels | [`ImageBackend::decode`] per image page |
//! | Output | [`DocumentWriter`] (`PdfWriter` in production) |
//!
//! Every selected entry becomes exactly one page, in rank order. A page stays
//! empty when its entry is a blank page, when its image fails to decode, or
//! when the margins leave no drawable area. A decode failure is logged and
//! counted but does not abort the export.

pub mod pdf;
pub mod writer;

pub use pdf::PdfWriter;
pub use writer::{DocumentError, DocumentWriter};

use crate::imaging::{Bitmap, Dimensions, ImageBackend};
use crate::layout::{CanvasSpec, PagePlan, page_size_pt, plan_page};
use crate::store::{EntryId, ImageStore};
use log::{info, warn};
use serde::Serialize;
use std::borrow::Cow;
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default file name offered by the save dialog.
pub const DEFAULT_EXPORT_NAME: &str = "output.pdf";

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Nothing is selected")]
    EmptySelection,
    #[error(transparent)]
    Document(#[from] DocumentError),
}

/// What an export produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportSummary {
    pub path: PathBuf,
    /// Total pages written, blanks included.
    pub pages: usize,
    /// Pages with an image drawn.
    pub images: usize,
    /// Pages that were blank by request.
    pub blanks: usize,
    /// Image pages left empty because the image could not be placed.
    pub skipped: usize,
}

impl fmt::Display for ExportSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} pages ({} images, {} blank)",
            self.pages, self.images, self.blanks
        )?;
        if self.skipped > 0 {
            write!(f, ", {} skipped", self.skipped)?;
        }
        Ok(())
    }
}

/// One row of a layout listing: which entry lands on which page and where.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageLayout {
    pub page: usize,
    pub name: String,
    pub blank: bool,
    pub image_size: Option<(u32, u32)>,
    pub plan: PagePlan,
}

/// Plan every page of the current selection without decoding pixels.
///
/// Image sizes come from [`ImageBackend::identify`]; unreadable images are
/// listed with an empty plan.
pub fn plan_selection(
    store: &ImageStore,
    canvas: &CanvasSpec,
    backend: &impl ImageBackend,
) -> Vec<PageLayout> {
    store
        .sorted_selection()
        .into_iter()
        .enumerate()
        .map(|(i, id)| {
            let entry = store.get(id);
            let image_size = match entry.path() {
                Some(path) => match backend.identify(path) {
                    Ok(dims) => Some((dims.width, dims.height)),
                    Err(e) => {
                        warn!("Cannot read {}: {}", path.display(), e);
                        None
                    }
                },
                None => None,
            };
            PageLayout {
                page: i + 1,
                name: entry.display_name(),
                blank: entry.is_blank(),
                image_size,
                plan: plan_page(canvas, image_size),
            }
        })
        .collect()
}

/// Load pixels for an export page, reusing a resident full-resolution bitmap.
fn page_bitmap<'a>(
    store: &'a ImageStore,
    id: EntryId,
    backend: &impl ImageBackend,
) -> Option<Cow<'a, Bitmap>> {
    let entry = store.get(id);
    if let Some(full) = entry.full() {
        return Some(Cow::Borrowed(full));
    }
    let path = entry.path()?;
    match backend.decode(path) {
        Ok(bitmap) => Some(Cow::Owned(bitmap)),
        Err(e) => {
            warn!("Export: leaving page empty for {}: {}", path.display(), e);
            None
        }
    }
}

/// Write the sorted selection to `path` through `writer`.
pub fn export_selection(
    store: &ImageStore,
    canvas: &CanvasSpec,
    backend: &impl ImageBackend,
    writer: &mut impl DocumentWriter,
    path: &Path,
) -> Result<ExportSummary, ExportError> {
    let selection = store.sorted_selection();
    if selection.is_empty() {
        return Err(ExportError::EmptySelection);
    }

    let (width_pt, height_pt) = page_size_pt(canvas);
    writer.begin(width_pt, height_pt);

    let mut summary = ExportSummary {
        path: path.to_path_buf(),
        pages: 0,
        images: 0,
        blanks: 0,
        skipped: 0,
    };

    for id in selection {
        if store.get(id).is_blank() {
            writer.write_page(None, None)?;
            summary.blanks += 1;
            summary.pages += 1;
            continue;
        }

        let bitmap = page_bitmap(store, id, backend);
        let size = bitmap.as_deref().map(|b| {
            let dims = Dimensions::of(b);
            (dims.width, dims.height)
        });
        let plan = plan_page(canvas, size);

        match (bitmap.as_deref(), plan.placement) {
            (Some(b), Some(rect)) => {
                writer.write_page(Some(b), Some(rect))?;
                summary.images += 1;
            }
            _ => {
                writer.write_page(None, None)?;
                summary.skipped += 1;
            }
        }
        summary.pages += 1;
    }

    writer.save(path)?;
    info!("Exported {} to {}", summary, path.display());
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::backend::tests::MockBackend;
    use crate::test_helpers::*;
    use std::fs;
    use tempfile::TempDir;
    use super::writer::tests::RecordingWriter;

    fn mock_selection(
        images: &[(&str, u32, u32)],
    ) -> (TempDir, ImageStore, MockBackend) {
        let tmp = TempDir::new().unwrap();
        let mut backend = MockBackend::new();
        for (name, w, h) in images {
            let path = tmp.path().join(name);
            fs::write(&path, b"placeholder").unwrap();
            backend = backend.with_image(&path, *w, *h);
        }
        let store = ImageStore::scan(tmp.path());
        (tmp, store, backend)
    }

    #[test]
    fn one_page_per_selected_entry_in_rank_order() {
        let (tmp, mut store, backend) =
            mock_selection(&[("a.png", 1000, 500), ("b.png", 500, 1000), ("c.png", 10, 10)]);
        let b = find_entry(&store, "b.png");
        let a = find_entry(&store, "a.png");
        store.toggle_select(b);
        store.append_blank_page();
        store.toggle_select(a);

        let mut writer = RecordingWriter::new();
        let out = tmp.path().join("out.pdf");
        let summary =
            export_selection(&store, &CanvasSpec::default(), &backend, &mut writer, &out).unwrap();

        assert_eq!(summary.pages, 3);
        assert_eq!(summary.images, 2);
        assert_eq!(summary.blanks, 1);
        assert_eq!(summary.skipped, 0);
        assert_eq!(writer.page_size, Some((576.0, 720.0)));
        assert_eq!(
            writer
                .pages
                .iter()
                .map(|p| p.image_size)
                .collect::<Vec<_>>(),
            vec![Some((500, 1000)), None, Some((1000, 500))]
        );
        assert_eq!(writer.saved_to, Some(out));
    }

    #[test]
    fn placement_matches_aspect_fit_example() {
        let (tmp, mut store, backend) = mock_selection(&[("wide.png", 1000, 500)]);
        let id = find_entry(&store, "wide.png");
        store.toggle_select(id);

        let mut writer = RecordingWriter::new();
        export_selection(
            &store,
            &CanvasSpec::default(),
            &backend,
            &mut writer,
            &tmp.path().join("x.pdf"),
        )
        .unwrap();

        let rect = writer.pages[0].placement.unwrap();
        assert!((rect.width - 432.0).abs() < 1e-3);
        assert!((rect.height - 216.0).abs() < 1e-3);
        assert!((rect.y - (72.0 + 180.0)).abs() < 1e-3);
    }

    #[test]
    fn undecodable_image_gives_empty_page() {
        let (tmp, _, backend) = mock_selection(&[("ok.png", 10, 10)]);
        fs::write(tmp.path().join("bad.png"), b"broken").unwrap();
        let mut store = ImageStore::scan(tmp.path());
        let ok = find_entry(&store, "ok.png");
        let bad = find_entry(&store, "bad.png");
        store.toggle_select(bad);
        store.toggle_select(ok);

        let mut writer = RecordingWriter::new();
        let summary = export_selection(
            &store,
            &CanvasSpec::default(),
            &backend,
            &mut writer,
            &tmp.path().join("x.pdf"),
        )
        .unwrap();

        assert_eq!(summary.pages, 2);
        assert_eq!(summary.skipped, 1);
        assert_eq!(writer.pages[0].placement, None);
        assert!(writer.pages[1].placement.is_some());
    }

    #[test]
    fn no_drawable_area_gives_empty_pages() {
        let (tmp, mut store, backend) = mock_selection(&[("a.png", 10, 10)]);
        let id = find_entry(&store, "a.png");
        store.toggle_select(id);
        let canvas = CanvasSpec {
            margin_left: 4.0,
            margin_right: 4.0,
            ..CanvasSpec::default()
        };

        let mut writer = RecordingWriter::new();
        let summary =
            export_selection(&store, &canvas, &backend, &mut writer, &tmp.path().join("x.pdf"))
                .unwrap();

        assert_eq!(summary.pages, 1);
        assert_eq!(summary.skipped, 1);
        assert_eq!(writer.drawn_pages(), 0);
    }

    #[test]
    fn resident_full_bitmap_is_reused() {
        let (tmp, mut store, backend) = mock_selection(&[("a.png", 40, 20)]);
        let id = find_entry(&store, "a.png");
        store.toggle_select(id);
        store.get_mut(id).full = Some(Bitmap::new(40, 20));

        let mut writer = RecordingWriter::new();
        export_selection(
            &store,
            &CanvasSpec::default(),
            &backend,
            &mut writer,
            &tmp.path().join("x.pdf"),
        )
        .unwrap();

        assert_eq!(backend.decode_count("a.png"), 0);
        assert_eq!(writer.drawn_pages(), 1);
    }

    #[test]
    fn empty_selection_is_rejected() {
        let (tmp, store, backend) = mock_selection(&[("a.png", 10, 10)]);
        let mut writer = RecordingWriter::new();
        let result = export_selection(
            &store,
            &CanvasSpec::default(),
            &backend,
            &mut writer,
            &tmp.path().join("x.pdf"),
        );
        assert!(matches!(result, Err(ExportError::EmptySelection)));
        assert!(writer.page_size.is_none());
    }

    #[test]
    fn save_failure_surfaces() {
        let (tmp, mut store, backend) = mock_selection(&[("a.png", 10, 10)]);
        let id = find_entry(&store, "a.png");
        store.toggle_select(id);
        let mut writer = RecordingWriter {
            fail_save: true,
            ..RecordingWriter::default()
        };

        let result = export_selection(
            &store,
            &CanvasSpec::default(),
            &backend,
            &mut writer,
            &tmp.path().join("x.pdf"),
        );
        assert!(matches!(
            result,
            Err(ExportError::Document(DocumentError::Save { .. }))
        ));
    }

    #[test]
    fn plan_selection_lists_pages_without_decoding() {
        let (_tmp, mut store, backend) = mock_selection(&[("a.png", 1000, 500)]);
        let id = find_entry(&store, "a.png");
        store.append_blank_page();
        store.toggle_select(id);

        let rows = plan_selection(&store, &CanvasSpec::default(), &backend);

        assert_eq!(rows.len(), 2);
        assert!(rows[0].blank);
        assert_eq!(rows[0].name, "[BLANK_PAGE]");
        assert!(rows[0].plan.is_empty());
        assert_eq!(rows[1].page, 2);
        assert_eq!(rows[1].image_size, Some((1000, 500)));
        assert!(rows[1].plan.placement.is_some());
        assert_eq!(backend.decode_count("a.png"), 0);
    }

    #[test]
    fn summary_display() {
        let summary = ExportSummary {
            path: PathBuf::from("out.pdf"),
            pages: 4,
            images: 2,
            blanks: 1,
            skipped: 1,
        };
        assert_eq!(summary.to_string(), "4 pages (2 images, 1 blank), 1 skipped");
    }
}
