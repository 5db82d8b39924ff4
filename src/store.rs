//! Folder scanning and the entry arena.
//!
//! [`ImageStore`] owns every [`ImageEntry`] of the current folder session.
//! Entries live in a flat arena and are addressed by [`EntryId`] handles that
//! stay valid for the life of the store, including after blank pages are
//! appended.
//!
//! ## Layout of the arena
//!
//! ```text
//! [ scanned files ...................... | blank pages ........ ]
//!   0 .. gallery_len()                     gallery_len() .. len()
//! ```
//!
//! Scanned files come first, in the order `read_dir` yields them. That order
//! is platform dependent and deliberately left unsorted. Blank pages are only
//! ever appended, so gallery index `i` is always `EntryId(i)`.

use crate::imaging::{Bitmap, has_image_extension};
use log::{debug, warn};
use std::fs;
use std::path::{Path, PathBuf};

/// Marker used for blank pages in display and in the settings file.
pub const BLANK_PAGE_MARKER: &str = "[BLANK_PAGE]";

/// Stable handle to an entry in an [`ImageStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntryId(usize);

impl EntryId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// What an entry stands for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntrySource {
    /// An image file in the scanned folder.
    File(PathBuf),
    /// An empty export page with no backing file.
    BlankPage,
}

/// One gallery image or blank-page placeholder.
#[derive(Debug)]
pub struct ImageEntry {
    source: EntrySource,
    pub(crate) thumbnail_loaded: bool,
    pub(crate) thumbnail: Option<Bitmap>,
    pub(crate) full: Option<Bitmap>,
    /// `Some(rank)` when selected; ranks are dense `1..=K`.
    pub(crate) selection_order: Option<u32>,
}

impl ImageEntry {
    fn file(path: PathBuf) -> Self {
        Self {
            source: EntrySource::File(path),
            thumbnail_loaded: false,
            thumbnail: None,
            full: None,
            selection_order: None,
        }
    }

    pub(crate) fn blank_page() -> Self {
        Self {
            source: EntrySource::BlankPage,
            // Nothing to materialize for a blank page
            thumbnail_loaded: true,
            thumbnail: None,
            full: None,
            selection_order: None,
        }
    }

    pub fn source(&self) -> &EntrySource {
        &self.source
    }

    pub fn path(&self) -> Option<&Path> {
        match &self.source {
            EntrySource::File(path) => Some(path),
            EntrySource::BlankPage => None,
        }
    }

    pub fn is_blank(&self) -> bool {
        self.source == EntrySource::BlankPage
    }

    /// File name of the backing file, `None` for blank pages.
    pub fn file_name(&self) -> Option<String> {
        self.path()
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().to_string())
    }

    /// File name, or [`BLANK_PAGE_MARKER`] for blank pages.
    pub fn display_name(&self) -> String {
        self.file_name()
            .unwrap_or_else(|| BLANK_PAGE_MARKER.to_string())
    }

    pub fn is_thumbnail_loaded(&self) -> bool {
        self.thumbnail_loaded
    }

    pub fn thumbnail(&self) -> Option<&Bitmap> {
        self.thumbnail.as_ref()
    }

    pub fn is_full_loaded(&self) -> bool {
        self.full.is_some()
    }

    pub fn full(&self) -> Option<&Bitmap> {
        self.full.as_ref()
    }

    pub fn is_selected(&self) -> bool {
        self.selection_order.is_some()
    }

    pub fn selection_order(&self) -> Option<u32> {
        self.selection_order
    }
}

/// Owns all entries of one folder session.
#[derive(Debug)]
pub struct ImageStore {
    folder: PathBuf,
    entries: Vec<ImageEntry>,
    gallery_len: usize,
}

impl ImageStore {
    /// An empty store rooted at `folder`.
    pub fn empty(folder: &Path) -> Self {
        Self {
            folder: folder.to_path_buf(),
            entries: Vec::new(),
            gallery_len: 0,
        }
    }

    /// Scan `folder` for PNG and JPEG files.
    ///
    /// An unreadable folder yields an empty store rather than an error.
    pub fn scan(folder: &Path) -> Self {
        let mut store = Self::empty(folder);

        let read_dir = match fs::read_dir(folder) {
            Ok(rd) => rd,
            Err(e) => {
                warn!("Cannot read folder {}: {}", folder.display(), e);
                return store;
            }
        };

        store.entries = read_dir
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.is_file() && has_image_extension(p))
            .map(ImageEntry::file)
            .collect();
        store.gallery_len = store.entries.len();

        debug!(
            "Scanned {}: {} images",
            folder.display(),
            store.gallery_len
        );
        store
    }

    pub fn folder(&self) -> &Path {
        &self.folder
    }

    /// Total number of entries, blank pages included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of scanned files (the gallery), blank pages excluded.
    pub fn gallery_len(&self) -> usize {
        self.gallery_len
    }

    /// Handle for gallery position `index`, if in range.
    pub fn gallery_id(&self, index: usize) -> Option<EntryId> {
        (index < self.gallery_len).then_some(EntryId(index))
    }

    /// Returns the entry for `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` did not come from this store.
    pub fn get(&self, id: EntryId) -> &ImageEntry {
        &self.entries[id.0]
    }

    pub(crate) fn get_mut(&mut self, id: EntryId) -> &mut ImageEntry {
        &mut self.entries[id.0]
    }

    /// All handles in arena order.
    pub fn ids(&self) -> impl Iterator<Item = EntryId> + use<> {
        (0..self.entries.len()).map(EntryId)
    }

    /// Handles of scanned files in gallery order.
    pub fn gallery_ids(&self) -> impl Iterator<Item = EntryId> + use<> {
        (0..self.gallery_len).map(EntryId)
    }

    pub(crate) fn entries_mut(&mut self) -> impl Iterator<Item = &mut ImageEntry> {
        self.entries.iter_mut()
    }

    /// Find a scanned file by its file name.
    pub fn find_by_file_name(&self, name: &str) -> Option<EntryId> {
        self.gallery_ids()
            .find(|id| self.get(*id).file_name().as_deref() == Some(name))
    }

    pub(crate) fn push(&mut self, entry: ImageEntry) -> EntryId {
        self.entries.push(entry);
        EntryId(self.entries.len() - 1)
    }

    /// Number of entries currently holding a full-resolution bitmap.
    pub fn full_resident_count(&self) -> usize {
        self.entries.iter().filter(|e| e.full.is_some()).count()
    }

    /// Drop every thumbnail and full-resolution bitmap.
    pub fn release_all(&mut self) {
        for entry in &mut self.entries {
            entry.full = None;
            entry.thumbnail = None;
            entry.thumbnail_loaded = entry.is_blank();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;

    #[test]
    fn scan_keeps_only_supported_extensions() {
        let tmp = setup_folder(&[("a.png", 10, 10), ("b.JPG", 10, 10), ("c.jpeg", 10, 10)]);
        std::fs::write(tmp.path().join("notes.txt"), "hello").unwrap();
        std::fs::write(tmp.path().join("anim.gif"), "GIF89a").unwrap();

        let store = ImageStore::scan(tmp.path());
        assert_eq!(store.len(), 3);
        assert_eq!(store.gallery_len(), 3);

        let mut names: Vec<String> = store
            .gallery_ids()
            .filter_map(|id| store.get(id).file_name())
            .collect();
        names.sort();
        assert_eq!(names, vec!["a.png", "b.JPG", "c.jpeg"]);
    }

    #[test]
    fn scan_skips_directories_with_image_names() {
        let tmp = setup_folder(&[("real.png", 4, 4)]);
        std::fs::create_dir(tmp.path().join("folder.png")).unwrap();

        let store = ImageStore::scan(tmp.path());
        assert_eq!(store.gallery_len(), 1);
    }

    #[test]
    fn scanned_entries_start_unselected_and_unloaded() {
        let tmp = setup_folder(&[("a.png", 4, 4), ("b.png", 4, 4)]);
        let store = ImageStore::scan(tmp.path());

        for id in store.ids() {
            let entry = store.get(id);
            assert!(!entry.is_selected());
            assert_eq!(entry.selection_order(), None);
            assert!(!entry.is_thumbnail_loaded());
            assert!(!entry.is_full_loaded());
        }
    }

    #[test]
    fn unreadable_folder_yields_empty_store() {
        let store = ImageStore::scan(Path::new("/definitely/not/a/folder"));
        assert!(store.is_empty());
        assert_eq!(store.gallery_len(), 0);
    }

    #[test]
    fn hidden_cache_dir_is_not_scanned() {
        let tmp = setup_folder(&[("a.png", 4, 4)]);
        let cache = tmp.path().join(".assembler_thumbs");
        std::fs::create_dir(&cache).unwrap();
        create_test_png(&cache.join("a.png__thumb.png"), 2, 2);

        assert_eq!(ImageStore::scan(tmp.path()).gallery_len(), 1);
    }

    #[test]
    fn blank_pages_are_appended_after_gallery() {
        let tmp = setup_folder(&[("a.png", 4, 4)]);
        let mut store = ImageStore::scan(tmp.path());
        let blank = store.push(ImageEntry::blank_page());

        assert_eq!(blank.index(), 1);
        assert_eq!(store.len(), 2);
        assert_eq!(store.gallery_len(), 1);
        assert_eq!(store.gallery_id(1), None);
        assert!(store.get(blank).is_blank());
        assert_eq!(store.get(blank).display_name(), BLANK_PAGE_MARKER);
        assert!(store.get(blank).is_thumbnail_loaded());
    }

    #[test]
    fn find_by_file_name_ignores_blank_pages() {
        let tmp = setup_folder(&[("a.png", 4, 4)]);
        let mut store = ImageStore::scan(tmp.path());
        store.push(ImageEntry::blank_page());

        assert!(store.find_by_file_name("a.png").is_some());
        assert_eq!(store.find_by_file_name(BLANK_PAGE_MARKER), None);
    }

    #[test]
    fn release_all_drops_bitmaps() {
        let tmp = setup_folder(&[("a.png", 4, 4)]);
        let mut store = ImageStore::scan(tmp.path());
        let id = find_entry(&store, "a.png");
        {
            let entry = store.get_mut(id);
            entry.thumbnail_loaded = true;
            entry.thumbnail = Some(Bitmap::new(2, 2));
            entry.full = Some(Bitmap::new(4, 4));
        }

        store.release_all();
        assert!(!store.get(id).is_thumbnail_loaded());
        assert_eq!(store.full_resident_count(), 0);
    }
}
