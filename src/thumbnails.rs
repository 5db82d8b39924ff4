//! Lazy gallery thumbnails with an on-disk cache.
//!
//! Thumbnails are materialized one at a time from [`ThumbnailCache::tick`],
//! which the interactive loop calls once per frame with the range of visible
//! gallery tiles. Doing at most one decode per tick keeps each frame short
//! regardless of folder size.
//!
//! ## Cache layout
//!
//! ```text
//! photos/
//! ├── IMG_0001.jpg
//! ├── IMG_0002.png
//! └── .assembler_thumbs/
//!     ├── IMG_0001.jpg__thumb.png
//!     └── IMG_0002.png__thumb.png
//! ```
//!
//! Cache files are keyed by source file name only. They are never compared
//! against the source, so an edited image keeps its old thumbnail until the
//! cache folder is deleted.

use crate::config::ThumbnailsConfig;
use crate::imaging::{Bitmap, Dimensions, ImageBackend, fit_longest_side};
use crate::store::{EntryId, ImageStore};
use log::{debug, warn};
use std::fmt;
use std::fs;
use std::ops::Range;
use std::path::{Path, PathBuf};

/// Suffix appended to the source file name to form the cache file name.
pub const THUMB_SUFFIX: &str = "__thumb.png";

/// Summary of what the cache did during a session.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    /// Loaded from an existing cache file.
    pub hits: u32,
    /// Decoded from the source and downscaled.
    pub generated: u32,
    /// Source (or cache file) could not be decoded.
    pub failed: u32,
    /// Generated but the cache file could not be written.
    pub persist_failures: u32,
}

impl CacheStats {
    pub fn total(&self) -> u32 {
        self.hits + self.generated + self.failed
    }
}

impl fmt::Display for CacheStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.hits > 0 {
            write!(
                f,
                "{} cached, {} generated ({} total)",
                self.hits,
                self.generated,
                self.total()
            )?;
        } else {
            write!(f, "{} generated", self.generated)?;
        }
        if self.failed > 0 {
            write!(f, ", {} failed", self.failed)?;
        }
        if self.persist_failures > 0 {
            write!(f, ", {} not cached", self.persist_failures)?;
        }
        Ok(())
    }
}

/// Materializes gallery thumbnails on demand.
#[derive(Debug, Clone)]
pub struct ThumbnailCache {
    size: u32,
    cache_dir: String,
    stats: CacheStats,
}

impl ThumbnailCache {
    pub fn new(config: &ThumbnailsConfig) -> Self {
        Self {
            size: config.size,
            cache_dir: config.cache_dir.clone(),
            stats: CacheStats::default(),
        }
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    /// Cache folder for an image folder.
    pub fn cache_folder(&self, folder: &Path) -> PathBuf {
        folder.join(&self.cache_dir)
    }

    /// Deterministic cache file path for `file_name` inside `folder`.
    pub fn thumb_path(&self, folder: &Path, file_name: &str) -> PathBuf {
        self.cache_folder(folder)
            .join(format!("{file_name}{THUMB_SUFFIX}"))
    }

    /// Load at most one missing thumbnail within the `visible` gallery range.
    ///
    /// Returns the entry that was processed, or `None` when every visible entry
    /// is already loaded. The entry is marked loaded even when decoding failed,
    /// so a broken file is attempted once and then left alone.
    pub fn tick(
        &mut self,
        store: &mut ImageStore,
        backend: &impl ImageBackend,
        visible: Range<usize>,
    ) -> Option<EntryId> {
        let end = visible.end.min(store.gallery_len());
        let start = visible.start.min(end);

        let id = (start..end)
            .filter_map(|i| store.gallery_id(i))
            .find(|id| !store.get(*id).is_thumbnail_loaded())?;

        let entry = store.get(id);
        let thumbnail = match (entry.path(), entry.file_name()) {
            (Some(path), Some(name)) => {
                let path = path.to_path_buf();
                self.materialize(store.folder(), &path, &name, backend)
            }
            _ => None,
        };

        let entry = store.get_mut(id);
        entry.thumbnail_loaded = true;
        entry.thumbnail = thumbnail;
        Some(id)
    }

    /// Run [`tick`](Self::tick) until every gallery thumbnail is loaded.
    ///
    /// Used by the command line, which has no frame loop.
    pub fn load_all(&mut self, store: &mut ImageStore, backend: &impl ImageBackend) -> usize {
        let range = 0..store.gallery_len();
        let mut processed = 0;
        while self.tick(store, backend, range.clone()).is_some() {
            processed += 1;
        }
        processed
    }

    fn materialize(
        &mut self,
        folder: &Path,
        source: &Path,
        file_name: &str,
        backend: &impl ImageBackend,
    ) -> Option<Bitmap> {
        let cached = self.thumb_path(folder, file_name);
        if cached.exists() {
            match backend.decode(&cached) {
                Ok(thumb) => {
                    self.stats.hits += 1;
                    debug!("Thumbnail cache hit: {}", cached.display());
                    return Some(thumb);
                }
                Err(e) => warn!("Unreadable cached thumbnail, regenerating: {e}"),
            }
        }

        let full = match backend.decode(source) {
            Ok(bitmap) => bitmap,
            Err(e) => {
                self.stats.failed += 1;
                warn!("Thumbnail failed for {}: {}", source.display(), e);
                return None;
            }
        };

        let dims = Dimensions::of(&full);
        let (w, h) = fit_longest_side((dims.width, dims.height), self.size);
        let thumb = backend.resize(&full, w, h);
        self.stats.generated += 1;

        if let Err(e) = self.persist(folder, &cached, &thumb, backend) {
            self.stats.persist_failures += 1;
            warn!("Could not cache thumbnail {}: {}", cached.display(), e);
        }
        Some(thumb)
    }

    fn persist(
        &self,
        folder: &Path,
        cached: &Path,
        thumb: &Bitmap,
        backend: &impl ImageBackend,
    ) -> Result<(), crate::imaging::BackendError> {
        fs::create_dir_all(self.cache_folder(folder))?;
        backend.encode(thumb, cached)
    }
}
