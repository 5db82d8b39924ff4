//! Full-resolution sliding window for full-screen browsing.
//!
//! While an image is viewed full-screen, its predecessor and successor (in
//! gallery order, wrapping around) are decoded as well so that stepping left or
//! right is instant. Nothing else is kept, so at most three full-resolution
//! bitmaps are resident at any time.
//!
//! ```text
//!   gallery:  0   1   2   3   4   5
//!                    [p] [c] [n]          enter(3)
//!                        [p] [c] [n]      navigate(Next): 2 released, then 5 decoded
//! ```
//!
//! Folders with one or two images collapse the window: the wrapped neighbors
//! point at already-held entries and are not decoded twice.

use crate::imaging::{BackendError, ImageBackend};
use crate::store::{EntryId, ImageStore};
use log::{debug, warn};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WindowError {
    #[error("The gallery is empty")]
    Empty,
    #[error("Index {index} is out of range for a gallery of {len}")]
    OutOfRange { index: usize, len: usize },
    #[error("No image is being viewed")]
    NotActive,
    #[error("Cannot open image: {0}")]
    Decode(#[from] BackendError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Previous,
    Next,
}

/// Index before `index` in a gallery of `len`, wrapping to the end.
pub fn wrap_prev(index: usize, len: usize) -> usize {
    (index + len - 1) % len
}

/// Index after `index` in a gallery of `len`, wrapping to the start.
pub fn wrap_next(index: usize, len: usize) -> usize {
    (index + 1) % len
}

/// Gallery indices that belong in the window around `index`, deduplicated.
pub fn window_indices(index: usize, len: usize) -> Vec<usize> {
    let mut indices = vec![index, wrap_prev(index, len), wrap_next(index, len)];
    indices.sort_unstable();
    indices.dedup();
    indices
}

/// Tracks which gallery index is being viewed and keeps its neighbors decoded.
#[derive(Debug, Default, Clone)]
pub struct FullResolutionWindow {
    current: Option<usize>,
}

impl FullResolutionWindow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Gallery index being viewed, if any.
    pub fn current(&self) -> Option<usize> {
        self.current
    }

    pub fn is_active(&self) -> bool {
        self.current.is_some()
    }

    /// Wrapped `(previous, next)` indices of the viewed image.
    pub fn neighbors(&self, len: usize) -> Option<(usize, usize)> {
        let index = self.current?;
        (len > 0).then(|| (wrap_prev(index, len), wrap_next(index, len)))
    }

    /// Number of full-resolution bitmaps currently held by the store.
    pub fn resident(&self, store: &ImageStore) -> usize {
        store.full_resident_count()
    }

    /// Start viewing gallery entry `index`.
    ///
    /// The viewed image must decode; otherwise nothing is held and the window
    /// stays inactive. Neighbors that fail to decode are simply left out.
    pub fn enter(
        &mut self,
        store: &mut ImageStore,
        backend: &impl ImageBackend,
        index: usize,
    ) -> Result<(), WindowError> {
        let len = store.gallery_len();
        if len == 0 {
            return Err(WindowError::Empty);
        }
        let id = store
            .gallery_id(index)
            .ok_or(WindowError::OutOfRange { index, len })?;

        self.leave(store);
        acquire(store, backend, id)?;
        self.current = Some(index);

        for neighbor in window_indices(index, len) {
            self.acquire_neighbor(store, backend, neighbor);
        }
        debug!(
            "Entered full view at {} ({} resident)",
            index,
            store.full_resident_count()
        );
        Ok(())
    }

    /// Step to the previous or next image, wrapping around.
    ///
    /// Bitmaps that fall out of the window are released before any new one is
    /// decoded. Returns the new gallery index.
    pub fn navigate(
        &mut self,
        store: &mut ImageStore,
        backend: &impl ImageBackend,
        direction: Direction,
    ) -> Result<usize, WindowError> {
        let current = self.current.ok_or(WindowError::NotActive)?;
        let len = store.gallery_len();
        let next = match direction {
            Direction::Previous => wrap_prev(current, len),
            Direction::Next => wrap_next(current, len),
        };

        let keep = window_indices(next, len);
        for id in store.gallery_ids() {
            if !keep.contains(&id.index()) {
                store.get_mut(id).full = None;
            }
        }

        self.current = Some(next);
        for index in keep {
            self.acquire_neighbor(store, backend, index);
        }
        Ok(next)
    }

    /// Release every held bitmap and stop viewing.
    pub fn leave(&mut self, store: &mut ImageStore) {
        for id in store.gallery_ids() {
            store.get_mut(id).full = None;
        }
        if let Some(index) = self.current.take() {
            debug!("Left full view at {index}");
        }
    }

    fn acquire_neighbor(
        &self,
        store: &mut ImageStore,
        backend: &impl ImageBackend,
        index: usize,
    ) {
        let Some(id) = store.gallery_id(index) else {
            return;
        };
        if let Err(e) = acquire(store, backend, id) {
            warn!("Full resolution load failed: {e}");
        }
    }
}

fn acquire(
    store: &mut ImageStore,
    backend: &impl ImageBackend,
    id: EntryId,
) -> Result<(), BackendError> {
    let entry = store.get(id);
    if entry.is_full_loaded() {
        return Ok(());
    }
    let Some(path) = entry.path() else {
        return Ok(());
    };
    let bitmap = backend.decode(path)?;
    store.get_mut(id).full = Some(bitmap);
    Ok(())
}
