//! Session context and the three-mode view state machine.
//!
//! A [`Session`] owns everything for one open folder: the entry store, the
//! thumbnail cache, the full-resolution window, the canvas, and the two I/O
//! collaborators (image backend and document writer). Front ends read its
//! accessors to render and feed user actions back in as [`Intent`]s.
//!
//! ```text
//!                ClickTile (plain)
//!    ┌─────────┐ ───────────────▶ ┌──────────┐
//!    │ Gallery │                  │ FullView │ Navigate / ToggleCurrent / SetCanvas
//!    └─────────┘ ◀─────────────── └──────────┘
//!      │    ▲          Back
//!      │    │ Back
//!      ▼    │
//!    ┌─────────┐
//!    │ Reorder │ MoveUp / MoveDown / Remove / AddBlankPage / Generate
//!    └─────────┘
//! ```
//!
//! Resource rules per state:
//!
//! | State | Thumbnails | Full-resolution window |
//! |---|---|---|
//! | Gallery | loaded by [`Session::tick`] | empty |
//! | FullView | kept, not advanced | current ± 1 |
//! | Reorder | kept, not advanced | empty |
//!
//! An intent that does not apply to the current state is rejected with
//! [`SessionError::InvalidIntent`] and changes nothing.

use crate::config::AppConfig;
use crate::dialogs::{Dialogs, FileFilter};
use crate::export::{DEFAULT_EXPORT_NAME, DocumentWriter, ExportError, ExportSummary, PageLayout};
use crate::fullres::{Direction, FullResolutionWindow, WindowError};
use crate::imaging::{ImageBackend, Rect};
use crate::layout::CanvasSpec;
use crate::preview::{PreviewFrame, compute_preview};
use crate::selection::SelectionError;
use crate::settings::{self, SettingsError};
use crate::store::{EntryId, ImageStore};
use crate::thumbnails::{CacheStats, ThumbnailCache};
use log::{info, warn};
use serde::Serialize;
use std::ops::Range;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Folder is not available: {0}")]
    FolderUnavailable(PathBuf),
    #[error("{intent} is not allowed in {state}")]
    InvalidIntent {
        intent: &'static str,
        state: &'static str,
    },
    #[error("Tile {index} is out of range for a gallery of {len}")]
    TileOutOfRange { index: usize, len: usize },
    #[error("Select at least one image first")]
    NothingSelected,
    #[error("Canvas values must be non-negative numbers")]
    InvalidCanvas,
    #[error(transparent)]
    Window(#[from] WindowError),
    #[error(transparent)]
    Selection(#[from] SelectionError),
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error(transparent)]
    Export(#[from] ExportError),
}

/// Which screen is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ViewState {
    Gallery,
    FullView {
        index: usize,
        prev: usize,
        next: usize,
    },
    Reorder,
}

impl ViewState {
    pub fn name(&self) -> &'static str {
        match self {
            ViewState::Gallery => "Gallery",
            ViewState::FullView { .. } => "FullView",
            ViewState::Reorder => "Reorder",
        }
    }
}

/// A user action, already resolved to plain data.
#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    /// Gallery tile click. With the modifier held it toggles selection.
    ClickTile { index: usize, modifier: bool },
    OpenReorder,
    /// Result of a folder dialog; `None` when cancelled.
    ChangeFolder(Option<PathBuf>),
    Navigate(Direction),
    ToggleCurrent,
    SetCanvas(CanvasSpec),
    MoveUp(usize),
    MoveDown(usize),
    /// Drop the item at a position of the sorted selection, blank pages included.
    Remove(usize),
    AddBlankPage,
    /// Result of a save dialog; `None` when cancelled.
    Generate(Option<PathBuf>),
    Back,
}

impl Intent {
    pub fn name(&self) -> &'static str {
        match self {
            Intent::ClickTile { .. } => "ClickTile",
            Intent::OpenReorder => "OpenReorder",
            Intent::ChangeFolder(_) => "ChangeFolder",
            Intent::Navigate(_) => "Navigate",
            Intent::ToggleCurrent => "ToggleCurrent",
            Intent::SetCanvas(_) => "SetCanvas",
            Intent::MoveUp(_) => "MoveUp",
            Intent::MoveDown(_) => "MoveDown",
            Intent::Remove(_) => "Remove",
            Intent::AddBlankPage => "AddBlankPage",
            Intent::Generate(_) => "Generate",
            Intent::Back => "Back",
        }
    }

    /// Ask for an output file and wrap the answer in [`Intent::Generate`].
    pub fn choose_export(dialogs: &impl Dialogs) -> Self {
        Intent::Generate(dialogs.save_file(DEFAULT_EXPORT_NAME, &FileFilter::pdf()))
    }
}

/// What applying an intent did.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Done,
    /// A dialog was cancelled; nothing changed.
    Cancelled,
    Exported(ExportSummary),
}

/// Snapshot of one entry for rendering a tile or a reorder row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tile {
    #[serde(skip)]
    pub id: EntryId,
    pub name: String,
    pub blank: bool,
    pub selection_order: Option<u32>,
    pub thumbnail_loaded: bool,
    /// Thumbnail size when one is available.
    pub thumbnail_size: Option<(u32, u32)>,
}

/// Everything belonging to one open folder.
pub struct Session<B: ImageBackend, W: DocumentWriter> {
    config: AppConfig,
    store: ImageStore,
    canvas: CanvasSpec,
    thumbnails: ThumbnailCache,
    window: FullResolutionWindow,
    view: ViewState,
    backend: B,
    writer: W,
}

impl<B: ImageBackend, W: DocumentWriter> Session<B, W> {
    /// Open `folder`, restoring its saved canvas and selection.
    pub fn open(
        folder: &Path,
        config: AppConfig,
        backend: B,
        writer: W,
    ) -> Result<Self, SessionError> {
        if !folder.is_dir() {
            return Err(SessionError::FolderUnavailable(folder.to_path_buf()));
        }

        let thumbnails = ThumbnailCache::new(&config.thumbnails);
        let mut session = Self {
            store: ImageStore::empty(folder),
            canvas: config.canvas,
            thumbnails,
            window: FullResolutionWindow::new(),
            view: ViewState::Gallery,
            config,
            backend,
            writer,
        };
        session.load_folder(folder);
        Ok(session)
    }

    fn load_folder(&mut self, folder: &Path) {
        self.store = ImageStore::scan(folder);
        let saved = settings::load_settings(&self.settings_path(), &self.config.canvas);
        self.canvas = settings::apply_settings(&saved, &mut self.store);
        info!(
            "Opened {} ({} images, {} selected)",
            folder.display(),
            self.store.gallery_len(),
            self.store.selected_count()
        );
    }

    pub fn view(&self) -> ViewState {
        self.view
    }

    pub fn store(&self) -> &ImageStore {
        &self.store
    }

    pub fn canvas(&self) -> &CanvasSpec {
        &self.canvas
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn folder(&self) -> &Path {
        self.store.folder()
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn writer(&self) -> &W {
        &self.writer
    }

    pub fn thumbnail_stats(&self) -> CacheStats {
        self.thumbnails.stats()
    }

    /// Number of full-resolution bitmaps currently held.
    pub fn full_resident(&self) -> usize {
        self.window.resident(&self.store)
    }

    pub fn settings_path(&self) -> PathBuf {
        self.store.folder().join(&self.config.settings.file_name)
    }

    fn tile(&self, id: EntryId) -> Tile {
        let entry = self.store.get(id);
        Tile {
            id,
            name: entry.display_name(),
            blank: entry.is_blank(),
            selection_order: entry.selection_order(),
            thumbnail_loaded: entry.is_thumbnail_loaded(),
            thumbnail_size: entry.thumbnail().map(|t| t.dimensions()),
        }
    }

    /// Gallery tiles in gallery order.
    pub fn tiles(&self) -> Vec<Tile> {
        self.store.gallery_ids().map(|id| self.tile(id)).collect()
    }

    /// Selected entries in rank order, blank pages included.
    pub fn selection_tiles(&self) -> Vec<Tile> {
        self.store
            .sorted_selection()
            .into_iter()
            .map(|id| self.tile(id))
            .collect()
    }

    /// Preview geometry for the full view inside the `content` screen area.
    pub fn preview(&self, content: Rect) -> Option<PreviewFrame> {
        let ViewState::FullView { index, .. } = self.view else {
            return None;
        };
        let image_size = self
            .store
            .gallery_id(index)
            .and_then(|id| self.store.get(id).full())
            .map(|b| b.dimensions());
        Some(compute_preview(
            &self.canvas,
            self.config.preview.dpi,
            content,
            self.config.preview.padding,
            image_size,
        ))
    }

    /// Page plans for the current selection without writing anything.
    pub fn layout(&self) -> Vec<PageLayout> {
        crate::export::plan_selection(&self.store, &self.canvas, &self.backend)
    }

    /// Advance thumbnail loading by one entry. Only runs in the gallery.
    pub fn tick(&mut self, visible: Range<usize>) -> Option<EntryId> {
        if self.view != ViewState::Gallery {
            return None;
        }
        self.thumbnails.tick(&mut self.store, &self.backend, visible)
    }

    /// Load every missing gallery thumbnail. Returns how many were processed.
    pub fn load_all_thumbnails(&mut self) -> usize {
        self.thumbnails.load_all(&mut self.store, &self.backend)
    }

    /// Apply one user intent.
    pub fn apply(&mut self, intent: Intent) -> Result<Outcome, SessionError> {
        match (self.view, intent) {
            (ViewState::Gallery, Intent::ClickTile { index, modifier }) => {
                let id = self.gallery_id(index)?;
                if modifier {
                    self.store.toggle_select(id);
                } else {
                    self.enter_full_view(index)?;
                }
                Ok(Outcome::Done)
            }
            (ViewState::Gallery, Intent::OpenReorder) => {
                if self.store.selected_count() == 0 {
                    return Err(SessionError::NothingSelected);
                }
                self.view = ViewState::Reorder;
                Ok(Outcome::Done)
            }
            (ViewState::Gallery, Intent::ChangeFolder(None))
            | (ViewState::Reorder, Intent::Generate(None)) => Ok(Outcome::Cancelled),
            (ViewState::Gallery, Intent::ChangeFolder(Some(folder))) => {
                self.change_folder(&folder)?;
                Ok(Outcome::Done)
            }

            (ViewState::FullView { .. }, Intent::Navigate(direction)) => {
                let index = self
                    .window
                    .navigate(&mut self.store, &self.backend, direction)?;
                self.view = self.full_view_state(index);
                Ok(Outcome::Done)
            }
            (ViewState::FullView { index, .. }, Intent::ToggleCurrent) => {
                let id = self.gallery_id(index)?;
                self.store.toggle_select(id);
                Ok(Outcome::Done)
            }
            (ViewState::FullView { .. }, Intent::SetCanvas(canvas)) => {
                if !canvas.is_valid() {
                    return Err(SessionError::InvalidCanvas);
                }
                self.canvas = canvas;
                Ok(Outcome::Done)
            }
            (ViewState::FullView { .. }, Intent::Back) => {
                self.window.leave(&mut self.store);
                self.view = ViewState::Gallery;
                self.persist_quietly();
                Ok(Outcome::Done)
            }

            (ViewState::Reorder, Intent::MoveUp(position)) => {
                self.store.move_up(position)?;
                Ok(Outcome::Done)
            }
            (ViewState::Reorder, Intent::MoveDown(position)) => {
                self.store.move_down(position)?;
                Ok(Outcome::Done)
            }
            (ViewState::Reorder, Intent::Remove(position)) => {
                self.store.remove_at(position)?;
                Ok(Outcome::Done)
            }
            (ViewState::Reorder, Intent::AddBlankPage) => {
                self.store.append_blank_page();
                Ok(Outcome::Done)
            }
            (ViewState::Reorder, Intent::Generate(Some(path))) => {
                let summary = crate::export::export_selection(
                    &self.store,
                    &self.canvas,
                    &self.backend,
                    &mut self.writer,
                    &path,
                )?;
                Ok(Outcome::Exported(summary))
            }
            (ViewState::Reorder, Intent::Back) => {
                self.view = ViewState::Gallery;
                Ok(Outcome::Done)
            }

            (state, intent) => Err(SessionError::InvalidIntent {
                intent: intent.name(),
                state: state.name(),
            }),
        }
    }

    fn gallery_id(&self, index: usize) -> Result<EntryId, SessionError> {
        self.store
            .gallery_id(index)
            .ok_or(SessionError::TileOutOfRange {
                index,
                len: self.store.gallery_len(),
            })
    }

    fn full_view_state(&self, index: usize) -> ViewState {
        let (prev, next) = self
            .window
            .neighbors(self.store.gallery_len())
            .unwrap_or((index, index));
        ViewState::FullView { index, prev, next }
    }

    fn enter_full_view(&mut self, index: usize) -> Result<(), SessionError> {
        self.window.enter(&mut self.store, &self.backend, index)?;
        self.view = self.full_view_state(index);
        Ok(())
    }

    fn change_folder(&mut self, folder: &Path) -> Result<(), SessionError> {
        if !folder.is_dir() {
            return Err(SessionError::FolderUnavailable(folder.to_path_buf()));
        }
        self.persist_quietly();
        self.window.leave(&mut self.store);
        self.store.release_all();
        self.thumbnails = ThumbnailCache::new(&self.config.thumbnails);
        self.load_folder(folder);
        Ok(())
    }

    /// Write the canvas and selection to the folder's settings file.
    pub fn save_settings(&self) -> Result<(), SessionError> {
        settings::save_settings(&self.settings_path(), &self.canvas, &self.store)?;
        Ok(())
    }

    fn persist_quietly(&self) {
        if let Err(e) = self.save_settings() {
            warn!("{e}");
        }
    }

    /// Persist settings and release every bitmap.
    pub fn close(mut self) -> Result<(), SessionError> {
        self.window.leave(&mut self.store);
        self.store.release_all();
        self.save_settings()?;
        info!("Closed {}", self.store.folder().display());
        Ok(())
    }
}
