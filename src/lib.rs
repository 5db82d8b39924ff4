//! # Page Assembler
//!
//! Browse a folder of images, pick and order a selection, and export it as a
//! multi-page PDF sized to a physical canvas with margins.
//!
//! # Architecture: Session + Intents
//!
//! All state for one open folder lives in a [`session::Session`]. A front end
//! (the bundled CLI, or an interactive viewer) reads the session to render and
//! sends user actions back as [`session::Intent`]s:
//!
//! ```text
//! read_dir ─▶ ImageStore ─▶ ThumbnailCache (one per tick) ─▶ gallery tiles
//!                 │
//!                 ├──▶ FullResolutionWindow (current ± 1) ─▶ canvas preview
//!                 │
//!                 └──▶ selection ranks 1..K ─▶ page layout ─▶ DocumentWriter ─▶ PDF
//! ```
//!
//! The session is single-threaded and tick-driven. Every decode, resize, and
//! write happens synchronously inside the call that asked for it.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`store`] | Folder scan and the entry arena addressed by `EntryId` |
//! | [`selection`] | Ordered multi-selection with dense ranks, reordering, blank pages |
//! | [`thumbnails`] | Rate-limited thumbnail loading backed by a hidden on-disk cache |
//! | [`fullres`] | Sliding window of at most three full-resolution bitmaps |
//! | [`settings`] | Per-folder settings file: canvas and ordered selection |
//! | [`layout`] | Canvas dimensions and aspect-fit page placement in PDF points |
//! | [`preview`] | Crop-fill preview geometry for the full view |
//! | [`export`] | Export driver plus the `DocumentWriter` trait and `PdfWriter` |
//! | [`imaging`] | `ImageBackend` trait, `image`-crate backend, pure geometry |
//! | [`dialogs`] | Folder and save dialog seam |
//! | [`session`] | View state machine (Gallery, FullView, Reorder) and intents |
//! | [`config`] | `config.toml` loading and validation |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Arena + Handles
//!
//! Entries live in one `Vec` owned by the store and are addressed by `EntryId`.
//! Blank pages are appended at the end of the arena, after every scanned file,
//! so gallery index `i` and `EntryId(i)` always agree and no handle is ever
//! invalidated.
//!
//! ## Ranks, Not Lists
//!
//! Selection order is stored on each entry as `Option<u32>` rather than as a
//! separate list. Deselecting shifts every higher rank down by one, so the
//! ranks are always exactly `1..=K`. The sorted view is rebuilt on demand.
//!
//! ## Two Fitting Policies
//!
//! Export places the whole image inside the margins (aspect-fit, may
//! letterbox). The on-screen preview fills the margins completely (crop-fill).
//! Both live in [`imaging::calculations`] and are never mixed.
//!
//! ## Collaborators Behind Traits
//!
//! Pixels ([`imaging::ImageBackend`]), documents ([`export::DocumentWriter`]),
//! and dialogs ([`dialogs::Dialogs`]) are traits, so the whole session runs
//! under test against recording mocks without codecs or files.

pub mod config;
pub mod dialogs;
pub mod export;
pub mod fullres;
pub mod imaging;
pub mod layout;
pub mod output;
pub mod preview;
pub mod selection;
pub mod session;
pub mod settings;
pub mod store;
pub mod thumbnails;

#[cfg(test)]
pub(crate) mod test_helpers;
