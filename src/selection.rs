//! Ordered multi-selection.
//!
//! Selected entries carry a rank that defines the export and reorder sequence.
//! Between any two operations the ranks of the selected entries are exactly
//! `1..=K` where `K` is the number of selected entries.
//!
//! | Operation | Effect on ranks |
//! |---|---|
//! | [`toggle_select`](ImageStore::toggle_select) on | new entry gets `max + 1` |
//! | [`toggle_select`](ImageStore::toggle_select) off | ranks above the removed one shift down by one |
//! | [`swap_adjacent`](ImageStore::swap_adjacent) | two neighboring ranks trade places |
//! | [`append_blank_page`](ImageStore::append_blank_page) | new blank entry gets `max + 1` |
//! | [`remove_at`](ImageStore::remove_at) | same as toggling the entry off |

use crate::store::{EntryId, ImageEntry, ImageStore};
use log::debug;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SelectionError {
    #[error("Entry {0} is not selected")]
    NotSelected(usize),
    #[error("Entries {0} and {1} are not adjacent in the selection")]
    NotAdjacent(usize, usize),
    #[error("Position {position} is out of range for a selection of {len}")]
    PositionOutOfRange { position: usize, len: usize },
}

/// Direction for moving an item within the sorted selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Move {
    Up,
    Down,
}

impl ImageStore {
    /// Number of selected entries.
    pub fn selected_count(&self) -> usize {
        self.ids().filter(|id| self.get(*id).is_selected()).count()
    }

    /// Highest rank in use, 0 when nothing is selected.
    pub fn max_order(&self) -> u32 {
        self.ids()
            .filter_map(|id| self.get(id).selection_order())
            .max()
            .unwrap_or(0)
    }

    /// Flip the selection state of `id`, keeping ranks dense.
    ///
    /// Returns the new selection state.
    pub fn toggle_select(&mut self, id: EntryId) -> bool {
        match self.get(id).selection_order() {
            Some(removed) => {
                self.get_mut(id).selection_order = None;
                for entry in self.entries_mut() {
                    if let Some(rank) = entry.selection_order.as_mut()
                        && *rank > removed
                    {
                        *rank -= 1;
                    }
                }
                debug!("Deselected entry {} (rank {})", id.index(), removed);
                false
            }
            None => {
                let rank = self.max_order() + 1;
                self.get_mut(id).selection_order = Some(rank);
                debug!("Selected entry {} (rank {})", id.index(), rank);
                true
            }
        }
    }

    /// Exchange the ranks of two selected entries whose ranks differ by one.
    pub fn swap_adjacent(&mut self, a: EntryId, b: EntryId) -> Result<(), SelectionError> {
        let rank_a = self
            .get(a)
            .selection_order()
            .ok_or(SelectionError::NotSelected(a.index()))?;
        let rank_b = self
            .get(b)
            .selection_order()
            .ok_or(SelectionError::NotSelected(b.index()))?;

        if rank_a.abs_diff(rank_b) != 1 {
            return Err(SelectionError::NotAdjacent(a.index(), b.index()));
        }

        self.get_mut(a).selection_order = Some(rank_b);
        self.get_mut(b).selection_order = Some(rank_a);
        Ok(())
    }

    /// Entry at `position` (0-based) of the sorted selection.
    pub fn selected_at(&self, position: usize) -> Result<EntryId, SelectionError> {
        let sorted = self.sorted_selection();
        sorted
            .get(position)
            .copied()
            .ok_or(SelectionError::PositionOutOfRange {
                position,
                len: sorted.len(),
            })
    }

    /// Move the item at `position` (0-based, in sorted order) one step.
    ///
    /// Moving the first item up or the last item down is a no-op. Returns
    /// whether anything moved.
    pub fn move_selected(
        &mut self,
        position: usize,
        direction: Move,
    ) -> Result<bool, SelectionError> {
        let current = self.selected_at(position)?;
        let neighbor = match direction {
            Move::Up => position.checked_sub(1),
            Move::Down => Some(position + 1),
        };

        match neighbor.and_then(|n| self.selected_at(n).ok()) {
            Some(other) => self.swap_adjacent(current, other).map(|()| true),
            None => Ok(false),
        }
    }

    pub fn move_up(&mut self, position: usize) -> Result<bool, SelectionError> {
        self.move_selected(position, Move::Up)
    }

    pub fn move_down(&mut self, position: usize) -> Result<bool, SelectionError> {
        self.move_selected(position, Move::Down)
    }

    /// Deselect the item at `position` of the sorted selection.
    ///
    /// This is the only way to drop a blank page, which never appears in the
    /// gallery. A removed blank stays in the arena unselected and is not
    /// persisted.
    pub fn remove_at(&mut self, position: usize) -> Result<EntryId, SelectionError> {
        let id = self.selected_at(position)?;
        self.toggle_select(id);
        Ok(id)
    }

    /// Selected entries sorted by rank ascending.
    ///
    /// This is the canonical order for the reorder screen, export, and the
    /// settings file.
    pub fn sorted_selection(&self) -> Vec<EntryId> {
        let mut selected: Vec<(u32, EntryId)> = self
            .ids()
            .filter_map(|id| self.get(id).selection_order().map(|rank| (rank, id)))
            .collect();
        selected.sort_unstable();
        selected.into_iter().map(|(_, id)| id).collect()
    }

    /// Append a selected blank page at the end of the selection.
    pub fn append_blank_page(&mut self) -> EntryId {
        let rank = self.max_order() + 1;
        let mut blank = ImageEntry::blank_page();
        blank.selection_order = Some(rank);
        let id = self.push(blank);
        debug!("Appended blank page {} (rank {})", id.index(), rank);
        id
    }

    /// Restore a saved selection: each name gets the next rank in sequence.
    ///
    /// Names that do not match a scanned file, and names already selected, are
    /// skipped without consuming a rank. Blank pages are recreated.
    pub(crate) fn restore_selection<'a>(&mut self, names: impl IntoIterator<Item = &'a SavedItem>) {
        for item in names {
            match item {
                SavedItem::BlankPage => {
                    self.append_blank_page();
                }
                SavedItem::File(name) => match self.find_by_file_name(name) {
                    Some(id) if !self.get(id).is_selected() => {
                        let rank = self.max_order() + 1;
                        self.get_mut(id).selection_order = Some(rank);
                    }
                    Some(_) => debug!("Skipping duplicate saved selection entry {name}"),
                    None => debug!("Saved selection entry {name} not found in folder"),
                },
            }
        }
    }
}

/// One line of a persisted selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SavedItem {
    File(String),
    BlankPage,
}
