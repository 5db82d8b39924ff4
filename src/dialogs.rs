//! Native dialog seam.
//!
//! The session never opens a window itself. Front ends implement [`Dialogs`]
//! with whatever toolkit they use and turn the answer into an intent; a
//! cancelled dialog is `None` and the resulting intent is a no-op.
//!
//! [`PresetDialogs`] answers from values fixed up front and is what the command
//! line uses, where the "dialog" answer comes from arguments.

use std::path::PathBuf;

/// File-type filter for a save dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileFilter {
    pub description: String,
    pub patterns: Vec<String>,
}

impl FileFilter {
    pub fn pdf() -> Self {
        Self {
            description: "PDF Files".to_string(),
            patterns: vec!["*.pdf".to_string()],
        }
    }
}

pub trait Dialogs {
    /// Ask for a folder. `None` when cancelled.
    fn select_folder(&self, title: &str) -> Option<PathBuf>;

    /// Ask for a save location. `None` when cancelled.
    fn save_file(&self, default_name: &str, filter: &FileFilter) -> Option<PathBuf>;
}

/// Dialogs that return fixed answers.
#[derive(Debug, Clone, Default)]
pub struct PresetDialogs {
    pub folder: Option<PathBuf>,
    pub save: Option<PathBuf>,
}

impl PresetDialogs {
    /// Answer every save dialog with `path`.
    pub fn saving_to(path: impl Into<PathBuf>) -> Self {
        Self {
            folder: None,
            save: Some(path.into()),
        }
    }
}

impl Dialogs for PresetDialogs {
    fn select_folder(&self, _title: &str) -> Option<PathBuf> {
        self.folder.clone()
    }

    fn save_file(&self, _default_name: &str, _filter: &FileFilter) -> Option<PathBuf> {
        self.save.clone()
    }
}
