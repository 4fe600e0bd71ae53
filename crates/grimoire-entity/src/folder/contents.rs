//! Folder content summaries.

use serde::{Deserialize, Serialize};

use crate::folder::model::Folder;
use crate::spell::Spell;

/// Direct members of a folder as read from storage.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FolderListing {
    /// Direct child folders, ordered by name.
    pub subfolders: Vec<Folder>,
    /// Spells filed directly in the folder, ordered by name.
    pub spells: Vec<Spell>,
}

/// Direct and recursive content counts of a folder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FolderContents {
    /// The folder being described.
    pub folder: Folder,
    /// Number of spells filed directly in the folder.
    pub spell_count: u64,
    /// Number of direct child folders.
    pub subfolder_count: u64,
    /// The direct child folders.
    pub subfolders: Vec<Folder>,
    /// Spells across the whole subtree, including the folder itself.
    pub total_spell_count: u64,
    /// Folders across the whole subtree, excluding the folder itself.
    pub total_subfolder_count: u64,
}

impl FolderContents {
    /// Returns whether the folder has no direct spells or subfolders.
    pub fn is_empty(&self) -> bool {
        self.spell_count == 0 && self.subfolder_count == 0
    }
}
