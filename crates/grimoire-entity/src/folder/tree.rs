//! Folder tree structures for hierarchical display.

use serde::{Deserialize, Serialize};

use grimoire_core::FolderId;

/// A node in a folder tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FolderNode {
    /// Folder ID.
    pub id: FolderId,
    /// Folder name.
    pub name: String,
    /// Number of child folders.
    pub child_count: u64,
    /// Number of spells filed directly in this folder.
    pub spell_count: u64,
    /// Child folder nodes, ordered by name.
    pub children: Vec<FolderNode>,
}

impl FolderNode {
    /// Total number of folders in this subtree, including this node.
    pub fn total_folders(&self) -> u64 {
        1 + self.children.iter().map(FolderNode::total_folders).sum::<u64>()
    }

    /// Total number of spells in this subtree.
    pub fn total_spells(&self) -> u64 {
        self.spell_count + self.children.iter().map(FolderNode::total_spells).sum::<u64>()
    }
}
