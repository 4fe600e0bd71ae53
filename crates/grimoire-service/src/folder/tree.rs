//! Folder tree building and path resolution.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use grimoire_core::{AppResult, FolderId};
use grimoire_database::{FolderRepository, SpellRepository};
use grimoire_entity::{Folder, FolderNode};

use crate::folder::snapshot::FolderSnapshot;
use crate::validation::split_path;

/// Builds folder trees and resolves paths.
#[derive(Debug, Clone)]
pub struct TreeService {
    /// Folder repository.
    folder_repo: Arc<dyn FolderRepository>,
    /// Spell repository.
    spell_repo: Arc<dyn SpellRepository>,
}

impl TreeService {
    /// Creates a new tree service.
    pub fn new(
        folder_repo: Arc<dyn FolderRepository>,
        spell_repo: Arc<dyn SpellRepository>,
    ) -> Self {
        Self {
            folder_repo,
            spell_repo,
        }
    }

    /// Builds the folder tree rooted at `folder_id`.
    pub async fn get_tree(&self, folder_id: FolderId) -> AppResult<FolderNode> {
        let snapshot = FolderSnapshot::load(self.folder_repo.as_ref()).await?;
        let root = snapshot.require(folder_id)?;

        let mut ids = vec![folder_id];
        ids.extend(snapshot.descendants(folder_id));
        let spell_counts = self.spell_repo.count_by_folders(&ids).await?;

        debug!(folder_id = %folder_id, folders = ids.len(), "Folder tree built");
        Ok(Self::build_tree(&snapshot, root, &spell_counts))
    }

    fn build_tree(
        snapshot: &FolderSnapshot,
        folder: &Folder,
        spell_counts: &HashMap<FolderId, u64>,
    ) -> FolderNode {
        let children: Vec<FolderNode> = snapshot
            .children(folder.id)
            .map(|child| Self::build_tree(snapshot, child, spell_counts))
            .collect();

        FolderNode {
            id: folder.id,
            name: folder.name.clone(),
            child_count: children.len() as u64,
            spell_count: spell_counts.get(&folder.id).copied().unwrap_or(0),
            children,
        }
    }

    /// Resolves a slash-separated path below the root to a folder.
    pub async fn resolve_path(&self, path: &str) -> AppResult<Option<Folder>> {
        let segments = split_path(path);
        self.folder_repo.find_by_path(&segments).await
    }

    /// Gets the breadcrumb trail from the root down to the given folder.
    pub async fn get_breadcrumbs(&self, folder_id: FolderId) -> AppResult<Vec<Folder>> {
        let snapshot = FolderSnapshot::load(self.folder_repo.as_ref()).await?;
        Ok(snapshot
            .path_to(folder_id)?
            .into_iter()
            .cloned()
            .collect())
    }

    /// Display path of a folder, e.g. `/Elementalism/Fire`. The root is `/`.
    pub async fn path_of(&self, folder_id: FolderId) -> AppResult<String> {
        let crumbs = self.get_breadcrumbs(folder_id).await?;
        let names: Vec<&str> = crumbs
            .iter()
            .filter(|f| !f.is_root())
            .map(|f| f.name.as_str())
            .collect();
        Ok(format!("/{}", names.join("/")))
    }
}
