//! Folder CRUD with hierarchy invariants.
//!
//! Guarantees maintained here: the root is never renamed, moved, or
//! deleted; sibling names are unique; the parent graph stays acyclic.

use std::sync::Arc;

use tracing::{debug, info, warn};

use grimoire_core::{AppError, AppResult, FolderId};
use grimoire_database::{FolderRepository, SpellRepository};
use grimoire_entity::{DeletionOutcome, DeletionStrategy, Folder, FolderContents};

use crate::folder::snapshot::FolderSnapshot;
use crate::validation::validate_folder_name;

/// Manages folder creation, renaming, moving, and deletion.
#[derive(Debug, Clone)]
pub struct FolderService {
    /// Folder repository.
    folder_repo: Arc<dyn FolderRepository>,
    /// Spell repository.
    spell_repo: Arc<dyn SpellRepository>,
}

impl FolderService {
    /// Creates a new folder service.
    pub fn new(
        folder_repo: Arc<dyn FolderRepository>,
        spell_repo: Arc<dyn SpellRepository>,
    ) -> Self {
        Self {
            folder_repo,
            spell_repo,
        }
    }

    /// Gets a folder by ID.
    pub async fn get_folder(&self, folder_id: FolderId) -> AppResult<Folder> {
        self.folder_repo
            .find_by_id(folder_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Folder {folder_id} not found")))
    }

    /// Lists direct subfolders, ordered by name.
    pub async fn list_children(&self, folder_id: FolderId) -> AppResult<Vec<Folder>> {
        if !self.folder_repo.exists(folder_id).await? {
            return Err(AppError::not_found(format!("Folder {folder_id} not found")));
        }
        Ok(self.folder_repo.get_contents(folder_id).await?.subfolders)
    }

    /// Creates a folder and returns its ID. `None` places it under the root.
    pub async fn create_folder(
        &self,
        name: &str,
        parent_id: Option<FolderId>,
    ) -> AppResult<FolderId> {
        let name = validate_folder_name(name)?;
        let parent_id = parent_id.unwrap_or(FolderId::ROOT);

        if !parent_id.is_root() && !self.folder_repo.exists(parent_id).await? {
            return Err(AppError::not_found(format!(
                "Parent folder {parent_id} not found"
            )));
        }

        if self.folder_repo.find_child(parent_id, name).await?.is_some() {
            return Err(AppError::conflict(format!(
                "A folder named '{name}' already exists in folder {parent_id}"
            )));
        }

        let folder_id = self.folder_repo.create(name, parent_id).await?;

        info!(
            folder_id = %folder_id,
            parent_id = %parent_id,
            name = %name,
            "Folder created"
        );

        Ok(folder_id)
    }

    /// Renames a folder. Renaming to the current name is a no-op.
    pub async fn rename_folder(&self, folder_id: FolderId, new_name: &str) -> AppResult<Folder> {
        if folder_id.is_root() {
            warn!(folder_id = %folder_id, "Rejected rename of root folder");
            return Err(AppError::validation("The root folder cannot be renamed"));
        }

        let new_name = validate_folder_name(new_name)?;
        let folder = self.get_folder(folder_id).await?;

        if folder.name == new_name {
            debug!(folder_id = %folder_id, "Rename to current name skipped");
            return Ok(folder);
        }

        let parent_id = folder
            .parent_id
            .ok_or_else(|| AppError::validation("The root folder cannot be renamed"))?;

        let sibling = self.folder_repo.find_child(parent_id, new_name).await?;
        if sibling.is_some_and(|f| f.id != folder_id) {
            return Err(AppError::conflict(format!(
                "A folder named '{new_name}' already exists in folder {parent_id}"
            )));
        }

        let renamed = self.folder_repo.rename(folder_id, new_name).await?;

        info!(
            folder_id = %folder_id,
            old_name = %folder.name,
            new_name = %new_name,
            "Folder renamed"
        );

        Ok(renamed)
    }

    /// Moves a folder under a new parent.
    pub async fn move_folder(
        &self,
        folder_id: FolderId,
        new_parent_id: FolderId,
    ) -> AppResult<Folder> {
        if folder_id.is_root() {
            warn!(folder_id = %folder_id, "Rejected move of root folder");
            return Err(AppError::validation("The root folder cannot be moved"));
        }

        let snapshot = FolderSnapshot::load(self.folder_repo.as_ref()).await?;
        let folder = snapshot.require(folder_id)?.clone();

        if !new_parent_id.is_root() && snapshot.get(new_parent_id).is_none() {
            return Err(AppError::not_found(format!(
                "Target folder {new_parent_id} not found"
            )));
        }

        if new_parent_id == folder_id {
            warn!(folder_id = %folder_id, "Rejected move into itself");
            return Err(AppError::validation("Cannot move a folder into itself"));
        }

        if snapshot.is_self_or_ancestor(folder_id, new_parent_id)? {
            warn!(
                folder_id = %folder_id,
                new_parent = %new_parent_id,
                "Rejected move into descendant"
            );
            return Err(AppError::validation(
                "Cannot move a folder into one of its descendants",
            ));
        }

        if folder.parent_id == Some(new_parent_id) {
            debug!(folder_id = %folder_id, "Move to current parent skipped");
            return Ok(folder);
        }

        if snapshot
            .sibling_named(new_parent_id, &folder.name, Some(folder_id))
            .is_some()
        {
            return Err(AppError::conflict(format!(
                "A folder named '{}' already exists in folder {new_parent_id}",
                folder.name
            )));
        }

        let moved = self
            .folder_repo
            .move_folder(folder_id, new_parent_id)
            .await?;

        info!(
            folder_id = %folder_id,
            old_parent = ?folder.parent_id,
            new_parent = %new_parent_id,
            "Folder moved"
        );

        Ok(moved)
    }

    /// Deletes a folder using the given strategy.
    pub async fn delete_folder(
        &self,
        folder_id: FolderId,
        strategy: DeletionStrategy,
    ) -> AppResult<DeletionOutcome> {
        if folder_id.is_root() {
            warn!(folder_id = %folder_id, %strategy, "Rejected deletion of root folder");
            return Err(AppError::validation("The root folder cannot be deleted"));
        }

        let snapshot = FolderSnapshot::load(self.folder_repo.as_ref()).await?;
        let folder = snapshot.require(folder_id)?.clone();

        let outcome = match strategy {
            DeletionStrategy::EmptyOnly => self.delete_empty(&folder).await?,
            DeletionStrategy::MoveToParent => self.delete_into_parent(&snapshot, &folder).await?,
            DeletionStrategy::Recursive => self.delete_subtree(&snapshot, &folder).await?,
        };

        info!(
            folder_id = %folder_id,
            name = %folder.name,
            %strategy,
            folders_removed = outcome.folders_removed,
            spells_removed = outcome.spells_removed,
            folders_reparented = outcome.folders_reparented,
            spells_reparented = outcome.spells_reparented,
            "Folder deleted"
        );

        Ok(outcome)
    }

    async fn delete_empty(&self, folder: &Folder) -> AppResult<DeletionOutcome> {
        if !self.folder_repo.is_empty(folder.id).await? {
            let has_spells = self.folder_repo.has_spells(folder.id).await?;
            let has_subfolders = self.folder_repo.has_subfolders(folder.id).await?;
            let what = match (has_spells, has_subfolders) {
                (true, true) => "spells and subfolders",
                (true, false) => "spells",
                _ => "subfolders",
            };
            return Err(AppError::validation(format!(
                "Folder '{}' still contains {what}",
                folder.name
            )));
        }

        if !self.folder_repo.delete(folder.id).await? {
            return Err(AppError::not_found(format!("Folder {} not found", folder.id)));
        }

        Ok(DeletionOutcome {
            folder_id: folder.id,
            strategy: DeletionStrategy::EmptyOnly,
            folders_removed: 1,
            spells_removed: 0,
            folders_reparented: 0,
            spells_reparented: 0,
        })
    }

    async fn delete_into_parent(
        &self,
        snapshot: &FolderSnapshot,
        folder: &Folder,
    ) -> AppResult<DeletionOutcome> {
        let parent_id = folder
            .parent_id
            .ok_or_else(|| AppError::validation("The root folder cannot be deleted"))?;

        let children: Vec<&Folder> = snapshot.children(folder.id).collect();
        let clash = children.iter().find(|child| {
            snapshot
                .sibling_named(parent_id, &child.name, Some(folder.id))
                .is_some()
        });
        if let Some(clash) = clash {
            return Err(AppError::conflict(format!(
                "Cannot move '{}' into folder {parent_id}: a folder with that name already exists",
                clash.name
            )));
        }

        let spells = self
            .spell_repo
            .count_by_folders(&[folder.id])
            .await?
            .get(&folder.id)
            .copied()
            .unwrap_or(0);

        self.folder_repo.move_contents_to_parent(folder.id).await?;

        Ok(DeletionOutcome {
            folder_id: folder.id,
            strategy: DeletionStrategy::MoveToParent,
            folders_removed: 1,
            spells_removed: 0,
            folders_reparented: children.len() as u64,
            spells_reparented: spells,
        })
    }

    async fn delete_subtree(
        &self,
        snapshot: &FolderSnapshot,
        folder: &Folder,
    ) -> AppResult<DeletionOutcome> {
        let mut subtree = vec![folder.id];
        subtree.extend(snapshot.descendants(folder.id));

        let spells: u64 = self
            .spell_repo
            .count_by_folders(&subtree)
            .await?
            .values()
            .sum();

        let folders_removed = self.folder_repo.delete_recursive(folder.id).await?;

        Ok(DeletionOutcome {
            folder_id: folder.id,
            strategy: DeletionStrategy::Recursive,
            folders_removed,
            spells_removed: spells,
            folders_reparented: 0,
            spells_reparented: 0,
        })
    }

    /// Returns direct and recursive content counts for a folder.
    pub async fn get_folder_contents(&self, folder_id: FolderId) -> AppResult<FolderContents> {
        let snapshot = FolderSnapshot::load(self.folder_repo.as_ref()).await?;
        let folder = snapshot.require(folder_id)?.clone();

        let listing = self.folder_repo.get_contents(folder_id).await?;
        let descendants = snapshot.descendants(folder_id);

        let mut subtree = Vec::with_capacity(descendants.len() + 1);
        subtree.push(folder_id);
        subtree.extend(descendants.iter().copied());
        let total_spell_count: u64 = self
            .spell_repo
            .count_by_folders(&subtree)
            .await?
            .values()
            .sum();

        debug!(
            folder_id = %folder_id,
            spells = listing.spells.len(),
            subfolders = listing.subfolders.len(),
            total_spells = total_spell_count,
            "Folder contents read"
        );

        Ok(FolderContents {
            folder,
            spell_count: listing.spells.len() as u64,
            subfolder_count: listing.subfolders.len() as u64,
            subfolders: listing.subfolders,
            total_spell_count,
            total_subfolder_count: descendants.len() as u64,
        })
    }

    /// Refiles every spell from one folder into another. Returns the count.
    pub async fn move_spells(&self, from: FolderId, to: FolderId) -> AppResult<u64> {
        for id in [from, to] {
            if !self.folder_repo.exists(id).await? {
                return Err(AppError::not_found(format!("Folder {id} not found")));
            }
        }
        if from == to {
            return Ok(0);
        }

        let moved = self.spell_repo.move_spells_to_folder(from, to).await?;

        info!(from = %from, to = %to, moved, "Spells refiled");
        Ok(moved)
    }
}
