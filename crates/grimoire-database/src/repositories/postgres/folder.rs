//! Folder repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;

use grimoire_core::error::AppError;
use grimoire_core::result::AppResult;
use grimoire_core::FolderId;
use grimoire_entity::{Folder, FolderListing, Spell};

use super::{folder_write_error, read_error};
use crate::repositories::FolderRepository;

/// Repository for folder CRUD and tree queries.
#[derive(Debug, Clone)]
pub struct PgFolderRepository {
    pool: PgPool,
}

impl PgFolderRepository {
    /// Create a new folder repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FolderRepository for PgFolderRepository {
    async fn list_all(&self) -> AppResult<Vec<Folder>> {
        sqlx::query_as::<_, Folder>("SELECT * FROM folders ORDER BY id ASC")
            .fetch_all(&self.pool)
            .await
            .map_err(read_error("Failed to list folders"))
    }

    async fn find_by_id(&self, id: FolderId) -> AppResult<Option<Folder>> {
        sqlx::query_as::<_, Folder>("SELECT * FROM folders WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(read_error("Failed to find folder"))
    }

    async fn find_by_path(&self, segments: &[String]) -> AppResult<Option<Folder>> {
        let mut current = match self.find_by_id(FolderId::ROOT).await? {
            Some(root) => root,
            None => return Ok(None),
        };

        for segment in segments {
            match self.find_child(current.id, segment).await? {
                Some(folder) => current = folder,
                None => return Ok(None),
            }
        }

        Ok(Some(current))
    }

    async fn find_child(&self, parent_id: FolderId, name: &str) -> AppResult<Option<Folder>> {
        sqlx::query_as::<_, Folder>("SELECT * FROM folders WHERE parent_id = $1 AND name = $2")
            .bind(parent_id)
            .bind(name)
            .fetch_optional(&self.pool)
            .await
            .map_err(read_error("Failed to find child folder"))
    }

    async fn create(&self, name: &str, parent_id: FolderId) -> AppResult<FolderId> {
        sqlx::query_scalar::<_, FolderId>(
            "INSERT INTO folders (name, parent_id) VALUES ($1, $2) RETURNING id",
        )
        .bind(name)
        .bind(parent_id)
        .fetch_one(&self.pool)
        .await
        .map_err(folder_write_error("Failed to create folder"))
    }

    async fn delete(&self, id: FolderId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM folders WHERE id = $1 AND parent_id IS NOT NULL")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(folder_write_error("Failed to delete folder"))?;
        Ok(result.rows_affected() > 0)
    }

    async fn rename(&self, id: FolderId, name: &str) -> AppResult<Folder> {
        sqlx::query_as::<_, Folder>(
            "UPDATE folders SET name = $2 WHERE id = $1 AND parent_id IS NOT NULL RETURNING *",
        )
        .bind(id)
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(folder_write_error("Failed to rename folder"))?
        .ok_or_else(|| AppError::not_found(format!("Folder {id} not found")))
    }

    async fn move_folder(&self, id: FolderId, parent_id: FolderId) -> AppResult<Folder> {
        sqlx::query_as::<_, Folder>(
            "UPDATE folders SET parent_id = $2 WHERE id = $1 AND parent_id IS NOT NULL RETURNING *",
        )
        .bind(id)
        .bind(parent_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(folder_write_error("Failed to move folder"))?
        .ok_or_else(|| AppError::not_found(format!("Folder {id} not found")))
    }

    async fn exists(&self, id: FolderId) -> AppResult<bool> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM folders WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(read_error("Failed to check folder existence"))
    }

    async fn is_empty(&self, id: FolderId) -> AppResult<bool> {
        sqlx::query_scalar::<_, bool>(
            "SELECT NOT EXISTS(SELECT 1 FROM spells WHERE folder_id = $1) \
             AND NOT EXISTS(SELECT 1 FROM folders WHERE parent_id = $1)",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await
        .map_err(read_error("Failed to check folder emptiness"))
    }

    async fn has_spells(&self, id: FolderId) -> AppResult<bool> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM spells WHERE folder_id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(read_error("Failed to check folder spells"))
    }

    async fn has_subfolders(&self, id: FolderId) -> AppResult<bool> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM folders WHERE parent_id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(read_error("Failed to check subfolders"))
    }

    async fn get_contents(&self, id: FolderId) -> AppResult<FolderListing> {
        let subfolders = sqlx::query_as::<_, Folder>(
            "SELECT * FROM folders WHERE parent_id = $1 ORDER BY name ASC",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await
        .map_err(read_error("Failed to list subfolders"))?;

        let spells = sqlx::query_as::<_, Spell>(
            "SELECT * FROM spells WHERE folder_id = $1 ORDER BY name ASC",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await
        .map_err(read_error("Failed to list folder spells"))?;

        Ok(FolderListing { subfolders, spells })
    }

    async fn delete_recursive(&self, id: FolderId) -> AppResult<u64> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(read_error("Failed to begin transaction"))?;

        let subtree: Vec<FolderId> = sqlx::query_scalar(
            "WITH RECURSIVE subtree AS ( \
                SELECT id FROM folders WHERE id = $1 AND parent_id IS NOT NULL \
                UNION ALL \
                SELECT f.id FROM folders f INNER JOIN subtree s ON f.parent_id = s.id \
             ) SELECT id FROM subtree",
        )
        .bind(id)
        .fetch_all(&mut *tx)
        .await
        .map_err(read_error("Failed to collect folder subtree"))?;

        if subtree.is_empty() {
            return Err(AppError::not_found(format!("Folder {id} not found")));
        }

        let spells = sqlx::query("DELETE FROM spells WHERE folder_id = ANY($1)")
            .bind(&subtree)
            .execute(&mut *tx)
            .await
            .map_err(folder_write_error("Failed to delete subtree spells"))?;

        let folders = sqlx::query("DELETE FROM folders WHERE id = ANY($1)")
            .bind(&subtree)
            .execute(&mut *tx)
            .await
            .map_err(folder_write_error("Failed to delete subtree folders"))?;

        tx.commit()
            .await
            .map_err(read_error("Failed to commit recursive delete"))?;

        debug!(
            folder_id = %id,
            folders = folders.rows_affected(),
            spells = spells.rows_affected(),
            "Subtree removed"
        );

        Ok(folders.rows_affected())
    }

    async fn move_contents_to_parent(&self, id: FolderId) -> AppResult<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(read_error("Failed to begin transaction"))?;

        sqlx::query("SET CONSTRAINTS folders_parent_id_name_key DEFERRED")
            .execute(&mut *tx)
            .await
            .map_err(read_error("Failed to defer sibling name constraint"))?;

        let parent_id: Option<FolderId> = sqlx::query_scalar::<_, Option<FolderId>>(
            "SELECT parent_id FROM folders WHERE id = $1 FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(read_error("Failed to lock folder"))?
        .ok_or_else(|| AppError::not_found(format!("Folder {id} not found")))?;

        let parent_id = parent_id
            .ok_or_else(|| AppError::validation("The root folder cannot be deleted"))?;

        sqlx::query("UPDATE folders SET parent_id = $2 WHERE parent_id = $1")
            .bind(id)
            .bind(parent_id)
            .execute(&mut *tx)
            .await
            .map_err(folder_write_error("Failed to reparent subfolders"))?;

        sqlx::query("UPDATE spells SET folder_id = $2 WHERE folder_id = $1")
            .bind(id)
            .bind(parent_id)
            .execute(&mut *tx)
            .await
            .map_err(folder_write_error("Failed to reparent spells"))?;

        sqlx::query("DELETE FROM folders WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(folder_write_error("Failed to delete folder"))?;

        tx.commit()
            .await
            .map_err(folder_write_error("Failed to commit folder removal"))
    }
}
